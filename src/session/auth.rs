/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 14/10/26
******************************************************************************/
use crate::constants::{
    AUTH_TOKEN_PARAM, FROB_PARAM, METHOD_CHECK_TOKEN, METHOD_GET_FROB, METHOD_GET_TOKEN,
    METHOD_PARAM, PERMS_PARAM, REQUESTED_PERMS,
};
use crate::error::AuthError;
use crate::session::interface::{AccessToken, Authorizer};
use crate::session::token_cache::TokenCache;
use crate::transport::interface::FlickrTransport;
use crate::transport::model::{Endpoint, Params};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Where the handshake currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    NoToken,
    FrobObtained(String),
    UserConfirmed(String),
    TokenObtained(AccessToken),
    TokenValid(AccessToken),
    Aborted,
}

pub struct AuthSession<T: FlickrTransport, A: Authorizer> {
    transport: Arc<T>,
    authorizer: A,
    cache: TokenCache,
    state: AuthState,
}

impl<T: FlickrTransport, A: Authorizer> AuthSession<T, A> {
    pub fn new(transport: Arc<T>, authorizer: A, cache: TokenCache) -> Self {
        Self {
            transport,
            authorizer,
            cache,
            state: AuthState::NoToken,
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// The confirmed token, if the last `ensure_token` succeeded.
    pub fn token(&self) -> Option<&AccessToken> {
        match &self.state {
            AuthState::TokenValid(token) => Some(token),
            _ => None,
        }
    }

    /// Makes sure a token confirmed by the remote service is available.
    ///
    /// Every call starts from the known token (in memory, else the cache file)
    /// and validates it with `checkToken`. Only when that fails does it run the
    /// frob handshake, which opens a browser and waits for the user.
    #[instrument(skip(self))]
    pub async fn ensure_token(&mut self) -> Result<AccessToken, AuthError> {
        let known = match std::mem::replace(&mut self.state, AuthState::NoToken) {
            AuthState::TokenValid(token) | AuthState::TokenObtained(token) => Some(token.token),
            _ => match self.cache.load().await {
                Ok(cached) => cached,
                Err(e) => {
                    warn!("Could not read cached token {}: {}", self.cache.path().display(), e);
                    None
                }
            },
        };

        if let Some(candidate) = known {
            match self.check_token(&candidate).await {
                Ok(token) => {
                    debug!("Cached token is valid ({} permissions)", token.permissions);
                    return Ok(self.confirm(token));
                }
                Err(e) => info!("Cached token rejected, re-authenticating: {}", e),
            }
        }

        self.authenticate().await
    }

    /// Runs the full frob handshake.
    #[instrument(skip(self))]
    pub async fn authenticate(&mut self) -> Result<AccessToken, AuthError> {
        info!("Getting new token");
        self.state = AuthState::NoToken;

        let frob = self.get_frob().await?;
        self.state = AuthState::FrobObtained(frob.clone());

        if !self.request_authorization(&frob).await? {
            self.state = AuthState::Aborted;
            error!("You need to allow this program to access your Flickr site.");
            error!("A web browser should pop open with instructions.");
            error!("After you have allowed access restart uploadr.");
            return Err(AuthError::Declined);
        }
        self.state = AuthState::UserConfirmed(frob.clone());

        let token = self.get_token(&frob).await?;
        self.state = AuthState::TokenObtained(token.clone());

        if let Err(e) = self.cache.store(&token.token).await {
            warn!(
                "Issue writing token to local cache {}: {}",
                self.cache.path().display(),
                e
            );
        }

        Ok(self.confirm(token))
    }

    fn confirm(&mut self, token: AccessToken) -> AccessToken {
        if !token.can_upload() {
            warn!(
                "Token only grants {} permissions, uploads will be rejected",
                token.permissions
            );
        }
        self.state = AuthState::TokenValid(token.clone());
        token
    }

    async fn get_frob(&self) -> Result<String, AuthError> {
        let mut params = Params::new();
        params.insert(METHOD_PARAM.to_string(), METHOD_GET_FROB.to_string());

        let response = self
            .transport
            .sign_and_send(Endpoint::Rest, params, None)
            .await
            .map_err(|e| {
                error!("Error getting frob: {}", e);
                AuthError::from(e)
            })?
            .into_result()?;
        Ok(response.frob()?)
    }

    async fn request_authorization(&self, frob: &str) -> Result<bool, AuthError> {
        let mut params = Params::new();
        params.insert(FROB_PARAM.to_string(), frob.to_string());
        params.insert(PERMS_PARAM.to_string(), REQUESTED_PERMS.to_string());

        let url = self.transport.signed_url(Endpoint::Auth, params)?;
        self.authorizer.authorize(&url).await
    }

    async fn get_token(&self, frob: &str) -> Result<AccessToken, AuthError> {
        let mut params = Params::new();
        params.insert(METHOD_PARAM.to_string(), METHOD_GET_TOKEN.to_string());
        params.insert(FROB_PARAM.to_string(), frob.to_string());

        let response = self
            .transport
            .sign_and_send(Endpoint::Rest, params, None)
            .await?
            .into_result()?;
        Ok(response.access_token()?)
    }

    async fn check_token(&self, token: &str) -> Result<AccessToken, AuthError> {
        let mut params = Params::new();
        params.insert(METHOD_PARAM.to_string(), METHOD_CHECK_TOKEN.to_string());
        params.insert(AUTH_TOKEN_PARAM.to_string(), token.to_string());

        let response = self
            .transport
            .sign_and_send(Endpoint::Rest, params, None)
            .await?
            .into_result()?;
        Ok(response.access_token()?)
    }
}
