use crate::error::AppError;
use crate::session::interface::{AccessToken, Permissions};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// Request parameters, kept sorted so that signing and query strings are stable.
pub type Params = BTreeMap<String, String>;

/// Remote endpoints of the photo service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Rest,
    Auth,
    Upload,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Rest => write!(f, "rest"),
            Endpoint::Auth => write!(f, "auth"),
            Endpoint::Upload => write!(f, "upload"),
        }
    }
}

/// A binary payload sent as one part of a multipart body.
#[derive(Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: String,
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl FilePart {
    pub fn new(field: impl Into<String>, filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            field: field.into(),
            filename: filename.into(),
            bytes,
        }
    }
}

impl fmt::Debug for FilePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilePart")
            .field("field", &self.field)
            .field("filename", &self.filename)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    #[serde(rename = "@code")]
    pub code: String,
    #[serde(rename = "@msg")]
    pub msg: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AuthUser {
    #[serde(rename = "@nsid", default)]
    pub nsid: String,
    #[serde(rename = "@username", default)]
    pub username: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AuthBody {
    pub token: String,
    pub perms: String,
    pub user: Option<AuthUser>,
}

/// Parsed `<rsp stat="...">` document returned by every remote method.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RestResponse {
    #[serde(rename = "@stat")]
    pub stat: String,
    pub err: Option<ErrorBody>,
    pub frob: Option<String>,
    pub auth: Option<AuthBody>,
    pub photoid: Option<String>,
}

impl RestResponse {
    pub fn from_xml(xml: &str) -> Result<Self, AppError> {
        quick_xml::de::from_str(xml.trim())
            .map_err(|e| AppError::MalformedResponse(format!("{e}: {}", xml.trim())))
    }

    pub fn is_ok(&self) -> bool {
        self.stat == "ok"
    }

    /// The remote error code and message, if the call failed.
    pub fn error(&self) -> Option<(String, String)> {
        if self.is_ok() {
            return None;
        }
        Some(match &self.err {
            Some(err) => (err.code.clone(), err.msg.clone()),
            None => ("unknown".to_string(), format!("stat=\"{}\"", self.stat)),
        })
    }

    pub fn into_result(self) -> Result<Self, AppError> {
        match self.error() {
            None => Ok(self),
            Some((code, message)) => Err(AppError::Api { code, message }),
        }
    }

    pub fn frob(&self) -> Result<String, AppError> {
        self.frob
            .as_ref()
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .ok_or_else(|| AppError::MalformedResponse("response has no frob".to_string()))
    }

    pub fn access_token(&self) -> Result<AccessToken, AppError> {
        let auth = self
            .auth
            .as_ref()
            .ok_or_else(|| AppError::MalformedResponse("response has no auth block".to_string()))?;
        let token = auth.token.trim();
        if token.is_empty() {
            return Err(AppError::MalformedResponse("empty auth token".to_string()));
        }
        let permissions: Permissions = auth.perms.parse()?;
        Ok(AccessToken::new(token, permissions))
    }

    pub fn photo_id(&self) -> Result<String, AppError> {
        self.photoid
            .as_ref()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AppError::MalformedResponse("response has no photoid".to_string()))
    }
}
