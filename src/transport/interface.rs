use crate::error::AppError;
use crate::transport::model::{Endpoint, FilePart, Params, RestResponse};

/// Everything the upload engine and the auth session need from the remote service.
///
/// Implementations add the api key and the request signature to `params`.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait FlickrTransport: Send + Sync {
    /// Sends a signed call and parses the `<rsp>` document. A response with
    /// `stat="fail"` is returned as `Ok`; callers decide how to report it.
    async fn sign_and_send(
        &self,
        endpoint: Endpoint,
        params: Params,
        file: Option<FilePart>,
    ) -> Result<RestResponse, AppError>;

    /// Builds a signed URL for `endpoint`, used for pages opened in a browser.
    fn signed_url(&self, endpoint: Endpoint, params: Params) -> Result<String, AppError>;
}
