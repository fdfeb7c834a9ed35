use crate::config::Config;
use crate::error::AppError;
use crate::transport::interface::FlickrTransport;
use crate::transport::model::{Endpoint, FilePart, Params, RestResponse};
use crate::transport::multipart::MultipartEncoder;
use crate::transport::signer::Signer;
use async_trait::async_trait;
use reqwest::{header, Client, Response, Url};
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, instrument};

/// HTTP client for the Flickr REST, auth and upload endpoints.
#[derive(Debug)]
pub struct FlickrHttpClient {
    client: Client,
    signer: Signer,
    rest_url: String,
    auth_url: String,
    upload_url: String,
}

impl FlickrHttpClient {
    /// Creates a new client from the REST settings and credentials in `config`.
    ///
    /// # Returns
    ///
    /// The client, or `AppError::Network` if the underlying HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(concat!("flickr-uploadr/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.rest_api.timeout))
            .build()?;

        Ok(Self {
            client,
            signer: Signer::new(
                config.credentials.api_key.clone(),
                config.credentials.api_secret.clone(),
            ),
            rest_url: config.rest_api.rest_url(),
            auth_url: config.rest_api.auth_url(),
            upload_url: config.rest_api.upload_url(),
        })
    }

    fn endpoint_url(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::Rest => &self.rest_url,
            Endpoint::Auth => &self.auth_url,
            Endpoint::Upload => &self.upload_url,
        }
    }

    async fn get(&self, url: &str, params: &Params) -> Result<RestResponse, AppError> {
        let response = self.client.get(url).query(params).send().await.map_err(|e| {
            error!("Failed to send GET request: {:?}", e);
            AppError::from(e)
        })?;

        Self::handle_response(response).await
    }

    async fn post_multipart(
        &self,
        url: &str,
        params: &Params,
        file: FilePart,
    ) -> Result<RestResponse, AppError> {
        let (content_type, body) = MultipartEncoder::new().encode(params.iter(), &[file]);
        debug!("Multipart body of {} bytes", body.len());

        let response = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send POST request: {:?}", e);
                AppError::from(e)
            })?;

        Self::handle_response(response).await
    }

    async fn handle_response(response: Response) -> Result<RestResponse, AppError> {
        let status = response.status();
        let body_text = response.text().await?;

        debug!("Response Status: {}", status);
        debug!("Response Body: {}", body_text);

        match RestResponse::from_xml(&body_text) {
            Ok(rsp) => Ok(rsp),
            Err(_) if !status.is_success() => {
                error!(
                    "API request failed. Status: {}, Body: {}",
                    status, body_text
                );
                Err(AppError::Unexpected(status))
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl FlickrTransport for FlickrHttpClient {
    #[instrument(skip(self, params, file))]
    async fn sign_and_send(
        &self,
        endpoint: Endpoint,
        params: Params,
        file: Option<FilePart>,
    ) -> Result<RestResponse, AppError> {
        let url = self.endpoint_url(endpoint).to_string();
        let signed = self.signer.signed(params);

        match file {
            Some(file) => {
                debug!("Sending multipart POST request to {}", url);
                self.post_multipart(&url, &signed, file).await
            }
            None => {
                debug!("Sending GET request to {}", url);
                self.get(&url, &signed).await
            }
        }
    }

    fn signed_url(&self, endpoint: Endpoint, params: Params) -> Result<String, AppError> {
        let signed = self.signer.signed(params);
        Url::parse_with_params(self.endpoint_url(endpoint), signed.iter())
            .map(String::from)
            .map_err(|e| AppError::InvalidUrl(e.to_string()))
    }
}

impl fmt::Display for FlickrHttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"rest_url\":\"{}\",\"auth_url\":\"{}\",\"upload_url\":\"{}\"}}",
            self.rest_url, self.auth_url, self.upload_url
        )
    }
}
