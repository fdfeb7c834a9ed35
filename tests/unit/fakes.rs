use async_trait::async_trait;
use flickr_uploadr::config::{
    Config, Credentials, RestApiConfig, ScheduleConfig, StorageConfig, UploadConfig,
};
use flickr_uploadr::error::{AppError, AuthError};
use flickr_uploadr::session::interface::Authorizer;
use flickr_uploadr::transport::interface::FlickrTransport;
use flickr_uploadr::transport::model::{Endpoint, FilePart, Params, RestResponse};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub fn config_rooted_at(root: &Path, base_url: &str) -> Config {
    Config {
        credentials: Credentials {
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
        },
        rest_api: RestApiConfig {
            base_url: base_url.to_string(),
            timeout: 5,
        },
        upload: UploadConfig {
            image_dir: root.join("images"),
            title: "".to_string(),
            description: "".to_string(),
            tags: "uploadr".to_string(),
            is_public: false,
            is_friend: true,
            is_family: true,
        },
        storage: StorageConfig {
            history_file: root.join("uploadr.history"),
            token_file: root.join(".flickrToken"),
        },
        schedule: ScheduleConfig {
            interval: 60,
            daemon: false,
        },
    }
}

/// One call as seen by the fake service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub endpoint: Endpoint,
    pub method: Option<String>,
    pub filename: Option<String>,
}

/// In-memory photo service: knows one valid token, hands out sequential photo ids
/// and fails chosen filenames a limited number of times.
pub struct FakeFlickr {
    valid_token: String,
    next_photo_id: AtomicUsize,
    failures: Mutex<Vec<String>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeFlickr {
    pub fn new(valid_token: &str) -> Self {
        Self {
            valid_token: valid_token.to_string(),
            next_photo_id: AtomicUsize::new(1000),
            failures: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// The next upload of `filename` is rejected with a protocol error.
    pub fn fail_once(self, filename: &str) -> Self {
        self.failures.lock().unwrap().push(filename.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, method: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.method.as_deref() == Some(method))
            .count()
    }

    pub fn uploaded(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.endpoint == Endpoint::Upload)
            .filter_map(|c| c.filename)
            .collect()
    }

    fn rsp(body: &str) -> Result<RestResponse, AppError> {
        RestResponse::from_xml(&format!(r#"<rsp stat="ok">{body}</rsp>"#))
    }

    fn fail(code: u32, message: &str) -> Result<RestResponse, AppError> {
        RestResponse::from_xml(&format!(
            r#"<rsp stat="fail"><err code="{code}" msg="{message}"/></rsp>"#
        ))
    }

    fn token_body(&self) -> String {
        format!(
            "<auth><token>{}</token><perms>write</perms><user nsid=\"1@N01\" username=\"me\"/></auth>",
            self.valid_token
        )
    }
}

#[async_trait]
impl FlickrTransport for FakeFlickr {
    async fn sign_and_send(
        &self,
        endpoint: Endpoint,
        params: Params,
        file: Option<FilePart>,
    ) -> Result<RestResponse, AppError> {
        let method = params.get("method").cloned();
        let filename = file.as_ref().map(|f| f.filename.clone());
        self.calls.lock().unwrap().push(Call {
            endpoint,
            method: method.clone(),
            filename: filename.clone(),
        });

        match (endpoint, method.as_deref()) {
            (Endpoint::Rest, Some("flickr.auth.getFrob")) => Self::rsp("<frob>frob-1</frob>"),
            (Endpoint::Rest, Some("flickr.auth.getToken")) => Self::rsp(&self.token_body()),
            (Endpoint::Rest, Some("flickr.auth.checkToken")) => {
                if params.get("auth_token") == Some(&self.valid_token) {
                    Self::rsp(&self.token_body())
                } else {
                    Self::fail(98, "Invalid auth token")
                }
            }
            (Endpoint::Upload, _) => {
                if params.get("auth_token") != Some(&self.valid_token) {
                    return Self::fail(98, "Invalid auth token");
                }
                let filename = filename.unwrap_or_default();
                let mut failures = self.failures.lock().unwrap();
                if let Some(pos) = failures.iter().position(|f| *f == filename) {
                    failures.remove(pos);
                    return Self::fail(5, "Filetype was not recognised");
                }
                let id = self.next_photo_id.fetch_add(1, Ordering::SeqCst);
                Self::rsp(&format!("<photoid>{id}</photoid>"))
            }
            _ => Self::fail(112, "Method not found"),
        }
    }

    fn signed_url(&self, endpoint: Endpoint, params: Params) -> Result<String, AppError> {
        let query: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
        Ok(format!("https://flickr.test/{endpoint}/?{}", query.join("&")))
    }
}

/// Answers the browser confirmation with a fixed choice and counts prompts.
#[derive(Clone)]
pub struct FakeUser {
    confirms: bool,
    prompts: Arc<AtomicUsize>,
    urls: Arc<Mutex<Vec<String>>>,
}

impl FakeUser {
    pub fn confirming() -> Self {
        Self {
            confirms: true,
            prompts: Arc::new(AtomicUsize::new(0)),
            urls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn declining() -> Self {
        Self {
            confirms: false,
            ..Self::confirming()
        }
    }

    pub fn prompts(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Authorizer for FakeUser {
    async fn authorize(&self, url: &str) -> Result<bool, AuthError> {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.to_string());
        Ok(self.confirms)
    }
}
