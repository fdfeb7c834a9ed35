use crate::application::models::upload::{CandidateFile, UploadBatchResult, UploadRequest};
use crate::config::Config;
use crate::error::AppError;
use crate::session::auth::AuthSession;
use crate::session::interface::{AccessToken, Authorizer};
use crate::session::token_cache::TokenCache;
use crate::storage::ledger::Ledger;
use crate::storage::scanner;
use crate::transport::interface::FlickrTransport;
use crate::transport::model::Endpoint;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Runs one batch: scan, skip what the ledger already knows, upload the rest.
pub struct UploadEngine<T: FlickrTransport, A: Authorizer> {
    config: Arc<Config>,
    transport: Arc<T>,
    session: AuthSession<T, A>,
}

impl<T: FlickrTransport, A: Authorizer> UploadEngine<T, A> {
    pub fn new(config: Arc<Config>, transport: Arc<T>, authorizer: A) -> Self {
        let cache = TokenCache::new(config.storage.token_file.clone());
        let session = AuthSession::new(transport.clone(), authorizer, cache);
        Self {
            config,
            transport,
            session,
        }
    }

    pub fn get_config(&self) -> Arc<Config> {
        self.config.clone()
    }

    pub fn session(&self) -> &AuthSession<T, A> {
        &self.session
    }

    /// Uploads every image under `root` that is not in the ledger yet.
    ///
    /// Per-file failures are counted and logged, they never abort the batch.
    /// Errors are returned only when the batch cannot run at all: the scan
    /// fails, the ledger is unusable, or no valid token can be obtained.
    #[instrument(skip(self))]
    pub async fn run_once(&mut self, root: &Path) -> Result<UploadBatchResult, AppError> {
        let candidates = scanner::scan(root)?;
        info!("Found {} candidate images", candidates.len());

        let ledger = Ledger::open(&self.config.storage.history_file).await?;
        let result = self.process(&ledger, &candidates).await;
        ledger.close().await;
        result
    }

    async fn process(
        &mut self,
        ledger: &Ledger,
        candidates: &[CandidateFile],
    ) -> Result<UploadBatchResult, AppError> {
        let token = self.session.ensure_token().await?;
        let mut result = UploadBatchResult::default();

        for candidate in candidates {
            if ledger.contains(&candidate.path).await? {
                debug!("Already uploaded {}", candidate.path);
                result.skipped += 1;
                continue;
            }

            info!("Uploading {} ...", candidate.path);
            match self.upload(&token, candidate).await {
                Ok(photo_id) => {
                    // recorded only after the service confirmed the upload
                    if ledger.put(&candidate.path, &photo_id).await? {
                        info!("Uploaded {} as photo {}", candidate.path, photo_id);
                        result.succeeded += 1;
                    } else {
                        // the path was absent a moment ago, so the photo id is taken by another path
                        error!(
                            "Uploaded {} as photo {} but the ledger already maps that photo elsewhere",
                            candidate.path, photo_id
                        );
                        result.failed += 1;
                    }
                }
                Err(AppError::Api { code, message }) => {
                    error!("Upload of {} rejected: {} {}", candidate.path, code, message);
                    result.failed += 1;
                }
                Err(e) => {
                    error!("Upload of {} failed: {}", candidate.path, e);
                    result.failed += 1;
                }
            }
        }

        Ok(result)
    }

    async fn upload(&self, token: &AccessToken, candidate: &CandidateFile) -> Result<String, AppError> {
        let bytes = tokio::fs::read(&candidate.path).await?;
        let request = UploadRequest::new(token, &self.config.upload, candidate.file_name(), bytes);
        let (params, photo) = request.into_parts();

        self.transport
            .sign_and_send(Endpoint::Upload, params, Some(photo))
            .await?
            .into_result()?
            .photo_id()
    }
}
