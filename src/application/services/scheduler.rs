use crate::application::models::upload::UploadBatchResult;
use crate::application::services::upload_service::UploadEngine;
use crate::error::AppError;
use crate::session::interface::Authorizer;
use crate::transport::interface::FlickrTransport;
use std::path::PathBuf;
use std::time::Duration;
use tokio::signal;
use tokio::time;
use tracing::{error, info};

/// Drives the upload engine either for a single batch or on a fixed interval.
pub struct Scheduler<T: FlickrTransport, A: Authorizer> {
    engine: UploadEngine<T, A>,
    image_dir: PathBuf,
    interval: Duration,
}

impl<T: FlickrTransport, A: Authorizer> Scheduler<T, A> {
    pub fn new(engine: UploadEngine<T, A>) -> Self {
        let config = engine.get_config();
        Self {
            engine,
            image_dir: config.upload.image_dir.clone(),
            interval: config.schedule.interval(),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn engine(&self) -> &UploadEngine<T, A> {
        &self.engine
    }

    /// Runs exactly one batch.
    pub async fn once(&mut self) -> Result<UploadBatchResult, AppError> {
        let result = self.engine.run_once(&self.image_dir).await?;
        info!("Batch finished: {}", result);
        Ok(result)
    }

    /// Runs a batch, sleeps the interval, repeats until Ctrl-C or a fatal error.
    pub async fn forever(&mut self) -> Result<UploadBatchResult, AppError> {
        self.run(None).await
    }

    /// Loop behind `forever`. `max_batches` bounds the number of batches.
    pub(crate) async fn run(
        &mut self,
        max_batches: Option<usize>,
    ) -> Result<UploadBatchResult, AppError> {
        let ctrl_c = signal::ctrl_c();
        tokio::pin!(ctrl_c);

        let mut totals = UploadBatchResult::default();
        let mut batches = 0usize;

        info!(
            "Watching {} every {}s",
            self.image_dir.display(),
            self.interval.as_secs()
        );

        loop {
            match self.once().await {
                Ok(result) => totals += result,
                Err(e) if e.is_fatal() => {
                    error!("Stopping: {}", e);
                    return Err(e);
                }
                Err(e) => error!("Batch failed, retrying next interval: {}", e),
            }
            info!("Last check: {}", chrono::Local::now().to_rfc2822());

            batches += 1;
            if max_batches.is_some_and(|max| batches >= max) {
                break;
            }

            // no cancellation inside a batch, only while waiting for the next one
            tokio::select! {
                _ = &mut ctrl_c => {
                    info!("Received shutdown signal, terminating gracefully");
                    break;
                }
                _ = time::sleep(self.interval) => {}
            }
        }

        info!("Uploaded totals: {}", totals);
        Ok(totals)
    }
}
