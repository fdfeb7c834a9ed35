use crate::error::AuthError;
use crate::session::interface::Authorizer;
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};

const PROMPT: &str = "Have you authenticated this application? (Y/N): ";

/// Opens the authorization page in the system browser and asks on the terminal
/// whether access was granted.
#[derive(Debug, Default)]
pub struct BrowserAuthorizer;

impl BrowserAuthorizer {
    pub fn new() -> Self {
        Self
    }
}

/// Anything but an explicit "n"/"no" counts as confirmation.
pub(crate) fn parse_confirmation(answer: &str) -> bool {
    !matches!(answer.trim().to_lowercase().as_str(), "n" | "no")
}

#[async_trait]
impl Authorizer for BrowserAuthorizer {
    async fn authorize(&self, url: &str) -> Result<bool, AuthError> {
        if let Err(e) = webbrowser::open(url) {
            warn!("Could not open a browser: {}", e);
        }
        info!("Authorization page: {}", url);

        let mut stdout = tokio::io::stdout();
        stdout.write_all(format!("{url}\n{PROMPT}").as_bytes()).await?;
        stdout.flush().await?;

        let mut answer = String::new();
        BufReader::new(tokio::io::stdin())
            .read_line(&mut answer)
            .await?;

        Ok(parse_confirmation(&answer))
    }
}
