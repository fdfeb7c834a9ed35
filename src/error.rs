/******************************************************************************
    Author: Joaquín Béjar García
    Email: jb@taunais.com
    Date: 14/10/26
 ******************************************************************************/
use reqwest::StatusCode;
use std::fmt::{Display, Formatter};
use std::{fmt, io};

#[derive(Debug)]
pub enum AuthError {
    Network(reqwest::Error),
    Io(io::Error),
    Api { code: String, message: String },
    MalformedResponse(String),
    Declined,
    Other(String),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Network(e) => write!(f, "network error: {e}"),
            AuthError::Io(e) => write!(f, "io error: {e}"),
            AuthError::Api { code, message } => write!(f, "remote error {code}: {message}"),
            AuthError::MalformedResponse(msg) => write!(f, "malformed response: {msg}"),
            AuthError::Declined => write!(f, "authorization declined by user"),
            AuthError::Other(msg) => write!(f, "other error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<reqwest::Error> for AuthError {
    fn from(e: reqwest::Error) -> Self {
        AuthError::Network(e)
    }
}
impl From<io::Error> for AuthError {
    fn from(e: io::Error) -> Self {
        AuthError::Io(e)
    }
}
impl From<AppError> for AuthError {
    fn from(e: AppError) -> Self {
        match e {
            AppError::Network(e) => AuthError::Network(e),
            AppError::Io(e) => AuthError::Io(e),
            AppError::Api { code, message } => AuthError::Api { code, message },
            AppError::MalformedResponse(msg) => AuthError::MalformedResponse(msg),
            AppError::Auth(e) => e,
            AppError::AuthDeclined => AuthError::Declined,
            other => AuthError::Other(other.to_string()),
        }
    }
}

#[derive(Debug)]
pub enum AppError {
    Network(reqwest::Error),
    Io(io::Error),
    LedgerUnavailable(sqlx::Error),
    Unexpected(StatusCode),
    Api { code: String, message: String },
    MalformedResponse(String),
    InvalidUrl(String),
    Auth(AuthError),
    AuthDeclined,
}

impl AppError {
    /// Errors that must stop the process instead of being retried on the next batch.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::AuthDeclined | AppError::LedgerUnavailable(_))
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Network(e) => write!(f, "network error: {e}"),
            AppError::Io(e) => write!(f, "io error: {e}"),
            AppError::LedgerUnavailable(e) => write!(f, "upload ledger unavailable: {e}"),
            AppError::Unexpected(s) => write!(f, "unexpected http status: {s}"),
            AppError::Api { code, message } => write!(f, "remote error {code}: {message}"),
            AppError::MalformedResponse(msg) => write!(f, "malformed response: {msg}"),
            AppError::InvalidUrl(msg) => write!(f, "invalid url: {msg}"),
            AppError::Auth(e) => write!(f, "authentication failed: {e}"),
            AppError::AuthDeclined => write!(f, "authorization declined by user"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Network(e)
    }
}
impl From<io::Error> for AppError {
    fn from(e: io::Error) -> Self {
        AppError::Io(e)
    }
}
// sqlx only backs the upload ledger, so any database failure means the ledger is unusable
impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::LedgerUnavailable(e)
    }
}
impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Declined => AppError::AuthDeclined,
            other => AppError::Auth(other),
        }
    }
}
