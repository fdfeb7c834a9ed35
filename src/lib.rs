/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 14/10/26
******************************************************************************/

//! Uploads new images from a local directory tree to Flickr, once per file.
//!
//! The pieces, leaf first:
//! - [`transport::signer::Signer`] computes `api_sig` for every request.
//! - [`storage::ledger::Ledger`] remembers what was uploaded, in both directions.
//! - [`storage::scanner::scan`] lists candidate images.
//! - [`session::auth::AuthSession`] runs the frob handshake and caches the token.
//! - [`transport::multipart::MultipartEncoder`] builds upload bodies.
//! - [`application::services::upload_service::UploadEngine`] runs one batch.
//! - [`application::services::scheduler::Scheduler`] runs batches once or forever.

pub mod config;

pub mod constants;

pub mod error;

pub mod application;

pub mod session;

pub mod storage;

pub mod transport;

pub mod utils;
