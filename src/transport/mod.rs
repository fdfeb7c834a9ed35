pub mod http_client;
pub mod interface;
pub mod model;
pub mod multipart;
pub mod signer;
