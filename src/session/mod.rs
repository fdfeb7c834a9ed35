pub mod auth;
pub mod browser;
pub mod interface;
pub mod token_cache;
