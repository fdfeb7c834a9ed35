pub mod scheduler;
pub mod upload_service;
