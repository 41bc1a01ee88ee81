pub mod config;
pub mod cors;
pub mod error;
pub mod qr;
pub mod server;
pub mod upload;

pub use config::AppConfig;
pub use error::ServiceError;
pub use qr::{GenerationRequest, GenerationResponse};
pub use server::build_router;
