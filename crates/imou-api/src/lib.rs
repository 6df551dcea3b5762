// imou-api: Async Rust client for the Imou open cloud API

pub mod auth;
pub mod cloud;
pub mod envelope;
pub mod error;
pub mod models;
pub mod sign;
pub mod token;
pub mod transport;

pub use auth::{Credentials, DataCenter};
pub use cloud::devices::{DEVICE_PAGE_SIZE, query_range};
pub use cloud::{AccountStatus, ImouClient};
pub use envelope::{ApiResult, ResponseEnvelope};
pub use error::Error;
pub use models::StreamProfile;
pub use token::{TokenManager, TokenState};
pub use transport::{TlsMode, TransportConfig};
