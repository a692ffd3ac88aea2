//! aivaluator-client: Scoring-service integration.
//!
//! Implements the `ScoringService` trait over HTTP (posting the submission
//! to the grading server's `/submit` endpoint) and as an in-process mock,
//! and loads the client configuration.

pub mod config;
pub mod error;
pub mod http;
pub mod mock;

pub use config::{create_service, load_config_from, AivaluatorConfig, ServerConfig};
pub use error::ClientError;
pub use http::HttpScoringClient;
pub use mock::MockScoringService;
