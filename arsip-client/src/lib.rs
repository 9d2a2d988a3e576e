//! Client side of the member-exit page: cascading center/member selection,
//! derived path binding and the guarded exit submission.

pub mod config;
pub mod error;
pub mod exit_form;
pub mod http_client;

pub use config::Config;
pub use error::{ConfigError, LookupError, SubmitError, ValidationError};
pub use http_client::ArsipHttpClient;
