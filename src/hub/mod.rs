// file: src/hub/mod.rs
// description: hub client module exports
// reference: internal module structure

pub mod auth;
pub mod client;
pub mod stream;

pub use auth::{CredentialProvider, EnvCredentials, StaticCredentials};
pub use client::{DatasetHub, HfHubClient, NoopHub};
pub use stream::{HubRowStream, RecordSource};
