// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod cleaner;
pub mod config;
pub mod error;
pub mod hub;
pub mod models;
pub mod pipeline;
pub mod utils;

pub use cleaner::{RecordFilter, RejectReason, strip_xml};
pub use config::{Config, FilterConfig, PipelineConfig, SourceConfig, TargetConfig};
pub use error::{PipelineError, Result};
pub use hub::{
    CredentialProvider, DatasetHub, EnvCredentials, HfHubClient, HubRowStream, NoopHub,
    RecordSource, StaticCredentials,
};
pub use models::{CleanRecord, SourceRecord};
pub use pipeline::{
    PipelineRunner, PipelineStats, ProgressTracker, RunOptions, ShardFlush, ShardTotals,
    ShardWriter,
};
pub use utils::Validator;
