//! Rimagen exposes a remote image-generation job API as callable,
//! schema-described tools: blocking generation, tracked (async)
//! generation, job polling and cancellation, with generated images
//! materialized to local storage as part of the response.
//!
//! The crate holds no state between calls; every job's authoritative
//! state lives in the remote system and is addressed by its opaque id.

pub mod config;
pub mod download;
pub mod error;
pub mod format;
pub mod logger;
pub mod models;
pub mod remote;
pub mod tools;

pub use config::{Config, MinimaxConfig};
pub use download::{derive_filename, AssetDownloader};
pub use error::{Result, RimagenError};
pub use models::*;
pub use remote::{HttpJobBackend, ImageJobClient, JobBackend};
pub use tools::{ToolContext, ToolDefinition, ToolRegistry, ToolResult, ToolSpec};
