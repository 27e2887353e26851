//! Library side of the `claims` CLI: logging setup, configuration, and the
//! ingestion pipeline.

pub mod config;
pub mod logging;
pub mod pipeline;
