//! Common types and utilities for ransim
//!
//! This crate provides the configuration, error, logging and gNB context
//! types shared by the ransim crates.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::GnbConfig;
pub use error::Error;
pub use logging::{
    init_logging, init_logging_with_filter, log_ngap_message, log_protocol_message, Direction,
    HexDump, LogLevel,
};
pub use types::{PduSessionResource, UeNgapIds};
