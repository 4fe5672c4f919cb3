//! Core types

mod config;


pub use config::{SessionConfig, SessionConfigBuilder, default_stream_name};
