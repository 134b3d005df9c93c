//! Shared configuration for the alertshape workspace.

pub mod config;

pub use config::{load_dotenv, Config, LogConfig, PipelinesConfig};
