//! # Printer Module
//!
//! This module provides printer-specific configurations.
//!
//! ## Modules
//!
//! - [`config`]: Printer hardware specifications and job configuration

pub mod config;

pub use config::{BitPolarity, Config, PrinterConfig, TextConfig, TransportConfig};
