//! CLI command implementations.
//!
//! # Command Modules
//!
//! - [`import`] - Place texture layers on the canvas grid
//! - [`export`] - Write every texture layer as a JPEG
//! - [`init`] - Configuration initialization

pub mod common;
pub mod export;
pub mod import;
pub mod init;
