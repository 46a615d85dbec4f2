//! Apktool MCP tools module
//!
//! This module provides a unified tool handler for apktool operations
//! using the RMCP 0.3.2 API patterns.

pub mod apktool_tools;
pub mod types;

pub use apktool_tools::*;
pub use types::*;
