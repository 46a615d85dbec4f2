//! Apktool MCP Server
//!
//! A Model Context Protocol server that exposes apktool functionality for
//! Android APK analysis and modification. Gives AI assistants decode/build
//! capabilities plus text-level inspection of decompiled projects.

pub mod command;
pub mod config;
pub mod error;
pub mod prompts;
pub mod resources;
pub mod tools;

pub use config::{Args, Config};
pub use error::{ApktoolError, Result};
pub use tools::ApktoolToolHandler;
