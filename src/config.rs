//! Configuration for the apktool-mcp server

use std::path::PathBuf;
use clap::Parser;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "apktool-mcp")]
#[command(about = "MCP server for Android APK analysis via apktool")]
#[command(version)]
pub struct Args {
    /// Path to the apktool executable
    #[arg(long, default_value = "apktool")]
    pub apktool_path: String,

    /// Working directory for decoded projects and build outputs
    /// (defaults to a fresh directory under the system temp dir)
    #[arg(long)]
    pub work_dir: Option<PathBuf>,

    /// Path to the aapt executable used by get_apk_info
    #[arg(long, default_value = "aapt")]
    pub aapt_path: String,

    /// Timeout for external tool invocations, in seconds
    #[arg(long, default_value = "600")]
    pub command_timeout: u64,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Log file path (defaults to stderr)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Runtime configuration derived from CLI args
#[derive(Debug, Clone)]
pub struct Config {
    pub apktool_path: String,
    pub work_dir: Option<PathBuf>,
    pub aapt_path: String,
    pub command_timeout_secs: u64,
}

impl Config {
    pub fn from_args(args: &Args) -> Self {
        Self {
            apktool_path: args.apktool_path.clone(),
            work_dir: args.work_dir.clone(),
            aapt_path: args.aapt_path.clone(),
            command_timeout_secs: args.command_timeout,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            apktool_path: "apktool".to_string(),
            work_dir: None,
            aapt_path: "aapt".to_string(),
            command_timeout_secs: 600,
        }
    }
}
