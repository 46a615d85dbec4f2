//! Integration tests for apktool-mcp MCP server
//!
//! Tests handler creation and config — tool invocation tests are in
//! src/tools/apktool_tools.rs (they need access to private methods).

use apktool_mcp::{ApktoolToolHandler, Config};
use tempfile::TempDir;

#[test]
fn test_handler_creation() {
    let config = Config::default();
    let _handler = ApktoolToolHandler::new(config).unwrap();
}

#[test]
fn test_handler_creates_workspace() {
    let tmp = TempDir::new().unwrap();
    let work_dir = tmp.path().join("nested/workspace");

    let handler = ApktoolToolHandler::new(Config {
        work_dir: Some(work_dir.clone()),
        ..Config::default()
    })
    .unwrap();

    assert!(work_dir.is_dir());
    assert_eq!(handler.work_dir(), work_dir);
}

#[test]
fn test_default_workspace_is_fresh_per_handler() {
    let h1 = ApktoolToolHandler::new(Config::default()).unwrap();
    let h2 = ApktoolToolHandler::new(Config::default()).unwrap();
    assert_ne!(h1.work_dir(), h2.work_dir());
}

#[test]
fn test_config_default_values() {
    let config = Config::default();
    assert_eq!(config.apktool_path, "apktool");
    assert_eq!(config.aapt_path, "aapt");
    assert!(config.work_dir.is_none());
    assert_eq!(config.command_timeout_secs, 600);
}

#[test]
fn test_config_from_args() {
    use clap::Parser;
    use apktool_mcp::config::Args;

    let args = Args::parse_from(["apktool-mcp", "--apktool-path", "/usr/local/bin/apktool"]);
    let config = Config::from_args(&args);
    assert_eq!(config.apktool_path, "/usr/local/bin/apktool");
}

#[test]
fn test_get_info_advertises_tools_resources_prompts() {
    use rmcp::ServerHandler;

    let tmp = TempDir::new().unwrap();
    let handler = ApktoolToolHandler::new(Config {
        work_dir: Some(tmp.path().to_path_buf()),
        ..Config::default()
    })
    .unwrap();

    let info = handler.get_info();
    assert!(info.capabilities.tools.is_some());
    assert!(info.capabilities.resources.is_some());
    assert!(info.capabilities.prompts.is_some());

    let instructions = info.instructions.unwrap();
    assert!(instructions.contains("decode_apk"));
    assert!(instructions.contains("find_smali_references"));
}

#[test]
fn test_handler_clone_shares_workspace() {
    let tmp = TempDir::new().unwrap();
    let h1 = ApktoolToolHandler::new(Config {
        work_dir: Some(tmp.path().to_path_buf()),
        ..Config::default()
    })
    .unwrap();
    let h2 = h1.clone();
    assert_eq!(h1.work_dir(), h2.work_dir());
}
