//! Type definitions for apktool MCP tools
//!
//! These structs are the published input schemas: field names, required
//! fields, and defaults are part of the wire contract.

use serde::Deserialize;
use schemars::JsonSchema;

fn default_true() -> bool {
    true
}

// ============================================================================
// decode_apk
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DecodeApkArgs {
    /// Path to the APK file
    pub apk_path: String,
    /// Output directory name (optional)
    #[serde(default)]
    pub output_dir: Option<String>,
    /// Force overwrite existing directory
    #[serde(default)]
    pub force: bool,
    /// Do not decode resources
    #[serde(default)]
    pub no_res: bool,
    /// Do not decode sources
    #[serde(default)]
    pub no_src: bool,
}

// ============================================================================
// build_apk
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct BuildApkArgs {
    /// Path to decompiled APK directory
    pub source_dir: String,
    /// Output APK filename (optional)
    #[serde(default)]
    pub output_apk: Option<String>,
    /// Force build all files
    #[serde(default)]
    pub force: bool,
}

// ============================================================================
// install_framework
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct InstallFrameworkArgs {
    /// Path to framework APK file
    pub framework_path: String,
    /// Tag for framework identification (optional)
    #[serde(default)]
    pub tag: Option<String>,
}

// ============================================================================
// analyze_manifest
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AnalyzeManifestArgs {
    /// Path to decompiled APK directory
    pub apk_dir: String,
}

// ============================================================================
// extract_strings
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ExtractStringsArgs {
    /// Path to decompiled APK directory
    pub apk_dir: String,
    /// Specific locale (e.g., 'en', 'es')
    #[serde(default)]
    pub locale: String,
}

// ============================================================================
// list_permissions
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListPermissionsArgs {
    /// Path to decompiled APK directory
    pub apk_dir: String,
}

// ============================================================================
// find_smali_references
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct FindSmaliReferencesArgs {
    /// Path to decompiled APK directory
    pub apk_dir: String,
    /// Search pattern or string
    pub pattern: String,
    /// Case sensitive search
    #[serde(default = "default_true")]
    pub case_sensitive: bool,
}

// ============================================================================
// get_apk_info
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetApkInfoArgs {
    /// Path to the APK file
    pub apk_path: String,
}
