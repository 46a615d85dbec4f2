//! Complete RMCP 0.3.2 implementation for apktool MCP tools
//!
//! This implementation provides 8 analysis tools backed by apktool/aapt
//! subprocess calls plus text scanning over decompiled projects.

use rmcp::{
    tool, tool_router, tool_handler, ServerHandler,
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::*,
    ErrorData as McpError,
    service::RequestContext,
    RoleServer,
};
use tracing::{debug, info, warn};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use walkdir::WalkDir;

use super::types::*;
use crate::command::run_command;
use crate::config::Config;
use crate::error::ApktoolError;
use crate::{prompts, resources};

/// Matches listed per smali search; the total count is always reported.
const MAX_SEARCH_RESULTS: usize = 50;

/// Apktool tool handler with all 8 tools
#[derive(Clone)]
pub struct ApktoolToolHandler {
    #[allow(dead_code)]
    tool_router: ToolRouter<ApktoolToolHandler>,
    config: Config,
    work_dir: PathBuf,
}

impl ApktoolToolHandler {
    /// Create a handler, resolving and creating the scratch workspace.
    ///
    /// Without an explicit work dir the workspace is a fresh directory
    /// under the system temp dir, one per server process.
    pub fn new(config: Config) -> crate::error::Result<Self> {
        let work_dir = match &config.work_dir {
            Some(dir) => dir.clone(),
            None => std::env::temp_dir().join(format!("apktool-mcp-{}", uuid::Uuid::new_v4())),
        };
        std::fs::create_dir_all(&work_dir)?;

        Ok(Self {
            tool_router: Self::tool_router(),
            config,
            work_dir,
        })
    }

    /// The scratch workspace all decoded projects land in.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.command_timeout_secs)
    }

    /// Output directory for a decode: explicit name, or the APK's stem,
    /// always under the workspace.
    fn resolve_output_path(&self, apk_file: &Path, output_dir: Option<&str>) -> PathBuf {
        let name = match output_dir {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => apk_file
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "decoded".to_string()),
        };
        self.work_dir.join(name)
    }

    async fn run_apktool(&self, args: &[String]) -> Result<String, McpError> {
        run_command(&self.config.apktool_path, args, &self.work_dir, self.timeout())
            .await
            .map_err(McpError::from)
    }
}

fn read_lossy(path: &Path) -> Result<String, McpError> {
    let bytes = std::fs::read(path).map_err(|e| McpError::from(ApktoolError::Io(e)))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[tool_router]
impl ApktoolToolHandler {
    // =============================================================================
    // Apktool subprocess tools
    // =============================================================================

    #[tool(description = "Decompile an APK file to extract resources, manifest, and smali code")]
    async fn decode_apk(&self, Parameters(args): Parameters<DecodeApkArgs>) -> Result<CallToolResult, McpError> {
        debug!("Decoding APK '{}'", args.apk_path);

        let apk_file = Path::new(&args.apk_path);
        if !apk_file.exists() {
            return Err(ApktoolError::FileNotFound(args.apk_path.clone()).into());
        }

        let output_path = self.resolve_output_path(apk_file, args.output_dir.as_deref());

        let mut cmd_args = vec!["d".to_string(), args.apk_path.clone()];
        if args.force {
            cmd_args.push("-f".to_string());
        }
        if args.no_res {
            cmd_args.push("-r".to_string());
        }
        if args.no_src {
            cmd_args.push("-s".to_string());
        }
        cmd_args.push("-o".to_string());
        cmd_args.push(output_path.to_string_lossy().into_owned());

        let result = self.run_apktool(&cmd_args).await?;

        info!("Decoded {} to {}", args.apk_path, output_path.display());
        Ok(CallToolResult::success(vec![Content::text(format!(
            "Successfully decompiled APK to: {}\n\nOutput:\n{}",
            output_path.display(),
            result
        ))]))
    }

    #[tool(description = "Recompile/build an APK from decompiled source directory")]
    async fn build_apk(&self, Parameters(args): Parameters<BuildApkArgs>) -> Result<CallToolResult, McpError> {
        debug!("Building APK from '{}'", args.source_dir);

        let source_path = Path::new(&args.source_dir);
        if !source_path.exists() {
            return Err(ApktoolError::FileNotFound(args.source_dir.clone()).into());
        }

        let mut cmd_args = vec!["b".to_string(), args.source_dir.clone()];
        if args.force {
            cmd_args.push("-f".to_string());
        }
        if let Some(output_apk) = &args.output_apk {
            cmd_args.push("-o".to_string());
            cmd_args.push(output_apk.clone());
        }

        let result = self.run_apktool(&cmd_args).await?;

        info!("Built APK from {}", args.source_dir);
        Ok(CallToolResult::success(vec![Content::text(format!(
            "Successfully built APK from: {}\n\nOutput:\n{}",
            args.source_dir, result
        ))]))
    }

    #[tool(description = "Install framework APK for system app decompilation")]
    async fn install_framework(&self, Parameters(args): Parameters<InstallFrameworkArgs>) -> Result<CallToolResult, McpError> {
        debug!("Installing framework '{}'", args.framework_path);

        let framework_file = Path::new(&args.framework_path);
        if !framework_file.exists() {
            return Err(ApktoolError::FileNotFound(args.framework_path.clone()).into());
        }

        let mut cmd_args = vec!["if".to_string(), args.framework_path.clone()];
        if let Some(tag) = &args.tag {
            cmd_args.push("-t".to_string());
            cmd_args.push(tag.clone());
        }

        let result = self.run_apktool(&cmd_args).await?;

        info!("Installed framework {}", args.framework_path);
        Ok(CallToolResult::success(vec![Content::text(format!(
            "Successfully installed framework: {}\n\nOutput:\n{}",
            args.framework_path, result
        ))]))
    }

    // =============================================================================
    // Decompiled-project inspection tools (no subprocess)
    // =============================================================================

    #[tool(description = "Analyze AndroidManifest.xml from a decompiled APK")]
    async fn analyze_manifest(&self, Parameters(args): Parameters<AnalyzeManifestArgs>) -> Result<CallToolResult, McpError> {
        debug!("Analyzing manifest in '{}'", args.apk_dir);

        let manifest_path = Path::new(&args.apk_dir).join("AndroidManifest.xml");
        if !manifest_path.exists() {
            return Err(ApktoolError::FileNotFound(manifest_path.display().to_string()).into());
        }

        let content = read_lossy(&manifest_path)?;

        // Line-based substring scan, not an XML parse; decompiled
        // manifests are often reformatted or slightly malformed.
        let mut analysis = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            let lower = line.to_lowercase();
            if line.contains("package=") {
                analysis.push(format!("Package: {}", line));
            } else if line.contains("android:name=") && lower.contains("activity") {
                analysis.push(format!("Activity: {}", line));
            } else if line.contains("android:name=") && lower.contains("service") {
                analysis.push(format!("Service: {}", line));
            } else if line.contains("android:name=") && lower.contains("receiver") {
                analysis.push(format!("Receiver: {}", line));
            } else if line.contains("uses-permission") {
                analysis.push(format!("Permission: {}", line));
            }
        }

        let analysis_text = if analysis.is_empty() {
            "No key elements found".to_string()
        } else {
            analysis.join("\n")
        };

        Ok(CallToolResult::success(vec![Content::text(format!(
            "AndroidManifest.xml Analysis:\n\n{}\n\nFull content:\n{}",
            analysis_text, content
        ))]))
    }

    #[tool(description = "Extract all string resources from a decompiled APK")]
    async fn extract_strings(&self, Parameters(args): Parameters<ExtractStringsArgs>) -> Result<CallToolResult, McpError> {
        debug!("Extracting strings from '{}' (locale: '{}')", args.apk_dir, args.locale);

        let res_dir = Path::new(&args.apk_dir).join("res");
        if !res_dir.exists() {
            return Err(ApktoolError::FileNotFound(res_dir.display().to_string()).into());
        }

        let entries = std::fs::read_dir(&res_dir)
            .map_err(|e| McpError::from(ApktoolError::Io(e)))?;

        let mut strings_files: Vec<(String, PathBuf)> = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let Some(dir_name) = path.file_name().and_then(|n| n.to_str()).map(String::from)
            else {
                continue;
            };

            let wanted = if args.locale.is_empty() {
                dir_name.starts_with("values")
            } else {
                dir_name == format!("values-{}", args.locale)
            };

            if wanted {
                let strings_path = path.join("strings.xml");
                if strings_path.is_file() {
                    strings_files.push((format!("{}/strings.xml", dir_name), strings_path));
                }
            }
        }
        strings_files.sort_by(|a, b| a.0.cmp(&b.0));

        if strings_files.is_empty() {
            let locale_label = if args.locale.is_empty() { "default" } else { args.locale.as_str() };
            return Ok(CallToolResult::success(vec![Content::text(format!(
                "No string files found for locale: {}",
                locale_label
            ))]));
        }

        let mut output = format!("Extracted strings from {} files:\n", strings_files.len());
        for (label, path) in &strings_files {
            let content = read_lossy(path)?;
            output.push_str(&format!("\n--- {} ---\n{}", label, content));
        }

        Ok(CallToolResult::success(vec![Content::text(output)]))
    }

    #[tool(description = "List all permissions requested by an APK")]
    async fn list_permissions(&self, Parameters(args): Parameters<ListPermissionsArgs>) -> Result<CallToolResult, McpError> {
        debug!("Listing permissions in '{}'", args.apk_dir);

        let manifest_path = Path::new(&args.apk_dir).join("AndroidManifest.xml");
        if !manifest_path.exists() {
            return Err(ApktoolError::FileNotFound(manifest_path.display().to_string()).into());
        }

        let content = read_lossy(&manifest_path)?;

        let permissions: Vec<String> = content
            .lines()
            .filter(|line| line.contains("uses-permission"))
            .map(|line| line.trim().to_string())
            .collect();

        let text = if permissions.is_empty() {
            "No permissions found in AndroidManifest.xml".to_string()
        } else {
            format!(
                "Found {} permissions:\n\n{}",
                permissions.len(),
                permissions.join("\n")
            )
        };

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "Search for specific patterns in smali code")]
    async fn find_smali_references(&self, Parameters(args): Parameters<FindSmaliReferencesArgs>) -> Result<CallToolResult, McpError> {
        debug!("Searching smali in '{}' for '{}'", args.apk_dir, args.pattern);

        let apk_path = Path::new(&args.apk_dir);
        if !apk_path.is_dir() {
            return Err(ApktoolError::FileNotFound(args.apk_dir.clone()).into());
        }

        let entries = std::fs::read_dir(apk_path)
            .map_err(|e| McpError::from(ApktoolError::Io(e)))?;

        let mut smali_dirs: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_dir()
                    && path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|name| name.starts_with("smali"))
            })
            .collect();
        smali_dirs.sort();

        if smali_dirs.is_empty() {
            return Ok(CallToolResult::success(vec![Content::text(
                "No smali directories found".to_string(),
            )]));
        }

        let needle = if args.case_sensitive {
            args.pattern.clone()
        } else {
            args.pattern.to_lowercase()
        };

        let mut matches = Vec::new();
        for smali_dir in &smali_dirs {
            for entry in WalkDir::new(smali_dir).sort_by_file_name() {
                // Unreadable entries never abort the overall search
                let Ok(entry) = entry else { continue };
                if !entry.file_type().is_file() {
                    continue;
                }
                if entry.path().extension().map_or(true, |ext| ext != "smali") {
                    continue;
                }
                let Ok(bytes) = std::fs::read(entry.path()) else { continue };
                let content = String::from_utf8_lossy(&bytes);

                for (index, line) in content.lines().enumerate() {
                    let hit = if args.case_sensitive {
                        line.contains(&needle)
                    } else {
                        line.to_lowercase().contains(&needle)
                    };
                    if hit {
                        let rel = entry.path().strip_prefix(apk_path).unwrap_or(entry.path());
                        matches.push(format!("{}:{}: {}", rel.display(), index + 1, line.trim()));
                    }
                }
            }
        }

        if matches.is_empty() {
            return Ok(CallToolResult::success(vec![Content::text(format!(
                "Pattern '{}' not found in smali code",
                args.pattern
            ))]));
        }

        info!("Found {} smali matches for '{}'", matches.len(), args.pattern);
        let listed: Vec<&str> = matches
            .iter()
            .take(MAX_SEARCH_RESULTS)
            .map(String::as_str)
            .collect();
        Ok(CallToolResult::success(vec![Content::text(format!(
            "Found {} matches for '{}':\n\n{}",
            matches.len(),
            args.pattern,
            listed.join("\n")
        ))]))
    }

    #[tool(description = "Get basic information about an APK file using aapt")]
    async fn get_apk_info(&self, Parameters(args): Parameters<GetApkInfoArgs>) -> Result<CallToolResult, McpError> {
        debug!("Getting APK info for '{}'", args.apk_path);

        let apk_file = Path::new(&args.apk_path);
        if !apk_file.exists() {
            return Err(ApktoolError::FileNotFound(args.apk_path.clone()).into());
        }

        let aapt_args = vec![
            "dump".to_string(),
            "badging".to_string(),
            args.apk_path.clone(),
        ];

        match run_command(&self.config.aapt_path, &aapt_args, &self.work_dir, self.timeout()).await {
            Ok(result) => Ok(CallToolResult::success(vec![Content::text(format!(
                "APK Information:\n\n{}",
                result
            ))])),
            Err(err) => {
                // The only degraded-but-successful path: fall back to raw
                // filesystem metadata when aapt is missing or fails.
                warn!("aapt unavailable for {}: {}", args.apk_path, err);

                let metadata = std::fs::metadata(apk_file)
                    .map_err(|e| McpError::from(ApktoolError::Io(e)))?;
                let modified = metadata
                    .modified()
                    .ok()
                    .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
                    .map(|d| d.as_secs().to_string())
                    .unwrap_or_else(|| "unknown".to_string());

                Ok(CallToolResult::success(vec![Content::text(format!(
                    "APK File Information:\nPath: {}\nSize: {} bytes\nModified: {}\nNote: aapt not available for detailed analysis",
                    apk_file.display(),
                    metadata.len(),
                    modified
                ))]))
            }
        }
    }
}

#[tool_handler]
impl ServerHandler for ApktoolToolHandler {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .enable_prompts()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Apktool MCP Server - Android APK analysis and modification. \
                 8 tools available: decode_apk, build_apk, install_framework, analyze_manifest, \
                 extract_strings, list_permissions, find_smali_references, get_apk_info. \
                 Decoded projects are exposed as apktool://apk/ resources.".to_string()
            ),
        }
    }

    async fn initialize(
        &self,
        _request: InitializeRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<InitializeResult, McpError> {
        info!(
            "Apktool MCP server initialized with 8 tools (workspace: {})",
            self.work_dir.display()
        );
        Ok(self.get_info())
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        let resources = resources::list_project_resources(&self.work_dir)
            .map_err(McpError::from)?
            .into_iter()
            .map(|info| {
                let mut raw = RawResource::new(info.uri.as_str(), info.name.clone());
                raw.mime_type = Some(info.mime_type.to_string());
                raw.no_annotation()
            })
            .collect();

        Ok(ListResourcesResult {
            resources,
            next_cursor: None,
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let (content, kind) =
            resources::read_project_resource(&self.work_dir, &request.uri).map_err(McpError::from)?;

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::TextResourceContents {
                uri: request.uri.clone(),
                mime_type: Some(kind.mime_type().to_string()),
                text: content,
            }],
        })
    }

    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        Ok(ListPromptsResult {
            next_cursor: None,
            prompts: prompts::list_analysis_prompts(),
        })
    }

    async fn get_prompt(
        &self,
        GetPromptRequestParam { name, arguments }: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        let text = prompts::render_prompt(&name, arguments.as_ref())
            .ok_or_else(|| McpError::invalid_params(format!("Unknown prompt: {}", name), None))?;

        Ok(GetPromptResult {
            description: Some(format!("APK analysis prompt for {}", name)),
            messages: vec![PromptMessage {
                role: PromptMessageRole::User,
                content: PromptMessageContent::text(text),
            }],
        })
    }
}
