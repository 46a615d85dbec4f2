//! MCP resources backed by the scratch workspace.
//!
//! Each decompiled project directory is exposed through the
//! `apktool://apk/` URI scheme as two resources: its manifest and its
//! apktool.yml. Listing re-scans the workspace every time; there is no
//! in-memory index of projects.

use std::fs;
use std::path::Path;

use crate::error::{ApktoolError, Result};

const URI_PREFIX: &str = "apktool://apk/";

/// The two per-project resources synthesized for every workspace entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Manifest,
    ApktoolYml,
}

impl ResourceKind {
    pub fn uri_segment(&self) -> &'static str {
        match self {
            ResourceKind::Manifest => "manifest",
            ResourceKind::ApktoolYml => "apktool_yml",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            ResourceKind::Manifest => "AndroidManifest.xml",
            ResourceKind::ApktoolYml => "apktool.yml",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ResourceKind::Manifest => "application/xml",
            ResourceKind::ApktoolYml => "application/yaml",
        }
    }

    fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "manifest" => Some(ResourceKind::Manifest),
            "apktool_yml" => Some(ResourceKind::ApktoolYml),
            _ => None,
        }
    }
}

/// Parse an `apktool://apk/<project>/<kind>` URI.
///
/// Returns `None` for any URI outside the scheme, with a missing project
/// or kind segment, or with an unknown kind.
pub fn parse_resource_uri(uri: &str) -> Option<(String, ResourceKind)> {
    let rest = uri.strip_prefix(URI_PREFIX)?;
    let mut parts = rest.splitn(2, '/');
    let project = parts.next().filter(|p| !p.is_empty())?;
    let kind = ResourceKind::from_segment(parts.next()?)?;
    Some((project.to_string(), kind))
}

/// Build a resource URI for a project directory.
pub fn build_resource_uri(project: &str, kind: ResourceKind) -> String {
    format!("{}{}/{}", URI_PREFIX, project, kind.uri_segment())
}

/// Resource info carried up to the MCP layer.
#[derive(Debug, Clone)]
pub struct ResourceInfo {
    /// Resource URI.
    pub uri: String,
    /// Human-readable name.
    pub name: String,
    /// MIME type.
    pub mime_type: &'static str,
}

/// List the resources of every decompiled project in the workspace.
///
/// Scans the immediate subdirectories at call time and synthesizes both
/// resource entries per project whether or not the underlying files
/// exist yet.
pub fn list_project_resources(work_dir: &Path) -> Result<Vec<ResourceInfo>> {
    let mut resources = Vec::new();

    let mut projects: Vec<String> = fs::read_dir(work_dir)?
        .flatten()
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().to_str().map(String::from))
        .collect();
    projects.sort();

    for project in projects {
        for kind in [ResourceKind::Manifest, ResourceKind::ApktoolYml] {
            resources.push(ResourceInfo {
                uri: build_resource_uri(&project, kind),
                name: format!("{} - {}", project, kind.file_name()),
                mime_type: kind.mime_type(),
            });
        }
    }

    Ok(resources)
}

/// Read a resource's raw text content.
pub fn read_project_resource(work_dir: &Path, uri: &str) -> Result<(String, ResourceKind)> {
    let (project, kind) = parse_resource_uri(uri)
        .ok_or_else(|| ApktoolError::ResourceNotFound(uri.to_string()))?;

    let path = work_dir.join(&project).join(kind.file_name());
    if !path.is_file() {
        return Err(ApktoolError::ResourceNotFound(uri.to_string()));
    }

    let bytes = fs::read(&path)?;
    Ok((String::from_utf8_lossy(&bytes).into_owned(), kind))
}
