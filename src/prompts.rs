//! Canned analysis prompts for common APK reverse engineering tasks.
//!
//! Prompts are static text templates parameterized by caller-supplied
//! fields; listing and rendering never touch the filesystem or spawn a
//! process.

use rmcp::model::{JsonObject, Prompt, PromptArgument};

/// Prompt descriptors, in the fixed order they are published.
pub fn list_analysis_prompts() -> Vec<Prompt> {
    vec![
        Prompt::new(
            "analyze_security",
            Some("Analyze APK for potential security issues"),
            Some(vec![PromptArgument {
                name: "apk_path".to_string(),
                description: Some("Path to APK file".to_string()),
                required: Some(true),
            }]),
        ),
        Prompt::new(
            "privacy_audit",
            Some("Audit APK for privacy-related permissions and data collection"),
            Some(vec![PromptArgument {
                name: "apk_path".to_string(),
                description: Some("Path to APK file".to_string()),
                required: Some(true),
            }]),
        ),
        Prompt::new(
            "reverse_engineer_guide",
            Some("Step-by-step guide for reverse engineering an APK"),
            Some(vec![
                PromptArgument {
                    name: "apk_path".to_string(),
                    description: Some("Path to APK file".to_string()),
                    required: Some(true),
                },
                PromptArgument {
                    name: "target_feature".to_string(),
                    description: Some("Specific feature to analyze".to_string()),
                    required: Some(false),
                },
            ]),
        ),
    ]
}

/// Render a prompt template with the supplied arguments.
///
/// Returns `None` for unknown prompt names.
pub fn render_prompt(name: &str, arguments: Option<&JsonObject>) -> Option<String> {
    let get = |key: &str| -> String {
        arguments
            .and_then(|map| map.get(key))
            .and_then(|value| value.as_str())
            .unwrap_or("")
            .to_string()
    };

    match name {
        "analyze_security" => Some(analyze_security(&get("apk_path"))),
        "privacy_audit" => Some(privacy_audit(&get("apk_path"))),
        "reverse_engineer_guide" => {
            let feature = get("target_feature");
            let feature = if feature.is_empty() {
                "general functionality".to_string()
            } else {
                feature
            };
            Some(reverse_engineer_guide(&get("apk_path"), &feature))
        }
        _ => None,
    }
}

fn analyze_security(apk_path: &str) -> String {
    format!(
        "Please perform a comprehensive security analysis of the APK file: {apk_path}\n\
         \n\
         Steps to follow:\n\
         1. Use decode_apk to decompile the APK\n\
         2. Use analyze_manifest to examine permissions and components\n\
         3. Use list_permissions to identify potentially dangerous permissions\n\
         4. Use find_smali_references to search for:\n\
            - Crypto/encryption usage\n\
            - Network communications\n\
            - File I/O operations\n\
            - Sensitive API calls\n\
         5. Look for hardcoded secrets, API keys, or credentials\n\
         6. Analyze app components for potential vulnerabilities\n\
         \n\
         Provide a detailed security assessment with:\n\
         - Risk level (Low/Medium/High)\n\
         - Identified vulnerabilities\n\
         - Recommendations for mitigation\n"
    )
}

fn privacy_audit(apk_path: &str) -> String {
    format!(
        "Conduct a privacy audit for the APK file: {apk_path}\n\
         \n\
         Analysis should include:\n\
         1. Decompile the APK using decode_apk\n\
         2. Extract and analyze all permissions with list_permissions\n\
         3. Identify data collection patterns in smali code\n\
         4. Check for third-party SDK integrations\n\
         5. Examine network communications and endpoints\n\
         6. Review privacy policy compliance indicators\n\
         \n\
         Generate a privacy report covering:\n\
         - Personal data types collected\n\
         - Data sharing with third parties\n\
         - User consent mechanisms\n\
         - Compliance with privacy regulations (GDPR, CCPA)\n"
    )
}

fn reverse_engineer_guide(apk_path: &str, target_feature: &str) -> String {
    format!(
        "Create a reverse engineering guide for APK: {apk_path}\n\
         Target analysis: {target_feature}\n\
         \n\
         Provide step-by-step instructions for:\n\
         1. Initial APK decompilation and structure analysis\n\
         2. Understanding the app architecture from AndroidManifest.xml\n\
         3. Identifying key components and entry points\n\
         4. Analyzing smali code for the target feature\n\
         5. Resource analysis (strings, layouts, assets)\n\
         6. Modification strategies if needed\n\
         7. Recompilation and testing approaches\n\
         \n\
         Include specific apktool commands and file locations to examine.\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(pairs: &[(&str, &str)]) -> JsonObject {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), json!(v)))
            .collect()
    }

    #[test]
    fn test_lists_three_prompts_in_order() {
        let prompts = list_analysis_prompts();
        let names: Vec<&str> = prompts.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            ["analyze_security", "privacy_audit", "reverse_engineer_guide"]
        );
    }

    #[test]
    fn test_guide_declares_optional_target_feature() {
        let prompts = list_analysis_prompts();
        let guide = prompts
            .iter()
            .find(|p| p.name == "reverse_engineer_guide")
            .unwrap();
        let arguments = guide.arguments.as_ref().unwrap();
        assert_eq!(arguments.len(), 2);
        assert_eq!(arguments[1].name, "target_feature");
        assert_eq!(arguments[1].required, Some(false));
    }

    #[test]
    fn test_render_substitutes_apk_path() {
        let rendered = render_prompt(
            "analyze_security",
            Some(&args(&[("apk_path", "/tmp/app.apk")])),
        )
        .unwrap();
        assert!(rendered.contains("/tmp/app.apk"));
        assert!(rendered.contains("decode_apk"));
    }

    #[test]
    fn test_guide_defaults_target_feature() {
        let rendered = render_prompt(
            "reverse_engineer_guide",
            Some(&args(&[("apk_path", "/tmp/app.apk")])),
        )
        .unwrap();
        assert!(rendered.contains("general functionality"));

        let rendered = render_prompt(
            "reverse_engineer_guide",
            Some(&args(&[("apk_path", "/tmp/app.apk"), ("target_feature", "login flow")])),
        )
        .unwrap();
        assert!(rendered.contains("login flow"));
        assert!(!rendered.contains("general functionality"));
    }

    #[test]
    fn test_unknown_prompt_is_none() {
        assert!(render_prompt("nonexistent", None).is_none());
    }
}
