//! CLI-specific transforms
//!
//! This module defines all the transform combinations available to `smartscript inspect`.
//! Each transform is a stage + format combination (e.g., "token-json", "ast-treeviz"). The
//! same names apply to scripts and to boolean expressions.

use smartscript_core::boolean::{self, OperatorStyle};
use smartscript_core::formats::to_treeviz_str;
use smartscript_core::script::{self, ToScriptSource};

/// All available CLI transforms (stage + format combinations)
pub const AVAILABLE_TRANSFORMS: &[&str] = &["token-json", "ast-json", "ast-treeviz", "ast-source"];

/// Execute a named transform on SmartScript source
pub fn execute_transform(source: &str, transform_name: &str) -> Result<String, String> {
    match transform_name {
        "token-json" => {
            let tokens =
                script::tokenize(source).map_err(|e| format!("Transform failed: {}", e))?;
            to_json(&tokens)
        }
        "ast-json" => to_json(&parse_script(source)?),
        "ast-treeviz" => Ok(to_treeviz_str(&parse_script(source)?)),
        "ast-source" => Ok(parse_script(source)?.to_script_source()),
        _ => Err(unknown(transform_name)),
    }
}

/// Execute a named transform on a boolean expression
///
/// `ast-source` prints the expression back in `style`.
pub fn execute_expression_transform(
    source: &str,
    transform_name: &str,
    style: OperatorStyle,
) -> Result<String, String> {
    match transform_name {
        "token-json" => {
            let tokens =
                boolean::tokenize(source).map_err(|e| format!("Transform failed: {}", e))?;
            to_json(&tokens)
        }
        "ast-json" => to_json(&parse_expression(source)?),
        "ast-treeviz" => Ok(to_treeviz_str(&parse_expression(source)?)),
        "ast-source" => Ok(format!(
            "{}\n",
            parse_expression(source)?.to_styled_string(style)
        )),
        _ => Err(unknown(transform_name)),
    }
}

fn parse_script(source: &str) -> Result<script::Node, String> {
    script::parse_document(source).map_err(|e| format!("Transform failed: {}", e))
}

fn parse_expression(source: &str) -> Result<boolean::BoolNode, String> {
    boolean::parse_expression(source).map_err(|e| format!("Transform failed: {}", e))
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {}", e))
}

fn unknown(transform_name: &str) -> String {
    format!(
        "Unknown transform: {} (available: {})",
        transform_name,
        AVAILABLE_TRANSFORMS.join(", ")
    )
}
