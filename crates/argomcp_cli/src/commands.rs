//! Command implementations.

use argomcp_argo::{ArgoClient, SnapshotClient, build_registry};
use argomcp_core::Config;
use argomcp_tool::{Arguments, CallContext, ToolRegistry, parse_pairs};
use clap::ValueEnum;
use color_eyre::Result;
use color_eyre::eyre::{WrapErr, bail};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

/// How `call` prints its result
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Indented JSON as returned by the tool
    Json,
    /// The same document as YAML
    Yaml,
}

/// Write a default config to `path`
pub fn config_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists; pass --force to overwrite", path.display());
    }
    Config::default()
        .write_to(path)
        .wrap_err_with(|| format!("Failed to write {}", path.display()))
}

fn registry(config: &Config, client: Arc<dyn ArgoClient>, safe_mode: bool) -> ToolRegistry {
    build_registry(client, CallContext::new(safe_mode, config.limits))
}

/// One line per tool: name, side effect, description
pub fn list_tools(config: &Config) -> String {
    let registry = registry(
        config,
        Arc::new(SnapshotClient::default()),
        config.server.safe_mode,
    );
    let width = registry
        .schemas()
        .iter()
        .map(|s| s.name.len())
        .max()
        .unwrap_or(0);
    registry
        .schemas()
        .iter()
        .map(|schema| {
            format!(
                "{:<width$}  {:<5}  {}\n",
                schema.name, schema.side_effect, schema.description
            )
        })
        .collect()
}

/// Arguments from `key=value` pairs, or a JSON object on `stdin` for `-`
pub fn read_arguments(pairs: &[String], mut stdin: impl Read) -> Result<Arguments> {
    if pairs.len() == 1 && pairs[0] == "-" {
        let mut text = String::new();
        stdin
            .read_to_string(&mut text)
            .wrap_err("Failed to read arguments from stdin")?;
        let value: serde_json::Value =
            serde_json::from_str(&text).wrap_err("Arguments on stdin are not JSON")?;
        return Ok(Arguments::from_value(value)?);
    }
    Ok(parse_pairs(pairs)?)
}

/// Call `tool` against the snapshot at `snapshot`; error outputs fail
pub async fn call(
    config: &Config,
    snapshot: &Path,
    safe_mode: bool,
    tool: &str,
    args: Arguments,
) -> Result<String> {
    let client = SnapshotClient::load(snapshot)
        .await
        .wrap_err("Failed to load snapshot")?;
    let registry = registry(config, Arc::new(client), safe_mode);
    let output = registry.call(tool, args).await;
    if output.is_error {
        bail!("{}", output.text);
    }
    Ok(output.text)
}

/// Re-encode tool output in `format`
pub fn render(text: &str, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(text.to_string()),
        OutputFormat::Yaml => {
            let value: serde_json::Value =
                serde_json::from_str(text).wrap_err("Tool output is not JSON")?;
            Ok(serde_yaml_ng::to_string(&value)?)
        }
    }
}
