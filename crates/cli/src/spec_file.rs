use anyhow::{Context, Result, bail};
use argscan_schema::{CommandSpec, Flags, ParamDescriptor, ValidatorDescriptor};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_SPEC_NAME: &str = "argscan.json";

/// Load a command spec from `spec_path`, or `argscan.json` in the current
/// directory.
pub fn load_spec(spec_path: Option<&Path>) -> Result<CommandSpec> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;
    let path = match spec_path {
        Some(p) => resolve_against(&cwd, p),
        None => cwd.join(DEFAULT_SPEC_NAME),
    };

    if !path.exists() {
        bail!("command spec not found: {}", path.display());
    }
    CommandSpec::load(&path).with_context(|| format!("failed to load {}", path.display()))
}

/// Write a starter spec into `dir`. An existing file is kept unless
/// `overwrite` is set.
pub fn write_default_spec(dir: &Path, overwrite: bool) -> Result<PathBuf> {
    let dest = dir.join(DEFAULT_SPEC_NAME);
    if dest.exists() && !overwrite {
        return Ok(dest);
    }

    let name = guess_command_name(dir).unwrap_or_else(|| "my-command".to_string());
    let spec = CommandSpec {
        name,
        summary: "Describe what the command does".to_string(),
        params: vec![
            ParamDescriptor {
                id: Some("verbose".to_string()),
                flags: Flags::Many(vec!["v".to_string(), "verbose".to_string()]),
                is_switch: true,
                help: Some("Print more output".to_string()),
                ..Default::default()
            },
            ParamDescriptor {
                id: Some("jobs".to_string()),
                flags: Flags::Many(vec!["j".to_string(), "jobs".to_string()]),
                default_value: Some(json!("1")),
                validator: Some(ValidatorDescriptor::Named("int".to_string())),
                help: Some("Number of parallel jobs".to_string()),
                ..Default::default()
            },
            ParamDescriptor {
                id: Some("files".to_string()),
                greedy: true,
                required: true,
                help: Some("Input files".to_string()),
                ..Default::default()
            },
        ],
    };

    let mut out = serde_json::to_string_pretty(&spec).context("failed to serialize command spec")?;
    out.push('\n');

    let tmp = dest.with_extension("tmp");
    fs::write(&tmp, out.as_bytes())
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    if overwrite && dest.exists() {
        fs::remove_file(&dest).with_context(|| format!("failed to remove {}", dest.display()))?;
    }
    fs::rename(&tmp, &dest)
        .with_context(|| format!("failed to move {} into place", dest.display()))?;
    Ok(dest)
}

fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn guess_command_name(dir: &Path) -> Option<String> {
    let direct = dir
        .file_name()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty() && *s != "." && *s != "..");
    if let Some(name) = direct {
        return Some(name.to_string());
    }

    let cwd = std::env::current_dir().ok()?;
    cwd.file_name()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .map(|s| s.to_string())
}
