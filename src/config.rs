use crate::error::{Result, StatsError};
use console::Term;
use std::collections::HashMap;
use std::path::Path;

pub const TOKEN_KEY: &str = "GITHUB_TOKEN";

/// Read `KEY=VALUE` pairs from an env file. Lines that do not parse are
/// skipped; a missing file is an error.
pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    let iter = dotenvy::from_path_iter(path).map_err(|e| {
        StatsError::Config(format!("cannot read env file {}: {e}", path.display()))
    })?;

    let mut vars = HashMap::new();
    for item in iter {
        match item {
            Ok((key, value)) => {
                vars.insert(key.trim().to_string(), value.trim().to_string());
            }
            Err(e) => tracing::debug!(file = %path.display(), error = %e, "Skipping env line"),
        }
    }
    Ok(vars)
}

/// The explicit token wins; otherwise `GITHUB_TOKEN` from the env file.
pub fn resolve_token(explicit: Option<&str>, env_file: &Path) -> Result<String> {
    if let Some(token) = explicit.map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(token.to_string());
    }
    let vars = read_env_file(env_file)?;
    vars.get(TOKEN_KEY)
        .filter(|t| !t.is_empty())
        .cloned()
        .ok_or_else(|| {
            StatsError::Config(format!("{TOKEN_KEY} not set in {}", env_file.display()))
        })
}

/// Use `value` if given, otherwise ask on the terminal.
pub fn value_or_prompt(value: Option<String>, prompt: &str, term: &Term) -> Result<String> {
    let answer = match value {
        Some(v) => v,
        None => {
            term.write_str(&format!("{prompt}: "))?;
            term.read_line()?
        }
    };
    let answer = answer.trim().to_string();
    if answer.is_empty() {
        return Err(StatsError::Config(format!("{prompt} must not be empty")));
    }
    Ok(answer)
}

/// Flatten repeated and comma-separated list arguments.
pub fn split_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}
