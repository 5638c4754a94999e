//! Configuration loader
//!
//! Loads a [`TorkConfig`] from environment variables or a file.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `TORK_POLICY_VERSION` is missing or a value is invalid, falls back to
//!    a file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `TORK_POLICY_VERSION`: Policy version stamped on receipts (required)
//! - `TORK_DEFAULT_ACTION`: `allow`, `redact`, `hash` or `block`
//! - `TORK_REGIONS`: Comma-separated regions, e.g. `us,uk`
//! - `TORK_HASH_SALT`: Organisation salt for the `hash` action
//! - `TORK_MAX_INPUT_BYTES`: Largest text a single call accepts
//! - `TORK_MAX_MATCHES_PER_PATTERN`: Candidate budget per pattern
//!
//! Custom patterns and per-pattern or per-category actions are file-only.
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./tork.toml`, `./tork.json`, `./config/tork.toml`, `./config/tork.json`
//! 2. The same names in the parent and grandparent directories
//! 3. The same names relative to the executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use tork_common::error::CommonError;
use tork_common::privacy::{HashConfig, Region};
use tracing::instrument;

use super::TorkConfig;
use crate::errors::{TorkError, TorkResult};
use crate::governance::GovernanceAction;

const CONFIG_FILE_NAMES: [&str; 4] =
    ["tork.toml", "tork.json", "config/tork.toml", "config/tork.json"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the required
/// variable is missing or a value is invalid, falls back to loading from a
/// config file.
///
/// # Errors
/// Returns `TorkError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - The loaded configuration fails validation
#[instrument]
pub fn load() -> TorkResult<TorkConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// `TORK_POLICY_VERSION` must be set; every other variable is optional and
/// falls back to the [`TorkConfig`] default.
///
/// # Errors
/// Returns `TorkError::Config` if the required variable is missing or any
/// value is invalid.
pub fn load_from_env() -> TorkResult<TorkConfig> {
    let mut config =
        TorkConfig { policy_version: env_var("TORK_POLICY_VERSION")?, ..Default::default() };

    if let Some(action) = env_opt("TORK_DEFAULT_ACTION") {
        config.default_action = GovernanceAction::from_str(&action)?;
    }

    if let Some(regions) = env_opt("TORK_REGIONS") {
        config.regions = regions
            .split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(|r| {
                Region::from_str(r)
                    .map_err(|_| TorkError::config(format!("Invalid region in TORK_REGIONS: {}", r)))
            })
            .collect::<TorkResult<Vec<_>>>()?;
    }

    if let Some(salt) = env_opt("TORK_HASH_SALT") {
        config.hashing = HashConfig::with_salt(salt)?;
    }

    if let Some(max) = env_opt("TORK_MAX_INPUT_BYTES") {
        config.limits.max_input_bytes = max
            .parse::<usize>()
            .map_err(|e| TorkError::config(format!("Invalid max input bytes: {}", e)))?;
    }

    if let Some(max) = env_opt("TORK_MAX_MATCHES_PER_PATTERN") {
        config.limits.max_matches_per_pattern = max
            .parse::<usize>()
            .map_err(|e| TorkError::config(format!("Invalid max matches per pattern: {}", e)))?;
    }

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `TorkError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - The parsed configuration fails validation
#[instrument(skip(path))]
pub fn load_from_file(path: Option<PathBuf>) -> TorkResult<TorkConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(TorkError::config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            TorkError::config("No config file found in any of the standard locations")
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path).map_err(|e| {
        file_error(CommonError::io_path(config_path.display().to_string(), e.to_string()))
    })?;

    let config = parse_config(&contents, &config_path)?;
    if let Err(e) = config.validate() {
        tracing::warn!(path = %config_path.display(), error = %e, "Rejected configuration file");
        return Err(e);
    }
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `TorkError::Config` if format is invalid or parsing fails.
fn parse_config(contents: &str, path: &Path) -> TorkResult<TorkConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents).map_err(|e| file_error(CommonError::from(e))),
        "json" => serde_json::from_str(contents).map_err(|e| file_error(CommonError::from(e))),
        _ => Err(TorkError::config(format!("Unsupported config format: {}", extension))),
    }
}

/// Logs a file failure with its structured fields and surfaces it as a
/// configuration error.
fn file_error(err: CommonError) -> TorkError {
    tracing::warn!(fields = ?err.as_tracing_fields(), "Config file unusable");
    TorkError::config(err.to_string())
}

/// Probe multiple paths for configuration files
///
/// Searches the working directory, its parent and grandparent, then the
/// directory of the running executable.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
///
/// # Errors
/// Returns `TorkError::Config` if the variable is not set.
fn env_var(key: &str) -> TorkResult<String> {
    std::env::var(key)
        .map_err(|_| TorkError::config(format!("Missing required environment variable: {}", key)))
}

/// Optional environment variable; blank counts as unset.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ENV_KEYS: [&str; 6] = [
        "TORK_POLICY_VERSION",
        "TORK_DEFAULT_ACTION",
        "TORK_REGIONS",
        "TORK_HASH_SALT",
        "TORK_MAX_INPUT_BYTES",
        "TORK_MAX_MATCHES_PER_PATTERN",
    ];

    fn clear_env() {
        for key in ENV_KEYS {
            std::env::remove_var(key);
        }
    }

    fn temp_config(contents: &str, extension: &str) -> (NamedTempFile, PathBuf) {
        let file = tempfile::Builder::new().suffix(&format!(".{}", extension)).tempfile().unwrap();
        file.as_file().write_all(contents.as_bytes()).unwrap();
        let path = file.path().to_path_buf();
        (file, path)
    }

    // ========================================================================
    // Environment
    // ========================================================================

    /// Validates `load_from_env` behavior for the all variables set scenario.
    ///
    /// Assertions:
    /// - Confirms every variable lands in the config.
    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("TORK_POLICY_VERSION", "2024.10-hipaa");
        std::env::set_var("TORK_DEFAULT_ACTION", "Hash");
        std::env::set_var("TORK_REGIONS", "us, uk");
        std::env::set_var("TORK_HASH_SALT", "tenant-salt");
        std::env::set_var("TORK_MAX_INPUT_BYTES", "4096");
        std::env::set_var("TORK_MAX_MATCHES_PER_PATTERN", "50");

        let result = load_from_env();
        clear_env();

        let config = result.expect("config should load from env");
        assert_eq!(config.policy_version, "2024.10-hipaa");
        assert_eq!(config.default_action, GovernanceAction::Hash);
        assert_eq!(config.regions, vec![Region::Us, Region::Uk]);
        assert_eq!(config.hashing.org_salt, "tenant-salt");
        assert_eq!(config.limits.max_input_bytes, 4096);
        assert_eq!(config.limits.max_matches_per_pattern, 50);
    }

    /// Validates `load_from_env` behavior for the missing policy version
    /// scenario.
    ///
    /// Assertions:
    /// - Ensures the call fails with `TorkError::Config`.
    #[test]
    fn test_load_from_env_missing_var() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let result = load_from_env();
        assert!(matches!(result, Err(TorkError::Config(ref msg)) if msg.contains("TORK_POLICY_VERSION")));
    }

    /// Validates `load_from_env` behavior for the invalid values scenario.
    ///
    /// Assertions:
    /// - Ensures a bad number, action or region fails with
    ///   `TorkError::Config`.
    #[test]
    fn test_load_from_env_invalid_values() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("TORK_POLICY_VERSION", "1.0.0");

        for (key, value) in [
            ("TORK_MAX_INPUT_BYTES", "lots"),
            ("TORK_DEFAULT_ACTION", "shred"),
            ("TORK_REGIONS", "us,mars"),
            ("TORK_MAX_MATCHES_PER_PATTERN", "0"),
        ] {
            std::env::set_var(key, value);
            assert!(matches!(load_from_env(), Err(TorkError::Config(_))), "{}={}", key, value);
            std::env::remove_var(key);
        }

        clear_env();
    }

    // ========================================================================
    // Files
    // ========================================================================

    /// Validates `load_from_file` behavior for the TOML scenario.
    ///
    /// Assertions:
    /// - Confirms custom patterns, actions and regions parse from TOML.
    #[test]
    fn test_load_from_file_toml() {
        let toml_content = r#"
policy_version = "3.2.1"
default_action = "redact"
regions = ["us"]

[custom_patterns]
employee_id = 'EMP-\d{6}'
badge = { pattern = 'BDG-\d{4}', redaction = "[BADGE_REDACTED]" }

[pattern_actions]
email = "hash"

[category_actions]
healthcare = "block"

[hashing]
org_salt = "file-salt"
"#;
        let (_file, path) = temp_config(toml_content, "toml");

        let config = load_from_file(Some(path)).expect("TOML config should load");
        assert_eq!(config.policy_version, "3.2.1");
        assert_eq!(config.regions, vec![Region::Us]);
        assert_eq!(config.custom_patterns.len(), 2);
        assert_eq!(config.pattern_actions["email"], GovernanceAction::Hash);
        assert_eq!(config.category_actions["healthcare"], GovernanceAction::Block);
        assert_eq!(config.hashing.org_salt, "file-salt");
        assert!(config.build_registry().is_ok());
    }

    /// Validates `load_from_file` behavior for the JSON scenario.
    ///
    /// Assertions:
    /// - Confirms a JSON file loads with defaults for omitted fields.
    #[test]
    fn test_load_from_file_json() {
        let json_content = r#"{
            "policy_version": "json-1",
            "custom_patterns": { "employee_id": "EMP-\\d{6}" },
            "limits": { "max_input_bytes": 1024 }
        }"#;
        let (_file, path) = temp_config(json_content, "json");

        let config = load_from_file(Some(path)).expect("JSON config should load");
        assert_eq!(config.policy_version, "json-1");
        assert_eq!(config.default_action, GovernanceAction::Redact);
        assert_eq!(config.limits.max_input_bytes, 1024);
        assert_eq!(config.limits.max_matches_per_pattern, 10_000);
    }

    /// Validates `load_from_file` behavior for the rejected file scenarios.
    ///
    /// Assertions:
    /// - Ensures a missing file, invalid JSON and an empty policy version all
    ///   fail with `TorkError::Config`.
    #[test]
    fn test_load_from_file_rejections() {
        let missing = load_from_file(Some(PathBuf::from("/nonexistent/tork.json")));
        assert!(matches!(missing, Err(TorkError::Config(_))));

        let (_bad, bad_path) = temp_config(r#"{ "policy_version": "#, "json");
        assert!(matches!(load_from_file(Some(bad_path)), Err(TorkError::Config(_))));

        let (_empty, empty_path) = temp_config(r#"policy_version = """#, "toml");
        assert!(matches!(load_from_file(Some(empty_path)), Err(TorkError::Config(_))));
    }

    /// Validates `load_from_file` behavior for the file error detail scenario.
    ///
    /// Assertions:
    /// - Confirms a parse failure names its format.
    /// - Confirms a read failure names the offending path.
    #[test]
    fn test_load_from_file_error_detail() {
        let (_bad, bad_path) = temp_config("policy_version = ", "toml");
        let result = load_from_file(Some(bad_path));
        assert!(
            matches!(result, Err(TorkError::Config(ref msg)) if msg.starts_with("Serialization error (TOML)"))
        );

        let dir = tempfile::tempdir().unwrap();
        let unreadable = dir.path().join("tork.toml");
        std::fs::create_dir(&unreadable).unwrap();
        let result = load_from_file(Some(unreadable.clone()));
        let expected = format!("I/O error at '{}'", unreadable.display());
        assert!(matches!(result, Err(TorkError::Config(ref msg)) if msg.starts_with(&expected)));
    }

    /// Validates `parse_config` behavior for the unsupported format scenario.
    ///
    /// Assertions:
    /// - Ensures a YAML extension is rejected.
    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("policy_version: x", Path::new("tork.yaml"));
        assert!(matches!(result, Err(TorkError::Config(ref msg)) if msg.contains("yaml")));
    }

    /// Validates `load` behavior for the environment first scenario.
    ///
    /// Assertions:
    /// - Confirms environment variables win when complete.
    #[test]
    fn test_load_prefers_env() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("TORK_POLICY_VERSION", "from-env");

        let result = load();
        clear_env();

        assert_eq!(result.expect("env config").policy_version, "from-env");
    }
}
