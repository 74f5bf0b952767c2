//! Run configuration.
//!
//! Settings come from three layers, later layers winning:
//!
//! 1. stock defaults
//! 2. `staticmd.toml` in the input root (optional)
//! 3. an explicit `--config <file>` (optional)
//!
//! Command-line flags are then applied on top as [`Overrides`], and the
//! result is resolved into a [`GeneratorConfig`]: absolute, cleaned paths
//! and plain values that stay fixed for the whole run.
//!
//! ## Config File
//!
//! ```toml
//! # All keys are optional.
//! title = "Handbook"        # defaults to the input directory name
//! output = "public"         # relative to the input root
//! template = "page.html"    # relative to the input root; built-in if absent
//! book = false              # true: one combined index.html
//! relative = false          # true: links work without a web server
//! version = "2024.1"        # overrides the git hash / timestamp
//!
//! [processing]
//! max_processes = 4         # render workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::paths::{absolute_clean, clean_path};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the config file looked up in the input root.
pub const CONFIG_FILENAME: &str = "staticmd.toml";

/// Output directory used when none is configured, relative to the input root.
pub const DEFAULT_OUTPUT_DIR: &str = "public";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Settings as written in `staticmd.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site or document title.
    pub title: Option<String>,
    /// Output directory.
    pub output: Option<PathBuf>,
    /// Template file; the built-in template is used when absent.
    pub template: Option<PathBuf>,
    /// Combine every page into one document.
    pub book: bool,
    /// Emit links relative to each page instead of root-absolute links.
    pub relative: bool,
    /// Fixed version string.
    pub version: Option<String>,
    /// Parallel rendering settings.
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Validate values that deserialize fine but make no sense.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        if self.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(ConfigError::Validation("title must not be empty".into()));
        }
        if self
            .version
            .as_deref()
            .is_some_and(|v| v.trim().is_empty())
        {
            return Err(ConfigError::Validation("version must not be empty".into()));
        }
        Ok(())
    }

    /// Apply command-line flags. Flags that were not given leave the file
    /// value alone; boolean flags can only switch a mode on.
    pub fn apply(&mut self, overrides: Overrides) {
        if overrides.title.is_some() {
            self.title = overrides.title;
        }
        if overrides.output.is_some() {
            self.output = overrides.output;
        }
        if overrides.template.is_some() {
            self.template = overrides.template;
        }
        if overrides.version.is_some() {
            self.version = overrides.version;
        }
        if overrides.jobs.is_some() {
            self.processing.max_processes = overrides.jobs;
        }
        self.book |= overrides.book;
        self.relative |= overrides.relative;
    }
}

/// Parallel rendering settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of render workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective worker count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// Command-line values layered over the config files. Paths must already be
/// absolute, since they are relative to the working directory rather than
/// the input root.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub title: Option<String>,
    pub output: Option<PathBuf>,
    pub template: Option<PathBuf>,
    pub version: Option<String>,
    pub jobs: Option<usize>,
    pub book: bool,
    pub relative: bool,
}

/// Fully resolved settings for one run. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratorConfig {
    /// Absolute, cleaned input root.
    pub input: PathBuf,
    /// Absolute, cleaned output root.
    pub output: PathBuf,
    /// Absolute template path, or `None` for the built-in template.
    pub template: Option<PathBuf>,
    pub title: String,
    pub book: bool,
    pub relative: bool,
    /// Number of render workers in multi mode, at least 1.
    pub parallelism: usize,
    /// Fixed version; `None` asks git.
    pub version: Option<String>,
}

impl GeneratorConfig {
    /// Defaults for an input root: output in `<input>/public`, built-in
    /// template, one worker per core.
    pub fn new(input: &Path) -> Result<Self, ConfigError> {
        let input = absolute_clean(input)?;
        Self::resolve(&input, &SiteConfig::default())
    }

    /// Resolve file settings against an absolute input root.
    pub fn resolve(input: &Path, site: &SiteConfig) -> Result<Self, ConfigError> {
        site.validate()?;
        let input = clean_path(input);
        let resolve_path = |p: &Path| clean_path(&input.join(p));

        let output = site
            .output
            .as_deref()
            .map(resolve_path)
            .unwrap_or_else(|| input.join(DEFAULT_OUTPUT_DIR));
        let template = site.template.as_deref().map(resolve_path);
        let title = site.title.clone().unwrap_or_else(|| {
            input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        });

        Ok(Self {
            output,
            template,
            title,
            book: site.book,
            relative: site.relative,
            parallelism: effective_threads(&site.processing),
            version: site.version.clone(),
            input,
        })
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = clean_path(&output.into());
        self
    }

    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism.max(1);
        self
    }

    pub fn with_book(mut self, book: bool) -> Self {
        self.book = book;
        self
    }

    pub fn with_relative(mut self, relative: bool) -> Self {
        self.relative = relative;
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

// =============================================================================
// Config loading and merging
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(SiteConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load the layered config for an input root.
///
/// `staticmd.toml` in the root is optional; an explicit `extra` file must
/// exist. The merged result is deserialized, rejecting unknown keys, and
/// validated.
pub fn load_config(input_root: &Path, extra: Option<&Path>) -> Result<SiteConfig, ConfigError> {
    let mut merged = stock_defaults_value()?;

    let root_file = input_root.join(CONFIG_FILENAME);
    if root_file.is_file() {
        merged = merge_toml(merged, load_raw_config(&root_file)?);
    }
    if let Some(extra) = extra {
        merged = merge_toml(merged, load_raw_config(extra)?);
    }

    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `staticmd.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# staticmd configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Place this file in the input directory as staticmd.toml, or pass it
# with --config. Command-line flags override values set here.
# Unknown keys will cause an error.

# Title passed to the template. Defaults to the input directory name.
# title = "Handbook"

# Output directory, relative to the input directory.
# output = "public"

# Template file, relative to the input directory. A built-in template is
# used when this is not set. Insert the page body with {{ content | safe }}.
# template = "page.html"

# Combine every page into a single index.html with a table of contents.
book = false

# Make links relative to each page so the output works from the filesystem.
relative = false

# Fixed version string. Defaults to the git short hash of the input
# directory, or a unix timestamp outside a git checkout.
# version = "1.0.0"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel render workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cores() -> usize {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }

    #[test]
    fn defaults_put_output_under_input() {
        let config = GeneratorConfig::resolve(Path::new("/site/docs"), &SiteConfig::default())
            .unwrap();
        assert_eq!(config.input, PathBuf::from("/site/docs"));
        assert_eq!(config.output, PathBuf::from("/site/docs/public"));
        assert_eq!(config.title, "docs");
        assert_eq!(config.template, None);
        assert!(!config.book);
        assert!(!config.relative);
        assert_eq!(config.parallelism, cores());
    }

    #[test]
    fn relative_paths_resolve_against_input_root() {
        let site = SiteConfig {
            output: Some(PathBuf::from("../out")),
            template: Some(PathBuf::from("./theme/page.html")),
            ..SiteConfig::default()
        };
        let config = GeneratorConfig::resolve(Path::new("/site/docs"), &site).unwrap();
        assert_eq!(config.output, PathBuf::from("/site/out"));
        assert_eq!(
            config.template,
            Some(PathBuf::from("/site/docs/theme/page.html"))
        );
    }

    #[test]
    fn absolute_paths_are_kept() {
        let site = SiteConfig {
            output: Some(PathBuf::from("/var/www")),
            ..SiteConfig::default()
        };
        let config = GeneratorConfig::resolve(Path::new("/site/docs"), &site).unwrap();
        assert_eq!(config.output, PathBuf::from("/var/www"));
    }

    #[test]
    fn parse_partial_config() {
        let site: SiteConfig = toml::from_str("book = true\n").unwrap();
        assert!(site.book);
        assert!(!site.relative);
        assert_eq!(site.title, None);
        assert_eq!(site.processing.max_processes, None);
    }

    #[test]
    fn unknown_keys_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("boook = true\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_nested_keys_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[processing]\nthreads = 2\n");
        assert!(result.is_err());
    }

    #[test]
    fn zero_workers_rejected() {
        let site = SiteConfig {
            processing: ProcessingConfig {
                max_processes: Some(0),
            },
            ..SiteConfig::default()
        };
        assert!(matches!(site.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn blank_title_rejected() {
        let site = SiteConfig {
            title: Some("  ".to_string()),
            ..SiteConfig::default()
        };
        assert!(matches!(site.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn effective_threads_clamps_to_cores() {
        let unbounded = ProcessingConfig {
            max_processes: Some(100_000),
        };
        assert_eq!(effective_threads(&unbounded), cores());

        let one = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&one), 1);

        assert_eq!(effective_threads(&ProcessingConfig::default()), cores());
    }

    #[test]
    fn merge_overlay_wins_and_base_survives() {
        let base: toml::Value = toml::from_str("book = false\ntitle = \"a\"\n").unwrap();
        let overlay: toml::Value = toml::from_str("book = true\n").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("book").and_then(|v| v.as_bool()), Some(true));
        assert_eq!(merged.get("title").and_then(|v| v.as_str()), Some("a"));
    }

    #[test]
    fn merge_nested_tables() {
        let base: toml::Value = toml::from_str("[processing]\nmax_processes = 2\n").unwrap();
        let overlay: toml::Value = toml::from_str("relative = true\n").unwrap();
        let merged = merge_toml(base, overlay);
        let site: SiteConfig = merged.try_into().unwrap();
        assert!(site.relative);
        assert_eq!(site.processing.max_processes, Some(2));
    }

    #[test]
    fn load_config_without_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let site = load_config(tmp.path(), None).unwrap();
        assert_eq!(site, SiteConfig::default());
    }

    #[test]
    fn load_config_layers_root_file_then_extra() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            "title = \"Root\"\nbook = true\n",
        )
        .unwrap();
        let extra = tmp.path().join("ci.toml");
        fs::write(&extra, "title = \"CI\"\n[processing]\nmax_processes = 1\n").unwrap();

        let site = load_config(tmp.path(), Some(&extra)).unwrap();
        assert_eq!(site.title.as_deref(), Some("CI"));
        assert!(site.book);
        assert_eq!(site.processing.max_processes, Some(1));
    }

    #[test]
    fn load_config_rejects_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "book = \n").unwrap();
        assert!(matches!(
            load_config(tmp.path(), None),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn load_config_requires_explicit_file() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("missing.toml");
        assert!(matches!(
            load_config(tmp.path(), Some(&missing)),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut site = SiteConfig {
            title: Some("File".to_string()),
            relative: true,
            ..SiteConfig::default()
        };
        site.apply(Overrides {
            title: Some("Flag".to_string()),
            jobs: Some(3),
            book: true,
            ..Overrides::default()
        });
        assert_eq!(site.title.as_deref(), Some("Flag"));
        assert_eq!(site.processing.max_processes, Some(3));
        assert!(site.book);
        assert!(site.relative);
    }

    #[test]
    fn stock_config_is_valid() {
        let content = stock_config_toml();
        let site: SiteConfig = toml::from_str(content).expect("stock config must parse");
        assert_eq!(site, SiteConfig::default());
    }
}
