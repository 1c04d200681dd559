// Configuration types for the manifest plugin and the host build

use crate::error::ConfigurationError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default manifest file name
pub const DEFAULT_MANIFEST_FILENAME: &str = "manifest.json";

/// Plugin options, supplied once when the plugin is constructed
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ManifestOptions {
    /// Keep bundler-generated content hashes in output names
    pub hash: bool,

    /// Key the manifest by bare file name instead of the full input path
    #[serde(alias = "short_names")]
    pub short_names: bool,

    /// Name of the manifest file written next to the build outputs
    pub filename: String,
}

impl Default for ManifestOptions {
    fn default() -> Self {
        Self {
            hash: true,
            short_names: true,
            filename: DEFAULT_MANIFEST_FILENAME.to_string(),
        }
    }
}

/// The subset of esbuild's build options this crate reads or sets
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuildOptions {
    /// Entry points passed to esbuild
    #[serde(alias = "entry_points")]
    pub entry_points: Vec<PathBuf>,

    /// Output directory for multi-file builds
    pub outdir: Option<PathBuf>,

    /// Output file for single-entry builds
    pub outfile: Option<PathBuf>,

    /// Directory that relative paths in the build (and its metafile) are resolved against
    #[serde(alias = "abs_working_dir")]
    pub abs_working_dir: Option<PathBuf>,

    /// esbuild `--entry-names` template, e.g. `[dir]/[name]-[hash]`
    #[serde(alias = "entry_names")]
    pub entry_names: Option<String>,

    /// Where esbuild writes its metafile
    pub metafile: Option<PathBuf>,

    /// Whether to minify the output
    pub minify: bool,

    /// Output format (iife, cjs, esm)
    pub format: Option<String>,

    /// ECMAScript target version
    pub target: Option<String>,

    /// External modules to exclude from bundling
    pub external: Vec<String>,

    /// Additional esbuild arguments
    #[serde(alias = "extra_args")]
    pub extra_args: Vec<String>,
}

impl BuildOptions {
    /// Directory the manifest is written to
    ///
    /// This is `outdir` when set, otherwise the directory containing `outfile`.
    /// Relative results are resolved against `abs_working_dir` when one is set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::MissingOutputLocation` if neither `outdir`
    /// nor `outfile` is configured.
    pub fn manifest_dir(&self) -> Result<PathBuf, ConfigurationError> {
        let dir = match (&self.outdir, &self.outfile) {
            (Some(outdir), _) => outdir.clone(),
            (None, Some(outfile)) => match outfile.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            },
            (None, None) => return Err(ConfigurationError::MissingOutputLocation),
        };

        match &self.abs_working_dir {
            Some(cwd) if dir.is_relative() => Ok(cwd.join(dir)),
            _ => Ok(dir),
        }
    }
}

/// Parsed TOML config file
///
/// ```toml
/// [manifest]
/// hash = false
/// short_names = true
/// filename = "assets.json"
///
/// [build]
/// outdir = "public/assets"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub manifest: ManifestOptions,
    #[serde(default)]
    pub build: BuildOptions,
}

impl ConfigFile {
    /// Parse a config file from a path
    pub fn from_file(path: &Path) -> Result<Self, ConfigurationError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigurationError::InvalidConfig {
                path: path.to_path_buf(),
                error: e.to_string(),
            })?;

        toml::from_str(&content).map_err(|e| ConfigurationError::InvalidConfig {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Parse a config file from a string
    pub fn from_str(content: &str) -> Result<Self, ConfigurationError> {
        toml::from_str(content).map_err(|e| ConfigurationError::InvalidConfig {
            path: "<string>".into(),
            error: e.to_string(),
        })
    }
}
