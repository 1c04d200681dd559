// Error types for manifest generation

use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for manifest operations
///
/// This is the primary error type returned by the manifest plugin.
/// Individual error types are exposed through `From` conversions.
#[derive(Debug, Error)]
pub enum ManifestPluginError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Metafile error: {0}")]
    Metafile(#[from] MetafileError),

    #[error("Bundling failed: {0}")]
    Bundle(#[from] BundleError),

    #[error("Failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors in the host build configuration or plugin options
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("No outdir or outfile configured; cannot determine where to write the manifest")]
    MissingOutputLocation,

    #[error("Invalid config in {path}: {error}")]
    InvalidConfig { path: PathBuf, error: String },
}

/// Errors while reading an esbuild metafile
#[derive(Debug, Error)]
pub enum MetafileError {
    #[error("I/O error reading {path}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("JSON parsing error in {path}: {error}")]
    Json { path: PathBuf, error: String },
}

/// Errors while driving the esbuild executable
#[derive(Debug, Error)]
pub enum BundleError {
    #[error(
        "esbuild not found. Install it with: npm install -g esbuild\n\
         esbuild is required for the build command."
    )]
    EsbuildNotFound,

    #[error("Bundle failed: {0}")]
    BundleFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        assert_eq!(
            ConfigurationError::MissingOutputLocation.to_string(),
            "No outdir or outfile configured; cannot determine where to write the manifest"
        );

        assert_eq!(
            MetafileError::Json {
                path: PathBuf::from("meta.json"),
                error: "expected value".to_string(),
            }
            .to_string(),
            "JSON parsing error in meta.json: expected value"
        );

        assert!(BundleError::EsbuildNotFound
            .to_string()
            .contains("npm install -g esbuild"));
    }

    #[test]
    fn from_conversions_work() {
        let config_err: ManifestPluginError = ConfigurationError::MissingOutputLocation.into();
        assert!(matches!(
            config_err,
            ManifestPluginError::Configuration(ConfigurationError::MissingOutputLocation)
        ));

        let bundle_err: ManifestPluginError = BundleError::EsbuildNotFound.into();
        assert!(matches!(bundle_err, ManifestPluginError::Bundle(_)));

        let io_err: ManifestPluginError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert!(matches!(io_err, ManifestPluginError::Io(_)));
    }

    #[test]
    fn configuration_error_is_prefixed() {
        let err: ManifestPluginError = ConfigurationError::MissingOutputLocation.into();
        assert!(err.to_string().starts_with("Configuration error: "));
    }
}
