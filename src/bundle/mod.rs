// Host build integration - plugin hooks and the esbuild driver

#[cfg(feature = "esbuild")]
pub mod esbuild;
pub mod plugin;

#[cfg(feature = "esbuild")]
pub use esbuild::{BuildResult, EsbuildBundler};
pub use plugin::{BuildPlugin, ManifestPlugin, HASHED_ENTRY_NAMES};

#[cfg(feature = "esbuild")]
use crate::{
    config::{BuildOptions, ManifestOptions},
    error::ManifestPluginError,
};

/// Run an esbuild build and write its manifest
///
/// This is a convenience function that detects esbuild in PATH and registers
/// only the manifest plugin.
#[cfg(feature = "esbuild")]
pub async fn build_with_manifest(
    build: BuildOptions,
    options: ManifestOptions,
) -> Result<BuildResult, ManifestPluginError> {
    let bundler = EsbuildBundler::new()?.plugin(ManifestPlugin::new(options));
    bundler.build(build).await
}
