// Build plugin hooks and the manifest plugin

use crate::config::{BuildOptions, ManifestOptions};
use crate::error::ManifestPluginError;
use crate::manifest::ManifestBuilder;
use crate::metafile::BuildMetadata;

/// Entry-names template that puts a hyphen-joined content hash on every entry output
pub const HASHED_ENTRY_NAMES: &str = "[dir]/[name]-[hash]";

/// Hooks a plugin exposes to the build driver
///
/// `setup` runs once before esbuild is invoked and may adjust the build
/// options. `on_end` runs once after esbuild has written its outputs.
pub trait BuildPlugin: Send + Sync {
    /// Plugin name
    fn name(&self) -> &str;

    /// Adjust build options before the build starts
    fn setup(&self, _build: &mut BuildOptions) {}

    /// Process the finished build
    fn on_end(
        &self,
        build: &BuildOptions,
        metadata: &BuildMetadata,
    ) -> Result<(), ManifestPluginError>;
}

/// Writes a manifest next to the build outputs once the build finishes
#[derive(Debug, Clone, Default)]
pub struct ManifestPlugin {
    builder: ManifestBuilder,
}

impl ManifestPlugin {
    pub const NAME: &'static str = "manifest";

    pub fn new(options: ManifestOptions) -> Self {
        Self {
            builder: ManifestBuilder::new(options),
        }
    }

    pub fn options(&self) -> &ManifestOptions {
        self.builder.options()
    }
}

impl BuildPlugin for ManifestPlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    /// Request hashed entry names unless the caller chose their own template
    fn setup(&self, build: &mut BuildOptions) {
        if self.options().hash && build.entry_names.is_none() && build.outfile.is_none() {
            tracing::debug!(entry_names = HASHED_ENTRY_NAMES, "Enabling hashed entry names");
            build.entry_names = Some(HASHED_ENTRY_NAMES.to_string());
        }
    }

    fn on_end(
        &self,
        build: &BuildOptions,
        metadata: &BuildMetadata,
    ) -> Result<(), ManifestPluginError> {
        self.builder.write(metadata, build)?;
        Ok(())
    }
}
