// Manifest generation from esbuild build metadata

pub mod naming;

use crate::config::{BuildOptions, ManifestOptions};
use crate::error::ManifestPluginError;
use crate::metafile::BuildMetadata;
use indexmap::IndexMap;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Flat mapping from input key to output name, in metafile output order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: IndexMap<String, String>,
}

impl Manifest {
    /// Create an empty manifest
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, returning the output name it replaced
    ///
    /// A replaced key keeps its original position.
    pub fn insert(&mut self, key: String, value: String) -> Option<String> {
        self.entries.insert(key, value)
    }

    /// Look up the output name for an input key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(input key, output name)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Render the manifest as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the manifest to `path` in one write, replacing any existing file
    pub fn write_to(&self, path: &Path) -> Result<(), ManifestPluginError> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Builds a [`Manifest`] from build metadata according to [`ManifestOptions`]
#[derive(Debug, Clone, Default)]
pub struct ManifestBuilder {
    options: ManifestOptions,
}

impl ManifestBuilder {
    pub fn new(options: ManifestOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ManifestOptions {
        &self.options
    }

    /// Derive the manifest for a build
    ///
    /// Outputs sharing the manifest file's extension are skipped so the
    /// manifest never lists itself. When two outputs derive the same key the
    /// later one wins.
    pub fn build(&self, metadata: &BuildMetadata) -> Manifest {
        let manifest_ext = Path::new(&self.options.filename).extension();
        let mut manifest = Manifest::new();

        for (output_path, record) in &metadata.outputs {
            if manifest_ext.is_some() && Path::new(output_path).extension() == manifest_ext {
                tracing::debug!(output = %output_path, "Skipping output with manifest extension");
                continue;
            }

            let key = naming::input_key(output_path, record, &self.options);
            let value = naming::output_name(output_path, &self.options);
            tracing::debug!(key = %key, value = %value, "Manifest entry");

            if let Some(previous) = manifest.insert(key.clone(), value) {
                tracing::warn!(
                    key = %key,
                    replaced = %previous,
                    "Conflicting manifest key; keeping the later output"
                );
            }
        }

        manifest
    }

    /// Build the manifest and write it into the build's output location
    ///
    /// # Returns
    ///
    /// The path of the written manifest file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::MissingOutputLocation` if the build has
    /// neither `outdir` nor `outfile`. Write failures propagate as I/O errors.
    pub fn write(
        &self,
        metadata: &BuildMetadata,
        build: &BuildOptions,
    ) -> Result<PathBuf, ManifestPluginError> {
        let dir = build.manifest_dir()?;
        let manifest = self.build(metadata);
        let path = dir.join(&self.options.filename);

        manifest.write_to(&path)?;
        tracing::info!(
            path = %path.display(),
            entries = manifest.len(),
            "Wrote manifest"
        );

        Ok(path)
    }
}

/// Build and write a manifest for a completed build
///
/// This is a convenience function equivalent to
/// `ManifestBuilder::new(options.clone()).write(metadata, build)`.
pub fn write_manifest(
    metadata: &BuildMetadata,
    build: &BuildOptions,
    options: &ManifestOptions,
) -> Result<PathBuf, ManifestPluginError> {
    ManifestBuilder::new(options.clone()).write(metadata, build)
}
