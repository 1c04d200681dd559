// esbuild metafile parsing

use crate::error::MetafileError;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

/// Parsed esbuild metafile
///
/// Only the fields the manifest needs are typed; anything else esbuild emits is
/// ignored. `outputs` keeps the order of the JSON document, which is the order
/// manifest entries are written in.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildMetadata {
    /// Source files that took part in the build
    #[serde(default)]
    pub inputs: IndexMap<String, InputRecord>,

    /// Emitted files, keyed by output path
    #[serde(default)]
    pub outputs: IndexMap<String, OutputRecord>,
}

/// A source file in the metafile's `inputs` table
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InputRecord {
    #[serde(default)]
    pub bytes: u64,
}

/// An emitted file in the metafile's `outputs` table
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputRecord {
    /// Entry point that produced this output; absent for chunks, source maps and assets
    #[serde(default)]
    pub entry_point: Option<String>,

    /// Source files that contributed to this output
    #[serde(default)]
    pub inputs: IndexMap<String, OutputInput>,

    /// Output size in bytes
    #[serde(default)]
    pub bytes: u64,

    /// Named exports of an ESM output
    #[serde(default)]
    pub exports: Vec<String>,
}

/// Contribution of one source file to an output
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputInput {
    #[serde(default)]
    pub bytes_in_output: u64,
}

impl BuildMetadata {
    /// Parse a metafile from a file path
    pub fn from_file(path: &Path) -> Result<Self, MetafileError> {
        let content = std::fs::read_to_string(path).map_err(|e| MetafileError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| MetafileError::Json {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Parse a metafile from a string
    pub fn from_str(content: &str) -> Result<Self, MetafileError> {
        serde_json::from_str(content).map_err(|e| MetafileError::Json {
            path: "<string>".into(),
            error: e.to_string(),
        })
    }
}

impl OutputRecord {
    /// Best available originating source path for this output
    ///
    /// The entry point when there is one, otherwise the first contributing input.
    pub fn source_path(&self) -> Option<&str> {
        self.entry_point
            .as_deref()
            .or_else(|| self.inputs.keys().next().map(String::as_str))
    }
}
