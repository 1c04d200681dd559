//! Generate an entry-name to output-file manifest from an esbuild build.
//!
//! esbuild can describe a finished build in a metafile. This crate reads that
//! metafile and writes a flat JSON object next to the build outputs, mapping
//! each entry point to the (possibly content-hashed) file esbuild emitted for it:
//!
//! ```json
//! { "example.js": "example-5ZMGVNEL.js" }
//! ```
//!
//! Use [`manifest::write_manifest`] on a metafile you already have, or run a
//! build through [`bundle::EsbuildBundler`] with a [`bundle::ManifestPlugin`].

pub mod bundle;
pub mod cli;
pub mod config;
pub mod error;
pub mod manifest;
pub mod metafile;

pub use config::{BuildOptions, ConfigFile, ManifestOptions};
pub use error::{BundleError, ConfigurationError, ManifestPluginError, MetafileError};
pub use manifest::{write_manifest, Manifest, ManifestBuilder};
pub use metafile::{BuildMetadata, OutputRecord};
