// Key and value derivation for manifest entries

use crate::config::ManifestOptions;
use crate::metafile::OutputRecord;
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// esbuild's default `[hash]`: eight base32 characters, joined to the name with
/// a hyphen by the `[dir]/[name]-[hash]` entry-names template.
static HYPHEN_HASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-[A-Z2-7]{8}((?:\.[^./]+)+)$").expect("Invalid regex"));

/// Final path component of a metafile path
///
/// Metafile paths always use `/` as the separator, whatever the host platform.
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Remove a hyphen-joined content hash from the last path component
///
/// `example-5ZMGVNEL.js` becomes `example.js`. Hashes placed by any other
/// template (e.g. `example.5ZMGVNEL.js`) are left untouched.
pub fn strip_content_hash(path: &str) -> Cow<'_, str> {
    HYPHEN_HASH.replace(path, "$1")
}

/// Manifest key for an output
///
/// Derived from the output's entry point, falling back to its first input and
/// finally to the output path itself.
pub fn input_key(output_path: &str, record: &OutputRecord, options: &ManifestOptions) -> String {
    let source = record.source_path().unwrap_or(output_path);

    if options.short_names {
        file_name(source).to_string()
    } else {
        source.to_string()
    }
}

/// Manifest value for an output
pub fn output_name(output_path: &str, options: &ManifestOptions) -> String {
    let name = if options.hash {
        Cow::Borrowed(output_path)
    } else {
        strip_content_hash(output_path)
    };

    if options.short_names {
        file_name(&name).to_string()
    } else {
        name.into_owned()
    }
}
