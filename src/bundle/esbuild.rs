// esbuild integration - runs a build and hands its metafile to plugins

use super::plugin::BuildPlugin;
use crate::config::BuildOptions;
use crate::error::{BundleError, ManifestPluginError};
use crate::metafile::BuildMetadata;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use which::which;

/// Result of a build
#[derive(Debug, Clone)]
pub struct BuildResult {
    /// Metadata esbuild reported for the build
    pub metafile: BuildMetadata,

    /// Warnings esbuild printed to stderr
    pub warnings: String,
}

/// esbuild driver with a plugin pipeline
///
/// This wraps the esbuild CLI. Every build asks esbuild for a metafile, which
/// is parsed and passed to each plugin's `on_end` hook in registration order.
pub struct EsbuildBundler {
    /// Path to the esbuild executable
    esbuild_path: PathBuf,

    /// Registered plugins
    plugins: Vec<Box<dyn BuildPlugin>>,
}

impl EsbuildBundler {
    /// Create a new bundler by detecting esbuild
    ///
    /// # Errors
    ///
    /// Returns `BundleError::EsbuildNotFound` if esbuild is not installed
    /// or not in PATH.
    pub fn new() -> Result<Self, BundleError> {
        let esbuild_path = which("esbuild").map_err(|_| BundleError::EsbuildNotFound)?;
        Ok(Self::with_esbuild_path(esbuild_path))
    }

    /// Create a bundler with a specific esbuild path
    ///
    /// This is useful for testing or when esbuild is not in PATH.
    pub fn with_esbuild_path(esbuild_path: PathBuf) -> Self {
        Self {
            esbuild_path,
            plugins: Vec::new(),
        }
    }

    /// Register a plugin
    pub fn plugin(mut self, plugin: impl BuildPlugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Run a build
    ///
    /// Plugins' `setup` hooks run first, then esbuild, then the `on_end` hooks.
    ///
    /// # Errors
    ///
    /// Returns `BundleError::BundleFailed` if esbuild cannot be executed or exits
    /// with a non-zero code. An error from any `on_end` hook rejects the build
    /// result even though esbuild's outputs are already on disk.
    pub async fn build(
        &self,
        mut options: BuildOptions,
    ) -> Result<BuildResult, ManifestPluginError> {
        for plugin in &self.plugins {
            tracing::debug!(plugin = plugin.name(), "Running setup hook");
            plugin.setup(&mut options);
        }

        // The scratch dir lives until this function returns or is dropped
        let (metafile_path, _scratch) = match &options.metafile {
            Some(path) => (resolve(&options, path), None),
            None => {
                let dir = tempfile::Builder::new()
                    .prefix("esbuild-manifest")
                    .tempdir()?;
                (dir.path().join("metafile.json"), Some(dir))
            }
        };

        let mut cmd = Command::new(&self.esbuild_path);
        cmd.args(build_args(&options, &metafile_path));
        if let Some(cwd) = &options.abs_working_dir {
            cmd.current_dir(cwd);
        }

        tracing::info!(entries = options.entry_points.len(), "Running esbuild");
        let output = cmd
            .output()
            .await
            .map_err(|e| BundleError::BundleFailed(format!("Failed to execute esbuild: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BundleError::BundleFailed(format!("esbuild failed: {}", stderr)).into());
        }

        let metafile = BuildMetadata::from_file(&metafile_path)?;

        for plugin in &self.plugins {
            tracing::debug!(plugin = plugin.name(), "Running on-end hook");
            plugin.on_end(&options, &metafile)?;
        }

        Ok(BuildResult {
            metafile,
            warnings: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Command-line arguments for an esbuild invocation
pub fn build_args(options: &BuildOptions, metafile: &Path) -> Vec<String> {
    let mut args: Vec<String> = options
        .entry_points
        .iter()
        .map(|entry| entry.display().to_string())
        .collect();

    args.push("--bundle".to_string());

    if let Some(outdir) = &options.outdir {
        args.push(format!("--outdir={}", outdir.display()));
    }
    if let Some(outfile) = &options.outfile {
        args.push(format!("--outfile={}", outfile.display()));
    }
    if let Some(entry_names) = &options.entry_names {
        args.push(format!("--entry-names={}", entry_names));
    }

    args.push(format!("--metafile={}", metafile.display()));

    if options.minify {
        args.push("--minify".to_string());
    }
    if let Some(format) = &options.format {
        args.push(format!("--format={}", format));
    }
    if let Some(target) = &options.target {
        args.push(format!("--target={}", target));
    }
    for ext in &options.external {
        args.push(format!("--external:{}", ext));
    }

    args.extend(options.extra_args.iter().cloned());
    args
}

fn resolve(options: &BuildOptions, path: &Path) -> PathBuf {
    match &options.abs_working_dir {
        Some(cwd) if path.is_relative() => cwd.join(path),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::ManifestPlugin;
    use crate::config::ManifestOptions;
    use crate::error::ConfigurationError;

    #[test]
    fn build_args_for_outdir_build() {
        let options = BuildOptions {
            entry_points: vec![PathBuf::from("src/app.js")],
            outdir: Some(PathBuf::from("dist")),
            entry_names: Some("[dir]/[name]-[hash]".to_string()),
            minify: true,
            external: vec!["react".to_string()],
            ..Default::default()
        };

        let args = build_args(&options, Path::new("/tmp/meta.json"));
        assert_eq!(
            args,
            vec![
                "src/app.js",
                "--bundle",
                "--outdir=dist",
                "--entry-names=[dir]/[name]-[hash]",
                "--metafile=/tmp/meta.json",
                "--minify",
                "--external:react",
            ]
        );
    }

    #[test]
    fn build_args_for_outfile_build() {
        let options = BuildOptions {
            entry_points: vec![PathBuf::from("src/app.ts")],
            outfile: Some(PathBuf::from("dist/app.js")),
            format: Some("esm".to_string()),
            target: Some("es2020".to_string()),
            extra_args: vec!["--sourcemap".to_string()],
            ..Default::default()
        };

        let args = build_args(&options, Path::new("meta.json"));
        assert!(args.contains(&"--outfile=dist/app.js".to_string()));
        assert!(args.contains(&"--format=esm".to_string()));
        assert!(args.contains(&"--target=es2020".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("--sourcemap"));
        assert!(!args.iter().any(|a| a.starts_with("--entry-names")));
    }

    #[tokio::test]
    async fn esbuild_bundler_without_esbuild() {
        let bundler = EsbuildBundler::with_esbuild_path(PathBuf::from("/nonexistent/esbuild"))
            .plugin(ManifestPlugin::default());

        let options = BuildOptions {
            entry_points: vec![PathBuf::from("app.js")],
            outdir: Some(std::env::temp_dir()),
            ..Default::default()
        };

        let result = bundler.build(options).await;
        assert!(matches!(
            result,
            Err(ManifestPluginError::Bundle(BundleError::BundleFailed(_)))
        ));
    }

    /// Stand-in for esbuild: logs its arguments one per line, creates the
    /// outdir and writes a one-entry metafile
    #[cfg(unix)]
    const FAKE_ESBUILD: &str = r#"#!/bin/sh
for arg in "$@"; do
  echo "$arg" >> "@LOG@"
  case "$arg" in
    --outdir=*) mkdir -p "${arg#--outdir=}" ;;
    --metafile=*) metafile="${arg#--metafile=}" ;;
  esac
done
printf '%s' '{"outputs": {"output/example-5ZMGVNEL.js": {"entryPoint": "input/example.js", "inputs": {}}}}' > "$metafile"
exit @EXIT@
"#;

    #[cfg(unix)]
    fn fake_esbuild(dir: &Path, exit_code: i32) -> EsbuildBundler {
        use std::os::unix::fs::PermissionsExt;

        let script = FAKE_ESBUILD
            .replace("@LOG@", &dir.join("args.log").display().to_string())
            .replace("@EXIT@", &exit_code.to_string());
        let path = dir.join("esbuild");
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

        EsbuildBundler::with_esbuild_path(path)
    }

    #[cfg(unix)]
    fn logged_args(dir: &Path) -> Vec<String> {
        std::fs::read_to_string(dir.join("args.log"))
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[cfg(unix)]
    fn logged_metafile(dir: &Path) -> PathBuf {
        logged_args(dir)
            .iter()
            .find_map(|arg| arg.strip_prefix("--metafile=").map(PathBuf::from))
            .expect("esbuild should receive --metafile")
    }

    #[cfg(unix)]
    fn project_options(dir: &Path) -> BuildOptions {
        BuildOptions {
            entry_points: vec![PathBuf::from("input/example.js")],
            outdir: Some(PathBuf::from("output")),
            abs_working_dir: Some(dir.to_path_buf()),
            ..Default::default()
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn build_runs_plugin_hooks_and_writes_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let bundler = fake_esbuild(dir.path(), 0).plugin(ManifestPlugin::default());

        let result = bundler.build(project_options(dir.path())).await.unwrap();
        assert_eq!(result.metafile.outputs.len(), 1);

        let args = logged_args(dir.path());
        assert!(args.contains(&"--entry-names=[dir]/[name]-[hash]".to_string()));
        assert!(args.contains(&"--outdir=output".to_string()));

        let written = std::fs::read_to_string(dir.path().join("output/manifest.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value, serde_json::json!({"example.js": "example-5ZMGVNEL.js"}));

        assert!(!logged_metafile(dir.path()).exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failed_build_removes_temporary_metafile() {
        let dir = tempfile::tempdir().unwrap();
        let bundler = fake_esbuild(dir.path(), 1).plugin(ManifestPlugin::default());

        let result = bundler.build(project_options(dir.path())).await;
        assert!(matches!(
            result,
            Err(ManifestPluginError::Bundle(BundleError::BundleFailed(_)))
        ));

        assert!(!logged_metafile(dir.path()).exists());
        assert!(!dir.path().join("output/manifest.json").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn build_without_output_location_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let bundler = fake_esbuild(dir.path(), 0).plugin(ManifestPlugin::default());
        let options = BuildOptions {
            outdir: None,
            ..project_options(dir.path())
        };

        let result = bundler.build(options).await;
        assert!(matches!(
            result,
            Err(ManifestPluginError::Configuration(
                ConfigurationError::MissingOutputLocation
            ))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn configured_metafile_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let options = ManifestOptions {
            hash: false,
            ..Default::default()
        };
        let bundler = fake_esbuild(dir.path(), 0).plugin(ManifestPlugin::new(options));
        let build = BuildOptions {
            metafile: Some(PathBuf::from("meta.json")),
            ..project_options(dir.path())
        };

        bundler.build(build).await.unwrap();

        assert!(dir.path().join("meta.json").exists());
        assert!(!logged_args(dir.path())
            .iter()
            .any(|arg| arg.starts_with("--entry-names")));

        let written = std::fs::read_to_string(dir.path().join("output/manifest.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["example.js"], "example.js");
    }
}
