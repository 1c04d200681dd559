// CLI commands for manifest generation

use crate::{
    config::{BuildOptions, ConfigFile, ManifestOptions},
    manifest::write_manifest,
    metafile::BuildMetadata,
};
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Manifest plugin flags shared by every command
#[derive(Args, Debug, Default, Clone)]
pub struct ManifestArgs {
    /// Manifest file name (default: manifest.json)
    #[arg(long)]
    pub filename: Option<String>,

    /// Strip esbuild's hyphen-joined content hashes from output names
    #[arg(long)]
    pub no_hash: bool,

    /// Key entries by full input path and keep full output paths
    #[arg(long)]
    pub long_names: bool,

    /// TOML config file with [manifest] and [build] tables
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl ManifestArgs {
    /// Load the config file, if any, and apply flag overrides to it
    pub fn resolve(&self) -> Result<ConfigFile> {
        let mut config = match &self.config {
            Some(path) => ConfigFile::from_file(path)?,
            None => ConfigFile::default(),
        };
        self.apply(&mut config.manifest);
        Ok(config)
    }

    fn apply(&self, options: &mut ManifestOptions) {
        if let Some(filename) = &self.filename {
            options.filename = filename.clone();
        }
        if self.no_hash {
            options.hash = false;
        }
        if self.long_names {
            options.short_names = false;
        }
    }
}

/// Manifest subcommands
#[derive(Subcommand, Debug)]
pub enum ManifestCommands {
    /// Write a manifest from an existing esbuild metafile
    Generate {
        /// Path to the metafile written by esbuild's --metafile option
        #[arg(short, long)]
        metafile: PathBuf,

        /// Build output directory; the manifest is written here
        #[arg(long)]
        outdir: Option<PathBuf>,

        /// Build output file; the manifest is written to its directory
        #[arg(long)]
        outfile: Option<PathBuf>,

        #[command(flatten)]
        manifest: ManifestArgs,
    },

    /// Run esbuild and write a manifest for the build
    #[cfg(feature = "esbuild")]
    Build {
        /// Entry points to bundle
        #[arg(required = true)]
        entry_points: Vec<PathBuf>,

        /// Output directory
        #[arg(long)]
        outdir: Option<PathBuf>,

        /// Output file (single entry point)
        #[arg(long)]
        outfile: Option<PathBuf>,

        /// esbuild --entry-names template; overrides the default hashed names
        #[arg(long)]
        entry_names: Option<String>,

        /// Minify the output
        #[arg(long)]
        minify: bool,

        /// Output format (iife, cjs, esm)
        #[arg(long)]
        format: Option<String>,

        /// ECMAScript target version
        #[arg(long)]
        target: Option<String>,

        /// Modules to leave out of the bundle
        #[arg(long)]
        external: Vec<String>,

        #[command(flatten)]
        manifest: ManifestArgs,
    },
}

impl ManifestCommands {
    /// Execute the command
    pub async fn run(self) -> Result<()> {
        match self {
            ManifestCommands::Generate {
                metafile,
                outdir,
                outfile,
                manifest,
            } => Self::generate_cmd(metafile, outdir, outfile, manifest),
            #[cfg(feature = "esbuild")]
            ManifestCommands::Build {
                entry_points,
                outdir,
                outfile,
                entry_names,
                minify,
                format,
                target,
                external,
                manifest,
            } => {
                let config = manifest.resolve()?;
                let (outdir, outfile) = output_location(outdir, outfile, &config.build);
                let build = BuildOptions {
                    entry_points,
                    outdir,
                    outfile,
                    entry_names: entry_names.or(config.build.entry_names),
                    minify: minify || config.build.minify,
                    format: format.or(config.build.format),
                    target: target.or(config.build.target),
                    external: if external.is_empty() {
                        config.build.external
                    } else {
                        external
                    },
                    ..config.build
                };
                Self::build_cmd(build, config.manifest).await
            }
        }
    }

    fn generate_cmd(
        metafile: PathBuf,
        outdir: Option<PathBuf>,
        outfile: Option<PathBuf>,
        manifest: ManifestArgs,
    ) -> Result<()> {
        let config = manifest.resolve()?;
        let (outdir, outfile) = output_location(outdir, outfile, &config.build);
        let build = BuildOptions {
            outdir,
            outfile,
            ..config.build
        };

        let metadata = BuildMetadata::from_file(&metafile)?;
        let path = write_manifest(&metadata, &build, &config.manifest)
            .context("Failed to write manifest")?;

        println!("✓ Manifest written to {}", path.display());
        Ok(())
    }

    #[cfg(feature = "esbuild")]
    async fn build_cmd(build: BuildOptions, options: ManifestOptions) -> Result<()> {
        let manifest_path = build
            .manifest_dir()
            .map(|dir| dir.join(&options.filename))
            .ok();

        let result = crate::bundle::build_with_manifest(build, options)
            .await
            .context("Build failed")?;

        if !result.warnings.trim().is_empty() {
            eprintln!("{}", result.warnings.trim_end());
        }

        println!("✓ Built {} output(s)", result.metafile.outputs.len());
        if let Some(path) = manifest_path {
            println!("  Manifest: {}", path.display());
        }

        Ok(())
    }
}

/// Output location from flags, falling back to the config file
///
/// `outdir` and `outfile` are one setting: a flag for either replaces both
/// config values.
fn output_location(
    outdir: Option<PathBuf>,
    outfile: Option<PathBuf>,
    config: &BuildOptions,
) -> (Option<PathBuf>, Option<PathBuf>) {
    if outdir.is_some() || outfile.is_some() {
        (outdir, outfile)
    } else {
        (config.outdir.clone(), config.outfile.clone())
    }
}
