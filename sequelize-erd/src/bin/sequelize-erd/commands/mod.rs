pub mod generate;
pub mod init;
pub mod inspect;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use sequelize_erd::{ScanConfig, SchemaCollector, SchemaReport, SourceFile, discover_sources};

use crate::context::ProjectContext;
use crate::output::OutputManager;

/// Source selection flags shared by `generate` and `inspect`.
#[derive(Args, Debug, Clone, Default)]
pub struct ScanArgs {
    /// Directory holding the model files (default from config: src/models)
    #[arg(long, value_name = "DIR")]
    pub models_dir: Option<PathBuf>,

    /// Only scan these file names (repeatable)
    #[arg(long, value_name = "NAME")]
    pub only: Vec<String>,

    /// Descend into subdirectories
    #[arg(long, conflicts_with = "no_recursive")]
    pub recursive: bool,

    /// Stay in the models directory even if the config says recursive
    #[arg(long)]
    pub no_recursive: bool,
}

impl ScanArgs {
    /// Config values with command-line flags applied on top.
    pub fn apply(&self, base: &ScanConfig) -> ScanConfig {
        let mut config = base.clone();
        if !self.only.is_empty() {
            config.only = self.only.clone();
        }
        if self.recursive {
            config.recursive = true;
        } else if self.no_recursive {
            config.recursive = false;
        }
        config
    }
}

/// Result of scanning a models directory.
pub struct ScanOutcome {
    pub models_dir: PathBuf,
    pub sources: Vec<SourceFile>,
    pub report: SchemaReport,
}

/// Discover sources under the models directory and run extraction on each.
pub fn scan_project(ctx: &ProjectContext, args: &ScanArgs, output: &OutputManager) -> Result<ScanOutcome> {
    let models_dir = ctx.models_dir(args.models_dir.as_deref());
    let config = args.apply(&ctx.config.scan);
    let sources = discover_sources(&models_dir, &config)
        .with_context(|| format!("Failed to scan {}", models_dir.display()))?;

    output.verbose(&format!("Scanning {} files in {}", sources.len(), display_path(ctx, &models_dir)));
    let report = collect(&sources);

    Ok(ScanOutcome {
        models_dir,
        sources,
        report,
    })
}

fn collect(sources: &[SourceFile]) -> SchemaReport {
    let mut collector = SchemaCollector::new();
    for source in sources {
        collector.ingest(&source.relative_path, &source.text);
    }
    collector.finish()
}

/// Path relative to the project root when possible.
pub fn display_path(ctx: &ProjectContext, path: &Path) -> String {
    path.strip_prefix(&ctx.project_root)
        .unwrap_or(path)
        .display()
        .to_string()
}
