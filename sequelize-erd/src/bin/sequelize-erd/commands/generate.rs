use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{Cell, Table};
use serde::Serialize;

use crate::commands::{ScanArgs, ScanOutcome, display_path, scan_project};
use crate::context::ProjectContext;
use crate::examples::ExampleGroup;
use crate::output::{GlobalOptions, OutputManager, TableDisplay, themed_table};
use crate::theme::ICONS;

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Render Diagram",
        commands: &[
            "sequelize-erd generate                          # Scan src/models, write mermaid-diagram.mmd",
            "sequelize-erd generate --models-dir db/models   # Scan a different directory",
            "sequelize-erd generate --out docs/erd.mmd       # Write the diagram elsewhere",
            "sequelize-erd generate --stdout > erd.mmd       # Print the diagram instead of writing it",
        ],
    },
    ExampleGroup {
        title: "Select Files",
        commands: &[
            "sequelize-erd generate --only user.ts --only post.ts   # Restrict to named files",
            "sequelize-erd generate --recursive                     # Include subdirectories",
            "sequelize-erd generate --no-recursive                  # Ignore recursive = true in the config",
            "sequelize-erd -v generate                              # List every scanned file",
        ],
    },
];

#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub scan: ScanArgs,

    /// Diagram file to write (default from config: mermaid-diagram.mmd)
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Print the diagram to stdout instead of writing a file
    #[arg(long, conflicts_with = "out")]
    pub stdout: bool,
}

/// What a `generate` run produced.
#[derive(Debug, Serialize)]
pub struct GenerateSummary {
    pub files_scanned: usize,
    pub models: usize,
    pub associations: usize,
    pub edges: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file: Option<PathBuf>,
}

impl TableDisplay for GenerateSummary {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = themed_table(options, &["Files", "Models", "Associations", "Edges", "Output"]);
        table.add_row(vec![
            Cell::new(self.files_scanned),
            Cell::new(self.models),
            Cell::new(self.associations),
            Cell::new(self.edges),
            Cell::new(self.output_display()),
        ]);
        table
    }

    fn to_compact(&self) -> String {
        format!(
            "files={} models={} associations={} edges={} output={}",
            self.files_scanned,
            self.models,
            self.associations,
            self.edges,
            self.output_display()
        )
    }
}

impl GenerateSummary {
    fn output_display(&self) -> String {
        self.output_file
            .as_deref()
            .map_or_else(|| "stdout".to_string(), |path| path.display().to_string())
    }
}

pub fn handle_generate(args: GenerateArgs, output: &OutputManager) -> Result<()> {
    let ctx = ProjectContext::find()?;

    if args.stdout {
        // Status lines would end up inside the diagram.
        let silent = output.silenced();
        let outcome = scan_project(&ctx, &args.scan, &silent)?;
        print!("{}", outcome.report.render());
        return Ok(());
    }

    let out = ctx.output_file(args.out.as_deref());
    let summary = generate(&ctx, &args.scan, &out, output)?;

    if output.is_table() {
        output.success(&format!("Diagram written to {}", display_path(&ctx, &out)));
    } else {
        output.display(&summary)?;
    }
    Ok(())
}

/// Scan, render, and write the diagram to `out`.
fn generate(ctx: &ProjectContext, scan: &ScanArgs, out: &Path, output: &OutputManager) -> Result<GenerateSummary> {
    let table = output.is_table();
    if table {
        output.heading("Generate ER Diagram");
    }

    let ScanOutcome {
        models_dir,
        sources,
        report,
    } = scan_project(ctx, scan, output)?;

    if table {
        output.info(&format!(
            "Found {} files in {}",
            sources.len(),
            display_path(ctx, &models_dir)
        ));
        for source in &sources {
            output.verbose(&format!("{} {}", ICONS.file, source.relative_path));
        }
        output.info(&format!("Found {} models", report.models.len()));
        if report.models.is_empty() {
            output.warning("No sequelize.define(...) calls were recognized.");
        }
    }

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(out, report.render()).with_context(|| format!("Failed to write {}", out.display()))?;

    Ok(GenerateSummary {
        files_scanned: report.files_scanned,
        models: report.models.len(),
        associations: report.associations.len(),
        edges: report.edges.len(),
        output_file: Some(out.to_path_buf()),
    })
}
