use anyhow::{Context, Result};
use clap::Args;
use sequelize_erd::ErdConfig;

use crate::commands::display_path;
use crate::context::ProjectContext;
use crate::examples::ExampleGroup;
use crate::output::OutputManager;

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Setup",
    commands: &[
        "sequelize-erd init             # Write sequelize-erd.toml with default settings",
        "sequelize-erd init --force     # Overwrite an existing config file",
    ],
}];

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

pub fn handle_init(args: InitArgs, output: &OutputManager) -> Result<()> {
    let ctx = ProjectContext::find()?;
    init_project(&ctx, &args, output)
}

fn init_project(ctx: &ProjectContext, args: &InitArgs, output: &OutputManager) -> Result<()> {
    output.heading("Initialize sequelize-erd");

    if ctx.is_initialized() && !args.force {
        output.warning(&format!("{} already exists", display_path(ctx, &ctx.config_path)));
        output.info("Use --force to overwrite it.");
        return Ok(());
    }

    let content = toml::to_string_pretty(&ErdConfig::default()).context("Failed to serialize default config")?;
    std::fs::write(&ctx.config_path, content)
        .with_context(|| format!("Failed to write {}", ctx.config_path.display()))?;
    output.success(&format!("Created {}", display_path(ctx, &ctx.config_path)));

    let models_dir = ctx.models_dir(None);
    if !models_dir.is_dir() {
        output.warning(&format!(
            "Models directory {} does not exist yet; edit scan.models_dir to point at your models.",
            display_path(ctx, &models_dir)
        ));
    }

    output.info("Run 'sequelize-erd generate' to render the diagram.");
    Ok(())
}
