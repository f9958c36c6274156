mod commands;
mod context;
mod examples;
mod output;
mod theme;

use anyhow::Result;
use clap::{
    ColorChoice, Command, CommandFactory, FromArgMatches, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Color as ClapColor, Style},
    },
};
use colored::{Color as ThemeColor, Colorize, control::ShouldColorize};
use std::fmt::Write;

use commands::{
    generate::{GenerateArgs, handle_generate},
    init::{InitArgs, handle_init},
    inspect::{InspectCommands, handle_inspect_commands},
};
use examples::{ExampleGroup, command_examples};
use output::{GlobalOptions, OutputFormat, OutputManager};
use theme::{ICONS, THEME};

const ENVIRONMENT_VARIABLES: &[(&str, &str)] = &[
    ("RUST_LOG", "Diagnostic log filter, e.g. sequelize_erd=debug"),
    ("NO_COLOR", "Disable colored output when set"),
];

#[derive(Parser)]
#[command(name = "sequelize-erd")]
#[command(version)]
#[command(
    about = "Render Sequelize models and associations as a Mermaid ER diagram",
    long_about = r#"Entity-relationship diagrams for Sequelize projects:

• Reads sequelize.define(...) calls for model names and fields
• Reads hasMany / belongsTo / hasOne / belongsToMany calls for relationships
• Reduces every model pair to a single edge with a cardinality and label
• Writes a Mermaid erDiagram you can paste into docs or review tools

Commands:
  init      Write a sequelize-erd.toml with default settings
  generate  Scan the models directory and write the diagram
  inspect   Show extracted models, associations, or edges
"#
)]
#[command(subcommand_required = true, arg_required_else_help = true)]
struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    output: OutputFormat,

    /// Suppress output (only errors will be shown)
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Enable verbose output
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse arguments with themed help and the examples appendix attached.
    fn parse_with_styles() -> Self {
        let matches = build_cli_command().styles(help_styles()).get_matches();
        Cli::from_arg_matches(&matches).unwrap_or_else(|err| err.exit())
    }
}

fn build_cli_command() -> Command {
    let use_color = ShouldColorize::from_env().should_colorize();
    let mut command = Cli::command()
        .after_long_help(render_appendix(use_color))
        .color(if use_color { ColorChoice::Auto } else { ColorChoice::Never });

    for example in command_examples() {
        command = command.mut_subcommand(example.name, |sub| {
            sub.after_long_help(render_examples(example.groups, use_color))
        });
    }
    command
}

fn render_examples(groups: &[ExampleGroup], use_color: bool) -> String {
    let theme = &THEME;
    let mut buffer = String::new();
    let _ = writeln!(buffer, "{}", stylize("Examples:", theme.highlight, true, use_color));

    let blocks: Vec<String> = groups
        .iter()
        .map(|group| {
            let mut block = format!("  {}\n", stylize(group.title, theme.primary, true, use_color));
            for line in group.commands {
                let _ = writeln!(
                    block,
                    "    {} {}",
                    stylize(ICONS.arrow, theme.secondary, false, use_color),
                    stylize(line, theme.secondary, false, use_color)
                );
            }
            block
        })
        .collect();
    buffer.push_str(&blocks.join("\n"));
    buffer
}

/// Environment variables and a pointer to per-command help.
fn render_appendix(use_color: bool) -> String {
    let theme = &THEME;
    let mut buffer = String::new();

    let _ = writeln!(buffer, "{}", stylize("Environment Variables:", theme.highlight, true, use_color));
    for (name, description) in ENVIRONMENT_VARIABLES {
        let _ = writeln!(
            buffer,
            "  {}  {}",
            stylize(name, theme.key, true, use_color),
            stylize(description, theme.value, false, use_color)
        );
    }

    let _ = writeln!(
        buffer,
        "\n{} {}",
        stylize("Tip:", theme.highlight, true, use_color),
        stylize("Run 'sequelize-erd <command> --help' for examples.", theme.secondary, false, use_color)
    );
    buffer
}

fn stylize(text: &str, color: ThemeColor, bold: bool, use_color: bool) -> String {
    match (use_color, bold) {
        (false, _) => text.to_string(),
        (true, true) => text.color(color).bold().to_string(),
        (true, false) => text.color(color).to_string(),
    }
}

fn help_styles() -> Styles {
    let theme = &THEME;
    let style = |color| Style::new().fg_color(Some(ClapColor::Ansi(ansi(color))));
    Styles::styled()
        .usage(style(theme.primary).bold())
        .header(style(theme.highlight).bold())
        .literal(style(theme.secondary))
        .placeholder(style(theme.muted))
        .valid(style(theme.success))
        .invalid(style(theme.warning))
        .error(style(theme.error).bold())
}

/// ANSI equivalent of a theme color. The theme only uses the basic palette.
fn ansi(color: ThemeColor) -> AnsiColor {
    match color {
        ThemeColor::Red => AnsiColor::Red,
        ThemeColor::Green => AnsiColor::Green,
        ThemeColor::Yellow => AnsiColor::Yellow,
        ThemeColor::Blue => AnsiColor::Blue,
        ThemeColor::Magenta => AnsiColor::Magenta,
        ThemeColor::Cyan => AnsiColor::Cyan,
        ThemeColor::BrightBlack => AnsiColor::BrightBlack,
        ThemeColor::BrightBlue => AnsiColor::BrightBlue,
        ThemeColor::BrightCyan => AnsiColor::BrightCyan,
        _ => AnsiColor::White,
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default sequelize-erd.toml in the project root
    Init(InitArgs),

    /// Scan model files and write the Mermaid diagram
    Generate(GenerateArgs),

    /// Show what was extracted from the model files
    #[command(subcommand)]
    Inspect(InspectCommands),
}

fn main() {
    env_logger::init();

    let cli = Cli::parse_with_styles();
    if cli.no_color {
        colored::control::set_override(false);
    }

    let output = OutputManager::new(GlobalOptions {
        output_format: cli.output.clone(),
        quiet: cli.quiet,
        verbose: cli.verbose,
        no_color: cli.no_color,
    });

    if let Err(err) = execute(cli.command, &output) {
        output.error(&format!("{err:#}"));
        std::process::exit(1);
    }
}

fn execute(command: Commands, output: &OutputManager) -> Result<()> {
    match command {
        Commands::Init(args) => handle_init(args, output)?,
        Commands::Generate(args) => handle_generate(args, output)?,
        Commands::Inspect(inspect_cmd) => handle_inspect_commands(inspect_cmd, output)?,
    }

    Ok(())
}
