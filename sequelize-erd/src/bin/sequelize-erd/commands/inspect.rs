use anyhow::Result;
use clap::Subcommand;
use comfy_table::{Cell, Table};
use sequelize_erd::{AssociationDecl, ModelInfo, RelationshipEdge};

use crate::commands::{ScanArgs, scan_project};
use crate::context::ProjectContext;
use crate::examples::ExampleGroup;
use crate::output::{GlobalOptions, OutputManager, TableDisplay, themed_table};

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Extracted Data",
        commands: &[
            "sequelize-erd inspect models                  # Models and their fields",
            "sequelize-erd inspect associations            # Every association call found",
            "sequelize-erd inspect edges                   # One resolved relationship per model pair",
        ],
    },
    ExampleGroup {
        title: "Scripting",
        commands: &[
            "sequelize-erd --output json inspect edges     # Edges as JSON",
            "sequelize-erd --output compact inspect models --only user.ts",
        ],
    },
];

#[derive(Subcommand)]
pub enum InspectCommands {
    /// List extracted models and fields
    #[command(name = "models")]
    Models(ScanArgs),

    /// List association declarations in source order
    #[command(name = "associations")]
    Associations(ScanArgs),

    /// List synthesized relationship edges
    #[command(name = "edges")]
    Edges(ScanArgs),
}

pub fn handle_inspect_commands(command: InspectCommands, output: &OutputManager) -> Result<()> {
    let ctx = ProjectContext::find()?;

    match command {
        InspectCommands::Models(scan) => {
            let report = scan_project(&ctx, &scan, output)?.report;
            output.display(&report.models)?;
        }
        InspectCommands::Associations(scan) => {
            let report = scan_project(&ctx, &scan, output)?.report;
            output.display(&report.associations)?;
        }
        InspectCommands::Edges(scan) => {
            let report = scan_project(&ctx, &scan, output)?.report;
            output.display(&report.edges)?;
        }
    }

    Ok(())
}

fn flag(value: bool) -> &'static str {
    if value { "yes" } else { "" }
}

fn optional(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

impl TableDisplay for Vec<ModelInfo> {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = themed_table(options, &["Model", "Field", "Type", "Nullable", "PK", "FK"]);
        for model in self {
            if model.fields.is_empty() {
                table.add_row(vec![Cell::new(&model.name), Cell::new("(no fields)")]);
            }
            for (index, field) in model.fields.iter().enumerate() {
                let name = if index == 0 { model.name.as_str() } else { "" };
                table.add_row(vec![
                    Cell::new(name),
                    Cell::new(&field.name),
                    Cell::new(&field.field_type),
                    Cell::new(flag(field.nullable)),
                    Cell::new(flag(field.primary_key)),
                    Cell::new(flag(field.foreign_key)),
                ]);
            }
        }
        table
    }

    fn to_compact(&self) -> String {
        self.iter()
            .map(|model| {
                let fields: Vec<&str> = model.fields.iter().map(|f| f.name.as_str()).collect();
                format!("{}({})", model.name, fields.join(", "))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl TableDisplay for Vec<AssociationDecl> {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = themed_table(
            options,
            &["Source", "Kind", "Target", "As", "Through", "Foreign Key", "Source Key", "Target Key"],
        );
        for decl in self {
            table.add_row(vec![
                Cell::new(&decl.source),
                Cell::new(decl.kind),
                Cell::new(&decl.target),
                Cell::new(optional(&decl.alias)),
                Cell::new(optional(&decl.through)),
                Cell::new(optional(&decl.foreign_key)),
                Cell::new(optional(&decl.source_key)),
                Cell::new(optional(&decl.target_key)),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        self.iter()
            .map(|decl| format!("{}.{}({})", decl.source, decl.kind, decl.target))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl TableDisplay for Vec<RelationshipEdge> {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = themed_table(options, &["Left", "Cardinality", "Right", "Label"]);
        for edge in self {
            let cardinality = edge.cardinality.map_or("unclassified", |c| c.label());
            table.add_row(vec![
                Cell::new(&edge.left),
                Cell::new(cardinality),
                Cell::new(&edge.right),
                Cell::new(optional(&edge.label)),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        self.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n")
    }
}
