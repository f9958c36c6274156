//! Mermaid `erDiagram` output.

use std::fmt::Write;

use crate::types::{FieldDescriptor, ModelInfo, RelationshipEdge};

/// Diagram header token.
pub const HEADER: &str = "erDiagram";

const INDENT: &str = "    ";

/// Render models and edges as one Mermaid ER diagram.
///
/// Edges may name models that were never extracted; they are drawn as-is
/// and Mermaid creates an empty entity for them.
pub fn render_diagram(models: &[ModelInfo], edges: &[RelationshipEdge]) -> String {
    let mut buffer = String::new();
    let _ = writeln!(buffer, "{HEADER}");

    let blocks: Vec<String> = models.iter().map(render_model).collect();
    buffer.push_str(&blocks.join("\n"));

    if !edges.is_empty() {
        if !blocks.is_empty() {
            buffer.push('\n');
        }
        for edge in edges {
            let _ = writeln!(buffer, "{edge}");
        }
    }

    buffer
}

/// One entity block, followed by a newline.
fn render_model(model: &ModelInfo) -> String {
    let mut block = String::new();
    let _ = writeln!(block, "{} {{", model.name);
    for field in &model.fields {
        let _ = writeln!(block, "{INDENT}{}", render_field(field));
    }
    let _ = writeln!(block, "}}");
    block
}

/// `TYPE name[nullable] PK` / `TYPE name FK`
pub fn render_field(field: &FieldDescriptor) -> String {
    let mut line = format!("{} {}", field.field_type, field.name);
    if field.nullable {
        line.push_str("[nullable]");
    }
    if field.primary_key {
        line.push_str(" PK");
    }
    if field.foreign_key {
        line.push_str(" FK");
    }
    line
}
