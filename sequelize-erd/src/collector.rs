//! Per-run accumulation of models and associations across files.

use log::{debug, trace};
use serde::Serialize;

use crate::association::extract_associations;
use crate::comments::strip_comments;
use crate::edges::synthesize_edges;
use crate::model::extract_model;
use crate::render::render_diagram;
use crate::types::{AssociationDecl, ModelInfo, RelationshipEdge};

/// Collects extraction results one file at a time.
///
/// Build a fresh collector for every run; it holds no state beyond the
/// files ingested into it.
#[derive(Debug, Default)]
pub struct SchemaCollector {
    files_scanned: usize,
    models: Vec<ModelInfo>,
    associations: Vec<AssociationDecl>,
}

impl SchemaCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run model and association extraction over one file's text.
    ///
    /// `file_name` is only used for diagnostics.
    pub fn ingest(&mut self, file_name: &str, text: &str) {
        self.files_scanned += 1;
        debug!("Scanning {file_name}");

        if let Some(model) = extract_model(text) {
            debug!("{file_name}: model {} with {} fields", model.name, model.fields.len());
            self.models.push(model);
        }

        let associations = extract_associations(&strip_comments(text));
        for decl in &associations {
            trace!("{file_name}: {} {} {}", decl.source, decl.kind, decl.target);
        }
        self.associations.extend(associations);
    }

    /// Synthesize edges from everything ingested so far.
    pub fn finish(self) -> SchemaReport {
        let edges = synthesize_edges(&self.associations);
        debug!(
            "{} associations reduced to {} edges",
            self.associations.len(),
            edges.len()
        );
        SchemaReport {
            files_scanned: self.files_scanned,
            models: self.models,
            associations: self.associations,
            edges,
        }
    }
}

/// Everything extracted in one run.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaReport {
    pub files_scanned: usize,
    pub models: Vec<ModelInfo>,
    pub associations: Vec<AssociationDecl>,
    pub edges: Vec<RelationshipEdge>,
}

impl SchemaReport {
    pub fn render(&self) -> String {
        render_diagram(&self.models, &self.edges)
    }
}
