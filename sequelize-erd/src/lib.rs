//! sequelize-erd core library.
//!
//! Scans Sequelize model sources for `sequelize.define(...)` calls and
//! association declarations, reduces the associations to one relationship
//! per model pair, and renders the result as a Mermaid `erDiagram`.
//!
//! ```
//! use sequelize_erd::SchemaCollector;
//!
//! let mut collector = SchemaCollector::new();
//! collector.ingest("user.js", "User.hasMany(Post);\nPost.belongsTo(User);");
//! let report = collector.finish();
//! assert_eq!(report.render(), "erDiagram\nUser ||--o{ Post : \"one-to-many\"\n");
//! ```

pub mod association;
pub mod collector;
pub mod comments;
pub mod config;
pub mod discovery;
pub mod edges;
pub mod errors;
pub mod model;
pub mod render;
pub mod types;

pub use association::extract_associations;
pub use collector::{SchemaCollector, SchemaReport};
pub use comments::strip_comments;
pub use config::{CONFIG_FILE, ErdConfig, OutputConfig, ScanConfig};
pub use discovery::{SourceFile, discover_sources};
pub use edges::synthesize_edges;
pub use errors::*;
pub use model::{extract_model, parse_attributes};
pub use render::render_diagram;
pub use types::{
    AssociationDecl, AssociationKind, Cardinality, FieldDescriptor, FieldType, ModelInfo, RelationshipEdge,
};
