//! Schema types recovered from Sequelize model files.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::errors::UnknownAssociationKind;

/// A single model recovered from a `sequelize.define(...)` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelInfo {
    /// Model name as given to `define` (e.g., "User")
    pub name: String,

    /// Attributes in declaration order
    pub fields: Vec<FieldDescriptor>,
}

impl ModelInfo {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }
}

/// Information about a single attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    /// Attribute name
    pub name: String,

    /// Sequelize data type tag
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// `allowNull: true`
    #[serde(skip_serializing_if = "is_false")]
    pub nullable: bool,

    /// `primaryKey: true`
    #[serde(skip_serializing_if = "is_false")]
    pub primary_key: bool,

    /// Name ends in "id" and the field is not the primary key
    #[serde(skip_serializing_if = "is_false")]
    pub foreign_key: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl FieldDescriptor {
    /// Build a descriptor, deriving the foreign key flag from the name.
    pub fn new(name: impl Into<String>, field_type: FieldType, nullable: bool, primary_key: bool) -> Self {
        let name = name.into();
        let foreign_key = !primary_key && looks_like_foreign_key(&name);
        Self {
            name,
            field_type,
            nullable,
            primary_key,
            foreign_key,
        }
    }
}

/// Foreign key naming convention: the name ends in "id", any case.
fn looks_like_foreign_key(name: &str) -> bool {
    name.len() >= 2
        && name
            .get(name.len() - 2..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case("id"))
}

/// Data type tag of an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum FieldType {
    /// Primitive tag, already uppercased (e.g., "STRING", "INTEGER")
    Scalar(String),
    /// `DataTypes.ENUM(...)`
    Enum,
    /// `DataTypes.ARRAY(DataTypes.X)`; the element tag when it could be read
    Array(Option<String>),
    /// No recognizable `type:` annotation
    Unknown,
}

impl FieldType {
    /// Classify an uppercased type tag. `element` is only consulted for arrays.
    pub fn from_tag(tag: &str, element: Option<&str>) -> Self {
        match tag {
            "ENUM" => FieldType::Enum,
            "ARRAY" => FieldType::Array(element.map(str::to_uppercase)),
            other => FieldType::Scalar(other.to_string()),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Scalar(tag) => write!(f, "{tag}"),
            FieldType::Enum => write!(f, "ENUM"),
            FieldType::Array(Some(element)) => write!(f, "ARRAY<{element}>"),
            FieldType::Array(None) => write!(f, "ARRAY"),
            FieldType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl From<FieldType> for String {
    fn from(ty: FieldType) -> Self {
        ty.to_string()
    }
}

/// Association kind, named after the Sequelize method that declares it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AssociationKind {
    HasMany,
    BelongsTo,
    HasOne,
    BelongsToMany,
}

impl AssociationKind {
    pub const ALL: [AssociationKind; 4] = [
        AssociationKind::HasMany,
        AssociationKind::BelongsTo,
        AssociationKind::HasOne,
        AssociationKind::BelongsToMany,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssociationKind::HasMany => "hasMany",
            AssociationKind::BelongsTo => "belongsTo",
            AssociationKind::HasOne => "hasOne",
            AssociationKind::BelongsToMany => "belongsToMany",
        }
    }
}

impl fmt::Display for AssociationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssociationKind {
    type Err = UnknownAssociationKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssociationKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownAssociationKind(s.to_string()))
    }
}

/// One `Source.kind(Target, { ... })` statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssociationDecl {
    pub source: String,
    pub target: String,
    pub kind: AssociationKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_key: Option<String>,

    /// The `as:` alias
    #[serde(rename = "as", skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    /// Join model of a many-to-many association
    #[serde(skip_serializing_if = "Option::is_none")]
    pub through: Option<String>,
}

impl AssociationDecl {
    /// Declaration with no modifiers set.
    pub fn new(source: impl Into<String>, kind: AssociationKind, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
            foreign_key: None,
            source_key: None,
            target_key: None,
            alias: None,
            through: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_through(mut self, through: impl Into<String>) -> Self {
        self.through = Some(through.into());
        self
    }

    /// Unordered pair key: both names, lexicographically sorted.
    pub fn pair_key(&self) -> (&str, &str) {
        if self.source <= self.target {
            (&self.source, &self.target)
        } else {
            (&self.target, &self.source)
        }
    }
}

/// Relationship shape drawn on an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cardinality {
    OneToOne,
    OneToMany,
    ManyToMany,
}

impl Cardinality {
    /// Mermaid erDiagram relationship token.
    pub fn symbol(&self) -> &'static str {
        match self {
            Cardinality::OneToOne => "||--||",
            Cardinality::OneToMany => "||--o{",
            Cardinality::ManyToMany => "}o--o{",
        }
    }

    /// Default edge label.
    pub fn label(&self) -> &'static str {
        match self {
            Cardinality::OneToOne => "one-to-one",
            Cardinality::OneToMany => "one-to-many",
            Cardinality::ManyToMany => "many-to-many",
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One rendered relationship line between two models.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RelationshipEdge {
    pub left: String,
    pub right: String,

    /// `None` when the declarations could not be classified
    pub cardinality: Option<Cardinality>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl RelationshipEdge {
    /// Mermaid symbol, empty when unclassified.
    pub fn symbol(&self) -> &'static str {
        self.cardinality.map(|c| c.symbol()).unwrap_or_default()
    }
}

impl fmt::Display for RelationshipEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.symbol(), self.right)?;
        if let Some(label) = self.label.as_deref().filter(|l| !l.is_empty()) {
            write!(f, " : \"{label}\"")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_foreign_key_convention() {
        assert!(FieldDescriptor::new("authorId", FieldType::Unknown, false, false).foreign_key);
        assert!(FieldDescriptor::new("user_ID", FieldType::Unknown, false, false).foreign_key);
        assert!(!FieldDescriptor::new("authorId", FieldType::Unknown, false, true).foreign_key);
        assert!(!FieldDescriptor::new("name", FieldType::Unknown, false, false).foreign_key);
        assert!(!FieldDescriptor::new("d", FieldType::Unknown, false, false).foreign_key);
    }

    #[test]
    fn test_plain_id_is_foreign_key_only_without_pk() {
        assert!(FieldDescriptor::new("id", FieldType::Unknown, false, false).foreign_key);
        assert!(!FieldDescriptor::new("id", FieldType::Unknown, false, true).foreign_key);
    }

    #[test]
    fn test_field_type_display() {
        assert_eq!(FieldType::from_tag("STRING", None).to_string(), "STRING");
        assert_eq!(FieldType::from_tag("ENUM", None).to_string(), "ENUM");
        assert_eq!(FieldType::from_tag("ARRAY", Some("integer")).to_string(), "ARRAY<INTEGER>");
        assert_eq!(FieldType::from_tag("ARRAY", None).to_string(), "ARRAY");
        assert_eq!(FieldType::Unknown.to_string(), "UNKNOWN");
    }

    #[test]
    fn test_association_kind_round_trip_names() {
        for kind in AssociationKind::ALL {
            assert_eq!(kind.as_str().parse::<AssociationKind>(), Ok(kind));
        }
        assert!("hasSome".parse::<AssociationKind>().is_err());
    }

    #[test]
    fn test_pair_key_is_sorted() {
        let decl = AssociationDecl::new("User", AssociationKind::HasMany, "Post");
        assert_eq!(decl.pair_key(), ("Post", "User"));
    }

    #[test]
    fn test_edge_display() {
        let edge = RelationshipEdge {
            left: "User".into(),
            right: "Post".into(),
            cardinality: Some(Cardinality::OneToMany),
            label: Some("one-to-many".into()),
        };
        assert_eq!(edge.to_string(), r#"User ||--o{ Post : "one-to-many""#);

        let bare = RelationshipEdge {
            left: "A".into(),
            right: "B".into(),
            cardinality: None,
            label: None,
        };
        assert_eq!(bare.to_string(), "A  B");
    }

    #[test]
    fn test_field_serializes_type_as_string() {
        let field = FieldDescriptor::new("tags", FieldType::Array(Some("STRING".into())), true, false);
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["type"], "ARRAY<STRING>");
        assert_eq!(json["nullable"], true);
        assert!(json.get("primary_key").is_none());
    }
}
