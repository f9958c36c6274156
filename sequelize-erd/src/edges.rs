//! Relationship edge synthesis.
//!
//! Associations are declared per direction and often redundantly: a
//! `User.hasMany(Post)` is usually paired with a `Post.belongsTo(User)`, the
//! same statement may appear in several files, and some pairs are only
//! declared from one side. This module folds all declarations that touch the
//! same unordered pair of models into exactly one edge.
//!
//! The cardinality comes from the first matching rule below. Conflicting
//! declarations are not reported; the ladder decides, and the resulting
//! diagram is meant to be reviewed by hand.
//!
//! | # | declarations                          | edge         | left side        |
//! |---|---------------------------------------|--------------|------------------|
//! | 1 | `belongsToMany` in either direction   | many-to-many | smaller name     |
//! | 2 | `hasMany` one way, `belongsTo` back   | one-to-many  | `hasMany` side   |
//! | 3 | `hasOne` one way, `belongsTo` back    | one-to-one   | `hasOne` side    |
//! | 4 | `hasMany` without a `belongsTo` back  | one-to-many  | `hasMany` side   |
//! | 5 | `hasOne` without a `belongsTo` back   | one-to-one   | `hasOne` side    |
//! | 6 | only `belongsTo`                      | one-to-many  | `belongsTo` target, or smaller name if both sides declare it |
//! | 7 | anything else                         | unclassified | smaller name     |
//!
//! Aliases (`as:`) replace the cardinality word as the label.

use indexmap::{IndexMap, IndexSet};

use crate::types::{AssociationDecl, AssociationKind, Cardinality, RelationshipEdge};

/// Which member of a pair renders on the left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    /// Lexicographically smaller name
    A,
    /// The other name
    B,
}

/// All declarations touching one unordered pair.
#[derive(Debug)]
struct PairGroup<'a> {
    a: &'a str,
    b: &'a str,
    /// Kinds declared with `a` as the source
    a_to_b: Vec<AssociationKind>,
    /// Kinds declared with `b` as the source
    b_to_a: Vec<AssociationKind>,
    /// Distinct aliases, first-seen order
    aliases: IndexSet<&'a str>,
}

impl<'a> PairGroup<'a> {
    fn new(a: &'a str, b: &'a str) -> Self {
        Self {
            a,
            b,
            a_to_b: Vec::new(),
            b_to_a: Vec::new(),
            aliases: IndexSet::new(),
        }
    }

    fn push(&mut self, decl: &'a AssociationDecl) {
        // A self-association has a == b; every declaration counts as a -> b.
        if decl.source == self.a {
            self.a_to_b.push(decl.kind);
        } else {
            self.b_to_a.push(decl.kind);
        }
        if let Some(alias) = decl.alias.as_deref() {
            self.aliases.insert(alias);
        }
    }

    fn into_edge(self) -> RelationshipEdge {
        let resolved = resolve(&self.a_to_b, &self.b_to_a);
        if resolved.is_none() {
            log::debug!("unclassified association between {} and {}", self.a, self.b);
        }

        let (left, right) = match resolved.map(|(_, side)| side) {
            Some(Side::B) => (self.b, self.a),
            _ => (self.a, self.b),
        };
        let cardinality = resolved.map(|(cardinality, _)| cardinality);

        let label = if self.aliases.is_empty() {
            cardinality.map(|c| c.label().to_string())
        } else {
            Some(self.aliases.into_iter().collect::<Vec<_>>().join(", "))
        };

        RelationshipEdge {
            left: left.to_string(),
            right: right.to_string(),
            cardinality,
            label,
        }
    }
}

/// Apply the precedence ladder to one pair's declared kinds.
fn resolve(a_to_b: &[AssociationKind], b_to_a: &[AssociationKind]) -> Option<(Cardinality, Side)> {
    use AssociationKind::*;

    let a = |kind| a_to_b.contains(&kind);
    let b = |kind| b_to_a.contains(&kind);

    // 1. many-to-many wins outright
    if a(BelongsToMany) || b(BelongsToMany) {
        return Some((Cardinality::ManyToMany, Side::A));
    }

    // 2-3. a parent declaration answered by a belongsTo from the other side
    for (parent, cardinality) in [(HasMany, Cardinality::OneToMany), (HasOne, Cardinality::OneToOne)] {
        if a(parent) && b(BelongsTo) {
            return Some((cardinality, Side::A));
        }
        if b(parent) && a(BelongsTo) {
            return Some((cardinality, Side::B));
        }
    }

    // 4-5. a parent declaration on its own
    for (parent, cardinality) in [(HasMany, Cardinality::OneToMany), (HasOne, Cardinality::OneToOne)] {
        if a(parent) {
            return Some((cardinality, Side::A));
        }
        if b(parent) {
            return Some((cardinality, Side::B));
        }
    }

    // 6. only belongsTo: the target is read as the parent
    match (a(BelongsTo), b(BelongsTo)) {
        (true, false) => Some((Cardinality::OneToMany, Side::B)),
        (false, true) => Some((Cardinality::OneToMany, Side::A)),
        (true, true) => Some((Cardinality::OneToMany, Side::A)),
        // 7. nothing recognizable
        (false, false) => None,
    }
}

/// Fold declarations into one edge per unordered pair of models.
///
/// Edges come out in the order each pair was first declared. Identical
/// edges are emitted once.
pub fn synthesize_edges(decls: &[AssociationDecl]) -> Vec<RelationshipEdge> {
    let mut groups: IndexMap<(&str, &str), PairGroup<'_>> = IndexMap::new();

    for decl in decls {
        let (a, b) = decl.pair_key();
        groups.entry((a, b)).or_insert_with(|| PairGroup::new(a, b)).push(decl);
    }

    groups
        .into_values()
        .map(PairGroup::into_edge)
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use AssociationKind::*;

    fn decl(source: &str, kind: AssociationKind, target: &str) -> AssociationDecl {
        AssociationDecl::new(source, kind, target)
    }

    fn single(decls: &[AssociationDecl]) -> RelationshipEdge {
        let edges = synthesize_edges(decls);
        assert_eq!(edges.len(), 1, "expected exactly one edge, got {edges:?}");
        edges.into_iter().next().unwrap()
    }

    #[test]
    fn test_has_many_with_belongs_to() {
        let edge = single(&[decl("User", HasMany, "Post"), decl("Post", BelongsTo, "User")]);
        assert_eq!(edge.left, "User");
        assert_eq!(edge.right, "Post");
        assert_eq!(edge.cardinality, Some(Cardinality::OneToMany));
        assert_eq!(edge.label.as_deref(), Some("one-to-many"));
        assert_eq!(edge.to_string(), r#"User ||--o{ Post : "one-to-many""#);
    }

    #[test]
    fn test_has_many_on_smaller_name() {
        let edge = single(&[decl("Author", HasMany, "Book"), decl("Book", BelongsTo, "Author")]);
        assert_eq!((edge.left.as_str(), edge.right.as_str()), ("Author", "Book"));
    }

    #[test]
    fn test_belongs_to_many_beats_everything() {
        let edge = single(&[
            decl("User", HasMany, "Group"),
            decl("Group", BelongsTo, "User"),
            decl("User", BelongsToMany, "Group"),
        ]);
        assert_eq!(edge.cardinality, Some(Cardinality::ManyToMany));
        assert_eq!(edge.label.as_deref(), Some("many-to-many"));
        assert_eq!((edge.left.as_str(), edge.right.as_str()), ("Group", "User"));
    }

    #[test]
    fn test_many_to_many_alias_takes_precedence() {
        let edge = single(&[
            decl("User", BelongsToMany, "Group").with_alias("groups"),
            decl("Group", BelongsToMany, "User").with_alias("members"),
        ]);
        assert_eq!(edge.cardinality, Some(Cardinality::ManyToMany));
        assert_eq!(edge.label.as_deref(), Some("groups, members"));
    }

    #[test]
    fn test_has_one_with_belongs_to() {
        let edge = single(&[decl("Profile", BelongsTo, "User"), decl("User", HasOne, "Profile")]);
        assert_eq!(edge.cardinality, Some(Cardinality::OneToOne));
        assert_eq!(edge.left, "User");
        assert_eq!(edge.label.as_deref(), Some("one-to-one"));
    }

    #[test]
    fn test_has_many_pairing_beats_has_one_pairing() {
        let edge = single(&[
            decl("User", HasOne, "Post"),
            decl("User", HasMany, "Post"),
            decl("Post", BelongsTo, "User"),
        ]);
        assert_eq!(edge.cardinality, Some(Cardinality::OneToMany));
    }

    #[test]
    fn test_has_one_pairing_beats_lone_has_many() {
        // Post.hasMany(User) has no belongsTo answer; User.hasOne(Post) does.
        let edge = single(&[
            decl("Post", HasMany, "User"),
            decl("User", HasOne, "Post"),
            decl("Post", BelongsTo, "User"),
        ]);
        assert_eq!(edge.cardinality, Some(Cardinality::OneToOne));
        assert_eq!(edge.left, "User");
    }

    #[test]
    fn test_lone_has_many() {
        let edge = single(&[decl("Team", HasMany, "Member")]);
        assert_eq!(edge.cardinality, Some(Cardinality::OneToMany));
        assert_eq!((edge.left.as_str(), edge.right.as_str()), ("Team", "Member"));
    }

    #[test]
    fn test_lone_has_one() {
        let edge = single(&[decl("Account", HasOne, "Settings")]);
        assert_eq!(edge.cardinality, Some(Cardinality::OneToOne));
        assert_eq!(edge.label.as_deref(), Some("one-to-one"));
        assert_eq!(edge.left, "Account");
    }

    #[test]
    fn test_lone_has_many_beats_lone_has_one() {
        let edge = single(&[decl("Team", HasOne, "Member"), decl("Member", HasMany, "Team")]);
        assert_eq!(edge.cardinality, Some(Cardinality::OneToMany));
        assert_eq!(edge.left, "Member");
    }

    #[test]
    fn test_one_sided_belongs_to_puts_target_left() {
        let edge = single(&[decl("Comment", BelongsTo, "Post")]);
        assert_eq!(edge.cardinality, Some(Cardinality::OneToMany));
        assert_eq!((edge.left.as_str(), edge.right.as_str()), ("Post", "Comment"));

        let edge = single(&[decl("Zone", BelongsTo, "Area")]);
        assert_eq!((edge.left.as_str(), edge.right.as_str()), ("Area", "Zone"));
    }

    #[test]
    fn test_symmetric_belongs_to_keeps_default_order() {
        let edge = single(&[decl("Wife", BelongsTo, "Husband"), decl("Husband", BelongsTo, "Wife")]);
        assert_eq!(edge.cardinality, Some(Cardinality::OneToMany));
        assert_eq!((edge.left.as_str(), edge.right.as_str()), ("Husband", "Wife"));
    }

    #[test]
    fn test_alias_replaces_inferred_label() {
        let edge = single(&[
            decl("Post", BelongsTo, "User").with_alias("author"),
            decl("User", HasMany, "Post").with_alias("posts"),
            decl("User", HasMany, "Post").with_alias("posts"),
        ]);
        assert_eq!(edge.label.as_deref(), Some("author, posts"));
        assert_eq!(edge.to_string(), r#"User ||--o{ Post : "author, posts""#);
    }

    #[test]
    fn test_duplicate_declarations_yield_one_edge() {
        let edges = synthesize_edges(&[
            decl("User", HasMany, "Post"),
            decl("User", HasMany, "Post"),
            decl("Post", BelongsTo, "User"),
        ]);
        assert_eq!(edges.len(), 1);
    }

    #[test]
    fn test_edges_follow_first_declaration_order() {
        let edges = synthesize_edges(&[
            decl("User", HasMany, "Post"),
            decl("Tag", BelongsToMany, "Post"),
            decl("Post", BelongsTo, "User"),
            decl("Account", HasOne, "User"),
        ]);
        let pairs: Vec<(&str, &str)> = edges.iter().map(|e| (e.left.as_str(), e.right.as_str())).collect();
        assert_eq!(pairs, [("User", "Post"), ("Post", "Tag"), ("Account", "User")]);
    }

    #[test]
    fn test_self_association() {
        let edge = single(&[decl("Employee", HasMany, "Employee").with_alias("reports")]);
        assert_eq!((edge.left.as_str(), edge.right.as_str()), ("Employee", "Employee"));
        assert_eq!(edge.cardinality, Some(Cardinality::OneToMany));
        assert_eq!(edge.label.as_deref(), Some("reports"));
    }

    #[test]
    fn test_resolve_without_kinds_is_unclassified() {
        assert_eq!(resolve(&[], &[]), None);
    }

    #[test]
    fn test_empty_input() {
        assert!(synthesize_edges(&[]).is_empty());
    }
}
