//! Association extraction: `Source.hasMany(Target, { ... })` and friends.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{AssociationDecl, AssociationKind};

/// `Source.kind(Target [, { options } | , optionsVar])`. The target may be
/// written as a member path (`models.Post`); the last segment is the name.
static ASSOCIATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?s)([A-Za-z_]\w*)\s*\.\s*(hasMany|belongsTo|hasOne|belongsToMany)\s*\(\s*((?:[A-Za-z_]\w*\s*\.\s*)*[A-Za-z_]\w*)\s*(?:,\s*(?:\{(.*?)\}|[A-Za-z_][\w.]*))?\s*\)",
    )
    .expect("association pattern is valid")
});

/// `class User extends Model` / `extends Sequelize.Model`, for resolving `this`.
static MODEL_CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bclass\s+([A-Za-z_]\w*)\s+extends\s+(?:[A-Za-z_]\w*\s*\.\s*)*Model\b")
        .expect("class pattern is valid")
});

/// `foreignKey: "x"` or `foreignKey: { name: "x", ... }`
static FOREIGN_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bforeignKey\s*:\s*(?:\{[^}]*?\bname\s*:\s*)?["'`]([^"'`]+)["'`]"#)
        .expect("foreignKey pattern is valid")
});

static SOURCE_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bsourceKey\s*:\s*["'`]([^"'`]+)["'`]"#).expect("sourceKey pattern is valid")
});

static TARGET_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\btargetKey\s*:\s*["'`]([^"'`]+)["'`]"#).expect("targetKey pattern is valid")
});

static ALIAS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bas\s*:\s*["'`]([^"'`]+)["'`]"#).expect("as pattern is valid"));

/// `through: "UserGroups"` or `through: models.UserGroup`
static THROUGH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bthrough\s*:\s*(?:["'`]([^"'`]+)["'`]|((?:[A-Za-z_]\w*\s*\.\s*)*[A-Za-z_]\w*))"#)
        .expect("through pattern is valid")
});

/// Find every association declared in `text`, in order of appearance.
///
/// `text` is expected to be comment-stripped already. Nothing is
/// deduplicated here; repeated declarations are resolved when edges are
/// synthesized.
pub fn extract_associations(text: &str) -> Vec<AssociationDecl> {
    let classes: Vec<(usize, &str)> = MODEL_CLASS
        .captures_iter(text)
        .filter_map(|caps| Some((caps.get(0)?.start(), caps.get(1)?.as_str())))
        .collect();

    ASSOCIATION
        .captures_iter(text)
        .filter_map(|caps| {
            let at = caps.get(0)?.start();
            let source = resolve_source(caps.get(1)?.as_str(), at, &classes);
            let kind: AssociationKind = caps.get(2)?.as_str().parse().ok()?;
            let target = last_segment(caps.get(3)?.as_str());
            let options = caps.get(4).map_or("", |m| m.as_str());

            Some(AssociationDecl {
                source: source.to_string(),
                target: target.to_string(),
                kind,
                foreign_key: read_modifier(&FOREIGN_KEY, options),
                source_key: read_modifier(&SOURCE_KEY, options),
                target_key: read_modifier(&TARGET_KEY, options),
                alias: read_modifier(&ALIAS, options),
                through: read_through(options),
            })
        })
        .collect()
}

/// Inside `class X extends Model { static associate() { this.hasMany(...) } }`
/// the source is the nearest class declared before the call.
fn resolve_source<'a>(source: &'a str, at: usize, classes: &[(usize, &'a str)]) -> &'a str {
    if source != "this" {
        return source;
    }
    classes
        .iter()
        .rev()
        .find(|(start, _)| *start < at)
        .map_or(source, |&(_, name)| name)
}

/// `models.Post` -> `Post`
fn last_segment(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path).trim()
}

fn read_modifier(pattern: &Regex, options: &str) -> Option<String> {
    pattern.captures(options).map(|caps| caps[1].to_string())
}

fn read_through(options: &str) -> Option<String> {
    let caps = THROUGH.captures(options)?;
    caps.get(1)
        .map(|quoted| quoted.as_str().to_string())
        .or_else(|| caps.get(2).map(|path| last_segment(path.as_str()).to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::strip_comments;

    #[test]
    fn test_extracts_all_kinds_in_order() {
        let text = r#"
User.hasMany(Post);
Post.belongsTo(User);
User.hasOne(Profile);
User.belongsToMany(Group, { through: "UserGroups" });
"#;
        let decls = extract_associations(text);
        let kinds: Vec<AssociationKind> = decls.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            [
                AssociationKind::HasMany,
                AssociationKind::BelongsTo,
                AssociationKind::HasOne,
                AssociationKind::BelongsToMany,
            ]
        );
        assert_eq!(decls[3].source, "User");
        assert_eq!(decls[3].target, "Group");
        assert_eq!(decls[3].through.as_deref(), Some("UserGroups"));
    }

    #[test]
    fn test_reads_every_modifier() {
        let text = r#"Post.belongsTo(User, {
  foreignKey: 'authorId',
  targetKey: "id",
  sourceKey: `uuid`,
  as: 'author',
});"#;
        let decl = &extract_associations(text)[0];
        assert_eq!(decl.foreign_key.as_deref(), Some("authorId"));
        assert_eq!(decl.target_key.as_deref(), Some("id"));
        assert_eq!(decl.source_key.as_deref(), Some("uuid"));
        assert_eq!(decl.alias.as_deref(), Some("author"));
        assert_eq!(decl.through, None);
    }

    #[test]
    fn test_missing_modifiers_stay_unset() {
        let decl = &extract_associations("Comment.belongsTo(Post, { onDelete: 'CASCADE' })")[0];
        assert_eq!(decl, &AssociationDecl::new("Comment", AssociationKind::BelongsTo, "Post"));
    }

    #[test]
    fn test_nested_foreign_key_object() {
        let text = "Task.belongsTo(Project, { foreignKey: { name: 'projectId', allowNull: false }, as: 'project' })";
        let decl = &extract_associations(text)[0];
        assert_eq!(decl.foreign_key.as_deref(), Some("projectId"));
        assert_eq!(decl.alias.as_deref(), Some("project"));
    }

    #[test]
    fn test_commented_modifier_is_not_recovered() {
        let text = r#"User.belongsToMany(Role, {
  // foreignKey: "x",
  through: "Through",
});"#;
        let decls = extract_associations(&strip_comments(text));
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].foreign_key, None);
        assert_eq!(decls[0].through.as_deref(), Some("Through"));
    }

    #[test]
    fn test_commented_association_is_not_recovered() {
        let text = "/* User.hasMany(Post); */\n// Post.belongsTo(User);\nUser.hasOne(Avatar);";
        let decls = extract_associations(&strip_comments(text));
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].target, "Avatar");
    }

    #[test]
    fn test_qualified_target_and_bare_through() {
        let text = "models.User.belongsToMany(models.Team, { through: models.Membership, as: 'teams' });";
        let decl = &extract_associations(text)[0];
        assert_eq!(decl.source, "User");
        assert_eq!(decl.target, "Team");
        assert_eq!(decl.through.as_deref(), Some("Membership"));
    }

    #[test]
    fn test_options_variable() {
        let decls = extract_associations("Order.hasMany(LineItem, cascadeOptions);");
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].target, "LineItem");
    }

    #[test]
    fn test_this_resolves_to_enclosing_model_class() {
        let text = r#"
class Author extends Model {
  static associate(models) {
    this.hasMany(models.Book);
  }
}
class Book extends Sequelize.Model {
  static associate(models) {
    this.belongsTo(models.Author);
  }
}
"#;
        let decls = extract_associations(text);
        assert_eq!(decls[0].source, "Author");
        assert_eq!(decls[0].target, "Book");
        assert_eq!(decls[1].source, "Book");
        assert_eq!(decls[1].target, "Author");
    }

    #[test]
    fn test_duplicates_are_kept() {
        let decls = extract_associations("User.hasMany(Post);\nUser.hasMany(Post);");
        assert_eq!(decls.len(), 2);
    }

    #[test]
    fn test_no_associations() {
        assert!(extract_associations("const x = user.posts.length;").is_empty());
    }
}
