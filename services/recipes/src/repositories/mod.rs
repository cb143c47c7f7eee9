//! Repositories for database operations

pub mod catalog;
pub mod plan;
pub mod profile;
pub mod recipe;
pub mod social;
pub mod user;

pub use catalog::CatalogRepository;
pub use plan::PlanRepository;
pub use profile::ProfileRepository;
pub use recipe::{RecipeDetails, RecipeRepository};
pub use social::SocialRepository;
pub use user::{PendingRegistration, UserRepository};

/// Escape `%`, `_` and `\` so user input matches literally inside `LIKE`
pub(crate) fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Translate an `ordering` query value into an `ORDER BY` clause
///
/// `allowed` maps public field names to columns; a leading `-` flips the
/// direction. Unknown values fall back to `default`.
pub(crate) fn order_by(
    ordering: Option<&str>,
    allowed: &[(&str, &str)],
    default: &str,
) -> String {
    let Some(ordering) = ordering.map(str::trim).filter(|o| !o.is_empty()) else {
        return default.to_string();
    };

    let (field, direction) = match ordering.strip_prefix('-') {
        Some(field) => (field, "DESC"),
        None => (ordering, "ASC"),
    };

    allowed
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, column)| format!("{} {}, {}", column, direction, default))
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("soup"), "%soup%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn test_order_by_whitelist() {
        let allowed = [("title", "r.title"), ("created_at", "r.created_at")];

        assert_eq!(order_by(None, &allowed, "r.id ASC"), "r.id ASC");
        assert_eq!(
            order_by(Some("title"), &allowed, "r.id ASC"),
            "r.title ASC, r.id ASC"
        );
        assert_eq!(
            order_by(Some("-created_at"), &allowed, "r.id ASC"),
            "r.created_at DESC, r.id ASC"
        );
        assert_eq!(
            order_by(Some("password_hash; DROP TABLE"), &allowed, "r.id ASC"),
            "r.id ASC"
        );
    }
}
