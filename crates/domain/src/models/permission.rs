//! The wildcard permission evaluator.
//!
//! Permission strings take three shapes:
//! - exact: `"blog.read"`
//! - domain wildcard: `"blog.*"` grants every `blog.<action>`
//! - global wildcard: `"*"` grants everything

/// Grants every permission.
pub const GLOBAL_WILDCARD: &str = "*";

/// Returns true if `granted` satisfies `required`.
///
/// Total and case-sensitive. The domain wildcard applies only when `required`
/// has exactly two dot-separated parts.
pub fn has_permission(granted: &[String], required: &str) -> bool {
    if granted.iter().any(|p| p == GLOBAL_WILDCARD) {
        return true;
    }

    if granted.iter().any(|p| p == required) {
        return true;
    }

    let mut parts = required.split('.');
    if let (Some(domain), Some(_action), None) = (parts.next(), parts.next(), parts.next()) {
        let wildcard = format!("{}.*", domain);
        return granted.iter().any(|p| *p == wildcard);
    }

    false
}

/// Returns true if any of `required` is satisfied. Empty `required` is false.
pub fn has_any(granted: &[String], required: &[&str]) -> bool {
    required.iter().any(|r| has_permission(granted, r))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perms(list: &[&str]) -> Vec<String> {
        list.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_global_wildcard_grants_everything() {
        let granted = perms(&["*"]);
        assert!(has_permission(&granted, "pages.update"));
        assert!(has_permission(&granted, "anything"));
        assert!(has_permission(&granted, "a.b.c"));
        assert!(has_permission(&granted, ""));
    }

    #[test]
    fn test_domain_wildcard() {
        let granted = perms(&["pages.*"]);
        assert!(has_permission(&granted, "pages.update"));
        assert!(has_permission(&granted, "pages.delete"));
        assert!(!has_permission(&granted, "blog.update"));
    }

    #[test]
    fn test_domain_wildcard_requires_two_parts() {
        let granted = perms(&["pages.*"]);
        assert!(!has_permission(&granted, "pages"));
        assert!(!has_permission(&granted, "pages.components.update"));
    }

    #[test]
    fn test_exact_match() {
        let granted = perms(&["blog.read"]);
        assert!(has_permission(&granted, "blog.read"));
        assert!(!has_permission(&granted, "blog.update"));
    }

    #[test]
    fn test_no_match() {
        let granted = perms(&["blog.read"]);
        assert!(!has_permission(&granted, "pages.update"));
        assert!(!has_permission(&[], "pages.update"));
    }

    #[test]
    fn test_case_sensitive() {
        let granted = perms(&["Pages.*", "BLOG.READ"]);
        assert!(!has_permission(&granted, "pages.read"));
        assert!(!has_permission(&granted, "blog.read"));
    }

    #[test]
    fn test_wildcard_required_string_is_exact_only() {
        let granted = perms(&["seo.*"]);
        assert!(has_permission(&granted, "seo.*"));
        assert!(!has_permission(&perms(&["seo.read"]), "seo.*"));
    }

    #[test]
    fn test_has_any() {
        let granted = perms(&["pages.read"]);
        assert!(has_any(&granted, &["pages.read", "*"]));
        assert!(!has_any(&granted, &["pages.update", "*"]));
        assert!(has_any(&perms(&["*"]), &["pages.update", "*"]));
        assert!(!has_any(&granted, &[]));
    }
}
