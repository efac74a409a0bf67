use crate::engine::Candidate;

/// Namespace prefixed to implicit dunder names that have no dotted path of
/// their own (`__file__` → `__import_system__.__file__`).
pub const IMPLICIT_NAMESPACE: &str = "__import_system__";

/// Canonical name reported for a candidate.
///
/// A full name is passed through unchanged. Without one, only names starting
/// with `__` get a name, inside [`IMPLICIT_NAMESPACE`].
pub fn normalize(candidate: Option<&Candidate>) -> Option<String> {
    let candidate = candidate?;
    if let Some(full_name) = &candidate.full_name {
        return Some(full_name.clone());
    }
    candidate
        .name
        .as_deref()
        .filter(|name| name.starts_with("__"))
        .map(|name| format!("{IMPLICIT_NAMESPACE}.{name}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_passes_through() {
        let candidate = Candidate::new("capitalize", Some("builtins.str.capitalize".to_string()));
        assert_eq!(
            normalize(Some(&candidate)).as_deref(),
            Some("builtins.str.capitalize")
        );
    }

    #[test]
    fn test_dunder_without_full_name() {
        let candidate = Candidate::builtin("__file__", None);
        assert_eq!(
            normalize(Some(&candidate)).as_deref(),
            Some("__import_system__.__file__")
        );

        let candidate = Candidate::new("__init__", None);
        assert_eq!(
            normalize(Some(&candidate)).as_deref(),
            Some("__import_system__.__init__")
        );
    }

    #[test]
    fn test_nothing_to_report() {
        assert_eq!(normalize(None), None);
        assert_eq!(normalize(Some(&Candidate::new("local", None))), None);
        // a single leading underscore is an ordinary private name
        assert_eq!(normalize(Some(&Candidate::new("_private", None))), None);

        let anonymous = Candidate {
            name: None,
            full_name: None,
            is_builtin: false,
        };
        assert_eq!(normalize(Some(&anonymous)), None);
    }
}
