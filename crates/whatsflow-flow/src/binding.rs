//! Dynamic value bindings.
//!
//! Flow documents reference runtime values with `${data.key}` and
//! `${form.key}` expressions. A binding is only recognized when the whole
//! string is a single expression; partial interpolation inside longer text is
//! not part of the format.

// ─────────────────────────────────────────────────────────────────────────────
// Binding
// ─────────────────────────────────────────────────────────────────────────────

/// A parsed `${...}` value binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// `${data.key}` - resolved against the screen's `data` object.
    Data(String),
    /// `${form.key}` - resolved against values entered into the form.
    Form(String),
}

impl Binding {
    /// Parse a whole-string binding expression.
    ///
    /// Returns `None` when the string is not exactly one `${data.*}` or
    /// `${form.*}` expression with a non-empty key.
    pub fn parse(raw: &str) -> Option<Self> {
        let inner = raw.strip_prefix("${")?.strip_suffix('}')?;
        if let Some(key) = inner.strip_prefix("data.") {
            if key.is_empty() {
                return None;
            }
            return Some(Binding::Data(key.to_string()));
        }
        if let Some(key) = inner.strip_prefix("form.") {
            if key.is_empty() {
                return None;
            }
            return Some(Binding::Form(key.to_string()));
        }
        None
    }

    /// The key the binding resolves with.
    pub fn key(&self) -> &str {
        match self {
            Binding::Data(key) | Binding::Form(key) => key,
        }
    }
}

impl std::fmt::Display for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Binding::Data(key) => write!(f, "${{data.{}}}", key),
            Binding::Form(key) => write!(f, "${{form.{}}}", key),
        }
    }
}

/// Check whether a string looks like a binding expression at all.
///
/// Used by validation to distinguish "binding that resolves to nothing" from
/// plain literal text.
pub fn is_binding(raw: &str) -> bool {
    raw.starts_with("${") && raw.ends_with('}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_data_binding() {
        assert_eq!(
            Binding::parse("${data.all_extras}"),
            Some(Binding::Data("all_extras".to_string()))
        );
    }

    #[test]
    fn test_parse_form_binding() {
        assert_eq!(
            Binding::parse("${form.burger}"),
            Some(Binding::Form("burger".to_string()))
        );
    }

    #[test]
    fn test_rejects_plain_text() {
        assert_eq!(Binding::parse("all_extras"), None);
        assert_eq!(Binding::parse("data.all_extras"), None);
    }

    #[test]
    fn test_rejects_unknown_namespace() {
        assert_eq!(Binding::parse("${env.HOME}"), None);
    }

    #[test]
    fn test_rejects_empty_key() {
        assert_eq!(Binding::parse("${data.}"), None);
        assert_eq!(Binding::parse("${form.}"), None);
    }

    #[test]
    fn test_rejects_partial_interpolation() {
        assert_eq!(Binding::parse("prefix ${data.x}"), None);
        assert_eq!(Binding::parse("${data.x} suffix"), None);
    }

    #[test]
    fn test_display_round_trips() {
        let binding = Binding::parse("${form.date}").unwrap();
        assert_eq!(binding.to_string(), "${form.date}");
        assert_eq!(Binding::parse(&binding.to_string()), Some(binding));
    }

    #[test]
    fn test_is_binding_shape() {
        assert!(is_binding("${data.x}"));
        assert!(is_binding("${unknown.x}"));
        assert!(!is_binding("plain"));
    }
}
