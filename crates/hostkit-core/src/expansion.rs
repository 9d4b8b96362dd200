use crate::env::EnvStore;
use regex::{Captures, Regex};
use std::sync::LazyLock;

// `${...}` is tried before `$NAME` so `${}` is consumed as one malformed token.
static REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]*)\}|\$(\w+)").expect("reference pattern is valid"));

/// Expand `$NAME` and `${NAME}` references against the environment.
///
/// Names are looked up uppercased. Unset, empty or malformed references
/// (`${}`) expand to the empty string. Substituted values are not expanded
/// again.
pub fn expand(pattern: &str, env: &dyn EnvStore) -> String {
    REFERENCE
        .replace_all(pattern, |caps: &Captures| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map_or("", |m| m.as_str())
                .trim();
            if name.is_empty() {
                return String::new();
            }
            env.get(&name.to_uppercase()).unwrap_or_default()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MemoryEnv;
    use pretty_assertions::assert_eq;

    fn env() -> MemoryEnv {
        MemoryEnv::from_pairs([("HOME", "/h"), ("USER", "u"), ("NESTED", "$HOME")])
    }

    #[test]
    fn test_expands_both_forms() {
        assert_eq!(expand("$HOME/${USER}/x", &env()), "/h/u/x");
    }

    #[test]
    fn test_names_are_uppercased() {
        assert_eq!(expand("$home/${user}", &env()), "/h/u");
    }

    #[test]
    fn test_malformed_reference_is_empty() {
        assert_eq!(expand("a${}b", &env()), "ab");
    }

    #[test]
    fn test_unset_reference_is_empty() {
        assert_eq!(expand("[$NOPE]", &env()), "[]");
    }

    #[test]
    fn test_values_are_not_expanded_again() {
        assert_eq!(expand("$NESTED", &env()), "$HOME");
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(expand("no references here", &env()), "no references here");
    }
}
