//! Task input naming and parsing.

/// Environment key for a task input: spaces become `_`, the name is
/// uppercased and prefixed with `INPUT_`.
pub fn input_key(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

/// `true` only for a case-insensitive `"true"`.
pub fn parse_bool(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

/// Split on `delimiter`, dropping blank entries and keeping order.
pub fn split_delimited(value: &str, delimiter: &str) -> Vec<String> {
    if delimiter.is_empty() {
        let value = value.trim();
        return if value.is_empty() {
            Vec::new()
        } else {
            vec![value.to_string()]
        };
    }
    value
        .split(delimiter)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
