/// Replace `${ENV_VAR}` placeholders with values from the process environment.
///
/// Unresolvable variables are left as-is.
#[must_use]
pub fn substitute_env(input: &str) -> String {
    substitute_env_with(input, |name| std::env::var(name).ok())
}

/// Replace `${ENV_VAR}` placeholders using `lookup`.
///
/// Unknown names and unterminated placeholders are copied through verbatim.
pub fn substitute_env_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };

        let name = &after[..end];
        match (!name.is_empty()).then(|| lookup(name)).flatten() {
            Some(value) => out.push_str(&value),
            None => out.push_str(&rest[start..start + 2 + end + 1]),
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

/// Names of `${...}` placeholders still present in `input`.
#[must_use]
pub fn unresolved_placeholders(input: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = input;
    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else { break };
        if end > 0 {
            names.push(&after[..end]);
        }
        rest = &after[end + 1..];
    }
    names
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    fn lookup(name: &str) -> Option<String> {
        match name {
            "METAMAPA_TOKEN" => Some("123:abc".into()),
            "HOST" => Some("api.local".into()),
            _ => None,
        }
    }

    #[rstest]
    #[case("token = \"${METAMAPA_TOKEN}\"", "token = \"123:abc\"")]
    #[case("http://${HOST}:8080/${HOST}", "http://api.local:8080/api.local")]
    #[case("${UNKNOWN_VAR}", "${UNKNOWN_VAR}")]
    #[case("${}", "${}")]
    #[case("tail ${METAMAPA_TOKEN", "tail ${METAMAPA_TOKEN")]
    #[case("cost: $5 {braces}", "cost: $5 {braces}")]
    #[case("ñandú ${HOST} ñ", "ñandú api.local ñ")]
    fn substitution(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(substitute_env_with(input, lookup), expected);
    }

    #[test]
    fn lists_leftover_placeholders() {
        assert_eq!(
            unresolved_placeholders("${A} and ${} and ${B_2} and ${open"),
            ["A", "B_2"]
        );
        assert!(unresolved_placeholders("https://x.example").is_empty());
    }

    #[test]
    fn plain_text_is_untouched() {
        assert_eq!(substitute_env("plain text"), "plain text");
    }
}
