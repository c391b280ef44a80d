//! Form body inspection.

use nozomi_core::DecodedFields;

/// Render the decoded fields of `body` as `key=value` lines sorted by key.
pub fn describe(body: &str) -> String {
    let fields = DecodedFields::decode(body);
    let mut pairs: Vec<_> = fields.iter().collect();
    pairs.sort_unstable_by(|a, b| a.0.cmp(b.0));

    pairs
        .into_iter()
        .map(|(key, value)| format!("{key}={value:?}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_sorts_and_decodes() {
        let output = describe("text=createTestIssue+a+b&team_id=T1&flag");
        assert_eq!(
            output,
            "flag=\"\"\nteam_id=\"T1\"\ntext=\"createTestIssue a b\""
        );
    }

    #[test]
    fn test_describe_empty_body() {
        assert_eq!(describe(""), "");
    }
}
