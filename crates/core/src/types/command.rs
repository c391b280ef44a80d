//! Command view over decoded slash-command fields.

use super::form::DecodedFields;

/// A parsed `/nozomi <keyword> <remainder>` invocation.
///
/// ## Examples
///
/// ```
/// use nozomi_core::{CommandInvocation, DecodedFields};
///
/// let fields = DecodedFields::decode("team_id=T1&text=echo+hello+world");
/// let invocation = CommandInvocation::from_fields(&fields);
/// assert_eq!(invocation.keyword, "echo");
/// assert_eq!(invocation.remainder, "hello world");
/// assert_eq!(invocation.team_id, "T1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandInvocation {
    /// First space-delimited token of `text`.
    pub keyword: String,
    /// Everything after the first space, or `""` if there is none.
    pub remainder: String,
    /// The `team_id` field.
    pub team_id: String,
}

impl CommandInvocation {
    /// Build the invocation from the `text` and `team_id` fields.
    ///
    /// Missing fields are treated as empty.
    #[must_use]
    pub fn from_fields(fields: &DecodedFields) -> Self {
        let (keyword, remainder) = split_first_space(fields.get_or_empty("text"));
        Self {
            keyword: keyword.to_owned(),
            remainder: remainder.to_owned(),
            team_id: fields.get_or_empty("team_id").to_owned(),
        }
    }
}

/// Split on the first ASCII space; the second half is `""` when there is none.
#[must_use]
pub fn split_first_space(text: &str) -> (&str, &str) {
    text.split_once(' ').unwrap_or((text, ""))
}
