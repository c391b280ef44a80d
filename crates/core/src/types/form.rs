//! Form-encoded body decoding.
//!
//! Slack delivers slash commands and interactions as
//! `application/x-www-form-urlencoded` bodies. Decoding is deliberately
//! permissive: it never fails, and a value that cannot be percent-decoded
//! into UTF-8 is passed through exactly as it arrived.

use std::collections::HashMap;
use std::collections::hash_map;

/// Fields decoded from a form-encoded request body.
///
/// Keys are unique; a key repeated in the body keeps its last value.
///
/// ## Examples
///
/// ```
/// use nozomi_core::DecodedFields;
///
/// let fields = DecodedFields::decode("team_id=T1&text=echo+hello%21&flag");
/// assert_eq!(fields.get("team_id"), Some("T1"));
/// assert_eq!(fields.get("text"), Some("echo hello!"));
/// assert_eq!(fields.get("flag"), Some(""));
/// assert_eq!(fields.get("missing"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedFields(HashMap<String, String>);

impl DecodedFields {
    /// Decode an ampersand-joined `key=value` body.
    ///
    /// - Each pair splits on its first `=`; a pair without `=` maps to `""`.
    /// - Values are percent-decoded (with `+` as space); keys are not.
    /// - Later duplicates overwrite earlier ones.
    #[must_use]
    pub fn decode(raw: &str) -> Self {
        let mut fields = HashMap::new();

        for pair in raw.split('&') {
            let (key, value) = match pair.split_once('=') {
                Some((key, value)) => (key, decode_value(value)),
                None => (pair, String::new()),
            };
            fields.insert(key.to_owned(), value);
        }

        Self(fields)
    }

    /// Get a field value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Get a field value, treating a missing field as empty.
    #[must_use]
    pub fn get_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or_default()
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no keys were decoded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(key, value)` pairs in no particular order.
    pub fn iter(&self) -> hash_map::Iter<'_, String, String> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a DecodedFields {
    type Item = (&'a String, &'a String);
    type IntoIter = hash_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, String)> for DecodedFields {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Decode a form body into its fields.
///
/// Shorthand for [`DecodedFields::decode`].
#[must_use]
pub fn decode(raw: &str) -> DecodedFields {
    DecodedFields::decode(raw)
}

/// Percent-decode a single form value, falling back to the raw input.
fn decode_value(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced).map_or_else(|_| raw.to_owned(), |decoded| decoded.into_owned())
}
