/// API route handlers
///
/// Organized by resource:
///
/// - `health`: Health check endpoint
/// - `users`: Registration, login, and the current-user endpoint
/// - `boards`: Board CRUD
/// - `columns`: Column CRUD (nested under boards for create/list)
/// - `tasks`: Task CRUD (nested under columns for create/list)

pub mod boards;
pub mod columns;
pub mod health;
pub mod tasks;
pub mod users;

use serde::{Deserialize, Deserializer};

/// Deserializes a field that must distinguish "absent" from "null"
///
/// Used with `#[serde(default, deserialize_with = "present")]` on an
/// `Option<Option<T>>` field: the outer option is `None` when the key is
/// absent, `Some(None)` when the key is present with `null`, and
/// `Some(Some(v))` otherwise. Partial updates rely on this to leave absent
/// fields untouched while allowing `null` to clear nullable columns.
pub(crate) fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Payload {
        #[serde(default, deserialize_with = "present")]
        description: Option<Option<String>>,
    }

    #[test]
    fn test_absent_field() {
        let p: Payload = serde_json::from_str("{}").unwrap();
        assert_eq!(p.description, None);
    }

    #[test]
    fn test_null_field() {
        let p: Payload = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(p.description, Some(None));
    }

    #[test]
    fn test_present_field() {
        let p: Payload = serde_json::from_str(r#"{"description": "hi"}"#).unwrap();
        assert_eq!(p.description, Some(Some("hi".to_string())));
    }
}
