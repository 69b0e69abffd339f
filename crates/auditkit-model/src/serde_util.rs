//! Serde helpers for the stored JSON layout
//!
//! Older writers emitted `null` where a list was never touched; a strict
//! `Vec` field would refuse the whole document over it.

use serde::{Deserialize, Deserializer};

/// Deserialize `null` (or an absent value routed here via `default`) as the
/// type's default instead of an error.
pub(crate) fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Doc {
        #[serde(default, deserialize_with = "super::null_to_default")]
        items: Vec<u32>,
    }

    #[test]
    fn null_list_reads_as_empty() {
        let doc: Doc = serde_json::from_str(r#"{"items": null}"#).unwrap();
        assert!(doc.items.is_empty());
    }

    #[test]
    fn absent_list_reads_as_empty() {
        let doc: Doc = serde_json::from_str("{}").unwrap();
        assert!(doc.items.is_empty());
    }

    #[test]
    fn present_list_reads_through() {
        let doc: Doc = serde_json::from_str(r#"{"items": [3]}"#).unwrap();
        assert_eq!(doc.items, vec![3]);
    }
}
