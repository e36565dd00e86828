use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};

/// A wheel entry. Identity is the exact label, so duplicate labels share one
/// enablement flag.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    Deref,
    From,
    Into,
    AsRef,
)]
#[serde(transparent)]
pub struct Item(String);

crate::impl_string_newtype!(Item);

impl Item {
    /// Trims `raw` and rejects blank labels.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self::new(trimmed))
    }
}

impl From<&str> for Item {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// One item per line; blank lines are dropped and duplicates kept.
pub fn parse_items(text: &str) -> Vec<Item> {
    text.lines().filter_map(Item::parse).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_items_trims_and_drops_blank_lines() {
        let items = parse_items("  Alice \r\n\nBob\n   \n Carol");
        assert_eq!(
            items,
            vec![Item::from("Alice"), Item::from("Bob"), Item::from("Carol")]
        );
    }

    #[test]
    fn test_parse_items_keeps_duplicates_in_order() {
        let items = parse_items("x\ny\nx");
        assert_eq!(items.len(), 3);
        assert_eq!(items[0], items[2]);
    }

    #[test]
    fn test_parse_items_empty_text() {
        assert!(parse_items("").is_empty());
        assert!(parse_items("\n \r\n").is_empty());
    }

    #[test]
    fn test_item_parse_rejects_blank() {
        assert_eq!(Item::parse("   "), None);
        assert_eq!(Item::parse(" a b ").as_deref().map(String::as_str), Some("a b"));
    }
}
