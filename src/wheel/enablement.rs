use super::item::Item;
use std::collections::BTreeMap;

/// Per-item inclusion flags. Missing entries count as included.
pub type EnablementMap = BTreeMap<Item, bool>;

pub fn is_enabled(map: &EnablementMap, item: &Item) -> bool {
    map.get(item).copied().unwrap_or(true)
}

/// Builds the map for a fresh session: persisted decisions win, everything else
/// defaults to included. Persisted entries for unknown items are dropped.
pub fn initialize(items: &[Item], persisted: Option<&EnablementMap>) -> EnablementMap {
    match persisted {
        Some(map) => project(items, map),
        None => items.iter().map(|item| (item.clone(), true)).collect(),
    }
}

/// Re-keys `current` onto `items` after the list changed.
pub fn resync(items: &[Item], current: &EnablementMap) -> EnablementMap {
    project(items, current)
}

fn project(items: &[Item], source: &EnablementMap) -> EnablementMap {
    items
        .iter()
        .map(|item| (item.clone(), is_enabled(source, item)))
        .collect()
}

/// Flips `target`. Rejected while a spin is in flight, and for labels that are
/// not on the wheel.
pub fn toggle(
    items: &[Item],
    current: &EnablementMap,
    target: &Item,
    spinning: bool,
) -> EnablementMap {
    if spinning || !items.contains(target) {
        return current.clone();
    }
    let mut next = current.clone();
    next.insert(target.clone(), !is_enabled(current, target));
    next
}

pub fn active_items(items: &[Item], map: &EnablementMap) -> Vec<Item> {
    items
        .iter()
        .filter(|item| is_enabled(map, item))
        .cloned()
        .collect()
}
