use std::collections::HashMap;

use crate::{Result, WorldGenError};

// Junk Item
pub const JUNK_ITEM_CODE: u32 = 0x000000;
pub const JUNK_ITEM_NAME: &str = "APBot Junk";

// Goal Item
pub const GOAL_ITEM_CODE: u32 = 0x010000;
pub const GOAL_ITEM_NAME: &str = "Magic Crystal";

// Key ID offset
pub const KEY_CODE_OFFSET: u32 = 0x020000;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ItemClassification {
    /// Required for logical completion; fill must keep it reachable.
    Progression,
    /// Fungible padding with no logical weight.
    Filler,
}

/// A collectible. Goal and junk entries in the pool are plain copies sharing
/// one (name, code) pair; keys are distinct per region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item {
    pub name: String,
    pub code: u32,
    pub classification: ItemClassification,
}

pub fn key_name(region: u8) -> String {
    format!("Key {region}")
}

pub fn key_code(region: u8) -> u32 {
    KEY_CODE_OFFSET + region as u32
}

fn key_item(region: u8) -> Item {
    Item {
        name: key_name(region),
        code: key_code(region),
        classification: ItemClassification::Progression,
    }
}

fn goal_item() -> Item {
    Item {
        name: GOAL_ITEM_NAME.to_string(),
        code: GOAL_ITEM_CODE,
        classification: ItemClassification::Progression,
    }
}

fn junk_item() -> Item {
    Item {
        name: JUNK_ITEM_NAME.to_string(),
        code: JUNK_ITEM_CODE,
        classification: ItemClassification::Filler,
    }
}

/// Build the flat item pool matching a generated set of chest counts: one
/// key per region, the requested goal items, and junk for the rest.
///
/// Each region contributes `count - 1` junk-capacity slots; the slot its
/// key occupies logically and the Hub free chest are excluded, which leaves
/// the pool one item short of the location count. The host engine's filler
/// covers that last location. Validation already bounds `num_goal_items`
/// against the guaranteed minimum, but the chest counts are random, so the
/// capacity is re-checked against the counts actually drawn.
pub fn build_item_pool(chest_counts: &[u8], num_goal_items: u16) -> Result<Vec<Item>> {
    let total_junk_slots: u32 = chest_counts.iter().map(|&c| c as u32 - 1).sum();
    if num_goal_items as u32 > total_junk_slots {
        return Err(WorldGenError::Config(format!(
            "num_goal_items ({}) exceeds the {} junk slots left by the generated chests",
            num_goal_items, total_junk_slots
        )));
    }

    let mut pool = Vec::with_capacity(chest_counts.iter().map(|&c| c as usize).sum());

    for region_num in 1..=chest_counts.len() as u8 {
        pool.push(key_item(region_num));
    }

    for _ in 0..num_goal_items {
        pool.push(goal_item());
    }

    for _ in 0..(total_junk_slots - num_goal_items as u32) {
        pool.push(junk_item());
    }

    Ok(pool)
}

/// The item name-to-code table for one world. Built per generation rather
/// than as a process-wide static so concurrent slots cannot observe each
/// other's tables. Goal and junk names are always registered, even when
/// zero copies of either land in the pool.
pub fn build_item_name_table(num_regions: u8) -> HashMap<String, u32> {
    let mut table = HashMap::new();
    for region_num in 1..=num_regions {
        table.insert(key_name(region_num), key_code(region_num));
    }
    table.insert(GOAL_ITEM_NAME.to_string(), GOAL_ITEM_CODE);
    table.insert(JUNK_ITEM_NAME.to_string(), JUNK_ITEM_CODE);
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_codes_follow_the_region_index() {
        assert_eq!(key_code(1), 0x020001);
        assert_eq!(key_code(255), 0x0200FF);
        assert_eq!(key_name(7), "Key 7");
    }

    #[test]
    fn pool_matches_the_worked_example() {
        // Two regions with three chests each and one goal item.
        let pool = build_item_pool(&[3, 3], 1).unwrap();
        assert_eq!(pool.len(), 6);

        let keys: Vec<&Item> = pool.iter().filter(|i| i.name.starts_with("Key ")).collect();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].code, 0x020001);
        assert_eq!(keys[1].code, 0x020002);
        for key in keys {
            assert_eq!(key.classification, ItemClassification::Progression);
        }

        assert_eq!(pool.iter().filter(|i| i.name == GOAL_ITEM_NAME).count(), 1);
        assert_eq!(pool.iter().filter(|i| i.name == JUNK_ITEM_NAME).count(), 3);
    }

    #[test]
    fn pool_size_equals_total_chest_count() {
        let counts = [4u8, 1, 7, 2];
        let pool = build_item_pool(&counts, 2).unwrap();
        let total: usize = counts.iter().map(|&c| c as usize).sum();
        assert_eq!(pool.len(), total);
    }

    #[test]
    fn goal_items_beyond_junk_capacity_are_rejected() {
        // Single-chest regions leave no junk slots at all.
        let err = build_item_pool(&[1, 1], 1).unwrap_err();
        assert!(err.to_string().contains("junk slots"));

        // Filling capacity exactly is fine and leaves zero junk.
        let pool = build_item_pool(&[2, 2], 2).unwrap();
        assert_eq!(pool.iter().filter(|i| i.name == JUNK_ITEM_NAME).count(), 0);
    }

    #[test]
    fn junk_is_filler_and_keys_are_progression() {
        let pool = build_item_pool(&[3], 0).unwrap();
        for item in &pool {
            let expected = if item.name == JUNK_ITEM_NAME {
                ItemClassification::Filler
            } else {
                ItemClassification::Progression
            };
            assert_eq!(item.classification, expected);
        }
    }

    #[test]
    fn name_table_always_registers_goal_and_junk() {
        let table = build_item_name_table(2);
        assert_eq!(table.len(), 4);
        assert_eq!(table["Key 1"], 0x020001);
        assert_eq!(table["Key 2"], 0x020002);
        assert_eq!(table[GOAL_ITEM_NAME], GOAL_ITEM_CODE);
        assert_eq!(table[JUNK_ITEM_NAME], JUNK_ITEM_CODE);
    }
}
