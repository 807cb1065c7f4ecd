use log::info;
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub mod graph;
pub mod items;

use graph::{build_graph, WorldGraph};
use items::{build_item_name_table, build_item_pool, Item, ItemClassification, GOAL_ITEM_NAME};

/// Per-slot generation parameters, as resolved by the host's options layer.
///
/// Wait times are in seconds. Region and chest counts are capped at 255 by
/// the one-byte packing in the location code address space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldOptions {
    pub seed: u64,
    pub slot_name: String,
    pub num_regions: u8,
    pub min_chests_per_region: u8,
    pub max_chests_per_region: u8,
    pub min_time_between_checks: u16,
    pub max_time_between_checks: u16,
    pub num_goal_items: u16,
}

#[derive(Debug, Error)]
pub enum WorldGenError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, WorldGenError>;

impl WorldOptions {
    /// Check cross-field constraints before anything is generated. Pure;
    /// a failure here means no part of the world has been built.
    pub fn validate(&self) -> Result<()> {
        if self.num_regions == 0 {
            return Err(WorldGenError::Config(
                "num_regions must be at least 1".to_string(),
            ));
        }
        if self.min_chests_per_region == 0 {
            return Err(WorldGenError::Config(
                "min_chests_per_region must be at least 1".to_string(),
            ));
        }
        if self.min_time_between_checks == 0 {
            return Err(WorldGenError::Config(
                "min_time_between_checks must be at least 1 second".to_string(),
            ));
        }
        if self.min_chests_per_region > self.max_chests_per_region {
            return Err(WorldGenError::Config(format!(
                "min_chests_per_region ({}) must be less than or equal to max_chests_per_region ({})",
                self.min_chests_per_region, self.max_chests_per_region
            )));
        }
        if self.min_time_between_checks > self.max_time_between_checks {
            return Err(WorldGenError::Config(format!(
                "min_time_between_checks ({}) must be less than or equal to max_time_between_checks ({})",
                self.min_time_between_checks, self.max_time_between_checks
            )));
        }

        // Every region holds at least min_chests_per_region chests, plus the
        // free chest on the Hub.
        let guaranteed_chests =
            self.num_regions as u32 * self.min_chests_per_region as u32 + 1;
        if self.num_goal_items as u32 > guaranteed_chests {
            return Err(WorldGenError::Config(format!(
                "num_goal_items ({}) exceeds the {} chests guaranteed by {} regions with at least {} chests each",
                self.num_goal_items,
                guaranteed_chests,
                self.num_regions,
                self.min_chests_per_region
            )));
        }

        Ok(())
    }
}

/// Collected-item counts for one slot. The host's reachability solver keeps
/// the authoritative state during fill and play; this mirror exists so
/// access rules and the completion condition can be evaluated in isolation.
#[derive(Debug, Clone, Default)]
pub struct CollectionState {
    counts: HashMap<String, u16>,
}

impl CollectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collect(&mut self, item_name: &str) {
        *self.counts.entry(item_name.to_string()).or_insert(0) += 1;
    }

    pub fn count(&self, item_name: &str) -> u16 {
        self.counts.get(item_name).copied().unwrap_or(0)
    }

    pub fn has(&self, item_name: &str) -> bool {
        self.count(item_name) > 0
    }
}

/// Victory condition for one slot: the goal item collected at least
/// `required_count` times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionCondition {
    pub item: String,
    pub required_count: u16,
}

impl CompletionCondition {
    pub fn is_met(&self, state: &CollectionState) -> bool {
        state.count(&self.item) >= self.required_count
    }
}

/// Run-specific facts handed to the bot client through the host's slot-data
/// channel. Field names are part of the wire format; the client
/// deserializes this record by key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotData {
    pub min_wait_time: u16,
    pub max_wait_time: u16,
    pub num_goal: u16,
    pub slot_name: String,
    pub num_regions: u8,
    pub chests_per_region_list: Vec<u8>,
}

/// Everything the host engine registers for one slot: the region graph with
/// its gated connections, the item pool awaiting fill, the per-world
/// name-to-code tables, the completion condition, and the slot data export.
#[derive(Debug, Clone)]
pub struct GeneratedWorld {
    pub graph: WorldGraph,
    pub item_pool: Vec<Item>,
    pub location_name_to_id: HashMap<String, u32>,
    pub item_name_to_id: HashMap<String, u32>,
    pub completion: CompletionCondition,
    pub slot_data: SlotData,
}

impl GeneratedWorld {
    pub fn location_count(&self) -> usize {
        self.graph.location_count()
    }

    /// Locations the pool does not cover. The pool holds one item per region
    /// chest and nothing for the Hub free chest, so this is always 1; the
    /// host engine's own filler tops up the remainder during fill.
    pub fn unfilled_location_count(&self) -> usize {
        self.location_count() - self.item_pool.len()
    }

    pub fn spoiler_log(&self, options: &WorldOptions) -> String {
        let mut log = format!("APBot world seed: {}\n", options.seed);
        log.push_str(&format!("slot: {}\n", options.slot_name));
        log.push_str(&format!("regions: {}\n", options.num_regions));
        for (i, count) in self.slot_data.chests_per_region_list.iter().enumerate() {
            log.push_str(&format!("  Region {}: {} chests\n", i + 1, count));
        }

        let keys = self
            .item_pool
            .iter()
            .filter(|item| item.classification == ItemClassification::Progression)
            .filter(|item| item.name != self.completion.item)
            .count();
        let goals = self
            .item_pool
            .iter()
            .filter(|item| item.name == self.completion.item)
            .count();
        let junk = self
            .item_pool
            .iter()
            .filter(|item| item.classification == ItemClassification::Filler)
            .count();
        log.push_str(&format!(
            "item pool: {} (keys: {}, goal: {}, junk: {})\n",
            self.item_pool.len(),
            keys,
            goals,
            junk
        ));
        log.push_str(&format!(
            "locations: {} (left to host filler: {})\n",
            self.location_count(),
            self.unfilled_location_count()
        ));
        log.push_str(&format!(
            "completion: {} x{}\n",
            self.completion.item, self.completion.required_count
        ));
        log
    }
}

/// Generate one slot's world from validated options.
///
/// Deterministic for a fixed `options.seed`: the per-region chest draw is the
/// only RNG consumer.
pub fn generate(options: &WorldOptions) -> Result<GeneratedWorld> {
    options.validate()?;

    let mut rng = StdRng::seed_from_u64(options.seed);
    let (graph, chest_counts) = build_graph(
        options.num_regions,
        options.min_chests_per_region,
        options.max_chests_per_region,
        &mut rng,
    );

    let item_pool = build_item_pool(&chest_counts, options.num_goal_items)?;

    info!(
        "generated {} regions, {} locations, {} pool items for slot '{}'",
        options.num_regions,
        graph.location_count(),
        item_pool.len(),
        options.slot_name
    );

    let location_name_to_id = graph.location_name_to_id();
    let item_name_to_id = build_item_name_table(options.num_regions);

    let completion = CompletionCondition {
        item: GOAL_ITEM_NAME.to_string(),
        required_count: options.num_goal_items,
    };

    let slot_data = SlotData {
        min_wait_time: options.min_time_between_checks,
        max_wait_time: options.max_time_between_checks,
        num_goal: options.num_goal_items,
        slot_name: options.slot_name.clone(),
        num_regions: options.num_regions,
        chests_per_region_list: chest_counts,
    };

    Ok(GeneratedWorld {
        graph,
        item_pool,
        location_name_to_id,
        item_name_to_id,
        completion,
        slot_data,
    })
}

/// Generate a world and write its exports under `output_dir`: the slot data
/// JSON the bot client consumes, and a spoiler log when `debug` is set.
pub fn run(options: &WorldOptions, output_dir: &Path, debug: bool) -> Result<()> {
    let world = generate(options)?;

    fs::create_dir_all(output_dir)?;

    let slot_data_path = output_dir.join("slot_data.json");
    let json = serde_json::to_string_pretty(&world.slot_data)?;
    fs::write(&slot_data_path, json)?;
    info!("slot data written to {}", slot_data_path.display());

    if debug {
        let log_path = output_dir.join("spoiler_log.txt");
        fs::write(log_path, world.spoiler_log(options))?;
    }

    Ok(())
}
