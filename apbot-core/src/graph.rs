use rand::Rng;
use std::collections::HashMap;

use crate::items::key_name;
use crate::CollectionState;

pub const MENU_REGION_NAME: &str = "Menu";
pub const HUB_REGION_NAME: &str = "Hub";

pub const CHEST_CODE_OFFSET: u32 = 0x030000;
pub const HUB_CHEST_CODE: u32 = CHEST_CODE_OFFSET + 1;
pub const HUB_CHEST_NAME: &str = "Hub Free Chest";

pub type RegionId = usize;

/// A reward slot the host's fill stage assigns exactly one item to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub name: String,
    pub code: u32,
}

#[derive(Debug, Clone)]
pub struct Region {
    pub name: String,
    pub locations: Vec<Location>,
}

/// Gate on a connection, evaluated lazily by the host's reachability solver.
///
/// `RequiresItem` owns its item name outright: the gate for each region is
/// given that region's key at connection-creation time, so no gate can end
/// up checking a later region's key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessRule {
    Open,
    RequiresItem { item: String },
}

impl AccessRule {
    pub fn is_satisfied(&self, state: &CollectionState) -> bool {
        match self {
            AccessRule::Open => true,
            AccessRule::RequiresItem { item } => state.has(item),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Connection {
    pub source: RegionId,
    pub target: RegionId,
    pub rule: AccessRule,
}

/// The world graph for one slot: Menu, Hub, and the keyed spoke regions.
/// Built once per generation and not mutated afterwards.
#[derive(Debug, Clone)]
pub struct WorldGraph {
    pub regions: Vec<Region>,
    pub connections: Vec<Connection>,
}

impl WorldGraph {
    pub fn region_id(&self, name: &str) -> Option<RegionId> {
        self.regions.iter().position(|r| r.name == name)
    }

    /// The single inbound connection of a region, if any. Menu has none;
    /// every other region has exactly one in the star topology.
    pub fn connection_into(&self, target: RegionId) -> Option<&Connection> {
        self.connections.iter().find(|c| c.target == target)
    }

    pub fn location_count(&self) -> usize {
        self.regions.iter().map(|r| r.locations.len()).sum()
    }

    pub fn location_name_to_id(&self) -> HashMap<String, u32> {
        self.regions
            .iter()
            .flat_map(|r| r.locations.iter())
            .map(|l| (l.name.clone(), l.code))
            .collect()
    }
}

pub fn region_name(region: u8) -> String {
    format!("Region {region}")
}

pub fn chest_name(region: u8, chest: u8) -> String {
    format!("Chest {region}-{chest}")
}

/// Pack a region index and chest index (both 1-based, at most 255) into the
/// chest location address space.
pub fn chest_code(region: u8, chest: u8) -> u32 {
    CHEST_CODE_OFFSET + ((region as u32) << 8) + chest as u32
}

/// Build the hub-and-spoke graph for one slot.
///
/// Menu connects to Hub unconditionally; Hub carries the free starting
/// chest; each spoke region is gated behind its own key and holds a chest
/// count drawn from `min_chests..=max_chests`. The draw per region is the
/// only randomness consumed here. Returns the graph together with the
/// per-region chest counts in region order.
pub fn build_graph(
    num_regions: u8,
    min_chests: u8,
    max_chests: u8,
    rng: &mut impl Rng,
) -> (WorldGraph, Vec<u8>) {
    let mut regions = Vec::with_capacity(num_regions as usize + 2);
    let mut connections = Vec::with_capacity(num_regions as usize + 1);

    let menu = regions.len();
    regions.push(Region {
        name: MENU_REGION_NAME.to_string(),
        locations: Vec::new(),
    });

    let hub = regions.len();
    regions.push(Region {
        name: HUB_REGION_NAME.to_string(),
        locations: vec![Location {
            name: HUB_CHEST_NAME.to_string(),
            code: HUB_CHEST_CODE,
        }],
    });

    connections.push(Connection {
        source: menu,
        target: hub,
        rule: AccessRule::Open,
    });

    let mut chest_counts = Vec::with_capacity(num_regions as usize);
    for region_num in 1..=num_regions {
        let num_chests = rng.gen_range(min_chests..=max_chests);

        let mut locations = Vec::with_capacity(num_chests as usize);
        for chest_num in 1..=num_chests {
            locations.push(Location {
                name: chest_name(region_num, chest_num),
                code: chest_code(region_num, chest_num),
            });
        }

        let id = regions.len();
        regions.push(Region {
            name: region_name(region_num),
            locations,
        });

        // Bind this region's key into the gate here, not at evaluation time.
        connections.push(Connection {
            source: hub,
            target: id,
            rule: AccessRule::RequiresItem {
                item: key_name(region_num),
            },
        });

        chest_counts.push(num_chests);
    }

    (WorldGraph { regions, connections }, chest_counts)
}
