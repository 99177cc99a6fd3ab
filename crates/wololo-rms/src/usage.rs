use crate::text::contains_word;
use crate::{Terrain, TerrainCatalog};

/// Rice farm slots, never used by map scripts, hold memoised lookups.
const FOREST_CHECKED: usize = 63;
const FOREST_USED: usize = 64;
const DESERT_CHECKED: usize = 65;
const DESERT_USED: usize = 66;
const WATER_CHECKED: usize = 67;
const WATER_MULTIPLE: usize = 68;

/// Forest and leaves share a graphic, as do palm desert and sand.
const FOREST_WORDS: &[&str] = &["PINE_FOREST", "LEAVES", "JUNGLE", "BAMBOO", "FOREST"];
const DESERT_WORDS: &[&str] = &["PALM_DESERT", "DESERT"];
const WATER_WORDS: &[&str] = &["WATER", "MED_WATER", "DEEP_WATER", "DLC_WATER4", "DLC_WATER5"];

/// Which terrain slots are taken while converting a single map script.
#[derive(Clone)]
pub struct TerrainUsage {
    used: [bool; 256],
}

impl Default for TerrainUsage {
    fn default() -> Self {
        Self { used: [false; 256] }
    }
}

impl std::fmt::Debug for TerrainUsage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set()
            .entries(
                self.used
                    .iter()
                    .enumerate()
                    .filter(|(_, used)| **used)
                    .map(|(code, _)| code),
            )
            .finish()
    }
}

impl TerrainUsage {
    /// Create a usage set with nothing marked.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a slot was marked as used.
    #[inline]
    pub fn is_used(&self, terrain: Terrain) -> bool {
        self.used[usize::from(terrain)]
    }

    /// Mark a slot as used.
    #[inline]
    pub fn mark(&mut self, terrain: Terrain) {
        self.used[usize::from(terrain)] = true;
    }

    /// Mark a slot as taken by a replacement.
    ///
    /// Taking one slot of a pair that shares a graphic takes the other one too.
    pub fn claim(&mut self, terrain: Terrain) {
        self.mark(terrain);
        match terrain {
            Terrain::LEAVES | Terrain::FOREST => {
                self.used[FOREST_CHECKED] = true;
                self.used[FOREST_USED] = true;
            }
            Terrain::PALM_DESERT | Terrain::SAND => {
                self.used[DESERT_CHECKED] = true;
                self.used[DESERT_USED] = true;
            }
            _ => {}
        }
    }

    fn memoised(&mut self, checked: usize, result: usize, test: impl FnOnce() -> bool) -> bool {
        if !self.used[checked] {
            self.used[checked] = true;
            self.used[result] = test();
        }
        self.used[result]
    }

    /// Check if the script itself uses a terrain slot, through its standard constant.
    ///
    /// Slots that share a graphic are tested together, and the result is remembered.
    pub fn script_uses(&mut self, terrain: Terrain, script: &str, catalog: &TerrainCatalog) -> bool {
        match terrain {
            Terrain::LEAVES | Terrain::FOREST => self.memoised(FOREST_CHECKED, FOREST_USED, || {
                FOREST_WORDS.iter().any(|word| contains_word(script, word))
            }),
            Terrain::PALM_DESERT | Terrain::SAND => {
                self.memoised(DESERT_CHECKED, DESERT_USED, || {
                    DESERT_WORDS.iter().any(|word| contains_word(script, word))
                })
            }
            _ => catalog
                .group_const_name(terrain)
                .map_or(false, |name| contains_word(script, name)),
        }
    }

    /// Check if the script uses more than one kind of water.
    pub fn uses_multiple_water(&mut self, script: &str) -> bool {
        self.memoised(WATER_CHECKED, WATER_MULTIPLE, || {
            WATER_WORDS
                .iter()
                .filter(|word| contains_word(script, word))
                .count()
                > 1
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_slots_are_tested_together() {
        let catalog = TerrainCatalog::default();
        let mut usage = TerrainUsage::new();
        let script = "create_land { terrain_type LEAVES }\n";
        assert!(usage.script_uses(Terrain::FOREST, script, &catalog));
        assert!(usage.script_uses(Terrain::LEAVES, "", &catalog));
        assert!(!usage.script_uses(Terrain::SAND, script, &catalog));
        // The desert answer is remembered too.
        assert!(!usage.script_uses(Terrain::PALM_DESERT, " DESERT ", &catalog));
    }

    #[test]
    fn claiming_one_of_a_pair_takes_both() {
        let catalog = TerrainCatalog::default();
        let mut usage = TerrainUsage::new();
        usage.claim(Terrain::SAND);
        assert!(usage.is_used(Terrain::SAND));
        assert!(!usage.is_used(Terrain::PALM_DESERT));
        assert!(usage.script_uses(Terrain::PALM_DESERT, "", &catalog));
    }

    #[test]
    fn group_constants() {
        let catalog = TerrainCatalog::default();
        let mut usage = TerrainUsage::new();
        assert!(usage.script_uses(Terrain::DESERT3, " DIRT3 ", &catalog));
        assert!(!usage.script_uses(Terrain::DESERT3, " DIRT4 ", &catalog));
        assert!(!usage.script_uses(Terrain::WATER_SHALLOW, " WATER ", &catalog));
        assert!(!usage.is_used(Terrain::DESERT3));
    }

    #[test]
    fn multiple_water() {
        let mut usage = TerrainUsage::new();
        assert!(!usage.uses_multiple_water(" DLC_WATER5 \n"));
        let mut usage = TerrainUsage::new();
        assert!(usage.uses_multiple_water(" DLC_WATER4 DEEP_WATER \n"));
    }
}
