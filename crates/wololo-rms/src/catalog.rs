use crate::{Terrain, TerrainGroup};
use std::collections::BTreeMap;

/// How one HD Edition terrain is mapped onto a WololoKingdoms terrain slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementRule {
    /// Name of the terrain graphic to install in the chosen slot.
    pub slp_name: String,
    /// Spellings of the constant that map scripts use for this terrain.
    pub const_names: Vec<String>,
    /// Canonical constant name, used for the alias when the preferred slot is taken.
    pub replaced_name: String,
    /// HD Edition terrain code.
    pub old_terrain: Terrain,
    /// Preferred WololoKingdoms terrain code.
    pub new_terrain: Terrain,
    /// Which slots may be used instead of `new_terrain`.
    pub group: TerrainGroup,
}

impl ReplacementRule {
    fn new(
        slp_name: &str,
        const_names: &[&str],
        replaced_name: &str,
        old_terrain: Terrain,
        new_terrain: Terrain,
        group: TerrainGroup,
    ) -> Self {
        Self {
            slp_name: slp_name.to_string(),
            const_names: const_names.iter().map(|name| name.to_string()).collect(),
            replaced_name: replaced_name.to_string(),
            old_terrain,
            new_terrain,
            group,
        }
    }
}

/// A terrain slot in a group, and the constant map scripts use to refer to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMember {
    /// The terrain code.
    pub terrain: Terrain,
    /// The standard constant name for the terrain.
    pub const_name: String,
}

/// Everything the map converter needs to know about terrains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerrainCatalog {
    /// Replacement rules, in the order they are applied.
    pub rules: Vec<ReplacementRule>,
    /// Slots per group, in the order the fallback search tries them.
    pub groups: BTreeMap<TerrainGroup, Vec<GroupMember>>,
    /// Graphic file name for each terrain slot.
    pub images: BTreeMap<Terrain, String>,
    /// Graphics that always come along when the desert 2 slot is used.
    pub desert2_images: Vec<String>,
}

impl Default for TerrainCatalog {
    fn default() -> Self {
        use TerrainGroup::*;
        let rules = vec![
            ReplacementRule::new(
                "DRAGONFOREST.slp",
                &["DRAGONFORES", "DRAGONFOREST"],
                "DRAGONFOREST",
                Terrain::DRAGON_FOREST,
                Terrain::SNOW_FOREST,
                Forest,
            ),
            ReplacementRule::new(
                "ACACIA_FOREST.slp",
                &["ACCACIA_FOREST", "ACACIA_FOREST", "ACACIAFORES"],
                "ACACIA_FOREST",
                Terrain::ACACIA_FOREST,
                Terrain::SAVANNAH,
                None,
            ),
            ReplacementRule::new(
                "DLC_RAINFOREST.slp",
                &["DLC_RAINFOREST"],
                "DLC_RAINFOREST",
                Terrain::RAINFOREST,
                Terrain::FOREST,
                Forest,
            ),
            ReplacementRule::new(
                "BAOBAB.slp",
                &["BAOBABS", "BAOBAB_FOREST"],
                "BAOBAB_FOREST",
                Terrain::BAOBAB_FOREST,
                Terrain::IMPASSABLE_CLIFF_GRASS,
                None,
            ),
            ReplacementRule::new(
                "DLC_MANGROVESHALLOW.slp",
                &["DLC_MANGROVESHALLOW"],
                "DLC_MANGROVESHALLOW",
                Terrain::MANGROVE_SHALLOW,
                Terrain::DESERT2,
                None,
            ),
            ReplacementRule::new(
                "DLC_MANGROVEFOREST.slp",
                &["DLC_MANGROVEFOREST"],
                "DLC_MANGROVEFOREST",
                Terrain::MANGROVE_FOREST,
                Terrain::OAK_FOREST,
                None,
            ),
            ReplacementRule::new(
                "DLC_NEWSHALLOW.slp",
                &["DLC_NEWSHALLOW"],
                "DLC_NEWSHALLOW",
                Terrain::SHALLOWS_AZURE,
                Terrain::WALKABLE_SHALLOWS,
                Fixed,
            ),
            ReplacementRule::new(
                "SAVANNAH.slp",
                &["SAVANNAH", "DLC_SAVANNAH"],
                "SAVANNAH",
                Terrain::SAVANNAH,
                Terrain::SAND,
                Land,
            ),
            ReplacementRule::new(
                "DIRT4.slp",
                &["DIRT4", "DLC_DIRT4"],
                "DIRT4",
                Terrain::DIRT4,
                Terrain::DESERT3,
                Land,
            ),
            ReplacementRule::new(
                "MOORLAND.slp",
                &["DLC_MOORLAND", "MOORLAND"],
                "DLC_MOORLAND",
                Terrain::MOORLAND,
                Terrain::GRASS3,
                Land,
            ),
            ReplacementRule::new(
                "CRACKEDIT.slp",
                &["CRACKEDIT"],
                "CRACKEDIT",
                Terrain::CRACKED,
                Terrain::SNOW_ROAD,
                None,
            ),
            ReplacementRule::new(
                "QUICKSAND.slp",
                &["QUICKSAND", "DLC_QUICKSAND"],
                "QUICKSAND",
                Terrain::QUICKSAND,
                Terrain::UNBUILDABLE_ROCK,
                Fixed,
            ),
            ReplacementRule::new(
                "BLACK.slp",
                &["BLACK", "DLC_BLACK"],
                "DLC_BLACK",
                Terrain::BLACK,
                Terrain::UNBUILDABLE_ROCK,
                Fixed,
            ),
            ReplacementRule::new(
                "DLC_BEACH2.slp",
                &["DLC_BEACH2"],
                "DLC_BEACH2",
                Terrain::BEACH2,
                Terrain::BEACH,
                Fixed,
            ),
            ReplacementRule::new(
                "DLC_BEACH3.slp",
                &["DLC_BEACH3"],
                "DLC_BEACH3",
                Terrain::BEACH3,
                Terrain::BEACH,
                Fixed,
            ),
            ReplacementRule::new(
                "DLC_BEACH4.slp",
                &["DLC_BEACH4"],
                "DLC_BEACH4",
                Terrain::BEACH4,
                Terrain::BEACH,
                Fixed,
            ),
            ReplacementRule::new(
                "DLC_DRYROAD.slp",
                &["DLC_DRYROAD"],
                "DLC_DRYROAD",
                Terrain::DESERT_ROAD,
                Terrain::ROAD2,
                Land,
            ),
            ReplacementRule::new(
                "DLC_WATER4.slp",
                &["DLC_WATER4"],
                "DLC_WATER4",
                Terrain::WATER_DEEP_OCEAN,
                Terrain::WATER_DEEP,
                Water,
            ),
            ReplacementRule::new(
                "DLC_WATER5.slp",
                &["DLC_WATER5"],
                "DLC_WATER5",
                Terrain::WATER_AZURE,
                Terrain::WATER_SHALLOW,
                Water,
            ),
            ReplacementRule::new(
                "DLC_JUNGLELEAVES.slp",
                &["DLC_JUNGLELEAVES"],
                "DLC_JUNGLELEAVES",
                Terrain::LEAVES_JUNGLE,
                Terrain::LEAVES,
                Land,
            ),
            ReplacementRule::new(
                "DLC_JUNGLEROAD.slp",
                &["DLC_JUNGLEROAD"],
                "DLC_JUNGLEROAD",
                Terrain::ROAD_JUNGLE,
                Terrain::FUNGUS_ROAD,
                Land,
            ),
            ReplacementRule::new(
                "DLC_JUNGLEGRASS.slp",
                &["DLC_JUNGLEGRASS"],
                "DLC_JUNGLEGRASS",
                Terrain::GRASS_JUNGLE,
                Terrain::GRASS2,
                Land,
            ),
        ];

        let members = |list: &[(Terrain, &str)]| {
            list.iter()
                .map(|(terrain, const_name)| GroupMember {
                    terrain: *terrain,
                    const_name: const_name.to_string(),
                })
                .collect::<Vec<_>>()
        };
        let groups = [
            (
                Water,
                members(&[
                    (Terrain::WATER_DEEP, "DEEP_WATER"),
                    (Terrain::WATER_NORMAL, "MED_WATER"),
                ]),
            ),
            (
                Land,
                members(&[
                    (Terrain::GRASS, "GRASS"),
                    (Terrain::DESERT3, "DIRT3"),
                    (Terrain::DESERT, "DIRT1"),
                    (Terrain::GRASS3, "GRASS3"),
                    (Terrain::GRASS2, "GRASS2"),
                    (Terrain::SAND, "DESERT"),
                    (Terrain::ROAD, "ROAD"),
                    (Terrain::ROAD2, "ROAD2"),
                    (Terrain::FUNGUS_ROAD, "ROAD3"),
                ]),
            ),
            (
                Forest,
                members(&[
                    (Terrain::FOREST, "FOREST"),
                    (Terrain::PALM_DESERT, "PALM_DESERT"),
                    (Terrain::SNOW_FOREST, "SNOW_FOREST"),
                ]),
            ),
            (
                Unbuildable,
                members(&[
                    (Terrain::ICE2, "ICE"),
                    (Terrain::UNBUILDABLE_ROCK, "DLC_ROCK"),
                ]),
            ),
        ]
        .into_iter()
        .collect();

        let images = [
            (Terrain::GRASS, "15001.slp"),
            (Terrain::WATER_SHALLOW, "15002.slp"),
            (Terrain::BEACH, "15017.slp"),
            (Terrain::DESERT3, "15007.slp"),
            (Terrain::WALKABLE_SHALLOWS, "15014.slp"),
            (Terrain::LEAVES, "15011.slp"),
            (Terrain::DESERT, "15014.slp"),
            (Terrain::GRASS3, "15009.slp"),
            (Terrain::FOREST, "15011.slp"),
            (Terrain::GRASS2, "15008.slp"),
            (Terrain::PALM_DESERT, "15010.slp"),
            (Terrain::SAND, "15010.slp"),
            (Terrain::SNOW_FOREST, "15029.slp"),
            (Terrain::WATER_DEEP, "15015.slp"),
            (Terrain::WATER_NORMAL, "15016.slp"),
            (Terrain::ROAD, "15018.slp"),
            (Terrain::ROAD2, "15019.slp"),
            (Terrain::ICE2, "15024.slp"),
            (Terrain::FUNGUS_ROAD, "15031.slp"),
            (Terrain::UNBUILDABLE_ROCK, "15033.slp"),
        ]
        .iter()
        .map(|(terrain, name)| (*terrain, name.to_string()))
        .collect();

        let desert2_images = ["15004.slp", "15005.slp", "15021.slp", "15022.slp", "15023.slp"]
            .iter()
            .map(|name| name.to_string())
            .collect();

        Self {
            rules,
            groups,
            images,
            desert2_images,
        }
    }
}

impl TerrainCatalog {
    /// The slots of a group, in fallback order.
    pub fn group_members(&self, group: TerrainGroup) -> &[GroupMember] {
        self.groups.get(&group).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The standard constant name of a terrain that belongs to a group.
    pub fn group_const_name(&self, terrain: Terrain) -> Option<&str> {
        self.groups
            .values()
            .flatten()
            .find(|member| member.terrain == terrain)
            .map(|member| member.const_name.as_str())
    }

    /// The graphic file name for a terrain slot.
    pub fn image_name(&self, terrain: Terrain) -> Option<&str> {
        self.images.get(&terrain).map(String::as_str)
    }
}
