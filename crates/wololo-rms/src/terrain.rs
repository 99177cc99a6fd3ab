use std::fmt;

/// A terrain type code in the WololoKingdoms data files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Terrain(u8);

#[allow(missing_docs)]
impl Terrain {
    pub const GRASS: Terrain = Terrain(0);
    pub const WATER_SHALLOW: Terrain = Terrain(1);
    pub const BEACH: Terrain = Terrain(2);
    pub const DESERT3: Terrain = Terrain(3);
    pub const WALKABLE_SHALLOWS: Terrain = Terrain(4);
    pub const LEAVES: Terrain = Terrain(5);
    pub const DESERT: Terrain = Terrain(6);
    pub const GRASS3: Terrain = Terrain(9);
    pub const FOREST: Terrain = Terrain(10);
    pub const DESERT2: Terrain = Terrain(11);
    pub const GRASS2: Terrain = Terrain(12);
    pub const PALM_DESERT: Terrain = Terrain(13);
    pub const SAND: Terrain = Terrain(14);
    pub const IMPASSABLE_CLIFF_GRASS: Terrain = Terrain(16);
    pub const OAK_FOREST: Terrain = Terrain(20);
    pub const SNOW_FOREST: Terrain = Terrain(21);
    pub const WATER_DEEP: Terrain = Terrain(22);
    pub const WATER_NORMAL: Terrain = Terrain(23);
    pub const ROAD: Terrain = Terrain(24);
    pub const ROAD2: Terrain = Terrain(25);
    pub const ICE2: Terrain = Terrain(35);
    pub const SNOW_ROAD: Terrain = Terrain(38);
    pub const FUNGUS_ROAD: Terrain = Terrain(39);
    pub const UNBUILDABLE_ROCK: Terrain = Terrain(40);
    pub const SAVANNAH: Terrain = Terrain(41);
    pub const DIRT4: Terrain = Terrain(42);
    pub const DESERT_ROAD: Terrain = Terrain(43);
    pub const MOORLAND: Terrain = Terrain(44);
    pub const CRACKED: Terrain = Terrain(45);
    pub const QUICKSAND: Terrain = Terrain(46);
    pub const BLACK: Terrain = Terrain(47);
    pub const DRAGON_FOREST: Terrain = Terrain(48);
    pub const BAOBAB_FOREST: Terrain = Terrain(49);
    pub const ACACIA_FOREST: Terrain = Terrain(50);
    pub const BEACH2: Terrain = Terrain(51);
    pub const BEACH3: Terrain = Terrain(52);
    pub const BEACH4: Terrain = Terrain(53);
    pub const MANGROVE_SHALLOW: Terrain = Terrain(54);
    pub const MANGROVE_FOREST: Terrain = Terrain(55);
    pub const RAINFOREST: Terrain = Terrain(56);
    pub const WATER_DEEP_OCEAN: Terrain = Terrain(57);
    pub const WATER_AZURE: Terrain = Terrain(58);
    pub const SHALLOWS_AZURE: Terrain = Terrain(59);
    pub const GRASS_JUNGLE: Terrain = Terrain(60);
    pub const ROAD_JUNGLE: Terrain = Terrain(61);
    pub const LEAVES_JUNGLE: Terrain = Terrain(62);
}

impl Terrain {
    /// The numeric terrain code.
    #[inline]
    pub const fn code(self) -> u8 {
        self.0
    }
}

impl From<u8> for Terrain {
    fn from(code: u8) -> Self {
        Terrain(code)
    }
}

impl From<Terrain> for u8 {
    fn from(terrain: Terrain) -> Self {
        terrain.0
    }
}

impl From<Terrain> for usize {
    fn from(terrain: Terrain) -> Self {
        terrain.0.into()
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Families of terrains that may stand in for one another when a preferred slot is taken.
///
/// Every group except [`TerrainGroup::None`] and [`TerrainGroup::Fixed`] gets a fallback search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TerrainGroup {
    /// Replaced by a fixed code, and no graphics are added.
    None,
    /// Water terrains.
    Water,
    /// Replaced by a fixed code, with graphics.
    Fixed,
    /// Buildable land terrains.
    Land,
    /// Forest terrains, whose trees are upgraded to match.
    Forest,
    /// Unbuildable land terrains.
    Unbuildable,
}

impl TerrainGroup {
    /// Check if rules in this group look for another slot when their preferred one is in use.
    #[inline]
    pub fn has_fallback(self) -> bool {
        !matches!(self, TerrainGroup::None | TerrainGroup::Fixed)
    }
}
