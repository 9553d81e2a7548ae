//! # Biomes
//!
//! Per-column terrain classification. Chunks carry one biome per (x, z)
//! column; snapshots copy that grid so the column filter can be evaluated
//! without touching the live world.

/// Biome types in the world.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Biome {
    /// Deep ocean
    DeepOcean = 0,
    /// Shallow ocean
    Ocean = 1,
    /// Beach/coastline
    Beach = 2,
    /// Plains/grassland
    #[default]
    Plains = 3,
    /// Forest
    Forest = 4,
    /// Dense jungle
    Jungle = 5,
    /// Arid desert
    Desert = 6,
    /// Cold tundra
    Tundra = 7,
    /// Snowy taiga forest
    Taiga = 8,
    /// High mountains
    Mountains = 9,
    /// Snowy peaks
    SnowyPeaks = 10,
    /// Swamp/wetland
    Swamp = 11,
    /// Savanna grassland
    Savanna = 12,
    /// Badlands
    Badlands = 13,
    /// River channel
    River = 14,
    /// Forested hills
    WoodedHills = 15,
    /// Desert hills
    DesertHills = 16,
    /// Gravelly mountains
    GravellyMountains = 17,
}

impl Biome {
    /// Every biome, in declaration order.
    pub const ALL: [Self; 18] = [
        Self::DeepOcean,
        Self::Ocean,
        Self::Beach,
        Self::Plains,
        Self::Forest,
        Self::Jungle,
        Self::Desert,
        Self::Tundra,
        Self::Taiga,
        Self::Mountains,
        Self::SnowyPeaks,
        Self::Swamp,
        Self::Savanna,
        Self::Badlands,
        Self::River,
        Self::WoodedHills,
        Self::DesertHills,
        Self::GravellyMountains,
    ];

    /// Number of biomes; size of a table indexed by [`Biome::index`].
    pub const COUNT: usize = Self::ALL.len();

    /// Index into a table of [`Biome::COUNT`] entries.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Snake-case registry name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::DeepOcean => "deep_ocean",
            Self::Ocean => "ocean",
            Self::Beach => "beach",
            Self::Plains => "plains",
            Self::Forest => "forest",
            Self::Jungle => "jungle",
            Self::Desert => "desert",
            Self::Tundra => "tundra",
            Self::Taiga => "taiga",
            Self::Mountains => "mountains",
            Self::SnowyPeaks => "snowy_peaks",
            Self::Swamp => "swamp",
            Self::Savanna => "savanna",
            Self::Badlands => "badlands",
            Self::River => "river",
            Self::WoodedHills => "wooded_hills",
            Self::DesertHills => "desert_hills",
            Self::GravellyMountains => "gravelly_mountains",
        }
    }
}
