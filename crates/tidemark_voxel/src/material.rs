//! # Materials and Blocks
//!
//! Every cell of the grid holds a [`Block`]: a [`Material`] plus a 16-bit
//! `meta` word of per-cell extra data. The meta word is opaque to this crate;
//! higher layers reserve individual bits in it (see `tidemark_sealevel::tags`).

/// Block material.
///
/// The enumeration is closed and ordered; [`Material::ALL`] lists every
/// variant so lookup tables can be built once at startup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum Material {
    /// Empty space.
    #[default]
    Air = 0,
    /// Stone.
    Stone = 1,
    /// Dirt.
    Dirt = 2,
    /// Grass-topped dirt (solid).
    GrassBlock = 3,
    /// Sand.
    Sand = 4,
    /// Gravel.
    Gravel = 5,
    /// Bedrock.
    Bedrock = 6,
    /// Log.
    Wood = 7,
    /// Leaves.
    Leaves = 8,
    /// Cobblestone.
    Cobblestone = 9,
    /// Glass.
    Glass = 10,
    /// Snow layer.
    Snow = 11,
    /// Torch.
    Torch = 12,
    /// Water.
    Water = 20,
    /// Lava.
    Lava = 21,
    /// Seagrass.
    Seagrass = 22,
    /// Tall seagrass.
    TallSeagrass = 23,
    /// Kelp tip.
    Kelp = 24,
    /// Kelp stem.
    KelpPlant = 25,
    /// Short grass plant.
    ShortGrass = 40,
    /// Tall grass plant.
    TallGrass = 41,
    /// Fern.
    Fern = 42,
    /// Lily pad.
    LilyPad = 43,
    /// Lilac.
    Lilac = 44,
    /// Sugar cane.
    SugarCane = 45,
    /// Allium.
    Allium = 46,
    /// Vine.
    Vine = 47,
    /// Dandelion.
    Dandelion = 48,
    /// Sunflower.
    Sunflower = 49,
    /// Cornflower.
    Cornflower = 50,
    /// Oak sapling.
    OakSapling = 51,
    /// Birch sapling.
    BirchSapling = 52,
    /// Freshly planted wheat seeds.
    WheatSeeds = 53,
}

impl Material {
    /// Every material, in declaration order.
    pub const ALL: [Self; 33] = [
        Self::Air,
        Self::Stone,
        Self::Dirt,
        Self::GrassBlock,
        Self::Sand,
        Self::Gravel,
        Self::Bedrock,
        Self::Wood,
        Self::Leaves,
        Self::Cobblestone,
        Self::Glass,
        Self::Snow,
        Self::Torch,
        Self::Water,
        Self::Lava,
        Self::Seagrass,
        Self::TallSeagrass,
        Self::Kelp,
        Self::KelpPlant,
        Self::ShortGrass,
        Self::TallGrass,
        Self::Fern,
        Self::LilyPad,
        Self::Lilac,
        Self::SugarCane,
        Self::Allium,
        Self::Vine,
        Self::Dandelion,
        Self::Sunflower,
        Self::Cornflower,
        Self::OakSapling,
        Self::BirchSapling,
        Self::WheatSeeds,
    ];

    /// Size of a table indexed by [`Material::index`].
    pub const TABLE_SIZE: usize = 64;

    /// Stable numeric id.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u16 {
        self as u16
    }

    /// Index into a table of [`Material::TABLE_SIZE`] entries.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Snake-case registry name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Air => "air",
            Self::Stone => "stone",
            Self::Dirt => "dirt",
            Self::GrassBlock => "grass_block",
            Self::Sand => "sand",
            Self::Gravel => "gravel",
            Self::Bedrock => "bedrock",
            Self::Wood => "wood",
            Self::Leaves => "leaves",
            Self::Cobblestone => "cobblestone",
            Self::Glass => "glass",
            Self::Snow => "snow",
            Self::Torch => "torch",
            Self::Water => "water",
            Self::Lava => "lava",
            Self::Seagrass => "seagrass",
            Self::TallSeagrass => "tall_seagrass",
            Self::Kelp => "kelp",
            Self::KelpPlant => "kelp_plant",
            Self::ShortGrass => "short_grass",
            Self::TallGrass => "tall_grass",
            Self::Fern => "fern",
            Self::LilyPad => "lily_pad",
            Self::Lilac => "lilac",
            Self::SugarCane => "sugar_cane",
            Self::Allium => "allium",
            Self::Vine => "vine",
            Self::Dandelion => "dandelion",
            Self::Sunflower => "sunflower",
            Self::Cornflower => "cornflower",
            Self::OakSapling => "oak_sapling",
            Self::BirchSapling => "birch_sapling",
            Self::WheatSeeds => "wheat_seeds",
        }
    }

    /// Looks a material up by registry name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| m.name() == name)
    }

    /// Returns true for liquid materials.
    #[inline]
    #[must_use]
    pub const fn is_liquid(self) -> bool {
        matches!(self, Self::Water | Self::Lava)
    }
}

/// A single block in the world.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Block {
    /// Block material.
    pub material: Material,
    /// Per-cell extra data. Bits are allocated by the layers that use them.
    pub meta: u16,
}

impl Block {
    /// Air block (empty).
    pub const AIR: Self = Self::new(Material::Air);
    /// Stone block.
    pub const STONE: Self = Self::new(Material::Stone);
    /// Dirt block.
    pub const DIRT: Self = Self::new(Material::Dirt);
    /// Grass block.
    pub const GRASS: Self = Self::new(Material::GrassBlock);
    /// Sand block.
    pub const SAND: Self = Self::new(Material::Sand);
    /// Bedrock block.
    pub const BEDROCK: Self = Self::new(Material::Bedrock);
    /// Water block.
    pub const WATER: Self = Self::new(Material::Water);

    /// Creates a block with empty metadata.
    #[inline]
    #[must_use]
    pub const fn new(material: Material) -> Self {
        Self { material, meta: 0 }
    }

    /// Creates a block with material and metadata.
    #[inline]
    #[must_use]
    pub const fn with_meta(material: Material, meta: u16) -> Self {
        Self { material, meta }
    }

    /// Returns true if this is an air block.
    #[inline]
    #[must_use]
    pub const fn is_air(self) -> bool {
        matches!(self.material, Material::Air)
    }

    /// Returns true if every bit of `mask` is set in the meta word.
    #[inline]
    #[must_use]
    pub const fn has_meta(self, mask: u16) -> bool {
        self.meta & mask == mask
    }
}

impl From<Material> for Block {
    fn from(material: Material) -> Self {
        Self::new(material)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_materials_fit_table() {
        for material in Material::ALL {
            assert!(material.index() < Material::TABLE_SIZE, "{material:?} out of table");
        }
    }

    #[test]
    fn test_names_are_unique_and_round_trip() {
        for material in Material::ALL {
            assert_eq!(Material::from_name(material.name()), Some(material));
        }
        assert_eq!(Material::from_name("unobtainium"), None);
    }

    #[test]
    fn test_block_meta_bits() {
        let block = Block::with_meta(Material::Water, 0b1010);
        assert!(block.has_meta(0b0010));
        assert!(block.has_meta(0b1000));
        assert!(!block.has_meta(0b0100));
        assert!(!block.is_air());
        assert!(Block::AIR.is_air());
    }
}
