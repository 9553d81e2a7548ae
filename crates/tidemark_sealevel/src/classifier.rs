//! # Material and Biome Classification
//!
//! Pre-computed lookup tables, built once from the full material and biome
//! enumerations and indexed directly afterwards.

use tidemark_voxel::{Biome, Material};

/// Role a material plays in sea-level transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MaterialCategory {
    /// Air and plants that rising sea water may overwrite.
    RisingCandidate,
    /// Water and aquatic plants that may revert to air.
    FallingCandidate,
    /// Everything else. Never transitioned; ownership is released.
    Other,
}

/// Materials rising water replaces, besides the name-matched groups.
const RISING: [Material; 9] = [
    Material::Air,
    Material::TallGrass,
    Material::ShortGrass,
    Material::LilyPad,
    Material::Lilac,
    Material::SugarCane,
    Material::Fern,
    Material::Allium,
    Material::Vine,
];

/// Name fragments that make a material a rising candidate.
const RISING_NAME_FRAGMENTS: [&str; 3] = ["flower", "sapling", "seed"];

const FALLING: [Material; 5] = [
    Material::Water,
    Material::Seagrass,
    Material::TallSeagrass,
    Material::KelpPlant,
    Material::Kelp,
];

/// Name fragments that exclude a biome from sea-level effects.
const UNIMPACTED_NAME_FRAGMENTS: [&str; 2] = ["mountains", "hills"];

/// Material lookup table.
#[derive(Clone, Debug)]
pub struct MaterialClassifier {
    table: [MaterialCategory; Material::TABLE_SIZE],
}

impl MaterialClassifier {
    /// Builds the table from [`Material::ALL`].
    #[must_use]
    pub fn new() -> Self {
        let mut table = [MaterialCategory::Other; Material::TABLE_SIZE];
        for material in Material::ALL {
            let name = material.name();
            let rising = RISING.contains(&material)
                || RISING_NAME_FRAGMENTS.iter().any(|f| name.contains(f));
            table[material.index()] = if FALLING.contains(&material) {
                MaterialCategory::FallingCandidate
            } else if rising {
                MaterialCategory::RisingCandidate
            } else {
                MaterialCategory::Other
            };
        }
        Self { table }
    }

    /// Category of `material`.
    #[inline]
    #[must_use]
    pub fn classify(&self, material: Material) -> MaterialCategory {
        self.table[material.index()]
    }
}

impl Default for MaterialClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Set of biomes permanently excluded from sea-level effects.
#[derive(Clone, Debug)]
pub struct BiomeFilter {
    unimpacted: [bool; Biome::COUNT],
}

impl BiomeFilter {
    /// Builds the filter from [`Biome::ALL`]: mountain and hill biomes are
    /// unimpacted.
    #[must_use]
    pub fn new() -> Self {
        let mut unimpacted = [false; Biome::COUNT];
        for biome in Biome::ALL {
            let name = biome.name();
            unimpacted[biome.index()] = UNIMPACTED_NAME_FRAGMENTS.iter().any(|f| name.contains(f));
        }
        Self { unimpacted }
    }

    /// Returns true if columns of `biome` must never be touched.
    #[inline]
    #[must_use]
    pub fn is_unimpacted(&self, biome: Biome) -> bool {
        self.unimpacted[biome.index()]
    }
}

impl Default for BiomeFilter {
    fn default() -> Self {
        Self::new()
    }
}
