//! Sequencer module - deterministic block sequence
//!
//! Every block is a pure function of the block source and a cursor, so
//! `peek` never disturbs the stream and two sessions built from the same
//! source see identical blocks.
//!
//! Seeded streams draw the seven built-in families through a 7-bag: each run
//! of seven cursors holds one of each family, shuffled by an LCG seeded from
//! the bag index.

use tracing::trace;

use crate::error::{ConfigurationError, SequenceExhausted};
use crate::hash::{sha256, Hash32};
use crate::shape::{builtin_block, BlockDefinition, FAMILY_COUNT};
use crate::types::{Rarity, SpecialEffect};

/// Color id of rare blocks in seeded streams
pub const RARE_COLOR_ID: u8 = 7;
/// Color id of legendary blocks in seeded streams
pub const LEGENDARY_COLOR_ID: u8 = 8;

/// Rolls out of 1000 below which a seeded block is legendary
pub const LEGENDARY_PER_MILLE: u64 = 20;
/// Rolls out of 1000 below which a seeded block is rare (legendary first)
pub const RARE_PER_MILLE: u64 = 150;

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;
const BAG_SALT: u64 = 0xB1AC_7215_0000_0007;

/// SplitMix64 finalizer of `seed` mixed with `cursor`.
///
/// ```
/// use blocktris_core::sequencer::mix64;
///
/// assert_eq!(mix64(0, 0), 0xE220_A839_7B1D_CDAF);
/// assert_ne!(mix64(42, 0), mix64(42, 1));
/// ```
pub fn mix64(seed: u64, cursor: u64) -> u64 {
    let mut z = seed ^ cursor.wrapping_mul(GOLDEN_GAMMA);
    z = z.wrapping_add(GOLDEN_GAMMA);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// Where blocks come from. Built only through [`BlockSource::new`], which
/// guarantees any supplied sequence is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSource {
    kind: SourceKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SourceKind {
    /// Built-in families through a seeded 7-bag, with seeded rarity
    Seeded { seed: u64 },
    /// A caller-supplied sequence, consumed in order; exhaustion ends the game
    Fixed { sequence: Vec<BlockDefinition> },
    /// A caller-supplied catalog, indexed by the seed; endless
    SeededCatalog {
        seed: u64,
        catalog: Vec<BlockDefinition>,
    },
}

impl BlockSource {
    pub fn new(
        seed: Option<u64>,
        block_sequence: Option<Vec<BlockDefinition>>,
    ) -> Result<Self, ConfigurationError> {
        let kind = match (seed, block_sequence) {
            (None, None) => return Err(ConfigurationError::NoBlockSource),
            (_, Some(sequence)) if sequence.is_empty() => {
                return Err(ConfigurationError::EmptySequence)
            }
            (Some(seed), None) => SourceKind::Seeded { seed },
            (None, Some(sequence)) => SourceKind::Fixed { sequence },
            (Some(seed), Some(catalog)) => SourceKind::SeededCatalog { seed, catalog },
        };
        Ok(Self { kind })
    }

    pub fn seed(&self) -> Option<u64> {
        match &self.kind {
            SourceKind::Seeded { seed } | SourceKind::SeededCatalog { seed, .. } => Some(*seed),
            SourceKind::Fixed { .. } => None,
        }
    }

    /// The supplied sequence or catalog, if any
    pub fn definitions(&self) -> Option<&[BlockDefinition]> {
        match &self.kind {
            SourceKind::Seeded { .. } => None,
            SourceKind::Fixed { sequence } => Some(sequence),
            SourceKind::SeededCatalog { catalog, .. } => Some(catalog),
        }
    }

    /// Block at `cursor`. Only `Fixed` sources can run out.
    pub fn next_block(&self, cursor: u32) -> Result<BlockDefinition, SequenceExhausted> {
        let block = match &self.kind {
            SourceKind::Seeded { seed } => seeded_block(*seed, cursor),
            SourceKind::Fixed { sequence } => {
                sequence
                    .get(cursor as usize)
                    .cloned()
                    .ok_or(SequenceExhausted {
                        cursor,
                        len: sequence.len(),
                    })?
            }
            SourceKind::SeededCatalog { seed, catalog } => {
                let pick = mix64(*seed, cursor as u64) % catalog.len() as u64;
                catalog[pick as usize].clone()
            }
        };
        trace!(cursor, block_type_id = block.block_type_id, "next block");
        Ok(block)
    }

    /// The block after `cursor`, or `None` past the end of a fixed sequence
    pub fn peek(&self, cursor: u32) -> Option<BlockDefinition> {
        self.next_block(cursor.checked_add(1)?).ok()
    }

    fn tag(&self) -> u8 {
        match &self.kind {
            SourceKind::Seeded { .. } => 1,
            SourceKind::Fixed { .. } => 2,
            SourceKind::SeededCatalog { .. } => 3,
        }
    }

    /// Canonical encoding: tag byte, seed u64 LE (0 when absent), definition
    /// count u32 LE, then each definition.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let definitions = self.definitions().unwrap_or(&[]);
        let mut out = Vec::with_capacity(13 + definitions.len() * 16);
        out.push(self.tag());
        out.extend_from_slice(&self.seed().unwrap_or(0).to_le_bytes());
        out.extend_from_slice(&(definitions.len() as u32).to_le_bytes());
        for definition in definitions {
            definition.write_canonical(&mut out);
        }
        out
    }

    /// Digest of [`BlockSource::canonical_bytes`], bound into the commitment
    pub fn source_digest(&self) -> Hash32 {
        sha256(&self.canonical_bytes())
    }
}

fn bag_family(seed: u64, cursor: u32) -> usize {
    let mut bag: [usize; FAMILY_COUNT] = [0, 1, 2, 3, 4, 5, 6];
    let bag_index = (cursor as usize / FAMILY_COUNT) as u64;
    let mut rng = SimpleRng::new(mix64(seed ^ BAG_SALT, bag_index) as u32);
    rng.shuffle(&mut bag);
    bag[cursor as usize % FAMILY_COUNT]
}

fn seeded_block(seed: u64, cursor: u32) -> BlockDefinition {
    let block = builtin_block(bag_family(seed, cursor));
    let roll = mix64(seed, cursor as u64);
    let (rarity, color_id) = match roll % 1000 {
        r if r < LEGENDARY_PER_MILLE => (Rarity::Legendary, LEGENDARY_COLOR_ID),
        r if r < RARE_PER_MILLE => (Rarity::Rare, RARE_COLOR_ID),
        _ => return block,
    };
    let effect = SpecialEffect::ALL[(mix64(roll, cursor as u64) % 3) as usize];
    BlockDefinition { color_id, ..block }.with_rarity(rarity, Some(effect))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::ShapeMatrix;

    fn bar(id: u8) -> BlockDefinition {
        BlockDefinition::new(id, ShapeMatrix::from_art(&["##"]).unwrap(), id)
    }

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);
        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn source_requires_seed_or_sequence() {
        assert_eq!(
            BlockSource::new(None, None),
            Err(ConfigurationError::NoBlockSource)
        );
        assert_eq!(
            BlockSource::new(Some(1), Some(vec![])),
            Err(ConfigurationError::EmptySequence)
        );
        assert_eq!(
            BlockSource::new(None, Some(vec![])),
            Err(ConfigurationError::EmptySequence)
        );
        assert!(matches!(
            BlockSource::new(Some(1), None).map(|s| s.kind),
            Ok(SourceKind::Seeded { seed: 1 })
        ));
        assert!(matches!(
            BlockSource::new(None, Some(vec![bar(0)])).map(|s| s.kind),
            Ok(SourceKind::Fixed { .. })
        ));
        assert!(matches!(
            BlockSource::new(Some(1), Some(vec![bar(0)])).map(|s| s.kind),
            Ok(SourceKind::SeededCatalog { .. })
        ));
    }

    #[test]
    fn seeded_stream_is_a_pure_function_of_seed_and_cursor() {
        let a = BlockSource::new(Some(42), None).unwrap();
        let b = BlockSource::new(Some(42), None).unwrap();
        for cursor in (0..200).rev() {
            assert_eq!(a.next_block(cursor), b.next_block(cursor));
        }
        assert_eq!(a.peek(3), a.next_block(4).ok());
    }

    #[test]
    fn seeded_stream_uses_every_family_per_bag() {
        let source = BlockSource::new(Some(7), None).unwrap();
        for bag in 0..20u32 {
            let mut seen = [false; FAMILY_COUNT];
            for slot in 0..FAMILY_COUNT as u32 {
                let block = source.next_block(bag * 7 + slot).unwrap();
                seen[block.block_type_id as usize] = true;
            }
            assert!(seen.iter().all(|&s| s), "bag {bag} missing a family");
        }
    }

    #[test]
    fn seeded_rarity_is_roughly_calibrated() {
        let source = BlockSource::new(Some(99), None).unwrap();
        let (mut rare, mut legendary) = (0, 0);
        for cursor in 0..10_000 {
            let block = source.next_block(cursor).unwrap();
            match block.rarity {
                Rarity::Common => {
                    assert!(block.special.is_none());
                    assert_eq!(block.color_id, block.block_type_id);
                }
                Rarity::Rare => {
                    rare += 1;
                    assert!(block.special.is_some());
                    assert_eq!(block.color_id, RARE_COLOR_ID);
                }
                Rarity::Legendary => {
                    legendary += 1;
                    assert!(block.special.is_some());
                    assert_eq!(block.color_id, LEGENDARY_COLOR_ID);
                }
            }
        }
        assert!((100..=350).contains(&legendary), "legendary={legendary}");
        assert!((1000..=1700).contains(&rare), "rare={rare}");
    }

    #[test]
    fn fixed_sequence_runs_out() {
        let source = BlockSource::new(None, Some(vec![bar(0), bar(1)])).unwrap();
        assert_eq!(source.next_block(1).unwrap().block_type_id, 1);
        assert_eq!(
            source.next_block(2),
            Err(SequenceExhausted { cursor: 2, len: 2 })
        );
        assert_eq!(source.peek(1), None);
    }

    #[test]
    fn seeded_catalog_is_endless_and_stays_in_catalog() {
        let source = BlockSource::new(Some(42), Some(vec![bar(3), bar(4)])).unwrap();
        for cursor in 0..500 {
            let id = source.next_block(cursor).unwrap().block_type_id;
            assert!(id == 3 || id == 4);
        }
    }

    #[test]
    fn digest_distinguishes_sources() {
        let seeded = BlockSource::new(Some(42), None).unwrap();
        let other_seed = BlockSource::new(Some(43), None).unwrap();
        let fixed = BlockSource::new(None, Some(vec![bar(0)])).unwrap();
        let catalog = BlockSource::new(Some(42), Some(vec![bar(0)])).unwrap();
        let digests = [
            seeded.source_digest(),
            other_seed.source_digest(),
            fixed.source_digest(),
            catalog.source_digest(),
        ];
        for i in 0..digests.len() {
            for j in i + 1..digests.len() {
                assert_ne!(digests[i], digests[j]);
            }
        }
        assert_eq!(seeded.canonical_bytes().len(), 13);
    }
}
