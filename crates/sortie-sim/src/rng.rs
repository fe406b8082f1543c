//! Seeded random streams.
//!
//! One ChaCha stream per unit category, plus lazily created per-unit streams
//! so one unit's draws never shift another's. Every stream derives from the
//! session seed, so peers that share a seed and replay the same commands
//! draw identical sequences.

use std::collections::BTreeMap;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use sortie_core::enums::RngStream;
use sortie_core::types::UnitId;

#[derive(Debug, Clone)]
pub struct RngStreams {
    seed: u64,
    streams: BTreeMap<RngStream, ChaCha8Rng>,
    instances: BTreeMap<(RngStream, UnitId), ChaCha8Rng>,
}

impl RngStreams {
    pub fn new(seed: u64) -> Self {
        let streams = RngStream::ALL
            .iter()
            .map(|&s| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                rng.set_stream(s.index());
                (s, rng)
            })
            .collect();
        Self { seed, streams, instances: BTreeMap::new() }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Category stream.
    pub fn stream(&mut self, stream: RngStream) -> &mut ChaCha8Rng {
        let seed = self.seed;
        self.streams.entry(stream).or_insert_with(|| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            rng.set_stream(stream.index());
            rng
        })
    }

    /// Per-unit stream offset from its category.
    pub fn instance(&mut self, stream: RngStream, unit: UnitId) -> &mut ChaCha8Rng {
        let seed = self.seed;
        self.instances.entry((stream, unit)).or_insert_with(|| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            rng.set_stream(((stream.index() + 1) << 32) | u64::from(unit.0));
            rng
        })
    }

    /// Drop a destroyed unit's streams.
    pub fn forget(&mut self, unit: UnitId) {
        self.instances.retain(|&(_, id), _| id != unit);
    }

    /// Word position of a category stream, for checkpointing.
    pub fn position(&self, stream: RngStream) -> u128 {
        self.streams.get(&stream).map_or(0, |rng| rng.get_word_pos())
    }

    /// Restore a category stream to a checkpointed position.
    pub fn seek(&mut self, stream: RngStream, position: u128) {
        self.stream(stream).set_word_pos(position);
    }

    /// Discard `draws` 32-bit words from a category stream.
    pub fn fast_forward(&mut self, stream: RngStream, draws: u64) {
        let rng = self.stream(stream);
        for _ in 0..draws {
            rng.next_u32();
        }
    }
}
