//! Gene reading and genome construction.
//!
//! A [`GeneReader`] consumes a genome's symbols sequentially. Each read
//! yields one bounded discrete choice and advances the cursor by exactly
//! one; the cursor is never rewound within a behavior pass. What happens
//! when the sequence runs out is an explicit policy, not an accident:
//! either the cursor wraps deterministically or the read fails loudly.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tenseg_data::Genome;
use uuid::Uuid;

use crate::error::{KernelError, Result};

/// Policy for a gene cursor that outruns the symbol sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenePolicy {
    /// Re-read from the start, deterministically (`cursor % len`).
    #[default]
    Wrap,
    /// Fail the behavior pass with `GeneExhausted`.
    Fail,
}

/// Sequential reader over a genome's symbols.
#[derive(Debug)]
pub struct GeneReader<'a> {
    symbols: &'a [u8],
    cursor: usize,
    policy: GenePolicy,
}

impl<'a> GeneReader<'a> {
    /// Starts a reader at the beginning of the genome.
    #[must_use]
    pub fn new(genome: &'a Genome, policy: GenePolicy) -> Self {
        Self {
            symbols: &genome.symbols,
            cursor: 0,
            policy,
        }
    }

    /// Current cursor position. Strictly increases by one per read.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Reads one symbol and maps it into `[0, buckets)`.
    ///
    /// An empty genome is exhausted from the first read under either
    /// policy, since there is nothing to wrap onto.
    pub fn read_choice(&mut self, buckets: usize) -> Result<usize> {
        debug_assert!(buckets > 0, "bucket count must be positive");
        let index = match self.policy {
            GenePolicy::Wrap if !self.symbols.is_empty() => self.cursor % self.symbols.len(),
            _ => {
                if self.cursor >= self.symbols.len() {
                    return Err(KernelError::GeneExhausted {
                        cursor: self.cursor,
                        length: self.symbols.len(),
                    });
                }
                self.cursor
            }
        };
        let symbol = self.symbols[index];
        self.cursor += 1;
        Ok(symbol as usize % buckets)
    }
}

/// Trait defining genome construction for speculative evaluation.
///
/// The surrounding application owns breeding and selection; these helpers
/// exist so hosts and tests can produce reproducible genomes without
/// knowing the symbol encoding.
pub trait GenomeLogic: Sized {
    /// Creates a genome of `length` uniformly random symbols.
    #[must_use]
    fn random_with_rng<R: Rng>(length: usize, rng: &mut R) -> Self;

    /// Replaces up to `count` symbols at random positions, returning the
    /// mutated copy under a fresh identity.
    #[must_use]
    fn mutate_with_rng<R: Rng>(&self, count: usize, rng: &mut R) -> Self;
}

impl GenomeLogic for Genome {
    fn random_with_rng<R: Rng>(length: usize, rng: &mut R) -> Self {
        let mut symbols = vec![0u8; length];
        rng.fill(symbols.as_mut_slice());
        Genome::new(symbols)
    }

    fn mutate_with_rng<R: Rng>(&self, count: usize, rng: &mut R) -> Self {
        let mut symbols = self.symbols.clone();
        if !symbols.is_empty() {
            for _ in 0..count {
                let position = rng.gen_range(0..symbols.len());
                symbols[position] = rng.gen();
            }
        }
        Genome {
            id: Uuid::new_v4(),
            symbols,
        }
    }
}
