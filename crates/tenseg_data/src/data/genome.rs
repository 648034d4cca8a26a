use rkyv::{Archive, Deserialize as RkyvDeserialize, Serialize as RkyvSerialize};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Genetic behavior sequence of a fabric instance.
///
/// The kernel treats the symbols as an opaque ordered sequence; each read
/// during a behavior pass yields one bounded discrete choice. Storage,
/// breeding and ownership of genomes belong to the surrounding application,
/// which round-trips them through the hex helpers below.
#[derive(
    Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Archive, RkyvSerialize, RkyvDeserialize,
)]
#[archive(check_bytes)]
pub struct Genome {
    /// Stable identity for persistence and lineage tracking.
    pub id: Uuid,
    /// Ordered gene symbols, consumed sequentially.
    pub symbols: Vec<u8>,
}

impl Genome {
    /// Creates a genome from raw symbols with a fresh identity.
    #[must_use]
    pub fn new(symbols: Vec<u8>) -> Self {
        Self {
            id: Uuid::new_v4(),
            symbols,
        }
    }

    /// Number of symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the genome carries no symbols.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Serialize genome to hex string.
    #[must_use]
    pub fn to_hex(&self) -> String {
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        hex::encode(bytes)
    }

    /// Deserialize genome from hex string.
    pub fn from_hex(hex_str: &str) -> anyhow::Result<Self> {
        let bytes = hex::decode(hex_str)?;
        let genome = serde_json::from_slice(&bytes)?;
        Ok(genome)
    }
}
