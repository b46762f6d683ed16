//! Scare asset catalog.
//!
//! An ordered, non-empty pool of (visual, audio) pairs. Emptiness is a
//! configuration error caught at construction -- `pick` never has to deal
//! with an empty list.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// One scare: a visual asset and the sound that plays with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScareEntry {
    pub image: String,
    pub sound: String,
}

impl ScareEntry {
    pub fn new(image: impl Into<String>, sound: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            sound: sound.into(),
        }
    }
}

/// Immutable, validated-non-empty scare pool.
///
/// Serialized as a plain entry list; deserialization goes through the same
/// validation as [`ScareCatalog::new`], so an empty list in a stored blob
/// is rejected instead of resurfacing as an unpickable catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<ScareEntry>", into = "Vec<ScareEntry>")]
pub struct ScareCatalog {
    entries: Vec<ScareEntry>,
}

impl TryFrom<Vec<ScareEntry>> for ScareCatalog {
    type Error = CatalogError;

    fn try_from(entries: Vec<ScareEntry>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<ScareCatalog> for Vec<ScareEntry> {
    fn from(catalog: ScareCatalog) -> Self {
        catalog.entries
    }
}

impl ScareCatalog {
    /// Build a catalog, rejecting an empty entry list.
    ///
    /// # Errors
    /// Returns [`CatalogError::Empty`] if `entries` is empty.
    pub fn new(entries: Vec<ScareEntry>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self { entries })
    }

    /// The stock catalog shipped with the effect.
    pub fn default_assets() -> Self {
        let entries = (1..=4)
            .map(|i| ScareEntry::new(format!("assets/scare{i}.gif"), format!("assets/scare{i}.mp3")))
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; emptiness is rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ScareEntry] {
        &self.entries
    }

    /// Uniform random selection.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &ScareEntry {
        &self.entries[rng.gen_range(0..self.entries.len())]
    }
}
