//! Persistent favorites list.
//!
//! Favorites are stored as a single JSON array of string movie IDs under
//! one key of the key-value store.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::storage::{KeyValueStore, StorageError};

/// Key holding the favorites array.
pub const FAVORITES_KEY: &str = "moviedeck_favorites";

#[derive(Debug, Error)]
pub enum FavoritesError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Failed to serialize favorites: {0}")]
    Serialization(String),
}

/// Set of favorited movie IDs, iterated in ascending ID order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoritesSet {
    ids: BTreeSet<u32>,
}

impl FavoritesSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.ids.iter().copied()
    }

    /// Flip membership of `id`. Returns the new membership.
    pub fn toggle(&mut self, id: u32) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }
}

impl FromIterator<u32> for FavoritesSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Favorites persistence over a key-value store.
#[derive(Clone)]
pub struct FavoritesStore {
    store: Arc<dyn KeyValueStore>,
}

impl FavoritesStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load the persisted set.
    ///
    /// A missing or corrupted value loads as an empty set; entries that are
    /// not movie IDs are skipped.
    pub fn load(&self) -> Result<FavoritesSet, FavoritesError> {
        let Some(raw) = self.store.get(FAVORITES_KEY)? else {
            return Ok(FavoritesSet::new());
        };

        let items = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(items)) => items,
            Ok(_) | Err(_) => {
                warn!("Ignoring corrupted favorites value");
                return Ok(FavoritesSet::new());
            }
        };

        Ok(items
            .iter()
            .filter_map(|item| {
                let id = match item {
                    Value::String(s) => s.parse().ok(),
                    Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
                    _ => None,
                };
                if id.is_none() {
                    warn!("Skipping invalid favorite entry: {}", item);
                }
                id
            })
            .collect())
    }

    /// Persist `favorites`, replacing the stored set.
    pub fn save(&self, favorites: &FavoritesSet) -> Result<(), FavoritesError> {
        let ids: Vec<String> = favorites.iter().map(|id| id.to_string()).collect();
        let json =
            serde_json::to_string(&ids).map_err(|e| FavoritesError::Serialization(e.to_string()))?;
        self.store.set(FAVORITES_KEY, &json)?;
        Ok(())
    }

    /// Persist `current` with `id` flipped and return the new set and membership.
    ///
    /// `current` is left untouched, so a failed write leaves the caller's
    /// state unchanged.
    pub fn toggle(
        &self,
        current: &FavoritesSet,
        id: u32,
    ) -> Result<(FavoritesSet, bool), FavoritesError> {
        let mut next = current.clone();
        let is_favorite = next.toggle(id);
        self.save(&next)?;
        Ok((next, is_favorite))
    }
}
