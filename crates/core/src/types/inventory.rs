//! Per-variant stock levels for a product.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Variant name used when a line item does not specify one.
pub const DEFAULT_VARIANT: &str = "Default";

/// Mapping from variant name to remaining stock.
///
/// Counts are unsigned, so stock can never go negative; [`Inventory::decrement`]
/// clamps at zero instead of underflowing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory(BTreeMap<String, u32>);

impl Inventory {
    /// Create an empty inventory.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Stock for `variant`. Unknown variants have zero stock.
    #[must_use]
    pub fn available(&self, variant: &str) -> u32 {
        self.0.get(variant).copied().unwrap_or(0)
    }

    /// Whether at least `quantity` units of `variant` are in stock.
    #[must_use]
    pub fn can_fulfil(&self, variant: &str, quantity: u32) -> bool {
        self.available(variant) >= quantity
    }

    /// Remove `quantity` units of `variant`, clamping at zero.
    ///
    /// Returns the remaining stock. Unknown variants are left absent.
    pub fn decrement(&mut self, variant: &str, quantity: u32) -> u32 {
        match self.0.get_mut(variant) {
            Some(stock) => {
                *stock = stock.saturating_sub(quantity);
                *stock
            }
            None => 0,
        }
    }
}

impl<K: Into<String>> FromIterator<(K, u32)> for Inventory {
    fn from_iter<I: IntoIterator<Item = (K, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
