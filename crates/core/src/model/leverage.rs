use serde::{Deserialize, Serialize};
use std::fmt;

//
// ─── LEVERAGE ──────────────────────────────────────────────────────────────────
//

/// A one-time score multiplier the player may stake on the next answer.
///
/// Each session starts with one of each; a leverage is consumed the
/// moment a question is answered while it is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Leverage {
    /// Halves the points at stake (0.5x), hedging a risky question.
    Half,
    /// Doubles the points at stake (2x).
    Double,
    /// Triples the points at stake (3x).
    Triple,
}

impl Leverage {
    pub const ALL: [Self; 3] = [Self::Half, Self::Double, Self::Triple];

    #[must_use]
    pub fn multiplier(self) -> f64 {
        match self {
            Leverage::Half => 0.5,
            Leverage::Double => 2.0,
            Leverage::Triple => 3.0,
        }
    }

    /// Maps a raw multiplier value back to a leverage.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn from_multiplier(value: f64) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.multiplier() == value)
    }
}

impl fmt::Display for Leverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Leverage::Half => write!(f, "0.5x"),
            Leverage::Double => write!(f, "2x"),
            Leverage::Triple => write!(f, "3x"),
        }
    }
}

//
// ─── INVENTORY ─────────────────────────────────────────────────────────────────
//

/// State of a single leverage slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeverageSlot {
    leverage: Leverage,
    used: bool,
}

impl LeverageSlot {
    #[must_use]
    pub fn leverage(&self) -> Leverage {
        self.leverage
    }

    #[must_use]
    pub fn used(&self) -> bool {
        self.used
    }
}

/// The three one-time leverage slots of a session.
///
/// A slot's `used` flag only ever moves from false to true, driven by
/// the session machine when a pending leverage is consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeverageInventory {
    slots: [LeverageSlot; 3],
}

impl LeverageInventory {
    /// Fresh inventory with every leverage available.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Leverage::ALL.map(|leverage| LeverageSlot {
                leverage,
                used: false,
            }),
        }
    }

    #[must_use]
    pub fn is_used(&self, leverage: Leverage) -> bool {
        self.slots
            .iter()
            .any(|slot| slot.leverage == leverage && slot.used)
    }

    /// Marks a leverage consumed. Marking an already-used slot again
    /// changes nothing.
    pub fn mark_used(&mut self, leverage: Leverage) {
        for slot in &mut self.slots {
            if slot.leverage == leverage {
                slot.used = true;
            }
        }
    }

    #[must_use]
    pub fn slots(&self) -> &[LeverageSlot] {
        &self.slots
    }

    /// Leverages that have not been consumed yet.
    pub fn available(&self) -> impl Iterator<Item = Leverage> + '_ {
        self.slots
            .iter()
            .filter(|slot| !slot.used)
            .map(|slot| slot.leverage)
    }
}

impl Default for LeverageInventory {
    fn default() -> Self {
        Self::new()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplier_roundtrip() {
        for leverage in Leverage::ALL {
            assert_eq!(Leverage::from_multiplier(leverage.multiplier()), Some(leverage));
        }
        assert_eq!(Leverage::from_multiplier(1.5), None);
    }

    #[test]
    fn fresh_inventory_has_all_available() {
        let inventory = LeverageInventory::new();
        assert_eq!(inventory.available().count(), 3);
        assert!(!inventory.is_used(Leverage::Double));
    }

    #[test]
    fn mark_used_is_one_way() {
        let mut inventory = LeverageInventory::new();
        inventory.mark_used(Leverage::Triple);
        assert!(inventory.is_used(Leverage::Triple));
        assert_eq!(inventory.available().count(), 2);

        // marking again changes nothing
        inventory.mark_used(Leverage::Triple);
        assert!(inventory.is_used(Leverage::Triple));
        assert_eq!(inventory.available().count(), 2);
    }
}
