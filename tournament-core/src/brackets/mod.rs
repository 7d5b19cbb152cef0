//! Stateful bracket managers for the two events whose placements aren't
//! decided by a single scored run: Partnered Axe Throw (prelims -> top-4
//! finals) and Birling (double elimination). Each event's bracket state
//! is persisted as an opaque blob on `Event::payouts`.

pub mod birling;
pub mod partnered_axe;

use serde::{Deserialize, Serialize};

pub use birling::BirlingBracketState;
pub use partnered_axe::PartneredAxeState;

/// Discriminated union replacing an untyped JSON-in-a-text-column bracket
/// payload with a typed, serde-tagged enum.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum BracketState {
    PartneredAxe(PartneredAxeState),
    Birling(BirlingBracketState),
}
