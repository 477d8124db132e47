//! # Slipway Math
//!
//! Exact-integer pricing for the Slipway launch engine:
//!
//! - [`curve`]: quadratic bonding-curve cost, proceeds, and inverse pricing
//! - [`vesting`]: linear release schedule for the curation pool
//! - [`wide`]: the 512-bit arithmetic backing the curve's cubic terms
//!
//! Every division rounds in the engine's favor: buys round charges up,
//! sells and vesting round payouts down.

pub mod curve;
pub mod vesting;
pub mod wide;

pub use curve::{amount_for_value, cost, price_per_token, proceeds};
pub use vesting::VestingSchedule;
pub use wide::{Rounding, U512};
