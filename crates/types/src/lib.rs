//! # Slipway Types
//!
//! Shared type definitions for the Slipway token-launch engine:
//!
//! - 20-byte account addresses with keccak-based derivation
//! - Protocol constants (supply split, fee bounds, vesting schedule)
//! - Configuration structs with TOML loading and validation
//! - The event surface consumed by indexers
//! - The error taxonomy shared by every crate in the workspace

pub mod address;
pub mod config;
pub mod constants;
pub mod errors;
pub mod events;

pub use address::Address;
pub use config::{CurveConfig, FeeConfig, PadConfig};
pub use errors::{SlipwayError, SlipwayResult};
pub use events::{Event, EventJournal};
