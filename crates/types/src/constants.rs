//! Protocol constants.
//!
//! Monetary quantities are denominated in base units: `10^18` base units per
//! whole token, and wei for native value.

/// Base units per whole token.
pub const BASE_UNIT: u128 = 1_000_000_000_000_000_000;

/// Total issuable supply per token: 1,000,000,000 whole tokens.
pub const MAX_SUPPLY: u128 = 1_000_000_000 * BASE_UNIT;

/// Units sellable through the bonding curve before listing is forced:
/// 650,000,000 whole tokens.
pub const CURVE_CAPACITY: u128 = 650_000_000 * BASE_UNIT;

/// Reserved curation-reward pool, held by the orchestrator: 150,000,000
/// whole tokens. The remainder of `MAX_SUPPLY` backs the AMM listing.
pub const CURATION_POOL: u128 = 150_000_000 * BASE_UNIT;

/// Basis-point denominator.
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Hard ceiling for each configurable fee share: 10%.
pub const FEE_CEILING_BPS: u16 = 1_000;

/// Default platform fee on every trade, in bps of gross value.
pub const DEFAULT_PLATFORM_FEE_BPS: u16 = 100;

/// Default beneficiary (reputation-system) fee, in bps of gross value.
pub const DEFAULT_BENEFICIARY_FEE_BPS: u16 = 100;

/// Fraction of curve capacity below which purchases accrue to the holder's
/// anti-snipe watermark, in bps.
pub const DEFAULT_UNLOCK_THRESHOLD_BPS: u16 = 5_000;

/// Flat fee charged at token creation, in wei.
pub const DEFAULT_CREATE_FEE: u128 = 1_000_000_000_000_000;

/// Flat fee deducted from curve proceeds at listing, in wei.
pub const DEFAULT_LIST_FEE: u128 = 1_000_000_000_000_000_000;

/// Processing fee required by a curation claim, in wei.
pub const DEFAULT_CLAIM_FEE: u128 = 500_000_000_000_000;

/// Length of one reward-distribution era, in seconds.
pub const ERA_SECONDS: u64 = 86_400;

/// Number of eras over which the curation pool vests after listing.
pub const VESTING_ERAS: u32 = 100;
