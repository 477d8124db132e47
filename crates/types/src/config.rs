//! Engine configuration.
//!
//! `CurveConfig` is the per-token template the orchestrator clones at every
//! launch; `PadConfig` carries the pad-wide parameters. Both are plain serde
//! structs so deployments can be described in TOML.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::constants::*;
use crate::errors::{SlipwayError, SlipwayResult};

/// Wei and base-unit quantities overflow TOML's i64 integers, so they are
/// written as decimal strings in config files.
mod dec_str {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// Immutable per-token economics, fixed at launch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveConfig {
    /// Total issuable units.
    #[serde(with = "dec_str")]
    pub max_supply: u128,
    /// Units sellable through the bonding curve before listing is forced.
    #[serde(with = "dec_str")]
    pub curve_capacity: u128,
    /// Units reserved for the curation-reward pool, custodied by the pad.
    #[serde(with = "dec_str")]
    pub curation_pool: u128,
    /// Fraction of `curve_capacity` (bps) below which buys accrue to the
    /// buyer's anti-snipe watermark.
    pub unlock_threshold_bps: u16,
    /// Era length of the post-listing vesting schedule, seconds.
    pub era_seconds: u64,
    /// Number of vesting eras.
    pub era_count: u32,
}

impl Default for CurveConfig {
    fn default() -> Self {
        CurveConfig {
            max_supply: MAX_SUPPLY,
            curve_capacity: CURVE_CAPACITY,
            curation_pool: CURATION_POOL,
            unlock_threshold_bps: DEFAULT_UNLOCK_THRESHOLD_BPS,
            era_seconds: ERA_SECONDS,
            era_count: VESTING_ERAS,
        }
    }
}

impl CurveConfig {
    pub fn validate(&self) -> SlipwayResult<()> {
        if self.curve_capacity == 0 || self.curve_capacity >= self.max_supply {
            return Err(SlipwayError::InvalidConfig(
                "curve_capacity must be positive and below max_supply".into(),
            ));
        }
        if self
            .curve_capacity
            .checked_add(self.curation_pool)
            .map_or(true, |sum| sum > self.max_supply)
        {
            return Err(SlipwayError::InvalidConfig(
                "curve_capacity + curation_pool exceeds max_supply".into(),
            ));
        }
        if u128::from(self.unlock_threshold_bps) > BPS_DENOMINATOR {
            return Err(SlipwayError::InvalidConfig(
                "unlock_threshold_bps above 10000".into(),
            ));
        }
        if self.era_seconds == 0 || self.era_count == 0 {
            return Err(SlipwayError::InvalidConfig(
                "vesting schedule must have positive eras".into(),
            ));
        }
        Ok(())
    }

    /// Units kept by the token to seed the AMM pool at listing.
    pub fn liquidity_reserve(&self) -> u128 {
        self.max_supply - self.curve_capacity - self.curation_pool
    }

    /// Cumulative-sold threshold below which buys accrue lock watermark:
    /// `floor(curve_capacity * bps / 10000)`, split so the product cannot
    /// overflow for any capacity.
    pub fn unlock_threshold(&self) -> u128 {
        let bps = u128::from(self.unlock_threshold_bps);
        self.curve_capacity / BPS_DENOMINATOR * bps
            + self.curve_capacity % BPS_DENOMINATOR * bps / BPS_DENOMINATOR
    }
}

/// Trade fee shares, bps of gross value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeConfig {
    pub platform_bps: u16,
    pub beneficiary_bps: u16,
}

impl Default for FeeConfig {
    fn default() -> Self {
        FeeConfig {
            platform_bps: DEFAULT_PLATFORM_FEE_BPS,
            beneficiary_bps: DEFAULT_BENEFICIARY_FEE_BPS,
        }
    }
}

impl FeeConfig {
    pub fn validate(&self) -> SlipwayResult<()> {
        if self.platform_bps > FEE_CEILING_BPS || self.beneficiary_bps > FEE_CEILING_BPS {
            return Err(SlipwayError::FeeRatioTooLarge);
        }
        Ok(())
    }

    /// Combined fee share in bps.
    pub fn total_bps(&self) -> u128 {
        u128::from(self.platform_bps) + u128::from(self.beneficiary_bps)
    }
}

/// Pad-wide configuration shared by every token the orchestrator creates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PadConfig {
    /// Administrative owner of the pad.
    pub owner: Address,
    /// Destination for platform fees and the listing fee.
    pub platform_destination: Address,
    /// Key whose signature authorizes curation claims.
    pub claim_authority: Address,
    #[serde(with = "dec_str")]
    pub create_fee: u128,
    #[serde(with = "dec_str")]
    pub list_fee: u128,
    #[serde(with = "dec_str")]
    pub claim_fee: u128,
    pub fees: FeeConfig,
    pub curve: CurveConfig,
}

impl PadConfig {
    /// Config with default economics for the given administrative keys.
    pub fn new(owner: Address, platform_destination: Address, claim_authority: Address) -> Self {
        PadConfig {
            owner,
            platform_destination,
            claim_authority,
            create_fee: DEFAULT_CREATE_FEE,
            list_fee: DEFAULT_LIST_FEE,
            claim_fee: DEFAULT_CLAIM_FEE,
            fees: FeeConfig::default(),
            curve: CurveConfig::default(),
        }
    }

    pub fn validate(&self) -> SlipwayResult<()> {
        if self.owner.is_zero() || self.platform_destination.is_zero() {
            return Err(SlipwayError::ZeroAddress);
        }
        self.fees.validate()?;
        self.curve.validate()
    }

    /// Parse a pad configuration from TOML.
    pub fn from_toml(s: &str) -> SlipwayResult<Self> {
        let cfg: PadConfig =
            toml::from_str(s).map_err(|e| SlipwayError::InvalidConfig(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
