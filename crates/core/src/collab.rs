//! External collaborator seams.
//!
//! The reputation registry and the AMM are opaque to the engine; both are
//! invoked only after internal state has settled, and a failure rolls the
//! call back.

use slipway_types::{Address, SlipwayResult};

/// Reputation-share registry that beneficiary fees route through.
pub trait IpShare {
    /// Whether `owner` has a registered share. Consulted before any trade
    /// that names `owner` as beneficiary.
    fn is_registered(&self, owner: &Address) -> bool;

    /// Forward `amount` wei of captured fees to `owner`'s share.
    fn capture_value(&mut self, owner: &Address, amount: u128) -> SlipwayResult<()>;
}

/// The AMM a token graduates to when its curve sells out.
pub trait AmmDex {
    /// Create the trading pool for `token`. Called exactly once per token.
    fn create_pool(&mut self, token: Address, tick: &str) -> SlipwayResult<Address>;

    /// Deposit the listing inventory into `pool`. Liquidity ownership goes
    /// to `recipient`.
    fn seed_liquidity(
        &mut self,
        pool: Address,
        token_amount: u128,
        value_amount: u128,
        recipient: Address,
    ) -> SlipwayResult<()>;
}
