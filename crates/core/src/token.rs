//! A launched token: curve trading, the listing migration, and the
//! post-listing claim book.
//!
//! Every mutating method is atomic. Checks run first, effects mutate the
//! token, and the AMM collaborator is invoked last; if the AMM fails, the
//! effects are rolled back from a snapshot taken before them.

use std::collections::BTreeSet;

use tracing::info;

use slipway_math::{curve, VestingSchedule};
use slipway_types::constants::BPS_DENOMINATOR;
use slipway_types::{Address, CurveConfig, FeeConfig, SlipwayError, SlipwayResult};

use crate::claims::ClaimOrder;
use crate::collab::AmmDex;
use crate::fees;
use crate::ledger::Ledger;

/// Lifecycle state. The only transition is `Trading` → `Listed`, taken
/// inside the buy that exhausts the curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Trading { sold: u128 },
    Listed { pool: Address, listed_at: u64 },
}

/// Settlement report for one curve trade.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TradeReceipt {
    /// Token base units delivered (buy) or taken (sell).
    pub amount: u128,
    /// Wei actually consumed (buy) or gross proceeds (sell).
    pub gross_value: u128,
    pub platform_fee: u128,
    pub beneficiary_fee: u128,
    /// Wei owed back to the caller: the unspent remainder of a terminal
    /// buy, or the net proceeds of a sell.
    pub payout: u128,
    pub listing: Option<ListingReport>,
}

/// Emitted once, by the buy that fills the curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListingReport {
    pub pool: Address,
    pub token_amount: u128,
    pub value_amount: u128,
    pub list_fee: u128,
}

struct Snapshot {
    phase: Phase,
    reserve: u128,
    balance: u128,
    locked: u128,
}

/// One launched token and everything it custodies.
#[derive(Clone, Debug)]
pub struct Token {
    pub address: Address,
    pub tick: String,
    pub creator: Address,
    pub config: CurveConfig,
    pub created_at: u64,
    phase: Phase,
    ledger: Ledger,
    /// Wei backing open curve positions, swept into the pool at listing.
    reserve: u128,
    total_claimed: u128,
    claimed_orders: BTreeSet<u64>,
}

impl Token {
    pub fn new(
        address: Address,
        tick: String,
        creator: Address,
        config: CurveConfig,
        created_at: u64,
    ) -> Self {
        Token {
            address,
            tick,
            creator,
            config,
            created_at,
            phase: Phase::Trading { sold: 0 },
            ledger: Ledger::new(),
            reserve: 0,
            total_claimed: 0,
            claimed_orders: BTreeSet::new(),
        }
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_listed(&self) -> bool {
        matches!(self.phase, Phase::Listed { .. })
    }

    /// Cumulative base units sold through the curve.
    pub fn sold(&self) -> u128 {
        match self.phase {
            Phase::Trading { sold } => sold,
            Phase::Listed { .. } => self.config.curve_capacity,
        }
    }

    pub fn reserve(&self) -> u128 {
        self.reserve
    }

    pub fn balance_of(&self, who: &Address) -> u128 {
        self.ledger.balance_of(who)
    }

    pub fn locked_of(&self, who: &Address) -> u128 {
        self.ledger.locked_of(who)
    }

    pub fn total_claimed(&self) -> u128 {
        self.total_claimed
    }

    pub fn has_claim_order(&self, order_id: u64) -> bool {
        self.claimed_orders.contains(&order_id)
    }

    /// Vesting schedule for the curation pool, `None` before listing.
    pub fn vesting(&self) -> Option<VestingSchedule> {
        match self.phase {
            Phase::Trading { .. } => None,
            Phase::Listed { listed_at, .. } => Some(VestingSchedule::new(
                self.config.curation_pool,
                listed_at,
                self.config.era_seconds,
                self.config.era_count,
            )),
        }
    }

    /// Vested-but-unclaimed portion of the curation pool. Zero pre-list.
    pub fn pending_claim_rewards(&self, now: u64) -> SlipwayResult<u128> {
        match self.vesting() {
            None => Ok(0),
            Some(v) => Ok(v.vested_at(now)?.saturating_sub(self.total_claimed)),
        }
    }

    /// `(rate_per_second, era_start, era_end)` of the era `now` falls in,
    /// `None` before listing. Clipped to the schedule's first and last era.
    pub fn current_distribution_era(&self, now: u64) -> Option<(u128, u64, u64)> {
        let v = self.vesting()?;
        let duration = v.duration();
        if duration == 0 {
            return None;
        }
        let era = v.era_at(now).max(1);
        let start = v.start + u64::from(era - 1) * v.era_seconds;
        let rate = v.pool / u128::from(duration);
        Some((rate, start, start + v.era_seconds))
    }

    // ------------------------------------------------------------------
    // Curve trading
    // ------------------------------------------------------------------

    fn min_after_slippage(expected: u128, slippage_bps: u16) -> SlipwayResult<u128> {
        let keep = BPS_DENOMINATOR - u128::from(slippage_bps.min(10_000));
        expected
            .checked_mul(keep)
            .ok_or(SlipwayError::MathOverflow)
            .map(|scaled| scaled / BPS_DENOMINATOR)
    }

    /// Value-driven purchase. Fees come off the consumed value; the net
    /// buys as many base units as the curve will give. A buy that clears
    /// the remaining capacity is filled partially at the grossed-up cost
    /// of the remainder, refunds the rest, and runs the listing migration.
    pub fn buy<D: AmmDex>(
        &mut self,
        buyer: &Address,
        expected_amount: u128,
        slippage_bps: u16,
        value: u128,
        fees_cfg: &FeeConfig,
        list_fee: u128,
        dex: &mut D,
        now: u64,
    ) -> SlipwayResult<TradeReceipt> {
        if value == 0 {
            return Err(SlipwayError::InsufficientFund);
        }
        let sold = match self.phase {
            Phase::Trading { sold } => sold,
            Phase::Listed { .. } => return Err(SlipwayError::TokenListed),
        };
        let remaining = self.config.curve_capacity - sold;
        let min_out = Self::min_after_slippage(expected_amount, slippage_bps)?;
        let full_split = fees::split(value, fees_cfg)?;
        let amount = curve::amount_for_value(sold, full_split.net)?;
        let lock = sold < self.config.unlock_threshold();

        if amount < remaining {
            if amount < min_out {
                return Err(SlipwayError::OutOfSlippage);
            }
            let reserve_after = self
                .reserve
                .checked_add(full_split.net)
                .ok_or(SlipwayError::MathOverflow)?;
            self.ledger.credit(buyer, amount, lock)?;
            self.reserve = reserve_after;
            self.phase = Phase::Trading {
                sold: sold + amount,
            };
            return Ok(TradeReceipt {
                amount,
                gross_value: value,
                platform_fee: full_split.platform,
                beneficiary_fee: full_split.beneficiary,
                payout: 0,
                listing: None,
            });
        }

        // Terminal fill: charge only what the remaining inventory costs.
        if remaining < min_out {
            return Err(SlipwayError::OutOfSlippage);
        }
        let need = curve::cost(sold, remaining)?;
        // Fee-share flooring can push the grossed-up charge a few wei past
        // `value` when the net budget lands exactly on `need`; `value`
        // itself still nets at least `need` on this path, so clamp.
        let gross = fees::gross_up(need, fees_cfg)?.min(value);
        let split = fees::split(gross, fees_cfg)?;
        let refund = value - gross;
        let reserve_after = self
            .reserve
            .checked_add(split.net)
            .ok_or(SlipwayError::MathOverflow)?;
        let pool_value = reserve_after
            .checked_sub(list_fee)
            .ok_or(SlipwayError::InsufficientFund)?;
        let pool_tokens = self.config.liquidity_reserve();

        let snapshot = self.snapshot(buyer);
        self.ledger.credit(buyer, remaining, lock)?;
        self.reserve = 0;
        let pool = match self.run_listing(dex, pool_tokens, pool_value) {
            Ok(pool) => pool,
            Err(_) => {
                self.restore(buyer, snapshot);
                return Err(SlipwayError::CreateDexPoolFail);
            }
        };
        self.phase = Phase::Listed {
            pool,
            listed_at: now,
        };
        info!(token = %self.address, tick = %self.tick, %pool, "token listed to dex");

        Ok(TradeReceipt {
            amount: remaining,
            gross_value: gross,
            platform_fee: split.platform,
            beneficiary_fee: split.beneficiary,
            payout: refund,
            listing: Some(ListingReport {
                pool,
                token_amount: pool_tokens,
                value_amount: pool_value,
                list_fee,
            }),
        })
    }

    /// Sell base units back into the curve. Fees come off gross proceeds;
    /// the net is owed to the seller.
    pub fn sell(
        &mut self,
        seller: &Address,
        amount: u128,
        min_value_out: u128,
        fees_cfg: &FeeConfig,
    ) -> SlipwayResult<TradeReceipt> {
        let sold = match self.phase {
            Phase::Trading { sold } => sold,
            Phase::Listed { .. } => return Err(SlipwayError::TokenListed),
        };
        let gross = curve::proceeds(sold, amount)?;
        let split = fees::split(gross, fees_cfg)?;
        if split.net < min_value_out {
            return Err(SlipwayError::OutOfSlippage);
        }
        let reserve_after = self
            .reserve
            .checked_sub(gross)
            .ok_or(SlipwayError::InsufficientFund)?;
        self.ledger.debit(seller, amount)?;
        self.reserve = reserve_after;
        self.phase = Phase::Trading {
            sold: sold - amount,
        };
        Ok(TradeReceipt {
            amount,
            gross_value: gross,
            platform_fee: split.platform,
            beneficiary_fee: split.beneficiary,
            payout: split.net,
            listing: None,
        })
    }

    /// Plain value sent straight to the token. Pre-list it is a buy with
    /// no expectation; post-list the value is simply retained.
    pub fn receive_value<D: AmmDex>(
        &mut self,
        sender: &Address,
        value: u128,
        fees_cfg: &FeeConfig,
        list_fee: u128,
        dex: &mut D,
        now: u64,
    ) -> SlipwayResult<TradeReceipt> {
        if self.is_listed() {
            self.reserve = self
                .reserve
                .checked_add(value)
                .ok_or(SlipwayError::MathOverflow)?;
            return Ok(TradeReceipt {
                amount: 0,
                gross_value: value,
                platform_fee: 0,
                beneficiary_fee: 0,
                payout: 0,
                listing: None,
            });
        }
        self.buy(sender, 0, 10_000, value, fees_cfg, list_fee, dex, now)
    }

    /// Holder-to-holder transfer, gated by the lock watermark.
    pub fn transfer(&mut self, from: &Address, to: &Address, amount: u128) -> SlipwayResult<()> {
        if to.is_zero() {
            return Err(SlipwayError::ZeroAddress);
        }
        self.ledger.transfer(from, to, amount)
    }

    // ------------------------------------------------------------------
    // Claims
    // ------------------------------------------------------------------

    /// Apply an already-authorized claim: move `amount` from the curation
    /// pool to the claimant. The caller has verified the signature and the
    /// processing fee.
    pub fn record_claim(&mut self, order: &ClaimOrder, now: u64) -> SlipwayResult<()> {
        let vesting = self.vesting().ok_or(SlipwayError::TokenNotListed)?;
        if self.claimed_orders.contains(&order.order_id) {
            return Err(SlipwayError::ClaimOrderExist);
        }
        let available = vesting.vested_at(now)?.saturating_sub(self.total_claimed);
        if order.amount > available {
            return Err(SlipwayError::InvalidClaimAmount);
        }
        self.ledger.credit(&order.user, order.amount, false)?;
        self.total_claimed += order.amount;
        self.claimed_orders.insert(order.order_id);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn snapshot(&self, who: &Address) -> Snapshot {
        let (balance, locked) = self.ledger.position_of(who);
        Snapshot {
            phase: self.phase,
            reserve: self.reserve,
            balance,
            locked,
        }
    }

    fn restore(&mut self, who: &Address, snapshot: Snapshot) {
        self.phase = snapshot.phase;
        self.reserve = snapshot.reserve;
        self.ledger
            .restore_position(who, snapshot.balance, snapshot.locked);
    }

    fn run_listing<D: AmmDex>(
        &mut self,
        dex: &mut D,
        token_amount: u128,
        value_amount: u128,
    ) -> SlipwayResult<Address> {
        let pool = dex.create_pool(self.address, &self.tick)?;
        dex.seed_liquidity(pool, token_amount, value_amount, Address::BLACK_HOLE)?;
        Ok(pool)
    }
}
