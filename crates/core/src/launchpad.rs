//! The launch orchestrator.
//!
//! One `LaunchPad` owns every token it has launched, the pad-wide
//! configuration, the accrued platform fees, and the event journal. All
//! mutation flows through it; collaborator traits are only touched after
//! internal state has settled, and a collaborator failure rolls the call
//! back.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use slipway_types::{Address, Event, EventJournal, PadConfig, SlipwayError, SlipwayResult};

use crate::claims::{self, ClaimOrder};
use crate::collab::{AmmDex, IpShare};
use crate::token::{Token, TradeReceipt};

/// Outcome of a token launch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CreateReceipt {
    pub token: Address,
    /// Settlement of the initial buy, when the launch carried value beyond
    /// the creation fee.
    pub trade: Option<TradeReceipt>,
}

pub struct LaunchPad<I: IpShare, D: AmmDex> {
    pub address: Address,
    config: PadConfig,
    ip_share: I,
    dex: D,
    tokens: BTreeMap<Address, Token>,
    by_tick: BTreeMap<String, Address>,
    /// Wei accrued for the platform destination: creation fees, listing
    /// fees, platform trade shares, claim processing fees.
    platform_accrued: u128,
    journal: EventJournal,
}

impl<I: IpShare, D: AmmDex> LaunchPad<I, D> {
    pub fn new(address: Address, config: PadConfig, ip_share: I, dex: D) -> SlipwayResult<Self> {
        config.validate()?;
        Ok(LaunchPad {
            address,
            config,
            ip_share,
            dex,
            tokens: BTreeMap::new(),
            by_tick: BTreeMap::new(),
            platform_accrued: 0,
            journal: EventJournal::new(),
        })
    }

    // ------------------------------------------------------------------
    // Launching
    // ------------------------------------------------------------------

    /// Launch a new token under `tick`. Value above the creation fee is
    /// spent on an initial buy for the creator, in the same call; if that
    /// buy fails, the launch fails with it.
    pub fn create_token(
        &mut self,
        creator: &Address,
        tick: &str,
        value: u128,
        now: u64,
    ) -> SlipwayResult<CreateReceipt> {
        if creator.is_zero() {
            return Err(SlipwayError::ZeroAddress);
        }
        if value < self.config.create_fee {
            return Err(SlipwayError::InsufficientCreateFee);
        }
        if self.by_tick.contains_key(tick) {
            return Err(SlipwayError::TickHasBeenCreated);
        }
        let address = Address::derive(&self.address, tick);
        let mut token = Token::new(
            address,
            tick.to_string(),
            *creator,
            self.config.curve.clone(),
            now,
        );

        let excess = value - self.config.create_fee;
        let receipt = if excess > 0 {
            Some(token.buy(
                creator,
                0,
                10_000,
                excess,
                &self.config.fees,
                self.config.list_fee,
                &mut self.dex,
                now,
            )?)
        } else {
            None
        };

        self.accrue_platform(self.config.create_fee)?;
        self.by_tick.insert(tick.to_string(), address);
        self.tokens.insert(address, token);
        self.journal.record(Event::NewToken {
            tick: tick.to_string(),
            token: address,
            creator: *creator,
        });
        info!(%address, tick, %creator, "token created");
        if let Some(receipt) = &receipt {
            self.settle_trade(address, *creator, None, true, receipt)?;
        }
        Ok(CreateReceipt {
            token: address,
            trade: receipt,
        })
    }

    // ------------------------------------------------------------------
    // Trading
    // ------------------------------------------------------------------

    /// Value-driven buy on the curve of the token under `tick`. A
    /// beneficiary, if named, must be registered with the reputation
    /// collaborator and earns the beneficiary fee share.
    pub fn buy(
        &mut self,
        buyer: &Address,
        tick: &str,
        expected_amount: u128,
        slippage_bps: u16,
        beneficiary: Option<Address>,
        value: u128,
        now: u64,
    ) -> SlipwayResult<TradeReceipt> {
        let beneficiary = self.check_beneficiary(beneficiary)?;
        let address = self.resolve_tick(tick)?;
        let token = self
            .tokens
            .get_mut(&address)
            .ok_or(SlipwayError::TokenNotFound)?;
        let rollback = beneficiary.map(|_| token.clone());
        let receipt = token.buy(
            buyer,
            expected_amount,
            slippage_bps,
            value,
            &self.config.fees,
            self.config.list_fee,
            &mut self.dex,
            now,
        )?;
        let mut unforwarded = 0u128;
        if let (Some(owner), Some(previous)) = (beneficiary, rollback) {
            if receipt.beneficiary_fee > 0 {
                match self.ip_share.capture_value(&owner, receipt.beneficiary_fee) {
                    Ok(()) => {}
                    // The pool already exists on the AMM, so the trade can
                    // no longer be unwound; the share falls to the platform.
                    Err(_) if receipt.listing.is_some() => {
                        warn!(%owner, fee = receipt.beneficiary_fee,
                            "beneficiary capture failed after listing");
                        unforwarded = receipt.beneficiary_fee;
                    }
                    Err(err) => {
                        *token = previous;
                        return Err(err);
                    }
                }
            }
        }
        if unforwarded > 0 {
            self.accrue_platform(unforwarded)?;
        }
        self.settle_trade(address, *buyer, beneficiary, true, &receipt)?;
        Ok(receipt)
    }

    /// Sell back into the curve; fees come off the gross proceeds and the
    /// net is owed to the seller (`receipt.payout`).
    pub fn sell(
        &mut self,
        seller: &Address,
        tick: &str,
        amount: u128,
        min_value_out: u128,
        beneficiary: Option<Address>,
        _now: u64,
    ) -> SlipwayResult<TradeReceipt> {
        let beneficiary = self.check_beneficiary(beneficiary)?;
        let address = self.resolve_tick(tick)?;
        let token = self
            .tokens
            .get_mut(&address)
            .ok_or(SlipwayError::TokenNotFound)?;
        let rollback = beneficiary.map(|_| token.clone());
        let receipt = token.sell(seller, amount, min_value_out, &self.config.fees)?;
        if let (Some(owner), Some(previous)) = (beneficiary, rollback) {
            if receipt.beneficiary_fee > 0 {
                if let Err(err) = self.ip_share.capture_value(&owner, receipt.beneficiary_fee) {
                    *token = previous;
                    return Err(err);
                }
            }
        }
        self.settle_trade(address, *seller, beneficiary, false, &receipt)?;
        Ok(receipt)
    }

    /// Plain value sent straight to a token: a no-expectation buy before
    /// listing, retained afterwards.
    pub fn receive_value(
        &mut self,
        sender: &Address,
        token: &Address,
        value: u128,
        now: u64,
    ) -> SlipwayResult<TradeReceipt> {
        let entry = self
            .tokens
            .get_mut(token)
            .ok_or(SlipwayError::TokenNotFound)?;
        let receipt = entry.receive_value(
            sender,
            value,
            &self.config.fees,
            self.config.list_fee,
            &mut self.dex,
            now,
        )?;
        if receipt.amount > 0 || receipt.listing.is_some() {
            self.settle_trade(*token, *sender, None, true, &receipt)?;
        }
        Ok(receipt)
    }

    /// Holder-to-holder transfer on a token's ledger.
    pub fn transfer(
        &mut self,
        token: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> SlipwayResult<()> {
        let entry = self
            .tokens
            .get_mut(token)
            .ok_or(SlipwayError::TokenNotFound)?;
        entry.transfer(from, to, amount)?;
        self.journal.record(Event::Transfer {
            token: *token,
            from: *from,
            to: *to,
            amount,
        });
        Ok(())
    }

    // ------------------------------------------------------------------
    // Claims
    // ------------------------------------------------------------------

    /// Pay out a curation reward authorized by the claim authority's
    /// signature over `(token, order_id, claimant, amount)`.
    pub fn user_claim(
        &mut self,
        token: &Address,
        order_id: u64,
        claimant: &Address,
        amount: u128,
        signature: &[u8; 65],
        fee_value: u128,
        now: u64,
    ) -> SlipwayResult<()> {
        if claimant.is_zero() {
            return Err(SlipwayError::InvalidClaimer);
        }
        let entry = self
            .tokens
            .get_mut(token)
            .ok_or(SlipwayError::TokenNotFound)?;
        if !entry.is_listed() {
            return Err(SlipwayError::TokenNotListed);
        }
        if fee_value < self.config.claim_fee {
            return Err(SlipwayError::CostFeeFail);
        }
        // Replays fail here, before the signature is even looked at.
        if entry.has_claim_order(order_id) {
            return Err(SlipwayError::ClaimOrderExist);
        }
        let order = ClaimOrder {
            token: *token,
            order_id,
            user: *claimant,
            amount,
        };
        claims::verify(&order, signature, &self.config.claim_authority)?;
        entry.record_claim(&order, now)?;
        // The processing fee and any excess sent with it are retained.
        self.accrue_platform(fee_value)?;
        self.journal.record(Event::UserClaimReward {
            token: *token,
            order_id,
            user: *claimant,
            amount,
        });
        info!(%token, order_id, user = %claimant, amount, "curation reward claimed");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Admin (owner-gated)
    // ------------------------------------------------------------------

    fn require_owner(&self, caller: &Address) -> SlipwayResult<()> {
        if *caller != self.config.owner {
            return Err(SlipwayError::Unauthorized);
        }
        Ok(())
    }

    /// Change the trade fee shares, applied to all future trades.
    pub fn set_fee_ratio(
        &mut self,
        caller: &Address,
        platform_bps: u16,
        beneficiary_bps: u16,
    ) -> SlipwayResult<()> {
        self.require_owner(caller)?;
        let fees = slipway_types::FeeConfig {
            platform_bps,
            beneficiary_bps,
        };
        fees.validate()?;
        self.config.fees = fees;
        Ok(())
    }

    pub fn set_fee_destination(&mut self, caller: &Address, dest: Address) -> SlipwayResult<()> {
        self.require_owner(caller)?;
        if dest.is_zero() {
            return Err(SlipwayError::ZeroAddress);
        }
        self.config.platform_destination = dest;
        Ok(())
    }

    pub fn set_claim_authority(&mut self, caller: &Address, authority: Address) -> SlipwayResult<()> {
        self.require_owner(caller)?;
        self.config.claim_authority = authority;
        Ok(())
    }

    pub fn set_create_fee(&mut self, caller: &Address, fee: u128) -> SlipwayResult<()> {
        self.require_owner(caller)?;
        self.config.create_fee = fee;
        Ok(())
    }

    /// Change the watermark threshold for tokens launched from now on.
    pub fn set_unlock_threshold(&mut self, caller: &Address, bps: u16) -> SlipwayResult<()> {
        self.require_owner(caller)?;
        let mut curve = self.config.curve.clone();
        curve.unlock_threshold_bps = bps;
        curve.validate()?;
        self.config.curve = curve;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    pub fn config(&self) -> &PadConfig {
        &self.config
    }

    pub fn total_tokens(&self) -> usize {
        self.tokens.len()
    }

    /// Every launched token address, in creation-independent (address)
    /// order.
    pub fn created_tokens(&self) -> Vec<Address> {
        self.tokens.keys().copied().collect()
    }

    pub fn token(&self, address: &Address) -> Option<&Token> {
        self.tokens.get(address)
    }

    pub fn token_by_tick(&self, tick: &str) -> Option<&Token> {
        self.by_tick.get(tick).and_then(|addr| self.tokens.get(addr))
    }

    pub fn platform_fees_accrued(&self) -> u128 {
        self.platform_accrued
    }

    pub fn ip_share(&self) -> &I {
        &self.ip_share
    }

    pub fn dex(&self) -> &D {
        &self.dex
    }

    pub fn pending_claim_rewards(&self, token: &Address, now: u64) -> SlipwayResult<u128> {
        self.tokens
            .get(token)
            .ok_or(SlipwayError::TokenNotFound)?
            .pending_claim_rewards(now)
    }

    pub fn total_claimed(&self, token: &Address) -> SlipwayResult<u128> {
        Ok(self
            .tokens
            .get(token)
            .ok_or(SlipwayError::TokenNotFound)?
            .total_claimed())
    }

    /// `(rate_per_second, era_start, era_end)` of the current distribution
    /// era, `None` while the token still trades on the curve.
    pub fn current_distribution_era(
        &self,
        token: &Address,
        now: u64,
    ) -> SlipwayResult<Option<(u128, u64, u64)>> {
        Ok(self
            .tokens
            .get(token)
            .ok_or(SlipwayError::TokenNotFound)?
            .current_distribution_era(now))
    }

    /// Drain the buffered events, oldest first.
    pub fn take_events(&mut self) -> Vec<Event> {
        self.journal.drain()
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn resolve_tick(&self, tick: &str) -> SlipwayResult<Address> {
        self.by_tick
            .get(tick)
            .copied()
            .ok_or(SlipwayError::TokenNotFound)
    }

    /// Resolve an optional beneficiary: zero means none, anything else
    /// must hold a registered reputation share.
    fn check_beneficiary(&self, beneficiary: Option<Address>) -> SlipwayResult<Option<Address>> {
        match beneficiary {
            None => Ok(None),
            Some(owner) if owner.is_zero() => Ok(None),
            Some(owner) => {
                if !self.ip_share.is_registered(&owner) {
                    return Err(SlipwayError::IPShareNotCreated);
                }
                Ok(Some(owner))
            }
        }
    }

    fn accrue_platform(&mut self, amount: u128) -> SlipwayResult<()> {
        self.platform_accrued = self
            .platform_accrued
            .checked_add(amount)
            .ok_or(SlipwayError::MathOverflow)?;
        Ok(())
    }

    /// Book the fee shares of a settled trade and emit its events. The
    /// beneficiary share was already forwarded if a beneficiary was named;
    /// otherwise it folds into the platform accrual.
    fn settle_trade(
        &mut self,
        token: Address,
        trader: Address,
        beneficiary: Option<Address>,
        is_buy: bool,
        receipt: &TradeReceipt,
    ) -> SlipwayResult<()> {
        self.accrue_platform(receipt.platform_fee)?;
        if beneficiary.is_none() {
            self.accrue_platform(receipt.beneficiary_fee)?;
        }
        debug!(
            %token,
            %trader,
            is_buy,
            amount = receipt.amount,
            value = receipt.gross_value,
            "curve trade"
        );
        self.journal.record(Event::Trade {
            token,
            trader,
            beneficiary: beneficiary.unwrap_or(Address::ZERO),
            is_buy,
            token_amount: receipt.amount,
            value: if is_buy {
                receipt.gross_value
            } else {
                receipt.payout
            },
            platform_fee: receipt.platform_fee,
            beneficiary_fee: receipt.beneficiary_fee,
        });
        if let Some(listing) = receipt.listing {
            self.accrue_platform(listing.list_fee)?;
            self.journal.record(Event::TokenListedToDex {
                token,
                pool: listing.pool,
                token_amount: listing.token_amount,
                value: listing.value_amount,
            });
        }
        Ok(())
    }
}
