//! Events emitted by the launch engine.
//!
//! Every state-changing operation records exactly the events listed here, in
//! execution order, into the pad's [`EventJournal`]. Indexers drain the
//! journal after each call.

use serde::{Deserialize, Serialize};

use crate::address::Address;

/// One emitted event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Event {
    /// A new token was launched.
    NewToken {
        tick: String,
        token: Address,
        creator: Address,
    },

    /// A curve trade settled. `value` is the gross value for buys and the
    /// net payout for sells; fees are reported separately.
    Trade {
        token: Address,
        trader: Address,
        beneficiary: Address,
        is_buy: bool,
        token_amount: u128,
        value: u128,
        platform_fee: u128,
        beneficiary_fee: u128,
    },

    /// The curve sold out and the token graduated to the AMM.
    TokenListedToDex {
        token: Address,
        pool: Address,
        token_amount: u128,
        value: u128,
    },

    /// A curation reward claim was paid out.
    UserClaimReward {
        token: Address,
        order_id: u64,
        user: Address,
        amount: u128,
    },

    /// Balance moved between holders outside the curve.
    Transfer {
        token: Address,
        from: Address,
        to: Address,
        amount: u128,
    },
}

/// Append-only event buffer owned by the pad.
#[derive(Debug, Default)]
pub struct EventJournal {
    events: Vec<Event>,
}

impl EventJournal {
    pub fn new() -> Self {
        EventJournal::default()
    }

    pub fn record(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Take all buffered events, oldest first.
    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}
