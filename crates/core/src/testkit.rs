//! In-memory collaborators and signing helpers for tests and simulations.

use std::collections::BTreeMap;

use libsecp256k1::{sign, Message, PublicKey, SecretKey};

use slipway_types::{Address, SlipwayError, SlipwayResult};

use crate::claims::{claim_digest, ClaimOrder};
use crate::collab::{AmmDex, IpShare};

/// Reputation registry backed by a map.
#[derive(Debug, Default)]
pub struct MemoryIpShare {
    captured: BTreeMap<Address, u128>,
}

impl MemoryIpShare {
    pub fn new() -> Self {
        MemoryIpShare::default()
    }

    /// Register `owner` with a zero opening balance.
    pub fn register(&mut self, owner: Address) {
        self.captured.entry(owner).or_insert(0);
    }

    /// Total fee value captured for `owner`.
    pub fn captured_for(&self, owner: &Address) -> u128 {
        self.captured.get(owner).copied().unwrap_or(0)
    }
}

impl IpShare for MemoryIpShare {
    fn is_registered(&self, owner: &Address) -> bool {
        self.captured.contains_key(owner)
    }

    fn capture_value(&mut self, owner: &Address, amount: u128) -> SlipwayResult<()> {
        let entry = self
            .captured
            .get_mut(owner)
            .ok_or(SlipwayError::IPShareNotCreated)?;
        *entry = entry
            .checked_add(amount)
            .ok_or(SlipwayError::MathOverflow)?;
        Ok(())
    }
}

/// AMM stub that mints deterministic pool addresses, or fails on demand.
#[derive(Debug, Default)]
pub struct MemoryDex {
    fail: bool,
    pools: Vec<(Address, Address, u128, u128)>,
}

impl MemoryDex {
    pub fn new() -> Self {
        MemoryDex::default()
    }

    /// A dex whose pool creation always fails, for rollback tests.
    pub fn failing() -> Self {
        MemoryDex {
            fail: true,
            pools: Vec::new(),
        }
    }

    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    /// `(token, token_amount, value_amount)` seeded into `pool`.
    pub fn seeded(&self, pool: &Address) -> Option<(Address, u128, u128)> {
        self.pools
            .iter()
            .find(|(p, _, _, _)| p == pool)
            .map(|(_, token, tokens, value)| (*token, *tokens, *value))
    }
}

impl AmmDex for MemoryDex {
    fn create_pool(&mut self, token: Address, tick: &str) -> SlipwayResult<Address> {
        if self.fail {
            return Err(SlipwayError::CreateDexPoolFail);
        }
        let pool = Address::derive(&token, tick);
        self.pools.push((pool, token, 0, 0));
        Ok(pool)
    }

    fn seed_liquidity(
        &mut self,
        pool: Address,
        token_amount: u128,
        value_amount: u128,
        _recipient: Address,
    ) -> SlipwayResult<()> {
        let entry = self
            .pools
            .iter_mut()
            .find(|(p, _, _, _)| *p == pool)
            .ok_or(SlipwayError::CreateDexPoolFail)?;
        entry.2 = token_amount;
        entry.3 = value_amount;
        Ok(())
    }
}

/// A claim authority with an in-memory secp256k1 key.
pub struct ClaimSigner {
    secret: SecretKey,
    address: Address,
}

impl ClaimSigner {
    /// Deterministic signer derived from a seed byte.
    pub fn from_seed(seed: u8) -> Self {
        let mut bytes = [seed; 32];
        bytes[0] = 1;
        // The adjusted seed is always a valid scalar.
        let secret = SecretKey::parse(&bytes).unwrap_or_else(|_| unreachable!());
        let public = PublicKey::from_secret_key(&secret);
        let serialized = public.serialize();
        let address = Address::from_keccak(&serialized[1..]);
        ClaimSigner { secret, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Sign a claim order, Ethereum personal-message style, `v` in 27/28.
    pub fn sign_order(&self, order: &ClaimOrder) -> [u8; 65] {
        let (sig, rid) = sign(&Message::parse(&claim_digest(order)), &self.secret);
        let mut out = [0u8; 65];
        out[..64].copy_from_slice(&sig.serialize());
        out[64] = rid.serialize() + 27;
        out
    }
}
