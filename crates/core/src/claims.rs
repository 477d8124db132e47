//! Curation-reward claim orders and their signatures.
//!
//! A claim is authorized off-engine: the claim authority signs the packed
//! digest of `(token, order_id, user, amount)` with a recoverable secp256k1
//! key, Ethereum personal-message style. The engine verifies by recovering
//! the signer address from the 65-byte `r || s || v` signature.

use libsecp256k1::{recover, Message, PublicKey, RecoveryId, Signature};
use sha3::{Digest, Keccak256};
use slipway_types::{Address, SlipwayError, SlipwayResult};

const PERSONAL_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// One authorized claim against a token's curation pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClaimOrder {
    pub token: Address,
    pub order_id: u64,
    pub user: Address,
    pub amount: u128,
}

/// Tightly packed `keccak256(token || order_id:u256 || user || amount:u256)`.
fn packed_hash(order: &ClaimOrder) -> [u8; 32] {
    let mut word = [0u8; 32];
    let mut hasher = Keccak256::new();
    hasher.update(order.token.as_bytes());
    word[24..].copy_from_slice(&order.order_id.to_be_bytes());
    hasher.update(word);
    hasher.update(order.user.as_bytes());
    word = [0u8; 32];
    word[16..].copy_from_slice(&order.amount.to_be_bytes());
    hasher.update(word);
    hasher.finalize().into()
}

/// The 32-byte digest the authority actually signs: the packed hash wrapped
/// in the personal-message prefix.
pub fn claim_digest(order: &ClaimOrder) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(PERSONAL_PREFIX);
    hasher.update(packed_hash(order));
    hasher.finalize().into()
}

fn address_of(key: &PublicKey) -> Address {
    let serialized = key.serialize();
    // Skip the 0x04 uncompressed-point tag.
    Address::from_keccak(&serialized[1..])
}

/// Recover the signer of `digest` from an `r || s || v` signature,
/// accepting both the raw (0/1) and Ethereum (27/28) recovery-id forms.
pub fn recover_signer(digest: &[u8; 32], signature: &[u8; 65]) -> SlipwayResult<Address> {
    let v = match signature[64] {
        v @ 0..=3 => v,
        v @ 27..=30 => v - 27,
        _ => return Err(SlipwayError::InvalidSignature),
    };
    let recovery_id = RecoveryId::parse(v).map_err(|_| SlipwayError::InvalidSignature)?;
    let sig = Signature::parse_standard_slice(&signature[..64])
        .map_err(|_| SlipwayError::InvalidSignature)?;
    let message = Message::parse(digest);
    let key = recover(&message, &sig, &recovery_id).map_err(|_| SlipwayError::InvalidSignature)?;
    Ok(address_of(&key))
}

/// Check that `signature` over `order` recovers to `authority`.
pub fn verify(order: &ClaimOrder, signature: &[u8; 65], authority: &Address) -> SlipwayResult<()> {
    let signer = recover_signer(&claim_digest(order), signature)?;
    if signer != *authority {
        return Err(SlipwayError::InvalidSignature);
    }
    Ok(())
}
