//! Error taxonomy shared across the workspace.
//!
//! Variant names on the trading/claim surface are wire-compatible with the
//! original contract errors, spelling included. Every failure is rejected at
//! call time and leaves engine state untouched.

use thiserror::Error;

/// All errors the launch engine can surface.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlipwayError {
    // ------------------------------------------------------------------
    // Sequencing
    // ------------------------------------------------------------------
    #[error("token has not been listed yet")]
    TokenNotListed,

    #[error("token is already listed; curve trading is closed")]
    TokenListed,

    #[error("tick has been created")]
    TickHasBeenCreated,

    #[error("no token under that tick or address")]
    TokenNotFound,

    #[error("claim order already consumed")]
    ClaimOrderExist,

    // ------------------------------------------------------------------
    // Economic
    // ------------------------------------------------------------------
    #[error("delivered amount fell outside the slippage bound")]
    OutOfSlippage,

    #[error("insufficient fund attached to the call")]
    InsufficientFund,

    #[error("insufficient creation fee")]
    InsufficientCreateFee,

    #[error("claim processing fee not covered")]
    CostFeeFail,

    #[error("claim amount exceeds the unclaimed vested pool")]
    InvalidClaimAmount,

    #[error("insufficient balance: need {required}, have {available}")]
    InsufficientBalance { required: u128, available: u128 },

    #[error("amount is locked by the anti-snipe watermark")]
    CanntSellLockedToken,

    // ------------------------------------------------------------------
    // Authorization
    // ------------------------------------------------------------------
    #[error("claim signature does not recover to the claim authority")]
    InvalidSignature,

    #[error("invalid claimer")]
    InvalidClaimer,

    #[error("fee beneficiary has no registered reputation share")]
    IPShareNotCreated,

    #[error("caller is not the pad owner")]
    Unauthorized,

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------
    #[error("fee ratio exceeds the hard ceiling")]
    FeeRatioTooLarge,

    #[error("zero address where a real destination is required")]
    ZeroAddress,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ------------------------------------------------------------------
    // External collaborators
    // ------------------------------------------------------------------
    #[error("AMM pool creation or seeding failed")]
    CreateDexPoolFail,

    // ------------------------------------------------------------------
    // Math
    // ------------------------------------------------------------------
    #[error("math overflow")]
    MathOverflow,

    #[error("math underflow")]
    MathUnderflow,
}

/// Result alias used across the workspace.
pub type SlipwayResult<T> = Result<T, SlipwayError>;
