//! # Slipway Core
//!
//! The launch engine proper: tokens that trade on a bonding curve until
//! their capacity sells out, graduate to an AMM in the same call, and then
//! vest a curation pool claimable against authority-signed orders.
//!
//! [`LaunchPad`] is the entry point: it owns every [`Token`], the pad
//! configuration, accrued platform fees, and the event journal. The
//! reputation registry and the AMM stay behind the [`collab`] traits.

pub mod claims;
pub mod collab;
pub mod fees;
pub mod launchpad;
pub mod ledger;
pub mod testkit;
pub mod token;

pub use claims::ClaimOrder;
pub use collab::{AmmDex, IpShare};
pub use fees::FeeSplit;
pub use launchpad::{CreateReceipt, LaunchPad};
pub use ledger::Ledger;
pub use token::{ListingReport, Phase, Token, TradeReceipt};
