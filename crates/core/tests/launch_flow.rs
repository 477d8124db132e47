//! End-to-end launch lifecycle: creation, curve trading, fee routing, the
//! anti-snipe lock, and the listing migration.

use slipway_core::testkit::{ClaimSigner, MemoryDex, MemoryIpShare};
use slipway_core::{IpShare, LaunchPad, Phase};
use slipway_types::constants::{
    BASE_UNIT, CURVE_CAPACITY, DEFAULT_CREATE_FEE, DEFAULT_LIST_FEE,
};
use slipway_types::{Address, Event, PadConfig, SlipwayError};

const ETH: u128 = BASE_UNIT;

fn addr(b: u8) -> Address {
    Address([b; 20])
}

fn owner() -> Address {
    addr(0x01)
}

fn pad() -> LaunchPad<MemoryIpShare, MemoryDex> {
    let authority = ClaimSigner::from_seed(42).address();
    let config = PadConfig::new(owner(), addr(0x02), authority);
    LaunchPad::new(addr(0xf0), config, MemoryIpShare::new(), MemoryDex::new())
        .expect("default config is valid")
}

#[test]
fn creation_charges_the_fee_and_registers_the_tick() {
    let mut pad = pad();
    let created = pad
        .create_token(&addr(10), "MEME", DEFAULT_CREATE_FEE, 100)
        .unwrap();
    assert!(created.trade.is_none());
    assert_eq!(pad.total_tokens(), 1);
    assert_eq!(pad.platform_fees_accrued(), DEFAULT_CREATE_FEE);

    let token = pad.token(&created.token).unwrap();
    assert_eq!(token.tick, "MEME");
    assert_eq!(token.creator, addr(10));
    assert_eq!(token.sold(), 0);
    assert!(pad.token_by_tick("MEME").is_some());

    let events = pad.take_events();
    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], Event::NewToken { tick, .. } if tick == "MEME"));
}

#[test]
fn creation_guards() {
    let mut pad = pad();
    assert_eq!(
        pad.create_token(&addr(10), "MEME", DEFAULT_CREATE_FEE - 1, 100)
            .unwrap_err(),
        SlipwayError::InsufficientCreateFee
    );
    pad.create_token(&addr(10), "MEME", DEFAULT_CREATE_FEE, 100)
        .unwrap();
    assert_eq!(
        pad.create_token(&addr(11), "MEME", DEFAULT_CREATE_FEE, 101)
            .unwrap_err(),
        SlipwayError::TickHasBeenCreated
    );
    assert_eq!(
        pad.create_token(&Address::ZERO, "OTHER", DEFAULT_CREATE_FEE, 100)
            .unwrap_err(),
        SlipwayError::ZeroAddress
    );
}

#[test]
fn value_beyond_the_creation_fee_buys_in_the_same_call() {
    let mut pad = pad();
    let created = pad
        .create_token(&addr(10), "MEME", DEFAULT_CREATE_FEE + ETH / 10, 100)
        .unwrap();
    let trade = created.trade.unwrap();
    assert_eq!(trade.amount, 55_686_417_719_552_202_074_504_491);
    assert_eq!(trade.platform_fee, 1_000_000_000_000_000);
    assert_eq!(trade.beneficiary_fee, 1_000_000_000_000_000);

    let token = pad.token(&created.token).unwrap();
    assert_eq!(token.balance_of(&addr(10)), trade.amount);
    // Below the watermark threshold, so the whole position is locked.
    assert_eq!(token.locked_of(&addr(10)), trade.amount);
    // Creation fee plus both fee shares (no beneficiary was named).
    assert_eq!(
        pad.platform_fees_accrued(),
        DEFAULT_CREATE_FEE + 2_000_000_000_000_000
    );

    let events = pad.take_events();
    assert!(matches!(events[0], Event::NewToken { .. }));
    assert!(matches!(events[1], Event::Trade { is_buy: true, .. }));
}

#[test]
fn buys_route_beneficiary_fees_through_the_reputation_share() {
    let mut ip_share = MemoryIpShare::new();
    ip_share.register(addr(0x77));
    let authority = ClaimSigner::from_seed(42).address();
    let config = PadConfig::new(owner(), addr(0x02), authority);
    let mut pad = LaunchPad::new(addr(0xf0), config, ip_share, MemoryDex::new()).unwrap();

    pad.create_token(&addr(10), "MEME", DEFAULT_CREATE_FEE, 100)
        .unwrap();

    // Unregistered beneficiary is rejected up front.
    assert_eq!(
        pad.buy(&addr(11), "MEME", 0, 10_000, Some(addr(0x66)), ETH, 101)
            .unwrap_err(),
        SlipwayError::IPShareNotCreated
    );

    let receipt = pad
        .buy(&addr(11), "MEME", 0, 10_000, Some(addr(0x77)), ETH, 101)
        .unwrap();
    assert_eq!(receipt.platform_fee + receipt.beneficiary_fee + ETH * 98 / 100, ETH);
    assert_eq!(pad.ip_share().captured_for(&addr(0x77)), receipt.beneficiary_fee);
    let token = pad.token_by_tick("MEME").unwrap();
    assert_eq!(token.balance_of(&addr(11)), receipt.amount);

    let events = pad.take_events();
    let trade = events
        .iter()
        .find(|e| matches!(e, Event::Trade { .. }))
        .unwrap();
    if let Event::Trade {
        beneficiary,
        beneficiary_fee,
        ..
    } = trade
    {
        assert_eq!(*beneficiary, addr(0x77));
        assert_eq!(*beneficiary_fee, receipt.beneficiary_fee);
    }
}

#[test]
fn unknown_tick_is_rejected() {
    let mut pad = pad();
    assert_eq!(
        pad.buy(&addr(11), "NOPE", 0, 10_000, None, ETH, 101)
            .unwrap_err(),
        SlipwayError::TokenNotFound
    );
}

#[test]
fn slippage_bound_rejects_a_short_fill() {
    let mut pad = pad();
    pad.create_token(&addr(10), "MEME", DEFAULT_CREATE_FEE, 100)
        .unwrap();
    // One native unit delivers ~267M tokens after fees; demanding 300M
    // with a tight bound misses.
    assert_eq!(
        pad.buy(
            &addr(11),
            "MEME",
            300_000_000 * BASE_UNIT,
            100,
            None,
            ETH,
            101
        )
        .unwrap_err(),
        SlipwayError::OutOfSlippage
    );
    assert_eq!(pad.token_by_tick("MEME").unwrap().sold(), 0);
}

#[test]
fn early_positions_are_locked_until_transferred_tokens_are_not() {
    let mut pad = pad();
    let token = pad
        .create_token(&addr(10), "MEME", DEFAULT_CREATE_FEE, 100)
        .unwrap()
        .token;
    let receipt = pad.buy(&addr(11), "MEME", 0, 10_000, None, ETH, 101).unwrap();

    // Locked: neither sell nor transfer may touch the watermarked amount.
    assert_eq!(
        pad.sell(&addr(11), "MEME", receipt.amount, 0, None, 102)
            .unwrap_err(),
        SlipwayError::CanntSellLockedToken
    );
    assert_eq!(
        pad.transfer(&token, &addr(11), &addr(12), receipt.amount)
            .unwrap_err(),
        SlipwayError::CanntSellLockedToken
    );
    assert_eq!(pad.token(&token).unwrap().balance_of(&addr(11)), receipt.amount);
}

#[test]
fn late_buys_are_free_to_sell() {
    let mut pad = pad();
    pad.create_token(&addr(10), "MEME", DEFAULT_CREATE_FEE, 100)
        .unwrap();
    // 3 native units push cumulative sales past the 50% watermark line
    // (cost of 325M tokens is ~0.9 native units).
    pad.buy(&addr(11), "MEME", 0, 10_000, None, 3 * ETH, 101)
        .unwrap();
    let receipt = pad.buy(&addr(12), "MEME", 0, 10_000, None, ETH, 102).unwrap();
    let token = pad.token_by_tick("MEME").unwrap();
    assert_eq!(token.locked_of(&addr(12)), 0);

    let sale = pad
        .sell(&addr(12), "MEME", receipt.amount, 0, None, 103)
        .unwrap();
    assert!(sale.payout > 0);
    // A round trip through the curve can never profit the trader.
    assert!(sale.payout <= ETH);
    let events = pad.take_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::Trade { is_buy: false, .. })));
}

#[test]
fn exhausting_the_curve_lists_the_token() {
    let mut pad = pad();
    let token = pad
        .create_token(&addr(10), "MEME", DEFAULT_CREATE_FEE, 100)
        .unwrap()
        .token;
    let fees_before = pad.platform_fees_accrued();

    let receipt = pad
        .buy(&addr(11), "MEME", 0, 10_000, None, 7 * ETH, 200)
        .unwrap();

    // Partial fill at the grossed-up cost of the whole curve.
    assert_eq!(receipt.amount, CURVE_CAPACITY);
    assert_eq!(receipt.gross_value, 5_901_182_552_511_555_063);
    assert_eq!(receipt.payout, 1_098_817_447_488_444_937);

    let listing = receipt.listing.unwrap();
    assert_eq!(listing.token_amount, 200_000_000 * BASE_UNIT);
    assert_eq!(listing.value_amount, 4_783_158_901_461_323_963);
    assert_eq!(listing.list_fee, DEFAULT_LIST_FEE);

    let entry = pad.token(&token).unwrap();
    assert!(entry.is_listed());
    assert!(matches!(entry.phase(), Phase::Listed { listed_at: 200, .. }));
    assert_eq!(entry.reserve(), 0);

    // Platform got both trade fee shares plus the listing fee.
    assert_eq!(
        pad.platform_fees_accrued(),
        fees_before + 2 * 59_011_825_525_115_550 + DEFAULT_LIST_FEE
    );

    let events = pad.take_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::TokenListedToDex { pool, .. } if *pool == listing.pool)));

    // The curve is closed now.
    assert_eq!(
        pad.buy(&addr(12), "MEME", 0, 10_000, None, ETH, 201)
            .unwrap_err(),
        SlipwayError::TokenListed
    );
    assert_eq!(
        pad.sell(&addr(11), "MEME", BASE_UNIT, 0, None, 201).unwrap_err(),
        SlipwayError::TokenListed
    );
}

#[test]
fn listing_seeds_the_pool_through_the_dex() {
    let authority = ClaimSigner::from_seed(42).address();
    let config = PadConfig::new(owner(), addr(0x02), authority);
    let mut pad =
        LaunchPad::new(addr(0xf0), config, MemoryIpShare::new(), MemoryDex::new()).unwrap();
    let created = pad
        .create_token(&addr(10), "MEME", DEFAULT_CREATE_FEE + 7 * ETH, 100)
        .unwrap();
    // The launch value alone exhausted the curve.
    let listing = created.trade.unwrap().listing.unwrap();
    let token = pad.token(&created.token).unwrap();
    assert!(token.is_listed());
    assert_eq!(listing.token_amount, 200_000_000 * BASE_UNIT);

    // The stub dex really holds the seeded liquidity.
    assert_eq!(pad.dex().pool_count(), 1);
    assert_eq!(
        pad.dex().seeded(&listing.pool),
        Some((created.token, listing.token_amount, listing.value_amount))
    );
}

#[test]
fn a_listing_survives_a_failed_beneficiary_capture() {
    let mut ip_share = MemoryIpShare::new();
    ip_share.register(addr(0x77));
    // Saturate the share so any further capture overflows.
    ip_share.capture_value(&addr(0x77), u128::MAX).unwrap();
    let authority = ClaimSigner::from_seed(42).address();
    let config = PadConfig::new(owner(), addr(0x02), authority);
    let mut pad = LaunchPad::new(addr(0xf0), config, ip_share, MemoryDex::new()).unwrap();
    pad.create_token(&addr(10), "MEME", DEFAULT_CREATE_FEE, 100)
        .unwrap();

    // Pre-listing the trade unwinds cleanly.
    assert_eq!(
        pad.buy(&addr(11), "MEME", 0, 10_000, Some(addr(0x77)), ETH, 101)
            .unwrap_err(),
        SlipwayError::MathOverflow
    );
    assert_eq!(pad.token_by_tick("MEME").unwrap().sold(), 0);

    // A terminal buy has already seeded the AMM pool when the capture runs;
    // the listing stands and the share lands with the platform instead.
    let fees_before = pad.platform_fees_accrued();
    let receipt = pad
        .buy(&addr(11), "MEME", 0, 10_000, Some(addr(0x77)), 7 * ETH, 200)
        .unwrap();
    assert!(pad.token_by_tick("MEME").unwrap().is_listed());
    assert_eq!(pad.dex().pool_count(), 1);
    assert_eq!(
        pad.platform_fees_accrued(),
        fees_before + receipt.platform_fee + receipt.beneficiary_fee + DEFAULT_LIST_FEE
    );
}

#[test]
fn direct_value_is_a_buy_pre_list_and_retained_post_list() {
    let mut pad = pad();
    let token = pad
        .create_token(&addr(10), "MEME", DEFAULT_CREATE_FEE, 100)
        .unwrap()
        .token;

    let receipt = pad.receive_value(&addr(11), &token, ETH, 101).unwrap();
    assert!(receipt.amount > 0);
    assert_eq!(pad.token(&token).unwrap().balance_of(&addr(11)), receipt.amount);

    pad.buy(&addr(12), "MEME", 0, 10_000, None, 7 * ETH, 102)
        .unwrap();
    let retained = pad.receive_value(&addr(11), &token, 55, 103).unwrap();
    assert_eq!(retained.amount, 0);
    assert_eq!(pad.token(&token).unwrap().reserve(), 55);
}

#[test]
fn admin_surface_is_owner_gated() {
    let mut pad = pad();
    let stranger = addr(0x99);
    assert_eq!(
        pad.set_fee_ratio(&stranger, 50, 50).unwrap_err(),
        SlipwayError::Unauthorized
    );
    assert_eq!(
        pad.set_create_fee(&stranger, 0).unwrap_err(),
        SlipwayError::Unauthorized
    );
    assert_eq!(
        pad.set_fee_destination(&stranger, addr(3)).unwrap_err(),
        SlipwayError::Unauthorized
    );

    // Ceiling is enforced at configure time.
    assert_eq!(
        pad.set_fee_ratio(&owner(), 1001, 0).unwrap_err(),
        SlipwayError::FeeRatioTooLarge
    );
    pad.set_fee_ratio(&owner(), 0, 0).unwrap();
    pad.set_create_fee(&owner(), 0).unwrap();
    pad.set_fee_destination(&owner(), addr(3)).unwrap();
    assert_eq!(
        pad.set_fee_destination(&owner(), Address::ZERO).unwrap_err(),
        SlipwayError::ZeroAddress
    );

    // New ratio applies to the next trade: no fee at all.
    pad.create_token(&addr(10), "MEME", 0, 100).unwrap();
    let receipt = pad.buy(&addr(11), "MEME", 0, 10_000, None, ETH, 101).unwrap();
    assert_eq!(receipt.platform_fee, 0);
    assert_eq!(receipt.beneficiary_fee, 0);
}

#[test]
fn unlock_threshold_applies_to_future_launches() {
    let mut pad = pad();
    pad.set_unlock_threshold(&owner(), 0).unwrap();
    pad.create_token(&addr(10), "FREE", DEFAULT_CREATE_FEE, 100)
        .unwrap();
    let receipt = pad.buy(&addr(11), "FREE", 0, 10_000, None, ETH, 101).unwrap();
    // Threshold zero: nothing ever locks.
    let token = pad.token_by_tick("FREE").unwrap();
    assert_eq!(token.locked_of(&addr(11)), 0);
    pad.sell(&addr(11), "FREE", receipt.amount, 0, None, 102)
        .unwrap();
}
