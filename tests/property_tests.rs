//! Property-based tests for the risk math.
//!
//! These verify the engine invariants under random inputs: margin-curve
//! monotonicity, lot-rounding exactness, sizing sentinels and the
//! liquidation mirror relation.

use perp_risk_core::*;
use proptest::prelude::*;
use rust_decimal::prelude::Signed;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// Strategies for generating test data
fn position_strategy() -> impl Strategy<Value = Decimal> {
    (-1_000_000i64..=1_000_000i64).prop_map(|x| Decimal::new(x, 3)) // ±1000 BC
}

fn price_strategy() -> impl Strategy<Value = Decimal> {
    (100i64..10_000_000i64).prop_map(|x| Decimal::new(x, 2)) // $1 to $100k
}

fn lot_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..=5_000i64).prop_map(|x| Decimal::new(x, 4)) // 0.0001 to 0.5
}

fn collateral_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|x| Decimal::new(x, 2))
}

fn quote_amm(s2: Decimal) -> AmmState {
    AmmState {
        l1: dec!(100000),
        k2: dec!(2),
        collateral: CollateralMode::Quote {
            pool_cash_qc: dec!(1000000),
        },
        current_trader_exposure_ema: dec!(0.5),
        index_s2_price: s2,
        index_s3_price: Decimal::ZERO,
        current_premium: Decimal::ZERO,
        current_premium_ema: Decimal::ZERO,
    }
}

fn trader_with_margin(available_margin_cc: Decimal, position: Decimal) -> TraderState {
    TraderState {
        margin_balance_cc: available_margin_cc,
        available_margin_cc,
        available_cash_cc: available_margin_cc,
        margin_account_cash_cc: available_margin_cc,
        margin_account_position_bc: SignedSize::new(position),
        margin_account_locked_in_value_qc: Decimal::ZERO,
        unit_accumulated_funding_start: Decimal::ZERO,
    }
}

proptest! {
    /// Initial margin rate never drops below the zero-position rate and never
    /// exceeds the cap
    #[test]
    fn initial_rate_bounded(position in position_strategy()) {
        let params = PerpParameters::default();
        let rate = initial_margin_rate(SignedSize::new(position), &params);
        let base_rate = initial_margin_rate(SignedSize::zero(), &params);

        prop_assert!(rate >= base_rate);
        prop_assert!(rate <= params.initial_margin_rate_cap);
    }

    /// Initial margin rate is non-decreasing in |position|
    #[test]
    fn initial_rate_monotonic(
        position in position_strategy(),
        bump in 1i64..1_000_000i64,
    ) {
        let params = PerpParameters::default();
        let pos = SignedSize::new(position);
        let larger = SignedSize::new(
            position + position.signum() * Decimal::new(bump, 3),
        );

        if larger.abs() > pos.abs() {
            prop_assert!(
                initial_margin_rate(larger, &params) >= initial_margin_rate(pos, &params)
            );
        }
    }

    /// Maintenance margin rate never exceeds the initial rate
    #[test]
    fn maintenance_below_initial(position in position_strategy()) {
        let params = PerpParameters::default();
        let pos = SignedSize::new(position);

        prop_assert!(
            maintenance_margin_rate(pos, &params) <= initial_margin_rate(pos, &params)
        );
    }

    /// Lot rounding yields an exact multiple and moves by less than one lot
    #[test]
    fn shrink_to_lot_exact(
        value in position_strategy(),
        lot in lot_strategy(),
    ) {
        let shrunk = shrink_to_lot(value, lot);

        prop_assert_eq!(shrunk % lot, Decimal::ZERO);
        prop_assert!((shrunk - value).abs() < lot);
        prop_assert!(shrunk.abs() <= value.abs());
    }

    /// The AMM-side trade bound is lot-aligned and signed like the direction
    #[test]
    fn max_trade_size_lot_aligned(
        position in position_strategy(),
        s2 in price_strategy(),
    ) {
        let params = PerpParameters::default();
        let amm = quote_amm(s2);
        let pos = SignedSize::new(position);

        let buy = maximal_trade_size_in_perpetual(pos, Side::Long, &amm, &params);
        let sell = maximal_trade_size_in_perpetual(pos, Side::Short, &amm, &params);

        prop_assert_eq!(buy.value() % params.lot_size_bc, Decimal::ZERO);
        prop_assert_eq!(sell.value() % params.lot_size_bc, Decimal::ZERO);
        prop_assert!(buy.value() >= Decimal::ZERO);
        prop_assert!(sell.value() <= Decimal::ZERO);
    }

    /// Negative available collateral always yields a zero position bound
    #[test]
    fn under_margined_trader_gets_nothing(
        shortfall in 1i64..1_000_000i64,
        wallet in 0i64..100i64,
        position in position_strategy(),
        s2 in price_strategy(),
    ) {
        let params = PerpParameters::default();
        let amm = quote_amm(s2);
        let wallet_balance = Decimal::new(wallet, 2);
        // margin deficit strictly larger than the wallet can cover
        let margin = -Decimal::new(shortfall, 2) - wallet_balance - dec!(0.01);
        let trader = trader_with_margin(margin, position);

        for side in [Side::Long, Side::Short] {
            let bound = signed_max_abs_position_for_trader(
                side,
                wallet_balance,
                &params,
                &trader,
                &amm,
            );
            prop_assert!(bound.is_zero());
        }
    }

    /// The leverage-bound solve exactly consumes the available collateral:
    /// alpha * p + beta * p^2 = collateral at the returned position
    #[test]
    fn leverage_bound_consumes_collateral(collateral in collateral_strategy()) {
        let params = PerpParameters::default();
        let amm = quote_amm(dec!(50000));
        // flat book so the AMM bound is small and the quadratic wins
        let trader = trader_with_margin(collateral, Decimal::ZERO);

        let bound = signed_max_abs_position_for_trader(
            Side::Long,
            Decimal::ZERO,
            &params,
            &trader,
            &amm,
        );

        let p = bound.value();
        let implied_margin = p * initial_margin_rate(bound, &params);
        // the bound may instead come from the AMM side; only check the
        // quadratic when it won
        if implied_margin > dec!(0.01) {
            let consumed = params.initial_margin_rate_alpha * p
                + params.margin_rate_beta * p * p;
            let cap_margin = params.initial_margin_rate_cap * p;
            if consumed < cap_margin {
                prop_assert!((consumed - collateral).abs() < dec!(0.01));
            }
        }
    }

    /// Quote-collateral liquidation mirror: a long and the sign-mirrored short
    /// satisfy long*(1-m) and short*(1+m) bracketing the same entry level,
    /// offset by exactly the cash on each side
    #[test]
    fn liquidation_mirror_consistency(
        entry in price_strategy(),
        pos in 1i64..1_000i64,
        cash in 0i64..1_000i64,
        m_bps in 1i64..=900i64,
    ) {
        let position = Decimal::new(pos, 1);
        let entry_price = entry;
        let locked = position * entry_price;
        let cash_qc = Decimal::new(cash, 2);
        let m = Decimal::new(m_bps, 4);

        let long = liquidation_price_collateral_quote(
            locked,
            SignedSize::new(position),
            cash_qc,
            m,
        )
        .unwrap();
        let short = liquidation_price_collateral_quote(
            -locked,
            SignedSize::new(-position),
            cash_qc,
            m,
        )
        .unwrap();

        // long*(1-m) = (locked - cash)/pos, short*(1+m) = (locked + cash)/pos
        let long_adj = long * (Decimal::ONE - m);
        let short_adj = short * (Decimal::ONE + m);
        let expected_gap = dec!(2) * cash_qc / position;
        prop_assert!(((short_adj - long_adj) - expected_gap).abs() < dec!(0.0001));

        // with more cash than the maintenance requirement at entry, the long
        // liquidates below entry and the short above
        if cash_qc > locked * m {
            prop_assert!(long < entry_price);
            prop_assert!(short > entry_price);
        }
    }

    /// Slippage price moves with the trade direction and scales linearly
    #[test]
    fn slippage_directional(
        mid in price_strategy(),
        pct in 1i64..=1_000i64,
    ) {
        let mid_price = Price::new_unchecked(mid);
        let pct = Decimal::new(pct, 2); // 0.01% to 10%

        let buy = slippage_price(mid_price, pct, Side::Long);
        let sell = slippage_price(mid_price, pct, Side::Short);

        prop_assert!(buy.value() > mid);
        prop_assert!(sell.value() < mid);
        // symmetric around the mid
        prop_assert_eq!(buy.value() + sell.value(), dec!(2) * mid);
    }
}
