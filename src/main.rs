//! Risk-engine walkthrough.
//!
//! Drives the pure calculators through the flows the trade form runs on every
//! snapshot refresh: pricing, sizing bounds, collateral requirements,
//! liquidation previews and the pre-trade gate.

use perp_risk_core::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn main() {
    println!("Perpetual AMM Risk & Pricing Walkthrough");
    println!("BTCUSD collateralized in BTC, snapshots as of one refresh\n");

    let params = PerpParameters::default();
    params.validate().expect("default parameters are valid");
    let amm = btcusd_amm();
    let trader = funded_trader();

    scenario_1_pricing(&amm, &params);
    scenario_2_sizing(&amm, &params, &trader);
    scenario_3_collateral_and_gate(&amm, &params, &trader);
    scenario_4_liquidation(&amm, &params);
    scenario_5_pnl(&amm, &trader);
    scenario_6_collateral_modes();

    println!("\nWalkthrough completed.");
}

fn btcusd_amm() -> AmmState {
    AmmState {
        l1: dec!(19600),
        k2: dec!(0.4),
        collateral: CollateralMode::Base {
            pool_cash_bc: dec!(25),
        },
        current_trader_exposure_ema: dec!(0.8),
        index_s2_price: dec!(50000),
        index_s3_price: dec!(0),
        current_premium: dec!(14),
        current_premium_ema: dec!(10),
    }
}

fn funded_trader() -> TraderState {
    TraderState {
        margin_balance_cc: dec!(0.5),
        available_margin_cc: dec!(0.35),
        available_cash_cc: dec!(0.5),
        margin_account_cash_cc: dec!(0.5),
        margin_account_position_bc: SignedSize::new(dec!(0.4)),
        margin_account_locked_in_value_qc: dec!(19600),
        unit_accumulated_funding_start: dec!(0),
    }
}

fn scenario_1_pricing(amm: &AmmState, params: &PerpParameters) {
    println!("Scenario 1: Pricing\n");

    let mark = mark_price(amm);
    println!("  index price    {}", index_price(amm));
    println!("  mark price     {} (premium EMA {})", mark, amm.current_premium_ema);

    let buy = slippage_price(mark, dec!(0.5), Side::Long);
    let sell = slippage_price(mark, dec!(0.5), Side::Short);
    println!("  0.5% slippage  buy {} / sell {}", buy, sell);
    println!(
        "  funding        {}% per 8h, {}% annualized\n",
        params.current_funding_rate * dec!(100),
        annualized_funding_rate(params.current_funding_rate) * dec!(100)
    );
}

fn scenario_2_sizing(amm: &AmmState, params: &PerpParameters, trader: &TraderState) {
    println!("Scenario 2: Sizing bounds\n");

    let pos = trader.margin_account_position_bc;
    for side in [Side::Long, Side::Short] {
        let amm_bound = maximal_trade_size_in_perpetual(pos, side, amm, params);
        let trader_bound =
            signed_max_abs_position_for_trader(side, dec!(0.1), params, trader, amm);
        println!(
            "  {:?}: AMM-side max trade {}, max position {}",
            side, amm_bound, trader_bound
        );
    }
    println!();
}

fn scenario_3_collateral_and_gate(
    amm: &AmmState,
    params: &PerpParameters,
    trader: &TraderState,
) {
    println!("Scenario 3: Collateral requirement and pre-trade gate\n");

    let leverage = Leverage::new(dec!(10)).expect("10x is a valid leverage");
    let target = SignedSize::new(dec!(1));
    let required = required_margin_collateral(
        leverage,
        trader.margin_account_position_bc,
        target,
        params,
    );
    println!("  collateral for {} BTC at {}: {}", target, leverage, required);

    let trade = SignedSize::new(dec!(0.6));
    let check = validate_trade(trade, leverage, dec!(0.1), params, trader, amm);
    println!("  gate({} BTC at {}) -> {:?}", trade, leverage, check);

    let dust = validate_trade(
        SignedSize::new(dec!(0.0001)),
        leverage,
        dec!(0.1),
        params,
        trader,
        amm,
    );
    println!("  gate(dust trade) -> {:?}\n", dust);
}

fn scenario_4_liquidation(amm: &AmmState, params: &PerpParameters) {
    println!("Scenario 4: Liquidation preview\n");

    for (label, position, cash) in [
        ("0.4 BTC long", dec!(0.4), dec!(0.05)),
        ("0.4 BTC short", dec!(-0.4), dec!(0.05)),
    ] {
        let pos = SignedSize::new(position);
        match approx_liquidation_price(pos, cash, amm, params) {
            Some(price) if price > Decimal::ZERO => {
                println!("  {} backed by {} BTC liquidates near {}", label, cash, price.round_dp(2));
            }
            _ => println!("  {} backed by {} BTC cannot be liquidated", label, cash),
        }
    }

    let penalty = liquidation_penalty(
        SignedSize::new(dec!(0.4)),
        mark_price(amm),
        params,
    );
    println!("  penalty on liquidation: {} QC\n", penalty);
}

fn scenario_5_pnl(amm: &AmmState, trader: &TraderState) {
    println!("Scenario 5: PnL and leverage\n");

    println!("  pnl            {} QC", trader_pnl(trader, amm));
    match trader_pnl_in_cc(trader, amm) {
        Some(pnl) => println!("  pnl            {} CC", pnl.round_dp(6)),
        None => println!("  pnl            unavailable (no oracle price)"),
    }
    match trader_leverage(trader, amm) {
        Some(lev) => println!("  leverage       {}x\n", lev.round_dp(2)),
        None => println!("  leverage       undefined (no available cash)\n"),
    }
}

fn scenario_6_collateral_modes() {
    println!("Scenario 6: Collateral modes\n");

    let mut amm = btcusd_amm();
    for (label, collateral, s3) in [
        ("quote", CollateralMode::Quote { pool_cash_qc: dec!(1000000) }, dec!(0)),
        ("base", CollateralMode::Base { pool_cash_bc: dec!(25) }, dec!(0)),
        ("quanto", CollateralMode::Quanto { pool_cash_cc: dec!(60) }, dec!(20000)),
    ] {
        amm.collateral = collateral;
        amm.index_s3_price = s3;
        let q2c = quote_to_collateral_fx(&amm);
        let k_star = calc_k_star(amm.k2, amm.l1, amm.index_s2_price, &amm.collateral);
        println!(
            "  {:>6}: quote->collateral fx {:?}, k-star {}",
            label, q2c, k_star
        );
    }
}
