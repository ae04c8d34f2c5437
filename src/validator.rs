//! Pre-trade gate for the order form.
//!
//! Runs the cheap checks a submit action needs before any transaction is
//! built: the trade must clear the lot size (no undertrading), fit the
//! AMM-side size bound, respect the position's maximum initial leverage
//! (no over-leveraging), and be coverable by the trader's collateral.
//! Checks run in that order and the first failure wins.

use crate::margin::{max_initial_leverage, trading_fee};
use crate::params::PerpParameters;
use crate::sizing::maximal_trade_size_in_perpetual;
use crate::state::{AmmState, TraderState};
use crate::types::{Leverage, Side, SignedSize};
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq)]
pub enum TradeCheck {
    Pass,
    /// Trade is smaller than one lot and cannot execute.
    BelowLotSize { minimum: Decimal },
    /// Trade exceeds what the AMM will take in this direction.
    ExceedsMaxTradeSize { maximum: SignedSize },
    /// Requested leverage is above what the initial margin curve allows for
    /// the target position.
    OverLeveraged {
        max_leverage: Leverage,
        requested: Leverage,
    },
    /// Margin account surplus plus wallet balance cannot cover the position.
    InsufficientCollateral {
        required: Decimal,
        available: Decimal,
    },
}

pub fn validate_trade(
    trade_size: SignedSize,
    leverage: Leverage,
    available_wallet_balance: Decimal,
    params: &PerpParameters,
    trader: &TraderState,
    amm: &AmmState,
) -> TradeCheck {
    // 1. undertrading: anything below one lot never executes
    if trade_size.abs() < params.lot_size_bc {
        return TradeCheck::BelowLotSize {
            minimum: params.lot_size_bc,
        };
    }
    let side = match trade_size.side() {
        Some(side) => side,
        None => {
            return TradeCheck::BelowLotSize {
                minimum: params.lot_size_bc,
            }
        }
    };

    // 2. AMM-side size bound
    let current_pos = trader.margin_account_position_bc;
    let max_trade = maximal_trade_size_in_perpetual(current_pos, side, amm, params);
    let exceeds = match side {
        Side::Long => trade_size.value() > max_trade.value(),
        Side::Short => trade_size.value() < max_trade.value(),
    };
    if exceeds {
        return TradeCheck::ExceedsMaxTradeSize { maximum: max_trade };
    }

    // 3. leverage bound at the target position
    let target_pos = current_pos.add(trade_size.value());
    if let Some(max_leverage) = max_initial_leverage(target_pos, params) {
        if leverage.value() > max_leverage.value() {
            return TradeCheck::OverLeveraged {
                max_leverage,
                requested: leverage,
            };
        }
    }

    // 4. collateral coverage, fees included
    let required = target_pos.abs() / leverage.value() + trading_fee(trade_size.value(), params);
    let available = trader.available_margin_cc + available_wallet_balance;
    if required > available {
        return TradeCheck::InsufficientCollateral {
            required,
            available,
        };
    }

    TradeCheck::Pass
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::CollateralMode;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn base_amm() -> AmmState {
        AmmState {
            l1: dec!(-100000),
            k2: dec!(-2),
            collateral: CollateralMode::Base {
                pool_cash_bc: dec!(10),
            },
            current_trader_exposure_ema: dec!(0.5),
            index_s2_price: dec!(50000),
            index_s3_price: dec!(0),
            current_premium: dec!(10),
            current_premium_ema: dec!(8),
        }
    }

    fn trader_with_margin(available_margin_cc: Decimal) -> TraderState {
        TraderState {
            margin_balance_cc: available_margin_cc,
            available_margin_cc,
            available_cash_cc: available_margin_cc,
            margin_account_cash_cc: available_margin_cc,
            margin_account_position_bc: SignedSize::zero(),
            margin_account_locked_in_value_qc: dec!(0),
            unit_accumulated_funding_start: dec!(0),
        }
    }

    #[test]
    fn well_formed_trade_passes() {
        let check = validate_trade(
            SignedSize::new(dec!(0.1)),
            Leverage::new(dec!(5)).unwrap(),
            dec!(0),
            &PerpParameters::default(),
            &trader_with_margin(dec!(1)),
            &base_amm(),
        );
        assert_eq!(check, TradeCheck::Pass);
    }

    #[test]
    fn dust_trade_rejected() {
        let params = PerpParameters::default();
        let check = validate_trade(
            SignedSize::new(dec!(0.001)),
            Leverage::new(dec!(5)).unwrap(),
            dec!(0),
            &params,
            &trader_with_margin(dec!(1)),
            &base_amm(),
        );
        assert_eq!(
            check,
            TradeCheck::BelowLotSize {
                minimum: params.lot_size_bc
            }
        );
    }

    #[test]
    fn oversized_trade_rejected_with_bound() {
        let check = validate_trade(
            SignedSize::new(dec!(5)),
            Leverage::new(dec!(5)).unwrap(),
            dec!(0),
            &PerpParameters::default(),
            &trader_with_margin(dec!(100)),
            &base_amm(),
        );
        // AMM bound: max(k-star = 2, EMA headroom 0.624) = 2
        assert_eq!(
            check,
            TradeCheck::ExceedsMaxTradeSize {
                maximum: SignedSize::new(dec!(2))
            }
        );
    }

    #[test]
    fn excess_leverage_rejected() {
        let check = validate_trade(
            SignedSize::new(dec!(2)),
            Leverage::new(dec!(50)).unwrap(),
            dec!(0),
            &PerpParameters::default(),
            &trader_with_margin(dec!(100)),
            &base_amm(),
        );
        // max leverage at position 2: 1 / (0.02 + 0.0001 * 2) ≈ 49.5
        assert!(matches!(check, TradeCheck::OverLeveraged { .. }));
    }

    #[test]
    fn thin_collateral_rejected() {
        let check = validate_trade(
            SignedSize::new(dec!(2)),
            Leverage::new(dec!(5)).unwrap(),
            dec!(0),
            &PerpParameters::default(),
            &trader_with_margin(dec!(0.1)),
            &base_amm(),
        );
        // required: 2/5 + 2 * 0.001 = 0.402 against 0.1 available
        match check {
            TradeCheck::InsufficientCollateral {
                required,
                available,
            } => {
                assert_eq!(required, dec!(0.402));
                assert_eq!(available, dec!(0.1));
            }
            other => panic!("expected InsufficientCollateral, got {:?}", other),
        }
    }
}
