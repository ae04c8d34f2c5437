// 8.0: trader accounting against the mark price. locked-in value plays the
// role of the entry cost: pnl = position * mark - locked_in.

use crate::pricing::{base_to_collateral_fx, mark_price, quote_to_collateral_fx};
use crate::state::{AmmState, TraderState};
use rust_decimal::Decimal;

/// Unrealized profit/loss at the mark price, quote currency.
pub fn trader_pnl(trader: &TraderState, amm: &AmmState) -> Decimal {
    trader.margin_account_position_bc.value() * mark_price(amm).value()
        - trader.margin_account_locked_in_value_qc
}

/// Unrealized profit/loss at the mark price, collateral currency. `None` when
/// the conversion has no oracle price to work with.
pub fn trader_pnl_in_cc(trader: &TraderState, amm: &AmmState) -> Option<Decimal> {
    quote_to_collateral_fx(amm).map(|fx| fx * trader_pnl(trader, amm))
}

/// Current effective leverage: position value at mark over available cash.
/// `None` with zero available cash: leverage is undefined, not infinite, so
/// callers can render a placeholder instead of a runaway number.
pub fn trader_leverage(trader: &TraderState, amm: &AmmState) -> Option<Decimal> {
    if trader.available_cash_cc.is_zero() {
        return None;
    }
    base_to_collateral_fx(amm, true).map(|fx| {
        trader.margin_account_position_bc.value() * fx / trader.available_cash_cc
    })
}
