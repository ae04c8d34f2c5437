//! Margin-rate curves and trade collateral requirements.
//!
//! Margin rates grow linearly with position size up to a cap:
//! `rate(pos) = min(alpha + beta * |pos|, cap)`. The maintenance curve is the
//! initial curve rescaled by `maintenance_alpha / initial_alpha`, so a larger
//! position never widens the gap between the two the wrong way.

use crate::params::PerpParameters;
use crate::types::{Leverage, SignedSize};
use rust_decimal::Decimal;

/// Initial margin rate for a position. Non-decreasing in `|position|`, capped.
pub fn initial_margin_rate(position: SignedSize, params: &PerpParameters) -> Decimal {
    let rate =
        params.initial_margin_rate_alpha + params.margin_rate_beta * position.abs();
    rate.min(params.initial_margin_rate_cap)
}

/// Maintenance margin rate for a position: the initial-rate curve with the
/// maintenance alpha substituted for the initial alpha, same cap. Always at or
/// below the initial rate for the same position.
pub fn maintenance_margin_rate(position: SignedSize, params: &PerpParameters) -> Decimal {
    let alpha = params.initial_margin_rate_alpha;
    let slope_term = alpha + params.margin_rate_beta * position.abs();
    // degenerate curve with zero initial alpha: no ratio to apply
    let rate = if alpha.is_zero() {
        params.maintenance_margin_rate_alpha + params.margin_rate_beta * position.abs()
    } else {
        slope_term * params.maintenance_margin_rate_alpha / alpha
    };
    rate.min(params.initial_margin_rate_cap)
}

/// Largest leverage the initial margin requirement permits for this position.
/// `None` only for a degenerate all-zero margin curve.
pub fn max_initial_leverage(
    position: SignedSize,
    params: &PerpParameters,
) -> Option<Leverage> {
    let rate = initial_margin_rate(position, params);
    if rate.is_zero() {
        return None;
    }
    Leverage::new(Decimal::ONE / rate)
}

/// Fee rate applied to traded size: treasury cut plus PnL participation.
pub fn trading_fee_rate(params: &PerpParameters) -> Decimal {
    params.treasury_fee_rate + params.pnl_part_rate
}

/// Fee in collateral currency for trading `position_delta` base units.
pub fn trading_fee(position_delta: Decimal, params: &PerpParameters) -> Decimal {
    position_delta.abs() * trading_fee_rate(params)
}

/// Collateral needed to hold `target_pos` at `leverage`, reaching it from
/// `current_pos`. Fees are charged on the traded delta and always add to the
/// requirement, whichever direction the trade goes. Signed like the target:
/// a short target yields a negative position term.
pub fn required_margin_collateral(
    leverage: Leverage,
    current_pos: SignedSize,
    target_pos: SignedSize,
    params: &PerpParameters,
) -> Decimal {
    let position_to_trade = target_pos.value() - current_pos.value();
    let fees = trading_fee(position_to_trade, params);
    // leverage = position / (margin collateral - fees)
    //   -> margin collateral = position / leverage + fees
    target_pos.value() / leverage.value() + fees
}
