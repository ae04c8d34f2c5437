// 9.0: funding accounting. the chain settles funding continuously into a
// per-unit accumulator; a position's accrued fee is the accumulator movement
// since entry times the signed position.

use crate::params::PerpParameters;
use crate::state::TraderState;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// funding rate is quoted per 8-hour period, 3 periods a day
const PERIODS_PER_YEAR: Decimal = dec!(1095);

/// Funding accrued by the trader's position since it was opened, collateral
/// currency. Positive = the trader owes funding.
pub fn accrued_funding_fee(trader: &TraderState, params: &PerpParameters) -> Decimal {
    let accumulated =
        params.unit_accumulated_funding - trader.unit_accumulated_funding_start;
    // TODO: verify sign and scaling against the on-chain settlement formula
    // before surfacing this anywhere that gates a transaction
    accumulated * trader.margin_account_position_bc.value()
}

/// Clamp a raw funding rate to the instrument's configured band, mirroring
/// what settlement applies on-chain.
pub fn clamp_funding_rate(raw_rate: Decimal, params: &PerpParameters) -> Decimal {
    raw_rate
        .max(-params.funding_rate_clamp)
        .min(params.funding_rate_clamp)
}

/// Annualized view of a per-period funding rate, for display.
pub fn annualized_funding_rate(period_rate: Decimal) -> Decimal {
    period_rate * PERIODS_PER_YEAR
}
