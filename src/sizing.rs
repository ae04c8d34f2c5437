// 5.0: trade sizing against the AMM. two bounds apply to every trade:
//   - the AMM-side inventory bound (k-star plus the trader-exposure EMA cap)
//   - the trader-side leverage bound (margin curve solved for position size)
// 5.1 lot rounding, 5.2 k-star, 5.3 AMM-side bound, 5.4 combined trader bound.

use crate::params::PerpParameters;
use crate::state::{AmmState, CollateralMode, TraderState};
use crate::types::{Side, SignedSize};
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

// 5.1: round toward zero to an exact lot multiple. never overshoots in
// magnitude, so a rounded size is always tradable.
pub fn shrink_to_lot(value: Decimal, lot_size: Decimal) -> Decimal {
    debug_assert!(lot_size > Decimal::ZERO);
    (value / lot_size).trunc() * lot_size
}

/// 5.2: the AMM's variance-minimizing closing target, signed in base currency.
///
/// Valuing the pool in its collateral currency, the trade that zeroes the
/// pool's stochastic term is:
///   quote collateral: `-k2` (flattens base exposure; cash is riskless in QC)
///   base collateral:  `-l1 / s2` (zeroes the quote leg that floats in BC terms)
/// The two-currency closed form does not extend to quanto pools; those
/// return zero.
pub fn calc_k_star(
    k2: Decimal,
    l1: Decimal,
    index_s2: Decimal,
    collateral: &CollateralMode,
) -> Decimal {
    match collateral {
        CollateralMode::Quote { .. } => -k2,
        CollateralMode::Base { .. } => {
            if index_s2.is_zero() {
                // no oracle price: treat the pool as already at its optimum
                return Decimal::ZERO;
            }
            -l1 / index_s2
        }
        CollateralMode::Quanto { .. } => Decimal::ZERO,
    }
}

/// 5.3: signed maximal size a trader may execute in `side`, ignoring the
/// trader's own margin. AMM inventory cap only: the trader-exposure EMA times
/// its bump-up bounds fresh exposure, while k-star lets trades that reduce AMM
/// risk go further. With a zero EMA the bound collapses to position-closing
/// size only.
pub fn maximal_trade_size_in_perpetual(
    current_pos: SignedSize,
    side: Side,
    amm: &AmmState,
    params: &PerpParameters,
) -> SignedSize {
    let lot = params.lot_size_bc;

    let k_star = if amm.is_quanto() {
        Decimal::ZERO
    } else {
        let raw = calc_k_star(amm.k2, amm.l1, amm.index_s2_price, &amm.collateral);
        shrink_to_lot(raw, lot)
    };

    let max_abs_trade_size = shrink_to_lot(
        amm.current_trader_exposure_ema * params.maximal_trade_size_bump_up,
        lot,
    );

    let max_signed = match side {
        Side::Short => {
            k_star.min((-max_abs_trade_size - current_pos.value()).min(Decimal::ZERO))
        }
        Side::Long => {
            k_star.max((max_abs_trade_size - current_pos.value()).max(Decimal::ZERO))
        }
    };

    SignedSize::new(shrink_to_lot(max_signed, lot))
}

/// 5.4: largest signed position the trader can hold in `side`, combining the
/// AMM-side bound with the leverage bound implied by available collateral
/// (margin account surplus plus wallet balance).
///
/// Returns zero when available collateral is negative: an under-margined
/// trader gets no new position, not an error.
pub fn signed_max_abs_position_for_trader(
    side: Side,
    available_wallet_balance: Decimal,
    params: &PerpParameters,
    trader: &TraderState,
    amm: &AmmState,
) -> SignedSize {
    let current_pos = trader.margin_account_position_bc;
    let max_signed_pos = current_pos.value()
        + maximal_trade_size_in_perpetual(current_pos, side, amm, params).value();

    let available_collateral = trader.available_margin_cc + available_wallet_balance;
    if available_collateral < Decimal::ZERO {
        return SignedSize::zero();
    }

    let pos_margin = margin_curve_inverse(available_collateral, params);

    match side {
        Side::Short => SignedSize::new((-pos_margin).max(max_signed_pos)),
        Side::Long => SignedSize::new(pos_margin.max(max_signed_pos)),
    }
}

/// Position size whose initial margin `alpha*p + beta*p^2` exactly consumes
/// `collateral`. Root of the margin-curve quadratic; linear limit when the
/// slope is zero.
fn margin_curve_inverse(collateral: Decimal, params: &PerpParameters) -> Decimal {
    let alpha = params.initial_margin_rate_alpha;
    let beta = params.margin_rate_beta;
    if beta.is_zero() {
        if alpha.is_zero() {
            // no margin curve at all: position size is unconstrained
            return Decimal::MAX;
        }
        return collateral / alpha;
    }
    let discriminant = alpha * alpha + dec!(4) * beta * collateral;
    // non-negative by construction: collateral >= 0 is checked by the caller
    let root = discriminant.sqrt().unwrap_or(Decimal::ZERO);
    (-alpha + root) / (dec!(2) * beta)
}
