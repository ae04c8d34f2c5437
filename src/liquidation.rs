//! Liquidation price solvers, one per collateral mode.
//!
//! Each solver finds the mark price at which the margin balance equals the
//! maintenance requirement `m * |position| * price`. Quote and base collateral
//! admit exact closed forms. Quanto collateral does not: the collateral
//! currency moves with the base index, so the solver linearizes that joint
//! move at a one-sided 90% confidence level and solves the linearized
//! condition instead.
//!
//! `None` means no liquidation price exists (zero position or a vanishing
//! denominator). A non-positive result is returned raw: it marks a position
//! that no price move in the liquidation direction can liquidate.

use crate::margin::maintenance_margin_rate;
use crate::params::PerpParameters;
use crate::state::{AmmState, CollateralMode};
use crate::types::{Price, SignedSize};
use rust_decimal::prelude::Signed;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

// one-sided 90% quantile of the standard normal
const CONFIDENCE_Z: Decimal = dec!(1.2816);

/// Liquidation price, quote-currency collateral. Solves
/// `cash + position * price - locked_in = m * |position| * price`.
pub fn liquidation_price_collateral_quote(
    locked_in_value_qc: Decimal,
    position: SignedSize,
    cash_qc: Decimal,
    maint_margin_rate: Decimal,
) -> Option<Decimal> {
    let denom = position.value() - maint_margin_rate * position.abs();
    if position.is_zero() || denom.is_zero() {
        return None;
    }
    Some((locked_in_value_qc - cash_qc) / denom)
}

/// Liquidation price, base-currency collateral. The cash leg is worth
/// `cash * price`, so it folds into the position term:
/// `(position + cash) * price - locked_in = m * |position| * price`.
pub fn liquidation_price_collateral_base(
    locked_in_value_qc: Decimal,
    position: SignedSize,
    cash_bc: Decimal,
    maint_margin_rate: Decimal,
) -> Option<Decimal> {
    let denom = position.value() + cash_bc - maint_margin_rate * position.abs();
    if position.is_zero() || denom.is_zero() {
        return None;
    }
    Some(locked_in_value_qc / denom)
}

/// Liquidation price, quanto collateral: a risk-calibrated approximation, not
/// an exact root.
///
/// The quanto index `s3` is modeled conditional on the base index reaching the
/// liquidation level `p`: regression slope `b = rho23 * sigma3 / sigma2` on the
/// base return, minus (for positive cash) the 90% one-sided band of the
/// residual, `z * sigma3 * sqrt(1 - rho23^2)`. Substituting
/// `s3' = s3 * (a + b * p / s2)` into the margin condition keeps it linear
/// in `p`.
#[allow(clippy::too_many_arguments)]
pub fn liquidation_price_collateral_quanto(
    locked_in_value_qc: Decimal,
    position: SignedSize,
    cash_cc: Decimal,
    maint_margin_rate: Decimal,
    rho23: Decimal,
    sigma2: Decimal,
    sigma3: Decimal,
    index_s2: Decimal,
    index_s3: Decimal,
) -> Option<Decimal> {
    if position.is_zero() || index_s2.is_zero() {
        return None;
    }
    let b = if sigma2.is_zero() {
        Decimal::ZERO
    } else {
        rho23 * sigma3 / sigma2
    };
    let residual_var = (Decimal::ONE - rho23 * rho23).max(Decimal::ZERO);
    let noise = CONFIDENCE_Z * sigma3 * residual_var.sqrt().unwrap_or(Decimal::ZERO);
    // adverse direction of the residual: collateral held is undervalued,
    // collateral owed is overvalued
    let a = Decimal::ONE - b - cash_cc.signum() * noise;

    let denom = position.value() - maint_margin_rate * position.abs()
        + cash_cc * index_s3 * b / index_s2;
    if denom.is_zero() {
        return None;
    }
    Some((locked_in_value_qc - cash_cc * index_s3 * a) / denom)
}

/// Approximate price at which the position gets liquidated, dispatching on the
/// instrument's collateral mode. `cash_cc` is the trader cash backing the
/// position, in collateral currency.
pub fn approx_liquidation_price(
    position: SignedSize,
    cash_cc: Decimal,
    amm: &AmmState,
    params: &PerpParameters,
) -> Option<Decimal> {
    let maint_rate = maintenance_margin_rate(position, params);
    match amm.collateral {
        CollateralMode::Quote { .. } => {
            liquidation_price_collateral_quote(amm.l1, position, cash_cc, maint_rate)
        }
        CollateralMode::Base { .. } => {
            liquidation_price_collateral_base(amm.l1, position, cash_cc, maint_rate)
        }
        CollateralMode::Quanto { .. } => liquidation_price_collateral_quanto(
            amm.l1,
            position,
            cash_cc,
            maint_rate,
            params.rho23,
            params.sigma2,
            params.sigma3,
            amm.index_s2_price,
            amm.index_s3_price,
        ),
    }
}

/// Penalty charged on a liquidated position, quote currency.
pub fn liquidation_penalty(
    position: SignedSize,
    mark_price: Price,
    params: &PerpParameters,
) -> Decimal {
    position.abs() * mark_price.value() * params.liquidation_penalty_rate
}
