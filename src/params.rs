// 2.0: per-instrument parameters, refreshed from chain. read-only snapshot:
// the engine never mutates these, a new snapshot simply supersedes the old one.
// 2.1 has the decode-boundary validation.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerpParameters {
    // margin curve: rate(pos) = min(alpha + beta * |pos|, cap)
    pub initial_margin_rate_alpha: Decimal,
    pub margin_rate_beta: Decimal,
    pub initial_margin_rate_cap: Decimal,
    pub maintenance_margin_rate_alpha: Decimal,

    // fees, all relative to traded size
    pub treasury_fee_rate: Decimal,
    pub pnl_part_rate: Decimal,
    pub referral_rebate_rate: Decimal,
    pub liquidation_penalty_rate: Decimal,
    pub minimal_spread: Decimal,
    pub incentive_spread: Decimal,

    // sizing
    // minimum tradable increment in base currency
    pub lot_size_bc: Decimal,
    // multiplier on the trader-exposure EMA that caps single-trade size
    pub maximal_trade_size_bump_up: Decimal,
    pub minimal_trader_exposure_ema: Decimal,

    // funding and risk
    pub funding_rate_clamp: Decimal,
    pub mark_price_ema_lambda: Decimal,
    // volatility of the base index (sigma2) and quanto index (sigma3),
    // and their correlation. only consulted for quanto instruments.
    pub sigma2: Decimal,
    pub sigma3: Decimal,
    pub rho23: Decimal,

    // default fund / AMM stress parameters
    pub stress_return_s2_0: Decimal,
    pub stress_return_s2_1: Decimal,
    pub stress_return_s3_0: Decimal,
    pub stress_return_s3_1: Decimal,
    pub df_cover_n: Decimal,
    pub df_lambda_0: Decimal,
    pub df_lambda_1: Decimal,
    pub amm_target_dd: Decimal,
    pub amm_min_size_cc: Decimal,

    // funding accumulator state, written by the on-chain settlement
    pub current_funding_rate: Decimal,
    pub unit_accumulated_funding: Decimal,
}

impl Default for PerpParameters {
    fn default() -> Self {
        // BTCUSD collateralized in BTC
        Self {
            initial_margin_rate_alpha: dec!(0.02),
            margin_rate_beta: dec!(0.0001),
            initial_margin_rate_cap: dec!(0.1),
            maintenance_margin_rate_alpha: dec!(0.01),
            treasury_fee_rate: dec!(0.0002),
            pnl_part_rate: dec!(0.0008),
            referral_rebate_rate: dec!(0.000015),
            liquidation_penalty_rate: dec!(0.05),
            minimal_spread: dec!(0.00025),
            incentive_spread: dec!(0.0005),
            lot_size_bc: dec!(0.002),
            maximal_trade_size_bump_up: dec!(1.25),
            minimal_trader_exposure_ema: dec!(0.05),
            funding_rate_clamp: dec!(0.0005),
            mark_price_ema_lambda: dec!(0.7),
            sigma2: dec!(0.05),
            sigma3: dec!(0.08),
            rho23: dec!(0.1),
            stress_return_s2_0: dec!(-0.3),
            stress_return_s2_1: dec!(0.2),
            stress_return_s3_0: dec!(-0.25),
            stress_return_s3_1: dec!(0.15),
            df_cover_n: dec!(2),
            df_lambda_0: dec!(0.1),
            df_lambda_1: dec!(0.05),
            amm_target_dd: dec!(-2.33),
            amm_min_size_cc: dec!(1),
            current_funding_rate: dec!(0.0001),
            unit_accumulated_funding: dec!(0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamsError {
    #[error("rate field {0} must be within [0, 1]")]
    RateOutOfRange(&'static str),

    #[error("margin rate cap below alpha")]
    CapBelowAlpha,

    #[error("maintenance alpha exceeds initial alpha")]
    MaintenanceAboveInitial,

    #[error("margin rate slope must be non-negative")]
    NegativeSlope,

    #[error("lot size must be positive")]
    NonPositiveLotSize,
}

impl PerpParameters {
    // 2.1: invariant checks at the decode boundary. a snapshot that fails here
    // came from a corrupted read and must not reach the calculators.
    pub fn validate(&self) -> Result<(), ParamsError> {
        let rates: [(&'static str, Decimal); 9] = [
            ("initial_margin_rate_alpha", self.initial_margin_rate_alpha),
            ("initial_margin_rate_cap", self.initial_margin_rate_cap),
            (
                "maintenance_margin_rate_alpha",
                self.maintenance_margin_rate_alpha,
            ),
            ("treasury_fee_rate", self.treasury_fee_rate),
            ("pnl_part_rate", self.pnl_part_rate),
            ("referral_rebate_rate", self.referral_rebate_rate),
            ("liquidation_penalty_rate", self.liquidation_penalty_rate),
            ("minimal_spread", self.minimal_spread),
            ("incentive_spread", self.incentive_spread),
        ];
        for (name, rate) in rates {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(ParamsError::RateOutOfRange(name));
            }
        }
        if self.margin_rate_beta < Decimal::ZERO {
            return Err(ParamsError::NegativeSlope);
        }
        if self.initial_margin_rate_cap < self.initial_margin_rate_alpha {
            return Err(ParamsError::CapBelowAlpha);
        }
        if self.maintenance_margin_rate_alpha > self.initial_margin_rate_alpha {
            return Err(ParamsError::MaintenanceAboveInitial);
        }
        if self.lot_size_bc <= Decimal::ZERO {
            return Err(ParamsError::NonPositiveLotSize);
        }
        Ok(())
    }
}
