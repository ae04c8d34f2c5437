// 6.0: price extraction and currency conversion. mark price = index plus the
// EMA-smoothed AMM premium; raw spot is never used for margin or PnL.
// conversions branch exhaustively on the collateral mode. a conversion that
// would divide by a missing oracle price reports None instead of a bogus rate.

use crate::state::{AmmState, CollateralMode};
use crate::types::{Price, Side};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Mark price: base index price adjusted by the smoothed AMM premium.
pub fn mark_price(amm: &AmmState) -> Price {
    Price::new_unchecked(amm.index_s2_price + amm.current_premium_ema)
}

/// Oracle index price, base → quote.
pub fn index_price(amm: &AmmState) -> Decimal {
    amm.index_s2_price
}

/// Oracle quanto price, quanto → quote. E.g. for ETHUSD margined in BTC this
/// is the BTCUSD price. Zero for two-currency instruments.
pub fn quanto_price(amm: &AmmState) -> Decimal {
    amm.index_s3_price
}

/// Conversion rate quote → collateral currency.
pub fn quote_to_collateral_fx(amm: &AmmState) -> Option<Decimal> {
    match amm.collateral {
        CollateralMode::Quote { .. } => Some(Decimal::ONE),
        CollateralMode::Base { .. } => safe_inverse(amm.index_s2_price),
        CollateralMode::Quanto { .. } => safe_inverse(amm.index_s3_price),
    }
}

/// Conversion rate base → collateral currency, at spot or at mark price.
pub fn base_to_collateral_fx(amm: &AmmState, at_mark_price: bool) -> Option<Decimal> {
    let s2 = if at_mark_price {
        amm.index_s2_price + amm.current_premium_ema
    } else {
        amm.index_s2_price
    };
    match amm.collateral {
        CollateralMode::Quote { .. } => Some(s2),
        CollateralMode::Base { .. } => safe_inverse(amm.index_s2_price).map(|inv| s2 * inv),
        CollateralMode::Quanto { .. } => {
            safe_inverse(amm.index_s3_price).map(|inv| s2 * inv)
        }
    }
}

/// Conversion rate base → quote, at spot or at mark price.
pub fn base_to_quote_fx(amm: &AmmState, at_mark_price: bool) -> Decimal {
    if at_mark_price {
        amm.index_s2_price + amm.current_premium_ema
    } else {
        amm.index_s2_price
    }
}

/// Worst price the trader accepts relative to the mid price: buys pay up to
/// `slippage_percent` more, sells receive down to that much less.
pub fn slippage_price(mid_price: Price, slippage_percent: Decimal, side: Side) -> Price {
    let fraction = slippage_percent / dec!(100);
    Price::new_unchecked(mid_price.value() * (Decimal::ONE + side.sign() * fraction))
}

fn safe_inverse(price: Decimal) -> Option<Decimal> {
    if price.is_zero() {
        None
    } else {
        Some(Decimal::ONE / price)
    }
}
