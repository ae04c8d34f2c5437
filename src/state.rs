// 3.0: on-chain state snapshots: AMM margin account and trader margin account.
// both are rebuilt wholesale on every refresh; the engine never mutates them.
// 3.1 CollateralMode replaces the raw M1/M2/M3 pool-cash triple.

use crate::types::SignedSize;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which currency the instrument is collateralized in, together with the AMM
/// pool cash held in that currency.
///
/// The on-chain contract stores three pool-cash slots (quote, base, quanto) of
/// which exactly one is non-zero. Carrying the mode as a tagged variant makes
/// that invariant structural: conversion and liquidation code matches
/// exhaustively instead of probing which slot happens to be set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CollateralMode {
    /// Collateralized in the quote currency (M1 slot).
    Quote { pool_cash_qc: Decimal },
    /// Collateralized in the base currency (M2 slot).
    Base { pool_cash_bc: Decimal },
    /// Collateralized in a third currency (M3 slot), e.g. SP500 quoted in USD
    /// and margined in BTC.
    Quanto { pool_cash_cc: Decimal },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("no collateral pool-cash slot is set")]
    NoCollateral,

    #[error("more than one collateral pool-cash slot is set")]
    AmbiguousCollateral,
}

impl CollateralMode {
    /// Decode the raw (M1, M2, M3) triple read from the contract. Exactly one
    /// slot must be non-zero; anything else is a corrupted snapshot.
    pub fn from_pool_cash(
        m1: Decimal,
        m2: Decimal,
        m3: Decimal,
    ) -> Result<Self, StateError> {
        let set = [m1, m2, m3].iter().filter(|m| !m.is_zero()).count();
        match set {
            0 => Err(StateError::NoCollateral),
            1 if !m1.is_zero() => Ok(CollateralMode::Quote { pool_cash_qc: m1 }),
            1 if !m2.is_zero() => Ok(CollateralMode::Base { pool_cash_bc: m2 }),
            1 => Ok(CollateralMode::Quanto { pool_cash_cc: m3 }),
            _ => Err(StateError::AmbiguousCollateral),
        }
    }

    pub fn is_quanto(&self) -> bool {
        matches!(self, CollateralMode::Quanto { .. })
    }
}

// 3.2: AMM-side state, refreshed from chain and oracle on every update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmmState {
    /// Negative of the AMM's locked-in value, quote currency. Equivalently the
    /// aggregate locked-in value of all trader positions.
    pub l1: Decimal,
    /// Negative of the AMM's position, base currency. Equivalently the
    /// aggregate trader position.
    pub k2: Decimal,
    /// Collateral mode plus the pool cash held in that currency.
    pub collateral: CollateralMode,
    /// Smoothed aggregate trader exposure, bounds the max trade size.
    pub current_trader_exposure_ema: Decimal,
    /// Oracle index price base → quote.
    pub index_s2_price: Decimal,
    /// Oracle index price quanto → quote. Zero unless the instrument is quanto.
    pub index_s3_price: Decimal,
    /// AMM price premium over index, instantaneous.
    pub current_premium: Decimal,
    /// AMM price premium over index, EMA-smoothed. Feeds the mark price.
    pub current_premium_ema: Decimal,
}

impl AmmState {
    pub fn is_quanto(&self) -> bool {
        self.collateral.is_quanto()
    }
}

// 3.3: per-trader margin account snapshot for one instrument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraderState {
    /// Current margin balance, collateral currency.
    pub margin_balance_cc: Decimal,
    /// Amount above the initial margin requirement. Negative when below it.
    pub available_margin_cc: Decimal,
    /// Cash minus unpaid funding.
    pub available_cash_cc: Decimal,
    pub margin_account_cash_cc: Decimal,
    /// Signed position, base currency. Negative = short.
    pub margin_account_position_bc: SignedSize,
    pub margin_account_locked_in_value_qc: Decimal,
    /// Funding accumulator value at position entry; the difference to the
    /// current accumulator drives the funding fee.
    pub unit_accumulated_funding_start: Decimal,
}
