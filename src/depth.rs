// 10.0: order-book style depth view. the matrix itself comes from an external
// generator; this module only fixes the I/O contract and derives the average
// price from it. the generator is injected as a trait so tests and alternate
// AMM curve models can swap it out.

use crate::params::PerpParameters;
use crate::state::AmmState;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Price/size ladder produced by a depth-matrix generator. Two parallel rows:
/// `prices` ascending, and the signed cumulative size tradable at each level.
/// Sizes are negative on the bid side, positive on the ask side, and exactly
/// zero at the mid row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthMatrix {
    pub prices: Vec<Decimal>,
    pub cumulative_sizes: Vec<Decimal>,
}

impl DepthMatrix {
    /// Price at the row where the signed cumulative size crosses zero.
    /// `None` for a malformed or degenerate matrix.
    pub fn average_price(&self) -> Option<Decimal> {
        if self.prices.len() != self.cumulative_sizes.len() || self.prices.len() < 3 {
            return None;
        }
        let mid = self
            .cumulative_sizes
            .iter()
            .position(|size| size.is_zero())?;
        self.prices.get(mid).copied()
    }

    /// Bid-side levels: (price, cumulative size you can sell into).
    pub fn bids(&self) -> Vec<(Decimal, Decimal)> {
        self.levels(|size| size < Decimal::ZERO)
    }

    /// Ask-side levels: (price, cumulative size you can buy from).
    pub fn asks(&self) -> Vec<(Decimal, Decimal)> {
        self.levels(|size| size > Decimal::ZERO)
    }

    fn levels(&self, keep: impl Fn(Decimal) -> bool) -> Vec<(Decimal, Decimal)> {
        self.prices
            .iter()
            .zip(self.cumulative_sizes.iter())
            .filter(|(_, size)| keep(**size))
            .map(|(price, size)| (*price, *size))
            .collect()
    }
}

/// External depth-matrix generator. Only the contract matters here: given the
/// instrument parameters and AMM state, produce the ladder.
pub trait DepthMatrixSource {
    fn depth_matrix(&self, params: &PerpParameters, amm: &AmmState) -> DepthMatrix;
}
