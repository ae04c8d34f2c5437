// perp-risk-core: client-side risk and pricing engine for perpetual-AMM trading.
// reimplements the fixed-point risk math that governs on-chain settlement so
// trades can be sized, previewed and gated before a transaction is sent.
// every function is a pure map from immutable snapshots to plain numbers:
// no internal state, no caches, no I/O. concurrent callers are safe by
// construction; the freshest snapshot simply wins at the call site.
//
// file map (search X.0 for structs, X.1+ for logic):
//   1.x  types.rs: primitives: Side, SignedSize, Price, Leverage
//   2.x  params.rs: per-instrument parameters + decode validation
//   3.x  state.rs: CollateralMode, AMM and trader snapshots
//   4.x  margin.rs: margin-rate curves, max leverage, collateral requirement
//   5.x  sizing.rs: lot rounding, k-star, AMM and trader size bounds
//   6.x  pricing.rs: mark/index/quanto price, FX conversions, slippage
//   7.x  liquidation.rs: per-collateral-mode liquidation solvers, penalty
//   8.x  pnl.rs: unrealized PnL, trader leverage
//   9.x  funding.rs: accrued funding fee, rate clamp, annualization
//   10.x depth.rs: depth-matrix contract + average price
//   11.x validator.rs: pre-trade gate (lot / size / leverage / collateral)

// snapshot model
pub mod params;
pub mod state;
pub mod types;

// calculators
pub mod funding;
pub mod liquidation;
pub mod margin;
pub mod pnl;
pub mod pricing;
pub mod sizing;

// integration surface
pub mod depth;
pub mod validator;

// re exports for convenience
pub use depth::*;
pub use funding::*;
pub use liquidation::*;
pub use margin::*;
pub use params::*;
pub use pnl::*;
pub use pricing::*;
pub use sizing::*;
pub use state::*;
pub use types::*;
pub use validator::*;
