//! Risk statistics over return and price series.
//!
//! - **Volatility and Sharpe**: sample moments annualized with
//!   `sqrt(periods_per_year)`
//! - **Drawdown**: largest peak-to-trough fall of a price or value curve
//! - **VaR**: historical quantile, parametric (normal) and expected shortfall
//! - **Beta**: sensitivity of an asset to a market series
//!
//! Returns are per-period fractions; annual inputs (risk-free rate) are
//! converted with `periods_per_year`.

mod beta;
mod drawdown;
mod sharpe;
mod var;

pub use beta::beta;
pub use drawdown::{max_drawdown, max_drawdown_values};
pub use sharpe::{annualized_volatility, sharpe_ratio, TRADING_DAYS_PER_YEAR};
pub use var::{expected_shortfall, parametric_var, value_at_risk, DEFAULT_VAR_CONFIDENCE};
