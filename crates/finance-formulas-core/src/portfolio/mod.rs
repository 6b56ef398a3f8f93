pub mod risk;
pub mod two_asset;

pub use risk::{beta, expected_return_capm, sharpe_ratio};
pub use two_asset::{portfolio_expected_return, portfolio_variance};
