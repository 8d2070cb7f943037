//! Domain types shared by every detector.

pub mod bar;
pub mod series;
pub mod setup;

pub use bar::{BarError, PriceBar};
pub use series::{PriceSeries, RejectedBar};
pub use setup::TradeSetup;
