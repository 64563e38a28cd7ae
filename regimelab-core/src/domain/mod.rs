//! Domain types: price bars, indicator rows, and direction enums.

pub mod bar;
pub mod direction;
pub mod row;

pub use bar::PriceBar;
pub use direction::{TradeDirection, TrendDirection};
pub use row::{FieldValue, IndicatorRow};
