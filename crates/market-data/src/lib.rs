pub mod yahoo;

pub use yahoo::{range_for_bars, ticker_for, YahooClient};
