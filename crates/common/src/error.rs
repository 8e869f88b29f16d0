use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The data provider had nothing usable for the symbol.
    #[error("No data available")]
    NoData,

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Computation failed: {0}")]
    Computation(String),

    #[error("Malformed price series: {0}")]
    MalformedSeries(String),

    #[error("Market data error for {symbol}: {message}")]
    MarketData { symbol: String, message: String },

    #[error("Invalid market: {0}")]
    InvalidMarket(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
