//! Identifier and time aliases.

/// Exchange ticker symbol (e.g., "AAPL", "MSFT").
pub type Symbol = String;

/// Wall clock timestamp in milliseconds since epoch.
pub type Timestamp = i64;
