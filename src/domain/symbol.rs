//! Symbol Normalizer — Instrument Id Format Conversion
//!
//! BloFin identifies futures instruments with hyphenated ids
//! (`BTC-USDT`); the repository schema uses the concatenated form
//! (`BTCUSDT`). Conversion is lossless for the recognized quote
//! assets (USDT, USDC); anything else passes through unchanged.

/// Quote assets for which the hyphen position is known.
const RECOGNIZED_QUOTES: [&str; 2] = ["USDT", "USDC"];

/// Convert an internal symbol (`BTCUSDT`) to BloFin format (`BTC-USDT`).
///
/// Inserts a hyphen before a recognized quote-asset suffix. Symbols
/// that already carry a hyphen, or whose quote asset is not
/// recognized, are returned as-is.
pub fn to_exchange_format(symbol: &str) -> String {
    if symbol.contains('-') {
        return symbol.to_string();
    }
    for quote in RECOGNIZED_QUOTES {
        if let Some(base) = symbol.strip_suffix(quote) {
            if !base.is_empty() {
                return format!("{base}-{quote}");
            }
        }
    }
    symbol.to_string()
}

/// Convert a BloFin instrument id (`BTC-USDT`) to the internal
/// concatenated form (`BTCUSDT`).
pub fn to_internal_format(inst_id: &str) -> String {
    inst_id.replace('-', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_exchange_format_usdt() {
        assert_eq!(to_exchange_format("BTCUSDT"), "BTC-USDT");
        assert_eq!(to_exchange_format("1000PEPEUSDT"), "1000PEPE-USDT");
    }

    #[test]
    fn test_to_exchange_format_usdc() {
        assert_eq!(to_exchange_format("ETHUSDC"), "ETH-USDC");
    }

    #[test]
    fn test_to_exchange_format_unrecognized_quote() {
        assert_eq!(to_exchange_format("BTCEUR"), "BTCEUR");
    }

    #[test]
    fn test_to_exchange_format_already_hyphenated() {
        assert_eq!(to_exchange_format("BTC-USDT"), "BTC-USDT");
    }

    #[test]
    fn test_bare_quote_is_not_split() {
        // "USDT" alone has no base component
        assert_eq!(to_exchange_format("USDT"), "USDT");
    }

    #[test]
    fn test_to_internal_format() {
        assert_eq!(to_internal_format("BTC-USDT"), "BTCUSDT");
        assert_eq!(to_internal_format("ETH-USDC"), "ETHUSDC");
        assert_eq!(to_internal_format("BTCUSDT"), "BTCUSDT");
    }

    #[test]
    fn test_round_trip() {
        assert_eq!(to_exchange_format(&to_internal_format("SOL-USDT")), "SOL-USDT");
        assert_eq!(to_internal_format(&to_exchange_format("SOLUSDT")), "SOLUSDT");
    }
}
