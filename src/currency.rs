// Currency code to display symbol lookup

use once_cell::sync::Lazy;
use std::collections::HashMap;

static CURRENCY_SYMBOLS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("USD", "$"),
        ("EUR", "€"),
        ("GBP", "£"),
        ("JPY", "¥"),
        ("AUD", "A$"),
        ("CAD", "C$"),
        ("CHF", "CHF"),
        ("CNY", "¥"),
        ("SEK", "kr"),
        ("NZD", "NZ$"),
    ])
});

/// Display symbol for an ISO 4217 code, or the code itself when unknown
pub fn symbol_for(code: &str) -> &str {
    CURRENCY_SYMBOLS.get(code).copied().unwrap_or(code)
}
