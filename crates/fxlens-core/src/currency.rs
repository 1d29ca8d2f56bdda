//! Currency symbol table.
//!
//! The table order matters twice: it is the alternation order of the match
//! pattern, and [`symbol_for`] returns the first symbol listed for a code.
//! Several symbols are ambiguous in practice (`$`, `kr`, `R`); each resolves
//! to exactly one code here.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// `(symbol, code)` pairs in pattern order.
pub const CURRENCY_SYMBOLS: &[(&str, &str)] = &[
    ("$", "USD"),
    ("€", "EUR"),
    ("£", "GBP"),
    ("¥", "JPY"),
    ("₹", "INR"),
    ("₩", "KRW"),
    ("₽", "RUB"),
    ("֏", "AMD"),
    ("ƒ", "ANG"),
    ("₼", "AZN"),
    ("৳", "BDT"),
    ("лв", "BGN"),
    ("៛", "KHR"),
    ("₡", "CRC"),
    ("Kč", "CZK"),
    ("kr", "DKK"),
    ("RD$", "DOP"),
    ("Br", "ETB"),
    ("₾", "GEL"),
    ("₵", "GHS"),
    ("G$", "GYD"),
    ("HK$", "HKD"),
    ("Ft", "HUF"),
    ("Rp", "IDR"),
    ("₪", "ILS"),
    ("J$", "JMD"),
    ("₸", "KZT"),
    ("₭", "LAK"),
    ("ден", "MKD"),
    ("₮", "MNT"),
    ("MT", "MZN"),
    ("C$", "NIO"),
    ("₦", "NGN"),
    ("₱", "PHP"),
    ("zł", "PLN"),
    ("lei", "RON"),
    ("din", "RSD"),
    ("S$", "SGD"),
    ("R", "ZAR"),
    ("฿", "THB"),
    ("₺", "TRY"),
    ("TT$", "TTD"),
    ("NT$", "TWD"),
    ("₴", "UAH"),
    ("USh", "UGX"),
    ("Bs.", "VES"),
    ("₫", "VND"),
    ("Z$", "ZWL"),
];

static SYMBOL_TO_CODE: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| CURRENCY_SYMBOLS.iter().copied().collect());

/// Resolve a symbol to its currency code.
pub fn resolve(symbol: &str) -> Option<&'static str> {
    SYMBOL_TO_CODE.get(symbol).copied()
}

/// First table symbol for a code, or `""` when the code has none.
pub fn symbol_for(code: &str) -> &'static str {
    CURRENCY_SYMBOLS
        .iter()
        .find(|(_, c)| *c == code)
        .map(|(s, _)| *s)
        .unwrap_or("")
}

/// Whether the code appears in the table.
pub fn is_supported(code: &str) -> bool {
    CURRENCY_SYMBOLS.iter().any(|(_, c)| *c == code)
}

/// All codes in table order.
pub fn supported_codes() -> impl Iterator<Item = &'static str> {
    CURRENCY_SYMBOLS.iter().map(|(_, c)| *c)
}
