//! Currency metadata registry and amount formatting.
//!
//! Single source of truth for currency symbols, decimal precision, and
//! symbol placement. Both the reconciliation views and the analysis layer
//! consume this registry; no other currency table exists in the crate.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Placement of a currency symbol relative to the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolPosition {
    /// Symbol before the amount, e.g. `$1,000.00`.
    Prefix,
    /// Symbol after the amount, e.g. `1.000,00€`.
    Suffix,
}

/// Display metadata for one currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyInfo {
    /// ISO 4217 code, e.g. `USD`.
    pub code: String,
    /// Display symbol, e.g. `$`.
    pub symbol: String,
    /// Human-readable name.
    pub name: String,
    /// Number of fractional digits shown for this currency.
    pub decimals: u32,
    /// Symbol placement.
    pub position: SymbolPosition,
    /// Thousands grouping separator.
    pub thousands_separator: char,
    /// Decimal separator.
    pub decimal_separator: char,
}

impl CurrencyInfo {
    fn new(
        code: &str,
        symbol: &str,
        name: &str,
        decimals: u32,
        position: SymbolPosition,
    ) -> Self {
        Self {
            code: code.to_string(),
            symbol: symbol.to_string(),
            name: name.to_string(),
            decimals,
            position,
            thousands_separator: ',',
            decimal_separator: '.',
        }
    }

    fn with_separators(mut self, thousands: char, decimal: char) -> Self {
        self.thousands_separator = thousands;
        self.decimal_separator = decimal;
        self
    }
}

/// Currency code used when a lookup misses.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Injected currency-metadata provider.
///
/// Lookups for unknown codes fall back to the default currency so that
/// formatting never fails on stale or user-entered codes.
#[derive(Debug, Clone)]
pub struct CurrencyRegistry {
    currencies: HashMap<String, CurrencyInfo>,
    ordered_codes: Vec<String>,
}

impl CurrencyRegistry {
    /// Build a registry from an explicit currency list.
    ///
    /// The list must contain the default currency (`USD`); callers supplying
    /// a custom table without it get the built-in USD entry appended.
    #[must_use]
    pub fn new(currencies: Vec<CurrencyInfo>) -> Self {
        let mut map = HashMap::new();
        let mut ordered = Vec::new();
        for info in currencies {
            if !map.contains_key(&info.code) {
                ordered.push(info.code.clone());
            }
            map.insert(info.code.clone(), info);
        }
        if !map.contains_key(DEFAULT_CURRENCY) {
            let usd = CurrencyInfo::new(DEFAULT_CURRENCY, "$", "US Dollar", 2, SymbolPosition::Prefix);
            ordered.push(usd.code.clone());
            map.insert(usd.code.clone(), usd);
        }
        Self {
            currencies: map,
            ordered_codes: ordered,
        }
    }

    /// Registry with the built-in currency table.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(vec![
            CurrencyInfo::new("USD", "$", "US Dollar", 2, SymbolPosition::Prefix),
            CurrencyInfo::new("EUR", "€", "Euro", 2, SymbolPosition::Suffix)
                .with_separators('.', ','),
            CurrencyInfo::new("GBP", "£", "British Pound", 2, SymbolPosition::Prefix),
            CurrencyInfo::new("JPY", "¥", "Japanese Yen", 0, SymbolPosition::Prefix),
            CurrencyInfo::new("CAD", "C$", "Canadian Dollar", 2, SymbolPosition::Prefix),
            CurrencyInfo::new("AUD", "A$", "Australian Dollar", 2, SymbolPosition::Prefix),
            CurrencyInfo::new("CHF", "CHF", "Swiss Franc", 2, SymbolPosition::Prefix),
            CurrencyInfo::new("CNY", "¥", "Chinese Yuan", 2, SymbolPosition::Prefix),
            CurrencyInfo::new("RUB", "₽", "Russian Ruble", 2, SymbolPosition::Suffix)
                .with_separators(' ', ','),
        ])
    }

    /// Look up currency metadata, falling back to the default currency.
    #[must_use]
    pub fn info(&self, code: &str) -> &CurrencyInfo {
        self.currencies
            .get(code)
            .or_else(|| self.currencies.get(DEFAULT_CURRENCY))
            .unwrap_or_else(|| unreachable!("default currency is always present"))
    }

    /// Look up the display symbol for a currency code.
    #[must_use]
    pub fn symbol(&self, code: &str) -> &str {
        &self.info(code).symbol
    }

    /// Check whether a currency code is known to the registry.
    #[must_use]
    pub fn is_valid(&self, code: &str) -> bool {
        self.currencies.contains_key(code)
    }

    /// Format an amount with its currency symbol.
    #[must_use]
    pub fn format_amount(&self, amount: Decimal, code: &str) -> String {
        let info = self.info(code);
        let number = self.format_number(amount, code);
        match info.position {
            SymbolPosition::Prefix => format!("{}{number}", info.symbol),
            SymbolPosition::Suffix => format!("{number}{}", info.symbol),
        }
    }

    /// Format an amount without a symbol (charts, table cells).
    #[must_use]
    pub fn format_number(&self, amount: Decimal, code: &str) -> String {
        let info = self.info(code);
        format_fixed(
            amount,
            info.decimals,
            Some(info.thousands_separator),
            info.decimal_separator,
        )
    }

    /// `(code, label)` pairs for select dropdowns, in table order.
    #[must_use]
    pub fn options(&self) -> Vec<(String, String)> {
        self.ordered_codes
            .iter()
            .filter_map(|code| self.currencies.get(code))
            .map(|c| (c.code.clone(), format!("{} - {} ({})", c.code, c.name, c.symbol)))
            .collect()
    }
}

impl Default for CurrencyRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Serialize an amount for the wire: fixed two decimal places, no grouping.
///
/// Amounts cross the API as decimal strings regardless of the display
/// currency's precision.
#[must_use]
pub fn to_wire(amount: Decimal) -> String {
    format_fixed(amount, 2, None, '.')
}

/// Render an amount with a fixed number of fractional digits.
fn format_fixed(
    amount: Decimal,
    decimals: u32,
    thousands: Option<char>,
    decimal_sep: char,
) -> String {
    let rounded = amount.round_dp(decimals);
    let negative = rounded < Decimal::ZERO;
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = text
        .split_once('.')
        .map_or((text.as_str(), ""), |(i, f)| (i, f));

    let mut frac: String = frac_part.chars().take(decimals as usize).collect();
    while frac.len() < decimals as usize {
        frac.push('0');
    }

    let mut grouped = String::new();
    let digit_count = int_part.len();
    for (i, c) in int_part.chars().enumerate() {
        if let Some(sep) = thousands {
            if i > 0 && (digit_count - i) % 3 == 0 {
                grouped.push(sep);
            }
        }
        grouped.push(c);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if decimals > 0 {
        out.push(decimal_sep);
        out.push_str(&frac);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn format_amount_prefix() {
        let registry = CurrencyRegistry::builtin();
        assert_eq!(registry.format_amount(dec!(1000), "USD"), "$1,000.00");
        assert_eq!(registry.format_amount(dec!(1234567.5), "GBP"), "£1,234,567.50");
    }

    #[test]
    fn format_amount_suffix() {
        let registry = CurrencyRegistry::builtin();
        assert_eq!(registry.format_amount(dec!(1000), "RUB"), "1 000,00₽");
        assert_eq!(registry.format_amount(dec!(1000), "EUR"), "1.000,00€");
    }

    #[test]
    fn format_amount_zero_decimal_currency() {
        let registry = CurrencyRegistry::builtin();
        assert_eq!(registry.format_amount(dec!(1500.75), "JPY"), "¥1,501");
    }

    #[test]
    fn format_amount_negative() {
        let registry = CurrencyRegistry::builtin();
        assert_eq!(registry.format_amount(dec!(-42.5), "USD"), "$-42.50");
    }

    #[test]
    fn unknown_code_falls_back_to_default() {
        let registry = CurrencyRegistry::builtin();
        assert_eq!(registry.symbol("XXX"), "$");
        assert_eq!(registry.info("XXX").code, "USD");
        assert!(!registry.is_valid("XXX"));
        assert!(registry.is_valid("CHF"));
    }

    #[test]
    fn custom_table_always_contains_default() {
        let registry = CurrencyRegistry::new(vec![CurrencyInfo::new(
            "EUR",
            "€",
            "Euro",
            2,
            SymbolPosition::Suffix,
        )]);
        assert!(registry.is_valid("USD"));
        assert!(registry.is_valid("EUR"));
    }

    #[test]
    fn wire_format_is_plain_two_decimals() {
        assert_eq!(to_wire(dec!(100)), "100.00");
        assert_eq!(to_wire(dec!(1234.5)), "1234.50");
        assert_eq!(to_wire(dec!(-0.125)), "-0.13");
        assert_eq!(to_wire(dec!(0)), "0.00");
    }

    #[test]
    fn options_preserve_table_order() {
        let registry = CurrencyRegistry::builtin();
        let options = registry.options();
        assert_eq!(options[0].0, "USD");
        assert_eq!(options[0].1, "USD - US Dollar ($)");
        assert_eq!(options.len(), 9);
    }
}
