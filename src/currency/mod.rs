//! Display rounding and money formatting. Computations elsewhere stay at full
//! precision; these helpers are applied only when values leave the core.

use serde::{Deserialize, Serialize};

/// Rounds to `places` decimal digits, half away from zero.
pub fn round_to(value: f64, places: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Money values are shown with cents.
pub fn round_amount(value: f64) -> f64 {
    round_to(value, 2)
}

/// Percentages are shown with one decimal.
pub fn round_percent(value: f64) -> f64 {
    round_to(value, 1)
}

/// Symbol and separators used to render money.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoneyFormat {
    pub symbol: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
}

impl Default for MoneyFormat {
    fn default() -> Self {
        Self {
            symbol: "$".into(),
            decimal_separator: '.',
            grouping_separator: ',',
        }
    }
}

impl MoneyFormat {
    /// Picks separators from the language part of a BCP 47 tag.
    pub fn for_locale(symbol: impl Into<String>, locale: &str) -> Self {
        let language = locale
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        let (decimal_separator, grouping_separator) = match language.as_str() {
            "de" | "es" | "it" | "nl" | "pt" | "da" | "id" | "tr" => (',', '.'),
            "fr" | "sv" | "nb" | "fi" | "pl" | "cs" => (',', ' '),
            _ => ('.', ','),
        };
        Self {
            symbol: symbol.into(),
            decimal_separator,
            grouping_separator,
        }
    }

    /// Formats `amount` as e.g. `$1,234.50` or `-$12.00`.
    pub fn format(&self, amount: f64) -> String {
        let cents = (round_amount(amount.abs()) * 100.0).round() as u64;
        let whole = (cents / 100).to_string();
        let fraction = cents % 100;

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (index, digit) in whole.chars().enumerate() {
            if index > 0 && (whole.len() - index) % 3 == 0 {
                grouped.push(self.grouping_separator);
            }
            grouped.push(digit);
        }

        let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
        format!(
            "{sign}{}{grouped}{}{fraction:02}",
            self.symbol, self.decimal_separator
        )
    }
}

/// Formats with the default `$` / en-US conventions.
pub fn format_currency(amount: f64) -> String {
    MoneyFormat::default().format(amount)
}
