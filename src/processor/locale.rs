//! Locale and currency tables for the `currency` processor

use crate::error::ProcessorError;

use super::builtin::format_number;

/// Where the currency symbol goes relative to the amount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolPlacement {
    /// `$1,234.50`
    Before,
    /// `R$ 1.234,50`
    BeforeSpaced,
    /// `1.234,50 €`
    AfterSpaced,
}

/// Number formatting rules of one locale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleRules {
    pub id: &'static str,
    pub decimal: &'static str,
    pub group: &'static str,
    pub placement: SymbolPlacement,
}

const NBSP: &str = "\u{00A0}";
const NARROW_NBSP: &str = "\u{202F}";

const fn rules(
    id: &'static str,
    decimal: &'static str,
    group: &'static str,
    placement: SymbolPlacement,
) -> LocaleRules {
    LocaleRules {
        id,
        decimal,
        group,
        placement,
    }
}

/// First entry per language doubles as the language-only fallback
static LOCALES: &[LocaleRules] = &[
    rules("en_US", ".", ",", SymbolPlacement::Before),
    rules("en_GB", ".", ",", SymbolPlacement::Before),
    rules("en_CA", ".", ",", SymbolPlacement::Before),
    rules("en_AU", ".", ",", SymbolPlacement::Before),
    rules("de_DE", ",", ".", SymbolPlacement::AfterSpaced),
    rules("de_CH", ".", "’", SymbolPlacement::BeforeSpaced),
    rules("fr_FR", ",", NARROW_NBSP, SymbolPlacement::AfterSpaced),
    rules("es_ES", ",", ".", SymbolPlacement::AfterSpaced),
    rules("it_IT", ",", ".", SymbolPlacement::AfterSpaced),
    rules("nl_NL", ",", ".", SymbolPlacement::BeforeSpaced),
    rules("pt_BR", ",", ".", SymbolPlacement::BeforeSpaced),
    rules("pl_PL", ",", NBSP, SymbolPlacement::AfterSpaced),
    rules("ru_RU", ",", NBSP, SymbolPlacement::AfterSpaced),
    rules("uk_UA", ",", NBSP, SymbolPlacement::AfterSpaced),
    rules("ja_JP", ".", ",", SymbolPlacement::Before),
    rules("zh_CN", ".", ",", SymbolPlacement::Before),
];

/// (code, symbol, minor-unit digits)
static CURRENCIES: &[(&str, &str, usize)] = &[
    ("USD", "$", 2),
    ("EUR", "€", 2),
    ("GBP", "£", 2),
    ("JPY", "¥", 0),
    ("CNY", "CN¥", 2),
    ("CHF", "CHF", 2),
    ("CAD", "CA$", 2),
    ("AUD", "A$", 2),
    ("BRL", "R$", 2),
    ("PLN", "zł", 2),
    ("RUB", "₽", 2),
    ("UAH", "₴", 2),
    ("INR", "₹", 2),
    ("KRW", "₩", 0),
    ("SEK", "kr", 2),
    ("NOK", "kr", 2),
    ("DKK", "kr", 2),
];

/// Find rules for `en_US`, `en-US` or a bare `en`; unknown regions fall back
/// to the language.
pub fn lookup_locale(id: &str) -> Option<&'static LocaleRules> {
    let normalized = id.trim().replace('-', "_");
    let mut parts = normalized.splitn(2, '_');
    let language = parts.next()?.to_ascii_lowercase();
    if language.is_empty() {
        return None;
    }
    let region = parts.next().map(str::to_ascii_uppercase);

    if let Some(region) = &region {
        let full = format!("{language}_{region}");
        if let Some(found) = LOCALES.iter().find(|l| l.id == full) {
            return Some(found);
        }
    }
    LOCALES
        .iter()
        .find(|l| l.id.split('_').next() == Some(language.as_str()))
}

/// Well-formed ISO 4217 code (three ASCII letters)
pub fn is_currency_code(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_alphabetic())
}

/// Symbol and minor-unit digits; unlisted codes print as the code itself
fn currency_symbol(code: &str) -> Result<(String, usize), ProcessorError> {
    if !is_currency_code(code) {
        return Err(ProcessorError::InvalidCurrencyCode {
            code: code.to_string(),
        });
    }
    let upper = code.to_ascii_uppercase();
    Ok(CURRENCIES
        .iter()
        .find(|(c, _, _)| *c == upper)
        .map(|(_, symbol, digits)| (symbol.to_string(), *digits))
        .unwrap_or((upper, 2)))
}

/// Format `amount` as money in `locale`
pub fn format_currency(amount: f64, locale: &str, code: &str) -> Result<String, ProcessorError> {
    let rules = lookup_locale(locale).ok_or_else(|| ProcessorError::UnknownLocale {
        locale: locale.to_string(),
    })?;
    let (symbol, digits) = currency_symbol(code)?;

    let formatted = format_number(amount.abs(), digits, rules.decimal, rules.group)?;
    // Sign follows the rounded amount so -0.001 USD prints as $0.00
    let negative = amount < 0.0 && formatted.bytes().any(|b| (b'1'..=b'9').contains(&b));
    let sign = if negative { "-" } else { "" };

    Ok(match rules.placement {
        SymbolPlacement::Before => format!("{sign}{symbol}{formatted}"),
        SymbolPlacement::BeforeSpaced => format!("{sign}{symbol}{NBSP}{formatted}"),
        SymbolPlacement::AfterSpaced => format!("{sign}{formatted}{NBSP}{symbol}"),
    })
}
