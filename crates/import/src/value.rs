use rust_decimal::Decimal;
use std::str::FromStr;

use extrato_core::Money;

use crate::util::re_money_token;

/// Amounts at or above this many reais are treated as extraction noise.
const MAX_AMOUNT_REAIS: i64 = 1_000_000_000_000_000;

/// Converts a Brazilian-formatted amount (`1.234,56`, `1.234,56-`) to `Money`.
///
/// A trailing `-` makes the value negative. Blank or non-numeric input yields
/// zero; statement text is noisy and a bad token must not stop extraction.
pub fn parse_value(text: &str) -> Money {
    let text = text.trim();
    if text.is_empty() {
        return Money::zero();
    }

    let negative = text.ends_with('-');
    let cleaned = text.replace('.', "").replace(',', ".").replace('-', "");

    match Decimal::from_str(&cleaned) {
        Ok(dec) if dec >= Decimal::from(MAX_AMOUNT_REAIS) => {
            tracing::warn!(token = text, "Amount out of range, using zero");
            Money::zero()
        }
        Ok(dec) => {
            let value = Money::from_decimal(dec);
            if negative {
                -value
            } else {
                value
            }
        }
        Err(_) => {
            tracing::debug!(token = text, "Unparseable amount, using zero");
            Money::zero()
        }
    }
}

/// Every amount token in `text`, left to right, trailing `-` included.
pub fn money_tokens(text: &str) -> Vec<&str> {
    re_money_token().find_iter(text).map(|m| m.as_str()).collect()
}

/// Value of the right-most amount token on a line.
pub fn last_value(text: &str) -> Option<Money> {
    money_tokens(text).last().map(|t| parse_value(t))
}
