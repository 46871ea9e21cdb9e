use chrono::Datelike;

use extrato_core::{Money, PeriodKey, Transaction};

use crate::util::{
    collapse_whitespace, find_full_date, find_month_year, re_leading_day_month, re_money_token,
};
use crate::value::{money_tokens, parse_value};

/// Continuation lines a transaction may absorb after its date line.
pub const MAX_CONTINUATION_LINES: usize = 4;

/// Words that mark a table header (column titles repeated on every page).
pub const HEADER_KEYWORDS: [&str; 9] = [
    "data",
    "historico",
    "lancamento",
    "documento",
    "valor",
    "entrada",
    "saida",
    "saldo",
    "movimentacao",
];

pub fn is_header(line: &str) -> bool {
    let lower = line.trim().to_lowercase();
    HEADER_KEYWORDS.iter().any(|k| lower.contains(k))
}

fn starts_with_day_month(line: &str) -> bool {
    re_leading_day_month().is_match(line.trim())
}

/// Merges the date line at `start` with the lines that continue it.
///
/// Stops at the first blank line, header line or new date line, and after
/// [`MAX_CONTINUATION_LINES`] continuations. Returns the merged text and how
/// many source lines it consumed (at least one).
pub fn reassemble<L: AsRef<str>>(lines: &[L], start: usize) -> (String, usize) {
    let Some(first) = lines.get(start) else {
        return (String::new(), 0);
    };

    let mut merged = first.as_ref().trim().to_string();
    let mut consumed = 1;

    for next in lines.iter().skip(start + 1).take(MAX_CONTINUATION_LINES) {
        let next = next.as_ref().trim();
        if next.is_empty() || starts_with_day_month(next) || is_header(next) {
            break;
        }
        merged.push(' ');
        merged.push_str(next);
        consumed += 1;
    }

    (merged, consumed)
}

/// Year used to complete `dd/mm` dates: the first full `dd/mm/yyyy` date in
/// the text, else a month-abbreviation/year token.
pub fn statement_year(text: &str) -> Option<i32> {
    if let Some((_, _, year)) = find_full_date(text) {
        return Some(year);
    }
    find_month_year(text).map(|(_, year)| year)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Amounts {
    entry: Money,
    exit: Money,
    balance: Money,
}

/// Assigns the amount tokens of one transaction by count and sign:
/// one token is an entry or (with trailing `-`) an exit; two tokens are that
/// plus the resulting balance; three or more are entry, exit, balance.
fn classify_amounts(tokens: &[&str]) -> Amounts {
    let zero = Money::zero();
    match tokens {
        [] => Amounts { entry: zero, exit: zero, balance: zero },
        [only] => {
            let value = parse_value(only);
            if value.is_negative() {
                Amounts { entry: zero, exit: value.abs(), balance: zero }
            } else {
                Amounts { entry: value, exit: zero, balance: zero }
            }
        }
        [first, balance] => {
            let value = parse_value(first).abs();
            let balance = parse_value(balance);
            if first.ends_with('-') {
                Amounts { entry: zero, exit: value, balance }
            } else {
                Amounts { entry: value, exit: zero, balance }
            }
        }
        [entry, exit, balance, ..] => Amounts {
            entry: parse_value(entry).abs(),
            exit: parse_value(exit).abs(),
            balance: parse_value(balance),
        },
    }
}

/// Parses one (already reassembled) transaction line.
///
/// Returns `None` when the line has no leading `dd/mm` date or carries no
/// amount token.
pub fn parse_transaction_line(
    line: &str,
    year: i32,
    file_id: &str,
    period: Option<PeriodKey>,
) -> Option<Transaction> {
    let line = line.trim();
    let date = re_leading_day_month().find(line)?;
    let rest = line[date.end()..].trim();

    let tokens = money_tokens(rest);
    if tokens.is_empty() {
        return None;
    }

    let amounts = classify_amounts(&tokens);
    let description = collapse_whitespace(&re_money_token().replace_all(rest, ""));

    Some(Transaction {
        file_id: file_id.to_string(),
        period,
        date: format!("{}/{}", date.as_str(), year),
        description,
        entry: amounts.entry,
        exit: amounts.exit,
        balance: amounts.balance,
        category: None,
    })
}

/// Cursor-driven scan of a statement for transaction lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionExtractor {
    fallback_year: Option<i32>,
}

impl TransactionExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Year to use when the statement text names none. Defaults to the
    /// current calendar year.
    pub fn with_fallback_year(year: i32) -> Self {
        Self { fallback_year: Some(year) }
    }

    fn fallback_year(&self) -> i32 {
        self.fallback_year
            .unwrap_or_else(|| chrono::Local::now().year())
    }

    pub fn extract<L: AsRef<str>>(
        &self,
        lines: &[L],
        file_id: &str,
        period: Option<PeriodKey>,
    ) -> Vec<Transaction> {
        let text = lines.iter().map(|l| l.as_ref()).collect::<Vec<_>>().join("\n");
        let year = statement_year(&text).unwrap_or_else(|| self.fallback_year());

        let mut transactions = Vec::new();
        let mut cursor = 0;

        while cursor < lines.len() {
            if !starts_with_day_month(lines[cursor].as_ref()) {
                cursor += 1;
                continue;
            }

            let (merged, consumed) = reassemble(lines, cursor);
            match parse_transaction_line(&merged, year, file_id, period) {
                Some(tx) => transactions.push(tx),
                None => tracing::debug!(
                    file = file_id,
                    line = cursor,
                    "Date line without amount skipped"
                ),
            }
            cursor += consumed;
        }

        tracing::info!(file = file_id, count = transactions.len(), "Transactions extracted");
        transactions
    }
}

pub fn extract_transactions<L: AsRef<str>>(
    lines: &[L],
    file_id: &str,
    period: Option<PeriodKey>,
) -> Vec<Transaction> {
    TransactionExtractor::new().extract(lines, file_id, period)
}
