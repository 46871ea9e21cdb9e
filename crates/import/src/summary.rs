use chrono::NaiveDate;
use std::cmp::Ordering;

use extrato_core::{MonthlySummary, PeriodKey};

use crate::util::{find_full_date, find_month_year};
use crate::value::last_value;

/// Which balance a `saldo em` line is taken to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceSlot {
    Opening,
    Closing,
    /// The exact middle line of the statement counts as neither.
    Undecided,
}

/// Positional heuristic for `saldo em` lines: first half of the statement is
/// the opening balance, second half the closing one.
///
/// Statements with an unusual layout (several balance lines, summary at the
/// end) can be misassigned; nothing beyond line position is consulted.
pub fn balance_slot(index: usize, line_count: usize) -> BalanceSlot {
    match (index * 2).cmp(&line_count) {
        Ordering::Less => BalanceSlot::Opening,
        Ordering::Greater => BalanceSlot::Closing,
        Ordering::Equal => BalanceSlot::Undecided,
    }
}

/// Finds the statement month: a month abbreviation next to a year, else the
/// first full `dd/mm/yyyy` date (which must be a real calendar date).
pub fn detect_period(text: &str) -> Option<PeriodKey> {
    if let Some((month, year)) = find_month_year(text) {
        return PeriodKey::new(year, month);
    }
    let (day, month, year) = find_full_date(text)?;
    NaiveDate::from_ymd_opt(year, month, day).map(PeriodKey::from_date)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Outside,
    Entries,
    Exits,
}

fn opens_entries(lower: &str) -> bool {
    lower.contains("entradas") && lower.contains('(') && lower.contains("crédito")
}

fn opens_exits(lower: &str) -> bool {
    (lower.contains("saídas") || lower.contains("saidas"))
        && lower.contains('(')
        && lower.contains("débito")
}

pub struct SummaryExtractor;

impl SummaryExtractor {
    /// Single forward pass over the statement lines.
    ///
    /// Section headers toggle between the entries and exits blocks; every
    /// other line is checked against each field predicate independently and
    /// a match takes the line's right-most amount.
    pub fn extract<L: AsRef<str>>(lines: &[L], file_id: &str) -> MonthlySummary {
        let mut summary = MonthlySummary::empty(file_id);

        let text = lines.iter().map(|l| l.as_ref()).collect::<Vec<_>>().join("\n");
        if let Some(period) = detect_period(&text) {
            summary.period = Some(period);
            summary.period_label = Some(period.label());
        }

        let mut section = Section::Outside;

        for (i, raw) in lines.iter().enumerate() {
            let line = raw.as_ref();
            let lower = line.trim().to_lowercase();

            if opens_entries(&lower) {
                section = Section::Entries;
                continue;
            }
            if opens_exits(&lower) {
                section = Section::Exits;
                continue;
            }

            let Some(value) = last_value(line) else {
                continue;
            };

            if lower.contains("depositos") && lower.contains("recebimentos") {
                summary.deposits_receipts = value.abs();
            }

            let transfers_line = lower.contains("transferencias")
                || (lower.contains("doc") && lower.contains("ted"));
            if transfers_line && !lower.contains("depositos") {
                summary.transfers = value.abs();
            }

            if lower.contains("outras entradas") {
                summary.other_entries = value.abs();
            }

            if lower.contains("saques") || lower.contains("saque efetuado") {
                summary.withdrawals = value.abs();
            }

            if lower.contains("debitos automaticos") || lower.contains("débitos automáticos") {
                summary.automatic_debits = value.abs();
            }

            if lower.contains("outras saidas") || lower.contains("outras saídas") {
                summary.other_exits = value.abs();
            }

            // Only the first total line of a section counts: it closes the section.
            if lower.starts_with("total") {
                match section {
                    Section::Entries => {
                        summary.total_entries = value.abs();
                        section = Section::Outside;
                    }
                    Section::Exits => {
                        summary.total_exits = value.abs();
                        section = Section::Outside;
                    }
                    Section::Outside => {}
                }
            }

            if lower.contains("saldo em") {
                match balance_slot(i, lines.len()) {
                    BalanceSlot::Opening => summary.opening_balance = value,
                    BalanceSlot::Closing => summary.closing_balance = value,
                    BalanceSlot::Undecided => {}
                }
            }
        }

        tracing::info!(
            file = file_id,
            period = summary.period_label.as_deref().unwrap_or("unknown"),
            "Summary extracted"
        );
        summary
    }
}

pub fn extract_summary<L: AsRef<str>>(lines: &[L], file_id: &str) -> MonthlySummary {
    SummaryExtractor::extract(lines, file_id)
}
