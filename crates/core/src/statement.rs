use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;
use super::period::PeriodKey;

/// Side of the account a movement lands on, from the holder's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Entry,
    Exit,
}

impl Direction {
    /// Suffix used in derived column names (`total_entrada`, `media_saida`, ...).
    pub fn suffix(self) -> &'static str {
        match self {
            Direction::Entry => "entrada",
            Direction::Exit => "saida",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Fixed-shape monthly summary block of one statement file.
///
/// Every amount is zero unless the extractor found it in the text. The totals
/// are read from the statement itself and are not the sum of the subtotals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    #[serde(rename = "arquivo")]
    pub file_id: String,
    #[serde(rename = "mes_key")]
    pub period: Option<PeriodKey>,
    #[serde(rename = "mes_label")]
    pub period_label: Option<String>,
    #[serde(rename = "depositos_recebimentos")]
    pub deposits_receipts: Money,
    #[serde(rename = "transferencias_doc_ted")]
    pub transfers: Money,
    #[serde(rename = "outras_entradas")]
    pub other_entries: Money,
    #[serde(rename = "saques_efetuados")]
    pub withdrawals: Money,
    #[serde(rename = "debitos_automaticos")]
    pub automatic_debits: Money,
    #[serde(rename = "outras_saidas")]
    pub other_exits: Money,
    #[serde(rename = "total_entradas")]
    pub total_entries: Money,
    #[serde(rename = "total_saidas")]
    pub total_exits: Money,
    #[serde(rename = "saldo_inicial")]
    pub opening_balance: Money,
    #[serde(rename = "saldo_final")]
    pub closing_balance: Money,
}

impl MonthlySummary {
    pub fn empty(file_id: impl Into<String>) -> Self {
        MonthlySummary {
            file_id: file_id.into(),
            period: None,
            period_label: None,
            deposits_receipts: Money::zero(),
            transfers: Money::zero(),
            other_entries: Money::zero(),
            withdrawals: Money::zero(),
            automatic_debits: Money::zero(),
            other_exits: Money::zero(),
            total_entries: Money::zero(),
            total_exits: Money::zero(),
            opening_balance: Money::zero(),
            closing_balance: Money::zero(),
        }
    }

    /// Total entries minus total exits.
    pub fn net_result(&self) -> Money {
        self.total_entries - self.total_exits
    }
}

/// One logical statement movement, possibly reassembled from several lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "arquivo")]
    pub file_id: String,
    #[serde(rename = "mes_key")]
    pub period: Option<PeriodKey>,
    /// `dd/mm/yyyy`; day and month come from the line, the year is inferred.
    #[serde(rename = "data")]
    pub date: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "valor_entrada")]
    pub entry: Money,
    #[serde(rename = "valor_saida")]
    pub exit: Money,
    #[serde(rename = "saldo")]
    pub balance: Money,
    /// Filled in by the categorizer.
    #[serde(rename = "categoria")]
    pub category: Option<String>,
}

impl Transaction {
    pub fn amount(&self, direction: Direction) -> Money {
        match direction {
            Direction::Entry => self.entry,
            Direction::Exit => self.exit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    Extracted(Vec<String>),
    Failed(String),
}

/// Output of the upstream text extraction for one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedStatement {
    pub file_id: String,
    pub outcome: ExtractionOutcome,
}

impl ExtractedStatement {
    pub fn from_lines(file_id: impl Into<String>, lines: Vec<String>) -> Self {
        ExtractedStatement {
            file_id: file_id.into(),
            outcome: ExtractionOutcome::Extracted(lines),
        }
    }

    /// Splits on `\n` (a trailing newline yields a final empty line) and drops `\r`.
    pub fn from_text(file_id: impl Into<String>, text: &str) -> Self {
        let lines = text
            .split('\n')
            .map(|l| l.trim_end_matches('\r').to_string())
            .collect();
        Self::from_lines(file_id, lines)
    }

    pub fn failed(file_id: impl Into<String>, reason: impl Into<String>) -> Self {
        ExtractedStatement {
            file_id: file_id.into(),
            outcome: ExtractionOutcome::Failed(reason.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ExtractionOutcome::Extracted(_))
    }

    /// Lines of a successful extraction that produced any text at all.
    pub fn lines(&self) -> Option<&[String]> {
        match &self.outcome {
            ExtractionOutcome::Extracted(lines) if lines.iter().any(|l| !l.trim().is_empty()) => {
                Some(lines)
            }
            _ => None,
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match &self.outcome {
            ExtractionOutcome::Failed(reason) => Some(reason),
            ExtractionOutcome::Extracted(_) => None,
        }
    }
}
