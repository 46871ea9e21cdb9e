use rust_decimal::Decimal;

use super::money::Money;
use super::statement::{MonthlySummary, Transaction};

/// One value of a row-oriented output table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Money(Money),
    Decimal(Decimal),
    Count(usize),
    Empty,
}

impl Cell {
    /// Text form with a comma decimal separator, as consumed by spreadsheet
    /// tools configured for pt-BR.
    pub fn to_br_string(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Money(m) => m.to_br_string(),
            Cell::Decimal(d) => format!("{:.2}", d).replace('.', ","),
            Cell::Count(n) => n.to_string(),
            Cell::Empty => String::new(),
        }
    }
}

impl From<Money> for Cell {
    fn from(m: Money) -> Self {
        Cell::Money(m)
    }
}

impl From<Option<String>> for Cell {
    fn from(s: Option<String>) -> Self {
        s.map(Cell::Text).unwrap_or(Cell::Empty)
    }
}

/// Anything that can be handed to the export layer as a header plus rows.
pub trait Tabular {
    fn columns(&self) -> Vec<String>;
    fn rows(&self) -> Vec<Vec<Cell>>;
}

impl Tabular for [MonthlySummary] {
    fn columns(&self) -> Vec<String> {
        [
            "arquivo",
            "mes_key",
            "mes_label",
            "depositos_recebimentos",
            "transferencias_doc_ted",
            "outras_entradas",
            "saques_efetuados",
            "debitos_automaticos",
            "outras_saidas",
            "total_entradas",
            "total_saidas",
            "saldo_inicial",
            "saldo_final",
        ]
        .map(String::from)
        .to_vec()
    }

    fn rows(&self) -> Vec<Vec<Cell>> {
        self.iter()
            .map(|s| {
                vec![
                    Cell::Text(s.file_id.clone()),
                    s.period.map(|p| p.to_string()).into(),
                    s.period_label.clone().into(),
                    s.deposits_receipts.into(),
                    s.transfers.into(),
                    s.other_entries.into(),
                    s.withdrawals.into(),
                    s.automatic_debits.into(),
                    s.other_exits.into(),
                    s.total_entries.into(),
                    s.total_exits.into(),
                    s.opening_balance.into(),
                    s.closing_balance.into(),
                ]
            })
            .collect()
    }
}

impl Tabular for [Transaction] {
    fn columns(&self) -> Vec<String> {
        [
            "arquivo",
            "mes_key",
            "data",
            "descricao",
            "valor_entrada",
            "valor_saida",
            "saldo",
            "categoria",
        ]
        .map(String::from)
        .to_vec()
    }

    fn rows(&self) -> Vec<Vec<Cell>> {
        self.iter()
            .map(|t| {
                vec![
                    Cell::Text(t.file_id.clone()),
                    t.period.map(|p| p.to_string()).into(),
                    Cell::Text(t.date.clone()),
                    Cell::Text(t.description.clone()),
                    t.entry.into(),
                    t.exit.into(),
                    t.balance.into(),
                    t.category.clone().into(),
                ]
            })
            .collect()
    }
}
