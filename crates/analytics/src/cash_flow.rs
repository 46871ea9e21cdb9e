use serde::Serialize;

use extrato_core::{Cell, Money, MonthlySummary, PeriodKey, Tabular};

/// Summaries in chronological order; those without a period go last, in
/// input order.
fn chronological(summaries: &[MonthlySummary]) -> Vec<&MonthlySummary> {
    let mut sorted: Vec<&MonthlySummary> = summaries.iter().collect();
    sorted.sort_by_key(|s| (s.period.is_none(), s.period));
    sorted
}

fn key_cell(period: Option<PeriodKey>) -> Cell {
    period.map(|p| p.to_string()).into()
}

// ── Monthly cash flow ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CashFlowRow {
    pub mes_key: Option<PeriodKey>,
    pub mes_label: Option<String>,
    pub total_entradas: Money,
    pub total_saidas: Money,
    pub resultado_liquido: Money,
    pub saldo_inicial: Money,
    pub saldo_final: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CashFlowTable {
    pub rows: Vec<CashFlowRow>,
}

impl CashFlowTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

pub fn monthly_cash_flow(summaries: &[MonthlySummary]) -> CashFlowTable {
    let rows = chronological(summaries)
        .into_iter()
        .map(|s| CashFlowRow {
            mes_key: s.period,
            mes_label: s.period_label.clone(),
            total_entradas: s.total_entries,
            total_saidas: s.total_exits,
            resultado_liquido: s.net_result(),
            saldo_inicial: s.opening_balance,
            saldo_final: s.closing_balance,
        })
        .collect();
    CashFlowTable { rows }
}

impl Tabular for CashFlowTable {
    fn columns(&self) -> Vec<String> {
        [
            "mes_key",
            "mes_label",
            "total_entradas",
            "total_saidas",
            "resultado_liquido",
            "saldo_inicial",
            "saldo_final",
        ]
        .map(String::from)
        .to_vec()
    }

    fn rows(&self) -> Vec<Vec<Cell>> {
        self.rows
            .iter()
            .map(|r| {
                vec![
                    key_cell(r.mes_key),
                    r.mes_label.clone().into(),
                    r.total_entradas.into(),
                    r.total_saidas.into(),
                    r.resultado_liquido.into(),
                    r.saldo_inicial.into(),
                    r.saldo_final.into(),
                ]
            })
            .collect()
    }
}

// ── Net result series ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetResultRow {
    pub mes_key: Option<PeriodKey>,
    pub mes_label: Option<String>,
    pub resultado_liquido: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetResultSeries {
    pub rows: Vec<NetResultRow>,
}

impl NetResultSeries {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

pub fn net_result_series(summaries: &[MonthlySummary]) -> NetResultSeries {
    let rows = chronological(summaries)
        .into_iter()
        .map(|s| NetResultRow {
            mes_key: s.period,
            mes_label: s.period_label.clone(),
            resultado_liquido: s.net_result(),
        })
        .collect();
    NetResultSeries { rows }
}

impl Tabular for NetResultSeries {
    fn columns(&self) -> Vec<String> {
        ["mes_key", "mes_label", "resultado_liquido"]
            .map(String::from)
            .to_vec()
    }

    fn rows(&self) -> Vec<Vec<Cell>> {
        self.rows
            .iter()
            .map(|r| {
                vec![
                    key_cell(r.mes_key),
                    r.mes_label.clone().into(),
                    r.resultado_liquido.into(),
                ]
            })
            .collect()
    }
}

// ── Period indicators ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum IndicatorValue {
    Money(Money),
    Count(usize),
}

impl From<IndicatorValue> for Cell {
    fn from(v: IndicatorValue) -> Self {
        match v {
            IndicatorValue::Money(m) => Cell::Money(m),
            IndicatorValue::Count(n) => Cell::Count(n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Indicator {
    #[serde(rename = "Indicador")]
    pub name: &'static str,
    #[serde(rename = "Valor")]
    pub value: IndicatorValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndicatorTable {
    pub rows: Vec<Indicator>,
}

impl IndicatorTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Totals and monthly means over every summary, keyed or not.
pub fn period_indicators(summaries: &[MonthlySummary]) -> IndicatorTable {
    if summaries.is_empty() {
        return IndicatorTable { rows: Vec::new() };
    }

    let months = summaries.len();
    let entries: Money = summaries.iter().map(|s| s.total_entries).sum();
    let exits: Money = summaries.iter().map(|s| s.total_exits).sum();
    let net = entries - exits;

    let money = |name, m| Indicator {
        name,
        value: IndicatorValue::Money(m),
    };
    let rows = vec![
        money("Total de Entradas", entries),
        money("Total de Saídas", exits),
        money("Resultado Líquido", net),
        money("Média Mensal de Entradas", Money::mean(entries, months)),
        money("Média Mensal de Saídas", Money::mean(exits, months)),
        money("Média Mensal de Resultado", Money::mean(net, months)),
        Indicator {
            name: "Número de Meses",
            value: IndicatorValue::Count(months),
        },
    ];
    IndicatorTable { rows }
}

impl Tabular for IndicatorTable {
    fn columns(&self) -> Vec<String> {
        ["Indicador", "Valor"].map(String::from).to_vec()
    }

    fn rows(&self) -> Vec<Vec<Cell>> {
        self.rows
            .iter()
            .map(|i| vec![Cell::Text(i.name.to_string()), i.value.into()])
            .collect()
    }
}
