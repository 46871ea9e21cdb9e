use rust_decimal::Decimal;
use std::cmp::Reverse;
use std::collections::BTreeMap;

use extrato_core::{Cell, Direction, Money, PeriodKey, Tabular, Transaction};

/// Transactions that moved money in `direction`.
fn moving(
    transactions: &[Transaction],
    direction: Direction,
) -> impl Iterator<Item = &Transaction> {
    transactions.iter().filter(move |t| t.amount(direction).is_positive())
}

// ── Category ranking ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRank {
    pub category: String,
    pub total: Money,
    pub count: usize,
    pub mean: Money,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRanking {
    pub direction: Direction,
    pub rows: Vec<CategoryRank>,
}

impl CategoryRanking {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Sum over every ranked category.
    pub fn grand_total(&self) -> Money {
        self.rows.iter().map(|r| r.total).sum()
    }
}

/// Sum, count and mean per category, largest sum first. Ties keep category
/// name order. Transactions without a category are left out.
pub fn category_ranking(transactions: &[Transaction], direction: Direction) -> CategoryRanking {
    let mut groups: BTreeMap<&str, (Money, usize)> = BTreeMap::new();
    for tx in moving(transactions, direction) {
        let Some(category) = tx.category.as_deref() else {
            continue;
        };
        let entry = groups.entry(category).or_insert((Money::zero(), 0));
        entry.0 = entry.0 + tx.amount(direction);
        entry.1 += 1;
    }

    let mut rows: Vec<CategoryRank> = groups
        .into_iter()
        .map(|(category, (total, count))| CategoryRank {
            category: category.to_string(),
            total,
            count,
            mean: Money::mean(total, count),
        })
        .collect();
    rows.sort_by_key(|r| Reverse(r.total));

    tracing::debug!(direction = %direction, categories = rows.len(), "Category ranking built");
    CategoryRanking { direction, rows }
}

impl Tabular for CategoryRanking {
    fn columns(&self) -> Vec<String> {
        let d = self.direction.suffix();
        vec![
            "categoria".to_string(),
            format!("total_{d}"),
            "quantidade".to_string(),
            format!("media_{d}"),
        ]
    }

    fn rows(&self) -> Vec<Vec<Cell>> {
        self.rows
            .iter()
            .map(|r| {
                vec![
                    Cell::Text(r.category.clone()),
                    r.total.into(),
                    Cell::Count(r.count),
                    r.mean.into(),
                ]
            })
            .collect()
    }
}

// ── Monthly category ranking ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyCategoryRank {
    pub period: PeriodKey,
    pub category: String,
    pub total: Money,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyCategoryRanking {
    pub direction: Direction,
    pub rows: Vec<MonthlyCategoryRank>,
}

/// Per-month category sums: months ascending, largest sum first within a
/// month. Transactions without a period or category are left out.
pub fn monthly_category_ranking(
    transactions: &[Transaction],
    direction: Direction,
) -> MonthlyCategoryRanking {
    let mut groups: BTreeMap<(PeriodKey, &str), Money> = BTreeMap::new();
    for tx in moving(transactions, direction) {
        let (Some(period), Some(category)) = (tx.period, tx.category.as_deref()) else {
            continue;
        };
        let total = groups.entry((period, category)).or_insert(Money::zero());
        *total = *total + tx.amount(direction);
    }

    let mut rows: Vec<MonthlyCategoryRank> = groups
        .into_iter()
        .map(|((period, category), total)| MonthlyCategoryRank {
            period,
            category: category.to_string(),
            total,
        })
        .collect();
    rows.sort_by_key(|r| (r.period, Reverse(r.total)));

    MonthlyCategoryRanking { direction, rows }
}

impl Tabular for MonthlyCategoryRanking {
    fn columns(&self) -> Vec<String> {
        vec![
            "mes_key".to_string(),
            "categoria".to_string(),
            format!("total_{}", self.direction.suffix()),
        ]
    }

    fn rows(&self) -> Vec<Vec<Cell>> {
        self.rows
            .iter()
            .map(|r| {
                vec![
                    Cell::Text(r.period.to_string()),
                    Cell::Text(r.category.clone()),
                    r.total.into(),
                ]
            })
            .collect()
    }
}

// ── Top descriptions ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionRank {
    pub description: String,
    pub total: Money,
    pub count: usize,
    /// Category of the first categorized occurrence.
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionRanking {
    pub direction: Direction,
    pub rows: Vec<DescriptionRank>,
}

/// Descriptions grouped verbatim, largest sum first, at most `limit` rows.
pub fn top_descriptions(
    transactions: &[Transaction],
    direction: Direction,
    limit: usize,
) -> DescriptionRanking {
    let mut groups: BTreeMap<&str, DescriptionRank> = BTreeMap::new();
    for tx in moving(transactions, direction) {
        let rank = groups.entry(tx.description.as_str()).or_insert_with(|| DescriptionRank {
            description: tx.description.clone(),
            total: Money::zero(),
            count: 0,
            category: None,
        });
        rank.total = rank.total + tx.amount(direction);
        rank.count += 1;
        if rank.category.is_none() {
            rank.category = tx.category.clone();
        }
    }

    let mut rows: Vec<DescriptionRank> = groups.into_values().collect();
    rows.sort_by_key(|r| Reverse(r.total));
    rows.truncate(limit);

    DescriptionRanking { direction, rows }
}

impl Tabular for DescriptionRanking {
    fn columns(&self) -> Vec<String> {
        vec![
            "descricao".to_string(),
            format!("total_{}", self.direction.suffix()),
            "quantidade".to_string(),
            "categoria".to_string(),
        ]
    }

    fn rows(&self) -> Vec<Vec<Cell>> {
        self.rows
            .iter()
            .map(|r| {
                vec![
                    Cell::Text(r.description.clone()),
                    r.total.into(),
                    Cell::Count(r.count),
                    r.category.clone().into(),
                ]
            })
            .collect()
    }
}

// ── Pareto ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParetoRow {
    pub rank: CategoryRank,
    /// Share of the direction's grand total, in percent, 2 dp.
    pub percent: Decimal,
    /// Running sum of the rounded shares, 2 dp.
    pub cumulative_percent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParetoTable {
    pub direction: Direction,
    pub rows: Vec<ParetoRow>,
}

pub fn pareto(transactions: &[Transaction], direction: Direction) -> ParetoTable {
    let ranking = category_ranking(transactions, direction);
    let grand_total = ranking.grand_total().as_decimal();
    if grand_total.is_zero() {
        return ParetoTable { direction, rows: Vec::new() };
    }

    let hundred = Decimal::ONE_HUNDRED;
    let mut cumulative = Decimal::ZERO;
    let rows = ranking
        .rows
        .into_iter()
        .map(|rank| {
            let percent = (rank.total.as_decimal() / grand_total * hundred).round_dp(2);
            cumulative = (cumulative + percent).round_dp(2);
            ParetoRow { rank, percent, cumulative_percent: cumulative }
        })
        .collect();

    ParetoTable { direction, rows }
}

impl Tabular for ParetoTable {
    fn columns(&self) -> Vec<String> {
        let d = self.direction.suffix();
        vec![
            "categoria".to_string(),
            format!("total_{d}"),
            "quantidade".to_string(),
            format!("media_{d}"),
            "percentual".to_string(),
            "percentual_acumulado".to_string(),
        ]
    }

    fn rows(&self) -> Vec<Vec<Cell>> {
        self.rows
            .iter()
            .map(|r| {
                vec![
                    Cell::Text(r.rank.category.clone()),
                    r.rank.total.into(),
                    Cell::Count(r.rank.count),
                    r.rank.mean.into(),
                    Cell::Decimal(r.percent),
                    Cell::Decimal(r.cumulative_percent),
                ]
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(
        desc: &str,
        category: Option<&str>,
        period: Option<(i32, u32)>,
        entry: i64,
        exit: i64,
    ) -> Transaction {
        Transaction {
            file_id: "f".into(),
            period: period.and_then(|(y, m)| PeriodKey::new(y, m)),
            date: "01/01/2025".into(),
            description: desc.into(),
            entry: Money::from_cents(entry),
            exit: Money::from_cents(exit),
            balance: Money::zero(),
            category: category.map(String::from),
        }
    }

    fn exits(amounts: &[(&str, i64)]) -> Vec<Transaction> {
        amounts.iter().map(|&(c, v)| tx("x", Some(c), Some((2025, 1)), 0, v)).collect()
    }

    // ── category ranking ──

    #[test]
    fn ranking_sum_count_mean_descending() {
        let txs = vec![
            tx("a", Some("PIX"), None, 0, 10_000),
            tx("b", Some("PIX"), None, 0, 5_000),
            tx("c", Some("Saques"), None, 0, 20_000),
            tx("d", Some("Saques"), None, 7_000, 0),
        ];
        let r = category_ranking(&txs, Direction::Exit);
        assert_eq!(r.len(), 2);
        assert_eq!(r.rows[0].category, "Saques");
        assert_eq!(r.rows[0].total, Money::from_cents(20_000));
        assert_eq!(r.rows[0].count, 1);
        assert_eq!(r.rows[1].category, "PIX");
        assert_eq!(r.rows[1].count, 2);
        assert_eq!(r.rows[1].mean, Money::from_cents(7_500));
    }

    #[test]
    fn ranking_ties_follow_category_order() {
        let r = category_ranking(&exits(&[("B", 100), ("A", 100), ("C", 50)]), Direction::Exit);
        let names: Vec<&str> = r.rows.iter().map(|x| x.category.as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);
    }

    #[test]
    fn ranking_skips_zero_and_uncategorized() {
        let txs = vec![tx("a", Some("PIX"), None, 0, 0), tx("b", None, None, 0, 500)];
        assert!(category_ranking(&txs, Direction::Exit).is_empty());
    }

    #[test]
    fn ranking_columns_use_direction_suffix() {
        let r = category_ranking(&[], Direction::Entry);
        assert_eq!(r.columns(), ["categoria", "total_entrada", "quantidade", "media_entrada"]);
    }

    // ── monthly ranking ──

    #[test]
    fn monthly_ranking_orders_period_then_total() {
        let txs = vec![
            tx("a", Some("PIX"), Some((2025, 2)), 0, 100),
            tx("b", Some("Saques"), Some((2025, 2)), 0, 300),
            tx("c", Some("PIX"), Some((2025, 1)), 0, 50),
            tx("d", Some("PIX"), None, 0, 999),
        ];
        let r = monthly_category_ranking(&txs, Direction::Exit);
        let got: Vec<(String, &str, Money)> =
            r.rows.iter().map(|x| (x.period.to_string(), x.category.as_str(), x.total)).collect();
        assert_eq!(
            got,
            [
                ("2025-01".to_string(), "PIX", Money::from_cents(50)),
                ("2025-02".to_string(), "Saques", Money::from_cents(300)),
                ("2025-02".to_string(), "PIX", Money::from_cents(100)),
            ]
        );
        assert_eq!(r.columns(), ["mes_key", "categoria", "total_saida"]);
    }

    // ── top descriptions ──

    #[test]
    fn top_descriptions_group_and_truncate() {
        let txs = vec![
            tx("PIX JOAO", None, None, 1_000, 0),
            tx("PIX JOAO", Some("PIX"), None, 2_000, 0),
            tx("DEP DIN", Some("Depósitos"), None, 2_500, 0),
            tx("TED X", Some("Transferências"), None, 100, 0),
        ];
        let r = top_descriptions(&txs, Direction::Entry, 2);
        assert_eq!(r.rows.len(), 2);
        assert_eq!(r.rows[0].description, "PIX JOAO");
        assert_eq!(r.rows[0].total, Money::from_cents(3_000));
        assert_eq!(r.rows[0].count, 2);
        assert_eq!(r.rows[0].category.as_deref(), Some("PIX"));
        assert_eq!(r.rows[1].description, "DEP DIN");
    }

    #[test]
    fn top_descriptions_zero_limit() {
        let txs = vec![tx("A", Some("X"), None, 100, 0)];
        assert!(top_descriptions(&txs, Direction::Entry, 0).rows.is_empty());
    }

    // ── pareto ──

    #[test]
    fn pareto_percentages() {
        let p = pareto(&exits(&[("A", 50_000), ("B", 30_000), ("C", 20_000)]), Direction::Exit);
        let pct: Vec<Decimal> = p.rows.iter().map(|r| r.percent).collect();
        let cum: Vec<Decimal> = p.rows.iter().map(|r| r.cumulative_percent).collect();
        assert_eq!(pct, [Decimal::new(5000, 2), Decimal::new(3000, 2), Decimal::new(2000, 2)]);
        assert_eq!(cum, [Decimal::new(5000, 2), Decimal::new(8000, 2), Decimal::new(10000, 2)]);
    }

    #[test]
    fn pareto_cumulates_rounded_shares() {
        // 1/3 each: 33.33 + 33.33 + 33.33 = 99.99, not 100.
        let p = pareto(&exits(&[("A", 100), ("B", 100), ("C", 100)]), Direction::Exit);
        assert_eq!(p.rows[2].cumulative_percent, Decimal::new(9999, 2));
    }

    #[test]
    fn pareto_cells_use_comma() {
        let p = pareto(&exits(&[("A", 300), ("B", 100)]), Direction::Exit);
        let rows = p.rows();
        assert_eq!(rows[0][4].to_br_string(), "75,00");
        assert_eq!(rows[1][5].to_br_string(), "100,00");
    }

    #[test]
    fn empty_inputs() {
        assert!(category_ranking(&[], Direction::Exit).is_empty());
        assert!(monthly_category_ranking(&[], Direction::Exit).rows.is_empty());
        assert!(top_descriptions(&[], Direction::Exit, 50).rows.is_empty());
        assert!(pareto(&[], Direction::Exit).rows.is_empty());
    }
}
