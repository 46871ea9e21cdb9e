use extrato_core::{Direction, MonthlySummary, Transaction};

use crate::cash_flow::{self, CashFlowTable, IndicatorTable, NetResultSeries};
use crate::ranking::{
    self, CategoryRanking, DescriptionRanking, MonthlyCategoryRanking, ParetoTable,
};

/// Read-only view over one batch of summaries and transactions. Every table
/// is recomputed on request and depends only on these two inputs.
#[derive(Debug, Clone, Copy)]
pub struct Analyzer<'a> {
    summaries: &'a [MonthlySummary],
    transactions: &'a [Transaction],
}

impl<'a> Analyzer<'a> {
    pub fn new(summaries: &'a [MonthlySummary], transactions: &'a [Transaction]) -> Self {
        tracing::info!(
            summaries = summaries.len(),
            transactions = transactions.len(),
            "Analyzer ready"
        );
        Self { summaries, transactions }
    }

    pub fn summaries(&self) -> &'a [MonthlySummary] {
        self.summaries
    }

    pub fn transactions(&self) -> &'a [Transaction] {
        self.transactions
    }

    pub fn monthly_cash_flow(&self) -> CashFlowTable {
        cash_flow::monthly_cash_flow(self.summaries)
    }

    pub fn period_indicators(&self) -> IndicatorTable {
        cash_flow::period_indicators(self.summaries)
    }

    pub fn net_result_series(&self) -> NetResultSeries {
        cash_flow::net_result_series(self.summaries)
    }

    pub fn category_ranking(&self, direction: Direction) -> CategoryRanking {
        ranking::category_ranking(self.transactions, direction)
    }

    pub fn monthly_category_ranking(&self, direction: Direction) -> MonthlyCategoryRanking {
        ranking::monthly_category_ranking(self.transactions, direction)
    }

    pub fn top_descriptions(&self, direction: Direction, limit: usize) -> DescriptionRanking {
        ranking::top_descriptions(self.transactions, direction, limit)
    }

    pub fn pareto(&self, direction: Direction) -> ParetoTable {
        ranking::pareto(self.transactions, direction)
    }
}
