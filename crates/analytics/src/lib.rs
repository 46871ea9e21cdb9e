pub mod analyzer;
pub mod cash_flow;
pub mod ranking;

pub use analyzer::Analyzer;
pub use cash_flow::{
    monthly_cash_flow, net_result_series, period_indicators, CashFlowRow, CashFlowTable,
    Indicator, IndicatorTable, IndicatorValue, NetResultRow, NetResultSeries,
};
pub use ranking::{
    category_ranking, monthly_category_ranking, pareto, top_descriptions, CategoryRank,
    CategoryRanking, DescriptionRank, DescriptionRanking, MonthlyCategoryRank,
    MonthlyCategoryRanking, ParetoRow, ParetoTable,
};
