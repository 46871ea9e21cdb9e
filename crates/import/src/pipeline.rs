use std::collections::HashMap;

use extrato_core::{ExtractedStatement, MonthlySummary, PeriodKey, Transaction};

use crate::rules::CategoryTable;
use crate::summary::SummaryExtractor;
use crate::transactions::TransactionExtractor;

/// A statement that produced no records, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub file_id: String,
    pub reason: String,
}

/// Everything a batch run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub summaries: Vec<MonthlySummary>,
    pub transactions: Vec<Transaction>,
    pub failures: Vec<FileFailure>,
}

impl BatchOutcome {
    /// Number of statements that yielded a summary.
    pub fn processed(&self) -> usize {
        self.summaries.len()
    }
}

/// One summary per usable statement; failed and blank documents are skipped.
pub fn extract_summaries(docs: &[ExtractedStatement]) -> Vec<MonthlySummary> {
    docs.iter()
        .filter_map(|doc| match doc.lines() {
            Some(lines) => Some(SummaryExtractor::extract(lines, &doc.file_id)),
            None => {
                tracing::warn!(file = %doc.file_id, "Statement skipped: no text");
                None
            }
        })
        .collect()
}

/// Transactions of every usable statement, each tagged with the period of
/// its file's summary.
pub fn extract_transactions_for(
    docs: &[ExtractedStatement],
    summaries: &[MonthlySummary],
    extractor: &TransactionExtractor,
) -> Vec<Transaction> {
    let periods: HashMap<&str, Option<PeriodKey>> = summaries
        .iter()
        .map(|s| (s.file_id.as_str(), s.period))
        .collect();

    docs.iter()
        .filter_map(|doc| doc.lines().map(|lines| (doc, lines)))
        .flat_map(|(doc, lines)| {
            let period = periods.get(doc.file_id.as_str()).copied().flatten();
            extractor.extract(lines, &doc.file_id, period)
        })
        .collect()
}

/// Extract → categorize over a batch of statements.
#[derive(Debug, Clone, Default)]
pub struct StatementPipeline {
    rules: CategoryTable,
    extractor: TransactionExtractor,
}

impl StatementPipeline {
    pub fn new(rules: CategoryTable, extractor: TransactionExtractor) -> Self {
        Self { rules, extractor }
    }

    pub fn rules(&self) -> &CategoryTable {
        &self.rules
    }

    pub fn process(&self, docs: &[ExtractedStatement]) -> BatchOutcome {
        let failures: Vec<FileFailure> = docs
            .iter()
            .filter_map(|doc| {
                doc.failure_reason().map(|reason| FileFailure {
                    file_id: doc.file_id.clone(),
                    reason: reason.to_string(),
                })
            })
            .collect();
        for failure in &failures {
            tracing::warn!(
                file = %failure.file_id,
                reason = %failure.reason,
                "Statement extraction failed"
            );
        }

        let summaries = extract_summaries(docs);
        let mut transactions = extract_transactions_for(docs, &summaries, &self.extractor);
        self.rules.categorize_all(&mut transactions);

        tracing::info!(
            statements = docs.len(),
            summaries = summaries.len(),
            transactions = transactions.len(),
            failures = failures.len(),
            "Batch processed"
        );

        BatchOutcome { summaries, transactions, failures }
    }
}

/// Runs a batch with the given table and a default transaction extractor.
pub fn process_batch(docs: &[ExtractedStatement], table: &CategoryTable) -> BatchOutcome {
    StatementPipeline::new(table.clone(), TransactionExtractor::new()).process(docs)
}
