pub mod pipeline;
pub mod rules;
pub mod source;
pub mod summary;
pub mod transactions;
pub(crate) mod util;
pub mod value;

pub use pipeline::{
    extract_summaries, extract_transactions_for, process_batch, BatchOutcome, FileFailure,
    StatementPipeline,
};
pub use rules::{category_counts, CategoryRule, CategoryTable, RulesError, FALLBACK_CATEGORY};
#[cfg(feature = "pdf")]
pub use source::PdfTextSource;
pub use source::{list_files, load_directory, SourceError, StatementSource, TextFileSource};
pub use summary::{balance_slot, detect_period, extract_summary, BalanceSlot, SummaryExtractor};
pub use transactions::{
    extract_transactions, parse_transaction_line, reassemble, TransactionExtractor,
    MAX_CONTINUATION_LINES,
};
pub use value::parse_value;
