pub mod money;
pub mod period;
pub mod statement;
pub mod table;

pub use money::Money;
pub use period::{month_from_abbreviation, PeriodKey, PeriodParseError, MONTH_ABBREVIATIONS};
pub use statement::{Direction, ExtractedStatement, ExtractionOutcome, MonthlySummary, Transaction};
pub use table::{Cell, Tabular};
