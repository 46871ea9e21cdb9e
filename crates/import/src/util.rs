use std::sync::OnceLock;

use regex::Regex;

use extrato_core::month_from_abbreviation;

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        pub(crate) fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

// Brazilian amount, e.g. `1.234,56` or `1.234,56-` (trailing minus = debit).
re!(re_money_token, r"\d{1,3}(?:\.\d{3})*,\d{2}-?");
re!(re_full_date, r"(\d{2})/(\d{2})/(\d{4})");
re!(re_month_year,
    r"(?i)(jan|fev|mar|abr|mai|jun|jul|ago|set|out|nov|dez)\s*[/\-]?\s*(\d{4})");
re!(re_leading_day_month, r"^(\d{2}/\d{2})");

// ── Text helpers ──────────────────────────────────────────────────────────────

/// Collapses every run of whitespace into one space and trims the ends.
pub(crate) fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First `<month abbr> [/-] <yyyy>` token in the text, as (month, year).
pub(crate) fn find_month_year(text: &str) -> Option<(u32, i32)> {
    let c = re_month_year().captures(text)?;
    let month = month_from_abbreviation(c.get(1)?.as_str())?;
    let year: i32 = c.get(2)?.as_str().parse().ok()?;
    Some((month, year))
}

/// First `dd/mm/yyyy` token in the text, unvalidated, as (day, month, year).
pub(crate) fn find_full_date(text: &str) -> Option<(u32, u32, i32)> {
    let c = re_full_date().captures(text)?;
    let day: u32 = c.get(1)?.as_str().parse().ok()?;
    let month: u32 = c.get(2)?.as_str().parse().ok()?;
    let year: i32 = c.get(3)?.as_str().parse().ok()?;
    Some((day, month, year))
}
