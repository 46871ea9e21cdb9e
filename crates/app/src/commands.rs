use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use std::path::{Path, PathBuf};

use extrato_analytics::Analyzer;
use extrato_core::{Direction, Money};
use extrato_import::{
    load_directory, process_batch, CategoryTable, FileFailure, StatementSource, TextFileSource,
};

use crate::config::Config;
use crate::export;

/// Kind of statement file read from the input directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// Text already extracted from the statements
    Txt,
    /// PDF statements (needs the `pdf` feature)
    Pdf,
}

impl SourceKind {
    pub fn extension(self) -> &'static str {
        match self {
            SourceKind::Txt => "txt",
            SourceKind::Pdf => "pdf",
        }
    }

    fn source(self) -> Result<Box<dyn StatementSource>> {
        match self {
            SourceKind::Txt => Ok(Box::new(TextFileSource)),
            #[cfg(feature = "pdf")]
            SourceKind::Pdf => Ok(Box::new(extrato_import::PdfTextSource)),
            #[cfg(not(feature = "pdf"))]
            SourceKind::Pdf => {
                bail!("PDF input needs a build with the `pdf` feature; use --ext txt")
            }
        }
    }
}

/// What a run produced, for the closing report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub files: usize,
    pub months: usize,
    pub transactions: usize,
    pub exit_categories: usize,
    pub total_entries: Money,
    pub total_exits: Money,
    pub failures: Vec<FileFailure>,
    pub written: Vec<PathBuf>,
}

pub fn load_rules(rules_file: Option<&Path>) -> Result<CategoryTable> {
    match rules_file {
        Some(path) => CategoryTable::from_path(path)
            .with_context(|| format!("loading category table {}", path.display())),
        None => Ok(CategoryTable::default()),
    }
}

/// load → extract → categorize → aggregate → export.
pub fn run(cfg: &Config, kind: SourceKind) -> Result<RunReport> {
    let rules = load_rules(cfg.rules_file.as_deref())?;
    let source = kind.source()?;

    let docs = load_directory(&cfg.input_dir, source.as_ref(), kind.extension())
        .with_context(|| format!("reading {}", cfg.input_dir.display()))?;
    if docs.is_empty() {
        bail!(
            "No .{} statements found in {}",
            kind.extension(),
            cfg.input_dir.display()
        );
    }

    let outcome = process_batch(&docs, &rules);
    if outcome.processed() == 0 {
        bail!("None of the {} statement files could be processed", docs.len());
    }

    let analyzer = Analyzer::new(&outcome.summaries, &outcome.transactions);
    let total_entries = outcome.summaries.iter().map(|s| s.total_entries).sum();
    let total_exits = outcome.summaries.iter().map(|s| s.total_exits).sum();
    let written = export::export_all(&cfg.output_dir, &analyzer, cfg.top_n)
        .with_context(|| format!("exporting to {}", cfg.output_dir.display()))?;

    Ok(RunReport {
        files: docs.len(),
        months: outcome.summaries.len(),
        transactions: outcome.transactions.len(),
        exit_categories: analyzer.category_ranking(Direction::Exit).len(),
        total_entries,
        total_exits,
        failures: outcome.failures,
        written,
    })
}

pub fn print_report(report: &RunReport, output_dir: &Path) {
    println!("Statements read:      {}", report.files);
    println!("Months analysed:      {}", report.months);
    println!("Transactions:         {}", report.transactions);
    println!("Exit categories:      {}", report.exit_categories);
    println!("Total entries:        {}", report.total_entries);
    println!("Total exits:          {}", report.total_exits);
    println!(
        "Net result:           {}",
        report.total_entries - report.total_exits
    );
    println!(
        "Files written:        {} ({})",
        report.written.len(),
        output_dir.display()
    );
    if !report.failures.is_empty() {
        println!("\nFailed statements:");
        for f in &report.failures {
            println!("  {}: {}", f.file_id, f.reason);
        }
    }
}
