use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use extrato_analytics::Analyzer;
use extrato_core::{Cell, Direction, Tabular};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Spreadsheet tools configured for pt-BR need the BOM to detect UTF-8.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Writes one table as `;`-separated CSV with comma decimals.
pub fn write_table<W: Write, T: Tabular + ?Sized>(
    mut out: W,
    table: &T,
) -> Result<(), ExportError> {
    out.write_all(UTF8_BOM)?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(out);
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(Cell::to_br_string))?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes `<dir>/<name>.csv`. Tables without rows are skipped.
pub fn export_table<T: Tabular + ?Sized>(
    dir: &Path,
    name: &str,
    table: &T,
) -> Result<Option<PathBuf>, ExportError> {
    let rows = table.rows().len();
    if rows == 0 {
        tracing::warn!(table = name, "Empty table, export skipped");
        return Ok(None);
    }

    let path = dir.join(format!("{name}.csv"));
    write_table(BufWriter::new(File::create(&path)?), table)?;
    tracing::info!(file = %path.display(), rows, "CSV exported");
    Ok(Some(path))
}

/// Writes every report table; returns the files actually written.
pub fn export_all(
    dir: &Path,
    analyzer: &Analyzer<'_>,
    top_n: usize,
) -> Result<Vec<PathBuf>, ExportError> {
    use Direction::{Entry, Exit};

    std::fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    written.extend(export_table(dir, "01_resumo_mensal", analyzer.summaries())?);
    written.extend(export_table(dir, "02_movimentacoes", analyzer.transactions())?);
    written.extend(export_table(
        dir,
        "03_fluxo_caixa_mensal",
        &analyzer.monthly_cash_flow(),
    )?);
    written.extend(export_table(
        dir,
        "04_saidas_por_categoria",
        &analyzer.category_ranking(Exit),
    )?);
    written.extend(export_table(
        dir,
        "05_entradas_por_categoria",
        &analyzer.category_ranking(Entry),
    )?);
    written.extend(export_table(
        dir,
        "06_top_saidas_descricao",
        &analyzer.top_descriptions(Exit, top_n),
    )?);
    written.extend(export_table(
        dir,
        "07_top_entradas_descricao",
        &analyzer.top_descriptions(Entry, top_n),
    )?);
    written.extend(export_table(
        dir,
        "08_indicadores",
        &analyzer.period_indicators(),
    )?);
    written.extend(export_table(dir, "09_pareto_saidas", &analyzer.pareto(Exit))?);

    tracing::info!(dir = %dir.display(), files = written.len(), "Export finished");
    Ok(written)
}
