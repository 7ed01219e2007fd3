//! Output writers.
//!
//! Three artifacts come out of a pipeline run:
//!
//! - the statistics bundle: the data table as CSV plus a generated SPSS
//!   syntax file that reads it, applies all labels, levels and widths, and
//!   saves a `.sav` (the analyst runs the syntax once in SPSS)
//! - a plain CSV mirror of the cleaned table for spreadsheet review
//! - a JSON codebook describing every output variable
//!
//! Writers never invent metadata: everything they emit comes from the
//! [`crate::labels::DatasetMetadata`] built off the questionnaire definition.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde_json::json;
use tracing::info;

use crate::clean::CleanReport;
use crate::error::ExportResult;
use crate::labels::{display_width, measurement_level, DatasetMetadata, MeasureLevel};
use crate::model::Dataset;

/// Default declared width for free-text columns without an explicit hint.
const DEFAULT_TEXT_WIDTH: u16 = 40;

// =============================================================================
// CSV
// =============================================================================

/// Write the dataset as CSV. Missing cells render as empty fields.
pub fn write_csv(ds: &Dataset, path: &Path) -> ExportResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(ds.columns())?;
    for row in ds.rows() {
        writer.write_record(row.iter().map(|cell| cell.render()))?;
    }
    writer.flush()?;
    info!(path = %path.display(), rows = ds.n_rows(), "wrote CSV");
    Ok(())
}

// =============================================================================
// SPSS bundle
// =============================================================================

/// Write the statistics bundle: the data CSV and the SPSS syntax that turns
/// it into a labelled `.sav`.
pub fn write_spss_bundle(
    ds: &Dataset,
    metadata: &DatasetMetadata,
    data_path: &Path,
    syntax_path: &Path,
) -> ExportResult<()> {
    write_csv(ds, data_path)?;

    let file = File::create(syntax_path)?;
    let mut out = BufWriter::new(file);
    write_syntax(ds, metadata, data_path, &mut out)?;
    out.flush()?;
    info!(path = %syntax_path.display(), "wrote SPSS syntax");
    Ok(())
}

fn write_syntax<W: Write>(
    ds: &Dataset,
    metadata: &DatasetMetadata,
    data_path: &Path,
    out: &mut W,
) -> ExportResult<()> {
    writeln!(out, "* Survey data import syntax (generated).")?;
    writeln!(out)?;

    writeln!(out, "GET DATA")?;
    writeln!(out, "  /TYPE=TXT")?;
    writeln!(out, "  /FILE='{}'", sps_escape(&data_path.display().to_string()))?;
    writeln!(out, "  /DELIMITERS=\",\"")?;
    writeln!(out, "  /QUALIFIER='\"'")?;
    writeln!(out, "  /ARRANGEMENT=DELIMITED")?;
    writeln!(out, "  /FIRSTCASE=2")?;
    writeln!(out, "  /VARIABLES=")?;
    for column in ds.columns() {
        writeln!(out, "    {} {}", column, column_format(column))?;
    }
    writeln!(out, "  .")?;
    writeln!(out)?;

    writeln!(out, "VARIABLE LABELS")?;
    for column in ds.columns() {
        if let Some(label) = metadata.variable_label(column) {
            writeln!(out, "  {} '{}'", column, sps_escape(label))?;
        }
    }
    writeln!(out, "  .")?;
    writeln!(out)?;

    for column in ds.columns() {
        let Some(table) = metadata.value_table(column) else {
            continue;
        };
        writeln!(out, "VALUE LABELS {}", column)?;
        for (value, label) in table {
            writeln!(out, "  {} '{}'", value, sps_escape(label))?;
        }
        writeln!(out, "  .")?;
    }
    writeln!(out)?;

    write_level_command(ds, out, MeasureLevel::Scale, "SCALE")?;
    write_level_command(ds, out, MeasureLevel::Ordinal, "ORDINAL")?;
    write_level_command(ds, out, MeasureLevel::Nominal, "NOMINAL")?;
    writeln!(out)?;

    let widths: Vec<String> = ds
        .columns()
        .iter()
        .filter_map(|c| display_width(c).map(|w| format!("{c} ({w})")))
        .collect();
    if !widths.is_empty() {
        writeln!(out, "VARIABLE WIDTH {}.", widths.join(" "))?;
        writeln!(out)?;
    }

    let sav = data_path.with_extension("sav");
    writeln!(out, "SAVE OUTFILE='{}'.", sps_escape(&sav.display().to_string()))?;
    writeln!(out, "EXECUTE.")?;
    Ok(())
}

fn write_level_command<W: Write>(
    ds: &Dataset,
    out: &mut W,
    level: MeasureLevel,
    keyword: &str,
) -> ExportResult<()> {
    let names: Vec<&str> = ds
        .columns()
        .iter()
        .filter(|c| measurement_level(c) == level)
        .map(String::as_str)
        .collect();
    if !names.is_empty() {
        writeln!(out, "VARIABLE LEVEL {} ({}).", names.join(" "), keyword)?;
    }
    Ok(())
}

/// SPSS input format for a column: strings as `A{n}`, everything coded or
/// numeric as `F8.0`.
fn column_format(column: &str) -> String {
    match measurement_level(column) {
        MeasureLevel::Text => {
            let width = display_width(column).unwrap_or(DEFAULT_TEXT_WIDTH);
            format!("A{width}")
        }
        _ if column == "ID" => "A40".to_string(),
        _ => "F8.0".to_string(),
    }
}

/// SPSS string literals use doubled apostrophes.
fn sps_escape(text: &str) -> String {
    text.replace('\'', "''")
}

// =============================================================================
// JSON codebook and validation report
// =============================================================================

/// Write the JSON codebook: one entry per output column with its label,
/// measurement level, value labels and declared width.
pub fn write_codebook(ds: &Dataset, metadata: &DatasetMetadata, path: &Path) -> ExportResult<()> {
    let variables: Vec<serde_json::Value> = ds
        .columns()
        .iter()
        .map(|column| {
            let values: Option<serde_json::Value> = metadata.value_table(column).map(|table| {
                table
                    .iter()
                    .map(|(v, t)| json!({ "code": v, "label": t }))
                    .collect()
            });
            json!({
                "name": column,
                "label": metadata.variable_label(column),
                "level": level_name(measurement_level(column)),
                "values": values,
                "width": display_width(column),
            })
        })
        .collect();

    let doc = json!({ "cases": ds.n_rows(), "variables": variables });
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), &doc)?;
    info!(path = %path.display(), "wrote codebook");
    Ok(())
}

/// Write the validation report as JSON for fieldwork QA.
pub fn write_clean_report(report: &CleanReport, path: &Path) -> ExportResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), report)?;
    info!(path = %path.display(), "wrote validation report");
    Ok(())
}

fn level_name(level: MeasureLevel) -> &'static str {
    match level {
        MeasureLevel::Scale => "scale",
        MeasureLevel::Ordinal => "ordinal",
        MeasureLevel::Nominal => "nominal",
        MeasureLevel::Text => "text",
    }
}

// =============================================================================
// Tests
// =============================================================================
