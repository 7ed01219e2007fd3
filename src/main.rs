//! Surveyprep CLI - clean a survey export and prepare it for SPSS
//!
//! ```bash
//! surveyprep survey_export.xlsx              # clean with default outputs
//! surveyprep export.csv -o cleaned/          # choose the output directory
//! RUST_LOG=debug surveyprep export.xlsx      # verbose stage logging
//! ```
//!
//! Outputs, written to the output directory:
//!
//! - `survey_clean.csv` - the cleaned table for spreadsheet review
//! - `survey_spss.csv` + `survey_import.sps` - data and generated SPSS
//!   syntax; running the syntax in SPSS produces the labelled `.sav`
//! - `codebook.json` - variable/value labels, levels and widths
//! - `validation_report.json` - per-rule removal counts and IDs

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use surveyprep::{
    load_export, run_pipeline, write_clean_report, write_codebook, write_csv, write_spss_bundle,
    Cell, ExportError, PipelineOutput, PipelineResult,
};

#[derive(Parser)]
#[command(name = "surveyprep")]
#[command(about = "Clean a survey export and prepare it for SPSS", long_about = None)]
struct Cli {
    /// Input survey export (xlsx or delimited text)
    #[arg(default_value = "survey_export.xlsx")]
    input: PathBuf,

    /// Directory for the output artifacts
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Skip the JSON codebook and validation report
    #[arg(long)]
    no_reports: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> PipelineResult<()> {
    std::fs::create_dir_all(&cli.out_dir).map_err(ExportError::Io)?;

    let loaded = load_export(&cli.input)?;
    let output = run_pipeline(loaded.dataset)?;

    write_csv(&output.dataset, &cli.out_dir.join("survey_clean.csv"))?;
    write_spss_bundle(
        &output.dataset,
        &output.metadata,
        &cli.out_dir.join("survey_spss.csv"),
        &cli.out_dir.join("survey_import.sps"),
    )?;
    if !cli.no_reports {
        write_codebook(
            &output.dataset,
            &output.metadata,
            &cli.out_dir.join("codebook.json"),
        )?;
        write_clean_report(&output.report, &cli.out_dir.join("validation_report.json"))?;
    }

    print_summary(&output);
    Ok(())
}

fn print_summary(output: &PipelineOutput) {
    let report = &output.report;
    println!("Initial cases:  {}", report.initial_rows);
    if report.blank_rows > 0 {
        println!("  blank rows removed: {}", report.blank_rows);
    }
    for outcome in &report.outcomes {
        if outcome.applied {
            println!(
                "  {} ({}): {} removed",
                outcome.rule, outcome.description, outcome.removed
            );
        } else {
            println!("  {} ({}): skipped", outcome.rule, outcome.description);
        }
    }
    println!("Clean cases:    {}", report.final_rows);

    // Q2 code 4 is the target brand
    let customers = (0..output.dataset.n_rows())
        .filter(|&row| output.dataset.get(row, "Q2") == Some(&Cell::Int(4)))
        .count();
    println!(
        "Main provider:  {} Origin, {} other",
        customers,
        report.final_rows - customers
    );
}
