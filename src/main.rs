extern crate pvem;

use clap::{Parser, Subcommand};
use pvem::assessment::{MeasuredAssessment, TheoreticalAssessment};
use pvem::input::{DeclaredEfficiency, PanelArrayParameters};
use pvem::output::FileOutput;
use pvem::{run_measured, run_theoretical};
use std::ffi::OsStr;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct PvemArgs {
    #[command(subcommand)]
    command: PvemCommand,
}

#[derive(Subcommand, Debug)]
enum PvemCommand {
    /// Expected yield from a declared system efficiency and a PVGIS hourly irradiance export
    Theoretical {
        irradiance_file: String,
        #[arg(long, short)]
        num_panels: u32,
        #[arg(long, short)]
        panel_area: f64,
        /// Overall system efficiency in percent (panel efficiency times the
        /// remaining system losses)
        #[arg(long, short)]
        efficiency: f64,
    },
    /// Fit the system efficiency from measured production, validate the fit, and
    /// optionally project the yield at a candidate site
    Measured {
        production_file: String,
        irradiance_file: String,
        /// PVGIS irradiance export for the candidate site, covering the same
        /// time range and sampling grid as the production file
        #[arg(long, short)]
        candidate_irradiance_file: Option<String>,
        #[arg(long, short)]
        num_panels: u32,
        #[arg(long, short)]
        panel_area: f64,
    },
}

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = PvemArgs::parse();

    match args.command {
        PvemCommand::Theoretical {
            irradiance_file,
            num_panels,
            panel_area,
            efficiency,
        } => {
            let parameters = PanelArrayParameters::new(num_panels, panel_area)?;
            let efficiency = DeclaredEfficiency::new(efficiency)?;
            let assessment = run_theoretical(
                open_input(&irradiance_file)?,
                parameters,
                efficiency,
                output_for_input_file(&irradiance_file),
            )?;
            report_theoretical(&assessment);
        }
        PvemCommand::Measured {
            production_file,
            irradiance_file,
            candidate_irradiance_file,
            num_panels,
            panel_area,
        } => {
            let parameters = PanelArrayParameters::new(num_panels, panel_area)?;
            let candidate_irradiance = candidate_irradiance_file
                .as_deref()
                .map(open_input)
                .transpose()?;
            let assessment = run_measured(
                open_input(&production_file)?,
                open_input(&irradiance_file)?,
                candidate_irradiance,
                parameters,
                output_for_input_file(&production_file),
            )?;
            report_measured(&assessment);
        }
    }

    Ok(())
}

fn open_input(input_file: &str) -> anyhow::Result<BufReader<File>> {
    Ok(BufReader::new(File::open(Path::new(input_file))?))
}

/// Results files are named after the driving input file, e.g.
/// `production_results.csv` and `production_summary.json` next to
/// `production.csv`.
fn output_for_input_file(input_file: &str) -> FileOutput {
    let path = Path::new(input_file);
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };
    let input_file_stem = path
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or(input_file);
    FileOutput::new(directory, format!("{input_file_stem}_{{}}.{{}}"))
}

// values are rounded here and nowhere else: whole kWh for the theoretical
// breakdown, two decimals for the measured path
fn report_theoretical(assessment: &TheoreticalAssessment) {
    println!(
        "Total expected yield: {:.0} kWh",
        assessment.expected_yield.total_kwh
    );
    for (year, kwh) in &assessment.expected_yield.yearly_kwh {
        println!("Year {year}: {kwh:.0} kWh");
    }
}

fn report_measured(assessment: &MeasuredAssessment) {
    println!(
        "System efficiency: {:.2}% (r² {:.4})",
        assessment.efficiency.efficiency_pct,
        assessment.model.r_squared()
    );
    println!(
        "Total real output: {:.2} kWh",
        assessment.validation.total_real_kwh
    );
    println!(
        "Total modelled output: {:.2} kWh",
        assessment.validation.total_theoretical_kwh
    );
    println!("Error rate: {:.2}%", assessment.validation.error_rate_pct);
    if let Some(projection) = &assessment.projection {
        println!(
            "Projected output at candidate site: {:.2} kWh",
            projection.total_theoretical_kwh_new
        );
        println!("Change versus current site: {:.2}%", projection.increase_pct);
    }
}
