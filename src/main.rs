use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use mediscan_lib::config::AppConfig;
use mediscan_lib::pipeline::processor::{ReportProcessor, SummaryOutcome};

/// Screen a medical report for diabetes and breast-cancer risk markers.
#[derive(Parser, Debug)]
#[command(name = "mediscan", version, about)]
struct Cli {
    /// Report to analyze (.pdf, or any plain-text file).
    report: PathBuf,

    /// Also request a free-text summary from the configured summarizer.
    #[arg(long)]
    summary: bool,

    /// Directory holding `<model>_model.json` and `<model>_scaler.json`.
    #[arg(long, env = "MEDISCAN_MODELS_DIR")]
    models_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(dir) = cli.models_dir {
        config.models_dir = dir;
    }
    mediscan_lib::init_tracing(&config);

    let processor = ReportProcessor::from_config(&config);
    let outcome = if cli.summary {
        match config.build_summarizer() {
            Ok(summarizer) => processor.process_path_with_summary(
                &cli.report,
                &*summarizer,
                &config.summary_model,
            ),
            Err(e) => {
                let mut outcome = processor.process_path(&cli.report);
                outcome.summary = Some(SummaryOutcome::Failed {
                    error: e.to_string(),
                });
                outcome
            }
        }
    } else {
        processor.process_path(&cli.report)
    };

    match serde_json::to_string_pretty(&outcome) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to render report: {e}");
            ExitCode::FAILURE
        }
    }
}
