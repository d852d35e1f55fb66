//! e-KTP Generator - synthetic Indonesian ID records with intentional mismatches
//!
//! Reads job-application rows (or synthesizes them), generates e-KTP data,
//! corrupts a share of records for validation testing, and writes:
//! - the e-KTP CSV
//! - a JSON validation report
//! - optional card payloads for the image compositor
//!
//! Environment:
//!   EKTP_INPUT_CSV, EKTP_OUTPUT_CSV, EKTP_REPORT_JSON, EKTP_CARD_DIR,
//!   EKTP_PHOTO_PATH, EKTP_MISMATCH_PERCENTAGE, EKTP_SEED,
//!   EKTP_FALLBACK_RECORDS, EKTP_CREATED_BY
//!   EKTP_LOG_LEVEL - trace|debug|info|warn|error (default: info)

use ektp_forge::utils::constants::{APP_NAME, APP_VERSION};
use ektp_forge::{run_batch, GeneratorConfig, InputSource};

use chrono::Local;
use eyre::Result;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    let level = std::env::var("EKTP_LOG_LEVEL")
        .ok()
        .and_then(|l| l.parse::<Level>().ok())
        .unwrap_or(Level::INFO);

    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    print_banner();

    let config = GeneratorConfig::from_env()?;
    config.log_summary();

    let outcome = match run_batch(&config) {
        Ok(outcome) => outcome,
        Err(e) => {
            if e.code.is_contract_violation() {
                error!("💥 Internal contract violated: {}", e);
            } else {
                error!("❌ Error: {}", e);
            }
            return Err(e.into());
        }
    };

    println!("{}", outcome.report.summary());

    println!("🎯 e-KTP Generation Complete!");
    println!("📁 Files created:");
    if let Some(path) = &outcome.csv_path {
        println!("   📄 {} - e-KTP data with mismatches", path.display());
    }
    println!(
        "   📋 {} - Detailed mismatch analysis",
        outcome.report_path.display()
    );
    if !outcome.card_paths.is_empty() {
        println!("   🪪 {} card payload(s)", outcome.card_paths.len());
    }
    if outcome.source == InputSource::Fallback {
        println!("   ℹ️  Base records were synthesized (no input CSV)");
    }
    info!("🔁 Replay this batch with EKTP_SEED={}", outcome.seed);

    println!();
    println!("💡 Use this data to test your validation system!");
    println!("   ✅ Valid records should pass validation");
    println!("   ⚠️  Mismatch records should be flagged by your system");

    Ok(())
}

fn print_banner() {
    println!("🇮🇩 {} v{} - Indonesian e-KTP Generator with Validation Testing", APP_NAME, APP_VERSION);
    println!("{}", "=".repeat(60));
    println!("📅 Generated on: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    println!();
}
