// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Inkform: ID intake and consent forms for tattoo and piercing studios.
//
// Command-line front end over the studio services. Results are printed as
// JSON on stdout; logs go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use inkform_app::logging;
use inkform_app::services::data_dir::default_data_dir;
use inkform_app::{ScanResult, StudioServices};
use inkform_core::error::Result;
use inkform_core::human_errors::humanize_error;
use inkform_scan::TextRecognizer;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "inkform", version, about = "Studio ID intake and consent forms")]
struct Cli {
    /// Studio data directory (defaults to the per-user data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Document vault passphrase
    #[arg(long, env = "INKFORM_PASSPHRASE", hide_env_values = true, global = true)]
    passphrase: Option<String>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Scan a photo of an ID document
    Scan {
        image: PathBuf,
        /// Create a client from a successful scan
        #[arg(long)]
        save: bool,
    },
    /// Parse ID text recognised elsewhere, one line per line
    ScanText {
        file: PathBuf,
        #[arg(long)]
        save: bool,
    },
    /// List clients, optionally filtered
    Clients { query: Option<String> },
    /// Show recent audit entries
    Audit {
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
    /// Copy a stored photo or consent PDF out of the vault
    Export { hash: String, output: PathBuf },
}

#[derive(Serialize)]
struct ScanOutput<'a> {
    scan: &'a ScanResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    client: Option<inkform_core::ClientRecord>,
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let human = humanize_error(&err);
            tracing::error!(%err, "command failed");
            eprintln!("{}\n{}", human.message, human.suggestion);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let dir = cli.data_dir.unwrap_or_else(default_data_dir);
    let services = StudioServices::open(&dir, cli.passphrase.as_deref(), recognizer())?;

    match cli.cmd {
        Cmd::Scan { image, save } => {
            let bytes = tokio::fs::read(&image).await?;
            let scan = services.scan_id_async(bytes).await?;
            print_scan(&services, &scan, save)
        }
        Cmd::ScanText { file, save } => {
            let text = tokio::fs::read_to_string(&file).await?;
            let lines: Vec<String> = text.lines().map(str::to_owned).collect();
            let scan = services.scan_text(&lines)?;
            print_scan(&services, &scan, save)
        }
        Cmd::Clients { query } => {
            let clients = services.search_clients(query.as_deref().unwrap_or(""))?;
            print_json(&clients)
        }
        Cmd::Audit { limit } => print_json(&services.recent_audit_entries(limit)?),
        Cmd::Export { hash, output } => {
            let data = services.load_document(&hash)?;
            tokio::fs::write(&output, data).await?;
            tracing::info!(path = %output.display(), "document exported");
            Ok(())
        }
    }
}

fn print_scan(services: &StudioServices, scan: &ScanResult, save: bool) -> Result<()> {
    let client = if save && scan.outcome.is_success() {
        Some(services.create_client_from_scan(scan)?)
    } else {
        None
    };
    print_json(&ScanOutput { scan, client })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(feature = "ocr")]
fn recognizer() -> Arc<dyn TextRecognizer> {
    match inkform_scan::OcrsRecognizer::with_defaults() {
        Ok(engine) => Arc::new(engine),
        Err(err) => {
            tracing::warn!(%err, "OCR models unavailable; photo scans will fail");
            Arc::new(inkform_scan::NoRecognizer)
        }
    }
}

#[cfg(not(feature = "ocr"))]
fn recognizer() -> Arc<dyn TextRecognizer> {
    Arc::new(inkform_scan::NoRecognizer)
}
