use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use nxos_flat::config::{Config, OutputFormat};

fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    // Initialize logging on stderr; stdout carries records only
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string().to_lowercase()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    tracing::info!("Decoding {} ({})", config.family, config.family.command());

    let report = match &config.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            read_and_decode(&config, file)?
        }
        None => read_and_decode(&config, io::stdin().lock())?,
    };

    if report.code.trim() != "200" {
        tracing::warn!(
            "Device reported status {} for '{}': {}",
            report.code,
            report.input,
            report.msg
        );
    }

    if config.strict && !report.warnings.is_empty() {
        anyhow::bail!(
            "{} field(s) could not be normalized; first: {}",
            report.warnings.len(),
            report.warnings[0]
        );
    }

    let values = report.records.to_json_values()?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    match config.format {
        OutputFormat::Json if config.pretty => serde_json::to_writer_pretty(&mut out, &values)?,
        OutputFormat::Json => serde_json::to_writer(&mut out, &values)?,
        OutputFormat::Jsonl => {
            for value in &values {
                serde_json::to_writer(&mut out, value)?;
                out.write_all(b"\n")?;
            }
        }
    }
    if config.format == OutputFormat::Json {
        out.write_all(b"\n")?;
    }
    out.flush()?;

    tracing::info!(
        "Wrote {} record(s), {} warning(s)",
        report.records.len(),
        report.warnings.len()
    );
    Ok(())
}

fn read_and_decode(
    config: &Config,
    mut reader: impl io::Read,
) -> anyhow::Result<nxos_flat::FlatReport> {
    let mut payload = Vec::new();
    reader
        .read_to_end(&mut payload)
        .context("Failed to read payload")?;

    config.family.decode(&payload).map_err(|e| {
        tracing::error!("{}", e.user_message());
        anyhow::Error::new(e)
    })
}
