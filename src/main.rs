use anyhow::Result;
use sihscraper::{
    config::{self, Config},
    digest, fetch, parse, persist,
};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// One pass: fetch, parse, hash, gate. Every failure is terminal for the run
/// and is reported as a log line, not an exit code; an external scheduler is
/// expected to invoke the next pass regardless.
fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    // ─── 2) load config ──────────────────────────────────────────────
    let config = match Config::load_or_default(config::CONFIG_FILE) {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "error loading config");
            return Ok(());
        }
    };

    // ─── 3) fetch the page ───────────────────────────────────────────
    let client = match fetch::build_client(&config) {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "error building http client");
            return Ok(());
        }
    };
    let html = match fetch::fetch_page(&client, &config.url) {
        Ok(html) => {
            info!(url = %config.url, bytes = html.len(), "fetched the webpage");
            html
        }
        Err(e) => {
            error!(url = %config.url, error = %e, "error fetching the webpage");
            return Ok(());
        }
    };

    // ─── 4) parse the table ──────────────────────────────────────────
    let records = match parse::parse_table(&html, &config.columns) {
        Ok(records) => {
            info!(rows = records.len(), "parsed the table");
            records
        }
        Err(e) => {
            error!(error = %e, "error parsing the table");
            return Ok(());
        }
    };

    // ─── 5) hash + persistence gate ──────────────────────────────────
    let digest = match digest::table_digest(&records) {
        Ok(d) => d,
        Err(e) => {
            error!(error = %e, "error computing table digest");
            return Ok(());
        }
    };
    match persist::apply(&config.excel_file, &config.hash_file, &records, &digest) {
        Ok(persist::Outcome::Updated) => info!("data changed; spreadsheet updated"),
        Ok(persist::Outcome::Unchanged) => info!("no changes detected; spreadsheet not updated"),
        Err(e) => error!(error = %e, "error writing output files"),
    }

    Ok(())
}
