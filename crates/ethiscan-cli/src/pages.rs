//! Page extraction command handlers.
//!
//! Results go to stdout as pretty JSON; diagnostics go to stderr through
//! `tracing`. The last successful extraction persists in
//! `ETHISCAN_CACHE_DIR` between invocations.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use ethiscan_core::{AppConfig, Platform, ProductRecord};
use ethiscan_extractor::{
    detect_from_url, detect_platform, AdapterRegistry, AnalyzeClient, ExtractionCache,
    ExtractionReport, FileCache, Orchestrator,
};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
struct AnalyzeOutput {
    product: ProductRecord,
    analysis: Value,
}

pub(crate) fn build_client(config: &AppConfig) -> anyhow::Result<AnalyzeClient> {
    Ok(AnalyzeClient::new(
        config.http_timeout_secs,
        &config.user_agent,
        config.max_retries,
        config.retry_backoff_base_secs,
    )?)
}

fn build_orchestrator(config: &AppConfig) -> Orchestrator {
    Orchestrator::new(
        AdapterRegistry::with_defaults(),
        Arc::new(FileCache::new(&config.cache_dir)),
    )
}

/// Reads page HTML from `file` when given, otherwise fetches `url`.
pub(crate) async fn load_page(
    client: &AnalyzeClient,
    url: &str,
    file: Option<&Path>,
) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display())),
        None => {
            tracing::info!(url, "fetching page");
            Ok(client.fetch_page(url).await?)
        }
    }
}

/// Runs one extraction pass and caches the result.
///
/// `settle_ms` defaults to the configured settle delay for fetched pages and
/// to zero for local files.
pub(crate) async fn extract_page(
    config: &AppConfig,
    client: &AnalyzeClient,
    url: &str,
    file: Option<&Path>,
    settle_ms: Option<u64>,
) -> anyhow::Result<ExtractionReport> {
    let html = load_page(client, url, file).await?;
    let settle = settle_ms.unwrap_or(if file.is_some() {
        0
    } else {
        config.settle_delay_ms
    });
    let orchestrator = build_orchestrator(config);
    Ok(orchestrator
        .run_after(Duration::from_millis(settle), url, move || html)
        .await)
}

/// Extract a page and print the `{success, data}` reply.
///
/// # Errors
///
/// Returns an error if the page cannot be loaded or no record could be
/// extracted. The reply is printed either way.
pub(crate) async fn run_extract(
    config: &AppConfig,
    url: &str,
    file: Option<&Path>,
    settle_ms: Option<u64>,
) -> anyhow::Result<()> {
    let client = build_client(config)?;
    let report = extract_page(config, &client, url, file, settle_ms).await?;
    let success = report.success;
    println!("{}", serde_json::to_string_pretty(&report.into_reply())?);
    if !success {
        anyhow::bail!("extraction failed for {url}");
    }
    Ok(())
}

/// Extract a page and forward the record to the analysis endpoint.
///
/// # Errors
///
/// Returns an error if the page cannot be loaded, extraction fails, or the
/// analysis request fails.
pub(crate) async fn run_analyze(
    config: &AppConfig,
    url: &str,
    file: Option<&Path>,
    endpoint: Option<&str>,
) -> anyhow::Result<()> {
    let client = build_client(config)?;
    let report = extract_page(config, &client, url, file, Some(0)).await?;
    if !report.success {
        anyhow::bail!("extraction failed for {url}; nothing to analyze");
    }

    let endpoint = endpoint.unwrap_or(&config.analyze_endpoint);
    let analysis = client.analyze(endpoint, &report.record).await?;
    let output = AnalyzeOutput {
        product: report.record,
        analysis,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Print the cached last extraction, if any.
///
/// # Errors
///
/// Returns an error only if the cached entry cannot be re-serialized.
pub(crate) fn run_last(config: &AppConfig) -> anyhow::Result<()> {
    match FileCache::new(&config.cache_dir).last() {
        Some(entry) => println!("{}", serde_json::to_string_pretty(&entry)?),
        None => println!(
            "no extraction cached in {}; run `extract` first",
            config.cache_dir.display()
        ),
    }
    Ok(())
}

/// Full URLs are classified by host; anything else is taken as a hostname.
pub(crate) fn detect_target(target: &str) -> Platform {
    if target.contains("://") {
        detect_from_url(target)
    } else {
        detect_platform(target)
    }
}
