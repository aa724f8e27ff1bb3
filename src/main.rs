use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use sysconf_tracker::adapters::http::build_client;
use sysconf_tracker::adapters::search::build_search_provider;
use sysconf_tracker::core::Pipeline;
use sysconf_tracker::utils::error::{ErrorSeverity, TrackerError};
use sysconf_tracker::utils::{logger, validation::Validate};
use sysconf_tracker::{CfpPipeline, CliConfig, HttpFetcher, LocalStorage, TrackerEngine};

fn exit_with(e: &TrackerError) -> ! {
    tracing::error!(
        "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    let config = match cli.tracker_config() {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };
    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let client = build_client(&config.http.user_agent, config.request_timeout())
        .context("failed to build HTTP client")?;
    let search = build_search_provider(
        &config.search.engine,
        config.search.endpoint.as_deref(),
        config.search.max_results,
        client.clone(),
    )?;
    tracing::info!(
        "Search engine: {}, max {} candidates per edition",
        search.name(),
        config.tracker.max_candidates
    );

    let pipeline = CfpPipeline::new(
        LocalStorage::new("."),
        config,
        Box::new(HttpFetcher::new(client)),
        search,
        Utc::now(),
    );

    if cli.dry_run {
        let conferences = match pipeline.extract().await {
            Ok(conferences) => conferences,
            Err(e) => exit_with(&e),
        };
        println!("🔍 Dry run: candidate URLs per edition");
        for (name, year, urls) in pipeline.plan(&conferences).await {
            println!("{} {}", name, year);
            for url in urls {
                println!("  {}", url);
            }
        }
        return Ok(());
    }

    let engine = TrackerEngine::new(pipeline);
    match engine.run().await {
        Ok(paths) => {
            println!("✅ CFP lookup completed");
            for path in paths {
                println!("📁 {}", path);
            }
        }
        Err(e) => exit_with(&e),
    }

    Ok(())
}
