use linkpulse::config::Config;
use linkpulse::logging;
use linkpulse::report::{self, RunSummary};
use linkpulse::resolver::{ResolveLinks, Resolver};
use linkpulse::source;

#[tokio::main]
async fn main() {
    logging::init_logger();

    match run().await {
        Ok(output_path) => {
            println!("Check complete, report saved to '{output_path}'.");
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Probe every link from the remote JSON list and write the report.
/// Source failures abort before any resolution starts.
async fn run() -> linkpulse::Result<String> {
    let config = Config::from_env();
    logging::log_config_info(&config);

    let records = source::fetch_remote_list(&config).await?;
    let resolver = Resolver::new(&config)?;
    let results = resolver.resolve_all(records).await;

    let summary = RunSummary::from_results(results);
    report::write_report(&summary, &config.output_path)?;

    Ok(config.output_path)
}
