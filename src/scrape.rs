use tariff_ingest::runtime::fetcher::HttpFetcher;
use tariff_ingest::runtime::orchestrator::{run_job, JobConfig};
use tariff_ingest::runtime::store::FsScheduleStore;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let data_dir = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tariffdata".to_string());
    let store = match FsScheduleStore::create(&data_dir) {
        Ok(store) => store,
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    };

    let fetcher = HttpFetcher::new(reqwest::Client::new());
    let config = JobConfig::default();

    match run_job(&fetcher, &store, &config).await {
        Ok(index) => tracing::info!(
            "Scrape complete: {} chapters, {} items under {data_dir}",
            index.total_chapters,
            index.total_items
        ),
        Err(err) => {
            tracing::error!("Scrape failed: {err}");
            std::process::exit(1);
        }
    }
}
