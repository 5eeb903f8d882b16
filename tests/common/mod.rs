#![allow(dead_code)]
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use tariff_ingest::runtime::fetcher::Fetcher;

pub fn fixtures_dir() -> String {
    format!("{}/tests/fixtures", env!("CARGO_MANIFEST_DIR"))
}

pub fn load_fixture(filename: &str) -> String {
    let path = Path::new(&fixtures_dir()).join(filename);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
}

/// Serves canned bodies by URL; everything else fails like a dead network.
pub struct MockFetcher {
    pages: HashMap<String, String>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
        }
    }

    pub fn with_page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String, String> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| format!("No mock page for {url}"))
    }
}
