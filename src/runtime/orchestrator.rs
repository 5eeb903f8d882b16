use crate::runtime::fetcher::Fetcher;
use crate::runtime::store::ScheduleStore;
use crate::schedule::extract::extract_rows;
use crate::schedule::forest::{build_forest, inherit_stat_codes};
use crate::schedule::index::{chapter_index_entry, master_index};
use crate::schedule::notes::{fetch_chapter_note, fetch_section_note};
use crate::schedule::row::normalize_rows;
use crate::types::{ChapterIndexEntry, MasterIndex};
use std::time::Duration;

pub const FIRST_CHAPTER: u32 = 1;
pub const LAST_CHAPTER: u32 = 97;
// Chapter 77 is reserved in the harmonized system and has no page.
pub const RESERVED_CHAPTER: u32 = 77;

const DEFAULT_BASE_URL: &str = "https://www.customs.go.jp/tariff/2025_04_01/data/";
const DEFAULT_CHAPTER_DELAY: Duration = Duration::from_millis(500);

pub struct JobConfig {
    pub base_url: String,
    /// Pause between chapter fetches, to stay polite to the source site.
    pub chapter_delay: Duration,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            chapter_delay: DEFAULT_CHAPTER_DELAY,
        }
    }
}

impl JobConfig {
    pub fn chapter_url(&self, chapter: u32) -> String {
        format!("{}j_{chapter:02}.htm", self.base_url)
    }
}

/// Process every chapter of the schedule, store the chapter documents, and
/// finish with the master index.
///
/// A chapter that fails — fetch, extraction, or a structural error in its
/// rows — is logged and left out of the index; the job moves on. Only a
/// failure to store the master index itself fails the job.
pub async fn run_job(
    fetcher: &dyn Fetcher,
    store: &dyn ScheduleStore,
    config: &JobConfig,
) -> Result<MasterIndex, String> {
    let mut entries = Vec::new();

    for chapter in FIRST_CHAPTER..=LAST_CHAPTER {
        if chapter == RESERVED_CHAPTER {
            continue;
        }

        match ingest_chapter(fetcher, store, config, chapter).await {
            Ok(entry) => {
                tracing::info!(
                    "Chapter {chapter:02}: stored {} items to {}",
                    entry.total_items,
                    entry.file_name
                );
                entries.push(entry);
            }
            Err(err) => {
                tracing::error!("Chapter {chapter:02} failed, skipping: {err}");
            }
        }

        tokio::time::sleep(config.chapter_delay).await;
    }

    let created_at = chrono::Utc::now().format("%Y-%m-%d").to_string();
    let index = master_index(entries, &created_at);
    store.store_master_index(&index)?;
    tracing::info!(
        "Master index stored: {} chapters, {} items",
        index.total_chapters,
        index.total_items
    );
    Ok(index)
}

/// Run one chapter through the whole pipeline: fetch, extract, normalize,
/// build the forest, inherit codes, store, and index with its notes.
pub async fn ingest_chapter(
    fetcher: &dyn Fetcher,
    store: &dyn ScheduleStore,
    config: &JobConfig,
    chapter: u32,
) -> Result<ChapterIndexEntry, String> {
    let html = fetcher.fetch(&config.chapter_url(chapter)).await?;
    let rows = extract_rows(&html)?;
    let nodes = normalize_rows(&rows).map_err(|e| e.to_string())?;
    let mut forest = build_forest(nodes).map_err(|e| e.to_string())?;
    inherit_stat_codes(&mut forest);

    store.store_chapter(chapter, &forest)?;

    let section_note = fetch_section_note(fetcher, chapter).await;
    let chapter_note = fetch_chapter_note(fetcher, chapter).await;

    Ok(chapter_index_entry(&forest, chapter, section_note, chapter_note))
}
