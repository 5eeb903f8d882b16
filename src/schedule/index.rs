use crate::types::{ChapterIndexEntry, ClassificationNode, MasterIndex};

/// Count every node in the forest, at every depth.
pub fn count_items(forest: &[ClassificationNode]) -> usize {
    forest
        .iter()
        .map(|node| 1 + count_items(&node.children))
        .sum()
}

/// File name of a chapter's stored JSON document.
pub fn chapter_file_name(chapter: u32) -> String {
    format!("j_{chapter:02}_tariff_data.json")
}

/// Build the index record for one processed chapter.
pub fn chapter_index_entry(
    forest: &[ClassificationNode],
    chapter: u32,
    section_note: String,
    chapter_note: String,
) -> ChapterIndexEntry {
    ChapterIndexEntry {
        chapter: format!("{chapter:02}"),
        total_items: count_items(forest),
        file_name: chapter_file_name(chapter),
        section_note,
        chapter_note,
    }
}

/// Combine all chapter entries, in processing order, into the master index.
pub fn master_index(chapters: Vec<ChapterIndexEntry>, created_at: &str) -> MasterIndex {
    MasterIndex {
        created_at: created_at.to_string(),
        total_chapters: chapters.len(),
        total_items: chapters.iter().map(|entry| entry.total_items).sum(),
        chapters,
    }
}
