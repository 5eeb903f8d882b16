use crate::runtime::store::FsScheduleStore;
use crate::types::{ClassificationNode, RateTable, Units};
use serde::Serialize;

/// Caps applied by the HTTP layer, matching the limits the original search
/// tools reported to their callers.
pub const KEYWORD_RESULT_LIMIT: usize = 30;
pub const NOTE_RESULT_LIMIT: usize = 10;

// Regimes surfaced by the rate-comparison view, in response order.
const COMPARISON_PRIMARY: [&str; 3] = ["基本", "暫定", "WTO協定"];
const COMPARISON_MAJOR_EPAS: [&str; 6] = [
    "EPA_CPTPP",
    "EPA_RCEP_アセアン豪州NZ",
    "EPA_RCEP_中国",
    "EPA_RCEP_韓国",
    "EPA_欧州連合",
    "EPA_英国",
];
const COMPARISON_PREFERENTIAL: [&str; 2] = ["特恵", "特別特恵"];

#[derive(Debug, Clone, Serialize)]
pub struct ItemHit {
    pub stat_code: String,
    pub hs_code: String,
    pub desc: String,
    pub rate: RateTable,
    pub unit: Units,
    pub law: Vec<String>,
    pub level: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct HsCodeHit {
    pub chapter: String,
    #[serde(flatten)]
    pub item: ItemHit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteKind {
    SectionNote,
    ChapterNote,
}

#[derive(Debug, Clone, Serialize)]
pub struct NoteHit {
    #[serde(rename = "type")]
    pub kind: NoteKind,
    pub chapter: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RateComparison {
    pub stat_code: String,
    pub hs_code: String,
    pub desc: String,
    pub tax_rates: RateTable,
    pub unit: Units,
    pub level: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct LawDetail {
    pub code: String,
    pub details: serde_json::Value,
}

/// Search over the stored schedule documents.
///
/// Every query walks the chapters listed in the master index; a chapter file
/// that is missing or unreadable is skipped, as the index may be newer than
/// the data on disk.
pub struct SearchService {
    store: FsScheduleStore,
}

impl SearchService {
    pub fn new(store: FsScheduleStore) -> Self {
        Self { store }
    }

    /// Case-insensitive keyword search over item descriptions. Multiple
    /// comma-separated keywords widen the search.
    pub fn search_items(&self, keywords: &str) -> Result<Vec<ItemHit>, String> {
        let terms = split_terms(keywords);
        let mut hits = Vec::new();
        for (_, forest) in self.chapters()? {
            collect_keyword_hits(&forest, &terms, &mut hits);
        }
        Ok(hits)
    }

    /// Substring search over HS codes, comma-separated.
    pub fn search_by_hs_code(&self, codes: &str) -> Result<Vec<HsCodeHit>, String> {
        let terms: Vec<String> = codes
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        let mut hits = Vec::new();
        for (chapter, forest) in self.chapters()? {
            collect_hs_code_hits(&forest, &terms, &chapter, &mut hits);
        }
        Ok(hits)
    }

    /// Keyword search over the section and chapter notes of the master index.
    pub fn search_notes(&self, keyword: &str) -> Result<Vec<NoteHit>, String> {
        let needle = keyword.to_lowercase();
        let index = self.store.load_master_index()?;
        let mut hits = Vec::new();
        for entry in &index.chapters {
            if !entry.section_note.is_empty()
                && entry.section_note.to_lowercase().contains(&needle)
            {
                hits.push(NoteHit {
                    kind: NoteKind::SectionNote,
                    chapter: entry.chapter.clone(),
                    content: entry.section_note.clone(),
                });
            }
            if !entry.chapter_note.is_empty()
                && entry.chapter_note.to_lowercase().contains(&needle)
            {
                hits.push(NoteHit {
                    kind: NoteKind::ChapterNote,
                    chapter: entry.chapter.clone(),
                    content: entry.chapter_note.clone(),
                });
            }
        }
        Ok(hits)
    }

    /// Keyword search restricted to items carrying rate data, reduced to the
    /// base and major-EPA regimes for side-by-side comparison.
    pub fn compare_tax_rates(&self, keywords: &str) -> Result<Vec<RateComparison>, String> {
        let terms = split_terms(keywords);
        let mut hits = Vec::new();
        for (_, forest) in self.chapters()? {
            collect_rate_comparisons(&forest, &terms, &mut hits);
        }
        Ok(hits)
    }

    /// Look up comma-separated 2-character law codes in the law table.
    pub fn law_details(&self, codes: &str) -> Result<Vec<LawDetail>, String> {
        let table = self.store.load_law_table()?;
        Ok(codes
            .split(',')
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .filter_map(|code| {
                table.get(code).map(|details| LawDetail {
                    code: code.to_string(),
                    details: details.clone(),
                })
            })
            .collect())
    }

    fn chapters(&self) -> Result<Vec<(String, Vec<ClassificationNode>)>, String> {
        let index = self.store.load_master_index()?;
        let mut chapters = Vec::new();
        for entry in &index.chapters {
            let Ok(number) = entry.chapter.parse::<u32>() else {
                continue;
            };
            match self.store.load_chapter(number) {
                Ok(forest) => chapters.push((entry.chapter.clone(), forest)),
                Err(err) => tracing::debug!("Skipping chapter {}: {err}", entry.chapter),
            }
        }
        Ok(chapters)
    }
}

/// Split a comma-separated keyword list into lowercase search terms.
pub fn split_terms(input: &str) -> Vec<String> {
    input
        .split([',', '、'])
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn matches(text: &str, terms: &[String]) -> bool {
    if terms.is_empty() {
        return false;
    }
    let haystack = text.to_lowercase();
    terms.iter().any(|term| haystack.contains(term))
}

pub fn collect_keyword_hits(
    forest: &[ClassificationNode],
    terms: &[String],
    hits: &mut Vec<ItemHit>,
) {
    for node in forest {
        if matches(&node.description, terms) {
            hits.push(item_hit(node));
        }
        collect_keyword_hits(&node.children, terms, hits);
    }
}

pub fn collect_hs_code_hits(
    forest: &[ClassificationNode],
    codes: &[String],
    chapter: &str,
    hits: &mut Vec<HsCodeHit>,
) {
    for node in forest {
        if !node.hs_code.is_empty() && codes.iter().any(|code| node.hs_code.contains(code)) {
            hits.push(HsCodeHit {
                chapter: chapter.to_string(),
                item: item_hit(node),
            });
        }
        collect_hs_code_hits(&node.children, codes, chapter, hits);
    }
}

pub fn collect_rate_comparisons(
    forest: &[ClassificationNode],
    terms: &[String],
    hits: &mut Vec<RateComparison>,
) {
    for node in forest {
        if matches(&node.description, terms) && !node.rates.is_empty() {
            hits.push(RateComparison {
                stat_code: node.stat_code.clone(),
                hs_code: node.hs_code.clone(),
                desc: node.description.clone(),
                tax_rates: comparison_rates(&node.rates),
                unit: node.units.clone(),
                level: node.depth,
            });
        }
        collect_rate_comparisons(&node.children, terms, hits);
    }
}

fn comparison_rates(rates: &RateTable) -> RateTable {
    let mut out = RateTable::new();
    let columns = COMPARISON_PRIMARY
        .iter()
        .chain(COMPARISON_MAJOR_EPAS.iter())
        .chain(COMPARISON_PREFERENTIAL.iter());
    for column in columns {
        if let Some(value) = rates.get(column) {
            if !value.is_empty() {
                out.insert(column, value.to_string());
            }
        }
    }
    out
}

fn item_hit(node: &ClassificationNode) -> ItemHit {
    ItemHit {
        stat_code: node.stat_code.clone(),
        hs_code: node.hs_code.clone(),
        desc: node.description.clone(),
        rate: node.rates.clone(),
        unit: node.units.clone(),
        law: node.laws.clone(),
        level: node.depth,
    }
}
