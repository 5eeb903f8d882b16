use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The tariff-rate columns of the schedule table head, in table order.
/// Column `i` of a row's rate range maps to entry `i` of this list.
/// The first five are the base regimes, the rest the EPA regimes.
pub const RATE_COLUMNS: [&str; 27] = [
    "基本",
    "暫定",
    "WTO協定",
    "特恵",
    "特別特恵",
    "EPA_シンガポール",
    "EPA_メキシコ",
    "EPA_マレーシア",
    "EPA_チリ",
    "EPA_タイ",
    "EPA_インドネシア",
    "EPA_ブルネイ",
    "EPA_アセアン",
    "EPA_フィリピン",
    "EPA_スイス",
    "EPA_ベトナム",
    "EPA_インド",
    "EPA_ペルー",
    "EPA_豪州",
    "EPA_モンゴル",
    "EPA_CPTPP",
    "EPA_欧州連合",
    "EPA_英国",
    "EPA_RCEP_アセアン豪州NZ",
    "EPA_RCEP_中国",
    "EPA_RCEP_韓国",
    "EPA_日米貿易協定",
];

/// One extracted table row: the cell texts in document order plus the
/// nesting depth computed from the row's visual indentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub depth: u32,
    pub cells: Vec<String>,
}

/// A rate-column → value map that keeps its insertion order, so serialized
/// documents list rates in the canonical column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateTable(Vec<(String, String)>);

impl RateTable {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn insert(&mut self, key: &str, value: String) {
        match self.0.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value,
            None => self.0.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Serialize for RateTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RateTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RateTableVisitor;

        impl<'de> Visitor<'de> for RateTableVisitor {
            type Value = RateTable;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of rate column names to rate values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut table = RateTable::new();
                while let Some((key, value)) = access.next_entry::<String, String>()? {
                    table.0.push((key, value));
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(RateTableVisitor)
    }
}

/// Unit-of-measure pair from the two cells before the law-code cell.
/// Both fields are set (possibly to "") on rows that carry rate data and
/// absent on pure grouping rows, so the latter serialize as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Units {
    #[serde(rename = "I", default, skip_serializing_if = "Option::is_none")]
    pub i: Option<String>,
    #[serde(rename = "II", default, skip_serializing_if = "Option::is_none")]
    pub ii: Option<String>,
}

impl Units {
    pub fn is_empty(&self) -> bool {
        self.i.is_none() && self.ii.is_none()
    }
}

/// One entry of the classification schedule. Serialized field names are the
/// wire contract of the chapter JSON documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationNode {
    #[serde(rename = "level")]
    pub depth: u32,
    pub stat_code: String,
    pub hs_code: String,
    #[serde(rename = "desc")]
    pub description: String,
    #[serde(rename = "rate")]
    pub rates: RateTable,
    #[serde(rename = "unit")]
    pub units: Units,
    #[serde(rename = "law")]
    pub laws: Vec<String>,
    pub children: Vec<ClassificationNode>,
}

/// Per-chapter index record combining the item count with the note texts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterIndexEntry {
    pub chapter: String,
    pub total_items: usize,
    pub file_name: String,
    pub section_note: String,
    pub chapter_note: String,
}

/// Top-level index over all processed chapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterIndex {
    pub created_at: String,
    pub total_chapters: usize,
    pub total_items: usize,
    pub chapters: Vec<ChapterIndexEntry>,
}
