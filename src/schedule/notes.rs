use crate::runtime::fetcher::Fetcher;
use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

const SECTION_NOTE_BASE: &str =
    "https://www.kanzei.or.jp/statistical/popcontent/note/tariff/hs1dig/j/";
const CHAPTER_NOTE_BASE: &str =
    "https://www.kanzei.or.jp/statistical/popcontent/note/tariff/hs2dig/j/";

// Chapter ranges of the 21 sections of the schedule.
const SECTION_RANGES: [(u32, u32, u32); 21] = [
    (1, 5, 1),
    (6, 14, 2),
    (15, 15, 3),
    (16, 24, 4),
    (25, 27, 5),
    (28, 38, 6),
    (39, 40, 7),
    (41, 43, 8),
    (44, 46, 9),
    (47, 49, 10),
    (50, 63, 11),
    (64, 67, 12),
    (68, 70, 13),
    (71, 71, 14),
    (72, 83, 15),
    (84, 85, 16),
    (86, 89, 17),
    (90, 92, 18),
    (93, 93, 19),
    (94, 96, 20),
    (97, 97, 21),
];

/// Section a chapter belongs to, or `None` for numbers outside the schedule.
pub fn section_for_chapter(chapter: u32) -> Option<u32> {
    SECTION_RANGES
        .iter()
        .find(|(start, end, _)| (*start..=*end).contains(&chapter))
        .map(|(_, _, section)| *section)
}

pub fn section_note_url(section: u32) -> String {
    format!("{SECTION_NOTE_BASE}{section:02}")
}

pub fn chapter_note_url(chapter: u32) -> String {
    format!("{CHAPTER_NOTE_BASE}{chapter:02}")
}

/// Fetch the note of the section a chapter belongs to. Notes are optional
/// context: any failure degrades to an empty string.
pub async fn fetch_section_note(fetcher: &dyn Fetcher, chapter: u32) -> String {
    let Some(section) = section_for_chapter(chapter) else {
        return String::new();
    };
    fetch_note(fetcher, &section_note_url(section)).await
}

/// Fetch a chapter's own note; failures degrade to an empty string.
pub async fn fetch_chapter_note(fetcher: &dyn Fetcher, chapter: u32) -> String {
    fetch_note(fetcher, &chapter_note_url(chapter)).await
}

async fn fetch_note(fetcher: &dyn Fetcher, url: &str) -> String {
    match fetcher.fetch(url).await {
        Ok(html) => html_to_text(&html),
        Err(err) => {
            tracing::debug!("Note fetch degraded to empty: {err}");
            String::new()
        }
    }
}

/// Flatten a note page to trimmed plain text.
pub fn html_to_text(html: &str) -> String {
    let mut output = String::with_capacity(html.len());
    let mut inside_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => inside_tag = true,
            '>' => {
                inside_tag = false;
                output.push(' ');
            }
            _ => {
                if !inside_tag {
                    output.push(ch);
                }
            }
        }
    }
    let output = output.replace("&nbsp;", " ").replace('\u{00A0}', " ");
    WHITESPACE_RE.replace_all(output.trim(), " ").into_owned()
}
