use crate::types::RawRow;
use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static PADDING_LEFT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"padding-left\s*:\s*([\d.]+)\s*em").unwrap());

const TABLE_ID: &str = "datatable";
// The schedule table opens with two header rows (column groups + names).
const HEADER_ROWS: usize = 2;
// The description cell carries the indentation cues.
const DESCRIPTION_CELL: usize = 2;
// U+2212, the glyph the schedule prefixes to indented descriptions.
const INDENT_GLYPH: char = '−';

/// Extract the schedule rows from one chapter page.
///
/// Each `<tr>` after the two header rows becomes one `RawRow` holding the
/// trimmed `<td>` texts in order. A row's depth is the integer part of the
/// description cell's `padding-left` em offset plus its count of leading
/// `−` glyphs; the glyphs themselves stay part of the description text.
pub fn extract_rows(html: &str) -> Result<Vec<RawRow>, String> {
    let dom = tl::parse(html, tl::ParserOptions::default())
        .map_err(|e| format!("Failed to parse chapter HTML: {e}"))?;
    let parser = dom.parser();

    let table = dom
        .get_element_by_id(TABLE_ID)
        .and_then(|handle| handle.get(parser))
        .and_then(|node| node.as_tag())
        .ok_or_else(|| format!("Chapter page has no table#{TABLE_ID}"))?;

    let mut rows = Vec::new();
    let mut tr_index = 0;
    for node in table.children().all(parser) {
        let Some(tag) = node.as_tag() else {
            continue;
        };
        if tag.name().as_utf8_str().as_ref() != "tr" {
            continue;
        }
        // The first rows are the column-group and column-name headers.
        tr_index += 1;
        if tr_index <= HEADER_ROWS {
            continue;
        }

        let mut cells = Vec::new();
        let mut description_style = None;
        for cell_node in tag.children().all(parser) {
            let Some(cell) = cell_node.as_tag() else {
                continue;
            };
            if cell.name().as_utf8_str().as_ref() != "td" {
                continue;
            }
            if cells.len() == DESCRIPTION_CELL {
                description_style = cell
                    .attributes()
                    .get("style")
                    .flatten()
                    .map(|style| style.as_utf8_str().into_owned());
            }
            cells.push(clean_cell(&cell.inner_text(parser)));
        }

        // Spacer rows carry no data cells at all.
        if cells.is_empty() {
            continue;
        }

        let depth = extract_depth(
            description_style.as_deref(),
            cells.get(DESCRIPTION_CELL).map(String::as_str).unwrap_or(""),
        );
        rows.push(RawRow { depth, cells });
    }

    Ok(rows)
}

/// Depth of a row: the em offset from the description cell's style plus the
/// count of leading indent glyphs in its text.
pub fn extract_depth(style: Option<&str>, description: &str) -> u32 {
    let offset = style
        .and_then(|style| PADDING_LEFT_RE.captures(style))
        .and_then(|captures| captures[1].parse::<f64>().ok())
        .map(|em| em as u32)
        .unwrap_or(0);

    let glyphs = description
        .chars()
        .take_while(|&c| c == INDENT_GLYPH)
        .count() as u32;

    offset + glyphs
}

fn clean_cell(text: &str) -> String {
    let text = text
        .replace("&nbsp;", " ")
        .replace('\u{00A0}', " ")
        .replace("&amp;", "&");
    WHITESPACE_RE.replace_all(text.trim(), " ").into_owned()
}
