use crate::schedule::ScheduleError;
use crate::types::{ClassificationNode, RateTable, RawRow, Units, RATE_COLUMNS};

// Cell layout of a schedule row: stat code, HS code, description, the
// tariff-rate range, then unit I, unit II and the law-code cell.
const STAT_CODE_CELL: usize = 0;
const HS_CODE_CELL: usize = 1;
const DESCRIPTION_CELL: usize = 2;
const RATE_RANGE_START: usize = 3;
const TRAILING_CELLS: usize = 3;
const MIN_CELLS: usize = 4;

/// Turn one extracted row into a classification node with no children.
///
/// Rows whose rate range is entirely empty are grouping headings: they get
/// neither rates nor units. Law codes are always taken from the final cell,
/// split into consecutive 2-character chunks; an odd trailing character is
/// dropped.
pub fn normalize_row(index: usize, row: &RawRow) -> Result<ClassificationNode, ScheduleError> {
    if row.cells.len() < MIN_CELLS {
        return Err(ScheduleError::MalformedRow {
            index,
            cells: row.cells.len(),
        });
    }

    let cell = |i: usize| row.cells.get(i).map(|c| c.trim()).unwrap_or("");
    let rate_range_end = row.cells.len() - TRAILING_CELLS;

    let has_rate_data = (RATE_RANGE_START..rate_range_end).any(|i| !cell(i).is_empty());

    let mut rates = RateTable::new();
    let mut units = Units::default();
    if has_rate_data {
        for (offset, column) in RATE_COLUMNS.iter().enumerate() {
            let i = RATE_RANGE_START + offset;
            if i >= rate_range_end {
                break;
            }
            rates.insert(column, cell(i).to_string());
        }
        units.i = Some(cell(row.cells.len() - 3).to_string());
        units.ii = Some(cell(row.cells.len() - 2).to_string());
    }

    Ok(ClassificationNode {
        depth: row.depth,
        stat_code: cell(STAT_CODE_CELL).to_string(),
        hs_code: cell(HS_CODE_CELL).to_string(),
        description: cell(DESCRIPTION_CELL).to_string(),
        rates,
        units,
        laws: split_law_codes(cell(row.cells.len() - 1)),
        children: Vec::new(),
    })
}

/// Normalize a whole chapter's rows, failing fast on the first malformed row.
pub fn normalize_rows(rows: &[RawRow]) -> Result<Vec<ClassificationNode>, ScheduleError> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| normalize_row(index, row))
        .collect()
}

/// Split the law-code cell into consecutive 2-character codes.
pub fn split_law_codes(cell: &str) -> Vec<String> {
    let chars: Vec<char> = cell.chars().collect();
    chars
        .chunks_exact(2)
        .map(|pair| pair.iter().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(depth: u32, cells: &[&str]) -> RawRow {
        RawRow {
            depth,
            cells: cells.iter().map(|c| c.to_string()).collect(),
        }
    }

    // A full-width row: 3 leading cells, 27 rate cells, unit I/II, laws.
    fn full_row(depth: u32, rates: &[(usize, &str)]) -> RawRow {
        let mut cells = vec!["000000".to_string(), "0101.21".to_string(), "馬".to_string()];
        cells.extend(std::iter::repeat(String::new()).take(27));
        for (column, value) in rates {
            cells[3 + column] = value.to_string();
        }
        cells.push("KG".to_string());
        cells.push("NO".to_string());
        cells.push("0102".to_string());
        RawRow { depth, cells }
    }

    #[test]
    fn copies_leading_cells_verbatim_trimmed() {
        let node = normalize_row(0, &row(1, &["  0101 ", " 0101.21", " −−純粋種の繁殖用のもの ", ""]))
            .unwrap();
        assert_eq!(node.depth, 1);
        assert_eq!(node.stat_code, "0101");
        assert_eq!(node.hs_code, "0101.21");
        assert_eq!(node.description, "−−純粋種の繁殖用のもの");
        assert!(node.children.is_empty());
    }

    #[test]
    fn rejects_rows_with_fewer_than_four_cells() {
        let err = normalize_row(7, &row(0, &["01", "0101", "馬"])).unwrap_err();
        assert_eq!(err, ScheduleError::MalformedRow { index: 7, cells: 3 });
    }

    #[test]
    fn grouping_row_gets_no_rates_or_units() {
        let node = normalize_row(0, &full_row(0, &[])).unwrap();
        assert!(node.rates.is_empty());
        assert!(node.units.is_empty());
        // The law cell is still processed.
        assert_eq!(node.laws, vec!["01", "02"]);
    }

    #[test]
    fn rate_cells_map_to_named_columns_by_position() {
        let node = normalize_row(0, &full_row(0, &[(0, "3.4%"), (2, "2.8%"), (20, "0%")])).unwrap();
        assert_eq!(node.rates.len(), 27);
        assert_eq!(node.rates.get("基本"), Some("3.4%"));
        assert_eq!(node.rates.get("暫定"), Some(""));
        assert_eq!(node.rates.get("WTO協定"), Some("2.8%"));
        assert_eq!(node.rates.get("EPA_CPTPP"), Some("0%"));
        assert_eq!(node.units.i.as_deref(), Some("KG"));
        assert_eq!(node.units.ii.as_deref(), Some("NO"));
    }

    #[test]
    fn short_rate_range_only_fills_leading_columns() {
        // 3 leading cells + 2 rate cells + unit I/II + law cell.
        let node =
            normalize_row(0, &row(0, &["", "0101.2", "馬", "3.4%", "", "KG", "NO", "01"])).unwrap();
        assert_eq!(node.rates.len(), 2);
        assert_eq!(node.rates.get("基本"), Some("3.4%"));
        assert_eq!(node.rates.get("暫定"), Some(""));
        assert_eq!(node.rates.get("WTO協定"), None);
    }

    #[test]
    fn law_codes_chunk_in_pairs_and_drop_odd_tail() {
        assert_eq!(split_law_codes("0102"), vec!["01", "02"]);
        // Current behavior: the dangling character is dropped, not kept.
        assert_eq!(split_law_codes("010"), vec!["01"]);
        assert_eq!(split_law_codes("0"), Vec::<String>::new());
        assert_eq!(split_law_codes(""), Vec::<String>::new());
    }

    #[test]
    fn normalize_rows_fails_fast_on_malformed_row() {
        let rows = vec![full_row(0, &[]), row(1, &["01", "0101"])];
        let err = normalize_rows(&rows).unwrap_err();
        assert_eq!(err, ScheduleError::MalformedRow { index: 1, cells: 2 });
    }
}
