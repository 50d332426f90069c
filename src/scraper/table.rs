use crate::config::RowPolicy;
use crate::error::{FetchError, Result, RowParseError};
use crate::record::{midnight_in_tokyo, Record};
pub use crate::{log_debug, log_info, log_warn};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

pub const ROW_PATH: &str = "table > tbody > tr";
pub const COLUMNS: usize = 6;

/// Marks an empty cell in the source table.
const NBSP: &str = "\u{a0}";

static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(ROW_PATH).expect("row selector is valid"));
static CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td").expect("cell selector is valid"));
static MONTH_DAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+)月([0-9]+)日").expect("month/day pattern is valid"));

pub struct TableScraper<'a> {
    document: &'a Html,
    year: i32,
}

impl<'a> TableScraper<'a> {
    pub(crate) fn new(document: &'a Html, year: i32) -> Self {
        Self { document, year }
    }

    /// Year given to every record; the page only carries month and day.
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    /// Every data row as a record, in table order. The first row is the header.
    pub fn records(&self, policy: RowPolicy) -> Result<Vec<Record>> {
        let rows: Vec<ElementRef> = self.document.select(&ROW_SELECTOR).collect();
        if rows.is_empty() {
            return Err(FetchError::MissingTable {
                selector: ROW_PATH.to_string(),
            }
            .into());
        }

        log_debug!("[table] Found {} rows including the header", rows.len());

        let mut records = Vec::with_capacity(rows.len() - 1);
        let mut skipped = 0usize;

        for (index, row) in rows.iter().enumerate().skip(1) {
            let cells = row_cells(row);
            match parse_row(index, &cells, self.year) {
                Ok(record) => records.push(record),
                Err(e) => match policy {
                    RowPolicy::Abort => return Err(e.into()),
                    RowPolicy::Skip => {
                        log_warn!(row = index, field = e.field, "[table] Skipping row: {}", e);
                        skipped += 1;
                    }
                },
            }
        }

        log_info!(
            "[table] Extracted {} records ({} skipped)",
            records.len(),
            skipped
        );
        Ok(records)
    }
}

/// Text of each `td` in `row`, with NBSP-only cells emptied.
pub fn row_cells(row: &ElementRef) -> Vec<String> {
    row.select(&CELL_SELECTOR).map(cell_text).collect()
}

fn cell_text(cell: ElementRef) -> String {
    let text = cell.text().collect::<String>();
    // ASCII only: `str::trim` would also eat the NBSP sentinel.
    let text = text.trim_matches(|c: char| c.is_ascii_whitespace());
    if text == NBSP {
        String::new()
    } else {
        text.to_string()
    }
}

/// Builds a record from the six cells of table row `index`.
pub fn parse_row(
    index: usize,
    cells: &[String],
    year: i32,
) -> std::result::Result<Record, RowParseError> {
    if cells.len() < COLUMNS {
        return Err(RowParseError::new(
            index,
            "cells",
            format!("expected {} cells, found {}", COLUMNS, cells.len()),
        ));
    }

    let period = cells[2].trim().parse::<i32>().map_err(|_| {
        RowParseError::new(index, "period", format!("`{}` is not an integer", cells[2]))
    })?;

    let date = parse_month_day(&cells[1])
        .and_then(|(month, day)| midnight_in_tokyo(year, month, day))
        .ok_or_else(|| {
            RowParseError::new(
                index,
                "date",
                format!("`{}` does not contain a valid <month>月<day>日", cells[1]),
            )
        })?;

    Ok(Record {
        class: cells[0].clone(),
        date,
        period,
        subject: cells[3].clone(),
        teacher: cells[4].clone(),
        remark: cells[5].clone(),
    })
}

fn parse_month_day(text: &str) -> Option<(u32, u32)> {
    let caps = MONTH_DAY.captures(text)?;
    let month = caps.get(1)?.as_str().parse().ok()?;
    let day = caps.get(2)?.as_str().parse().ok()?;
    Some((month, day))
}
