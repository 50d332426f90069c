mod table;

pub use table::TableScraper;

pub use crate::log_warn;
use crate::record::tokyo;
use chrono::{Datelike, Utc};
use encoding_rs::Encoding;
use scraper::Html;

pub struct Scraper {
    document: Html,
}

impl Scraper {
    pub fn new(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    /// Decodes a raw page body from `encoding` (Shift_JIS for the notice board) and parses it.
    pub fn decode(body: &[u8], encoding: &'static Encoding) -> Self {
        let (html, used, had_errors) = encoding.decode(body);
        if had_errors {
            log_warn!(
                "[scraper] Page contained bytes invalid in {}; replaced with U+FFFD",
                used.name()
            );
        }
        Self::new(&html)
    }

    /// The notice table, dated in the current JST year.
    pub fn table(&self) -> TableScraper {
        let year = Utc::now().with_timezone(&tokyo()).year();
        TableScraper::new(&self.document, year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RowPolicy;
    use encoding_rs::SHIFT_JIS;

    #[test]
    fn decodes_shift_jis_before_parsing() {
        let html = "<table><tr><td>クラス</td></tr><tr><td>Ｊ１</td><td>5月7日</td><td>3</td><td>情報理論</td><td>山田</td><td>休講</td></tr></table>";
        let (bytes, _, unmappable) = SHIFT_JIS.encode(html);
        assert!(!unmappable);
        assert_ne!(&bytes[..], html.as_bytes());

        let records = Scraper::decode(&bytes, SHIFT_JIS)
            .table()
            .with_year(2024)
            .records(RowPolicy::Abort)
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].class, "Ｊ１");
        assert_eq!(records[0].subject, "情報理論");
        assert_eq!(records[0].teacher, "山田");
        assert_eq!(records[0].remark, "休講");
    }

    #[test]
    fn current_year_comes_from_the_clock() {
        let scraper = Scraper::new(
            "<table><tr><td>h</td></tr><tr><td>a</td><td>6月1日</td><td>1</td><td>b</td><td>c</td><td>d</td></tr></table>",
        );
        let records = scraper.table().records(RowPolicy::Abort).unwrap();
        let this_year = Utc::now().with_timezone(&tokyo()).year();
        assert_eq!(records[0].date.year(), this_year);
    }
}
