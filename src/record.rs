use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

/// The university's time zone (Asia/Tokyo, JST). Japan observes no DST.
pub const ZONE_NAME: &str = "Asia/Tokyo";
const ZONE_ABBREVIATION: &str = "JST";
const ZONE_OFFSET_SECS: i32 = 9 * 3600;

pub fn tokyo() -> FixedOffset {
    FixedOffset::east_opt(ZONE_OFFSET_SECS).expect("JST offset is within ±24h")
}

/// Midnight JST on the given calendar day, or `None` for an impossible date.
pub fn midnight_in_tokyo(year: i32, month: u32, day: u32) -> Option<DateTime<FixedOffset>> {
    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)?;
    tokyo().from_local_datetime(&naive).single()
}

/// One cancelled or rescheduled class session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub class: String,
    pub date: DateTime<FixedOffset>,
    pub period: i32,
    pub subject: String,
    pub teacher: String,
    pub remark: String,
}

impl Record {
    /// Human-readable date, e.g. `2024-04-10 00:00:00 +0900 JST`.
    pub fn display_date(&self) -> String {
        format!(
            "{} {}",
            self.date.format("%Y-%m-%d %H:%M:%S %z"),
            ZONE_ABBREVIATION
        )
    }

    /// The six fields as table cells, in column order.
    pub fn to_cells(&self) -> [String; 6] {
        [
            self.class.clone(),
            self.display_date(),
            self.period.to_string(),
            self.subject.clone(),
            self.teacher.clone(),
            self.remark.clone(),
        ]
    }
}

/// JSON envelope: `{"lessons": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordCollection {
    pub lessons: Vec<Record>,
}

impl From<Vec<Record>> for RecordCollection {
    fn from(lessons: Vec<Record>) -> Self {
        Self { lessons }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        Record {
            class: "3E".to_string(),
            date: midnight_in_tokyo(2024, 4, 10).unwrap(),
            period: 2,
            subject: "Algorithms".to_string(),
            teacher: "Tanaka".to_string(),
            remark: String::new(),
        }
    }

    #[test]
    fn midnight_is_in_jst() {
        let date = midnight_in_tokyo(2024, 4, 10).unwrap();
        assert_eq!(date.to_rfc3339(), "2024-04-10T00:00:00+09:00");
        assert!(midnight_in_tokyo(2023, 2, 29).is_none());
        assert!(midnight_in_tokyo(2024, 13, 1).is_none());
    }

    #[test]
    fn cells_render_date_and_period_as_text() {
        let cells = sample().to_cells();
        assert_eq!(cells[0], "3E");
        assert_eq!(cells[1], "2024-04-10 00:00:00 +0900 JST");
        assert_eq!(cells[2], "2");
        assert_eq!(cells[5], "");
    }

    #[test]
    fn json_uses_stable_field_order() {
        let json = serde_json::to_string(&RecordCollection::from(vec![sample()])).unwrap();
        assert_eq!(
            json,
            r#"{"lessons":[{"class":"3E","date":"2024-04-10T00:00:00+09:00","period":2,"subject":"Algorithms","teacher":"Tanaka","remark":""}]}"#
        );
    }

    #[test]
    fn json_round_trip_compares_by_instant() {
        let collection = RecordCollection::from(vec![sample()]);
        let json = serde_json::to_string(&collection).unwrap();
        let back: RecordCollection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, collection);

        // Same instant written in UTC still compares equal.
        let utc = json.replace("2024-04-10T00:00:00+09:00", "2024-04-09T15:00:00Z");
        let back: RecordCollection = serde_json::from_str(&utc).unwrap();
        assert_eq!(back.lessons[0].date, collection.lessons[0].date);
    }
}
