use crate::company::CompanyRecord;
use chrono::NaiveDateTime;
use log::debug;
use serde::{Deserialize, Serialize};

/// Number of companies kept in the lookup history.
pub const MAX_HISTORY_ENTRIES: usize = 10;

/// One company detail lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHistoryEntry {
    pub reg_number: String,
    #[serde(default)]
    pub name: String,
    pub search_time: NaiveDateTime,
}

impl SearchHistoryEntry {
    pub fn new(reg_number: impl Into<String>, name: impl Into<String>, search_time: NaiveDateTime) -> Self {
        Self {
            reg_number: reg_number.into(),
            name: name.into(),
            search_time,
        }
    }

    /// Entry for a looked-up company; `None` without a registration number.
    pub fn for_company(record: &CompanyRecord, search_time: NaiveDateTime) -> Option<Self> {
        let reg_number = record.registration_number()?;
        Some(Self::new(reg_number, record.name().unwrap_or_default(), search_time))
    }
}

/// Records a lookup in the history.
///
/// A company already present only gets its time refreshed, its stored name
/// is kept. The result is newest first and holds at most
/// [`MAX_HISTORY_ENTRIES`] entries.
pub fn record_visit(
    mut history: Vec<SearchHistoryEntry>,
    entry: SearchHistoryEntry,
) -> Vec<SearchHistoryEntry> {
    let mut seen = false;
    for existing in history
        .iter_mut()
        .filter(|existing| existing.reg_number == entry.reg_number)
    {
        existing.search_time = entry.search_time;
        seen = true;
    }
    if !seen {
        debug!("Adding {} to search history", entry.reg_number);
        history.push(entry);
    }

    history.sort_by(|a, b| b.search_time.cmp(&a.search_time));
    history.truncate(MAX_HISTORY_ENTRIES);
    history
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn entry(reg: &str, time: NaiveDateTime) -> SearchHistoryEntry {
        SearchHistoryEntry::new(reg, format!("Company {}", reg), time)
    }

    #[test]
    fn test_new_visit_goes_first() {
        let history = record_visit(Vec::new(), entry("40003000001", at(9, 0)));
        let history = record_visit(history, entry("40003000002", at(10, 0)));

        let regs: Vec<&str> = history.iter().map(|e| e.reg_number.as_str()).collect();
        assert_eq!(regs, vec!["40003000002", "40003000001"]);
    }

    #[test]
    fn test_repeat_visit_refreshes_time_without_duplicate() {
        let history = vec![entry("40003000002", at(10, 0)), entry("40003000001", at(9, 0))];

        let revisit = SearchHistoryEntry::new("40003000001", "Renamed SIA", at(11, 30));
        let history = record_visit(history, revisit);

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].reg_number, "40003000001");
        assert_eq!(history[0].search_time, at(11, 30));
        assert_eq!(history[0].name, "Company 40003000001");
    }

    #[test]
    fn test_history_is_capped() {
        let mut history = Vec::new();
        for i in 0..12 {
            history = record_visit(history, entry(&format!("400030000{:02}", i), at(8, i)));
        }

        assert_eq!(history.len(), MAX_HISTORY_ENTRIES);
        assert_eq!(history[0].reg_number, "40003000011");
        assert_eq!(history[9].reg_number, "40003000002");
        assert!(history.windows(2).all(|w| w[0].search_time >= w[1].search_time));
    }

    #[test]
    fn test_entry_for_company() {
        let record = CompanyRecord::from_value(json!({
            "registration_number": "40003012345",
            "name": "Baltic Timber SIA"
        }));
        let entry = SearchHistoryEntry::for_company(&record, at(12, 0)).unwrap();
        assert_eq!(entry.reg_number, "40003012345");
        assert_eq!(entry.name, "Baltic Timber SIA");

        assert!(SearchHistoryEntry::for_company(&CompanyRecord::new(), at(12, 0)).is_none());
    }

    #[test]
    fn test_serialized_time_is_iso() {
        let json = serde_json::to_value(entry("40003012345", at(12, 5))).unwrap();
        assert_eq!(json["search_time"], json!("2024-05-01T12:05:00"));
    }
}
