//! Display helpers.
//!
//! This is the only place where absent values fall back to zero-looking
//! text. Calculations upstream keep `None` and `N/A` distinct.

use crate::numeric::to_number;
use crate::ratios::{Ratio, NOT_APPLICABLE};
use crate::schema::{StatementKind, StatementRow};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

pub const DEFAULT_CURRENCY_SYMBOL: &str = "€";
const NOT_AVAILABLE: &str = "Not available";
const EMPTY_CELL: &str = "-";

pub fn format_currency(value: Option<f64>) -> String {
    format_currency_with(value, DEFAULT_CURRENCY_SYMBOL)
}

/// Whole units with space-grouped thousands, e.g. `€1 234 567`.
pub fn format_currency_with(value: Option<f64>, symbol: &str) -> String {
    let amount = value.map(|v| v.round() as i64).unwrap_or(0);
    let sign = if amount < 0 { "-" } else { "" };
    format!("{}{}{}", sign, symbol, group_thousands(amount.unsigned_abs()))
}

pub fn format_currency_value(value: &Value) -> String {
    format_currency(to_number(value))
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

pub fn format_percentage(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}%", v),
        None => "0%".to_string(),
    }
}

/// Percentage ratio for display; `N/A` survives, absence shows as `0%`.
pub fn format_ratio_percent(ratio: Option<Ratio>) -> String {
    match ratio {
        Some(Ratio::NotApplicable) => NOT_APPLICABLE.to_string(),
        Some(Ratio::Value(v)) => format_percentage(Some(v)),
        None => format_percentage(None),
    }
}

/// Plain ratio with fixed decimals; `N/A` survives, absence shows as `-`.
pub fn format_ratio(ratio: Option<Ratio>, decimals: usize) -> String {
    match ratio {
        Some(r) => r.display(decimals),
        None => EMPTY_CELL.to_string(),
    }
}

/// `2021-03-05` (optionally followed by a time) becomes `5 March 2021`.
pub fn format_date(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return NOT_AVAILABLE.to_string();
    };

    raw.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        .map(|date| date.format("%-d %B %Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

pub fn format_status(status: Option<&str>) -> String {
    let Some(status) = status.filter(|s| !s.trim().is_empty()) else {
        return "Unknown".to_string();
    };

    match status.to_lowercase().as_str() {
        "active" => "Active",
        "liquidated" => "Liquidated",
        "suspended" => "Suspended",
        "bankrupt" => "Bankrupt",
        "closed" => "Closed",
        _ => status,
    }
    .to_string()
}

/// Splits the first run of eleven digits as `NNNNNN-NNNNN`.
pub fn format_reg_number(reg_number: Option<&str>) -> String {
    let Some(reg) = reg_number.filter(|s| !s.is_empty()) else {
        return NOT_AVAILABLE.to_string();
    };

    let bytes = reg.as_bytes();
    let mut run_start = None;
    for (i, b) in bytes.iter().enumerate() {
        if b.is_ascii_digit() {
            let start = *run_start.get_or_insert(i);
            if i + 1 - start == 11 {
                let split = start + 6;
                return format!("{}-{}", &reg[..split], &reg[split..]);
            }
        } else {
            run_start = None;
        }
    }
    reg.to_string()
}

/// Rows of the detailed statement table, most recent year first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailTable {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

impl DetailTable {
    pub fn build(kind: StatementKind, rows: &[StatementRow]) -> Self {
        let items = kind.display_items();

        let mut headers = Vec::with_capacity(items.len() + 1);
        headers.push("Year");
        headers.extend(items.iter().map(|item| item.label));

        let mut sorted: Vec<&StatementRow> = rows.iter().collect();
        sorted.sort_by_key(|row| std::cmp::Reverse(row.year.unwrap_or(0)));

        let rows = sorted
            .into_iter()
            .map(|row| {
                let year = row
                    .year
                    .map(|y| y.to_string())
                    .unwrap_or_else(|| EMPTY_CELL.to_string());
                std::iter::once(year)
                    .chain(items.iter().map(|item| format_currency(row.number(item))))
                    .collect()
            })
            .collect();

        Self { headers, rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_currency() {
        assert_eq!(format_currency(Some(1_234_567.4)), "€1 234 567");
        assert_eq!(format_currency(Some(999.5)), "€1 000");
        assert_eq!(format_currency(Some(-2500.0)), "-€2 500");
        assert_eq!(format_currency(Some(0.0)), "€0");
        assert_eq!(format_currency(None), "€0");
        assert_eq!(format_currency_value(&json!("abc")), "€0");
        assert_eq!(format_currency_value(&json!("null")), "€0");
        assert_eq!(format_currency_value(&json!("150000")), "€150 000");
        assert_eq!(format_currency_with(Some(12.0), "EUR "), "EUR 12");
    }

    #[test]
    fn test_percentages_and_ratios() {
        assert_eq!(format_percentage(Some(12.345)), "12.3%");
        assert_eq!(format_percentage(None), "0%");
        assert_eq!(format_ratio_percent(Some(Ratio::NotApplicable)), "N/A");
        assert_eq!(format_ratio_percent(Some(Ratio::Value(5.0))), "5.0%");
        assert_eq!(format_ratio_percent(None), "0%");
        assert_eq!(format_ratio(Some(Ratio::Value(1.5)), 2), "1.50");
        assert_eq!(format_ratio(Some(Ratio::NotApplicable), 2), "N/A");
        assert_eq!(format_ratio(None, 2), "-");
    }

    #[test]
    fn test_dates() {
        assert_eq!(format_date(Some("2021-03-05")), "5 March 2021");
        assert_eq!(format_date(Some("1999-12-31T00:00:00")), "31 December 1999");
        assert_eq!(format_date(Some("")), "Not available");
        assert_eq!(format_date(None), "Not available");
        assert_eq!(format_date(Some("sometime")), "sometime");
    }

    #[test]
    fn test_status() {
        assert_eq!(format_status(Some("LIQUIDATED")), "Liquidated");
        assert_eq!(format_status(Some("reorganising")), "reorganising");
        assert_eq!(format_status(None), "Unknown");
    }

    #[test]
    fn test_reg_number() {
        assert_eq!(format_reg_number(Some("40003012345")), "400030-12345");
        assert_eq!(format_reg_number(Some("LV40003012345")), "LV400030-12345");
        assert_eq!(format_reg_number(Some("12345")), "12345");
        assert_eq!(format_reg_number(None), "Not available");
    }

    #[test]
    fn test_detail_table_sorted_descending() {
        let rows = vec![
            StatementRow::new(2021).with("net_turnover", 1000),
            StatementRow::default().with("net_turnover", 5),
            StatementRow::new(2023).with("net_turnover", "3000").with("net_income", "null"),
        ];
        let table = DetailTable::build(StatementKind::Income, &rows);

        assert_eq!(table.headers[0], "Year");
        assert_eq!(table.headers[1], "Net Turnover");
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0][0], "2023");
        assert_eq!(table.rows[0][1], "€3 000");
        assert_eq!(table.rows[0][5], "€0");
        assert_eq!(table.rows[1][0], "2021");
        assert_eq!(table.rows[2][0], "-");
    }
}
