use crate::numeric::coerce;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    #[schemars(description = "Balance sheet (Bilance): point-in-time assets, liabilities and equity")]
    Balance,

    #[schemars(description = "Income statement (Peļņas vai zaudējumu aprēķins): activity over the financial year")]
    Income,

    #[schemars(description = "Cash flow statement (Naudas plūsmas pārskats)")]
    CashFlow,
}

impl StatementKind {
    pub const ALL: [StatementKind; 3] = [Self::Balance, Self::Income, Self::CashFlow];

    /// Line items shown in the detailed per-year table, in column order.
    pub fn display_items(self) -> &'static [LineItem] {
        match self {
            Self::Balance => BALANCE_ITEMS,
            Self::Income => INCOME_ITEMS,
            Self::CashFlow => CASH_FLOW_ITEMS,
        }
    }

    /// Name of the collection holding this kind in the statements payload.
    pub fn collection_key(self) -> &'static str {
        match self {
            Self::Balance => "balance_sheets",
            Self::Income => "income_statements",
            Self::CashFlow => "cash_flow_statements",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Balance => "balance sheet",
            Self::Income => "income statement",
            Self::CashFlow => "cash flow",
        };
        f.write_str(name)
    }
}

/// A named line item of a financial statement.
///
/// `aliases` lists alternative keys seen in older payloads; the first key
/// present on a row wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineItem {
    pub key: &'static str,
    pub aliases: &'static [&'static str],
    pub label: &'static str,
}

impl LineItem {
    const fn new(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            aliases: &[],
            label,
        }
    }

    const fn with_aliases(
        key: &'static str,
        aliases: &'static [&'static str],
        label: &'static str,
    ) -> Self {
        Self {
            key,
            aliases,
            label,
        }
    }
}

pub mod items {
    use super::LineItem;

    // Balance sheet
    pub const CASH: LineItem = LineItem::new("cash", "Cash");
    pub const MARKETABLE_SECURITIES: LineItem =
        LineItem::new("marketable_securities", "Marketable Securities");
    pub const INVENTORIES: LineItem = LineItem::new("inventories", "Inventories");
    pub const ACCOUNTS_RECEIVABLE: LineItem =
        LineItem::new("accounts_receivable", "Accounts Receivable");
    pub const CURRENT_ASSETS: LineItem =
        LineItem::with_aliases("total_current_assets", &["current_assets"], "Current Assets");
    pub const TOTAL_ASSETS: LineItem = LineItem::new("total_assets", "Total Assets");
    pub const CURRENT_LIABILITIES: LineItem =
        LineItem::new("current_liabilities", "Current Liabilities");
    pub const NON_CURRENT_LIABILITIES: LineItem =
        LineItem::new("non_current_liabilities", "Non-Current Liabilities");
    pub const EQUITY: LineItem = LineItem::new("equity", "Total Equity");

    // Income statement
    pub const NET_TURNOVER: LineItem = LineItem::new("net_turnover", "Net Turnover");
    pub const COST_OF_GOODS_SOLD: LineItem =
        LineItem::new("by_function_cost_of_goods_sold", "Cost of Goods Sold");
    pub const GROSS_PROFIT: LineItem =
        LineItem::new("by_function_gross_profit", "Gross Profit");
    pub const INCOME_BEFORE_TAXES: LineItem =
        LineItem::new("income_before_income_taxes", "Profit Before Tax");
    pub const NET_INCOME: LineItem = LineItem::new("net_income", "Net Profit");

    // Cash flow
    pub const OPERATING_CASH_FLOW: LineItem = LineItem::with_aliases(
        "cfo_im_net_operating_cash_flow",
        &["cfo_dm_net_operating_cash_flow"],
        "Operating Cash Flow",
    );
    pub const INVESTING_CASH_FLOW: LineItem =
        LineItem::new("cfi_net_investing_cash_flow", "Investing Cash Flow");
    pub const FINANCING_CASH_FLOW: LineItem =
        LineItem::new("cff_net_financing_cash_flow", "Financing Cash Flow");
    pub const NET_CASH_CHANGE: LineItem = LineItem::new("net_increase", "Net Change in Cash");
}

const BALANCE_ITEMS: &[LineItem] = &[
    items::TOTAL_ASSETS,
    items::CURRENT_ASSETS,
    items::CURRENT_LIABILITIES,
    items::NON_CURRENT_LIABILITIES,
    items::EQUITY,
    items::CASH,
];

const INCOME_ITEMS: &[LineItem] = &[
    items::NET_TURNOVER,
    items::COST_OF_GOODS_SOLD,
    items::GROSS_PROFIT,
    items::INCOME_BEFORE_TAXES,
    items::NET_INCOME,
];

const CASH_FLOW_ITEMS: &[LineItem] = &[
    items::OPERATING_CASH_FLOW,
    items::INVESTING_CASH_FLOW,
    items::FINANCING_CASH_FLOW,
    items::NET_CASH_CHANGE,
];

/// One statement row for one company and one year.
///
/// Only `year` is typed; every other line item stays as received and is
/// read through [`StatementRow::number`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct StatementRow {
    #[serde(default, deserialize_with = "deserialize_year")]
    #[schemars(with = "Option<i32>", description = "Financial year the statement covers")]
    pub year: Option<i32>,

    #[serde(flatten)]
    #[schemars(description = "Named line items, numeric or absent")]
    pub items: Map<String, Value>,
}

impl StatementRow {
    pub fn new(year: i32) -> Self {
        Self {
            year: Some(year),
            items: Map::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.items.insert(key.to_string(), value.into());
        self
    }

    /// Raw value of a line item, honouring aliases.
    pub fn raw(&self, item: &LineItem) -> Option<&Value> {
        std::iter::once(item.key)
            .chain(item.aliases.iter().copied())
            .find_map(|key| self.items.get(key))
    }

    /// Coerced value of a line item; `None` when missing or unparseable.
    pub fn number(&self, item: &LineItem) -> Option<f64> {
        coerce(self.raw(item))
    }
}

fn deserialize_year<'de, D>(deserializer: D) -> std::result::Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(crate::numeric::to_number)
        .filter(|y| y.fract() == 0.0 && *y >= i32::MIN as f64 && *y <= i32::MAX as f64)
        .map(|y| y as i32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_deserializes_loose_year_and_items() {
        let row: StatementRow = serde_json::from_value(json!({
            "year": "2022",
            "total_assets": "100000",
            "equity": null
        }))
        .unwrap();

        assert_eq!(row.year, Some(2022));
        assert_eq!(row.number(&items::TOTAL_ASSETS), Some(100_000.0));
        assert_eq!(row.number(&items::EQUITY), None);
        assert_eq!(row.number(&items::CASH), None);
    }

    #[test]
    fn test_alias_lookup() {
        let row = StatementRow::new(2023).with("current_assets", 5000);
        assert_eq!(row.number(&items::CURRENT_ASSETS), Some(5000.0));

        let row = row.with("total_current_assets", 7000);
        assert_eq!(row.number(&items::CURRENT_ASSETS), Some(7000.0));
    }

    #[test]
    fn test_unusable_year_is_absent() {
        let row: StatementRow = serde_json::from_value(json!({ "year": "n/a" })).unwrap();
        assert_eq!(row.year, None);

        let row: StatementRow = serde_json::from_value(json!({})).unwrap();
        assert_eq!(row.year, None);
    }

    #[test]
    fn test_every_kind_has_display_items() {
        for kind in StatementKind::ALL {
            assert!(!kind.display_items().is_empty(), "{kind} has no columns");
        }
        assert_eq!(StatementKind::CashFlow.collection_key(), "cash_flow_statements");
    }

    #[test]
    fn test_row_schema_generation() {
        let schema = schemars::schema_for!(StatementRow);
        let json = serde_json::to_string(&schema).unwrap();
        assert!(json.contains("year"));
    }
}
