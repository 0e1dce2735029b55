use crate::error::{CompanyInsightError, Result};
use crate::schema::{StatementKind, StatementRow};
use log::warn;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

/// Raw statement collections as they arrive from the analytics endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct StatementCollections {
    #[serde(default)]
    pub registration_number: Option<String>,

    #[serde(default)]
    pub balance_sheets: Vec<StatementRow>,

    #[serde(default)]
    pub income_statements: Vec<StatementRow>,

    #[serde(default)]
    pub cash_flow_statements: Vec<StatementRow>,
}

impl StatementCollections {
    fn rows(&self, kind: StatementKind) -> &[StatementRow] {
        match kind {
            StatementKind::Balance => &self.balance_sheets,
            StatementKind::Income => &self.income_statements,
            StatementKind::CashFlow => &self.cash_flow_statements,
        }
    }

    fn rows_mut(&mut self, kind: StatementKind) -> &mut Vec<StatementRow> {
        match kind {
            StatementKind::Balance => &mut self.balance_sheets,
            StatementKind::Income => &mut self.income_statements,
            StatementKind::CashFlow => &mut self.cash_flow_statements,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct DataAvailability {
    pub balance_sheets: bool,
    pub income_statements: bool,
    pub cash_flows: bool,
}

impl DataAvailability {
    pub fn any(&self) -> bool {
        self.balance_sheets || self.income_statements || self.cash_flows
    }
}

/// All statements of one company, indexed by year.
///
/// Deserializing goes through [`FinancialDataset::build`], so
/// `years_with_data` and `data_availability` always agree with the rows
/// whatever the payload claimed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "StatementCollections")]
pub struct FinancialDataset {
    registration_number: Option<String>,
    balance_sheets: Vec<StatementRow>,
    income_statements: Vec<StatementRow>,
    cash_flow_statements: Vec<StatementRow>,
    years_with_data: Vec<i32>,
    data_availability: DataAvailability,
    last_financial_year: Option<i32>,
}

impl From<StatementCollections> for FinancialDataset {
    fn from(collections: StatementCollections) -> Self {
        Self::build(collections)
    }
}

/// Accepted payload shape: the raw collections the dataset is built from.
impl JsonSchema for FinancialDataset {
    fn schema_name() -> String {
        "FinancialDataset".to_string()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        StatementCollections::json_schema(gen)
    }
}

/// The statements of the most recent year with any data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatestYear<'a> {
    pub year: i32,
    pub balance_sheet: Option<&'a StatementRow>,
    pub income_statement: Option<&'a StatementRow>,
    pub cash_flow: Option<&'a StatementRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YearFilter {
    #[default]
    All,
    Year(i32),
}

impl YearFilter {
    pub fn matches(self, year: Option<i32>) -> bool {
        match self {
            Self::All => true,
            Self::Year(y) => year == Some(y),
        }
    }

    /// Query-string form used by the statements endpoint; `None` for `All`.
    pub fn as_query(self) -> Option<String> {
        match self {
            Self::All => None,
            Self::Year(y) => Some(y.to_string()),
        }
    }
}

impl fmt::Display for YearFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Year(y) => write!(f, "{}", y),
        }
    }
}

impl FromStr for YearFilter {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Year)
        }
    }
}

impl FinancialDataset {
    /// Indexes the collections by year.
    ///
    /// A second row of the same kind for an already seen year is dropped
    /// with a warning; use [`FinancialDataset::build_strict`] to reject it.
    pub fn build(mut collections: StatementCollections) -> Self {
        for kind in StatementKind::ALL {
            let rows = std::mem::take(collections.rows_mut(kind));
            *collections.rows_mut(kind) = dedup_by_year(kind, rows);
        }
        Self::index(collections)
    }

    pub fn build_strict(collections: StatementCollections) -> Result<Self> {
        for kind in StatementKind::ALL {
            let mut seen = HashSet::new();
            for year in collections.rows(kind).iter().filter_map(|r| r.year) {
                if !seen.insert(year) {
                    return Err(CompanyInsightError::DuplicateStatement { kind, year });
                }
            }
        }
        Ok(Self::index(collections))
    }

    fn index(collections: StatementCollections) -> Self {
        let years: BTreeSet<i32> = StatementKind::ALL
            .iter()
            .flat_map(|kind| collections.rows(*kind).iter().filter_map(|r| r.year))
            .collect();
        let years_with_data: Vec<i32> = years.into_iter().rev().collect();

        let data_availability = DataAvailability {
            balance_sheets: !collections.balance_sheets.is_empty(),
            income_statements: !collections.income_statements.is_empty(),
            cash_flows: !collections.cash_flow_statements.is_empty(),
        };

        Self {
            last_financial_year: years_with_data.first().copied(),
            registration_number: collections.registration_number,
            balance_sheets: collections.balance_sheets,
            income_statements: collections.income_statements,
            cash_flow_statements: collections.cash_flow_statements,
            years_with_data,
            data_availability,
        }
    }

    pub fn registration_number(&self) -> Option<&str> {
        self.registration_number.as_deref()
    }

    pub fn rows(&self, kind: StatementKind) -> &[StatementRow] {
        match kind {
            StatementKind::Balance => &self.balance_sheets,
            StatementKind::Income => &self.income_statements,
            StatementKind::CashFlow => &self.cash_flow_statements,
        }
    }

    pub fn balance_sheets(&self) -> &[StatementRow] {
        &self.balance_sheets
    }

    pub fn income_statements(&self) -> &[StatementRow] {
        &self.income_statements
    }

    pub fn cash_flow_statements(&self) -> &[StatementRow] {
        &self.cash_flow_statements
    }

    /// Distinct years with any statement, most recent first.
    pub fn years_with_data(&self) -> &[i32] {
        &self.years_with_data
    }

    pub fn data_availability(&self) -> DataAvailability {
        self.data_availability
    }

    pub fn last_financial_year(&self) -> Option<i32> {
        self.last_financial_year
    }

    pub fn is_empty(&self) -> bool {
        !self.data_availability.any()
    }

    pub fn row_for(&self, kind: StatementKind, year: i32) -> Option<&StatementRow> {
        self.rows(kind).iter().find(|r| r.year == Some(year))
    }

    /// Statements of the most recent year. Any of the three may be missing
    /// for that year even though the year itself has data.
    pub fn latest(&self) -> Option<LatestYear<'_>> {
        let year = *self.years_with_data.first()?;
        Some(LatestYear {
            year,
            balance_sheet: self.row_for(StatementKind::Balance, year),
            income_statement: self.row_for(StatementKind::Income, year),
            cash_flow: self.row_for(StatementKind::CashFlow, year),
        })
    }

    pub fn filter_by_year(&self, filter: YearFilter) -> FinancialDataset {
        if filter == YearFilter::All {
            return self.clone();
        }

        let keep = |rows: &[StatementRow]| -> Vec<StatementRow> {
            rows.iter().filter(|r| filter.matches(r.year)).cloned().collect()
        };

        Self::index(StatementCollections {
            registration_number: self.registration_number.clone(),
            balance_sheets: keep(&self.balance_sheets),
            income_statements: keep(&self.income_statements),
            cash_flow_statements: keep(&self.cash_flow_statements),
        })
    }
}

fn dedup_by_year(kind: StatementKind, rows: Vec<StatementRow>) -> Vec<StatementRow> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|row| match row.year {
            Some(year) if !seen.insert(year) => {
                warn!("Dropping duplicate {} row for year {}", kind, year);
                false
            }
            _ => true,
        })
        .collect()
}
