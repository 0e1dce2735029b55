//! # Company Insight
//!
//! Data core for browsing Latvian company registry records alongside their
//! annual financial statements.
//!
//! ## Core Concepts
//!
//! - **Company record**: An open key/value record from the registry, optionally
//!   overlaid with user-maintained supplementary attributes
//! - **Statement rows**: Per-year balance sheet, income statement and cash flow
//!   rows whose line items may arrive as numbers, numeric strings or nulls
//! - **Absent vs N/A**: A missing input stays `None`; a ratio whose denominator
//!   is zero or negative is `Ratio::NotApplicable`. Neither is ever zero
//! - **Pagination**: Offset-based search pages over a reported total count
//!
//! ## Example
//!
//! ```rust,ignore
//! use company_insight::*;
//! use serde_json::json;
//!
//! let dataset: FinancialDataset = serde_json::from_value(json!({
//!     "registration_number": "40003012345",
//!     "balance_sheets": [
//!         { "year": 2023, "total_current_assets": 200, "current_liabilities": 100,
//!           "total_assets": 500, "equity": 300 }
//!     ],
//!     "income_statements": [
//!         { "year": 2023, "net_turnover": 1000, "net_income": 50 }
//!     ],
//!     "cash_flow_statements": []
//! }))?;
//!
//! let ratios = latest_ratios(&dataset);
//! assert_eq!(dataset.years_with_data(), &[2023]);
//! println!("Current ratio: {}", format_ratio(ratios.current_ratio, 2));
//! ```

pub mod company;
pub mod config;
pub mod dataset;
pub mod error;
pub mod format;
pub mod health;
pub mod history;
pub mod merge;
pub mod numeric;
pub mod outcome;
pub mod pager;
pub mod ratios;
pub mod schema;
pub mod service;
pub mod supplementary;

#[cfg(feature = "http")]
pub mod client;

pub use company::{CompanyList, CompanyRecord};
pub use config::InsightConfig;
pub use dataset::{
    DataAvailability, FinancialDataset, LatestYear, StatementCollections, YearFilter,
};
pub use error::{CompanyInsightError, Result};
pub use format::*;
pub use health::{HealthAssessment, RiskLevel, Tone};
pub use history::{record_visit, SearchHistoryEntry, MAX_HISTORY_ENTRIES};
pub use merge::{merge, reconcile};
pub use numeric::{coerce, to_number};
pub use outcome::{LoadOutcome, Notice, NoticeLevel};
pub use pager::{describe_request, has_next, has_previous, FetchDescriptor, SearchPage};
pub use ratios::{
    compute_extended_ratios, compute_ratios, growth_rates, latest_ratios, ratios_by_year,
    ExtendedRatios, GrowthRates, Ratio, RatioSet,
};
pub use schema::{LineItem, StatementKind, StatementRow};
pub use service::{
    company_details_from_store, load_company_details, statements_outcome, FinancialSummary,
};
pub use supplementary::{
    load_company, save_company, InMemoryStore, SupplementaryAttributes, SupplementaryStore,
};

#[cfg(feature = "http")]
pub use client::{FinancialOverview, RegistryClient};
