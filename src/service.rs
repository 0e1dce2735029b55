use crate::company::CompanyRecord;
use crate::dataset::FinancialDataset;
use crate::error::Result;
use crate::merge::reconcile;
use crate::outcome::LoadOutcome;
use crate::ratios::{
    compute_extended_ratios, compute_ratios, growth_rates, ExtendedRatios, GrowthRates, RatioSet,
};
use crate::supplementary::{load_company, SupplementaryStore};
use log::{info, warn};

/// Assembles the company detail record from both sources.
///
/// The registry result is authoritative: its failure fails the view. A
/// store failure is logged and the store treated as empty.
pub fn load_company_details(
    primary: Result<CompanyRecord>,
    secondary: Result<Option<CompanyRecord>>,
) -> Result<CompanyRecord> {
    let primary = primary?;

    let secondary = secondary.unwrap_or_else(|e| {
        warn!("Continuing without supplementary attributes: {}", e);
        None
    });

    let mut merged = reconcile(&primary, secondary.as_ref());
    merged.annotate_flags();
    Ok(merged)
}

/// Same as [`load_company_details`], reading the secondary record from a
/// store.
pub fn company_details_from_store(
    primary: Result<CompanyRecord>,
    store: &dyn SupplementaryStore,
    registration_number: &str,
) -> Result<CompanyRecord> {
    let primary = primary?;
    info!("Loading company details for {}", registration_number);
    load_company_details(Ok(primary), load_company(store, registration_number))
}

/// Everything the financial summary shows for one company.
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialSummary {
    pub latest_year: Option<i32>,
    pub key_metrics: RatioSet,
    pub extended: ExtendedRatios,
    pub growth: Option<GrowthRates>,
}

impl FinancialSummary {
    pub fn from_dataset(dataset: &FinancialDataset) -> Self {
        let latest = dataset.latest();
        let (balance, income) = latest
            .map(|l| (l.balance_sheet, l.income_statement))
            .unwrap_or((None, None));

        Self {
            latest_year: latest.map(|l| l.year),
            key_metrics: compute_ratios(balance, income),
            extended: compute_extended_ratios(balance, income),
            growth: growth_rates(dataset),
        }
    }
}

/// Classifies a statements response: a missing or empty dataset is
/// "no data", not an error.
pub fn statements_outcome(result: Result<Option<FinancialDataset>>) -> LoadOutcome<FinancialDataset> {
    LoadOutcome::from_result(result).empty_as_no_data(FinancialDataset::is_empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::StatementCollections;
    use crate::error::CompanyInsightError;
    use crate::schema::StatementRow;
    use crate::supplementary::{save_company, InMemoryStore};
    use serde_json::json;

    fn registry() -> CompanyRecord {
        CompanyRecord::from_value(json!({
            "registration_number": "40003012345",
            "name": "Baltic Timber SIA",
            "type": "SIA",
            "registry_data": { "regcode": "40003012345" }
        }))
    }

    #[test]
    fn test_primary_failure_fails_view() {
        let result = load_company_details(
            Err(CompanyInsightError::RegistryUnavailable("503".into())),
            Ok(Some(registry())),
        );
        assert!(matches!(result, Err(CompanyInsightError::RegistryUnavailable(_))));
    }

    #[test]
    fn test_secondary_failure_is_recovered() {
        let record = load_company_details(
            Ok(registry()),
            Err(CompanyInsightError::StoreUnavailable("connection refused".into())),
        )
        .unwrap();
        assert_eq!(record.name(), Some("Baltic Timber SIA"));
        assert_eq!(record.get("is_stock_company"), Some(&json!(false)));
        assert_eq!(record.get("has_liquidation_process"), Some(&json!(false)));
    }

    #[test]
    fn test_details_from_store() {
        let store = InMemoryStore::new();
        save_company(
            &store,
            &CompanyRecord::new()
                .with("registration_number", "40003012345")
                .with("name", "Old Name")
                .with("website", "https://timber.lv"),
        )
        .unwrap();

        let record = company_details_from_store(Ok(registry()), &store, "40003012345").unwrap();
        assert_eq!(record.name(), Some("Baltic Timber SIA"));
        assert_eq!(record.get("website"), Some(&json!("https://timber.lv")));
        assert_eq!(record.registry_data(), registry().registry_data());
    }

    #[test]
    fn test_statements_outcome() {
        assert_eq!(statements_outcome(Ok(None)), LoadOutcome::NoData);
        assert_eq!(
            statements_outcome(Ok(Some(FinancialDataset::default()))),
            LoadOutcome::NoData
        );

        let dataset = FinancialDataset::build(StatementCollections {
            balance_sheets: vec![StatementRow::new(2023)],
            ..Default::default()
        });
        assert!(statements_outcome(Ok(Some(dataset))).loaded().is_some());
    }

    #[test]
    fn test_summary_of_empty_dataset() {
        let summary = FinancialSummary::from_dataset(&FinancialDataset::default());
        assert_eq!(summary.latest_year, None);
        assert!(summary.key_metrics.is_absent());
        assert!(summary.growth.is_none());
    }
}
