use crate::company::{CompanyList, CompanyRecord};
use crate::config::InsightConfig;
use crate::dataset::{FinancialDataset, YearFilter};
use crate::error::{CompanyInsightError, Result};
use crate::health::HealthAssessment;
use crate::outcome::LoadOutcome;
use crate::pager::SearchPage;
use crate::service::{company_details_from_store, statements_outcome};
use crate::supplementary::SupplementaryStore;
use log::{debug, info};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

/// Client for the registry and financial-analytics HTTP API.
#[derive(Clone)]
pub struct RegistryClient {
    client: Client,
    base_url: String,
}

/// Financial sections of the detail view, loaded side by side.
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialOverview {
    pub statements: LoadOutcome<FinancialDataset>,
    pub health: LoadOutcome<HealthAssessment>,
}

impl RegistryClient {
    pub fn new(config: &InsightConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder().timeout(config.request_timeout()).build()?;
        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
        })
    }

    pub async fn get_company(&self, registration_number: &str) -> Result<CompanyRecord> {
        let url = format!("{}/api/company/{}", self.base_url, registration_number);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CompanyInsightError::RegistryUnavailable(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(CompanyInsightError::CompanyNotFound(
                registration_number.to_string(),
            ));
        }
        let response = ensure_success(response, CompanyInsightError::RegistryUnavailable).await?;
        Ok(response.json().await?)
    }

    /// Fetches the current page and records the reported total on it.
    pub async fn search(&self, page: &mut SearchPage) -> Result<CompanyList> {
        let descriptor = page.request()?;
        let url = format!("{}/api/search", self.base_url);
        info!(
            "Searching companies for '{}' (offset {})",
            descriptor.query, descriptor.offset
        );

        let response = self
            .client
            .get(&url)
            .query(&descriptor)
            .send()
            .await
            .map_err(|e| CompanyInsightError::RegistryUnavailable(e.to_string()))?;
        let response = ensure_success(response, CompanyInsightError::RegistryUnavailable).await?;

        let list: CompanyList = response.json().await?;
        page.update_total(list.count);
        Ok(list)
    }

    /// `Ok(None)` when the service has no statements for the company.
    pub async fn financial_statements(
        &self,
        registration_number: &str,
        filter: YearFilter,
    ) -> Result<Option<FinancialDataset>> {
        let url = format!(
            "{}/api/financial/{}/statements",
            self.base_url, registration_number
        );
        let mut request = self.client.get(&url);
        if let Some(year) = filter.as_query() {
            request = request.query(&[("year", year)]);
        }
        self.get_optional(request).await
    }

    /// `Ok(None)` when there is not enough data for an assessment.
    pub async fn health_score(&self, registration_number: &str) -> Result<Option<HealthAssessment>> {
        let url = format!(
            "{}/api/financial/{}/health-score",
            self.base_url, registration_number
        );
        self.get_optional(self.client.get(&url)).await
    }

    async fn get_optional<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Option<T>> {
        let response = request
            .send()
            .await
            .map_err(|e| CompanyInsightError::AnalyticsUnavailable(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("No analytics data at {}", response.url());
            return Ok(None);
        }
        let response = ensure_success(response, CompanyInsightError::AnalyticsUnavailable).await?;
        Ok(Some(response.json().await?))
    }

    pub async fn fetch_overview(
        &self,
        registration_number: &str,
        filter: YearFilter,
    ) -> FinancialOverview {
        let (statements, health) = futures::join!(
            self.financial_statements(registration_number, filter),
            self.health_score(registration_number),
        );

        FinancialOverview {
            statements: statements_outcome(statements),
            health: LoadOutcome::from_result(health),
        }
    }

    /// Registry record merged with whatever the store holds for it.
    pub async fn company_details(
        &self,
        registration_number: &str,
        store: &dyn SupplementaryStore,
    ) -> Result<CompanyRecord> {
        let primary = self.get_company(registration_number).await;
        company_details_from_store(primary, store, registration_number)
    }
}

async fn ensure_success(
    response: Response,
    unavailable: fn(String) -> CompanyInsightError,
) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(unavailable(format!("status {}: {}", status, body)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_uses_trimmed_base_url() {
        let config = InsightConfig {
            api_base_url: "https://api.example.lv/".to_string(),
            ..Default::default()
        };
        let client = RegistryClient::new(&config).unwrap();
        assert_eq!(client.base_url, "https://api.example.lv");
    }

    #[test]
    fn test_client_rejects_invalid_config() {
        let config = InsightConfig {
            page_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            RegistryClient::new(&config),
            Err(CompanyInsightError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_registry_is_retryable() {
        let config = InsightConfig {
            api_base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_secs: 2,
            ..Default::default()
        };
        let client = RegistryClient::new(&config).unwrap();

        let err = client.get_company("40003012345").await.unwrap_err();
        assert!(matches!(err, CompanyInsightError::RegistryUnavailable(_)));
        assert!(err.is_retryable());

        let overview = client.fetch_overview("40003012345", YearFilter::All).await;
        assert!(matches!(
            overview.statements,
            LoadOutcome::Failed { retryable: true, .. }
        ));
    }
}
