use crate::company::{CompanyRecord, REGISTRATION_NUMBER};
use crate::error::{CompanyInsightError, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::RwLock;

const FIXED_FIELDS: [&str; 5] = [REGISTRATION_NUMBER, "name", "status", "address", "founded_date"];

/// A row of the supplementary `companies` table.
///
/// Fields outside the fixed column set travel in `additional_data`, which is
/// `None` rather than an empty object when there are none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplementaryAttributes {
    pub registration_number: String,
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub founded_date: Option<String>,
    #[serde(default)]
    pub additional_data: Option<Map<String, Value>>,
}

impl SupplementaryAttributes {
    /// Splits a company record into the table layout.
    ///
    /// Null-valued extra fields are not stored.
    pub fn from_company(record: &CompanyRecord) -> Result<Self> {
        let registration_number = record
            .registration_number()
            .ok_or(CompanyInsightError::MissingField(REGISTRATION_NUMBER))?;
        let name = record
            .name()
            .ok_or(CompanyInsightError::MissingField("name"))?
            .to_string();

        let additional: Map<String, Value> = record
            .fields()
            .iter()
            .filter(|(key, value)| !FIXED_FIELDS.contains(&key.as_str()) && !value.is_null())
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(Self {
            registration_number,
            name,
            status: record.status().map(str::to_string),
            address: record.address().map(str::to_string),
            founded_date: record.founded_date().map(str::to_string),
            additional_data: (!additional.is_empty()).then_some(additional),
        })
    }

    /// Flattens `additional_data` back into a single record.
    pub fn into_record(self) -> CompanyRecord {
        let mut record = CompanyRecord::new()
            .with(REGISTRATION_NUMBER, self.registration_number)
            .with("name", self.name)
            .with("status", self.status)
            .with("address", self.address)
            .with("founded_date", self.founded_date);

        for (key, value) in self.additional_data.unwrap_or_default() {
            record.insert(&key, value);
        }
        record
    }
}

/// Keyed access to supplementary company attributes.
///
/// A missing entry is `Ok(None)`; `Err` is reserved for the store itself
/// being unreachable.
pub trait SupplementaryStore: Send + Sync {
    fn get(&self, registration_number: &str) -> Result<Option<SupplementaryAttributes>>;

    fn upsert(&self, attributes: SupplementaryAttributes) -> Result<SupplementaryAttributes>;
}

/// Saves a record and returns it as the store now holds it.
pub fn save_company(store: &dyn SupplementaryStore, record: &CompanyRecord) -> Result<CompanyRecord> {
    let attributes = SupplementaryAttributes::from_company(record)?;
    info!(
        "Saving supplementary attributes for company {}",
        attributes.registration_number
    );
    Ok(store.upsert(attributes)?.into_record())
}

/// Looks up a record, flattened; `Ok(None)` when nothing was saved.
pub fn load_company(
    store: &dyn SupplementaryStore,
    registration_number: &str,
) -> Result<Option<CompanyRecord>> {
    Ok(store
        .get(registration_number)?
        .map(SupplementaryAttributes::into_record))
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    rows: RwLock<HashMap<String, SupplementaryAttributes>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize> {
        let rows = self
            .rows
            .read()
            .map_err(|e| CompanyInsightError::StoreUnavailable(e.to_string()))?;
        Ok(rows.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl SupplementaryStore for InMemoryStore {
    fn get(&self, registration_number: &str) -> Result<Option<SupplementaryAttributes>> {
        let rows = self
            .rows
            .read()
            .map_err(|e| CompanyInsightError::StoreUnavailable(e.to_string()))?;
        Ok(rows.get(registration_number).cloned())
    }

    fn upsert(&self, attributes: SupplementaryAttributes) -> Result<SupplementaryAttributes> {
        let mut rows = self
            .rows
            .write()
            .map_err(|e| CompanyInsightError::StoreUnavailable(e.to_string()))?;
        debug!("Upserting company {}", attributes.registration_number);
        rows.insert(attributes.registration_number.clone(), attributes.clone());
        Ok(attributes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn record() -> CompanyRecord {
        CompanyRecord::from_value(json!({
            "registration_number": "40003012345",
            "name": "Baltic Timber SIA",
            "status": "active",
            "website": "https://timber.lv",
            "notes": null,
            "employees": 42
        }))
    }

    #[test]
    fn test_split_into_columns() {
        let attrs = SupplementaryAttributes::from_company(&record()).unwrap();
        assert_eq!(attrs.registration_number, "40003012345");
        assert_eq!(attrs.status.as_deref(), Some("active"));
        assert_eq!(attrs.address, None);

        let extra = attrs.additional_data.unwrap();
        assert_eq!(extra.len(), 2);
        assert_eq!(extra["employees"], json!(42));
        assert!(!extra.contains_key("notes"));
    }

    #[test]
    fn test_additional_data_null_when_no_extras() {
        let plain = CompanyRecord::new()
            .with("registration_number", "40003012345")
            .with("name", "Plain SIA");
        let attrs = SupplementaryAttributes::from_company(&plain).unwrap();
        assert_eq!(attrs.additional_data, None);

        let json = serde_json::to_value(&attrs).unwrap();
        assert_eq!(json["additional_data"], Value::Null);
    }

    #[test]
    fn test_required_fields() {
        let nameless = CompanyRecord::new().with("registration_number", "1");
        assert!(matches!(
            SupplementaryAttributes::from_company(&nameless),
            Err(CompanyInsightError::MissingField("name"))
        ));

        let keyless = CompanyRecord::new().with("name", "X");
        assert!(matches!(
            SupplementaryAttributes::from_company(&keyless),
            Err(CompanyInsightError::MissingField("registration_number"))
        ));
    }

    #[test]
    fn test_store_round_trip_flattens() {
        let store = InMemoryStore::new();
        assert!(load_company(&store, "40003012345").unwrap().is_none());

        let saved = save_company(&store, &record()).unwrap();
        assert_eq!(saved.get("website"), Some(&json!("https://timber.lv")));
        assert_eq!(store.len().unwrap(), 1);

        let loaded = load_company(&store, "40003012345").unwrap().unwrap();
        assert_eq!(loaded, saved);
        assert!(loaded.get("additional_data").is_none());
    }

    #[test]
    fn test_upsert_replaces() {
        let store = InMemoryStore::new();
        save_company(&store, &record()).unwrap();
        save_company(&store, &record().with("status", "liquidated")).unwrap();

        assert_eq!(store.len().unwrap(), 1);
        let loaded = load_company(&store, "40003012345").unwrap().unwrap();
        assert_eq!(loaded.status(), Some("liquidated"));
    }

    #[test]
    fn test_poisoned_store_is_unavailable() {
        let store = Arc::new(InMemoryStore::new());
        let writer = Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _rows = writer.rows.write().unwrap();
            panic!("writer crashed while holding the lock");
        })
        .join();

        assert!(matches!(store.len(), Err(CompanyInsightError::StoreUnavailable(_))));
        assert!(matches!(store.is_empty(), Err(CompanyInsightError::StoreUnavailable(_))));
        assert!(matches!(
            load_company(store.as_ref(), "40003012345"),
            Err(CompanyInsightError::StoreUnavailable(_))
        ));
    }
}
