use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const REGISTRATION_NUMBER: &str = "registration_number";
pub const REGISTRY_DATA: &str = "registry_data";

const STOCK_COMPANY_TYPE: &str = "AS";
const STOCK_COMPANY_TYPE_TEXT: &str = "Akciju Sabiedrība";

/// A company as seen by one data source.
///
/// The key set is open: the registry adds fields over time and the
/// supplementary store may hold anything previously saved. Known fields are
/// exposed through accessors; everything else is reachable via [`get`].
///
/// [`get`]: CompanyRecord::get
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyRecord {
    fields: Map<String, Value>,
}

impl CompanyRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Builds a record from a JSON object; any other JSON value yields an
    /// empty record.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            _ => Self::default(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.to_string(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    fn list(&self, key: &str) -> &[Value] {
        self.fields
            .get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The merge key. Numeric registration numbers are accepted and
    /// rendered as text.
    pub fn registration_number(&self) -> Option<String> {
        match self.fields.get(REGISTRATION_NUMBER)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.text("name")
    }

    pub fn status(&self) -> Option<&str> {
        self.text("status")
    }

    pub fn address(&self) -> Option<&str> {
        self.text("address")
    }

    pub fn founded_date(&self) -> Option<&str> {
        self.text("founded_date")
    }

    /// Registry metadata as delivered by the authoritative source.
    pub fn registry_data(&self) -> Option<&Value> {
        self.fields.get(REGISTRY_DATA)
    }

    pub fn officers(&self) -> &[Value] {
        self.list("officers_data")
    }

    pub fn members(&self) -> &[Value] {
        self.list("members_data")
    }

    pub fn stockholders(&self) -> &[Value] {
        self.list("stockholders_data")
    }

    pub fn beneficial_owners(&self) -> &[Value] {
        self.list("beneficiary_data")
    }

    pub fn business_activities(&self) -> &[Value] {
        self.list("business_data")
    }

    pub fn liquidation_events(&self) -> &[Value] {
        self.list("liquidation_data")
    }

    pub fn capital_events(&self) -> &[Value] {
        self.list("capital_data")
    }

    pub fn taxpayer_ratings(&self) -> &[Value] {
        self.list("taxpayer_ratings")
    }

    pub fn has_liquidation_process(&self) -> bool {
        !self.liquidation_events().is_empty()
    }

    /// Joint-stock companies (AS) additionally publish a stockholder list.
    pub fn is_stock_company(&self) -> bool {
        self.text("type") == Some(STOCK_COMPANY_TYPE)
            || self.text("type_text") == Some(STOCK_COMPANY_TYPE_TEXT)
    }

    /// Fills in the derived registry flags the source did not supply.
    pub fn annotate_flags(&mut self) {
        if !self.contains("has_liquidation_process") {
            let liquidation = self.has_liquidation_process();
            self.insert("has_liquidation_process", liquidation);
        }
        if !self.contains("is_stock_company") {
            let stock = self.is_stock_company();
            self.insert("is_stock_company", stock);
        }
    }
}

impl From<Map<String, Value>> for CompanyRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self::from_map(fields)
    }
}

/// Result page of `GET /api/search`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompanyList {
    pub count: u64,
    #[serde(default)]
    pub companies: Vec<CompanyRecord>,
}
