use crate::company::{CompanyRecord, REGISTRY_DATA};
use log::{debug, warn};

/// Combines the authoritative registry record with the supplementary one.
///
/// Two steps:
/// 1. shallow overwrite: start from `secondary`, every key present in
///    `primary` replaces the secondary value;
/// 2. restore: `registry_data` is taken from `primary` as a whole, and is
///    dropped when `primary` has none.
pub fn merge(primary: &CompanyRecord, secondary: Option<&CompanyRecord>) -> CompanyRecord {
    let Some(secondary) = secondary else {
        return primary.clone();
    };

    let mut merged = shallow_overwrite(primary, secondary);
    restore_registry_data(&mut merged, primary);
    merged
}

fn shallow_overwrite(primary: &CompanyRecord, secondary: &CompanyRecord) -> CompanyRecord {
    let mut fields = secondary.fields().clone();
    for (key, value) in primary.fields() {
        fields.insert(key.clone(), value.clone());
    }
    CompanyRecord::from_map(fields)
}

fn restore_registry_data(merged: &mut CompanyRecord, primary: &CompanyRecord) {
    match primary.registry_data() {
        Some(data) => {
            merged.insert(REGISTRY_DATA, data.clone());
        }
        None => {
            merged.remove(REGISTRY_DATA);
        }
    }
}

/// Merges only when both records carry the same registration number.
///
/// A missing or mismatched key is not an error: the primary record is
/// returned alone.
pub fn reconcile(primary: &CompanyRecord, secondary: Option<&CompanyRecord>) -> CompanyRecord {
    let Some(secondary) = secondary else {
        return primary.clone();
    };

    match (primary.registration_number(), secondary.registration_number()) {
        (Some(p), Some(s)) if p == s => {
            debug!("Merging supplementary attributes for company {}", p);
            merge(primary, Some(secondary))
        }
        (Some(p), Some(s)) => {
            warn!(
                "Registration number mismatch (registry {}, store {}); using registry record only",
                p, s
            );
            primary.clone()
        }
        _ => {
            warn!("Registration number missing on one source; using registry record only");
            primary.clone()
        }
    }
}
