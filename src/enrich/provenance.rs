use serde_json::{Map, Value};
use thiserror::Error;

/// Activity-log categories rewritten to `ACTIVITYLOGS_<CATEGORY>`, in match order.
pub const ACTIVITY_CATEGORIES: [&str; 8] = [
    "ADMINISTRATIVE",
    "SECURITY",
    "SERVICEHEALTH",
    "ALERT",
    "RECOMMENDATION",
    "POLICY",
    "AUTOSCALE",
    "RESOURCEHEALTH",
];

const RESOURCE_ID_KEYS: [&str; 2] = ["resourceId", "ResourceId"];
const PROVIDER_PREFIX: &str = "MICROSOFT.";
const PROVIDERS_SEGMENT: &str = "PROVIDERS";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProvenanceError {
    #[error("Could not find resourceId for the log record")]
    MissingResourceId,
}

/// Provenance updates derived for one record. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Provenance {
    pub event_provider: Option<String>,
    pub eventsource: Option<String>,
    pub category: Option<String>,
}

impl Provenance {
    pub fn apply(self, record: &mut Map<String, Value>) {
        if let Some(provider) = self.event_provider {
            record.insert("event_provider".to_string(), Value::String(provider));
        }
        if let Some(category) = self.category {
            record.insert("category".to_string(), Value::String(category));
        }
        if let Some(source) = self.eventsource {
            record.insert("eventsource".to_string(), Value::String(source));
        }
    }
}

/// Derives `event_provider`, `eventsource` and activity-log `category` from a
/// record's Azure resource path.
///
/// Example: `/SUBSCRIPTIONS/<id>/RESOURCEGROUPS/<rg>/PROVIDERS/MICROSOFT.SEARCH/SEARCHSERVICES/VMWARESEARCH`
/// yields `event_provider = "AZURE_SEARCH"` and `eventsource = "SEARCHSERVICES"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceProvenanceResolver;

impl ResourceProvenanceResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve_record(
        &self,
        record: &Map<String, Value>,
    ) -> Result<Provenance, ProvenanceError> {
        let resource_id = RESOURCE_ID_KEYS
            .iter()
            .filter_map(|key| record.get(*key).and_then(Value::as_str))
            .find(|id| !id.is_empty())
            .ok_or(ProvenanceError::MissingResourceId)?;

        let category = record.get("category").and_then(Value::as_str);
        Ok(self.resolve(resource_id, category))
    }

    pub fn resolve(&self, resource_id: &str, category: Option<&str>) -> Provenance {
        let path = resource_id.strip_prefix('/').unwrap_or(resource_id);
        let segments: Vec<&str> = path.split('/').collect();

        let mut provenance = Provenance {
            category: category.and_then(activity_category),
            ..Default::default()
        };

        // Last matching segment wins
        for segment in &segments {
            if segment.to_uppercase().starts_with(PROVIDER_PREFIX) {
                let service = segment.split('.').nth(1).unwrap_or_default();
                provenance.event_provider = Some(format!("AZURE_{}", service.to_uppercase()));
            }
        }

        if let Some(parent) = segments.len().checked_sub(2).map(|i| segments[i])
            && parent.to_uppercase() != PROVIDERS_SEGMENT
        {
            provenance.eventsource = Some(parent.to_string());
        }

        provenance
    }
}

fn activity_category(category: &str) -> Option<String> {
    let upper = category.to_uppercase();
    ACTIVITY_CATEGORIES
        .iter()
        .find(|candidate| **candidate == upper)
        .map(|matched| format!("ACTIVITYLOGS_{matched}"))
}
