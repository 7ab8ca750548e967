use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::errors::ServiceError;

/// A single classified-listing record.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Ad {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub owner: String,
    pub created_at: DateTime<Utc>,
}

/// Creation input: no id/created_at, those are assigned on insert.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewAd {
    pub title: String,
    pub description: String,
    pub owner: String,
}

impl NewAd {
    /// Pull the required string fields out of an untyped JSON body.
    ///
    /// Fields are checked in a fixed order (`title`, `description`, `owner`)
    /// so the reported failure is deterministic; each must be a JSON string
    /// with at least one non-whitespace character. The stored values are
    /// trimmed. A body that is not an object has no fields and fails on
    /// `title`.
    pub fn from_json(data: &Value) -> Result<Self, ServiceError> {
        Ok(Self {
            title: required_string(data, "title")?,
            description: required_string(data, "description")?,
            owner: required_string(data, "owner")?,
        })
    }
}

fn required_string(data: &Value, field: &str) -> Result<String, ServiceError> {
    match data.get(field) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(ServiceError::Validation(format!(
            "Field '{field}' is required and must be a non-empty string"
        ))),
    }
}

#[derive(Debug)]
struct RegistryInner {
    ads: HashMap<u64, Ad>,
    next_id: u64,
}

/// In-memory ad registry: the id map plus the next-id counter.
///
/// Both live behind one lock, so id assignment and insertion form a single
/// critical section and concurrent creates each observe a distinct,
/// strictly increasing id. Readers clone records out and never see a
/// half-written entry.
#[derive(Clone)]
pub struct AdStore {
    inner: Arc<RwLock<RegistryInner>>,
}

impl AdStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(RegistryInner { ads: HashMap::new(), next_id: 1 })),
        }
    }

    /// Assign the next id, stamp the creation time, insert, return the record.
    pub async fn create(&self, input: NewAd) -> Ad {
        let now = Utc::now();
        // Wire format carries second precision only
        let created_at = now.with_nanosecond(0).unwrap_or(now);

        let mut inner = self.inner.write().await;
        let id = inner.next_id;
        inner.next_id += 1;
        let ad = Ad {
            id,
            title: input.title,
            description: input.description,
            owner: input.owner,
            created_at,
        };
        inner.ads.insert(id, ad.clone());
        debug!(id, "ad created");
        ad
    }

    /// Get an ad by id.
    pub async fn get(&self, id: u64) -> Option<Ad> {
        let inner = self.inner.read().await;
        inner.ads.get(&id).cloned()
    }

    /// Remove an ad; returns whether it existed. Freed ids are never reused.
    pub async fn delete(&self, id: u64) -> bool {
        let mut inner = self.inner.write().await;
        let existed = inner.ads.remove(&id).is_some();
        if existed {
            debug!(id, "ad deleted");
        }
        existed
    }
}

impl Default for AdStore {
    fn default() -> Self {
        Self::new()
    }
}
