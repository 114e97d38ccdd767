//! Field-metadata cache for the read path.
//!
//! Memoizes the normalized result of describing an sObject, keyed by the
//! object API name, so repeated `get_object_fields` calls for the same
//! object cost one describe round-trip per process.
//!
//! Storage sits behind a [`std::sync::Mutex`] that is never held across an
//! `.await`. Two concurrent misses for the same key may both call describe;
//! the later insert wins.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tracing::{debug, instrument};

use crate::describe::{DescribeSObjectResult, FieldDescribe, PicklistValue};
use crate::error::{Error, ErrorKind, Result};

// ============================================================================
// Cached record types
// ============================================================================

/// Normalized field list for one sObject.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMetadata {
    pub object_name: String,
    pub fields: Vec<FieldDescription>,
    pub object_info: ObjectInfo,
}

/// One field, flattened to the attributes the tools report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescription {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub length: Option<i32>,
    pub required: bool,
    pub unique: bool,
    pub external_id: bool,
    pub createable: bool,
    pub updateable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picklist_values: Option<Vec<PicklistValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_to: Option<Vec<String>>,
    /// Only set for reference fields; serializes as `null` when the
    /// relationship has no name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship_name: Option<Option<String>>,
}

/// Object-level summary stored next to the fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectInfo {
    pub label: String,
    pub label_plural: Option<String>,
    pub custom: bool,
    pub createable: bool,
    pub updateable: bool,
    pub deletable: bool,
}

impl FieldDescription {
    fn from_describe(field: &FieldDescribe) -> Self {
        let picklist_values = field
            .is_picklist()
            .then(|| field.picklist_values.clone().unwrap_or_default());
        let (reference_to, relationship_name) = if field.is_reference() {
            (
                field.reference_to.clone(),
                Some(field.relationship_name.clone()),
            )
        } else {
            (None, None)
        };

        Self {
            name: field.name.clone(),
            label: field.label.clone(),
            field_type: field.field_type.clone(),
            length: field.length,
            required: !field.nillable,
            unique: field.unique,
            external_id: field.external_id,
            createable: field.createable,
            updateable: field.updateable,
            picklist_values,
            reference_to,
            relationship_name,
        }
    }
}

impl FieldMetadata {
    /// Normalize a describe result under the requested object name.
    pub fn from_describe(object_name: &str, describe: &DescribeSObjectResult) -> Self {
        Self {
            object_name: object_name.to_string(),
            fields: describe
                .fields
                .iter()
                .map(FieldDescription::from_describe)
                .collect(),
            object_info: ObjectInfo {
                label: describe.label.clone(),
                label_plural: describe.label_plural.clone(),
                custom: describe.custom,
                createable: describe.createable,
                updateable: describe.updateable,
                deletable: describe.deletable,
            },
        }
    }
}

// ============================================================================
// Eviction
// ============================================================================

/// Decides which entries leave the cache.
///
/// The cache calls `on_hit` for every lookup that finds an entry and
/// `on_insert` after each insert; keys returned from `on_insert` are removed.
pub trait EvictionPolicy: Send {
    fn on_hit(&mut self, _key: &str) {}

    fn on_insert(&mut self, key: &str, len: usize) -> Vec<String>;
}

/// Keep everything for the life of the process.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoEviction;

impl EvictionPolicy for NoEviction {
    fn on_insert(&mut self, _key: &str, _len: usize) -> Vec<String> {
        Vec::new()
    }
}

/// Hit/miss counters for observability and tests.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub size: usize,
}

// ============================================================================
// Cache
// ============================================================================

struct CacheState<P> {
    entries: HashMap<String, Arc<FieldMetadata>>,
    policy: P,
    hits: usize,
    misses: usize,
}

/// Process-wide memo of describe results keyed by object API name.
pub struct FieldMetadataCache<P: EvictionPolicy = NoEviction> {
    state: Mutex<CacheState<P>>,
}

impl Default for FieldMetadataCache<NoEviction> {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldMetadataCache<NoEviction> {
    /// Unbounded cache with no expiry.
    pub fn new() -> Self {
        Self::with_policy(NoEviction)
    }
}

impl<P: EvictionPolicy> FieldMetadataCache<P> {
    /// Cache governed by the given eviction policy.
    pub fn with_policy(policy: P) -> Self {
        Self {
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                policy,
                hits: 0,
                misses: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheState<P>> {
        // No critical section leaves the map half-updated; poisoning is ignored.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Return the cached metadata for `object_name`, describing it on a miss.
    ///
    /// `describe` receives the object name and is only called on a miss.
    /// A describe error that means "no such object" becomes
    /// [`ErrorKind::ObjectNotFound`]; anything else becomes
    /// [`ErrorKind::DescribeError`]. Failures are not cached.
    #[instrument(skip(self, describe))]
    pub async fn get_fields<F, Fut>(&self, object_name: &str, describe: F) -> Result<Arc<FieldMetadata>>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<DescribeSObjectResult>>,
    {
        if let Some(entry) = self.lookup(object_name) {
            debug!("field metadata cache hit");
            return Ok(entry);
        }

        debug!("field metadata cache miss");
        let described = describe(object_name.to_string())
            .await
            .map_err(|err| classify_describe_error(object_name, err))?;

        let entry = Arc::new(FieldMetadata::from_describe(object_name, &described));
        self.insert(object_name, Arc::clone(&entry));
        Ok(entry)
    }

    /// Cached entry, if present. Does not call describe.
    pub fn get(&self, object_name: &str) -> Option<Arc<FieldMetadata>> {
        self.lock().entries.get(object_name).cloned()
    }

    /// Current counters.
    pub fn stats(&self) -> CacheStats {
        let state = self.lock();
        CacheStats {
            hits: state.hits,
            misses: state.misses,
            size: state.entries.len(),
        }
    }

    fn lookup(&self, object_name: &str) -> Option<Arc<FieldMetadata>> {
        let mut state = self.lock();
        match state.entries.get(object_name).cloned() {
            Some(entry) => {
                state.hits += 1;
                state.policy.on_hit(object_name);
                Some(entry)
            }
            None => {
                state.misses += 1;
                None
            }
        }
    }

    fn insert(&self, object_name: &str, entry: Arc<FieldMetadata>) {
        let mut state = self.lock();
        state.entries.insert(object_name.to_string(), entry);
        let len = state.entries.len();
        let evicted = state.policy.on_insert(object_name, len);
        for key in evicted {
            state.entries.remove(&key);
        }
    }
}

impl<P: EvictionPolicy> std::fmt::Debug for FieldMetadataCache<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldMetadataCache")
            .field("stats", &self.stats())
            .finish()
    }
}

fn classify_describe_error(object_name: &str, err: Error) -> Error {
    let kind = match &err.kind {
        ErrorKind::ObjectNotFound(_) | ErrorKind::NotFound(_) | ErrorKind::InvalidName(_) => {
            ErrorKind::ObjectNotFound(object_name.to_string())
        }
        _ => ErrorKind::DescribeError {
            object: object_name.to_string(),
            message: err.to_string(),
        },
    };
    Error::with_source(kind, err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn account_describe() -> DescribeSObjectResult {
        serde_json::from_value(serde_json::json!({
            "name": "Account",
            "label": "Account",
            "labelPlural": "Accounts",
            "custom": false,
            "createable": true,
            "updateable": true,
            "deletable": true,
            "fields": [
                {"name": "Id", "label": "Account ID", "type": "id", "nillable": false,
                 "unique": false, "createable": false, "updateable": false},
                {"name": "Name", "label": "Account Name", "type": "string", "length": 255,
                 "nillable": false, "createable": true, "updateable": true},
                {"name": "Rating", "label": "Rating", "type": "picklist", "nillable": true,
                 "picklistValues": [
                    {"value": "Hot", "label": "Hot", "active": true, "defaultValue": false}
                 ]},
                {"name": "ParentId", "label": "Parent Account ID", "type": "reference",
                 "referenceTo": ["Account"], "relationshipName": "Parent"},
                {"name": "Industry", "label": "Industry", "type": "picklist", "picklistValues": []}
            ]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_second_lookup_does_not_describe_again() {
        let cache = FieldMetadataCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let entry = cache
                .get_fields("Account", |name| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    assert_eq!(name, "Account");
                    async { Ok(account_describe()) }
                })
                .await
                .unwrap();
            assert_eq!(entry.object_name, "Account");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            cache.stats(),
            CacheStats {
                hits: 1,
                misses: 1,
                size: 1
            }
        );
    }

    #[tokio::test]
    async fn test_normalization() {
        let cache = FieldMetadataCache::new();
        let entry = cache
            .get_fields("Account", |_| async { Ok(account_describe()) })
            .await
            .unwrap();

        assert_eq!(entry.object_info.label_plural.as_deref(), Some("Accounts"));
        assert!(entry.object_info.deletable);

        let by_name = |name: &str| entry.fields.iter().find(|f| f.name == name).unwrap();

        let id = by_name("Id");
        assert!(id.required);
        assert!(id.picklist_values.is_none());
        assert!(id.reference_to.is_none());

        let rating = by_name("Rating");
        assert!(!rating.required);
        assert_eq!(rating.picklist_values.as_ref().unwrap()[0].value, "Hot");

        let parent = by_name("ParentId");
        assert_eq!(parent.reference_to.as_deref(), Some(&["Account".to_string()][..]));
        assert_eq!(parent.relationship_name, Some(Some("Parent".to_string())));

        // Picklist without values gets no picklistValues key.
        let json = serde_json::to_value(by_name("Industry")).unwrap();
        assert!(json.get("picklistValues").is_none());
        assert_eq!(json["externalId"], false);
    }

    #[tokio::test]
    async fn test_not_found_maps_to_object_not_found_and_is_not_cached() {
        let cache = FieldMetadataCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let err = cache
                .get_fields("Nope__c", |name| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async move { Err(Error::new(ErrorKind::NotFound(name))) }
                })
                .await
                .unwrap_err();
            assert!(matches!(err.kind, ErrorKind::ObjectNotFound(ref o) if o == "Nope__c"));
            assert_eq!(err.to_string(), "Object 'Nope__c' not found or not accessible.");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(cache.get("Nope__c").is_none());
    }

    #[tokio::test]
    async fn test_other_failures_map_to_describe_error() {
        let cache = FieldMetadataCache::new();
        let err = cache
            .get_fields("Account", |_| async {
                Err(Error::new(ErrorKind::Client("Request timeout".to_string())))
            })
            .await
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::DescribeError { .. }));
        assert_eq!(
            err.to_string(),
            "Error retrieving fields for Account: Request timeout"
        );
    }

    /// Keeps only the most recently inserted `capacity` keys.
    struct KeepLatest {
        capacity: usize,
        order: VecDeque<String>,
    }

    impl EvictionPolicy for KeepLatest {
        fn on_insert(&mut self, key: &str, len: usize) -> Vec<String> {
            self.order.push_back(key.to_string());
            let mut evicted = Vec::new();
            let mut remaining = len;
            while remaining > self.capacity {
                if let Some(oldest) = self.order.pop_front() {
                    evicted.push(oldest);
                }
                remaining -= 1;
            }
            evicted
        }
    }

    #[tokio::test]
    async fn test_pluggable_eviction_policy() {
        let cache = FieldMetadataCache::with_policy(KeepLatest {
            capacity: 1,
            order: VecDeque::new(),
        });

        for name in ["Account", "Contact"] {
            cache
                .get_fields(name, |_| async { Ok(account_describe()) })
                .await
                .unwrap();
        }

        assert!(cache.get("Account").is_none());
        assert!(cache.get("Contact").is_some());
        assert_eq!(cache.stats().size, 1);
    }
}
