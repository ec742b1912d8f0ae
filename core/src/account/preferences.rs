//! User preference storage and search.

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};

use crate::account::paging::{Page, PageQuery, PageRequest, Sort, SortDirection};
use crate::http::error::{AccessError, ErrorResult};
use crate::http::security::audit::now_millis;

/// Preference searches allow larger pages than the default.
pub const PREFERENCE_MAX_PAGE_SIZE: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preference {
    pub id: String,
    #[serde(default)]
    pub user: String,
    #[serde(rename = "type")]
    pub pref_type: String,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub updated: u64,
}

/// Equality filter over preference fields. Unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceFilter {
    pub user: Option<String>,
    #[serde(rename = "type")]
    pub pref_type: Option<String>,
}

impl PreferenceFilter {
    pub fn for_user(user: impl Into<String>) -> Self {
        PreferenceFilter {
            user: Some(user.into()),
            pref_type: None,
        }
    }

    pub fn pref_type(mut self, pref_type: impl Into<String>) -> Self {
        self.pref_type = Some(pref_type.into());
        self
    }

    pub fn matches(&self, preference: &Preference) -> bool {
        self.user.as_ref().map_or(true, |u| *u == preference.user)
            && self
                .pref_type
                .as_ref()
                .map_or(true, |t| *t == preference.pref_type)
    }
}

#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn count(&self, filter: &PreferenceFilter) -> Result<u64, AccessError>;

    /// Matching preferences, sorted, then `skip` and `limit` applied.
    async fn find(
        &self,
        filter: &PreferenceFilter,
        sort: Option<&Sort>,
        skip: u64,
        limit: Option<u64>,
    ) -> Result<Vec<Preference>, AccessError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Preference>, AccessError>;

    /// Inserts, or replaces the preference with the same id.
    async fn save(&self, preference: Preference) -> Result<(), AccessError>;
}

// =============================================================================
// In-Memory Store
// =============================================================================

#[derive(Clone, Default)]
pub struct InMemoryPreferenceStore {
    preferences: Arc<RwLock<Vec<Preference>>>,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Orders by a top-level field; unknown fields keep insertion order.
fn compare_field(a: &Preference, b: &Preference, field: &str) -> Ordering {
    match field {
        "id" => a.id.cmp(&b.id),
        "user" => a.user.cmp(&b.user),
        "type" => a.pref_type.cmp(&b.pref_type),
        "updated" => a.updated.cmp(&b.updated),
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl PreferenceStore for InMemoryPreferenceStore {
    async fn count(&self, filter: &PreferenceFilter) -> Result<u64, AccessError> {
        let preferences = self.preferences.read().await;
        Ok(preferences.iter().filter(|p| filter.matches(p)).count() as u64)
    }

    async fn find(
        &self,
        filter: &PreferenceFilter,
        sort: Option<&Sort>,
        skip: u64,
        limit: Option<u64>,
    ) -> Result<Vec<Preference>, AccessError> {
        let mut matched: Vec<Preference> = {
            let preferences = self.preferences.read().await;
            preferences
                .iter()
                .filter(|p| filter.matches(p))
                .cloned()
                .collect()
        };

        if let Some(sort) = sort {
            matched.sort_by(|a, b| {
                let ordering = compare_field(a, b, &sort.field);
                match sort.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }

        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        let limit = limit.map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));
        Ok(matched.into_iter().skip(skip).take(limit).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Preference>, AccessError> {
        let preferences = self.preferences.read().await;
        Ok(preferences.iter().find(|p| p.id == id).cloned())
    }

    async fn save(&self, preference: Preference) -> Result<(), AccessError> {
        let mut preferences = self.preferences.write().await;
        match preferences.iter_mut().find(|p| p.id == preference.id) {
            Some(existing) => *existing = preference,
            None => preferences.push(preference),
        }
        Ok(())
    }
}

// =============================================================================
// Preference Service
// =============================================================================

#[derive(Clone)]
pub struct PreferenceService {
    store: Arc<dyn PreferenceStore>,
    // Serializes the ownership check with the write that follows it.
    save_lock: Arc<Mutex<()>>,
}

impl PreferenceService {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        PreferenceService {
            store,
            save_lock: Arc::new(Mutex::new(())),
        }
    }

    /// One page of matching preferences. Count and page are read concurrently.
    pub async fn search(
        &self,
        filter: &PreferenceFilter,
        query: &PageQuery,
    ) -> Result<Page<Preference>, AccessError> {
        let request = PageRequest::from_query(query, PREFERENCE_MAX_PAGE_SIZE);

        let (total, elements) = futures_util::future::try_join(
            self.store.count(filter),
            self.store
                .find(filter, request.sort(), request.skip(), Some(request.size())),
        )
        .await?;

        Ok(Page::new(total, &request, elements))
    }

    /// Every matching preference, unpaged and unsorted.
    pub async fn search_all(
        &self,
        filter: &PreferenceFilter,
    ) -> Result<Vec<Preference>, AccessError> {
        self.store.find(filter, None, 0, None).await
    }

    pub async fn save(&self, preference: Preference) -> Result<(), AccessError> {
        let _guard = self.save_lock.lock().await;
        self.store.save(preference).await
    }

    /// Saves `preference` as `owner`'s, stamping the owner and update time.
    ///
    /// An id already held by another user is refused with a 403 and the
    /// stored preference is left as it was.
    pub async fn save_for(
        &self,
        owner: &str,
        mut preference: Preference,
    ) -> Result<Preference, ErrorResult> {
        preference.user = owner.to_string();
        preference.updated = now_millis();

        let _guard = self.save_lock.lock().await;
        if let Some(existing) = self.store.find_by_id(&preference.id).await? {
            if existing.user != owner {
                tracing::warn!(
                    id = %preference.id,
                    owner = %existing.user,
                    user = owner,
                    "refused to overwrite another user's preference"
                );
                return Err(ErrorResult::new(403, "Preference belongs to another user"));
            }
        }
        self.store.save(preference.clone()).await?;
        Ok(preference)
    }
}
