use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use log::debug;

use crate::api::RosterApi;
use crate::errors::AppError;
use crate::models::employee::Employee;
use crate::models::team::Team;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKey {
    Teams,
    Employees,
}

impl fmt::Display for CollectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionKey::Teams => f.write_str("teams"),
            CollectionKey::Employees => f.write_str("employees"),
        }
    }
}

struct Slot<T> {
    value: Option<Arc<Vec<T>>>,
    generation: u64,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Slot { value: None, generation: 0 }
    }
}

/// Read cache for the flat collections.
///
/// A read of a stale collection refetches it. A fetch that was started before
/// an invalidation never repopulates the slot.
#[derive(Default)]
pub struct QueryCache {
    teams: Mutex<Slot<Team>>,
    employees: Mutex<Slot<Employee>>,
}

impl QueryCache {
    pub fn new() -> Self {
        QueryCache::default()
    }

    pub async fn teams(&self, api: &dyn RosterApi) -> Result<Arc<Vec<Team>>, AppError> {
        read_through(&self.teams, CollectionKey::Teams, || api.list_teams()).await
    }

    pub async fn employees(&self, api: &dyn RosterApi) -> Result<Arc<Vec<Employee>>, AppError> {
        read_through(&self.employees, CollectionKey::Employees, || api.list_employees()).await
    }

    pub fn invalidate(&self, key: CollectionKey) {
        debug!("invalidating cached {}", key);
        match key {
            CollectionKey::Teams => mark_stale(&self.teams),
            CollectionKey::Employees => mark_stale(&self.employees),
        }
    }
}

fn lock<T>(slot: &Mutex<Slot<T>>) -> std::sync::MutexGuard<'_, Slot<T>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

fn mark_stale<T>(slot: &Mutex<Slot<T>>) {
    let mut slot = lock(slot);
    slot.value = None;
    slot.generation += 1;
}

async fn read_through<T, F, Fut>(slot: &Mutex<Slot<T>>, key: CollectionKey, fetch: F) -> Result<Arc<Vec<T>>, AppError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<T>, AppError>>,
{
    let generation = {
        let slot = lock(slot);
        if let Some(value) = &slot.value {
            return Ok(Arc::clone(value));
        }
        slot.generation
    };

    debug!("fetching {}", key);
    let fresh = Arc::new(fetch().await?);

    let mut slot = lock(slot);
    if slot.generation == generation {
        slot.value = Some(Arc::clone(&fresh));
    }
    Ok(fresh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn team(id: &str) -> Team {
        Team { id: id.to_string(), name: id.to_string(), parent_team_id: None }
    }

    #[tokio::test]
    async fn second_read_is_served_from_cache() {
        let slot = Mutex::new(Slot::default());
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let fetch = move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, AppError>(vec![team("a")])
        };

        read_through(&slot, CollectionKey::Teams, fetch).await.unwrap();
        read_through(&slot, CollectionKey::Teams, fetch).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        mark_stale(&slot);
        read_through(&slot, CollectionKey::Teams, fetch).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn fetch_racing_an_invalidation_is_not_stored() {
        let slot = Mutex::new(Slot::default());
        let shared = &slot;
        let result = read_through(shared, CollectionKey::Teams, move || async move {
            mark_stale(shared);
            Ok::<_, AppError>(vec![team("old")])
        })
        .await
        .unwrap();

        assert_eq!(result[0].id, "old");
        assert!(lock(&slot).value.is_none());
    }

    #[tokio::test]
    async fn failed_fetch_leaves_slot_empty() {
        let slot: Mutex<Slot<Team>> = Mutex::new(Slot::default());
        let err = read_through(&slot, CollectionKey::Teams, || async {
            Err::<Vec<Team>, _>(AppError::Api { status: 500, endpoint: "/teams".to_string() })
        })
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Api { status: 500, .. }));
        assert!(lock(&slot).value.is_none());
    }
}
