use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::booking::PendingBooking;

/// In-memory store of staged bookings, one per user. A new slot request
/// overwrites any existing draft (last request wins), and entries older
/// than the TTL are treated as absent so abandoned drafts cannot pile up.
#[derive(Clone)]
pub struct PendingStore {
    entries: Arc<RwLock<HashMap<Uuid, PendingBooking>>>,
    ttl: Duration,
}

impl PendingStore {
    pub fn new(ttl_minutes: i64) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    fn is_stale(&self, pending: &PendingBooking) -> bool {
        Utc::now() - pending.created_at > self.ttl
    }

    pub async fn put(&self, user_id: Uuid, pending: PendingBooking) {
        let mut entries = self.entries.write().await;
        // Already holding the write lock, so sweep expired drafts left by
        // users who never came back for theirs.
        entries.retain(|_, p| !self.is_stale(p));
        entries.insert(user_id, pending);
    }

    pub async fn get(&self, user_id: Uuid) -> Option<PendingBooking> {
        {
            let entries = self.entries.read().await;
            match entries.get(&user_id) {
                None => return None,
                Some(p) if !self.is_stale(p) => return Some(p.clone()),
                Some(_) => {}
            }
        }
        // Stale entry: reap it under the write lock.
        let mut entries = self.entries.write().await;
        if let Some(p) = entries.get(&user_id) {
            if self.is_stale(p) {
                entries.remove(&user_id);
                return None;
            }
            return Some(p.clone());
        }
        None
    }

    /// Removes and returns the user's draft, consuming it for a confirm.
    pub async fn take(&self, user_id: Uuid) -> Option<PendingBooking> {
        let mut entries = self.entries.write().await;
        let pending = entries.remove(&user_id)?;
        if self.is_stale(&pending) {
            return None;
        }
        Some(pending)
    }

    /// Explicit abandon. Returns whether a draft existed.
    pub async fn clear(&self, user_id: Uuid) -> bool {
        let mut entries = self.entries.write().await;
        entries.remove(&user_id).is_some()
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn pending(turf_name: &str, start_hour: i32) -> PendingBooking {
        PendingBooking {
            turf_id: Uuid::new_v4(),
            turf_name: turf_name.into(),
            turf_location: "Koramangala".into(),
            price_per_hour: 1200,
            booking_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            start_hour,
            end_hour: start_hour + 1,
            duration_hours: 1,
            total_amount: 1200,
            sport: "Football".into(),
            players: 10,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn put_then_get_returns_the_draft() {
        let store = PendingStore::new(15);
        let user = Uuid::new_v4();
        store.put(user, pending("Green Arena", 9)).await;

        let got = store.get(user).await.unwrap();
        assert_eq!(got.turf_name, "Green Arena");
        assert_eq!(got.start_hour, 9);
    }

    #[tokio::test]
    async fn one_draft_per_user_last_request_wins() {
        let store = PendingStore::new(15);
        let user = Uuid::new_v4();
        store.put(user, pending("Green Arena", 9)).await;
        store.put(user, pending("Hoops Arena", 17)).await;

        let got = store.get(user).await.unwrap();
        assert_eq!(got.turf_name, "Hoops Arena");
        assert_eq!(got.start_hour, 17);
    }

    #[tokio::test]
    async fn drafts_are_isolated_per_user() {
        let store = PendingStore::new(15);
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        store.put(a, pending("Green Arena", 9)).await;

        assert!(store.get(a).await.is_some());
        assert!(store.get(b).await.is_none());
    }

    #[tokio::test]
    async fn take_consumes_the_draft() {
        let store = PendingStore::new(15);
        let user = Uuid::new_v4();
        store.put(user, pending("Green Arena", 9)).await;

        assert!(store.take(user).await.is_some());
        assert!(store.take(user).await.is_none());
        assert!(store.get(user).await.is_none());
    }

    #[tokio::test]
    async fn clear_reports_whether_a_draft_existed() {
        let store = PendingStore::new(15);
        let user = Uuid::new_v4();
        assert!(!store.clear(user).await);

        store.put(user, pending("Green Arena", 9)).await;
        assert!(store.clear(user).await);
        assert!(store.get(user).await.is_none());
    }

    #[tokio::test]
    async fn expired_draft_is_treated_as_absent() {
        // Zero TTL: anything already written has expired.
        let store = PendingStore::new(0);
        let user = Uuid::new_v4();
        let mut p = pending("Green Arena", 9);
        p.created_at = Utc::now() - Duration::seconds(1);
        store.put(user, p).await;

        assert!(store.get(user).await.is_none());
        assert!(store.take(user).await.is_none());
    }

    #[tokio::test]
    async fn put_sweeps_other_users_expired_drafts() {
        let store = PendingStore::new(15);
        let (gone_user, active_user) = (Uuid::new_v4(), Uuid::new_v4());
        let mut abandoned = pending("Green Arena", 9);
        abandoned.created_at = Utc::now() - Duration::minutes(16);
        store.put(gone_user, abandoned).await;

        store.put(active_user, pending("Hoops Arena", 17)).await;

        // The abandoned draft is gone from the map, not just hidden.
        assert_eq!(store.len().await, 1);
        assert!(store.get(gone_user).await.is_none());
        assert!(store.get(active_user).await.is_some());
    }
}
