//! Group activity aggregation
//!
//! Rolling, day/hour-bucketed counters of per-group message activity.
//! Counters only ever increase inside the retention window; eviction drops
//! whole days. The store sits behind a std `RwLock` with short, non-await
//! critical sections: one write lock per recorded message (so an increment
//! is atomic with respect to concurrent increments), read locks for every
//! query, and the sweep takes the write lock for the duration of eviction.

use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::event::api::MessageKind;

/// How many users a report lists at most
const TOP_USERS: usize = 10;

#[derive(Default)]
struct DayBucket {
    total: u32,
    per_user: HashMap<i64, u32>,
    per_kind: HashMap<MessageKind, u32>,
    per_hour: [u32; 24],
}

#[derive(Default)]
struct GroupActivity {
    days: BTreeMap<NaiveDate, DayBucket>,
}

/// Per-day slice of a report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyStat {
    pub date: NaiveDate,
    pub messages: u32,
    pub active_users: usize,
}

/// Aggregated activity summary over a requested window
#[derive(Debug, Clone)]
pub struct ActivityReport {
    pub group_id: i64,
    /// Days actually covered, after clamping to retention
    pub days: u32,
    /// True when the requested window exceeded retention
    pub truncated: bool,
    pub total_messages: u32,
    pub active_users: usize,
    /// (user, message count), highest first, capped at ten entries
    pub top_users: Vec<(i64, u32)>,
    /// (message kind, count), highest first
    pub kinds: Vec<(MessageKind, u32)>,
    /// (hour of day, count), highest first, zero hours omitted
    pub peak_hours: Vec<(u32, u32)>,
    /// One entry per day in the window, oldest first, zero-filled
    pub daily: Vec<DailyStat>,
}

pub struct ActivityAggregator {
    retention_days: u32,
    groups: RwLock<HashMap<i64, GroupActivity>>,
}

impl ActivityAggregator {
    pub fn new(retention_days: u32) -> Self {
        Self {
            retention_days,
            groups: RwLock::new(HashMap::new()),
        }
    }

    pub fn retention_days(&self) -> u32 {
        self.retention_days
    }

    // A poisoned lock only means a panic elsewhere while holding it; the
    // counters themselves cannot be left torn (increments don't panic), so
    // recover the guard instead of propagating the poison.
    fn read_store(&self) -> RwLockReadGuard<'_, HashMap<i64, GroupActivity>> {
        self.groups.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_store(&self) -> RwLockWriteGuard<'_, HashMap<i64, GroupActivity>> {
        self.groups.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record one message into the (group, user, day, hour, kind) buckets.
    pub fn record(&self, group_id: i64, user_id: i64, kind: MessageKind, time: DateTime<Utc>) {
        let date = time.date_naive();
        let hour = time.hour() as usize;

        let mut groups = self.write_store();
        let bucket = groups
            .entry(group_id)
            .or_default()
            .days
            .entry(date)
            .or_default();
        bucket.total += 1;
        *bucket.per_user.entry(user_id).or_insert(0) += 1;
        *bucket.per_kind.entry(kind).or_insert(0) += 1;
        bucket.per_hour[hour] += 1;
    }

    /// Distinct users with at least one message in the group that day.
    pub fn daily_active_users(&self, group_id: i64, day: NaiveDate) -> usize {
        let groups = self.read_store();
        groups
            .get(&group_id)
            .and_then(|group| group.days.get(&day))
            .map(|bucket| bucket.per_user.len())
            .unwrap_or(0)
    }

    /// Per-day message counts for one user across the retained window,
    /// oldest first. Days without activity are omitted.
    pub fn user_activity(&self, group_id: i64, user_id: i64) -> Vec<(NaiveDate, u32)> {
        let groups = self.read_store();
        let Some(group) = groups.get(&group_id) else {
            return Vec::new();
        };
        group
            .days
            .iter()
            .filter_map(|(date, bucket)| {
                bucket.per_user.get(&user_id).map(|count| (*date, *count))
            })
            .collect()
    }

    /// Aggregate per-hour counts across the full retained window, ordered
    /// by hour of day.
    pub fn trend(&self, group_id: i64) -> Vec<(u32, u32)> {
        let groups = self.read_store();
        let mut hours = [0u32; 24];
        if let Some(group) = groups.get(&group_id) {
            for bucket in group.days.values() {
                for (hour, count) in bucket.per_hour.iter().enumerate() {
                    hours[hour] += count;
                }
            }
        }
        hours
            .iter()
            .enumerate()
            .map(|(hour, count)| (hour as u32, *count))
            .collect()
    }

    /// Summarize the last `n_days` ending at `today` (inclusive). A window
    /// wider than retention is clamped and flagged as truncated.
    pub fn report(&self, group_id: i64, n_days: u32, today: NaiveDate) -> ActivityReport {
        let truncated = n_days > self.retention_days;
        let days = n_days.min(self.retention_days).max(1);
        let start = today - Duration::days(i64::from(days) - 1);

        let groups = self.read_store();
        let empty = GroupActivity::default();
        let group = groups.get(&group_id).unwrap_or(&empty);

        let mut total_messages = 0u32;
        let mut user_counts: HashMap<i64, u32> = HashMap::new();
        let mut kind_counts: HashMap<MessageKind, u32> = HashMap::new();
        let mut hour_counts = [0u32; 24];
        let mut daily = Vec::with_capacity(days as usize);

        for offset in 0..days {
            let date = start + Duration::days(i64::from(offset));
            match group.days.get(&date) {
                Some(bucket) => {
                    total_messages += bucket.total;
                    for (user, count) in &bucket.per_user {
                        *user_counts.entry(*user).or_insert(0) += count;
                    }
                    for (kind, count) in &bucket.per_kind {
                        *kind_counts.entry(*kind).or_insert(0) += count;
                    }
                    for (hour, count) in bucket.per_hour.iter().enumerate() {
                        hour_counts[hour] += count;
                    }
                    daily.push(DailyStat {
                        date,
                        messages: bucket.total,
                        active_users: bucket.per_user.len(),
                    });
                }
                None => daily.push(DailyStat {
                    date,
                    messages: 0,
                    active_users: 0,
                }),
            }
        }

        let active_users = user_counts.len();

        let mut top_users: Vec<(i64, u32)> = user_counts.into_iter().collect();
        top_users.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        top_users.truncate(TOP_USERS);

        let mut kinds: Vec<(MessageKind, u32)> = kind_counts.into_iter().collect();
        kinds.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        let mut peak_hours: Vec<(u32, u32)> = hour_counts
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(hour, count)| (hour as u32, *count))
            .collect();
        peak_hours.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        ActivityReport {
            group_id,
            days,
            truncated,
            total_messages,
            active_users,
            top_users,
            kinds,
            peak_hours,
            daily,
        }
    }

    /// Evict day buckets older than the retention horizon. Returns the
    /// number of (group, day) buckets dropped.
    pub fn sweep(&self, today: NaiveDate) -> usize {
        let cutoff = today - Duration::days(i64::from(self.retention_days));
        let mut groups = self.write_store();

        let mut evicted = 0;
        groups.retain(|group_id, group| {
            let before = group.days.len();
            group.days.retain(|date, _| *date >= cutoff);
            let dropped = before - group.days.len();
            if dropped > 0 {
                log::debug!("evicted {} stale day buckets for group {}", dropped, group_id);
            }
            evicted += dropped;
            !group.days.is_empty()
        });

        if evicted > 0 {
            log::info!("activity sweep evicted {} day buckets", evicted);
        }
        evicted
    }
}
