//! Shared metrics state.
//!
//! Constructed once at start-up and handed to every recorder by `Arc`.
//! Counters are atomics; floating accumulators are `f64` bit patterns in
//! atomics. Increments racing a snapshot may land in the next one.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashSet;

/// Request counts by verb.
#[derive(Debug, Default)]
struct HttpCounters {
    total: AtomicU64,
    get: AtomicU64,
    post: AtomicU64,
    put: AtomicU64,
    delete: AtomicU64,
}

/// Process-wide metric state.
#[derive(Debug, Default)]
pub struct MetricsAggregator {
    http: HttpCounters,
    active_users: DashSet<String>,
    auth_success: AtomicU64,
    auth_failure: AtomicU64,
    pizzas_sold: AtomicU64,
    pizza_failures: AtomicU64,
    revenue: AtomicU64,
    latency_sum: AtomicU64,
    latency_count: AtomicU64,
}

impl MetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a finished request. Only GET, POST, PUT and DELETE get their
    /// own counter; every method counts towards the total.
    pub fn record_http_request(&self, method: &str) {
        self.http.total.fetch_add(1, Ordering::Relaxed);

        let counter = match method.to_ascii_uppercase().as_str() {
            "GET" => &self.http.get,
            "POST" => &self.http.post,
            "PUT" => &self.http.put,
            "DELETE" => &self.http.delete,
            _ => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an authentication attempt.
    ///
    /// Success marks `user_id` active. Failure removes it from the active set.
    /// Callers use the failure path both for rejected logins and for logouts,
    /// so a failure count does not distinguish the two.
    pub fn record_auth_attempt(&self, success: bool, user_id: &str) {
        if success {
            self.auth_success.fetch_add(1, Ordering::Relaxed);
            self.active_users.insert(user_id.to_string());
        } else {
            self.auth_failure.fetch_add(1, Ordering::Relaxed);
            self.active_users.remove(user_id);
        }
    }

    /// Record a pizza order. Latency and revenue only count on success.
    pub fn record_pizza_purchase(&self, success: bool, latency_ms: f64, price: f64) {
        if success {
            self.pizzas_sold.fetch_add(1, Ordering::Relaxed);
            add_f64(&self.revenue, price);
            add_f64(&self.latency_sum, latency_ms);
            self.latency_count.fetch_add(1, Ordering::Relaxed);
        } else {
            self.pizza_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn is_active(&self, user_id: &str) -> bool {
        self.active_users.contains(user_id)
    }

    /// Read the current values.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            http: HttpCounts {
                total: self.http.total.load(Ordering::Relaxed),
                get: self.http.get.load(Ordering::Relaxed),
                post: self.http.post.load(Ordering::Relaxed),
                put: self.http.put.load(Ordering::Relaxed),
                delete: self.http.delete.load(Ordering::Relaxed),
            },
            active_users: self.active_users.len(),
            auth_success: self.auth_success.load(Ordering::Relaxed),
            auth_failure: self.auth_failure.load(Ordering::Relaxed),
            pizzas_sold: self.pizzas_sold.load(Ordering::Relaxed),
            pizza_failures: self.pizza_failures.load(Ordering::Relaxed),
            revenue: load_f64(&self.revenue),
            latency_sum: load_f64(&self.latency_sum),
            latency_count: self.latency_count.load(Ordering::Relaxed),
        }
    }
}

fn add_f64(cell: &AtomicU64, delta: f64) {
    // The closure never returns None, so fetch_update cannot fail.
    let _ = cell.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |bits| {
        Some((f64::from_bits(bits) + delta).to_bits())
    });
}

fn load_f64(cell: &AtomicU64) -> f64 {
    f64::from_bits(cell.load(Ordering::Relaxed))
}

/// Request counts at snapshot time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HttpCounts {
    pub total: u64,
    pub get: u64,
    pub post: u64,
    pub put: u64,
    pub delete: u64,
}

/// Point-in-time copy of the aggregator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsSnapshot {
    pub http: HttpCounts,
    pub active_users: usize,
    pub auth_success: u64,
    pub auth_failure: u64,
    pub pizzas_sold: u64,
    pub pizza_failures: u64,
    pub revenue: f64,
    pub latency_sum: f64,
    pub latency_count: u64,
}

impl MetricsSnapshot {
    /// Mean pizza creation latency, or 0 with no samples.
    pub fn average_pizza_latency(&self) -> f64 {
        if self.latency_count == 0 {
            0.0
        } else {
            self.latency_sum / self.latency_count as f64
        }
    }
}
