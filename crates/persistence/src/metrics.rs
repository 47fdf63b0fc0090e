//! Database metrics collection.

use metrics::{counter, gauge, histogram};
use sqlx::PgPool;
use std::future::Future;
use std::time::Instant;

/// Record how long a named store query took.
pub fn record_query_duration(query_name: &str, duration_secs: f64) {
    histogram!(
        "cms_store_query_duration_seconds",
        "query" => query_name.to_string()
    )
    .record(duration_secs);
}

/// Count a failed store operation by error kind
/// (`unique_violation`, `foreign_key_violation`, `unavailable`, `corrupt_row`).
pub fn record_store_error(kind: &'static str) {
    counter!("cms_store_errors_total", "kind" => kind).increment(1);
}

/// Record connection pool gauges. Called on every metrics scrape.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();
    let active = size.saturating_sub(idle);

    gauge!("cms_store_connections_active").set(active as f64);
    gauge!("cms_store_connections_idle").set(idle as f64);
    gauge!("cms_store_connections_total").set(size as f64);
}

/// Times a store query and records it on [`QueryTimer::record`].
///
/// ```ignore
/// let timer = QueryTimer::new("find_page_by_id");
/// let result = sqlx::query_as::<_, PageEntity>(...).fetch_optional(&pool).await;
/// timer.record();
/// ```
pub struct QueryTimer {
    query_name: String,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query_name: impl Into<String>) -> Self {
        Self {
            query_name: query_name.into(),
            start: Instant::now(),
        }
    }

    pub fn record(self) {
        record_query_duration(&self.query_name, self.start.elapsed().as_secs_f64());
    }
}

/// Awaits `fut` and records its duration under `query_name`, also when it
/// fails part-way. Used for multi-statement transactions with several `?`
/// exits.
pub async fn timed<F: Future>(query_name: &str, fut: F) -> F::Output {
    let timer = QueryTimer::new(query_name);
    let output = fut.await;
    timer.record();
    output
}
