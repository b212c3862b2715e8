//! Per-client Rate Limiting
//!
//! Sliding-window limiter partitioned by client address. The window is split
//! into equal segments; a request is admitted while the sum of the counts of
//! the segments still inside the window is below the permit limit.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

/// Partitions are pruned once the table grows past this size
const PRUNE_THRESHOLD: usize = 10_000;

struct Partition {
    /// Index of the segment `counts` was last advanced to
    segment: u64,
    counts: Vec<u32>,
}

pub struct SlidingWindowLimiter {
    name: &'static str,
    permit_limit: u32,
    segment_len: Duration,
    segments: usize,
    epoch: Instant,
    partitions: Mutex<HashMap<String, Partition>>,
}

impl SlidingWindowLimiter {
    pub fn new(name: &'static str, permit_limit: u32, window: Duration, segments: usize) -> Self {
        let segments = segments.max(1);
        let segment_len = (window / segments as u32).max(Duration::from_millis(1));

        Self {
            name,
            permit_limit,
            segment_len,
            segments,
            epoch: Instant::now(),
            partitions: Mutex::new(HashMap::new()),
        }
    }

    /// `permit_limit` requests per minute, two segments per window
    pub fn per_minute(name: &'static str, permit_limit: u32) -> Self {
        Self::new(name, permit_limit, Duration::from_secs(60), 2)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn try_acquire(&self, key: &str) -> bool {
        self.try_acquire_at(key, Instant::now())
    }

    /// Admit or reject one request for `key` at time `now`
    pub fn try_acquire_at(&self, key: &str, now: Instant) -> bool {
        let segment = (now.saturating_duration_since(self.epoch).as_nanos()
            / self.segment_len.as_nanos()) as u64;

        let mut partitions = match self.partitions.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if partitions.len() > PRUNE_THRESHOLD {
            let horizon = self.segments as u64;
            partitions.retain(|_, p| segment.saturating_sub(p.segment) < horizon);
        }

        let partition = partitions
            .entry(key.to_string())
            .or_insert_with(|| Partition {
                segment,
                counts: vec![0; self.segments],
            });

        self.advance(partition, segment);

        let in_window: u32 = partition.counts.iter().sum();
        if in_window >= self.permit_limit {
            return false;
        }

        partition.counts[(segment % self.segments as u64) as usize] += 1;
        true
    }

    /// Clear the slots of segments that slid out of the window
    fn advance(&self, partition: &mut Partition, segment: u64) {
        if segment <= partition.segment {
            return;
        }

        let steps = segment - partition.segment;
        if steps >= self.segments as u64 {
            partition.counts.iter_mut().for_each(|count| *count = 0);
        } else {
            for step in 1..=steps {
                let slot = ((partition.segment + step) % self.segments as u64) as usize;
                partition.counts[slot] = 0;
            }
        }
        partition.segment = segment;
    }
}

/// Partition key: the `X-Forwarded-For` entry appended by the nearest proxy
/// (the last one), else the peer address. Earlier entries are caller-supplied.
pub fn client_key(headers: &HeaderMap, peer: Option<IpAddr>) -> String {
    if let Some(nearest) = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| {
            value
                .rsplit(',')
                .map(str::trim)
                .find(|entry| !entry.is_empty())
        })
    {
        return nearest.to_string();
    }

    match peer {
        Some(ip) => ip.to_string(),
        None => "unknown".to_string(),
    }
}

/// Middleware: answer 429 once the caller exhausts the limiter's window
pub async fn enforce(
    State(limiter): State<Arc<SlidingWindowLimiter>>,
    req: Request,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    let key = client_key(req.headers(), peer);

    if !limiter.try_acquire(&key) {
        tracing::warn!(policy = limiter.name(), client = %key, "Rate limit exceeded");
        return Err((
            StatusCode::TOO_MANY_REQUESTS,
            "Too many requests".to_string(),
        ));
    }

    Ok(next.run(req).await)
}
