//! Per-second admission control for `/generate-insights`.
//!
//! Each insight run embeds every section four times, so bursts are refused
//! early with 429 instead of queueing on the blocking pool. The window second
//! and the admitted count share one atomic word, so a window rollover and the
//! first admission in it happen in a single compare-exchange.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::{Extension, Request};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::debug;

use crate::error::ErrorBody;

const COUNT_BITS: u32 = 32;
const COUNT_MASK: u64 = (1 << COUNT_BITS) - 1;

fn pack(window: u64, admitted: u64) -> u64 {
    (window << COUNT_BITS) | (admitted & COUNT_MASK)
}

fn unpack(word: u64) -> (u64, u64) {
    (word >> COUNT_BITS, word & COUNT_MASK)
}

/// Admission gate shared by every clone of the router.
#[derive(Clone)]
pub struct RateLimiter {
    /// Runs admitted per second; zero admits everything.
    max_per_sec: u64,
    /// Window second (high half) and admitted count (low half).
    state: Arc<AtomicU64>,
}

impl RateLimiter {
    pub fn new(max_per_sec: u64) -> Self {
        Self {
            max_per_sec: max_per_sec.min(COUNT_MASK),
            state: Arc::new(AtomicU64::new(0)),
        }
    }

    fn admit(&self) -> bool {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        self.admit_at(now)
    }

    /// Admit one run at epoch second `now_secs`.
    fn admit_at(&self, now_secs: u64) -> bool {
        if self.max_per_sec == 0 {
            return true;
        }
        let window = now_secs & COUNT_MASK;

        self.state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |word| {
                let (current, admitted) = unpack(word);
                if current != window {
                    Some(pack(window, 1))
                } else if admitted < self.max_per_sec {
                    Some(pack(window, admitted + 1))
                } else {
                    None
                }
            })
            .is_ok()
    }
}

/// Refuse the request with 429 when the current second is full.
pub async fn rate_limit_middleware(
    Extension(limiter): Extension<RateLimiter>,
    req: Request,
    next: Next,
) -> Response {
    if limiter.admit() {
        return next.run(req).await;
    }

    debug!(path = %req.uri().path(), "Insight run refused, rate limit reached");
    (
        StatusCode::TOO_MANY_REQUESTS,
        [(header::RETRY_AFTER, "1")],
        Json(ErrorBody {
            error: "too_many_requests".to_string(),
            message: format!("At most {} insight runs per second", limiter.max_per_sec),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_roundtrip() {
        assert_eq!(unpack(pack(1_700_000_000, 3)), (1_700_000_000, 3));
    }

    #[test]
    fn test_second_fills_up() {
        let limiter = RateLimiter::new(2);
        assert!(limiter.admit_at(100));
        assert!(limiter.admit_at(100));
        assert!(!limiter.admit_at(100));
        assert!(!limiter.admit_at(100));
    }

    #[test]
    fn test_next_second_admits_again() {
        let limiter = RateLimiter::new(1);
        assert!(limiter.admit_at(100));
        assert!(!limiter.admit_at(100));
        assert!(limiter.admit_at(101));
        assert!(!limiter.admit_at(101));
    }

    #[test]
    fn test_zero_admits_everything() {
        let limiter = RateLimiter::new(0);
        assert!((0..50).all(|_| limiter.admit_at(7)));
    }

    #[test]
    fn test_clones_share_one_budget() {
        let limiter = RateLimiter::new(3);
        let clones: Vec<RateLimiter> = (0..3).map(|_| limiter.clone()).collect();
        assert!(clones.iter().all(|l| l.admit_at(5)));
        assert!(!limiter.admit_at(5));
    }

    #[test]
    fn test_concurrent_admissions_never_exceed_limit() {
        let limiter = RateLimiter::new(10);
        let admitted: usize = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let limiter = limiter.clone();
                    scope.spawn(move || (0..20).filter(|_| limiter.admit_at(42)).count())
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).sum()
        });
        assert_eq!(admitted, 10);
    }
}
