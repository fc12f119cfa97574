use crate::config::RateLimitConfig;
use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

const MINUTE_WINDOW_SECS: i64 = 60;
const HOUR_WINDOW_SECS: i64 = 3_600;
const HOURLY_BLOCK_SECS: i64 = 1_800;

/// Per-client budgets over rolling windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub per_minute: u32,
    pub per_hour: u32,
    /// How long a client stays blocked after exhausting the hourly budget.
    pub block_secs: i64,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            per_minute: 30,
            per_hour: 200,
            block_secs: HOURLY_BLOCK_SECS,
        }
    }
}

impl From<&RateLimitConfig> for RateLimitPolicy {
    fn from(config: &RateLimitConfig) -> Self {
        Self {
            per_minute: config.per_minute,
            per_hour: config.per_hour,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDenial {
    Blocked,
    HourlyLimit,
    MinuteLimit,
}

impl RateLimitDenial {
    pub const fn message(self) -> &'static str {
        match self {
            Self::Blocked => "Rate limit exceeded. Please try again later.",
            Self::HourlyLimit => "Hourly rate limit exceeded",
            Self::MinuteLimit => "Per-minute rate limit exceeded",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    Denied {
        reason: RateLimitDenial,
        retry_after: u64,
    },
}

impl RateLimitDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Request history per client. Only admitted requests are recorded.
pub trait RateLimitStore: Send + Sync {
    fn admit(&self, client_id: &str, policy: &RateLimitPolicy, now: DateTime<Utc>)
        -> RateLimitDecision;
}

#[derive(Debug, Default)]
struct ClientWindow {
    requests: VecDeque<DateTime<Utc>>,
    blocked_until: Option<DateTime<Utc>>,
}

impl ClientWindow {
    fn prune(&mut self, now: DateTime<Utc>) {
        let horizon = Duration::seconds(HOUR_WINDOW_SECS);
        while let Some(oldest) = self.requests.front() {
            if now - *oldest >= horizon {
                self.requests.pop_front();
            } else {
                break;
            }
        }
    }

    fn is_idle(&self, now: DateTime<Utc>) -> bool {
        self.requests.is_empty() && self.blocked_until.map_or(true, |until| until <= now)
    }
}

/// Process-local store. Clients with no request inside the hourly window and no active block
/// are evicted on every admission.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRateLimitStore {
    clients: Arc<Mutex<HashMap<String, ClientWindow>>>,
}

impl InMemoryRateLimitStore {
    pub fn tracked_clients(&self) -> usize {
        self.clients
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl RateLimitStore for InMemoryRateLimitStore {
    fn admit(
        &self,
        client_id: &str,
        policy: &RateLimitPolicy,
        now: DateTime<Utc>,
    ) -> RateLimitDecision {
        let mut clients = self.clients.lock().unwrap_or_else(PoisonError::into_inner);

        clients.retain(|id, window| {
            window.prune(now);
            id == client_id || !window.is_idle(now)
        });

        let window = clients.entry(client_id.to_string()).or_default();

        if let Some(until) = window.blocked_until {
            if now < until {
                let remaining = (until - now).num_seconds().max(1);
                return RateLimitDecision::Denied {
                    reason: RateLimitDenial::Blocked,
                    retry_after: remaining.unsigned_abs(),
                };
            }
            window.blocked_until = None;
        }

        if window.requests.len() >= policy.per_hour as usize {
            window.blocked_until = Some(now + Duration::seconds(policy.block_secs));
            return RateLimitDecision::Denied {
                reason: RateLimitDenial::HourlyLimit,
                retry_after: policy.block_secs.unsigned_abs(),
            };
        }

        let minute = Duration::seconds(MINUTE_WINDOW_SECS);
        let recent = window
            .requests
            .iter()
            .rev()
            .take_while(|at| now - **at < minute)
            .count();
        if recent >= policy.per_minute as usize {
            return RateLimitDecision::Denied {
                reason: RateLimitDenial::MinuteLimit,
                retry_after: MINUTE_WINDOW_SECS.unsigned_abs(),
            };
        }

        window.requests.push_back(now);
        RateLimitDecision::Allowed
    }
}

/// Applies a policy against a shared store.
#[derive(Debug)]
pub struct RateLimiter<L> {
    store: Arc<L>,
    policy: RateLimitPolicy,
}

impl<L> Clone for RateLimiter<L> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            policy: self.policy,
        }
    }
}

impl<L: RateLimitStore> RateLimiter<L> {
    pub fn new(store: Arc<L>, policy: RateLimitPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &RateLimitPolicy {
        &self.policy
    }

    pub fn check(&self, client_id: &str) -> RateLimitDecision {
        self.check_at(client_id, Utc::now())
    }

    pub fn check_at(&self, client_id: &str, now: DateTime<Utc>) -> RateLimitDecision {
        self.store.admit(client_id, &self.policy, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0)
            .single()
            .expect("valid instant")
    }

    fn limiter(
        per_minute: u32,
        per_hour: u32,
    ) -> (RateLimiter<InMemoryRateLimitStore>, InMemoryRateLimitStore) {
        let store = InMemoryRateLimitStore::default();
        let policy = RateLimitPolicy {
            per_minute,
            per_hour,
            ..RateLimitPolicy::default()
        };
        (RateLimiter::new(Arc::new(store.clone()), policy), store)
    }

    #[test]
    fn thirty_first_request_in_a_minute_is_denied() {
        let (limiter, _) = limiter(30, 200);
        let now = start();
        for offset in 0..30 {
            assert!(limiter
                .check_at("10.0.0.1", now + Duration::seconds(offset))
                .is_allowed());
        }

        assert_eq!(
            limiter.check_at("10.0.0.1", now + Duration::seconds(30)),
            RateLimitDecision::Denied {
                reason: RateLimitDenial::MinuteLimit,
                retry_after: 60,
            }
        );
        assert!(limiter.check_at("10.0.0.2", now).is_allowed());
    }

    #[test]
    fn minute_window_rolls_forward() {
        let (limiter, _) = limiter(2, 200);
        let now = start();
        assert!(limiter.check_at("client", now).is_allowed());
        assert!(limiter.check_at("client", now).is_allowed());
        assert!(!limiter.check_at("client", now + Duration::seconds(59)).is_allowed());
        assert!(limiter.check_at("client", now + Duration::seconds(60)).is_allowed());
    }

    #[test]
    fn exhausting_the_hour_blocks_for_thirty_minutes() {
        let (limiter, _) = limiter(1_000, 3);
        let now = start();
        for offset in 0..3 {
            assert!(limiter
                .check_at("client", now + Duration::seconds(offset))
                .is_allowed());
        }

        assert_eq!(
            limiter.check_at("client", now + Duration::seconds(10)),
            RateLimitDecision::Denied {
                reason: RateLimitDenial::HourlyLimit,
                retry_after: 1_800,
            }
        );
        assert_eq!(
            limiter.check_at("client", now + Duration::seconds(610)),
            RateLimitDecision::Denied {
                reason: RateLimitDenial::Blocked,
                retry_after: 1_200,
            }
        );
    }

    #[test]
    fn block_expires_and_old_requests_age_out() {
        let (limiter, _) = limiter(1_000, 3);
        let now = start();
        for _ in 0..3 {
            assert!(limiter.check_at("client", now).is_allowed());
        }
        assert!(!limiter.check_at("client", now + Duration::seconds(5)).is_allowed());

        let later = now + Duration::seconds(HOUR_WINDOW_SECS);
        assert!(limiter.check_at("client", later).is_allowed());
    }

    #[test]
    fn denied_requests_are_not_recorded() {
        let (limiter, _) = limiter(1, 200);
        let now = start();
        assert!(limiter.check_at("client", now).is_allowed());
        for offset in 1..30 {
            assert!(!limiter
                .check_at("client", now + Duration::seconds(offset))
                .is_allowed());
        }
        assert!(limiter.check_at("client", now + Duration::seconds(60)).is_allowed());
    }

    #[test]
    fn idle_clients_are_evicted() {
        let (limiter, store) = limiter(30, 200);
        let now = start();
        assert!(limiter.check_at("first", now).is_allowed());
        assert!(limiter.check_at("second", now).is_allowed());
        assert_eq!(store.tracked_clients(), 2);

        let later = now + Duration::seconds(HOUR_WINDOW_SECS + 1);
        assert!(limiter.check_at("third", later).is_allowed());
        assert_eq!(store.tracked_clients(), 1);
    }

    #[test]
    fn policy_follows_configuration() {
        let policy = RateLimitPolicy::from(&RateLimitConfig {
            per_minute: 5,
            per_hour: 50,
        });
        assert_eq!(policy.per_minute, 5);
        assert_eq!(policy.per_hour, 50);
        assert_eq!(policy.block_secs, 1_800);
    }
}
