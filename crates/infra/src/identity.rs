//! Current-user and clock adapters.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use gearbase_app::{Clock, CurrentUser, PortResult};
use gearbase_core::UserId;

/// Resolves every call to one fixed user. The real resolver is supplied by
/// the external auth collaborator.
#[derive(Debug, Copy, Clone)]
pub struct FixedCurrentUser(UserId);

impl FixedCurrentUser {
    pub fn new(user_id: UserId) -> Self {
        Self(user_id)
    }
}

#[async_trait]
impl CurrentUser for FixedCurrentUser {
    async fn current_user_id(&self) -> PortResult<UserId> {
        Ok(self.0)
    }
}

/// Wall-clock time.
#[derive(Debug, Default, Copy, Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Frozen time for deterministic tests.
#[derive(Debug, Copy, Clone)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
