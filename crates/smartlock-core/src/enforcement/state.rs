use crate::model::{AppIdentifier, EnforcementState, Sample};
use crate::policy::BlockPolicy;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point-in-time view of an enforcement session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnforcementStatus {
    pub state: EnforcementState,
    pub blocked_apps: Vec<String>,
    /// Violations (edge transitions) since the session started
    pub violations: u64,
    pub last_sample: Option<Sample>,
    pub started_at: Option<DateTime<Utc>>,
}

/// Edge-triggered state machine, independent of timers and side effects
#[derive(Debug)]
pub struct Enforcer {
    state: EnforcementState,
    policy: BlockPolicy,
    violations: u64,
    last_sample: Option<Sample>,
    started_at: Option<DateTime<Utc>>,
}

impl Enforcer {
    #[must_use]
    pub fn idle() -> Self {
        Self {
            state: EnforcementState::Idle,
            policy: BlockPolicy::default(),
            violations: 0,
            last_sample: None,
            started_at: None,
        }
    }

    /// Begin a session. Returns `false` without touching state if one is
    /// already running.
    pub fn start(&mut self, policy: BlockPolicy, now: DateTime<Utc>) -> bool {
        if self.state.is_running() {
            return false;
        }
        *self = Self {
            state: EnforcementState::Watching,
            policy,
            violations: 0,
            last_sample: None,
            started_at: Some(now),
        };
        true
    }

    /// End the session. Returns `false` if already idle.
    pub fn stop(&mut self) -> bool {
        if !self.state.is_running() {
            return false;
        }
        *self = Self::idle();
        true
    }

    /// Feed one sample. Returns the app to act on when the sample moves the
    /// machine from `Watching` into `Enforcing`.
    pub fn observe(&mut self, sample: Sample) -> Option<AppIdentifier> {
        if !self.state.is_running() {
            return None;
        }

        let blocked = self.policy.blocks(&sample);
        self.last_sample = Some(sample);

        match (self.state, blocked) {
            (EnforcementState::Watching, Some(app)) => {
                self.state = EnforcementState::Enforcing;
                self.violations += 1;
                Some(app)
            }
            (EnforcementState::Enforcing, Some(_)) => None,
            (_, None) => {
                self.state = EnforcementState::Watching;
                None
            }
            (EnforcementState::Idle, Some(_)) => None,
        }
    }

    #[must_use]
    pub fn state(&self) -> EnforcementState {
        self.state
    }

    #[must_use]
    pub fn status(&self) -> EnforcementStatus {
        EnforcementStatus {
            state: self.state,
            blocked_apps: self
                .policy
                .apps()
                .map(|app| app.as_str().to_string())
                .collect(),
            violations: self.violations,
            last_sample: self.last_sample.clone(),
            started_at: self.started_at,
        }
    }
}

impl Default for Enforcer {
    fn default() -> Self {
        Self::idle()
    }
}
