//! Device configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default time allowed between two bytes of one frame.
pub const DEFAULT_INACTIVITY_TIMEOUT_MS: u64 = 500;
/// Default length of the failure lockout window.
pub const DEFAULT_LOCKOUT_DURATION_MS: u64 = 2000;

/// What the device sends to the host when it is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartupPolicy {
    /// Send nothing; the host starts with a Config.
    #[default]
    Silent,
    /// Send one Reset frame so the host knows to (re)configure.
    AnnounceReset,
}

/// Timing and startup settings of a [`Device`](crate::Device).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Partial frames older than this are discarded.
    pub inactivity_timeout_ms: u64,
    /// How long the device ignores the link after a failure.
    pub lockout_duration_ms: u64,
    /// Startup behaviour.
    pub startup: StartupPolicy,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        DeviceConfig {
            inactivity_timeout_ms: DEFAULT_INACTIVITY_TIMEOUT_MS,
            lockout_duration_ms: DEFAULT_LOCKOUT_DURATION_MS,
            startup: StartupPolicy::Silent,
        }
    }
}

impl DeviceConfig {
    /// Set the per-frame inactivity timeout.
    pub fn with_inactivity_timeout(mut self, timeout: Duration) -> Self {
        self.inactivity_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Set the failure lockout duration.
    pub fn with_lockout_duration(mut self, duration: Duration) -> Self {
        self.lockout_duration_ms = duration.as_millis() as u64;
        self
    }

    /// Set the startup policy.
    pub fn with_startup(mut self, startup: StartupPolicy) -> Self {
        self.startup = startup;
        self
    }

    /// Inactivity timeout as a [`Duration`].
    pub fn inactivity_timeout(&self) -> Duration {
        Duration::from_millis(self.inactivity_timeout_ms)
    }

    /// Lockout duration as a [`Duration`].
    pub fn lockout_duration(&self) -> Duration {
        Duration::from_millis(self.lockout_duration_ms)
    }
}
