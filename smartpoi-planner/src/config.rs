//! Planner configuration.

use std::time::Duration;

use smartpoi_core::TravelProfile;

/// Default time allowed for one provider call, in seconds.
const DEFAULT_PROFILE_TIMEOUT_SECS: u64 = 10;

/// Configuration for [`RoutePlanner`](crate::RoutePlanner).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use smartpoi_core::TravelProfile;
/// use smartpoi_planner::PlannerConfig;
///
/// let config = PlannerConfig::default()
///     .with_profiles([TravelProfile::Walking, TravelProfile::Driving])
///     .with_per_profile_timeout(Duration::from_secs(4));
/// assert_eq!(config.request_deadline(), Duration::from_secs(4));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Profiles requested from the provider, in request order.
    pub profiles: Vec<TravelProfile>,
    /// Time allowed for each provider call.
    pub per_profile_timeout: Duration,
    /// Time allowed for all provider calls of one request together. `None`
    /// means the per-profile timeout, since the calls run in parallel.
    pub request_deadline: Option<Duration>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            profiles: TravelProfile::PROVIDER_ORDER.to_vec(),
            per_profile_timeout: Duration::from_secs(DEFAULT_PROFILE_TIMEOUT_SECS),
            request_deadline: None,
        }
    }
}

impl PlannerConfig {
    /// Replace the provider profile list.
    #[must_use]
    pub fn with_profiles(mut self, profiles: impl IntoIterator<Item = TravelProfile>) -> Self {
        self.profiles = profiles.into_iter().collect();
        self
    }

    /// Set the per-call timeout.
    #[must_use]
    pub const fn with_per_profile_timeout(mut self, timeout: Duration) -> Self {
        self.per_profile_timeout = timeout;
        self
    }

    /// Set the shared request deadline.
    #[must_use]
    pub const fn with_request_deadline(mut self, deadline: Duration) -> Self {
        self.request_deadline = Some(deadline);
        self
    }

    /// Deadline shared by every provider call of a request.
    #[must_use]
    pub fn request_deadline(&self) -> Duration {
        self.request_deadline.unwrap_or(self.per_profile_timeout)
    }
}
