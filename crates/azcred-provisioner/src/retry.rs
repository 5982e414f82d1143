use std::time::Duration;

use azcred_directory::{AssignmentOutcome, Directory};
use azcred_domain::{AccessToken, RoleDefinition, SubscriptionId};
use tracing::{info, warn};

use crate::error::ProvisionError;

/// How long to keep trying a role assignment while a new service principal
/// propagates through the directory.
///
/// The pause precedes every attempt, the first included. Every failure shape
/// is retried the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 6,
            delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Time spent pausing if every attempt fails.
    pub fn total_budget(&self) -> Duration {
        self.delay * self.max_attempts
    }
}

/// Assign `role` to the principal, retrying per `policy`.
///
/// Returns the number of attempts it took. A rejected response and a failed
/// call both count as one failed attempt.
pub async fn assign_with_retry(
    directory: &dyn Directory,
    policy: &RetryPolicy,
    subscription_id: &SubscriptionId,
    token: &AccessToken,
    principal_object_id: &str,
    role: &RoleDefinition,
) -> Result<u32, ProvisionError> {
    let mut last_error = String::from("no attempt made");

    for attempt in 1..=policy.max_attempts {
        info!(
            attempt,
            subscription = %subscription_id,
            "Waiting for service principal to be available in directory"
        );
        tokio::time::sleep(policy.delay).await;

        match directory
            .assign_role(subscription_id, token, principal_object_id, &role.id)
            .await
        {
            Ok(AssignmentOutcome::Assigned) => return Ok(attempt),
            Ok(AssignmentOutcome::Rejected(reason)) => {
                warn!(attempt, subscription = %subscription_id, %reason, "role assignment rejected");
                last_error = reason;
            }
            Err(e) => {
                warn!(attempt, subscription = %subscription_id, error = %e, "role assignment call failed");
                last_error = e.to_string();
            }
        }
    }

    Err(ProvisionError::RoleAssignmentFailed {
        subscription: subscription_id.to_string(),
        role: role.name.clone(),
        attempts: policy.max_attempts,
        last_error,
    })
}
