// Moderation service - the shared ban/mute flow.
//
// Every action runs the same three stages:
// 1. Eligibility gate (bots and admins are off limits)
// 2. Direct message to the target (best-effort)
// 3. Apply the action, then announce it publicly
//
// NO Discord dependencies here. The platform is reached through the
// `ModerationGateway` port so the flow can be tested with a recording fake.

use super::moderation_models::{
    ModerationAction, ModerationConfig, ModerationOutcome, ModerationTarget, Moderator, Refusal,
    MAX_AUDIT_REASON_LEN, MAX_MUTE_MINUTES,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::future::Future;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum ModerationError {
    #[error("Platform error while trying to {operation}: {message}")]
    Platform {
        operation: &'static str,
        message: String,
    },

    #[error("Timed out while trying to {operation}")]
    TimedOut { operation: &'static str },
}

impl ModerationError {
    pub fn platform(operation: &'static str, err: impl ToString) -> Self {
        ModerationError::Platform {
            operation,
            message: err.to_string(),
        }
    }
}

// ============================================================================
// PLATFORM PORT
// ============================================================================

/// The platform calls the moderation flow needs.
#[async_trait]
pub trait ModerationGateway: Send + Sync {
    /// Privately acknowledge the invocation once the gate has passed, so the
    /// slower calls below don't race the platform's response deadline.
    async fn acknowledge(&self) -> Result<(), ModerationError>;

    async fn send_direct_message(
        &self,
        target: &ModerationTarget,
        content: String,
    ) -> Result<(), ModerationError>;

    async fn ban(&self, target: &ModerationTarget, audit_reason: String)
        -> Result<(), ModerationError>;

    async fn timeout_until(
        &self,
        target: &ModerationTarget,
        until: DateTime<Utc>,
        audit_reason: String,
    ) -> Result<(), ModerationError>;

    /// Post a public record of the action.
    async fn announce(&self, content: String) -> Result<(), ModerationError>;

    /// Tell the moderator (only them) why nothing happened.
    async fn refuse(&self, content: String) -> Result<(), ModerationError>;
}

// ============================================================================
// CORE SERVICE
// ============================================================================

pub struct ModerationService {
    config: ModerationConfig,
}

impl ModerationService {
    pub fn new(config: ModerationConfig) -> Self {
        Self { config }
    }

    /// Bots first, then admins, then the mute duration bounds.
    pub fn check_eligibility(
        action: &ModerationAction,
        target: &ModerationTarget,
    ) -> Result<(), Refusal> {
        let verb = action.verb();
        if target.is_bot {
            return Err(Refusal::TargetIsBot { verb });
        }
        if target.is_admin {
            return Err(Refusal::TargetIsAdmin { verb });
        }
        if let ModerationAction::Mute { minutes, .. } = action {
            if *minutes == 0 || *minutes > MAX_MUTE_MINUTES {
                return Err(Refusal::InvalidDuration { minutes: *minutes });
            }
        }
        Ok(())
    }

    /// Text sent privately to the target before the action lands.
    pub fn direct_message(&self, moderator: &Moderator, action: &ModerationAction) -> String {
        match action {
            ModerationAction::Ban { reason } => format!(
                "## You were banned by {}.\n**Reason:** {}\n\nIf you wish to appeal this ban, contact {}",
                moderator.name, reason, self.config.appeal_contact
            ),
            ModerationAction::Mute { minutes, .. } => format!(
                "## You were muted by {}.\n**Time:** {} minutes",
                moderator.name, minutes
            ),
        }
    }

    /// Public record posted after the action.
    pub fn announcement(
        moderator: &Moderator,
        target: &ModerationTarget,
        action: &ModerationAction,
    ) -> String {
        match action {
            ModerationAction::Ban { reason } => format!(
                "**{}** banned **{}**\n**Reason:** {}",
                moderator.name, target.name, reason
            ),
            ModerationAction::Mute { minutes, reason } => format!(
                "**{}** muted **{}** for {} minutes\n**Reason:** {}",
                moderator.name, target.name, minutes, reason
            ),
        }
    }

    /// "moderator - reason", cut to the platform's audit log limit.
    pub fn audit_reason(moderator: &Moderator, action: &ModerationAction) -> String {
        format!("{} - {}", moderator.name, action.reason())
            .chars()
            .take(MAX_AUDIT_REASON_LEN)
            .collect()
    }

    pub fn mute_expiry(now: DateTime<Utc>, minutes: u32) -> DateTime<Utc> {
        now + Duration::minutes(i64::from(minutes))
    }

    /// Run the full flow for one command invocation.
    pub async fn execute<G: ModerationGateway>(
        &self,
        gateway: &G,
        moderator: &Moderator,
        target: &ModerationTarget,
        action: &ModerationAction,
    ) -> Result<ModerationOutcome, ModerationError> {
        // Stage 1: eligibility gate
        if let Err(refusal) = Self::check_eligibility(action, target) {
            tracing::info!(
                moderator = %moderator.name,
                target_user = %target.name,
                action = action.verb(),
                %refusal,
                "Moderation action refused"
            );
            self.bounded("send refusal", gateway.refuse(refusal.to_string()))
                .await?;
            return Ok(ModerationOutcome::Refused(refusal));
        }

        self.bounded("acknowledge command", gateway.acknowledge())
            .await?;

        // Stage 2: tell the target, but don't let a closed DM block the action
        let notified = match self
            .bounded(
                "send direct message",
                gateway.send_direct_message(target, self.direct_message(moderator, action)),
            )
            .await
        {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(target_user = %target.name, error = %e, "Could not notify moderation target");
                false
            }
        };

        // Stage 3: apply and announce
        let audit_reason = Self::audit_reason(moderator, action);
        let expires_at = match action {
            ModerationAction::Ban { .. } => {
                self.bounded("ban member", gateway.ban(target, audit_reason))
                    .await?;
                None
            }
            ModerationAction::Mute { minutes, .. } => {
                let until = Self::mute_expiry(Utc::now(), *minutes);
                self.bounded(
                    "timeout member",
                    gateway.timeout_until(target, until, audit_reason),
                )
                .await?;
                Some(until)
            }
        };

        tracing::info!(
            moderator = %moderator.name,
            moderator_id = moderator.user_id,
            target_user = %target.name,
            target_id = target.user_id,
            action = action.past_tense(),
            reason = action.reason(),
            "Moderation action applied"
        );

        let announcement = Self::announcement(moderator, target, action);
        self.bounded("post announcement", gateway.announce(announcement.clone()))
            .await?;

        Ok(ModerationOutcome::Applied {
            announcement,
            expires_at,
            notified,
        })
    }

    /// Wrap an outbound call in the configured request timeout.
    async fn bounded<F>(&self, operation: &'static str, call: F) -> Result<(), ModerationError>
    where
        F: Future<Output = Result<(), ModerationError>>,
    {
        match tokio::time::timeout(self.config.request_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(ModerationError::TimedOut { operation }),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Acknowledge,
        DirectMessage(String),
        Ban(String),
        Timeout(DateTime<Utc>, String),
        Announce(String),
        Refuse(String),
    }

    /// Records every platform call in order.
    #[derive(Default)]
    struct RecordingGateway {
        calls: Mutex<Vec<Call>>,
        dm_fails: bool,
        ban_fails: bool,
        stall_announce: bool,
    }

    impl RecordingGateway {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl ModerationGateway for RecordingGateway {
        async fn acknowledge(&self) -> Result<(), ModerationError> {
            self.record(Call::Acknowledge);
            Ok(())
        }

        async fn send_direct_message(
            &self,
            _target: &ModerationTarget,
            content: String,
        ) -> Result<(), ModerationError> {
            if self.dm_fails {
                return Err(ModerationError::platform("send direct message", "DMs closed"));
            }
            self.record(Call::DirectMessage(content));
            Ok(())
        }

        async fn ban(
            &self,
            _target: &ModerationTarget,
            audit_reason: String,
        ) -> Result<(), ModerationError> {
            if self.ban_fails {
                return Err(ModerationError::platform("ban member", "Missing Permissions"));
            }
            self.record(Call::Ban(audit_reason));
            Ok(())
        }

        async fn timeout_until(
            &self,
            _target: &ModerationTarget,
            until: DateTime<Utc>,
            audit_reason: String,
        ) -> Result<(), ModerationError> {
            self.record(Call::Timeout(until, audit_reason));
            Ok(())
        }

        async fn announce(&self, content: String) -> Result<(), ModerationError> {
            if self.stall_announce {
                tokio::time::sleep(std::time::Duration::from_secs(5)).await;
            }
            self.record(Call::Announce(content));
            Ok(())
        }

        async fn refuse(&self, content: String) -> Result<(), ModerationError> {
            self.record(Call::Refuse(content));
            Ok(())
        }
    }

    fn moderator() -> Moderator {
        Moderator {
            user_id: 1,
            name: "alice".to_string(),
        }
    }

    fn member(is_bot: bool, is_admin: bool) -> ModerationTarget {
        ModerationTarget {
            user_id: 2,
            name: "bob".to_string(),
            is_bot,
            is_admin,
        }
    }

    fn service() -> ModerationService {
        ModerationService::new(ModerationConfig {
            appeal_contact: "appeals@example.com".to_string(),
            request_timeout: std::time::Duration::from_millis(200),
        })
    }

    fn ban(reason: &str) -> ModerationAction {
        ModerationAction::Ban {
            reason: reason.to_string(),
        }
    }

    fn mute(minutes: u32) -> ModerationAction {
        ModerationAction::Mute {
            minutes,
            reason: "spam".to_string(),
        }
    }

    #[tokio::test]
    async fn test_ban_bot_is_refused_without_side_effects() {
        let gateway = RecordingGateway::default();

        let outcome = service()
            .execute(&gateway, &moderator(), &member(true, false), &ban("raid"))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ModerationOutcome::Refused(Refusal::TargetIsBot { verb: "ban" })
        );
        assert_eq!(
            gateway.calls(),
            vec![Call::Refuse("You can't ban a bot.".to_string())]
        );
    }

    #[tokio::test]
    async fn test_mute_admin_is_refused() {
        let gateway = RecordingGateway::default();

        let outcome = service()
            .execute(&gateway, &moderator(), &member(false, true), &mute(10))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ModerationOutcome::Refused(Refusal::TargetIsAdmin { verb: "mute" })
        );
        assert_eq!(
            gateway.calls(),
            vec![Call::Refuse("You can't mute an Admin.".to_string())]
        );
    }

    #[test]
    fn test_bot_check_runs_before_admin_check() {
        let refusal =
            ModerationService::check_eligibility(&ban("x"), &member(true, true)).unwrap_err();
        assert_eq!(refusal, Refusal::TargetIsBot { verb: "ban" });
    }

    #[test]
    fn test_mute_duration_bounds() {
        let target = member(false, false);
        assert!(ModerationService::check_eligibility(&mute(0), &target).is_err());
        assert!(ModerationService::check_eligibility(&mute(1), &target).is_ok());
        assert!(ModerationService::check_eligibility(&mute(MAX_MUTE_MINUTES), &target).is_ok());
        assert_eq!(
            ModerationService::check_eligibility(&mute(MAX_MUTE_MINUTES + 1), &target),
            Err(Refusal::InvalidDuration {
                minutes: MAX_MUTE_MINUTES + 1
            })
        );
    }

    #[tokio::test]
    async fn test_ban_flow_order() {
        let gateway = RecordingGateway::default();

        let outcome = service()
            .execute(&gateway, &moderator(), &member(false, false), &ban("spamming links"))
            .await
            .unwrap();

        let calls = gateway.calls();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[0], Call::Acknowledge);
        match &calls[1] {
            Call::DirectMessage(text) => {
                assert!(text.starts_with("## You were banned by alice."));
                assert!(text.contains("**Reason:** spamming links"));
                assert!(text.contains("appeals@example.com"));
            }
            other => panic!("expected direct message first, got {:?}", other),
        }
        assert_eq!(calls[2], Call::Ban("alice - spamming links".to_string()));
        assert_eq!(
            calls[3],
            Call::Announce("**alice** banned **bob**\n**Reason:** spamming links".to_string())
        );
        assert!(matches!(
            outcome,
            ModerationOutcome::Applied {
                expires_at: None,
                notified: true,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_mute_expiry_is_now_plus_minutes() {
        let gateway = RecordingGateway::default();

        let before = Utc::now();
        let outcome = service()
            .execute(&gateway, &moderator(), &member(false, false), &mute(10))
            .await
            .unwrap();
        let after = Utc::now();

        let calls = gateway.calls();
        assert_eq!(calls[0], Call::Acknowledge);
        assert_eq!(
            calls[1],
            Call::DirectMessage("## You were muted by alice.\n**Time:** 10 minutes".to_string())
        );
        let until = match &calls[2] {
            Call::Timeout(until, reason) => {
                assert_eq!(reason, "alice - spam");
                *until
            }
            other => panic!("expected timeout after the DM, got {:?}", other),
        };
        assert!(until >= before + Duration::minutes(10));
        assert!(until <= after + Duration::minutes(10));

        match outcome {
            ModerationOutcome::Applied { expires_at, .. } => assert_eq!(expires_at, Some(until)),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failed_dm_does_not_block_action() {
        let gateway = RecordingGateway {
            dm_fails: true,
            ..Default::default()
        };

        let outcome = service()
            .execute(&gateway, &moderator(), &member(false, false), &ban("x"))
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            ModerationOutcome::Applied {
                notified: false,
                ..
            }
        ));
        assert_eq!(gateway.calls()[0], Call::Acknowledge);
        assert!(matches!(gateway.calls()[1], Call::Ban(_)));
    }

    #[tokio::test]
    async fn test_failed_ban_is_not_announced() {
        let gateway = RecordingGateway {
            ban_fails: true,
            ..Default::default()
        };

        let err = service()
            .execute(&gateway, &moderator(), &member(false, false), &ban("x"))
            .await
            .unwrap_err();

        assert!(matches!(err, ModerationError::Platform { .. }));
        assert!(!gateway
            .calls()
            .iter()
            .any(|c| matches!(c, Call::Announce(_))));
    }

    #[tokio::test]
    async fn test_slow_call_times_out() {
        let gateway = RecordingGateway {
            stall_announce: true,
            ..Default::default()
        };

        let err = service()
            .execute(&gateway, &moderator(), &member(false, false), &ban("x"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ModerationError::TimedOut {
                operation: "post announcement"
            }
        ));
    }

    #[tokio::test]
    async fn test_refusal_is_never_acknowledged_publicly() {
        let gateway = RecordingGateway::default();

        service()
            .execute(&gateway, &moderator(), &member(false, true), &ban("x"))
            .await
            .unwrap();

        // The refusal must be the first and only response to the interaction
        assert_eq!(
            gateway.calls(),
            vec![Call::Refuse("You can't ban an Admin.".to_string())]
        );
    }

    #[tokio::test]
    async fn test_acknowledged_before_a_failing_ban() {
        let gateway = RecordingGateway {
            ban_fails: true,
            ..Default::default()
        };

        service()
            .execute(&gateway, &moderator(), &member(false, false), &ban("x"))
            .await
            .unwrap_err();

        // The error reply follows the private acknowledgement, never a public one
        let calls = gateway.calls();
        assert_eq!(calls.first(), Some(&Call::Acknowledge));
        assert_eq!(calls.iter().filter(|c| **c == Call::Acknowledge).count(), 1);
    }

    #[test]
    fn test_audit_reason_is_truncated() {
        let long = ban(&"r".repeat(1000));
        let reason = ModerationService::audit_reason(&moderator(), &long);
        assert_eq!(reason.chars().count(), MAX_AUDIT_REASON_LEN);
        assert!(reason.starts_with("alice - rrr"));
    }
}
