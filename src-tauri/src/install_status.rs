use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) enum InstallStatus {
    #[default]
    ReadyToInstall,
    Pending,
    Ready,
    Error,
    // Reserved for pause/cancel/retry controls; nothing transitions into these yet.
    #[allow(dead_code)]
    Failed,
    #[allow(dead_code)]
    Cancelled,
    #[allow(dead_code)]
    Paused,
    #[allow(dead_code)]
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InstallTrigger {
    Begin,
    /// Destination setup failed inside `begin_install`, before any transfer.
    SetupFailed,
    StreamCompleted,
    StreamFailed,
}

impl InstallStatus {
    #[cfg(test)]
    pub(crate) fn is_terminal(self) -> bool {
        matches!(self, Self::Ready | Self::Error)
    }

    pub(crate) fn accepts_new_job(self) -> bool {
        matches!(self, Self::ReadyToInstall | Self::Ready | Self::Error)
    }

    pub(crate) fn next(self, trigger: InstallTrigger) -> Option<Self> {
        match (self, trigger) {
            (status, InstallTrigger::Begin) if status.accepts_new_job() => Some(Self::Pending),
            (status, InstallTrigger::SetupFailed) if status.accepts_new_job() => Some(Self::Error),
            (Self::Pending, InstallTrigger::StreamCompleted) => Some(Self::Ready),
            (Self::Pending, InstallTrigger::StreamFailed) => Some(Self::Error),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct InstallStateMachine {
    status: InstallStatus,
}

impl InstallStateMachine {
    pub(crate) fn status(&self) -> InstallStatus {
        self.status
    }

    pub(crate) fn apply(&mut self, trigger: InstallTrigger) -> Result<InstallStatus, String> {
        let next = self.status.next(trigger).ok_or_else(|| {
            format!(
                "install transition {:?} is not allowed from {:?}",
                trigger, self.status
            )
        })?;
        self.status = next;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_TRIGGERS: [InstallTrigger; 4] = [
        InstallTrigger::Begin,
        InstallTrigger::SetupFailed,
        InstallTrigger::StreamCompleted,
        InstallTrigger::StreamFailed,
    ];

    #[test]
    fn ready_to_install_only_leaves_through_begin_install() {
        let status = InstallStatus::ReadyToInstall;
        assert_eq!(status.next(InstallTrigger::Begin), Some(InstallStatus::Pending));
        assert_eq!(status.next(InstallTrigger::SetupFailed), Some(InstallStatus::Error));
        assert_eq!(status.next(InstallTrigger::StreamCompleted), None);
        assert_eq!(status.next(InstallTrigger::StreamFailed), None);
    }

    #[test]
    fn pending_only_leaves_through_stream_outcome() {
        let status = InstallStatus::Pending;
        assert_eq!(status.next(InstallTrigger::Begin), None);
        assert_eq!(status.next(InstallTrigger::SetupFailed), None);
        assert_eq!(
            status.next(InstallTrigger::StreamCompleted),
            Some(InstallStatus::Ready)
        );
        assert_eq!(
            status.next(InstallTrigger::StreamFailed),
            Some(InstallStatus::Error)
        );
    }

    #[test]
    fn terminal_states_only_restart_with_a_fresh_job() {
        for status in [InstallStatus::Ready, InstallStatus::Error] {
            assert!(status.is_terminal());
            assert_eq!(status.next(InstallTrigger::Begin), Some(InstallStatus::Pending));
            assert_eq!(status.next(InstallTrigger::StreamCompleted), None);
            assert_eq!(status.next(InstallTrigger::StreamFailed), None);
        }
    }

    #[test]
    fn reserved_states_have_no_transitions() {
        for status in [
            InstallStatus::Failed,
            InstallStatus::Cancelled,
            InstallStatus::Paused,
            InstallStatus::Processing,
        ] {
            for trigger in ALL_TRIGGERS {
                assert_eq!(status.next(trigger), None, "{status:?} + {trigger:?}");
            }
        }
    }

    #[test]
    fn state_machine_rejects_invalid_transition_without_changing_status() {
        let mut machine = InstallStateMachine::default();
        assert!(machine.apply(InstallTrigger::StreamCompleted).is_err());
        assert_eq!(machine.status(), InstallStatus::ReadyToInstall);

        assert_eq!(machine.apply(InstallTrigger::Begin), Ok(InstallStatus::Pending));
        assert_eq!(
            machine.apply(InstallTrigger::StreamCompleted),
            Ok(InstallStatus::Ready)
        );
    }

    #[test]
    fn status_serializes_in_screaming_snake_case() {
        assert_eq!(
            serde_json::to_value(InstallStatus::ReadyToInstall).unwrap(),
            serde_json::json!("READY_TO_INSTALL")
        );
    }
}
