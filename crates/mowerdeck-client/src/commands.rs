//! Operator command catalogue.
//!
//! Each command maps to a (verb, dotted path, value) triple on the write
//! channel. The device's interpretation of the command strings is out of
//! scope; this module only knows their wire form and how to read the
//! acknowledgement.

use crate::transport::{is_ack, DeviceTransport, Verb};
use mowerdeck_core::{AppEvent, CommandError, CommandEvent, EventBus};
use std::sync::Arc;

/// A command the operator can dispatch to the mower server.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCommand {
    /// Free-form direct drive command, e.g. `sweep(45, 70)`.
    DirectDrive {
        /// The literal command string.
        command: String,
    },
    /// Cutter on/off. Index is 1-based as displayed.
    Cutter {
        /// Which cutter, 1 or 2.
        index: u8,
        /// Desired state.
        on: bool,
    },
    /// Immediate motor stop.
    Stop,
    /// Drive to a staged destination in arena metres.
    Drive {
        /// Destination X in metres.
        x: f64,
        /// Destination Y in metres.
        y: f64,
    },
    /// Drive the stored route, optionally resuming at a saved node.
    DriveRoute {
        /// Resume token from the last interrupted run, if resuming.
        resume_token: Option<String>,
    },
    /// Cancel the current drive.
    CancelDrive,
    /// Pause/unpause the current drive.
    PauseDrive,
    /// Skip the current route node.
    Skip,
    /// Single-step while paused.
    StepDrive,
    /// Reset the navigation state.
    Reset,
    /// Reboot the server.
    Reboot,
    /// Shut the server down.
    Shutdown,
    /// Enrol the mower exclusively in this hotspot. Acknowledged with
    /// a literal `ACK` rather than a numeric body.
    EnrolHotspot,
    /// Select the current mower.
    SelectMower {
        /// Mower name as listed by the server.
        name: String,
    },
    /// Set the speed pair, selector form `"<rot>.<drv>"`.
    SetSpeeds {
        /// The speed pair value.
        pair: String,
    },
    /// Reset a point collection to its stored default.
    ResetPoints {
        /// Collection prefix, e.g. `fence` or `route`.
        prefix: String,
    },
}

impl DeviceCommand {
    /// The HTTP verb for this command. The whole catalogue writes with PUT.
    pub fn verb(&self) -> Verb {
        Verb::Put
    }

    /// Dotted path on the write channel.
    pub fn path(&self) -> String {
        match self {
            DeviceCommand::DirectDrive { .. }
            | DeviceCommand::Cutter { .. }
            | DeviceCommand::Stop => "direct-drive".to_string(),
            DeviceCommand::Drive { .. } => "drive".to_string(),
            DeviceCommand::DriveRoute { .. } => "drive-route".to_string(),
            DeviceCommand::CancelDrive => "cancel-drive".to_string(),
            DeviceCommand::PauseDrive => "pause-drive".to_string(),
            DeviceCommand::Skip => "skip".to_string(),
            DeviceCommand::StepDrive => "step-drive".to_string(),
            DeviceCommand::Reset => "reset".to_string(),
            DeviceCommand::Reboot => "reboot".to_string(),
            DeviceCommand::Shutdown => "shutdown".to_string(),
            DeviceCommand::EnrolHotspot => "enrol-hotspot".to_string(),
            DeviceCommand::SelectMower { .. } => "current.mower".to_string(),
            DeviceCommand::SetSpeeds { .. } => "set_speeds".to_string(),
            DeviceCommand::ResetPoints { prefix } => format!("{prefix}-reset"),
        }
    }

    /// Wire value, if any.
    pub fn value(&self) -> Option<String> {
        match self {
            DeviceCommand::DirectDrive { command } => Some(command.clone()),
            DeviceCommand::Cutter { index, on } => Some(format!(
                ">cutter({}, {})",
                index.saturating_sub(1),
                u8::from(*on)
            )),
            DeviceCommand::Stop => Some("stop()".to_string()),
            DeviceCommand::Drive { x, y } => Some(format!("[{x}, {y}]")),
            DeviceCommand::DriveRoute { resume_token } => resume_token.clone(),
            DeviceCommand::CancelDrive
            | DeviceCommand::PauseDrive
            | DeviceCommand::StepDrive
            | DeviceCommand::Reset => Some("-1".to_string()),
            DeviceCommand::Skip => None,
            DeviceCommand::Reboot | DeviceCommand::Shutdown | DeviceCommand::EnrolHotspot => {
                Some("0".to_string())
            }
            DeviceCommand::SelectMower { name } => Some(name.clone()),
            DeviceCommand::SetSpeeds { pair } => Some(pair.clone()),
            DeviceCommand::ResetPoints { .. } => None,
        }
    }

    /// Whether the given response body acknowledges this command.
    pub fn is_success(&self, body: &str) -> bool {
        match self {
            DeviceCommand::EnrolHotspot => body.trim() == "ACK",
            _ => is_ack(body),
        }
    }
}

/// Dispatches commands over a transport and publishes the outcome.
#[derive(Clone)]
pub struct CommandClient {
    transport: Arc<dyn DeviceTransport>,
    bus: Arc<EventBus>,
}

impl CommandClient {
    /// Create a client over the given transport.
    pub fn new(transport: Arc<dyn DeviceTransport>, bus: Arc<EventBus>) -> Self {
        Self { transport, bus }
    }

    /// Send a command and interpret the acknowledgement.
    ///
    /// Command failures are events, not process failures: the error carries
    /// the operator-facing message from the device body, and a matching
    /// `CommandEvent` is published either way.
    pub async fn dispatch(&self, command: &DeviceCommand) -> Result<(), CommandError> {
        let path = command.path();
        self.bus.publish(AppEvent::Command(CommandEvent::Sent {
            path: path.clone(),
        }));

        let body = self
            .transport
            .send(command.verb(), &path, command.value().as_deref())
            .await
            .map_err(CommandError::Transport)?;

        if command.is_success(&body) {
            self.bus
                .publish(AppEvent::Command(CommandEvent::Acknowledged {
                    path: path.clone(),
                }));
            Ok(())
        } else {
            tracing::warn!("Command {} rejected: {}", path, body);
            self.bus.publish(AppEvent::Command(CommandEvent::Failed {
                path,
                message: body.clone(),
            }));
            Err(CommandError::Rejected { message: body })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cutter_command_wire_form() {
        let on = DeviceCommand::Cutter { index: 1, on: true };
        assert_eq!(on.path(), "direct-drive");
        assert_eq!(on.value().as_deref(), Some(">cutter(0, 1)"));

        let off = DeviceCommand::Cutter {
            index: 2,
            on: false,
        };
        assert_eq!(off.value().as_deref(), Some(">cutter(1, 0)"));
    }

    #[test]
    fn test_drive_commands() {
        let drive = DeviceCommand::Drive { x: 2.5, y: 7.0 };
        assert_eq!(drive.path(), "drive");
        assert_eq!(drive.value().as_deref(), Some("[2.5, 7]"));

        let restart = DeviceCommand::DriveRoute { resume_token: None };
        assert_eq!(restart.value(), None);

        let resume = DeviceCommand::DriveRoute {
            resume_token: Some("17".to_string()),
        };
        assert_eq!(resume.value().as_deref(), Some("17"));

        assert_eq!(DeviceCommand::CancelDrive.value().as_deref(), Some("-1"));
        assert_eq!(DeviceCommand::Skip.value(), None);
    }

    #[test]
    fn test_mower_selection_uses_dotted_path() {
        let cmd = DeviceCommand::SelectMower {
            name: "mower-1".to_string(),
        };
        assert_eq!(cmd.path(), "current.mower");
        assert_eq!(cmd.value().as_deref(), Some("mower-1"));
    }

    #[test]
    fn test_reset_points_path() {
        let cmd = DeviceCommand::ResetPoints {
            prefix: "fence".to_string(),
        };
        assert_eq!(cmd.path(), "fence-reset");
    }

    #[test]
    fn test_enrol_expects_literal_ack() {
        let cmd = DeviceCommand::EnrolHotspot;
        assert!(cmd.is_success("ACK"));
        assert!(!cmd.is_success("1"));
        assert!(DeviceCommand::Reset.is_success("1"));
        assert!(!DeviceCommand::Reset.is_success("hotspot busy"));
    }

    #[tokio::test]
    async fn test_dispatch_publishes_outcome_events() {
        use crate::transport::FetchOutcome;
        use async_trait::async_trait;
        use mowerdeck_core::{EventFilter, TransportError};
        use parking_lot::Mutex;
        use std::sync::atomic::{AtomicUsize, Ordering};

        struct FixedTransport {
            body: String,
        }

        #[async_trait]
        impl DeviceTransport for FixedTransport {
            async fn fetch_status(&self) -> Result<FetchOutcome, TransportError> {
                Ok(FetchOutcome::Empty { headers: vec![] })
            }

            async fn send(
                &self,
                _verb: Verb,
                _path: &str,
                _value: Option<&str>,
            ) -> Result<String, TransportError> {
                Ok(self.body.clone())
            }
        }

        let bus = Arc::new(EventBus::new());
        let acked = Arc::new(AtomicUsize::new(0));
        let failures = Arc::new(Mutex::new(Vec::new()));
        {
            let acked = acked.clone();
            let failures = failures.clone();
            bus.subscribe(EventFilter::All, move |event| {
                match event {
                    AppEvent::Command(CommandEvent::Acknowledged { .. }) => {
                        acked.fetch_add(1, Ordering::SeqCst);
                    }
                    AppEvent::Command(CommandEvent::Failed { message, .. }) => {
                        failures.lock().push(message);
                    }
                    _ => {}
                }
            });
        }

        let ok = CommandClient::new(
            Arc::new(FixedTransport {
                body: "1".to_string(),
            }),
            bus.clone(),
        );
        ok.dispatch(&DeviceCommand::CancelDrive).await.unwrap();
        assert_eq!(acked.load(Ordering::SeqCst), 1);

        let rejected = CommandClient::new(
            Arc::new(FixedTransport {
                body: "Problem saving fence".to_string(),
            }),
            bus,
        );
        let err = rejected
            .dispatch(&DeviceCommand::Reset)
            .await
            .expect_err("non-numeric body");
        assert!(matches!(err, CommandError::Rejected { .. }));
        assert_eq!(*failures.lock(), vec!["Problem saving fence".to_string()]);
    }
}
