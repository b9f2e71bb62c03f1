// Channel - Message link to the device and its send gate
use crate::application::ports::Notifier;
use crate::domain::command::DeviceCommand;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{info, warn};

pub const NOT_CONNECTED_ALERT: &str = "WebSocket is not connected!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

/// Lifecycle and inbound traffic reported by a transport
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    Opened,
    Message(String),
    Closed,
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("connection is not open")]
    NotConnected,
    #[error("connection closed before the frame was written")]
    Closed,
    #[error("failed to encode command: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Socket-level side of the channel
pub trait Transport: Send + Sync {
    fn state(&self) -> ConnectionState;

    /// Queue one text frame on the open connection
    fn transmit(&self, payload: String) -> Result<(), ChannelError>;
}

/// `ws://<host>/ws`
pub fn endpoint_for_host(host: &str) -> String {
    format!("ws://{}/ws", host)
}

/// Fixed-delay reconnect: every close schedules exactly one new attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectSchedule {
    delay: Duration,
}

impl ReconnectSchedule {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(2000);

    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn next_attempt(&self, closed_at: Instant) -> Instant {
        closed_at + self.delay
    }
}

impl Default for ReconnectSchedule {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

#[derive(Clone)]
pub struct Channel {
    transport: Arc<dyn Transport>,
    notifier: Arc<dyn Notifier>,
}

impl Channel {
    pub fn new(transport: Arc<dyn Transport>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            transport,
            notifier,
        }
    }

    /// Send a text frame if the connection is open. Otherwise the frame is
    /// dropped, the user is alerted and `NotConnected` is returned.
    pub fn send(&self, payload: String) -> Result<(), ChannelError> {
        if self.transport.state() != ConnectionState::Open {
            warn!("WebSocket is not ready yet");
            self.notifier.alert(NOT_CONNECTED_ALERT);
            return Err(ChannelError::NotConnected);
        }

        let sent = payload.clone();
        match self.transport.transmit(payload) {
            Ok(()) => {
                info!("Send: {}", sent);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "WebSocket is not ready yet");
                self.notifier.alert(NOT_CONNECTED_ALERT);
                Err(e)
            }
        }
    }

    pub fn send_command(&self, command: &DeviceCommand) -> Result<(), ChannelError> {
        let payload = command.to_json()?;
        self.send(payload)
    }
}
