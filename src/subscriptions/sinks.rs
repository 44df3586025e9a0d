//! Ready-made subscribers.
//!
//! - [`EmailSink`]: formats a mail and hands it to a [`Mailer`]
//! - [`UserSink`]: a per-user inbox
//! - [`LogSink`]: forwards into `tracing`
//! - [`ChannelSink`]: pushes into a bounded channel for another thread

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{info, warn};

use super::types::{DeliveryError, Notification, Subscriber};
use crate::types::Severity;

// --- Email ---

/// Transport used by [`EmailSink`].
pub trait Mailer: Send + Sync {
    fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), DeliveryError>;
}

/// A mail as seen by [`RecordingMailer`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentMail {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// Mailer that keeps every mail in memory instead of sending it.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<SentMail>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mails "sent" so far, oldest first.
    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().clone()
    }
}

impl Mailer for RecordingMailer {
    fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), DeliveryError> {
        self.sent.lock().push(SentMail {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

/// Sends every notification as an email to one recipient.
pub struct EmailSink {
    recipient: String,
    mailer: Arc<dyn Mailer>,
}

impl EmailSink {
    pub fn new(recipient: impl Into<String>, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            recipient: recipient.into(),
            mailer,
        }
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }
}

impl Subscriber for EmailSink {
    fn receive(&self, message: &str, severity: Severity) -> Result<(), DeliveryError> {
        let subject = format!("{} Library notification", severity);
        self.mailer.send(&self.recipient, &subject, message)
    }
}

// --- Per-user inbox ---

/// Keeps the notifications addressed to one user.
pub struct UserSink {
    user_id: String,
    inbox: Mutex<Vec<Notification>>,
}

impl UserSink {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            inbox: Mutex::new(Vec::new()),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Everything received so far, oldest first.
    pub fn inbox(&self) -> Vec<Notification> {
        self.inbox.lock().clone()
    }

    /// Drain the inbox.
    pub fn take_inbox(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.inbox.lock())
    }
}

impl Subscriber for UserSink {
    fn receive(&self, message: &str, severity: Severity) -> Result<(), DeliveryError> {
        self.inbox.lock().push(Notification::new(message, severity));
        Ok(())
    }
}

// --- Log ---

/// Writes each notification to the `tracing` log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl Subscriber for LogSink {
    fn receive(&self, message: &str, severity: Severity) -> Result<(), DeliveryError> {
        match severity {
            Severity::Warning => warn!(severity = severity.label(), "{}", message),
            Severity::Info | Severity::Generic => info!(severity = severity.label(), "{}", message),
        }
        Ok(())
    }
}

// --- Channel ---

/// Forwards notifications into a bounded channel.
///
/// A full or closed channel fails only this delivery. The sink stays
/// registered; unregister it explicitly once the receiver is gone.
pub struct ChannelSink {
    sender: Sender<Notification>,
}

impl ChannelSink {
    /// Create a sink and the receiving end of its channel.
    pub fn bounded(capacity: usize) -> (Self, Receiver<Notification>) {
        let (sender, receiver) = bounded(capacity);
        (Self { sender }, receiver)
    }
}

impl Subscriber for ChannelSink {
    fn receive(&self, message: &str, severity: Severity) -> Result<(), DeliveryError> {
        match self.sender.try_send(Notification::new(message, severity)) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(DeliveryError::BufferFull),
            Err(TrySendError::Disconnected(_)) => Err(DeliveryError::Disconnected),
        }
    }
}
