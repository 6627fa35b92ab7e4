//! Customer-facing booking notifications.

use std::sync::Arc;

use async_trait::async_trait;
use db::models::booking::Booking;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// A rendered message ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Delivery backend for outgoing messages
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, message: &OutgoingMessage) -> Result<(), NotificationError>;
}

/// Records messages in the log instead of delivering them
#[derive(Debug, Default)]
pub struct LogNotificationSender;

#[async_trait]
impl NotificationSender for LogNotificationSender {
    async fn send(&self, message: &OutgoingMessage) -> Result<(), NotificationError> {
        info!(
            to = %message.to,
            subject = %message.subject,
            body_len = message.body.len(),
            "Notification dispatched"
        );
        Ok(())
    }
}

pub enum BookingNotification<'a> {
    Approved { booking: &'a Booking },
    Rejected { booking: &'a Booking, reason: Option<&'a str> },
}

impl BookingNotification<'_> {
    pub fn render(&self) -> OutgoingMessage {
        match self {
            BookingNotification::Approved { booking } => OutgoingMessage {
                to: booking.customer_email.clone(),
                subject: format!("Your booking \"{}\" is confirmed", booking.event_name),
                body: format!(
                    "Hi {},\n\nYour booking \"{}\" from {} to {} for {} guests has been approved.\n\
                     You can now sign in to review rooms and catering for your stay.\n",
                    booking.customer_name,
                    booking.event_name,
                    booking.arrival_date,
                    booking.departure_date,
                    booking.headcount
                ),
            },
            BookingNotification::Rejected { booking, reason } => {
                let mut body = format!(
                    "Hi {},\n\nUnfortunately we are unable to accept your booking \"{}\" from {} to {}.\n",
                    booking.customer_name,
                    booking.event_name,
                    booking.arrival_date,
                    booking.departure_date
                );
                if let Some(reason) = reason.filter(|r| !r.trim().is_empty()) {
                    body.push_str(&format!("\nReason: {}\n", reason.trim()));
                }
                OutgoingMessage {
                    to: booking.customer_email.clone(),
                    subject: format!("Your booking \"{}\" could not be accepted", booking.event_name),
                    body,
                }
            }
        }
    }
}

#[derive(Clone)]
pub struct NotificationService {
    sender: Arc<dyn NotificationSender>,
}

impl NotificationService {
    pub fn new(sender: Arc<dyn NotificationSender>) -> Self {
        Self { sender }
    }

    pub fn log_only() -> Self {
        Self::new(Arc::new(LogNotificationSender))
    }

    pub async fn notify_booking(
        &self,
        notification: BookingNotification<'_>,
    ) -> Result<(), NotificationError> {
        let message = notification.render();
        self.sender.send(&message).await
    }
}
