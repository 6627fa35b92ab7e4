//! Approval workflow for bookings: checklist, approve, reject, cancel.

use db::models::{
    booking::{Booking, BookingStatus},
    booking_activity::{BookingAction, BookingActivityLog},
    meal_job::MealJob,
    room::RoomWithAssignment,
    space::SpaceReservation,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{info, warn};
use ts_rs::TS;
use uuid::Uuid;

use super::{
    approval_validator::{BookingValidationChecks, validate_booking_for_approval},
    config::ApprovalGate,
    notification::{BookingNotification, NotificationService},
};

#[derive(Debug, Error)]
pub enum BookingApprovalError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("booking not found")]
    NotFound,
    #[error("cannot {action} a booking that is {status}")]
    InvalidStatus {
        action: &'static str,
        status: BookingStatus,
    },
    #[error("approval checklist failed: {}", .0.failures().join("; "))]
    ChecklistFailed(BookingValidationChecks),
}

/// Status changes made by the approval workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    Approve,
    Reject,
    Cancel,
}

impl Transition {
    fn verb(self) -> &'static str {
        match self {
            Transition::Approve => "approve",
            Transition::Reject => "reject",
            Transition::Cancel => "cancel",
        }
    }

    fn from(self) -> &'static [BookingStatus] {
        match self {
            Transition::Approve | Transition::Reject => &[BookingStatus::Pending],
            Transition::Cancel => &[BookingStatus::Pending, BookingStatus::Approved],
        }
    }

    fn to(self) -> BookingStatus {
        match self {
            Transition::Approve => BookingStatus::Approved,
            Transition::Reject => BookingStatus::Rejected,
            Transition::Cancel => BookingStatus::Cancelled,
        }
    }

    fn action(self) -> BookingAction {
        match self {
            Transition::Approve => BookingAction::Approved,
            Transition::Reject => BookingAction::Rejected,
            Transition::Cancel => BookingAction::Cancelled,
        }
    }

    fn check(self, booking: &Booking) -> Result<(), BookingApprovalError> {
        if self.from().contains(&booking.status) {
            Ok(())
        } else {
            Err(BookingApprovalError::InvalidStatus {
                action: self.verb(),
                status: booking.status,
            })
        }
    }
}

/// Checklist as shown next to the approve button
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct ApprovalChecklist {
    pub booking_id: Uuid,
    pub checks: BookingValidationChecks,
    pub ready: bool,
    pub failures: Vec<String>,
}

impl ApprovalChecklist {
    pub fn new(booking_id: Uuid, checks: BookingValidationChecks) -> Self {
        Self {
            booking_id,
            ready: checks.all_passed(),
            failures: checks.failures(),
            checks,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct ApprovalOutcome {
    pub booking: Booking,
    pub checklist: ApprovalChecklist,
    /// Approved even though the checklist was failing (advisory gate only)
    pub overridden: bool,
}

#[derive(Clone)]
pub struct BookingApprovalService {
    pool: SqlitePool,
    notifications: NotificationService,
    gate: ApprovalGate,
}

impl BookingApprovalService {
    pub fn new(pool: SqlitePool, notifications: NotificationService, gate: ApprovalGate) -> Self {
        Self {
            pool,
            notifications,
            gate,
        }
    }

    pub fn gate(&self) -> ApprovalGate {
        self.gate
    }

    /// Load everything the checklist needs and evaluate it
    pub async fn checklist(
        &self,
        booking_id: Uuid,
    ) -> Result<ApprovalChecklist, BookingApprovalError> {
        let booking = self.load(booking_id).await?;
        self.checklist_for(&booking).await
    }

    async fn checklist_for(
        &self,
        booking: &Booking,
    ) -> Result<ApprovalChecklist, BookingApprovalError> {
        let rooms = RoomWithAssignment::find_by_booking_id(&self.pool, booking.id).await?;
        let meal_jobs = MealJob::find_by_booking_id(&self.pool, booking.id).await?;
        let conflicts =
            SpaceReservation::count_conflicts_for_booking(&self.pool, booking.id).await?;

        let checks = validate_booking_for_approval(
            booking,
            &rooms,
            &meal_jobs,
            u32::try_from(conflicts).unwrap_or(u32::MAX),
        );
        Ok(ApprovalChecklist::new(booking.id, checks))
    }

    /// Approve a pending booking and notify the customer.
    ///
    /// With [`ApprovalGate::Enforced`] a failing checklist returns
    /// [`BookingApprovalError::ChecklistFailed`] and the booking is left
    /// untouched. With [`ApprovalGate::Advisory`] the approval goes ahead and
    /// the outcome is marked as overridden.
    pub async fn approve(&self, booking_id: Uuid) -> Result<ApprovalOutcome, BookingApprovalError> {
        let booking = self.load(booking_id).await?;
        Transition::Approve.check(&booking)?;

        let checklist = self.checklist_for(&booking).await?;
        let overridden = !checklist.ready;
        if overridden {
            match self.gate {
                ApprovalGate::Enforced => {
                    warn!(
                        booking_id = %booking_id,
                        failures = ?checklist.failures,
                        "Approval blocked by checklist"
                    );
                    return Err(BookingApprovalError::ChecklistFailed(checklist.checks));
                }
                ApprovalGate::Advisory => {
                    warn!(
                        booking_id = %booking_id,
                        failures = ?checklist.failures,
                        "Approving booking with open checklist items"
                    );
                }
            }
        }

        let note = overridden
            .then(|| format!("Approved with open items: {}", checklist.failures.join("; ")));
        let approved = self
            .transition(booking_id, Transition::Approve, note)
            .await?;

        self.dispatch(BookingNotification::Approved { booking: &approved })
            .await;

        info!(
            booking_id = %booking_id,
            overridden = overridden,
            "Booking approved"
        );

        Ok(ApprovalOutcome {
            booking: approved,
            checklist,
            overridden,
        })
    }

    pub async fn reject(
        &self,
        booking_id: Uuid,
        reason: Option<String>,
    ) -> Result<Booking, BookingApprovalError> {
        let booking = self.load(booking_id).await?;
        Transition::Reject.check(&booking)?;

        let rejected = self
            .transition(booking_id, Transition::Reject, reason.clone())
            .await?;

        self.dispatch(BookingNotification::Rejected {
            booking: &rejected,
            reason: reason.as_deref(),
        })
        .await;

        info!(booking_id = %booking_id, "Booking rejected");
        Ok(rejected)
    }

    /// Cancel a pending or approved booking. Its spaces are released.
    pub async fn cancel(&self, booking_id: Uuid) -> Result<Booking, BookingApprovalError> {
        let booking = self.load(booking_id).await?;
        Transition::Cancel.check(&booking)?;

        let cancelled = self
            .transition(booking_id, Transition::Cancel, None)
            .await?;

        info!(booking_id = %booking_id, previous_status = %booking.status, "Booking cancelled");
        Ok(cancelled)
    }

    /// Apply `transition` and record its activity entry in one database
    /// transaction. The status guard sits in the UPDATE itself, so a booking
    /// that moved on since it was loaded yields
    /// [`BookingApprovalError::InvalidStatus`] and nothing is written.
    async fn transition(
        &self,
        booking_id: Uuid,
        transition: Transition,
        note: Option<String>,
    ) -> Result<Booking, BookingApprovalError> {
        let mut tx = self.pool.begin().await?;
        let updated = Booking::transition_status(
            &mut *tx,
            booking_id,
            transition.from(),
            transition.to(),
        )
        .await?;
        let Some(updated) = updated else {
            tx.rollback().await?;
            let current = self.load(booking_id).await?;
            return Err(BookingApprovalError::InvalidStatus {
                action: transition.verb(),
                status: current.status,
            });
        };
        BookingActivityLog::create(&mut *tx, booking_id, transition.action(), note).await?;
        tx.commit().await?;

        Ok(updated)
    }

    async fn load(&self, booking_id: Uuid) -> Result<Booking, BookingApprovalError> {
        Booking::find_by_id(&self.pool, booking_id)
            .await?
            .ok_or(BookingApprovalError::NotFound)
    }

    // Delivery failures never undo a status change.
    async fn dispatch(&self, notification: BookingNotification<'_>) {
        if let Err(e) = self.notifications.notify_booking(notification).await {
            warn!(error = %e, "Failed to send booking notification");
        }
    }
}
