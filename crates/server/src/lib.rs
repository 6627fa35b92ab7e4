use db::DBService;
use services::services::{
    booking_approval::BookingApprovalService, config::Config,
    notification::NotificationService,
};

pub mod error;
pub mod routes;

/// Shared state handed to every route
#[derive(Clone)]
pub struct AppState {
    db: DBService,
    approvals: BookingApprovalService,
}

impl AppState {
    pub fn new(db: DBService, notifications: NotificationService, config: &Config) -> Self {
        let approvals =
            BookingApprovalService::new(db.pool.clone(), notifications, config.approval_gate);
        Self { db, approvals }
    }

    pub fn db(&self) -> &DBService {
        &self.db
    }

    pub fn approvals(&self) -> &BookingApprovalService {
        &self.approvals
    }
}
