//! # Interview scheduling
//!
//! [`Scheduler`] owns the interview slot allocation flow:
//!
//! - **booking**: claim a slot and issue an admission ticket
//! - **cancellation**: give the slot back and revert the applicant
//! - **days**: staff lifecycle of interview days and attendance
//! - **eligibility**: pre-booking check by document number
//! - **availability**: days an applicant can still book
//!
//! Every capacity change goes through a single store transaction
//! ([`InterviewStore::claim_slot`], [`InterviewStore::release_slot`],
//! [`InterviewStore::delete_day`]); the engines add validation, ticket retry
//! and notifications around them.

mod availability;
mod booking;
mod cancellation;
mod days;
mod eligibility;

pub use booking::Booking;
pub use eligibility::Eligibility;

use std::sync::Arc;

use tracing::{debug, warn};

use crate::clock::Clock;
use crate::notify::{Email, Notifier};
use crate::store::InterviewStore;
use crate::ticket::{RandomTickets, TicketIssuer};

pub const DEFAULT_TIME_WINDOW: &str = "7:00 AM - 11:00 AM";
pub const DEFAULT_LOCATION: &str = "Calle 52 #52-27 Copacabana, Antioquia, Colombia (Cuarto piso)";
pub const DEFAULT_ORGANIZATION: &str = "Gestión Humana";
pub const DEFAULT_TICKET_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerSettings {
    /// Label stored on every reservation; interviews run in one fixed block per day.
    pub time_window: String,
    /// Address printed on confirmation emails.
    pub location: String,
    /// Sender name printed in email footers.
    pub organization: String,
    /// Ticket codes tried before a booking gives up with `Conflict`.
    pub max_ticket_attempts: u32,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            time_window: DEFAULT_TIME_WINDOW.to_string(),
            location: DEFAULT_LOCATION.to_string(),
            organization: DEFAULT_ORGANIZATION.to_string(),
            max_ticket_attempts: DEFAULT_TICKET_ATTEMPTS,
        }
    }
}

pub struct Scheduler {
    store: Arc<dyn InterviewStore>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    tickets: Arc<dyn TicketIssuer>,
    settings: SchedulerSettings,
}

impl Scheduler {
    pub fn new(
        store: Arc<dyn InterviewStore>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        settings: SchedulerSettings,
    ) -> Self {
        Self {
            store,
            notifier,
            clock,
            tickets: Arc::new(RandomTickets),
            settings,
        }
    }

    pub fn with_tickets(mut self, tickets: Arc<dyn TicketIssuer>) -> Self {
        self.tickets = tickets;
        self
    }

    pub fn settings(&self) -> &SchedulerSettings {
        &self.settings
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Best-effort delivery; returns whether the email went out.
    async fn notify(&self, email: Email) -> bool {
        let subject = email.subject.clone();
        match self.notifier.send(email).await {
            Ok(()) => {
                debug!(%subject, "notification sent");
                true
            }
            Err(err) => {
                warn!(%subject, error = ?err, "failed to send notification");
                false
            }
        }
    }
}
