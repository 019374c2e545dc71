use chrono::NaiveDate;

use crate::errors::BookingResult;
use crate::models::interview_day::InterviewDay;

use super::Scheduler;

impl Scheduler {
    /// Active days from `today` onwards that still have capacity, soonest first.
    pub async fn list_available_days(&self, today: NaiveDate) -> BookingResult<Vec<InterviewDay>> {
        self.store.list_available_days(today).await
    }

    /// [`Scheduler::list_available_days`] for the current civil date.
    pub async fn available_days(&self) -> BookingResult<Vec<InterviewDay>> {
        self.list_available_days(self.clock.today()).await
    }
}
