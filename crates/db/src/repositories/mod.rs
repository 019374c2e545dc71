pub mod applicant;
pub mod interview_day;
pub mod reservation;
