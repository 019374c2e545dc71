//! # TalentGate Core
//!
//! Domain types and the interview slot allocation engines. Storage and email
//! delivery are reached through the [`store::InterviewStore`] and
//! [`notify::Notifier`] traits so the engines run unchanged against
//! PostgreSQL in production and the in-memory store in tests.

pub mod clock;
pub mod errors;
pub mod models;
pub mod notifications;
pub mod notify;
pub mod scheduling;
pub mod store;
pub mod ticket;

#[cfg(any(test, feature = "testing"))]
pub mod memory;
