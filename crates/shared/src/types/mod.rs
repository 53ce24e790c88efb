//! Common types used across the application.

pub mod id;
pub mod money;

pub use id::{ParticipantId, ParticipantIdError};
pub use money::{Money, MoneyError};
