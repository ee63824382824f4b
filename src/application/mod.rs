//! Application services orchestrating domain rules over the repositories.

pub mod activity;
pub mod auth;
pub mod complaints;
pub mod error;
pub mod notices;
pub mod notifications;
pub mod reminders;
pub mod reports;
pub mod repos;
pub mod storage;
pub mod users;
