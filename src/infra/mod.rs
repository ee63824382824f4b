//! Infrastructure adapters: database, HTTP surface, storage, telemetry.

pub mod db;
pub mod error;
pub mod http;
pub mod passwords;
pub mod report;
pub mod storage;
pub mod telemetry;
