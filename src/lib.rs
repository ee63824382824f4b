//! Nagari: a municipal citizen-services backend.
//!
//! Citizens file complaints with photo evidence and track their status,
//! municipal staff triage them, and administrators publish notices, manage
//! accounts, and read system-wide reports. The crate is layered: `domain`
//! holds the vocabulary types, `application` the services behind repository
//! traits, and `infra` the Postgres, filesystem, and HTTP adapters.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
