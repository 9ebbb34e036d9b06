//! Custom request extractors.

pub mod team;

pub use team::{TeamId, DEFAULT_TEAM_ID, TEAM_ID_HEADER};
