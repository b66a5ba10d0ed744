//! Core domain types
//!
//! These types describe one submit-to-completion lifecycle of a
//! "current music" lookup job, independent of how the endpoints are reached.

pub mod job;
pub mod track;
