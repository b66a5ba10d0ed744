//! Data Transfer Objects for the remote job endpoints
//!
//! DTOs mirror the JSON bodies exactly as the endpoints send them and are
//! converted into domain types before the poller acts on them.

pub mod job;
