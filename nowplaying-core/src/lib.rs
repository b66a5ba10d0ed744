//! Nowplaying Core
//!
//! Core types shared by the job client and the command-line front end.
//!
//! This crate contains:
//! - Domain types: job handles, poll outcomes and the parsed track
//! - DTOs: wire shapes of the job submission and job status endpoints

pub mod domain;
pub mod dto;
