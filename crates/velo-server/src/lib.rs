//! # velo-server
//!
//! HTTP server library for the velo bike rental system.
//!
//! This library provides the API handlers and state management for velo.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod api;
pub mod logging;
pub mod state;
