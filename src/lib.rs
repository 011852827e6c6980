//! Damper - Burst-Damping Call Scheduler
//!
//! This crate wraps chatty callbacks in rate-limiting schedulers (throttle,
//! debounce, wait-last) that coalesce rapid call bursts into at most one
//! trailing execution. Every pending timer is tracked in a shared registry
//! so a context-change event (e.g. a navigation) can flush all of them at
//! once.

pub mod bus;
pub mod config;
pub mod error;
pub mod refresh;
pub mod schedule;
