//! Order Events - In-process event dispatch for placed orders
//!
//! This crate implements a priority-ordered, failure-isolating event bus
//! with synchronous and asynchronous listeners, and the order workflow
//! (audit, email and high value review) built on top of it.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
