//! `docflow-events` — the domain event contract.
//!
//! Document and account aggregates describe what happened through events
//! implementing this trait; services apply them to evolve state.

pub mod event;

pub use event::Event;
