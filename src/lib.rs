//! Turns per-vehicle transit GPS pings into validated trips.
//!
//! Each vehicle's stream is cut into candidate trips by [`segment`], using
//! speed and distance to the route terminals known to the
//! [`repository::Repository`]. [`calibrate`] derives per-route duration and
//! displacement windows from all candidates of a batch, [`filter`] keeps the
//! trips inside them and [`metrics`] measures what is left.
//! [`pipeline::Pipeline`] runs the whole batch.

pub mod calibrate;
pub mod config;
pub mod filter;
pub mod metrics;
pub mod pipeline;
pub mod prelude;
pub mod repository;
pub mod segment;
pub mod shared;
pub mod source;
pub mod trip;
