//! Job-shop makespan minimization.
//!
//! `J` jobs each run `N` operations in sequence; operation `k` of every
//! job is bound to machine `(k - 1) mod M`. The only decision is the
//! order in which jobs are dispatched. [`build_schedule`] turns an order
//! into timed operations, and [`anneal`] searches over orders with
//! simulated annealing.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 7
//! - van Laarhoven, Aarts & Lenstra (1992), "Job Shop Scheduling by
//!   Simulated Annealing"

mod anneal;
mod order;
mod problem;
mod schedule;
pub mod scenario;
mod table;

pub use anneal::{anneal, AnnealConfig, AnnealOutcome};
pub use order::JobOrder;
pub use problem::JobShop;
pub use schedule::{build_schedule, Makespan, OperationRecord, Schedule};
pub use scenario::{reference_scenarios, run_scenarios, Scenario, ScenarioReport};
pub use table::{Duration, DurationRange, OperationTimeTable, MAX_TOTAL_DURATION};
