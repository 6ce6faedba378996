//! Job-shop scheduling by simulated annealing.
//!
//! Minimizes the makespan of `J` jobs, each a chain of `N` operations,
//! on `M` machines by searching over job dispatch orders:
//!
//! - **Schedule builder**: deterministic mapping from a job order to
//!   timed operations under static round-robin machine assignment.
//! - **Simulated Annealing (SA)**: domain-agnostic trajectory search
//!   with the Metropolis acceptance criterion and pluggable cooling.
//! - **Annealer**: SA over job orders using single-swap perturbation.
//!
//! # Example
//!
//! ```
//! use u_jobshop::jobshop::{anneal, AnnealConfig};
//! use u_jobshop::sa::create_rng;
//!
//! let config = AnnealConfig::default().with_iterations(200);
//! let mut rng = create_rng(7);
//! let outcome = anneal(20, 3, 3, None, &config, &mut rng)?;
//! let (initial, last) = outcome.makespans();
//! println!("initial {initial}, final {last}");
//! # Ok::<(), u_jobshop::Error>(())
//! ```
//!
//! All randomness comes from a caller-supplied generator, so a seeded
//! generator reproduces a run exactly. Progress is reported through
//! `tracing` at debug and trace level.

pub mod error;
pub mod jobshop;
pub mod sa;

pub use error::{Error, Result};
