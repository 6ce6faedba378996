//! Simulated annealing over job dispatch orders.
//!
//! # Algorithm
//!
//! 1. Draw a uniformly random job order; its makespan is both the
//!    initial and the current makespan.
//! 2. For each of `iterations` steps:
//!    a. Copy the current order and swap two distinct positions
//!    b. Build the candidate's schedule and makespan
//!    c. Accept if it is strictly better, or if
//!       `exp(-delta / T) > u` for a fresh `u ~ U[0, 1)`
//!    d. Cool the temperature, accepted or not
//! 3. Report the initial makespan and the makespan the chain ends on.

use rand::Rng;
use tracing::debug;

use super::order::JobOrder;
use super::problem::JobShop;
use super::schedule::{Makespan, Schedule};
use super::table::{ensure_positive, DurationRange, OperationTimeTable};
use crate::error::Result;
use crate::sa::{CoolingSchedule, SaConfig, SaRunner};

/// Configuration for a job-shop annealing run.
///
/// # Examples
///
/// ```
/// use u_jobshop::jobshop::AnnealConfig;
///
/// let config = AnnealConfig::default()
///     .with_initial_temperature(1000.0)
///     .with_iterations(400)
///     .with_cooling_rate(0.8)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealConfig {
    /// Search parameters.
    pub sa: SaConfig,
    /// Range used to synthesize durations when no table is supplied.
    pub durations: DurationRange,
}

impl AnnealConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.sa.initial_temperature = t;
        self
    }

    pub fn with_iterations(mut self, n: usize) -> Self {
        self.sa.iterations = n;
        self
    }

    /// Geometric cooling factor applied after every iteration.
    pub fn with_cooling_rate(mut self, alpha: f64) -> Self {
        self.sa.cooling = CoolingSchedule::Geometric { alpha };
        self
    }

    pub fn with_cooling(mut self, cooling: CoolingSchedule) -> Self {
        self.sa.cooling = cooling;
        self
    }

    pub fn with_track_best(mut self, track: bool) -> Self {
        self.sa.track_best = track;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.sa.seed = Some(seed);
        self
    }

    pub fn with_durations(mut self, range: DurationRange) -> Self {
        self.durations = range;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.sa.validate()?;
        self.durations.validate()
    }
}

/// What an annealing run reports.
#[derive(Debug, Clone)]
pub struct AnnealOutcome {
    /// The randomly drawn starting order.
    pub initial_order: JobOrder,
    /// Makespan of `initial_order`.
    pub initial_makespan: Makespan,
    /// The order the chain holds at the end.
    pub final_order: JobOrder,
    /// Makespan of `final_order`. May be worse than an order visited
    /// earlier; see `best`.
    pub final_makespan: Makespan,
    /// Schedule of `final_order`.
    pub final_schedule: Schedule,
    /// Best order visited and its makespan, when best tracking is on.
    pub best: Option<(JobOrder, Makespan)>,
    /// Accepted moves, including improvements.
    pub accepted_moves: usize,
    /// Strictly improving moves.
    pub improving_moves: usize,
    /// Temperature after the last iteration.
    pub final_temperature: f64,
}

impl AnnealOutcome {
    /// `(initial_makespan, final_makespan)`.
    #[inline]
    pub fn makespans(&self) -> (Makespan, Makespan) {
        (self.initial_makespan, self.final_makespan)
    }
}

impl JobShop {
    /// Anneals over job orders for this instance.
    pub fn anneal<R: Rng>(&self, config: &SaConfig, rng: &mut R) -> Result<AnnealOutcome> {
        debug!(
            jobs = self.job_count(),
            ops = self.ops_per_job(),
            machines = self.machine_count(),
            temperature = config.initial_temperature,
            iterations = config.iterations,
            "annealing started"
        );

        let result = SaRunner::run_with_rng(self, config, rng)?;

        let final_schedule = self.schedule(&result.current);
        let outcome = AnnealOutcome {
            initial_makespan: self.makespan(&result.initial),
            initial_order: result.initial,
            final_makespan: final_schedule.makespan(),
            final_order: result.current,
            final_schedule,
            best: result.best.map(|(order, _)| {
                let makespan = self.makespan(&order);
                (order, makespan)
            }),
            accepted_moves: result.accepted_moves,
            improving_moves: result.improving_moves,
            final_temperature: result.final_temperature,
        };

        debug!(
            initial_makespan = outcome.initial_makespan,
            final_makespan = outcome.final_makespan,
            best_makespan = outcome.best.as_ref().map(|(_, m)| *m),
            accepted = outcome.accepted_moves,
            improving = outcome.improving_moves,
            "annealing finished"
        );
        Ok(outcome)
    }
}

/// Anneals a `job_count x ops_per_job` job shop on `machine_count`
/// machines.
///
/// When `time_table` is `None`, durations are drawn from
/// `config.durations` before the initial order is drawn; otherwise
/// `config.durations` is ignored. Every input is
/// validated before any random value is consumed.
///
/// # Errors
///
/// `InvalidInput` for a zero count or a table of the wrong shape;
/// `InvalidConfig` for bad search parameters.
///
/// # Examples
///
/// ```
/// use u_jobshop::jobshop::{anneal, AnnealConfig, OperationTimeTable};
/// use u_jobshop::sa::create_rng;
///
/// let table = OperationTimeTable::from_rows(&[[3u64, 6], [10, 1], [3, 2], [2, 4], [8, 8]])?;
/// let mut rng = create_rng(42);
/// let outcome = anneal(5, 2, 2, Some(table), &AnnealConfig::default(), &mut rng)?;
/// let (initial, last) = outcome.makespans();
/// assert!(initial >= 27 && last >= 27);
/// # Ok::<(), u_jobshop::Error>(())
/// ```
pub fn anneal<R: Rng>(
    job_count: usize,
    ops_per_job: usize,
    machine_count: usize,
    time_table: Option<OperationTimeTable>,
    config: &AnnealConfig,
    rng: &mut R,
) -> Result<AnnealOutcome> {
    ensure_positive("job_count", job_count)?;
    ensure_positive("ops_per_job", ops_per_job)?;
    ensure_positive("machine_count", machine_count)?;
    config.sa.validate()?;

    let table = match time_table {
        Some(table) => {
            table.ensure_shape(job_count, ops_per_job)?;
            table
        }
        None => {
            config.durations.validate()?;
            OperationTimeTable::random(job_count, ops_per_job, &config.durations, rng)?
        }
    };

    JobShop::new(table, machine_count)?.anneal(&config.sa, rng)
}
