//! Named runs: a problem shape, optional fixed durations, and an
//! optional known makespan to compare against.
//!
//! Scenarios are independent. Each one gets its own generator and its
//! own failure, so a malformed scenario never stops the others.

use std::fmt;

use tracing::warn;

use super::anneal::{anneal, AnnealConfig};
use super::schedule::Makespan;
use super::table::OperationTimeTable;
use crate::error::Result;
use crate::sa::create_rng;

/// One annealing run to perform.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scenario {
    pub name: String,
    pub job_count: usize,
    pub ops_per_job: usize,
    pub machine_count: usize,
    /// Fixed durations; synthesized per run when absent.
    pub time_table: Option<OperationTimeTable>,
    /// Known optimal makespan under round-robin assignment.
    pub reference_makespan: Option<Makespan>,
}

impl Scenario {
    pub fn new(
        name: impl Into<String>,
        job_count: usize,
        ops_per_job: usize,
        machine_count: usize,
    ) -> Self {
        Self {
            name: name.into(),
            job_count,
            ops_per_job,
            machine_count,
            time_table: None,
            reference_makespan: None,
        }
    }

    pub fn with_time_table(mut self, table: OperationTimeTable) -> Self {
        self.time_table = Some(table);
        self
    }

    pub fn with_reference_makespan(mut self, makespan: Makespan) -> Self {
        self.reference_makespan = Some(makespan);
        self
    }

    /// Runs this scenario with a generator seeded from `seed`.
    pub fn run(&self, config: &AnnealConfig, seed: u64) -> Result<ScenarioReport> {
        let mut rng = create_rng(seed);
        let outcome = anneal(
            self.job_count,
            self.ops_per_job,
            self.machine_count,
            self.time_table.clone(),
            config,
            &mut rng,
        )?;

        Ok(ScenarioReport {
            name: self.name.clone(),
            seed,
            initial_makespan: outcome.initial_makespan,
            final_makespan: outcome.final_makespan,
            best_makespan: outcome.best.map(|(_, m)| m),
            reference_makespan: self.reference_makespan,
        })
    }
}

/// Result line for one scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScenarioReport {
    pub name: String,
    /// Seed the scenario's generator was built from.
    pub seed: u64,
    pub initial_makespan: Makespan,
    pub final_makespan: Makespan,
    pub best_makespan: Option<Makespan>,
    pub reference_makespan: Option<Makespan>,
}

impl ScenarioReport {
    /// Final makespan minus the reference, when a reference is known.
    pub fn gap(&self) -> Option<i64> {
        self.reference_makespan
            .map(|r| self.final_makespan as i64 - r as i64)
    }
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Initial Makespan: {}, Final Makespan: {}",
            self.name, self.initial_makespan, self.final_makespan
        )?;
        if let Some(best) = self.best_makespan {
            write!(f, ", Best Makespan: {best}")?;
        }
        if let Some(reference) = self.reference_makespan {
            write!(f, ", Optimal Makespan: {reference}")?;
        }
        Ok(())
    }
}

/// The three standard runs: a 5x2 literal instance on two machines with
/// known optimum 27, and two random 50-job instances (3 operations on 5
/// machines, 5 operations on 3 machines).
pub fn reference_scenarios() -> Vec<Scenario> {
    let r3_table = OperationTimeTable::from_rows(&[[3u64, 6], [10, 1], [3, 2], [2, 4], [8, 8]])
        .expect("R3 durations are positive and rectangular");

    vec![
        Scenario::new("R3", 5, 2, 2)
            .with_time_table(r3_table)
            .with_reference_makespan(27),
        Scenario::new("R4", 50, 3, 5),
        Scenario::new("R5", 50, 5, 3),
    ]
}

/// Runs every scenario; scenario `i` uses seed `base + i`, where `base`
/// is `config.sa.seed` or a fresh random value.
///
/// Results keep the input order. With the `parallel` feature the
/// scenarios run on the rayon pool; seeds, and so results, are the same
/// either way.
pub fn run_scenarios(scenarios: &[Scenario], config: &AnnealConfig) -> Vec<Result<ScenarioReport>> {
    let base = config.sa.seed.unwrap_or_else(rand::random);
    let run_one = |(i, scenario): (usize, &Scenario)| {
        let result = scenario.run(config, base.wrapping_add(i as u64));
        if let Err(err) = &result {
            warn!(scenario = %scenario.name, error = %err, "scenario failed");
        }
        result
    };

    #[cfg(feature = "parallel")]
    let reports: Vec<_> = {
        use rayon::prelude::*;
        scenarios.par_iter().enumerate().map(run_one).collect()
    };
    #[cfg(not(feature = "parallel"))]
    let reports: Vec<_> = scenarios.iter().enumerate().map(run_one).collect();

    reports
}
