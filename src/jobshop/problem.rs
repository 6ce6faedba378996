//! Job-shop instance as an annealing problem.

use rand::Rng;

use super::order::JobOrder;
use super::schedule::{build_unchecked, Makespan, Schedule};
use super::table::{ensure_positive, DurationRange, OperationTimeTable};
use crate::error::Result;
use crate::sa::SaProblem;

/// A validated problem instance: durations plus a machine count.
///
/// Job and operation counts come from the table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawJobShop")
)]
pub struct JobShop {
    table: OperationTimeTable,
    machine_count: usize,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawJobShop {
    table: OperationTimeTable,
    machine_count: usize,
}

#[cfg(feature = "serde")]
impl TryFrom<RawJobShop> for JobShop {
    type Error = crate::error::Error;

    fn try_from(raw: RawJobShop) -> Result<Self> {
        Self::new(raw.table, raw.machine_count)
    }
}

impl JobShop {
    pub fn new(table: OperationTimeTable, machine_count: usize) -> Result<Self> {
        ensure_positive("machine_count", machine_count)?;
        Ok(Self {
            table,
            machine_count,
        })
    }

    /// An instance whose durations are drawn from `range`.
    pub fn with_random_durations<R: Rng>(
        job_count: usize,
        ops_per_job: usize,
        machine_count: usize,
        range: &DurationRange,
        rng: &mut R,
    ) -> Result<Self> {
        ensure_positive("machine_count", machine_count)?;
        let table = OperationTimeTable::random(job_count, ops_per_job, range, rng)?;
        Self::new(table, machine_count)
    }

    #[inline]
    pub fn table(&self) -> &OperationTimeTable {
        &self.table
    }

    #[inline]
    pub fn job_count(&self) -> usize {
        self.table.job_count()
    }

    #[inline]
    pub fn ops_per_job(&self) -> usize {
        self.table.ops_per_job()
    }

    #[inline]
    pub fn machine_count(&self) -> usize {
        self.machine_count
    }

    /// Schedule for an order already known to fit this instance.
    pub(crate) fn schedule(&self, order: &JobOrder) -> Schedule {
        build_unchecked(order, &self.table, self.machine_count)
    }

    pub(crate) fn makespan(&self, order: &JobOrder) -> Makespan {
        self.schedule(order).makespan()
    }
}

impl SaProblem for JobShop {
    type Solution = JobOrder;

    fn initial_solution<R: Rng>(&self, rng: &mut R) -> JobOrder {
        JobOrder::random(self.job_count(), rng)
    }

    fn cost(&self, order: &JobOrder) -> f64 {
        self.makespan(order) as f64
    }

    fn neighbor<R: Rng>(&self, order: &JobOrder, rng: &mut R) -> JobOrder {
        order.random_swap(rng)
    }
}
