//! Schedule construction under round-robin machine assignment.
//!
//! # Algorithm
//!
//! Jobs are taken in dispatch order; each job emits all of its
//! operations before the next job starts emitting. Operation `k`
//! (1-based) always runs on machine `(k - 1) mod M`. An operation starts
//! once both its machine and its job's previous operation are done:
//!
//! ```text
//! start = max(machine_free_at[m], job_ready_at[j])
//! end   = start + duration(j, k)
//! ```
//!
//! The assignment is static and ignores load; it is not an optimizer.

use std::fmt;

use super::order::JobOrder;
use super::table::{ensure_positive, Duration, OperationTimeTable};
use crate::error::Result;

/// Objective value: the latest end time in a schedule.
pub type Makespan = Duration;

/// One timed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OperationRecord {
    /// Job identifier (1-based).
    pub job: usize,
    /// Operation index within the job (1-based).
    pub operation: usize,
    /// Start time.
    pub start: Duration,
    /// End time.
    pub end: Duration,
    /// Machine index (0-based).
    pub machine: usize,
}

impl OperationRecord {
    /// Label of the form `J{job}{operation}`, e.g. `J12`.
    pub fn label(&self) -> String {
        format!("J{}{}", self.job, self.operation)
    }

    #[inline]
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

impl fmt::Display for OperationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on M{}: [{}, {})",
            self.label(),
            self.machine,
            self.start,
            self.end
        )
    }
}

/// Records in emission order (job by job), not chronological order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Schedule {
    records: Vec<OperationRecord>,
}

impl Schedule {
    #[inline]
    pub fn records(&self) -> &[OperationRecord] {
        &self.records
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Latest end time, or 0 for an empty schedule.
    pub fn makespan(&self) -> Makespan {
        self.records.iter().map(|r| r.end).max().unwrap_or(0)
    }

    /// Records assigned to `machine`, in emission order.
    pub fn on_machine(&self, machine: usize) -> impl Iterator<Item = &OperationRecord> + '_ {
        self.records.iter().filter(move |r| r.machine == machine)
    }

    /// Records of `job`, in operation order.
    pub fn for_job(&self, job: usize) -> impl Iterator<Item = &OperationRecord> + '_ {
        self.records.iter().filter(move |r| r.job == job)
    }

    /// Busy time per machine.
    pub fn machine_loads(&self, machine_count: usize) -> Vec<Duration> {
        let mut loads = vec![0; machine_count];
        for r in &self.records {
            if let Some(load) = loads.get_mut(r.machine) {
                *load += r.duration();
            }
        }
        loads
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = &'a OperationRecord;
    type IntoIter = std::slice::Iter<'a, OperationRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Builds the timed schedule for `job_order`.
///
/// Pure: the tracking arrays live only for this call, so equal inputs
/// give equal output. The result always holds `J * N` records.
///
/// # Errors
///
/// `InvalidInput` if `machine_count` is 0 or `job_order` is not a
/// permutation of the table's job identifiers.
///
/// # Examples
///
/// ```
/// use u_jobshop::jobshop::{build_schedule, JobOrder, OperationTimeTable};
///
/// let table = OperationTimeTable::from_rows(&[[3u64, 6], [10, 1]]).unwrap();
/// let schedule = build_schedule(&JobOrder::identity(2), &table, 2).unwrap();
/// assert_eq!(schedule.len(), 4);
/// assert_eq!(schedule.makespan(), 14);
/// ```
pub fn build_schedule(
    job_order: &JobOrder,
    table: &OperationTimeTable,
    machine_count: usize,
) -> Result<Schedule> {
    ensure_positive("machine_count", machine_count)?;
    job_order.ensure_job_count(table.job_count())?;
    Ok(build_unchecked(job_order, table, machine_count))
}

/// [`build_schedule`] without validation. Callers guarantee a valid
/// order for `table` and a positive machine count.
pub(crate) fn build_unchecked(
    job_order: &JobOrder,
    table: &OperationTimeTable,
    machine_count: usize,
) -> Schedule {
    let ops = table.ops_per_job();
    let mut machine_free_at = vec![0; machine_count];
    let mut job_ready_at = vec![0; table.job_count()];
    let mut records = Vec::with_capacity(job_order.len() * ops);

    for job in job_order.iter() {
        for (k, &duration) in table.job_row(job).iter().enumerate() {
            let machine = k % machine_count;
            let start = machine_free_at[machine].max(job_ready_at[job - 1]);
            let end = start + duration;

            records.push(OperationRecord {
                job,
                operation: k + 1,
                start,
                end,
                machine,
            });

            machine_free_at[machine] = end;
            job_ready_at[job - 1] = end;
        }
    }

    Schedule { records }
}
