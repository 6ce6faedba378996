//! Operation processing times.

use crate::error::{Error, Result};
use rand::Rng;

/// Processing time unit. Durations and timestamps share it.
pub type Duration = u64;

/// Half-open integer range `[low, high)` for synthesized durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DurationRange {
    /// Smallest duration that can be drawn (inclusive).
    pub low: Duration,
    /// Exclusive upper bound.
    pub high: Duration,
}

impl Default for DurationRange {
    fn default() -> Self {
        Self { low: 5, high: 56 }
    }
}

impl DurationRange {
    pub fn new(low: Duration, high: Duration) -> Self {
        Self { low, high }
    }

    /// Validates that the range is non-empty and only yields positive values.
    pub fn validate(&self) -> Result<()> {
        if self.low == 0 {
            return Err(Error::config("duration range must start at 1 or above"));
        }
        if self.high <= self.low {
            return Err(Error::config(format!(
                "duration range [{}, {}) is empty",
                self.low, self.high
            )));
        }
        Ok(())
    }

    /// Returns true if `d` can be drawn from this range.
    #[inline]
    pub fn contains(&self, d: Duration) -> bool {
        (self.low..self.high).contains(&d)
    }
}

/// Largest total work a table may hold: 2^53.
///
/// Every end time is at most the sum of all durations, so bounding the
/// sum keeps timestamps free of overflow and exact as `f64` costs.
pub const MAX_TOTAL_DURATION: Duration = 1 << 53;

/// Immutable `J x N` matrix of processing durations.
///
/// Jobs and operations are addressed 1-based, the way they are labelled
/// in a schedule (`J11` is job 1, operation 1).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawTable")
)]
pub struct OperationTimeTable {
    job_count: usize,
    ops_per_job: usize,
    // Row-major: job (j - 1) occupies [(j - 1) * N, j * N).
    durations: Vec<Duration>,
}

/// Unchecked wire form; only reaches the table through `TryFrom`.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawTable {
    job_count: usize,
    ops_per_job: usize,
    durations: Vec<Duration>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawTable> for OperationTimeTable {
    type Error = Error;

    fn try_from(raw: RawTable) -> Result<Self> {
        Self::from_parts(raw.job_count, raw.ops_per_job, raw.durations)
    }
}

impl OperationTimeTable {
    /// Builds a table from one row of durations per job.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if there are no rows, no columns, ragged rows, any
    /// zero duration, or a total above [`MAX_TOTAL_DURATION`].
    pub fn from_rows<R: AsRef<[Duration]>>(rows: &[R]) -> Result<Self> {
        let job_count = rows.len();
        if job_count == 0 {
            return Err(Error::input("time table has no jobs"));
        }
        let ops_per_job = rows[0].as_ref().len();

        let mut durations = Vec::with_capacity(job_count * ops_per_job);
        for (j, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != ops_per_job {
                return Err(Error::input(format!(
                    "job {} has {} operations, expected {}",
                    j + 1,
                    row.len(),
                    ops_per_job
                )));
            }
            durations.extend_from_slice(row);
        }

        Self::from_parts(job_count, ops_per_job, durations)
    }

    /// Builds a table from row-major durations.
    pub fn from_parts(
        job_count: usize,
        ops_per_job: usize,
        durations: Vec<Duration>,
    ) -> Result<Self> {
        if job_count == 0 {
            return Err(Error::input("time table has no jobs"));
        }
        if ops_per_job == 0 {
            return Err(Error::input("time table has no operations"));
        }
        if job_count.checked_mul(ops_per_job) != Some(durations.len()) {
            return Err(Error::input(format!(
                "time table holds {} durations, expected {}x{}",
                durations.len(),
                job_count,
                ops_per_job
            )));
        }
        if let Some(i) = durations.iter().position(|&d| d == 0) {
            return Err(Error::input(format!(
                "duration of job {} operation {} must be positive",
                i / ops_per_job + 1,
                i % ops_per_job + 1
            )));
        }
        let total = durations
            .iter()
            .try_fold(0 as Duration, |acc, &d| acc.checked_add(d))
            .filter(|&t| t <= MAX_TOTAL_DURATION);
        if total.is_none() {
            return Err(Error::input(format!(
                "total duration exceeds {MAX_TOTAL_DURATION}"
            )));
        }

        Ok(Self {
            job_count,
            ops_per_job,
            durations,
        })
    }

    /// Samples every entry independently and uniformly from `range`,
    /// row by row.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a zero count, or when `J * N` draws at the top
    /// of `range` could exceed [`MAX_TOTAL_DURATION`]. Nothing is drawn
    /// on error.
    pub fn random<R: Rng>(
        job_count: usize,
        ops_per_job: usize,
        range: &DurationRange,
        rng: &mut R,
    ) -> Result<Self> {
        ensure_positive("job_count", job_count)?;
        ensure_positive("ops_per_job", ops_per_job)?;
        range.validate()?;

        let worst_total = job_count
            .checked_mul(ops_per_job)
            .and_then(|cells| (range.high - 1).checked_mul(cells as Duration));
        if !worst_total.is_some_and(|t| t <= MAX_TOTAL_DURATION) {
            return Err(Error::input(format!(
                "{job_count}x{ops_per_job} durations below {} may exceed total {MAX_TOTAL_DURATION}",
                range.high
            )));
        }

        let durations = (0..job_count * ops_per_job)
            .map(|_| rng.random_range(range.low..range.high))
            .collect();

        Ok(Self {
            job_count,
            ops_per_job,
            durations,
        })
    }

    /// Number of jobs (rows).
    #[inline]
    pub fn job_count(&self) -> usize {
        self.job_count
    }

    /// Number of operations per job (columns).
    #[inline]
    pub fn ops_per_job(&self) -> usize {
        self.ops_per_job
    }

    /// Duration of `operation` of `job`, both 1-based.
    ///
    /// # Panics
    ///
    /// If either index is 0 or out of range.
    #[inline]
    pub fn duration(&self, job: usize, operation: usize) -> Duration {
        assert!(
            (1..=self.job_count).contains(&job) && (1..=self.ops_per_job).contains(&operation),
            "no entry for job {job} operation {operation}"
        );
        self.durations[(job - 1) * self.ops_per_job + (operation - 1)]
    }

    /// The durations of one job's operations, in operation order.
    ///
    /// # Panics
    ///
    /// If `job` is 0 or greater than the job count.
    pub fn job_row(&self, job: usize) -> &[Duration] {
        assert!(
            (1..=self.job_count).contains(&job),
            "no job {job} in a table of {} jobs",
            self.job_count
        );
        let start = (job - 1) * self.ops_per_job;
        &self.durations[start..start + self.ops_per_job]
    }

    /// Sum of one job's durations.
    ///
    /// # Panics
    ///
    /// If `job` is 0 or greater than the job count.
    pub fn job_total(&self, job: usize) -> Duration {
        self.job_row(job).iter().sum()
    }

    /// Largest single-job total.
    ///
    /// A job's operations never overlap, so no schedule finishes earlier.
    pub fn max_job_total(&self) -> Duration {
        (1..=self.job_count)
            .map(|j| self.job_total(j))
            .max()
            .unwrap_or(0)
    }

    /// Total work per machine under round-robin assignment
    /// (operation `k` on machine `(k - 1) mod M`).
    pub fn machine_loads(&self, machine_count: usize) -> Vec<Duration> {
        let machines = machine_count.max(1);
        let mut loads = vec![0; machines];
        for row in self.durations.chunks(self.ops_per_job) {
            for (k, &d) in row.iter().enumerate() {
                loads[k % machines] += d;
            }
        }
        loads
    }

    /// A makespan lower bound valid for every job order: the larger of
    /// the longest job and the busiest machine.
    pub fn lower_bound(&self, machine_count: usize) -> Duration {
        let busiest = self
            .machine_loads(machine_count)
            .into_iter()
            .max()
            .unwrap_or(0);
        busiest.max(self.max_job_total())
    }

    /// Fails unless the table is exactly `job_count x ops_per_job`.
    pub fn ensure_shape(&self, job_count: usize, ops_per_job: usize) -> Result<()> {
        if self.job_count != job_count || self.ops_per_job != ops_per_job {
            return Err(Error::input(format!(
                "time table is {}x{}, expected {}x{}",
                self.job_count, self.ops_per_job, job_count, ops_per_job
            )));
        }
        Ok(())
    }
}

pub(crate) fn ensure_positive(name: &str, value: usize) -> Result<()> {
    if value == 0 {
        return Err(Error::input(format!("{name} must be positive")));
    }
    Ok(())
}
