//! Job dispatch orders.

use crate::error::{Error, Result};
use rand::seq::{index, SliceRandom};
use rand::Rng;

/// A permutation of the job identifiers `1..=J`.
///
/// This is the order in which jobs are handed to the schedule builder,
/// not a per-machine sequence. Values are never edited in place; a
/// perturbation yields a new order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<usize>")
)]
pub struct JobOrder(Vec<usize>);

impl JobOrder {
    /// Validates that `jobs` is a permutation of `1..=jobs.len()`.
    pub fn new(jobs: Vec<usize>) -> Result<Self> {
        check_permutation(&jobs, jobs.len())?;
        Ok(Self(jobs))
    }

    /// The order `1, 2, ..., job_count`.
    pub fn identity(job_count: usize) -> Self {
        Self((1..=job_count).collect())
    }

    /// A uniformly random permutation of `1..=job_count`.
    pub fn random<R: Rng>(job_count: usize, rng: &mut R) -> Self {
        let mut jobs: Vec<usize> = (1..=job_count).collect();
        jobs.shuffle(rng);
        Self(jobs)
    }

    /// A copy with the jobs at positions `a` and `b` exchanged.
    pub fn swapped(&self, a: usize, b: usize) -> Self {
        let mut jobs = self.0.clone();
        jobs.swap(a, b);
        Self(jobs)
    }

    /// A copy with two distinct positions, drawn uniformly without
    /// replacement, exchanged.
    ///
    /// With fewer than two jobs there is nothing to exchange and no
    /// random value is drawn.
    pub fn random_swap<R: Rng>(&self, rng: &mut R) -> Self {
        if self.0.len() < 2 {
            return self.clone();
        }
        let picked = index::sample(rng, self.0.len(), 2);
        self.swapped(picked.index(0), picked.index(1))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    /// Fails unless this order covers exactly `job_count` jobs.
    pub fn ensure_job_count(&self, job_count: usize) -> Result<()> {
        check_permutation(&self.0, job_count)
    }
}

impl TryFrom<Vec<usize>> for JobOrder {
    type Error = Error;

    fn try_from(jobs: Vec<usize>) -> Result<Self> {
        Self::new(jobs)
    }
}

impl AsRef<[usize]> for JobOrder {
    fn as_ref(&self) -> &[usize] {
        &self.0
    }
}

fn check_permutation(jobs: &[usize], job_count: usize) -> Result<()> {
    if job_count == 0 {
        return Err(Error::input("job_count must be positive"));
    }
    if jobs.len() != job_count {
        return Err(Error::input(format!(
            "job order has {} entries, expected {}",
            jobs.len(),
            job_count
        )));
    }
    let mut seen = vec![false; job_count];
    for &job in jobs {
        if job == 0 || job > job_count {
            return Err(Error::input(format!(
                "job {job} is outside 1..={job_count}"
            )));
        }
        if std::mem::replace(&mut seen[job - 1], true) {
            return Err(Error::input(format!("job {job} appears twice")));
        }
    }
    Ok(())
}
