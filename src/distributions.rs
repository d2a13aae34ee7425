//! Probability distributions.
//!
//! Discrete distribution types with analytical moments, point
//! probabilities and enumerated probability mass tables.
//!
//! # Supported Distributions
//!
//! | Distribution | Parameters | Mean | Variance |
//! |---|---|---|---|
//! | [`Poisson`] | λ > 0 | λ | λ |
//!
//! # Probability Mass Tables
//!
//! [`poisson_distribution`] enumerates `P(X = k)` for `k = 0, 1, 2, …`
//! until the cumulative probability reaches `1 − ε` ([`EPSILON`]). The
//! outcomes form a contiguous prefix, so a [`PoissonTable`] stores them
//! densely, indexed by `k`.

use std::collections::BTreeMap;

use rand::Rng;
use thiserror::Error;
use tracing::{debug, trace};

use crate::special;
use crate::stats::CompensatedSum;

/// Stopping tolerance for probability mass enumeration.
///
/// Enumeration stops at the first `K` for which `P(X ≤ K) ≥ 1 − EPSILON`.
pub const EPSILON: f64 = 1e-4;

/// Smallest tolerance accepted by [`Poisson::table_with_tolerance`].
///
/// Each mass carries a few ulps of rounding, so the enumerated total is
/// only trustworthy to about `1e-15`.
pub const MIN_TOLERANCE: f64 = 1e-14;

/// Error type for invalid distribution parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DistributionError {
    /// Parameters violate distribution constraints.
    #[error("invalid distribution parameters: {0}")]
    InvalidParameters(String),
}

/// Enumerates the Poisson probability mass table for rate `lambda`.
///
/// Cells are produced for `k = 0, 1, 2, …` until their running sum is at
/// least `1 − `[`EPSILON`]. The `k = 0` cell is always produced.
///
/// # Complexity
/// Time and space O(λ + √λ): the table extends a few standard deviations
/// past the mean.
///
/// # Returns
/// - `None` if `lambda <= 0` or is not finite.
///
/// # Examples
/// ```
/// use u_stats::distributions::{poisson_distribution, EPSILON};
/// let table = poisson_distribution(1.0).unwrap();
/// assert!((table.get(0).unwrap() - 0.3679).abs() < 1e-4);
/// assert!((table.get(1).unwrap() - 0.3679).abs() < 1e-4);
/// assert!(table.total_probability() >= 1.0 - EPSILON);
///
/// assert!(poisson_distribution(0.0).is_none());
/// assert!(poisson_distribution(-2.5).is_none());
/// ```
pub fn poisson_distribution(lambda: f64) -> Option<PoissonTable> {
    Poisson::new(lambda).ok().map(|p| p.table())
}

// ============================================================================
// Poisson Distribution
// ============================================================================

/// Poisson distribution with rate λ.
///
/// # Mathematical Definition
/// - PMF: P(X = k) = e^(−λ) λ^k / k!
/// - CDF: P(X ≤ k) = Q(k + 1, λ), the regularized upper incomplete gamma
/// - Mean: λ
/// - Variance: λ
#[derive(Debug, Clone, PartialEq)]
pub struct Poisson {
    lambda: f64,
}

impl Poisson {
    /// Creates a new Poisson distribution.
    ///
    /// # Errors
    /// Returns `Err` if `lambda` is not finite or `lambda <= 0`.
    pub fn new(lambda: f64) -> Result<Self, DistributionError> {
        if !lambda.is_finite() || lambda <= 0.0 {
            return Err(DistributionError::InvalidParameters(format!(
                "Poisson requires finite λ > 0, got λ={lambda}"
            )));
        }
        Ok(Self { lambda })
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn mean(&self) -> f64 {
        self.lambda
    }

    pub fn variance(&self) -> f64 {
        self.lambda
    }

    pub fn std_dev(&self) -> f64 {
        self.lambda.sqrt()
    }

    /// Mode: ⌊λ⌋. For integer λ, `λ − 1` is an equal mode.
    pub fn mode(&self) -> u64 {
        self.lambda.floor() as u64
    }

    /// Log PMF, ln(e^(−λ) λ^k / k!).
    ///
    /// # Algorithm
    /// Saddle-point form
    /// ```text
    /// ln p(k) = −δ(k) − D(k, λ) − ½ ln(2πk),   k ≥ 1
    /// ```
    /// with δ the Stirling error and D the deviance term. Both are small
    /// and computed without cancellation, so the result keeps full relative
    /// precision even when `k ln λ` and `ln k!` are both around 10⁷.
    ///
    /// Reference: Loader (2000), "Fast and Accurate Computation of Binomial
    /// Probabilities".
    pub fn ln_pmf(&self, k: u64) -> f64 {
        if k == 0 {
            return -self.lambda;
        }
        let x = k as f64;
        -special::stirling_error(k)
            - special::deviance_term(x, self.lambda)
            - 0.5 * (2.0 * std::f64::consts::PI * x).ln()
    }

    /// PMF: e^(−λ) λ^k / k!.
    ///
    /// Neither `λ^k` nor `k!` is formed, so the result does not overflow
    /// for large `k` or `λ`.
    pub fn pmf(&self, k: u64) -> f64 {
        self.ln_pmf(k).exp()
    }

    /// CDF: P(X ≤ k) = 1 − P(k + 1, λ).
    pub fn cdf(&self, k: u64) -> f64 {
        1.0 - special::regularized_lower_gamma(k as f64 + 1.0, self.lambda)
    }

    /// Enumerates the probability mass table with the default [`EPSILON`].
    pub fn table(&self) -> PoissonTable {
        PoissonTable::enumerate(self, EPSILON)
    }

    /// Enumerates the probability mass table with a custom tolerance.
    ///
    /// # Errors
    /// Returns `Err` unless `MIN_TOLERANCE <= epsilon < 1`.
    pub fn table_with_tolerance(&self, epsilon: f64) -> Result<PoissonTable, DistributionError> {
        if !(MIN_TOLERANCE..1.0).contains(&epsilon) {
            return Err(DistributionError::InvalidParameters(format!(
                "enumeration tolerance must lie in [{MIN_TOLERANCE:e}, 1), got ε={epsilon}"
            )));
        }
        Ok(PoissonTable::enumerate(self, epsilon))
    }
}

// ============================================================================
// Probability Mass Table
// ============================================================================

/// Enumerated Poisson probability masses for outcomes `0..=K`.
///
/// `K` is the smallest outcome at which the running total of the masses
/// reaches `1 − ε`. Every shorter prefix sums to less than `1 − ε`.
///
/// # Examples
/// ```
/// use u_stats::distributions::Poisson;
/// let table = Poisson::new(5.0).unwrap().table();
/// assert!(matches!(table.mode(), 4 | 5));
/// for (k, p) in table.iter() {
///     assert!(p > 0.0 && p < 1.0, "P({k}) = {p}");
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PoissonTable {
    lambda: f64,
    epsilon: f64,
    masses: Vec<f64>,
    cumulative: Vec<f64>,
}

impl PoissonTable {
    /// Builds the table. The caller guarantees `0 < epsilon < 1`.
    ///
    /// # Algorithm
    /// Each mass is evaluated independently with [`Poisson::pmf`], so no
    /// rounding carries from one cell to the next, and the running total
    /// is a compensated sum.
    ///
    /// Past the mean the masses decay faster than a geometric series with
    /// ratio `r = λ/(k+1)`, so everything after cell `k` adds at most
    /// `p(k)·r/(1−r)`. Once that bound can no longer change the total in
    /// f64 the enumeration stops even if `1 − ε` was not reached. For
    /// `ε >= MIN_TOLERANCE` the target is always reached first.
    fn enumerate(poisson: &Poisson, epsilon: f64) -> Self {
        let lambda = poisson.lambda;
        let target = 1.0 - epsilon;

        let mut masses = Vec::new();
        let mut cumulative = Vec::new();
        let mut running = CompensatedSum::new();
        let mut k: u64 = 0;

        loop {
            let mass = poisson.pmf(k);
            running.add(mass);
            let total = running.value();
            masses.push(mass);
            cumulative.push(total);

            if total >= target {
                break;
            }
            if (k as f64) > lambda {
                let ratio = lambda / (k + 1) as f64;
                let tail_bound = mass * ratio / (1.0 - ratio);
                if tail_bound <= total * f64::EPSILON / 2.0 {
                    debug!(
                        lambda,
                        epsilon,
                        cells = masses.len(),
                        total,
                        tail_bound,
                        "Poisson tail exhausted below 1 − ε"
                    );
                    break;
                }
            }

            k += 1;
        }

        trace!(
            lambda,
            epsilon,
            cells = masses.len(),
            total = running.value(),
            "Poisson table enumerated"
        );

        Self {
            lambda,
            epsilon,
            masses,
            cumulative,
        }
    }

    /// The rate λ this table was built for.
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// The stopping tolerance ε this table was built with.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Probability mass of outcome `k`, or `None` past the last outcome.
    pub fn get(&self, k: u64) -> Option<f64> {
        usize::try_from(k)
            .ok()
            .and_then(|i| self.masses.get(i))
            .copied()
    }

    /// Number of enumerated outcomes, `K + 1`. Never zero.
    pub fn len(&self) -> usize {
        self.masses.len()
    }

    /// Never true for a constructed table: the `k = 0` outcome is always
    /// enumerated.
    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }

    /// The last enumerated outcome `K`.
    pub fn max_outcome(&self) -> u64 {
        self.masses.len().saturating_sub(1) as u64
    }

    /// Masses indexed by outcome.
    pub fn masses(&self) -> &[f64] {
        &self.masses
    }

    /// Running totals: `cumulative()[k]` is `P(0) + … + P(k)`.
    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    /// Compensated sum of all enumerated masses, at least `1 − ε`.
    pub fn total_probability(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Iterates `(k, P(k))` pairs in increasing `k`.
    pub fn iter(&self) -> impl Iterator<Item = (u64, f64)> + '_ {
        self.masses.iter().enumerate().map(|(k, &p)| (k as u64, p))
    }

    /// Outcome with the largest mass. Ties resolve to the smaller outcome.
    pub fn mode(&self) -> u64 {
        let mut best = 0;
        for (k, &p) in self.masses.iter().enumerate() {
            if p > self.masses[best] {
                best = k;
            }
        }
        best as u64
    }

    /// Copies the table into an ordered `k → P(k)` map.
    pub fn to_map(&self) -> BTreeMap<u64, f64> {
        self.iter().collect()
    }

    /// Draws an outcome by inverse-CDF lookup over the running totals.
    ///
    /// The draw is conditioned on the enumerated outcomes: the missing tail
    /// mass (at most ε) is redistributed proportionally.
    ///
    /// # Complexity
    /// O(log K) via binary search.
    ///
    /// # Examples
    /// ```
    /// use u_stats::distributions::poisson_distribution;
    /// use u_stats::random::create_rng;
    /// let table = poisson_distribution(3.0).unwrap();
    /// let mut rng = create_rng(7);
    /// let k = table.sample(&mut rng);
    /// assert!(k <= table.max_outcome());
    /// ```
    pub fn sample<R: Rng>(&self, rng: &mut R) -> u64 {
        let threshold = rng.random_range(0.0..self.total_probability());
        let idx = self.cumulative.partition_point(|&c| c <= threshold);
        idx.min(self.masses.len() - 1) as u64
    }
}

// ============================================================================
// Tests
// ============================================================================
