//! Dense HyperLogLog estimator.
//!
//! Every estimator owns `2^p` byte-wide registers. Updates touch exactly one
//! register, merges take the register-wise maximum, and estimates are pure
//! reads over the whole array. Three estimation formulas are offered over the
//! same registers: the classic corrected HyperLogLog estimate, LogLog-Beta,
//! and Ertl's improved estimator.

use std::fmt;
use std::mem;

use tracing::debug;

use crate::error::{Result, SketchError};
use crate::util::{
    BETA_PRECISION, DEFAULT_PRECISION, MAX_PRECISION, MIN_PRECISION, alpha, beta,
    corrected_estimate, index_and_rank, inv_pow2, max_rank, precision_for_error_rate, sigma, tau,
};

/// Mergeable streaming cardinality estimator.
///
/// `HyperLogLog` consumes pre-hashed 64-bit values. It never hashes anything
/// itself, so estimation accuracy depends on the caller feeding uniformly
/// distributed hashes (see [`crate::hashing`] for a ready-made choice).
/// Estimators merge as long as they share the same
/// [`precision`](Self::precision).
#[derive(Clone, PartialEq, Eq)]
pub struct HyperLogLog {
    precision: u8,
    registers: Box<[u8]>,
}

impl Default for HyperLogLog {
    fn default() -> Self {
        Self::zeroed(DEFAULT_PRECISION)
    }
}

impl fmt::Debug for HyperLogLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HyperLogLog")
            .field("precision", &self.precision)
            .field("registers", &self.registers.len())
            .field("zeros", &self.zero_count())
            .finish()
    }
}

impl HyperLogLog {
    /// Creates an empty estimator with `2^precision` registers.
    ///
    /// `precision` must lie in `4..=18`.
    pub fn new(precision: u8) -> Result<Self> {
        check_precision(precision)?;
        debug!(precision, registers = 1usize << precision, "creating estimator");
        Ok(Self::zeroed(precision))
    }

    /// Creates an estimator sized for a target relative standard error.
    ///
    /// The precision is the smallest `p >= 4` with `1.04 / sqrt(2^p)` at or
    /// below `error_rate`. Rates that would need more than `2^18` registers are
    /// rejected.
    pub fn with_error_rate(error_rate: f64) -> Result<Self> {
        if !error_rate.is_finite() || error_rate <= 0.0 || error_rate >= 1.0 {
            return Err(SketchError::InvalidArgument(format!(
                "error rate must be in (0, 1), got {error_rate}"
            )));
        }
        let precision = precision_for_error_rate(error_rate);
        if precision > MAX_PRECISION as u32 {
            return Err(SketchError::InvalidArgument(format!(
                "error rate {error_rate} needs precision {precision}, above the maximum of {MAX_PRECISION}"
            )));
        }
        Self::new(precision as u8)
    }

    pub(crate) fn zeroed(precision: u8) -> Self {
        Self {
            precision,
            registers: vec![0u8; 1 << precision].into_boxed_slice(),
        }
    }

    pub(crate) fn from_parts(precision: u8, registers: Box<[u8]>) -> Self {
        debug_assert_eq!(registers.len(), 1 << precision);
        Self {
            precision,
            registers,
        }
    }

    /// Returns the configured precision `p`.
    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// Number of registers, `2^p`.
    pub fn register_count(&self) -> usize {
        self.registers.len()
    }

    /// Read-only view of the register array.
    pub fn registers(&self) -> &[u8] {
        &self.registers
    }

    /// Returns `true` if no hash has been recorded since creation or the last
    /// [`clear`](Self::clear).
    pub fn is_empty(&self) -> bool {
        self.registers.iter().all(|&r| r == 0)
    }

    /// Bytes held by this estimator, including the register buffer.
    pub fn memory_footprint(&self) -> usize {
        mem::size_of::<Self>() + self.registers.len()
    }

    /// Records one pre-hashed item.
    ///
    /// The low `p` bits pick the register; the rank of the leftmost set bit in
    /// the remaining `64 - p` bits is the candidate value. Returns whether the
    /// register grew.
    pub fn add(&mut self, hash: u64) -> bool {
        let (index, rank) = index_and_rank(hash, self.precision);
        let slot = &mut self.registers[index];
        if rank > *slot {
            *slot = rank;
            true
        } else {
            false
        }
    }

    /// Folds `other` into `self` by register-wise maximum.
    ///
    /// The result is the estimator that would have seen both streams. On a
    /// precision mismatch nothing is modified.
    pub fn merge(&mut self, other: &HyperLogLog) -> Result<()> {
        if self.precision != other.precision {
            debug!(
                left = self.precision,
                right = other.precision,
                "rejecting merge of mismatched precisions"
            );
            return Err(SketchError::IncompatiblePrecision {
                left: self.precision,
                right: other.precision,
            });
        }
        for (dst, &src) in self.registers.iter_mut().zip(other.registers.iter()) {
            if src > *dst {
                *dst = src;
            }
        }
        Ok(())
    }

    /// Merges every estimator in `others`, stopping at the first mismatch.
    ///
    /// Estimators merged before the failing one remain merged.
    pub fn merge_all<'a, I>(&mut self, others: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a HyperLogLog>,
    {
        for other in others {
            self.merge(other)?;
        }
        Ok(())
    }

    /// Resets every register to zero. The precision is kept.
    pub fn clear(&mut self) {
        self.registers.fill(0);
    }

    /// Classic HyperLogLog estimate with small- and large-range corrections.
    ///
    /// Returns `0.0` for an empty estimator.
    pub fn estimate(&self) -> f64 {
        let (sum, zeros) = self.sum_registers();
        let m = self.registers.len();
        if zeros == m {
            return 0.0;
        }
        let mf = m as f64;
        let raw = alpha(m) * mf * mf / sum;
        corrected_estimate(raw, m, zeros)
    }

    /// [`estimate`](Self::estimate) rounded to the nearest integer.
    pub fn cardinality(&self) -> u64 {
        self.estimate().round() as u64
    }

    /// LogLog-Beta estimate.
    ///
    /// A single formula for every range: the bias of the raw estimate is
    /// absorbed by a polynomial in the number of empty registers. The
    /// polynomial coefficients are only fitted for `p = 14`. At any other
    /// precision this returns [`estimate`](Self::estimate) instead.
    pub fn estimate_beta(&self) -> f64 {
        if self.precision != BETA_PRECISION {
            return self.estimate();
        }
        let (sum, zeros) = self.sum_registers();
        let m = self.registers.len();
        if zeros == m {
            return 0.0;
        }
        let mf = m as f64;
        let zeros = zeros as f64;
        alpha(m) * mf * (mf - zeros) / (beta(zeros) + sum)
    }

    /// Ertl's improved estimator, computed from the
    /// [register histogram](Self::register_histogram).
    ///
    /// Returns `f64::INFINITY` when every register is saturated at
    /// `64 - p + 1`, i.e. only hashes whose non-index bits are all zero were
    /// seen.
    pub fn estimate_improved(&self) -> f64 {
        let counts = self.register_histogram();
        let m = self.registers.len() as f64;
        let q = (64 - self.precision) as usize;

        let mut z = m * tau(1.0 - counts[q + 1] as f64 / m);
        for k in (1..=q).rev() {
            z += counts[k] as f64;
            z *= 0.5;
        }
        z += m * sigma(counts[0] as f64 / m);
        m * m / (2.0 * std::f64::consts::LN_2) / z
    }

    /// Counts how many registers hold each value.
    ///
    /// Entry `k` is the number of registers equal to `k`; the vector has
    /// `64 - p + 2` entries so every legal register value has a slot.
    pub fn register_histogram(&self) -> Vec<u32> {
        let mut counts = vec![0u32; max_rank(self.precision) as usize + 1];
        for &r in self.registers.iter() {
            counts[r as usize] += 1;
        }
        counts
    }

    fn zero_count(&self) -> usize {
        self.registers.iter().filter(|&&r| r == 0).count()
    }

    fn sum_registers(&self) -> (f64, usize) {
        let mut sum = 0.0;
        let mut zeros = 0;
        for &r in self.registers.iter() {
            sum += inv_pow2(r);
            zeros += (r == 0) as usize;
        }
        (sum, zeros)
    }
}

impl Extend<u64> for HyperLogLog {
    fn extend<T: IntoIterator<Item = u64>>(&mut self, hashes: T) {
        for hash in hashes {
            self.add(hash);
        }
    }
}

impl<'a> Extend<&'a u64> for HyperLogLog {
    fn extend<T: IntoIterator<Item = &'a u64>>(&mut self, hashes: T) {
        self.extend(hashes.into_iter().copied());
    }
}

pub(crate) fn check_precision(precision: u8) -> Result<()> {
    if !(MIN_PRECISION..=MAX_PRECISION).contains(&precision) {
        return Err(SketchError::InvalidArgument(format!(
            "precision must be between {MIN_PRECISION} and {MAX_PRECISION}, got {precision}"
        )));
    }
    Ok(())
}
