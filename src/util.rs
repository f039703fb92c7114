pub(crate) const MIN_PRECISION: u8 = 4;
pub(crate) const MAX_PRECISION: u8 = 18;
pub(crate) const DEFAULT_PRECISION: u8 = 14;
/// The only precision the LogLog-Beta polynomial is fitted for.
pub(crate) const BETA_PRECISION: u8 = 14;

const TWO_32: f64 = 4_294_967_296.0;

/// Bias-correction constant for `m` registers.
pub(crate) fn alpha(m: usize) -> f64 {
    match m {
        16 => 0.673,
        32 => 0.697,
        64 => 0.709,
        _ => 0.7213 / (1.0 + 1.079 / m as f64),
    }
}

// 2^-n built straight from the IEEE754 exponent; n never exceeds 61.
pub(crate) fn inv_pow2(n: u8) -> f64 {
    let base = f64::to_bits(1.0);
    f64::from_bits(base - ((n as u64) << 52))
}

/// Highest rank a register can hold at precision `p`.
pub(crate) fn max_rank(precision: u8) -> u8 {
    64 - precision + 1
}

/// Splits `hash` into a register index (low `p` bits) and the rank of the
/// leftmost set bit in the remaining `64 - p` bits.
///
/// The shifted value has at least `p` leading zeros, so subtracting `p`
/// measures the run inside the `64 - p` bit window. An all-zero remainder
/// yields `64 - p + 1`.
pub(crate) fn index_and_rank(hash: u64, precision: u8) -> (usize, u8) {
    let index = (hash & ((1u64 << precision) - 1)) as usize;
    let remaining = hash >> precision;
    let rank = (remaining.leading_zeros() - precision as u32 + 1) as u8;
    (index, rank)
}

/// Smallest precision whose standard error `1.04 / sqrt(m)` meets `error_rate`.
///
/// Returns the unclamped value; callers check it against the supported range.
pub(crate) fn precision_for_error_rate(error_rate: f64) -> u32 {
    let bits = (1.04 / error_rate).powi(2).log2().ceil();
    (bits as u32).max(MIN_PRECISION as u32)
}

/// Small-range correction polynomial of LogLog-Beta, fitted for `p = 14`.
pub(crate) fn beta(zeros: f64) -> f64 {
    let zl = (zeros + 1.0).ln();
    -0.370393911 * zeros
        + 0.070471823 * zl
        + 0.17393686 * zl.powi(2)
        + 0.16339839 * zl.powi(3)
        + -0.09237745 * zl.powi(4)
        + 0.03738027 * zl.powi(5)
        + -0.005384159 * zl.powi(6)
        + 0.00042419 * zl.powi(7)
}

/// Ertl's `sigma(x) = x + sum_{k>=1} x^(2^k) 2^(k-1)`, diverging at `x = 1`.
pub(crate) fn sigma(mut x: f64) -> f64 {
    if x == 1.0 {
        return f64::INFINITY;
    }
    let mut y = 1.0;
    let mut z = x;
    loop {
        x *= x;
        let previous = z;
        z += x * y;
        y += y;
        if previous == z {
            return z;
        }
    }
}

/// Ertl's `tau(x)`, the correction for saturated registers.
pub(crate) fn tau(mut x: f64) -> f64 {
    if x == 0.0 || x == 1.0 {
        return 0.0;
    }
    let mut y = 1.0;
    let mut z = 1.0 - x;
    loop {
        x = x.sqrt();
        let previous = z;
        y *= 0.5;
        z -= (1.0 - x).powi(2) * y;
        if previous == z {
            return z / 3.0;
        }
    }
}

/// Applies the small- and large-range corrections to a raw harmonic-mean
/// estimate.
pub(crate) fn corrected_estimate(raw: f64, m: usize, zeros: usize) -> f64 {
    let m = m as f64;
    if raw <= 2.5 * m {
        if zeros > 0 {
            m * (m / zeros as f64).ln()
        } else {
            raw
        }
    } else if raw > TWO_32 / 30.0 && raw < TWO_32 {
        -TWO_32 * (1.0 - raw / TWO_32).ln()
    } else {
        raw
    }
}
