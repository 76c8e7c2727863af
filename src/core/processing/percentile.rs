use crate::error::{Error, Result};

/// Ascending copy of `samples`; ties are interchangeable
pub fn sorted_copy(samples: &[f64]) -> Vec<f64> {
    let mut sorted = samples.to_vec();
    sorted.sort_unstable_by(|a, b| a.total_cmp(b));
    sorted
}

/// Linear ("Excel") percentile of an ascending sequence, `p` in `[0, 100]`.
///
/// `rank = (N + 1) * p / 100`; ranks at or below 1 give the first sample, ranks
/// at or above `N` give the last one, anything in between interpolates
/// linearly between the two bracketing samples (1-based).
pub fn percentile(sorted: &[f64], p: f64) -> Result<f64> {
    let n = sorted.len();
    if n == 0 {
        return Err(Error::Processing(
            "percentile of an empty sample set".to_string(),
        ));
    }
    if !p.is_finite() || !(0.0..=100.0).contains(&p) {
        return Err(Error::InvalidArgument {
            arg: "percentile",
            value: p.to_string(),
        });
    }

    let rank = (n as f64 + 1.0) * p / 100.0;
    if rank <= 1.0 {
        return Ok(sorted[0]);
    }
    if rank >= n as f64 {
        return Ok(sorted[n - 1]);
    }
    let k = rank.floor() as usize;
    let d = rank - k as f64;
    Ok(sorted[k - 1] + d * (sorted[k] - sorted[k - 1]))
}
