//! Two-sample proportion z-test
//!
//! Pooled normal approximation, used to score an interval's composition
//! against a baseline pooled from other intervals.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

use super::{AnnotationError, AnnotationResult};

/// Alternative hypothesis on `p1 - p2`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alternative {
    TwoSided,
    /// `p1 < p2`
    Smaller,
    /// `p1 > p2`
    Larger,
}

/// Test statistic and p-value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZTest {
    pub statistic: f64,
    pub p_value: f64,
}

/// Compare the proportions `counts[0] / nobs[0]` and `counts[1] / nobs[1]`.
///
/// Returns `None` when the pooled variance is zero (both samples entirely
/// successes or entirely failures), where no statistic exists.
pub fn proportions_ztest(
    counts: [usize; 2],
    nobs: [usize; 2],
    alternative: Alternative,
) -> AnnotationResult<Option<ZTest>> {
    for (count, n) in counts.iter().zip(nobs.iter()) {
        if *n == 0 || count > n {
            return Err(AnnotationError::InvalidParameter(format!(
                "Invalid proportion {}/{}",
                count, n
            )));
        }
    }

    let (c1, c2) = (counts[0] as f64, counts[1] as f64);
    let (n1, n2) = (nobs[0] as f64, nobs[1] as f64);

    let pooled = (c1 + c2) / (n1 + n2);
    let std_err = (pooled * (1.0 - pooled) * (1.0 / n1 + 1.0 / n2)).sqrt();
    if std_err == 0.0 || !std_err.is_finite() {
        return Ok(None);
    }

    let statistic = (c1 / n1 - c2 / n2) / std_err;
    let normal = Normal::new(0.0, 1.0).map_err(|e| AnnotationError::Statistics(e.to_string()))?;

    let p_value = match alternative {
        Alternative::TwoSided => 2.0 * normal.sf(statistic.abs()),
        Alternative::Smaller => normal.cdf(statistic),
        Alternative::Larger => normal.sf(statistic),
    };

    Ok(Some(ZTest { statistic, p_value }))
}
