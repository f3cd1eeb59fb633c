use ndarray::{Array1, Array2};

use super::StatsError;

/// Relative tolerance on the diagonal of `R` below which the design is singular.
const RANK_TOLERANCE: f64 = 1e-10;

/// Ordinary least squares estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct OlsFit {
    pub params: Array1<f64>,
    /// Standard errors using `ssr / (nobs - k)`.
    pub std_errors: Array1<f64>,
    pub ssr: f64,
    pub nobs: usize,
}

impl OlsFit {
    pub fn k(&self) -> usize {
        self.params.len()
    }

    pub fn t_value(&self, index: usize) -> f64 {
        self.params[index] / self.std_errors[index]
    }

    /// Gaussian log-likelihood at the OLS estimate.
    pub fn log_likelihood(&self) -> f64 {
        let nobs = self.nobs as f64;
        -nobs / 2.0 * ((2.0 * std::f64::consts::PI).ln() + (self.ssr / nobs).ln() + 1.0)
    }

    pub fn aic(&self) -> f64 {
        -2.0 * self.log_likelihood() + 2.0 * self.k() as f64
    }
}

/// Solve `min ||y - X b||` with a Householder QR decomposition of `X`.
pub fn ols(x: &Array2<f64>, y: &Array1<f64>) -> Result<OlsFit, StatsError> {
    let (nobs, k) = x.dim();
    if y.len() != nobs {
        return Err(StatsError::degenerate(format!(
            "design has {nobs} rows but response has {}",
            y.len()
        )));
    }
    if nobs <= k {
        return Err(StatsError::InsufficientData {
            required: k + 1,
            actual: nobs,
        });
    }

    let mut r = x.clone();
    let mut qty = y.clone();

    for j in 0..k {
        let norm = (j..nobs).map(|i| r[[i, j]] * r[[i, j]]).sum::<f64>().sqrt();
        if norm == 0.0 {
            continue;
        }

        let alpha = if r[[j, j]] > 0.0 { -norm } else { norm };
        let mut v: Vec<f64> = (j..nobs).map(|i| r[[i, j]]).collect();
        v[0] -= alpha;
        let v_norm_sq = v.iter().map(|value| value * value).sum::<f64>();
        if v_norm_sq == 0.0 {
            continue;
        }

        for col in j..k {
            let dot = (j..nobs).map(|i| v[i - j] * r[[i, col]]).sum::<f64>();
            let factor = 2.0 * dot / v_norm_sq;
            for i in j..nobs {
                r[[i, col]] -= factor * v[i - j];
            }
        }

        let dot = (j..nobs).map(|i| v[i - j] * qty[i]).sum::<f64>();
        let factor = 2.0 * dot / v_norm_sq;
        for i in j..nobs {
            qty[i] -= factor * v[i - j];
        }
    }

    let scale = (0..k).map(|j| r[[j, j]].abs()).fold(0.0_f64, f64::max);
    if scale == 0.0 || (0..k).any(|j| r[[j, j]].abs() <= RANK_TOLERANCE * scale) {
        return Err(StatsError::degenerate("design matrix is rank deficient"));
    }

    let mut params = Array1::<f64>::zeros(k);
    for j in (0..k).rev() {
        let tail = ((j + 1)..k).map(|c| r[[j, c]] * params[c]).sum::<f64>();
        params[j] = (qty[j] - tail) / r[[j, j]];
    }

    let residuals = y - &x.dot(&params);
    let ssr = residuals.iter().map(|e| e * e).sum::<f64>();

    // diag((X'X)^-1) = row norms of R^-1.
    let mut r_inv = Array2::<f64>::zeros((k, k));
    for col in 0..k {
        for row in (0..=col).rev() {
            let identity = if row == col { 1.0 } else { 0.0 };
            let tail = ((row + 1)..=col)
                .map(|c| r[[row, c]] * r_inv[[c, col]])
                .sum::<f64>();
            r_inv[[row, col]] = (identity - tail) / r[[row, row]];
        }
    }
    let sigma_sq = ssr / (nobs - k) as f64;
    let std_errors = Array1::from_shape_fn(k, |j| {
        let diag = (j..k).map(|c| r_inv[[j, c]] * r_inv[[j, c]]).sum::<f64>();
        (sigma_sq * diag).sqrt()
    });

    Ok(OlsFit {
        params,
        std_errors,
        ssr,
        nobs,
    })
}
