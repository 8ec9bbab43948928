//! Ordinary least squares over a fixed three-feature input, solved via
//! the normal equations. The training sets here are tiny (one row per
//! user/topic pair), so a direct 4x4 solve is all that's needed.

pub const NUM_FEATURES: usize = 3;

/// Fitted linear model: `y = intercept + coef · x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearModel {
    pub intercept: f64,
    pub coef: [f64; NUM_FEATURES],
}

impl LinearModel {
    /// Fits by solving `(XᵀX) β = Xᵀy` with an implicit intercept
    /// column. Returns `None` when the system is degenerate (e.g. all
    /// rows identical), which callers treat as a fitting failure.
    pub fn fit(features: &[[f64; NUM_FEATURES]], targets: &[f64]) -> Option<LinearModel> {
        if features.len() != targets.len() || features.len() < 2 {
            return None;
        }

        const N: usize = NUM_FEATURES + 1;
        let mut xtx = [[0.0f64; N]; N];
        let mut xty = [0.0f64; N];

        for (row, &y) in features.iter().zip(targets) {
            let x = [1.0, row[0], row[1], row[2]];
            for i in 0..N {
                xty[i] += x[i] * y;
                for j in 0..N {
                    xtx[i][j] += x[i] * x[j];
                }
            }
        }

        let beta = solve(xtx, xty)?;
        Some(LinearModel {
            intercept: beta[0],
            coef: [beta[1], beta[2], beta[3]],
        })
    }

    pub fn predict(&self, x: &[f64; NUM_FEATURES]) -> f64 {
        self.intercept + self.coef.iter().zip(x).map(|(c, v)| c * v).sum::<f64>()
    }
}

/// Gaussian elimination with partial pivoting for the 4x4 normal
/// system. `None` when a pivot collapses below tolerance.
fn solve(mut a: [[f64; 4]; 4], mut b: [f64; 4]) -> Option<[f64; 4]> {
    const EPS: f64 = 1e-9;

    for col in 0..4 {
        let pivot_row = (col..4).max_by(|&i, &j| {
            a[i][col]
                .abs()
                .partial_cmp(&a[j][col].abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;
        if a[pivot_row][col].abs() < EPS {
            return None;
        }
        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        for row in (col + 1)..4 {
            let factor = a[row][col] / a[col][col];
            for k in col..4 {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = [0.0f64; 4];
    for row in (0..4).rev() {
        let mut sum = b[row];
        for k in (row + 1)..4 {
            sum -= a[row][k] * x[k];
        }
        x[row] = sum / a[row][row];
    }
    Some(x)
}
