//! Tabulated functions of the scalar argument.

use crate::error::{FunctionError, FunctionResult};
use bf_core::Real;

/// Rows of `(argument, values...)`, strictly increasing in the argument.
///
/// Evaluation interpolates linearly between rows and clamps to the first or
/// last row outside the table range.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    args: Vec<Real>,
    values: Vec<Vec<Real>>,
}

impl Table {
    pub fn new(rows: &[Vec<Real>]) -> FunctionResult<Self> {
        let Some(first) = rows.first() else {
            return Err(FunctionError::Table {
                what: "table has no rows",
            });
        };
        let width = first.len();
        if width < 2 {
            return Err(FunctionError::Table {
                what: "each row needs an argument and at least one value",
            });
        }

        let mut args = Vec::with_capacity(rows.len());
        let mut values = Vec::with_capacity(rows.len());
        for row in rows {
            if row.len() != width {
                return Err(FunctionError::Table {
                    what: "rows have inconsistent widths",
                });
            }
            if row.iter().any(|v| !v.is_finite()) {
                return Err(FunctionError::Table {
                    what: "table entries must be finite",
                });
            }
            if let Some(&prev) = args.last()
                && row[0] <= prev
            {
                return Err(FunctionError::Table {
                    what: "arguments must be strictly increasing",
                });
            }
            args.push(row[0]);
            values.push(row[1..].to_vec());
        }

        Ok(Self { args, values })
    }

    pub fn n_components(&self) -> usize {
        self.values.first().map_or(0, Vec::len)
    }

    /// Interpolate every component at `arg` into `out`.
    pub fn interpolate_into(&self, arg: Real, out: &mut [Real]) {
        let n = self.args.len();
        let (lo, hi, w) = if n == 1 || arg <= self.args[0] {
            (0, 0, 0.0)
        } else if arg >= self.args[n - 1] {
            (n - 1, n - 1, 0.0)
        } else {
            // First row whose argument exceeds `arg`; bracket is [hi-1, hi].
            let hi = self.args.partition_point(|&a| a <= arg);
            let lo = hi - 1;
            let w = (arg - self.args[lo]) / (self.args[hi] - self.args[lo]);
            (lo, hi, w)
        };

        for (c, slot) in out.iter_mut().enumerate() {
            *slot = match (self.values[lo].get(c), self.values[hi].get(c)) {
                (Some(a), Some(b)) => a + w * (b - a),
                _ => 0.0,
            };
        }
    }
}
