//! Pairwise Pearson correlation over complete-case rows.

use serde::Serialize;

use super::numeric::aligned_column;
use crate::config::AnalyticsConfig;
use crate::data::table::LabeledTable;

/// Features with fewer valid values than this are left out of the matrix.
pub const DEFAULT_MIN_VALID_COUNT: usize = 100;
/// Pairs with fewer complete-case rows than this correlate to 0.
pub const DEFAULT_MIN_PAIR_ROWS: usize = 11;

/// Pearson correlation from raw sums:
///
/// `r = (nΣxy − ΣxΣy) / sqrt((nΣx² − (Σx)²)(nΣy² − (Σy)²))`
///
/// Returns 0.0 when the denominator vanishes (a constant series). The result
/// is clamped to `[-1, 1]` to absorb rounding.
#[must_use]
pub fn pearson(pairs: &[(f64, f64)]) -> f64 {
    let n = pairs.len() as f64;
    let (mut sx, mut sy, mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for &(x, y) in pairs {
        sx += x;
        sy += y;
        sxy += x * y;
        sxx += x * x;
        syy += y * y;
    }
    let denom = ((n * sxx - sx * sx) * (n * syy - sy * sy)).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return 0.0;
    }
    ((n * sxy - sx * sy) / denom).clamp(-1.0, 1.0)
}

/// Square, symmetric correlation matrix indexed by feature name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    /// Features that met the valid-count threshold, in candidate order.
    pub features: Vec<String>,
    /// Candidates left out for having too few valid values.
    pub excluded: Vec<String>,
    /// Row-major `features.len()²` entries.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Build the matrix with thresholds taken from `config`.
    pub fn new<T>(table: &T, candidates: &[String], config: &AnalyticsConfig) -> Self
    where
        T: LabeledTable + ?Sized,
    {
        Self::with_thresholds(
            table,
            candidates,
            config.min_valid_count,
            config.min_pair_rows,
        )
    }

    /// Build the matrix over `candidates`.
    ///
    /// 1. Candidates with fewer than `min_valid` valid values are excluded.
    /// 2. Each unordered pair is correlated over the rows where both features
    ///    are valid; fewer than `min_pairs` such rows gives 0.
    /// 3. The upper triangle is mirrored, so `m[i][j] == m[j][i]` exactly.
    pub fn with_thresholds<T>(
        table: &T,
        candidates: &[String],
        min_valid: usize,
        min_pairs: usize,
    ) -> Self
    where
        T: LabeledTable + ?Sized,
    {
        let mut features = Vec::new();
        let mut columns = Vec::new();
        let mut excluded = Vec::new();
        for name in candidates {
            let column = aligned_column(table, name);
            let valid = column.iter().flatten().count();
            if valid < min_valid {
                log::warn!("{name}: {valid} valid values (< {min_valid}), excluded from correlation");
                excluded.push(name.clone());
            } else {
                features.push(name.clone());
                columns.push(column);
            }
        }

        let k = features.len();
        let mut values = vec![vec![0.0; k]; k];
        for i in 0..k {
            for j in i..k {
                let pairs = complete_cases(&columns[i], &columns[j]);
                let r = if pairs.len() < min_pairs {
                    0.0
                } else {
                    pearson(&pairs)
                };
                values[i][j] = r;
                values[j][i] = r;
            }
        }
        log::debug!("correlation matrix over {k} features ({} excluded)", excluded.len());

        CorrelationMatrix {
            features,
            excluded,
            values,
        }
    }

    /// Entry for a named pair, if both features are in the matrix.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.features.iter().position(|f| f == a)?;
        let j = self.features.iter().position(|f| f == b)?;
        Some(self.values[i][j])
    }

    pub fn size(&self) -> usize {
        self.features.len()
    }
}

fn complete_cases(x: &[Option<f64>], y: &[Option<f64>]) -> Vec<(f64, f64)> {
    x.iter()
        .zip(y)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .collect()
}
