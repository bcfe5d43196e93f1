//! Event-level dataset that bins itself on demand.

use ns_core::{Error, Result};
use ns_hist::ExternalHistogram;

use crate::arena::DataSet;

/// Unbinned dataset over a single observable with optional per-event weights.
///
/// Entries outside `[edges[0], edges[n])` are dropped when binning.
#[derive(Debug, Clone)]
pub struct EventDataSet {
    name: String,
    variable: String,
    bin_edges: Vec<f64>,
    values: Vec<f64>,
    weights: Option<Vec<f64>>,
}

impl EventDataSet {
    /// Create a dataset for `variable` with the binning used by `create_histogram`.
    pub fn new(
        name: impl Into<String>,
        variable: impl Into<String>,
        bin_edges: Vec<f64>,
        values: Vec<f64>,
    ) -> Result<Self> {
        let name = name.into();
        if bin_edges.len() < 2 {
            return Err(Error::Validation(format!(
                "dataset '{name}' requires at least 2 bin edges, got {}",
                bin_edges.len()
            )));
        }
        if bin_edges.windows(2).any(|w| !(w[0] < w[1])) {
            return Err(Error::Validation(format!(
                "dataset '{name}' bin edges must be strictly increasing"
            )));
        }
        Ok(Self { name, variable: variable.into(), bin_edges, values, weights: None })
    }

    /// Attach per-event weights (same length as the values).
    pub fn with_weights(mut self, weights: Vec<f64>) -> Result<Self> {
        if weights.len() != self.values.len() {
            return Err(Error::Validation(format!(
                "dataset '{}' weights length mismatch: expected {}, got {}",
                self.name,
                self.values.len(),
                weights.len()
            )));
        }
        self.weights = Some(weights);
        Ok(self)
    }

    /// Number of events.
    pub fn n_events(&self) -> usize {
        self.values.len()
    }
}

/// Bin index for `val`, `None` for under/overflow.
fn find_bin(edges: &[f64], val: f64) -> Option<usize> {
    if !(val >= edges[0] && val < edges[edges.len() - 1]) {
        return None;
    }
    // Number of edges <= val, so the bin is one less.
    let k = edges.partition_point(|e| *e <= val);
    Some(k - 1)
}

impl DataSet for EventDataSet {
    fn name(&self) -> &str {
        &self.name
    }

    fn primary_variable_name(&self) -> Result<String> {
        Ok(self.variable.clone())
    }

    fn create_histogram(&self, variable: &str) -> Result<ExternalHistogram> {
        if variable != self.variable {
            return Err(Error::Validation(format!(
                "dataset '{}' has no variable '{variable}' (observable is '{}')",
                self.name, self.variable
            )));
        }
        let mut content = vec![0.0; self.bin_edges.len() - 1];
        for (i, &x) in self.values.iter().enumerate() {
            let w = self.weights.as_ref().map_or(1.0, |w| w[i]);
            if let Some(b) = find_bin(&self.bin_edges, x) {
                content[b] += w;
            }
        }
        Ok(ExternalHistogram::new(
            "TH1F",
            format!("{}__{}", self.name, variable),
            self.bin_edges.clone(),
            content,
        ))
    }
}
