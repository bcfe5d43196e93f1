//! Narrowing of histograms handed over by external subsystems.

use ns_core::{Error, Result};

use crate::histogram::{Th1D, Th1F};
use crate::shape::Shape;

/// A histogram as produced by an external subsystem (dataset binning, file readers).
///
/// Contents are carried as `f64` regardless of the producer's storage; `class_name`
/// decides which concrete [`Shape`] it narrows to.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalHistogram {
    /// Producer class name (`TH1F`, `TH1D`, ...).
    pub class_name: String,
    /// Histogram name.
    pub name: String,
    /// Bin edges (length = n_bins + 1).
    pub bin_edges: Vec<f64>,
    /// Bin contents (length = n_bins).
    pub bin_content: Vec<f64>,
    /// Container the producer registered the histogram with.
    pub directory: Option<String>,
}

impl ExternalHistogram {
    /// Build a boundary histogram with no container registration.
    pub fn new(
        class_name: impl Into<String>,
        name: impl Into<String>,
        bin_edges: Vec<f64>,
        bin_content: Vec<f64>,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            name: name.into(),
            bin_edges,
            bin_content,
            directory: None,
        }
    }
}

/// Narrow an external histogram to one of the supported concrete storages.
pub fn narrow(ext: ExternalHistogram) -> Result<Shape> {
    let ExternalHistogram { class_name, name, bin_edges, bin_content, directory } = ext;
    let mut shape = match class_name.as_str() {
        "TH1F" => {
            let contents = bin_content.into_iter().map(|v| v as f32).collect();
            Shape::F32(Th1F::new(name, bin_edges, contents)?)
        }
        "TH1D" => Shape::F64(Th1D::new(name, bin_edges, bin_content)?),
        _ => {
            return Err(Error::UnsupportedHistogramType(format!(
                "'{name}' has class {class_name}, expected TH1F or TH1D"
            )));
        }
    };
    if let Some(dir) = directory {
        shape.attach(dir);
    }
    Ok(shape)
}

impl TryFrom<ExternalHistogram> for Shape {
    type Error = Error;

    fn try_from(ext: ExternalHistogram) -> Result<Self> {
        narrow(ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narrow_th1f() {
        let ext = ExternalHistogram::new("TH1F", "h", vec![0.0, 1.0, 2.0], vec![1.0, 2.0]);
        let s = Shape::try_from(ext).unwrap();
        assert!(matches!(s, Shape::F32(_)));
        assert_eq!(s.contents_f64(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_narrow_keeps_directory() {
        let mut ext = ExternalHistogram::new("TH1D", "h", vec![0.0, 1.0], vec![4.0]);
        ext.directory = Some("shapes.root:/sr".into());
        let s = narrow(ext).unwrap();
        assert!(matches!(s, Shape::F64(_)));
        assert_eq!(s.directory(), Some("shapes.root:/sr"));
    }

    #[test]
    fn test_narrow_rejects_other_classes() {
        for class in ["TH1I", "TH2F", "TProfile"] {
            let ext = ExternalHistogram::new(class, "h", vec![0.0, 1.0], vec![1.0]);
            let err = narrow(ext).unwrap_err();
            assert!(matches!(err, Error::UnsupportedHistogramType(_)), "{class}: {err}");
        }
    }

    #[test]
    fn test_narrow_propagates_validation() {
        let ext = ExternalHistogram::new("TH1D", "h", vec![0.0, 1.0], vec![1.0, 2.0]);
        assert!(matches!(narrow(ext), Err(Error::Validation(_))));
    }
}
