//! Tagged shape variant over the two supported histogram storages.

use ns_core::Result;

use crate::histogram::{BinValue, Histogram, Th1D, Th1F};

/// A binned shape with either single- or double-precision storage.
///
/// Every consumer matches on the variant; there is no third representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Single-precision storage (TH1F).
    F32(Th1F),
    /// Double-precision storage (TH1D).
    F64(Th1D),
}

macro_rules! dispatch {
    ($self:expr, $h:ident => $body:expr) => {
        match $self {
            Shape::F32($h) => $body,
            Shape::F64($h) => $body,
        }
    };
}

impl Shape {
    /// ROOT class name of the underlying storage.
    pub fn class_name(&self) -> &'static str {
        match self {
            Shape::F32(_) => "TH1F",
            Shape::F64(_) => "TH1D",
        }
    }

    /// Histogram name.
    pub fn name(&self) -> &str {
        dispatch!(self, h => h.name())
    }

    /// Bin edges (length = n_bins + 1).
    pub fn bin_edges(&self) -> &[f64] {
        dispatch!(self, h => h.bin_edges())
    }

    /// Number of bins.
    pub fn n_bins(&self) -> usize {
        dispatch!(self, h => h.n_bins())
    }

    /// Content of bin `i` (0-based).
    pub fn bin_content(&self, i: usize) -> Option<f64> {
        dispatch!(self, h => h.bin_content(i))
    }

    /// All bin contents widened to `f64`.
    pub fn contents_f64(&self) -> Vec<f64> {
        (0..self.n_bins()).filter_map(|i| self.bin_content(i)).collect()
    }

    /// Overwrite the content of bin `i` (0-based).
    pub fn set_bin_content(&mut self, i: usize, value: f64) -> Result<()> {
        dispatch!(self, h => h.set_bin_content(i, value))
    }

    /// Sum of bin contents.
    pub fn integral(&self) -> f64 {
        dispatch!(self, h => h.integral())
    }

    /// Multiply every bin by `factor`.
    pub fn scale(&mut self, factor: f64) {
        dispatch!(self, h => h.scale(factor))
    }

    /// Rescale to unit integral; `false` if the integral is not strictly positive.
    pub fn normalize(&mut self) -> bool {
        dispatch!(self, h => h.normalize())
    }

    /// Whether any bin has negative content.
    pub fn has_negative_bins(&self) -> bool {
        dispatch!(self, h => h.has_negative_bins())
    }

    /// First bin with negative content, if any.
    pub fn first_negative_bin(&self) -> Option<(usize, f64)> {
        dispatch!(self, h => h.first_negative_bin())
    }

    /// Container this shape is registered with, if any.
    pub fn directory(&self) -> Option<&str> {
        dispatch!(self, h => h.directory())
    }

    /// Register with an external container.
    pub fn attach(&mut self, directory: impl Into<String>) {
        let directory = directory.into();
        dispatch!(self, h => h.attach(directory))
    }

    /// Drop any container registration.
    pub fn detach(&mut self) {
        dispatch!(self, h => h.detach())
    }

    /// Whether no container holds this shape.
    pub fn is_detached(&self) -> bool {
        dispatch!(self, h => h.is_detached())
    }

    /// Deep, detached copy keeping the storage precision.
    pub fn try_clone(&self) -> Result<Shape> {
        Ok(match self {
            Shape::F32(h) => Shape::F32(h.try_clone()?),
            Shape::F64(h) => Shape::F64(h.try_clone()?),
        })
    }

    /// Detached copy with storage `U`, whatever the variant.
    pub fn to_histogram<U: BinValue>(&self) -> Result<Histogram<U>> {
        dispatch!(self, h => h.try_convert::<U>())
    }

    /// Detached single-precision copy.
    pub fn to_th1f(&self) -> Result<Th1F> {
        self.to_histogram()
    }

    /// Detached double-precision copy.
    pub fn to_th1d(&self) -> Result<Th1D> {
        self.to_histogram()
    }
}

impl From<Th1F> for Shape {
    fn from(h: Th1F) -> Self {
        Shape::F32(h)
    }
}

impl From<Th1D> for Shape {
    fn from(h: Th1D) -> Self {
        Shape::F64(h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_dispatch_both_variants() {
        let f: Shape = Th1F::uniform("f", 0.0, 2.0, vec![1.0, 3.0]).unwrap().into();
        let d: Shape = Th1D::uniform("d", 0.0, 2.0, vec![1.0, 3.0]).unwrap().into();
        for s in [&f, &d] {
            assert_eq!(s.n_bins(), 2);
            assert_relative_eq!(s.integral(), 4.0);
            assert_eq!(s.contents_f64(), vec![1.0, 3.0]);
        }
        assert_eq!(f.class_name(), "TH1F");
        assert_eq!(d.class_name(), "TH1D");
    }

    #[test]
    fn test_clone_keeps_precision_and_detaches() {
        let mut s: Shape = Th1F::uniform("f", 0.0, 1.0, vec![2.0]).unwrap().into();
        s.attach("in.root:/sr");
        let c = s.try_clone().unwrap();
        assert!(matches!(c, Shape::F32(_)));
        assert!(c.is_detached());
        assert_eq!(s.directory(), Some("in.root:/sr"));
    }

    #[test]
    fn test_narrow_double_to_single() {
        let s: Shape = Th1D::uniform("d", 0.0, 3.0, vec![0.25, 0.25, 0.5]).unwrap().into();
        let f = s.to_th1f().unwrap();
        assert_eq!(f.contents(), &[0.25f32, 0.25, 0.5]);
        assert_eq!(f.name(), "d");
    }
}
