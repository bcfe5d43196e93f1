//! One-dimensional binned histograms with single- or double-precision storage.

use std::fmt::Debug;

use ns_core::{Error, Result};

mod sealed {
    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// Bin storage type. Implemented for `f32` (TH1F) and `f64` (TH1D) only.
pub trait BinValue: Copy + Debug + Default + PartialEq + Send + Sync + 'static + sealed::Sealed {
    /// ROOT class name of a histogram with this storage.
    const CLASS_NAME: &'static str;

    /// Widen to `f64`.
    fn to_f64(self) -> f64;

    /// Narrow from `f64` (rounds for `f32`).
    fn from_f64(v: f64) -> Self;
}

impl BinValue for f32 {
    const CLASS_NAME: &'static str = "TH1F";

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v as f32
    }
}

impl BinValue for f64 {
    const CLASS_NAME: &'static str = "TH1D";

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }
}

/// A 1D histogram (bin contents exclude under/overflow).
///
/// `directory` names the external container a histogram is registered with.
/// A histogram owned by a `Process` always has `directory == None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram<T: BinValue> {
    name: String,
    bin_edges: Vec<f64>,
    bin_content: Vec<T>,
    directory: Option<String>,
}

/// Single-precision histogram.
pub type Th1F = Histogram<f32>;
/// Double-precision histogram.
pub type Th1D = Histogram<f64>;

impl<T: BinValue> Histogram<T> {
    /// Build a histogram from explicit edges (length = n_bins + 1) and contents.
    pub fn new(name: impl Into<String>, bin_edges: Vec<f64>, bin_content: Vec<T>) -> Result<Self> {
        let name = name.into();
        if bin_edges.len() < 2 {
            return Err(Error::Validation(format!(
                "{} '{name}' requires at least 2 bin edges, got {}",
                T::CLASS_NAME,
                bin_edges.len()
            )));
        }
        if bin_content.len() + 1 != bin_edges.len() {
            return Err(Error::Validation(format!(
                "{} '{name}' bin_content length mismatch: expected {}, got {}",
                T::CLASS_NAME,
                bin_edges.len() - 1,
                bin_content.len()
            )));
        }
        for i in 0..bin_edges.len() {
            let e = bin_edges[i];
            if !e.is_finite() {
                return Err(Error::Validation(format!(
                    "{} '{name}' bin_edges[{i}] must be finite, got {e}",
                    T::CLASS_NAME
                )));
            }
            if i > 0 && bin_edges[i - 1] >= e {
                return Err(Error::Validation(format!(
                    "{} '{name}' bin edges must be strictly increasing, got edges[{}]={} and edges[{}]={}",
                    T::CLASS_NAME,
                    i - 1,
                    bin_edges[i - 1],
                    i,
                    e
                )));
            }
        }
        for (i, w) in bin_content.iter().enumerate() {
            if !w.to_f64().is_finite() {
                return Err(Error::Validation(format!(
                    "{} '{name}' bin_content[{i}] must be finite, got {w:?}",
                    T::CLASS_NAME
                )));
            }
        }
        Ok(Self { name, bin_edges, bin_content, directory: None })
    }

    /// Build a histogram with uniform binning on `[x_min, x_max]`.
    pub fn uniform(
        name: impl Into<String>,
        x_min: f64,
        x_max: f64,
        bin_content: Vec<T>,
    ) -> Result<Self> {
        let n_bins = bin_content.len();
        if n_bins == 0 {
            return Err(Error::Validation("uniform histogram requires at least 1 bin".into()));
        }
        let width = (x_max - x_min) / n_bins as f64;
        let bin_edges = (0..=n_bins).map(|i| x_min + i as f64 * width).collect();
        Self::new(name, bin_edges, bin_content)
    }

    /// Histogram name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bin edges (length = n_bins + 1).
    pub fn bin_edges(&self) -> &[f64] {
        &self.bin_edges
    }

    /// Raw bin storage.
    pub fn contents(&self) -> &[T] {
        &self.bin_content
    }

    /// Number of bins.
    pub fn n_bins(&self) -> usize {
        self.bin_content.len()
    }

    /// Content of bin `i` (0-based), widened to `f64`.
    pub fn bin_content(&self, i: usize) -> Option<f64> {
        self.bin_content.get(i).map(|v| v.to_f64())
    }

    /// Overwrite the content of bin `i` (0-based).
    pub fn set_bin_content(&mut self, i: usize, value: f64) -> Result<()> {
        let n = self.bin_content.len();
        let slot = self.bin_content.get_mut(i).ok_or_else(|| {
            Error::Validation(format!("bin index {i} out of range for {n} bins"))
        })?;
        let stored = T::from_f64(value);
        if !stored.to_f64().is_finite() {
            return Err(Error::Validation(format!(
                "{} '{}' bin_content[{i}] must be finite, got {value} ({stored:?} after narrowing)",
                T::CLASS_NAME,
                self.name
            )));
        }
        *slot = stored;
        Ok(())
    }

    /// Sum of bin contents, accumulated in `f64`.
    pub fn integral(&self) -> f64 {
        self.bin_content.iter().map(|v| v.to_f64()).sum()
    }

    /// Multiply every bin by `factor`.
    pub fn scale(&mut self, factor: f64) {
        for v in &mut self.bin_content {
            *v = T::from_f64(v.to_f64() * factor);
        }
    }

    /// Rescale to unit integral. Returns `false` (contents untouched) unless the
    /// integral is strictly positive.
    ///
    /// Each bin is divided by the integral. When the sum overflows `f64`, bins are
    /// first divided by the largest absolute content so the result still sums to 1.
    pub fn normalize(&mut self) -> bool {
        let integral = self.integral();
        if integral.is_finite() {
            if integral <= 0.0 {
                return false;
            }
            for v in &mut self.bin_content {
                *v = T::from_f64(v.to_f64() / integral);
            }
            return true;
        }

        let peak = self.bin_content.iter().fold(0.0f64, |m, v| m.max(v.to_f64().abs()));
        if peak == 0.0 || !peak.is_finite() {
            return false;
        }
        let reduced: f64 = self.bin_content.iter().map(|v| v.to_f64() / peak).sum();
        if reduced.is_nan() || reduced <= 0.0 {
            return false;
        }
        for v in &mut self.bin_content {
            *v = T::from_f64(v.to_f64() / peak / reduced);
        }
        true
    }

    /// Whether any bin has negative content.
    pub fn has_negative_bins(&self) -> bool {
        self.first_negative_bin().is_some()
    }

    /// First bin with negative content, if any.
    pub fn first_negative_bin(&self) -> Option<(usize, f64)> {
        self.bin_content
            .iter()
            .map(|v| v.to_f64())
            .enumerate()
            .find(|(_, v)| *v < 0.0)
    }

    /// Container this histogram is registered with, if any.
    pub fn directory(&self) -> Option<&str> {
        self.directory.as_deref()
    }

    /// Register the histogram with an external container.
    pub fn attach(&mut self, directory: impl Into<String>) {
        self.directory = Some(directory.into());
    }

    /// Drop any container registration.
    pub fn detach(&mut self) {
        self.directory = None;
    }

    /// Whether no container holds this histogram.
    pub fn is_detached(&self) -> bool {
        self.directory.is_none()
    }

    /// Deep copy with fallible allocation. The copy is always detached.
    pub fn try_clone(&self) -> Result<Self> {
        self.try_convert::<T>()
    }

    /// Deep copy into another storage precision. The copy is always detached.
    pub fn try_convert<U: BinValue>(&self) -> Result<Histogram<U>> {
        let mut bin_edges = Vec::new();
        bin_edges.try_reserve_exact(self.bin_edges.len())?;
        bin_edges.extend_from_slice(&self.bin_edges);

        let mut bin_content = Vec::new();
        bin_content.try_reserve_exact(self.bin_content.len())?;
        bin_content.extend(self.bin_content.iter().map(|v| U::from_f64(v.to_f64())));

        Ok(Histogram { name: self.name.clone(), bin_edges, bin_content, directory: None })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_uniform_edges() {
        let h = Th1D::uniform("h", 0.0, 3.0, vec![2.0, 2.0, 4.0]).unwrap();
        assert_eq!(h.n_bins(), 3);
        assert_eq!(h.bin_edges(), &[0.0, 1.0, 2.0, 3.0]);
        assert_relative_eq!(h.integral(), 8.0);
    }

    #[test]
    fn test_new_rejects_bad_edges() {
        assert!(Th1D::new("h", vec![0.0], vec![]).is_err());
        assert!(Th1D::new("h", vec![0.0, 1.0], vec![1.0, 2.0]).is_err());
        assert!(Th1D::new("h", vec![1.0, 0.0], vec![1.0]).is_err());
        assert!(Th1D::new("h", vec![0.0, f64::NAN], vec![1.0]).is_err());
        assert!(Th1F::new("h", vec![0.0, 1.0], vec![f32::INFINITY]).is_err());
    }

    #[test]
    fn test_bin_access_bounds() {
        let mut h = Th1F::uniform("h", 0.0, 2.0, vec![1.0, 3.0]).unwrap();
        assert_eq!(h.bin_content(1), Some(3.0));
        assert_eq!(h.bin_content(2), None);
        h.set_bin_content(0, 5.0).unwrap();
        assert_eq!(h.bin_content(0), Some(5.0));
        assert!(matches!(h.set_bin_content(2, 1.0), Err(Error::Validation(_))));
    }

    #[test]
    fn test_set_bin_content_rejects_non_finite() {
        let mut f = Th1F::uniform("f", 0.0, 2.0, vec![1.0, 1.0]).unwrap();
        assert!(matches!(f.set_bin_content(0, 1e300), Err(Error::Validation(_))));
        assert!(matches!(f.set_bin_content(1, f64::NAN), Err(Error::Validation(_))));
        assert_eq!(f.contents(), &[1.0f32, 1.0]);

        let mut d = Th1D::uniform("d", 0.0, 2.0, vec![1.0, 1.0]).unwrap();
        assert!(matches!(d.set_bin_content(0, f64::INFINITY), Err(Error::Validation(_))));
        assert!(matches!(d.set_bin_content(1, f64::NAN), Err(Error::Validation(_))));
        d.set_bin_content(0, 1e300).unwrap();
        assert_eq!(d.contents(), &[1e300, 1.0]);
    }

    #[test]
    fn test_normalize_extreme_integrals() {
        let mut tiny = Th1D::uniform("t", 0.0, 2.0, vec![5e-324, 0.0]).unwrap();
        assert!(tiny.normalize());
        assert_eq!(tiny.contents(), &[1.0, 0.0]);

        let mut huge = Th1D::uniform("h", 0.0, 2.0, vec![1e308, 1e308]).unwrap();
        assert!(huge.integral().is_infinite());
        assert!(huge.normalize());
        assert_eq!(huge.contents(), &[0.5, 0.5]);

        let mut f = Th1F::uniform("f", 0.0, 2.0, vec![3e38, 3e38]).unwrap();
        assert!(f.normalize());
        assert_relative_eq!(f.integral(), 1.0, max_relative = 1e-6);
    }

    #[test]
    fn test_normalize_skips_non_positive_integral() {
        let mut zero = Th1D::uniform("z", 0.0, 2.0, vec![0.0, 0.0]).unwrap();
        assert!(!zero.normalize());
        assert_eq!(zero.contents(), &[0.0, 0.0]);

        let mut neg = Th1D::uniform("n", 0.0, 2.0, vec![1.0, -3.0]).unwrap();
        assert!(!neg.normalize());
        assert_eq!(neg.contents(), &[1.0, -3.0]);
    }

    #[test]
    fn test_scale() {
        let mut h = Th1D::uniform("h", 0.0, 3.0, vec![2.0, 2.0, 4.0]).unwrap();
        h.scale(0.125);
        assert_eq!(h.contents(), &[0.25, 0.25, 0.5]);
    }

    #[test]
    fn test_try_clone_detaches() {
        let mut h = Th1D::uniform("h", 0.0, 1.0, vec![1.0]).unwrap();
        h.attach("file.root:/ch1");
        assert_eq!(h.directory(), Some("file.root:/ch1"));
        let c = h.try_clone().unwrap();
        assert!(c.is_detached());
        assert_eq!(c.contents(), h.contents());
        assert!(!h.is_detached());
    }

    #[test]
    fn test_try_convert_precision() {
        let h = Th1D::uniform("h", 0.0, 2.0, vec![0.1, 0.9]).unwrap();
        let f: Th1F = h.try_convert().unwrap();
        assert_eq!(f.contents(), &[0.1f32, 0.9f32]);
        assert_relative_eq!(f.integral(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_first_negative_bin() {
        let h = Th1D::uniform("h", 0.0, 3.0, vec![1.0, -0.5, -2.0]).unwrap();
        assert_eq!(h.first_negative_bin(), Some((1, -0.5)));
        assert!(h.has_negative_bins());
        let h = Th1D::uniform("h", 0.0, 1.0, vec![0.0]).unwrap();
        assert_eq!(h.first_negative_bin(), None);
        assert!(!h.has_negative_bins());
    }
}
