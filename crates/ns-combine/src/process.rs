//! A single process row of a binned combined model.
//!
//! A [`Process`] exclusively owns at most one [`Shape`]. Every path that stores a
//! shape detaches it from its container and rescales it to unit integral, so a
//! stored shape is always a probability density (or an all-zero histogram left
//! untouched). Absolute yields live in `rate` only.
//!
//! References to external model objects (`pdf`, `data`, `norm`) are arena
//! handles: copying a process copies the handles, never the objects.
//!
//! Mutation needs `&mut Process`, so concurrent writers must be serialized by
//! the caller.

use ns_core::{Error, NegativeBinPolicy, Result};
use ns_hist::{BinValue, Histogram, Shape, Th1D, Th1F};

use crate::arena::{DataId, ModelArena, NormId, PdfId};
use crate::object::ObjectMeta;

/// One physical process contributing to one category of the model.
#[derive(Debug, Default, PartialEq)]
pub struct Process {
    meta: ObjectMeta,
    rate: f64,
    signal: bool,
    shape: Option<Shape>,
    pdf: Option<PdfId>,
    data: Option<DataId>,
    norm: Option<NormId>,
}

impl Process {
    /// Empty process: no shape, zero rate, background, no references.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty process carrying the given metadata.
    pub fn with_meta(meta: ObjectMeta) -> Self {
        Self { meta, ..Self::default() }
    }

    /// Bookkeeping metadata.
    pub fn meta(&self) -> &ObjectMeta {
        &self.meta
    }

    /// Mutable bookkeeping metadata.
    pub fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.meta
    }

    /// Process name.
    pub fn process(&self) -> &str {
        &self.meta.process
    }

    /// Category name.
    pub fn bin(&self) -> &str {
        &self.meta.bin
    }

    /// Stored rate.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Overwrite the stored rate.
    pub fn set_rate(&mut self, rate: f64) {
        self.rate = rate;
    }

    /// Rate without the external normalization term.
    pub fn no_norm_rate(&self) -> f64 {
        self.rate
    }

    /// Rate multiplied by the attached normalization function, if any.
    pub fn normalized_rate(&self, arena: &ModelArena) -> Result<f64> {
        match self.norm {
            Some(id) => Ok(arena.norm(id)?.value() * self.rate),
            None => Ok(self.rate),
        }
    }

    /// Signal (vs background) flag.
    pub fn signal(&self) -> bool {
        self.signal
    }

    /// Set the signal flag.
    pub fn set_signal(&mut self, signal: bool) {
        self.signal = signal;
    }

    /// Handle of the continuous model object, if any.
    pub fn pdf(&self) -> Option<PdfId> {
        self.pdf
    }

    /// Point at a continuous model object (or clear with `None`).
    pub fn set_pdf(&mut self, pdf: Option<PdfId>) {
        self.pdf = pdf;
    }

    /// Handle of the dataset, if any.
    pub fn data(&self) -> Option<DataId> {
        self.data
    }

    /// Point at a dataset (or clear with `None`).
    pub fn set_data(&mut self, data: Option<DataId>) {
        self.data = data;
    }

    /// Handle of the normalization function, if any.
    pub fn norm(&self) -> Option<NormId> {
        self.norm
    }

    /// Point at a normalization function (or clear with `None`).
    pub fn set_norm(&mut self, norm: Option<NormId>) {
        self.norm = norm;
    }

    /// The stored, unit-integral shape.
    pub fn shape(&self) -> Option<&Shape> {
        self.shape.as_ref()
    }

    /// Whether a shape is stored.
    pub fn has_shape(&self) -> bool {
        self.shape.is_some()
    }

    /// Whether any shape representation (histogram, pdf or dataset) is attached.
    pub fn has_model(&self) -> bool {
        self.shape.is_some() || self.pdf.is_some() || self.data.is_some()
    }

    /// Take ownership of `shape`, replacing the current one.
    ///
    /// `None` releases the current shape. Otherwise the shape is detached, and if
    /// `set_rate` is true the rate becomes its integral before normalization
    /// (`inf` when the sum of finite bins overflows `f64`).
    /// A strictly positive integral, including a subnormal or overflowing one, is
    /// then normalized to 1; a zero or negative integral is stored as-is.
    /// Negative bins are accepted with a warning, see
    /// [`Process::set_shape_with_policy`] to reject them.
    pub fn set_shape(&mut self, shape: Option<Shape>, set_rate: bool) {
        let Some(mut shape) = shape else {
            self.shape = None;
            return;
        };
        shape.detach();

        if let Some((bin, value)) = shape.first_negative_bin() {
            log::warn!(
                "process '{}' in bin '{}': shape '{}' has negative content {value} in bin {bin}",
                self.meta.process,
                self.meta.bin,
                shape.name()
            );
        }

        let integral = shape.integral();
        if set_rate {
            self.rate = integral;
        }
        if !shape.normalize() {
            log::debug!(
                "process '{}' in bin '{}': shape '{}' has integral {integral}, stored unscaled",
                self.meta.process,
                self.meta.bin,
                shape.name()
            );
        }
        self.shape = Some(shape);
    }

    /// Like [`Process::set_shape`], with explicit negative-bin handling.
    ///
    /// With [`NegativeBinPolicy::Error`] a shape containing a negative bin is
    /// rejected with [`Error::InvalidShape`] and the process is left unchanged.
    pub fn set_shape_with_policy(
        &mut self,
        shape: Option<Shape>,
        set_rate: bool,
        policy: NegativeBinPolicy,
    ) -> Result<()> {
        if policy.rejects_negative()
            && let Some(s) = &shape
            && let Some((bin, value)) = s.first_negative_bin()
        {
            return Err(Error::InvalidShape(format!(
                "shape '{}' for process '{}' has content {value} < 0 in bin {bin}",
                s.name(),
                self.meta.process
            )));
        }
        self.set_shape(shape, set_rate);
        Ok(())
    }

    /// Independent, detached copy of the stored shape.
    pub fn cloned_shape(&self) -> Result<Option<Shape>> {
        self.shape.as_ref().map(Shape::try_clone).transpose()
    }

    /// Copy of the stored shape scaled by [`Process::no_norm_rate`].
    ///
    /// The stored shape keeps its unit integral.
    pub fn cloned_scaled_shape(&self) -> Result<Option<Shape>> {
        let Some(mut res) = self.cloned_shape()? else {
            return Ok(None);
        };
        res.scale(self.no_norm_rate());
        Ok(Some(res))
    }

    /// Single-precision histogram of this process.
    ///
    /// The stored shape is converted as-is. Without a shape, the dataset is
    /// binned along its primary variable and normalized to unit integral.
    pub fn shape_as_th1f(&self, arena: &ModelArena) -> Result<Th1F> {
        self.shape_as(arena)
    }

    /// Double-precision twin of [`Process::shape_as_th1f`].
    pub fn shape_as_th1d(&self, arena: &ModelArena) -> Result<Th1D> {
        self.shape_as(arena)
    }

    fn shape_as<T: BinValue>(&self, arena: &ModelArena) -> Result<Histogram<T>> {
        if let Some(shape) = &self.shape {
            return shape.to_histogram();
        }
        let Some(id) = self.data else {
            return Err(Error::MissingShape(format!(
                "process '{}' in bin '{}' has neither a shape nor a dataset",
                self.meta.process, self.meta.bin
            )));
        };
        let dataset = arena.data(id)?;
        let variable = dataset.primary_variable_name()?;
        let mut binned = Shape::try_from(dataset.create_histogram(&variable)?)?;
        binned.normalize();
        binned.to_histogram()
    }

    /// Exchange every field with `other` without copying the shapes.
    pub fn swap(&mut self, other: &mut Process) {
        std::mem::swap(self, other);
    }

    /// Move out of `self`, leaving an empty process behind.
    pub fn take(&mut self) -> Process {
        std::mem::take(self)
    }

    /// Deep copy with fallible shape allocation; handles are shared.
    pub fn try_clone(&self) -> Result<Process> {
        Ok(Process {
            meta: self.meta.clone(),
            rate: self.rate,
            signal: self.signal,
            shape: self.cloned_shape()?,
            pdf: self.pdf,
            data: self.data,
            norm: self.norm,
        })
    }

    /// Replace `self` with a deep copy of `other`.
    ///
    /// The copy is built before anything is swapped in, so on error `self` is
    /// unchanged.
    pub fn assign_from(&mut self, other: &Process) -> Result<()> {
        let mut tmp = other.try_clone()?;
        self.swap(&mut tmp);
        Ok(())
    }
}

impl Clone for Process {
    fn clone(&self) -> Self {
        let shape = self.shape.as_ref().map(|s| {
            let mut c = s.clone();
            c.detach();
            c
        });
        Self {
            meta: self.meta.clone(),
            rate: self.rate,
            signal: self.signal,
            shape,
            pdf: self.pdf,
            data: self.data,
            norm: self.norm,
        }
    }
}
