//! Arena owning external model objects referenced by processes.
//!
//! Processes never hold external objects directly. The modeling subsystem puts
//! them into a [`ModelArena`] and hands out copyable handles ([`PdfId`],
//! [`DataId`], [`NormId`]). A handle resolves only in the arena that issued it,
//! so a stale handle is reported as [`Error::DanglingHandle`] instead of
//! dereferencing freed memory.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use ns_core::{Error, Result};
use ns_hist::ExternalHistogram;

/// Continuous model object (opaque to processes beyond its presence).
pub trait PdfModel: Send + Sync {
    /// Object name.
    fn name(&self) -> &str;
}

/// Dataset capable of binning itself into a histogram.
pub trait DataSet: Send + Sync {
    /// Dataset name.
    fn name(&self) -> &str;

    /// Name of the first (primary) observable.
    fn primary_variable_name(&self) -> Result<String>;

    /// Bin the dataset along `variable`.
    fn create_histogram(&self, variable: &str) -> Result<ExternalHistogram>;
}

/// Real-valued normalization term multiplying a process rate.
pub trait NormFunction: Send + Sync {
    /// Function name.
    fn name(&self) -> &str;

    /// Current value.
    fn value(&self) -> f64;
}

static NEXT_ARENA_ID: AtomicU64 = AtomicU64::new(1);

macro_rules! handle {
    ($(#[$doc:meta])* $name:ident, $kind:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name {
            arena: u64,
            index: usize,
        }

        impl $name {
            /// Position inside the issuing arena.
            pub fn index(&self) -> usize {
                self.index
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}@{}", $kind, self.index, self.arena)
            }
        }
    };
}

handle!(
    /// Handle to a [`PdfModel`] in a [`ModelArena`].
    PdfId,
    "pdf"
);
handle!(
    /// Handle to a [`DataSet`] in a [`ModelArena`].
    DataId,
    "data"
);
handle!(
    /// Handle to a [`NormFunction`] in a [`ModelArena`].
    NormId,
    "norm"
);

/// Owner of every external model object processes may reference.
///
/// Objects are append-only, so a handle stays valid for the arena's lifetime.
pub struct ModelArena {
    id: u64,
    pdfs: Vec<Box<dyn PdfModel>>,
    datasets: Vec<Box<dyn DataSet>>,
    norms: Vec<Box<dyn NormFunction>>,
}

impl ModelArena {
    /// Create an empty arena with a process-unique id.
    pub fn new() -> Self {
        Self {
            id: NEXT_ARENA_ID.fetch_add(1, Ordering::Relaxed),
            pdfs: Vec::new(),
            datasets: Vec::new(),
            norms: Vec::new(),
        }
    }

    /// Take ownership of a pdf.
    pub fn add_pdf(&mut self, pdf: impl PdfModel + 'static) -> PdfId {
        self.pdfs.push(Box::new(pdf));
        PdfId { arena: self.id, index: self.pdfs.len() - 1 }
    }

    /// Take ownership of a dataset.
    pub fn add_data(&mut self, data: impl DataSet + 'static) -> DataId {
        self.datasets.push(Box::new(data));
        DataId { arena: self.id, index: self.datasets.len() - 1 }
    }

    /// Take ownership of a normalization function.
    pub fn add_norm(&mut self, norm: impl NormFunction + 'static) -> NormId {
        self.norms.push(Box::new(norm));
        NormId { arena: self.id, index: self.norms.len() - 1 }
    }

    /// Resolve a pdf handle.
    pub fn pdf(&self, id: PdfId) -> Result<&dyn PdfModel> {
        self.check(id.arena, &id)?;
        self.pdfs
            .get(id.index)
            .map(|b| &**b)
            .ok_or_else(|| Error::DanglingHandle(format!("{id} not present in arena {}", self.id)))
    }

    /// Resolve a dataset handle.
    pub fn data(&self, id: DataId) -> Result<&dyn DataSet> {
        self.check(id.arena, &id)?;
        self.datasets
            .get(id.index)
            .map(|b| &**b)
            .ok_or_else(|| Error::DanglingHandle(format!("{id} not present in arena {}", self.id)))
    }

    /// Resolve a normalization-function handle.
    pub fn norm(&self, id: NormId) -> Result<&dyn NormFunction> {
        self.check(id.arena, &id)?;
        self.norms
            .get(id.index)
            .map(|b| &**b)
            .ok_or_else(|| Error::DanglingHandle(format!("{id} not present in arena {}", self.id)))
    }

    /// Number of stored pdfs, datasets and norm functions.
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.pdfs.len(), self.datasets.len(), self.norms.len())
    }

    /// Whether the arena owns nothing.
    pub fn is_empty(&self) -> bool {
        self.pdfs.is_empty() && self.datasets.is_empty() && self.norms.is_empty()
    }

    fn check(&self, arena: u64, id: &dyn fmt::Display) -> Result<()> {
        if arena != self.id {
            return Err(Error::DanglingHandle(format!(
                "{id} was issued by another arena (this is arena {})",
                self.id
            )));
        }
        Ok(())
    }
}

impl Default for ModelArena {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ModelArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelArena")
            .field("id", &self.id)
            .field("pdfs", &self.pdfs.iter().map(|p| p.name()).collect::<Vec<_>>())
            .field("datasets", &self.datasets.iter().map(|d| d.name()).collect::<Vec<_>>())
            .field("norms", &self.norms.iter().map(|n| n.name()).collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Gauss;

    impl PdfModel for Gauss {
        fn name(&self) -> &str {
            "gauss"
        }
    }

    struct Lumi(f64);

    impl NormFunction for Lumi {
        fn name(&self) -> &str {
            "lumi"
        }

        fn value(&self) -> f64 {
            self.0
        }
    }

    #[test]
    fn test_handles_resolve_in_issuing_arena() {
        let mut arena = ModelArena::new();
        assert!(arena.is_empty());
        let p = arena.add_pdf(Gauss);
        let n = arena.add_norm(Lumi(1.5));
        assert_eq!(arena.pdf(p).unwrap().name(), "gauss");
        assert_eq!(arena.norm(n).unwrap().value(), 1.5);
        assert_eq!(arena.counts(), (1, 0, 1));
    }

    #[test]
    fn test_foreign_handle_is_dangling() {
        let mut a = ModelArena::new();
        let b = ModelArena::new();
        let p = a.add_pdf(Gauss);
        let err = b.pdf(p).err().unwrap();
        assert!(matches!(err, Error::DanglingHandle(_)), "{err}");
    }

    #[test]
    fn test_handle_display() {
        let mut a = ModelArena::new();
        a.add_norm(Lumi(1.0));
        let n = a.add_norm(Lumi(2.0));
        assert_eq!(n.index(), 1);
        assert!(n.to_string().starts_with("norm#1@"));
    }
}
