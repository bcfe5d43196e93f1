//! # ns-hist
//!
//! Density-histogram storage for NextStat combine.
//!
//! Provides 1D histograms with single (`Th1F`) or double (`Th1D`) precision bin
//! storage, the tagged [`Shape`] variant stored by processes, and narrowing of
//! histograms handed over by external subsystems.
//!
//! ## Example
//!
//! ```
//! use ns_hist::{Shape, Th1D};
//!
//! let mut s: Shape = Th1D::uniform("sig", 0.0, 3.0, vec![2.0, 2.0, 4.0]).unwrap().into();
//! s.scale(1.0 / s.integral());
//! assert_eq!(s.contents_f64(), vec![0.25, 0.25, 0.5]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod histogram;
pub mod objects;
pub mod shape;

pub use histogram::{BinValue, Histogram, Th1D, Th1F};
pub use objects::{ExternalHistogram, narrow};
pub use shape::Shape;
