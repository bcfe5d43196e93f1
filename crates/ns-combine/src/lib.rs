//! # ns-combine
//!
//! Process bookkeeping for binned combined models.
//!
//! This crate provides:
//! - [`Process`]: one process row owning at most one unit-integral [`ns_hist::Shape`],
//!   with deep-copy / move / swap value semantics.
//! - [`ModelArena`]: owner of external model objects (pdfs, datasets, normalization
//!   functions) that processes reference through copyable handles.
//! - A fixed-column text listing of processes ([`summary`]).
//!
//! ## Example
//!
//! ```
//! use ns_combine::Process;
//! use ns_hist::Th1D;
//!
//! let mut p = Process::new();
//! p.set_shape(Some(Th1D::uniform("ggH", 0.0, 3.0, vec![2.0, 2.0, 4.0]).unwrap().into()), false);
//! assert_eq!(p.shape().unwrap().contents_f64(), vec![0.25, 0.25, 0.5]);
//!
//! p.set_rate(10.0);
//! let scaled = p.cloned_scaled_shape().unwrap().unwrap();
//! assert_eq!(scaled.contents_f64(), vec![2.5, 2.5, 5.0]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod arena;
pub mod dataset;
pub mod object;
pub mod process;
pub mod summary;

pub use arena::{DataId, DataSet, ModelArena, NormFunction, NormId, PdfId, PdfModel};
pub use dataset::EventDataSet;
pub use object::ObjectMeta;
pub use process::Process;
pub use summary::{ProcessRow, format_g, write_header, write_table};
