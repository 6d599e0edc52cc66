//! # Job descriptors and the sources that produce them.
//!
//! - [`JobDescriptor`], [`JobList`] in-memory form of the job description document
//! - [`DescriptorSource`] acquisition seam used by the refresh loop
//! - [`LocationSource`] URLs / files with last-known and fallback documents
//! - [`StaticSource`] fixed list

mod model;
mod source;

pub use model::{JobDescriptor, JobList};
pub(crate) use source::is_remote;
pub use source::{DEFAULT_DOCUMENT, DescriptorSource, LocationSource, StaticSource};
