//! Data module - CSV loading, table access and filtering

pub mod filter;
mod loader;
pub mod table;

pub use filter::{apply_filters, filter_options, Criterion, FilterCriteria, FilterOptions};
pub use loader::{DatasetBundle, DatasetLoader, UploadKey, UploadSet, UploadedFile};
