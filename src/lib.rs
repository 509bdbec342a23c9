//! plugin-catalog: merge the module docstrings of a directory of Python
//! plugins into one navigable HTML catalog.

pub mod config;
pub mod discover;
pub mod error;
pub mod extract;
pub mod fragment;
pub mod markup;
pub mod merge;
pub mod model;
pub mod pipeline;
pub mod render;

pub use config::Config;
pub use error::CatalogError;
pub use pipeline::run;
