pub mod backend;
pub mod catalog;

pub use backend::SearchEngine;
pub use catalog::CatalogEngine;
