pub mod dataset;
pub mod resolver;

pub use dataset::SectorDatasetRow;
pub use resolver::{MultipleBand, SectorMultipleResolver, SectorMultipleRow, SectorMultipleTable};
