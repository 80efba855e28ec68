pub mod catalog;
pub mod row;

pub use catalog::CatalogItem;
pub use row::{EnrichedRow, InputRow};
