//! Public types for the Trendmood API.

mod item;
mod label;
mod result;

pub use item::{ClassifiedItem, Item};
pub use label::Label;
pub use result::{BatchMeta, BatchResult, Distribution, GroupResult, LabelCounts};
