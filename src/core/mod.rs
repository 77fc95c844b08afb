mod data;
mod options;
pub mod primitives;
mod types;

pub use data::{ChartData, DataValue, Dataset};
pub use options::ChartOptions;
pub use types::{ChartKind, Size};
