//! Data model: parts, stock classes, lamination plans, sheets.

mod lamination;
mod part;
mod sheet;
mod stock;

pub use lamination::{LaminationPlan, UnplacedReason};
pub use part::Part;
pub use sheet::{Placement, Sheet};
pub use stock::{default_catalog, StockClass};
