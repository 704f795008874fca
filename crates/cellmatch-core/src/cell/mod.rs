//! Cell-related types
//!
//! - [`CellValue`] - The value stored in a cell
//! - [`CellAddress`] - A cell's location on a sheet (e.g., "A1")
//! - [`DateSystem`] - Serial number epochs for date cells

mod address;
mod date;
mod value;

pub use address::CellAddress;
pub use date::DateSystem;
pub use value::{CellError, CellValue};
