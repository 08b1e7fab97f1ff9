//! Small CSV tables for game data (levels, dialogue, tuning values).
//!
//! The first non-empty line is the header. Data fields split on the separator
//! outside double quotes; the quotes themselves are kept in the field.

mod row;
mod table;

pub use row::CsvRow;
pub use table::CsvTable;
