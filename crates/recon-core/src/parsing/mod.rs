//! Text-level building blocks shared by every provider layout.

pub mod assemble;
pub mod columns;
pub mod dates;
pub mod header;
pub mod scan;
pub mod segment;
pub mod values;
