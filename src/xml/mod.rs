//! XML parsing and output.
//!
//! Converts between serialized markup text and the in-memory element tree.
//! Callers address attributes by bare name; grouping of repeated children
//! into slots is handled entirely inside this boundary.

mod parser;
mod printer;

pub use parser::parse_str;
pub use printer::{serialize, serialize_pretty, XmlPrinter, XmlPrinterOptions};
