//! alto-edit - document model and structural mutation engine for ALTO.
//!
//! This library is the core of an OCR layout editor for ALTO, the
//! schema-versioned XML format describing a scanned page: regions, text
//! lines, word tokens, styles and geometry. The GUI, file management and
//! inter-process plumbing live elsewhere; they drive this crate through
//! plain values.
//!
//! # What it does
//!
//! - Converts between markup text and an in-memory tree while preserving
//!   the format's one-or-many child cardinality across round trips.
//! - Tags every node with a synthetic identity key after parsing and strips
//!   it before serialization, so UI consumers get stable handles that never
//!   leak into the persisted format.
//! - Applies immutable, path-addressed edits through arbitrarily deep
//!   nesting of composed blocks, always returning a new document value.
//! - Validates the required containment chain and reports problems as data
//!   rather than failures.
//! - Measures the word error rate between two revisions of a page's text.
//!
//! # Example
//!
//! ```
//! use alto_edit::{extract_text, set_text, Document, NodePath, SlotIndex};
//!
//! let doc = Document::parse(
//!     r#"<alto><Layout><Page><PrintSpace>
//!          <TextBlock>
//!            <TextLine><String CONTENT="Hello" /><SP /><String CONTENT="Wrold" /></TextLine>
//!          </TextBlock>
//!        </PrintSpace></Page></Layout></alto>"#,
//! )?;
//!
//! let line = NodePath::print_space(0).at("TextBlock", 0).one("TextLine");
//! let fixed = set_text(&doc, &line, SlotIndex::All, "Hello World")?;
//!
//! assert_eq!(extract_text(&fixed), "Hello World");
//! assert_eq!(extract_text(&doc), "Hello Wrold"); // the snapshot is untouched
//! # Ok::<(), alto_edit::Error>(())
//! ```

pub mod constants;
pub mod document;
pub mod edit;
pub mod error;
pub mod geometry;
pub mod ident;
pub mod measure;
pub mod styles;
pub mod tree;
pub mod validate;
pub mod xml;

// Re-export commonly used types
pub use document::{BlockKind, Document};
pub use edit::{insert_child, remove_child, replace_child, resolve, set_text};
pub use edit::{NodePath, PathStep, SlotIndex};
pub use error::{Error, Result};
pub use geometry::{to_pixels, MeasurementUnit, Rect};
pub use ident::{node_key, tag, untag};
pub use measure::{extract_text, word_error_rate};
pub use styles::{resolve_style, style_table, StyleTable, TextStyle};
pub use tree::{ChildSlot, Element};
pub use validate::{validate, ValidationReport};
pub use xml::{parse_str, serialize, serialize_pretty};
