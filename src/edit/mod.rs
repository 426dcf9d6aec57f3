//! The mutation engine.
//!
//! Edits are addressed positionally: a [`NodePath`] walks named child slots
//! from the document root down to a target node, one [`PathStep`] per level,
//! so paths through nested `ComposedBlock` containers compose to any depth.
//! Every operation is copy-on-write against the whole path: the caller's
//! document value is never touched, and a failed resolution returns
//! [`Error::PathNotFound`] with no partial mutation.

use log::warn;

use crate::constants::{CONTENT_ATTR, LAYOUT_TAG, PAGE_TAG, PRINT_SPACE_TAG, STRING_TAG, TEXT_LINE_TAG};
use crate::document::Document;
use crate::error::{Error, Result};
use crate::tree::Element;

/// Position of a child within a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotIndex {
    /// The slot holds a single bare element (for `set_text`: every token).
    All,
    /// Zero-based position within the slot's sequence.
    At(usize),
}

/// One navigation step: a child slot name plus a position within it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathStep {
    pub slot: String,
    pub index: SlotIndex,
}

impl PathStep {
    /// Step into the single element of a bare slot.
    pub fn one(slot: impl Into<String>) -> PathStep {
        PathStep {
            slot: slot.into(),
            index: SlotIndex::All,
        }
    }

    /// Step into position `index` of a slot.
    pub fn at(slot: impl Into<String>, index: usize) -> PathStep {
        PathStep {
            slot: slot.into(),
            index: SlotIndex::At(index),
        }
    }
}

/// A path from the document root to a node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodePath {
    pub steps: Vec<PathStep>,
}

impl NodePath {
    /// The empty path (the document root itself).
    pub fn root() -> NodePath {
        NodePath::default()
    }

    /// Path to the print area of the given page.
    pub fn print_space(page: usize) -> NodePath {
        NodePath::root()
            .one(LAYOUT_TAG)
            .at(PAGE_TAG, page)
            .one(PRINT_SPACE_TAG)
    }

    /// Appends a bare-slot step.
    pub fn one(mut self, slot: impl Into<String>) -> NodePath {
        self.steps.push(PathStep::one(slot));
        self
    }

    /// Appends a positional step.
    pub fn at(mut self, slot: impl Into<String>, index: usize) -> NodePath {
        self.steps.push(PathStep::at(slot, index));
        self
    }
}

/// Resolves a path to a node for inspection. Read-only.
pub fn resolve<'a>(root: &'a Element, path: &NodePath) -> Result<&'a Element> {
    let mut node = root;
    for step in &path.steps {
        let idx = resolve_index(node, step)?;
        node = &node.children_of(&step.slot)[idx];
    }
    Ok(node)
}

/// Returns a new document with the node addressed by `path` replaced.
///
/// Every ancestor along the path is rebuilt; the input document is unchanged
/// whether the call succeeds or fails.
pub fn replace_child(doc: &Document, path: &NodePath, new_node: Element) -> Result<Document> {
    with_root(doc, rebuild(&doc.root, &path.steps, EditOp::Replace(new_node))?)
}

/// Returns a new document with the node addressed by `path` removed.
///
/// A removal that leaves exactly one sibling collapses the slot back to its
/// bare single-element form; removing the last sibling removes the slot.
pub fn remove_child(doc: &Document, path: &NodePath) -> Result<Document> {
    with_root(doc, rebuild(&doc.root, &path.steps, EditOp::Remove)?)
}

/// Returns a new document with `new_node` inserted under the container
/// addressed by `parent`, in slot `slot`. `SlotIndex::All` appends;
/// `SlotIndex::At(i)` inserts before position `i` (at most the current
/// sequence length).
pub fn insert_child(
    doc: &Document,
    parent: &NodePath,
    slot: &str,
    index: SlotIndex,
    new_node: Element,
) -> Result<Document> {
    with_root(doc, rebuild_insert(&doc.root, &parent.steps, slot, index, new_node)?)
}

/// Rewrites token content on the line addressed by `line_path`.
///
/// With `SlotIndex::At(i)`, token *i*'s content attribute becomes `value`
/// verbatim. With `SlotIndex::All`, `value` is split on whitespace and word
/// *k* is assigned to token *k*; callers redistributing free text over a
/// line are expected to pre-validate that the word count matches the token
/// count. A mismatch is logged and assignment proceeds pairwise, leaving
/// unpaired tokens (or dropping unpaired words) silently. All other token
/// attributes are preserved.
pub fn set_text(
    doc: &Document,
    line_path: &NodePath,
    token_index: SlotIndex,
    value: &str,
) -> Result<Document> {
    let line = resolve(&doc.root, line_path)?;
    if line.name() != TEXT_LINE_TAG {
        return Err(Error::PathNotFound(format!(
            "expected <{TEXT_LINE_TAG}>, found <{}>",
            line.name()
        )));
    }

    let mut tokens = line.children_of(STRING_TAG).to_vec();
    match token_index {
        SlotIndex::At(i) => {
            let count = tokens.len();
            let token = tokens.get_mut(i).ok_or_else(|| {
                Error::PathNotFound(format!(
                    "token index {i} out of range ({count} tokens on the line)"
                ))
            })?;
            token.set_attr(CONTENT_ATTR, value);
        }
        SlotIndex::All => {
            let words: Vec<&str> = value.split_whitespace().collect();
            if words.len() != tokens.len() {
                warn!(
                    "set_text: {} words for {} tokens; text will be assigned pairwise",
                    words.len(),
                    tokens.len()
                );
            }
            for (token, word) in tokens.iter_mut().zip(words.iter()) {
                token.set_attr(CONTENT_ATTR, *word);
            }
        }
    }

    let mut new_line = line.clone();
    new_line.set_children(STRING_TAG, tokens);
    with_root(doc, rebuild(&doc.root, &line_path.steps, EditOp::Replace(new_line))?)
}

enum EditOp {
    Replace(Element),
    Remove,
}

fn with_root(doc: &Document, root: Element) -> Result<Document> {
    Ok(Document {
        root,
        schema_version: doc.schema_version.clone(),
    })
}

/// Resolves a step against a node, mapping every failure mode (absent slot,
/// out-of-range index, `All` against a sequence) to `PathNotFound`.
fn resolve_index(node: &Element, step: &PathStep) -> Result<usize> {
    let Some(slot) = node.slot(&step.slot) else {
        return Err(Error::PathNotFound(format!(
            "<{}> has no <{}> children",
            node.name(),
            step.slot
        )));
    };
    match step.index {
        SlotIndex::All => {
            if slot.is_one() {
                Ok(0)
            } else {
                Err(Error::PathNotFound(format!(
                    "<{}> under <{}> holds a sequence of {}; a positional index is required",
                    step.slot,
                    node.name(),
                    slot.len()
                )))
            }
        }
        SlotIndex::At(i) if i < slot.len() => Ok(i),
        SlotIndex::At(i) => Err(Error::PathNotFound(format!(
            "index {i} out of range for <{}> under <{}> ({} children)",
            step.slot,
            node.name(),
            slot.len()
        ))),
    }
}

/// Rebuilds the path from `node` down, applying `op` at the final step.
/// Unrelated subtrees are carried over by clone; the source is never
/// mutated.
fn rebuild(node: &Element, steps: &[PathStep], op: EditOp) -> Result<Element> {
    let Some((step, rest)) = steps.split_first() else {
        return Err(Error::PathNotFound("empty path".to_string()));
    };
    let idx = resolve_index(node, step)?;
    let mut seq = node.children_of(&step.slot).to_vec();
    if rest.is_empty() {
        match op {
            EditOp::Replace(new_node) => seq[idx] = new_node,
            EditOp::Remove => {
                seq.remove(idx);
            }
        }
    } else {
        seq[idx] = rebuild(&seq[idx], rest, op)?;
    }
    let mut rebuilt = node.clone();
    rebuilt.set_children(step.slot.clone(), seq);
    Ok(rebuilt)
}

fn rebuild_insert(
    node: &Element,
    steps: &[PathStep],
    slot: &str,
    index: SlotIndex,
    new_node: Element,
) -> Result<Element> {
    if let Some((step, rest)) = steps.split_first() {
        let idx = resolve_index(node, step)?;
        let mut seq = node.children_of(&step.slot).to_vec();
        seq[idx] = rebuild_insert(&seq[idx], rest, slot, index, new_node)?;
        let mut rebuilt = node.clone();
        rebuilt.set_children(step.slot.clone(), seq);
        Ok(rebuilt)
    } else {
        let mut seq = node.children_of(slot).to_vec();
        let at = match index {
            SlotIndex::All => seq.len(),
            SlotIndex::At(i) if i <= seq.len() => i,
            SlotIndex::At(i) => {
                return Err(Error::PathNotFound(format!(
                    "insert index {i} out of range for <{slot}> under <{}> ({} children)",
                    node.name(),
                    seq.len()
                )))
            }
        };
        seq.insert(at, new_node);
        let mut rebuilt = node.clone();
        rebuilt.set_children(slot.to_string(), seq);
        Ok(rebuilt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    fn fixture() -> Document {
        Document::parse(
            r#"<alto>
                 <Layout>
                   <Page ID="p1">
                     <PrintSpace>
                       <TextBlock ID="b1">
                         <TextLine>
                           <String CONTENT="Hello" STYLEREFS="TS1" HPOS="0" />
                           <SP />
                           <String CONTENT="Wrold" HPOS="120" />
                         </TextLine>
                         <TextLine>
                           <String CONTENT="second" />
                         </TextLine>
                       </TextBlock>
                       <ComposedBlock ID="c1">
                         <ComposedBlock ID="c2">
                           <TextBlock ID="b2">
                             <TextLine><String CONTENT="nested" /></TextLine>
                           </TextBlock>
                         </ComposedBlock>
                       </ComposedBlock>
                     </PrintSpace>
                   </Page>
                 </Layout>
               </alto>"#,
        )
        .unwrap()
    }

    fn line_path(line: usize) -> NodePath {
        NodePath::print_space(0)
            .at("TextBlock", 0)
            .at("TextLine", line)
    }

    #[test]
    fn test_resolve_print_space_path() {
        let doc = fixture();
        let ps = resolve(&doc.root, &NodePath::print_space(0)).unwrap();
        assert_eq!(ps.name(), "PrintSpace");
    }

    #[test]
    fn test_resolve_through_nested_composed_blocks() {
        let doc = fixture();
        let path = NodePath::print_space(0)
            .one("ComposedBlock")
            .one("ComposedBlock")
            .one("TextBlock")
            .one("TextLine")
            .one("String");
        let token = resolve(&doc.root, &path).unwrap();
        assert_eq!(token.attr("CONTENT"), Some("nested"));
    }

    #[test]
    fn test_replace_child_immutable() {
        let doc = fixture();
        let snapshot = doc.clone();

        let mut replacement = resolve(&doc.root, &line_path(1)).unwrap().clone();
        replacement.set_attr("ID", "l2");
        let edited = replace_child(&doc, &line_path(1), replacement).unwrap();

        assert_eq!(doc, snapshot);
        let line = resolve(&edited.root, &line_path(1)).unwrap();
        assert_eq!(line.attr("ID"), Some("l2"));
    }

    #[test]
    fn test_noop_replace_is_identity() {
        let doc = fixture();
        let copy = resolve(&doc.root, &line_path(0)).unwrap().clone();
        let edited = replace_child(&doc, &line_path(0), copy).unwrap();
        assert_eq!(edited, doc);
    }

    #[test]
    fn test_path_not_found_leaves_document_unchanged() {
        let doc = fixture();
        let snapshot = doc.clone();
        let bad = NodePath::print_space(0).at("TextBlock", 7);
        let err = replace_child(&doc, &bad, Element::new("TextBlock"));
        assert!(matches!(err, Err(Error::PathNotFound(_))));
        assert_eq!(doc, snapshot);
    }

    #[test]
    fn test_all_index_rejected_on_sequence() {
        let doc = fixture();
        // The first TextLine holds two String children.
        let bad = line_path(0).one("String");
        assert!(matches!(
            resolve(&doc.root, &bad),
            Err(Error::PathNotFound(_))
        ));
    }

    #[test]
    fn test_remove_collapses_to_single_form() {
        let doc = fixture();
        let edited = remove_child(&doc, &line_path(1)).unwrap();
        let block = resolve(
            &edited.root,
            &NodePath::print_space(0).at("TextBlock", 0),
        )
        .unwrap();
        assert!(block.slot("TextLine").unwrap().is_one());
    }

    #[test]
    fn test_insert_then_remove_restores_document() {
        let doc = fixture();
        let parent = NodePath::print_space(0).at("TextBlock", 0);
        let mut line = Element::new("TextLine");
        let mut token = Element::new("String");
        token.set_attr("CONTENT", "third");
        line.push_child("String", token);

        let inserted = insert_child(&doc, &parent, "TextLine", SlotIndex::All, line).unwrap();
        assert_eq!(
            resolve(&inserted.root, &parent).unwrap().children_of("TextLine").len(),
            3
        );

        let removed = remove_child(&inserted, &parent.clone().at("TextLine", 2)).unwrap();
        assert_eq!(removed, doc);
    }

    #[test]
    fn test_insert_out_of_range() {
        let doc = fixture();
        let parent = NodePath::print_space(0).at("TextBlock", 0);
        let err = insert_child(
            &doc,
            &parent,
            "TextLine",
            SlotIndex::At(9),
            Element::new("TextLine"),
        );
        assert!(matches!(err, Err(Error::PathNotFound(_))));
    }

    #[test]
    fn test_set_text_single_token() {
        let doc = fixture();
        let edited = set_text(&doc, &line_path(0), SlotIndex::At(1), "World").unwrap();
        let line = resolve(&edited.root, &line_path(0)).unwrap();
        let tokens = line.children_of("String");
        assert_eq!(tokens[0].attr("CONTENT"), Some("Hello"));
        assert_eq!(tokens[1].attr("CONTENT"), Some("World"));
    }

    #[test]
    fn test_set_text_all_redistributes_words() {
        let doc = fixture();
        let edited = set_text(&doc, &line_path(0), SlotIndex::All, "Hello World").unwrap();
        let tokens = resolve(&edited.root, &line_path(0))
            .unwrap()
            .children_of("String");
        assert_eq!(tokens[0].attr("CONTENT"), Some("Hello"));
        assert_eq!(tokens[1].attr("CONTENT"), Some("World"));
    }

    #[test]
    fn test_set_text_preserves_other_attributes() {
        let doc = fixture();
        let edited = set_text(&doc, &line_path(0), SlotIndex::All, "Hello World").unwrap();
        let line = resolve(&edited.root, &line_path(0)).unwrap();
        let first = &line.children_of("String")[0];
        assert_eq!(first.attr("STYLEREFS"), Some("TS1"));
        assert_eq!(first.attr("HPOS"), Some("0"));
        // The SP separator is untouched.
        assert!(line.slot("SP").unwrap().is_one());
    }

    #[test]
    fn test_set_text_word_count_mismatch_assigns_pairwise() {
        let doc = fixture();
        let edited = set_text(&doc, &line_path(0), SlotIndex::All, "only").unwrap();
        let tokens = resolve(&edited.root, &line_path(0))
            .unwrap()
            .children_of("String");
        assert_eq!(tokens[0].attr("CONTENT"), Some("only"));
        // The unpaired token keeps its previous content.
        assert_eq!(tokens[1].attr("CONTENT"), Some("Wrold"));
    }

    #[test]
    fn test_set_text_rejects_non_line_target() {
        let doc = fixture();
        let err = set_text(
            &doc,
            &NodePath::print_space(0).at("TextBlock", 0),
            SlotIndex::At(0),
            "x",
        );
        assert!(matches!(err, Err(Error::PathNotFound(_))));
    }

    #[test]
    fn test_set_text_token_index_out_of_range() {
        let doc = fixture();
        let snapshot = doc.clone();
        let err = set_text(&doc, &line_path(1), SlotIndex::At(5), "x");
        assert!(matches!(err, Err(Error::PathNotFound(_))));
        assert_eq!(doc, snapshot);
    }

    #[test]
    fn test_replace_inside_nested_composed_block() {
        let doc = fixture();
        let path = NodePath::print_space(0)
            .one("ComposedBlock")
            .one("ComposedBlock")
            .one("TextBlock")
            .one("TextLine")
            .one("String");
        let mut token = resolve(&doc.root, &path).unwrap().clone();
        token.set_attr("CONTENT", "deeper");
        let edited = replace_child(&doc, &path, token).unwrap();
        assert_eq!(
            resolve(&edited.root, &path).unwrap().attr("CONTENT"),
            Some("deeper")
        );
        // Sibling subtree untouched.
        let other = NodePath::print_space(0).at("TextBlock", 0);
        assert_eq!(
            resolve(&edited.root, &other).unwrap(),
            resolve(&doc.root, &other).unwrap()
        );
    }
}
