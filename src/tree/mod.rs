//! Generic element tree and the one-or-many cardinality model.
//!
//! The serialized format stores repeated child elements as siblings; an
//! in-memory slot therefore holds either a single element or an ordered
//! sequence, and the shape is part of the data: a slot that collapses to one
//! element after an edit must serialize in single-element form again.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::constants::NODE_ID_ATTR;

/// Contents of a named child slot.
///
/// `Absent` never persists inside an element's slot map (storing it removes
/// the slot); it exists so [`ChildSlot::collapse`] is total.
#[derive(Debug, Clone)]
pub enum ChildSlot {
    /// No children under this name.
    Absent,
    /// Exactly one child; serializes as a bare element.
    One(Element),
    /// Two or more children; serializes as a run of siblings.
    Many(Vec<Element>),
}

impl ChildSlot {
    /// Returns the slot contents as a uniform sequence for traversal.
    pub fn as_sequence(&self) -> &[Element] {
        match self {
            ChildSlot::Absent => &[],
            ChildSlot::One(el) => std::slice::from_ref(el),
            ChildSlot::Many(els) => els,
        }
    }

    /// The inverse of [`ChildSlot::as_sequence`]: zero elements collapse to
    /// `Absent`, one to `One`, two or more to `Many`.
    pub fn collapse(mut els: Vec<Element>) -> ChildSlot {
        match els.len() {
            0 => ChildSlot::Absent,
            1 => ChildSlot::One(els.remove(0)),
            _ => ChildSlot::Many(els),
        }
    }

    /// Consumes the slot, returning its contents as a vector.
    pub fn into_sequence(self) -> Vec<Element> {
        match self {
            ChildSlot::Absent => Vec::new(),
            ChildSlot::One(el) => vec![el],
            ChildSlot::Many(els) => els,
        }
    }

    /// Number of elements in the slot.
    pub fn len(&self) -> usize {
        self.as_sequence().len()
    }

    /// Returns true if the slot holds no elements.
    pub fn is_empty(&self) -> bool {
        matches!(self, ChildSlot::Absent)
    }

    /// Returns true if the slot holds exactly one element in bare form.
    pub fn is_one(&self) -> bool {
        matches!(self, ChildSlot::One(_))
    }

    /// Returns the slot contents as a mutable uniform sequence.
    pub fn as_sequence_mut(&mut self) -> &mut [Element] {
        match self {
            ChildSlot::Absent => &mut [],
            ChildSlot::One(el) => std::slice::from_mut(el),
            ChildSlot::Many(els) => els,
        }
    }

    /// Appends an element, promoting `One` to `Many`.
    pub fn push(&mut self, el: Element) {
        match std::mem::replace(self, ChildSlot::Absent) {
            ChildSlot::Absent => *self = ChildSlot::One(el),
            ChildSlot::One(first) => *self = ChildSlot::Many(vec![first, el]),
            ChildSlot::Many(mut els) => {
                els.push(el);
                *self = ChildSlot::Many(els);
            }
        }
    }
}

/// Slot equality includes the cardinality shape: a bare element and a
/// one-element sequence are distinct values.
impl PartialEq for ChildSlot {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ChildSlot::Absent, ChildSlot::Absent) => true,
            (ChildSlot::One(a), ChildSlot::One(b)) => a == b,
            (ChildSlot::Many(a), ChildSlot::Many(b)) => a == b,
            _ => false,
        }
    }
}

/// A structural unit of the document tree.
///
/// Attributes are addressed by bare name; child elements are grouped into
/// named slots in first-appearance document order. Elements that carry
/// character data (e.g. `<MeasurementUnit>pixel</MeasurementUnit>`) store it
/// in `text`.
#[derive(Debug, Clone, Default)]
pub struct Element {
    name: String,
    attributes: HashMap<String, String>,
    children: IndexMap<String, ChildSlot>,
    text: Option<String>,
}

impl Element {
    /// Creates an element with the given name and no attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            attributes: HashMap::new(),
            children: IndexMap::new(),
            text: None,
        }
    }

    /// Returns the element name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the attribute value for `name`, if set.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Sets an attribute, replacing any previous value.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Removes an attribute, returning its previous value.
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attributes.remove(name)
    }

    /// Returns the attribute map.
    pub fn attributes(&self) -> &HashMap<String, String> {
        &self.attributes
    }

    /// Returns the character content, if any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Sets the character content. `None` clears it.
    pub fn set_text(&mut self, text: Option<String>) {
        self.text = text;
    }

    /// Returns the slot stored under `name`, if present.
    pub fn slot(&self, name: &str) -> Option<&ChildSlot> {
        self.children.get(name)
    }

    /// Returns the children under `name` as a uniform sequence.
    ///
    /// Absent slots yield an empty slice; the source is never mutated.
    pub fn children_of(&self, name: &str) -> &[Element] {
        self.children.get(name).map_or(&[], ChildSlot::as_sequence)
    }

    /// Returns the first (or only) child under `name`.
    pub fn first_child(&self, name: &str) -> Option<&Element> {
        self.children_of(name).first()
    }

    /// Replaces the slot under `name` with the collapsed form of `els`.
    ///
    /// An empty vector removes the slot entirely, so a later serialization
    /// never emits an empty sibling run.
    pub fn set_children(&mut self, name: impl Into<String>, els: Vec<Element>) {
        let name = name.into();
        match ChildSlot::collapse(els) {
            ChildSlot::Absent => {
                self.children.shift_remove(&name);
            }
            slot => {
                self.children.insert(name, slot);
            }
        }
    }

    /// Appends a child under `name`, creating the slot if needed.
    pub fn push_child(&mut self, name: impl Into<String>, el: Element) {
        self.children
            .entry(name.into())
            .or_insert(ChildSlot::Absent)
            .push(el);
    }

    /// Removes and returns the slot stored under `name`.
    pub fn remove_slot(&mut self, name: &str) -> Option<ChildSlot> {
        self.children.shift_remove(name)
    }

    /// Iterates slots in first-appearance document order.
    pub fn slots(&self) -> impl Iterator<Item = (&str, &ChildSlot)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates slots mutably, in first-appearance document order.
    pub fn slots_mut(&mut self) -> impl Iterator<Item = (&str, &mut ChildSlot)> {
        self.children.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns true if the element has neither children nor character content.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty() && self.text.is_none()
    }

    /// Recursively visits this element and all descendants, pre-order.
    pub fn walk(&self, visit: &mut dyn FnMut(&Element)) {
        visit(self);
        for (_, slot) in self.slots() {
            for child in slot.as_sequence() {
                child.walk(visit);
            }
        }
    }
}

/// Structural equality: names, attributes, slot contents (including
/// cardinality shape) and character content.
///
/// The reserved identity attribute and slot insertion order are ignored, so
/// the round-trip and tag/untag laws can be stated directly in terms of `==`.
impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        if self.name != other.name || self.text != other.text {
            return false;
        }
        if !attrs_equal(&self.attributes, &other.attributes) {
            return false;
        }
        if self.children.len() != other.children.len() {
            return false;
        }
        self.children
            .iter()
            .all(|(name, slot)| other.children.get(name) == Some(slot))
    }
}

fn attrs_equal(a: &HashMap<String, String>, b: &HashMap<String, String>) -> bool {
    let significant = |m: &HashMap<String, String>| {
        m.iter().filter(|(k, _)| k.as_str() != NODE_ID_ATTR).count()
    };
    if significant(a) != significant(b) {
        return false;
    }
    a.iter()
        .filter(|(k, _)| k.as_str() != NODE_ID_ATTR)
        .all(|(k, v)| b.get(k) == Some(v))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str) -> Element {
        Element::new(name)
    }

    #[test]
    fn test_collapse_shapes() {
        assert!(matches!(ChildSlot::collapse(vec![]), ChildSlot::Absent));
        assert!(matches!(
            ChildSlot::collapse(vec![leaf("a")]),
            ChildSlot::One(_)
        ));
        assert!(matches!(
            ChildSlot::collapse(vec![leaf("a"), leaf("b")]),
            ChildSlot::Many(_)
        ));
    }

    #[test]
    fn test_collapse_sequence_inverse() {
        for els in [
            vec![],
            vec![leaf("a")],
            vec![leaf("a"), leaf("b")],
            vec![leaf("a"), leaf("b"), leaf("c")],
        ] {
            let slot = ChildSlot::collapse(els.clone());
            assert_eq!(slot.as_sequence(), &els[..]);
            assert_eq!(ChildSlot::collapse(slot.as_sequence().to_vec()), slot);
        }
    }

    #[test]
    fn test_push_promotes_cardinality() {
        let mut parent = Element::new("parent");
        parent.push_child("child", leaf("child"));
        assert!(parent.slot("child").unwrap().is_one());

        parent.push_child("child", leaf("child"));
        assert!(matches!(parent.slot("child"), Some(ChildSlot::Many(v)) if v.len() == 2));
    }

    #[test]
    fn test_set_children_removes_empty_slot() {
        let mut parent = Element::new("parent");
        parent.push_child("child", leaf("child"));
        parent.set_children("child", vec![]);
        assert!(parent.slot("child").is_none());
        assert!(parent.children_of("child").is_empty());
    }

    #[test]
    fn test_set_children_collapses_to_one() {
        let mut parent = Element::new("parent");
        parent.set_children("child", vec![leaf("child"), leaf("child")]);
        assert!(!parent.slot("child").unwrap().is_one());

        parent.set_children("child", vec![leaf("child")]);
        assert!(parent.slot("child").unwrap().is_one());
    }

    #[test]
    fn test_equality_ignores_reserved_attr() {
        let mut a = Element::new("el");
        a.set_attr("ID", "x");
        let mut b = a.clone();
        b.set_attr(NODE_ID_ATTR, "n1");

        assert_eq!(a, b);

        b.set_attr("ID", "y");
        assert_ne!(a, b);
    }

    #[test]
    fn test_equality_ignores_slot_order_but_not_shape() {
        let mut a = Element::new("el");
        a.push_child("x", leaf("x"));
        a.push_child("y", leaf("y"));

        let mut b = Element::new("el");
        b.push_child("y", leaf("y"));
        b.push_child("x", leaf("x"));

        assert_eq!(a, b);

        // One vs Many of the same single element is a shape difference.
        let mut c = Element::new("el");
        c.set_children("x", vec![leaf("x")]);
        let mut d = Element::new("el");
        d.children.insert("x".to_string(), ChildSlot::Many(vec![leaf("x")]));
        assert_ne!(c, d);
    }

    #[test]
    fn test_walk_visits_all_nodes() {
        let mut root = Element::new("root");
        let mut mid = Element::new("mid");
        mid.push_child("leaf", leaf("leaf"));
        root.push_child("mid", mid);

        let mut names = Vec::new();
        root.walk(&mut |el| names.push(el.name().to_string()));
        assert_eq!(names, vec!["root", "mid", "leaf"]);
    }
}
