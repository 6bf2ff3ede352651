//! In-memory output document tree.
//!
//! The engine never touches a live rendering surface. Compositions are
//! built as a plain tree of [`Element`]s (name, ordered attributes,
//! ordered children) and only serialized at the export boundary.

use std::fmt::{self, Display};

/// Formats a coordinate for an attribute value.
///
/// Uses the shortest round-tripping decimal form (`240`, `0.9`) and
/// never emits `-0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Num(pub f64);

impl Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0.0 {
            f.write_str("0")
        } else {
            Display::fmt(&self.0, f)
        }
    }
}

/// Ordered attribute list with set-semantics on names.
///
/// Insertion order is kept so that serialized output is stable and
/// mirrors the order in which attributes were assigned.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    /// An empty attribute list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Look up an attribute value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing any existing value in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Display) {
        let name = name.into();
        let value = value.to_string();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name, value)),
        }
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self.0.iter().position(|(n, _)| n == name)?;
        Some(self.0.remove(index).1)
    }

    /// Iterate `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Number of attributes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no attributes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A child of an [`Element`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A nested element.
    Element(Element),
    /// Character data.
    Text(String),
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

/// One element of the output document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Attributes,
    children: Vec<Node>,
}

impl Element {
    /// Create an element with no attributes or children.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    /// Create an element from already-collected parts.
    #[must_use]
    pub const fn from_parts(name: String, attributes: Attributes, children: Vec<Node>) -> Self {
        Self {
            name,
            attributes,
            children,
        }
    }

    /// Builder form of [`Element::set_attr`].
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.attributes.set(name, value);
        self
    }

    /// Builder form of [`Element::push`].
    #[must_use]
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append a text child.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Set an attribute.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Display) {
        self.attributes.set(name, value);
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attributes.remove(name)
    }

    /// Append a child.
    pub fn push(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }

    /// Element name, e.g. `"g"`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute value by name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name)
    }

    /// All attributes.
    #[must_use]
    pub const fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// All children in document order.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Element children only, skipping text.
    pub fn child_elements(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(|child| match child {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// Concatenated text of the direct text children.
    #[must_use]
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|child| match child {
                Node::Text(text) => Some(text.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }

    /// Returns `true` if the whitespace-separated `class` attribute
    /// contains `class`.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// This element and all descendant elements in pre-order.
    #[must_use]
    pub fn descendants(&self) -> Vec<&Self> {
        let mut out = vec![self];
        for child in self.child_elements() {
            out.extend(child.descendants());
        }
        out
    }

    /// First element in pre-order whose `id` is `id`.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&Self> {
        self.descendants()
            .into_iter()
            .find(|element| element.attr("id") == Some(id))
    }

    /// Apply `f` to this element and every descendant element, parents
    /// before children.
    pub fn for_each_mut(&mut self, f: &mut impl FnMut(&mut Self)) {
        f(self);
        for child in &mut self.children {
            if let Node::Element(element) = child {
                element.for_each_mut(f);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_in_place() {
        let mut attrs = Attributes::new();
        attrs.set("fill", "red");
        attrs.set("stroke", "blue");
        attrs.set("fill", "green");
        let pairs: Vec<_> = attrs.iter().collect();
        assert_eq!(pairs, vec![("fill", "green"), ("stroke", "blue")]);
    }

    #[test]
    fn remove_returns_previous_value() {
        let mut attrs = Attributes::new();
        attrs.set("style", "fill:red");
        assert_eq!(attrs.remove("style").as_deref(), Some("fill:red"));
        assert_eq!(attrs.remove("style"), None);
        assert!(attrs.is_empty());
    }

    #[test]
    fn numbers_format_without_trailing_zeroes() {
        let el = Element::new("rect").with_attr("x", 240.0).with_attr("w", 0.9);
        assert_eq!(el.attr("x"), Some("240"));
        assert_eq!(el.attr("w"), Some("0.9"));
    }

    #[test]
    fn num_normalizes_negative_zero() {
        assert_eq!(Num(-0.0).to_string(), "0");
        assert_eq!(Num(-12.5).to_string(), "-12.5");
        assert_eq!(Num(260.0).to_string(), "260");
    }

    #[test]
    fn descendants_are_pre_order() {
        let doc = Element::new("svg")
            .with_child(
                Element::new("g")
                    .with_attr("id", "a")
                    .with_child(Element::new("path").with_attr("id", "b")),
            )
            .with_child(Element::new("rect").with_attr("id", "c"));
        let names: Vec<_> = doc.descendants().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["svg", "g", "path", "rect"]);
        assert_eq!(doc.find_by_id("b").unwrap().name(), "path");
        assert!(doc.find_by_id("missing").is_none());
    }

    #[test]
    fn has_class_matches_whole_tokens() {
        let el = Element::new("g").with_attr("class", "annotation-border extra");
        assert!(el.has_class("annotation-border"));
        assert!(el.has_class("extra"));
        assert!(!el.has_class("annotation"));
    }

    #[test]
    fn text_skips_elements() {
        let el = Element::new("text")
            .with_text("30")
            .with_child(Element::new("tspan"))
            .with_text("%");
        assert_eq!(el.text(), "30%");
    }

    #[test]
    fn for_each_mut_reaches_every_element() {
        let mut doc = Element::new("svg")
            .with_child(Element::new("g").with_child(Element::new("path")))
            .with_text("ignored");
        let mut count = 0;
        doc.for_each_mut(&mut |el| {
            el.set_attr("data-seen", "1");
            count += 1;
        });
        assert_eq!(count, 3);
        assert!(doc.descendants().iter().all(|e| e.attr("data-seen") == Some("1")));
    }
}
