//! Typed traversal over source graphics.
//!
//! [`walk_mut`] dispatches each element to the visitor method for its
//! [`Tag`] variant, then recurses into the element's children. Text
//! children are not visited.

use crate::source::{Graphic, GraphicElement, ShapeKind, Tag};
use crate::tree::Attributes;

/// Callbacks for each element variant. All methods default to no-ops.
pub trait GraphicVisitor {
    /// Called for `<g>` elements.
    fn visit_group(&mut self, _attributes: &mut Attributes) {}

    /// Called for drawable shapes.
    fn visit_shape(&mut self, _kind: ShapeKind, _attributes: &mut Attributes) {}

    /// Called for every other element (`text`, `use`, `a`, ...).
    fn visit_other(&mut self, _name: &str, _attributes: &mut Attributes) {}
}

/// Visit `element` and all of its descendant elements, parents first.
pub fn walk_mut<V: GraphicVisitor + ?Sized>(visitor: &mut V, element: &mut GraphicElement) {
    match &element.tag {
        Tag::Group => visitor.visit_group(&mut element.attributes),
        Tag::Shape(kind) => visitor.visit_shape(*kind, &mut element.attributes),
        Tag::Other(name) => visitor.visit_other(name, &mut element.attributes),
    }
    for child in &mut element.children {
        if let Graphic::Element(child) = child {
            walk_mut(visitor, child);
        }
    }
}
