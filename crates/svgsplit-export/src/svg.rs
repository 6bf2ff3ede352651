//! SVG export serializer.
//!
//! Converts the engine's in-memory document tree into SVG text using the
//! [`svg`] crate for element construction and escaping of attribute
//! values and text.
//!
//! Optional [`SvgMetadata`] embeds `<title>` and `<desc>` elements right
//! after the opening `<svg>` tag so exported files are identifiable in
//! file managers and screen readers.
//!
//! This is a pure function with no I/O -- it returns a `String`.

use svg::Node as _;
use svg::node::element::{Description, Element as SvgElement, Title};
use svg::node::Text;

use svgsplit_engine::{Element, Node};

/// Metadata to embed in the SVG document.
///
/// Both fields are optional. Text values are XML-escaped automatically
/// by the `svg` crate.
#[derive(Debug, Clone, Default)]
pub struct SvgMetadata<'a> {
    /// Document title, emitted as `<title>`.
    ///
    /// Typically the source file name without extension.
    pub title: Option<&'a str>,

    /// Document description, emitted as `<desc>`.
    pub description: Option<&'a str>,
}

/// Serialize a composed document as a standalone SVG file.
///
/// The output starts with an XML declaration and ends with a newline.
///
/// # Examples
///
/// ```
/// use svgsplit_engine::Element;
/// use svgsplit_export::{SvgMetadata, to_svg};
///
/// let doc = Element::new("svg")
///     .with_attr("xmlns", "http://www.w3.org/2000/svg")
///     .with_attr("width", 260)
///     .with_child(Element::new("text").with_text("30%"));
/// let metadata = SvgMetadata {
///     title: Some("bars"),
///     ..SvgMetadata::default()
/// };
/// let svg = to_svg(&doc, &metadata);
/// assert!(svg.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
/// assert!(svg.contains("<title>bars</title>"));
/// assert!(svg.contains(r#"width="260""#));
/// ```
#[must_use]
pub fn to_svg(document: &Element, metadata: &SvgMetadata<'_>) -> String {
    let mut root = SvgElement::new(document.name());
    for (name, value) in document.attributes().iter() {
        root.assign(name, value);
    }

    if let Some(title) = metadata.title {
        root.append(Title::new(title));
    }
    if let Some(description) = metadata.description {
        root.append(Description::new().add(Text::new(description)));
    }

    for child in document.children() {
        append_node(&mut root, child);
    }

    // The svg crate omits the XML declaration, so we prepend it.
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{root}\n")
}

fn append_node(parent: &mut SvgElement, node: &Node) {
    match node {
        Node::Text(text) => parent.append(Text::new(text.as_str())),
        Node::Element(element) => parent.append(convert(element)),
    }
}

fn convert(element: &Element) -> SvgElement {
    let mut out = SvgElement::new(element.name());
    for (name, value) in element.attributes().iter() {
        out.assign(name, value);
    }
    for child in element.children() {
        append_node(&mut out, child);
    }
    out
}
