//! Source document loading.
//!
//! Parses the uploaded SVG with [`roxmltree`] and keeps only what the
//! compositor needs: the intrinsic [`Viewport`] and the top-level
//! graphic nodes (`g`, `path`, `rect`, `circle`, `ellipse`, `polygon`,
//! `polyline`, `line`). Everything else at the top level (`defs`,
//! `style`, `text`, metadata, editor namespaces) is dropped.
//!
//! Nodes are stored as a closed set of [`Tag`] variants so that the
//! recoloring pass can dispatch on shape kind without string matching.

use tracing::debug;

use crate::tree::{Attributes, Element, Node};
use crate::types::{EngineError, Viewport};

/// The SVG namespace URI.
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// The XLink namespace URI.
pub const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// The only MIME type accepted at the upload boundary.
pub const SVG_MIME_TYPE: &str = "image/svg+xml";

/// Drawable element kinds that receive segment colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Path,
    Rect,
    Circle,
    Ellipse,
    Polygon,
    Polyline,
    Line,
}

impl ShapeKind {
    /// Every drawable kind.
    pub const ALL: [Self; 7] = [
        Self::Path,
        Self::Rect,
        Self::Circle,
        Self::Ellipse,
        Self::Polygon,
        Self::Polyline,
        Self::Line,
    ];

    /// Map an element name to a drawable kind.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// The SVG element name.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Rect => "rect",
            Self::Circle => "circle",
            Self::Ellipse => "ellipse",
            Self::Polygon => "polygon",
            Self::Polyline => "polyline",
            Self::Line => "line",
        }
    }
}

/// Element classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    /// `<g>`.
    Group,
    /// A drawable shape.
    Shape(ShapeKind),
    /// Any other element, kept verbatim apart from recoloring of its
    /// drawable descendants.
    Other(String),
}

impl Tag {
    /// Classify an element name.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        if name == "g" {
            return Self::Group;
        }
        ShapeKind::from_tag(name).map_or_else(|| Self::Other(name.to_owned()), Self::Shape)
    }

    /// The SVG element name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Group => "g",
            Self::Shape(kind) => kind.tag(),
            Self::Other(name) => name,
        }
    }

    /// Returns `true` for the whitelisted top-level graphic tags.
    #[must_use]
    pub const fn is_graphic(&self) -> bool {
        matches!(self, Self::Group | Self::Shape(_))
    }
}

/// A child of a [`GraphicElement`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Graphic {
    /// A nested element.
    Element(GraphicElement),
    /// Non-whitespace character data (e.g. inside `<text>`).
    Text(String),
}

/// One element of the source artwork.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphicElement {
    /// Element classification.
    pub tag: Tag,
    /// Attributes in source order. Namespaced attributes other than
    /// `xlink:` and `xml:` are dropped.
    pub attributes: Attributes,
    /// Children in source order.
    pub children: Vec<Graphic>,
}

impl GraphicElement {
    /// Convert into an output tree element (deep copy).
    #[must_use]
    pub fn to_element(&self) -> Element {
        let children = self
            .children
            .iter()
            .map(|child| match child {
                Graphic::Element(element) => Node::Element(element.to_element()),
                Graphic::Text(text) => Node::Text(text.clone()),
            })
            .collect();
        Element::from_parts(self.tag.name().to_owned(), self.attributes.clone(), children)
    }
}

/// The parsed original artwork.
///
/// Immutable once loaded; a new upload replaces it wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDocument {
    viewport: Viewport,
    graphics: Vec<GraphicElement>,
}

impl SourceDocument {
    /// Parse SVG text.
    ///
    /// The intrinsic viewport comes from `viewBox` when it holds four
    /// numbers with positive size, otherwise from the `width`/`height`
    /// attributes, otherwise 800×600.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidSvg`] if the text is not well-formed
    /// XML or the root element is not `<svg>`.
    pub fn parse(text: &str) -> Result<Self, EngineError> {
        let mut options = roxmltree::ParsingOptions::default();
        options.allow_dtd = true;
        let doc = roxmltree::Document::parse_with_options(text, options)
            .map_err(|e| EngineError::InvalidSvg(e.to_string()))?;

        let root = doc.root_element();
        if root.tag_name().name() != "svg" || !in_svg_namespace(root) {
            return Err(EngineError::InvalidSvg(format!(
                "root element is <{}>, expected <svg>",
                root.tag_name().name()
            )));
        }

        let viewport = resolve_viewport(root);
        let (graphics, dropped): (Vec<_>, Vec<_>) = root
            .children()
            .filter(roxmltree::Node::is_element)
            .filter_map(convert_element)
            .partition(|element| element.tag.is_graphic());
        if !dropped.is_empty() {
            debug!(
                dropped = ?dropped.iter().map(|e| e.tag.name()).collect::<Vec<_>>(),
                "ignoring non-graphic top-level elements"
            );
        }

        Ok(Self { viewport, graphics })
    }

    /// Parse raw upload bytes (UTF-8 SVG text).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidSvg`] if the bytes are not UTF-8 or
    /// not a valid SVG document.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EngineError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| EngineError::InvalidSvg(format!("document is not UTF-8: {e}")))?;
        Self::parse(text)
    }

    /// Build a document directly from its parts.
    #[must_use]
    pub const fn from_parts(viewport: Viewport, graphics: Vec<GraphicElement>) -> Self {
        Self { viewport, graphics }
    }

    /// Intrinsic coordinate space.
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Whitelisted top-level graphic nodes in document order.
    #[must_use]
    pub fn graphics(&self) -> &[GraphicElement] {
        &self.graphics
    }
}

/// Check an upload's declared MIME type.
///
/// # Errors
///
/// Returns [`EngineError::InvalidFileType`] unless `mime` is
/// `image/svg+xml` (parameters such as `; charset=utf-8` are ignored).
pub fn check_mime(mime: &str) -> Result<(), EngineError> {
    let essence = mime.split(';').next().unwrap_or_default().trim();
    if essence.eq_ignore_ascii_case(SVG_MIME_TYPE) {
        Ok(())
    } else {
        Err(EngineError::InvalidFileType {
            mime: mime.to_owned(),
        })
    }
}

fn in_svg_namespace(node: roxmltree::Node<'_, '_>) -> bool {
    matches!(node.tag_name().namespace(), None | Some(SVG_NAMESPACE))
}

fn convert_element(node: roxmltree::Node<'_, '_>) -> Option<GraphicElement> {
    if !in_svg_namespace(node) {
        return None;
    }

    let mut attributes = Attributes::new();
    for attr in node.attributes() {
        let name = match attr.namespace() {
            None => attr.name().to_owned(),
            Some(XLINK_NAMESPACE) => format!("xlink:{}", attr.name()),
            Some(XML_NAMESPACE) => format!("xml:{}", attr.name()),
            Some(_) => continue,
        };
        attributes.set(name, attr.value());
    }

    let children = node
        .children()
        .filter_map(|child| {
            if child.is_element() {
                convert_element(child).map(Graphic::Element)
            } else if child.is_text() {
                child
                    .text()
                    .filter(|text| !text.trim().is_empty())
                    .map(|text| Graphic::Text(text.to_owned()))
            } else {
                None
            }
        })
        .collect();

    Some(GraphicElement {
        tag: Tag::from_name(node.tag_name().name()),
        attributes,
        children,
    })
}

fn resolve_viewport(root: roxmltree::Node<'_, '_>) -> Viewport {
    if let Some(viewport) = root.attribute("viewBox").and_then(parse_view_box) {
        return viewport;
    }
    let width = root
        .attribute("width")
        .and_then(parse_length)
        .unwrap_or(Viewport::FALLBACK_WIDTH);
    let height = root
        .attribute("height")
        .and_then(parse_length)
        .unwrap_or(Viewport::FALLBACK_HEIGHT);
    Viewport::sized(width, height)
}

/// Parse `min-x min-y width height`, separated by whitespace and/or
/// commas. Returns `None` unless there are exactly four finite numbers
/// and the size is positive.
fn parse_view_box(value: &str) -> Option<Viewport> {
    let numbers: Vec<f64> = value
        .split(|c: char| c.is_ascii_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .map(str::parse::<f64>)
        .collect::<Result<_, _>>()
        .ok()?;
    let [x, y, width, height] = numbers.as_slice() else {
        return None;
    };
    let all_finite = [x, y, width, height].iter().all(|v| v.is_finite());
    (all_finite && *width > 0.0 && *height > 0.0).then_some(Viewport {
        x: *x,
        y: *y,
        width: *width,
        height: *height,
    })
}

/// Parse the leading number of a length such as `"120"`, `"120.5px"`
/// or `"50%"`; units are ignored.
fn parse_length(value: &str) -> Option<f64> {
    let value = value.trim();
    let end = value
        .char_indices()
        .find(|&(i, c)| {
            !(c.is_ascii_digit() || c == '.' || ((c == '-' || c == '+') && i == 0) || c == 'e' || c == 'E')
        })
        .map_or(value.len(), |(i, _)| i);
    // Back off a trailing exponent marker ("10em" is 10, not "10e").
    let mut number = &value[..end];
    while let Some(stripped) = number.strip_suffix(['e', 'E']) {
        number = stripped;
    }
    number.parse::<f64>().ok().filter(|v| v.is_finite())
}
