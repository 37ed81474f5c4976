//! Placeholder nodes and the configuration read from them.
//!
//! A host page marks each lesson with a placeholder element:
//!
//! ```html
//! <openclassroom openclassroom-id="2DB88aOgiXgD"
//!                src="https://lessons.openclassroom.edu.vn"
//!                locale="vi" height="auto" autoload="false">
//! </openclassroom>
//! ```
//!
//! Attributes are read once, when the node is mounted.

use std::collections::BTreeMap;

use lessonframe_proto::Origin;

use crate::error::ConfigError;

/// Tag name of placeholder elements.
pub const EMBED_TAG: &str = "openclassroom";

/// Default frame height when none is fixed.
pub const DEFAULT_HEIGHT: &str = "700px";

/// Default frame width when none is fixed. Leaves room for a vertical
/// scrollbar without forcing a horizontal one.
pub const DEFAULT_WIDTH: &str = "98%";

/// Default lesson locale.
pub const DEFAULT_LOCALE: &str = "en";

/// Attribute names read from a placeholder node.
pub mod attr {
    /// Lesson identifier (required).
    pub const LESSON_ID: &str = "openclassroom-id";
    /// Origin serving the lesson.
    pub const SRC: &str = "src";
    /// Lesson locale.
    pub const LOCALE: &str = "locale";
    /// Frame height, a pixel value or `auto`.
    pub const HEIGHT: &str = "height";
    /// Frame width, a length or `auto`.
    pub const WIDTH: &str = "width";
    /// Pinned lesson version.
    pub const EXPLORATION_VERSION: &str = "exploration-version";
    /// `"false"` defers loading until the learner asks for it.
    pub const AUTOLOAD: &str = "autoload";
}

/// Document-assigned identity of a placeholder node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// A placeholder element as found in the host document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedNode {
    id: NodeId,
    tag: String,
    attributes: BTreeMap<String, String>,
}

impl EmbedNode {
    /// An `<openclassroom>` node without attributes.
    pub fn new(id: NodeId) -> Self {
        Self::with_tag(id, EMBED_TAG)
    }

    /// A node with an arbitrary tag.
    pub fn with_tag(id: NodeId, tag: impl Into<String>) -> Self {
        Self { id, tag: tag.into(), attributes: BTreeMap::new() }
    }

    /// Builder-style [`EmbedNode::set_attr`].
    #[must_use]
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Set an attribute.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }

    /// Attribute value. Empty values read as absent.
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str).filter(|v| !v.is_empty())
    }

    /// Node identity.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Tag name as found in the document.
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

/// A frame dimension as configured on the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dimension {
    /// Explicit value; messages from the child never change it.
    Fixed(String),
    /// Absent or `auto`; a default is used and the child may resize it.
    Auto,
}

impl Dimension {
    fn parse(value: Option<&str>) -> Self {
        match value {
            None | Some("auto") => Self::Auto,
            Some(value) => Self::Fixed(value.to_string()),
        }
    }

    /// Concrete value, falling back to `default` for [`Dimension::Auto`].
    pub fn resolve(&self, default: &str) -> ResolvedDimension {
        match self {
            Self::Fixed(value) => ResolvedDimension { value: value.clone(), fixed: true },
            Self::Auto => ResolvedDimension { value: default.to_string(), fixed: false },
        }
    }
}

/// A dimension applied to the frame element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDimension {
    /// Attribute value, e.g. `700px` or `98%`.
    pub value: String,
    /// Set when the value came from the node.
    pub fixed: bool,
}

/// Configuration of one embedded lesson.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedConfig {
    /// Lesson identifier.
    pub lesson_id: String,
    /// Origin serving the lesson; inbound messages must carry exactly this.
    pub source_origin: Origin,
    /// Lesson locale.
    pub locale: String,
    /// Frame height.
    pub height: Dimension,
    /// Frame width.
    pub width: Dimension,
    /// Pinned lesson version.
    pub exploration_version: Option<String>,
    /// Load without waiting for the learner.
    pub autoload: bool,
}

impl EmbedConfig {
    /// Read the configuration from a placeholder node.
    ///
    /// `page_origin` is used when the node names no `src`.
    ///
    /// # Errors
    ///
    /// - `ConfigError::UnexpectedTag` for anything but `<openclassroom>`
    /// - `ConfigError::MissingLessonId` without an `openclassroom-id`
    pub fn from_node(node: &EmbedNode, page_origin: &Origin) -> Result<Self, ConfigError> {
        if !node.tag().eq_ignore_ascii_case(EMBED_TAG) {
            return Err(ConfigError::UnexpectedTag { tag: node.tag().to_string() });
        }

        let lesson_id = node.get_attr(attr::LESSON_ID).ok_or(ConfigError::MissingLessonId)?;

        let source_origin =
            node.get_attr(attr::SRC).map_or_else(|| page_origin.clone(), Origin::new);

        Ok(Self {
            lesson_id: lesson_id.to_string(),
            source_origin,
            locale: node.get_attr(attr::LOCALE).unwrap_or(DEFAULT_LOCALE).to_string(),
            height: Dimension::parse(node.get_attr(attr::HEIGHT)),
            width: Dimension::parse(node.get_attr(attr::WIDTH)),
            exploration_version: node.get_attr(attr::EXPLORATION_VERSION).map(str::to_string),
            autoload: node.get_attr(attr::AUTOLOAD) != Some("false"),
        })
    }
}
