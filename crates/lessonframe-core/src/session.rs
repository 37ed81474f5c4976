//! Per-frame session state.

use std::fmt;

use crate::config::{EmbedConfig, ResolvedDimension};

/// Lifecycle state of one embedded frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameState {
    /// Not yet mounted.
    Unloaded,
    /// Showing a load button; nothing requested from the lesson origin yet.
    AwaitingManualLoad,
    /// Frame mounted, waiting for `explorationLoaded`.
    Loading,
    /// Lesson running.
    Loaded,
    /// Lesson completed. A reset returns to [`FrameState::Loaded`].
    Completed,
    /// Configuration error. Terminal; no event reaches the session again.
    Invalid,
}

impl FrameState {
    /// Name used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unloaded => "unloaded",
            Self::AwaitingManualLoad => "awaiting_manual_load",
            Self::Loading => "loading",
            Self::Loaded => "loaded",
            Self::Completed => "completed",
            Self::Invalid => "invalid",
        }
    }

    /// True once the frame element exists.
    pub const fn has_frame(self) -> bool {
        matches!(self, Self::Loading | Self::Loaded | Self::Completed)
    }
}

impl fmt::Display for FrameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What currently occupies the placeholder's position in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayedRegion {
    /// The original placeholder node.
    Placeholder,
    /// The manual load button.
    LoadButton,
    /// The configuration warning box.
    Warning,
    /// The lesson frame (possibly with a loading indicator above it).
    Frame,
}

/// Mutable state of one embedded frame, owned by its controller.
#[derive(Debug, Clone)]
pub struct FrameSession {
    pub(crate) config: Option<EmbedConfig>,
    pub(crate) state: FrameState,
    pub(crate) has_loaded: bool,
    pub(crate) loading_indicator_visible: bool,
    pub(crate) displayed: DisplayedRegion,
    pub(crate) height: Option<ResolvedDimension>,
    pub(crate) width: Option<ResolvedDimension>,
}

impl FrameSession {
    pub(crate) fn new() -> Self {
        Self {
            config: None,
            state: FrameState::Unloaded,
            has_loaded: false,
            loading_indicator_visible: false,
            displayed: DisplayedRegion::Placeholder,
            height: None,
            width: None,
        }
    }

    /// Configuration, once the frame has been created.
    pub fn config(&self) -> Option<&EmbedConfig> {
        self.config.as_ref()
    }

    /// Lifecycle state.
    pub fn state(&self) -> FrameState {
        self.state
    }

    /// True once `explorationLoaded` arrived.
    pub fn has_loaded(&self) -> bool {
        self.has_loaded
    }

    /// True while the loading indicator (or its failure message) is shown.
    pub fn loading_indicator_visible(&self) -> bool {
        self.loading_indicator_visible
    }

    /// Region occupying the placeholder's position.
    pub fn displayed(&self) -> DisplayedRegion {
        self.displayed
    }

    /// Frame height as applied at creation.
    pub fn height(&self) -> Option<&ResolvedDimension> {
        self.height.as_ref()
    }

    /// Frame width as applied at creation.
    pub fn width(&self) -> Option<&ResolvedDimension> {
        self.width.as_ref()
    }

    /// True when the configured height must not follow the lesson content.
    pub fn height_fixed(&self) -> bool {
        self.height.as_ref().is_some_and(|h| h.fixed)
    }
}
