//! In-memory model of the host document.
//!
//! Tracks, per frame controller, exactly the DOM state the embedding script
//! manipulates: what occupies the placeholder's position, the loading
//! indicator above the frame, and the frame element's attributes and inline
//! style. Tests assert on this instead of on raw action lists.

use std::collections::BTreeMap;

use lessonframe_core::{FrameAction, FrameId, FrameSpec, HIDDEN_FRAME_STYLE, WindowId};

/// Inline `height` style of a frame element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineHeight {
    /// No inline height; the `height` attribute applies.
    Unset,
    /// `height: auto`; the `height` attribute applies.
    Auto,
    /// A pixel value that overrides the `height` attribute.
    Px(u32),
}

/// Loading indicator region above a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadingIndicator {
    /// Still waiting.
    Loading {
        /// Indicator text.
        message: String,
    },
    /// Load timeout passed.
    Failed {
        /// Failure text.
        message: String,
        /// Line under it.
        subtitle: String,
    },
}

/// A mounted frame element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameElement {
    /// Full `src` location.
    pub src: String,
    /// Window of the frame's browsing context.
    pub window: WindowId,
    /// `height` attribute.
    pub height_attr: String,
    /// `width` attribute.
    pub width_attr: String,
    /// `title` attribute.
    pub title: String,
    /// Inline `height` style.
    pub inline_height: InlineHeight,
    /// True while the frame is off-screen and invisible.
    pub hidden: bool,
    /// Number of scroll-into-view requests.
    pub scroll_count: u32,
}

impl FrameElement {
    /// Height the frame is rendered at, in pixels, when it can be determined.
    pub fn rendered_height(&self) -> Option<u32> {
        match self.inline_height {
            InlineHeight::Px(height) => Some(height),
            InlineHeight::Unset | InlineHeight::Auto => {
                self.height_attr.strip_suffix("px").and_then(|px| px.parse().ok())
            },
        }
    }
}

/// Everything at one placeholder's position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderView {
    /// Warning box `(heading, message)`.
    pub warning: Option<(String, String)>,
    /// Manual load button label.
    pub load_button: Option<String>,
    /// Value of the placeholder's `autoload` attribute, once set by script.
    pub autoload_attr: Option<String>,
    /// Loading indicator above the frame.
    pub loading_indicator: Option<LoadingIndicator>,
    /// The frame element.
    pub frame: Option<FrameElement>,
}

/// The simulated host document.
#[derive(Debug, Clone, Default)]
pub struct SimDocument {
    views: BTreeMap<FrameId, PlaceholderView>,
}

impl SimDocument {
    /// Empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// View at `frame`'s placeholder position.
    pub fn view(&self, frame: FrameId) -> Option<&PlaceholderView> {
        self.views.get(&frame)
    }

    /// Frame element of `frame`.
    pub fn frame(&self, frame: FrameId) -> Option<&FrameElement> {
        self.views.get(&frame).and_then(|view| view.frame.as_ref())
    }

    /// Number of frame elements in the document.
    pub fn frame_count(&self) -> usize {
        self.views.values().filter(|view| view.frame.is_some()).count()
    }

    /// Set an inline pixel height, as a host stylesheet script might.
    pub fn pin_inline_height(&mut self, frame: FrameId, height: u32) {
        if let Some(element) = self.frame_mut(frame) {
            element.inline_height = InlineHeight::Px(height);
        }
    }

    /// Create the frame element for `spec`, owned by `window`.
    pub fn mount_frame(&mut self, frame: FrameId, spec: &FrameSpec, window: WindowId) {
        let view = self.views.entry(frame).or_default();
        view.load_button = None;
        view.frame = Some(FrameElement {
            src: spec.url.to_uri(),
            window,
            height_attr: spec.height.value.clone(),
            width_attr: spec.width.value.clone(),
            title: spec.title.clone(),
            inline_height: InlineHeight::Unset,
            hidden: spec.style == HIDDEN_FRAME_STYLE,
            scroll_count: 0,
        });
    }

    /// Apply a DOM action. Timer, hook and mount actions are the driver's
    /// business and are ignored here.
    pub fn apply(&mut self, frame: FrameId, action: &FrameAction) {
        let view = self.views.entry(frame).or_default();

        match action {
            FrameAction::ShowWarning { heading, message } => {
                view.warning = Some((heading.clone(), message.clone()));
            },
            FrameAction::ShowLoadButton { label } => view.load_button = Some(label.clone()),
            FrameAction::SetAutoload => view.autoload_attr = Some("true".to_string()),
            FrameAction::InsertLoadingIndicator { message } => {
                view.loading_indicator =
                    Some(LoadingIndicator::Loading { message: message.clone() });
            },
            FrameAction::ShowLoadFailure { message, subtitle } => {
                if view.loading_indicator.is_some() {
                    view.loading_indicator = Some(LoadingIndicator::Failed {
                        message: message.clone(),
                        subtitle: subtitle.clone(),
                    });
                }
            },
            FrameAction::RemoveLoadingIndicator => view.loading_indicator = None,
            FrameAction::RevealFrame => {
                if let Some(element) = view.frame.as_mut() {
                    element.hidden = false;
                }
            },
            FrameAction::ResetInlineHeight => {
                if let Some(element) = view.frame.as_mut() {
                    element.inline_height = InlineHeight::Auto;
                }
            },
            FrameAction::ClearInlineHeight => {
                if let Some(element) = view.frame.as_mut() {
                    element.inline_height = InlineHeight::Unset;
                }
            },
            FrameAction::SetFrameHeight { height } => {
                if let Some(element) = view.frame.as_mut() {
                    element.height_attr = format!("{height}px");
                }
            },
            FrameAction::ScrollIntoView => {
                if let Some(element) = view.frame.as_mut() {
                    element.scroll_count += 1;
                }
            },
            FrameAction::MountFrame(_)
            | FrameAction::ScheduleTimer { .. }
            | FrameAction::CancelTimer { .. }
            | FrameAction::Hook(_) => {},
        }
    }

    fn frame_mut(&mut self, frame: FrameId) -> Option<&mut FrameElement> {
        self.views.get_mut(&frame).and_then(|view| view.frame.as_mut())
    }
}
