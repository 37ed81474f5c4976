//! Per-block settings edited in the studio and rendered into the student
//! view.

use lessonframe_core::config::{EMBED_TAG, attr};
use serde::{Deserialize, Serialize};

/// Display name of a freshly created block.
pub const DEFAULT_DISPLAY_NAME: &str = "Open Classroom lesson";

/// Lesson embedded by a freshly created block.
pub const DEFAULT_LESSON_ID: &str = "2DB88aOgiXgD";

/// Lesson site of a freshly created block.
pub const DEFAULT_SRC: &str = "https://lessons.openclassroom.edu.vn";

/// Handler receiving studio form submissions.
pub const STUDIO_SUBMIT_PATH: &str = "/handler/studio_submit";

/// Settings of one embedded lesson block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockSettings {
    /// Title shown by the course runtime.
    pub display_name: String,
    /// Lesson to embed.
    pub lesson_id: String,
    /// Origin of the lesson site.
    pub src: String,
}

impl Default for BlockSettings {
    fn default() -> Self {
        Self {
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
            lesson_id: DEFAULT_LESSON_ID.to_string(),
            src: DEFAULT_SRC.to_string(),
        }
    }
}

/// Body of a studio form submission.
///
/// Absent fields leave the current value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StudioSubmit {
    /// New lesson id.
    #[serde(default)]
    pub openclassroomid: Option<String>,
    /// New lesson site.
    #[serde(default)]
    pub src: Option<String>,
    /// New display name.
    #[serde(default)]
    pub display_name: Option<String>,
}

impl BlockSettings {
    /// Apply a studio submission.
    pub fn apply(&mut self, submit: StudioSubmit) {
        if let Some(lesson_id) = submit.openclassroomid {
            self.lesson_id = lesson_id;
        }
        if let Some(src) = submit.src {
            self.src = src;
        }
        if let Some(display_name) = submit.display_name {
            self.display_name = display_name;
        }
    }

    /// HTML fragment holding the embed placeholder for these settings.
    ///
    /// The page script discovers the placeholder and replaces its contents
    /// with the lesson frame.
    pub fn render_student_view(&self) -> String {
        format!(
            concat!(
                "<div class=\"openclassroom-block\">\n",
                "<{tag}\n",
                "  {id_attr}=\"{id}\"\n",
                "  {src_attr}=\"{src}\">\n",
                "</{tag}>\n",
                "</div>",
            ),
            tag = EMBED_TAG,
            id_attr = attr::LESSON_ID,
            id = escape_html(&self.lesson_id),
            src_attr = attr::SRC,
            src = escape_html(&self.src),
        )
    }

    /// Edit form posting a `StudioSubmit` to `/handler/studio_submit`.
    ///
    /// Field names match the `StudioSubmit` keys.
    pub fn render_studio_view(&self) -> String {
        let field = |name: &str, label: &str, value: &str| {
            format!(
                concat!(
                    r#"<li class="field"><label for="{name}">{label}</label>"#,
                    r#"<input type="text" id="{name}" name="{name}" value="{value}"></li>"#,
                ),
                name = name,
                label = label,
                value = escape_html(value),
            )
        };
        format!(
            concat!(
                r#"<form class="openclassroom-editor" method="post" action="{action}">"#,
                "<ul>{display_name}{lesson_id}{src}</ul>",
                r#"<button type="submit">Save</button></form>"#,
            ),
            action = STUDIO_SUBMIT_PATH,
            display_name = field("display_name", "Display name", &self.display_name),
            lesson_id = field("openclassroomid", "Lesson ID", &self.lesson_id),
            src = field("src", "Lesson site", &self.src),
        )
    }

    /// Studio preview: names the lesson instead of embedding it.
    pub fn render_author_view(&self) -> String {
        format!(
            concat!(
                "<div class=\"openclassroom-preview\">\n",
                "<p>Lesson <strong>{id}</strong></p>\n",
                "<p>From <code>{src}</code></p>\n",
                "</div>",
            ),
            id = escape_html(&self.lesson_id),
            src = escape_html(&self.src),
        )
    }
}

/// Escape text for use inside a double-quoted attribute.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
