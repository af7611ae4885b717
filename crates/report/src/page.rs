//! Full-page rendering.
//!
//! The page is a single template with `{{NAME}}` slots. Slots are filled in
//! one pass over the template, so text inserted into one slot is never
//! scanned for further slots.

use chrono::Utc;

use bigo_core::submission::{CodeStats, CodeType};

use crate::html::escape_html;
use crate::render::RenderedReport;

const TEMPLATE: &str = include_str!("templates/page.html");

/// Outcome message shown above the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    fn css_class(self) -> &'static str {
        match self {
            NoticeKind::Success => "notification-success",
            NoticeKind::Error => "notification-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// Everything the page shows besides the static chrome.
#[derive(Debug, Clone, Default)]
pub struct PageContext<'a> {
    /// Form contents echoed back into the editor.
    pub code: &'a str,
    pub code_type: CodeType,
    pub algorithm_name: &'a str,
    /// `None` keeps the results area hidden.
    pub report: Option<&'a RenderedReport>,
    pub notice: Option<Notice>,
    pub backend_healthy: bool,
}

/// Render the complete HTML page.
pub fn render_page(ctx: &PageContext<'_>) -> String {
    let stats = CodeStats::of(ctx.code);
    let empty = RenderedReport::default();
    let report = ctx.report.unwrap_or(&empty);

    let (status_class, status_label) = if ctx.backend_healthy {
        ("status-online", "Backend conectado")
    } else {
        ("status-offline", "Backend no disponible")
    };

    let notice = ctx
        .notice
        .as_ref()
        .map(|n| {
            format!(
                r#"<div class="notification {}" role="status">{}</div>"#,
                n.kind.css_class(),
                escape_html(&n.message)
            )
        })
        .unwrap_or_default();

    let selected = |code_type: CodeType| {
        if ctx.code_type == code_type {
            " selected"
        } else {
            ""
        }
    };

    let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
    let code = escape_html(ctx.code);
    let algorithm_name = escape_html(ctx.algorithm_name);
    let code_stats = format!(
        "{} líneas | {} caracteres | {} palabras",
        stats.lines, stats.characters, stats.words
    );

    fill_template(TEMPLATE, |slot| match slot {
        "TIMESTAMP" => Some(timestamp.as_str()),
        "VERSION" => Some(env!("CARGO_PKG_VERSION")),
        "STATUS_CLASS" => Some(status_class),
        "STATUS_LABEL" => Some(status_label),
        "NOTICE" => Some(notice.as_str()),
        "CODE" => Some(code.as_str()),
        "CODE_STATS" => Some(code_stats.as_str()),
        "PYTHON_SELECTED" => Some(selected(CodeType::Python)),
        "PSEUDOCODE_SELECTED" => Some(selected(CodeType::Pseudocode)),
        "ALGORITHM_NAME" => Some(algorithm_name.as_str()),
        "RESULTS_CLASS" => Some(if ctx.report.is_some() { "" } else { "hidden" }),
        "COMPLEXITY" => Some(report.complexity.as_str()),
        "LINES" => Some(report.lines.as_str()),
        "RECURRENCE" => Some(report.recurrence.as_str()),
        "VALIDATION" => Some(report.validation.as_str()),
        "PATTERNS" => Some(report.patterns.as_str()),
        "FILES" => Some(report.files.as_str()),
        "DIAGRAM" => Some(report.diagram.as_str()),
        _ => None,
    })
}

/// Replace every `{{NAME}}` for which `lookup` returns a value. Unknown
/// slots are left in place.
fn fill_template<'a>(template: &str, lookup: impl Fn(&str) -> Option<&'a str>) -> String {
    let mut out = String::with_capacity(template.len() * 2);
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let name = &after[..end];
                match lookup(name) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&rest[start..start + 2 + end + 2]),
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
