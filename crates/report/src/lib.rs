//! # bigo-report
//!
//! Turns an [`AnalysisResult`](bigo_core::model::AnalysisResult) into HTML.
//!
//! [`render_report`] produces one fragment per report area, each computed
//! independently so a missing field in one area never blocks the others.
//! [`render_page`] inlines those fragments into the full page template.

pub mod diagram;
pub mod html;
pub mod page;
pub mod render;

pub use diagram::{select_diagram, DiagramEngine, DiagramError, DiagramSource, MermaidEngine};
pub use page::{render_page, Notice, NoticeKind, PageContext};
pub use render::{render_report, RenderedReport};
