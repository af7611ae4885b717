//! Diagram selection and rendering.
//!
//! Exactly one diagram is shown per report. [`select_diagram`] walks a fixed
//! priority cascade over the payload and the first source that applies wins:
//!
//! 1. backend-supplied Mermaid source (`mermaid_code`)
//! 2. the first `.svg` path in `files`
//! 3. the first `.png` path in `files`
//! 4. a flowchart synthesized from the complexity notations
//!
//! Text sources go through a [`DiagramEngine`]. An engine failure never
//! fails the report: the raw source is shown inside a marked error block.

use bigo_core::model::{non_empty, AnalysisResult, Notation};

use crate::html::{escape_html, escape_url};

const VECTOR_EXTENSION: &str = ".svg";
const RASTER_EXTENSION: &str = ".png";
const IMAGE_ALT: &str = "AST Diagram";

/// The single diagram chosen for a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagramSource {
    /// Diagram markup supplied by the backend.
    Mermaid(String),
    /// Path of a vector image to embed.
    Svg(String),
    /// Path of a raster image to embed.
    Png(String),
    /// Mermaid flowchart generated from the complexity notations.
    Synthesized(String),
}

impl DiagramSource {
    pub fn kind(&self) -> &'static str {
        match self {
            DiagramSource::Mermaid(_) => "mermaid",
            DiagramSource::Svg(_) => "svg",
            DiagramSource::Png(_) => "png",
            DiagramSource::Synthesized(_) => "synthesized",
        }
    }
}

/// Pick the diagram for `result`. Never fails.
pub fn select_diagram(result: &AnalysisResult) -> DiagramSource {
    if let Some(code) = non_empty(&result.mermaid_code) {
        return DiagramSource::Mermaid(code.to_string());
    }

    let files = result.file_paths();
    let find = |extension: &str| files.iter().find(|f| f.ends_with(extension)).cloned();

    if let Some(svg) = find(VECTOR_EXTENSION) {
        return DiagramSource::Svg(svg);
    }
    if let Some(png) = find(RASTER_EXTENSION) {
        return DiagramSource::Png(png);
    }
    DiagramSource::Synthesized(synthesize_flowchart(result))
}

/// Build the fallback flowchart: a start node, an analysis node fanning out
/// into one branch per present notation, and a shared end node. With no
/// notations only the start/end skeleton remains.
///
/// ```
/// use bigo_core::model::AnalysisResult;
/// use bigo_report::diagram::synthesize_flowchart;
///
/// let chart = synthesize_flowchart(&AnalysisResult::default());
/// assert!(chart.contains("Start --> End"));
/// ```
pub fn synthesize_flowchart(result: &AnalysisResult) -> String {
    let mut lines = vec![
        "flowchart TD".to_string(),
        "    Start([Inicio])".to_string(),
        "    End([Resultado])".to_string(),
    ];

    let branches: Vec<(&str, String)> = result
        .complexity
        .as_ref()
        .map(|complexity| {
            Notation::ALL
                .into_iter()
                .filter_map(|notation| {
                    let value = notation.pick(complexity)?;
                    Some((node_id(notation), node_label(notation, value)))
                })
                .collect()
        })
        .unwrap_or_default();

    if branches.is_empty() {
        lines.push("    Start --> End".to_string());
    } else {
        lines.push("    Start --> Analyze[Análisis]".to_string());
    }
    for (id, label) in &branches {
        lines.push(format!("    Analyze --> {id}[\"{label}\"]"));
        lines.push(format!("    {id} --> End"));
    }

    lines.push(String::new());
    if !branches.is_empty() {
        lines.push(
            "    style Analyze fill:#334155,stroke:#10b981,stroke-width:2px,color:#fff".to_string(),
        );
    }
    for (id, _) in &branches {
        lines.push(format!(
            "    style {id} fill:#10b981,stroke:#059669,stroke-width:2px,color:#000"
        ));
    }
    for id in ["Start", "End"] {
        lines.push(format!(
            "    style {id} fill:#1e293b,stroke:#10b981,stroke-width:2px,color:#10b981"
        ));
    }

    lines.join("\n")
}

fn node_id(notation: Notation) -> &'static str {
    match notation {
        Notation::BigO => "BigO",
        Notation::Omega => "Omega",
        Notation::Theta => "Theta",
    }
}

fn node_label(notation: Notation, value: &str) -> String {
    let cleaned: String = value
        .chars()
        .filter(|&c| !matches!(c, '(' | ')' | 'Ω' | 'Θ'))
        .collect();
    // Mermaid's entity form keeps a stray quote from ending the label.
    format!("{}: {}", notation.label(), cleaned.replace('"', "#quot;"))
}

// ---------------------------------------------------------------------------
// Engine seam
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DiagramError {
    #[error("Diagram source is empty")]
    Empty,

    #[error("Unknown diagram type: {0}")]
    UnknownType(String),
}

/// Turns diagram source text into displayable HTML.
pub trait DiagramEngine: Send + Sync {
    fn render(&self, source: &str) -> Result<String, DiagramError>;
}

/// Hands Mermaid source to the browser-side Mermaid engine.
///
/// The source is emitted as the escaped text of a `<pre class="mermaid">`
/// element, which the page script renders after load. Sources whose header
/// does not name a Mermaid diagram type are rejected up front.
#[derive(Debug, Clone, Copy, Default)]
pub struct MermaidEngine;

const MERMAID_TYPES: &[&str] = &[
    "flowchart",
    "graph",
    "sequenceDiagram",
    "classDiagram",
    "classDiagram-v2",
    "stateDiagram",
    "stateDiagram-v2",
    "erDiagram",
    "journey",
    "gantt",
    "pie",
    "quadrantChart",
    "requirementDiagram",
    "gitGraph",
    "mindmap",
    "timeline",
    "sankey-beta",
    "xychart-beta",
    "block-beta",
    "C4Context",
    "C4Container",
    "C4Component",
    "C4Dynamic",
    "C4Deployment",
];

impl MermaidEngine {
    /// The first token of the first line that is not blank, a `%%` comment
    /// or directive, or part of a `---` front-matter block.
    fn header(source: &str) -> Option<&str> {
        let mut in_front_matter = false;

        for (index, line) in source.lines().map(str::trim).enumerate() {
            if line == "---" && (index == 0 || in_front_matter) {
                in_front_matter = !in_front_matter;
                continue;
            }
            if in_front_matter || line.is_empty() || line.starts_with("%%") {
                continue;
            }
            return line.split_whitespace().next().map(|t| t.trim_end_matches(';'));
        }
        None
    }
}

impl DiagramEngine for MermaidEngine {
    fn render(&self, source: &str) -> Result<String, DiagramError> {
        let header = Self::header(source).ok_or(DiagramError::Empty)?;
        if !MERMAID_TYPES.contains(&header) {
            return Err(DiagramError::UnknownType(header.to_string()));
        }
        Ok(format!(r#"<pre class="mermaid">{}</pre>"#, escape_html(source)))
    }
}

// ---------------------------------------------------------------------------
// Fragment
// ---------------------------------------------------------------------------

/// Render the selected diagram to HTML, downgrading engine failures to the
/// inspectable error block.
pub fn render_diagram(source: &DiagramSource, engine: &dyn DiagramEngine) -> String {
    match source {
        DiagramSource::Mermaid(code) | DiagramSource::Synthesized(code) => {
            match engine.render(code) {
                Ok(html) => format!(r#"<div class="mermaid-diagram">{html}</div>"#),
                Err(e) => {
                    tracing::warn!(
                        source_kind = source.kind(),
                        error = %e,
                        "Diagram engine rejected source; showing raw text",
                    );
                    error_block(code)
                }
            }
        }
        DiagramSource::Svg(path) | DiagramSource::Png(path) => format!(
            r#"<img src="{}" alt="{IMAGE_ALT}" class="diagram-image">"#,
            escape_url(path)
        ),
    }
}

/// Visibly marked failure block with the raw source available for
/// inspection. The page script reuses the same markup when the browser
/// engine fails at draw time.
pub fn error_block(source: &str) -> String {
    format!(
        concat!(
            r#"<div class="diagram-error">"#,
            r#"<div class="diagram-error-title">⚠ Error al renderizar diagrama Mermaid</div>"#,
            r#"<details><summary>Ver código Mermaid</summary><pre>{}</pre></details>"#,
            r#"</div>"#,
        ),
        escape_html(source)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use bigo_core::model::Complexity;

    fn with_files(files: &[&str]) -> AnalysisResult {
        AnalysisResult {
            files: Some(files.iter().map(|f| f.to_string()).collect()),
            ..Default::default()
        }
    }

    struct FailingEngine;

    impl DiagramEngine for FailingEngine {
        fn render(&self, _source: &str) -> Result<String, DiagramError> {
            Err(DiagramError::UnknownType("boom".into()))
        }
    }

    // -- selection cascade ----------------------------------------------------

    #[test]
    fn mermaid_code_beats_svg() {
        let mut result = with_files(&["out/ast.svg"]);
        result.mermaid_code = Some("graph TD\n A-->B".into());

        assert_matches!(select_diagram(&result), DiagramSource::Mermaid(code) if code.starts_with("graph"));
    }

    #[test]
    fn empty_mermaid_code_is_skipped() {
        let mut result = with_files(&["out/ast.svg"]);
        result.mermaid_code = Some(String::new());

        assert_eq!(select_diagram(&result), DiagramSource::Svg("out/ast.svg".into()));
    }

    #[test]
    fn svg_beats_png_regardless_of_order() {
        let result = with_files(&["out/ast.png", "out/report.json", "out/ast.svg"]);
        assert_eq!(select_diagram(&result), DiagramSource::Svg("out/ast.svg".into()));
    }

    #[test]
    fn png_used_without_svg() {
        let result = with_files(&["out/tree.dot", "out/tree.png"]);
        assert_eq!(select_diagram(&result), DiagramSource::Png("out/tree.png".into()));
    }

    #[test]
    fn falls_back_to_synthesized_chart() {
        let result = with_files(&["out/tree.dot"]);
        assert_matches!(select_diagram(&result), DiagramSource::Synthesized(_));
    }

    // -- synthesized flowchart ------------------------------------------------

    #[test]
    fn skeleton_without_complexity() {
        let chart = synthesize_flowchart(&AnalysisResult::default());
        assert!(chart.starts_with("flowchart TD"));
        assert!(chart.contains("Start([Inicio])"));
        assert!(chart.contains("End([Resultado])"));
        assert!(chart.contains("Start --> End"));
        assert!(!chart.contains("BigO"));
        assert!(!chart.contains("Analyze"));
    }

    #[test]
    fn one_branch_per_present_notation() {
        let result = AnalysisResult {
            complexity: Some(Complexity {
                big_o: Some("O(n log n)".into()),
                theta: Some("Θ(n)".into()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let chart = synthesize_flowchart(&result);
        assert!(chart.contains("Start --> Analyze[Análisis]"));
        assert!(chart.contains(r#"Analyze --> BigO["Big-O: On log n"]"#));
        assert!(chart.contains(r#"Analyze --> Theta["Theta: n"]"#));
        assert!(chart.contains("Theta --> End"));
        assert!(!chart.contains("Omega"));
        assert!(!chart.contains("Start --> End"));
    }

    #[test]
    fn quotes_in_labels_are_entity_encoded() {
        let result = AnalysisResult {
            complexity: Some(Complexity {
                big_o: Some(r#"O("n")"#.into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(synthesize_flowchart(&result).contains(r#"BigO["Big-O: O#quot;n#quot;"]"#));
    }

    // -- engine ---------------------------------------------------------------

    #[test]
    fn mermaid_engine_accepts_known_headers() {
        for source in [
            "flowchart TD\n A-->B",
            "graph LR;\n A-->B",
            "%% generated\n\nsequenceDiagram\n A->>B: hi",
            "---\ntitle: AST\n---\nflowchart TD\n A-->B",
        ] {
            let html = MermaidEngine.render(source).unwrap();
            assert!(html.starts_with(r#"<pre class="mermaid">"#), "{source}");
        }
    }

    #[test]
    fn mermaid_engine_rejects_unknown_or_empty_source() {
        assert_eq!(
            MermaidEngine.render("digraph G { a -> b }"),
            Err(DiagramError::UnknownType("digraph".into()))
        );
        assert_eq!(MermaidEngine.render("  \n %% only a comment"), Err(DiagramError::Empty));
    }

    #[test]
    fn mermaid_engine_escapes_source() {
        let html = MermaidEngine
            .render("flowchart TD\n A[\"<img src=x onerror=alert(1)>\"]")
            .unwrap();
        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;img"));
    }

    // -- fragment -------------------------------------------------------------

    #[test]
    fn engine_failure_falls_back_to_source_block() {
        let source = DiagramSource::Mermaid("flowchart TD\n A-->B<script>".into());
        let html = render_diagram(&source, &FailingEngine);

        assert!(html.contains("diagram-error"));
        assert!(html.contains("<details>"));
        assert!(html.contains("A--&gt;B&lt;script&gt;"));
    }

    #[test]
    fn images_are_embedded_by_path() {
        let html = render_diagram(&DiagramSource::Png("out/a b.png".into()), &MermaidEngine);
        assert_eq!(
            html,
            r#"<img src="out/a b.png" alt="AST Diagram" class="diagram-image">"#
        );
    }

    #[test]
    fn synthesized_chart_renders_through_engine() {
        let source = select_diagram(&AnalysisResult::default());
        let html = render_diagram(&source, &MermaidEngine);
        assert!(html.contains(r#"<pre class="mermaid">flowchart TD"#));
    }
}
