//! Per-area HTML fragments of the analysis report.

use serde::Serialize;

use bigo_core::model::AnalysisResult;
use bigo_core::view::{
    ComparisonRow, ComplexityView, FileView, LineRow, PatternView, RecurrenceView, ReportView,
    ValidationView,
};

use crate::diagram::{render_diagram, select_diagram, DiagramEngine};
use crate::html::{escape_html, escape_url};

pub const NO_LINES: &str = "No hay datos de análisis línea por línea";
pub const NO_RECURRENCE: &str = "No se detectó ecuación de recurrencia";
pub const NO_VALIDATION: &str = "No hay datos de validación disponibles";
pub const NO_PATTERNS: &str = "No se detectaron patrones algorítmicos específicos";
pub const NO_FILES: &str = "No se generaron archivos adicionales";

/// HTML for every report area.
///
/// `complexity` is empty when the payload had no complexity object; every
/// other area always carries either content or its placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderedReport {
    pub complexity: String,
    pub lines: String,
    pub recurrence: String,
    pub validation: String,
    pub patterns: String,
    pub files: String,
    pub diagram: String,
}

/// Render all areas of `result`.
pub fn render_report(result: &AnalysisResult, engine: &dyn DiagramEngine) -> RenderedReport {
    let view = ReportView::from_result(result);
    let diagram = select_diagram(result);
    tracing::debug!(
        lines = view.lines.len(),
        patterns = view.patterns.len(),
        files = view.files.len(),
        diagram = diagram.kind(),
        "Rendering analysis report",
    );

    RenderedReport {
        complexity: view
            .complexity
            .as_ref()
            .map(render_complexity)
            .unwrap_or_default(),
        lines: render_lines(&view.lines),
        recurrence: view
            .recurrence
            .as_ref()
            .map_or_else(|| placeholder(NO_RECURRENCE), render_recurrence),
        validation: view
            .validation
            .as_ref()
            .map_or_else(|| placeholder(NO_VALIDATION), render_validation),
        patterns: render_patterns(&view.patterns),
        files: render_files(&view.files),
        diagram: render_diagram(&diagram, engine),
    }
}

fn placeholder(message: &str) -> String {
    format!(r#"<div class="placeholder">{message}</div>"#)
}

// ---------------------------------------------------------------------------
// Complexity summary
// ---------------------------------------------------------------------------

fn render_complexity(view: &ComplexityView) -> String {
    let cards = [
        ("big-o", "Big-O", "Peor caso", &view.big_o),
        ("omega", "Omega", "Mejor caso", &view.omega),
        ("theta", "Theta", "Caso promedio", &view.theta),
    ];

    let mut html = String::from(r#"<div class="complexity-grid">"#);
    for (id, title, caption, value) in cards {
        html.push_str(&format!(
            r#"<div class="complexity-card"><span class="title">{title}</span><span class="value" id="{id}">{}</span><span class="caption">{caption}</span></div>"#,
            escape_html(value)
        ));
    }
    html.push_str("</div>");

    if let Some(explanation) = &view.explanation {
        html.push_str(&format!(
            r#"<p class="explanation" id="explanation">{}</p>"#,
            escape_html(explanation)
        ));
    }
    html
}

// ---------------------------------------------------------------------------
// Line-by-line table
// ---------------------------------------------------------------------------

fn render_lines(rows: &[LineRow]) -> String {
    if rows.is_empty() {
        return placeholder(NO_LINES);
    }

    let mut html = String::from(concat!(
        r#"<table class="line-analysis-table"><thead><tr>"#,
        "<th>Línea</th><th>Código</th><th>Tipo</th><th>Ejecuciones</th><th>Costo Temporal</th>",
        "</tr></thead><tbody>",
    ));
    for row in rows {
        let code = escape_html(&row.code);
        html.push_str(&format!(
            r#"<tr><td class="line-number">{line}</td><td class="line-code" title="{code}">{code}</td><td>{kind}</td><td class="line-executions">{exec}</td><td class="line-cost">{cost}</td></tr>"#,
            line = row.line,
            kind = escape_html(&row.kind),
            exec = escape_html(&row.exec_count),
            cost = escape_html(&row.time_cost),
        ));
    }
    html.push_str("</tbody></table>");
    html
}

// ---------------------------------------------------------------------------
// Recurrence
// ---------------------------------------------------------------------------

fn render_recurrence(view: &RecurrenceView) -> String {
    let section = |title: &str, body: String| {
        format!(
            r#"<div class="recurrence-section"><div class="recurrence-title">{title}</div><div class="recurrence-equation">{body}</div></div>"#
        )
    };

    let mut html = section(
        "Ecuación de Recurrencia Completa:",
        format!("T(n) = {}", escape_html(&view.full_equation)),
    );
    html.push_str(&section(
        "Ecuación de Recurrencia Simplificada:",
        escape_html(&view.simplified),
    ));

    if !view.constants.is_empty() {
        let items: String = view
            .constants
            .iter()
            .map(|c| {
                format!(
                    r#"<div class="constant-item"><span class="constant-label">{}:</span> <span class="constant-value">{}</span></div>"#,
                    escape_html(&c.name),
                    escape_html(&c.value)
                )
            })
            .collect();
        html.push_str(&format!(
            r#"<div class="recurrence-section"><div class="recurrence-title">Constantes:</div><div class="recurrence-constants">{items}</div></div>"#
        ));
    }
    html
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn render_validation(view: &ValidationView) -> String {
    let mut html = format!(
        concat!(
            r#"<div class="validation-score">"#,
            r#"<div class="score-value">{score}<span class="score-suffix">/100</span></div>"#,
            r#"<div class="score-label">Puntuación de Validación</div>"#,
            r#"<div class="rigor">Rigor Matemático: <span class="rigor-value" style="color: {color}">{rigor}</span></div>"#,
            "</div>",
        ),
        score = view.score_label(),
        color = view.rigor.color(),
        rigor = escape_html(view.rigor.as_str()),
    );

    html.push_str(concat!(
        r#"<div class="comparison"><h4>Comparación y análisis de discrepancias</h4>"#,
        r#"<table class="comparison-table"><thead><tr>"#,
        "<th>Notación</th><th>Automático</th><th>Externo</th><th>¿Coincide?</th>",
        "</tr></thead><tbody>",
    ));
    for row in &view.comparisons {
        html.push_str(&comparison_row(row));
    }
    html.push_str("</tbody></table></div>");

    let lists = [
        ("critical-errors", "error-item", "⚠ Errores críticos", &view.critical_errors),
        ("warnings", "warning-item", "⚡ Advertencias", &view.warnings),
        ("corrections", "correction-item", "✓ Correcciones sugeridas", &view.corrections),
    ];
    for (class, item_class, title, items) in lists {
        if items.is_empty() {
            continue;
        }
        html.push_str(&format!(r#"<div class="errors-list {class}"><h4>{title}</h4>"#));
        for item in items {
            html.push_str(&format!(
                r#"<div class="{item_class}">{}</div>"#,
                escape_html(item)
            ));
        }
        html.push_str("</div>");
    }
    html
}

fn comparison_row(row: &ComparisonRow) -> String {
    format!(
        r#"<tr><td class="notation">{}</td><td>{}</td><td>{}</td><td class="match-icon {}">{}</td></tr>"#,
        row.notation,
        escape_html(&row.automatic),
        escape_html(&row.external),
        row.verdict.css_class(),
        row.verdict.icon(),
    )
}

// ---------------------------------------------------------------------------
// Patterns and files
// ---------------------------------------------------------------------------

fn render_patterns(patterns: &[PatternView]) -> String {
    if patterns.is_empty() {
        return placeholder(NO_PATTERNS);
    }

    patterns
        .iter()
        .map(|pattern| {
            let description = pattern
                .description
                .as_deref()
                .map(|d| format!(r#"<div class="pattern-description">{}</div>"#, escape_html(d)))
                .unwrap_or_default();
            format!(
                r#"<div class="pattern-badge"><div class="pattern-name">{}</div>{description}<div class="pattern-confidence"><span>Confianza:</span> <span class="confidence-value">{}</span></div></div>"#,
                escape_html(&pattern.name),
                escape_html(&pattern.confidence),
            )
        })
        .collect()
}

fn render_files(files: &[FileView]) -> String {
    if files.is_empty() {
        return placeholder(NO_FILES);
    }

    let items: String = files
        .iter()
        .map(|file| {
            format!(
                r#"<div class="file-item"><span class="file-ext">[{}]</span> <span class="file-name">{}</span> <a href="{}" target="_blank" rel="noopener">Abrir</a></div>"#,
                escape_html(&file.extension),
                escape_html(&file.name),
                escape_url(&file.path),
            )
        })
        .collect();
    format!(r#"<div class="file-grid">{items}</div>"#)
}
