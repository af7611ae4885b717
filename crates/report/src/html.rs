//! Escaping helpers shared by every fragment builder.

/// Escape text for insertion into HTML element content or a quoted attribute.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a URL for an `href`/`src` attribute.
///
/// Script-capable schemes are replaced with `#`; everything else is passed
/// through as a relative or absolute URL.
pub fn escape_url(url: &str) -> String {
    let scheme = url.trim_start().to_ascii_lowercase();
    if ["javascript:", "vbscript:", "data:"]
        .iter()
        .any(|blocked| scheme.starts_with(blocked))
    {
        return "#".to_string();
    }
    escape_html(url)
}
