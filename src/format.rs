use std::fmt::Write;

use crate::outline::Outline;
use crate::types::{Format, OutlineEntry};

pub fn render(outline: &Outline, format: Format) -> String {
    match format {
        Format::Text => text(outline),
        Format::Json => json(outline),
        Format::Html => html(outline),
    }
}

/// Indented text outline: two spaces per depth, owned data ids in brackets.
pub fn text(outline: &Outline) -> String {
    let mut out = String::new();
    if let Some(title) = outline.title() {
        let _ = writeln!(out, "# {}", title.text);
    }
    for (depth, entry) in outline.iter() {
        let indent = "  ".repeat(depth);
        let _ = write!(out, "{indent}{} (#{})", entry.label, entry.id);
        if !entry.owned_data_ids.is_empty() {
            let owned: Vec<&str> = entry.owned_data_ids.iter().map(String::as_str).collect();
            let _ = write!(out, " [{}]", owned.join(", "));
        }
        out.push('\n');
    }
    out
}

/// Pretty JSON of the title and entry forest. Goes through `Value`'s
/// alternate `Display`, which cannot fail.
pub fn json(outline: &Outline) -> String {
    let value = serde_json::json!({
        "title": outline.title(),
        "entries": outline.roots(),
    });
    format!("{value:#}")
}

/// Title anchor plus `<nav id="TableOfContents">` with nested ordered lists.
/// Each anchor carries a `data-<id>="true"` attribute per owned
/// rendered-data heading so hosts can map those headings back to it.
pub fn html(outline: &Outline) -> String {
    let mut out = String::new();
    if let Some(title) = outline.title() {
        let _ = writeln!(
            out,
            "<a id=\"toc-title\" href=\"#\">{}</a>",
            escape(&title.text)
        );
    }
    out.push_str("<nav id=\"TableOfContents\">\n");
    html_list(&mut out, outline.roots(), 1);
    out.push_str("</nav>\n");
    out
}

fn html_list(out: &mut String, entries: &[OutlineEntry], depth: usize) {
    let indent = "  ".repeat(depth);
    let _ = writeln!(out, "{indent}<ol>");
    for entry in entries {
        let _ = write!(out, "{indent}  <li><a href=\"#{}\"", escape(&entry.id));
        for data_id in &entry.owned_data_ids {
            let _ = write!(out, " data-{}=\"true\"", escape(data_id));
        }
        let _ = write!(out, ">{}</a>", escape(&entry.label));
        if entry.children.is_empty() {
            out.push_str("</li>\n");
        } else {
            out.push('\n');
            html_list(out, &entry.children, depth + 2);
            let _ = writeln!(out, "{indent}  </li>");
        }
    }
    let _ = writeln!(out, "{indent}</ol>");
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
