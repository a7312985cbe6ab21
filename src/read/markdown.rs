use crate::types::{HeadingDescriptor, Page, PageTitle};

/// Collect headings from markdown via memchr line scan, no markdown parser
/// needed. Fenced code blocks are skipped.
///
/// The first `#` heading is the page title; later `#` headings title appended
/// data blocks and become rendered-data headings. `##` through `######` are
/// normal headings. A trailing `{#id}` overrides the slugged id.
pub fn collect(buf: &[u8]) -> Page {
    let mut page = Page::default();
    let mut pos = 0;
    let mut in_code_block = false;

    while pos < buf.len() {
        let line_end = memchr::memchr(b'\n', &buf[pos..]).map_or(buf.len(), |i| pos + i);
        let line = trim_cr(&buf[pos..line_end]);
        pos = line_end + 1;

        if line.starts_with(b"```") || line.starts_with(b"~~~") {
            in_code_block = !in_code_block;
            continue;
        }
        if in_code_block || line.first() != Some(&b'#') {
            continue;
        }

        let level = line.iter().take_while(|&&b| b == b'#').count();
        if level > 6 {
            continue;
        }
        // `#tag` is not a heading
        match line.get(level) {
            None | Some(&(b' ' | b'\t')) => {}
            Some(_) => continue,
        }
        let Ok(text) = std::str::from_utf8(&line[level..]) else {
            continue;
        };
        let (text, explicit_id) = split_anchor(text.trim());
        let text = strip_closing_hashes(text);
        let id = explicit_id.map_or_else(|| slug(text), str::to_string);

        // level <= 6 checked above
        let level = level as u8;
        if level == 1 {
            if page.title.is_none() {
                page.title = Some(PageTitle {
                    id,
                    text: text.to_string(),
                });
            } else {
                page.headings.push(HeadingDescriptor::rendered_data(id, level, text));
            }
        } else {
            page.headings.push(HeadingDescriptor::normal(id, level, text));
        }
    }

    page
}

/// Drop an optional closing `#` run. It only counts when it is the whole
/// text or follows whitespace, so `C#` keeps its hash.
fn strip_closing_hashes(text: &str) -> &str {
    let body = text.trim_end_matches('#');
    if body.len() == text.len() {
        return text;
    }
    if body.is_empty() || body.ends_with([' ', '\t']) {
        body.trim_end()
    } else {
        text
    }
}

fn trim_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Split `Text {#anchor}` into `("Text", Some("anchor"))`.
fn split_anchor(text: &str) -> (&str, Option<&str>) {
    let Some(body) = text.strip_suffix('}') else {
        return (text, None);
    };
    match body.rfind("{#") {
        Some(i) => {
            let anchor = body[i + 2..].trim();
            (body[..i].trim_end(), Some(anchor))
        }
        None => (text, None),
    }
}

/// Lowercase ASCII alphanumerics, keep `-` and `_`, whitespace runs become a
/// single `-`, everything else is dropped.
pub fn slug(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() {
            pending_dash = true;
        }
    }
    out
}
