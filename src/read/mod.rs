pub mod markdown;

use std::fs;
use std::path::Path;

use memmap2::Mmap;

use crate::error::TocError;
use crate::types::Page;

/// How a page file describes its headings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Markdown,
    Json,
}

/// Main entry point: read a page file and collect its headings.
pub fn read_page(path: &Path) -> Result<Page, TocError> {
    let meta = fs::metadata(path).map_err(|e| TocError::io(path, e))?;
    let source = detect_source(path);

    // Empty check before mmap: mmap on 0-byte file may fail on some platforms
    if meta.len() == 0 {
        log::debug!("{}: empty page", path.display());
        return match source {
            Source::Markdown => Ok(Page::default()),
            Source::Json => collect_json(b""),
        };
    }

    let file = fs::File::open(path).map_err(|e| TocError::io(path, e))?;
    let mmap = unsafe { Mmap::map(&file) }.map_err(|e| TocError::io(path, e))?;
    let buf = &mmap[..];

    let page = match source {
        Source::Markdown => markdown::collect(buf),
        Source::Json => collect_json(buf)?,
    };
    log::debug!(
        "{}: {} headings, {} reserved ids",
        path.display(),
        page.headings.len(),
        page.reserved_ids.len()
    );
    Ok(page)
}

/// Decode a JSON page description.
pub fn collect_json(buf: &[u8]) -> Result<Page, TocError> {
    Ok(serde_json::from_slice(buf)?)
}

/// Detect page source by extension. Anything unrecognised is read as markdown.
pub fn detect_source(path: &Path) -> Source {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Source::Json,
        _ => Source::Markdown,
    }
}
