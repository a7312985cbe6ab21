//! Outline construction: turns a flat, document-ordered heading list into a
//! nested tree of entries.
//!
//! Ids are made unique first (against the page's reserved ids and each other),
//! then a single scan with an explicit stack of open sections builds the
//! forest. Rendered-data titles never open or close sections; they are
//! attached to the most recent normal entry instead.

pub mod uniquify;

use std::collections::{HashMap, HashSet};

use crate::types::{HeadingDescriptor, HeadingKind, OutlineEntry, Page, PageTitle};

pub use uniquify::uniquify;

/// A built outline plus the lookups the resolver needs.
#[derive(Debug, Clone, Default)]
pub struct Outline {
    title: Option<PageTitle>,
    roots: Vec<OutlineEntry>,
    /// entry id -> child-index path from the roots
    paths: HashMap<String, Vec<usize>>,
    /// rendered-data id -> owning entry id
    owners: HashMap<String, String>,
    /// heading id -> document position, for every heading kept
    positions: HashMap<String, usize>,
}

/// Build an outline for a page without a title.
pub fn build(headings: Vec<HeadingDescriptor>, reserved: &[String]) -> Outline {
    build_with_title(None, headings, reserved)
}

/// Build an outline from a collected page.
pub fn build_page(page: Page) -> Outline {
    build_with_title(page.title, page.headings, &page.reserved_ids)
}

pub fn build_with_title(
    title: Option<PageTitle>,
    headings: Vec<HeadingDescriptor>,
    reserved: &[String],
) -> Outline {
    let mut used: HashSet<String> = reserved.iter().cloned().collect();

    let title = title.map(|mut t| {
        t.id = uniquify(&t.id, &used);
        used.insert(t.id.clone());
        t
    });

    let before = headings.len();
    let mut headings: Vec<HeadingDescriptor> =
        headings.into_iter().filter(|h| !h.id.is_empty()).collect();
    if headings.len() < before {
        log::debug!("dropped {} headings without ids", before - headings.len());
    }

    for heading in &mut headings {
        let id = uniquify(&heading.id, &used);
        if id != heading.id {
            log::debug!("heading id {:?} renamed to {id:?}", heading.id);
        }
        used.insert(id.clone());
        heading.id = id;
    }

    let positions = headings
        .iter()
        .enumerate()
        .map(|(i, h)| (h.id.clone(), i))
        .collect();

    let roots = build_tree(headings);

    let mut outline = Outline {
        title,
        roots,
        paths: HashMap::new(),
        owners: HashMap::new(),
        positions,
    };
    outline.index();
    outline
}

/// Stack-based scan. A popped section is complete and gets appended to the
/// section below it, so siblings land in document order.
fn build_tree(headings: Vec<HeadingDescriptor>) -> Vec<OutlineEntry> {
    let mut roots = Vec::new();
    let mut open: Vec<(u8, OutlineEntry)> = Vec::new();

    for heading in headings {
        match heading.kind {
            HeadingKind::RenderedDataTitle => {
                // The most recently opened entry is always on top of the stack.
                match open.last_mut() {
                    Some((_, entry)) => {
                        entry.owned_data_ids.insert(heading.id);
                    }
                    None => log::debug!("rendered-data heading {:?} has no owner", heading.id),
                }
            }
            HeadingKind::Normal => {
                while open.last().is_some_and(|(level, _)| *level >= heading.level) {
                    close(&mut open, &mut roots);
                }
                let entry = OutlineEntry::new(heading.id, heading.text, heading.level);
                open.push((heading.level, entry));
            }
        }
    }

    while !open.is_empty() {
        close(&mut open, &mut roots);
    }
    roots
}

fn close(open: &mut Vec<(u8, OutlineEntry)>, roots: &mut Vec<OutlineEntry>) {
    let Some((_, entry)) = open.pop() else {
        return;
    };
    match open.last_mut() {
        Some((_, parent)) => parent.children.push(entry),
        None => roots.push(entry),
    }
}

impl Outline {
    fn index(&mut self) {
        let mut paths = HashMap::new();
        let mut owners = HashMap::new();
        let mut stack: Vec<(Vec<usize>, &OutlineEntry)> = self
            .roots
            .iter()
            .enumerate()
            .rev()
            .map(|(i, e)| (vec![i], e))
            .collect();

        while let Some((path, entry)) = stack.pop() {
            for data_id in &entry.owned_data_ids {
                owners.insert(data_id.clone(), entry.id.clone());
            }
            for (i, child) in entry.children.iter().enumerate().rev() {
                let mut child_path = path.clone();
                child_path.push(i);
                stack.push((child_path, child));
            }
            paths.insert(entry.id.clone(), path);
        }

        self.paths = paths;
        self.owners = owners;
    }

    pub fn title(&self) -> Option<&PageTitle> {
        self.title.as_ref()
    }

    pub fn roots(&self) -> &[OutlineEntry] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Entry whose own id is `id`.
    pub fn entry(&self, id: &str) -> Option<&OutlineEntry> {
        let path = self.paths.get(id)?;
        let (first, rest) = path.split_first()?;
        let mut entry = self.roots.get(*first)?;
        for &i in rest {
            entry = entry.children.get(i)?;
        }
        Some(entry)
    }

    /// Entry a heading id belongs to: the entry itself, or the entry owning
    /// the rendered-data heading with that id.
    pub fn entry_for(&self, heading_id: &str) -> Option<&OutlineEntry> {
        self.entry(heading_id).or_else(|| {
            let owner = self.owners.get(heading_id)?;
            self.entry(owner)
        })
    }

    /// Document position of a kept heading (normal or rendered-data).
    pub fn position(&self, heading_id: &str) -> Option<usize> {
        self.positions.get(heading_id).copied()
    }

    pub fn is_title(&self, heading_id: &str) -> bool {
        self.title.as_ref().is_some_and(|t| t.id == heading_id)
    }

    /// Pre-order traversal yielding `(depth, entry)`, roots at depth 0.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            stack: self.roots.iter().rev().map(|e| (0, e)).collect(),
        }
    }
}

pub struct Iter<'a> {
    stack: Vec<(usize, &'a OutlineEntry)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (usize, &'a OutlineEntry);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, entry) = self.stack.pop()?;
        self.stack.extend(entry.children.iter().rev().map(|c| (depth + 1, c)));
        Some((depth, entry))
    }
}
