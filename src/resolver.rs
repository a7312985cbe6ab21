//! Active-entry resolution: decides which single outline entry is
//! highlighted from the URL fragment, viewport visibility and clicks.
//!
//! All three event sources feed one ordered request type into
//! [`Resolver::resolve_cycle`]. Within a cycle the precedence is fixed:
//! a click beats everything, a visible fragment target beats visibility data,
//! the page title entering view beats ordinary headings entering view.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::outline::Outline;
use crate::types::Mode;

/// One heading starting or stopping to intersect the viewport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityChange {
    pub heading_id: String,
    pub started: bool,
}

impl VisibilityChange {
    pub fn entered(id: impl Into<String>) -> Self {
        Self {
            heading_id: id.into(),
            started: true,
        }
    }

    pub fn left(id: impl Into<String>) -> Self {
        Self {
            heading_id: id.into(),
            started: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ResolutionRequest {
    HashChanged {
        #[serde(default)]
        fragment: String,
    },
    #[serde(rename = "visibility")]
    VisibilityBatch {
        changes: Vec<VisibilityChange>,
        /// Whether the page itself is scrolled to its very top.
        #[serde(default, rename = "pageAtTop")]
        page_at_top: bool,
    },
    Clicked {
        #[serde(rename = "entryId")]
        entry_id: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveSelection {
    pub entry_id: Option<String>,
    pub mode: Mode,
}

/// What the host should do with its highlight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionChange {
    pub previous: Option<String>,
    pub entry_id: String,
    pub mode: Mode,
    /// Reset the outline's scroll to its top instead of scrolling the entry
    /// into view.
    pub reset_scroll: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Unchanged,
    Selected(SelectionChange),
    /// The page title came into view: scroll the navigation back to its top.
    NavScrollReset,
}

/// Host-side callbacks for resolution results.
pub trait SelectionSink {
    fn on_selection_changed(&mut self, change: &SelectionChange);

    fn on_nav_scroll_reset(&mut self) {}
}

impl Resolution {
    pub fn notify(&self, sink: &mut impl SelectionSink) {
        match self {
            Self::Unchanged => {}
            Self::Selected(change) => sink.on_selection_changed(change),
            Self::NavScrollReset => sink.on_nav_scroll_reset(),
        }
    }
}

/// Selection state for one page view. Create a new one per built outline.
pub struct Resolver<'a> {
    outline: &'a Outline,
    fragment: String,
    visible: HashSet<String>,
    page_at_top: bool,
    selection: ActiveSelection,
}

impl<'a> Resolver<'a> {
    pub fn new(outline: &'a Outline) -> Self {
        Self {
            outline,
            fragment: String::new(),
            visible: HashSet::new(),
            page_at_top: true,
            selection: ActiveSelection::default(),
        }
    }

    pub fn selection(&self) -> &ActiveSelection {
        &self.selection
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    pub fn is_visible(&self, heading_id: &str) -> bool {
        self.visible.contains(heading_id)
    }

    /// Resolve a single request as its own cycle.
    pub fn resolve(&mut self, request: ResolutionRequest) -> Resolution {
        self.resolve_cycle([request])
    }

    /// Resolve a request and forward the result to `sink`.
    pub fn dispatch(
        &mut self,
        request: ResolutionRequest,
        sink: &mut impl SelectionSink,
    ) -> Resolution {
        let resolution = self.resolve(request);
        resolution.notify(sink);
        resolution
    }

    /// Apply every request of one cycle, then pick at most one selection.
    pub fn resolve_cycle<I>(&mut self, requests: I) -> Resolution
    where
        I: IntoIterator<Item = ResolutionRequest>,
    {
        let mut entered: Vec<String> = Vec::new();
        let mut clicked: Option<String> = None;

        for request in requests {
            match request {
                ResolutionRequest::HashChanged { fragment } => {
                    self.fragment = fragment.strip_prefix('#').unwrap_or(&fragment).to_string();
                }
                ResolutionRequest::VisibilityBatch {
                    changes,
                    page_at_top,
                } => {
                    self.page_at_top = page_at_top;
                    for change in changes {
                        if change.started {
                            self.visible.insert(change.heading_id.clone());
                            entered.push(change.heading_id);
                        } else {
                            self.visible.remove(&change.heading_id);
                            entered.retain(|id| *id != change.heading_id);
                        }
                    }
                }
                ResolutionRequest::Clicked { entry_id } => {
                    if self.outline.entry(&entry_id).is_some() {
                        clicked = Some(entry_id);
                    } else {
                        log::debug!("click on unknown entry {entry_id:?} ignored");
                    }
                }
            }
        }

        if let Some(id) = clicked {
            return self.select(id, Mode::ViewportTracked);
        }

        if let Some(id) = self.hash_target() {
            return self.select(id, Mode::HashLocked);
        }

        if entered.iter().any(|id| self.outline.is_title(id)) {
            log::trace!("page title in view, resetting navigation scroll");
            return Resolution::NavScrollReset;
        }

        // Stable: headings unknown to the outline keep arrival order, last.
        entered.sort_by_key(|id| self.outline.position(id).unwrap_or(usize::MAX));
        let first = entered
            .iter()
            .find_map(|id| self.outline.entry_for(id))
            .map(|entry| entry.id.clone());
        if let Some(id) = first {
            return self.select(id, Mode::ViewportTracked);
        }

        if self.selection.mode == Mode::HashLocked
            && !self.visible.contains(&self.fragment)
            && !self.visible.is_empty()
        {
            self.selection.mode = Mode::ViewportTracked;
        }
        Resolution::Unchanged
    }

    /// Entry named by the fragment, if the fragment heading is on screen.
    fn hash_target(&self) -> Option<String> {
        if self.fragment.is_empty() || !self.visible.contains(&self.fragment) {
            return None;
        }
        self.outline
            .entry_for(&self.fragment)
            .map(|entry| entry.id.clone())
    }

    fn select(&mut self, entry_id: String, mode: Mode) -> Resolution {
        if self.selection.entry_id.as_deref() == Some(entry_id.as_str()) {
            self.selection.mode = mode;
            return Resolution::Unchanged;
        }
        log::debug!("active entry -> {entry_id} ({mode})");
        let previous = self.selection.entry_id.replace(entry_id.clone());
        self.selection.mode = mode;
        Resolution::Selected(SelectionChange {
            previous,
            entry_id,
            mode,
            reset_scroll: self.page_at_top,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::build_with_title;
    use crate::types::{HeadingDescriptor as H, PageTitle};

    fn outline() -> Outline {
        let title = PageTitle {
            id: "title".into(),
            text: "Page".into(),
        };
        let headings = vec![
            H::normal("a", 2, "A"),
            H::rendered_data("get-a", 1, "GET /a"),
            H::normal("b", 2, "B"),
            H::normal("b1", 3, "B1"),
            H::normal("c", 2, "C"),
        ];
        build_with_title(Some(title), headings, &[])
    }

    fn hash(fragment: &str) -> ResolutionRequest {
        ResolutionRequest::HashChanged {
            fragment: fragment.to_string(),
        }
    }

    fn batch(changes: Vec<VisibilityChange>) -> ResolutionRequest {
        ResolutionRequest::VisibilityBatch {
            changes,
            page_at_top: false,
        }
    }

    fn click(id: &str) -> ResolutionRequest {
        ResolutionRequest::Clicked {
            entry_id: id.to_string(),
        }
    }

    fn selected(r: &Resolution) -> Option<&str> {
        match r {
            Resolution::Selected(change) => Some(change.entry_id.as_str()),
            _ => None,
        }
    }

    #[test]
    fn starts_with_nothing_selected() {
        let outline = outline();
        let resolver = Resolver::new(&outline);
        assert_eq!(resolver.selection(), &ActiveSelection::default());
        assert_eq!(resolver.selection().mode, Mode::None);
    }

    #[test]
    fn first_entered_heading_in_document_order_wins() {
        let outline = outline();
        let mut resolver = Resolver::new(&outline);
        let r = resolver.resolve(batch(vec![
            VisibilityChange::entered("c"),
            VisibilityChange::entered("unknown"),
            VisibilityChange::entered("b1"),
        ]));
        assert_eq!(selected(&r), Some("b1"));
        assert_eq!(resolver.selection().mode, Mode::ViewportTracked);
    }

    #[test]
    fn rendered_data_heading_selects_owner() {
        let outline = outline();
        let mut resolver = Resolver::new(&outline);
        let r = resolver.resolve(batch(vec![VisibilityChange::entered("get-a")]));
        assert_eq!(selected(&r), Some("a"));
    }

    #[test]
    fn visible_hash_target_beats_batch() {
        let outline = outline();
        let mut resolver = Resolver::new(&outline);
        resolver.resolve(hash("#c"));
        let r = resolver.resolve_cycle([batch(vec![
            VisibilityChange::entered("a"),
            VisibilityChange::entered("c"),
        ])]);
        assert_eq!(selected(&r), Some("c"));
        assert_eq!(resolver.selection().mode, Mode::HashLocked);

        // Still locked while the fragment heading stays visible.
        let r = resolver.resolve(batch(vec![VisibilityChange::entered("b")]));
        assert_eq!(r, Resolution::Unchanged);
        assert_eq!(resolver.selection().entry_id.as_deref(), Some("c"));
        assert_eq!(resolver.selection().mode, Mode::HashLocked);
    }

    #[test]
    fn hash_to_rendered_data_locks_owner() {
        let outline = outline();
        let mut resolver = Resolver::new(&outline);
        let r = resolver.resolve_cycle([
            hash("get-a"),
            batch(vec![VisibilityChange::entered("get-a"), VisibilityChange::entered("c")]),
        ]);
        assert_eq!(selected(&r), Some("a"));
        assert_eq!(resolver.selection().mode, Mode::HashLocked);
    }

    #[test]
    fn only_one_leading_hash_is_stripped() {
        let outline = outline();
        let mut resolver = Resolver::new(&outline);
        let r = resolver.resolve_cycle([
            hash("##c"),
            batch(vec![VisibilityChange::entered("a"), VisibilityChange::entered("c")]),
        ]);
        assert_eq!(resolver.fragment(), "#c");
        assert_eq!(selected(&r), Some("a"));
        assert_eq!(resolver.selection().mode, Mode::ViewportTracked);

        resolver.resolve(hash("c"));
        assert_eq!(resolver.fragment(), "c");
    }

    #[test]
    fn invisible_hash_target_falls_back_to_viewport() {
        let outline = outline();
        let mut resolver = Resolver::new(&outline);
        resolver.resolve(hash("#c"));
        let r = resolver.resolve(batch(vec![VisibilityChange::entered("b")]));
        assert_eq!(selected(&r), Some("b"));
        assert_eq!(resolver.selection().mode, Mode::ViewportTracked);
    }

    #[test]
    fn hash_target_leaving_drops_lock() {
        let outline = outline();
        let mut resolver = Resolver::new(&outline);
        resolver.resolve_cycle([
            hash("c"),
            batch(vec![VisibilityChange::entered("b1"), VisibilityChange::entered("c")]),
        ]);
        assert_eq!(resolver.selection().mode, Mode::HashLocked);

        let r = resolver.resolve(batch(vec![VisibilityChange::left("c")]));
        assert_eq!(r, Resolution::Unchanged);
        assert_eq!(resolver.selection().entry_id.as_deref(), Some("c"));
        assert_eq!(resolver.selection().mode, Mode::ViewportTracked);

        // Coming back into view re-locks.
        let r = resolver.resolve(batch(vec![VisibilityChange::entered("c")]));
        assert_eq!(r, Resolution::Unchanged);
        assert_eq!(resolver.selection().mode, Mode::HashLocked);
    }

    #[test]
    fn title_in_view_resets_scroll_without_selecting() {
        let outline = outline();
        let mut resolver = Resolver::new(&outline);
        resolver.resolve(batch(vec![VisibilityChange::entered("b")]));

        let r = resolver.resolve(batch(vec![
            VisibilityChange::entered("a"),
            VisibilityChange::entered("title"),
        ]));
        assert_eq!(r, Resolution::NavScrollReset);
        assert_eq!(resolver.selection().entry_id.as_deref(), Some("b"));
    }

    #[test]
    fn visible_hash_beats_title_reset() {
        let outline = outline();
        let mut resolver = Resolver::new(&outline);
        let r = resolver.resolve_cycle([
            hash("#a"),
            batch(vec![VisibilityChange::entered("title"), VisibilityChange::entered("a")]),
        ]);
        assert_eq!(selected(&r), Some("a"));
    }

    #[test]
    fn click_beats_same_cycle_batch_and_hash() {
        let outline = outline();
        let mut resolver = Resolver::new(&outline);
        let r = resolver.resolve_cycle([
            hash("#a"),
            batch(vec![VisibilityChange::entered("a"), VisibilityChange::entered("title")]),
            click("c"),
        ]);
        assert_eq!(selected(&r), Some("c"));
        assert_eq!(resolver.selection().mode, Mode::ViewportTracked);
    }

    #[test]
    fn unknown_click_and_fragment_are_noops() {
        let outline = outline();
        let mut resolver = Resolver::new(&outline);
        resolver.resolve(click("b"));

        assert_eq!(resolver.resolve(click("get-a")), Resolution::Unchanged);
        assert_eq!(resolver.resolve(click("missing")), Resolution::Unchanged);
        let r = resolver.resolve_cycle([
            hash("#missing"),
            batch(vec![VisibilityChange::entered("missing")]),
        ]);
        assert_eq!(r, Resolution::Unchanged);
        assert_eq!(resolver.selection().entry_id.as_deref(), Some("b"));
    }

    #[test]
    fn heading_that_enters_and_leaves_in_one_cycle_is_ignored() {
        let outline = outline();
        let mut resolver = Resolver::new(&outline);
        let r = resolver.resolve_cycle([
            batch(vec![VisibilityChange::entered("a")]),
            batch(vec![VisibilityChange::left("a"), VisibilityChange::entered("c")]),
        ]);
        assert_eq!(selected(&r), Some("c"));
        assert!(!resolver.is_visible("a"));
    }

    #[test]
    fn reselecting_active_entry_is_silent() {
        let outline = outline();
        let mut resolver = Resolver::new(&outline);
        assert_eq!(selected(&resolver.resolve(click("b"))), Some("b"));
        assert_eq!(resolver.resolve(click("b")), Resolution::Unchanged);
    }

    #[test]
    fn change_carries_previous_and_scroll_reset() {
        let outline = outline();
        let mut resolver = Resolver::new(&outline);
        resolver.resolve(batch(vec![VisibilityChange::entered("a")]));
        let r = resolver.resolve(ResolutionRequest::VisibilityBatch {
            changes: vec![VisibilityChange::entered("b")],
            page_at_top: true,
        });
        assert_eq!(
            r,
            Resolution::Selected(SelectionChange {
                previous: Some("a".into()),
                entry_id: "b".into(),
                mode: Mode::ViewportTracked,
                reset_scroll: true,
            })
        );
    }

    #[test]
    fn empty_outline_never_selects() {
        let outline = Outline::default();
        let mut resolver = Resolver::new(&outline);
        let r = resolver.resolve_cycle([
            hash("#x"),
            batch(vec![VisibilityChange::entered("x")]),
            click("x"),
        ]);
        assert_eq!(r, Resolution::Unchanged);
        assert_eq!(resolver.selection().entry_id, None);
    }

    #[derive(Default)]
    struct Recorder {
        changes: Vec<String>,
        resets: usize,
    }

    impl SelectionSink for Recorder {
        fn on_selection_changed(&mut self, change: &SelectionChange) {
            self.changes.push(change.entry_id.clone());
        }

        fn on_nav_scroll_reset(&mut self) {
            self.resets += 1;
        }
    }

    #[test]
    fn dispatch_notifies_sink() {
        let outline = outline();
        let mut resolver = Resolver::new(&outline);
        let mut sink = Recorder::default();
        resolver.dispatch(batch(vec![VisibilityChange::entered("a")]), &mut sink);
        resolver.dispatch(batch(vec![VisibilityChange::entered("a")]), &mut sink);
        resolver.dispatch(batch(vec![VisibilityChange::entered("title")]), &mut sink);
        resolver.dispatch(click("c"), &mut sink);
        assert_eq!(sink.changes, vec!["a", "c"]);
        assert_eq!(sink.resets, 1);
    }

    #[test]
    fn requests_decode_from_json() {
        let req: ResolutionRequest = serde_json::from_str(
            r#"{"type":"visibility","changes":[{"headingId":"a","started":true}],"pageAtTop":true}"#,
        )
        .unwrap();
        assert_eq!(
            req,
            ResolutionRequest::VisibilityBatch {
                changes: vec![VisibilityChange::entered("a")],
                page_at_top: true,
            }
        );
        let req: ResolutionRequest =
            serde_json::from_str(r##"{"type":"hashChanged","fragment":"#a"}"##).unwrap();
        assert_eq!(req, hash("#a"));
        let req: ResolutionRequest =
            serde_json::from_str(r#"{"type":"clicked","entryId":"a"}"#).unwrap();
        assert_eq!(req, click("a"));
    }
}
