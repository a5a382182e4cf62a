//! # Editor Store
//!
//! Owns the editor's `CombinedState` and is the single place actions are
//! dispatched. Dispatch runs the reducer to completion, so two actions
//! never interleave.

use crate::actions::Action;
use crate::history::DEFAULT_MAX_LEVELS;
use crate::model::{Element, Page, Site, SitePatch};
use crate::reducer::{self, Outcome};
use crate::state::{CombinedState, EditorState};

#[derive(Debug, Default)]
pub struct EditorStore {
    state: CombinedState,

    /// Increments whenever the site changes
    version: u64,
}

impl EditorStore {
    pub fn new(site: Site) -> Self {
        Self::with_history_limit(site, DEFAULT_MAX_LEVELS)
    }

    pub fn with_history_limit(site: Site, history_limit: usize) -> Self {
        if !site.has_home() {
            tracing::warn!(site_id = %site.id, "site has no home page");
        }

        Self {
            state: CombinedState::with_history_limit(site, history_limit),
            version: 0,
        }
    }

    /// Run an action through the reducer
    pub fn dispatch(&mut self, action: Action) -> Outcome {
        let name = action.name();
        let outcome = reducer::apply_in_place(&mut self.state, action);

        if outcome.site_changed() {
            self.version += 1;
        }

        tracing::debug!(action = name, outcome = ?outcome, version = self.version, "dispatch");
        outcome
    }

    /// Patch the site without recording an undo step
    ///
    /// The patch is applied to every history snapshot as well, so undoing
    /// an earlier edit keeps it. Counts as a site change for saving.
    pub fn amend_site(&mut self, patch: SitePatch) {
        self.state
            .state
            .history
            .amend(|site| site.merge(patch.clone()));
        self.version += 1;
        tracing::debug!(version = self.version, "site amended");
    }

    pub fn combined(&self) -> &CombinedState {
        &self.state
    }

    pub fn site(&self) -> &Site {
        self.state.site()
    }

    pub fn state(&self) -> &EditorState {
        &self.state.state
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn selected_page_id(&self) -> &str {
        self.state.selected_page_id()
    }

    /// The selected page; the one accessor every caller should use
    pub fn current_page(&self) -> Option<&Page> {
        self.state.current_page()
    }

    pub fn selected_element(&self) -> Option<&Element> {
        self.state.selected_element()
    }

    pub fn can_undo(&self) -> bool {
        self.state.state.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.state.state.history.can_redo()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ElementPatch;

    #[test]
    fn test_version_tracks_site_changes_only() {
        let mut store = EditorStore::new(Site::new("shop"));
        assert_eq!(store.version(), 0);

        store.dispatch(Action::ToggleElementPanel);
        assert_eq!(store.version(), 0);

        store.dispatch(Action::AddElement(Element::new("text-1", "text")));
        assert_eq!(store.version(), 1);

        store.dispatch(Action::Undo);
        assert_eq!(store.version(), 2);

        store.dispatch(Action::Undo);
        assert_eq!(store.version(), 2);
    }

    #[test]
    fn test_selected_element_reads_current_page() {
        let mut store = EditorStore::new(Site::new("shop"));
        store.dispatch(Action::AddElement(Element::new("text-1", "text")));
        store.dispatch(Action::SelectElement(Some("text-1".to_string())));

        assert_eq!(store.selected_element().map(|e| e.id.as_str()), Some("text-1"));

        store.dispatch(Action::ChangePage("about".to_string()));
        assert!(store.current_page().is_none());
        assert!(store.selected_element().is_none());
    }

    #[test]
    fn test_amend_site_is_not_an_undo_step() {
        let mut store = EditorStore::new(Site::new("shop"));
        store.dispatch(Action::AddElement(Element::new("text-1", "text")));

        store.amend_site(SitePatch::published_url("https://shop.example"));
        assert_eq!(store.version(), 2);

        store.dispatch(Action::Undo);
        assert!(store.current_page().unwrap().elements.is_empty());
        assert_eq!(
            store.site().published_url.as_deref(),
            Some("https://shop.example")
        );
        assert!(!store.can_undo());
    }

    #[test]
    fn test_update_is_idempotent() {
        let mut once = EditorStore::new(Site::new("shop"));
        once.dispatch(Action::AddElement(Element::new("text-1", "text")));
        let mut twice = EditorStore::new(Site::new("shop"));
        twice.dispatch(Action::AddElement(Element::new("text-1", "text")));

        let update = Action::UpdateElement {
            id: "text-1".to_string(),
            updates: ElementPatch::content("Hello"),
        };
        once.dispatch(update.clone());
        twice.dispatch(update.clone());
        twice.dispatch(update);

        assert_eq!(once.site(), twice.site());
    }
}
