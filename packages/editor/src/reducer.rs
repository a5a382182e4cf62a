//! # Editor Reducer
//!
//! Pure transition function `(CombinedState, Action) -> CombinedState`.
//!
//! Edits that cannot apply (missing page, missing element, bad ordering)
//! are logged and leave the state untouched instead of failing. Edits that
//! change the site are recorded in the history; selection, navigation and
//! panel toggles are not.

use crate::actions::Action;
use crate::model::{Element, ElementPatch, Page, Site, SitePatch};
use crate::state::CombinedState;
use std::fmt;

/// What a dispatched action did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The site changed (recorded for undo, or an undo/redo step)
    SiteChanged,

    /// Only UI state changed
    ViewChanged,

    /// Nothing changed
    Ignored(Ignored),
}

impl Outcome {
    pub fn site_changed(&self) -> bool {
        matches!(self, Outcome::SiteChanged)
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, Outcome::Ignored(_))
    }
}

/// Why an action was a no-op
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ignored {
    PageNotFound(String),
    ElementNotFound(String),
    InvalidOrder,
    NothingToUndo,
    NothingToRedo,
    /// The edit produced an identical site
    Unchanged,
}

impl fmt::Display for Ignored {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ignored::PageNotFound(id) => write!(f, "page {} not found", id),
            Ignored::ElementNotFound(id) => write!(f, "element {} not found", id),
            Ignored::InvalidOrder => f.write_str("ordering is not a permutation of the page's elements"),
            Ignored::NothingToUndo => f.write_str("nothing to undo"),
            Ignored::NothingToRedo => f.write_str("nothing to redo"),
            Ignored::Unchanged => f.write_str("site unchanged"),
        }
    }
}

/// Apply an action, discarding the outcome
pub fn reduce(state: CombinedState, action: Action) -> CombinedState {
    apply(state, action).0
}

/// Apply an action and report what it did
pub fn apply(mut combined: CombinedState, action: Action) -> (CombinedState, Outcome) {
    let outcome = apply_in_place(&mut combined, action);
    (combined, outcome)
}

/// In-place form of `apply`, used by the store
pub(crate) fn apply_in_place(combined: &mut CombinedState, action: Action) -> Outcome {
    let label = action.name();
    let state = &mut combined.state;

    let outcome = match action {
        Action::SelectElement(id) => {
            state.selected_element = id;
            Outcome::ViewChanged
        }

        Action::ChangePage(page_id) => {
            if state.history.present().page(&page_id).is_none() {
                tracing::debug!(page_id = %page_id, "selected page does not exist");
            }
            state.selected_page = page_id;
            Outcome::ViewChanged
        }

        Action::ToggleElementPanel => {
            state.show_element_panel = !state.show_element_panel;
            Outcome::ViewChanged
        }

        Action::ToggleTemplatePanel => {
            state.show_template_panel = !state.show_template_panel;
            Outcome::ViewChanged
        }

        Action::TogglePageManager => {
            state.show_page_manager = !state.show_page_manager;
            Outcome::ViewChanged
        }

        Action::SetDragging(dragging) => {
            if dragging && !state.is_dragging {
                state.history.begin_batch(Some("drag".to_string()));
            } else if !dragging {
                state.history.end_batch();
            }
            state.is_dragging = dragging;
            Outcome::ViewChanged
        }

        Action::Undo => {
            if state.history.undo() {
                Outcome::SiteChanged
            } else {
                tracing::debug!("nothing to undo");
                Outcome::Ignored(Ignored::NothingToUndo)
            }
        }

        Action::Redo => {
            if state.history.redo() {
                Outcome::SiteChanged
            } else {
                tracing::debug!("nothing to redo");
                Outcome::Ignored(Ignored::NothingToRedo)
            }
        }

        edit => {
            let deleted = match &edit {
                Action::DeleteElement(id) => Some(id.clone()),
                _ => None,
            };

            match edit_site(state.history.present(), &state.selected_page, edit) {
                Ok(next) if next == *state.history.present() => Outcome::Ignored(Ignored::Unchanged),
                Ok(next) => {
                    state.history.commit(next, label);
                    if deleted.is_some() && deleted == state.selected_element {
                        state.selected_element = None;
                    }
                    Outcome::SiteChanged
                }
                Err(reason) => {
                    tracing::warn!(action = label, reason = ?reason, "ignored editor action");
                    Outcome::Ignored(reason)
                }
            }
        }
    };

    outcome
}

/// Compute the next site for a site-editing action
fn edit_site(site: &Site, page_id: &str, action: Action) -> Result<Site, Ignored> {
    match action {
        Action::AddElement(element) => edit_page(site, page_id, |page| {
            page.elements.push(element);
            Ok(())
        }),

        Action::UpdateElement { id, updates } => {
            edit_page(site, page_id, |page| update_element(page, &id, &updates))
        }

        Action::DeleteElement(id) => edit_page(site, page_id, |page| {
            let index = page
                .position(&id)
                .ok_or_else(|| Ignored::ElementNotFound(id.clone()))?;
            page.elements.remove(index);
            Ok(())
        }),

        Action::ReorderElements(order) => {
            edit_page(site, page_id, |page| reorder_elements(page, &order))
        }

        Action::AddPage(page) => {
            let mut next = site.clone();
            next.pages.insert(page.id.clone(), page);
            Ok(next)
        }

        Action::SaveSite(replacement) => Ok(replacement),

        Action::UpdateSite(patch) => Ok(update_site(site, patch)),

        other => {
            tracing::error!(action = other.name(), "not a site edit");
            Err(Ignored::Unchanged)
        }
    }
}

/// Clone the site and edit one page of it
fn edit_page<F>(site: &Site, page_id: &str, edit: F) -> Result<Site, Ignored>
where
    F: FnOnce(&mut Page) -> Result<(), Ignored>,
{
    if !site.pages.contains_key(page_id) {
        return Err(Ignored::PageNotFound(page_id.to_string()));
    }

    let mut next = site.clone();
    let page = next
        .pages
        .get_mut(page_id)
        .ok_or_else(|| Ignored::PageNotFound(page_id.to_string()))?;
    edit(page)?;
    Ok(next)
}

/// Merge into the first element with `id`
fn update_element(page: &mut Page, id: &str, updates: &ElementPatch) -> Result<(), Ignored> {
    let element = page
        .elements
        .iter_mut()
        .find(|el| el.id == id)
        .ok_or_else(|| Ignored::ElementNotFound(id.to_string()))?;
    element.merge(updates);
    Ok(())
}

/// Rebuild the element list in `order`, which must name every element exactly once
fn reorder_elements(page: &mut Page, order: &[String]) -> Result<(), Ignored> {
    if order.len() != page.elements.len() {
        return Err(Ignored::InvalidOrder);
    }

    let mut remaining: Vec<Option<Element>> =
        std::mem::take(&mut page.elements).into_iter().map(Some).collect();
    let mut reordered = Vec::with_capacity(order.len());

    for id in order {
        let slot = remaining
            .iter_mut()
            .find(|slot| slot.as_ref().map(|el| &el.id == id).unwrap_or(false));

        // The page is a scratch copy, so bailing out mid-way is fine
        let element = slot.and_then(Option::take).ok_or(Ignored::InvalidOrder)?;
        reordered.push(element);
    }

    page.elements = reordered;
    Ok(())
}

fn update_site(site: &Site, patch: SitePatch) -> Site {
    let mut next = site.clone();
    next.merge(patch);
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Element;

    fn text(id: &str, content: &str) -> Element {
        Element::new(id, "text").with_content(content)
    }

    fn with_elements(ids: &[&str]) -> CombinedState {
        let mut state = CombinedState::new(Site::new("shop"));
        for id in ids {
            state = reduce(state, Action::AddElement(text(id, id)));
        }
        state
    }

    fn home_ids(state: &CombinedState) -> Vec<&str> {
        state.site().pages["home"]
            .elements
            .iter()
            .map(|el| el.id.as_str())
            .collect()
    }

    #[test]
    fn test_add_element_appends_to_selected_page() {
        let state = CombinedState::new(Site::new("shop"));
        let (state, outcome) = apply(state, Action::AddElement(text("text-1", "Hello")));

        assert_eq!(outcome, Outcome::SiteChanged);
        assert_eq!(
            state.site().pages["home"].elements,
            vec![text("text-1", "Hello")]
        );
        assert_eq!(state.state.history.undo_levels(), 1);
    }

    #[test]
    fn test_add_element_to_missing_page_is_ignored() {
        let state = reduce(
            CombinedState::new(Site::new("shop")),
            Action::ChangePage("about".to_string()),
        );
        let before = state.site().clone();

        let (state, outcome) = apply(state, Action::AddElement(text("text-1", "Hi")));

        assert_eq!(
            outcome,
            Outcome::Ignored(Ignored::PageNotFound("about".to_string()))
        );
        assert_eq!(*state.site(), before);
        assert!(!state.state.history.can_undo());
    }

    #[test]
    fn test_update_and_delete_on_missing_page_do_not_panic() {
        let state = reduce(
            CombinedState::new(Site::new("shop")),
            Action::ChangePage("missing".to_string()),
        );

        let (state, outcome) = apply(
            state,
            Action::UpdateElement {
                id: "x".to_string(),
                updates: ElementPatch::content("y"),
            },
        );
        assert!(outcome.is_ignored());

        let (_, outcome) = apply(state, Action::DeleteElement("x".to_string()));
        assert!(outcome.is_ignored());
    }

    #[test]
    fn test_update_element_touches_first_match_only() {
        let mut state = with_elements(&["a"]);
        state = reduce(state, Action::AddElement(text("a", "second")));

        let state = reduce(
            state,
            Action::UpdateElement {
                id: "a".to_string(),
                updates: ElementPatch::content("changed"),
            },
        );

        let elements = &state.site().pages["home"].elements;
        assert_eq!(elements[0].content.as_deref(), Some("changed"));
        assert_eq!(elements[1].content.as_deref(), Some("second"));
    }

    #[test]
    fn test_repeated_update_is_not_recorded_twice() {
        let state = with_elements(&["a"]);
        let update = Action::UpdateElement {
            id: "a".to_string(),
            updates: ElementPatch::content("changed"),
        };

        let (state, first) = apply(state, update.clone());
        let levels = state.state.history.undo_levels();
        let (state, second) = apply(state, update);

        assert_eq!(first, Outcome::SiteChanged);
        assert_eq!(second, Outcome::Ignored(Ignored::Unchanged));
        assert_eq!(state.state.history.undo_levels(), levels);
    }

    #[test]
    fn test_delete_removes_first_match_and_clears_selection() {
        let mut state = with_elements(&["a", "b"]);
        state = reduce(state, Action::AddElement(text("a", "dup")));
        state = reduce(state, Action::SelectElement(Some("a".to_string())));

        let state = reduce(state, Action::DeleteElement("a".to_string()));

        assert_eq!(home_ids(&state), vec!["b", "a"]);
        assert_eq!(state.state.selected_element, None);
    }

    #[test]
    fn test_delete_unknown_element_is_ignored() {
        let state = with_elements(&["a"]);
        let (_, outcome) = apply(state, Action::DeleteElement("zzz".to_string()));
        assert_eq!(
            outcome,
            Outcome::Ignored(Ignored::ElementNotFound("zzz".to_string()))
        );
    }

    #[test]
    fn test_reorder_elements() {
        let state = with_elements(&["a", "b", "c"]);
        let order = vec!["c".to_string(), "a".to_string(), "b".to_string()];

        let (state, outcome) = apply(state, Action::ReorderElements(order));

        assert_eq!(outcome, Outcome::SiteChanged);
        assert_eq!(home_ids(&state), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_reorder_rejects_non_permutations() {
        let state = with_elements(&["a", "b"]);

        for order in [
            vec!["a".to_string()],
            vec!["a".to_string(), "a".to_string()],
            vec!["a".to_string(), "x".to_string()],
        ] {
            let (next, outcome) = apply(state.clone(), Action::ReorderElements(order));
            assert_eq!(outcome, Outcome::Ignored(Ignored::InvalidOrder));
            assert_eq!(home_ids(&next), vec!["a", "b"]);
        }
    }

    #[test]
    fn test_add_page_then_edit_it() {
        let state = CombinedState::new(Site::new("shop"));
        let state = reduce(state, Action::AddPage(Page::new("about", "About")));
        let state = reduce(state, Action::ChangePage("about".to_string()));
        let state = reduce(state, Action::AddElement(text("text-1", "About us")));

        assert_eq!(state.site().pages["about"].elements.len(), 1);
        assert!(state.site().pages["home"].elements.is_empty());
    }

    #[test]
    fn test_undo_redo_restore_sites() {
        let state = with_elements(&["a", "b"]);

        let (state, outcome) = apply(state, Action::Undo);
        assert_eq!(outcome, Outcome::SiteChanged);
        assert_eq!(home_ids(&state), vec!["a"]);

        let (state, _) = apply(state, Action::Redo);
        assert_eq!(home_ids(&state), vec!["a", "b"]);
    }

    #[test]
    fn test_undo_on_empty_history_keeps_site() {
        let state = CombinedState::new(Site::new("shop"));
        let (state, outcome) = apply(state, Action::Undo);

        assert_eq!(outcome, Outcome::Ignored(Ignored::NothingToUndo));
        assert!(state.site().has_home());

        let (state, outcome) = apply(state, Action::Redo);
        assert_eq!(outcome, Outcome::Ignored(Ignored::NothingToRedo));
        assert!(state.site().has_home());
    }

    #[test]
    fn test_view_actions_are_not_recorded() {
        let state = CombinedState::new(Site::new("shop"));
        let state = reduce(state, Action::ToggleElementPanel);
        let state = reduce(state, Action::TogglePageManager);
        let state = reduce(state, Action::SelectElement(Some("a".to_string())));

        assert!(state.state.show_element_panel);
        assert!(state.state.show_page_manager);
        assert!(!state.state.show_template_panel);
        assert!(!state.state.history.can_undo());
    }

    #[test]
    fn test_drag_gesture_undoes_as_one_step() {
        let state = with_elements(&["a", "b", "c"]);
        let levels = state.state.history.undo_levels();

        let state = reduce(state, Action::SetDragging(true));
        let state = reduce(
            state,
            Action::ReorderElements(vec!["b".into(), "a".into(), "c".into()]),
        );
        let state = reduce(
            state,
            Action::ReorderElements(vec!["b".into(), "c".into(), "a".into()]),
        );
        let state = reduce(state, Action::SetDragging(false));

        assert_eq!(state.state.history.undo_levels(), levels + 1);
        let state = reduce(state, Action::Undo);
        assert_eq!(home_ids(&state), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_update_site_merges_fields() {
        let state = CombinedState::new(Site::new("shop"));
        let state = reduce(state, Action::UpdateSite(SitePatch::name("My Shop")));

        assert_eq!(state.site().name, "My Shop");
        assert_eq!(state.site().id, "shop");
        assert!(state.site().has_home());
    }

    #[test]
    fn test_save_site_replaces_wholesale() {
        let state = with_elements(&["a"]);
        let replacement = Site::new("other");

        let state = reduce(state, Action::SaveSite(replacement.clone()));
        assert_eq!(*state.site(), replacement);
    }
}
