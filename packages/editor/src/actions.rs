//! # Editor Actions
//!
//! Every change to the editor goes through one of these actions.
//!
//! Actions serialize as `{"type": "ADD_ELEMENT", "payload": {...}}`, the
//! same shape the browser dispatches, so they can be posted to the
//! workspace server unchanged.

use crate::model::{Element, ElementPatch, Page, Site, SitePatch};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Select an element by id (`None` clears the selection)
    SelectElement(Option<String>),

    /// Append an element to the current page
    AddElement(Element),

    /// Merge fields into the first element with `id` on the current page
    UpdateElement { id: String, updates: ElementPatch },

    /// Remove the first element with this id from the current page
    DeleteElement(String),

    /// Replace the current page's ordering; must be a permutation of its ids
    ReorderElements(Vec<String>),

    /// Navigate to a page (not validated)
    ChangePage(String),

    /// Insert or overwrite `site.pages[page.id]`
    AddPage(Page),

    ToggleElementPanel,
    TogglePageManager,
    ToggleTemplatePanel,

    /// Start or finish a drag gesture; edits in between undo as one step
    SetDragging(bool),

    Undo,
    Redo,

    /// Replace the site wholesale
    SaveSite(Site),

    /// Shallow-merge fields into the site
    UpdateSite(SitePatch),
}

impl Action {
    /// Debug name, also used as the undo label
    pub fn name(&self) -> &'static str {
        match self {
            Action::SelectElement(_) => "SELECT_ELEMENT",
            Action::AddElement(_) => "ADD_ELEMENT",
            Action::UpdateElement { .. } => "UPDATE_ELEMENT",
            Action::DeleteElement(_) => "DELETE_ELEMENT",
            Action::ReorderElements(_) => "REORDER_ELEMENTS",
            Action::ChangePage(_) => "CHANGE_PAGE",
            Action::AddPage(_) => "ADD_PAGE",
            Action::ToggleElementPanel => "TOGGLE_ELEMENT_PANEL",
            Action::TogglePageManager => "TOGGLE_PAGE_MANAGER",
            Action::ToggleTemplatePanel => "TOGGLE_TEMPLATE_PANEL",
            Action::SetDragging(_) => "SET_DRAGGING",
            Action::Undo => "UNDO",
            Action::Redo => "REDO",
            Action::SaveSite(_) => "SAVE_SITE",
            Action::UpdateSite(_) => "UPDATE_SITE",
        }
    }

    /// Whether this action edits the site (and so is recorded for undo)
    pub fn edits_site(&self) -> bool {
        matches!(
            self,
            Action::AddElement(_)
                | Action::UpdateElement { .. }
                | Action::DeleteElement(_)
                | Action::ReorderElements(_)
                | Action::AddPage(_)
                | Action::SaveSite(_)
                | Action::UpdateSite(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_wire_shape() {
        let action = Action::AddElement(Element::new("text-1", "text").with_content("Hello"));
        let json = serde_json::to_value(&action).unwrap();

        assert_eq!(
            json,
            json!({
                "type": "ADD_ELEMENT",
                "payload": { "id": "text-1", "type": "text", "content": "Hello" }
            })
        );
    }

    #[test]
    fn test_unit_actions_parse_without_payload() {
        let action: Action = serde_json::from_value(json!({ "type": "UNDO" })).unwrap();
        assert_eq!(action, Action::Undo);

        let action: Action =
            serde_json::from_value(json!({ "type": "TOGGLE_ELEMENT_PANEL" })).unwrap();
        assert_eq!(action, Action::ToggleElementPanel);
    }

    #[test]
    fn test_update_element_payload() {
        let action: Action = serde_json::from_value(json!({
            "type": "UPDATE_ELEMENT",
            "payload": { "id": "text-1", "updates": { "content": "Bye" } }
        }))
        .unwrap();

        assert_eq!(
            action,
            Action::UpdateElement {
                id: "text-1".to_string(),
                updates: ElementPatch::content("Bye"),
            }
        );
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let result: Result<Action, _> =
            serde_json::from_value(json!({ "type": "UPDATE_PAGE", "payload": {} }));
        assert!(result.is_err());
    }
}
