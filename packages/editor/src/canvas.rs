//! # Canvas
//!
//! The drop target and direct-manipulation surface for the selected page.
//!
//! The canvas never edits the site itself: drops become `ADD_ELEMENT`,
//! reorders become `REORDER_ELEMENTS`, and a drag gesture is bracketed by
//! `SET_DRAGGING` so everything it does undoes in one step.

use crate::actions::Action;
use crate::errors::EditorError;
use crate::ids::ElementIdGenerator;
use crate::model::{Element, ElementKind, PropMap, StyleMap};
use crate::reducer::{Ignored, Outcome};
use crate::store::EditorStore;
use serde::{Deserialize, Serialize};

/// Element descriptor delivered by a drag source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropPayload {
    #[serde(rename = "type")]
    pub element_type: String,

    #[serde(default, alias = "label", skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleMap>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<PropMap>,
}

impl DropPayload {
    pub fn new(element_type: impl Into<String>) -> Self {
        Self {
            element_type: element_type.into(),
            ..Self::default()
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    fn into_element(self, id: String) -> Element {
        Element {
            id,
            element_type: self.element_type,
            content: self.content,
            style: self.style,
            class_name: self.class_name,
            children: None,
            props: self.props,
        }
    }
}

/// What the canvas shows for the selected page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum CanvasView {
    PageNotFound { page_id: String },
    Page(PageView),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub page_id: String,
    pub name: String,
    pub background: Option<String>,
    pub styles: Option<StyleMap>,

    /// True while a drag gesture is in progress
    pub drop_active: bool,

    pub elements: Vec<ElementView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementView {
    pub id: String,
    pub element_type: String,

    /// `None` for types the editor cannot render
    #[serde(skip)]
    pub kind: Option<ElementKind>,

    pub supported: bool,
    pub content: Option<String>,
    pub class_name: Option<String>,
    pub style: Option<StyleMap>,
    pub variant: Option<String>,
    pub selected: bool,
    pub children: Vec<ElementView>,
}

impl ElementView {
    fn build(element: &Element, selected: Option<&str>) -> Self {
        let kind = element.kind();
        let variant = element
            .props
            .as_ref()
            .and_then(|props| props.get("variant"))
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .or_else(|| (kind == Some(ElementKind::Button)).then(|| "default".to_string()));

        Self {
            id: element.id.clone(),
            element_type: element.element_type.clone(),
            kind,
            supported: kind.is_some(),
            content: element.content.clone(),
            class_name: element.class_name.clone(),
            style: element.style.clone(),
            variant,
            selected: selected == Some(element.id.as_str()),
            children: element
                .children
                .iter()
                .flatten()
                .map(|child| ElementView::build(child, selected))
                .collect(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Canvas {
    ids: ElementIdGenerator,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ids(ids: ElementIdGenerator) -> Self {
        Self { ids }
    }

    /// Render the selected page
    pub fn render(&self, store: &EditorStore) -> CanvasView {
        let Some(page) = store.current_page() else {
            return CanvasView::PageNotFound {
                page_id: store.selected_page_id().to_string(),
            };
        };

        let selected = store.state().selected_element.as_deref();

        CanvasView::Page(PageView {
            page_id: page.id.clone(),
            name: page.name.clone(),
            background: page.settings.background.clone(),
            styles: page.settings.styles.clone(),
            drop_active: store.state().is_dragging,
            elements: page
                .elements
                .iter()
                .map(|el| ElementView::build(el, selected))
                .collect(),
        })
    }

    /// Drop a new element onto the page; returns its fresh id
    pub fn drop_element(
        &mut self,
        store: &mut EditorStore,
        payload: DropPayload,
    ) -> Result<String, EditorError> {
        let page = store
            .current_page()
            .ok_or_else(|| EditorError::NotFound(format!("page {}", store.selected_page_id())))?;

        let mut id = self.ids.next_id(&payload.element_type);
        while page.contains(&id) {
            id = self.ids.next_id(&payload.element_type);
        }

        store.dispatch(Action::AddElement(payload.into_element(id.clone())));
        Ok(id)
    }

    pub fn begin_drag(&self, store: &mut EditorStore) {
        store.dispatch(Action::SetDragging(true));
    }

    pub fn end_drag(&self, store: &mut EditorStore) {
        store.dispatch(Action::SetDragging(false));
    }

    /// Replace the page ordering with `order`
    pub fn reorder(&self, store: &mut EditorStore, order: Vec<String>) -> Outcome {
        store.dispatch(Action::ReorderElements(order))
    }

    /// Move one element to `index` (clamped to the end of the page)
    pub fn move_element(&self, store: &mut EditorStore, id: &str, index: usize) -> Outcome {
        let Some(page) = store.current_page() else {
            return Outcome::Ignored(Ignored::PageNotFound(store.selected_page_id().to_string()));
        };
        let Some(from) = page.position(id) else {
            return Outcome::Ignored(Ignored::ElementNotFound(id.to_string()));
        };

        let mut order: Vec<String> = page.elements.iter().map(|el| el.id.clone()).collect();
        let moved = order.remove(from);
        order.insert(index.min(order.len()), moved);

        self.reorder(store, order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Site;

    fn store_with(ids: &[&str]) -> EditorStore {
        let mut store = EditorStore::new(Site::new("shop"));
        for id in ids {
            store.dispatch(Action::AddElement(Element::new(*id, "text")));
        }
        store
    }

    fn page_ids(store: &EditorStore) -> Vec<String> {
        store
            .current_page()
            .unwrap()
            .elements
            .iter()
            .map(|el| el.id.clone())
            .collect()
    }

    #[test]
    fn test_drop_synthesizes_fresh_id() {
        let mut store = store_with(&[]);
        let mut canvas = Canvas::with_ids(ElementIdGenerator::starting_at(u64::MAX / 2));

        let first = canvas
            .drop_element(&mut store, DropPayload::new("button").with_content("Buy"))
            .unwrap();
        let second = canvas
            .drop_element(&mut store, DropPayload::new("button").with_content("Buy"))
            .unwrap();

        assert_ne!(first, second);
        assert!(first.starts_with("button-"));
        let page = store.current_page().unwrap();
        assert_eq!(page.elements.len(), 2);
        assert_eq!(page.elements[0].content.as_deref(), Some("Buy"));
    }

    #[test]
    fn test_drop_payload_accepts_label() {
        let payload: DropPayload =
            serde_json::from_str(r#"{"type":"text","label":"Heading 1","className":"text-4xl"}"#)
                .unwrap();
        assert_eq!(payload.content.as_deref(), Some("Heading 1"));
        assert_eq!(payload.class_name.as_deref(), Some("text-4xl"));
    }

    #[test]
    fn test_drop_on_missing_page_fails_without_editing() {
        let mut store = store_with(&[]);
        store.dispatch(Action::ChangePage("about".to_string()));
        let mut canvas = Canvas::new();

        let err = canvas
            .drop_element(&mut store, DropPayload::new("text"))
            .unwrap_err();
        assert!(matches!(err, EditorError::NotFound(_)));
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn test_render_missing_page() {
        let mut store = store_with(&[]);
        store.dispatch(Action::ChangePage("about".to_string()));

        assert_eq!(
            Canvas::new().render(&store),
            CanvasView::PageNotFound {
                page_id: "about".to_string()
            }
        );
    }

    #[test]
    fn test_render_marks_selection_and_unsupported_types() {
        let mut store = store_with(&["a"]);
        store.dispatch(Action::AddElement(Element::new("c", "carousel")));
        store.dispatch(Action::AddElement(Element::new("b", "button")));
        store.dispatch(Action::SelectElement(Some("a".to_string())));

        let CanvasView::Page(view) = Canvas::new().render(&store) else {
            panic!("expected a page");
        };

        assert_eq!(view.background.as_deref(), Some("white"));
        assert!(view.elements[0].selected);
        assert!(!view.elements[1].supported);
        assert_eq!(view.elements[2].variant.as_deref(), Some("default"));
    }

    #[test]
    fn test_move_element() {
        let mut store = store_with(&["a", "b", "c"]);
        let canvas = Canvas::new();

        let outcome = canvas.move_element(&mut store, "a", 2);
        assert_eq!(outcome, Outcome::SiteChanged);
        assert_eq!(page_ids(&store), vec!["b", "c", "a"]);

        let outcome = canvas.move_element(&mut store, "c", 99);
        assert_eq!(outcome, Outcome::SiteChanged);
        assert_eq!(page_ids(&store), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_drag_gesture_is_one_undo_step() {
        let mut store = store_with(&["a", "b", "c"]);
        let canvas = Canvas::new();

        canvas.begin_drag(&mut store);
        canvas.move_element(&mut store, "a", 1);
        canvas.move_element(&mut store, "a", 2);
        canvas.end_drag(&mut store);

        assert_eq!(page_ids(&store), vec!["b", "c", "a"]);
        store.dispatch(Action::Undo);
        assert_eq!(page_ids(&store), vec!["a", "b", "c"]);
    }
}
