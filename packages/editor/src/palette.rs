//! # Element Palette
//!
//! Addable element templates grouped by category.

use crate::actions::Action;
use crate::errors::EditorError;
use crate::ids::ElementIdGenerator;
use crate::model::{Element, ElementKind};
use crate::store::EditorStore;
use std::fmt;
use std::str::FromStr;

/// A template the palette can add to the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteItem {
    pub id: &'static str,
    pub label: &'static str,
    pub variant: Option<&'static str>,
    pub class_name: Option<&'static str>,
}

const fn button(id: &'static str, label: &'static str, variant: &'static str) -> PaletteItem {
    PaletteItem {
        id,
        label,
        variant: Some(variant),
        class_name: None,
    }
}

const fn text(id: &'static str, label: &'static str, class_name: &'static str) -> PaletteItem {
    PaletteItem {
        id,
        label,
        variant: None,
        class_name: Some(class_name),
    }
}

const BUTTONS: &[PaletteItem] = &[
    button("primary", "Primary Button", "default"),
    button("secondary", "Secondary Button", "secondary"),
    button("outline", "Outline Button", "outline"),
    button("ghost", "Ghost Button", "ghost"),
];

const TEXT: &[PaletteItem] = &[
    text("heading1", "Heading 1", "text-4xl font-bold"),
    text("heading2", "Heading 2", "text-3xl font-bold"),
    text("paragraph", "Paragraph", "text-base"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaletteCategory {
    #[default]
    Buttons,
    Text,
}

impl PaletteCategory {
    pub const ALL: [PaletteCategory; 2] = [PaletteCategory::Buttons, PaletteCategory::Text];

    pub fn key(self) -> &'static str {
        match self {
            PaletteCategory::Buttons => "buttons",
            PaletteCategory::Text => "text",
        }
    }

    /// Kind of element the category's items create
    pub fn element_kind(self) -> ElementKind {
        match self {
            PaletteCategory::Buttons => ElementKind::Button,
            PaletteCategory::Text => ElementKind::Text,
        }
    }

    pub fn items(self) -> &'static [PaletteItem] {
        match self {
            PaletteCategory::Buttons => BUTTONS,
            PaletteCategory::Text => TEXT,
        }
    }
}

impl FromStr for PaletteCategory {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.key() == s)
            .ok_or_else(|| EditorError::UnknownCategory(s.to_string()))
    }
}

impl fmt::Display for PaletteCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Palette panel state: selected category, search query, id source
#[derive(Debug, Default)]
pub struct Palette {
    category: PaletteCategory,
    query: String,
    ids: ElementIdGenerator,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ids(ids: ElementIdGenerator) -> Self {
        Self {
            ids,
            ..Self::default()
        }
    }

    pub fn category(&self) -> PaletteCategory {
        self.category
    }

    pub fn select_category(&mut self, key: &str) -> Result<(), EditorError> {
        self.category = key.parse()?;
        Ok(())
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Items of the selected category whose label matches the query
    pub fn visible_items(&self) -> Vec<&'static PaletteItem> {
        let query = self.query.trim().to_lowercase();
        self.category
            .items()
            .iter()
            .filter(|item| query.is_empty() || item.label.to_lowercase().contains(&query))
            .collect()
    }

    /// Add an item of the selected category to the current page
    pub fn add(&mut self, store: &mut EditorStore, item_id: &str) -> Result<String, EditorError> {
        let item = self
            .category
            .items()
            .iter()
            .find(|item| item.id == item_id)
            .ok_or_else(|| EditorError::UnknownPaletteItem(item_id.to_string()))?;

        let page = store
            .current_page()
            .ok_or_else(|| EditorError::NotFound(format!("page {}", store.selected_page_id())))?;

        let mut id = self.ids.next_id(item.id);
        while page.contains(&id) {
            id = self.ids.next_id(item.id);
        }

        let mut element =
            Element::new(id.clone(), self.category.element_kind().type_name()).with_content(item.label);
        if let Some(class_name) = item.class_name {
            element = element.with_class_name(class_name);
        }
        if let Some(variant) = item.variant {
            element = element.with_prop("variant", variant);
        }

        store.dispatch(Action::AddElement(element));
        Ok(id)
    }
}
