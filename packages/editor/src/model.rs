//! # Site Model
//!
//! Element, Page and Site documents in their persisted JSON shape.
//!
//! Field names follow the stored documents (`className`, `publishedUrl`,
//! ...), so a site written by any client loads back unchanged.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Free-form style properties (`{"color": "red", "padding": 8}`)
pub type StyleMap = BTreeMap<String, Value>;

/// Open key-value map of element props
pub type PropMap = BTreeMap<String, Value>;

/// A placed visual component instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Unique within the containing page's element sequence
    pub id: String,

    #[serde(rename = "type")]
    pub element_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleMap>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Element>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<PropMap>,
}

impl Element {
    pub fn new(id: impl Into<String>, element_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            element_type: element_type.into(),
            content: None,
            style: None,
            class_name: None,
            children: None,
            props: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn with_prop(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props
            .get_or_insert_with(PropMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Known kind for this element's `type`, if any
    pub fn kind(&self) -> Option<ElementKind> {
        ElementKind::from_type(&self.element_type)
    }

    /// Apply a partial update; fields present in the patch replace ours
    pub fn merge(&mut self, patch: &ElementPatch) {
        if let Some(id) = &patch.id {
            self.id = id.clone();
        }
        if let Some(element_type) = &patch.element_type {
            self.element_type = element_type.clone();
        }
        if let Some(content) = &patch.content {
            self.content = Some(content.clone());
        }
        if let Some(style) = &patch.style {
            self.style = Some(style.clone());
        }
        if let Some(class_name) = &patch.class_name {
            self.class_name = Some(class_name.clone());
        }
        if let Some(children) = &patch.children {
            self.children = Some(children.clone());
        }
        if let Some(props) = &patch.props {
            self.props = Some(props.clone());
        }
    }
}

/// Partial element used by `UPDATE_ELEMENT`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub element_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleMap>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Element>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<PropMap>,
}

impl ElementPatch {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }
}

/// Element kinds the editor knows how to render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Text,
    Heading,
    Image,
    Button,
    Input,
    TextArea,
    Checkbox,
    Radio,
    Container,
    Grid,
    Flexbox,
    Video,
    Audio,
    Map,
}

impl ElementKind {
    pub const ALL: [ElementKind; 14] = [
        ElementKind::Text,
        ElementKind::Heading,
        ElementKind::Image,
        ElementKind::Button,
        ElementKind::Input,
        ElementKind::TextArea,
        ElementKind::Checkbox,
        ElementKind::Radio,
        ElementKind::Container,
        ElementKind::Grid,
        ElementKind::Flexbox,
        ElementKind::Video,
        ElementKind::Audio,
        ElementKind::Map,
    ];

    pub fn from_type(element_type: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.type_name() == element_type)
    }

    /// Value stored in `Element.type`
    pub fn type_name(self) -> &'static str {
        match self {
            ElementKind::Text => "text",
            ElementKind::Heading => "heading",
            ElementKind::Image => "image",
            ElementKind::Button => "button",
            ElementKind::Input => "input",
            ElementKind::TextArea => "textarea",
            ElementKind::Checkbox => "checkbox",
            ElementKind::Radio => "radio",
            ElementKind::Container => "container",
            ElementKind::Grid => "grid",
            ElementKind::Flexbox => "flexbox",
            ElementKind::Video => "video",
            ElementKind::Audio => "audio",
            ElementKind::Map => "map",
        }
    }
}

/// Per-page style settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<StyleMap>,
}

/// A named collection of elements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Unique within the site
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub elements: Vec<Element>,

    /// Product id references
    #[serde(default)]
    pub products: Vec<String>,

    #[serde(default)]
    pub settings: PageSettings,
}

impl Page {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            elements: Vec::new(),
            products: Vec::new(),
            settings: PageSettings::default(),
        }
    }

    /// The page every new site starts with
    pub fn home() -> Self {
        Self {
            settings: PageSettings {
                background: Some("white".to_string()),
                styles: Some(StyleMap::new()),
            },
            ..Self::new(HOME_PAGE_ID, "Home")
        }
    }

    /// First element with the given id
    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|el| el.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.elements.iter().position(|el| el.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }
}

pub const HOME_PAGE_ID: &str = "home";
pub const DEFAULT_SITE_NAME: &str = "New Site";

/// Top-level user-owned website project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    #[serde(default)]
    pub id: String,

    #[serde(default = "default_site_name")]
    pub name: String,

    #[serde(default)]
    pub pages: BTreeMap<String, Page>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates: Option<BTreeMap<String, Page>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_published_at: Option<String>,
}

fn default_site_name() -> String {
    DEFAULT_SITE_NAME.to_string()
}

impl Site {
    /// Default site materialized on first editor load: a single home page
    pub fn new(id: impl Into<String>) -> Self {
        let mut pages = BTreeMap::new();
        pages.insert(HOME_PAGE_ID.to_string(), Page::home());

        Self {
            id: id.into(),
            name: default_site_name(),
            pages,
            published_url: None,
            templates: None,
            last_published_at: None,
        }
    }

    pub fn page(&self, id: &str) -> Option<&Page> {
        self.pages.get(id)
    }

    pub fn has_home(&self) -> bool {
        self.pages.contains_key(HOME_PAGE_ID)
    }

    /// Apply a partial update; fields present in the patch replace ours
    pub fn merge(&mut self, patch: SitePatch) {
        if let Some(id) = patch.id {
            self.id = id;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(pages) = patch.pages {
            self.pages = pages;
        }
        if let Some(url) = patch.published_url {
            self.published_url = Some(url);
        }
        if let Some(templates) = patch.templates {
            self.templates = Some(templates);
        }
        if let Some(at) = patch.last_published_at {
            self.last_published_at = Some(at);
        }
    }

    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

impl Default for Site {
    fn default() -> Self {
        Self::new("")
    }
}

/// Partial site used by `UPDATE_SITE`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<BTreeMap<String, Page>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates: Option<BTreeMap<String, Page>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_published_at: Option<String>,
}

impl SitePatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn published_url(url: impl Into<String>) -> Self {
        Self {
            published_url: Some(url.into()),
            ..Self::default()
        }
    }
}
