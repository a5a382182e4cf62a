use crate::history::{History, DEFAULT_MAX_LEVELS};
use crate::model::{Element, Page, Site, HOME_PAGE_ID};

/// UI-side editor state
#[derive(Debug, Clone)]
pub struct EditorState {
    pub selected_element: Option<String>,

    /// Key into `site.pages`; not guaranteed to exist
    pub selected_page: String,

    pub show_element_panel: bool,
    pub show_template_panel: bool,
    pub show_page_manager: bool,
    pub is_dragging: bool,

    /// `history.present()` is the site being edited
    pub history: History,
}

impl EditorState {
    pub fn new(site: Site) -> Self {
        Self::with_history_limit(site, DEFAULT_MAX_LEVELS)
    }

    pub fn with_history_limit(site: Site, history_limit: usize) -> Self {
        Self {
            selected_element: None,
            selected_page: HOME_PAGE_ID.to_string(),
            show_element_panel: false,
            show_template_panel: false,
            show_page_manager: false,
            is_dragging: false,
            history: History::with_max_levels(site, history_limit),
        }
    }
}

/// Everything the reducer operates on
///
/// The site is not stored separately from the history: `site()` always
/// reads `history.present()`, so the two can never disagree.
#[derive(Debug, Clone)]
pub struct CombinedState {
    pub state: EditorState,
}

impl CombinedState {
    pub fn new(site: Site) -> Self {
        Self {
            state: EditorState::new(site),
        }
    }

    pub fn with_history_limit(site: Site, history_limit: usize) -> Self {
        Self {
            state: EditorState::with_history_limit(site, history_limit),
        }
    }

    pub fn site(&self) -> &Site {
        self.state.history.present()
    }

    pub fn selected_page_id(&self) -> &str {
        &self.state.selected_page
    }

    /// The selected page, `None` when `selected_page` names no page
    pub fn current_page(&self) -> Option<&Page> {
        self.site().page(&self.state.selected_page)
    }

    pub fn selected_element(&self) -> Option<&Element> {
        let id = self.state.selected_element.as_deref()?;
        self.current_page()?.element(id)
    }
}

impl Default for CombinedState {
    fn default() -> Self {
        Self::new(Site::default())
    }
}
