//! # Siteforge Editor
//!
//! State management for the visual page editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ canvas / palette: drops, reorders, adds     │
//! └─────────────────────────────────────────────┘
//!                     ↓ Action
//! ┌─────────────────────────────────────────────┐
//! │ store: single dispatch entry point          │
//! │  - reducer: (state, action) → state         │
//! │  - history: past / present / future sites   │
//! └─────────────────────────────────────────────┘
//!                     ↓ explicit save
//! ┌─────────────────────────────────────────────┐
//! │ session: document store + publisher         │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use siteforge_editor::{Action, EditorStore, Element, Site};
//!
//! let mut store = EditorStore::new(Site::new("shop"));
//! store.dispatch(Action::AddElement(
//!     Element::new("text-1", "text").with_content("Hello"),
//! ));
//! store.dispatch(Action::Undo);
//! assert!(store.current_page().unwrap().elements.is_empty());
//! ```

mod actions;
mod canvas;
mod errors;
mod history;
mod ids;
mod model;
mod palette;
mod reducer;
mod session;
mod state;
mod store;

pub use actions::Action;
pub use canvas::{Canvas, CanvasView, DropPayload, ElementView, PageView};
pub use errors::EditorError;
pub use history::{History, Snapshot, DEFAULT_MAX_LEVELS};
pub use ids::ElementIdGenerator;
pub use model::{
    Element, ElementKind, ElementPatch, Page, PageSettings, PropMap, Site, SitePatch, StyleMap,
    DEFAULT_SITE_NAME, HOME_PAGE_ID,
};
pub use palette::{Palette, PaletteCategory, PaletteItem};
pub use reducer::{apply, reduce, Ignored, Outcome};
pub use session::{load_or_create_site, load_site, EditSession, Publisher, SaveStatus};
pub use state::{CombinedState, EditorState};
pub use store::EditorStore;
