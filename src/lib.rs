//! Sortable, paginated terminal table of country records.
//!
//! The view state and the presentation derived from it are independent of
//! the terminal. `ui` binds the presentation to ratatui widgets.

pub mod compare;
pub mod controller;
pub mod dispatcher;
pub mod domain;
pub mod loader;
pub mod model;
pub mod pagination;
pub mod presentation;
pub mod record;
pub mod ui;
pub mod view_state;
