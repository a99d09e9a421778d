//! Devlog viewer: loads a changelog feed for several games, normalizes its
//! historical shapes into one model, tracks which update is shown through the
//! URL fragment, and renders the viewer into a page shell.

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod render;
pub mod services;
pub mod utils;

pub use domain::{Game, SectionKey, Sections, Update};
pub use error::{DevlogError, Result};
pub use render::{LinkMode, ListStyle, Regions, RenderOptions, Shell, View};
pub use services::navigation::Navigation;
pub use services::normalize::normalize;
pub use services::session::{Command, Session};
pub use services::viewer::{Viewer, ViewerService};
