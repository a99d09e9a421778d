pub mod dom;
mod shell;
mod view;

pub use dom::{to_html, Element, Node};
pub use shell::{Shell, SELECTOR_MOUNT, VIEWER_MOUNT};
pub use view::{
    position_text, render, render_view, resolve_image, LinkMode, ListStyle, Regions, RenderOptions,
    View,
    LOAD_FAILED_TITLE, NO_GAMES_TITLE,
};
