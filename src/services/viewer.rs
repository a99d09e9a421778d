use crate::domain::RawPayload;
use crate::error::{DevlogError, Result};
use crate::infrastructure::FeedClient;
use crate::render::{render_view, RenderOptions, Shell, View};
use crate::services::normalize::normalize;
use crate::services::session::Session;
use tracing::{error, info, warn};

/// Outcome of loading the feed. Only `Ready` accepts commands.
#[derive(Debug, Clone)]
pub enum Viewer {
    Ready(Session),
    Empty,
    Failed,
}

impl Viewer {
    pub fn from_payload(payload: Result<RawPayload>, fragment: Option<&str>) -> Self {
        let payload = match payload {
            Ok(payload) => payload,
            Err(e) => {
                error!("Could not load feed: {}", e);
                return Viewer::Failed;
            }
        };

        let games = normalize(&payload);
        info!(
            "Feed normalized: {} games, {} updates",
            games.len(),
            games.iter().map(|g| g.updates.len()).sum::<usize>()
        );

        match Session::start(games, fragment) {
            Ok(session) => Viewer::Ready(session),
            Err(DevlogError::EmptyFeed) => {
                warn!("Feed has no displayable games");
                Viewer::Empty
            }
            Err(e) => {
                error!("Could not start viewer: {}", e);
                Viewer::Failed
            }
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            Viewer::Ready(session) => Some(session),
            _ => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        match self {
            Viewer::Ready(session) => Some(session),
            _ => None,
        }
    }

    pub fn view(&self) -> View<'_> {
        match self {
            Viewer::Ready(session) => session.view(),
            Viewer::Empty => View::Empty,
            Viewer::Failed => View::LoadFailed,
        }
    }
}

/// Loads the feed and renders viewer states into the page shell.
pub struct ViewerService {
    feed: FeedClient,
    shell: Shell,
    options: RenderOptions,
}

impl ViewerService {
    pub fn new(feed: FeedClient, shell: Shell, mut options: RenderOptions) -> Self {
        if options.image_base.is_none() {
            options.image_base = feed.source().base_url().cloned();
        }
        Self {
            feed,
            shell,
            options,
        }
    }

    pub fn feed(&self) -> &FeedClient {
        &self.feed
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Loads the feed once and positions the viewer at `fragment`.
    pub async fn open(&self, fragment: Option<&str>) -> Viewer {
        Viewer::from_payload(self.feed.load().await, fragment)
    }

    /// The full page for the viewer's current state, or `None` when the shell
    /// lacks a mount point.
    pub fn render_page(&self, viewer: &Viewer) -> Option<String> {
        self.render_view(viewer.view())
    }

    pub fn render_view(&self, view: View<'_>) -> Option<String> {
        self.render_view_with(view, &self.options)
    }

    /// Like `render_view`, with options other than the service's own.
    pub fn render_view_with(&self, view: View<'_>, options: &RenderOptions) -> Option<String> {
        if !self.shell.has_mount_points() {
            return None;
        }
        self.shell.mount(&render_view(view, options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::navigation::Navigation;
    use serde_json::json;

    #[test]
    fn load_errors_become_failed_view() {
        let viewer = Viewer::from_payload(Err(DevlogError::Other("boom".into())), None);
        assert!(matches!(viewer, Viewer::Failed));
        assert!(matches!(viewer.view(), View::LoadFailed));
    }

    #[test]
    fn empty_feeds_become_empty_view() {
        let viewer = Viewer::from_payload(Ok(json!({ "games": [] })), None);
        assert!(matches!(viewer, Viewer::Empty));
        assert!(viewer.session().is_none());
    }

    #[test]
    fn fragment_positions_ready_viewer() {
        let payload = json!({ "games": [{ "id": "g1", "updates": [{ "id": "u1" }, { "id": "u2" }] }] });
        let mut viewer = Viewer::from_payload(Ok(payload), Some("u2"));
        assert_eq!(viewer.session().unwrap().nav(), Navigation::new(0, 1));
        assert!(viewer.session_mut().is_some());
    }
}
