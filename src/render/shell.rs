use super::dom::to_html;
use super::view::Regions;
use crate::error::{DevlogError, Result};
use regex::Regex;
use std::ops::Range;
use std::path::Path;
use tracing::debug;

pub const SELECTOR_MOUNT: &str = "game-selector";
pub const VIEWER_MOUNT: &str = "devlog-viewer";

const DEFAULT_SHELL: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Dev Logs</title>
  <link rel="stylesheet" href="styles/site.css">
</head>
<body>
  <main class="page">
    <header class="page-header">
      <h1>Dev Logs</h1>
    </header>
    <section class="game-selector" id="game-selector"></section>
    <section class="devlog-viewer" id="devlog-viewer"></section>
  </main>
</body>
</html>
"#;

/// The surrounding page. The viewer only ever writes into its two mount points.
#[derive(Debug, Clone)]
pub struct Shell {
    template: String,
}

impl Default for Shell {
    fn default() -> Self {
        Self::new(DEFAULT_SHELL)
    }
}

impl Shell {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub async fn from_file(path: &Path) -> Result<Self> {
        Ok(Self::new(tokio::fs::read_to_string(path).await?))
    }

    pub fn has_mount_points(&self) -> bool {
        self.check_mounts().is_ok()
    }

    /// Fails with the first mount point the template lacks.
    pub fn check_mounts(&self) -> Result<()> {
        for id in [SELECTOR_MOUNT, VIEWER_MOUNT] {
            if content_range(&self.template, id).is_none() {
                return Err(DevlogError::MissingMount(id));
            }
        }
        Ok(())
    }

    /// Replaces the children of both mount points. Returns `None` and leaves the
    /// page untouched when either mount point is missing.
    pub fn mount(&self, regions: &Regions) -> Option<String> {
        if let Err(e) = self.check_mounts() {
            debug!("Skipping render: {}", e);
            return None;
        }

        let page = replace_children(&self.template, SELECTOR_MOUNT, &to_html(&regions.selector))?;
        replace_children(&page, VIEWER_MOUNT, &to_html(&regions.viewer))
    }
}

fn replace_children(html: &str, id: &str, content: &str) -> Option<String> {
    let range = content_range(html, id)?;
    let mut out = String::with_capacity(html.len() + content.len());
    out.push_str(&html[..range.start]);
    out.push_str(content);
    out.push_str(&html[range.end..]);
    Some(out)
}

/// Byte range between the opening and matching closing tag of the element with `id`.
fn content_range(html: &str, id: &str) -> Option<Range<usize>> {
    let open = Regex::new(&format!(
        r#"<([A-Za-z][A-Za-z0-9-]*)\b[^>]*[\s"']id\s*=\s*["']{}["'][^>]*>"#,
        regex::escape(id)
    ))
    .ok()?;
    let captures = open.captures(html)?;
    let tag = captures.get(1)?.as_str();
    let start = captures.get(0)?.end();

    let tags = Regex::new(&format!(r"(?i)<(/?){}\b[^>]*>", regex::escape(tag))).ok()?;
    let mut depth = 1usize;
    for m in tags.captures_iter(&html[start..]) {
        let whole = m.get(0)?;
        if m.get(1).is_some_and(|slash| !slash.as_str().is_empty()) {
            depth -= 1;
            if depth == 0 {
                return Some(start..start + whole.start());
            }
        } else if !whole.as_str().ends_with("/>") {
            depth += 1;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::dom::{Element, Node};

    fn regions(selector: &str, viewer: &str) -> Regions {
        Regions {
            selector: vec![Node::text(selector)],
            viewer: vec![Element::new("p").text(viewer).into()],
        }
    }

    #[test]
    fn default_shell_mounts_both_regions() {
        let page = Shell::default().mount(&regions("games", "entry")).unwrap();
        assert!(page.contains(r#"id="game-selector">games</section>"#));
        assert!(page.contains(r#"id="devlog-viewer"><p>entry</p></section>"#));
        assert!(page.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn existing_children_are_replaced() {
        let shell = Shell::new(
            r#"<div id="game-selector"><div><span>old</span></div></div><main><div data-x='1' id='devlog-viewer'>Loading...</div></main>"#,
        );
        let page = shell.mount(&regions("new", "body")).unwrap();
        assert_eq!(
            page,
            r#"<div id="game-selector">new</div><main><div data-x='1' id='devlog-viewer'><p>body</p></div></main>"#
        );
    }

    #[test]
    fn missing_mount_point_does_nothing() {
        let shell = Shell::new(r#"<div id="game-selector"></div>"#);
        assert!(!shell.has_mount_points());
        assert!(matches!(
            shell.check_mounts(),
            Err(DevlogError::MissingMount(VIEWER_MOUNT))
        ));
        assert_eq!(shell.mount(&regions("a", "b")), None);
    }

    #[test]
    fn unclosed_mount_point_is_missing() {
        let shell = Shell::new(r#"<div id="game-selector"></div><div id="devlog-viewer">"#);
        assert_eq!(shell.mount(&regions("a", "b")), None);
    }

    #[test]
    fn similar_ids_do_not_match() {
        let shell = Shell::new(
            r#"<div id="game-selector-old"></div><div id="devlog-viewer"></div>"#,
        );
        assert!(!shell.has_mount_points());
    }

    #[test]
    fn data_id_attributes_are_not_mount_points() {
        let shell = Shell::new(
            r#"<p data-id="game-selector">keep</p><div id="game-selector"></div><div id="devlog-viewer"></div>"#,
        );
        let page = shell.mount(&regions("games", "entry")).unwrap();
        assert!(page.starts_with(r#"<p data-id="game-selector">keep</p><div id="game-selector">games</div>"#));
    }
}
