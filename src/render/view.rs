use super::dom::{Element, Node};
use crate::domain::{Game, SectionKey, Update};
use crate::services::navigation::Navigation;
use reqwest::Url;
use std::collections::HashMap;

/// Presentation of multi-paragraph sections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListStyle {
    #[default]
    Lines,
    Bullets,
}

/// Where navigation controls point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LinkMode {
    /// `#fragment` on the current page.
    #[default]
    Fragment,
    /// One published page per fragment, keyed by fragment.
    Pages(HashMap<String, String>),
}

impl LinkMode {
    pub fn href(&self, fragment: &str) -> String {
        match self {
            LinkMode::Pages(pages) => pages
                .get(fragment)
                .cloned()
                .unwrap_or_else(|| format!("#{}", fragment)),
            LinkMode::Fragment => format!("#{}", fragment),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub list_style: ListStyle,
    /// Base that relative image paths are resolved against.
    pub image_base: Option<Url>,
    pub links: LinkMode,
}

/// What the viewer shows.
#[derive(Debug, Clone, Copy)]
pub enum View<'a> {
    Loaded { games: &'a [Game], nav: Navigation },
    Empty,
    LoadFailed,
}

/// Contents for the two mount points of the page shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Regions {
    pub selector: Vec<Node>,
    pub viewer: Vec<Node>,
}

pub const NO_GAMES_TITLE: &str = "No dev logs yet";
pub const LOAD_FAILED_TITLE: &str = "Could not load dev logs";
const EMPTY_CELL: &str = "—";

pub fn render_view(view: View<'_>, options: &RenderOptions) -> Regions {
    match view {
        View::Loaded { games, nav } if nav.is_valid(games) => render(games, nav, options),
        View::Loaded { .. } | View::Empty => notice(
            NO_GAMES_TITLE,
            "Add the first game to the feed and it will appear here automatically.",
        ),
        View::LoadFailed => notice(
            LOAD_FAILED_TITLE,
            "Check that the feed exists and is being served by your host.",
        ),
    }
}

/// Renders the selector and the current update. `nav` must be valid for `games`.
pub fn render(games: &[Game], nav: Navigation, options: &RenderOptions) -> Regions {
    let game = &games[nav.game];
    let update = &game.updates[nav.update];

    let selector: Vec<Node> = games
        .iter()
        .enumerate()
        .map(|(index, g)| {
            control("game-button", &g.id, &options.links)
                .attr("aria-pressed", pressed(index == nav.game))
                .text(g.name.clone())
                .into()
        })
        .collect();

    let mut article = Element::new("article")
        .class("card devlog-entry")
        .attr("id", update.id.clone());

    if let Some(badges) = badges(game, update) {
        article = article.child(badges);
    }
    article = article.child(Element::new("h2").text(heading(game, update)));
    if let Some(meta) = meta_line(update) {
        article = article.child(meta);
    }
    article = article
        .child(update_nav(games, game, nav, &options.links))
        .child(jump_list(game, nav, &options.links));
    if let Some(image) = image(game, update, options) {
        article = article.child(image);
    }
    article = article.child(content_table(update, options.list_style));

    Regions {
        selector,
        viewer: vec![article.into()],
    }
}

/// A link styled as a button that moves the viewer to `fragment`.
fn control(class: &str, fragment: &str, links: &LinkMode) -> Element {
    Element::new("a")
        .attr("role", "button")
        .class(class)
        .attr("href", links.href(fragment))
        .attr("data-fragment", fragment)
}

fn pressed(on: bool) -> &'static str {
    if on {
        "true"
    } else {
        "false"
    }
}

fn badges(game: &Game, update: &Update) -> Option<Element> {
    let mut pills: Vec<Node> = Vec::new();
    if !game.tag.is_empty() {
        pills.push(Element::new("span").class("pill").text(game.tag.clone()).into());
    }
    if update.is_new {
        pills.push(Element::new("span").class("pill pill-new").text("NEW").into());
    }
    if pills.is_empty() {
        return None;
    }
    Some(Element::new("div").class("devlog-badges").children(pills))
}

fn heading(game: &Game, update: &Update) -> String {
    if update.version.is_empty() {
        game.name.clone()
    } else {
        format!("{} {}", game.name, update.version)
    }
}

fn meta_line(update: &Update) -> Option<Element> {
    let parts: Vec<&str> = [Some(update.date.as_str()), update.headline.as_deref()]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(Element::new("p").class("devlog-meta").text(parts.join(" · ")))
}

fn update_nav(games: &[Game], game: &Game, nav: Navigation, links: &LinkMode) -> Element {
    let older = nav.advance(games);
    let newer = nav.retreat();

    Element::new("nav")
        .class("devlog-nav")
        .child(nav_control("devlog-prev", "Previous update", game, older, nav, links))
        .child(
            Element::new("span")
                .class("devlog-position")
                .text(position_text(nav.update, game.updates.len())),
        )
        .child(nav_control("devlog-next", "Newer update", game, newer, nav, links))
}

fn nav_control(
    class: &str,
    label: &str,
    game: &Game,
    target: Navigation,
    from: Navigation,
    links: &LinkMode,
) -> Element {
    if target == from {
        return Element::new("a")
            .attr("role", "button")
            .class(class)
            .attr("aria-disabled", "true")
            .text(label);
    }
    control(class, &game.updates[target.update].id, links).text(label)
}

pub fn position_text(index: usize, total: usize) -> String {
    format!("Update {} of {}", index + 1, total)
}

fn jump_list(game: &Game, nav: Navigation, links: &LinkMode) -> Element {
    let buttons = game.updates.iter().enumerate().map(|(index, update)| {
        control("devlog-jump-button", &update.id, links)
            .attr("aria-pressed", pressed(index == nav.update))
            .text(update.label(index))
            .into()
    });
    Element::new("div").class("devlog-jump").children(buttons)
}

fn image(game: &Game, update: &Update, options: &RenderOptions) -> Option<Element> {
    let src = resolve_image(update.image.as_deref()?, options.image_base.as_ref())?;
    let alt = update
        .image_alt
        .clone()
        .unwrap_or_else(|| format!("{} screenshot", heading(game, update)));

    Some(
        Element::new("img")
            .class("devlog-image")
            .attr("src", src)
            .attr("alt", alt)
            .attr("loading", "lazy")
            .attr("onerror", "this.remove()"),
    )
}

/// Resolves an image path to an http(s) URL, or a relative path when there is no base.
pub fn resolve_image(path: &str, base: Option<&Url>) -> Option<String> {
    let path = path.trim();
    if path.is_empty() {
        return None;
    }

    match Url::parse(path) {
        Ok(url) => matches!(url.scheme(), "http" | "https").then(|| url.to_string()),
        Err(_) => match base {
            Some(base) => base.join(path).ok().map(|url| url.to_string()),
            None if path.contains(':') && !path.starts_with('/') && !path.starts_with('.') => None,
            None => Some(path.to_string()),
        },
    }
}

fn content_table(update: &Update, style: ListStyle) -> Element {
    let rows = SectionKey::ALL
        .iter()
        .map(|&key| (key.as_str(), key.label(), update.contents.get(key)))
        .chain(std::iter::once(("footnotes", "Footnotes", update.footnotes.as_slice())))
        .map(|(key, label, lines)| {
            Element::new("tr")
                .attr("data-section", key)
                .child(Element::new("th").attr("scope", "row").text(label))
                .child(Element::new("td").children(cell(lines, style)))
                .into()
        });

    Element::new("table")
        .class("devlog-table")
        .child(Element::new("tbody").children(rows))
}

fn cell(lines: &[String], style: ListStyle) -> Vec<Node> {
    match (lines.len(), style) {
        (0, _) => vec![Node::text(EMPTY_CELL)],
        (n, ListStyle::Bullets) if n > 1 => {
            let items = lines
                .iter()
                .map(|line| Element::new("li").text(line.clone()).into());
            vec![Element::new("ul").children(items).into()]
        }
        _ => lines
            .iter()
            .map(|line| Element::new("div").class("line").text(line.clone()).into())
            .collect(),
    }
}

fn notice(title: &str, body: &str) -> Regions {
    let card = |id: &str| -> Vec<Node> {
        vec![Element::new("article")
            .class("card devlog-notice")
            .attr("data-notice", id)
            .child(Element::new("h2").text(title))
            .child(Element::new("p").text(body))
            .into()]
    };
    Regions {
        selector: card("selector"),
        viewer: card("viewer"),
    }
}
