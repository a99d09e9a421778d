//! Maps every supported feed shape onto the canonical `Game -> Update` model.
//!
//! Normalization never fails. Fields that are missing or of the wrong type fall
//! back to empty defaults, entries that are not objects are skipped, and games
//! left without updates are dropped.

use crate::domain::{FeedShape, Game, RawPayload, SectionKey, Sections, Update};
use crate::utils::{fragment_safe, slugify, split_paragraphs};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::{debug, warn};

pub fn normalize(payload: &RawPayload) -> Vec<Game> {
    let shape = FeedShape::classify(payload);
    debug!("Normalizing {} feed", shape.name());
    let posts = matches!(shape, FeedShape::LegacyPosts(_));

    let games: Vec<Game> = match shape {
        FeedShape::CanonicalGames(entries) => entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| entry.as_object().map(|obj| game_from(obj, index)))
            .collect(),
        FeedShape::LegacyPosts(entries) => entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| entry.as_object().map(|obj| game_from_post(obj, index)))
            .collect(),
        FeedShape::Empty => Vec::new(),
    };

    let mut games: Vec<Game> = games
        .into_iter()
        .filter(|game| {
            if game.updates.is_empty() {
                debug!("Dropping game {} without updates", game.id);
            }
            !game.updates.is_empty()
        })
        .collect();

    dedupe_ids(&mut games, posts);
    games
}

fn game_from(obj: &Map<String, Value>, index: usize) -> Game {
    let name = text_field(obj, "name");
    let id = text_field(obj, "id")
        .map(|id| fragment_safe(&id))
        .filter(|id| !id.is_empty())
        .or_else(|| name.as_deref().map(slugify).filter(|slug| !slug.is_empty()))
        .unwrap_or_else(|| format!("game-{}", index + 1));

    let skeletons: Vec<&Map<String, Value>> = obj
        .get("updates")
        .and_then(Value::as_array)
        .map(|updates| updates.iter().filter_map(Value::as_object).collect())
        .unwrap_or_default();

    let total = skeletons.len();
    let updates = skeletons
        .into_iter()
        .enumerate()
        .map(|(position, update)| update_from(update, &id, position, total))
        .collect();

    Game {
        name: name.unwrap_or_else(|| id.clone()),
        tag: text_field(obj, "tag").unwrap_or_default(),
        id,
        updates,
    }
}

fn update_from(obj: &Map<String, Value>, game_id: &str, position: usize, total: usize) -> Update {
    // Derived ids count from the oldest entry so prepending an update keeps old links.
    let id = text_field(obj, "id")
        .map(|id| fragment_safe(&id))
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| format!("{}-update-{}", game_id, total - position));

    let contents_obj = obj.get("contents").and_then(Value::as_object);

    let mut contents = Sections::default();
    if let Some(contents_obj) = contents_obj {
        for key in SectionKey::ALL {
            *contents.get_mut(key) = paragraphs(contents_obj.get(key.as_str()));
        }
    }

    if contents.is_empty() {
        let legacy = ["content", "summary"]
            .iter()
            .map(|field| paragraphs(obj.get(*field)))
            .find(|p| !p.is_empty());
        if let Some(legacy) = legacy {
            contents.changes = legacy;
        }
    }

    let footnotes = contents_obj
        .and_then(|c| c.get("footnotes"))
        .map(|value| paragraphs(Some(value)))
        .filter(|notes| !notes.is_empty())
        .unwrap_or_else(|| paragraphs(obj.get("footnotes")));

    Update {
        id,
        version: text_field(obj, "version").unwrap_or_default(),
        date: text_field(obj, "date").unwrap_or_default(),
        headline: text_field(obj, "title"),
        image: text_field(obj, "image"),
        image_alt: text_field(obj, "imageAlt"),
        is_new: obj
            .get("isNew")
            .and_then(Value::as_bool)
            .unwrap_or(position == 0),
        contents,
        footnotes,
    }
}

/// Lifts a `posts` entry into a one-update game named after its tag.
fn game_from_post(obj: &Map<String, Value>, index: usize) -> Game {
    let id = text_field(obj, "id")
        .map(|id| fragment_safe(&id))
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| format!("post-{}", index + 1));
    let tag = text_field(obj, "tag").unwrap_or_default();

    let mut contents = Sections::default();
    contents.changes = paragraphs(obj.get("summary"));

    let update = Update {
        id: id.clone(),
        version: String::new(),
        date: text_field(obj, "date").unwrap_or_default(),
        headline: text_field(obj, "title"),
        image: None,
        image_alt: None,
        is_new: obj.get("isNew").and_then(Value::as_bool).unwrap_or(true),
        contents,
        footnotes: Vec::new(),
    };

    Game {
        name: if tag.is_empty() { id.clone() } else { tag.clone() },
        tag,
        id,
        updates: vec![update],
    }
}

/// Accepts a paragraph blob or a list of paragraphs.
fn paragraphs(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(text)) => split_paragraphs(text),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(scalar_text)
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

/// Text of a string or number; anything else counts as absent.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(scalar_text)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Game and update ids share one fragment namespace, so they are deduplicated
/// together. Game ids are claimed first. A lifted post keeps its update on the
/// game's own id.
fn dedupe_ids(games: &mut [Game], posts: bool) {
    let mut seen = HashSet::new();

    for game in games.iter_mut() {
        let unique = unique_id(&game.id, &mut seen);
        if unique != game.id {
            warn!("Duplicate game id {}; using {}", game.id, unique);
            game.id = unique;
        }
    }

    for game in games.iter_mut() {
        if posts {
            for update in game.updates.iter_mut() {
                update.id = game.id.clone();
            }
            continue;
        }

        for update in game.updates.iter_mut() {
            let unique = unique_id(&update.id, &mut seen);
            if unique != update.id {
                warn!("Duplicate update id {}; using {}", update.id, unique);
                update.id = unique;
            }
        }
    }
}

fn unique_id(id: &str, seen: &mut HashSet<String>) -> String {
    let mut candidate = id.to_string();
    let mut suffix = 2;
    while !seen.insert(candidate.clone()) {
        candidate = format!("{}-{}", id, suffix);
        suffix += 1;
    }
    candidate
}
