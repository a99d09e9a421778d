use serde::{Deserialize, Serialize};

/// A named content stream with its updates, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tag: String,
    pub updates: Vec<Update>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Update {
    pub id: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub date: String,
    /// Title carried over from older feed shapes.
    #[serde(skip_serializing_if = "Option::is_none", rename = "title")]
    pub headline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_alt: Option<String>,
    pub is_new: bool,
    pub contents: Sections,
    #[serde(default)]
    pub footnotes: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKey {
    New,
    Changes,
    Bugs,
    Removals,
    Misc,
}

impl SectionKey {
    pub const ALL: [SectionKey; 5] = [
        SectionKey::New,
        SectionKey::Changes,
        SectionKey::Bugs,
        SectionKey::Removals,
        SectionKey::Misc,
    ];

    /// Field name used in feed documents.
    pub fn as_str(self) -> &'static str {
        match self {
            SectionKey::New => "new",
            SectionKey::Changes => "changes",
            SectionKey::Bugs => "bugs",
            SectionKey::Removals => "removals",
            SectionKey::Misc => "misc",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SectionKey::New => "New",
            SectionKey::Changes => "Changes",
            SectionKey::Bugs => "Bug Fixes",
            SectionKey::Removals => "Removals",
            SectionKey::Misc => "Misc",
        }
    }
}

/// Changelog text of an update. Every key is always present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sections {
    pub new: Vec<String>,
    pub changes: Vec<String>,
    pub bugs: Vec<String>,
    pub removals: Vec<String>,
    pub misc: Vec<String>,
}

impl Sections {
    pub fn get(&self, key: SectionKey) -> &[String] {
        match key {
            SectionKey::New => &self.new,
            SectionKey::Changes => &self.changes,
            SectionKey::Bugs => &self.bugs,
            SectionKey::Removals => &self.removals,
            SectionKey::Misc => &self.misc,
        }
    }

    pub fn get_mut(&mut self, key: SectionKey) -> &mut Vec<String> {
        match key {
            SectionKey::New => &mut self.new,
            SectionKey::Changes => &mut self.changes,
            SectionKey::Bugs => &mut self.bugs,
            SectionKey::Removals => &mut self.removals,
            SectionKey::Misc => &mut self.misc,
        }
    }

    pub fn is_empty(&self) -> bool {
        SectionKey::ALL.iter().all(|&key| self.get(key).is_empty())
    }
}

impl Game {
    pub fn latest(&self) -> Option<&Update> {
        self.updates.first()
    }

    pub fn position_of(&self, update_id: &str) -> Option<usize> {
        self.updates.iter().position(|u| u.id == update_id)
    }
}

impl Update {
    /// Label used in the jump list; `index` is the zero-based position in its game.
    pub fn label(&self, index: usize) -> String {
        if self.version.is_empty() {
            format!("Update {}", index + 1)
        } else {
            self.version.clone()
        }
    }
}
