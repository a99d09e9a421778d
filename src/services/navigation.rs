use crate::domain::Game;
use serde::{Deserialize, Serialize};

/// Which game and which of its updates is on screen.
///
/// Every transition takes the loaded games and returns a new value; invalid
/// targets leave the state as it was. Updates are ordered newest first, so the
/// "older" direction is a higher index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigation {
    pub game: usize,
    pub update: usize,
}

impl Navigation {
    pub fn new(game: usize, update: usize) -> Self {
        Self { game, update }
    }

    /// A game id selects its latest update; an update id selects that update.
    /// Unknown fragments are ignored.
    pub fn select_from_fragment(self, games: &[Game], fragment: &str) -> Self {
        let fragment = fragment.trim().trim_start_matches('#');
        if fragment.is_empty() {
            return self;
        }

        if let Some(game) = games.iter().position(|g| g.id == fragment) {
            return Self::new(game, 0);
        }

        games
            .iter()
            .enumerate()
            .find_map(|(g, game)| game.position_of(fragment).map(|u| Self::new(g, u)))
            .unwrap_or(self)
    }

    pub fn select_game(self, games: &[Game], index: usize) -> Self {
        if index < games.len() {
            Self::new(index, 0)
        } else {
            self
        }
    }

    pub fn select_update(self, games: &[Game], index: usize) -> Self {
        match games.get(self.game) {
            Some(game) if index < game.updates.len() => Self::new(self.game, index),
            _ => self,
        }
    }

    /// Steps to the next older update, if there is one.
    pub fn advance(self, games: &[Game]) -> Self {
        if self.has_older(games) {
            Self::new(self.game, self.update + 1)
        } else {
            self
        }
    }

    /// Steps to the next newer update, if there is one.
    pub fn retreat(self) -> Self {
        if self.has_newer() {
            Self::new(self.game, self.update - 1)
        } else {
            self
        }
    }

    pub fn has_older(&self, games: &[Game]) -> bool {
        games
            .get(self.game)
            .is_some_and(|game| self.update + 1 < game.updates.len())
    }

    pub fn has_newer(&self) -> bool {
        self.update > 0
    }

    pub fn is_valid(&self, games: &[Game]) -> bool {
        games
            .get(self.game)
            .is_some_and(|game| self.update < game.updates.len())
    }

    /// Id of the current update.
    pub fn fragment<'a>(&self, games: &'a [Game]) -> Option<&'a str> {
        games
            .get(self.game)
            .and_then(|game| game.updates.get(self.update))
            .map(|update| update.id.as_str())
    }

    /// Id of the current game.
    pub fn game_fragment<'a>(&self, games: &'a [Game]) -> Option<&'a str> {
        games.get(self.game).map(|game| game.id.as_str())
    }
}
