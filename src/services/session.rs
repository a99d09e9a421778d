use crate::domain::Game;
use crate::error::{DevlogError, Result};
use crate::render::View;
use crate::services::navigation::Navigation;
use tracing::debug;

/// UI events the viewer reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// The page fragment changed, e.g. through a shared link or history navigation.
    FragmentChanged(String),
    SelectGame(usize),
    SelectUpdate(usize),
    /// "Previous update": one step towards older entries.
    Older,
    /// "Newer update": one step towards the latest entry.
    Newer,
}

impl Command {
    /// Parses a line typed into `browse`. Game and update numbers are 1-based.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let mut words = line.split_whitespace();
        let command = match (words.next()?, words.next()) {
            ("older" | "prev" | "p", None) => Command::Older,
            ("newer" | "next" | "n", None) => Command::Newer,
            ("game" | "g", Some(n)) => Command::SelectGame(n.parse::<usize>().ok()?.checked_sub(1)?),
            ("update" | "u", Some(n)) => {
                Command::SelectUpdate(n.parse::<usize>().ok()?.checked_sub(1)?)
            }
            (fragment, None) if fragment.starts_with('#') => {
                Command::FragmentChanged(fragment.to_string())
            }
            _ => return None,
        };
        if words.next().is_some() {
            return None;
        }
        Some(command)
    }
}

/// Loaded games plus the one piece of mutable state, the navigation position.
#[derive(Debug, Clone)]
pub struct Session {
    games: Vec<Game>,
    nav: Navigation,
}

impl Session {
    pub fn new(games: Vec<Game>) -> Result<Self> {
        if games.is_empty() || games.iter().any(|g| g.updates.is_empty()) {
            return Err(DevlogError::EmptyFeed);
        }
        Ok(Self {
            games,
            nav: Navigation::default(),
        })
    }

    /// Starts at the latest update of the first game, then applies `fragment`.
    pub fn start(games: Vec<Game>, fragment: Option<&str>) -> Result<Self> {
        let mut session = Self::new(games)?;
        if let Some(fragment) = fragment {
            session.dispatch(Command::FragmentChanged(fragment.to_string()));
        }
        Ok(session)
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn nav(&self) -> Navigation {
        self.nav
    }

    pub fn current_game(&self) -> &Game {
        &self.games[self.nav.game]
    }

    /// Applies `command` and returns the fragment the page should now show.
    /// Fragment changes themselves publish nothing.
    pub fn dispatch(&mut self, command: Command) -> Option<String> {
        let games = self.games.as_slice();
        let (next, publish) = match command {
            Command::FragmentChanged(fragment) => {
                (self.nav.select_from_fragment(games, &fragment), false)
            }
            Command::SelectGame(index) => {
                let next = self.nav.select_game(games, index);
                self.nav = next;
                return next.game_fragment(games).map(str::to_string);
            }
            Command::SelectUpdate(index) => (self.nav.select_update(games, index), true),
            Command::Older => (self.nav.advance(games), true),
            Command::Newer => (self.nav.retreat(), true),
        };

        if next != self.nav {
            debug!("Navigation {:?} -> {:?}", self.nav, next);
        }
        self.nav = next;

        if publish {
            self.nav.fragment(&self.games).map(str::to_string)
        } else {
            None
        }
    }

    pub fn view(&self) -> View<'_> {
        View::Loaded {
            games: &self.games,
            nav: self.nav,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::navigation::tests::game;

    fn session() -> Session {
        Session::new(vec![game("g1", &["u1", "u2"]), game("g2", &["v1"])]).unwrap()
    }

    #[test]
    fn empty_feed_has_no_session() {
        assert!(matches!(Session::new(Vec::new()), Err(DevlogError::EmptyFeed)));
        assert!(matches!(
            Session::new(vec![game("g", &[])]),
            Err(DevlogError::EmptyFeed)
        ));
    }

    #[test]
    fn starts_at_fragment_or_default() {
        let games = vec![game("g1", &["u1", "u2"]), game("g2", &["v1"])];
        let session = Session::start(games.clone(), Some("#u2")).unwrap();
        assert_eq!(session.nav(), Navigation::new(0, 1));

        let session = Session::start(games, Some("missing")).unwrap();
        assert_eq!(session.nav(), Navigation::new(0, 0));
    }

    #[test]
    fn commands_publish_fragments() {
        let mut session = session();
        assert_eq!(session.dispatch(Command::Older), Some("u2".to_string()));
        assert_eq!(session.dispatch(Command::Older), Some("u2".to_string()));
        assert_eq!(session.dispatch(Command::Newer), Some("u1".to_string()));
        assert_eq!(session.dispatch(Command::SelectGame(1)), Some("g2".to_string()));
        assert_eq!(session.nav(), Navigation::new(1, 0));
        assert_eq!(session.dispatch(Command::SelectUpdate(0)), Some("v1".to_string()));
        assert_eq!(
            session.dispatch(Command::FragmentChanged("u2".to_string())),
            None
        );
        assert_eq!(session.nav(), Navigation::new(0, 1));
        assert_eq!(session.current_game().id, "g1");
    }

    #[test]
    fn parses_browse_input() {
        assert_eq!(Command::parse(" older "), Some(Command::Older));
        assert_eq!(Command::parse("n"), Some(Command::Newer));
        assert_eq!(Command::parse("game 2"), Some(Command::SelectGame(1)));
        assert_eq!(Command::parse("u 1"), Some(Command::SelectUpdate(0)));
        assert_eq!(
            Command::parse("#patch-1"),
            Some(Command::FragmentChanged("#patch-1".to_string()))
        );
        assert_eq!(Command::parse("game 0"), None);
        assert_eq!(Command::parse("game x"), None);
        assert_eq!(Command::parse("older please"), None);
        assert_eq!(Command::parse("dance"), None);
        assert_eq!(Command::parse(""), None);
    }

    #[test]
    fn out_of_range_selection_keeps_state() {
        let mut session = session();
        session.dispatch(Command::Older);
        assert_eq!(session.dispatch(Command::SelectGame(5)), Some("g1".to_string()));
        assert_eq!(session.nav(), Navigation::new(0, 1));
        assert_eq!(session.dispatch(Command::SelectUpdate(9)), Some("u2".to_string()));
    }
}
