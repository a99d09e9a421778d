use crate::domain::{Game, Manifest, Storage, StorageKeys};
use crate::error::{DevlogError, Result};
use crate::infrastructure::FeedSource;
use crate::render::{LinkMode, RenderOptions};
use crate::services::session::{Command, Session};
use crate::services::viewer::{Viewer, ViewerService};
use crate::utils::sanitize_filename;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Url;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub pages: usize,
    pub images: usize,
    pub missing_images: usize,
}

/// Writes a static copy of the viewer: one page per addressable fragment, the
/// canonical manifest, and local update images.
pub struct PublishService {
    store: Arc<dyn Storage>,
}

impl PublishService {
    pub fn new(store: Arc<dyn Storage + 'static>) -> Self {
        Self { store }
    }

    pub fn publish(&self, service: &ViewerService, viewer: &Viewer) -> Result<PublishReport> {
        let mut report = PublishReport::default();

        let session = match viewer {
            Viewer::Ready(session) => session,
            _ => {
                let page = service
                    .render_page(viewer)
                    .ok_or_else(|| DevlogError::Other("Page shell has no mount points".into()))?;
                self.store.save_page(StorageKeys::INDEX_PAGE, &page)?;
                report.pages = 1;
                info!("Published placeholder page");
                return Ok(report);
            }
        };

        let mut games = session.games().to_vec();
        if let FeedSource::Local(feed_path) = service.feed().source() {
            let feed_dir = feed_path.parent().unwrap_or_else(|| Path::new(""));
            self.prepare_images(&mut games, feed_dir, &mut report);
        }

        let manifest = Manifest::new(games.clone(), service.feed().source().to_string());
        let manifest_path = self.store.save_manifest(&manifest)?;
        info!("Saved manifest to {:?}", manifest_path);

        let base = Session::new(games)?;
        let pages = page_names(base.games());
        let options = RenderOptions {
            links: LinkMode::Pages(
                pages
                    .iter()
                    .map(|page| (page.fragment.clone(), page.file()))
                    .collect(),
            ),
            ..service.options().clone()
        };

        let pb = ProgressBar::new(pages.len() as u64 + 1);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
                .map_err(|e| DevlogError::Other(e.to_string()))?,
        );

        self.write_page(service, &options, &base, StorageKeys::INDEX_PAGE)?;
        report.pages += 1;
        pb.inc(1);

        for page in &pages {
            pb.set_message(format!("Rendering {}", page.fragment));
            let mut session = base.clone();
            session.dispatch(Command::FragmentChanged(page.fragment.clone()));
            self.write_page(service, &options, &session, &page.stem)?;
            report.pages += 1;
            pb.inc(1);
        }

        pb.finish_with_message("Done rendering pages!");
        Ok(report)
    }

    fn write_page(
        &self,
        service: &ViewerService,
        options: &RenderOptions,
        session: &Session,
        name: &str,
    ) -> Result<PathBuf> {
        let page = service
            .render_view_with(session.view(), options)
            .ok_or_else(|| DevlogError::Other("Page shell has no mount points".into()))?;
        self.store.save_page(name, &page)
    }

    /// Copies relative image paths next to the pages; images that cannot be found
    /// are dropped from their update.
    fn prepare_images(&self, games: &mut [Game], feed_dir: &Path, report: &mut PublishReport) {
        let mut copied: HashMap<PathBuf, String> = HashMap::new();
        let mut names = FileNames::default();

        for update in games.iter_mut().flat_map(|g| g.updates.iter_mut()) {
            let Some(image) = update.image.clone() else {
                continue;
            };
            if Url::parse(&image).is_ok() {
                continue;
            }

            let relative = image.trim_start_matches('/');
            let source = feed_dir.join(relative);
            if let Some(public_path) = copied.get(&source) {
                update.image = Some(public_path.clone());
                continue;
            }

            // Named after the whole relative path so same-named files in
            // different directories stay apart.
            let name = names.claim(&sanitize_filename(relative));
            match self.store.save_image(&source, &name) {
                Ok(public_path) => {
                    copied.insert(source, public_path.clone());
                    update.image = Some(public_path);
                    report.images += 1;
                }
                Err(e) => {
                    warn!("Dropping image {} of update {}: {}", image, update.id, e);
                    update.image = None;
                    report.missing_images += 1;
                }
            }
        }
    }
}

/// A fragment and the page file it is published as.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Page {
    fragment: String,
    stem: String,
}

impl Page {
    fn file(&self) -> String {
        format!("{}.html", self.stem)
    }
}

/// Every game id and update id, each once, in feed order. Ids that would land
/// on the index page or on another id's file get a numbered name instead.
fn page_names(games: &[Game]) -> Vec<Page> {
    let mut seen = HashSet::new();
    let index = format!("{}.html", StorageKeys::INDEX_PAGE);
    let mut names = FileNames::reserving(&[index.as_str()]);

    games
        .iter()
        .flat_map(|game| {
            std::iter::once(game.id.as_str()).chain(game.updates.iter().map(|u| u.id.as_str()))
        })
        .filter(|id| seen.insert(*id))
        .map(|id| {
            let wanted = format!("{}.html", sanitize_filename(id));
            let file = names.claim(&wanted);
            if file != wanted {
                warn!("Page for #{} would overwrite {}; writing {}", id, wanted, file);
            }
            Page {
                fragment: id.to_string(),
                stem: file.strip_suffix(".html").unwrap_or(file.as_str()).to_string(),
            }
        })
        .collect()
}

/// Hands out file names that differ ignoring case, numbering clashes `-2`,
/// `-3`, and so on before the extension.
#[derive(Debug, Default)]
struct FileNames {
    taken: HashSet<String>,
}

impl FileNames {
    fn reserving(names: &[&str]) -> Self {
        Self {
            taken: names.iter().map(|name| name.to_lowercase()).collect(),
        }
    }

    fn claim(&mut self, name: &str) -> String {
        let (stem, extension) = match name.rsplit_once('.') {
            Some((stem, extension)) if !stem.is_empty() => (stem, Some(extension)),
            _ => (name, None),
        };

        let mut candidate = name.to_string();
        let mut suffix = 2;
        while !self.taken.insert(candidate.to_lowercase()) {
            candidate = match extension {
                Some(extension) => format!("{}-{}.{}", stem, suffix, extension),
                None => format!("{}-{}", stem, suffix),
            };
            suffix += 1;
        }
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::navigation::tests::game;

    fn stems(pages: &[Page]) -> Vec<(&str, &str)> {
        pages
            .iter()
            .map(|page| (page.fragment.as_str(), page.stem.as_str()))
            .collect()
    }

    #[test]
    fn pages_cover_games_and_updates_once() {
        let games = vec![game("g1", &["u1", "u2"]), game("p1", &["p1"])];
        assert_eq!(
            stems(&page_names(&games)),
            [("g1", "g1"), ("u1", "u1"), ("u2", "u2"), ("p1", "p1")]
        );
    }

    #[test]
    fn page_names_never_collide() {
        let games = vec![game("g1", &["v1/2", "v1_2", "A:B"]), game("a_b", &["index", "Index"])];
        assert_eq!(
            stems(&page_names(&games)),
            [
                ("g1", "g1"),
                ("v1/2", "v1_2"),
                ("v1_2", "v1_2-2"),
                ("A:B", "A_B"),
                ("a_b", "a_b-2"),
                ("index", "index-2"),
                ("Index", "Index-3"),
            ]
        );
    }

    #[test]
    fn file_names_number_before_extension() {
        let mut names = FileNames::default();
        assert_eq!(names.claim("shots_cover.png"), "shots_cover.png");
        assert_eq!(names.claim("Shots_Cover.png"), "Shots_Cover-2.png");
        assert_eq!(names.claim("shots_cover.png"), "shots_cover-3.png");
        assert_eq!(names.claim("notes"), "notes");
        assert_eq!(names.claim("notes"), "notes-2");
    }
}
