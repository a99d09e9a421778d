use devlog::config::cli::Command as CliCommand;
use devlog::config::Config;
use devlog::domain::Storage;
use devlog::error::Result;
use devlog::infrastructure::FileSystemStore;
use devlog::render::{position_text, render_view, to_html};
use devlog::services::publish::PublishService;
use devlog::{Command, ViewerService};
use serde_json::json;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn, Level};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::new()?;

    tracing_subscriber::fmt()
        .with_max_level(Level::from_str(&config.args.log_level).unwrap_or(Level::INFO))
        .with_writer(std::io::stderr)
        .init();

    let service = config.viewer_service().await?;

    match &config.args.command {
        CliCommand::Render { fragment, output } => {
            render(&service, fragment.as_deref(), output.as_ref()).await?
        }
        CliCommand::Browse { fragment, html } => browse(&service, fragment.as_deref(), *html).await?,
        CliCommand::Publish { out_dir } => {
            let viewer = service.open(None).await;
            let store: Arc<dyn Storage> = Arc::new(FileSystemStore::new(out_dir.clone()));
            let report = PublishService::new(store).publish(&service, &viewer)?;
            info!(
                "Published {} pages and {} images to {:?} ({} missing images)",
                report.pages, report.images, out_dir, report.missing_images
            );
        }
        CliCommand::Check => check(&service).await?,
    }

    Ok(())
}

async fn render(service: &ViewerService, fragment: Option<&str>, output: Option<&PathBuf>) -> Result<()> {
    let viewer = service.open(fragment).await;
    let Some(page) = service.render_page(&viewer) else {
        warn!("Page shell has no mount points; nothing rendered");
        return Ok(());
    };

    match output {
        Some(path) => {
            tokio::fs::write(path, page).await?;
            info!("Wrote page to {:?}", path);
        }
        None => println!("{}", page),
    }
    Ok(())
}

async fn browse(service: &ViewerService, fragment: Option<&str>, html: bool) -> Result<()> {
    let mut viewer = service.open(fragment).await;
    if viewer.session().is_none() {
        let regions = render_view(viewer.view(), service.options());
        let notice: Vec<String> = regions.viewer.iter().map(|n| n.text_content()).collect();
        println!("{}", notice.join("\n"));
        return Ok(());
    }
    let Some(session) = viewer.session_mut() else {
        return Ok(());
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let nav = session.nav();
        let game = session.current_game();
        println!(
            "#{} {} {} ({})",
            nav.fragment(session.games()).unwrap_or_default(),
            game.name,
            game.updates[nav.update].version,
            position_text(nav.update, game.updates.len())
        );
        if html {
            println!("{}", to_html(&render_view(session.view(), service.options()).viewer));
        }

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if matches!(line.trim(), "quit" | "q" | "exit") {
            break;
        }
        match Command::parse(&line) {
            Some(command) => {
                if let Some(fragment) = session.dispatch(command) {
                    info!("Fragment is now #{}", fragment);
                }
            }
            None => error!("Unknown command: {}", line.trim()),
        }
    }
    Ok(())
}

async fn check(service: &ViewerService) -> Result<()> {
    let payload = service.feed().load().await?;
    let games = devlog::normalize(&payload);
    let summary = json!({
        "source": service.feed().source().to_string(),
        "games": games.iter().map(|g| json!({
            "id": g.id,
            "name": g.name,
            "updates": g.updates.iter().map(|u| u.id.as_str()).collect::<Vec<_>>(),
        })).collect::<Vec<_>>(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
