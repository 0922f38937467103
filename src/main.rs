mod config;

use std::fs::File;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use crumbscope_crumbs::{BreadcrumbStore, EventParser, ParsedEvent};
use crumbscope_repos::{
    Access, AnyClient, ChannelNotifier, CustomRepositories, FileApiClient, HttpApiClient,
    Notification, PersistOutcome, Project, ProjectStore, RepoError,
};
use crumbscope_tui::{
    Action, AppState, BreadcrumbsScreen, Event, EventHandler, HelpOverlay, KeyBindings,
    RepoCommand, RepositoriesScreen, Screen, Toasts, Tui,
};

use config::Config;

type Manager = CustomRepositories<AnyClient, ChannelNotifier>;

/// crumbscope - browse event breadcrumbs and manage custom debug-file repositories
#[derive(Parser, Debug)]
#[command(name = "crumbscope")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Event JSON file whose breadcrumbs to show
    #[arg(value_name = "EVENT_FILE")]
    event_file: Option<PathBuf>,

    /// Config file (defaults to crumbscope.toml when present)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Show breadcrumb times relative to the event
    #[arg(long)]
    relative_time: bool,

    /// Initial breadcrumb search term
    #[arg(long, value_name = "TERM")]
    search: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(args.log_file.as_deref())?;

    let result = run_app(args).await;

    if let Err(e) = &result {
        eprintln!("Error: {:#}", e);
    }

    result
}

fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into());

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    Ok(())
}

/// Results of background work, delivered back to the UI loop
enum InternalAction {
    Loaded(Result<Project, RepoError>),
    Persisted(Result<PersistOutcome, RepoError>),
}

fn load_event(path: Option<&Path>) -> Result<ParsedEvent> {
    let Some(path) = path else {
        return Ok(ParsedEvent::default());
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read event file {}", path.display()))?;
    let parsed = EventParser::parse(&text)
        .with_context(|| format!("failed to parse event file {}", path.display()))?;

    if parsed.skipped > 0 {
        tracing::warn!(skipped = parsed.skipped, "some breadcrumbs could not be read");
    }
    Ok(parsed)
}

fn build_client(config: &Config) -> Result<AnyClient> {
    let client = match &config.api.base_url {
        Some(base_url) => AnyClient::Http(
            HttpApiClient::new(base_url.clone(), config.api.token.clone())
                .context("failed to build HTTP client")?,
        ),
        None => AnyClient::File(FileApiClient::new(config.api.project_file.clone())),
    };
    Ok(client)
}

async fn run_app(args: Args) -> Result<()> {
    let config = Config::load(args.config.as_deref())?;
    let event = load_event(args.event_file.as_deref())?;

    // Create channels
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (internal_tx, mut internal_rx) = mpsc::unbounded_channel::<InternalAction>();
    let (notify_tx, mut notify_rx) = mpsc::unbounded_channel::<Notification>();

    let manager: Manager = CustomRepositories::new(
        Arc::new(build_client(&config)?),
        Arc::new(ChannelNotifier::new(notify_tx)),
        ProjectStore::default(),
        config.api.organization.clone(),
        config.api.project.clone(),
    );

    // Initialize state
    let access = Access::new(config.access.features.clone(), config.access.scopes.clone());
    let mut state = AppState::new(
        BreadcrumbStore::new(event.breadcrumbs),
        event.snapshot,
        access,
    );
    state.project = config.api.project.clone();
    state.relative_time = args.relative_time || config.ui.relative_time;
    if let Some(term) = &args.search {
        state.filter.set_search_term(term);
    }

    spawn_load(&manager, &internal_tx);

    let mut tui = Tui::new()?;
    let mut events = EventHandler::new(Duration::from_millis(config.ui.tick_rate_ms.max(10)));
    let keybindings = KeyBindings::new();

    // Initial render
    render(&mut tui, &mut state)?;

    // Main event loop
    loop {
        tokio::select! {
            // Handle terminal events
            Some(event) = events.next() => {
                match event {
                    Event::Key(key) => {
                        state.render_dirty = true;
                        if state.show_help {
                            // Any key closes the help overlay
                            state.show_help = false;
                        } else {
                            state.dismiss_error();
                            if let Some(action) = keybindings.get_action(state.key_context(), &key) {
                                let _ = action_tx.send(action);
                            }
                        }
                    }
                    Event::Paste(text) => state.paste(&text),
                    Event::Tick => {
                        let _ = action_tx.send(Action::Tick);
                    }
                    Event::Resize(_, _) => {
                        let _ = action_tx.send(Action::Render);
                    }
                    Event::Error(e) => {
                        tracing::warn!(error = %e, "terminal input error");
                        state.show_error(e);
                    }
                }
            }

            // Handle user actions
            Some(action) = action_rx.recv() => {
                if let Some(command) = state.update(action) {
                    handle_command(&mut state, &manager, &internal_tx, command);
                }
            }

            // Notifications from the repository manager
            Some(notification) = notify_rx.recv() => {
                let _ = action_tx.send(Action::Notify(notification));
            }

            // Handle internal async results
            Some(internal) = internal_rx.recv() => {
                handle_internal(&mut state, &manager, &internal_tx, internal);
            }
        }

        if state.should_quit {
            break;
        }

        if state.render_dirty {
            render(&mut tui, &mut state)?;
        }
    }

    // Cleanup
    events.shutdown().await;
    tui.restore()?;

    Ok(())
}

fn handle_command(
    state: &mut AppState,
    manager: &Manager,
    internal_tx: &mpsc::UnboundedSender<InternalAction>,
    command: RepoCommand,
) {
    match command {
        RepoCommand::Add(repository) => {
            let manager = manager.clone();
            spawn_persist(internal_tx, async move { manager.add(repository).await });
        }
        RepoCommand::Update(repository) => {
            manager.close_dialog(&mut state.location);
            let manager = manager.clone();
            spawn_persist(internal_tx, async move { manager.update_by_id(repository).await });
        }
        RepoCommand::Delete(id) => {
            let manager = manager.clone();
            spawn_persist(internal_tx, async move { manager.delete(&id).await });
        }
        RepoCommand::Edit(id) => {
            manager.edit(&mut state.location, &id);
            state.sync_edit_dialog(manager.open_edit_dialog(&state.location));
        }
        RepoCommand::CloseDialog => manager.close_dialog(&mut state.location),
        RepoCommand::Reload => spawn_load(manager, internal_tx),
    }
}

fn handle_internal(
    state: &mut AppState,
    manager: &Manager,
    internal_tx: &mpsc::UnboundedSender<InternalAction>,
    internal: InternalAction,
) {
    match internal {
        InternalAction::Loaded(Ok(project)) => {
            if !project.slug.is_empty() {
                state.project = project.slug;
            }
            state.set_repositories(project.custom_repositories);
            if state.wants_edit_dialog() {
                state.sync_edit_dialog(manager.open_edit_dialog(&state.location));
            }
        }
        InternalAction::Loaded(Err(e)) => {
            tracing::warn!(error = %e, "failed to load project");
            state.loading = false;
            state.show_error(format!("Failed to load project: {}", e));
        }
        InternalAction::Persisted(Ok(outcome)) => {
            state.persist_finished(Ok(()));
            state.set_repositories(manager.repositories());
            if outcome.reload_required {
                // A synced repository went away; start over from the server
                state.dialog = None;
                manager.close_dialog(&mut state.location);
                state.loading = true;
                spawn_load(manager, internal_tx);
            }
        }
        InternalAction::Persisted(Err(e)) => {
            // The notifier already reported it
            state.persist_finished(Err(e.to_string()));
        }
    }
}

fn spawn_load(manager: &Manager, internal_tx: &mpsc::UnboundedSender<InternalAction>) {
    let manager = manager.clone();
    let tx = internal_tx.clone();
    tokio::spawn(async move {
        let result = manager.load().await;
        let _ = tx.send(InternalAction::Loaded(result));
    });
}

/// Run one save on its own task; overlapping saves are not coordinated
fn spawn_persist<F>(internal_tx: &mpsc::UnboundedSender<InternalAction>, save: F)
where
    F: Future<Output = Result<PersistOutcome, RepoError>> + Send + 'static,
{
    let tx = internal_tx.clone();
    tokio::spawn(async move {
        let _ = tx.send(InternalAction::Persisted(save.await));
    });
}

fn render(tui: &mut Tui, state: &mut AppState) -> Result<()> {
    tui.draw(|frame| {
        match state.current_screen {
            Screen::Breadcrumbs => BreadcrumbsScreen::render(frame, state),
            Screen::Repositories => RepositoriesScreen::render(frame, state),
        }

        Toasts::render(frame, state);

        if state.show_help {
            HelpOverlay::render(frame, state.current_screen);
        }
    })?;
    state.render_dirty = false;
    Ok(())
}
