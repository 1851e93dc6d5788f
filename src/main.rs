//! Entry point for the **spaceman** daemon.
//!
//! Spawns all configured [`MessageSource`](spaceman::traits::MessageSource)s
//! on background threads and processes incoming messages on the main
//! thread.  The daemon drives a headless desktop: one display, no apps,
//! and every raise/hide/focus request is only logged.  Commands and OS
//! events (forwarded by a platform bridge) arrive on the socket; nothing
//! is sent back over it.

use log::{error, info};
use spaceman::config::Config;
use spaceman::dispatcher::Dispatcher;
use spaceman::events::{EventKind, Message};
use spaceman::integrations;
use spaceman::ipc::listener::UnixSocketListener;
use spaceman::traits::MessageSource;
use spaceman::workspace_manager::WorkspaceManager;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// Default socket path for the message listener.
fn default_socket_path() -> String {
    let runtime = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".into());
    format!("{}/spaceman.sock", runtime)
}

/// Resolve the config directory (`$XDG_CONFIG_HOME/spaceman`).
fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    PathBuf::from(base).join("spaceman")
}

/// Try to load the config from `path`, falling back to compiled-in
/// defaults.
fn load_config(path: &Path) -> Config {
    match Config::load(path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no config file ({}), using defaults", e);
            Config::default()
        }
    }
}

//  Headless desktop

mod headless {
    use log::info;
    use spaceman::geometry::{Point, Rect};
    use spaceman::model::{DisplayInfo, DisplayName, RunningApp, WindowInfo};
    use spaceman::traits::WindowProvider;

    pub const DISPLAY: &str = "Headless";

    /// A single 1920×1080 display with no applications.  Every requested
    /// side effect is logged.
    pub struct HeadlessDesktop;

    #[derive(Debug, thiserror::Error)]
    #[error("headless")]
    pub struct HeadlessError;

    impl WindowProvider for HeadlessDesktop {
        type Error = HeadlessError;

        fn displays(&self) -> Result<Vec<DisplayInfo>, HeadlessError> {
            Ok(vec![DisplayInfo {
                name: DISPLAY.into(),
                frame: Rect::new(0.0, 0.0, 1920.0, 1080.0),
            }])
        }

        fn main_display(&self) -> Result<Option<DisplayName>, HeadlessError> {
            Ok(Some(DISPLAY.into()))
        }

        fn cursor_location(&self) -> Result<Option<Point>, HeadlessError> {
            Ok(Some(Point::new(960.0, 540.0)))
        }

        fn running_apps(&self) -> Result<Vec<RunningApp>, HeadlessError> {
            Ok(Vec::new())
        }

        fn frontmost_app(&self) -> Result<Option<RunningApp>, HeadlessError> {
            Ok(None)
        }

        fn windows(&self, _: &RunningApp) -> Result<Vec<WindowInfo>, HeadlessError> {
            Ok(Vec::new())
        }

        fn raise_app(&self, app: &RunningApp) -> Result<(), HeadlessError> {
            info!("[headless] raise {}", app.identity);
            Ok(())
        }

        fn activate_app(&self, app: &RunningApp) -> Result<(), HeadlessError> {
            info!("[headless] activate {}", app.identity);
            Ok(())
        }

        fn hide_app(&self, app: &RunningApp) -> Result<(), HeadlessError> {
            info!("[headless] hide {}", app.identity);
            Ok(())
        }

        fn focus_window(&self, window: &WindowInfo) -> Result<(), HeadlessError> {
            info!("[headless] focus window {}", window.id);
            Ok(())
        }

        fn warp_cursor(&self, point: Point) -> Result<(), HeadlessError> {
            info!("[headless] warp cursor to ({}, {})", point.x, point.y);
            Ok(())
        }

        fn center_app(&self, app: &RunningApp, display: &str) -> Result<(), HeadlessError> {
            info!("[headless] center {} on {}", app.identity, display);
            Ok(())
        }
    }
}

//  Main

fn main() {
    env_logger::init();

    let config_path = config_dir().join("config.json");
    let config = load_config(&config_path);
    let mut manager = WorkspaceManager::new(headless::HeadlessDesktop, &config);
    info!(
        "profile {} with {} workspace(s) on {}",
        manager.profiles().current_name(),
        manager.workspaces().workspaces().len(),
        headless::DISPLAY
    );

    for (key, cmd) in manager.hot_keys() {
        info!("hot-key {} -> {:?}", key, cmd);
    }

    if let Some(hook) = config.integrations.on_workspace_activated.clone() {
        let events = manager.subscribe(&[EventKind::ActiveWorkspaceChanged]);
        integrations::spawn(hook, events);
    }

    let (msg_tx, msg_rx) = mpsc::channel::<Message>();
    spawn_message_sources(msg_tx);

    Dispatcher::new(manager)
        .with_config_path(config_path)
        .run(msg_rx);
}

//  Helpers

fn spawn_message_sources(tx: mpsc::Sender<Message>) {
    {
        let tx = tx.clone();
        let path = default_socket_path();
        std::thread::spawn(move || {
            let mut source = UnixSocketListener::new(&path);
            if let Err(e) = source.run(tx) {
                error!("socket listener error: {}", e);
            }
        });
    }

    drop(tx);
}
