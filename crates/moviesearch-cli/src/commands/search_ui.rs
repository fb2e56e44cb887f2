use crate::output::Output;
use indicatif::{ProgressBar, ProgressStyle};
use movie_search_core::view_models::{MoviesListViewModel, MoviesListViewModelLoading};
use std::io::IsTerminal;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Spinner that mirrors a list view-model's `loading` output
pub struct SearchUI {
    current: Arc<Mutex<Option<ProgressBar>>>,
    interactive: bool,
}

impl SearchUI {
    pub fn new(output: &Output) -> Self {
        let interactive = is_interactive() && output.is_human() && !output.is_quiet();

        if !interactive {
            tracing::debug!(
                operation = "ui_init",
                mode = "non_interactive",
                "Running in non-interactive mode - spinner disabled, using structured logging"
            );
        }

        Self {
            current: Arc::new(Mutex::new(None)),
            interactive,
        }
    }

    pub fn attach(&self, view_model: &mut MoviesListViewModel) {
        let current = Arc::clone(&self.current);
        let interactive = self.interactive;

        view_model.loading.observe(move |loading| {
            let Ok(mut slot) = current.lock() else {
                return;
            };
            match loading {
                Some(kind) => {
                    let msg = loading_message(*kind);
                    if interactive {
                        slot.get_or_insert_with(new_spinner).set_message(msg);
                    } else {
                        tracing::info!(operation = "progress", message = msg, "Progress update");
                    }
                }
                None => {
                    if let Some(spinner) = slot.take() {
                        spinner.finish_and_clear();
                    }
                }
            }
        });
    }

    /// Spinner for work that is not driven by a view-model
    pub fn start(&self, msg: String) -> Option<ProgressBar> {
        if !self.interactive {
            tracing::info!(operation = "progress", message = %msg, "Progress update");
            return None;
        }
        let spinner = new_spinner();
        spinner.set_message(msg);
        Some(spinner)
    }
}

/// Collects every non-empty message the view-model publishes on `error`
pub struct ErrorMessages {
    rx: mpsc::Receiver<String>,
}

impl ErrorMessages {
    pub fn attach(view_model: &mut MoviesListViewModel) -> Self {
        let (tx, rx) = mpsc::channel();
        view_model.error.observe(move |message: &String| {
            if !message.is_empty() {
                let _ = tx.send(message.clone());
            }
        });
        Self { rx }
    }

    pub fn drain(&self) -> Vec<String> {
        self.rx.try_iter().collect()
    }
}

/// Wait for the running load; Ctrl-C cancels it. Returns false when interrupted.
pub async fn wait_for_results(view_model: &mut MoviesListViewModel) -> bool {
    let interrupted = tokio::select! {
        _ = view_model.wait_for_load() => false,
        _ = tokio::signal::ctrl_c() => true,
    };
    if interrupted {
        view_model.did_cancel_search();
    }
    !interrupted
}

fn loading_message(loading: MoviesListViewModelLoading) -> &'static str {
    match loading {
        MoviesListViewModelLoading::FullScreen => "Searching...",
        MoviesListViewModelLoading::NextPage => "Loading more results...",
    }
}

fn new_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

pub fn is_interactive() -> bool {
    std::io::stdout().is_terminal() && std::io::stderr().is_terminal()
}
