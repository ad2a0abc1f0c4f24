use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::action_executor::FileOpener;
use crate::contract::{LauncherView, ShellCommand, UiKey, UiRequest};
use crate::debounce::{QueryDebouncer, Scheduled};
use crate::model::{ResultSet, SearchResult};
use crate::navigation::{InputFocusEffect, NavigationState, Transition};
use crate::overlay_state::OverlayState;
use crate::preview::{self, PreviewPlan, PreviewResolution, PreviewResolver, PreviewState};
use crate::render::{render_preview, render_row};
use crate::search_gateway::{SearchGateway, SearchOutcome};
use crate::shell::OverlayShell;

/// Result of an asynchronous task, tagged with the input that started it.
#[derive(Debug)]
pub enum Completion {
    Search {
        generation: u64,
        query: String,
        outcome: SearchOutcome,
    },
    Preview {
        result_id: String,
        resolution: PreviewResolution,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

enum Next {
    Request(Option<UiRequest>),
    Completion(Option<Completion>),
}

/// Owns the query, the current result set and navigation state. Input
/// events mutate it directly; async work reports back through `Completion`
/// and is applied only while the input that caused it is still current.
pub struct LauncherController {
    gateway: Arc<SearchGateway>,
    resolver: Arc<PreviewResolver>,
    opener: Arc<dyn FileOpener>,
    shell: Arc<dyn OverlayShell>,
    debouncer: QueryDebouncer,
    query: String,
    results: ResultSet,
    nav: NavigationState,
    overlay: OverlayState,
    preview: Option<(String, PreviewState)>,
    loading: bool,
    search_failed: bool,
    completions_tx: UnboundedSender<Completion>,
    completions_rx: UnboundedReceiver<Completion>,
}

impl LauncherController {
    pub fn new(
        gateway: Arc<SearchGateway>,
        debouncer: QueryDebouncer,
        opener: Arc<dyn FileOpener>,
        shell: Arc<dyn OverlayShell>,
    ) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            resolver: Arc::new(PreviewResolver::new(gateway.clone())),
            gateway,
            opener,
            shell,
            debouncer,
            query: String::new(),
            results: ResultSet::empty(),
            nav: NavigationState::default(),
            overlay: OverlayState::default(),
            preview: None,
            loading: false,
            search_failed: false,
            completions_tx,
            completions_rx,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    pub fn navigation(&self) -> &NavigationState {
        &self.nav
    }

    pub fn is_visible(&self) -> bool {
        self.overlay.is_visible()
    }

    pub fn selected(&self) -> Option<&SearchResult> {
        self.nav
            .focused_index()
            .and_then(|index| self.results.get(index))
    }

    pub fn preview_state(&self) -> Option<&PreviewState> {
        self.preview.as_ref().map(|(_, state)| state)
    }

    pub fn startup(&self, hotkey: &str) {
        self.shell.apply(ShellCommand::RegisterHotkey {
            hotkey: hotkey.to_string(),
        });
        self.publish();
    }

    pub fn handle(&mut self, request: UiRequest) -> Flow {
        match request {
            UiRequest::QueryEdited(request) => self.on_query_edited(request.text),
            UiRequest::Key(request) => self.on_key(request.key),
            UiRequest::RowClicked(request) => self.on_row_clicked(request.index),
            UiRequest::Summon(request) => self.on_summon(request.has_focus),
            UiRequest::Quit => {
                self.debouncer.cancel();
                tracing::info!("quit requested");
                return Flow::Quit;
            }
        }
        self.publish();
        Flow::Continue
    }

    pub fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::Search {
                generation,
                query,
                outcome,
            } => {
                if !self.debouncer.is_current(generation) || query != self.query {
                    tracing::debug!(%query, generation, "dropping superseded search result");
                    return;
                }
                self.loading = false;
                self.search_failed = outcome.failed;
                self.replace_results(outcome.results);
            }
            Completion::Preview {
                result_id,
                resolution,
            } => {
                let current = matches!(
                    &self.preview,
                    Some((id, PreviewState::Loading)) if *id == result_id
                ) && self.selected().map(|result| result.id.as_str())
                    == Some(result_id.as_str());
                if !current {
                    tracing::debug!(%result_id, "dropping preview for deselected result");
                    return;
                }
                self.preview = Some((result_id, PreviewState::Ready(resolution)));
            }
        }
        self.publish();
    }

    /// Applies every completion already delivered without waiting.
    pub fn drain_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completions_rx.try_recv() {
            self.apply(completion);
            applied += 1;
        }
        applied
    }

    pub async fn run(&mut self, mut requests: UnboundedReceiver<UiRequest>) {
        loop {
            let next = tokio::select! {
                request = requests.recv() => Next::Request(request),
                completion = self.completions_rx.recv() => Next::Completion(completion),
            };

            match next {
                Next::Request(Some(request)) => {
                    if self.handle(request) == Flow::Quit {
                        break;
                    }
                }
                Next::Request(None) => {
                    tracing::info!("host input closed");
                    break;
                }
                Next::Completion(Some(completion)) => self.apply(completion),
                Next::Completion(None) => break,
            }
        }
    }

    pub fn view(&self) -> LauncherView {
        let focused = self.nav.focused_index();
        LauncherView {
            query: self.query.clone(),
            rows: self
                .results
                .iter()
                .enumerate()
                .map(|(index, result)| render_row(result, focused == Some(index)))
                .collect(),
            focused_index: self.nav.focused_index_signed(),
            preview: render_preview(
                self.nav.preview_visible() && !self.nav.is_idle(),
                self.preview_state(),
            ),
            loading: self.loading,
            search_failed: self.search_failed,
            visible: self.overlay.is_visible(),
        }
    }

    fn publish(&self) {
        self.shell.publish(&self.view());
    }

    fn on_query_edited(&mut self, text: String) {
        self.query = text;
        let transition = self.nav.on_text_input();
        self.apply_transition(transition);

        let gateway = self.gateway.clone();
        let completions = self.completions_tx.clone();
        let query = self.query.clone();
        let scheduled = self.debouncer.on_input(&self.query, move |generation| async move {
            let outcome = gateway.search(&query).await;
            let _ = completions.send(Completion::Search {
                generation,
                query,
                outcome,
            });
        });

        match scheduled {
            Scheduled::Cleared => {
                self.loading = false;
                self.search_failed = false;
                self.replace_results(ResultSet::empty());
            }
            Scheduled::Pending(_) => self.loading = true,
        }
    }

    fn on_key(&mut self, key: UiKey) {
        let Some(key) = key.as_nav_key() else {
            if let Some(command) = self.overlay.dismiss() {
                self.shell.apply(command);
            }
            return;
        };
        let transition = self.nav.on_key(key, self.results.len());
        self.apply_transition(transition);
    }

    fn on_row_clicked(&mut self, index: usize) {
        if index >= self.results.len() {
            tracing::debug!(index, len = self.results.len(), "click outside result list");
            return;
        }
        let transition = self.nav.select(index, self.results.len());
        self.apply_transition(transition);
        self.open_result(index);
    }

    fn on_summon(&mut self, has_focus: bool) {
        let command = self.overlay.summon(has_focus);
        self.shell.apply(command);
    }

    fn apply_transition(&mut self, transition: Transition) {
        if let Some(effect) = transition.input_focus {
            self.shell.apply(match effect {
                InputFocusEffect::Release => ShellCommand::ReleaseInputFocus,
                InputFocusEffect::FocusAndSelectAll => ShellCommand::FocusInput { select_all: true },
            });
        }
        if transition.selection_changed || transition.preview_changed {
            self.sync_preview();
        }
        if let Some(index) = transition.open {
            self.open_result(index);
        }
    }

    fn replace_results(&mut self, results: ResultSet) {
        if results.same_set(&self.results) {
            return;
        }
        self.results = results;
        self.preview = None;
        let transition = self.nav.reset();
        self.apply_transition(transition);
    }

    /// Keeps `preview` keyed to the selected result while the pane is shown.
    fn sync_preview(&mut self) {
        let target = if self.nav.preview_visible() {
            self.selected().cloned()
        } else {
            None
        };
        let Some(result) = target else {
            self.preview = None;
            return;
        };

        if matches!(&self.preview, Some((id, _)) if *id == result.id) {
            return;
        }

        match preview::plan(&result) {
            PreviewPlan::Ready(resolution) => {
                self.preview = Some((result.id, PreviewState::Ready(resolution)));
            }
            PreviewPlan::FetchText { id } => {
                self.preview = Some((id.clone(), PreviewState::Loading));
                let resolver = self.resolver.clone();
                let completions = self.completions_tx.clone();
                tokio::spawn(async move {
                    let resolution = resolver.fetch_text(&id).await;
                    let _ = completions.send(Completion::Preview {
                        result_id: id,
                        resolution,
                    });
                });
            }
        }
    }

    fn open_result(&mut self, index: usize) {
        let Some(path) = self.results.get(index).map(|result| result.path().to_string()) else {
            return;
        };
        match self.opener.open(&path) {
            Ok(()) => {
                tracing::info!(%path, "opened result");
                let command = self.overlay.hide_after_open();
                self.shell.apply(command);
            }
            Err(error) => {
                tracing::error!(kind = "open_failed", %path, %error, "failed to open result");
            }
        }
    }
}
