use crate::chart_list::{ChartList, CreateOutcome};
use crate::error::DashboardError;
use crate::render::RenderManager;
use crate::selection::{FilterField, SelectionState};
use crate::store::{ChartId, ChartStore, MenuOptions};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{info, warn};

#[derive(Debug)]
pub enum AppCommand {
    SetFilter { field: FilterField, value: String },
    AddChart,
    RemoveChart(usize),
    ClearCharts,
    ToggleExpanded(usize),
    MoveChart { from: usize, to: usize },
    ViewportResized,
    Reload,
    Quit,
}

#[derive(Debug)]
pub enum AppEvent {
    MenuOptions(MenuOptions),
    CellsRefreshed(Vec<String>),
    ChartsLoaded(usize),
    ChartAdded(ChartId),
    ChartRemoved(ChartId),
    ChartsCleared,
    ExpandedSet { id: ChartId, expanded: bool },
    SelectionIncomplete,
    CreationRejected(String),
    LookupFailed(String),
    Error(String),
}

/// Orchestrates the selection, the chart list, and the render manager, and
/// schedules the order/expansion persistence writes. Runs as one sequential
/// task; every command is handled to completion before the next is taken.
pub struct Controller {
    store: Arc<dyn ChartStore>,
    selection: SelectionState,
    list: ChartList,
    render: RenderManager,
    tx_evt: UnboundedSender<AppEvent>,
    resize_quiet: Duration,
}

impl Controller {
    pub fn new(
        store: Arc<dyn ChartStore>,
        render: RenderManager,
        tx_evt: UnboundedSender<AppEvent>,
        resize_quiet: Duration,
    ) -> Self {
        Self {
            store,
            selection: SelectionState::default(),
            list: ChartList::default(),
            render,
            tx_evt,
            resize_quiet,
        }
    }

    /// Command loop. Viewport resizes are debounced: the actual resize runs
    /// once the quiet period elapses with no further resize command.
    pub async fn run(mut self, mut rx_cmd: UnboundedReceiver<AppCommand>) {
        self.startup().await;

        let mut resize_deadline: Option<tokio::time::Instant> = None;
        loop {
            let cmd = if let Some(deadline) = resize_deadline {
                tokio::select! {
                    cmd = rx_cmd.recv() => cmd,
                    _ = tokio::time::sleep_until(deadline) => {
                        resize_deadline = None;
                        self.render.resize_all();
                        continue;
                    }
                }
            } else {
                rx_cmd.recv().await
            };

            let Some(cmd) = cmd else { break };
            match cmd {
                AppCommand::ViewportResized => {
                    resize_deadline = Some(tokio::time::Instant::now() + self.resize_quiet);
                }
                AppCommand::Quit => break,
                other => self.handle(other).await,
            }
        }
    }

    /// Initial load: menu options, then the saved chart list, then a full
    /// render pass.
    async fn startup(&mut self) {
        match self.store.menu_options().await {
            Ok(options) => {
                let _ = self.tx_evt.send(AppEvent::MenuOptions(options));
            }
            Err(e) => {
                let _ = self.tx_evt.send(AppEvent::LookupFailed(e.to_string()));
            }
        }
        self.reload().await;
    }

    async fn handle(&mut self, cmd: AppCommand) {
        match cmd {
            AppCommand::SetFilter { field, value } => self.set_filter(field, value).await,
            AppCommand::AddChart => self.add_chart().await,
            AppCommand::RemoveChart(index) => self.remove_chart(index).await,
            AppCommand::ClearCharts => self.clear_charts().await,
            AppCommand::ToggleExpanded(index) => self.toggle_expanded(index).await,
            AppCommand::MoveChart { from, to } => self.move_chart(from, to).await,
            AppCommand::Reload => self.reload_full().await,
            // handled in the loop
            AppCommand::ViewportResized | AppCommand::Quit => {}
        }
    }

    async fn set_filter(&mut self, field: FilterField, value: String) {
        self.selection.set_filter(field, value);
        if field == FilterField::StorageCell {
            return;
        }
        match self
            .selection
            .refresh_available_cells(self.store.as_ref())
            .await
        {
            Ok(()) => {
                let _ = self
                    .tx_evt
                    .send(AppEvent::CellsRefreshed(self.selection.available_cells.clone()));
            }
            Err(e) => {
                let _ = self.tx_evt.send(AppEvent::LookupFailed(e.to_string()));
            }
        }
    }

    async fn add_chart(&mut self) {
        match self.list.create(self.store.as_ref(), &self.selection).await {
            Ok(CreateOutcome::Created(id)) => {
                self.render.backend_mut().ensure_container(id);
                let _ = self.tx_evt.send(AppEvent::ChartAdded(id));
                self.render_and_persist().await;
            }
            Ok(CreateOutcome::NoCell) => {
                let _ = self.tx_evt.send(AppEvent::SelectionIncomplete);
            }
            Err(DashboardError::CreationRejected(msg)) => {
                let _ = self.tx_evt.send(AppEvent::CreationRejected(msg));
            }
            Err(e) => {
                let _ = self.tx_evt.send(AppEvent::Error(e.to_string()));
            }
        }
    }

    async fn remove_chart(&mut self, index: usize) {
        match self.list.remove(self.store.as_ref(), index).await {
            Ok(id) => {
                self.render.release(id);
                let _ = self.tx_evt.send(AppEvent::ChartRemoved(id));
                self.render_and_persist().await;
            }
            Err(e) => {
                let _ = self.tx_evt.send(AppEvent::Error(e.to_string()));
            }
        }
    }

    async fn clear_charts(&mut self) {
        if let Err(e) = self.list.clear(self.store.as_ref()).await {
            let _ = self.tx_evt.send(AppEvent::Error(e.to_string()));
            return;
        }
        self.render.dispose_all();
        let _ = self.tx_evt.send(AppEvent::ChartsCleared);
        self.spawn_order_persist();
    }

    /// Flip expansion locally, patch the store without blocking, and
    /// re-render once the post-transition size settles.
    async fn toggle_expanded(&mut self, index: usize) {
        let expanded = match self.list.get(index) {
            Some(chart) => !chart.expanded,
            None => {
                let _ = self
                    .tx_evt
                    .send(AppEvent::Error(DashboardError::InvalidIndex(index).to_string()));
                return;
            }
        };
        let id = match self.list.set_expanded(index, expanded) {
            Ok(id) => id,
            Err(e) => {
                let _ = self.tx_evt.send(AppEvent::Error(e.to_string()));
                return;
            }
        };
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            if let Err(e) = store.patch_expanded(id, expanded).await {
                warn!(chart = id, error = %e, "expanded patch failed");
            }
        });
        let _ = self.tx_evt.send(AppEvent::ExpandedSet { id, expanded });

        if let Some(chart) = self.list.get(index).cloned() {
            self.render.render_one(&chart, true).await;
        }
        self.spawn_order_persist();
    }

    async fn move_chart(&mut self, from: usize, to: usize) {
        if let Err(e) = self.list.move_chart(from, to) {
            let _ = self.tx_evt.send(AppEvent::Error(e.to_string()));
            return;
        }
        self.render_and_persist().await;
    }

    /// Full replacement: drop every widget, refetch, re-render.
    async fn reload_full(&mut self) {
        self.render.dispose_all();
        self.reload().await;
    }

    async fn reload(&mut self) {
        match self.list.load(self.store.as_ref()).await {
            Ok(count) => {
                info!(count, "chart list loaded");
                for chart in self.list.charts() {
                    self.render.backend_mut().ensure_container(chart.id);
                }
                let _ = self.tx_evt.send(AppEvent::ChartsLoaded(count));
                self.render_and_persist().await;
            }
            Err(e) => {
                let _ = self.tx_evt.send(AppEvent::Error(e.to_string()));
            }
        }
    }

    /// Authoritative render pass, then the fire-and-forget order write.
    async fn render_and_persist(&mut self) {
        self.render.render_all(self.list.charts()).await;
        self.spawn_order_persist();
    }

    /// Persist `[{id, expanded}]` in current order. Spawned and forgotten:
    /// no retry, no ordering guarantee relative to later mutations. A later
    /// snapshot simply wins at the store.
    fn spawn_order_persist(&self) {
        let entries = self.list.order_snapshot();
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            if let Err(e) = store.persist_order(&entries).await {
                warn!(error = %e, "order persistence failed; not retried");
            }
        });
    }
}
