//! In-memory fakes for the store, the widget backend, and the scheduler,
//! shared across module tests.

use crate::error::{DashboardError, DashboardResult};
use crate::render::Scheduler;
use crate::selection::{FilterField, SelectionState};
use crate::store::{
    ChartDescriptor, ChartId, ChartStore, MenuOptions, NewChartRequest, OrderEntry, SeriesSpec,
};
use crate::widget::{WidgetBackend, WidgetConfig, WidgetHandle};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// In-memory chart store mirroring the real backend's observable behavior.
pub struct FakeStore {
    cells: Mutex<Vec<String>>,
    charts: Mutex<Vec<ChartDescriptor>>,
    next_id: AtomicI64,
    fail_lookups: AtomicBool,
    reject_creates: AtomicBool,
    fail_deletes: AtomicBool,
    lookup_calls: AtomicUsize,
    create_calls: AtomicUsize,
    order_posts: Mutex<Vec<Vec<OrderEntry>>>,
    patches: Mutex<Vec<(ChartId, bool)>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self {
            cells: Mutex::new(Vec::new()),
            charts: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            fail_lookups: AtomicBool::new(false),
            reject_creates: AtomicBool::new(false),
            fail_deletes: AtomicBool::new(false),
            lookup_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
            order_posts: Mutex::new(Vec::new()),
            patches: Mutex::new(Vec::new()),
        }
    }

    pub fn set_cells(&self, cells: Vec<String>) {
        *self.cells.lock().unwrap() = cells;
    }

    pub fn fail_lookups(&self, fail: bool) {
        self.fail_lookups.store(fail, Ordering::SeqCst);
    }

    pub fn reject_creates(&self, reject: bool) {
        self.reject_creates.store(reject, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn lookup_calls(&self) -> usize {
        self.lookup_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn chart_ids(&self) -> Vec<ChartId> {
        self.charts.lock().unwrap().iter().map(|c| c.id).collect()
    }

    pub fn order_posts(&self) -> Vec<Vec<OrderEntry>> {
        self.order_posts.lock().unwrap().clone()
    }

    pub fn patches(&self) -> Vec<(ChartId, bool)> {
        self.patches.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChartStore for FakeStore {
    async fn menu_options(&self) -> DashboardResult<MenuOptions> {
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(DashboardError::lookup("options lookup unavailable"));
        }
        Ok(MenuOptions {
            buildings: vec!["A".into(), "B".into()],
            floors: vec!["1F".into(), "2F".into()],
            stations: vec!["S1".into(), "S2".into()],
        })
    }

    async fn filtered_cells(
        &self,
        _building: &str,
        _floor: &str,
        _station: &str,
    ) -> DashboardResult<Vec<String>> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(DashboardError::lookup("cell lookup unavailable"));
        }
        Ok(self.cells.lock().unwrap().clone())
    }

    async fn list_charts(&self) -> DashboardResult<Vec<ChartDescriptor>> {
        Ok(self.charts.lock().unwrap().clone())
    }

    async fn create_chart(&self, req: &NewChartRequest) -> DashboardResult<ChartDescriptor> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_creates.load(Ordering::SeqCst) {
            return Err(DashboardError::creation_rejected("no matching data"));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let chart = ChartDescriptor {
            id,
            title: format!("{}-{} {}", req.building, req.floor, req.storage_cell),
            x_axis: vec!["Q1".into(), "Q2".into()],
            series: vec![SeriesSpec {
                name: req.storage_cell.clone(),
                data: vec![1.0, 2.0],
            }],
            storage_cell_label: req.storage_cell.clone(),
            expanded: false,
        };
        self.charts.lock().unwrap().push(chart.clone());
        Ok(chart)
    }

    async fn delete_chart(&self, id: ChartId) -> DashboardResult<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(DashboardError::store("delete unavailable"));
        }
        self.charts.lock().unwrap().retain(|c| c.id != id);
        Ok(())
    }

    async fn delete_all_charts(&self) -> DashboardResult<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(DashboardError::store("delete-all unavailable"));
        }
        self.charts.lock().unwrap().clear();
        Ok(())
    }

    async fn patch_expanded(&self, id: ChartId, expanded: bool) -> DashboardResult<()> {
        self.patches.lock().unwrap().push((id, expanded));
        if let Some(chart) = self.charts.lock().unwrap().iter_mut().find(|c| c.id == id) {
            chart.expanded = expanded;
        }
        Ok(())
    }

    async fn persist_order(&self, entries: &[OrderEntry]) -> DashboardResult<()> {
        self.order_posts.lock().unwrap().push(entries.to_vec());
        Ok(())
    }
}

#[derive(Default)]
struct BackendState {
    /// Scripted size sequence per container; the last entry is sticky.
    containers: HashMap<ChartId, VecDeque<(u32, u32)>>,
    live: HashMap<WidgetHandle, ChartId>,
    next_handle: WidgetHandle,
    configs: Vec<(ChartId, WidgetConfig)>,
    created: usize,
    disposed: usize,
    resizes: usize,
}

/// Scriptable widget backend. Clones share state so tests keep a handle
/// while the render manager owns the boxed copy.
#[derive(Clone)]
pub struct SharedBackend(Arc<Mutex<BackendState>>);

impl SharedBackend {
    pub fn new() -> Self {
        SharedBackend(Arc::new(Mutex::new(BackendState {
            next_handle: 1,
            ..BackendState::default()
        })))
    }

    pub fn add_container(&self, id: ChartId, size: (u32, u32)) {
        self.add_container_with_sizes(id, vec![size]);
    }

    pub fn add_container_with_sizes(&self, id: ChartId, sizes: Vec<(u32, u32)>) {
        self.0
            .lock()
            .unwrap()
            .containers
            .insert(id, sizes.into_iter().collect());
    }

    pub fn has_container(&self, id: ChartId) -> bool {
        self.0.lock().unwrap().containers.contains_key(&id)
    }

    pub fn configs_for(&self, id: ChartId) -> Vec<WidgetConfig> {
        self.0
            .lock()
            .unwrap()
            .configs
            .iter()
            .filter(|(cid, _)| *cid == id)
            .map(|(_, cfg)| cfg.clone())
            .collect()
    }

    pub fn created(&self) -> usize {
        self.0.lock().unwrap().created
    }

    pub fn disposed(&self) -> usize {
        self.0.lock().unwrap().disposed
    }

    pub fn resizes(&self) -> usize {
        self.0.lock().unwrap().resizes
    }
}

impl WidgetBackend for SharedBackend {
    fn ensure_container(&mut self, id: ChartId) {
        self.0
            .lock()
            .unwrap()
            .containers
            .entry(id)
            .or_insert_with(|| VecDeque::from([(960, 420)]));
    }

    fn remove_container(&mut self, id: ChartId) {
        self.0.lock().unwrap().containers.remove(&id);
    }

    fn container_size(&mut self, id: ChartId) -> Option<(u32, u32)> {
        let mut state = self.0.lock().unwrap();
        let sizes = state.containers.get_mut(&id)?;
        if sizes.len() > 1 {
            sizes.pop_front()
        } else {
            sizes.front().copied()
        }
    }

    fn create_widget(&mut self, id: ChartId) -> WidgetHandle {
        let mut state = self.0.lock().unwrap();
        let handle = state.next_handle;
        state.next_handle += 1;
        state.live.insert(handle, id);
        state.created += 1;
        handle
    }

    fn configure(&mut self, handle: WidgetHandle, config: &WidgetConfig) {
        let mut state = self.0.lock().unwrap();
        let id = state.live.get(&handle).copied().unwrap_or_default();
        state.configs.push((id, config.clone()));
    }

    fn resize(&mut self, _handle: WidgetHandle) {
        self.0.lock().unwrap().resizes += 1;
    }

    fn dispose(&mut self, handle: WidgetHandle) {
        let mut state = self.0.lock().unwrap();
        if state.live.remove(&handle).is_some() {
            state.disposed += 1;
        }
    }
}

/// Scheduler whose frames and delays complete immediately.
pub struct InstantScheduler;

#[async_trait]
impl Scheduler for InstantScheduler {
    async fn next_frame(&self) {
        tokio::task::yield_now().await;
    }

    async fn delay(&self, _period: Duration) {
        tokio::task::yield_now().await;
    }
}

pub fn sample_chart(id: ChartId, cell: &str) -> ChartDescriptor {
    ChartDescriptor {
        id,
        title: format!("A-1F {cell}"),
        x_axis: vec!["Q1".into(), "Q2".into()],
        series: vec![SeriesSpec {
            name: cell.into(),
            data: vec![1.0, 2.0],
        }],
        storage_cell_label: cell.into(),
        expanded: false,
    }
}

pub fn selection_for_cell(cell: &str) -> SelectionState {
    let mut sel = SelectionState::default();
    sel.set_filter(FilterField::Building, "A");
    sel.set_filter(FilterField::Floor, "1F");
    sel.set_filter(FilterField::Station, "S1");
    sel.set_filter(FilterField::StorageCell, cell);
    sel
}
