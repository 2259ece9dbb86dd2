use crate::store::{ChartDescriptor, ChartId};
use crate::theme;
use std::collections::HashMap;
use tracing::{debug, info};

/// Backend-allocated handle for one live widget instance.
pub type WidgetHandle = u64;

#[derive(Debug, Clone, PartialEq)]
pub struct ConfiguredSeries {
    pub name: String,
    pub kind: &'static str,
    pub color: String,
    pub data: Vec<f64>,
}

/// Fully derived widget configuration: axis and data from the descriptor,
/// display kind and color from the static lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetConfig {
    pub title: String,
    pub x_axis: Vec<String>,
    pub series: Vec<ConfiguredSeries>,
}

impl WidgetConfig {
    pub fn from_chart(chart: &ChartDescriptor) -> Self {
        let color = theme::series_color(&chart.storage_cell_label);
        Self {
            title: chart.title.clone(),
            x_axis: chart.x_axis.clone(),
            series: chart
                .series
                .iter()
                .map(|s| ConfiguredSeries {
                    name: s.name.clone(),
                    kind: "bar",
                    color: color.to_string(),
                    data: s.data.clone(),
                })
                .collect(),
        }
    }
}

/// The charting surface as the render manager sees it: a registry of
/// per-chart containers and the widget instances bound to them. The real
/// charting library lives behind this seam.
pub trait WidgetBackend: Send {
    /// Make sure a container exists for the chart.
    fn ensure_container(&mut self, id: ChartId);

    fn remove_container(&mut self, id: ChartId);

    /// Current layout size of the chart's container, or `None` while the
    /// container is not in the layout at all. A freshly inserted container
    /// may legitimately report (0, 0).
    fn container_size(&mut self, id: ChartId) -> Option<(u32, u32)>;

    /// Create a fresh widget bound to the chart's container.
    fn create_widget(&mut self, id: ChartId) -> WidgetHandle;

    fn configure(&mut self, handle: WidgetHandle, config: &WidgetConfig);

    /// Fit the widget to its container's current size, in place.
    fn resize(&mut self, handle: WidgetHandle);

    fn dispose(&mut self, handle: WidgetHandle);
}

/// Headless backend used by the binary: containers are bookkeeping entries
/// with a fixed drawable size and every widget operation is logged, so the
/// full lifecycle runs without a charting library attached.
pub struct LoggingBackend {
    containers: HashMap<ChartId, (u32, u32)>,
    live: HashMap<WidgetHandle, ChartId>,
    next_handle: WidgetHandle,
}

const LOGGING_CONTAINER_SIZE: (u32, u32) = (960, 420);

impl LoggingBackend {
    pub fn new() -> Self {
        Self {
            containers: HashMap::new(),
            live: HashMap::new(),
            next_handle: 1,
        }
    }
}

impl WidgetBackend for LoggingBackend {
    fn ensure_container(&mut self, id: ChartId) {
        self.containers.entry(id).or_insert(LOGGING_CONTAINER_SIZE);
    }

    fn remove_container(&mut self, id: ChartId) {
        self.containers.remove(&id);
    }

    fn container_size(&mut self, id: ChartId) -> Option<(u32, u32)> {
        self.containers.get(&id).copied()
    }

    fn create_widget(&mut self, id: ChartId) -> WidgetHandle {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.live.insert(handle, id);
        debug!(chart = id, handle, "widget created");
        handle
    }

    fn configure(&mut self, handle: WidgetHandle, config: &WidgetConfig) {
        let chart = self.live.get(&handle).copied().unwrap_or_default();
        let series: Vec<String> = config
            .series
            .iter()
            .map(|s| format!("{} ({}, {} points)", s.name, s.color, s.data.len()))
            .collect();
        info!(
            chart,
            handle,
            title = %config.title,
            categories = config.x_axis.len(),
            series = %series.join(", "),
            "widget configured"
        );
    }

    fn resize(&mut self, handle: WidgetHandle) {
        debug!(handle, "widget resized");
    }

    fn dispose(&mut self, handle: WidgetHandle) {
        if self.live.remove(&handle).is_some() {
            debug!(handle, "widget disposed");
        }
    }
}
