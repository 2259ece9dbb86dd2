use crate::store::{ChartDescriptor, ChartId};
use crate::widget::{WidgetBackend, WidgetConfig, WidgetHandle};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Bounded retry policy for the deferred corrective resize. A freshly
/// inserted container can report zero size until the next layout pass, and
/// an expand/collapse transition keeps the size in flux until it settles.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    /// Wait before the first poll when the resize follows a transition.
    pub settle_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 10,
            settle_delay: Duration::from_secs(1),
        }
    }
}

/// Scheduling seam for the retry loop: a "frame" is one display-refresh
/// tick. Tests inject an instant implementation.
#[async_trait]
pub trait Scheduler: Send + Sync {
    async fn next_frame(&self);
    async fn delay(&self, period: Duration);
}

pub struct TokioScheduler;

#[async_trait]
impl Scheduler for TokioScheduler {
    async fn next_frame(&self) {
        // close enough to one 60Hz refresh tick
        tokio::time::sleep(Duration::from_millis(16)).await;
    }

    async fn delay(&self, period: Duration) {
        tokio::time::sleep(period).await;
    }
}

/// Owns every live widget instance, keyed by chart id. Create and dispose
/// are paired so an id never has more than one live handle.
pub struct RenderManager {
    backend: Box<dyn WidgetBackend>,
    scheduler: Box<dyn Scheduler>,
    policy: RetryPolicy,
    bindings: HashMap<ChartId, WidgetHandle>,
}

impl RenderManager {
    pub fn new(
        backend: Box<dyn WidgetBackend>,
        scheduler: Box<dyn Scheduler>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            backend,
            scheduler,
            policy,
            bindings: HashMap::new(),
        }
    }

    pub fn backend_mut(&mut self) -> &mut dyn WidgetBackend {
        self.backend.as_mut()
    }

    pub fn binding(&self, id: ChartId) -> Option<WidgetHandle> {
        self.bindings.get(&id).copied()
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// Render or re-render every chart in list order.
    pub async fn render_all(&mut self, charts: &[ChartDescriptor]) {
        for chart in charts {
            self.render_one(chart, false).await;
        }
    }

    /// Render one chart into its container. No container yet means the
    /// chart is not in the layout; that is a no-op, not an error. An
    /// existing widget is disposed first — a widget cannot be reconfigured
    /// against a new container generation.
    pub async fn render_one(&mut self, chart: &ChartDescriptor, after_transition: bool) {
        if self.backend.container_size(chart.id).is_none() {
            debug!(chart = chart.id, "no container yet; skipping render");
            return;
        }
        if let Some(old) = self.bindings.remove(&chart.id) {
            self.backend.dispose(old);
        }
        let handle = self.backend.create_widget(chart.id);
        let config = WidgetConfig::from_chart(chart);
        self.backend.configure(handle, &config);
        self.bindings.insert(chart.id, handle);
        self.fit_when_ready(chart.id, handle, after_transition).await;
    }

    /// Deferred corrective resize: wait a frame, resize once the container
    /// reports non-zero dimensions, give up after the attempt budget. After
    /// a transition the first poll is additionally delayed so the size has
    /// settled. Exhaustion leaves the chart unrendered; non-fatal.
    async fn fit_when_ready(
        &mut self,
        id: ChartId,
        handle: WidgetHandle,
        after_transition: bool,
    ) {
        if after_transition {
            self.scheduler.delay(self.policy.settle_delay).await;
        }
        for attempt in 1..=self.policy.max_attempts {
            self.scheduler.next_frame().await;
            match self.backend.container_size(id) {
                Some((w, h)) if w > 0 && h > 0 => {
                    self.backend.resize(handle);
                    return;
                }
                Some(_) => {
                    debug!(chart = id, attempt, "container still zero-sized");
                }
                None => {
                    // container left the layout mid-retry, e.g. deleted
                    debug!(chart = id, "container gone; abandoning resize");
                    return;
                }
            }
        }
        warn!(
            chart = id,
            attempts = self.policy.max_attempts,
            "container never reached a drawable size; chart stays blank"
        );
    }

    /// Drop one chart's widget and container.
    pub fn release(&mut self, id: ChartId) {
        if let Some(handle) = self.bindings.remove(&id) {
            self.backend.dispose(handle);
        }
        self.backend.remove_container(id);
    }

    /// Dispose every widget and clear all bindings, ahead of a full-list
    /// replacement.
    pub fn dispose_all(&mut self) {
        for (id, handle) in self.bindings.drain() {
            self.backend.dispose(handle);
            self.backend.remove_container(id);
        }
    }

    /// In-place resize of every live widget, no recreation. Driven by the
    /// debounced viewport-resize path.
    pub fn resize_all(&mut self) {
        for handle in self.bindings.values() {
            self.backend.resize(*handle);
        }
    }
}
