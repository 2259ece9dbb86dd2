use crate::error::{DashboardError, DashboardResult};
use crate::selection::SelectionState;
use crate::store::{ChartDescriptor, ChartId, ChartStore, OrderEntry};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(ChartId),
    /// No storage cell chosen; nothing was sent and nothing changed.
    NoCell,
}

/// Ordered chart list mirroring the remote store. The mirror is best-effort:
/// local mutation is applied once the store call returns, and no
/// reconciliation pass runs afterwards.
#[derive(Default)]
pub struct ChartList {
    charts: Vec<ChartDescriptor>,
}

impl ChartList {
    pub fn charts(&self) -> &[ChartDescriptor] {
        &self.charts
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ChartDescriptor> {
        self.charts.get(index)
    }

    /// Replace the whole list with the store's collection, keeping the
    /// store-provided order.
    pub async fn load(&mut self, store: &dyn ChartStore) -> DashboardResult<usize> {
        self.charts = store.list_charts().await?;
        Ok(self.charts.len())
    }

    /// Create a chart for the current selection and append it. With no
    /// storage cell chosen this is a no-op, signalled as `NoCell`. A store
    /// rejection leaves the list untouched.
    pub async fn create(
        &mut self,
        store: &dyn ChartStore,
        selection: &SelectionState,
    ) -> DashboardResult<CreateOutcome> {
        let Some(req) = selection.to_request() else {
            return Ok(CreateOutcome::NoCell);
        };
        let mut chart = store.create_chart(&req).await?;
        chart.expanded = false;
        let id = chart.id;
        self.charts.push(chart);
        Ok(CreateOutcome::Created(id))
    }

    /// Delete the chart at `index`. The store call is awaited first; a
    /// failed delete is logged and the local splice proceeds anyway.
    pub async fn remove(
        &mut self,
        store: &dyn ChartStore,
        index: usize,
    ) -> DashboardResult<ChartId> {
        let id = self
            .charts
            .get(index)
            .map(|c| c.id)
            .ok_or(DashboardError::InvalidIndex(index))?;
        if let Err(e) = store.delete_chart(id).await {
            warn!(chart = id, error = %e, "delete failed at the store; removing locally anyway");
        }
        self.charts.remove(index);
        Ok(id)
    }

    /// Delete every chart. Same lenient contract as `remove`.
    pub async fn clear(&mut self, store: &dyn ChartStore) -> DashboardResult<()> {
        if let Err(e) = store.delete_all_charts().await {
            warn!(error = %e, "clear failed at the store; emptying locally anyway");
        }
        self.charts.clear();
        Ok(())
    }

    /// Flip the expansion flag locally. The PATCH to the store is the
    /// caller's concern and must not block this mutation.
    pub fn set_expanded(&mut self, index: usize, value: bool) -> DashboardResult<ChartId> {
        let chart = self
            .charts
            .get_mut(index)
            .ok_or(DashboardError::InvalidIndex(index))?;
        chart.expanded = value;
        Ok(chart.id)
    }

    pub fn move_chart(&mut self, from: usize, to: usize) -> DashboardResult<()> {
        if from >= self.charts.len() {
            return Err(DashboardError::InvalidIndex(from));
        }
        if to >= self.charts.len() {
            return Err(DashboardError::InvalidIndex(to));
        }
        let chart = self.charts.remove(from);
        self.charts.insert(to, chart);
        Ok(())
    }

    /// `[{id, expanded}]` in current list order, the body of the bulk
    /// persistence endpoint.
    pub fn order_snapshot(&self) -> Vec<OrderEntry> {
        self.charts
            .iter()
            .map(|c| OrderEntry {
                id: c.id,
                expanded: c.expanded,
            })
            .collect()
    }
}
