use crate::error::DashboardResult;
use crate::store::{ChartStore, NewChartRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Building,
    Floor,
    Station,
    StorageCell,
}

/// The cascading filter selection. Changing any of the three upper filters
/// invalidates the chosen cell and the derived cell list.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    pub building: String,
    pub floor: String,
    pub station: String,
    pub storage_cell: String,
    pub available_cells: Vec<String>,
}

impl SelectionState {
    pub fn set_filter(&mut self, field: FilterField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FilterField::Building => {
                self.building = value;
                self.clear_cell_choice();
            }
            FilterField::Floor => {
                self.floor = value;
                self.clear_cell_choice();
            }
            FilterField::Station => {
                self.station = value;
                self.clear_cell_choice();
            }
            FilterField::StorageCell => self.storage_cell = value,
        }
    }

    fn clear_cell_choice(&mut self) {
        self.storage_cell.clear();
        self.available_cells.clear();
    }

    /// Whether building, floor and station are all chosen.
    pub fn has_full_triple(&self) -> bool {
        !self.building.is_empty() && !self.floor.is_empty() && !self.station.is_empty()
    }

    /// Re-derive the selectable cells for the current triple. An incomplete
    /// triple short-circuits to an empty list without touching the network.
    /// A failed lookup leaves the prior state untouched and returns the
    /// error; there is no retry.
    pub async fn refresh_available_cells(
        &mut self,
        store: &dyn ChartStore,
    ) -> DashboardResult<()> {
        if !self.has_full_triple() {
            self.available_cells.clear();
            return Ok(());
        }
        let cells = store
            .filtered_cells(&self.building, &self.floor, &self.station)
            .await?;
        self.available_cells = cells;
        Ok(())
    }

    /// Creation body for the current selection, or `None` while no storage
    /// cell is chosen.
    pub fn to_request(&self) -> Option<NewChartRequest> {
        if self.storage_cell.is_empty() {
            return None;
        }
        Some(NewChartRequest {
            building: self.building.clone(),
            floor: self.floor.clone(),
            station: self.station.clone(),
            storage_cell: self.storage_cell.clone(),
        })
    }
}
