use crate::error::{DashboardError, DashboardResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Server-assigned chart identifier. Opaque to the client beyond equality.
pub type ChartId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSpec {
    pub name: String,
    pub data: Vec<f64>,
}

/// One saved chart as the store returns it. The store's records carry the
/// source filter fields under their original CJK names; only the storage
/// cell matters client-side (it keys the series color).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartDescriptor {
    pub id: ChartId,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "xAxis", default)]
    pub x_axis: Vec<String>,
    #[serde(default)]
    pub series: Vec<SeriesSpec>,
    #[serde(rename = "儲格", default)]
    pub storage_cell_label: String,
    // Older records predate the expand feature and omit this field.
    #[serde(default)]
    pub expanded: bool,
}

/// Creation body. The store expects the filter fields under their CJK names.
#[derive(Debug, Clone, Serialize)]
pub struct NewChartRequest {
    #[serde(rename = "棟別")]
    pub building: String,
    #[serde(rename = "樓層")]
    pub floor: String,
    #[serde(rename = "站點")]
    pub station: String,
    #[serde(rename = "儲格")]
    pub storage_cell: String,
}

/// One element of the bulk order/expansion persistence body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderEntry {
    pub id: ChartId,
    pub expanded: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuOptions {
    pub buildings: Vec<String>,
    pub floors: Vec<String>,
    pub stations: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CellsResponse {
    storages: Vec<String>,
}

/// The remote chart store, as consumed by the dashboard.
#[async_trait]
pub trait ChartStore: Send + Sync {
    async fn menu_options(&self) -> DashboardResult<MenuOptions>;

    /// Storage cells matching a full (building, floor, station) triple.
    async fn filtered_cells(
        &self,
        building: &str,
        floor: &str,
        station: &str,
    ) -> DashboardResult<Vec<String>>;

    async fn list_charts(&self) -> DashboardResult<Vec<ChartDescriptor>>;

    /// Create a chart for a selection. A non-success response means the
    /// backend found no matching data and surfaces as `CreationRejected`.
    async fn create_chart(&self, req: &NewChartRequest) -> DashboardResult<ChartDescriptor>;

    async fn delete_chart(&self, id: ChartId) -> DashboardResult<()>;

    async fn delete_all_charts(&self) -> DashboardResult<()>;

    async fn patch_expanded(&self, id: ChartId, expanded: bool) -> DashboardResult<()>;

    /// Bulk order/expansion persistence. Callers treat this as
    /// fire-and-forget; there is no retry.
    async fn persist_order(&self, entries: &[OrderEntry]) -> DashboardResult<()>;
}

/// HTTP implementation against the real store API.
#[derive(Clone)]
pub struct HttpChartStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpChartStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl ChartStore for HttpChartStore {
    async fn menu_options(&self) -> DashboardResult<MenuOptions> {
        let res = self
            .client
            .get(self.url("/options"))
            .send()
            .await
            .map_err(|e| DashboardError::lookup(e.to_string()))?;
        res.json::<MenuOptions>()
            .await
            .map_err(|e| DashboardError::lookup(e.to_string()))
    }

    async fn filtered_cells(
        &self,
        building: &str,
        floor: &str,
        station: &str,
    ) -> DashboardResult<Vec<String>> {
        let res = self
            .client
            .get(self.url("/filtered-data"))
            .query(&[
                ("building", building),
                ("floor", floor),
                ("station", station),
            ])
            .send()
            .await
            .map_err(|e| DashboardError::lookup(e.to_string()))?;
        let body = res
            .json::<CellsResponse>()
            .await
            .map_err(|e| DashboardError::lookup(e.to_string()))?;
        Ok(body.storages)
    }

    async fn list_charts(&self) -> DashboardResult<Vec<ChartDescriptor>> {
        let res = self.client.get(self.url("/charts")).send().await?;
        Ok(res.json::<Vec<ChartDescriptor>>().await?)
    }

    async fn create_chart(&self, req: &NewChartRequest) -> DashboardResult<ChartDescriptor> {
        let res = self
            .client
            .post(self.url("/charts"))
            .json(req)
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(DashboardError::creation_rejected(format!(
                "{status}: {body}"
            )));
        }
        Ok(res.json::<ChartDescriptor>().await?)
    }

    async fn delete_chart(&self, id: ChartId) -> DashboardResult<()> {
        let res = self
            .client
            .delete(self.url(&format!("/charts/{id}")))
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(DashboardError::store(format!(
                "delete of chart {id} returned {}",
                res.status()
            )));
        }
        Ok(())
    }

    async fn delete_all_charts(&self) -> DashboardResult<()> {
        let res = self.client.delete(self.url("/charts")).send().await?;
        if !res.status().is_success() {
            return Err(DashboardError::store(format!(
                "delete-all returned {}",
                res.status()
            )));
        }
        Ok(())
    }

    async fn patch_expanded(&self, id: ChartId, expanded: bool) -> DashboardResult<()> {
        let res = self
            .client
            .patch(self.url(&format!("/charts/{id}")))
            .json(&serde_json::json!({ "expanded": expanded }))
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(DashboardError::store(format!(
                "patch of chart {id} returned {}",
                res.status()
            )));
        }
        Ok(())
    }

    async fn persist_order(&self, entries: &[OrderEntry]) -> DashboardResult<()> {
        let res = self
            .client
            .post(self.url("/charts-order"))
            .json(entries)
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(DashboardError::store(format!(
                "order persistence returned {}",
                res.status()
            )));
        }
        Ok(())
    }
}
