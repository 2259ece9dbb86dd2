use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Color used for any storage cell without a mapping of its own.
pub const DEFAULT_SERIES_COLOR: &str = "#90a4ae";

static SERIES_COLORS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("L121-C1", "#4caf50");
    m.insert("L121-C2", "#2196f3");
    m.insert("L121-C3", "#ff9800");
    m.insert("L122-C1", "#9c27b0");
    m.insert("L122-C2", "#00bcd4");
    m.insert("L123-C1", "#e91e63");
    m.insert("L123-C2", "#8bc34a");
    m.insert("L211-C1", "#ffc107");
    m.insert("L211-C2", "#3f51b5");
    m.insert("L212-C1", "#795548");
    m
});

/// Series color for a storage-cell label, falling back to the default.
pub fn series_color(cell_label: &str) -> &'static str {
    SERIES_COLORS
        .get(cell_label)
        .copied()
        .unwrap_or(DEFAULT_SERIES_COLOR)
}
