use crate::models::PropertyRecord;
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::info;

/// Record ids ticked in the results table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` if absent, remove it if present. Returns whether it is now selected.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// The bulk report button, available only while something is selected
    pub fn report_action(&self) -> Option<ReportAction> {
        if self.is_empty() {
            return None;
        }
        Some(ReportAction {
            ids: self.ids.clone(),
        })
    }
}

/// Bulk action over the selected rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportAction {
    ids: BTreeSet<String>,
}

impl ReportAction {
    pub fn count(&self) -> usize {
        self.ids.len()
    }

    pub fn label(&self) -> String {
        format!("Run Report ({} selected)", self.count())
    }

    /// Selected rows, in table order
    pub fn selected<'a>(&self, records: &'a [PropertyRecord]) -> Vec<&'a PropertyRecord> {
        records.iter().filter(|r| self.ids.contains(&r.id)).collect()
    }

    /// Export the selected rows as pretty JSON. Returns the number written.
    pub async fn run(&self, records: &[PropertyRecord], path: &Path) -> Result<usize> {
        let selected = self.selected(records);
        let json = serde_json::to_string_pretty(&selected).context("Failed to serialize report")?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write report to {}", path.display()))?;

        info!("💾 Saved {} selected properties to {}", selected.len(), path.display());
        Ok(selected.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(id: &str) -> PropertyRecord {
        PropertyRecord {
            id: id.to_string(),
            address: format!("{} Main St", id),
            sale_date: Utc::now(),
            actual_cap_rate: 0.0,
            price_per_unit: 0.0,
            number_of_units: 0.0,
            year_built: 0.0,
            property_type: "Land".to_string(),
            total_square_feet: 0.0,
        }
    }

    #[test]
    fn double_toggle_restores_selection() {
        let mut selection = Selection::new();
        selection.toggle("keep");
        let before = selection.clone();

        assert!(selection.toggle("x"));
        assert!(!selection.toggle("x"));
        assert_eq!(selection, before);
    }

    #[test]
    fn two_ids_in_either_order() {
        let mut ab = Selection::new();
        ab.toggle("a");
        ab.toggle("b");

        let mut ba = Selection::new();
        ba.toggle("b");
        ba.toggle("a");

        assert_eq!(ab.len(), 2);
        assert_eq!(ab, ba);
    }

    #[test]
    fn report_action_tracks_selection() {
        let mut selection = Selection::new();
        assert!(selection.report_action().is_none());

        selection.toggle("2");
        selection.toggle("3");
        let action = selection.report_action().unwrap();
        assert_eq!(action.label(), "Run Report (2 selected)");

        let records = vec![record("3"), record("1"), record("2")];
        let ids: Vec<&str> = action.selected(&records).iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "2"]);

        selection.clear();
        assert!(selection.report_action().is_none());
    }

    #[tokio::test]
    async fn report_writes_selected_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        let mut selection = Selection::new();
        selection.toggle("1");
        let written = selection
            .report_action()
            .unwrap()
            .run(&[record("1"), record("2")], &path)
            .await
            .unwrap();
        assert_eq!(written, 1);

        let saved: Vec<PropertyRecord> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].address, "1 Main St");
    }
}
