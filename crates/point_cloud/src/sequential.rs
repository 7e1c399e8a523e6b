//! Append-only cloud preserving arrival order

use contracts::{ScanRecord, ScanRow};

#[derive(Debug, Clone, Default)]
pub struct SequentialCloud {
    records: Vec<ScanRecord>,
}

impl SequentialCloud {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn append(&mut self, record: ScanRecord) {
        self.records.push(record);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ScanRecord] {
        &self.records
    }

    /// Rows in insertion order
    pub fn to_rows(&self) -> Vec<ScanRow> {
        self.records
            .iter()
            .map(|record| {
                let raw = record.raw();
                ScanRow {
                    theta: raw.theta,
                    phi: raw.phi,
                    record: Some(*record),
                }
            })
            .collect()
    }
}
