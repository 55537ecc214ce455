//! Order metadata: per-size counts, customer info, derived totals, and the
//! best-effort local draft handed off to checkout.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use shared::{CustomerInfo, PendingDraft, SizeCounts, SizeLabel};

/// Flat per-unit price, in currency units
pub const UNIT_PRICE: u64 = 2000;

/// Size counts and customer details for the current design
#[derive(Default)]
pub struct OrderContext {
    pub sizes: SizeCounts,
    pub customer: CustomerInfo,
}

impl OrderContext {
    pub fn set_size(&mut self, label: SizeLabel, count: u32) {
        if count == 0 {
            self.sizes.remove(&label);
        } else {
            self.sizes.insert(label, count);
        }
    }

    pub fn size_count(&self, label: SizeLabel) -> u32 {
        self.sizes.get(&label).copied().unwrap_or(0)
    }

    /// Total item count across all sizes
    pub fn total_items(&self) -> u64 {
        self.sizes.values().map(|&c| c as u64).sum()
    }

    /// `UNIT_PRICE` times the total item count
    pub fn total_price(&self) -> u64 {
        UNIT_PRICE * self.total_items()
    }
}

fn draft_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "teelab", "teelab")
        .map(|dirs| dirs.data_dir().join("pending_order.json"))
}

/// Write the pending-order draft. Best effort: failures are swallowed, the
/// export/upload path does not depend on this.
pub fn save_draft(draft: &PendingDraft) {
    if let Some(path) = draft_path() {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Ok(json) = serde_json::to_string_pretty(draft) {
            let _ = std::fs::write(&path, json);
        }
    }
}

/// Load the pending-order draft, if one was saved
pub fn load_draft() -> Option<PendingDraft> {
    let path = draft_path()?;
    let json = std::fs::read_to_string(&path).ok()?;
    serde_json::from_str(&json).ok()
}

/// Current unix timestamp in seconds, for draft stamping
pub fn now_unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_from_sizes() {
        let mut order = OrderContext::default();
        order.set_size(SizeLabel::S, 2);
        order.set_size(SizeLabel::M, 3);
        assert_eq!(order.total_items(), 5);
        assert_eq!(order.total_price(), 10_000);
    }

    #[test]
    fn totals_recompute_after_mutation() {
        let mut order = OrderContext::default();
        order.set_size(SizeLabel::L, 1);
        assert_eq!(order.total_items(), 1);
        assert_eq!(order.total_price(), UNIT_PRICE);

        order.set_size(SizeLabel::L, 4);
        assert_eq!(order.total_items(), 4);
        assert_eq!(order.total_price(), 4 * UNIT_PRICE);

        order.set_size(SizeLabel::L, 0);
        assert_eq!(order.total_items(), 0);
        assert_eq!(order.total_price(), 0);
    }

    #[test]
    fn zero_count_removes_entry() {
        let mut order = OrderContext::default();
        order.set_size(SizeLabel::Xl, 2);
        order.set_size(SizeLabel::Xl, 0);
        assert!(order.sizes.is_empty());
        assert_eq!(order.size_count(SizeLabel::Xl), 0);
    }

    #[test]
    fn empty_order_totals_are_zero() {
        let order = OrderContext::default();
        assert_eq!(order.total_items(), 0);
        assert_eq!(order.total_price(), 0);
    }
}
