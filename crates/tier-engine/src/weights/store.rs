use std::sync::Arc;

use super::WeightTable;
use crate::error::StoreError;

/// Owner of the single active weight table.
///
/// Implementations must make `activate` single-writer/multi-reader atomic: once it
/// returns, `active` never yields the previously active table again, and readers never
/// observe a partially replaced table.
pub trait WeightTableStore: Send + Sync {
    fn active(&self) -> Result<Option<Arc<WeightTable>>, StoreError>;

    /// Replace the active table, returning the version that was deactivated.
    fn activate(&self, table: WeightTable) -> Result<Option<String>, StoreError>;
}
