//! Holdings ingestion port trait.

use crate::domain::error::AtlasError;
use crate::domain::holding::Holding;

/// Source of tax lots. Implementations reject malformed rows; the engines
/// only ever see validated holdings, in source order.
pub trait HoldingsPort {
    fn load_holdings(&self) -> Result<Vec<Holding>, AtlasError>;
}
