use thiserror::Error;

pub mod extract;
pub mod forest;
pub mod index;
pub mod notes;
pub mod row;

/// Structural failures during chapter reconstruction. Either one aborts the
/// whole chapter: a partially built forest is never returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// The row is missing one of the structurally required cells (the three
    /// leading classification cells plus the trailing law-code cell).
    #[error("row {index} has {cells} cells, expected at least 4")]
    MalformedRow { index: usize, cells: usize },

    /// A nested row has no earlier row with a strictly lower depth to attach
    /// to, so its place in the tree is undefined.
    #[error("row {index} at depth {depth} has no ancestor with a lower depth")]
    OrphanNode { index: usize, depth: u32 },
}
