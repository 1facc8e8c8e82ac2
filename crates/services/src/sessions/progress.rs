/// Aggregated view of test progress, for the header and question grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub flagged: usize,
    pub current: usize,
    pub is_complete: bool,
}
