use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// `go_back` with nothing to go back to
    #[error("Cannot go back from state {current}: state history is empty. Guard back-navigation with `history_len()`")]
    HistoryUnderflow { current: String },
}
