//! Tagged per-source fetch outcome.
//!
//! Every adapter reports one of three states instead of raising or returning
//! sentinel strings: real data, a clean "nothing today", or a failure with a
//! human-readable reason. The presentation layer decides how each variant
//! renders, and the corpus merger only ever sees `Ready` content.

/// Outcome of one source adapter fetch.
///
/// A `Failed` source never aborts the run; the briefing renders with that
/// section degraded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceData<T> {
    /// The source produced real data.
    Ready(T),
    /// The source was reachable but had nothing for this window.
    Empty,
    /// The source could not be fetched or parsed; carries the reason.
    Failed(String),
}

impl<T> SourceData<T> {
    /// Data if `Ready`, otherwise `None`.
    pub fn ready(&self) -> Option<&T> {
        match self {
            SourceData::Ready(data) => Some(data),
            _ => None,
        }
    }
}
