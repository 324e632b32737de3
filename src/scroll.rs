//! One-shot scroll-to-result trigger.

use crate::session::Session;

/// Whatever owns the layout implements this; the coordinator only decides when.
pub trait ScrollTarget {
    fn scroll_into_view(&mut self);
}

#[derive(Debug, Default)]
pub struct ScrollCoordinator {
    seen_revision: u64,
}

impl ScrollCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call after the frame carrying the session's current presentation has
    /// been drawn. Scrolls at most once per committed presentation, and only
    /// when its output is non-empty. Returns whether it scrolled.
    pub fn observe<T: ScrollTarget + ?Sized>(&mut self, session: &Session, target: &mut T) -> bool {
        let revision = session.revision();
        if revision == self.seen_revision {
            return false;
        }
        self.seen_revision = revision;

        if session.display_output().is_empty() {
            return false;
        }
        target.scroll_into_view();
        true
    }
}
