//! Text insertion port interface

use std::sync::Arc;

/// Port for the mechanism that types transcribed text into the focused
/// application. Recovery only observes availability; actual insertion is a
/// collaborator concern.
pub trait TextInsertion: Send + Sync {
    /// Whether text can currently be inserted
    fn is_available(&self) -> bool;
}

impl<T: TextInsertion + ?Sized> TextInsertion for Arc<T> {
    fn is_available(&self) -> bool {
        self.as_ref().is_available()
    }
}
