//! Permission check port interface

use std::sync::Arc;

/// Query-only port for OS-level permission state.
///
/// Recovery cannot grant permissions, only detect and report their
/// absence.
pub trait PermissionCheck: Send + Sync {
    /// Whether accessibility access (needed for text insertion and global
    /// hotkeys) is granted
    fn check_accessibility_permission(&self) -> bool;
}

impl<T: PermissionCheck + ?Sized> PermissionCheck for Arc<T> {
    fn check_accessibility_permission(&self) -> bool {
        self.as_ref().check_accessibility_permission()
    }
}
