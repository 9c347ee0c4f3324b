//! Lifecycle state machine shared by entities and components
//!
//! `Created -> PendingStart -> Started{enabled} -> PendingRemoval -> Destroyed`.
//! The state is derived from a small flag set; `enabled` is user-controlled
//! and independent of the other flags.

use bitflags::bitflags;

bitflags! {
    /// Raw lifecycle flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LifecycleFlags: u8 {
        /// Waiting in a creation queue
        const QUEUED = 1 << 0;
        /// Start processing has run
        const STARTED = 1 << 1;
        /// User-controlled enable flag
        const ENABLED = 1 << 2;
        /// Removal requested, waiting for the removal drain
        const MARKED_FOR_REMOVAL = 1 << 3;
        /// Evicted by the removal drain
        const DESTROYED = 1 << 4;
    }
}

/// Observable lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Not yet queued
    Created,
    /// Queued, waiting for the next start drain
    PendingStart,
    /// Started; `enabled` mirrors the user flag
    Started {
        /// Current enable flag
        enabled: bool,
    },
    /// Removal requested
    PendingRemoval,
    /// Removed and evicted
    Destroyed,
}

/// Lifecycle flags of one entity or component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lifecycle {
    flags: LifecycleFlags,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    /// Fresh lifecycle, enabled and not yet queued
    pub fn new() -> Self {
        Self { flags: LifecycleFlags::ENABLED }
    }

    /// Raw flags
    pub fn flags(&self) -> LifecycleFlags {
        self.flags
    }

    /// Derived state
    pub fn state(&self) -> LifecycleState {
        if self.flags.contains(LifecycleFlags::DESTROYED) {
            LifecycleState::Destroyed
        } else if self.flags.contains(LifecycleFlags::MARKED_FOR_REMOVAL) {
            LifecycleState::PendingRemoval
        } else if self.flags.contains(LifecycleFlags::STARTED) {
            LifecycleState::Started { enabled: self.is_enabled() }
        } else if self.flags.contains(LifecycleFlags::QUEUED) {
            LifecycleState::PendingStart
        } else {
            LifecycleState::Created
        }
    }

    /// Whether start processing has run
    pub fn is_started(&self) -> bool {
        self.flags.contains(LifecycleFlags::STARTED)
    }

    /// User enable flag
    pub fn is_enabled(&self) -> bool {
        self.flags.contains(LifecycleFlags::ENABLED)
    }

    /// Whether removal was requested
    pub fn is_marked_for_removal(&self) -> bool {
        self.flags.intersects(LifecycleFlags::MARKED_FOR_REMOVAL | LifecycleFlags::DESTROYED)
    }

    /// Gate for update and draw dispatch
    pub fn is_processable(&self, enabled_in_hierarchy: bool) -> bool {
        enabled_in_hierarchy && self.is_started() && self.is_enabled() && !self.is_marked_for_removal()
    }

    /// Enter the creation queue
    pub fn enqueue(&mut self) {
        self.flags.insert(LifecycleFlags::QUEUED);
    }

    /// Leave the creation queue as started
    pub fn start(&mut self) {
        self.flags.remove(LifecycleFlags::QUEUED);
        self.flags.insert(LifecycleFlags::STARTED);
    }

    /// Set the enable flag, returning whether it changed
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        let changed = self.is_enabled() != enabled;
        self.flags.set(LifecycleFlags::ENABLED, enabled);
        changed
    }

    /// Request removal; `false` when removal was already requested
    pub fn try_mark_for_removal(&mut self) -> bool {
        if self.is_marked_for_removal() {
            return false;
        }
        self.flags.insert(LifecycleFlags::MARKED_FOR_REMOVAL);
        true
    }

    /// Final transition after eviction
    pub fn destroy(&mut self) {
        self.flags.remove(LifecycleFlags::QUEUED);
        self.flags.insert(LifecycleFlags::MARKED_FOR_REMOVAL | LifecycleFlags::DESTROYED);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_transitions() {
        let mut lifecycle = Lifecycle::new();
        assert_eq!(lifecycle.state(), LifecycleState::Created);

        lifecycle.enqueue();
        assert_eq!(lifecycle.state(), LifecycleState::PendingStart);
        assert!(!lifecycle.is_processable(true));

        lifecycle.start();
        assert_eq!(lifecycle.state(), LifecycleState::Started { enabled: true });
        assert!(lifecycle.is_processable(true));
        assert!(!lifecycle.is_processable(false));

        assert!(lifecycle.set_enabled(false));
        assert!(!lifecycle.set_enabled(false));
        assert_eq!(lifecycle.state(), LifecycleState::Started { enabled: false });
        assert!(!lifecycle.is_processable(true));

        assert!(lifecycle.try_mark_for_removal());
        assert_eq!(lifecycle.state(), LifecycleState::PendingRemoval);

        lifecycle.destroy();
        assert_eq!(lifecycle.state(), LifecycleState::Destroyed);
    }

    #[test]
    fn test_double_removal_refused() {
        let mut lifecycle = Lifecycle::new();
        assert!(lifecycle.try_mark_for_removal());
        assert!(!lifecycle.try_mark_for_removal());

        lifecycle.destroy();
        assert!(!lifecycle.try_mark_for_removal());
    }

    #[test]
    fn test_marked_before_start_is_never_processable() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.enqueue();
        lifecycle.try_mark_for_removal();
        lifecycle.start();
        assert!(!lifecycle.is_processable(true));
    }
}
