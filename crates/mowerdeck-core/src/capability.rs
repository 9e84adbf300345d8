//! Typed capability sets for pane controls.
//!
//! The legacy dashboard modelled "which buttons are live" as an integer
//! bitmask per tool pane. This keeps the compact one-bit-per-capability
//! representation and the OR/XOR/AND composition, but behind a typed enum
//! with named membership tests.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Not, Sub};

/// A single controllable UI action, one bit in a [`CapabilitySet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Capability {
    /// Mower selection dropdown.
    MowerSelect,
    /// Speed pair selector.
    RobotSpeed,
    /// Free-form direct command dropdown.
    DirectCommand,
    /// Cutter 1 toggle.
    Cutter1,
    /// Cutter 2 toggle.
    Cutter2,
    /// Direct-drive destination selector.
    DirectDriveTarget,
    /// Drive to the staged destination.
    Drive,
    /// Drive the stored route.
    Route,
    /// Cancel the current drive.
    Cancel,
    /// Pause the current drive.
    Pause,
    /// Skip the current route node.
    Skip,
    /// Single-step while paused.
    Step,
    /// Reset the navigation state.
    Reset,
    /// Reboot the server.
    Reboot,
    /// Shut the server down.
    Shutdown,
    /// Enrol the mower in the hotspot.
    Enrol,
    /// Select next point (editor).
    Select,
    /// Extend selection by one point (editor).
    Extend,
    /// Select every point (editor).
    SelectAll,
    /// Clear the selection (editor).
    Clear,
    /// Nudge up (editor).
    Up,
    /// Nudge down (editor).
    Down,
    /// Nudge left (editor).
    Left,
    /// Nudge right (editor).
    Right,
    /// Expand selection radially (editor).
    Expand,
    /// Contract selection radially (editor).
    Contract,
    /// Insert a point into a line (editor).
    AddPoint,
    /// Delete the selected points (editor).
    DeletePoint,
}

impl Capability {
    /// All capabilities, in bit order.
    pub const ALL: [Capability; 28] = [
        Capability::MowerSelect,
        Capability::RobotSpeed,
        Capability::DirectCommand,
        Capability::Cutter1,
        Capability::Cutter2,
        Capability::DirectDriveTarget,
        Capability::Drive,
        Capability::Route,
        Capability::Cancel,
        Capability::Pause,
        Capability::Skip,
        Capability::Step,
        Capability::Reset,
        Capability::Reboot,
        Capability::Shutdown,
        Capability::Enrol,
        Capability::Select,
        Capability::Extend,
        Capability::SelectAll,
        Capability::Clear,
        Capability::Up,
        Capability::Down,
        Capability::Left,
        Capability::Right,
        Capability::Expand,
        Capability::Contract,
        Capability::AddPoint,
        Capability::DeletePoint,
    ];

    /// The bit this capability occupies. Each capability owns exactly one.
    pub const fn bit(self) -> u32 {
        1u32 << (self as u8)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A set of capabilities backed by a bitmask.
///
/// An empty set means "all disabled". Sets compose with `|`, `^`, `&` and
/// `-`, preserving the composition semantics of the legacy integer masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CapabilitySet(u32);

impl CapabilitySet {
    /// The empty set (everything disabled).
    pub const EMPTY: CapabilitySet = CapabilitySet(0);

    /// Create an empty set.
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Create a set from a slice of capabilities.
    pub fn of(caps: &[Capability]) -> Self {
        caps.iter().copied().collect()
    }

    /// Every known capability.
    pub fn all() -> Self {
        Capability::ALL.iter().copied().collect()
    }

    /// Test membership of a single capability.
    pub const fn contains(self, cap: Capability) -> bool {
        self.0 & cap.bit() != 0
    }

    /// Insert a capability, returning the new set.
    #[must_use]
    pub const fn with(self, cap: Capability) -> Self {
        Self(self.0 | cap.bit())
    }

    /// Remove a capability, returning the new set.
    #[must_use]
    pub const fn without(self, cap: Capability) -> Self {
        Self(self.0 & !cap.bit())
    }

    /// True when no capability is enabled.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of enabled capabilities.
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate over the enabled capabilities in bit order.
    pub fn iter(self) -> impl Iterator<Item = Capability> {
        Capability::ALL
            .into_iter()
            .filter(move |cap| self.contains(*cap))
    }

    /// Raw bits, for diagnostics.
    pub const fn bits(self) -> u32 {
        self.0
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        iter.into_iter()
            .fold(CapabilitySet::EMPTY, |set, cap| set.with(cap))
    }
}

impl From<Capability> for CapabilitySet {
    fn from(cap: Capability) -> Self {
        CapabilitySet::EMPTY.with(cap)
    }
}

impl BitOr for CapabilitySet {
    type Output = CapabilitySet;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOr<Capability> for CapabilitySet {
    type Output = CapabilitySet;
    fn bitor(self, rhs: Capability) -> Self {
        self.with(rhs)
    }
}

impl BitXor for CapabilitySet {
    type Output = CapabilitySet;
    fn bitxor(self, rhs: Self) -> Self {
        Self(self.0 ^ rhs.0)
    }
}

impl BitAnd for CapabilitySet {
    type Output = CapabilitySet;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl Sub for CapabilitySet {
    type Output = CapabilitySet;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 & !rhs.0)
    }
}

impl Not for CapabilitySet {
    type Output = CapabilitySet;
    fn not(self) -> Self {
        Self(!self.0) & CapabilitySet::all()
    }
}

impl fmt::Display for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.iter().map(|c| c.to_string()).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}
