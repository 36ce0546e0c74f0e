//! Application phases and resource bookkeeping.
//!
//! Handles are wrapped in [`Tracked`] so that every acquisition and every
//! release lands in a shared [`Ledger`]. Release order falls out of Rust drop
//! order: locals unwind in reverse, struct fields drop in declaration order.

use std::cell::RefCell;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use log::{debug, info};

use crate::error::{Result, ShellError};

/// Bring-up steps, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStage {
    Video,
    Image,
    Audio,
    Font,
    Window,
    Surface,
}

impl fmt::Display for InitStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Video => "video",
            Self::Image => "image decoder",
            Self::Audio => "audio mixer",
            Self::Font => "font",
            Self::Window => "window",
            Self::Surface => "renderer",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Initializing,
    Running,
    ShuttingDown,
    Terminated,
    /// Reached straight from `Initializing`; shutdown never runs.
    InitFailed,
}

impl Phase {
    pub fn can_advance_to(self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Phase::Uninitialized, Phase::Initializing)
                | (Phase::Initializing, Phase::Running)
                | (Phase::Initializing, Phase::InitFailed)
                | (Phase::Running, Phase::ShuttingDown)
                | (Phase::ShuttingDown, Phase::Terminated)
        )
    }
}

#[derive(Debug)]
pub struct Lifecycle {
    phase: Phase,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self {
            phase: Phase::Uninitialized,
        }
    }
}

impl Lifecycle {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn advance(&mut self, next: Phase) -> Result<()> {
        if !self.phase.can_advance_to(next) {
            return Err(ShellError::Phase {
                from: self.phase,
                to: next,
            });
        }
        info!("{:?} -> {:?}", self.phase, next);
        self.phase = next;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    AudioDevice,
    Window,
    Surface,
    Font,
    Music,
    Sample,
    ImageTexture,
    TextTexture,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Acquired,
    Released,
}

/// Shared, append-only record of acquisitions and releases.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    entries: Rc<RefCell<Vec<(Resource, Transition)>>>,
}

impl Ledger {
    pub fn track<T>(&self, resource: Resource, value: T) -> Tracked<T> {
        self.record(resource, Transition::Acquired);
        Tracked {
            resource,
            value,
            ledger: self.clone(),
        }
    }

    fn record(&self, resource: Resource, transition: Transition) {
        debug!("{resource:?} {transition:?}");
        self.entries.borrow_mut().push((resource, transition));
    }

    pub fn entries(&self) -> Vec<(Resource, Transition)> {
        self.entries.borrow().clone()
    }

    pub fn released(&self) -> Vec<Resource> {
        self.entries
            .borrow()
            .iter()
            .filter(|(_, t)| *t == Transition::Released)
            .map(|(r, _)| *r)
            .collect()
    }

    /// Resources acquired and not yet released, oldest first.
    pub fn outstanding(&self) -> Vec<Resource> {
        let mut held = Vec::new();
        for (resource, transition) in self.entries.borrow().iter() {
            match transition {
                Transition::Acquired => held.push(*resource),
                Transition::Released => {
                    if let Some(pos) = held.iter().rposition(|r| r == resource) {
                        held.remove(pos);
                    }
                }
            }
        }
        held
    }
}

/// A handle whose release is recorded when it drops.
pub struct Tracked<T> {
    resource: Resource,
    value: T,
    ledger: Ledger,
}

impl<T> Deref for Tracked<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T> DerefMut for Tracked<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

impl<T> Drop for Tracked<T> {
    fn drop(&mut self) {
        self.ledger.record(self.resource, Transition::Released);
    }
}
