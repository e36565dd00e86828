use super::item::Item;
use super::layout::sector_angle;
use super::{FULL_REVOLUTIONS, FULL_TURN};
use rand::Rng;

/// Reduces an unbounded rotation to `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    degrees.rem_euclid(FULL_TURN)
}

/// Rotation that brings the middle of sector `target_index` under the fixed
/// pointer after `revolutions` extra turns. The wheel only ever moves forward:
/// the correction is in `(-720, 0]`, which `revolutions >= 2` always outruns.
pub fn final_rotation(current: f64, target_index: usize, count: usize, revolutions: u32) -> f64 {
    let angle = sector_angle(count);
    let base = normalize_degrees(current);
    let target_angle = -(target_index as f64 + 0.5) * angle;
    let delta = target_angle - base;
    current + f64::from(revolutions) * FULL_TURN + delta
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpinPhase {
    Idle,
    /// `captured` is the active set as it was when the spin began.
    Spinning {
        target_index: usize,
        captured: Vec<Item>,
    },
}

/// Published by `start`; the view animates from `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spin {
    pub target_index: usize,
    pub from: f64,
    pub to: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub item: Item,
    pub index: usize,
}

#[derive(Debug, Clone)]
pub struct SpinEngine {
    rotation: f64,
    revolutions: u32,
    phase: SpinPhase,
}

impl Default for SpinEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SpinEngine {
    pub fn new() -> Self {
        Self::with_revolutions(FULL_REVOLUTIONS)
    }

    pub fn with_revolutions(revolutions: u32) -> Self {
        Self {
            rotation: 0.0,
            revolutions: revolutions.max(2),
            phase: SpinPhase::Idle,
        }
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn phase(&self) -> &SpinPhase {
        &self.phase
    }

    pub fn is_spinning(&self) -> bool {
        matches!(self.phase, SpinPhase::Spinning { .. })
    }

    /// Picks a sector uniformly and aims the wheel at it. Refused (with no
    /// state change) when there is nothing to pick or a spin is in flight.
    pub fn start<R: Rng>(&mut self, active: &[Item], rng: &mut R) -> Option<Spin> {
        if active.is_empty() || self.is_spinning() {
            return None;
        }
        let target_index = rng.random_range(0..active.len());
        let from = self.rotation;
        let to = final_rotation(from, target_index, active.len(), self.revolutions);

        self.rotation = to;
        self.phase = SpinPhase::Spinning {
            target_index,
            captured: active.to_vec(),
        };

        log::debug!(
            "spin started: target {} of {}, {:.2} -> {:.2}",
            target_index,
            active.len(),
            from,
            to
        );
        Some(Spin {
            target_index,
            from,
            to,
        })
    }

    /// Ends the in-flight spin and yields its selection. A second call (or a
    /// call while idle) yields nothing.
    pub fn settle(&mut self) -> Option<Selection> {
        match std::mem::replace(&mut self.phase, SpinPhase::Idle) {
            SpinPhase::Spinning {
                target_index,
                captured,
            } => captured.get(target_index).cloned().map(|item| Selection {
                item,
                index: target_index,
            }),
            SpinPhase::Idle => None,
        }
    }
}
