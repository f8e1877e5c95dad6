use std::f32::consts::TAU;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Spacing multipliers for ring packing, both relative to the steering radius
/// of the unit that completes a ring.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq)]
pub struct FormationConfig {
    /// Radial gap between consecutive rings.
    pub layer_spacing_multiplier: f32,
    /// Arc length reserved per unit on a ring.
    pub unit_spacing_multiplier: f32,
}

impl Default for FormationConfig {
    fn default() -> Self {
        Self {
            layer_spacing_multiplier: 3.5,
            unit_spacing_multiplier: 2.0,
        }
    }
}

/// Per-batch accumulator. Lives for one dispatch batch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingState {
    pub ring_index: u32,
    /// Units already placed on the current ring.
    pub ring_count: u32,
    pub max_per_ring: u32,
    pub ring_radius: f32,
    pub angular_step: f32,
}

impl Default for RingState {
    fn default() -> Self {
        Self {
            ring_index: 0,
            ring_count: 0,
            max_per_ring: 1,
            ring_radius: 0.0,
            angular_step: 0.0,
        }
    }
}

/// Places units on concentric rings around a target so they do not pile up.
///
/// Ring 0 has radius 0 and holds exactly one unit at the target. Each ring
/// is sized for a fully packed circle; the last ring of a batch is usually
/// only partly filled and keeps that packed angular step, so its units bunch
/// up on one side.
#[derive(Clone, Debug, Default)]
pub struct RingPacker {
    config: FormationConfig,
    state: RingState,
}

impl RingPacker {
    pub fn new(config: FormationConfig) -> Self {
        Self { config, state: RingState::default() }
    }

    pub fn reset(&mut self) {
        self.state = RingState::default();
    }

    pub fn state(&self) -> RingState {
        self.state
    }

    pub fn config(&self) -> FormationConfig {
        self.config
    }

    pub fn set_config(&mut self, config: FormationConfig) {
        self.config = config;
    }

    /// Destination for the next unit, then advance the accumulator.
    pub fn place(&mut self, target: Vec3, steering_radius: f32) -> Vec3 {
        let state = &mut self.state;
        let angle = state.angular_step * state.ring_count as f32;
        let destination = target
            + Vec3::new(
                state.ring_radius * angle.cos(),
                0.0,
                state.ring_radius * angle.sin(),
            );

        state.ring_count += 1;
        if state.ring_count >= state.max_per_ring {
            let radius = if steering_radius.is_finite() && steering_radius > 0.0 {
                steering_radius
            } else {
                warn!(
                    "Steering radius {} is not positive; next ring holds a single unit",
                    steering_radius
                );
                0.0
            };

            state.ring_index += 1;
            state.ring_radius += radius * self.config.layer_spacing_multiplier;
            state.ring_count = 0;
            state.max_per_ring =
                units_per_ring(state.ring_radius, radius * self.config.unit_spacing_multiplier);
            state.angular_step = TAU / state.max_per_ring as f32;
        }

        destination
    }
}

/// `floor(circumference / spacing)`, never below 1.
fn units_per_ring(ring_radius: f32, spacing: f32) -> u32 {
    if spacing.is_nan() || spacing <= 0.0 {
        return 1;
    }
    let fit = (TAU * ring_radius / spacing).floor();
    if fit.is_finite() && fit >= 1.0 {
        fit as u32
    } else {
        1
    }
}
