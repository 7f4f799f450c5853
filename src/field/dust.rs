use std::f32::consts::TAU;

use rand::Rng;

use super::surface::{Rgba, Surface};
use crate::mood::MoodColor;

const SPORE_CHANCE: f64 = 0.08;
const PHASE_STEP: f32 = 0.04;

/// A drifting mote. Spores are white and quicker; the rest take the mood
/// color.
#[derive(Debug, Clone, PartialEq)]
pub struct Dust {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub size: f32,
    pub alpha: f32,
    pub phase: f32,
    pub spore: bool,
}

impl Dust {
    pub fn spawn(rng: &mut impl Rng, width: f32, height: f32) -> Self {
        let spore = rng.gen_bool(SPORE_CHANCE);
        let spread = if spore { 2.5 } else { 0.5 };
        Self {
            x: rng.gen::<f32>() * width,
            y: rng.gen::<f32>() * height,
            vx: (rng.gen::<f32>() - 0.5) * spread,
            vy: (rng.gen::<f32>() - 0.5) * spread,
            size: if spore {
                rng.gen_range(0.2..1.4)
            } else {
                rng.gen_range(0.5..2.0)
            },
            alpha: rng.gen_range(0.05..0.45),
            phase: rng.gen::<f32>() * TAU,
            spore,
        }
    }

    pub fn update(&mut self, width: f32, height: f32) {
        self.x += self.vx;
        self.y += self.vy;
        self.phase = (self.phase + PHASE_STEP) % TAU;
        if self.x < 0.0 {
            self.x = width;
        } else if self.x > width {
            self.x = 0.0;
        }
        if self.y < 0.0 {
            self.y = height;
        } else if self.y > height {
            self.y = 0.0;
        }
    }

    pub fn glow(&self) -> f32 {
        (self.alpha + self.phase.sin() * 0.15).clamp(0.0, 1.0)
    }

    pub fn draw(&self, surface: &mut dyn Surface, mood: &MoodColor) {
        let color = if self.spore {
            Rgba::WHITE.with_alpha(self.glow())
        } else {
            Rgba::from_mood(mood, self.glow())
        };
        surface.circle([self.x, self.y], self.size, color);
    }
}
