use crate::config::{Boundary, VisualizerConfig};
use glam::Vec2;
use rand::Rng;
use std::ops::Range;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// On-screen rectangle of one bar's container, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementRect {
    /// Top-left corner.
    pub origin: Vec2,
    pub size: Vec2,
}

impl ElementRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Vec2::new(left, top),
            size: Vec2::new(width, height),
        }
    }

    /// Rectangles with no area (collapsed or unlaid-out bars) cannot host
    /// particle motion, since velocity is scaled by the inverse size.
    pub fn has_area(&self) -> bool {
        self.origin.is_finite() && self.size.is_finite() && self.size.x > 0.0 && self.size.y > 0.0
    }
}

/// Decorative point masses confined to their owning bar.
///
/// SoA storage. Positions are normalized to the owner's rectangle, so they
/// always lie in the unit square; velocities are in pixels per update.
/// Particles for element `e` occupy the contiguous range
/// `e * per_element..(e + 1) * per_element`.
pub struct ParticleField {
    pub count: usize,
    pub per_element: usize,
    pub owner: Vec<u32>,
    pub position: Vec<Vec2>,
    pub velocity: Vec<Vec2>,
    boundary: Boundary,
    /// Display frames seen so far; positions integrate on even frames.
    frame: u64,
}

impl ParticleField {
    /// Build `config.particles_per_element` particles for each of `elements`
    /// bars, scattered uniformly with random velocities.
    pub fn new<R: Rng + ?Sized>(elements: usize, config: &VisualizerConfig, rng: &mut R) -> Self {
        let per_element = config.particles_per_element;
        let count = elements * per_element;
        let max_speed = config.particle_max_speed;

        let mut owner = Vec::with_capacity(count);
        let mut position = Vec::with_capacity(count);
        let mut velocity = Vec::with_capacity(count);
        for e in 0..elements {
            for _ in 0..per_element {
                owner.push(e as u32);
                position.push(Vec2::new(rng.gen::<f32>(), rng.gen::<f32>()));
                velocity.push(Vec2::new(
                    (rng.gen::<f32>() - 0.5) * max_speed,
                    (rng.gen::<f32>() - 0.5) * max_speed,
                ));
            }
        }

        Self {
            count,
            per_element,
            owner,
            position,
            velocity,
            boundary: config.boundary,
            frame: 0,
        }
    }

    pub fn element_count(&self) -> usize {
        if self.per_element == 0 {
            0
        } else {
            self.count / self.per_element
        }
    }

    pub fn particles_of(&self, element: usize) -> Range<usize> {
        let start = (element * self.per_element).min(self.count);
        let end = (start + self.per_element).min(self.count);
        start..end
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    /// Advance one display frame.
    ///
    /// Positions move only on even frames. `rects[e]` is the current
    /// rectangle of element `e`, or `None` when it is off-screen; particles of
    /// hidden elements keep their state untouched. Returns whether positions
    /// were integrated this frame.
    pub fn tick(&mut self, rects: &[Option<ElementRect>]) -> bool {
        self.frame += 1;
        if self.frame % 2 != 0 {
            return false;
        }
        self.integrate(rects);
        true
    }

    /// Move every visible particle by its velocity and bounce it off the
    /// edges of its bar.
    pub fn integrate(&mut self, rects: &[Option<ElementRect>]) {
        let boundary = self.boundary;
        let rect_of = |owner: u32| {
            rects
                .get(owner as usize)
                .copied()
                .flatten()
                .filter(ElementRect::has_area)
        };

        #[cfg(feature = "parallel")]
        {
            self.position
                .par_iter_mut()
                .zip(self.velocity.par_iter_mut())
                .zip(self.owner.par_iter())
                .for_each(|((pos, vel), &owner)| {
                    if let Some(rect) = rect_of(owner) {
                        advance_particle(pos, vel, rect, boundary);
                    }
                });
        }

        #[cfg(not(feature = "parallel"))]
        {
            for i in 0..self.count {
                if let Some(rect) = rect_of(self.owner[i]) {
                    advance_particle(&mut self.position[i], &mut self.velocity[i], rect, boundary);
                }
            }
        }
    }

    /// Project visible particles into screen space.
    ///
    /// x spans the bar's width; y rises from the bottom of the rectangle up
    /// to the top of the bar, whose height is `values[e] / max_value` of the
    /// rectangle. Hidden elements are skipped. `out` is cleared first.
    pub fn screen_positions(
        &self,
        rects: &[Option<ElementRect>],
        values: &[u32],
        max_value: u32,
        out: &mut Vec<Vec2>,
    ) {
        out.clear();
        let max_value = max_value.max(1) as f32;
        for i in 0..self.count {
            let e = self.owner[i] as usize;
            let (Some(Some(rect)), Some(&value)) = (rects.get(e), values.get(e)) else {
                continue;
            };
            let bar_height = value as f32 / max_value * rect.size.y;
            let p = self.position[i];
            out.push(Vec2::new(
                rect.origin.x + p.x * rect.size.x,
                rect.origin.y + rect.size.y - p.y * bar_height,
            ));
        }
    }

    /// Normalized positions as interleaved `x, y` floats.
    pub fn position_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.position)
    }
}

#[inline]
fn advance_particle(pos: &mut Vec2, vel: &mut Vec2, rect: ElementRect, boundary: Boundary) {
    *pos += *vel / rect.size;
    bounce_axis(&mut pos.x, &mut vel.x, boundary);
    bounce_axis(&mut pos.y, &mut vel.y, boundary);
}

/// Clamp one coordinate into [0, 1] and turn its velocity back inward.
///
/// The reflected component always points away from the wall it hit, so a
/// particle resting on an edge cannot flip back and forth across it.
#[inline]
fn bounce_axis(p: &mut f32, v: &mut f32, boundary: Boundary) {
    let keep = match boundary {
        Boundary::Reflect => 1.0,
        Boundary::Damped { restitution } => restitution,
    };
    if *p < 0.0 {
        *p = 0.0;
        *v = v.abs() * keep;
    } else if *p > 1.0 {
        *p = 1.0;
        *v = -v.abs() * keep;
    }
}
