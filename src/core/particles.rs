use super::constants::{
    FRICTION, GLOW_ALPHA_DARK, GLOW_ALPHA_LIGHT, GLOW_ALPHA_MIN, GLOW_RADIUS, GLOW_RADIUS_BOOST,
    GRID_SPACING, JITTER, PARTICLE_RADIUS, REPULSE_RADIUS, REPULSE_STRENGTH, RETURN_SPEED,
};
use glam::Vec2;
use rand::Rng;

/// One dot of the field. `origin` is fixed for the particle's lifetime.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub origin: Vec2,
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Particle {
    pub fn at_rest(origin: Vec2) -> Self {
        Self {
            origin,
            pos: origin,
            vel: Vec2::ZERO,
        }
    }

    #[inline]
    pub fn displacement(&self) -> f32 {
        self.pos.distance(self.origin)
    }
}

/// Last known pointer position in CSS pixels, or `Away` once it left the page.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Cursor {
    #[default]
    Away,
    At(Vec2),
}

impl Cursor {
    #[inline]
    pub fn position(&self) -> Option<Vec2> {
        match self {
            Cursor::Away => None,
            Cursor::At(p) => Some(*p),
        }
    }
}

/// Layout and physics knobs for a [`ParticleField`].
///
/// - `spacing`/`jitter`: grid pitch and max random offset of each origin
/// - `repulse_radius`/`repulse_strength`: cursor push, linear falloff to zero at the radius
/// - `return_speed`: spring coefficient toward the origin, in (0, 1)
/// - `friction`: velocity multiplier per step, in (0, 1)
/// - `glow_radius`: extent of the cursor glow pass
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldParams {
    pub spacing: f32,
    pub jitter: f32,
    pub radius: f32,
    pub repulse_radius: f32,
    pub repulse_strength: f32,
    pub return_speed: f32,
    pub friction: f32,
    pub glow_radius: f32,
    pub glow_alpha_min: f32,
    pub glow_radius_boost: f32,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            spacing: GRID_SPACING,
            jitter: JITTER,
            radius: PARTICLE_RADIUS,
            repulse_radius: REPULSE_RADIUS,
            repulse_strength: REPULSE_STRENGTH,
            return_speed: RETURN_SPEED,
            friction: FRICTION,
            glow_radius: GLOW_RADIUS,
            glow_alpha_min: GLOW_ALPHA_MIN,
            glow_radius_boost: GLOW_RADIUS_BOOST,
        }
    }
}

/// Colours for one theme. Chosen at mount time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub background: &'static str,
    pub dot: &'static str,
    pub glow_rgb: [u8; 3],
    pub glow_alpha: f32,
}

impl Palette {
    pub const DARK: Palette = Palette {
        background: "#0a0a0a",
        dot: "rgba(255,255,255,0.18)",
        glow_rgb: [167, 139, 250],
        glow_alpha: GLOW_ALPHA_DARK,
    };
    pub const LIGHT: Palette = Palette {
        background: "#ffffff",
        dot: "rgba(0,0,0,0.9)",
        glow_rgb: [109, 40, 217],
        glow_alpha: GLOW_ALPHA_LIGHT,
    };

    pub fn for_dark(dark: bool) -> Palette {
        if dark {
            Palette::DARK
        } else {
            Palette::LIGHT
        }
    }

    pub fn glow_fill(&self, alpha: f32) -> String {
        let [r, g, b] = self.glow_rgb;
        format!("rgba({},{},{},{:.3})", r, g, b, alpha)
    }
}

/// Lay particles out on a grid covering `width` x `height` with two spare
/// rows and columns past the far edges. Each origin is offset by up to
/// `jitter / 2` per axis; the offsets are drawn once here and never again.
pub fn build_grid<R: Rng + ?Sized>(
    width: f32,
    height: f32,
    spacing: f32,
    jitter: f32,
    rng: &mut R,
) -> Vec<Particle> {
    if !(spacing.is_finite() && spacing > 0.0) {
        return Vec::new();
    }
    let cols = (width.max(0.0) / spacing).ceil() as usize + 2;
    let rows = (height.max(0.0) / spacing).ceil() as usize + 2;
    let jitter = jitter.max(0.0);
    let mut particles = Vec::with_capacity(cols * rows);
    for r in 0..rows {
        for c in 0..cols {
            let ox = c as f32 * spacing + (rng.gen::<f32>() - 0.5) * jitter;
            let oy = r as f32 * spacing + (rng.gen::<f32>() - 0.5) * jitter;
            particles.push(Particle::at_rest(Vec2::new(ox, oy)));
        }
    }
    particles
}

/// Velocity kick from the cursor. Zero outside `repulse_radius`.
///
/// Magnitude is `(1 - dist / radius) * strength`, pointing away from the
/// cursor. A particle exactly under the cursor is pushed along +X.
pub fn repulsion(pos: Vec2, cursor: Cursor, params: &FieldParams) -> Vec2 {
    let Some(c) = cursor.position() else {
        return Vec2::ZERO;
    };
    let d = pos - c;
    let dist2 = d.length_squared();
    let r = params.repulse_radius;
    if !(dist2 < r * r) {
        return Vec2::ZERO;
    }
    let dist = dist2.sqrt();
    let dir = if dist > 0.0 { d / dist } else { Vec2::X };
    dir * (1.0 - dist / r) * params.repulse_strength
}

/// One integration step: repel, spring back, damp, move.
#[inline]
pub fn step(p: &mut Particle, cursor: Cursor, params: &FieldParams) {
    p.vel += repulsion(p.pos, cursor, params);
    p.vel += (p.origin - p.pos) * params.return_speed;
    p.vel *= params.friction;
    p.pos += p.vel;
}

/// A highlighted dot drawn on top of the base pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glow {
    pub pos: Vec2,
    pub radius: f32,
    pub alpha: f32,
}

/// Owns the particle set for one canvas size.
#[derive(Clone, Debug)]
pub struct ParticleField {
    params: FieldParams,
    particles: Vec<Particle>,
    size: Vec2,
}

impl ParticleField {
    pub fn new(params: FieldParams) -> Self {
        Self {
            params,
            particles: Vec::new(),
            size: Vec2::ZERO,
        }
    }

    #[inline]
    pub fn params(&self) -> &FieldParams {
        &self.params
    }

    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Rebuild the grid for new dimensions. Velocities are discarded.
    pub fn resize<R: Rng + ?Sized>(&mut self, width: f32, height: f32, rng: &mut R) {
        self.size = Vec2::new(width, height);
        self.particles = build_grid(
            width,
            height,
            self.params.spacing,
            self.params.jitter,
            rng,
        );
    }

    pub fn tick(&mut self, cursor: Cursor) {
        let params = self.params;
        for p in &mut self.particles {
            step(p, cursor, &params);
        }
    }

    /// Glow entries for particles inside `glow_radius` of the cursor. Alpha
    /// falls off with the square of the distance, peaking at `max_alpha`.
    pub fn glows(&self, cursor: Cursor, max_alpha: f32) -> impl Iterator<Item = Glow> + '_ {
        let params = self.params;
        let c = cursor.position();
        self.particles.iter().filter_map(move |p| {
            let c = c?;
            let dist2 = p.pos.distance_squared(c);
            let gr = params.glow_radius;
            if dist2 <= 0.0 || dist2 >= gr * gr {
                return None;
            }
            let intensity = 1.0 - dist2.sqrt() / gr;
            let alpha = max_alpha * intensity * intensity;
            (alpha >= params.glow_alpha_min).then_some(Glow {
                pos: p.pos,
                radius: params.radius + intensity * params.glow_radius_boost,
                alpha,
            })
        })
    }
}
