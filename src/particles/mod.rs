// Particle field - decorative dots that chase the pointer
//
// Positions are in terminal cells (x to the right, y downward). Depth `z`
// is cosmetic: 0 is resting, 100 is "right in front of the camera". Closer
// particles are brighter, drawn with a heavier glyph, and drawn last.
//
// Motion model per tick, with `dt` measured in ~60fps frames:
// - pointer moving and within the attraction radius: pulled toward it by
//   ATTRACTION_FORCE * (1 - d/max) * dt, depth rises
// - otherwise: eased back toward its origin by RETURN_RATE * dt of the
//   remaining offset plus a little jitter, depth decays

pub mod animator;
pub mod pointer;

use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;
use ratatui::style::Color;

use crate::theme::{parse_palette, DARK_PALETTE, LIGHT_PALETTE};

pub use animator::CursorAnimator;
pub use pointer::PointerState;

// ============================================================================
// Tuning
// ============================================================================

/// Nominal frame length that movement constants are expressed against
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Upper bound on frames applied in a single tick (stalled terminal, resume)
pub const MAX_FRAME_STEPS: f32 = 4.0;

/// Pull toward the pointer at zero distance, in cells per frame
pub const ATTRACTION_FORCE: f32 = 0.6;

/// Fraction of the offset from origin recovered per frame
pub const RETURN_RATE: f32 = 0.02;

/// Peak-to-peak random drift per frame while returning, in cells
pub const JITTER: f32 = 0.05;

/// Depth gained per frame at full attraction
pub const DEPTH_GAIN: f32 = 2.0;

/// Depth lost per frame when not attracted
pub const DEPTH_DECAY: f32 = 0.3;

/// Closest depth a particle can reach
pub const MAX_DEPTH: f32 = 100.0;

/// Depth range new particles start in
const SEED_DEPTH_MAX: f32 = 30.0;

/// Glyphs from far/faint to near/sharp
pub const DEPTH_GLYPHS: [&str; 3] = ["·", "•", "●"];

// ============================================================================
// Configuration
// ============================================================================

/// Visual settings for the particle field
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleConfig {
    /// Number of particles kept alive
    pub particle_count: usize,

    /// Pointer distance (cells) under which particles are attracted
    pub max_attraction_distance: f32,

    /// Nominal particle size; actual sizes vary from half to one and a half of it
    pub particle_size: f32,

    /// Opacity of a particle at maximum depth (0.0 ~ 1.0)
    pub particle_opacity: f32,

    /// Colors drawn on the dark surface
    pub dark_palette: Vec<Color>,

    /// Colors drawn on the light surface
    pub light_palette: Vec<Color>,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            particle_count: 30,
            max_attraction_distance: 18.0,
            particle_size: 8.0,
            particle_opacity: 0.6,
            dark_palette: parse_palette(&DARK_PALETTE),
            light_palette: parse_palette(&LIGHT_PALETTE),
        }
    }
}

impl ParticleConfig {
    /// Palette for the given resolved theme
    pub fn palette(&self, is_dark: bool) -> &[Color] {
        if is_dark {
            &self.dark_palette
        } else {
            &self.light_palette
        }
    }
}

/// Area the particles live in, in cells
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A zero-area viewport means there is nothing live to draw into
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }
}

// ============================================================================
// Motion math
// ============================================================================

/// Convert wall-clock time since the last tick into frame steps
pub fn frame_steps(elapsed: Duration) -> f32 {
    let frames = elapsed.as_secs_f32() / FRAME_INTERVAL.as_secs_f32();
    frames.clamp(0.0, MAX_FRAME_STEPS)
}

/// Inverse-linear falloff: 1 at the pointer, 0 at and beyond `max_distance`
pub fn falloff(distance: f32, max_distance: f32) -> f32 {
    if max_distance <= 0.0 || distance >= max_distance {
        0.0
    } else {
        1.0 - distance.max(0.0) / max_distance
    }
}

/// Length of this tick's pull toward the pointer
pub fn attraction_magnitude(distance: f32, max_distance: f32, dt: f32) -> f32 {
    ATTRACTION_FORCE * falloff(distance, max_distance) * dt
}

/// Displacement toward the pointer for a particle at `from`
///
/// Zero outside the radius, and zero when the particle sits exactly on the
/// pointer (there is no direction to pull in).
pub fn attraction_displacement(
    from: (f32, f32),
    pointer: (f32, f32),
    max_distance: f32,
    dt: f32,
) -> (f32, f32) {
    let dx = pointer.0 - from.0;
    let dy = pointer.1 - from.1;
    let distance = dx.hypot(dy);
    if distance <= f32::EPSILON {
        return (0.0, 0.0);
    }
    let magnitude = attraction_magnitude(distance, max_distance, dt);
    (dx / distance * magnitude, dy / distance * magnitude)
}

/// Rendered opacity for a depth; rises monotonically as the particle nears
pub fn depth_opacity(z: f32, base_opacity: f32) -> f32 {
    let nearness = (z / MAX_DEPTH).clamp(0.0, 1.0);
    base_opacity.clamp(0.0, 1.0) * (0.35 + 0.65 * nearness)
}

// ============================================================================
// Particles
// ============================================================================

/// One decorative dot
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    /// Cosmetic depth (0 = resting, 100 = closest)
    pub z: f32,
    pub color: Color,
    pub size: f32,
    /// Resting position the particle drifts back to
    pub origin_x: f32,
    pub origin_y: f32,
}

impl Particle {
    /// Glyph for this particle; heavier when closer or larger
    pub fn glyph(&self, nominal_size: f32) -> &'static str {
        let nearness = (self.z / MAX_DEPTH).clamp(0.0, 1.0);
        let bulk = if nominal_size > 0.0 {
            (self.size / nominal_size - 0.5).clamp(0.0, 1.0)
        } else {
            0.5
        };
        let weight = nearness * 0.7 + bulk * 0.3;
        let idx = ((weight * DEPTH_GLYPHS.len() as f32) as usize).min(DEPTH_GLYPHS.len() - 1);
        DEPTH_GLYPHS[idx]
    }

    pub fn opacity(&self, base_opacity: f32) -> f32 {
        depth_opacity(self.z, base_opacity)
    }
}

/// The particle collection for one resolved theme
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    is_dark: bool,
}

impl ParticleField {
    /// Generate a fresh field at random positions with theme colors
    pub fn seed<R: Rng + ?Sized>(
        config: &ParticleConfig,
        viewport: Viewport,
        is_dark: bool,
        rng: &mut R,
    ) -> Self {
        let palette = config.palette(is_dark);
        let min_size = config.particle_size / 2.0;
        let particles = (0..config.particle_count)
            .map(|_| {
                let x = rng.gen::<f32>() * viewport.width;
                let y = rng.gen::<f32>() * viewport.height;
                Particle {
                    x,
                    y,
                    z: rng.gen::<f32>() * SEED_DEPTH_MAX,
                    color: palette.choose(rng).copied().unwrap_or(Color::Reset),
                    size: min_size + rng.gen::<f32>() * config.particle_size,
                    origin_x: x,
                    origin_y: y,
                }
            })
            .collect();

        Self { particles, is_dark }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Theme the field was seeded for
    pub fn is_dark(&self) -> bool {
        self.is_dark
    }

    /// Advance every particle by `dt` frames
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        pointer: &PointerState,
        config: &ParticleConfig,
        dt: f32,
        rng: &mut R,
    ) {
        let target = pointer.position();
        let max_distance = config.max_attraction_distance;
        let return_step = (RETURN_RATE * dt).min(1.0);

        for particle in &mut self.particles {
            let distance = (target.0 - particle.x).hypot(target.1 - particle.y);

            if pointer.is_moving() && distance < max_distance {
                let (dx, dy) =
                    attraction_displacement((particle.x, particle.y), target, max_distance, dt);
                particle.x += dx;
                particle.y += dy;
                particle.z = (particle.z
                    + DEPTH_GAIN * falloff(distance, max_distance) * dt)
                    .min(MAX_DEPTH);
            } else {
                let jitter_x = (rng.gen::<f32>() - 0.5) * JITTER * dt;
                let jitter_y = (rng.gen::<f32>() - 0.5) * JITTER * dt;
                particle.x += (particle.origin_x - particle.x) * return_step + jitter_x;
                particle.y += (particle.origin_y - particle.y) * return_step + jitter_y;
                particle.z = (particle.z - DEPTH_DECAY * dt).max(0.0);
            }
        }
    }

    /// Particles ordered far to near, so closer ones draw on top
    pub fn draw_order(&self) -> Vec<&Particle> {
        let mut ordered: Vec<&Particle> = self.particles.iter().collect();
        ordered.sort_by(|a, b| a.z.total_cmp(&b.z));
        ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::time::Instant;

    const MAX: f32 = 18.0;

    proptest! {
        /// **Property: no pull at or beyond the attraction radius**
        #[test]
        fn prop_no_attraction_outside_radius(
            extra in 0.0f32..500.0,
            dt in 0.0f32..MAX_FRAME_STEPS,
        ) {
            prop_assert_eq!(attraction_magnitude(MAX + extra, MAX, dt), 0.0);
            let (dx, dy) = attraction_displacement((0.0, 0.0), (MAX + extra, 0.0), MAX, dt);
            prop_assert_eq!((dx, dy), (0.0, 0.0));
        }

        /// **Property: pull strictly weakens with distance inside the radius**
        #[test]
        fn prop_attraction_monotonic_falloff(
            a in 0.01f32..17.9,
            b in 0.01f32..17.9,
            dt in 0.1f32..MAX_FRAME_STEPS,
        ) {
            prop_assume!((a - b).abs() > 1e-3);
            let (near, far) = if a < b { (a, b) } else { (b, a) };
            prop_assert!(attraction_magnitude(near, MAX, dt) > attraction_magnitude(far, MAX, dt));
        }

        /// **Property: displacement points at the pointer with the falloff length**
        #[test]
        fn prop_displacement_matches_magnitude(
            radius in 0.01f32..17.9,
            angle in 0.0f32..std::f32::consts::TAU,
        ) {
            let (px, py) = (angle.cos() * radius, angle.sin() * radius);
            let distance = px.hypot(py);
            let (dx, dy) = attraction_displacement((0.0, 0.0), (px, py), MAX, 1.0);
            let expected = attraction_magnitude(distance, MAX, 1.0);
            prop_assert!((dx.hypot(dy) - expected).abs() < 1e-4);
            prop_assert!(dx * px + dy * py > 0.0);
        }

        /// **Property: opacity rises with depth**
        #[test]
        fn prop_depth_opacity_monotonic(a in 0.0f32..100.0, b in 0.0f32..100.0) {
            prop_assume!((a - b).abs() > 1e-3);
            let (far, near) = if a < b { (a, b) } else { (b, a) };
            prop_assert!(depth_opacity(near, 0.6) > depth_opacity(far, 0.6));
        }
    }

    fn field(is_dark: bool) -> (ParticleField, ParticleConfig, ChaCha8Rng) {
        let config = ParticleConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let field = ParticleField::seed(&config, Viewport::new(80.0, 24.0), is_dark, &mut rng);
        (field, config, rng)
    }

    #[test]
    fn test_frame_steps_normalizes_and_clamps() {
        assert_eq!(frame_steps(Duration::ZERO), 0.0);
        assert!((frame_steps(Duration::from_millis(16)) - 1.0).abs() < 1e-4);
        assert!((frame_steps(Duration::from_millis(32)) - 2.0).abs() < 1e-4);
        assert_eq!(frame_steps(Duration::from_secs(5)), MAX_FRAME_STEPS);
    }

    #[test]
    fn test_zero_distance_has_no_direction() {
        assert_eq!(attraction_displacement((3.0, 4.0), (3.0, 4.0), MAX, 1.0), (0.0, 0.0));
    }

    #[test]
    fn test_seed_uses_theme_palette_and_bounds() {
        let (dark, config, _) = field(true);
        assert_eq!(dark.particles().len(), config.particle_count);
        for p in dark.particles() {
            assert!(config.dark_palette.contains(&p.color));
            assert!((0.0..80.0).contains(&p.x) && (0.0..24.0).contains(&p.y));
            assert_eq!((p.x, p.y), (p.origin_x, p.origin_y));
            assert!(p.size >= config.particle_size / 2.0 && p.size < config.particle_size * 1.5);
        }

        let (light, config, _) = field(false);
        assert!(light.particles().iter().all(|p| config.light_palette.contains(&p.color)));
    }

    #[test]
    fn test_idle_pointer_lets_particles_return_home() {
        let (mut field, config, mut rng) = field(true);
        for p in &mut field.particles {
            p.x += 10.0;
            p.z = 50.0;
        }
        let pointer = PointerState::new(0.0, 0.0);

        let before: f32 = field.particles().iter().map(|p| (p.x - p.origin_x).abs()).sum();
        for _ in 0..60 {
            field.step(&pointer, &config, 1.0, &mut rng);
        }
        let after: f32 = field.particles().iter().map(|p| (p.x - p.origin_x).abs()).sum();

        assert!(after < before);
        assert!(field.particles().iter().all(|p| p.z < 50.0));
    }

    #[test]
    fn test_moving_pointer_pulls_nearby_particle_forward() {
        let config = ParticleConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut field = ParticleField {
            particles: vec![Particle {
                x: 10.0,
                y: 10.0,
                z: 0.0,
                color: Color::Rgb(0, 0, 0),
                size: 8.0,
                origin_x: 10.0,
                origin_y: 10.0,
            }],
            is_dark: true,
        };
        let mut pointer = PointerState::new(15.0, 10.0);
        pointer.on_move(15.0, 10.0, Instant::now());

        field.step(&pointer, &config, 1.0, &mut rng);

        let p = &field.particles()[0];
        assert!(p.x > 10.0 && p.x < 15.0);
        assert_eq!(p.y, 10.0);
        assert!(p.z > 0.0);
    }

    #[test]
    fn test_draw_order_far_to_near() {
        let (field, _, _) = field(false);
        let order = field.draw_order();
        assert!(order.windows(2).all(|pair| pair[0].z <= pair[1].z));
    }

    #[test]
    fn test_glyph_gets_heavier_when_closer() {
        let mut p = Particle {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            color: Color::Reset,
            size: 4.0,
            origin_x: 0.0,
            origin_y: 0.0,
        };
        assert_eq!(p.glyph(8.0), "·");
        p.z = MAX_DEPTH;
        p.size = 12.0;
        assert_eq!(p.glyph(8.0), "●");
    }

    #[test]
    fn test_empty_viewport() {
        assert!(Viewport::new(0.0, 10.0).is_empty());
        assert!(!Viewport::new(1.0, 1.0).is_empty());
    }
}
