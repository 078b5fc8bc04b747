// Shared tuning constants for the frame sequence and the particle field.

// Frame sequence defaults
pub const DEFAULT_FRAME_COUNT: u32 = 147;
pub const DEFAULT_FRAME_PATH: &str = "/sequence/webp";
pub const DEFAULT_FRAME_EXT: &str = "webp";
pub const PRELOAD_BATCH_SIZE: u32 = 20; // images in flight per batch

// Scroll smoothing spring (mass-spring-damper on the 0..1 progress value)
pub const SCROLL_SPRING_STIFFNESS: f32 = 180.0;
pub const SCROLL_SPRING_DAMPING: f32 = 32.0;
pub const SCROLL_SPRING_MASS: f32 = 0.35;
pub const SPRING_SUBSTEP_SEC: f32 = 0.004; // max integration step
pub const SPRING_MAX_DT_SEC: f32 = 0.1; // long stalls (tab switch) are clamped
pub const SPRING_REST_DELTA: f32 = 1e-4; // settle when |target - value| below this
pub const SPRING_REST_SPEED: f32 = 1e-3; // ...and |velocity| below this

// Captions
pub const CAPTION_FADE: f32 = 0.05; // progress span of the fade in/out ramps
pub const CAPTION_PARALLAX_PX: f32 = 50.0;

// Particle grid layout
pub const GRID_SPACING: f32 = 40.0; // px between particle origins
pub const JITTER: f32 = 6.0; // max random offset from grid
pub const PARTICLE_RADIUS: f32 = 1.4;

// Particle physics
pub const REPULSE_RADIUS: f32 = 120.0; // cursor influence radius
pub const REPULSE_STRENGTH: f32 = 8.0;
pub const RETURN_SPEED: f32 = 0.06; // spring coefficient back to origin, 0..1
pub const FRICTION: f32 = 0.88; // velocity damping per step, 0..1

// Glow pass around the cursor
pub const GLOW_RADIUS: f32 = 190.0;
pub const GLOW_ALPHA_MIN: f32 = 0.015; // fainter glows are not drawn
pub const GLOW_RADIUS_BOOST: f32 = 0.65; // extra dot radius at full intensity
pub const GLOW_ALPHA_DARK: f32 = 0.46;
pub const GLOW_ALPHA_LIGHT: f32 = 0.28;
