use super::constants::{
    SCROLL_SPRING_DAMPING, SCROLL_SPRING_MASS, SCROLL_SPRING_STIFFNESS, SPRING_MAX_DT_SEC,
    SPRING_REST_DELTA, SPRING_REST_SPEED, SPRING_SUBSTEP_SEC,
};

/// Mass-spring-damper coefficients.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringParams {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
}

impl Default for SpringParams {
    fn default() -> Self {
        Self {
            stiffness: SCROLL_SPRING_STIFFNESS,
            damping: SCROLL_SPRING_DAMPING,
            mass: SCROLL_SPRING_MASS,
        }
    }
}

/// A 1D spring that follows a moving target.
///
/// Used to smooth the raw scroll progress before it is mapped to a frame.
/// Integration is semi-implicit Euler with fixed sub-steps so the result does
/// not depend on the display refresh rate.
#[derive(Clone, Debug)]
pub struct Spring {
    params: SpringParams,
    value: f32,
    velocity: f32,
    target: f32,
}

impl Spring {
    pub fn new(params: SpringParams, initial: f32) -> Self {
        Self {
            params,
            value: initial,
            velocity: 0.0,
            target: initial,
        }
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Non-finite targets are ignored.
    pub fn set_target(&mut self, target: f32) {
        if target.is_finite() {
            self.target = target;
        }
    }

    /// Jump straight to `value` with no motion.
    pub fn snap(&mut self, value: f32) {
        if value.is_finite() {
            self.value = value;
            self.target = value;
            self.velocity = 0.0;
        }
    }

    pub fn is_settled(&self) -> bool {
        (self.target - self.value).abs() < SPRING_REST_DELTA
            && self.velocity.abs() < SPRING_REST_SPEED
    }

    /// Advance by `dt_sec` and return the new value.
    pub fn step(&mut self, dt_sec: f32) -> f32 {
        if !dt_sec.is_finite() || self.is_settled() {
            if self.is_settled() {
                self.value = self.target;
                self.velocity = 0.0;
            }
            return self.value;
        }
        let mass = self.params.mass.max(1e-3);
        let mut remaining = dt_sec.clamp(0.0, SPRING_MAX_DT_SEC);
        while remaining > 0.0 {
            let h = remaining.min(SPRING_SUBSTEP_SEC);
            let force = -self.params.stiffness * (self.value - self.target)
                - self.params.damping * self.velocity;
            self.velocity += force / mass * h;
            self.value += self.velocity * h;
            remaining -= h;
        }
        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
        }
        self.value
    }
}
