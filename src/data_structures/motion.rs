//! Per-frame motion of scene parts.
//!
//! Three kinds exist: a continuous [`Spin`], a breathing vertical scale
//! ([`Breathe`]) and the scripted move/wait [`TrainLoop`]. Each one is advanced by the
//! frame clock with the time elapsed since the previous frame.

use std::f32::consts::TAU;

use instant::Duration;

/// Constant angular velocity, radians per second.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spin {
    pub angular_velocity: f32,
    /// Current angle, kept in `[0, 2π)`.
    pub angle: f32,
}

impl Spin {
    pub const fn new(angular_velocity: f32) -> Self {
        Self {
            angular_velocity,
            angle: 0.0,
        }
    }

    pub fn update(&mut self, dt: Duration) {
        self.angle = (self.angle + self.angular_velocity * dt.as_secs_f32()).rem_euclid(TAU);
    }
}

/// Vertical scale oscillating around `base_scale`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Breathe {
    pub base_scale: f32,
    pub amplitude: f32,
    /// Phase advance, radians per second.
    pub rate: f32,
    pub phase: f32,
}

impl Breathe {
    pub const fn new(base_scale: f32, amplitude: f32, rate: f32) -> Self {
        Self {
            base_scale,
            amplitude,
            rate,
            phase: 0.0,
        }
    }

    pub fn update(&mut self, dt: Duration) {
        self.phase = (self.phase + self.rate * dt.as_secs_f32()).rem_euclid(TAU);
    }

    pub fn scale_y(&self) -> f32 {
        self.base_scale + self.amplitude * self.phase.sin()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrainPhase {
    Moving,
    Waiting,
}

/// Scripted loop: drive left across the screen, park off-screen right, wait, repeat.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrainLoop {
    pub phase: TrainPhase,
    /// Horizontal offset in logical units.
    pub x: f32,
    /// Logical units per second.
    pub speed: f32,
    pub wait: Duration,
    pub waited: Duration,
    pub node_width: f32,
    pub screen_width: f32,
}

impl TrainLoop {
    pub fn new(speed: f32, wait: Duration, node_width: f32, screen_width: f32) -> Self {
        Self {
            phase: TrainPhase::Moving,
            x: screen_width,
            speed,
            wait,
            waited: Duration::ZERO,
            node_width,
            screen_width,
        }
    }

    pub fn update(&mut self, dt: Duration) {
        match self.phase {
            TrainPhase::Moving => {
                self.x -= self.speed * dt.as_secs_f32();
                if self.x < -self.node_width {
                    self.phase = TrainPhase::Waiting;
                    self.x = self.screen_width;
                    self.waited = Duration::ZERO;
                }
            }
            TrainPhase::Waiting => {
                self.waited += dt;
                if self.waited >= self.wait {
                    self.phase = TrainPhase::Moving;
                    self.waited = Duration::ZERO;
                }
            }
        }
    }
}

/// Authoring form of a motion, see [`Motion::from_kind`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MotionKind {
    Spin { angular_velocity: f32 },
    Breathe { base_scale: f32, amplitude: f32, rate: f32 },
    /// Node width and screen width are taken from the part and the canvas.
    Train { speed: f32, wait: Duration },
}

/// Live motion state of one part.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Motion {
    Spin(Spin),
    Breathe(Breathe),
    Train(TrainLoop),
}

impl Motion {
    pub fn from_kind(kind: MotionKind, part_width: f32, screen_width: f32) -> Self {
        match kind {
            MotionKind::Spin { angular_velocity } => Motion::Spin(Spin::new(angular_velocity)),
            MotionKind::Breathe {
                base_scale,
                amplitude,
                rate,
            } => Motion::Breathe(Breathe::new(base_scale, amplitude, rate)),
            MotionKind::Train { speed, wait } => {
                Motion::Train(TrainLoop::new(speed, wait, part_width, screen_width))
            }
        }
    }

    pub fn update(&mut self, dt: Duration) {
        match self {
            Motion::Spin(spin) => spin.update(dt),
            Motion::Breathe(breathe) => breathe.update(dt),
            Motion::Train(train) => train.update(dt),
        }
    }
}
