// Spring-damped brush.
//
// The pen does not follow the pointer directly: it is pulled towards it by a spring and
// slowed by friction, and its radius shrinks as it speeds up. Each frame's movement is
// split into many short sub-steps, and every sub-step lays down three slightly jittered
// parallel segments, which is what gives the stroke its bristly texture.

use crate::config::BrushConfig;
use crate::rng::Rng32;

/// Where the brush draws. The canvas implements this; tests record calls instead.
pub trait StrokeSurface {
    fn set_stroke_weight(&mut self, weight: f32);
    /// Straight segment with round caps at the current weight.
    fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32);
}

/// Per-stroke physics state plus the constants that drive it.
#[derive(Clone, Debug)]
pub struct Brush {
    config: BrushConfig,
    size: f32,
    drawing: bool,
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    /// Smoothed speed.
    speed: f32,
    radius: f32,
    /// Radius actually drawn, eased towards `radius` over the sub-steps.
    old_radius: f32,
    rng: Rng32,
}

impl Brush {
    pub fn new(config: &BrushConfig, rng: Rng32) -> Self {
        Self {
            config: config.clone(),
            size: config.size,
            drawing: false,
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            speed: config.initial_speed,
            radius: config.initial_radius.max(1.0),
            old_radius: config.initial_radius.max(1.0),
            rng,
        }
    }

    /// Feed one pointer sample.
    /// The first sample after `end`/`reset_all` only places the pen; later ones draw.
    pub fn stroke_to(&mut self, surface: &mut impl StrokeSurface, target_x: f32, target_y: f32) {
        if !self.drawing {
            self.drawing = true;
            self.x = target_x;
            self.y = target_y;
            return;
        }

        let BrushConfig { spring, friction, diff, .. } = self.config;
        let split = self.config.split_num.max(1);

        self.vx += (target_x - self.x) * spring;
        self.vy += (target_y - self.y) * spring;
        self.vx *= friction;
        self.vy *= friction;

        let magnitude = (self.vx * self.vx + self.vy * self.vy).sqrt();
        self.speed = self.speed * 0.55 + magnitude * 0.45;

        self.old_radius = self.radius;
        self.radius = (self.size - self.speed).max(1.0);

        let steps = split as f32;
        for _ in 0..split {
            let (old_x, old_y) = (self.x, self.y);
            self.x += self.vx / steps;
            self.y += self.vy / steps;
            self.old_radius = (self.old_radius + (self.radius - self.old_radius) / steps).max(1.0);

            // Main line: a little fatter, endpoints nudged down-right.
            surface.set_stroke_weight(self.old_radius + diff);
            let (a, b, c, d) = (
                self.rng.range(0.0, 2.0),
                self.rng.range(0.0, 2.0),
                self.rng.range(0.0, 2.0),
                self.rng.range(0.0, 2.0),
            );
            surface.line(self.x + a, self.y + b, old_x + c, old_y + d);

            // Two bristle lines either side.
            surface.set_stroke_weight(self.old_radius);
            for sign in [1.0f32, -1.0] {
                let (a, b, c, d) = (
                    self.rng.range(0.1, 2.0),
                    self.rng.range(0.1, 2.0),
                    self.rng.range(0.1, 2.0),
                    self.rng.range(0.1, 2.0),
                );
                surface.line(
                    self.x + sign * diff * a,
                    self.y + sign * diff * b,
                    old_x + sign * diff * c,
                    old_y + sign * diff * d,
                );
            }
        }
    }

    /// Pointer released: stop, but keep position and radius for the next stroke.
    pub fn end(&mut self) {
        self.vx = 0.0;
        self.vy = 0.0;
        self.drawing = false;
    }

    /// Back to configured values (restart).
    pub fn reset_all(&mut self) {
        self.size = self.config.size;
        self.drawing = false;
        self.vx = 0.0;
        self.vy = 0.0;
        self.speed = self.config.initial_speed;
        self.radius = self.config.initial_radius.max(1.0);
        self.old_radius = self.radius;
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn velocity(&self) -> (f32, f32) {
        (self.vx, self.vy)
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// (target radius, drawn radius)
    pub fn radii(&self) -> (f32, f32) {
        (self.radius, self.old_radius)
    }
}
