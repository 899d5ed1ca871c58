use super::Gesture;
use crate::config::{GestureConfig, PhysicsConfig};
use crate::engine::{Point, Rect, Size};
use crate::sprite::{Animation, SpriteSheet};

/// Shared data for :
/// - physics : position + vertical velocity + grounded
/// - display : size + animation playback
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Player {
    position: Point,
    velocity_y: f64,
    size: Size,
    grounded: bool,
    animation: Animation,
}

impl Player {
    /// Standing on `ground_line` at `x`
    pub fn new(x: f64, ground_line: f64, size: Size) -> Self {
        Player {
            position: Point {
                x,
                y: ground_line - size.height,
            },
            velocity_y: 0.0,
            size,
            grounded: true,
            animation: Animation::new(),
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn velocity_y(&self) -> f64 {
        self.velocity_y
    }

    pub fn grounded(&self) -> bool {
        self.grounded
    }

    pub fn frame(&self) -> u32 {
        self.animation.frame()
    }

    /// Screen rectangle the sprite is painted into
    pub fn bounding_box(&self) -> Rect {
        Rect::new(self.position, self.size)
    }

    /// ::integrate per tick
    /// - gravity every tick, even on the ground
    /// - velocity -> position
    /// - clamp onto the ground line, the player never ends a tick below it
    pub fn integrate(&mut self, physics: &PhysicsConfig, ground_line: f64) {
        self.velocity_y += physics.gravity;
        self.position.y += self.velocity_y;

        if self.position.y + self.size.height >= ground_line {
            self.position.y = ground_line - self.size.height;
            self.velocity_y = 0.0;
            self.grounded = true;
        } else {
            self.grounded = false;
        }
    }

    /// Effects land immediately, the next `integrate` picks them up
    /// - dash is a teleport : no velocity, no grounded check, no edges
    /// - down strike while grounded is undone by the next ground clamp
    pub fn apply(&mut self, gesture: Gesture, physics: &PhysicsConfig, gestures: &GestureConfig) {
        match gesture {
            Gesture::DashRight => self.position.x += gestures.dash_distance,
            Gesture::DashLeft => self.position.x -= gestures.dash_distance,
            Gesture::Jump => {
                self.velocity_y = physics.jump_force;
                self.grounded = false;
            }
            Gesture::DownStrike => self.velocity_y = physics.strike_speed,
            Gesture::NoEffect => {}
        }
    }

    pub fn animate(&mut self, sheet: &SpriteSheet) {
        self.animation.tick(sheet);
    }
}
