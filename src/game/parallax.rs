use crate::engine::{Point, Rect, Size};

/// Paint order is back to front : Far, Mid, Near
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Depth {
    Far,
    Mid,
    Near,
}

impl Depth {
    pub const BACK_TO_FRONT: [Depth; 3] = [Depth::Far, Depth::Mid, Depth::Near];
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ParallaxLayer {
    depth: Depth,
    /// (-viewport width, 0] once scrolled
    offset: f64,
    speed_multiplier: f64,
}

impl ParallaxLayer {
    pub fn new(depth: Depth, speed_multiplier: f64) -> Self {
        ParallaxLayer {
            depth,
            offset: 0.0,
            speed_multiplier,
        }
    }

    pub fn depth(&self) -> Depth {
        self.depth
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Hard reset to 0 instead of modulo : the second copy drawn one
    /// viewport to the right sits exactly where the first one restarts
    pub fn scroll(&mut self, base_speed: f64, viewport_width: f64) {
        self.offset -= base_speed * self.speed_multiplier;
        if self.offset <= -viewport_width {
            self.offset = 0.0;
        }
    }

    /// The two screen spans the layer image is stretched into
    pub fn spans(&self, viewport: Size) -> [Rect; 2] {
        [
            Rect::new(
                Point {
                    x: self.offset,
                    y: 0.0,
                },
                viewport,
            ),
            Rect::new(
                Point {
                    x: self.offset + viewport.width,
                    y: 0.0,
                },
                viewport,
            ),
        ]
    }
}

/// Three layers, scrolled and wrapped independently of each other
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Parallax {
    layers: [ParallaxLayer; 3],
}

impl Parallax {
    /// `speeds` are multipliers of the run speed, far / mid / near
    pub fn new(speeds: [f64; 3]) -> Self {
        let [far, mid, near] = Depth::BACK_TO_FRONT;
        Parallax {
            layers: [
                ParallaxLayer::new(far, speeds[0]),
                ParallaxLayer::new(mid, speeds[1]),
                ParallaxLayer::new(near, speeds[2]),
            ],
        }
    }

    pub fn scroll(&mut self, base_speed: f64, viewport_width: f64) {
        for layer in self.layers.iter_mut() {
            layer.scroll(base_speed, viewport_width);
        }
    }

    /// Back to front
    pub fn layers(&self) -> &[ParallaxLayer; 3] {
        &self.layers
    }
}
