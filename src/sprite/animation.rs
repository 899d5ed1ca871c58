use super::SpriteSheet;

/// Looping playback position on a sheet
/// - frame : [0, total frames)
/// - timer : [0, frame speed)
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Animation {
    frame: u32,
    timer: u32,
}

impl Animation {
    pub fn new() -> Self {
        Animation::default()
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn timer(&self) -> u32 {
        self.timer
    }

    /// ::tick once per update
    /// - every `frame_speed` ticks the frame advances
    /// - past the last frame it wraps to 0 (hard loop)
    pub fn tick(&mut self, sheet: &SpriteSheet) {
        self.timer += 1;
        if self.timer >= sheet.frame_speed() {
            self.frame = (self.frame + 1) % sheet.total_frames();
            self.timer = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Size;
    use crate::sprite::{SheetLayout, StripDirection};

    fn sheet(frame_count: u32, frame_speed: u32) -> SpriteSheet {
        SpriteSheet::new(
            Size {
                width: 90.0,
                height: 10.0,
            },
            SheetLayout::Strip {
                frame_count,
                direction: StripDirection::Horizontal,
            },
            frame_speed,
        )
        .expect("sheet")
    }

    #[test]
    fn frame_holds_for_frame_speed_ticks() {
        let sheet = sheet(9, 6);
        let mut animation = Animation::new();

        for _ in 0..5 {
            animation.tick(&sheet);
        }
        assert_eq!(animation.frame(), 0);
        assert_eq!(animation.timer(), 5);

        animation.tick(&sheet);
        assert_eq!(animation.frame(), 1);
        assert_eq!(animation.timer(), 0);
    }

    #[test]
    fn last_frame_wraps_to_first() {
        let sheet = sheet(3, 1);
        let mut animation = Animation::new();

        let frames: Vec<u32> = (0..7)
            .map(|_| {
                animation.tick(&sheet);
                animation.frame()
            })
            .collect();

        assert_eq!(frames, vec![1, 2, 0, 1, 2, 0, 1]);
    }

    #[test]
    fn cycle_period_is_frames_times_speed() {
        let sheet = sheet(9, 6);
        let mut animation = Animation::new();
        let period = sheet.total_frames() * sheet.frame_speed();

        for tick in 1..=period * 3 {
            animation.tick(&sheet);
            assert!(animation.frame() < sheet.total_frames());
            assert!(animation.timer() < sheet.frame_speed());
            assert_eq!(animation.frame(), (tick / sheet.frame_speed()) % sheet.total_frames());
            if tick % period == 0 {
                assert_eq!(animation, Animation::new());
            }
        }
    }
}
