use crate::config::GestureConfig;

/// What a completed swipe asks the player to do
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Gesture {
    DashLeft,
    DashRight,
    Jump,
    DownStrike,
    NoEffect,
}

impl Gesture {
    /// (dx, dy) = end - start, screen space : negative dy is an upward swipe
    /// - mostly horizontal : dash, whatever the grounded state
    /// - far enough up : jump, only from the ground
    /// - far enough down : down strike, on the ground or in the air
    pub fn classify(dx: f64, dy: f64, grounded: bool, config: &GestureConfig) -> Gesture {
        if dx.abs() > dy.abs() {
            if dx > 0.0 {
                Gesture::DashRight
            } else {
                Gesture::DashLeft
            }
        } else if dy < -config.jump_threshold && grounded {
            Gesture::Jump
        } else if dy > config.strike_threshold {
            Gesture::DownStrike
        } else {
            Gesture::NoEffect
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(dx: f64, dy: f64, grounded: bool) -> Gesture {
        Gesture::classify(dx, dy, grounded, &GestureConfig::default())
    }

    #[test]
    fn horizontal_swipes_dash_by_sign() {
        assert_eq!(classify(300.0, 10.0, true), Gesture::DashRight);
        assert_eq!(classify(-300.0, 10.0, true), Gesture::DashLeft);
        assert_eq!(classify(-300.0, -10.0, false), Gesture::DashLeft);
    }

    #[test]
    fn short_horizontal_swipe_still_dashes() {
        assert_eq!(classify(2.0, 1.0, true), Gesture::DashRight);
    }

    #[test]
    fn upward_swipe_jumps_only_when_grounded() {
        assert_eq!(classify(0.0, -100.0, true), Gesture::Jump);
        assert_eq!(classify(0.0, -100.0, false), Gesture::NoEffect);
    }

    #[test]
    fn upward_swipe_inside_threshold_is_ignored() {
        assert_eq!(classify(0.0, -60.0, true), Gesture::NoEffect);
        assert_eq!(classify(0.0, -61.0, true), Gesture::Jump);
    }

    #[test]
    fn downward_swipe_strikes_anywhere() {
        assert_eq!(classify(0.0, 100.0, false), Gesture::DownStrike);
        assert_eq!(classify(0.0, 100.0, true), Gesture::DownStrike);
        assert_eq!(classify(0.0, 60.0, false), Gesture::NoEffect);
    }

    #[test]
    fn diagonal_tie_is_vertical() {
        assert_eq!(classify(100.0, -100.0, true), Gesture::Jump);
        assert_eq!(classify(-100.0, 100.0, true), Gesture::DownStrike);
    }

    #[test]
    fn tap_has_no_effect() {
        assert_eq!(classify(0.0, 0.0, true), Gesture::NoEffect);
        assert_eq!(classify(0.0, 0.0, false), Gesture::NoEffect);
    }

    #[test]
    fn thresholds_come_from_config() {
        let config = GestureConfig {
            jump_threshold: 10.0,
            strike_threshold: 200.0,
            dash_distance: 50.0,
        };

        assert_eq!(Gesture::classify(0.0, -20.0, true, &config), Gesture::Jump);
        assert_eq!(
            Gesture::classify(0.0, 150.0, true, &config),
            Gesture::NoEffect
        );
    }
}
