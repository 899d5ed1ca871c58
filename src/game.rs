mod gesture;
mod parallax;
mod player;

pub use self::gesture::Gesture;
pub use self::parallax::{Depth, Parallax, ParallaxLayer};
pub use self::player::Player;

use crate::browser;
use crate::config::Config;
use crate::engine::input::{Swipe, TouchState};
use crate::engine::{self, Game, Point, Rect, Renderer, Size};
use crate::sprite::SpriteSheet;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use futures::join;
use web_sys::HtmlImageElement;

/// TABLE
/// ┌───────────────────────── Tick ──────────────────────────────────────────┐
/// │                                                                         │
/// │   GameLoop        drain touch queue -> TouchState (swipes)              │
/// │      │                                                                  │
/// │      ▼                                                                  │
/// │   update()        swipes -> Gesture -> Player (in arrival order)        │
/// │                   Player::integrate   gravity, ground clamp             │
/// │                   Parallax::scroll    far / mid / near offsets          │
/// │                   Player::animate     frame timer, frame index          │
/// │      │                                                                  │
/// │      ▼                                                                  │
/// │   draw()          backgrounds (x2 each) -> ground band -> player        │
/// │                   read only                                             │
/// └─────────────────────────────────────────────────────────────────────────┘
pub enum Runner {
    /// Assets are being fetched, no tick has run yet
    Loading,

    /// Sheet geometry is known, ticking
    Loaded(World),
}

impl Runner {
    const SHEET_PATH: &'static str = "player.png";
    const FAR_PATH: &'static str = "bg_far.png";
    const MID_PATH: &'static str = "bg_mid.png";
    const NEAR_PATH: &'static str = "bg_near.png";

    pub fn new() -> Self {
        Runner::Loading
    }

    async fn load_asset(path: &'static str) -> Result<HtmlImageElement> {
        engine::load_image(path)
            .await
            .with_context(|| format!("Failed to load image resource from : {}", path))
    }
}

impl Default for Runner {
    fn default() -> Self {
        Runner::new()
    }
}

#[async_trait(?Send)]
impl Game for Runner {
    async fn initialize(&self) -> Result<Box<dyn Game>> {
        match self {
            Runner::Loading => {
                let config = Config::load().await;
                let viewport = browser::fit_canvas_to_window()?;

                // all four images in parallel, total time = slowest image
                let (sheet, far, mid, near) = join!(
                    Self::load_asset(Self::SHEET_PATH),
                    Self::load_asset(Self::FAR_PATH),
                    Self::load_asset(Self::MID_PATH),
                    Self::load_asset(Self::NEAR_PATH),
                );
                let assets = Assets {
                    sheet: sheet?,
                    far: far?,
                    mid: mid?,
                    near: near?,
                };

                let sheet_size = Size {
                    width: assets.sheet.natural_width().into(),
                    height: assets.sheet.natural_height().into(),
                };
                let state = GameState::new(config, viewport, sheet_size)?;
                log!(
                    "Runner: {} frames of {:?} on a {:?} viewport",
                    state.sheet().total_frames(),
                    state.sheet().frame_size(),
                    viewport
                );

                Ok(Box::new(Runner::Loaded(World { state, assets })))
            }
            Runner::Loaded(_) => Err(anyhow!("Game is already initialized")),
        }
    }

    fn update(&mut self, touches: &TouchState) {
        if let Runner::Loaded(world) = self {
            world.state.update(touches.swipes());
        }
    }

    fn draw(&self, renderer: &Renderer) {
        if let Runner::Loaded(world) = self {
            world.draw(renderer);
        }
    }
}

pub struct World {
    state: GameState,
    assets: Assets,
}

impl World {
    // Draw order matters : background -> foreground
    fn draw(&self, renderer: &Renderer) {
        let state = &self.state;
        renderer.clear(&Rect::new(Point::default(), state.viewport()));

        for layer in state.parallax().layers() {
            let image = self.assets.background(layer.depth());
            for span in layer.spans(state.viewport()) {
                renderer.draw_image(image, &span);
            }
        }

        renderer.fill_rect(&state.ground_rect(), &state.config().world.ground_color);

        renderer.draw_sprite(
            &self.assets.sheet,
            &state.sprite_source(),
            &state.player().bounding_box(),
        );
    }
}

struct Assets {
    sheet: HtmlImageElement,
    far: HtmlImageElement,
    mid: HtmlImageElement,
    near: HtmlImageElement,
}

impl Assets {
    fn background(&self, depth: Depth) -> &HtmlImageElement {
        match depth {
            Depth::Far => &self.far,
            Depth::Mid => &self.mid,
            Depth::Near => &self.near,
        }
    }
}

/// Everything a tick reads or writes, no browser handles
#[derive(Debug, Clone)]
pub struct GameState {
    config: Config,
    viewport: Size,
    ground_line: f64,
    sheet: SpriteSheet,
    player: Player,
    parallax: Parallax,
}

impl GameState {
    /// `sheet_size` comes from the loaded sheet image : no state exists
    /// before its geometry is known.
    pub fn new(config: Config, viewport: Size, sheet_size: Size) -> Result<Self> {
        let sheet = SpriteSheet::new(sheet_size, config.sprite.layout, config.sprite.frame_speed)
            .context("Could not derive sprite sheet geometry")?;

        let ground_line = viewport.height - config.world.ground_offset;
        let player = Player::new(
            config.world.player_x,
            ground_line,
            sheet.frame_size().scaled(config.sprite.scale),
        );
        let parallax = Parallax::new(config.world.layer_speeds);

        Ok(GameState {
            config,
            viewport,
            ground_line,
            sheet,
            player,
            parallax,
        })
    }

    /// Gestures first, in arrival order, then :
    /// integrate -> scroll -> animate
    pub fn update(&mut self, swipes: &[Swipe]) {
        for swipe in swipes {
            let gesture = Gesture::classify(
                swipe.dx(),
                swipe.dy(),
                self.player.grounded(),
                &self.config.gestures,
            );
            self.player
                .apply(gesture, &self.config.physics, &self.config.gestures);
        }

        self.player
            .integrate(&self.config.physics, self.ground_line);
        self.parallax
            .scroll(self.config.world.run_speed, self.viewport.width);
        self.player.animate(&self.sheet);
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn ground_line(&self) -> f64 {
        self.ground_line
    }

    pub fn sheet(&self) -> &SpriteSheet {
        &self.sheet
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn parallax(&self) -> &Parallax {
        &self.parallax
    }

    /// Flat band from the ground line down
    pub fn ground_rect(&self) -> Rect {
        Rect::new_from_x_y(
            0.0,
            self.ground_line,
            self.viewport.width,
            self.config.world.ground_band_height,
        )
    }

    /// Sheet sub rectangle for the current animation frame
    pub fn sprite_source(&self) -> Rect {
        self.sheet.source_rect(self.player.frame())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::{SheetLayout, StripDirection};
    use approx::assert_relative_eq;

    const VIEWPORT: Size = Size {
        width: 800.0,
        height: 600.0,
    };
    const SHEET: Size = Size {
        width: 900.0,
        height: 200.0,
    };

    fn state() -> GameState {
        GameState::new(Config::default(), VIEWPORT, SHEET).expect("state")
    }

    fn swipe(dx: f64, dy: f64) -> Swipe {
        let start = Point { x: 400.0, y: 300.0 };
        Swipe {
            start,
            end: Point {
                x: start.x + dx,
                y: start.y + dy,
            },
        }
    }

    #[test]
    fn player_size_is_scaled_frame_size() {
        let state = state();
        let bounding_box = state.player().bounding_box();

        assert_relative_eq!(bounding_box.width(), 100.0 * 0.35);
        assert_relative_eq!(bounding_box.height(), 200.0 * 0.35);
        assert_relative_eq!(bounding_box.x(), 120.0);
        assert_relative_eq!(state.ground_line(), 460.0);
        assert_relative_eq!(bounding_box.bottom(), 460.0);
    }

    #[test]
    fn unloaded_sheet_has_no_state() {
        let result = GameState::new(Config::default(), VIEWPORT, Size::default());

        assert!(result.is_err());
    }

    #[test]
    fn idle_ticks_scroll_and_animate() {
        let mut state = state();
        for _ in 0..6 {
            state.update(&[]);
        }

        assert_eq!(state.player().frame(), 1);
        assert_relative_eq!(state.sprite_source().x(), 100.0);
        let [far, mid, near] = *state.parallax().layers();
        assert_relative_eq!(far.offset(), -6.0);
        assert_relative_eq!(mid.offset(), -15.0);
        assert_relative_eq!(near.offset(), -30.0);
        assert!(state.player().grounded());
    }

    #[test]
    fn swipe_up_jumps_on_the_same_tick() {
        let mut state = state();
        let ground_y = state.player().position().y;

        state.update(&[swipe(0.0, -100.0)]);

        assert!(!state.player().grounded());
        assert_relative_eq!(state.player().velocity_y(), -21.0);
        assert_relative_eq!(state.player().position().y, ground_y - 21.0);
    }

    #[test]
    fn second_jump_in_the_same_tick_is_refused() {
        let mut single = state();
        let mut double = state();

        single.update(&[swipe(0.0, -100.0)]);
        double.update(&[swipe(0.0, -100.0), swipe(0.0, -100.0)]);

        assert_eq!(single.player(), double.player());
    }

    #[test]
    fn swipe_right_dashes() {
        let mut state = state();

        state.update(&[swipe(300.0, 10.0)]);
        assert_relative_eq!(state.player().position().x, 320.0);

        state.update(&[swipe(-300.0, 10.0)]);
        assert_relative_eq!(state.player().position().x, 120.0);
    }

    #[test]
    fn player_never_ends_a_tick_below_the_ground() {
        let mut state = state();
        let gestures = [
            swipe(0.0, -100.0),
            swipe(0.0, 100.0),
            swipe(250.0, 0.0),
            swipe(0.0, 0.0),
        ];
        for tick in 0..500 {
            let swipes: &[Swipe] = if tick % 7 == 0 {
                &gestures[(tick / 7) % gestures.len()..][..1]
            } else {
                &[]
            };
            state.update(swipes);

            assert!(state.player().bounding_box().bottom() <= state.ground_line() + 1e-9);
            assert!(state.player().frame() < state.sheet().total_frames());
        }
    }

    #[test]
    fn grid_sheet_cycles_through_rows() {
        let mut config = Config::default();
        config.sprite.layout = SheetLayout::Grid {
            columns: 3,
            rows: 2,
        };
        config.sprite.frame_speed = 1;
        let mut state = GameState::new(config, VIEWPORT, Size {
            width: 300.0,
            height: 200.0,
        })
        .expect("state");

        for _ in 0..4 {
            state.update(&[]);
        }

        assert_eq!(state.player().frame(), 4);
        assert_relative_eq!(state.sprite_source().x(), 100.0);
        assert_relative_eq!(state.sprite_source().y(), 100.0);
    }

    #[test]
    fn vertical_strip_sheet_moves_down() {
        let mut config = Config::default();
        config.sprite.layout = SheetLayout::Strip {
            frame_count: 4,
            direction: StripDirection::Vertical,
        };
        config.sprite.frame_speed = 2;
        let mut state = GameState::new(config, VIEWPORT, Size {
            width: 50.0,
            height: 400.0,
        })
        .expect("state");

        for _ in 0..4 {
            state.update(&[]);
        }

        assert_relative_eq!(state.sprite_source().x(), 0.0);
        assert_relative_eq!(state.sprite_source().y(), 200.0);
    }

    #[test]
    fn ground_band_spans_the_viewport_width() {
        let ground = state().ground_rect();

        assert_relative_eq!(ground.x(), 0.0);
        assert_relative_eq!(ground.y(), 460.0);
        assert_relative_eq!(ground.width(), 800.0);
        assert_relative_eq!(ground.height(), 200.0);
    }
}
