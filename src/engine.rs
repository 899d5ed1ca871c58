use crate::browser;
use anyhow::{anyhow, Error, Result};
// ELI5: web assembly is a single threaded environment, so Rc RefCell > Mutex
use async_trait::async_trait;
use futures::channel::oneshot::channel;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{
    // unchecked_ref (unsafe) cast from Javascript type to Rust type
    // - we control the closure creation and specify the expected type
    JsCast,
    JsValue,
};
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use self::input::TouchState;

#[async_trait(?Send)]
pub trait Game {
    async fn initialize(&self) -> Result<Box<dyn Game>>;
    fn update(&mut self, touches: &TouchState);
    fn draw(&self, renderer: &Renderer);
}

pub struct GameLoop {
    touches: TouchState,
}

type SharedLoopClosure = Rc<RefCell<Option<browser::LoopClosure>>>;

impl GameLoop {
    /// Nothing is scheduled until `initialize` resolves : every asset the
    /// game derives its geometry from is loaded before the first tick.
    ///
    /// One tick per animation frame :
    /// - drain touch events queued since the previous tick
    /// - game.update()
    /// - game.draw()
    pub async fn start(game: impl Game + 'static) -> Result<()> {
        let mut game = game.initialize().await?;
        let mut touch_receiver = input::prepare_input()?;
        let mut game_loop = GameLoop {
            touches: TouchState::new(),
        };
        let renderer = Renderer::new(browser::context()?);

        let f: SharedLoopClosure = Rc::new(RefCell::new(None));
        let g = f.clone();
        *g.borrow_mut() = Some(browser::create_raf_closure(move |_perf: f64| {
            input::process_input(&mut game_loop.touches, &mut touch_receiver);
            game.update(&game_loop.touches);
            game.draw(&renderer);

            if let Some(next_frame) = f.borrow().as_ref() {
                if let Err(err) = browser::request_animation_frame(next_frame) {
                    error!("GameLoop: stopped, {:#?}", err);
                }
            }
        }));

        browser::request_animation_frame(
            g.borrow()
                .as_ref()
                .ok_or_else(|| anyhow!("GameLoop: Loop is None"))?,
        )?;

        Ok(())
    }
}

// ==================== Geometry ====================
// canvas pixel space : origin top left, y grows downward
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn scaled(self, factor: f64) -> Self {
        Size {
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Rect {
    pub position: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(position: Point, size: Size) -> Self {
        Rect { position, size }
    }

    pub const fn new_from_x_y(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect::new(Point { x, y }, Size { width, height })
    }

    pub fn x(&self) -> f64 {
        self.position.x
    }

    pub fn y(&self) -> f64 {
        self.position.y
    }

    pub fn width(&self) -> f64 {
        self.size.width
    }

    pub fn height(&self) -> f64 {
        self.size.height
    }

    pub fn right(&self) -> f64 {
        self.x() + self.width()
    }

    pub fn bottom(&self) -> f64 {
        self.y() + self.height()
    }
}

// ==================== Rendering ====================
pub struct Renderer {
    context: CanvasRenderingContext2d,
}

impl Renderer {
    const MESSAGE_FONT: &'static str = "20px sans-serif";

    pub fn new(context: CanvasRenderingContext2d) -> Self {
        Renderer { context }
    }

    pub fn clear(&self, rect: &Rect) {
        self.context
            .clear_rect(rect.x(), rect.y(), rect.width(), rect.height());
    }

    /// Whole image stretched onto destination
    pub fn draw_image(&self, image: &HtmlImageElement, destination: &Rect) {
        if let Err(err) = self
            .context
            .draw_image_with_html_image_element_and_dw_and_dh(
                image,
                destination.x(),
                destination.y(),
                destination.width(),
                destination.height(),
            )
        {
            error!("Renderer: draw_image failed {:#?}", err);
        }
    }

    /// Copy the `frame` sub rectangle of a sheet onto destination
    /// - smoothing off : nearest neighbour keeps pixel art edges crisp
    pub fn draw_sprite(&self, image: &HtmlImageElement, frame: &Rect, destination: &Rect) {
        self.context.set_image_smoothing_enabled(false);
        if let Err(err) = self
            .context
            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                image,
                frame.x(),
                frame.y(),
                frame.width(),
                frame.height(),
                destination.x(),
                destination.y(),
                destination.width(),
                destination.height(),
            )
        {
            error!("Renderer: draw_sprite failed {:#?}", err);
        }
    }

    pub fn fill_rect(&self, rect: &Rect, color: &str) {
        self.context.set_fill_style_str(color);
        self.context
            .fill_rect(rect.x(), rect.y(), rect.width(), rect.height());
    }

    pub fn draw_text(&self, text: &str, position: &Point, color: &str) -> Result<()> {
        self.context.set_font(Self::MESSAGE_FONT);
        self.context.set_fill_style_str(color);
        self.context
            .fill_text(text, position.x, position.y)
            .map_err(|err| anyhow!("Error filling text {:#?}", err))
    }
}

/// Asynchronously load an image from a given source path
/// # Arguments
/// * `source` - string slice to path/url
/// # Returns
/// * `Ok(HtmlImageElement)` - on load success, natural size is known
/// * `Err` - on load fail
pub async fn load_image(source: &str) -> Result<HtmlImageElement> {
    let image = browser::create_html_image_element()?;
    let (tx, rx) = channel::<Result<(), Error>>();
    let success_tx = Rc::new(RefCell::new(Some(tx)));
    let error_tx = success_tx.clone();

    let success_callback = browser::closure_once(move || {
        if let Some(tx) = success_tx.borrow_mut().take() {
            let _ = tx.send(Ok(()));
        }
    });

    let owned_source = source.to_string();
    let error_callback = browser::closure_once(move |err: JsValue| {
        if let Some(tx) = error_tx.borrow_mut().take() {
            let _ = tx.send(Err(anyhow!(
                "Error loading image '{}' : {:#?}",
                owned_source,
                err
            )));
        }
    });

    image.set_onload(Some(success_callback.as_ref().unchecked_ref()));
    image.set_onerror(Some(error_callback.as_ref().unchecked_ref()));
    image.set_src(source);

    // keep callback alive until image is loaded or errors
    success_callback.forget();
    error_callback.forget();

    // Result<Result<(), Error>, oneshot::Canceled>
    // - first ? yields channel result : Result<(), Error>
    // - second ? yields image load result : () or propagating Error
    rx.await??;

    Ok(image)
}

pub mod input {
    use super::Point;
    use crate::browser;
    use anyhow::{anyhow, Result};
    use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
    use wasm_bindgen::JsCast;
    use web_sys::{Touch, TouchEvent};

    #[derive(Debug, Copy, Clone, PartialEq)]
    pub enum TouchPhase {
        Start(Point),
        End(Point),
    }

    /// One completed touch gesture, viewport pixel space
    #[derive(Debug, Copy, Clone, PartialEq)]
    pub struct Swipe {
        pub start: Point,
        pub end: Point,
    }

    impl Swipe {
        pub fn dx(&self) -> f64 {
            self.end.x - self.start.x
        }

        pub fn dy(&self) -> f64 {
            self.end.y - self.start.y
        }
    }

    /// Touch phases paired into swipes
    /// - swipes only live for the tick they completed in
    /// - the latest start survives across ticks
    #[derive(Debug, Default)]
    pub struct TouchState {
        last_start: Option<Point>,
        swipes: Vec<Swipe>,
    }

    impl TouchState {
        pub fn new() -> Self {
            TouchState::default()
        }

        /// Returns the swipe completed by this phase, if any
        /// - a new start replaces the previous one
        /// - the start is kept after an end : a second end (two fingers
        ///   lifted) measures from the same start
        /// - an end before any start completes nothing
        pub fn record(&mut self, phase: TouchPhase) -> Option<Swipe> {
            match phase {
                TouchPhase::Start(point) => {
                    self.last_start = Some(point);
                    None
                }
                TouchPhase::End(end) => {
                    let swipe = Swipe {
                        start: self.last_start?,
                        end,
                    };
                    self.swipes.push(swipe);
                    Some(swipe)
                }
            }
        }

        pub fn swipes(&self) -> &[Swipe] {
            &self.swipes
        }

        fn begin_tick(&mut self) {
            self.swipes.clear();
        }
    }

    /// Register canvas touch listeners, events arrive on the receiver
    pub fn prepare_input() -> Result<UnboundedReceiver<TouchPhase>> {
        let (sender, receiver) = unbounded();
        let canvas = browser::canvas()?;

        let start_sender = sender.clone();
        let ontouchstart = browser::closure_wrap(Box::new(move |event: TouchEvent| {
            if let Some(touch) = event.touches().get(0) {
                send(&start_sender, TouchPhase::Start(client_point(&touch)));
            }
        }) as Box<dyn FnMut(TouchEvent)>);

        let end_sender = sender;
        let ontouchend = browser::closure_wrap(Box::new(move |event: TouchEvent| {
            if let Some(touch) = event.changed_touches().get(0) {
                send(&end_sender, TouchPhase::End(client_point(&touch)));
            }
        }) as Box<dyn FnMut(TouchEvent)>);

        canvas
            .add_event_listener_with_callback("touchstart", ontouchstart.as_ref().unchecked_ref())
            .map_err(|err| anyhow!("Could not listen to touchstart : {:#?}", err))?;
        canvas
            .add_event_listener_with_callback("touchend", ontouchend.as_ref().unchecked_ref())
            .map_err(|err| anyhow!("Could not listen to touchend : {:#?}", err))?;

        // listeners live as long as the page
        ontouchstart.forget();
        ontouchend.forget();

        Ok(receiver)
    }

    /// Drain everything queued since the previous tick
    pub fn process_input(state: &mut TouchState, receiver: &mut UnboundedReceiver<TouchPhase>) {
        state.begin_tick();
        loop {
            match receiver.try_next() {
                Ok(None) => break,
                Err(_err) => break,
                Ok(Some(phase)) => {
                    if state.record(phase).is_none() && matches!(phase, TouchPhase::End(_)) {
                        warn!("Input: touchend before any touchstart ignored");
                    }
                }
            }
        }
    }

    fn send(sender: &UnboundedSender<TouchPhase>, phase: TouchPhase) {
        if let Err(err) = sender.unbounded_send(phase) {
            error!("Input: could not queue {:?} : {:#?}", phase, err);
        }
    }

    fn client_point(touch: &Touch) -> Point {
        Point {
            x: touch.client_x().into(),
            y: touch.client_y().into(),
        }
    }

}
