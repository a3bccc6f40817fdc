use crate::config::{self, Config};
use crate::events::AppEvent;
use crate::gui::host::{GlibTimer, StagePointer, StageSink, TickScheduler};
use crate::gui::stage::{self, Stage};
use crate::gui::theme::{self, ThemeColors};
use gtk::prelude::*;
use gtk4 as gtk;
use orbit::{
    Carousel, Debouncer, Direction, DragDelta, FrameToken, GestureTracker, OrbitError, Point,
    PointerEvent, PointerSource,
};
use relm4::prelude::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

const DEFAULT_WIDTH: i32 = 960;
const DEFAULT_HEIGHT: i32 = 540;

type StageCarousel = Carousel<StageSink, TickScheduler>;

pub struct AppModel {
    /// Absent only when neither the config nor the demo items could be laid out.
    pub carousel: Option<StageCarousel>,
    pub stage: Rc<RefCell<Stage>>,
    pub viewport_width: Rc<Cell<f64>>,
    pub resize_debouncer: Debouncer<GlibTimer>,
    pub tracker: Rc<RefCell<GestureTracker>>,
    pub drawing_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    Rotate(Direction),
    DragStart,
    Drag(DragDelta),
    DragEnd,
    /// Sent after every release or cancel, once the tracker has handled it.
    GestureFinished,
    Frame(FrameToken, Duration),
    Resize(f64),
    Redraw,
    Click(Point),
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Rotate(direction) => AppMsg::Rotate(direction),
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

fn build_carousel(
    config: &Config,
    stage: &Rc<RefCell<Stage>>,
    area: &gtk::DrawingArea,
    viewport_width: &Rc<Cell<f64>>,
    sender: &ComponentSender<AppModel>,
) -> Result<StageCarousel, OrbitError> {
    let width = viewport_width.clone();
    let radius = config.layout.radius(move || width.get());
    let count = stage.borrow().cards.len();

    Carousel::new(
        0..count,
        radius,
        config.motion.motion()?,
        StageSink::new(stage.clone(), area.clone()),
        TickScheduler::new(area.clone(), sender.clone()),
    )
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Config, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Carousel"),
            set_default_size: (DEFAULT_WIDTH, DEFAULT_HEIGHT),

            add_controller = gtk::EventControllerKey {
                set_propagation_phase: gtk::PropagationPhase::Capture,
                connect_key_pressed[sender] => move |_, key, _, _| {
                    match key {
                        gtk::gdk::Key::Left => sender.input(AppMsg::Rotate(Direction::Left)),
                        gtk::gdk::Key::Right => sender.input(AppMsg::Rotate(Direction::Right)),
                        _ => return glib::Propagation::Proceed,
                    }
                    glib::Propagation::Stop
                }
            },

            #[name = "overlay"]
            gtk::Overlay {
                #[local_ref]
                stage_area -> gtk::DrawingArea {
                    set_hexpand: true,
                    set_vexpand: true,
                    add_css_class: "carousel-stage",

                    add_controller = gtk::GestureClick {
                        connect_released[sender] => move |_, _, x, y| {
                            sender.input(AppMsg::Click(Point::new(x, y)));
                        }
                    },

                    connect_resize[sender] => move |_, width, _| {
                        sender.input(AppMsg::Resize(width as f64));
                    },
                },

                add_overlay = &gtk::Box {
                    set_orientation: gtk::Orientation::Horizontal,
                    set_spacing: 16,
                    set_halign: gtk::Align::Center,
                    set_valign: gtk::Align::End,
                    set_margin_bottom: 24,
                    add_css_class: "carousel-controls",

                    gtk::Button {
                        set_label: "‹",
                        set_tooltip_text: Some("Rotate left"),
                        connect_clicked[sender] => move |_| {
                            sender.input(AppMsg::Rotate(Direction::Left));
                        }
                    },

                    gtk::Button {
                        set_label: "›",
                        set_tooltip_text: Some("Rotate right"),
                        connect_clicked[sender] => move |_| {
                            sender.input(AppMsg::Rotate(Direction::Right));
                        }
                    },
                },
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, rx) = init;

        theme::load_css();

        let drawing_area = gtk::DrawingArea::default();
        let stage = Rc::new(RefCell::new(Stage::from_config(&config)));
        let viewport_width = Rc::new(Cell::new(DEFAULT_WIDTH as f64));

        let carousel = build_carousel(&config, &stage, &drawing_area, &viewport_width, &sender)
            .or_else(|e| {
                log::error!("Invalid carousel settings, using the demo items: {}", e);
                let demo = Config::demo();
                stage.replace(Stage::from_config(&demo));
                build_carousel(&demo, &stage, &drawing_area, &viewport_width, &sender)
            })
            .map_err(|e| log::error!("Carousel unavailable: {}", e))
            .ok();

        let pointer = StagePointer::new(&drawing_area);
        let tracker = GestureTracker::attach(&pointer);
        {
            let mut tracker = tracker.borrow_mut();
            let s = sender.clone();
            tracker.on_drag_start(move |_| s.input(AppMsg::DragStart));
            let s = sender.clone();
            tracker.on_drag(move |delta| s.input(AppMsg::Drag(delta)));
            let s = sender.clone();
            tracker.on_drag_end(move |_| s.input(AppMsg::DragEnd));
        }
        {
            let s = sender.clone();
            pointer.subscribe(Box::new(move |event| {
                if matches!(event, PointerEvent::Up | PointerEvent::Cancel) {
                    s.input(AppMsg::GestureFinished);
                }
            }));
        }

        let model = AppModel {
            carousel,
            stage: stage.clone(),
            viewport_width,
            resize_debouncer: Debouncer::new(GlibTimer, config.motion.resize_debounce()),
            tracker,
            drawing_area: drawing_area.clone(),
        };

        let stage_area = &model.drawing_area;
        let widgets = view_output!();

        model
            .drawing_area
            .set_draw_func(move |area, cr, width, height| {
                let style_context = area.style_context();
                let colors = ThemeColors::from_context(&style_context);
                let origin = Point::new(width as f64 / 2.0, height as f64 / 2.0);
                if let Err(e) = stage::draw(cr, &stage.borrow(), &colors, origin) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        if let AppMsg::ConfigReload = msg {
            match config::load_config() {
                Ok(new_config) => self.reload(&new_config, &sender),
                Err(e) => log::error!("Failed to reload config: {}", e),
            }
            return;
        }

        let Some(carousel) = self.carousel.as_mut() else {
            log::debug!("No carousel to handle {:?}", msg);
            return;
        };

        match msg {
            AppMsg::Rotate(direction) => carousel.rotate_by_spacing(direction),
            AppMsg::DragStart => carousel.begin_drag(),
            AppMsg::Drag(delta) => carousel.drag_to(delta),
            AppMsg::DragEnd => carousel.end_drag(),
            // A drag that moved has already ended; this only closes sessions
            // released in place or cancelled.
            AppMsg::GestureFinished => carousel.cancel_drag(),
            AppMsg::Frame(token, time) => carousel.on_frame(token, time),
            AppMsg::Resize(width) => {
                self.viewport_width.set(width);
                if carousel.resize() {
                    self.resize_debouncer
                        .trigger(move || sender.input(AppMsg::Redraw));
                }
            }
            AppMsg::Redraw => carousel.render_all(),
            AppMsg::Click(point) => {
                let origin = Point::new(
                    self.drawing_area.width() as f64 / 2.0,
                    self.drawing_area.height() as f64 / 2.0,
                );
                let hit = self.stage.borrow().hit_test(origin, point);
                if let Some(index) = hit {
                    let label = self.stage.borrow().cards[index].label.clone();
                    let angle = carousel.items()[index].angle();
                    log::info!("{} clicked at angle {:.4}", label, angle);
                }
            }
            AppMsg::ConfigReload => {}
        }
    }
}

impl AppModel {
    fn reload(&mut self, config: &Config, sender: &ComponentSender<Self>) {
        if let Some(carousel) = self.carousel.as_mut() {
            carousel.halt();
        }
        self.resize_debouncer.cancel();

        let previous = self.stage.replace(Stage::from_config(config));
        match build_carousel(
            config,
            &self.stage,
            &self.drawing_area,
            &self.viewport_width,
            sender,
        ) {
            Ok(carousel) => {
                self.carousel = Some(carousel);
                self.resize_debouncer =
                    Debouncer::new(GlibTimer, config.motion.resize_debounce());
                log::info!("Configuration reloaded");
            }
            Err(e) => {
                self.stage.replace(previous);
                if let Some(carousel) = self.carousel.as_mut() {
                    carousel.render_all();
                }
                log::error!("Failed to apply reloaded config: {}", e);
            }
        }
    }
}
