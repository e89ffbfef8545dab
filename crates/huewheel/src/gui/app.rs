use crate::config::{self, Config, MAX_COLORS};
use crate::events::AppEvent;
use crate::gui::picker::{self, FrameClock, HexColor, Pickers};
use crate::gui::theme::{self, ThemeColors};
use gtk::prelude::*;
use gtk4 as gtk;
use hueshape::source::Color;
use hueshape::{ColorPicker, Completion, HuePalette, PickerDelegate, PickerKind, Point, Rect};
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

pub struct AppModel {
    pub pickers: Rc<RefCell<Pickers>>,
    pub palette: Rc<HuePalette>,
    pub variant: PickerKind,
    pub count: usize,
    pub animated: bool,
    pub selected: Option<HexColor>,
}

#[derive(Debug)]
pub enum AppMsg {
    Show,
    Reload,
    SetCount(usize),
    SetVariant(PickerKind),
    ConfigReload,
    Resize(i32, i32),
    PointerDown(Point),
    PointerMoved(Point),
    PointerUp,
    ColorSelected(Color, PickerKind),
    Settled(PickerKind),
    Quit,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Show => AppMsg::Show,
            AppEvent::Reload => AppMsg::Reload,
            AppEvent::SetCount(n) => AppMsg::SetCount(n),
            AppEvent::SetVariant(kind) => AppMsg::SetVariant(kind),
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

/// Hands picker selections back to the component loop.
struct SelectionForwarder(ComponentSender<AppModel>);

impl PickerDelegate for SelectionForwarder {
    fn did_select(&self, color: Color, picker: &dyn ColorPicker) {
        self.0.input(AppMsg::ColorSelected(color, picker.kind()));
    }
}

fn settled(sender: &ComponentSender<AppModel>, kind: PickerKind) -> Completion {
    let sender = sender.clone();
    Box::new(move || sender.input(AppMsg::Settled(kind)))
}

impl AppModel {
    fn status(&self) -> String {
        match self.selected {
            Some(hex) => format!("Selected {}", hex),
            None => "Pick a color".to_string(),
        }
    }

    fn reload(&self, sender: &ComponentSender<Self>) {
        self.pickers
            .borrow_mut()
            .reload(self.animated, settled(sender, self.variant));
    }

    fn switch_to(&mut self, kind: PickerKind, sender: &ComponentSender<Self>) {
        if kind == self.variant {
            return;
        }
        self.variant = kind;
        self.pickers
            .borrow_mut()
            .switch_to(kind, self.animated, settled(sender, kind));
    }

    fn apply_config(&mut self, config: Config, sender: &ComponentSender<Self>) {
        self.animated = config.animated;
        self.count = config.colors;
        self.palette.set_count(config.colors);
        self.palette.set_max_columns(config.max_columns);

        self.reload(sender);
        self.pickers.borrow_mut().refresh_layout();
        self.switch_to(*config.variant, sender);
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Config, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        gtk::ApplicationWindow {
            set_title: Some("Huewheel"),
            set_default_size: (420, 520),

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    if key == gtk::gdk::Key::Escape {
                        sender.input(AppMsg::Quit);
                        return glib::Propagation::Stop;
                    }
                    glib::Propagation::Proceed
                }
            },

            gtk::Box {
                set_orientation: gtk::Orientation::Vertical,

                gtk::Box {
                    set_orientation: gtk::Orientation::Horizontal,
                    set_spacing: 12,
                    set_margin_all: 8,

                    gtk::Box {
                        add_css_class: "linked",

                        #[name = "circle_button"]
                        gtk::ToggleButton {
                            set_label: "Circle",
                            #[watch]
                            set_active: model.variant == PickerKind::Radial,
                            connect_toggled[sender] => move |button| {
                                if button.is_active() {
                                    sender.input(AppMsg::SetVariant(PickerKind::Radial));
                                }
                            }
                        },

                        gtk::ToggleButton {
                            set_label: "Grid",
                            set_group: Some(&circle_button),
                            #[watch]
                            set_active: model.variant == PickerKind::Grid,
                            connect_toggled[sender] => move |button| {
                                if button.is_active() {
                                    sender.input(AppMsg::SetVariant(PickerKind::Grid));
                                }
                            }
                        },
                    },

                    gtk::SpinButton::with_range(1.0, MAX_COLORS as f64, 1.0) {
                        set_tooltip_text: Some("Number of colors"),
                        #[watch]
                        set_value: model.count as f64,
                        connect_value_changed[sender] => move |spin| {
                            let count = usize::try_from(spin.value_as_int()).unwrap_or(1);
                            sender.input(AppMsg::SetCount(count));
                        }
                    },
                },

                #[name = "drawing_area"]
                gtk::DrawingArea {
                    set_hexpand: true,
                    set_vexpand: true,

                    connect_resize[sender] => move |_, width, height| {
                        sender.input(AppMsg::Resize(width, height));
                    },

                    add_controller = gtk::GestureDrag {
                        connect_drag_begin[sender] => move |_, x, y| {
                            sender.input(AppMsg::PointerDown(Point::new(x, y)));
                        },
                        connect_drag_update[sender] => move |gesture, dx, dy| {
                            if let Some((x, y)) = gesture.start_point() {
                                sender.input(AppMsg::PointerMoved(Point::new(x + dx, y + dy)));
                            }
                        },
                        connect_drag_end[sender] => move |_, _, _| {
                            sender.input(AppMsg::PointerUp);
                        },
                        connect_cancel[sender] => move |_, _| {
                            sender.input(AppMsg::PointerUp);
                        }
                    }
                },

                gtk::Label {
                    add_css_class: "huewheel-status",
                    set_xalign: 0.0,
                    #[watch]
                    set_label: &model.status(),
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

        let palette = Rc::new(HuePalette::new(config.colors, config.max_columns));
        let delegate = Rc::new(SelectionForwarder(sender.clone()));
        let pickers = Pickers::new(&palette, delegate, *config.variant);

        let model = AppModel {
            pickers: Rc::new(RefCell::new(pickers)),
            palette,
            variant: *config.variant,
            count: config.colors,
            animated: config.animated,
            selected: None,
        };

        let widgets = view_output!();

        let pickers_draw = model.pickers.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, _, _| {
                let colors = ThemeColors::from_context(&drawing_area.style_context());
                let frames = pickers_draw.borrow().active().frames();
                if let Err(e) = picker::draw(cr, &frames, &colors) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let pickers_tick = model.pickers.clone();
        let clock = RefCell::new(FrameClock::default());
        widgets
            .drawing_area
            .add_tick_callback(move |drawing_area, frame_clock| {
                let now = clock.borrow_mut().elapsed(frame_clock.frame_time());
                let mut pickers = pickers_tick.borrow_mut();
                let animating = pickers.tick(now);
                let dirty = pickers.take_needs_display();
                if animating || dirty {
                    drawing_area.queue_draw();
                }
                glib::ControlFlow::Continue
            });

        model
            .pickers
            .borrow_mut()
            .active_mut()
            .show(model.animated, settled(&sender, model.variant));

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Show => {
                self.pickers
                    .borrow_mut()
                    .active_mut()
                    .show(self.animated, settled(&sender, self.variant));
            }
            AppMsg::Reload => self.reload(&sender),
            AppMsg::SetCount(count) => {
                let count = count.clamp(1, MAX_COLORS);
                if count == self.count {
                    return;
                }
                self.count = count;
                self.palette.set_count(count);
                self.reload(&sender);
            }
            AppMsg::SetVariant(kind) => self.switch_to(kind, &sender),
            AppMsg::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    self.apply_config(new_config, &sender);
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
            AppMsg::Resize(width, height) => {
                let bounds = Rect::from_size(width as f64, height as f64);
                self.pickers.borrow_mut().set_bounds(bounds);
            }
            AppMsg::PointerDown(point) => self.pickers.borrow_mut().active_mut().pointer_down(point),
            AppMsg::PointerMoved(point) => {
                self.pickers.borrow_mut().active_mut().pointer_moved(point)
            }
            AppMsg::PointerUp => self.pickers.borrow_mut().active_mut().pointer_up(),
            AppMsg::ColorSelected(color, kind) => {
                let hex = HexColor::from(color);
                log::info!("Selected {} on the {} picker", hex, kind);
                self.selected = Some(hex);
            }
            AppMsg::Settled(kind) => log::debug!("{} picker settled", kind),
            AppMsg::Quit => relm4::main_application().quit(),
        }
    }
}
