use eframe::egui;
use std::path::PathBuf;
use std::time::Instant;

use crate::config::Config;
use crate::deck::{self, Deck};
use crate::nav::scale::{DESIGN_HEIGHT, DESIGN_WIDTH};
use crate::nav::{Controller, Event, Key, KeyInput, SlideState, Surface, Viewport};
use crate::render;
use crate::theme::Theme;

const SLIDE_GAP: f32 = 40.0;
const HELP_TEXT: &str = "Use the left and right arrow keys or Space to navigate between slides. \
    (Press 'H' or navigate to hide this message.)";

/// Host-side state the controller draws on.
#[derive(Debug)]
pub struct DeckSurface {
    location: String,
    states: Vec<Option<SlideState>>,
    scale: f32,
    help_visible: bool,
}

impl DeckSurface {
    pub fn new(location: String, slide_count: usize, show_help: bool) -> Self {
        Self {
            location,
            states: vec![None; slide_count],
            scale: 1.0,
            help_visible: show_help,
        }
    }

    pub fn location_str(&self) -> &str {
        &self.location
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn help_visible(&self) -> bool {
        self.help_visible
    }

    /// Slides that have a label, far neighbours first so the current slide
    /// is painted last.
    pub fn draw_order(&self) -> Vec<(usize, SlideState)> {
        let mut labelled: Vec<(usize, SlideState)> = self
            .states
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.map(|s| (i, s)))
            .collect();
        labelled.sort_by_key(|(_, s)| std::cmp::Reverse(s.offset().abs()));
        labelled
    }
}

impl Surface for DeckSurface {
    fn location(&self) -> String {
        self.location.clone()
    }

    fn replace_location(&mut self, fragment: &str) {
        self.location = fragment.to_string();
    }

    fn set_slide_state(&mut self, index: usize, state: Option<SlideState>) {
        tracing::trace!(index, class = state.map_or("", SlideState::class_name), "label");
        if let Some(slot) = self.states.get_mut(index) {
            *slot = state;
        }
    }

    fn set_scale(&mut self, ratio: f32) {
        self.scale = ratio;
    }

    fn hide_help(&mut self) {
        self.help_visible = false;
    }
}

/// What a key press means to the window, before the controller sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
enum HostAction {
    Quit,
    ToggleFullscreen,
    /// Jump by editing the location, like typing a new fragment.
    Jump(JumpTarget),
    Navigate(KeyInput),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum JumpTarget {
    First,
    Last,
}

fn host_action(key: egui::Key, modifiers: egui::Modifiers) -> Option<HostAction> {
    let nav = |k: Key| {
        let input = if modifiers.shift {
            KeyInput::with_shift(k)
        } else {
            KeyInput::new(k)
        };
        Some(HostAction::Navigate(input))
    };
    match key {
        egui::Key::Q | egui::Key::Escape => Some(HostAction::Quit),
        egui::Key::F => Some(HostAction::ToggleFullscreen),
        egui::Key::Home => Some(HostAction::Jump(JumpTarget::First)),
        egui::Key::End => Some(HostAction::Jump(JumpTarget::Last)),
        egui::Key::ArrowLeft => nav(Key::ArrowLeft),
        egui::Key::ArrowRight => nav(Key::ArrowRight),
        egui::Key::Space => nav(Key::Space),
        egui::Key::H => nav(Key::H),
        _ => None,
    }
}

struct PresentApp {
    deck: Deck,
    theme: Theme,
    controller: Controller<DeckSurface>,
    started: bool,
    last_viewport: Option<Viewport>,
    shown_location: Option<String>,
    fullscreen: bool,
}

impl PresentApp {
    fn new(deck: Deck, theme: Theme, controller: Controller<DeckSurface>) -> Self {
        Self {
            deck,
            theme,
            controller,
            started: false,
            last_viewport: None,
            shown_location: None,
            fullscreen: false,
        }
    }

    fn sync_viewport(&mut self, viewport: Viewport, now: Instant) {
        if !self.started {
            self.controller.start(viewport);
            self.started = true;
        } else if self.last_viewport != Some(viewport) {
            self.controller.handle(Event::Resized(viewport), now);
        }
        self.last_viewport = Some(viewport);
    }

    fn apply(&mut self, action: HostAction, now: Instant, cmds: &mut Vec<egui::ViewportCommand>) {
        match action {
            HostAction::Quit => cmds.push(egui::ViewportCommand::Close),
            HostAction::ToggleFullscreen => {
                cmds.push(egui::ViewportCommand::Fullscreen(!self.fullscreen));
            }
            HostAction::Jump(target) => {
                let index = match target {
                    JumpTarget::First => 0,
                    JumpTarget::Last => self.controller.slide_count().saturating_sub(1),
                };
                self.controller
                    .surface_mut()
                    .replace_location(&crate::nav::fragment::format(index));
                self.controller.handle(Event::LocationChanged, now);
            }
            HostAction::Navigate(input) => self.controller.handle(Event::Key(input), now),
        }
    }

    fn window_title(&self) -> String {
        format!(
            "{} - {}",
            self.deck.title,
            self.controller.surface().location_str()
        )
    }

    fn draw_slides(&self, ui: &mut egui::Ui, rect: egui::Rect) {
        let surface = self.controller.surface();
        let scale = surface.scale();
        let container = egui::Rect::from_center_size(
            rect.center(),
            egui::vec2(DESIGN_WIDTH * scale, DESIGN_HEIGHT * scale),
        );
        let stride = container.width() + SLIDE_GAP * scale;

        for (index, state) in surface.draw_order() {
            let Some(slide) = self.deck.slide(index) else {
                continue;
            };
            let slot = container.translate(egui::vec2(state.offset() as f32 * stride, 0.0));
            if !slot.intersects(rect) {
                continue;
            }
            let opacity = match state.offset().abs() {
                0 => 1.0,
                1 => 0.35,
                _ => 0.15,
            };
            let child = ui.new_child(
                egui::UiBuilder::new()
                    .max_rect(slot.intersect(rect))
                    .id_salt(("slide", index)),
            );
            render::render_slide(&child, slide, &self.theme, slot, opacity, scale);
        }
    }

    fn draw_help(&self, ui: &egui::Ui, rect: egui::Rect) {
        let scale = self.controller.surface().scale();
        let text_color = Theme::with_opacity(self.theme.foreground, 0.95);
        let galley = ui.painter().layout(
            HELP_TEXT.to_string(),
            egui::FontId::proportional(16.0 * scale.max(0.6)),
            text_color,
            (rect.width() * 0.8).max(1.0),
        );
        let padding = 14.0;
        let size = galley.rect.size() + egui::vec2(padding * 2.0, padding * 2.0);
        let snackbar = egui::Rect::from_min_size(
            egui::pos2(
                rect.center().x - size.x / 2.0,
                rect.bottom() - size.y - 24.0,
            ),
            size,
        );
        ui.painter().rect_filled(
            snackbar,
            6.0,
            Theme::with_opacity(self.theme.code_background, 0.95),
        );
        ui.painter().galley(
            snackbar.min + egui::vec2(padding, padding),
            galley,
            text_color,
        );
    }
}

impl eframe::App for PresentApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        // Collect first; acting inside ctx.input() would hold its lock
        let mut actions: Vec<HostAction> = Vec::new();
        ctx.input(|i| {
            self.fullscreen = i.viewport().fullscreen.unwrap_or(false);
            for event in &i.events {
                if let egui::Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } = event
                {
                    actions.extend(host_action(*key, *modifiers));
                }
            }
        });

        let mut viewport_cmds: Vec<egui::ViewportCommand> = Vec::new();
        let bg = self.theme.backdrop;

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(bg).inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                self.sync_viewport(Viewport::new(rect.width(), rect.height()), now);

                for action in actions {
                    self.apply(action, now, &mut viewport_cmds);
                }
                self.controller.tick(now);

                ui.painter().rect_filled(rect, 0.0, bg);
                self.draw_slides(ui, rect);
                if self.controller.surface().help_visible() {
                    self.draw_help(ui, rect);
                }
            });

        let location = self.controller.surface().location_str().to_string();
        if self.shown_location.as_deref() != Some(location.as_str()) {
            viewport_cmds.push(egui::ViewportCommand::Title(self.window_title()));
            self.shown_location = Some(location);
        }

        for cmd in viewport_cmds {
            ctx.send_viewport_cmd(cmd);
        }

        if let Some(deadline) = self.controller.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(now));
        }
    }
}

pub fn run(file: PathBuf, windowed: bool, location: Option<String>) -> anyhow::Result<()> {
    let deck = deck::load(&file)?;
    let config = Config::load_or_default();
    let theme = Theme::from_name(config.theme());
    let windowed = windowed || config.windowed();

    let slide_count = deck.slide_count();
    tracing::info!(
        file = %file.display(),
        slides = slide_count,
        tags = ?deck.tags,
        summary = deck.summary.as_deref().unwrap_or(""),
        "loaded deck"
    );

    let surface = DeckSurface::new(location.unwrap_or_default(), slide_count, config.show_help());
    let controller = Controller::new(surface, slide_count);

    let title = format!(
        "present - {}",
        file.file_name().unwrap_or_default().to_string_lossy()
    );

    let viewport = if windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title(&title)
    } else {
        egui::ViewportBuilder::default()
            .with_fullscreen(true)
            .with_title(&title)
    };

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(PresentApp::new(deck, theme, controller)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck(sections: usize) -> Deck {
        let mut source = String::from("# Deck\n");
        for i in 0..sections {
            source.push_str(&format!("\n## Slide {i}\n\nBody {i}\n"));
        }
        deck::parse(&source).unwrap()
    }

    fn app(location: &str, sections: usize) -> PresentApp {
        let deck = deck(sections);
        let count = deck.slide_count();
        let surface = DeckSurface::new(location.to_string(), count, true);
        PresentApp::new(deck, Theme::light(), Controller::new(surface, count))
    }

    #[test]
    fn test_first_viewport_starts_controller() {
        let mut app = app("#abc", 3);
        let now = Instant::now();
        app.sync_viewport(Viewport::new(610.0, 1000.0), now);
        let surface = app.controller.surface();
        assert_eq!(surface.location_str(), "#0");
        assert_eq!(surface.states[0], Some(SlideState::Current));
        assert_eq!(surface.scale(), 0.5);
        assert!(app.controller.next_deadline().is_none());
    }

    #[test]
    fn test_viewport_change_is_debounced() {
        let mut app = app("#1", 3);
        let now = Instant::now();
        app.sync_viewport(Viewport::new(1920.0, 1080.0), now);
        app.sync_viewport(Viewport::new(1920.0, 1080.0), now);
        assert!(app.controller.next_deadline().is_none());

        app.sync_viewport(Viewport::new(610.0, 1000.0), now);
        assert_eq!(app.controller.surface().scale(), 1.0);
        assert!(app.controller.next_deadline().is_some());
        app.controller
            .tick(now + crate::nav::controller::RESIZE_DEBOUNCE);
        assert_eq!(app.controller.surface().scale(), 0.5);
    }

    #[test]
    fn test_jump_goes_through_location() {
        let mut app = app("#0", 4);
        let now = Instant::now();
        app.sync_viewport(Viewport::new(1920.0, 1080.0), now);
        let mut cmds = Vec::new();
        app.apply(HostAction::Jump(JumpTarget::Last), now, &mut cmds);
        assert_eq!(app.controller.surface().location_str(), "#4");
        assert_eq!(app.controller.surface().states[4], Some(SlideState::Current));
        app.apply(HostAction::Jump(JumpTarget::First), now, &mut cmds);
        assert_eq!(app.controller.surface().location_str(), "#0");
        // Jumping does not dismiss the help overlay; only navigation does
        assert!(app.controller.surface().help_visible());
        assert!(cmds.is_empty());
    }

    #[test]
    fn test_navigate_hides_help() {
        let mut app = app("#0", 2);
        let now = Instant::now();
        app.sync_viewport(Viewport::new(1920.0, 1080.0), now);
        let mut cmds = Vec::new();
        app.apply(
            HostAction::Navigate(KeyInput::new(Key::ArrowRight)),
            now,
            &mut cmds,
        );
        assert_eq!(app.controller.surface().location_str(), "#1");
        assert!(!app.controller.surface().help_visible());
        assert_eq!(app.window_title(), "Deck - #1");
    }

    #[test]
    fn test_loose_location_shown_canonical() {
        let mut app = app("2", 3);
        app.sync_viewport(Viewport::new(1920.0, 1080.0), Instant::now());
        assert_eq!(app.window_title(), "Deck - #2");
        assert_eq!(app.controller.surface().states[2], Some(SlideState::Current));
    }

    #[test]
    fn test_toggle_fullscreen() {
        let mut app = app("#0", 1);
        let mut cmds = Vec::new();
        app.apply(HostAction::ToggleFullscreen, Instant::now(), &mut cmds);
        assert!(matches!(
            cmds.as_slice(),
            [egui::ViewportCommand::Fullscreen(true)]
        ));
    }

    #[test]
    fn test_quit_emits_close() {
        let mut app = app("#0", 1);
        let mut cmds = Vec::new();
        app.apply(HostAction::Quit, Instant::now(), &mut cmds);
        assert!(matches!(cmds.as_slice(), [egui::ViewportCommand::Close]));
    }

    #[test]
    fn test_host_action_mapping() {
        let none = egui::Modifiers::NONE;
        assert_eq!(host_action(egui::Key::Q, none), Some(HostAction::Quit));
        assert_eq!(
            host_action(egui::Key::Space, egui::Modifiers::SHIFT),
            Some(HostAction::Navigate(KeyInput::with_shift(Key::Space)))
        );
        assert_eq!(
            host_action(egui::Key::ArrowRight, none),
            Some(HostAction::Navigate(KeyInput::new(Key::ArrowRight)))
        );
        assert_eq!(host_action(egui::Key::Z, none), None);
    }

    #[test]
    fn test_draw_order_paints_current_last() {
        let mut surface = DeckSurface::new("#2".to_string(), 5, false);
        for (i, s) in crate::nav::state::labels(2, 5).into_iter().enumerate() {
            surface.set_slide_state(i, s);
        }
        let order = surface.draw_order();
        assert_eq!(order.len(), 5);
        assert_eq!(order.last(), Some(&(2, SlideState::Current)));
        assert_eq!(order[0].1.offset().abs(), 2);
    }

    #[test]
    fn test_surface_ignores_out_of_range_index() {
        let mut surface = DeckSurface::new(String::new(), 2, true);
        surface.set_slide_state(5, Some(SlideState::Current));
        assert!(surface.states.iter().all(Option::is_none));
    }
}
