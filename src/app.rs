use crate::config::{load_settings, project_paths, save_settings_atomic, Paths, Settings};
use crate::input::{collect_input_nonblocking, map_key_to_command, Command, DragController, Item};
use crate::model::{CatchupSummary, PetState, SaveFile, SAVE_VERSION};
use crate::render::{
    draw_center_box, draw_drag_ghost, draw_face, draw_tray, recap_body, ui_overlay, Layout,
    Terminal,
};
use crate::sim::{catch_up, PetAction};
use crate::storage::{load_or_init, save_atomic};
use crossterm::event::Event;
use crossterm::style::Color;
use log::{debug, warn};
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Scene {
    Main,
    Help,
}

pub(crate) struct App {
    settings: Settings,
    pet: PetState,
    paths: Paths,
    term: Terminal,
    drags: DragController,
    scene: Scene,
    recap: Option<CatchupSummary>,
    should_quit: bool,
}

impl App {
    fn init() -> anyhow::Result<Self> {
        let paths = project_paths()?;
        let settings = load_settings(&paths.settings_path);

        let (mut pet, last_seen) = load_or_init(&paths.save_path);

        // offline catch-up
        let mut recap = None;
        if let Some(last_seen) = last_seen {
            let summary = catch_up(&mut pet, last_seen, chrono::Utc::now(), &settings.rules);
            debug!("caught up {} ticks since last session", summary.ticks_simulated);
            if summary.has_anything() {
                recap = Some(summary);
            }
        }

        let term = Terminal::begin()?;

        Ok(Self {
            settings,
            pet,
            paths,
            term,
            drags: DragController::default(),
            scene: Scene::Main,
            recap,
            should_quit: false,
        })
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let fps = self.settings.fps_cap.clamp(10, 240);
        let frame_dt = Duration::from_secs_f32(1.0 / fps as f32);
        let tick_step = Duration::from_millis(self.settings.rules.tick_interval_ms.max(1));
        let recovery_step =
            Duration::from_millis(self.settings.rules.sleep_recovery_interval_ms.max(1));

        let mut last_frame = Instant::now();
        let mut tick_accum = Duration::ZERO;
        let mut recovery_accum = Duration::ZERO;

        while !self.should_quit {
            self.term.resize_if_needed()?;
            let layout = Layout::compute(self.term.cols, self.term.rows);

            for ev in collect_input_nonblocking(frame_dt)? {
                self.handle_event(ev, &layout);
            }

            // fixed-step decay
            let now = Instant::now();
            let real_dt = now.saturating_duration_since(last_frame);
            last_frame = now;

            tick_accum = tick_accum.saturating_add(real_dt);
            while tick_accum >= tick_step {
                tick_accum = tick_accum.saturating_sub(tick_step);
                if self.pet.tick(&self.settings.rules) {
                    self.save_now();
                }
            }

            // passive recovery runs on its own cadence, only while asleep
            if self.pet.sleeping {
                recovery_accum = recovery_accum.saturating_add(real_dt);
                while recovery_accum >= recovery_step {
                    recovery_accum = recovery_accum.saturating_sub(recovery_step);
                    if self.pet.sleep_recovery_step(&self.settings.rules) {
                        self.save_now();
                    }
                }
            } else {
                recovery_accum = Duration::ZERO;
            }

            self.render_frame(&layout)?;

            spin_sleep(frame_dt, Instant::now());
        }

        self.save_now();
        self.term.end()?;
        save_settings_atomic(&self.paths.settings_path, &self.settings)?;
        Ok(())
    }

    fn handle_event(&mut self, ev: Event, layout: &Layout) {
        match ev {
            Event::Key(k) => {
                // any key dismisses the recap
                if self.recap.take().is_some() {
                    return;
                }
                let Some(cmd) = map_key_to_command(k.code, k.modifiers) else {
                    return;
                };
                match cmd {
                    Command::Pet(action) => {
                        if self.scene == Scene::Main {
                            self.apply_pet_action(action);
                        }
                    }
                    Command::HelpToggle => {
                        self.scene = match self.scene {
                            Scene::Help => Scene::Main,
                            Scene::Main => Scene::Help,
                        };
                    }
                    Command::Back => self.scene = Scene::Main,
                    Command::Quit => self.should_quit = true,
                }
            }
            Event::Mouse(m) => {
                if self.scene != Scene::Main || self.recap.is_some() {
                    self.drags.cancel();
                    return;
                }
                let tray_active = !self.pet.sleeping;
                if let Some(action) = self.drags.on_mouse(m, layout, tray_active) {
                    self.apply_pet_action(action);
                }
            }
            _ => {}
        }
    }

    fn apply_pet_action(&mut self, action: PetAction) {
        if self.pet.apply(action, &self.settings.rules) {
            self.save_now();
        }
    }

    fn render_frame(&mut self, layout: &Layout) -> anyhow::Result<()> {
        self.term.cur.clear(Color::Black);

        ui_overlay(&mut self.term.cur, &self.pet, &self.settings, layout);
        draw_face(&mut self.term.cur, &self.pet, layout, &self.settings);

        // no tray while asleep; sleeping pets don't get snacks dropped on them
        if !self.pet.sleeping {
            draw_tray(
                &mut self.term.cur,
                layout,
                [
                    Item::Food.label(),
                    Item::Water.label(),
                    Item::Ball.label(),
                ],
            );
        }

        if let Some(drag) = self.drags.current() {
            draw_drag_ghost(&mut self.term.cur, drag.x, drag.y, drag.item.label());
        }

        if let Some(ref s) = self.recap {
            draw_center_box(&mut self.term.cur, "While you were away…", &recap_body(s));
        }

        if self.scene == Scene::Help {
            draw_center_box(
                &mut self.term.cur,
                "How to play",
                "Keep the meters off the red end.\n\n\
                 F Feed: -10 hunger (not while asleep).\n\
                 W Water: -10 thirst (not while asleep).\n\
                 P Play: -20 energy, needs at least 20.\n\
                 S Sleep: rest to slowly regain energy.\n\n\
                 Or drag FOOD / WATER / BALL onto the pet;\n\
                 click the pet itself to toggle sleep.\n\n\
                 Esc or H to close help.",
            );
        }

        self.term.present()?;
        Ok(())
    }

    // Fire-and-forget: a failed write is logged, never fatal.
    fn save_now(&self) {
        let save = SaveFile {
            version: SAVE_VERSION,
            last_seen_utc: chrono::Utc::now(),
            pet: self.pet.row(),
        };
        if let Err(e) = save_atomic(&self.paths.save_path, &save) {
            warn!("failed to persist pet state: {e}");
        }
    }
}

pub(crate) fn run() -> anyhow::Result<()> {
    let mut app = App::init()?;
    app.run()?;
    Ok(())
}

/* -----------------------------
   Frame pacing helper
------------------------------ */

fn spin_sleep(target: Duration, now: Instant) {
    let end = now + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}
