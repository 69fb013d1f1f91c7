use crate::config::Settings;
use crate::model::{CatchupSummary, Mood, PetState, STAT_MAX};
use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use std::io::{self, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
        }
    }
}

pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }

    pub(crate) fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }

    pub(crate) fn clear(&mut self, bg: Color) {
        for c in &mut self.cells {
            c.ch = ' ';
            c.fg = Color::White;
            c.bg = bg;
        }
    }

    pub(crate) fn put(&mut self, x: i32, y: i32, ch: char, fg: Color, bg: Color) {
        if x < 0 || y < 0 || x >= self.w as i32 || y >= self.h as i32 {
            return;
        }
        let i = self.idx(x as u16, y as u16);
        self.cells[i] = Cell { ch, fg, bg };
    }
}

pub(crate) fn draw_text(buf: &mut CellBuffer, x: i32, y: i32, s: &str, fg: Color, bg: Color) {
    for (i, ch) in s.chars().enumerate() {
        buf.put(x + i as i32, y, ch, fg, bg);
    }
}

/* -----------------------------
   Terminal session
------------------------------ */

pub(crate) struct Terminal {
    pub(crate) out: io::Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    pub(crate) prev: CellBuffer,
    pub(crate) cur: CellBuffer,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            EnableMouseCapture,
            terminal::Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;

        let (cols, rows) = terminal::size()?;
        Ok(Self {
            out,
            cols,
            rows,
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
        })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            DisableMouseCapture,
            EndSynchronizedUpdate,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        Ok(true)
    }

    pub(crate) fn present(&mut self) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;

        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if c == self.prev.cells[i] {
                    continue;
                }

                queue!(self.out, cursor::MoveTo(x, y))?;
                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }
                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

/* -----------------------------
   Layout: panel left, pet right, item tray along the bottom
------------------------------ */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Rect {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) w: i32,
    pub(crate) h: i32,
}

impl Rect {
    pub(crate) fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.x + self.w && py >= self.y && py < self.y + self.h
    }
}

pub(crate) const TRAY_SLOTS: usize = 3;
const TRAY_BOX_W: i32 = 11;
const TRAY_BOX_H: i32 = 3;

#[derive(Clone, Copy, Debug)]
pub(crate) struct Layout {
    pub(crate) panel_w: i32,
    pub(crate) pet: Rect,
    pub(crate) tray: [Rect; TRAY_SLOTS],
}

impl Layout {
    pub(crate) fn compute(cols: u16, rows: u16) -> Self {
        let cols = cols as i32;
        let rows = rows as i32;

        let panel_w = (cols / 3).clamp(26, (cols - 10).max(26));
        let stage_x = panel_w;
        let stage_w = (cols - stage_x).max(1);

        let face_w = (FACE_W + 4).min(stage_w);
        let face_h = (FACE_H + 2).min(rows.max(1));
        let pet = Rect {
            x: stage_x + (stage_w - face_w) / 2,
            y: ((rows - TRAY_BOX_H - 1 - face_h) / 2).max(0),
            w: face_w,
            h: face_h,
        };

        let tray_y = rows - TRAY_BOX_H - 1;
        let gap = 2;
        let tray_total = TRAY_BOX_W * TRAY_SLOTS as i32 + gap * (TRAY_SLOTS as i32 - 1);
        let tray_x = stage_x + (stage_w - tray_total) / 2;
        let mut tray = [Rect {
            x: 0,
            y: 0,
            w: TRAY_BOX_W,
            h: TRAY_BOX_H,
        }; TRAY_SLOTS];
        for (i, slot) in tray.iter_mut().enumerate() {
            slot.x = tray_x + i as i32 * (TRAY_BOX_W + gap);
            slot.y = tray_y;
        }

        Self { panel_w, pet, tray }
    }
}

/* -----------------------------
   Face sprites, one per mood
------------------------------ */

const FACE_W: i32 = 15;
const FACE_H: i32 = 8;

const FACE_HAPPY: [&str; 8] = [
    r"  .-~~~~~~~-.  ",
    r" /           \ ",
    r"|   ^     ^   |",
    r"|             |",
    r"|  \       /  |",
    r"|   `-----'   |",
    r" \           / ",
    r"  `-._____.-'  ",
];

const FACE_OKAY: [&str; 8] = [
    r"  .-~~~~~~~-.  ",
    r" /           \ ",
    r"|   o     o   |",
    r"|             |",
    r"|    `---'    |",
    r"|             |",
    r" \           / ",
    r"  `-._____.-'  ",
];

const FACE_MEH: [&str; 8] = [
    r"  .-~~~~~~~-.  ",
    r" /           \ ",
    r"|   -     -   |",
    r"|             |",
    r"|    -----    |",
    r"|             |",
    r" \           / ",
    r"  `-._____.-'  ",
];

const FACE_ANGRY: [&str; 8] = [
    r"  .-~~~~~~~-.  ",
    r" /  \     /  \ ",
    r"|   o     o   |",
    r"|             |",
    r"|    .---.    |",
    r"|   /     \   |",
    r" \           / ",
    r"  `-._____.-'  ",
];

const FACE_SAD: [&str; 8] = [
    r"  .-~~~~~~~-.  ",
    r" /           \ ",
    r"|   ;     ;   |",
    r"|  o          |",
    r"|    .---.    |",
    r"|   /     \   |",
    r" \           / ",
    r"  `-._____.-'  ",
];

const FACE_DEAD: [&str; 8] = [
    r"  .-~~~~~~~-.  ",
    r" /           \ ",
    r"|   x     x   |",
    r"|             |",
    r"|   ~~~~~~~   |",
    r"|             |",
    r" \           / ",
    r"  `-._____.-'  ",
];

const FACE_SLEEPY: [&str; 8] = [
    r"  .-~~~~~~~-.  ",
    r" /           \ ",
    r"|   _     _   |",
    r"|             |",
    r"|      o      |",
    r"|             |",
    r" \           / ",
    r"  `-._____.-'  ",
];

fn face_art(mood: Mood) -> &'static [&'static str; 8] {
    match mood {
        Mood::Happy => &FACE_HAPPY,
        Mood::Okay => &FACE_OKAY,
        Mood::Meh => &FACE_MEH,
        Mood::Angry => &FACE_ANGRY,
        Mood::Sad => &FACE_SAD,
        Mood::Dead => &FACE_DEAD,
        Mood::Sleepy => &FACE_SLEEPY,
    }
}

pub(crate) fn mood_color(mood: Mood, enable_color: bool) -> Color {
    if !enable_color {
        return Color::White;
    }
    match mood {
        Mood::Happy => Color::Green,
        Mood::Okay => Color::Cyan,
        Mood::Meh => Color::White,
        Mood::Angry => Color::Red,
        Mood::Sad => Color::Blue,
        Mood::Dead => Color::DarkGrey,
        Mood::Sleepy => Color::Magenta,
    }
}

pub(crate) fn draw_face(buf: &mut CellBuffer, pet: &PetState, layout: &Layout, settings: &Settings) {
    let art = face_art(pet.mood);
    let fg = mood_color(pet.mood, settings.enable_color);
    let x0 = layout.pet.x + (layout.pet.w - FACE_W) / 2;
    let y0 = layout.pet.y + (layout.pet.h - FACE_H) / 2;

    for (dy, line) in art.iter().enumerate() {
        for (dx, ch) in line.chars().enumerate() {
            if ch != ' ' {
                buf.put(x0 + dx as i32, y0 + dy as i32, ch, fg, Color::Black);
            }
        }
    }

    if pet.sleeping {
        draw_text(
            buf,
            x0 + FACE_W - 2,
            (y0 - 1).max(0),
            "z Z z",
            fg,
            Color::Black,
        );
    }
}

/* -----------------------------
   Panel: meters, mood, hints
------------------------------ */

const METER_W: i32 = 20;

fn meter_color(value: u8, danger_high: bool, enable_color: bool) -> Color {
    if !enable_color {
        return Color::White;
    }
    let severity = if danger_high { value } else { STAT_MAX - value };
    match severity {
        0..=39 => Color::Green,
        40..=69 => Color::Yellow,
        _ => Color::Red,
    }
}

fn draw_meter(
    buf: &mut CellBuffer,
    x: i32,
    y: i32,
    label: &str,
    value: u8,
    danger_high: bool,
    enable_color: bool,
) {
    let fg = meter_color(value, danger_high, enable_color);
    draw_text(buf, x, y, label, Color::White, Color::Black);

    let bar_x = x + 8;
    buf.put(bar_x, y, '[', Color::White, Color::Black);
    let filled = (value as i32 * METER_W) / STAT_MAX as i32;
    for i in 0..METER_W {
        let ch = if i < filled { '#' } else { '.' };
        buf.put(bar_x + 1 + i, y, ch, fg, Color::Black);
    }
    buf.put(bar_x + 1 + METER_W, y, ']', Color::White, Color::Black);
    draw_text(
        buf,
        bar_x + METER_W + 3,
        y,
        &format!("{value:>3}"),
        fg,
        Color::Black,
    );
}

pub(crate) fn ui_overlay(buf: &mut CellBuffer, pet: &PetState, settings: &Settings, layout: &Layout) {
    let x = 2;
    draw_text(buf, x, 1, "D I G I P E T", Color::White, Color::Black);

    draw_meter(buf, x, 3, "hunger", pet.hunger, true, settings.enable_color);
    draw_meter(buf, x, 4, "thirst", pet.thirst, true, settings.enable_color);
    draw_meter(buf, x, 5, "energy", pet.energy, false, settings.enable_color);

    let mood_fg = mood_color(pet.mood, settings.enable_color);
    draw_text(buf, x, 7, "mood:", Color::White, Color::Black);
    draw_text(buf, x + 6, 7, pet.mood.label(), mood_fg, Color::Black);
    if pet.sleeping {
        draw_text(buf, x, 8, "(sleeping)", Color::DarkGrey, Color::Black);
    }

    if settings.show_hints {
        let hints = [
            "F feed   W water",
            "P play   S sleep",
            "H help   Q quit",
            "",
            "drag an item onto",
            "the pet, or click",
            "the pet to rest",
        ];
        let mut y = 10;
        for line in hints {
            draw_text(buf, x, y, line, Color::DarkGrey, Color::Black);
            y += 1;
        }
    }

    // panel / stage divider
    for y in 0..buf.h as i32 {
        buf.put(layout.panel_w - 1, y, '│', Color::DarkGrey, Color::Black);
    }
}

pub(crate) fn draw_tray(buf: &mut CellBuffer, layout: &Layout, labels: [&str; TRAY_SLOTS]) {
    for (slot, label) in layout.tray.iter().zip(labels) {
        for dy in 0..slot.h {
            for dx in 0..slot.w {
                let (x, y) = (slot.x + dx, slot.y + dy);
                let edge_x = dx == 0 || dx == slot.w - 1;
                let edge_y = dy == 0 || dy == slot.h - 1;
                let ch = match (edge_x, edge_y) {
                    (true, true) => '+',
                    (true, false) => '|',
                    (false, true) => '-',
                    (false, false) => ' ',
                };
                buf.put(x, y, ch, Color::White, Color::Black);
            }
        }
        let lx = slot.x + (slot.w - label.len() as i32) / 2;
        draw_text(buf, lx, slot.y + slot.h / 2, label, Color::White, Color::Black);
    }
}

pub(crate) fn draw_drag_ghost(buf: &mut CellBuffer, x: i32, y: i32, label: &str) {
    let w = label.len() as i32 + 2;
    draw_text(
        buf,
        x - w / 2,
        y,
        &format!("[{label}]"),
        Color::Yellow,
        Color::Black,
    );
}

/* -----------------------------
   Centered overlay boxes (help, catch-up recap)
------------------------------ */

pub(crate) fn draw_center_box(buf: &mut CellBuffer, title: &str, body: &str) {
    let w = buf.w as i32;
    let h = buf.h as i32;
    let bw = 46.min(w - 4).max(10);
    let bh = (body.lines().count() as i32 + 5).min(h - 2).max(5);
    let x0 = (w - bw) / 2;
    let y0 = (h - bh) / 2;

    for dy in 0..bh {
        for dx in 0..bw {
            let (x, y) = (x0 + dx, y0 + dy);
            let ch = match (dx == 0, dx == bw - 1, dy == 0, dy == bh - 1) {
                (true, _, true, _) => '┌',
                (_, true, true, _) => '┐',
                (true, _, _, true) => '└',
                (_, true, _, true) => '┘',
                (true, _, _, _) | (_, true, _, _) => '│',
                (_, _, true, _) | (_, _, _, true) => '─',
                _ => ' ',
            };
            buf.put(x, y, ch, Color::White, Color::Black);
        }
    }

    draw_text(buf, x0 + 2, y0 + 1, title, Color::White, Color::Black);
    let mut yy = y0 + 3;
    for line in body.lines() {
        if yy >= y0 + bh - 1 {
            break;
        }
        draw_text(buf, x0 + 2, yy, line, Color::White, Color::Black);
        yy += 1;
    }
}

pub(crate) fn recap_body(s: &CatchupSummary) -> String {
    format!(
        "Simulated {} ticks\nHunger peaked at {}\nThirst peaked at {}\nEnergy dipped to {}\n\nPress any key",
        s.ticks_simulated, s.hunger_peak, s.thirst_peak, s.energy_low
    )
}
