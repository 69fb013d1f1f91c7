use crate::render::{Layout, TRAY_SLOTS};
use crate::sim::PetAction;
use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use std::time::Duration;

/// UI-level commands; pet actions are wrapped so the simulator only ever
/// receives a `PetAction`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Pet(PetAction),
    HelpToggle,
    Back,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Item {
    Food,
    Water,
    Ball,
}

impl Item {
    pub(crate) const ALL: [Item; TRAY_SLOTS] = [Item::Food, Item::Water, Item::Ball];

    pub(crate) fn action(self) -> PetAction {
        match self {
            Item::Food => PetAction::Feed,
            Item::Water => PetAction::GiveWater,
            Item::Ball => PetAction::Play,
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Item::Food => "FOOD",
            Item::Water => "WATER",
            Item::Ball => "BALL",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Drag {
    pub(crate) item: Item,
    pub(crate) x: i32,
    pub(crate) y: i32,
}

/// Owns all pointer state. The rest of the app only ever sees the
/// `PetAction` that falls out of a completed gesture.
#[derive(Default)]
pub(crate) struct DragController {
    drag: Option<Drag>,
}

impl DragController {
    pub(crate) fn current(&self) -> Option<&Drag> {
        self.drag.as_ref()
    }

    pub(crate) fn cancel(&mut self) {
        self.drag = None;
    }

    pub(crate) fn on_mouse(
        &mut self,
        ev: MouseEvent,
        layout: &Layout,
        tray_active: bool,
    ) -> Option<PetAction> {
        let (x, y) = (ev.column as i32, ev.row as i32);
        match ev.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if tray_active {
                    for (slot, item) in layout.tray.iter().zip(Item::ALL) {
                        if slot.contains(x, y) {
                            self.drag = Some(Drag { item, x, y });
                            return None;
                        }
                    }
                }
                // tapping the pet itself toggles rest
                if layout.pet.contains(x, y) {
                    return Some(PetAction::SleepToggle);
                }
                None
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(d) = self.drag.as_mut() {
                    d.x = x;
                    d.y = y;
                }
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let done = self.drag.take()?;
                // Only the release point matters for the drop.
                if layout.pet.contains(x, y) {
                    Some(done.item.action())
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

pub(crate) fn collect_input_nonblocking(max_frame_time: Duration) -> anyhow::Result<Vec<Event>> {
    let mut out = Vec::new();

    // poll with a tiny timeout so we stay responsive
    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    while event::poll(timeout)? {
        match event::read()? {
            Event::Key(k) => {
                if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat {
                    out.push(Event::Key(k));
                }
            }
            ev @ Event::Mouse(_) => out.push(ev),
            _ => {}
        }
        if out.len() >= 64 {
            break;
        }
    }
    Ok(out)
}

pub(crate) fn map_key_to_command(key: KeyCode, mods: KeyModifiers) -> Option<Command> {
    if matches!(key, KeyCode::Char('c') | KeyCode::Char('C'))
        && mods.contains(KeyModifiers::CONTROL)
    {
        return Some(Command::Quit);
    }
    match key {
        KeyCode::Char('f') | KeyCode::Char('F') => Some(Command::Pet(PetAction::Feed)),
        KeyCode::Char('w') | KeyCode::Char('W') => Some(Command::Pet(PetAction::GiveWater)),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Command::Pet(PetAction::Play)),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(Command::Pet(PetAction::SleepToggle)),
        KeyCode::Char('h') | KeyCode::Char('H') => Some(Command::HelpToggle),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Command::Quit),
        KeyCode::Esc => Some(Command::Back),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> Layout {
        Layout::compute(100, 30)
    }

    fn mouse(kind: MouseEventKind, x: i32, y: i32) -> MouseEvent {
        MouseEvent {
            kind,
            column: x as u16,
            row: y as u16,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn drop_on_pet_triggers_the_item_action() {
        let layout = layout();
        let mut drags = DragController::default();
        let slot = layout.tray[0];
        let pet = layout.pet;

        assert!(drags
            .on_mouse(
                mouse(MouseEventKind::Down(MouseButton::Left), slot.x + 1, slot.y + 1),
                &layout,
                true,
            )
            .is_none());
        assert!(drags
            .on_mouse(
                mouse(MouseEventKind::Drag(MouseButton::Left), pet.x + 1, pet.y + 1),
                &layout,
                true,
            )
            .is_none());
        let action = drags.on_mouse(
            mouse(MouseEventKind::Up(MouseButton::Left), pet.x + 1, pet.y + 1),
            &layout,
            true,
        );
        assert_eq!(action, Some(PetAction::Feed));
        assert!(drags.current().is_none());
    }

    #[test]
    fn drop_outside_pet_does_nothing() {
        let layout = layout();
        let mut drags = DragController::default();
        let slot = layout.tray[2];

        drags.on_mouse(
            mouse(MouseEventKind::Down(MouseButton::Left), slot.x + 1, slot.y + 1),
            &layout,
            true,
        );
        let action = drags.on_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 0, 0), &layout, true);
        assert_eq!(action, None);
    }

    #[test]
    fn inactive_tray_starts_no_drag() {
        let layout = layout();
        let mut drags = DragController::default();
        let slot = layout.tray[1];

        drags.on_mouse(
            mouse(MouseEventKind::Down(MouseButton::Left), slot.x + 1, slot.y + 1),
            &layout,
            false,
        );
        assert!(drags.current().is_none());
    }

    #[test]
    fn clicking_the_pet_toggles_sleep() {
        let layout = layout();
        let mut drags = DragController::default();
        let action = drags.on_mouse(
            mouse(
                MouseEventKind::Down(MouseButton::Left),
                layout.pet.x + 2,
                layout.pet.y + 2,
            ),
            &layout,
            true,
        );
        assert_eq!(action, Some(PetAction::SleepToggle));
    }
}
