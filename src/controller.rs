use std::time::Duration;
use tracing::trace;

use crate::domain::{CtError, Message, TableConfig};
use crate::model::Model;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyModifiers};

pub struct Controller {
    event_poll_time: u64,
}

impl Controller {
    pub fn new(cfg: &TableConfig) -> Self {
        Self {
            event_poll_time: cfg.event_poll_time,
        }
    }

    pub fn handle_event(&self, _model: &Model) -> Result<Option<Message>, CtError> {
        if event::poll(Duration::from_millis(self.event_poll_time))? {
            let message = match event::read()? {
                // Crossterm also emits release and repeat events on Windows.
                Event::Key(key) if key.kind == event::KeyEventKind::Press => self.handle_key(key),
                Event::Resize(width, height) => Some(Message::Resize(width as usize, height as usize)),
                _ => None,
            };
            return Ok(message);
        }
        Ok(None)
    }

    fn handle_key(&self, key: event::KeyEvent) -> Option<Message> {
        let message = match (key.code, key.modifiers) {
            (KeyCode::Char('q'), _) => Some(Message::Quit),
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(Message::Quit),
            (KeyCode::Char(c @ '1'..='9'), _) => c.to_digit(10).map(|n| Message::SortColumn(n as usize)),
            (KeyCode::Tab, _) => Some(Message::FocusNextColumn),
            (KeyCode::BackTab, _) => Some(Message::FocusPreviousColumn),
            (KeyCode::Enter, _) | (KeyCode::Char('s'), _) => Some(Message::SortFocused),
            (KeyCode::Up, _) | (KeyCode::Char('k'), _) => Some(Message::ScrollUp),
            (KeyCode::Down, _) | (KeyCode::Char('j'), _) => Some(Message::ScrollDown),
            (KeyCode::Left, _) | (KeyCode::Char('h'), _) => Some(Message::PreviousPage),
            (KeyCode::Right, _) | (KeyCode::Char('l'), _) => Some(Message::NextPage),
            (KeyCode::Home, _) | (KeyCode::Char('g'), _) => Some(Message::FirstPage),
            (KeyCode::End, _) | (KeyCode::Char('G'), _) => Some(Message::LastPage),
            (KeyCode::Char('+'), _) => Some(Message::IncreasePageSize),
            (KeyCode::Char('-'), _) => Some(Message::DecreasePageSize),
            (KeyCode::Char('?'), _) => Some(Message::Help),
            (KeyCode::Esc, _) => Some(Message::Exit),
            _ => None,
        };
        trace!("Mapped: {key:?} => {message:?}");
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyEvent;

    fn press(code: KeyCode) -> Option<Message> {
        Controller::new(&TableConfig::default()).handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn maps_navigation_keys() {
        assert!(matches!(press(KeyCode::Left), Some(Message::PreviousPage)));
        assert!(matches!(press(KeyCode::Char('l')), Some(Message::NextPage)));
        assert!(matches!(press(KeyCode::Home), Some(Message::FirstPage)));
        assert!(matches!(press(KeyCode::Char('G')), Some(Message::LastPage)));
        assert!(matches!(press(KeyCode::Char('+')), Some(Message::IncreasePageSize)));
        assert!(matches!(press(KeyCode::Char('-')), Some(Message::DecreasePageSize)));
        assert!(matches!(press(KeyCode::Down), Some(Message::ScrollDown)));
        assert!(matches!(press(KeyCode::Char('k')), Some(Message::ScrollUp)));
    }

    #[test]
    fn maps_sort_keys() {
        assert!(matches!(press(KeyCode::Char('5')), Some(Message::SortColumn(5))));
        assert!(matches!(press(KeyCode::Enter), Some(Message::SortFocused)));
        assert!(matches!(press(KeyCode::Tab), Some(Message::FocusNextColumn)));
        assert!(matches!(press(KeyCode::Char('0')), None));
    }

    #[test]
    fn maps_quit_and_popup_keys() {
        assert!(matches!(press(KeyCode::Char('q')), Some(Message::Quit)));
        assert!(matches!(press(KeyCode::Char('?')), Some(Message::Help)));
        assert!(matches!(press(KeyCode::Esc), Some(Message::Exit)));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let controller = Controller::new(&TableConfig::default());
        assert!(matches!(controller.handle_key(ctrl_c), Some(Message::Quit)));
    }
}
