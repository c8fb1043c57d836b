//! Terminal viewport glue
//!
//! Keeps a [`Manager`]'s viewport in step with the terminal it draws on.

use crate::manager::Manager;
use crossterm::event::Event;
use std::io;

/// Current terminal size in cells.
pub fn terminal_size() -> io::Result<(i32, i32)> {
    let (width, height) = crossterm::terminal::size()?;
    Ok((i32::from(width), i32::from(height)))
}

impl Manager {
    /// Sizes the viewport to the terminal.
    pub fn fit_terminal(&mut self) -> io::Result<()> {
        let (width, height) = terminal_size()?;
        self.set_viewport(width, height);
        Ok(())
    }

    /// Follows terminal resizes; true if the viewport changed.
    pub fn apply_event(&mut self, event: &Event) -> bool {
        let Event::Resize(width, height) = *event else {
            return false;
        };
        let size = (i32::from(width), i32::from(height));
        if size == self.viewport() {
            return false;
        }
        tracing::debug!(width = size.0, height = size.1, "terminal resized");
        self.set_viewport(size.0, size.1);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dim::Dim;
    use crate::dimer::Dimer;
    use crate::testing::{dimer, Node};
    use crossterm::event::{KeyCode, KeyEvent};

    #[test]
    fn resize_event_updates_viewport() {
        let root = Node::leaf(Dim::filling(1, 1));
        let mut m = Manager::new();
        m.set_root(dimer(&root));
        m.set_viewport(80, 25);
        m.reflow(None).unwrap();

        assert!(m.apply_event(&Event::Resize(100, 30)));
        assert_eq!(m.viewport(), (100, 30));
        assert!(m.is_dirty());

        m.reflow(None).unwrap();
        assert_eq!(root.dim().borrow().printable().width, 100);
    }

    #[test]
    fn same_size_resize_is_ignored() {
        let mut m = Manager::new();
        m.set_viewport(80, 25);
        assert!(!m.apply_event(&Event::Resize(80, 25)));
    }

    #[test]
    fn other_events_are_ignored() {
        let mut m = Manager::new();
        m.set_viewport(80, 25);
        let key = Event::Key(KeyEvent::from(KeyCode::Char('q')));
        assert!(!m.apply_event(&key));
        assert_eq!(m.viewport(), (80, 25));
    }
}
