//! Scrollable text viewer.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;

/// Page text with a scroll position.
///
/// Lines are wrapped to the viewport width on each resize, so the offset
/// counts screen rows.
pub(crate) struct Pager {
    title: String,
    text: String,
    rows: Vec<String>,
    width: usize,
    height: usize,
    offset: usize,
}

impl Pager {
    pub(crate) fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            rows: Vec::new(),
            width: 0,
            height: 0,
            offset: 0,
        }
    }

    /// Fit to a `width` x `height` viewport, keeping the offset in range.
    pub(crate) fn resize(&mut self, width: usize, height: usize) {
        if width != self.width {
            self.rows = wrap(&self.text, width);
            self.width = width;
        }
        self.height = height;
        self.offset = self.offset.min(self.max_offset());
    }

    fn max_offset(&self) -> usize {
        self.rows.len().saturating_sub(self.height)
    }

    fn scroll_down(&mut self, rows: usize) {
        self.offset = (self.offset + rows).min(self.max_offset());
    }

    fn scroll_up(&mut self, rows: usize) {
        self.offset = self.offset.saturating_sub(rows);
    }

    /// Apply a key; `false` once the user leaves.
    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> bool {
        let page = self.height.saturating_sub(1).max(1);
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return false,
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Enter => self.scroll_down(1),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_up(1),
            KeyCode::PageDown | KeyCode::Char(' ' | 'f') => self.scroll_down(page),
            KeyCode::PageUp | KeyCode::Char('b') => self.scroll_up(page),
            KeyCode::Home | KeyCode::Char('g') => self.offset = 0,
            KeyCode::End | KeyCode::Char('G') => self.offset = self.max_offset(),
            _ => {}
        }
        true
    }

    /// Rows currently on screen.
    pub(crate) fn visible(&self) -> &[String] {
        let end = (self.offset + self.height).min(self.rows.len());
        &self.rows[self.offset.min(end)..end]
    }

    fn position(&self) -> String {
        if self.rows.is_empty() {
            return "empty".to_owned();
        }
        format!(
            "lines {}-{} of {}",
            self.offset + 1,
            self.offset + self.visible().len(),
            self.rows.len()
        )
    }

    pub(crate) fn draw(&mut self, frame: &mut Frame) {
        let [body, footer] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());
        let block = Block::bordered().title(Line::from(self.title.clone()).bold());
        let inner = block.inner(body);
        self.resize(usize::from(inner.width), usize::from(inner.height));

        let lines: Vec<Line> = self
            .visible()
            .iter()
            .map(|row| Line::from(row.as_str()))
            .collect();
        frame.render_widget(Paragraph::new(lines).block(block), body);
        frame.render_widget(
            Paragraph::new(format!(
                "{}  •  ↑/↓ scroll • PgUp/PgDn page • g/G top/end • q back",
                self.position()
            ))
            .style(Style::new().fg(Color::DarkGray)),
            footer,
        );
    }
}

/// Word-wrap `text` to `width` columns; words longer than a row are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    for line in text.lines() {
        let mut row = String::new();
        let mut row_len = 0;
        for word in line.split(' ') {
            let mut word: Vec<char> = word.chars().collect();
            if row_len > 0 && row_len + 1 + word.len() > width {
                rows.push(std::mem::take(&mut row));
                row_len = 0;
            }
            if row_len > 0 {
                row.push(' ');
                row_len += 1;
            }
            while row_len + word.len() > width {
                let rest = word.split_off(width - row_len);
                row.extend(word);
                rows.push(std::mem::take(&mut row));
                row_len = 0;
                word = rest;
            }
            row_len += word.len();
            row.extend(word);
        }
        rows.push(row);
    }
    rows
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn pager(lines: usize, height: usize) -> Pager {
        let text: Vec<String> = (1..=lines).map(|n| format!("line {n}")).collect();
        let mut pager = Pager::new("Title", text.join("\n"));
        pager.resize(40, height);
        pager
    }

    #[test]
    fn test_wrap() {
        assert_eq!(
            wrap("the quick brown fox\n\nabcdefghij", 9),
            vec!["the quick", "brown fox", "", "abcdefghi", "j"]
        );
        assert_eq!(wrap("a  b", 10), vec!["a  b"]);
    }

    #[test]
    fn test_scroll_bounds() {
        let mut pager = pager(10, 4);
        assert_eq!(pager.visible()[0], "line 1");

        pager.handle_key(key(KeyCode::Up));
        assert_eq!(pager.offset, 0);

        pager.handle_key(key(KeyCode::PageDown));
        assert_eq!(pager.visible()[0], "line 4");

        pager.handle_key(key(KeyCode::End));
        assert_eq!(pager.visible(), ["line 7", "line 8", "line 9", "line 10"]);
        pager.handle_key(key(KeyCode::Down));
        assert_eq!(pager.offset, 6);
        assert_eq!(pager.position(), "lines 7-10 of 10");

        pager.handle_key(key(KeyCode::Char('g')));
        assert_eq!(pager.offset, 0);
    }

    #[test]
    fn test_resize_clamps_offset() {
        let mut pager = pager(10, 4);
        pager.handle_key(key(KeyCode::End));

        pager.resize(40, 8);

        assert_eq!(pager.offset, 2);
    }

    #[test]
    fn test_short_text_does_not_scroll() {
        let mut pager = pager(2, 10);
        pager.handle_key(key(KeyCode::PageDown));
        assert_eq!(pager.visible().len(), 2);
        assert_eq!(pager.offset, 0);
    }

    #[test]
    fn test_quit_keys() {
        let mut pager = pager(1, 1);
        assert!(pager.handle_key(key(KeyCode::Char('j'))));
        assert!(!pager.handle_key(key(KeyCode::Char('q'))));
        assert!(!pager.handle_key(key(KeyCode::Esc)));
        assert!(!pager.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
    }
}
