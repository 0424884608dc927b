//! Full-screen terminal views: the interactive page browser and the pager.

mod navigator;
mod pager;

use ratatui::crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, List, ListItem, ListState, Paragraph};
use ratatui::{DefaultTerminal, Frame};

pub(crate) use navigator::Navigator;
use navigator::Outcome;
use pager::Pager;

use crate::browser;
use crate::error::CliError;

const HELP: &str = "↑/↓ move • Enter open • v view • → children • ← back • / search • \
s space • g goto id • n/p next/prev • [ ] size • r refresh • q quit";

/// Run the browser until the user quits.
pub(crate) fn browse(nav: &mut Navigator<'_>) -> Result<(), CliError> {
    let mut terminal = ratatui::try_init()?;
    let result = navigate(&mut terminal, nav);
    ratatui::restore();
    result
}

/// Show `text` in the pager until the user quits.
pub(crate) fn page(title: &str, text: &str) -> Result<(), CliError> {
    let mut terminal = ratatui::try_init()?;
    let result = scroll(&mut terminal, &mut Pager::new(title, text));
    ratatui::restore();
    result
}

fn next_key() -> std::io::Result<KeyEvent> {
    loop {
        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            return Ok(key);
        }
    }
}

fn navigate(terminal: &mut DefaultTerminal, nav: &mut Navigator<'_>) -> Result<(), CliError> {
    loop {
        terminal.draw(|frame| draw_navigator(frame, nav))?;
        match nav.handle_key(next_key()?) {
            Outcome::Continue => {}
            Outcome::Quit => return Ok(()),
            Outcome::Open(link) => match browser::open(&link) {
                Ok(()) => nav.set_status(format!("Opened {link}")),
                Err(e) => nav.set_status(format!("Open error: {e}")),
            },
            Outcome::View(mut pager) => scroll(terminal, &mut pager)?,
        }
    }
}

fn scroll(terminal: &mut DefaultTerminal, pager: &mut Pager) -> Result<(), CliError> {
    loop {
        terminal.draw(|frame| pager.draw(frame))?;
        if !pager.handle_key(next_key()?) {
            return Ok(());
        }
    }
}

fn draw_navigator(frame: &mut Frame, nav: &Navigator<'_>) {
    let [help, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(frame.area());
    frame.render_widget(
        Paragraph::new(HELP).style(Style::new().fg(Color::DarkGray)),
        help,
    );

    let block = Block::bordered().title(" Confluence Browser ");
    let inner = block.inner(body);
    frame.render_widget(block, body);
    let [heading, rows] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(inner);
    frame.render_widget(
        Paragraph::new(nav.header()).style(Style::new().add_modifier(Modifier::BOLD)),
        heading,
    );

    let lines = nav.rows();
    if lines.is_empty() {
        frame.render_widget(
            Paragraph::new("No results").style(Style::new().fg(Color::DarkGray)),
            rows,
        );
    } else {
        let list = List::new(lines.into_iter().map(ListItem::new))
            .highlight_style(Style::new().add_modifier(Modifier::REVERSED))
            .highlight_symbol("➤ ");
        let mut state = ListState::default().with_selected(Some(nav.selected()));
        frame.render_stateful_widget(list, rows, &mut state);
    }

    frame.render_widget(
        Paragraph::new(nav.footer()).style(Style::new().fg(Color::Cyan)),
        footer,
    );
}
