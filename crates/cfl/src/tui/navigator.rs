//! Interactive browser state: which page's children are listed, the
//! selection, paging, and the back stack.
//!
//! Key handling is pure apart from API calls; effects that need the
//! terminal (opening a link, showing a page) are returned as [`Outcome`].

use cfl_confluence::{ConfluenceClient, Page};
use cfl_convert::html_to_text;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::pager::Pager;
use crate::commands::browse::{result_lines, simple_query_cql, title_or_untitled};

const DEFAULT_PAGE_SIZE: u32 = 25;
const MIN_PAGE_SIZE: u32 = 5;
const MAX_PAGE_SIZE: u32 = 100;
const PAGE_SIZE_STEP: u32 = 5;

/// What the list shows.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Listing {
    Children(String),
    Search { space: String, query: String },
}

/// A view to return to with `←`.
#[derive(Debug, Clone)]
struct Crumb {
    listing: Option<Listing>,
    header: String,
    start: u32,
    selected: usize,
}

/// Footer question being typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputKind {
    Search,
    Space,
    Goto,
}

impl InputKind {
    fn label(self) -> &'static str {
        match self {
            Self::Search => "Search",
            Self::Space => "Space key",
            Self::Goto => "Page id",
        }
    }
}

#[derive(Debug)]
struct Input {
    kind: InputKind,
    buffer: String,
}

/// What the event loop should do after a key.
pub(crate) enum Outcome {
    Continue,
    Quit,
    /// Open this URL in the web browser.
    Open(String),
    /// Show a page in the pager.
    View(Pager),
}

pub(crate) struct Navigator<'a> {
    client: &'a ConfluenceClient,
    space: Option<String>,
    listing: Option<Listing>,
    header: String,
    items: Vec<Page>,
    selected: usize,
    start: u32,
    page_size: u32,
    stack: Vec<Crumb>,
    status: String,
    input: Option<Input>,
}

impl<'a> Navigator<'a> {
    pub(crate) fn new(client: &'a ConfluenceClient) -> Self {
        Self {
            client,
            space: None,
            listing: None,
            header: String::new(),
            items: Vec::new(),
            selected: 0,
            start: 0,
            page_size: DEFAULT_PAGE_SIZE,
            stack: Vec::new(),
            status: String::new(),
            input: None,
        }
    }

    /// Land on `space`'s homepage, or wait for `s`.
    pub(crate) fn start(&mut self, space: Option<&str>) {
        match space {
            Some(space) => self.goto_space(space),
            None => self.status = "Press 's' to select a space (loads its homepage).".to_owned(),
        }
    }

    pub(crate) fn header(&self) -> &str {
        &self.header
    }

    pub(crate) fn rows(&self) -> Vec<String> {
        let mut pages = self.items.clone();
        for page in &mut pages {
            page.title = page.title.replace('\n', " ");
        }
        result_lines(&pages, self.start)
    }

    pub(crate) fn selected(&self) -> usize {
        self.selected
    }

    /// Status text, or the question being typed.
    pub(crate) fn footer(&self) -> String {
        match &self.input {
            Some(input) => format!("{}: {}_", input.kind.label(), input.buffer),
            None => self.status.clone(),
        }
    }

    pub(crate) fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    fn goto_space(&mut self, space: &str) {
        self.space = Some(space.to_owned());
        self.start = 0;
        self.selected = 0;

        let home = match self.client.get_space_homepage(space) {
            Ok(Some(home)) => home,
            Ok(None) => {
                self.header = format!("Space {space} (no homepage)");
                self.listing = None;
                self.items.clear();
                self.status = "No homepage available for this space.".to_owned();
                return;
            }
            Err(e) => {
                self.status = format!("Error: {e}");
                return;
            }
        };

        let title = match self.client.get_page(&home, &[]) {
            Ok(root) if !root.title.is_empty() => root.title,
            _ => "(homepage)".to_owned(),
        };
        self.header = format!("{title}  [id:{home}]  (homepage)");
        self.listing = Some(Listing::Children(home));
        self.load();
    }

    /// Fetch the current listing at the current offset.
    fn load(&mut self) {
        let result = match &self.listing {
            None => {
                self.items.clear();
                self.status = "Press 's' to select a space.".to_owned();
                return;
            }
            Some(Listing::Children(id)) => self
                .client
                .list_children(id, self.page_size, self.start)
                .map(|items| (items, format!("Children of {id}"))),
            Some(Listing::Search { space, query }) => self
                .client
                .search_cql(
                    &simple_query_cql(query, Some(space)),
                    self.page_size,
                    self.start,
                )
                .map(|items| (items, format!("Search in {space}: '{query}'"))),
        };

        match result {
            Ok((items, what)) => {
                self.status = format!(
                    "{what}  •  start={}  •  size={}  •  {} items",
                    self.start,
                    self.page_size,
                    items.len()
                );
                self.items = items;
            }
            Err(e) => {
                self.items.clear();
                self.status = format!("Error: {e}");
            }
        }
        self.selected = self.selected.min(self.items.len().saturating_sub(1));
    }

    fn crumb(&self) -> Crumb {
        Crumb {
            listing: self.listing.clone(),
            header: self.header.clone(),
            start: self.start,
            selected: self.selected,
        }
    }

    /// Show a new listing, remembering the current one for `←`.
    fn enter(&mut self, listing: Listing, header: String) {
        self.stack.push(self.crumb());
        self.listing = Some(listing);
        self.header = header;
        self.start = 0;
        self.selected = 0;
        self.load();
    }

    fn back(&mut self) {
        let Some(crumb) = self.stack.pop() else {
            self.status = "Top level".to_owned();
            return;
        };
        self.listing = crumb.listing;
        self.header = crumb.header;
        self.start = crumb.start;
        self.selected = crumb.selected;
        self.load();
    }

    fn current(&self) -> Option<(&Page, &str)> {
        let page = self.items.get(self.selected)?;
        Some((page, page.id.as_deref()?))
    }

    fn drill(&mut self) {
        let Some((page, id)) = self.current() else {
            return;
        };
        let header = format!("{}  [id:{id}]", title_or_untitled(page));
        let listing = Listing::Children(id.to_owned());
        self.enter(listing, header);
    }

    fn open(&mut self) -> Outcome {
        let Some((page, _)) = self.current() else {
            self.status = "No item selected.".to_owned();
            return Outcome::Continue;
        };
        match self.client.page_link(page) {
            Some(link) => Outcome::Open(link),
            None => {
                self.status = "Could not build link".to_owned();
                Outcome::Continue
            }
        }
    }

    fn view(&mut self) -> Outcome {
        let Some((page, id)) = self.current() else {
            self.status = "No item selected.".to_owned();
            return Outcome::Continue;
        };
        let title = title_or_untitled(page).to_owned();
        match self.client.get_page_rendered_html(id, true) {
            Ok(html) if html.is_empty() => {
                self.status = "No rendered content.".to_owned();
                Outcome::Continue
            }
            Ok(html) => Outcome::View(Pager::new(title, html_to_text(&html))),
            Err(e) => {
                self.status = format!("View error: {e}");
                Outcome::Continue
            }
        }
    }

    fn next_page(&mut self) {
        if self.items.len() < self.page_size as usize {
            self.status = "No more pages.".to_owned();
            return;
        }
        self.start += self.page_size;
        self.selected = 0;
        self.load();
    }

    fn prev_page(&mut self) {
        if self.start == 0 {
            self.status = "Already at the first page.".to_owned();
            return;
        }
        self.start = self.start.saturating_sub(self.page_size);
        self.selected = 0;
        self.load();
    }

    fn resize_page(&mut self, size: u32) {
        self.page_size = size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);
        self.start = 0;
        self.selected = 0;
        self.load();
    }

    fn ask(&mut self, kind: InputKind) {
        if kind == InputKind::Search && self.space.is_none() {
            self.status = "Select a space first (press 's').".to_owned();
            return;
        }
        self.input = Some(Input {
            kind,
            buffer: String::new(),
        });
    }

    fn submit(&mut self, kind: InputKind, answer: &str) {
        match kind {
            InputKind::Search => {
                let Some(space) = self.space.clone() else {
                    return;
                };
                let listing = Listing::Search {
                    space,
                    query: answer.to_owned(),
                };
                self.enter(listing, format!("Search: {answer}"));
            }
            InputKind::Space => {
                self.stack.clear();
                self.goto_space(answer);
            }
            InputKind::Goto => match self.client.get_page(answer, &[]) {
                Ok(page) => {
                    let header = format!("{}  [id:{answer}]", title_or_untitled(&page));
                    self.enter(Listing::Children(answer.to_owned()), header);
                }
                Err(e) => self.status = format!("Go to error: {e}"),
            },
        }
    }

    fn handle_input(&mut self, key: KeyEvent) {
        let Some(input) = &mut self.input else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.input = None,
            KeyCode::Backspace => {
                input.buffer.pop();
            }
            KeyCode::Enter => {
                let kind = input.kind;
                let answer = input.buffer.trim().to_owned();
                self.input = None;
                if !answer.is_empty() {
                    self.submit(kind, &answer);
                }
            }
            KeyCode::Char(c) => input.buffer.push(c),
            _ => {}
        }
    }

    /// Apply one key press.
    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> Outcome {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Outcome::Quit;
        }
        if self.input.is_some() {
            self.handle_input(key);
            return Outcome::Continue;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Outcome::Quit,
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1).min(self.items.len().saturating_sub(1));
            }
            KeyCode::Right | KeyCode::Char('l') => self.drill(),
            KeyCode::Left | KeyCode::Char('h') => self.back(),
            KeyCode::Enter => return self.open(),
            KeyCode::Char('v') => return self.view(),
            KeyCode::Char('/') => self.ask(InputKind::Search),
            KeyCode::Char('s') => self.ask(InputKind::Space),
            KeyCode::Char('g') => self.ask(InputKind::Goto),
            KeyCode::Char('n') => self.next_page(),
            KeyCode::Char('p') => self.prev_page(),
            KeyCode::Char('[') => self.resize_page(self.page_size.saturating_sub(PAGE_SIZE_STEP)),
            KeyCode::Char(']') => self.resize_page(self.page_size + PAGE_SIZE_STEP),
            KeyCode::Char('r') => self.load(),
            _ => {}
        }
        Outcome::Continue
    }
}
