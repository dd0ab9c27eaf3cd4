use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::application::controller::TaskListController;
use crate::domain::{store::TaskStore, task::Task};

pub const LOADING_MESSAGE: &str = "Loading...";
pub const EMPTY_MESSAGE: &str = "No tasks available. Please add a new task.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow { Continue, Quit }

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus { List, Compose }

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField { Title, Description }

/// Terminal front end over a `TaskListController`.
pub struct App<S: TaskStore> {
    controller: TaskListController<S>,
    selected: usize,
    focus: Focus,
    field: DraftField,
    api_url: String,
}

impl<S: TaskStore> App<S> {
    pub fn new(controller: TaskListController<S>, api_url: impl Into<String>) -> Self {
        Self { controller, selected: 0, focus: Focus::List, field: DraftField::Title, api_url: api_url.into() }
    }

    pub fn controller(&self) -> &TaskListController<S> { &self.controller }
    pub fn selected(&self) -> usize { self.selected }
    pub fn focus(&self) -> Focus { self.focus }

    fn selected_task(&self) -> Option<&Task> { self.controller.state().tasks().get(self.selected) }

    /// Applies finished requests and keeps the cursor inside the list.
    pub fn tick(&mut self) {
        self.controller.poll_completions();
        let len = self.controller.state().tasks().len();
        if len == 0 { self.selected = 0; } else if self.selected >= len { self.selected = len - 1; }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Flow {
        // Only act on presses; repeats and releases would duplicate input
        if key.kind != KeyEventKind::Press { return Flow::Continue; }
        if self.controller.state().edit_session().is_some() {
            self.on_edit_key(key.code);
            return Flow::Continue;
        }
        match self.focus {
            Focus::Compose => { self.on_compose_key(key.code); Flow::Continue }
            Focus::List => self.on_list_key(key.code),
        }
    }

    fn on_list_key(&mut self, code: KeyCode) -> Flow {
        match code {
            KeyCode::Char('q') => return Flow::Quit,
            KeyCode::Up => { self.selected = self.selected.saturating_sub(1); }
            KeyCode::Down => {
                if self.selected + 1 < self.controller.state().tasks().len() { self.selected += 1; }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(id) = self.selected_task().map(|t| t.id.clone()) {
                    if let Err(err) = self.controller.toggle_done(&id) { tracing::warn!(error = %err, "toggle ignored"); }
                }
            }
            KeyCode::Char('e') => {
                if let Some(task) = self.selected_task().cloned() {
                    self.field = DraftField::Title;
                    self.controller.start_edit(task.id, task.title, task.description);
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.selected_task().map(|t| t.id.clone()) { self.controller.delete_task(&id); }
            }
            KeyCode::Char('n') | KeyCode::Char('a') => { self.focus = Focus::Compose; }
            _ => {}
        }
        Flow::Continue
    }

    fn on_compose_key(&mut self, code: KeyCode) {
        let mut title = self.controller.state().pending_title().to_string();
        match code {
            KeyCode::Esc => { self.focus = Focus::List; return; }
            KeyCode::Enter => {
                self.controller.add_task();
                self.focus = Focus::List;
                return;
            }
            KeyCode::Backspace => { title.pop(); }
            KeyCode::Char(c) => title.push(c),
            _ => return,
        }
        self.controller.set_pending_title(title);
    }

    fn on_edit_key(&mut self, code: KeyCode) {
        let Some(session) = self.controller.state().edit_session() else { return };
        let target = session.target.clone();
        let mut text = match self.field {
            DraftField::Title => session.draft_title.clone(),
            DraftField::Description => session.draft_description.clone(),
        };
        match code {
            KeyCode::Esc => { self.controller.cancel_edit(); return; }
            KeyCode::Enter => {
                if let Err(err) = self.controller.save_edit(&target) { tracing::warn!(error = %err, "save ignored"); }
                return;
            }
            KeyCode::Tab => {
                self.field = match self.field { DraftField::Title => DraftField::Description, DraftField::Description => DraftField::Title };
                return;
            }
            KeyCode::Backspace => { text.pop(); }
            KeyCode::Char(c) => text.push(c),
            _ => return,
        }
        match self.field {
            DraftField::Title => self.controller.update_draft_title(text),
            DraftField::Description => self.controller.update_draft_description(text),
        }
    }
}

pub fn draw<S: TaskStore>(frame: &mut Frame, app: &App<S>) {
    let state = app.controller.state();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1), Constraint::Length(3)])
        .split(frame.size());

    let cursor = if app.focus == Focus::Compose && state.edit_session().is_none() { "_" } else { "" };
    let input_style = if cursor.is_empty() { Style::default() } else { Style::default().fg(Color::Cyan) };
    let header = Paragraph::new(format!("New task: {}{}", state.pending_title(), cursor))
        .style(input_style)
        .block(Block::default().borders(Borders::ALL).title("Tasks"));
    frame.render_widget(header, chunks[0]);

    let body = Block::default().borders(Borders::ALL).title(app.api_url.as_str());
    if state.loading() {
        frame.render_widget(Paragraph::new(LOADING_MESSAGE).block(body), chunks[1]);
    } else if state.tasks().is_empty() {
        frame.render_widget(Paragraph::new(EMPTY_MESSAGE).block(body), chunks[1]);
    } else {
        let items: Vec<ListItem> = state.tasks().iter().map(|task| match state.edit_session() {
            Some(session) if session.target == task.id => {
                let mark = |field: DraftField| if app.field == field { ">" } else { " " };
                ListItem::new(Text::from(vec![
                    Line::from(format!("{} title: {}", mark(DraftField::Title), session.draft_title)),
                    Line::from(format!("{} description: {}", mark(DraftField::Description), session.draft_description)),
                ]))
                .style(Style::default().fg(Color::Yellow))
            }
            _ => {
                let check = if task.done { "[x]" } else { "[ ]" };
                ListItem::new(format!("{} {}  {}", check, task.title, task.description))
            }
        }).collect();
        let mut list_state = ListState::default();
        if app.focus == Focus::List { list_state.select(Some(app.selected)); }
        let list = List::new(items)
            .block(body)
            .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED))
            .highlight_symbol(">> ");
        frame.render_stateful_widget(list, chunks[1], &mut list_state);
    }

    let hints = if state.edit_session().is_some() {
        "type to edit, Tab: switch field, Enter: save, Esc: cancel"
    } else if app.focus == Focus::Compose {
        "type a title, Enter: add, Esc: back"
    } else {
        "Space/Enter: toggle, e: edit, d: delete, n: new, q: quit"
    };
    let mut footer_text = format!("{}  |  pending requests: {}", hints, app.controller.in_flight());
    let mut footer_style = Style::default();
    if let Some(err) = state.last_error() {
        footer_text = format!("{}  |  {}", footer_text, err);
        footer_style = footer_style.fg(Color::Red);
    }
    let footer = Paragraph::new(footer_text).style(footer_style).block(Block::default().borders(Borders::ALL).title("status"));
    frame.render_widget(footer, chunks[2]);
}
