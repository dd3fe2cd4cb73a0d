//! Main application logic for the terminal user interface.
//!
//! The home screen shows the "Add New Task" form beside the task list. Edit,
//! navigation, help and delete confirmation are overlays on top of it. Every
//! user action is a direct call on the owned `TaskStore`.

use std::io;
use std::time::Duration;

use chrono::{Local, NaiveDate, Utc};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};

use crate::config::Config;
use crate::error::FormError;
use crate::fields::*;
use crate::nav::{self, NavEntry};
use crate::persist::KeyValueStore;
use crate::store::TaskStore;
use crate::task::{Task, TaskId};
use crate::tui::{
    colors::{priority_color, status_color, DARK_RED, GREEN, RED, SLATE},
    enums::{AppState, Focus},
    input::InputField,
    task_form::{TaskForm, CATEGORY_FIELD, DESCRIPTION_FIELD, DUE_FIELD, PRIORITY_FIELD, TITLE_FIELD},
    utils::centered_rect,
};
use crate::view::*;

/// Main application state for the terminal user interface.
pub struct App<S> {
    state: AppState,
    focus: Focus,
    store: TaskStore<S>,
    list_state: ListState,
    visible: Vec<TaskId>,
    selected_task: Option<TaskId>,
    task_form: TaskForm,
    edit_form: TaskForm,
    nav_entries: Vec<NavEntry>,
    nav_state: ListState,
    status_message: String,
    show_completed: bool,
    sort: SortKey,
    filter_text: String,
    filter_active: bool,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(store: TaskStore<S>, config: &Config) -> Self {
        let mut app = App {
            state: AppState::Home,
            focus: if store.is_empty() { Focus::Form } else { Focus::List },
            store,
            list_state: ListState::default(),
            visible: Vec::new(),
            selected_task: None,
            task_form: TaskForm::new(),
            edit_form: TaskForm::new(),
            nav_entries: nav::entries(),
            nav_state: ListState::default(),
            status_message: String::new(),
            show_completed: config.display.show_completed,
            sort: config.display.sort,
            filter_text: String::new(),
            filter_active: false,
        };
        app.update_visible();
        app
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    /// Recompute the visible rows, keeping the selection on the same task
    /// when it is still shown.
    fn update_visible(&mut self) {
        let filter = TaskFilter {
            hide_completed: !self.show_completed,
            text: Some(self.filter_text.clone()),
            ..TaskFilter::default()
        };
        self.visible = visible_tasks(self.store.tasks(), &filter, self.sort, Self::today())
            .iter()
            .map(|t| t.id)
            .collect();

        let keep = self
            .selected_task
            .and_then(|id| self.visible.iter().position(|&v| v == id));
        match keep {
            Some(i) => self.list_state.select(Some(i)),
            None if self.visible.is_empty() => {
                self.list_state.select(None);
                self.selected_task = None;
            }
            None => {
                let i = self.list_state.selected().unwrap_or(0).min(self.visible.len() - 1);
                self.list_state.select(Some(i));
                self.selected_task = Some(self.visible[i]);
            }
        }
    }

    fn select_index(&mut self, i: usize) {
        if let Some(&id) = self.visible.get(i) {
            self.list_state.select(Some(i));
            self.selected_task = Some(id);
        }
    }

    fn get_selected_task(&self) -> Option<&Task> {
        self.selected_task.and_then(|id| self.store.get(id))
    }

    fn set_status_message(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    /// Report a store result in the status bar.
    fn report(&mut self, result: Result<bool, crate::error::StoreError>, done: &str) {
        match result {
            Ok(true) => self.set_status_message(done),
            Ok(false) => self.set_status_message("Task no longer exists"),
            Err(e) => self.set_status_message(format!("Error: {e}")),
        }
        self.update_visible();
    }

    /// Handle one key press. Returns true when the app should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }
        self.status_message.clear();
        match self.state {
            AppState::Home => match self.focus {
                Focus::Form => {
                    self.handle_form_input(key);
                    false
                }
                Focus::List => self.handle_list_input(key),
            },
            AppState::EditTask => {
                self.handle_edit_input(key);
                false
            }
            AppState::Nav => {
                self.handle_nav_input(key);
                false
            }
            AppState::Help => {
                self.state = AppState::Home;
                false
            }
            AppState::Confirm => {
                self.handle_confirm_input(key);
                false
            }
        }
    }

    fn handle_list_input(&mut self, key: KeyEvent) -> bool {
        if self.filter_active {
            match key.code {
                KeyCode::Esc => {
                    self.filter_active = false;
                    self.filter_text.clear();
                    self.update_visible();
                }
                KeyCode::Enter => {
                    self.filter_active = false;
                    if !self.filter_text.is_empty() {
                        self.set_status_message(format!(
                            "Filter applied: '{}' ({} tasks)",
                            self.filter_text,
                            self.visible.len()
                        ));
                    }
                }
                KeyCode::Backspace => {
                    self.filter_text.pop();
                    self.update_visible();
                }
                KeyCode::Char(c) => {
                    self.filter_text.push(c);
                    self.update_visible();
                }
                _ => {}
            }
            return false;
        }

        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Esc => {
                if self.filter_text.is_empty() {
                    return true;
                }
                self.filter_text.clear();
                self.update_visible();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let i = self.list_state.selected().unwrap_or(0);
                self.select_index(i.saturating_sub(1));
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let i = self.list_state.selected().map_or(0, |i| i + 1);
                self.select_index(i);
            }
            KeyCode::Home => self.select_index(0),
            KeyCode::End => self.select_index(self.visible.len().saturating_sub(1)),
            KeyCode::Tab | KeyCode::Char('a') | KeyCode::Char('n') => {
                self.focus = Focus::Form;
            }
            KeyCode::Char(' ') | KeyCode::Char('x') => {
                if let Some(id) = self.selected_task {
                    let result = self.store.toggle_completed(id);
                    self.report(result, "Status toggled");
                }
            }
            KeyCode::Char('c') => self.change_status(Status::Completed, "Marked complete"),
            KeyCode::Char('r') => self.change_status(Status::Pending, "Task reopened"),
            KeyCode::Char('s') => self.change_status(Status::InProgress, "Task started"),
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(task) = self.get_selected_task() {
                    self.edit_form = TaskForm::from_task(task);
                    self.state = AppState::EditTask;
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if self.selected_task.is_some() {
                    self.state = AppState::Confirm;
                }
            }
            KeyCode::Char('m') => {
                self.nav_state.select(Some(0));
                self.state = AppState::Nav;
            }
            KeyCode::Char('/') => {
                self.filter_active = true;
            }
            KeyCode::Char('v') => {
                self.show_completed = !self.show_completed;
                self.update_visible();
                self.set_status_message(if self.show_completed {
                    "Showing completed tasks"
                } else {
                    "Hiding completed tasks"
                });
            }
            KeyCode::Char('o') => {
                self.sort = match self.sort {
                    SortKey::Created => SortKey::Due,
                    SortKey::Due => SortKey::Priority,
                    SortKey::Priority => SortKey::Created,
                };
                self.update_visible();
                self.set_status_message(format!("Sorted by {:?}", self.sort).to_lowercase());
            }
            KeyCode::Char('h') | KeyCode::Char('?') => self.state = AppState::Help,
            _ => {}
        }
        false
    }

    fn change_status(&mut self, status: Status, done: &str) {
        if let Some(id) = self.selected_task {
            let result = self.store.set_status(id, status);
            self.report(result, done);
        }
    }

    /// Keys shared by the add form and the edit overlay. Returns true when
    /// the key was consumed.
    fn edit_keys(form: &mut TaskForm, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            KeyCode::Left => form.handle_left_right(false),
            KeyCode::Right => form.handle_left_right(true),
            KeyCode::Home => form.handle_home_end(false),
            KeyCode::End => form.handle_home_end(true),
            KeyCode::Backspace => form.handle_backspace(),
            KeyCode::Delete => form.handle_delete(),
            KeyCode::Char(_) if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => return false,
            KeyCode::Char(c) => form.handle_char(c),
            _ => return false,
        }
        true
    }

    fn handle_form_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.focus = Focus::List,
            // Plain Enter and Ctrl+Enter both submit.
            KeyCode::Enter => match self.task_form.submit(&mut self.store, Self::today()) {
                Ok(task) => {
                    self.selected_task = Some(task.id);
                    self.list_state.select(Some(0));
                    self.update_visible();
                    self.set_status_message("Task created");
                }
                Err(e) => self.set_status_message(e.to_string()),
            },
            _ => {
                Self::edit_keys(&mut self.task_form, key);
            }
        }
    }

    fn handle_edit_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.state = AppState::Home;
                self.set_status_message("Edit cancelled");
            }
            KeyCode::Enter => {
                let Some(id) = self.selected_task else {
                    self.state = AppState::Home;
                    return;
                };
                match self.edit_form.save_edit(&mut self.store, id, Self::today()) {
                    Ok(()) => {
                        self.state = AppState::Home;
                        self.update_visible();
                        self.set_status_message("Task updated");
                    }
                    Err(FormError::MissingTask(_)) => {
                        self.state = AppState::Home;
                        self.update_visible();
                        self.set_status_message("Task no longer exists");
                    }
                    Err(e) => self.set_status_message(e.to_string()),
                }
            }
            _ => {
                Self::edit_keys(&mut self.edit_form, key);
            }
        }
    }

    fn handle_nav_input(&mut self, key: KeyEvent) {
        let len = self.nav_entries.len();
        match key.code {
            KeyCode::Esc | KeyCode::Char('m') | KeyCode::Char('q') => self.state = AppState::Home,
            KeyCode::Up | KeyCode::Char('k') => {
                let i = self.nav_state.selected().unwrap_or(0);
                self.nav_state.select(Some(i.saturating_sub(1)));
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let i = self.nav_state.selected().map_or(0, |i| (i + 1).min(len - 1));
                self.nav_state.select(Some(i));
            }
            KeyCode::Enter => {
                let entry = self.nav_state.selected().and_then(|i| self.nav_entries.get(i)).copied();
                match entry {
                    Some(NavEntry::Page(route)) if route.is_wired() => {
                        self.state = AppState::Home;
                        self.focus = Focus::List;
                    }
                    Some(NavEntry::Page(route)) => {
                        self.set_status_message(format!("{} ({}) is not available yet", route.label(), route.path()));
                    }
                    Some(NavEntry::Link(link)) => {
                        self.set_status_message(format!("{}: {}", link.label, link.href));
                    }
                    None => {}
                }
            }
            _ => {}
        }
    }

    fn handle_confirm_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                if let Some(id) = self.selected_task {
                    let result = self.store.remove(id);
                    self.report(result, "Task deleted");
                }
                self.state = AppState::Home;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.state = AppState::Home;
            }
            _ => {}
        }
    }

    /// Render the "Add New Task" form (or the edit form) into `area`.
    fn render_form(f: &mut Frame, area: Rect, form: &TaskForm, title: &str, focused: bool, today: NaiveDate) {
        let border = if focused { Style::default().fg(Color::Cyan) } else { Style::default() };
        let block = Block::default().borders(Borders::ALL).title(title).border_style(border);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // title
                Constraint::Length(5), // description
                Constraint::Length(3), // priority
                Constraint::Length(3), // due
                Constraint::Length(3), // category
                Constraint::Length(1), // submit
                Constraint::Min(0),    // tip
            ])
            .split(inner);

        let field_block = |label: String, idx: usize| {
            let style = if focused && form.current_field == idx {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            Block::default().borders(Borders::ALL).title(label).border_style(style)
        };

        f.render_widget(
            Paragraph::new(form.title.value.as_str()).block(field_block("Task Title *".into(), TITLE_FIELD)),
            rows[0],
        );
        f.render_widget(
            Paragraph::new(form.description.value.as_str())
                .block(field_block("Description".into(), DESCRIPTION_FIELD))
                .wrap(Wrap { trim: false }),
            rows[1],
        );

        let p = form.selected_priority();
        let priority = Line::from(vec![
            Span::raw("< "),
            Span::styled(format!("{} Priority", priority_label(p)), Style::default().fg(priority_color(p))),
            Span::raw(" >"),
        ]);
        f.render_widget(Paragraph::new(priority).block(field_block("Priority".into(), PRIORITY_FIELD)), rows[2]);

        let due_title = format!("Due Date (from {})", TaskForm::min_due_date(today));
        f.render_widget(
            Paragraph::new(form.due.value.as_str()).block(field_block(due_title, DUE_FIELD)),
            rows[3],
        );

        let category = format!("< {} >", form.selected_category().unwrap_or("Select Category"));
        f.render_widget(Paragraph::new(category).block(field_block("Category".into(), CATEGORY_FIELD)), rows[4]);

        if focused {
            let cursor = match form.current_field {
                TITLE_FIELD => Some((rows[0], &form.title)),
                DESCRIPTION_FIELD => Some((rows[1], &form.description)),
                DUE_FIELD => Some((rows[3], &form.due)),
                _ => None,
            };
            if let Some((area, input)) = cursor {
                Self::place_cursor(f, area, input);
            }
        }

        let button_style = if form.can_submit() {
            Style::default().fg(Color::White).bg(Color::Blue).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        f.render_widget(
            Paragraph::new(Span::styled("[ Enter: Save ]", button_style)).alignment(Alignment::Center),
            rows[5],
        );

        let mut tip = vec![Span::styled("Tip: ", Style::default().add_modifier(Modifier::BOLD))];
        tip.push(Span::raw("Tab moves between fields, \u{2190}/\u{2192} change a choice"));
        let mut lines = vec![Line::from(tip)];
        if let Some(preview) = form.due_preview(today) {
            lines.push(Line::from(preview));
        } else if !form.due.value.trim().is_empty() {
            lines.push(Line::from(Span::styled("Unrecognised date", Style::default().fg(RED))));
        }
        f.render_widget(Paragraph::new(lines).style(Style::default().fg(SLATE)).wrap(Wrap { trim: true }), rows[6]);
    }

    fn place_cursor(f: &mut Frame, area: Rect, input: &InputField) {
        let x = area.x.saturating_add(1).saturating_add(input.cursor.min(u16::MAX as usize) as u16);
        f.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
    }

    /// The card for one task: badges, title, description and time footer.
    fn task_item(task: &Task, today: NaiveDate, now: chrono::DateTime<Utc>) -> ListItem<'static> {
        let completed = task.status.is_completed();
        let overdue = is_overdue(task, today);
        let badge = |text: String, color: Color| Span::styled(format!(" {text} "), Style::default().fg(Color::Black).bg(color));

        let mut header = vec![
            Span::raw(if completed { "[x] " } else { "[ ] " }),
            badge(status_label(task.status).to_string(), status_color(task.status)),
            Span::raw(" "),
            badge(priority_label(task.priority).to_string(), priority_color(task.priority)),
        ];
        if !task.category.is_empty() {
            header.push(Span::raw(" "));
            header.push(badge(task.category.clone(), Color::Gray));
        }
        if overdue {
            header.insert(0, Span::styled("\u{258c}", Style::default().fg(RED)));
        }

        let title_style = if completed {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        let mut lines = vec![Line::from(header), Line::from(Span::styled(task.title.clone(), title_style))];
        for line in task.description.lines().take(2) {
            lines.push(Line::from(Span::styled(line.to_string(), Style::default().fg(SLATE))));
        }

        let mut footer = vec![Span::styled(relative_time(task.created_at, now), Style::default().fg(SLATE))];
        if let Some(label) = due_label(task, today) {
            let style = if overdue {
                Style::default().fg(RED).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(SLATE)
            };
            footer.push(Span::raw("  "));
            footer.push(Span::styled(label, style));
        }
        if let Some(done) = task.completed_at {
            footer.push(Span::raw("  "));
            footer.push(Span::styled(format!("Completed {}", relative_time(done, now)), Style::default().fg(GREEN)));
        }
        lines.push(Line::from(footer));
        lines.push(Line::from(""));
        ListItem::new(lines)
    }

    fn render_task_list(&mut self, f: &mut Frame, area: Rect) {
        let today = Self::today();
        let now = Utc::now();
        let border = if self.focus == Focus::List && self.state == AppState::Home {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        let title = format!("Tasks ({}/{})", self.visible.len(), self.store.len());
        let block = Block::default().borders(Borders::ALL).title(title).border_style(border);

        if self.visible.is_empty() {
            let (heading, hint) = if self.store.is_empty() {
                ("No tasks yet", "Add a task to get started")
            } else {
                ("Nothing to show", "Press 'v' to show completed or Esc to clear the filter")
            };
            let text = vec![
                Line::from(""),
                Line::from(Span::styled(heading, Style::default().add_modifier(Modifier::BOLD))),
                Line::from(Span::styled(hint, Style::default().fg(SLATE))),
            ];
            f.render_widget(Paragraph::new(text).block(block).alignment(Alignment::Center), area);
            return;
        }

        let items: Vec<ListItem> = self
            .visible
            .iter()
            .filter_map(|&id| self.store.get(id))
            .map(|t| Self::task_item(t, today, now))
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(Color::Rgb(40, 40, 48)))
            .highlight_symbol("> ");
        f.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn render_nav(&mut self, f: &mut Frame, area: Rect) {
        let area = centered_rect(50, 70, area);
        f.render_widget(Clear, area);
        let items: Vec<ListItem> = self
            .nav_entries
            .iter()
            .map(|e| {
                let (style, detail) = match e {
                    NavEntry::Page(r) if r.is_wired() => (Style::default().add_modifier(Modifier::BOLD), r.path()),
                    NavEntry::Page(r) => (Style::default().fg(SLATE), r.path()),
                    NavEntry::Link(l) => (Style::default().fg(Color::Cyan), l.href),
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:<10}", e.label()), style),
                    Span::styled(detail, Style::default().fg(SLATE)),
                ]))
            })
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Menu (Esc to close)"))
            .highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol("> ");
        f.render_stateful_widget(list, area, &mut self.nav_state);
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let area = centered_rect(60, 80, area);
        f.render_widget(Clear, area);
        let rows = [
            ("Tab / a", "Focus the add form"),
            ("Esc", "Back to the list (quit from the list)"),
            ("Enter", "Add task (form) / edit task (list)"),
            ("Space / x", "Toggle completed"),
            ("c / r / s", "Complete / reopen / start"),
            ("d", "Delete task"),
            ("/", "Search titles and descriptions"),
            ("v", "Show or hide completed tasks"),
            ("o", "Cycle sort: created, due, priority"),
            ("m", "Menu"),
            ("q / Ctrl+C", "Quit"),
        ];
        let lines: Vec<Line> = rows
            .iter()
            .map(|(k, d)| {
                Line::from(vec![
                    Span::styled(format!("{k:<12}"), Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw(*d),
                ])
            })
            .collect();
        f.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Help (any key to close)")),
            area,
        );
    }

    fn render_confirm(&self, f: &mut Frame, area: Rect) {
        let title = self.get_selected_task().map(|t| t.title.clone()).unwrap_or_default();
        let area = centered_rect(50, 20, area);
        f.render_widget(Clear, area);
        let text = vec![
            Line::from(""),
            Line::from(Span::styled("Delete this task?", Style::default().add_modifier(Modifier::BOLD))),
            Line::from(truncate(&title, 40)),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];
        let paragraph = Paragraph::new(text)
            .block(Block::default().title("Confirm").borders(Borders::ALL).style(Style::default().bg(DARK_RED)))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else if self.filter_active {
            format!("Search: {} (Esc to clear, Enter to confirm)", self.filter_text)
        } else {
            match (self.state, self.focus) {
                (AppState::EditTask, _) => "Edit Task | Enter save | Esc cancel".to_string(),
                (AppState::Nav, _) => "Menu | Enter open | Esc close".to_string(),
                (AppState::Confirm, _) => "Confirm delete".to_string(),
                (AppState::Help, _) => "Help".to_string(),
                (AppState::Home, Focus::Form) => "Add New Task | Enter add | Esc list".to_string(),
                (AppState::Home, Focus::List) => {
                    let filter = if self.filter_text.is_empty() {
                        String::new()
                    } else {
                        format!(" (filtered by '{}')", self.filter_text)
                    };
                    format!("Tasks: {}{} | Press 'h' for help, 'm' for menu", self.visible.len(), filter)
                }
            }
        };
        f.render_widget(
            Paragraph::new(text).style(Style::default().bg(Color::Blue).fg(Color::White)),
            area,
        );
    }

    /// Main render function that lays out the home screen and any overlay.
    pub fn render(&mut self, f: &mut Frame) {
        let today = Self::today();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)])
            .split(f.area());

        let header = Line::from(vec![
            Span::styled("TASKDECK", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled("Organize your work and life with clear tasks", Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC)),
        ]);
        f.render_widget(Paragraph::new(header).alignment(Alignment::Center), chunks[0]);

        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[1]);
        let form_focused = self.state == AppState::Home && self.focus == Focus::Form;
        Self::render_form(f, panes[0], &self.task_form, "Add New Task", form_focused, today);
        self.render_task_list(f, panes[1]);

        match self.state {
            AppState::Home => {}
            AppState::EditTask => {
                let area = centered_rect(60, 80, chunks[1]);
                f.render_widget(Clear, area);
                Self::render_form(f, area, &self.edit_form, "Edit Task", true, today);
            }
            AppState::Nav => self.render_nav(f, chunks[1]),
            AppState::Help => self.render_help(f, chunks[1]),
            AppState::Confirm => self.render_confirm(f, chunks[1]),
        }

        self.render_status_bar(f, chunks[2]);
    }

    /// Main event loop for the TUI application.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if event::poll(Duration::from_millis(250))? {
                if let Event::Key(key) = event::read()? {
                    if self.handle_key(key) {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}
