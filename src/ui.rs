use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use persona_table::{EntryForm, Field, FormMode, Persona, PersonaStore, SaveOutcome};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use std::io;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Error,
    Info,
}

/// Titled message that blocks other input until dismissed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn error(message: impl Into<String>) -> Self {
        Alert {
            kind: AlertKind::Error,
            title: "ERROR".to_string(),
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Alert {
            kind: AlertKind::Info,
            title: "Info".to_string(),
            message: message.into(),
        }
    }
}

pub struct App {
    pub store: PersonaStore,
    pub state: TableState,
    pub form: Option<EntryForm>,
    pub alert: Option<Alert>,
    pub confirm_delete: Option<Persona>,
}

impl App {
    pub fn new(store: PersonaStore) -> Self {
        let mut state = TableState::default();
        if !store.is_empty() {
            state.select(Some(0));
        }

        Self {
            store,
            state,
            form: None,
            alert: None,
            confirm_delete: None,
        }
    }

    pub fn selected_persona(&self) -> Option<Persona> {
        self.state.selected().and_then(|i| self.store.get(i))
    }

    pub fn open_add(&mut self) {
        self.form = Some(EntryForm::new_add(self.store.clone()));
    }

    pub fn open_edit(&mut self) {
        match self.state.selected().and_then(|i| EntryForm::new_edit(self.store.clone(), i)) {
            Some(form) => self.form = Some(form),
            None => self.alert = Some(Alert::info("Select a persona to edit")),
        }
    }

    pub fn request_delete(&mut self) {
        match self.selected_persona() {
            Some(persona) => {
                debug!(persona = %persona, "delete requested");
                self.confirm_delete = Some(persona);
            }
            None => self.alert = Some(Alert::info("Select a persona to delete")),
        }
    }

    fn delete_confirmed(&mut self) {
        if let Some(persona) = self.confirm_delete.take() {
            if self.store.remove(&persona) {
                info!(persona = %persona, "persona deleted");
            }
            self.clamp_selection();
        }
    }

    fn save_form(&mut self) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        let mode = form.mode();

        let outcome = form.save();
        if let Some(message) = outcome.alert_message() {
            self.alert = Some(Alert::error(message));
        }

        if let SaveOutcome::Saved(_) = outcome {
            self.form = None;
            match mode {
                FormMode::Add => self.state.select(Some(self.store.len() - 1)),
                FormMode::Edit { index } => self.state.select(Some(index)),
            }
            self.clamp_selection();
        }
    }

    fn cancel_form(&mut self) {
        if let Some(form) = self.form.as_mut() {
            form.cancel();
        }
        self.form = None;
    }

    fn clamp_selection(&mut self) {
        let len = self.store.len();
        let selected = match self.state.selected() {
            _ if len == 0 => None,
            Some(i) if i >= len => Some(len - 1),
            Some(i) => Some(i),
            None => Some(0),
        };
        self.state.select(selected);
    }

    pub fn next(&mut self) {
        let len = self.store.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.store.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    /// Route one key press to the topmost layer. Returns true to quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.alert.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.alert = None;
            }
            return false;
        }

        if self.confirm_delete.is_some() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => self.delete_confirmed(),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.confirm_delete = None;
                }
                _ => {}
            }
            return false;
        }

        if self.form.is_some() {
            match key.code {
                KeyCode::Esc => self.cancel_form(),
                KeyCode::Enter => self.save_form(),
                _ => {
                    if let Some(form) = self.form.as_mut() {
                        handle_form_key(form, key);
                    }
                }
            }
            return false;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Char('a') => self.open_add(),
            KeyCode::Char('e') | KeyCode::Enter => self.open_edit(),
            KeyCode::Char('d') | KeyCode::Delete => self.request_delete(),
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::Home => {
                if !self.store.is_empty() {
                    self.state.select(Some(0));
                }
            }
            KeyCode::End => {
                if !self.store.is_empty() {
                    self.state.select(Some(self.store.len() - 1));
                }
            }
            _ => {}
        }
        false
    }
}

fn handle_form_key(form: &mut EntryForm, key: KeyEvent) {
    match key.code {
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_previous(),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            form.insert_char(c)
        }
        _ => {}
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press && app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Table
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);
    render_table(f, chunks[1], app);
    render_status_bar(f, chunks[2], app);

    // Modal layers, bottom to top
    if let Some(form) = &app.form {
        render_form(f, form);
    }
    if let Some(persona) = &app.confirm_delete {
        render_confirm_delete(f, persona);
    }
    if let Some(alert) = &app.alert {
        render_alert(f, alert);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let spans = vec![
        Span::styled(
            "Personas",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Total: {}", app.store.len()),
            Style::default().fg(Color::White),
        ),
    ];

    let header = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Nombre", "Apellido", "Edad"].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows: Vec<Row> = app
        .store
        .get_all()
        .iter()
        .map(|p| {
            Row::new(vec![
                Cell::from(truncate(&p.nombre, 30)),
                Cell::from(truncate(&p.apellido, 30)),
                Cell::from(p.edad.to_string()),
            ])
            .height(1)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(32),
            Constraint::Length(32),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Personas "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
    let total = app.store.len();

    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));
    let status_spans = vec![
        Span::styled(format!(" Row: {}/{} ", selected, total), Style::default().fg(Color::Cyan)),
        Span::raw(" | "),
        key("a"),
        Span::raw(" Add | "),
        key("e"),
        Span::raw(" Edit | "),
        key("d"),
        Span::raw(" Delete | "),
        key("↑/↓"),
        Span::raw(" Nav | "),
        Span::styled("q", Style::default().fg(Color::Red)),
        Span::raw(" Quit"),
    ];

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn render_form(f: &mut Frame, form: &EntryForm) {
    let area = centered_rect(50, 11, f.size());
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(format!(" {} ", form.mode().title()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    const LABEL_WIDTH: u16 = 12;
    for (i, field) in Field::ALL.iter().enumerate() {
        let focused = *field == form.focus();
        let label_style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };

        let label = format!("{}:", field.label());
        let line = Line::from(vec![
            Span::styled(
                format!(" {:<width$}", label, width = LABEL_WIDTH as usize - 1),
                label_style,
            ),
            Span::raw(form.value(*field)),
        ]);
        let row = rows[i * 2];
        f.render_widget(Paragraph::new(line), row);

        if focused {
            let x = row.x + LABEL_WIDTH + form.value(*field).chars().count() as u16;
            f.set_cursor(x.min(row.right().saturating_sub(1)), row.y);
        }
    }

    let hint = Line::from(vec![
        Span::styled(" Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" Guardar  "),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::raw(" Cancelar  "),
        Span::styled("Tab", Style::default().fg(Color::Yellow)),
        Span::raw(" Campo"),
    ]);
    f.render_widget(Paragraph::new(hint), rows[6]);
}

fn render_confirm_delete(f: &mut Frame, persona: &Persona) {
    let area = centered_rect(50, 5, f.size());
    f.render_widget(Clear, area);

    let content = vec![
        Line::from(format!(" Delete {}?", persona)),
        Line::from(vec![
            Span::styled(" y", Style::default().fg(Color::Red)),
            Span::raw(" Delete  "),
            Span::styled("n", Style::default().fg(Color::Yellow)),
            Span::raw(" Keep"),
        ]),
    ];

    let dialog = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(" Confirm "),
    );
    f.render_widget(dialog, area);
}

fn render_alert(f: &mut Frame, alert: &Alert) {
    let height = alert.message.lines().count() as u16 + 4;
    let area = centered_rect(50, height, f.size());
    f.render_widget(Clear, area);

    let color = match alert.kind {
        AlertKind::Error => Color::Red,
        AlertKind::Info => Color::Cyan,
    };

    let mut content: Vec<Line> = alert
        .message
        .lines()
        .map(|l| Line::from(format!(" {}", l)))
        .collect();
    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        " Press Enter to close",
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    )));

    let paragraph = Paragraph::new(content)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(format!(" {} ", alert.title)),
        );
    f.render_widget(paragraph, area);
}

/// Rect of `percent_x` width and fixed `height`, centered in `r`
fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let height = height.min(r.height);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len - 3).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_add_persona_through_dialog() {
        let store = PersonaStore::new();
        let mut app = App::new(store.clone());

        press(&mut app, KeyCode::Char('a'));
        assert!(app.form.is_some());
        type_text(&mut app, "Ana");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Li");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "30");
        press(&mut app, KeyCode::Enter);

        assert!(app.form.is_none());
        assert!(app.alert.is_none());
        assert_eq!(&*store.get_all(), &[Persona::new("Ana", "Li", 30)]);
        assert_eq!(app.state.selected(), Some(0));
    }

    #[test]
    fn test_invalid_save_shows_alert_and_keeps_dialog() {
        let mut app = App::new(PersonaStore::new());

        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Li");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "x");
        press(&mut app, KeyCode::Enter);

        let alert = app.alert.clone().unwrap();
        assert_eq!(alert.title, "ERROR");
        assert_eq!(alert.message, "Nombre required\nEdad not a valid number");

        // keys go to the alert until it is dismissed
        type_text(&mut app, "zz");
        assert_eq!(app.form.as_ref().unwrap().value(Field::Edad), "x");
        press(&mut app, KeyCode::Enter);
        assert!(app.alert.is_none());
        assert!(app.form.is_some());
    }

    #[test]
    fn test_duplicate_save_clears_form() {
        let store = PersonaStore::from_personas(vec![Persona::new("Ana", "Li", 30)]);
        let mut app = App::new(store.clone());

        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Ana");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Li");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "30");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.alert.as_ref().map(|a| a.message.as_str()), Some("Persona already exists"));
        assert_eq!(app.form.as_ref().unwrap().value(Field::Nombre), "");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_cancel_closes_without_saving() {
        let store = PersonaStore::new();
        let mut app = App::new(store.clone());

        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Ana");
        assert!(!press(&mut app, KeyCode::Esc));

        assert!(app.form.is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_edit_selected_row() {
        let store = PersonaStore::from_personas(vec![
            Persona::new("Ana", "Li", 30),
            Persona::new("Bo", "Ng", 4),
        ]);
        let mut app = App::new(store.clone());

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::Backspace);
        type_text(&mut app, "5");
        press(&mut app, KeyCode::Enter);

        assert!(app.form.is_none());
        assert_eq!(store.get(1), Some(Persona::new("Bo", "Ng", 5)));
        assert_eq!(app.state.selected(), Some(1));
    }

    #[test]
    fn test_delete_requires_selection() {
        let mut app = App::new(PersonaStore::new());

        press(&mut app, KeyCode::Char('d'));
        let alert = app.alert.clone().unwrap();
        assert_eq!(alert.kind, AlertKind::Info);
        assert!(app.confirm_delete.is_none());
    }

    #[test]
    fn test_delete_with_confirmation() {
        let store = PersonaStore::from_personas(vec![
            Persona::new("Ana", "Li", 30),
            Persona::new("Bo", "Ng", 4),
        ]);
        let mut app = App::new(store.clone());

        press(&mut app, KeyCode::End);
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(store.len(), 2);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(&*store.get_all(), &[Persona::new("Ana", "Li", 30)]);
        assert_eq!(app.state.selected(), Some(0));

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert!(store.is_empty());
        assert_eq!(app.state.selected(), None);
    }

    #[test]
    fn test_navigation_wraps_and_quit() {
        let store = PersonaStore::from_personas(vec![
            Persona::new("Ana", "Li", 30),
            Persona::new("Bo", "Ng", 4),
        ]);
        let mut app = App::new(store);

        press(&mut app, KeyCode::Up);
        assert_eq!(app.state.selected(), Some(1));
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.state.selected(), Some(0));

        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn test_render_table_and_dialog() {
        let store = PersonaStore::from_personas(vec![Persona::new("Ana", "Li", 30)]);
        let mut app = App::new(store);

        let main = screen(&mut app);
        assert!(main.contains("Nombre"));
        assert!(main.contains("Ana"));

        press(&mut app, KeyCode::Char('a'));
        assert!(screen(&mut app).contains("Nueva Persona"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
    }
}
