use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;
use std::path::{Path, PathBuf};

use expense_tracker::codec::{self, LoadReport};
use expense_tracker::config::AppConfig;
use expense_tracker::form::{AddTransactionForm, FormField, PeriodField, PeriodPicker};
use expense_tracker::store::RecordStore;
use expense_tracker::summary;
use expense_tracker::transaction::{Period, TransactionType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    Load,
    Save,
}

impl FileAction {
    pub fn title(&self) -> &'static str {
        match self {
            FileAction::Load => " Load From File ",
            FileAction::Save => " Save To File ",
        }
    }
}

/// The modal currently drawn over the ledger, if any
#[derive(Debug, Clone)]
pub enum Dialog {
    None,
    AddTransaction(AddTransactionForm),
    PathPrompt { action: FileAction, input: String },
    Summary { picker: PeriodPicker, field: PeriodField },
    Message { text: String, success: bool },
}

pub struct App {
    pub store: RecordStore,
    pub config: AppConfig,
    pub state: TableState,
    pub dialog: Dialog,
    pub should_quit: bool,
}

impl App {
    pub fn new(store: RecordStore, config: AppConfig) -> Self {
        let mut state = TableState::default();
        if !store.is_empty() {
            state.select(Some(0));
        }

        Self {
            store,
            config,
            state,
            dialog: Dialog::None,
            should_quit: false,
        }
    }

    // ========================================================================
    // ACTIONS
    // ========================================================================

    pub fn open_add_form(&mut self) {
        self.dialog = Dialog::AddTransaction(AddTransactionForm::new(
            Period::current(),
            self.config.years.clone(),
        ));
    }

    pub fn open_path_prompt(&mut self, action: FileAction) {
        self.dialog = Dialog::PathPrompt {
            action,
            input: self.config.default_data_file.display().to_string(),
        };
    }

    pub fn open_summary(&mut self) {
        self.dialog = Dialog::Summary {
            picker: PeriodPicker::new(Period::current(), self.config.years.clone()),
            field: PeriodField::Year,
        };
    }

    fn show_message(&mut self, text: impl Into<String>, success: bool) {
        self.dialog = Dialog::Message {
            text: text.into(),
            success,
        };
    }

    pub fn submit_form(&mut self, form: &AddTransactionForm) {
        match form.submit() {
            Ok(tx) => {
                tracing::info!(
                    kind = %tx.kind,
                    category = %tx.category,
                    amount = tx.amount,
                    date = %tx.date,
                    "Transaction added"
                );
                self.store.add(tx);
                self.state.select(Some(self.store.len() - 1));
                self.show_message("Transaction added successfully!", true);
            }
            Err(err) => {
                tracing::warn!("Rejected transaction: {err}");
                self.show_message("Invalid amount format!", false);
            }
        }
    }

    pub fn load_from(&mut self, path: &Path) {
        match codec::load_file(&mut self.store, path) {
            Ok(LoadReport { skipped, .. }) => {
                if self.state.selected().is_none() && !self.store.is_empty() {
                    self.state.select(Some(0));
                }
                let mut text = format!("Transactions loaded successfully from {}", file_name(path));
                if skipped > 0 {
                    text.push_str(&format!(" ({} malformed lines skipped)", skipped));
                }
                self.show_message(text, true);
            }
            Err(err) => {
                tracing::error!("{err:#}");
                self.show_message("Error reading file!", false);
            }
        }
    }

    pub fn save_to(&mut self, path: &Path) {
        match codec::save_file(&self.store, path) {
            Ok(_) => {
                let text = format!("Transactions saved successfully to {}", file_name(path));
                self.show_message(text, true);
            }
            Err(err) => {
                tracing::error!("{err:#}");
                self.show_message("Error writing to file!", false);
            }
        }
    }

    pub fn show_summary(&mut self, period: Period) {
        let report = summary::aggregate(&self.store, period);
        tracing::info!(
            period = %period,
            income = report.total_income,
            expense = report.total_expense,
            "Monthly summary"
        );
        self.show_message(report.message(), true);
    }

    // ========================================================================
    // NAVIGATION
    // ========================================================================

    pub fn next(&mut self) {
        let len = self.store.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
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
            Some(0) => len - 1,
            Some(i) => i - 1,
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.store.len();
        if len == 0 {
            return;
        }
        let i = self.state.selected().map_or(0, |i| (i + 20).min(len - 1));
        self.state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        if self.store.is_empty() {
            return;
        }
        let i = self.state.selected().map_or(0, |i| i.saturating_sub(20));
        self.state.select(Some(i));
    }

    // ========================================================================
    // KEY HANDLING
    // ========================================================================

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        let dialog = std::mem::replace(&mut self.dialog, Dialog::None);

        match dialog {
            Dialog::None => self.handle_ledger_key(key),
            Dialog::Message { .. } => {}
            Dialog::AddTransaction(form) => self.handle_form_key(form, key),
            Dialog::PathPrompt { action, input } => self.handle_prompt_key(action, input, key),
            Dialog::Summary { picker, field } => self.handle_summary_key(picker, field, key),
        }
    }

    fn handle_ledger_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('a') => self.open_add_form(),
            KeyCode::Char('l') => self.open_path_prompt(FileAction::Load),
            KeyCode::Char('s') => self.open_path_prompt(FileAction::Save),
            KeyCode::Char('m') => self.open_summary(),
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::PageDown => self.page_down(),
            KeyCode::PageUp => self.page_up(),
            KeyCode::Home if !self.store.is_empty() => self.state.select(Some(0)),
            KeyCode::End if !self.store.is_empty() => {
                self.state.select(Some(self.store.len() - 1))
            }
            _ => {}
        }
    }

    fn handle_form_key(&mut self, mut form: AddTransactionForm, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => return,
            KeyCode::Enter => {
                self.submit_form(&form);
                return;
            }
            KeyCode::Tab => form.next_field(),
            KeyCode::BackTab => form.previous_field(),
            KeyCode::Up | KeyCode::Right => form.increment(),
            KeyCode::Down | KeyCode::Left => form.decrement(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                form.push_char(c)
            }
            _ => {}
        }
        self.dialog = Dialog::AddTransaction(form);
    }

    fn handle_prompt_key(&mut self, action: FileAction, mut input: String, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => return,
            KeyCode::Enter => {
                let path = PathBuf::from(&input);
                match action {
                    FileAction::Load => self.load_from(&path),
                    FileAction::Save => self.save_to(&path),
                }
                return;
            }
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => input.push(c),
            _ => {}
        }
        self.dialog = Dialog::PathPrompt { action, input };
    }

    fn handle_summary_key(&mut self, mut picker: PeriodPicker, mut field: PeriodField, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => return,
            KeyCode::Enter => {
                self.show_summary(picker.period());
                return;
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
                field = match field {
                    PeriodField::Year => PeriodField::Month,
                    PeriodField::Month => PeriodField::Year,
                };
            }
            KeyCode::Up => picker.increment(field),
            KeyCode::Down => picker.decrement(field),
            _ => {}
        }
        self.dialog = Dialog::Summary { picker, field };
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ============================================================================
// TERMINAL LOOP
// ============================================================================

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

    if let Err(err) = res {
        tracing::error!("UI loop failed: {err}");
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    while !app.should_quit {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key);
            }
        }
    }
    Ok(())
}

// ============================================================================
// RENDERING
// ============================================================================

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Toolbar
            Constraint::Min(0),    // Ledger
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);
    render_table(f, chunks[1], app);
    render_status_bar(f, chunks[2], app);

    match &app.dialog {
        Dialog::None => {}
        Dialog::AddTransaction(form) => render_add_form(f, form),
        Dialog::PathPrompt { action, input } => render_path_prompt(f, *action, input),
        Dialog::Summary { picker, field } => render_summary_picker(f, picker, *field),
        Dialog::Message { text, success } => render_message(f, text, *success),
    }
}

fn key_span(key: &str) -> Span<'_> {
    Span::styled(key, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let (income, expense) = app.store.iter().fold((0usize, 0usize), |(i, e), tx| {
        if TransactionType::Income.matches(&tx.kind) {
            (i + 1, e)
        } else if TransactionType::Expense.matches(&tx.kind) {
            (i, e + 1)
        } else {
            (i, e)
        }
    });

    let spans = vec![
        Span::styled(
            "Expense Tracker",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  │  "),
        key_span("a"),
        Span::raw(" Add Transaction  "),
        key_span("l"),
        Span::raw(" Load From File  "),
        key_span("s"),
        Span::raw(" Save To File  "),
        key_span("m"),
        Span::raw(" View Summary  "),
        key_span("q"),
        Span::raw(" Exit"),
        Span::raw("  │  "),
        Span::styled(
            format!("Total: {}", app.store.len()),
            Style::default().fg(Color::White),
        ),
        Span::raw("  "),
        Span::styled(format!("↑ {}", income), Style::default().fg(Color::Green)),
        Span::raw("  "),
        Span::styled(format!("↓ {}", expense), Style::default().fg(Color::Red)),
    ];

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn type_color(kind: &str) -> Color {
    if TransactionType::Income.matches(kind) {
        Color::Green
    } else if TransactionType::Expense.matches(kind) {
        Color::Red
    } else {
        Color::White
    }
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Type", "Category", "Amount", "Date"].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.store.iter().map(|tx| {
        let color = type_color(&tx.kind);
        Row::new(vec![
            Cell::from(tx.kind.clone()).style(Style::default().fg(color)),
            Cell::from(truncate(&tx.category, 24)),
            Cell::from(format!("{:.2}", tx.amount)).style(Style::default().fg(color)),
            Cell::from(tx.date.clone()),
        ])
        .height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(26),
            Constraint::Length(16),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Transactions "),
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

    let hints: Vec<Span> = match app.dialog {
        Dialog::None => vec![
            key_span("↑/↓"),
            Span::raw(" Nav | "),
            key_span("PgUp/PgDn"),
            Span::raw(" Fast | "),
            key_span("Home/End"),
            Span::raw(" Jump"),
        ],
        Dialog::AddTransaction(_) => vec![
            key_span("Tab"),
            Span::raw(" Field | "),
            key_span("↑/↓"),
            Span::raw(" Change | "),
            key_span("Enter"),
            Span::raw(" OK | "),
            key_span("Esc"),
            Span::raw(" Cancel"),
        ],
        Dialog::PathPrompt { .. } => vec![
            key_span("Enter"),
            Span::raw(" OK | "),
            key_span("Esc"),
            Span::raw(" Cancel"),
        ],
        Dialog::Summary { .. } => vec![
            key_span("←/→"),
            Span::raw(" Field | "),
            key_span("↑/↓"),
            Span::raw(" Change | "),
            key_span("Enter"),
            Span::raw(" OK | "),
            key_span("Esc"),
            Span::raw(" Cancel"),
        ],
        Dialog::Message { .. } => vec![Span::raw("Press any key to close")],
    };

    let mut spans = vec![
        Span::styled(
            format!(" Row: {}/{} ", selected, app.store.len()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(" | "),
    ];
    spans.extend(hints);

    let status_bar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

/// Rectangle of `width` x `height` cells centred in `area`
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn field_line<'a>(label: &'a str, value: String, focused: bool, spinner: bool) -> Line<'a> {
    let label_style = if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    };
    let value_style = if focused {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    };
    let value = if spinner {
        format!("◂ {} ▸", value)
    } else {
        value
    };

    Line::from(vec![
        Span::raw(if focused { " → " } else { "   " }),
        Span::styled(format!("{:<10}", format!("{}:", label)), label_style),
        Span::styled(value, value_style),
    ])
}

fn render_add_form(f: &mut Frame, form: &AddTransactionForm) {
    let area = centered_rect(46, 11, f.size());

    let mut lines = vec![Line::from("")];
    for field in FormField::ALL {
        let focused = form.focus == field;
        let (value, spinner) = match field {
            FormField::Type => (form.kind.to_string(), true),
            FormField::Category => (form.category().to_string(), true),
            FormField::Amount => {
                let cursor = if focused { "_" } else { "" };
                (format!("{}{}", form.amount, cursor), false)
            }
            FormField::Year => (format!("{:04}", form.period.year()), true),
            FormField::Month => (format!("{:02}", form.period.month()), true),
        };
        lines.push(field_line(field.label(), value, focused, spinner));
    }

    let popup = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Add Transaction "),
    );

    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

fn render_path_prompt(f: &mut Frame, action: FileAction, input: &str) {
    let area = centered_rect(60, 5, f.size());

    let lines = vec![
        Line::from(Span::styled(
            " File path:",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![Span::raw(" "), Span::raw(input), Span::raw("_")]),
    ];

    let popup = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(action.title()),
    );

    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

fn render_summary_picker(f: &mut Frame, picker: &PeriodPicker, field: PeriodField) {
    let area = centered_rect(40, 6, f.size());

    let lines = vec![
        Line::from(""),
        field_line(
            "Year",
            format!("{:04}", picker.year()),
            field == PeriodField::Year,
            true,
        ),
        field_line(
            "Month",
            format!("{:02}", picker.month()),
            field == PeriodField::Month,
            true,
        ),
    ];

    let popup = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" View Summary "),
    );

    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

fn render_message(f: &mut Frame, text: &str, success: bool) {
    let color = if success { Color::Green } else { Color::Red };
    let width = text.lines().map(|l| l.chars().count()).max().unwrap_or(0) as u16 + 6;
    let height = text.lines().count() as u16 + 4;
    let area = centered_rect(width.max(30), height, f.size());

    let mut lines = vec![Line::from("")];
    lines.extend(text.lines().map(|l| {
        Line::from(Span::styled(
            format!("  {}", l),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
    }));

    let popup = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(" Message "),
    );

    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
