//! Snooth TUI Application
//!
//! A terminal user interface for searching and browsing Snooth wines.

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame, Terminal,
};
use std::fs::File;
use std::io::{self, Stdout};
use std::sync::Mutex;
use std::time::Duration;

use snooth_client::{SnoothClient, SnoothConfig, SnoothError, Wine, WineSearchParams};

const PAGE_SIZE: u32 = 10;

// ============================================================================
// Application State
// ============================================================================

/// Represents the current screen being displayed
#[derive(Debug, Clone, PartialEq)]
enum AppScreen {
    /// Search input screen - user enters a wine query
    SearchInput,
    /// Loading wines from API
    LoadingWines,
    /// Wine table screen with pagination
    WineTable,
    /// Detail view of the selected wine
    WineDetail,
}

/// Main application state
struct AppState {
    /// Current screen being displayed
    screen: AppScreen,
    /// Search query entered by user
    query: String,
    /// Cursor position in query input (in chars)
    cursor_position: usize,
    /// Only show wines that are available for purchase
    available_only: bool,
    /// Initialized API client
    client: SnoothClient,
    /// Wines on the current page
    wines: Vec<Wine>,
    /// Current page number (1-indexed)
    current_page: u32,
    /// Currently selected row in table
    selected_row: usize,
    /// Error message to display
    error_message: Option<String>,
    /// Should the application quit?
    should_quit: bool,
}

impl AppState {
    fn new(client: SnoothClient) -> Self {
        Self {
            screen: AppScreen::SearchInput,
            query: String::new(),
            cursor_position: 0,
            available_only: false,
            client,
            wines: Vec::new(),
            current_page: 1,
            selected_row: 0,
            error_message: None,
            should_quit: false,
        }
    }

    /// Fetch the current page of wines for the query
    fn fetch_wines(&mut self) -> Result<(), String> {
        let query = if self.query.trim().is_empty() {
            "wine".to_string()
        } else {
            self.query.trim().to_string()
        };

        let params = WineSearchParams {
            query,
            count: PAGE_SIZE,
            page: self.current_page,
            // Offsets are one-indexed: page 1 starts at result 1.
            first_result: Some((self.current_page - 1) * PAGE_SIZE + 1),
            available: self.available_only,
            ..Default::default()
        };

        match self.client.search_wines(&params) {
            Ok(wines) => {
                self.wines = wines;
                self.selected_row = 0;
                Ok(())
            }
            Err(e) => Err(describe_error(&e)),
        }
    }

    /// A full page suggests there may be more results
    fn has_next_page(&self) -> bool {
        self.wines.len() as u32 >= PAGE_SIZE
    }

    fn selected_wine(&self) -> Option<&Wine> {
        self.wines.get(self.selected_row)
    }

    /// Clear any error message
    fn clear_error(&mut self) {
        self.error_message = None;
    }

    /// Set an error message
    fn set_error(&mut self, message: String) {
        self.error_message = Some(message);
    }

    /// Byte index of the cursor within `query`
    fn cursor_byte_index(&self) -> usize {
        self.query
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i)
            .unwrap_or(self.query.len())
    }
}

// ============================================================================
// Terminal Setup
// ============================================================================

/// Setup the terminal for TUI mode
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Restore the terminal to its original state
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

/// Send library logs to a file when `SNOOTH_LOG` is set; stdout belongs to the UI.
fn init_logging() -> io::Result<()> {
    let Ok(filter) = std::env::var("SNOOTH_LOG") else {
        return Ok(());
    };
    let file = File::create("snooth-tui.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

// ============================================================================
// UI Rendering
// ============================================================================

/// Render the search input screen
fn render_search_input(f: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // Input
            Constraint::Length(2), // Help
            Constraint::Min(1),    // Spacer
            Constraint::Length(2), // Status bar
        ])
        .split(f.area());

    let title = Paragraph::new("Snooth Wine Browser")
        .style(Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let input_title = if state.available_only {
        " Search wines (available only) "
    } else {
        " Search wines "
    };
    let input_block = Block::default()
        .title(input_title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let input_text = Paragraph::new(state.query.as_str())
        .style(Style::default().fg(Color::White))
        .block(input_block);
    f.render_widget(input_text, chunks[1]);

    let cursor_x = chunks[1].x + state.cursor_position as u16 + 1;
    let cursor_y = chunks[1].y + 1;
    f.set_cursor_position((cursor_x, cursor_y));

    let help = Paragraph::new("Enter: Search | Tab: Toggle available only | Esc: Quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(help, chunks[2]);

    render_status_bar(f, chunks[4], state);
}

/// Render the loading screen
fn render_loading(f: &mut Frame, state: &AppState, message: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // Loading message
            Constraint::Min(1),    // Spacer
            Constraint::Length(2), // Status bar
        ])
        .split(f.area());

    let title = Paragraph::new("Snooth Wine Browser")
        .style(Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let loading = Paragraph::new(format!("{message}..."))
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(loading, chunks[1]);

    render_status_bar(f, chunks[3], state);
}

/// Render the wine table screen
fn render_wine_table(f: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(5),    // Wine table
            Constraint::Length(2), // Help
            Constraint::Length(2), // Status bar
        ])
        .split(f.area());

    let title_text = format!("Wines - \"{}\" | Page {}", state.query, state.current_page);
    let title = Paragraph::new(title_text)
        .style(Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let rows: Vec<Row> = state
        .wines
        .iter()
        .enumerate()
        .map(|(i, w)| {
            let style = if i == state.selected_row {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Magenta)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(truncate(&w.name, 32)),
                Cell::from(w.vintage.clone()),
                Cell::from(truncate(&w.region, 24)),
                Cell::from(w.price.clone()),
                Cell::from(w.snoothrank.clone()),
                Cell::from(if w.available { "yes" } else { "" }),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(34),
            Constraint::Length(8),
            Constraint::Length(26),
            Constraint::Length(10),
            Constraint::Length(6),
            Constraint::Min(6),
        ],
    )
    .header(
        Row::new(vec!["Name", "Vintage", "Region", "Price", "Rank", "Avail"])
            .style(Style::default().add_modifier(Modifier::BOLD))
            .bottom_margin(1),
    )
    .block(Block::default().borders(Borders::ALL).title(" Wines "));
    f.render_widget(table, chunks[1]);

    let help = Paragraph::new("Enter: Details | n: Next | p: Prev | s: New search | q: Quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(help, chunks[2]);

    render_status_bar(f, chunks[3], state);
}

/// Render the detail view for the selected wine
fn render_wine_detail(f: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(5),    // Fields
            Constraint::Length(2), // Help
            Constraint::Length(2), // Status bar
        ])
        .split(f.area());

    let Some(wine) = state.selected_wine() else {
        render_wine_table(f, state);
        return;
    };

    let title = Paragraph::new(wine.name.as_str())
        .style(Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let fields = [
        ("Code", &wine.code),
        ("Winery", &wine.winery),
        ("Vintage", &wine.vintage),
        ("Region", &wine.region),
        ("Varietal", &wine.varietal),
        ("Type", &wine.wine_type),
        ("Price", &wine.price),
        ("Merchants", &wine.num_merchants),
        ("Reviews", &wine.num_reviews),
        ("Snooth rank", &wine.snoothrank),
        ("Tags", &wine.tags),
        ("Link", &wine.link),
    ];
    let mut lines: Vec<Line> = fields
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(label, value)| Line::from(format!("{label:>12}: {value}")))
        .collect();
    lines.push(Line::from(format!(
        "{:>12}: {}",
        "Available",
        if wine.available { "yes" } else { "no" }
    )));

    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Details "));
    f.render_widget(body, chunks[1]);

    let help = Paragraph::new("Esc: Back | q: Quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(help, chunks[2]);

    render_status_bar(f, chunks[3], state);
}

/// Render the status bar at the bottom
fn render_status_bar(f: &mut Frame, area: Rect, state: &AppState) {
    let status_text = if let Some(ref error) = state.error_message {
        format!(" Error: {error}")
    } else {
        format!(" Connected to: {}", state.client.base_url())
    };

    let style = if state.error_message.is_some() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Green)
    };

    let status = Paragraph::new(status_text)
        .style(style)
        .alignment(Alignment::Left)
        .block(Block::default().borders(Borders::TOP));
    f.render_widget(status, area);
}

/// Main render function that dispatches to the appropriate screen renderer
fn render(f: &mut Frame, state: &AppState) {
    match state.screen {
        AppScreen::SearchInput => render_search_input(f, state),
        AppScreen::LoadingWines => render_loading(f, state, "Searching wines"),
        AppScreen::WineTable => render_wine_table(f, state),
        AppScreen::WineDetail => render_wine_detail(f, state),
    }
}

// ============================================================================
// Event Handling
// ============================================================================

/// Handle keyboard input for search input screen
fn handle_search_input(event: KeyEvent, state: &mut AppState) {
    match event.code {
        KeyCode::Char(c) => {
            let at = state.cursor_byte_index();
            state.query.insert(at, c);
            state.cursor_position += 1;
            state.clear_error();
        }
        KeyCode::Backspace => {
            if state.cursor_position > 0 {
                state.cursor_position -= 1;
                let at = state.cursor_byte_index();
                state.query.remove(at);
                state.clear_error();
            }
        }
        KeyCode::Delete => {
            if state.cursor_position < state.query.chars().count() {
                let at = state.cursor_byte_index();
                state.query.remove(at);
                state.clear_error();
            }
        }
        KeyCode::Left => {
            state.cursor_position = state.cursor_position.saturating_sub(1);
        }
        KeyCode::Right => {
            if state.cursor_position < state.query.chars().count() {
                state.cursor_position += 1;
            }
        }
        KeyCode::Home => {
            state.cursor_position = 0;
        }
        KeyCode::End => {
            state.cursor_position = state.query.chars().count();
        }
        KeyCode::Tab => {
            state.available_only = !state.available_only;
        }
        KeyCode::Enter => {
            state.current_page = 1;
            state.screen = AppScreen::LoadingWines;
        }
        KeyCode::Esc => {
            state.should_quit = true;
        }
        _ => {}
    }
}

/// Handle keyboard input for wine table screen
fn handle_wine_table(event: KeyEvent, state: &mut AppState) {
    match event.code {
        KeyCode::Up => {
            state.selected_row = state.selected_row.saturating_sub(1);
        }
        KeyCode::Down => {
            if state.selected_row < state.wines.len().saturating_sub(1) {
                state.selected_row += 1;
            }
        }
        KeyCode::Enter => {
            if state.selected_wine().is_some() {
                state.screen = AppScreen::WineDetail;
            }
        }
        KeyCode::Char('n') => {
            if state.has_next_page() {
                state.current_page += 1;
                state.screen = AppScreen::LoadingWines;
            }
        }
        KeyCode::Char('p') => {
            if state.current_page > 1 {
                state.current_page -= 1;
                state.screen = AppScreen::LoadingWines;
            }
        }
        KeyCode::Char('s') | KeyCode::Esc => {
            state.screen = AppScreen::SearchInput;
            state.clear_error();
        }
        _ => {}
    }
}

/// Handle keyboard input for wine detail screen
fn handle_wine_detail(event: KeyEvent, state: &mut AppState) {
    if matches!(event.code, KeyCode::Esc | KeyCode::Backspace) {
        state.screen = AppScreen::WineTable;
    }
}

/// Main event handler that dispatches to the appropriate screen handler
fn handle_event(event: Event, state: &mut AppState) {
    if let Event::Key(key_event) = event {
        // 'q' quits everywhere except while typing a query
        if key_event.code == KeyCode::Char('q')
            && state.screen != AppScreen::SearchInput
            && key_event.modifiers == KeyModifiers::NONE
        {
            state.should_quit = true;
            return;
        }

        match state.screen {
            AppScreen::SearchInput => handle_search_input(key_event, state),
            AppScreen::WineTable => handle_wine_table(key_event, state),
            AppScreen::WineDetail => handle_wine_detail(key_event, state),
            AppScreen::LoadingWines => {}
        }
    }
}

// ============================================================================
// Application Logic
// ============================================================================

/// Process the current state (e.g., fetch data during loading screens)
fn process_state(state: &mut AppState) {
    if state.screen == AppScreen::LoadingWines {
        match state.fetch_wines() {
            Ok(()) => {
                state.screen = AppScreen::WineTable;
            }
            Err(e) => {
                state.set_error(e);
                state.screen = AppScreen::SearchInput;
            }
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Status-bar text for a failed search. Rejected queries are told apart from failures.
fn describe_error(error: &SnoothError) -> String {
    if error.is_validation() {
        format!("Request rejected: {error}")
    } else {
        format!("Failed to search wines: {error}")
    }
}

/// Shorten `s` to at most `max` chars, marking the cut with "..."
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

// ============================================================================
// Main Application
// ============================================================================

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // SNOOTH_LOG may come from .env like every other setting
    dotenvy::dotenv().ok();
    init_logging()?;

    let config = SnoothConfig::from_env()?;
    let client = SnoothClient::with_base_url(config.session(), &config.base_url)?;

    let mut terminal = setup_terminal()?;
    let mut state = AppState::new(client);

    loop {
        terminal.draw(|f| render(f, &state))?;

        process_state(&mut state);

        if state.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(100))? {
            let event = event::read()?;
            handle_event(event, &mut state);
        }
    }

    restore_terminal(&mut terminal)?;

    Ok(())
}
