//! Selection Menu (TUI popup)
//!
//! Displays a single-select list, used to pick the database backend.

use ratatui::{
    crossterm::event::{self, Event, KeyCode, KeyEventKind},
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use std::io;

/// Result of running the selection menu
#[derive(Debug, Clone, PartialEq)]
pub enum MenuResult {
    /// Index of the chosen item
    Selected(usize),
    /// User cancelled (ESC)
    Cancelled,
    /// User wants to type their own answer
    TextInput,
}

/// Display the menu and return the user's choice
pub fn show_select_menu(title: &str, choices: &[String]) -> io::Result<MenuResult> {
    if choices.is_empty() {
        return Ok(MenuResult::TextInput);
    }

    let mut state = ListState::default();
    state.select(Some(0));

    // Setup terminal
    crossterm::terminal::enable_raw_mode()?;
    crossterm::execute!(io::stdout(), crossterm::terminal::EnterAlternateScreen)?;

    let backend = ratatui::backend::CrosstermBackend::new(io::stdout());
    let result = ratatui::Terminal::new(backend)
        .and_then(|mut terminal| run_menu(&mut terminal, title, choices, &mut state));

    // Restore terminal
    crossterm::execute!(io::stdout(), crossterm::terminal::LeaveAlternateScreen)?;
    crossterm::terminal::disable_raw_mode()?;

    result
}

fn run_menu(
    terminal: &mut ratatui::Terminal<ratatui::backend::CrosstermBackend<io::Stdout>>,
    title: &str,
    choices: &[String],
    state: &mut ListState,
) -> io::Result<MenuResult> {
    loop {
        terminal.draw(|f| ui(f, title, choices, state))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let selected = state.selected().unwrap_or(0);
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    return Ok(MenuResult::Cancelled);
                }
                KeyCode::Enter => {
                    return Ok(MenuResult::Selected(selected));
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    state.select(Some(next_index(selected, choices.len())));
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    state.select(Some(selected.saturating_sub(1)));
                }
                KeyCode::Char('/') => {
                    return Ok(MenuResult::TextInput);
                }
                _ => {}
            }
        }
    }
}

/// Move down one row, stopping at the last item
fn next_index(selected: usize, len: usize) -> usize {
    if selected + 1 < len {
        selected + 1
    } else {
        selected
    }
}

fn ui(f: &mut Frame, title: &str, choices: &[String], state: &mut ListState) {
    let size = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(size);

    let header = Paragraph::new(vec![Line::from(format!(" {} ", title))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    )
    .alignment(Alignment::Center);

    f.render_widget(header, chunks[0]);

    let items: Vec<ListItem> = choices
        .iter()
        .map(|choice| ListItem::new(format!("  {}", choice)))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::REVERSED)
                .fg(Color::Black)
                .bg(Color::Cyan),
        );

    f.render_stateful_widget(list, chunks[1], state);

    let help = Paragraph::new(vec![Line::from(
        " ↑/k: Up  ↓/j: Down  Enter: Select  ESC/q: Cancel  /: Type your own ",
    )
    .style(Style::default().fg(Color::Gray))])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    )
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });

    f.render_widget(help, chunks[2]);
}
