// src/tui/ui.rs

use std::error::Error;
use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Paragraph, Row, Table},
    Frame, Terminal,
};

use farmdata::arms::ArmsClient;

use super::app::{
    App, FormField, InputMode, Screen, CATEGORY_CHOICES, COMPARE_CHOICES, MENU_ITEMS,
};

/// Entry point for the terminal front end. Called from main.rs.
pub fn run_tui(client: ArmsClient) -> Result<(), Box<dyn Error>> {
    let mut app = App::new(client)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    loop {
        terminal.draw(|f| ui(f, &app))?;

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(200))? {
            if let Event::Key(key) = event::read()? {
                handle_key_event(&mut app, key);
            }
        }
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}

/// Dispatch keyboard events depending on input mode.
fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_key_normal(app, key),
        InputMode::Editing => handle_key_editing(app, key),
    }
}

/// Key handling in normal mode.
fn handle_key_normal(app: &mut App, key: KeyEvent) {
    use KeyCode::*;

    match app.current_screen {
        Screen::Menu => match key.code {
            Char('q') => app.should_quit = true,
            Up => app.menu_up(),
            Down => app.menu_down(),
            Enter => app.open_menu_selection(),
            Char('?') => app.current_screen = Screen::Help,
            _ => {}
        },

        Screen::ReportForm => match key.code {
            Esc => app.back_to_menu(),
            Tab | Down => app.next_field(),
            Up => {
                // cycle backwards through the three fields
                app.next_field();
                app.next_field();
            }
            Left => {
                if app.focused_field == FormField::Category {
                    app.cycle_category(-1);
                }
            }
            Right => {
                if app.focused_field == FormField::Category {
                    app.cycle_category(1);
                }
            }
            Char('e') => {
                if app.focused_field != FormField::Category {
                    app.input_mode = InputMode::Editing;
                }
            }
            Enter => app.submit_report_form(),
            Char('q') => app.should_quit = true,
            _ => {}
        },

        Screen::CompareForm => match key.code {
            Esc => app.back_to_menu(),
            Left | Up => app.cycle_comparison(-1),
            Right | Down => app.cycle_comparison(1),
            Char('e') => app.input_mode = InputMode::Editing,
            Enter => app.submit_compare_form(),
            Char('q') => app.should_quit = true,
            _ => {}
        },

        Screen::Results | Screen::Metadata => match key.code {
            Esc | Backspace => app.back_to_menu(),
            Up => app.scroll = app.scroll.saturating_sub(1),
            Down => app.scroll += 1,
            Char('q') => app.should_quit = true,
            _ => {}
        },

        Screen::Help => match key.code {
            Esc | Enter | Char('?') => app.back_to_menu(),
            Char('q') => app.should_quit = true,
            _ => {}
        },
    }
}

/// Editing the years / state / year text fields.
fn handle_key_editing(app: &mut App, key: KeyEvent) {
    use KeyCode::*;

    match key.code {
        Esc | Enter => {
            app.input_mode = InputMode::Normal;
        }

        Backspace => {
            app.active_input().pop();
        }
        Char(c) => {
            if c.is_ascii_alphanumeric() || c == ',' || c == ' ' {
                app.active_input().push(c);
            }
        }
        _ => {}
    }
}

/// Top-level UI layout: header, main content, footer.
fn ui(f: &mut Frame<'_>, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(0),    // main
            Constraint::Length(1), // footer
        ])
        .split(f.area());

    let screen_name = match app.current_screen {
        Screen::Menu => "Main Menu",
        Screen::ReportForm => app.selected_report.title(),
        Screen::CompareForm => "Compare Farm Types",
        Screen::Results => "Results",
        Screen::Metadata => "Available Data",
        Screen::Help => "Help",
    };
    let header_text = format!("Farm Financial Intelligence Platform - {screen_name}");
    let header = Paragraph::new(header_text).block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    match app.current_screen {
        Screen::Menu => draw_menu(f, chunks[1], app),
        Screen::ReportForm => draw_report_form(f, chunks[1], app),
        Screen::CompareForm => draw_compare_form(f, chunks[1], app),
        Screen::Results => draw_results(f, chunks[1], app),
        Screen::Metadata => draw_metadata(f, chunks[1], app),
        Screen::Help => draw_help(f, chunks[1], app),
    }

    let footer_text = match app.input_mode {
        InputMode::Normal => match app.current_screen {
            Screen::Menu => "↑/↓: move  |  Enter: select  |  ?: help  |  q: quit",
            Screen::ReportForm => {
                "Tab/↑/↓: field  |  e: edit  |  ←/→: category  |  Enter: fetch  |  Esc: menu"
            }
            Screen::CompareForm => {
                "←/→: comparison type  |  e: edit year  |  Enter: fetch  |  Esc: menu"
            }
            Screen::Results | Screen::Metadata => "↑/↓: scroll  |  Esc: menu  |  q: quit",
            Screen::Help => "Esc: back",
        },
        InputMode::Editing => "Editing: type to change, Enter or Esc to finish",
    };
    let footer = Paragraph::new(footer_text).block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, chunks[2]);
}

// Main menu, numbered like the original CLI.
fn draw_menu(f: &mut Frame<'_>, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    let rows = MENU_ITEMS.iter().enumerate().map(|(idx, item)| {
        let cells = vec![format!("{}", idx + 1), item.to_string()];
        let mut row = Row::new(cells);
        if idx == app.menu_idx {
            row = row.style(Style::default().add_modifier(Modifier::REVERSED));
        }
        row
    });

    let widths = [Constraint::Length(4), Constraint::Min(30)];

    let table = Table::new(rows, widths).block(
        Block::default()
            .title("USDA ARMS Data Analysis")
            .borders(Borders::ALL),
    );
    f.render_widget(table, chunks[0]);

    // status line for errors and empty results
    let status = app.status.as_deref().unwrap_or("");
    let status = Paragraph::new(status).block(Block::default().borders(Borders::ALL));
    f.render_widget(status, chunks[1]);
}

fn field_line(label: &str, value: &str, focused: bool, editing: bool) -> String {
    let marker = if focused { ">" } else { " " };
    let cursor = if focused && editing { "_" } else { "" };
    format!("{marker} {label:<10} {value}{cursor}\n")
}

// Report filter form: years, state, optional category.
fn draw_report_form(f: &mut Frame<'_>, area: Rect, app: &App) {
    let editing = app.input_mode == InputMode::Editing;
    let mut text = String::new();
    text.push_str(&field_line(
        "Years:",
        &app.years_input,
        app.focused_field == FormField::Years,
        editing,
    ));
    text.push_str(&field_line(
        "State:",
        &app.state_input,
        app.focused_field == FormField::State,
        editing,
    ));
    text.push_str(&field_line(
        "Category:",
        CATEGORY_CHOICES[app.category_idx].0,
        app.focused_field == FormField::Category,
        false,
    ));
    text.push_str("\nYears are comma-separated (1996-2023). State is a code or 'all'.\n");
    text.push_str("Press Enter to fetch from USDA.\n");

    let block = Block::default()
        .title(Span::raw("Filters"))
        .borders(Borders::ALL);
    let p = Paragraph::new(text).block(block);
    f.render_widget(p, area);
}

// Comparison form: single year plus comparison type.
fn draw_compare_form(f: &mut Frame<'_>, area: Rect, app: &App) {
    let editing = app.input_mode == InputMode::Editing;
    let mut text = String::new();
    text.push_str(&field_line("Year:", &app.year_input, true, editing));
    text.push_str(&format!(
        "  Compare by: {}\n",
        COMPARE_CHOICES[app.compare_idx].0
    ));
    text.push_str("\nCompares the income statement across all values of the\n");
    text.push_str("selected category. Press Enter to fetch.\n");

    let block = Block::default()
        .title(Span::raw("Comparison"))
        .borders(Borders::ALL);
    let p = Paragraph::new(text).block(block);
    f.render_widget(p, area);
}

// Survey records as a table; columns follow the remote report.
fn draw_results(f: &mut Frame<'_>, area: Rect, app: &App) {
    let Some(view) = &app.results else {
        let p = Paragraph::new("No results yet.")
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(p, area);
        return;
    };

    let mut scroll = app.scroll;
    if !view.rows.is_empty() && scroll >= view.rows.len() {
        scroll = view.rows.len() - 1;
    }

    let widths: Vec<Constraint> = view
        .headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let mut width = header.chars().count();
            for row in &view.rows {
                width = width.max(row[i].chars().count());
            }
            Constraint::Length(width.min(24) as u16 + 1)
        })
        .collect();

    let rows = view
        .rows
        .iter()
        .skip(scroll)
        .map(|cells| Row::new(cells.clone()));

    let title = format!("{}  ({} records)", view.title, view.rows.len());
    let table = Table::new(rows, widths)
        .header(
            Row::new(view.headers.clone())
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(Block::default().title(title).borders(Borders::ALL));

    f.render_widget(table, area);
}

// Available years and states from the metadata lookups.
fn draw_metadata(f: &mut Frame<'_>, area: Rect, app: &App) {
    let Some(view) = &app.metadata else {
        let p = Paragraph::new("No metadata loaded.")
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(p, area);
        return;
    };

    let mut text = String::new();
    text.push_str("Available Years:\n  ");
    text.push_str(
        &view
            .years
            .iter()
            .map(|y| y.to_string())
            .collect::<Vec<_>>()
            .join(", "),
    );
    text.push_str("\n\nAvailable States:\n");
    for state in &view.states {
        text.push_str(&format!("  - {state}\n"));
    }

    let block = Block::default()
        .title(Span::raw("Available Data"))
        .borders(Borders::ALL);
    let p = Paragraph::new(text)
        .block(block)
        .scroll((app.scroll as u16, 0));
    f.render_widget(p, area);
}

//  Help screen
fn draw_help(f: &mut Frame<'_>, area: Rect, _app: &App) {
    let text = "\
Menu options:
  Income Statement   – farm business income statement report
  Balance Sheet      – farm business balance sheet report
  Financial Ratios   – farm business financial ratios report
  Compare Farm Types – one report across typology/class/region
  Structural Chars.  – structural characteristics report
  Available Data     – years and states the survey covers

Key bindings:
  ↑ / ↓       : move selection / scroll
  Enter       : select / fetch
  Tab         : next form field
  e           : edit the focused text field
  ← / →       : cycle category or comparison type
  Esc         : back to menu
  ?           : open this help
  q           : quit

Data comes from the USDA Economic Research Service ARMS API.
Requires USDA_API_KEY in the environment or a .env file.
";

    let block = Block::default()
        .title(Span::raw("Help"))
        .borders(Borders::ALL);
    let p = Paragraph::new(text).block(block);
    f.render_widget(p, area);
}
