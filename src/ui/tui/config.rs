//! Settings screen. Edits are persisted immediately through the
//! commented-YAML writer.

use super::*;

use crate::base_system::config::write_with_comments;
use crate::openlibrary::model::CoverSize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum SettingField {
    DefaultField,
    ShowCovers,
    CoverSize,
    RequestTimeout,
    OldCli,
}

const SETTING_ENTRIES: &[(&str, SettingField)] = &[
    ("Default search field", SettingField::DefaultField),
    ("Fetch covers for preview", SettingField::ShowCovers),
    ("Cover size", SettingField::CoverSize),
    ("Request timeout (s)", SettingField::RequestTimeout),
    ("Switch to plain CLI", SettingField::OldCli),
];

const TIMEOUT_RANGE: std::ops::RangeInclusive<u64> = 1..=300;

pub(super) fn handle_event_config(app: &mut App, event: Event) -> Result<()> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            if app.cfg_editing.is_some() {
                match key.code {
                    KeyCode::Esc => {
                        app.cfg_editing = None;
                        app.cfg_edit_buffer.clear();
                        app.status = "Edit canceled.".to_string();
                    }
                    KeyCode::Enter => apply_timeout_edit(app),
                    KeyCode::Backspace => {
                        app.cfg_edit_buffer.pop();
                    }
                    KeyCode::Char(c) => {
                        app.cfg_edit_buffer.push(c);
                    }
                    _ => {}
                }
            } else {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => {
                        app.view = View::Home;
                        app.status = "Back to search.".to_string();
                    }
                    KeyCode::Up => select_prev_entry(app),
                    KeyCode::Down => select_next_entry(app),
                    KeyCode::Enter => activate_selected(app),
                    _ => {}
                }
            }
        }
        Event::Mouse(me) => handle_mouse_config(app, me),
        Event::Resize(_, _) => {}
        _ => {}
    }

    Ok(())
}

fn handle_mouse_config(app: &mut App, me: event::MouseEvent) {
    let Some(layout) = app.last_config_layout else {
        return;
    };
    let list_area = layout[1];
    match me.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if pos_in(list_area, me.column, me.row)
                && let Some(idx) = list_index_from_mouse_row(
                    list_area,
                    me.row,
                    &app.cfg_state,
                    SETTING_ENTRIES.len(),
                )
            {
                app.cfg_state.select(Some(idx));
                activate_selected(app);
            }
        }
        MouseEventKind::ScrollUp => select_prev_entry(app),
        MouseEventKind::ScrollDown => select_next_entry(app),
        _ => {}
    }
}

fn select_next_entry(app: &mut App) {
    let len = SETTING_ENTRIES.len();
    let next = app.cfg_state.selected().map(|i| (i + 1) % len).unwrap_or(0);
    app.cfg_state.select(Some(next));
}

fn select_prev_entry(app: &mut App) {
    let len = SETTING_ENTRIES.len();
    let prev = app
        .cfg_state
        .selected()
        .map(|i| if i == 0 { len - 1 } else { i - 1 })
        .unwrap_or(len - 1);
    app.cfg_state.select(Some(prev));
}

fn activate_selected(app: &mut App) {
    let Some(idx) = app.cfg_state.selected() else {
        return;
    };
    let Some((_, field)) = SETTING_ENTRIES.get(idx) else {
        return;
    };

    match field {
        SettingField::DefaultField => {
            let toggled = app.config.default_field().toggled();
            app.config.default_search_field = toggled.param_name().to_string();
            app.field = toggled;
            save_config(app);
        }
        SettingField::ShowCovers => {
            app.config.show_covers = !app.config.show_covers;
            save_config(app);
        }
        SettingField::CoverSize => {
            let next = match app.config.cover_size() {
                CoverSize::Small => CoverSize::Medium,
                CoverSize::Medium => CoverSize::Large,
                CoverSize::Large => CoverSize::Small,
            };
            app.config.cover_size = next.suffix().to_string();
            save_config(app);
        }
        SettingField::RequestTimeout => {
            app.cfg_editing = Some(idx);
            app.cfg_edit_buffer = app.config.request_timeout.to_string();
            app.status = "Enter a timeout in seconds, Enter saves, Esc cancels.".to_string();
        }
        SettingField::OldCli => {
            app.config.old_cli = true;
            save_config(app);
            app.switch_to_old_cli = true;
            app.should_quit = true;
        }
    }
}

fn apply_timeout_edit(app: &mut App) {
    match app.cfg_edit_buffer.trim().parse::<u64>() {
        Ok(secs) if TIMEOUT_RANGE.contains(&secs) => {
            app.config.request_timeout = secs;
            app.cfg_editing = None;
            app.cfg_edit_buffer.clear();
            if save_config(app) {
                app.status = "Saved. The new timeout applies from the next start.".to_string();
            }
        }
        _ => {
            app.status = format!(
                "Invalid timeout, expected {}..={} seconds.",
                TIMEOUT_RANGE.start(),
                TIMEOUT_RANGE.end()
            );
        }
    }
}

fn save_config(app: &mut App) -> bool {
    match write_with_comments(&app.config, &app.config_path) {
        Ok(()) => {
            app.status = format!("Saved {}.", app.config_path.display());
            true
        }
        Err(err) => {
            app.status = format!("Saving config failed: {err}");
            false
        }
    }
}

fn entry_value(app: &App, field: SettingField) -> String {
    match field {
        SettingField::DefaultField => app.config.default_field().label().to_string(),
        SettingField::ShowCovers => if app.config.show_covers { "on" } else { "off" }.to_string(),
        SettingField::CoverSize => app.config.cover_size().suffix().to_string(),
        SettingField::RequestTimeout => format!("{}s", app.config.request_timeout),
        SettingField::OldCli => "Enter switches now".to_string(),
    }
}

pub(super) fn draw_config(frame: &mut ratatui::Frame, app: &mut App) {
    let (main, log_area) = split_with_log(frame.size());
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(SETTING_ENTRIES.len() as u16 + 2),
            Constraint::Min(4),
        ])
        .split(main);
    if layout.len() == 3 {
        let mut arr = [Rect::default(); 3];
        arr.copy_from_slice(&layout);
        app.last_config_layout = Some(arr);
    }

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "Settings",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  Enter edits/toggles, q returns"),
    ]))
    .block(Block::default().borders(Borders::ALL).title("Book Finder"));
    frame.render_widget(header, layout[0]);

    let items: Vec<ListItem> = SETTING_ENTRIES
        .iter()
        .map(|(label, field)| ListItem::new(format!("{label}: {}", entry_value(app, *field))))
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Options"))
        .highlight_style(
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");
    frame.render_stateful_widget(list, layout[1], &mut app.cfg_state);

    let footer_lines = if app.cfg_editing.is_some() {
        vec![
            Line::from(format!("New timeout: {}_", app.cfg_edit_buffer)),
            Line::from("Enter saves, Esc cancels."),
        ]
    } else {
        vec![Line::from(app.status.clone())]
    };
    let footer = Paragraph::new(footer_lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Status"));
    frame.render_widget(footer, layout[2]);

    render_log_box(frame, log_area, app);
}
