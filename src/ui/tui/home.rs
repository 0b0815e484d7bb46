//! Home screen: search input, action menu, result list, detail panel.

use super::*;

pub(super) fn handle_event_home(app: &mut App, event: Event) -> Result<()> {
    match event {
        Event::Paste(s) => {
            if app.focus == Focus::Input {
                app.input.push_str(&s);
            }
        }
        Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
            KeyCode::Char('q') => {
                if app.focus == Focus::Input {
                    app.input.push('q');
                } else {
                    app.should_quit = true;
                }
            }
            KeyCode::Char('f') => {
                if app.focus == Focus::Input {
                    app.input.push('f');
                } else {
                    app.field = app.field.toggled();
                    app.status =
                        format!("Now searching by {}.", app.field.label().to_lowercase());
                }
            }
            KeyCode::Char('s') => {
                if app.focus == Focus::Input {
                    app.input.push('s');
                } else {
                    app.previous_view = app.view;
                    app.view = View::Config;
                    app.cfg_editing = None;
                }
            }
            KeyCode::Char('a') => {
                if app.focus == Focus::Input {
                    app.input.push('a');
                } else {
                    app.previous_view = app.view;
                    app.view = View::About;
                }
            }
            KeyCode::Char('p') => {
                if app.focus == Focus::Input {
                    app.input.push('p');
                } else if app.focus == Focus::Results
                    && app.list_state.selected().is_some()
                {
                    cover::show_cover_for_selected(app);
                }
            }
            KeyCode::Esc => {
                app.focus = Focus::Input;
                app.list_state.select(None);
            }
            KeyCode::Tab => cycle_focus(app),
            KeyCode::Backspace => {
                if app.focus == Focus::Input {
                    app.input.pop();
                }
            }
            KeyCode::Char(c)
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT) =>
            {
                if app.focus == Focus::Input {
                    app.input.push(c);
                }
            }
            KeyCode::Up => match app.focus {
                Focus::Results => app.select_prev(),
                Focus::Menu => select_prev_menu(app),
                Focus::Input => {}
            },
            KeyCode::Down => match app.focus {
                Focus::Results => app.select_next(),
                Focus::Menu => select_next_menu(app),
                Focus::Input => {}
            },
            KeyCode::Enter => match app.focus {
                Focus::Input => super::start_search(app),
                Focus::Results => {
                    if app.list_state.selected().is_some() {
                        cover::show_cover_for_selected(app);
                    }
                }
                Focus::Menu => super::trigger_menu_action(app)?,
            },
            _ => {}
        },
        Event::Mouse(me) => handle_mouse_home(app, me)?,
        Event::Resize(_, _) => {}
        _ => {}
    }

    Ok(())
}

fn handle_mouse_home(app: &mut App, me: event::MouseEvent) -> Result<()> {
    let Some(layout) = app.last_home_layout else {
        return Ok(());
    };
    let input_area = layout[1];
    let menu_area = layout[2];
    let results_area = layout[3];

    match me.kind {
        MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
            let up = matches!(me.kind, MouseEventKind::ScrollUp);
            if pos_in(menu_area, me.column, me.row) {
                app.focus = Focus::Menu;
                if up {
                    select_prev_menu(app);
                } else {
                    select_next_menu(app);
                }
            } else if pos_in(results_area, me.column, me.row)
                && !app.controller.results().is_empty()
            {
                app.focus = Focus::Results;
                if up {
                    app.select_prev();
                } else {
                    app.select_next();
                }
            }
        }
        MouseEventKind::Down(MouseButton::Left) => {
            if pos_in(input_area, me.column, me.row) {
                app.focus = Focus::Input;
            } else if pos_in(menu_area, me.column, me.row) {
                app.focus = Focus::Menu;
                if let Some(idx) =
                    list_index_from_mouse_row(menu_area, me.row, &app.menu_state, MENU_ITEMS.len())
                {
                    app.menu_state.select(Some(idx));
                    super::trigger_menu_action(app)?;
                }
            } else if pos_in(results_area, me.column, me.row) {
                if !app.controller.results().is_empty()
                    && let Some(idx) = list_index_from_mouse_row(
                        results_area,
                        me.row,
                        &app.list_state,
                        app.controller.results().len(),
                    )
                {
                    app.list_state.select(Some(idx));
                    app.focus = Focus::Results;
                    cover::show_cover_for_selected(app);
                }
            }
        }
        MouseEventKind::Moved => {
            if pos_in(results_area, me.column, me.row)
                && !app.controller.results().is_empty()
                && let Some(idx) = list_index_from_mouse_row(
                    results_area,
                    me.row,
                    &app.list_state,
                    app.controller.results().len(),
                )
            {
                app.list_state.select(Some(idx));
                app.focus = Focus::Results;
            }
        }
        _ => {}
    }
    Ok(())
}

fn cycle_focus(app: &mut App) {
    app.focus = match app.focus {
        Focus::Input => Focus::Menu,
        Focus::Menu => {
            if app.controller.results().is_empty() {
                Focus::Input
            } else {
                Focus::Results
            }
        }
        Focus::Results => Focus::Input,
    };
}

fn select_next_menu(app: &mut App) {
    let len = MENU_ITEMS.len();
    let next = app
        .menu_state
        .selected()
        .map(|i| (i + 1) % len)
        .unwrap_or(0);
    app.menu_state.select(Some(next));
}

fn select_prev_menu(app: &mut App) {
    let len = MENU_ITEMS.len();
    let prev = app
        .menu_state
        .selected()
        .map(|i| if i == 0 { len - 1 } else { i - 1 })
        .unwrap_or(len - 1);
    app.menu_state.select(Some(prev));
}

/// Result-card lines, one per book in API order.
fn result_items(app: &App) -> Vec<ListItem<'static>> {
    app.controller
        .results()
        .iter()
        .map(|b| {
            let year = b
                .first_publish_year
                .map(|y| y.to_string())
                .unwrap_or_else(|| "—".to_string());
            ListItem::new(format!("{} | {} | {}", b.title, b.authors_display(), year))
        })
        .collect()
}

/// What the results box shows when there are no cards to render.
fn placeholder_line(app: &App) -> String {
    match app.controller.phase() {
        SearchPhase::Loading => "Searching books…".to_string(),
        // Failed keeps the plain empty-state rendering; the notification
        // already carries the error.
        SearchPhase::Idle | SearchPhase::Failed => {
            "Search millions of books by title or author. Type above and press Enter.".to_string()
        }
        SearchPhase::Succeeded => format!(
            "No books found for \"{}\". Try a different search term.",
            app.controller.last_query()
        ),
    }
}

fn current_selection_detail_lines(app: &App) -> Option<Vec<Line<'static>>> {
    let idx = app.list_state.selected()?;
    let book = app.controller.results().get(idx)?;

    let mut lines = Vec::new();
    let year = book
        .first_publish_year
        .map(|y| format!(" · first published {y}"))
        .unwrap_or_default();
    lines.push(Line::from(format!(
        "Selected: \"{}\" by {}{}",
        book.title,
        book.authors_display(),
        year
    )));

    let subjects = book.subjects_display();
    if !subjects.is_empty() {
        lines.push(Line::from(format!("Subjects: {}", subjects.join(" | "))));
    }

    let cover = match book.cover_url(app.config.cover_size()) {
        Some(_) => "available, Enter or p previews it",
        None => "none",
    };
    lines.push(Line::from(format!(
        "Catalog key: {} | Cover: {}",
        book.key, cover
    )));

    Some(lines)
}

pub(super) fn draw_home(frame: &mut ratatui::Frame, app: &mut App) {
    let (main, log_area) = split_with_log(frame.size());
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(MENU_ITEMS.len() as u16 + 2),
            Constraint::Length(12),
            Constraint::Min(6),
        ])
        .split(main);
    if layout.len() == 5 {
        let mut arr = [Rect::default(); 5];
        arr.copy_from_slice(&layout);
        app.last_home_layout = Some(arr);
    }

    let header_line = Line::from(vec![
        Span::styled(
            "Book Finder",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  searching by: "),
        Span::styled(app.field.label(), Style::default().fg(Color::Green)),
        Span::raw("  |  f: switch field, s: settings, q: quit"),
    ]);
    let header = Paragraph::new(header_line).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Open Library search"),
    );
    frame.render_widget(header, layout[0]);

    let input_style = if app.focus == Focus::Input {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let input_title = match app.field {
        SearchField::Title => "Enter book title (Enter searches)",
        SearchField::Author => "Enter author name (Enter searches)",
    };
    let input = Paragraph::new(format!("> {}", app.input))
        .style(input_style)
        .block(Block::default().borders(Borders::ALL).title(input_title));
    frame.render_widget(input, layout[1]);

    let menu_items: Vec<ListItem> = MENU_ITEMS
        .iter()
        .map(|(label, _)| ListItem::new(*label))
        .collect();
    let menu_style = if app.focus == Focus::Menu {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let menu_list = List::new(menu_items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Actions (Enter or click)"),
        )
        .highlight_style(menu_style.add_modifier(Modifier::BOLD))
        .highlight_symbol(">> ");
    frame.render_stateful_widget(menu_list, layout[2], &mut app.menu_state);

    let items = if app.controller.results().is_empty() {
        vec![ListItem::new(placeholder_line(app))]
    } else {
        result_items(app)
    };

    let results_title = if app.controller.results().is_empty() {
        "Results".to_string()
    } else {
        format!(
            "Results for \"{}\" by {} ({} of {}, Enter previews cover)",
            app.controller.last_query(),
            app.controller.last_field().label().to_lowercase(),
            app.controller.results().len(),
            app.controller.total_found()
        )
    };
    let results_block = Block::default().borders(Borders::ALL).title(results_title);
    frame.render_widget(results_block.clone(), layout[3]);
    let results_inner = results_block.inner(layout[3]);

    let results_len = app.controller.results().len();
    let need_scrollbar =
        results_len > 0 && results_inner.height > 0 && results_len > results_inner.height as usize;
    let (list_area, sb_area) = if need_scrollbar && results_inner.width > 0 {
        let list_w = results_inner.width.saturating_sub(1).max(1);
        (
            Rect {
                x: results_inner.x,
                y: results_inner.y,
                width: list_w,
                height: results_inner.height,
            },
            Some(Rect {
                x: results_inner.x.saturating_add(list_w),
                y: results_inner.y,
                width: 1,
                height: results_inner.height,
            }),
        )
    } else {
        (results_inner, None)
    };

    let list = List::new(items)
        .highlight_style(
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");
    frame.render_stateful_widget(list, list_area, &mut app.list_state);

    if let Some(sb_area) = sb_area {
        let pos = app
            .list_state
            .selected()
            .unwrap_or(0)
            .min(results_len.saturating_sub(1));
        let mut sb_state = ScrollbarState::new(results_len).position(pos);
        let sb = Scrollbar::default().orientation(ScrollbarOrientation::VerticalRight);
        frame.render_stateful_widget(sb, sb_area, &mut sb_state);
    }

    let mut msg_lines: Vec<Line> = Vec::new();
    if let Some(detail) = current_selection_detail_lines(app) {
        msg_lines.extend(detail);
        msg_lines.push(Line::from(""));
    }
    msg_lines.push(Line::from(app.status.clone()));
    if !app.messages.is_empty() {
        msg_lines.push(Line::from(""));
        msg_lines.extend(
            app.messages
                .iter()
                .rev()
                .take(6)
                .rev()
                .map(|m| Line::from(m.as_str())),
        );
    }

    let messages = Paragraph::new(msg_lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Status / messages"),
        );
    frame.render_widget(messages, layout[4]);

    render_log_box(frame, log_area, app);
}
