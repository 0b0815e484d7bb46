//! About screen.

use super::*;

const ABOUT_BUTTONS: &[&str] = &["Back"];

pub(super) fn handle_event_about(app: &mut App, event: Event) -> Result<()> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
            KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter => {
                app.view = View::Home;
                app.status = "Back to search.".to_string();
            }
            _ => {}
        },
        Event::Mouse(me) => {
            if let MouseEventKind::Down(MouseButton::Left) = me.kind
                && let Some(area) = app.last_about_buttons
                && pos_in(area, me.column, me.row)
            {
                app.view = View::Home;
                app.status = "Back to search.".to_string();
            }
        }
        _ => {}
    }
    Ok(())
}

pub(super) fn draw_about(frame: &mut ratatui::Frame, app: &mut App) {
    let (main, log_area) = split_with_log(frame.size());
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
        ])
        .split(main);

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "About",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  q/Esc returns"),
    ]))
    .block(Block::default().borders(Borders::ALL).title("Book Finder"));
    frame.render_widget(header, layout[0]);

    let button_area = layout[1];
    let btn_items: Vec<ListItem> = ABOUT_BUTTONS.iter().map(|b| ListItem::new(*b)).collect();
    let btn_list = List::new(btn_items)
        .block(Block::default().borders(Borders::ALL).title("Actions"))
        .highlight_style(
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");
    frame.render_stateful_widget(btn_list, button_area, &mut app.about_btn_state);
    app.last_about_buttons = Some(button_area);

    let mut text = String::new();
    text.push_str(&format!("Book Finder v{}\n", env!("CARGO_PKG_VERSION")));
    text.push_str("Search millions of books by title or author.\n\n");
    text.push_str("Search data and cover images are provided by Open Library\n");
    text.push_str("(https://openlibrary.org) and its covers CDN.\n\n");
    text.push_str("Nothing is stored locally except config.yml and the logs folder;\n");
    text.push_str("results live only for the current session.\n\n");
    text.push_str("Keys: f switches the search field, p previews a cover,\n");
    text.push_str("s opens settings, q quits. Run with --server for the web UI.\n");

    let info = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Info"));
    frame.render_widget(info, layout[2]);

    render_log_box(frame, log_area, app);
}
