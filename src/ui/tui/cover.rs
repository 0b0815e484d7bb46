//! Cover preview: fetches the selected book's cover from the covers CDN and
//! renders it as ASCII art.

use super::*;
use image::{DynamicImage, GenericImageView, imageops::FilterType};

pub(super) fn handle_event_cover(app: &mut App, event: Event) -> Result<()> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
            KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter => {
                app.view = app.previous_view;
                app.status = "Back.".to_string();
            }
            _ => {}
        },
        Event::Mouse(me) => {
            if let MouseEventKind::Down(MouseButton::Left) = me.kind {
                app.view = app.previous_view;
            }
        }
        _ => {}
    }
    Ok(())
}

pub(super) fn show_cover_for_selected(app: &mut App) {
    let Some(idx) = app.list_state.selected() else {
        return;
    };
    let Some(book) = app.controller.results().get(idx).cloned() else {
        return;
    };

    if !app.config.show_covers {
        app.status = "Cover fetching is disabled in settings.".to_string();
        return;
    }

    app.previous_view = app.view;
    app.cover_lines.clear();
    app.cover_title = format!("\"{}\" — {}", book.title, book.authors_display());

    let Some(cover_id) = book.cover_i else {
        // Placeholder path: the record simply has no cover.
        app.cover_lines = vec!["No cover available for this book.".to_string()];
        app.view = View::Cover;
        app.status = "This record has no cover (q returns).".to_string();
        return;
    };

    info!(target: "ui", cover_id, title = %book.title, "fetching cover");
    super::start_spinner(app, "Fetching cover…");

    let tx = app.worker_tx.clone();
    let client = app.client.clone();
    let size = app.config.cover_size();
    let title = book.title.clone();
    thread::spawn(move || {
        let bytes = client.fetch_cover(cover_id, size);
        let _ = tx.send(WorkerMsg::CoverReady { title, bytes });
    });
}

pub(super) fn on_cover_ready(app: &mut App, title: String, bytes: Option<Vec<u8>>) {
    let Some(bytes) = bytes else {
        app.cover_lines = vec!["Cover download failed.".to_string()];
        app.view = View::Cover;
        app.status = format!("Cover for \"{title}\" unavailable (q returns).");
        return;
    };

    match image::load_from_memory(&bytes) {
        Ok(img) => {
            let (term_w, term_h) = crossterm::terminal::size().unwrap_or((80, 24));
            let ascii = image_to_ascii(img, term_w, term_h);
            app.cover_lines = if ascii.is_empty() {
                vec!["Cover is too small to render.".to_string()]
            } else {
                ascii
            };
            app.status = format!("Cover: \"{title}\" (q returns).");
        }
        Err(err) => {
            app.cover_lines = vec!["Cover image could not be decoded.".to_string()];
            app.status = format!("Cover decode failed: {err}");
        }
    }
    app.view = View::Cover;
}

pub(super) fn draw_cover(frame: &mut ratatui::Frame, app: &mut App) {
    let (main, log_area) = super::split_with_log(frame.size());
    let title = if app.cover_title.is_empty() {
        "Cover preview".to_string()
    } else {
        app.cover_title.clone()
    };

    let lines: Vec<Line> = if app.cover_lines.is_empty() {
        vec![Line::from("No cover loaded, q returns.")]
    } else {
        app.cover_lines.iter().cloned().map(Line::from).collect()
    };

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, main);
    super::render_log_box(frame, log_area, app);
}

/// Grayscale the image and map brightness onto a character ramp. Terminal
/// cells are roughly twice as tall as wide, hence the 2x height scale.
fn image_to_ascii(img: DynamicImage, term_w: u16, term_h: u16) -> Vec<String> {
    const RAMP: &[u8] = b" .:-=+*#%@";

    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return Vec::new();
    }

    let max_width = term_w.saturating_sub(6).max(16) as u32;
    let max_height = term_h.saturating_sub(LOG_HEIGHT + 4).max(8) as u32;

    let target_width = max_width.min(w.max(1));
    let target_height = h
        .saturating_mul(target_width)
        .saturating_div(w.max(1).saturating_mul(2))
        .min(max_height);

    let gray = img
        .resize_exact(
            target_width.max(1),
            target_height.max(1),
            FilterType::Triangle,
        )
        .to_luma8();

    let mut lines = Vec::with_capacity(gray.height() as usize);
    for y in 0..gray.height() {
        let mut line = String::with_capacity(gray.width() as usize);
        for x in 0..gray.width() {
            let v = gray.get_pixel(x, y)[0] as f32 / 255.0;
            let idx = (v * (RAMP.len() as f32 - 1.0)).round() as usize;
            line.push(*RAMP.get(idx).unwrap_or(&b' ') as char);
        }
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::image_to_ascii;
    use image::{DynamicImage, RgbImage};

    #[test]
    fn renders_nonempty_lines_within_terminal_bounds() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(120, 180, |x, _| {
            image::Rgb([if x % 2 == 0 { 0 } else { 255 }; 3])
        }));
        let lines = image_to_ascii(img, 80, 40);
        assert!(!lines.is_empty());
        assert!(lines.len() <= 40);
        assert!(lines.iter().all(|l| l.chars().count() <= 74));
    }

    #[test]
    fn zero_sized_image_renders_nothing() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(0, 0));
        assert!(image_to_ascii(img, 80, 24).is_empty());
    }
}
