//! Plain line-based CLI (`old_cli` mode).
//!
//! Interacts over stdin/stdout only, which keeps it usable with screen
//! readers and in dumb terminals. Before prompting we restore the terminal
//! in case a previous run exited while the TUI held raw mode.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::event::DisableMouseCapture;
use crossterm::execute;
use crossterm::terminal::{LeaveAlternateScreen, disable_raw_mode};

use crate::base_system::context::Config;
use crate::openlibrary::client::{ClientOptions, OpenLibraryClient};
use crate::openlibrary::model::{Book, CoverSize};
use crate::openlibrary::request::{SearchField, SearchRequest};
use crate::search::notify::Notification;

const DETAIL_WRAP_COLUMNS: usize = 78;

pub fn run(config: &mut Config) -> Result<()> {
    let _ = disable_raw_mode();
    let mut out = io::stdout();
    let _ = execute!(out, DisableMouseCapture, LeaveAlternateScreen);

    println!(
        "Book Finder v{} (plain CLI)\n\
Search Open Library by book title or author name.\n\
Commands: t = search titles, a = search authors, q = quit.",
        env!("CARGO_PKG_VERSION")
    );

    let client = Arc::new(OpenLibraryClient::new(ClientOptions {
        request_timeout: config.timeout(),
        ..ClientOptions::default()
    })?);

    let mut field = config.default_field();

    loop {
        let prompt = format!("[search by {}] enter a term (t/a/q): ", field.label());
        let input = read_line(&prompt)?;
        let text = input.trim();

        match text {
            "" => continue,
            "q" | "Q" => return Ok(()),
            "t" => {
                field = SearchField::Title;
                println!("Now searching by title.");
            }
            "a" => {
                field = SearchField::Author;
                println!("Now searching by author.");
            }
            term => search_and_show(&client, term, field, config.cover_size())?,
        }
    }
}

fn search_and_show(
    client: &OpenLibraryClient,
    term: &str,
    field: SearchField,
    cover_size: CoverSize,
) -> Result<()> {
    let Ok(request) = SearchRequest::new(term, field) else {
        return Ok(());
    };

    println!("Searching books…");
    let results = match client.search(&request) {
        Ok(results) => results,
        Err(err) => {
            let n = Notification::search_failed();
            println!("{}: {} ({err})", n.title, n.description);
            return Ok(());
        }
    };

    if results.books.is_empty() {
        let n = Notification::no_results(request.term());
        println!("{}: {}", n.title, n.description);
        return Ok(());
    }

    let n = Notification::found(results.total, request.term());
    println!("{}: {}", n.title, n.description);
    for (idx, book) in results.books.iter().enumerate() {
        let year = book
            .first_publish_year
            .map(|y| format!(" ({y})"))
            .unwrap_or_default();
        println!(
            "{:>3}. {}{} — {}",
            idx + 1,
            book.title,
            year,
            book.authors_display()
        );
    }

    let picked = read_line("number for details, Enter to continue: ")?;
    if let Ok(idx) = picked.trim().parse::<usize>()
        && idx >= 1
        && idx <= results.books.len()
    {
        print_detail(&results.books[idx - 1], cover_size);
    }
    Ok(())
}

fn print_detail(book: &Book, cover_size: CoverSize) {
    println!("----");
    println!("Title:   {}", book.title);
    println!("Authors: {}", book.authors_display());
    if let Some(year) = book.first_publish_year {
        println!("First published: {year}");
    }
    let subjects = book.subjects_display();
    if !subjects.is_empty() {
        let joined = subjects.join(", ");
        for (i, line) in textwrap::wrap(&joined, DETAIL_WRAP_COLUMNS).iter().enumerate() {
            if i == 0 {
                println!("Subjects: {line}");
            } else {
                println!("          {line}");
            }
        }
    }
    match book.cover_url(cover_size) {
        Some(url) => println!("Cover:   {url}"),
        None => println!("Cover:   none"),
    }
    println!("Catalog: {}", book.key);
    println!("----");
}

fn read_line(prompt: &str) -> Result<String> {
    print!("{prompt}");
    io::stdout().flush().context("flush stdout")?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("read stdin")?;
    Ok(line)
}
