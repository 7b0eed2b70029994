//! Select Demo: runs each dialog in turn and prints the answers.
//!
//! Logs go to `casement-select.log`; set `CASEMENT_LOG=debug` for more.

use casement::{
    Confirm, MultiSelect, Result, SelectMenu, SelectableItem, Session, SessionConfig, TextPrompt,
};
use std::fs::File;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

fn init_logging() -> std::io::Result<()> {
    let file = File::create("casement-select.log")?;
    let filter = EnvFilter::try_from_env("CASEMENT_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    init_logging()?;

    let mut session = Session::stdio(SessionConfig::default())?;

    let languages: Vec<_> = [
        ("Rust", "rust", false),
        ("C", "c", false),
        ("COBOL (retired)", "cobol", true),
        ("Go", "go", false),
        ("Zig", "zig", false),
    ]
    .into_iter()
    .map(|(label, value, disabled)| SelectableItem::new(label, value).disabled(disabled))
    .collect();
    let language = SelectMenu::new("Favourite language", languages).run(&mut session)?;

    let toppings: Vec<_> = (1..=30)
        .map(|i| SelectableItem::new(format!("Topping #{i}"), i).disabled(i % 7 == 0))
        .collect();
    let chosen = MultiSelect::new("Pick 1 to 3 toppings", toppings)
        .min(1)
        .max(3)
        .run(&mut session)?;

    let name = TextPrompt::new("What should we call you?")
        .placeholder("anonymous")
        .validate(|v| {
            if v.chars().count() > 20 {
                Err("At most 20 characters".to_string())
            } else {
                Ok(())
            }
        })
        .run(&mut session)?;

    let save = Confirm::new("Save these answers?").default_answer(true).run(&mut session)?;
    drop(session);

    println!("language: {language:?}");
    println!("toppings: {chosen:?}");
    println!("name:     {name:?}");
    println!("saved:    {save}");
    Ok(())
}
