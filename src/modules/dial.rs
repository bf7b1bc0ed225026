//! Interactive keypad in the terminal.
//! Typed keys are previewed on the output device and Enter saves the dialed number.

use std::{
    fmt,
    io::{stdout, Write},
    path::PathBuf,
    thread::JoinHandle,
};

use anyhow::Result;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue, style, terminal,
};
use tracing::warn;

use crate::coding::KeypadSymbol;

use super::{generate, InitContext, Module};

pub struct Dial {
    ctx: InitContext,
    output: PathBuf,
}

/// The number being dialed.
#[derive(Debug, Default)]
pub struct Dialer {
    symbols: Vec<KeypadSymbol>,
}

#[derive(Debug, PartialEq, Eq)]
enum Action {
    Press(KeypadSymbol),
    Delete,
    Save,
    Quit,
    Ignore,
}

/// Puts the terminal in raw mode until dropped.
struct RawTerminal;

impl Dial {
    pub fn new(ctx: InitContext) -> Result<Self> {
        Ok(Self {
            output: ctx.output_path(),
            ctx,
        })
    }

    fn save(&self, dialer: &Dialer) -> String {
        match generate::save(&self.output, dialer.symbols(), &self.ctx.config) {
            Ok(size) => format!("saved {size} bytes to `{}`", self.output.display()),
            Err(err) => format!("error: {err:#}"),
        }
    }
}

impl Module for Dial {
    fn name(&self) -> &'static str {
        "Dial"
    }

    fn run(&self) -> Result<()> {
        // Previews are best effort, dialing works without a device
        let speaker = match self.ctx.speaker() {
            Ok(i) => Some(i),
            Err(err) => {
                warn!("Key previews disabled: {err:#}");
                None
            }
        };

        println!(
            "[*] Keys 0-9 * # dial, Backspace deletes, Enter saves to `{}`, Esc quits",
            self.output.display()
        );

        let _terminal = RawTerminal::enter()?;
        let mut stdout = stdout();
        let mut dialer = Dialer::default();
        let mut previews = Vec::new();
        draw(&mut stdout, &dialer, None)?;

        loop {
            let key = match event::read()? {
                Event::Key(key) => key,
                _ => continue,
            };

            // Nothing may log in raw mode, failed previews are shown on the status line
            let status = match action(key) {
                Action::Press(symbol) => {
                    dialer.press(symbol);
                    let status = preview_status(&mut previews);
                    if let Some(speaker) = &speaker {
                        previews.push(speaker.preview(symbol));
                    }
                    status
                }
                Action::Delete => {
                    dialer.delete();
                    preview_status(&mut previews)
                }
                Action::Save => Some(self.save(&dialer)),
                Action::Quit => break,
                Action::Ignore => continue,
            };

            draw(&mut stdout, &dialer, status.as_deref())?;
        }

        queue!(stdout, style::Print("\r\n"))?;
        stdout.flush()?;
        Ok(())
    }
}

impl Dialer {
    pub fn press(&mut self, symbol: KeypadSymbol) {
        self.symbols.push(symbol);
    }

    /// Removes the last key, if any.
    pub fn delete(&mut self) -> Option<KeypadSymbol> {
        self.symbols.pop()
    }

    pub fn symbols(&self) -> &[KeypadSymbol] {
        &self.symbols
    }
}

impl fmt::Display for Dialer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.symbols.iter().try_for_each(|x| write!(f, "{x}"))
    }
}

impl RawTerminal {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), cursor::Hide)?;
        Ok(Self)
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        let _ = execute!(stdout(), cursor::Show);
        let _ = terminal::disable_raw_mode();
    }
}

fn action(key: KeyEvent) -> Action {
    if key.kind == KeyEventKind::Release {
        return Action::Ignore;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Esc | KeyCode::Char('q') => Action::Quit,
        KeyCode::Backspace | KeyCode::Delete => Action::Delete,
        KeyCode::Enter => Action::Save,
        KeyCode::Char(chr) => KeypadSymbol::from_char(chr).map_or(Action::Ignore, Action::Press),
        _ => Action::Ignore,
    }
}

/// Reaps finished previews, returning the first failure.
/// Previews still playing are left running.
fn preview_status(previews: &mut Vec<JoinHandle<Result<()>>>) -> Option<String> {
    let (done, running) = previews
        .drain(..)
        .partition::<Vec<_>, _>(|x| x.is_finished());
    *previews = running;

    done.into_iter().find_map(|x| match x.join() {
        Ok(Ok(())) => None,
        Ok(Err(err)) => Some(format!("error: {err:#}")),
        Err(_) => Some("error: preview thread panicked".to_owned()),
    })
}

fn draw(out: &mut impl Write, dialer: &Dialer, status: Option<&str>) -> Result<()> {
    queue!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(terminal::ClearType::CurrentLine),
        style::Print(format!("> {dialer}"))
    )?;

    if let Some(status) = status {
        queue!(out, style::Print(format!("  [{status}]")))?;
    }

    out.flush()?;
    Ok(())
}
