//! Interactive password input on the terminal.

use std::{error::Error, io::Write};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal::{self, ClearType},
};

type PromptResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

const MAX_ATTEMPTS: usize = 3;

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> PromptResult<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Print `message` on its own line, over whatever the prompt left there.
fn notice(out: &mut impl Write, message: &str) -> PromptResult<()> {
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(message),
        Print("\r\n")
    )?;
    Ok(())
}

/// Read one line without echoing it. Each typed character shows as `*`.
fn read_hidden(prompt: &str) -> PromptResult<String> {
    let _raw = RawModeGuard::enter()?;

    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(prompt)
    )?;

    let mut buf = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };
        let ctrl = modifiers.contains(KeyModifiers::CONTROL);

        match code {
            KeyCode::Enter => {
                execute!(out, Print("\r\n"))?;
                return Ok(buf);
            }
            KeyCode::Backspace => {
                if buf.pop().is_some() {
                    execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
                }
            }
            KeyCode::Char('c') if ctrl => {
                execute!(out, Print("\r\n"))?;
                return Err("interrupted".into());
            }
            KeyCode::Char(ch) if !ctrl => {
                buf.push(ch);
                execute!(out, Print("*"))?;
            }
            _ => {}
        }
    }
}

/// Ask for a new password and its confirmation.
pub fn new_password() -> PromptResult<String> {
    let mut out = std::io::stderr();
    for _ in 0..MAX_ATTEMPTS {
        let password = read_hidden("Password: ")?;
        if password.is_empty() {
            notice(&mut out, "Password must not be empty.")?;
            continue;
        }

        if read_hidden("Confirm password: ")? == password {
            return Ok(password);
        }
        notice(&mut out, "Passwords do not match. Try again.")?;
    }

    Err("too many attempts".into())
}
