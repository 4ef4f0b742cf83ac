use std::sync::{Mutex, PoisonError};

use console::{Term, style};

/// Colour hint for a console line; sinks are free to ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Ok,
    Warn,
    Error,
    Info,
    Plain,
}

/// Where classified lines and the transient status line go.
///
/// Calls may arrive from the dispatch path and the progress ticker at the
/// same time; implementations serialise them.
pub trait StatusSink: Send + Sync {
    /// Erase the transient status line, if one is showing.
    fn clear_line(&self);

    /// Print a permanent line.
    fn write_line(&self, tone: Tone, line: &str);

    /// Replace the transient status line.
    fn write_status(&self, status: &str);

    /// Erase the status line and print `line` with no status redraw between.
    ///
    /// Sinks shared with a ticker must override this to do both under one
    /// lock.
    fn print_line(&self, tone: Tone, line: &str) {
        self.clear_line();
        self.write_line(tone, line);
    }
}

/// Terminal sink on stdout.
///
/// The status line is only drawn when stdout is a terminal, so redirected
/// output holds nothing but result lines.
pub struct TermSink {
    term:   Term,
    colors: bool,
    lock:   Mutex<()>,
}

impl TermSink {
    pub fn stdout(colors: bool) -> Self {
        Self {
            term: Term::stdout(),
            colors,
            lock: Mutex::new(()),
        }
    }

    pub fn paint(&self, tone: Tone, line: &str) -> String {
        if !self.colors {
            return line.to_string();
        }
        match tone {
            Tone::Ok => style(line).green().to_string(),
            Tone::Warn => style(line).yellow().to_string(),
            Tone::Error => style(line).red().to_string(),
            Tone::Info => style(line).cyan().to_string(),
            Tone::Plain => line.to_string(),
        }
    }
}

impl StatusSink for TermSink {
    fn clear_line(&self) {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        if self.term.is_term() {
            let _ = self.term.clear_line();
        }
    }

    fn write_line(&self, tone: Tone, line: &str) {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = self.term.write_line(&self.paint(tone, line));
    }

    fn write_status(&self, status: &str) {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.term.is_term() {
            return;
        }
        let _ = self.term.clear_line();
        let _ = self.term.write_str(&self.paint(Tone::Info, status));
        let _ = self.term.flush();
    }

    fn print_line(&self, tone: Tone, line: &str) {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        if self.term.is_term() {
            let _ = self.term.clear_line();
        }
        let _ = self.term.write_line(&self.paint(tone, line));
    }
}

/// Sink that remembers everything written, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines:    Mutex<Vec<String>>,
    statuses: Mutex<Vec<String>>,
    clears:   Mutex<usize>,
}

impl MemorySink {
    pub fn new() -> Self { Self::default() }

    pub fn lines(&self) -> Vec<String> { self.lines.lock().unwrap_or_else(PoisonError::into_inner).clone() }

    pub fn statuses(&self) -> Vec<String> {
        self.statuses.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn clears(&self) -> usize { *self.clears.lock().unwrap_or_else(PoisonError::into_inner) }
}

impl StatusSink for MemorySink {
    fn clear_line(&self) { *self.clears.lock().unwrap_or_else(PoisonError::into_inner) += 1; }

    fn write_line(&self, _tone: Tone, line: &str) {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).push(line.to_string());
    }

    fn write_status(&self, status: &str) {
        self.statuses.lock().unwrap_or_else(PoisonError::into_inner).push(status.to_string());
    }
}
