//! `TerminalReporter`: Presentation-layer implementation of `ProgressReporter`.
//!
//! Wraps `&OutputContext` and implements the `application::ports::ProgressReporter`
//! trait so application services can emit progress events without depending on
//! any presentation type directly.

use std::cell::RefCell;

use indicatif::ProgressBar;
use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::{OutputContext, progress};

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// - `step()` starts a spinner on a TTY, else prints `"  → {message}"`
/// - `success()` finishes the spinner, else prints `"  ✓ {message}"`
/// - `warn()` prints `"  ! {message}"` and is the only event shown when quiet
///
/// In JSON mode everything goes to stderr so stdout carries only the document.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    to_stderr: bool,
    active: RefCell<Option<ProgressBar>>,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext, to_stderr: bool) -> Self {
        Self {
            ctx,
            to_stderr,
            active: RefCell::new(None),
        }
    }

    fn print(&self, line: &str) {
        if self.to_stderr {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }

    fn spinners(&self) -> bool {
        !self.to_stderr && self.ctx.show_progress()
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        if self.ctx.quiet {
            return;
        }
        if let Some(pb) = self.active.borrow_mut().take() {
            progress::finish_plain(&pb);
        }
        if self.spinners() {
            *self.active.borrow_mut() = Some(progress::spinner(message));
        } else {
            self.print(&format!("  {} {message}", "→".cyan()));
        }
    }

    fn success(&self, message: &str) {
        if self.ctx.quiet {
            return;
        }
        match self.active.borrow_mut().take() {
            Some(pb) => progress::finish_ok(&pb, message),
            None => self.print(&format!("  {} {message}", "✓".green())),
        }
    }

    fn warn(&self, message: &str) {
        let line = format!("  {} {message}", "!".yellow());
        match self.active.borrow().as_ref() {
            Some(pb) => pb.suspend(|| eprintln!("{line}")),
            None => eprintln!("{line}"),
        }
    }
}

impl Drop for TerminalReporter<'_> {
    fn drop(&mut self) {
        if let Some(pb) = self.active.get_mut().take() {
            pb.finish_and_clear();
        }
    }
}
