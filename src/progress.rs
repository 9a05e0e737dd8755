use crate::github::RequestCategory;
use crate::report::Palette;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::cell::RefCell;
use std::time::Duration;

/// Observer for the fetch pipeline. Has no influence on what is fetched.
pub trait Progress {
    fn on_request(&self, _category: RequestCategory, _remaining: u32, _url: &str) {}
    fn on_wait(&self, _wait: Duration) {}
    fn begin(&self, _message: &str, _total: u64) {}
    fn advance(&self) {}
    fn finish(&self, _message: &str) {}
}

pub struct Silent;

impl Progress for Silent {}

/// Prints one styled line per request to stderr, and a progress bar
/// for the long per-file phases.
pub struct ConsoleProgress {
    palette: Palette,
    bar: RefCell<Option<ProgressBar>>,
}

impl ConsoleProgress {
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            bar: RefCell::new(None),
        }
    }

    fn emit(&self, line: String) {
        match self.bar.borrow().as_ref() {
            Some(bar) => bar.println(line),
            None => eprintln!("{line}"),
        }
    }
}

impl Progress for ConsoleProgress {
    fn on_request(&self, category: RequestCategory, remaining: u32, url: &str) {
        // The bar already reports per-file progress.
        if self.bar.borrow().is_some() {
            return;
        }
        self.emit(format!(
            "{} {} {}",
            self.palette.highlight.apply_to(format!("[{remaining}]")),
            self.palette.label.apply_to(category),
            self.palette.subtle.apply_to(url)
        ));
    }

    fn on_wait(&self, wait: Duration) {
        self.emit(format!(
            "{} {} {}",
            self.palette.error.apply_to("Rate Limit Hit:"),
            self.palette.subtle.apply_to("Waiting For"),
            self.palette.subtle.apply_to(format!("{}s", wait.as_secs()))
        ));
    }

    fn begin(&self, message: &str, total: u64) {
        let bar = ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::stderr());
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{bar:40}] {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        bar.set_message(message.to_string());
        *self.bar.borrow_mut() = Some(bar);
    }

    fn advance(&self) {
        if let Some(bar) = self.bar.borrow().as_ref() {
            bar.inc(1);
        }
    }

    fn finish(&self, message: &str) {
        if let Some(bar) = self.bar.borrow_mut().take() {
            bar.finish_with_message(message.to_string());
        }
    }
}
