use std::io::{self, Write};
use std::sync::OnceLock;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// The single progress line shown while a sweep runs. Its message is the
/// phase the engines last announced.
pub struct Progress {
    bar: ProgressBar,
}

impl Progress {
    pub fn set_phase(&self, phase: &str) {
        self.bar.set_message(phase.to_string());
    }

    #[cfg(test)]
    pub fn phase(&self) -> String {
        self.bar.message()
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    fn println(&self, line: &str) {
        self.bar.println(line);
    }

    /// No line on screen, so output has to go straight to stdout.
    pub fn is_detached(&self) -> bool {
        self.bar.is_hidden() || self.bar.is_finished()
    }
}

static PROGRESS: OnceLock<Progress> = OnceLock::new();

pub fn progress() -> &'static Progress {
    PROGRESS.get_or_init(init_progress)
}

fn init_progress() -> Progress {
    let bar = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.cyan} {elapsed:>4.dim} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["◜", "◠", "◝", "◞", "◡", "◟", "●"]);

    bar.set_style(style);
    bar.enable_steady_tick(Duration::from_millis(120));
    Progress { bar }
}

/// Routes subscriber output above the progress line.
pub struct SpinnerWriter;

impl Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        let progress = progress();
        if progress.is_detached() {
            io::stdout().write_all(buf)?;
            return Ok(buf.len());
        }

        let msg = String::from_utf8_lossy(buf);
        progress.println(msg.trim_end());
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}
