use anyhow::Result;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

const BAR_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

/// Builds the progress display shown while samples are assigned.
pub(crate) struct ProgressBarBuilder {
    style_template: &'static str,
    message: String,
    length: Option<u64>,
    enable_tick: bool,
    hidden: bool,
}

impl ProgressBarBuilder {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            style_template: "{spinner:.green} {msg}",
            message: message.into(),
            length: None,
            enable_tick: false,
            hidden: false,
        }
    }

    /// Switches from a spinner to a bar counting `len` items.
    pub(crate) fn with_length(mut self, len: u64) -> Self {
        self.style_template = BAR_TEMPLATE;
        self.length = Some(len);
        self
    }

    pub(crate) fn with_tick(mut self) -> Self {
        self.enable_tick = true;
        self
    }

    /// Draws nothing; used when stderr is taken by verbose logging.
    pub(crate) fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub(crate) fn build(self) -> Result<ProgressBar> {
        let pb = match self.length {
            Some(len) => ProgressBar::new(len),
            None => ProgressBar::new_spinner(),
        };

        let style = match self.length {
            Some(_) => ProgressStyle::default_bar()
                .template(self.style_template)?
                .progress_chars("#>-"),
            None => ProgressStyle::default_spinner().template(self.style_template)?,
        };
        pb.set_style(style);
        pb.set_message(self.message);

        if self.hidden {
            pb.set_draw_target(ProgressDrawTarget::hidden());
        } else if self.enable_tick {
            pb.enable_steady_tick(Duration::from_millis(200));
        }

        Ok(pb)
    }
}
