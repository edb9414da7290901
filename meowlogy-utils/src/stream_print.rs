/// Tracks what has already been written for a message whose text is replaced
/// wholesale on every update, so only the new suffix needs printing.
#[derive(Clone, Debug, Default)]
pub struct StreamPrinter {
    shown: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PrintStep {
    /// Nothing new since the last update.
    Unchanged,
    /// The text grew; print this suffix.
    Append(String),
    /// The text no longer extends what was shown; start a fresh line with all of it.
    Rewrite(String),
}

impl StreamPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, text: &str) -> PrintStep {
        if text == self.shown {
            return PrintStep::Unchanged;
        }

        let step = match text.strip_prefix(self.shown.as_str()) {
            Some(suffix) => PrintStep::Append(suffix.to_owned()),
            None => PrintStep::Rewrite(text.to_owned()),
        };
        self.shown.clear();
        self.shown.push_str(text);
        step
    }

    pub fn shown(&self) -> &str {
        &self.shown
    }

    pub fn reset(&mut self) {
        self.shown.clear();
    }
}
