use std::{fs, path::Path};

pub const DEFAULT_WELCOME_TEXT: &str =
    "Hi! I'm your Cat Care Buddy \u{2014} Ask me anything about your feline friend! \u{1f43e}";

pub fn welcome_text() -> String {
    let welcome_file = Path::new("WELCOME_MESSAGE.md");
    match fs::read_to_string(welcome_file) {
        Ok(value) if !value.trim().is_empty() => value.trim().to_owned(),
        _ => DEFAULT_WELCOME_TEXT.to_owned(),
    }
}
