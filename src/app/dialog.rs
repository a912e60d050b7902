use crate::error::{ErrorKind, Result};

/// Modal form with a single text field (add course, request course).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dialog {
    open: bool,
    input: String,
}

impl Dialog {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    /// Closes the dialog and drops whatever was typed. No request is made.
    pub fn cancel(&mut self) {
        self.open = false;
        self.input.clear();
    }

    pub(crate) fn close(&mut self) {
        self.cancel();
    }

    /// The trimmed input, ready to send.
    pub fn submission(&self) -> Result<String> {
        if !self.open {
            return Err(ErrorKind::ParseError("Dialog is not open".to_string()).into());
        }
        let value = self.input.trim();
        if value.is_empty() {
            return Err(ErrorKind::ParseError("Course name must not be empty".to_string()).into());
        }
        Ok(value.to_string())
    }
}
