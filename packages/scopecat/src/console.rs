//! User-facing output and confirmation prompts.
//!
//! Catalogs report through a [`Console`] rather than printing directly, so
//! that embedding code and tests can capture what would have been shown.

use std::cell::RefCell;
use std::io::{self, BufRead, Write};

use color_print::{ceprintln, cprint};

/// Receives catalog messages and answers confirmation prompts.
pub trait Console {
    /// Show an informational message.
    fn message(&self, text: &str);

    /// Show an error.
    fn error(&self, text: &str);

    /// Ask a yes/no question; `true` means the user agreed.
    fn confirm(&self, prompt: &str) -> bool;
}

impl<C: Console + ?Sized> Console for &C {
    fn message(&self, text: &str) {
        (**self).message(text)
    }

    fn error(&self, text: &str) {
        (**self).error(text)
    }

    fn confirm(&self, prompt: &str) -> bool {
        (**self).confirm(prompt)
    }
}

/// Talks to the user on stdout, stderr and stdin.
#[derive(Debug, Clone, Copy, Default)]
pub struct Terminal;

impl Console for Terminal {
    fn message(&self, text: &str) {
        println!("{text}");
    }

    fn error(&self, text: &str) {
        ceprintln!("<red><bold>error:</bold></red> {}", text);
    }

    fn confirm(&self, prompt: &str) -> bool {
        cprint!("<bold>{}?</bold> [y/N] ", prompt);
        if let Err(error) = io::stdout().flush() {
            tracing::warn!(?error, "flush stdout");
        }

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(_) => matches!(line.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(error) => {
                tracing::warn!(?error, "read confirmation");
                false
            }
        }
    }
}

/// Keeps everything in memory and answers prompts with a fixed reply.
#[derive(Debug, Default)]
pub struct Recorder {
    answer: bool,
    messages: RefCell<Vec<String>>,
    errors: RefCell<Vec<String>>,
    prompts: RefCell<Vec<String>>,
}

impl Recorder {
    /// A recorder that answers every prompt with `answer`.
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            ..Self::default()
        }
    }

    /// Messages received so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    /// Errors received so far.
    pub fn errors(&self) -> Vec<String> {
        self.errors.borrow().clone()
    }

    /// Prompts asked so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }
}

impl Console for Recorder {
    fn message(&self, text: &str) {
        self.messages.borrow_mut().push(text.to_string());
    }

    fn error(&self, text: &str) {
        self.errors.borrow_mut().push(text.to_string());
    }

    fn confirm(&self, prompt: &str) -> bool {
        self.prompts.borrow_mut().push(prompt.to_string());
        self.answer
    }
}
