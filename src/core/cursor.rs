// src/core/cursor.rs

/// The value of the argument under the cursor, before and after `value()`.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PendingValue {
    /// Whatever followed the first separator, still split (`--a=b=c` -> `["b", "c"]`).
    Fragments(Vec<String>),
    /// The answer of the first `value()` call, returned verbatim from then on.
    Resolved(Option<String>),
}

/// The read state of one walk over a token sequence.
///
/// `position` is the index the dispatch loop is at; it only moves forward,
/// except through [`Cursor::reset`]. `arg_index` remembers where the argument
/// currently being handled started, so look-ahead can be undone.
#[derive(Debug, Clone)]
pub struct Cursor {
    tokens: Vec<String>,
    separator: String,
    position: usize,
    arg_index: usize,
    written: String,
    key: String,
    pending: PendingValue,
}

impl Cursor {
    /// Creates a cursor at the first token.
    pub fn new(tokens: Vec<String>, separator: impl Into<String>) -> Self {
        Self {
            tokens,
            separator: separator.into(),
            position: 0,
            arg_index: 0,
            written: String::new(),
            key: String::new(),
            pending: PendingValue::Fragments(Vec::new()),
        }
    }

    /// Whether every token has been dispatched.
    pub fn is_exhausted(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// Starts handling the token at the current position: splits it on the
    /// separator and returns the key as written.
    pub fn enter(&mut self) -> String {
        self.arg_index = self.position;
        let token = self
            .tokens
            .get(self.position)
            .map(String::as_str)
            .unwrap_or_default();

        let (written, fragments) = if self.separator.is_empty() {
            (token.to_string(), Vec::new())
        } else {
            let mut parts = token.split(self.separator.as_str()).map(str::to_string);
            let written = parts.next().unwrap_or_default();
            (written, parts.collect())
        };

        self.key = written.clone();
        self.written = written.clone();
        self.pending = PendingValue::Fragments(fragments);
        written
    }

    /// Records the key reached after alias resolution.
    pub fn resolve_to(&mut self, key: impl Into<String>) {
        self.key = key.into();
    }

    /// Moves past the argument just handled.
    pub fn advance(&mut self) {
        self.position += 1;
    }

    /// Resolves the current argument's value.
    ///
    /// An inline value (`--name=cleo`) wins; extra separators are kept, so
    /// `--flag=a=b` yields `a=b`. Otherwise the token right after the argument
    /// is taken, unless it is missing or starts with `-`, in which case the
    /// argument has no value. A negative number therefore has to be written
    /// inline (`--offset=-3`).
    ///
    /// Taking the next token advances the position, unless it was already moved
    /// with [`Cursor::consume`]. Only the first call does any work.
    pub fn value(&mut self) -> Option<String> {
        let inline = match &self.pending {
            PendingValue::Resolved(value) => return value.clone(),
            PendingValue::Fragments(fragments) if !fragments.is_empty() => {
                Some(fragments.join(self.separator.as_str()))
            }
            PendingValue::Fragments(_) => None,
        };

        let resolved = match inline {
            Some(value) => Some(value),
            None => self.look_ahead(),
        };
        self.pending = PendingValue::Resolved(resolved.clone());
        resolved
    }

    fn look_ahead(&mut self) -> Option<String> {
        let next = self
            .tokens
            .get(self.arg_index + 1)
            .filter(|token| !token.starts_with('-'))
            .cloned()?;

        if self.position == self.arg_index {
            self.position += 1;
        }
        Some(next)
    }

    /// The token after the current position, without moving.
    pub fn peek(&self) -> Option<&str> {
        self.tokens.get(self.position + 1).map(String::as_str)
    }

    /// Whether a token exists after the current position.
    pub fn has_next(&self) -> bool {
        self.position + 1 < self.tokens.len()
    }

    /// Moves to the next token and returns it. Does nothing at the end.
    pub fn consume(&mut self) -> Option<&str> {
        if !self.has_next() {
            return None;
        }
        self.position += 1;
        self.tokens.get(self.position).map(String::as_str)
    }

    /// Every token after the current position.
    pub fn rest(&self) -> &[String] {
        self.tokens.get(self.position + 1..).unwrap_or_default()
    }

    /// Undoes any `consume()` made while handling the current argument.
    pub fn reset(&mut self) {
        self.position = self.arg_index;
    }

    /// All tokens of the walk.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// The full token of the current argument (e.g. `--use-strict=0`).
    pub fn raw(&self) -> &str {
        self.tokens
            .get(self.arg_index)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Where the current argument started.
    pub fn arg_index(&self) -> usize {
        self.arg_index
    }

    /// Where the walk currently is (moves with look-ahead and `consume()`).
    pub fn position(&self) -> usize {
        self.position
    }

    /// The key after alias resolution.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The key as it appeared in the token.
    pub fn written(&self) -> &str {
        &self.written
    }

    /// The active key/value separator.
    pub fn separator(&self) -> &str {
        &self.separator
    }
}
