//! # Message Templates
//!
//! Rule failures carry a raw pattern such as `"{0} must not be empty"`. Patterns
//! are compiled once into a [`MessageTemplate`] and cached by their exact text.
//!
//! ## Pattern syntax
//!
//! * `{n}` inserts positional argument `n`. `{n,type}` and `{n,type,style}` are
//!   accepted; the format type is ignored and the argument's `Display` output is used.
//! * `'...'` quotes literal text, so `'{0}'` renders as `{0}`.
//! * `''` is a literal single quote, inside or outside a quoted run.
//! * A `}` outside an argument is literal text.
//! * An argument index with no matching value renders as `{n}`.

use crate::error::RulebookError;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::fmt::{self, Display, Write};
use std::sync::Arc;
use tracing::{debug, trace};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Argument(usize),
}

/// A compiled message pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    segments: Vec<Segment>,
}

impl MessageTemplate {
    /// Compiles `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`RulebookError::InvalidTemplate`] for an unterminated `{` or an
    /// argument index that is not a non-negative integer.
    pub fn compile(pattern: &str) -> Result<Self, RulebookError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut quoted = false;
        let mut chars = pattern.char_indices().peekable();

        while let Some((_, c)) = chars.next() {
            match c {
                '\'' if chars.peek().is_some_and(|&(_, next)| next == '\'') => {
                    chars.next();
                    literal.push('\'');
                },
                '\'' => quoted = !quoted,
                '{' if !quoted => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    let body = argument_body(pattern, &mut chars)?;
                    segments.push(Segment::Argument(argument_index(pattern, body)?));
                },
                other => literal.push(other),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    /// Applies positional `args`.
    ///
    /// # Panics
    ///
    /// Panics if an argument's `Display` impl returns an error, as `format!` does.
    /// [`TemplateCache::render`] reports that case as an error instead.
    #[must_use]
    pub fn format(&self, args: &[&dyn Display]) -> String {
        self.apply(args).to_string()
    }

    /// A lazily formatted view of this template with `args` applied.
    #[must_use]
    pub const fn apply<'a>(&'a self, args: &'a [&'a dyn Display]) -> Applied<'a> {
        Applied { template: self, args }
    }

    /// Highest argument index referenced, if any.
    #[must_use]
    pub fn max_argument(&self) -> Option<usize> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Argument(index) => Some(*index),
                Segment::Literal(_) => None,
            })
            .max()
    }
}

/// A [`MessageTemplate`] bound to its arguments; see [`MessageTemplate::apply`].
#[derive(Clone, Copy)]
pub struct Applied<'a> {
    template: &'a MessageTemplate,
    args: &'a [&'a dyn Display],
}

impl Display for Applied<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.template.segments {
            match segment {
                Segment::Literal(text) => f.write_str(text)?,
                Segment::Argument(index) => match self.args.get(*index) {
                    Some(arg) => write!(f, "{arg}")?,
                    None => write!(f, "{{{index}}}")?,
                },
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Applied<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Applied")
            .field("template", self.template)
            .field("args", &self.args.len())
            .finish()
    }
}

/// Consumes an argument after its opening `{` and returns the text between the
/// braces. Nested braces (as used by format styles) are balanced; quoted braces
/// do not count.
fn argument_body<'p>(
    pattern: &'p str,
    chars: &mut std::iter::Peekable<std::str::CharIndices<'p>>,
) -> Result<&'p str, RulebookError> {
    let start = chars.peek().map_or(pattern.len(), |&(i, _)| i);
    let mut depth = 0usize;
    let mut quoted = false;

    while let Some((i, c)) = chars.next() {
        match c {
            '\'' if chars.peek().is_some_and(|&(_, next)| next == '\'') => {
                chars.next();
            },
            '\'' => quoted = !quoted,
            _ if quoted => {},
            '{' => depth += 1,
            '}' if depth == 0 => return Ok(&pattern[start..i]),
            '}' => depth -= 1,
            _ => {},
        }
    }

    Err(RulebookError::invalid_template(pattern, "Unmatched braces in the pattern"))
}

fn argument_index(pattern: &str, body: &str) -> Result<usize, RulebookError> {
    let index = body.split(',').next().unwrap_or_default().trim();
    if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RulebookError::invalid_template(
            pattern,
            format!("Can't parse argument number: {index}"),
        ));
    }
    index
        .parse()
        .map_err(|_| RulebookError::invalid_template(pattern, "Argument number out of range"))
}

/// Pattern-keyed cache of compiled templates.
///
/// Entries are inserted once and never removed. When two threads compile the
/// same pattern concurrently the first insert is kept; both compiled values
/// are identical.
#[derive(Debug, Default)]
pub struct TemplateCache {
    templates: RwLock<FxHashMap<Arc<str>, Arc<MessageTemplate>>>,
}

impl TemplateCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the compiled template for `pattern`, compiling it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`RulebookError::InvalidTemplate`] if `pattern` does not compile.
    /// Invalid patterns are not cached.
    pub fn template(&self, pattern: &str) -> Result<Arc<MessageTemplate>, RulebookError> {
        if let Some(template) = self.templates.read().get(pattern) {
            trace!(pattern, "Template cache hit");
            return Ok(Arc::clone(template));
        }

        let compiled = Arc::new(MessageTemplate::compile(pattern)?);
        debug!(pattern, segments = compiled.segments.len(), "Compiled message template");

        let mut templates = self.templates.write();
        let template = Arc::clone(templates.entry(Arc::from(pattern)).or_insert(compiled));
        drop(templates);

        Ok(template)
    }

    /// Formats `pattern` with positional `args`.
    ///
    /// # Errors
    ///
    /// Returns [`RulebookError::InvalidTemplate`] if `pattern` does not compile,
    /// and [`RulebookError::Internal`] if an argument fails to format.
    pub fn render(&self, pattern: &str, args: &[&dyn Display]) -> Result<String, RulebookError> {
        let mut out = String::new();
        self.render_into(&mut out, pattern, args)?;
        Ok(out)
    }

    /// Like [`TemplateCache::render`], appending to `out` instead of allocating.
    pub(crate) fn render_into(
        &self,
        out: &mut String,
        pattern: &str,
        args: &[&dyn Display],
    ) -> Result<(), RulebookError> {
        let template = self.template(pattern)?;
        write!(out, "{}", template.apply(args)).map_err(|_| RulebookError::Internal {
            message: "a message argument failed to format".into(),
            context: Some(pattern.to_owned().into()),
        })
    }

    /// Number of distinct patterns compiled so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.read().is_empty()
    }
}
