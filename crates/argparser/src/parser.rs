use std::fmt;

use crate::error::{ArgError, Result};
use crate::help;
use crate::registry::Registry;
use crate::schema::{self, ParserSchema};
use crate::settings::{ArgValue, ArgumentSettings, Binding, DefaultValue, ValueKind};
use crate::tokens::{Token, classify, is_option};

/// Returned by [`ArgParser::get_int`] when no integer can be produced.
pub const INT_SENTINEL: i32 = -1;

/// How a lookup names an argument.
///
/// A `Name` may be the canonical name, a one-character alias, or a whole
/// token such as `--input=a.txt` (dashes and the `=value` suffix are stripped).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKey<'a> {
    Name(&'a str),
    Alias(char),
}

impl<'a> From<&'a str> for ArgKey<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

impl<'a> From<&'a String> for ArgKey<'a> {
    fn from(name: &'a String) -> Self {
        Self::Name(name.as_str())
    }
}

impl From<char> for ArgKey<'_> {
    fn from(alias: char) -> Self {
        Self::Alias(alias)
    }
}

impl fmt::Display for ArgKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Alias(ch) => write!(f, "-{ch}"),
        }
    }
}

/// Result of handling one token group.
enum Step {
    /// Keep scanning; `false` flips the final verdict.
    Done(bool),
    /// The help argument was seen.
    Help,
}

/// Argument declarations plus the state accumulated by parsing.
///
/// Declaration methods return `&mut Self` and modifiers (`multi_value`,
/// `store_value`, `positional`, ...) apply to the most recently declared
/// argument. Misuse does not panic: the first problem is kept and returned by
/// the next [`ArgParser::parse`].
#[derive(Debug)]
pub struct ArgParser {
    name: String,
    registry: Registry,
    help_requested: bool,
    declaration_error: Option<ArgError>,
}

impl ArgParser {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            registry: Registry::default(),
            help_requested: false,
            declaration_error: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_string(&mut self, name: &str, description: &str) -> &mut Self {
        self.declare(ValueKind::String, name, None, description)
    }

    pub fn add_string_short(&mut self, short: char, name: &str, description: &str) -> &mut Self {
        self.declare(ValueKind::String, name, Some(short), description)
    }

    pub fn add_int(&mut self, name: &str, description: &str) -> &mut Self {
        self.declare(ValueKind::Int, name, None, description)
    }

    pub fn add_int_short(&mut self, short: char, name: &str, description: &str) -> &mut Self {
        self.declare(ValueKind::Int, name, Some(short), description)
    }

    /// A flag without an alias must appear unless it has a default.
    pub fn add_flag(&mut self, name: &str, description: &str) -> &mut Self {
        self.declare(ValueKind::Flag, name, None, description)
    }

    pub fn add_flag_short(&mut self, short: char, name: &str, description: &str) -> &mut Self {
        self.declare(ValueKind::Flag, name, Some(short), description)
    }

    /// Declare the help flag. Seeing it anywhere ends the parse with success.
    ///
    /// `description` is the program description shown at the top of the help text.
    pub fn add_help(&mut self, short: char, name: &str, description: &str) -> &mut Self {
        self.declare(ValueKind::Flag, name, Some(short), description);
        self.registry.designate_help(name);
        self
    }

    /// Accept repeated values; at least `min_count` are required by the end of parsing.
    pub fn multi_value(&mut self, min_count: usize) -> &mut Self {
        self.configure("multi_value", |arg| {
            if arg.kind() == ValueKind::Flag {
                return Err(ArgError::Declaration(format!(
                    "flag '{}' cannot take multiple values",
                    arg.name()
                )));
            }
            arg.set_multi_value(min_count);
            Ok(())
        })
    }

    /// Write the value of a single-value argument into `slot`.
    pub fn store_value<T: ArgValue>(&mut self, slot: &Binding<T>) -> &mut Self {
        self.configure("store_value", |arg| arg.bind_value(slot))
    }

    /// Append every value of a multi-value argument to `slot`.
    pub fn store_values<T: ArgValue>(&mut self, slot: &Binding<Vec<T>>) -> &mut Self {
        self.configure("store_values", |arg| {
            if arg.kind() == ValueKind::Flag {
                return Err(ArgError::Declaration(format!(
                    "flag '{}' cannot store a sequence",
                    arg.name()
                )));
            }
            arg.bind_values(slot)
        })
    }

    /// Route bare tokens to the last declared argument.
    pub fn positional(&mut self) -> &mut Self {
        let err = match self.registry.last_added_mut() {
            None => Some(no_argument("positional")),
            Some(arg) if arg.kind() == ValueKind::Flag => Some(ArgError::Declaration(format!(
                "flag '{}' cannot be positional",
                arg.name()
            ))),
            Some(_) => None,
        };
        match err {
            Some(err) => self.record(err),
            None => {
                self.registry.set_positional();
            }
        }
        self
    }

    /// Give the last declared argument a default; it no longer has to appear.
    pub fn default_value(&mut self, value: impl Into<DefaultValue>) -> &mut Self {
        let value = value.into();
        self.configure("default_value", |arg| arg.set_default(value))
    }

    /// Parse an argv-style token list. The first token (program name) is skipped.
    ///
    /// Returns `Ok(true)` when every declared argument is satisfied, or as
    /// soon as the help argument is seen. `Ok(false)` means some argument is
    /// missing, a multi-value argument has too few values, a value-taking
    /// option had no value, or a bare token had nowhere to go. Errors are
    /// fatal: an undeclared option, a malformed integer, or an earlier
    /// declaration mistake.
    pub fn parse<I, S>(&mut self, args: I) -> Result<bool>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let owned: Vec<S> = args.into_iter().collect();
        let tokens: Vec<&str> = owned.iter().map(|s| s.as_ref()).collect();
        self.parse_tokens(&tokens)
    }

    /// Parse a whitespace-separated command line, program name first.
    pub fn parse_line(&mut self, line: &str) -> Result<bool> {
        self.parse(line.split_whitespace())
    }

    /// Whether the help argument was seen by a parse.
    pub fn help_requested(&self) -> bool {
        self.help_requested
    }

    /// Render the help text.
    pub fn help_description(&self) -> String {
        help::render(&self.schema())
    }

    /// Snapshot of the declarations.
    pub fn schema(&self) -> ParserSchema {
        schema::build(&self.name, &self.registry)
    }

    /// Forget all parse results. Defaults, declarations and bindings stay;
    /// values already written into bindings are left untouched.
    pub fn reset(&mut self) {
        self.help_requested = false;
        for arg in self.registry.iter_mut() {
            arg.reset();
        }
    }

    /// Typed lookup; fails on unknown names, kind mismatch, or a missing value.
    pub fn get<'k, T: ArgValue>(&self, key: impl Into<ArgKey<'k>>, index: usize) -> Result<T> {
        self.lookup(key.into())?.get(index)
    }

    /// All stored values of an argument (the single value for scalars).
    pub fn get_all<'k, T: ArgValue>(&self, key: impl Into<ArgKey<'k>>) -> Result<Vec<T>> {
        self.lookup(key.into())?.get_all()
    }

    /// A flag that was never set reads as `false` unless it has a default.
    pub fn try_get_flag<'k>(&self, key: impl Into<ArgKey<'k>>) -> Result<bool> {
        match self.get::<bool>(key, 0) {
            Err(ArgError::MissingValue { .. }) => Ok(false),
            other => other,
        }
    }

    pub fn try_get_int<'k>(&self, key: impl Into<ArgKey<'k>>, index: usize) -> Result<i32> {
        self.get(key, index)
    }

    pub fn try_get_string<'k>(&self, key: impl Into<ArgKey<'k>>, index: usize) -> Result<String> {
        self.get(key, index)
    }

    /// `false` for unknown arguments and non-flags.
    pub fn get_flag<'k>(&self, key: impl Into<ArgKey<'k>>) -> bool {
        self.try_get_flag(key).unwrap_or(false)
    }

    /// [`INT_SENTINEL`] when the value cannot be produced.
    pub fn get_int<'k>(&self, key: impl Into<ArgKey<'k>>, index: usize) -> i32 {
        self.try_get_int(key, index).unwrap_or(INT_SENTINEL)
    }

    /// Empty string when the value cannot be produced.
    pub fn get_string<'k>(&self, key: impl Into<ArgKey<'k>>, index: usize) -> String {
        self.try_get_string(key, index).unwrap_or_default()
    }

    pub fn get_ints<'k>(&self, key: impl Into<ArgKey<'k>>) -> Vec<i32> {
        self.get_all(key).unwrap_or_default()
    }

    pub fn get_strings<'k>(&self, key: impl Into<ArgKey<'k>>) -> Vec<String> {
        self.get_all(key).unwrap_or_default()
    }

    /// Number of values accumulated by a multi-value argument over all parses.
    pub fn value_count<'k>(&self, key: impl Into<ArgKey<'k>>) -> usize {
        self.lookup(key.into()).map(|arg| arg.count()).unwrap_or(0)
    }

    fn declare(
        &mut self,
        kind: ValueKind,
        name: &str,
        short: Option<char>,
        description: &str,
    ) -> &mut Self {
        tracing::trace!(argument = name, ?short, %kind, "declaring argument");
        self.registry.declare(kind, name, short, description);
        self
    }

    fn configure<F>(&mut self, modifier: &str, f: F) -> &mut Self
    where
        F: FnOnce(&mut ArgumentSettings) -> Result<()>,
    {
        let result = match self.registry.last_added_mut() {
            Some(arg) => f(arg),
            None => Err(no_argument(modifier)),
        };
        if let Err(err) = result {
            self.record(err);
        }
        self
    }

    fn record(&mut self, err: ArgError) {
        tracing::warn!(
            error = %err,
            last_declared = ?self.registry.last_added(),
            "invalid argument declaration"
        );
        if self.declaration_error.is_none() {
            self.declaration_error = Some(err);
        }
    }

    fn lookup(&self, key: ArgKey<'_>) -> Result<&ArgumentSettings> {
        let name = match key {
            ArgKey::Name(name) => self.registry.resolve(name),
            ArgKey::Alias(ch) => self.registry.resolve_alias(ch),
        };
        name.and_then(|name| self.registry.get(name))
            .ok_or_else(|| ArgError::UnknownArgument(key.to_string()))
    }

    fn arg_mut(&mut self, name: &str) -> Result<&mut ArgumentSettings> {
        self.registry
            .get_mut(name)
            .ok_or_else(|| ArgError::UnknownArgument(name.to_string()))
    }

    fn resolve_alias(&self, ch: char) -> Result<String> {
        self.registry
            .resolve_alias(ch)
            .map(str::to_string)
            .ok_or_else(|| ArgError::UnknownArgument(format!("-{ch}")))
    }

    fn parse_tokens(&mut self, tokens: &[&str]) -> Result<bool> {
        if let Some(err) = &self.declaration_error {
            return Err(err.clone());
        }
        if tokens.is_empty() {
            return Ok(false);
        }

        let mut ok = true;
        let mut i = 1usize;
        while i < tokens.len() {
            let step = match classify(tokens[i]) {
                Token::Long { name, value } => self.process_long(tokens, &mut i, name, value)?,
                Token::Short { body } => self.process_short(tokens, &mut i, body)?,
                Token::Positional(token) => self.process_positional(tokens, &mut i, token)?,
            };
            match step {
                Step::Done(result) => ok &= result,
                Step::Help => {
                    tracing::debug!(parser = %self.name, "help requested");
                    self.help_requested = true;
                    return Ok(true);
                }
            }
        }

        for arg in self.registry.iter() {
            if !arg.is_satisfied() {
                tracing::debug!(
                    argument = arg.name(),
                    parsed = arg.is_parsed(),
                    count = arg.count(),
                    min_count = arg.min_count(),
                    "argument not satisfied"
                );
                ok = false;
            }
        }
        tracing::debug!(parser = %self.name, ok, "parse finished");
        Ok(ok)
    }

    fn process_long(
        &mut self,
        tokens: &[&str],
        i: &mut usize,
        name: &str,
        inline: Option<&str>,
    ) -> Result<Step> {
        let name = self
            .registry
            .resolve_name(name)
            .map(str::to_string)
            .ok_or_else(|| ArgError::UnknownArgument(tokens[*i].to_string()))?;
        tracing::debug!(argument = %name, token = tokens[*i], "long option");
        self.process_named(tokens, i, &name, inline)
    }

    fn process_short(&mut self, tokens: &[&str], i: &mut usize, body: &str) -> Result<Step> {
        let Some(first) = body.chars().next() else {
            return Err(ArgError::UnknownArgument(tokens[*i].to_string()));
        };
        let name = self.resolve_alias(first)?;
        tracing::debug!(argument = %name, token = tokens[*i], "short option");
        if self.registry.is_help(&name) {
            return Ok(Step::Help);
        }
        if self.arg_mut(&name)?.kind() == ValueKind::Flag {
            return self.process_cluster(tokens, i, body);
        }
        let rest = &body[first.len_utf8()..];
        self.process_named(tokens, i, &name, attached_value(rest))
    }

    /// Every character of `-abc` is a flag alias. A value-taking alias inside
    /// the cluster takes the rest of the token (or the next tokens) as its value.
    fn process_cluster(&mut self, tokens: &[&str], i: &mut usize, body: &str) -> Result<Step> {
        for (pos, ch) in body.char_indices() {
            if ch == '=' {
                break;
            }
            let name = self.resolve_alias(ch)?;
            if self.registry.is_help(&name) {
                return Ok(Step::Help);
            }
            let arg = self.arg_mut(&name)?;
            if arg.kind() != ValueKind::Flag {
                let rest = &body[pos + ch.len_utf8()..];
                return self.process_named(tokens, i, &name, attached_value(rest));
            }
            arg.mark_parsed();
            arg.add(true)?;
        }
        *i += 1;
        Ok(Step::Done(true))
    }

    fn process_named(
        &mut self,
        tokens: &[&str],
        i: &mut usize,
        name: &str,
        inline: Option<&str>,
    ) -> Result<Step> {
        if self.registry.is_help(name) {
            return Ok(Step::Help);
        }
        let arg = self.arg_mut(name)?;
        arg.mark_parsed();
        if arg.kind() == ValueKind::Flag {
            arg.add(true)?;
            *i += 1;
            return Ok(Step::Done(true));
        }
        if let Some(value) = inline {
            arg.add_raw(value)?;
            *i += 1;
            return Ok(Step::Done(true));
        }
        *i += 1;
        self.consume_values(tokens, i, name)
    }

    fn process_positional(&mut self, tokens: &[&str], i: &mut usize, token: &str) -> Result<Step> {
        let Some(name) = self.registry.positional().map(str::to_string) else {
            tracing::debug!(token, "no positional argument declared");
            *i += 1;
            return Ok(Step::Done(false));
        };
        self.arg_mut(&name)?.mark_parsed();
        self.consume_values(tokens, i, &name)
    }

    /// Take following non-option tokens: one for a scalar, all of them for a
    /// multi-value argument. `Done(false)` if none were available.
    fn consume_values(&mut self, tokens: &[&str], i: &mut usize, name: &str) -> Result<Step> {
        let arg = self.arg_mut(name)?;
        let mut consumed = false;
        while let Some(&token) = tokens.get(*i) {
            if is_option(token) {
                break;
            }
            arg.add_raw(token)?;
            *i += 1;
            consumed = true;
            if !arg.is_multi_value() {
                break;
            }
        }
        if !consumed {
            tracing::debug!(argument = name, "option given without a value");
        }
        Ok(Step::Done(consumed))
    }
}

/// Value carried inside a short token after its alias: `=value` or `value`.
fn attached_value(rest: &str) -> Option<&str> {
    if rest.is_empty() {
        None
    } else {
        Some(rest.strip_prefix('=').unwrap_or(rest))
    }
}

fn no_argument(modifier: &str) -> ArgError {
    ArgError::Declaration(format!("{modifier}() called before any argument was declared"))
}
