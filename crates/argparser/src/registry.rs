use std::collections::HashMap;

use indexmap::IndexMap;

use crate::settings::{ArgumentSettings, ValueKind};
use crate::tokens::strip_name;

/// Declared arguments keyed by canonical (long) name, plus alias tables.
///
/// Declaration order is kept so help output is stable.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    args: IndexMap<String, ArgumentSettings>,
    short_to_long: HashMap<char, String>,
    long_to_short: HashMap<String, char>,
    last_added: Option<String>,
    positional: Option<String>,
    help: Option<String>,
}

impl Registry {
    /// Declare an argument. Re-declaring a name or an alias replaces the
    /// previous entry; a re-declared positional sink stays the sink.
    ///
    /// A flag declared with an alias is satisfied from the start.
    pub(crate) fn declare(
        &mut self,
        kind: ValueKind,
        name: &str,
        short: Option<char>,
        description: &str,
    ) {
        if self.args.contains_key(name) {
            tracing::warn!(argument = name, "argument declared twice, replacing it");
        }
        if let Some(ch) = short {
            if let Some(prev) = self.short_to_long.insert(ch, name.to_string()) {
                if prev != name {
                    tracing::warn!(
                        alias = %ch,
                        previous = %prev,
                        argument = name,
                        "short alias reassigned"
                    );
                    self.long_to_short.remove(&prev);
                }
            }
            self.long_to_short.insert(name.to_string(), ch);
        }
        let mut arg = ArgumentSettings::new(kind, name, description);
        if kind == ValueKind::Flag && short.is_some() {
            arg.make_optional();
        }
        if self.positional.as_deref() == Some(name) {
            if kind == ValueKind::Flag {
                self.positional = None;
            } else {
                arg.set_positional(true);
            }
        }
        self.args.insert(name.to_string(), arg);
        self.last_added = Some(name.to_string());
    }

    pub(crate) fn last_added(&self) -> Option<&str> {
        self.last_added.as_deref()
    }

    pub(crate) fn last_added_mut(&mut self) -> Option<&mut ArgumentSettings> {
        let name = self.last_added.as_deref()?;
        self.args.get_mut(name)
    }

    /// Make the last declared argument the positional sink, replacing any
    /// earlier designation.
    pub(crate) fn set_positional(&mut self) -> Option<&mut ArgumentSettings> {
        let name = self.last_added.clone()?;
        if let Some(prev) = self.positional.replace(name.clone()) {
            if prev != name {
                if let Some(arg) = self.args.get_mut(&prev) {
                    arg.set_positional(false);
                }
            }
        }
        let arg = self.args.get_mut(&name)?;
        arg.set_positional(true);
        Some(arg)
    }

    pub(crate) fn positional(&self) -> Option<&str> {
        self.positional.as_deref()
    }

    pub(crate) fn designate_help(&mut self, name: &str) {
        self.help = Some(name.to_string());
    }

    pub(crate) fn is_help(&self, name: &str) -> bool {
        self.help.as_deref() == Some(name)
    }

    pub(crate) fn alias_of(&self, name: &str) -> Option<char> {
        self.long_to_short.get(name).copied()
    }

    /// Canonical name for a short alias.
    pub(crate) fn resolve_alias(&self, ch: char) -> Option<&str> {
        self.short_to_long.get(&ch).map(String::as_str)
    }

    /// Canonical name for a bare name: the name itself if declared, otherwise
    /// a one-character alias.
    pub(crate) fn resolve_name(&self, name: &str) -> Option<&str> {
        if let Some((key, _)) = self.args.get_key_value(name) {
            return Some(key.as_str());
        }
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => self.resolve_alias(ch),
            _ => None,
        }
    }

    /// Canonical name for a lookup key that may carry dashes and `=value`.
    pub(crate) fn resolve(&self, key: &str) -> Option<&str> {
        self.resolve_name(strip_name(key))
    }

    pub(crate) fn get(&self, name: &str) -> Option<&ArgumentSettings> {
        self.args.get(name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut ArgumentSettings> {
        self.args.get_mut(name)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &ArgumentSettings> {
        self.args.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut ArgumentSettings> {
        self.args.values_mut()
    }
}
