use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::{ArgError, Result};

/// Value kind of a declared argument, fixed at declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueKind {
    String,
    Int,
    Flag,
}

impl ValueKind {
    /// Placeholder shown after the argument name in help output.
    pub fn placeholder(self) -> Option<&'static str> {
        match self {
            Self::String => Some("<string>"),
            Self::Int => Some("<int>"),
            Self::Flag => None,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Flag => "flag",
        })
    }
}

/// Caller-owned storage the parser writes into.
///
/// The parser keeps a clone of the `Rc` for as long as it lives; the caller
/// reads the cell whenever it likes, as long as no parse is running.
pub type Binding<T> = Rc<RefCell<T>>;

/// Create a [`Binding`] holding `initial`.
pub fn binding<T>(initial: T) -> Binding<T> {
    Rc::new(RefCell::new(initial))
}

/// A default accepted by `ArgParser::default_value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    String(String),
    Int(i32),
    Flag(bool),
}

impl DefaultValue {
    pub(crate) fn kind(&self) -> ValueKind {
        match self {
            Self::String(_) => ValueKind::String,
            Self::Int(_) => ValueKind::Int,
            Self::Flag(_) => ValueKind::Flag,
        }
    }
}

impl From<&str> for DefaultValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for DefaultValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i32> for DefaultValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for DefaultValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

/// Scalar storage: nothing yet, an owned value, or a caller binding.
#[derive(Debug)]
enum Slot<T> {
    Unset,
    Owned(T),
    Bound(Binding<T>),
}

impl<T: Clone> Slot<T> {
    fn set(&mut self, value: T) {
        match self {
            Self::Bound(cell) => *cell.borrow_mut() = value,
            _ => *self = Self::Owned(value),
        }
    }

    fn get(&self) -> Option<T> {
        match self {
            Self::Unset => None,
            Self::Owned(v) => Some(v.clone()),
            Self::Bound(cell) => Some(cell.borrow().clone()),
        }
    }
}

/// Sequence storage for multi-value arguments.
#[derive(Debug)]
enum Sequence<T> {
    Owned(Vec<T>),
    Bound(Binding<Vec<T>>),
}

impl<T: Clone> Sequence<T> {
    fn push(&mut self, value: T) {
        match self {
            Self::Owned(items) => items.push(value),
            Self::Bound(cell) => cell.borrow_mut().push(value),
        }
    }

    fn get(&self, index: usize) -> Option<T> {
        match self {
            Self::Owned(items) => items.get(index).cloned(),
            Self::Bound(cell) => cell.borrow().get(index).cloned(),
        }
    }

    fn to_vec(&self) -> Vec<T> {
        match self {
            Self::Owned(items) => items.clone(),
            Self::Bound(cell) => cell.borrow().clone(),
        }
    }
}

/// Storage of one kind: default, scalar slot, and sequence.
///
/// Which of `value`/`values` receives writes depends on the multi-value
/// setting at the time of the write.
#[derive(Debug)]
pub(crate) struct Store<T> {
    default: Option<T>,
    value: Slot<T>,
    values: Sequence<T>,
}

impl<T: Clone> Store<T> {
    fn new() -> Self {
        Self {
            default: None,
            value: Slot::Unset,
            values: Sequence::Owned(Vec::new()),
        }
    }

    fn write(&mut self, value: T, multi: bool) {
        if multi {
            self.values.push(value);
        } else {
            self.value.set(value);
        }
    }

    fn read(&self, index: usize, multi: bool) -> Option<T> {
        let stored = if multi {
            self.values.get(index)
        } else {
            self.value.get()
        };
        stored.or_else(|| self.default.clone())
    }

    fn read_all(&self, multi: bool) -> Vec<T> {
        if multi {
            return self.values.to_vec();
        }
        self.value
            .get()
            .or_else(|| self.default.clone())
            .into_iter()
            .collect()
    }

    fn set_default(&mut self, value: T) {
        if let Slot::Bound(cell) = &self.value {
            *cell.borrow_mut() = value.clone();
        }
        self.default = Some(value);
    }

    fn bind_value(&mut self, cell: &Binding<T>) {
        if let Some(current) = self.value.get().or_else(|| self.default.clone()) {
            *cell.borrow_mut() = current;
        }
        self.value = Slot::Bound(Rc::clone(cell));
    }

    fn bind_values(&mut self, cell: &Binding<Vec<T>>) {
        if let Sequence::Owned(items) = &mut self.values {
            cell.borrow_mut().append(items);
        }
        self.values = Sequence::Bound(Rc::clone(cell));
    }

    fn clear(&mut self) {
        if let Slot::Owned(_) = self.value {
            self.value = Slot::Unset;
        }
        if let Sequence::Owned(items) = &mut self.values {
            items.clear();
        }
    }
}

/// Kind-tagged storage of a descriptor.
#[derive(Debug)]
pub(crate) enum Values {
    String(Store<String>),
    Int(Store<i32>),
    Flag(Store<bool>),
}

impl Values {
    fn new(kind: ValueKind) -> Self {
        match kind {
            ValueKind::String => Self::String(Store::new()),
            ValueKind::Int => Self::Int(Store::new()),
            ValueKind::Flag => Self::Flag(Store::new()),
        }
    }

    fn kind(&self) -> ValueKind {
        match self {
            Self::String(_) => ValueKind::String,
            Self::Int(_) => ValueKind::Int,
            Self::Flag(_) => ValueKind::Flag,
        }
    }

    fn has_default(&self) -> bool {
        match self {
            Self::String(s) => s.default.is_some(),
            Self::Int(s) => s.default.is_some(),
            Self::Flag(s) => s.default.is_some(),
        }
    }

    fn default_display(&self) -> Option<String> {
        match self {
            Self::String(s) => s.default.clone(),
            Self::Int(s) => s.default.map(|v| v.to_string()),
            Self::Flag(s) => s.default.map(|v| v.to_string()),
        }
    }

    fn clear(&mut self) {
        match self {
            Self::String(s) => s.clear(),
            Self::Int(s) => s.clear(),
            Self::Flag(s) => s.clear(),
        }
    }
}

mod sealed {
    use super::{Store, Values};

    pub trait Sealed: Sized {
        fn store(values: &Values) -> Option<&Store<Self>>;
        fn store_mut(values: &mut Values) -> Option<&mut Store<Self>>;
    }

    impl Sealed for String {
        fn store(values: &Values) -> Option<&Store<Self>> {
            match values {
                Values::String(s) => Some(s),
                _ => None,
            }
        }

        fn store_mut(values: &mut Values) -> Option<&mut Store<Self>> {
            match values {
                Values::String(s) => Some(s),
                _ => None,
            }
        }
    }

    impl Sealed for i32 {
        fn store(values: &Values) -> Option<&Store<Self>> {
            match values {
                Values::Int(s) => Some(s),
                _ => None,
            }
        }

        fn store_mut(values: &mut Values) -> Option<&mut Store<Self>> {
            match values {
                Values::Int(s) => Some(s),
                _ => None,
            }
        }
    }

    impl Sealed for bool {
        fn store(values: &Values) -> Option<&Store<Self>> {
            match values {
                Values::Flag(s) => Some(s),
                _ => None,
            }
        }

        fn store_mut(values: &mut Values) -> Option<&mut Store<Self>> {
            match values {
                Values::Flag(s) => Some(s),
                _ => None,
            }
        }
    }
}

/// Rust types an argument value can be read into or bound to.
///
/// Implemented for `String` (string arguments), `i32` (integer arguments)
/// and `bool` (flags).
pub trait ArgValue: sealed::Sealed + Clone + fmt::Debug + 'static {
    const KIND: ValueKind;
}

impl ArgValue for String {
    const KIND: ValueKind = ValueKind::String;
}

impl ArgValue for i32 {
    const KIND: ValueKind = ValueKind::Int;
}

impl ArgValue for bool {
    const KIND: ValueKind = ValueKind::Flag;
}

/// Per-argument descriptor: kind-tagged storage plus parse state.
#[derive(Debug)]
pub(crate) struct ArgumentSettings {
    name: String,
    description: String,
    values: Values,
    multi_value: bool,
    min_count: usize,
    positional: bool,
    optional: bool,
    parsed: bool,
    count: usize,
}

impl ArgumentSettings {
    pub(crate) fn new(kind: ValueKind, name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            values: Values::new(kind),
            multi_value: false,
            min_count: 0,
            positional: false,
            optional: false,
            parsed: false,
            count: 0,
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn kind(&self) -> ValueKind {
        self.values.kind()
    }

    pub(crate) fn description(&self) -> &str {
        &self.description
    }

    pub(crate) fn is_multi_value(&self) -> bool {
        self.multi_value
    }

    pub(crate) fn min_count(&self) -> usize {
        self.min_count
    }

    pub(crate) fn count(&self) -> usize {
        self.count
    }

    pub(crate) fn is_positional(&self) -> bool {
        self.positional
    }

    pub(crate) fn is_parsed(&self) -> bool {
        self.parsed
    }

    pub(crate) fn default_display(&self) -> Option<String> {
        self.values.default_display()
    }

    pub(crate) fn set_multi_value(&mut self, min_count: usize) {
        self.multi_value = true;
        self.min_count = min_count;
    }

    pub(crate) fn set_positional(&mut self, positional: bool) {
        self.positional = positional;
    }

    /// Satisfied without appearing in the tokens, even after [`Self::reset`].
    pub(crate) fn make_optional(&mut self) {
        self.optional = true;
        self.parsed = true;
    }

    pub(crate) fn mark_parsed(&mut self) {
        self.parsed = true;
    }

    /// Parsed, and for multi-value arguments at least `min_count` values.
    pub(crate) fn is_satisfied(&self) -> bool {
        self.parsed && (!self.multi_value || self.count >= self.min_count)
    }

    pub(crate) fn set_default(&mut self, value: DefaultValue) -> Result<()> {
        let actual = self.kind();
        match (&mut self.values, value) {
            (Values::String(s), DefaultValue::String(v)) => s.set_default(v),
            (Values::Int(s), DefaultValue::Int(v)) => s.set_default(v),
            (Values::Flag(s), DefaultValue::Flag(v)) => s.set_default(v),
            (_, other) => {
                return Err(ArgError::KindMismatch {
                    name: self.name.clone(),
                    expected: other.kind(),
                    actual,
                });
            }
        }
        self.parsed = true;
        Ok(())
    }

    pub(crate) fn bind_value<T: ArgValue>(&mut self, cell: &Binding<T>) -> Result<()> {
        self.store_mut::<T>()?.bind_value(cell);
        Ok(())
    }

    pub(crate) fn bind_values<T: ArgValue>(&mut self, cell: &Binding<Vec<T>>) -> Result<()> {
        self.store_mut::<T>()?.bind_values(cell);
        Ok(())
    }

    /// Store one raw token according to the argument's kind.
    pub(crate) fn add_raw(&mut self, raw: &str) -> Result<()> {
        match self.kind() {
            ValueKind::String => self.add(raw.to_string()),
            ValueKind::Int => {
                let value = raw.parse::<i32>().map_err(|_| ArgError::InvalidInt {
                    name: self.name.clone(),
                    value: raw.to_string(),
                })?;
                self.add(value)
            }
            ValueKind::Flag => self.add(true),
        }
    }

    pub(crate) fn add<T: ArgValue>(&mut self, value: T) -> Result<()> {
        // Flags only ever hold a single value.
        let multi = self.multi_value && T::KIND != ValueKind::Flag;
        tracing::trace!(argument = %self.name, value = ?value, "storing value");
        self.store_mut::<T>()?.write(value, multi);
        if multi {
            self.count += 1;
        }
        Ok(())
    }

    pub(crate) fn get<T: ArgValue>(&self, index: usize) -> Result<T> {
        self.store::<T>()?
            .read(index, self.multi_value)
            .ok_or_else(|| ArgError::MissingValue {
                name: self.name.clone(),
                index,
            })
    }

    pub(crate) fn get_all<T: ArgValue>(&self) -> Result<Vec<T>> {
        Ok(self.store::<T>()?.read_all(self.multi_value))
    }

    /// Forget everything learnt from parsing; bound caller storage is left as is.
    pub(crate) fn reset(&mut self) {
        self.values.clear();
        self.count = 0;
        self.parsed = self.optional || self.values.has_default();
    }

    fn store<T: ArgValue>(&self) -> Result<&Store<T>> {
        T::store(&self.values).ok_or_else(|| self.mismatch(T::KIND))
    }

    fn store_mut<T: ArgValue>(&mut self) -> Result<&mut Store<T>> {
        let actual = self.kind();
        let name = &self.name;
        T::store_mut(&mut self.values).ok_or_else(|| ArgError::KindMismatch {
            name: name.clone(),
            expected: T::KIND,
            actual,
        })
    }

    fn mismatch(&self, expected: ValueKind) -> ArgError {
        ArgError::KindMismatch {
            name: self.name.clone(),
            expected,
            actual: self.kind(),
        }
    }
}
