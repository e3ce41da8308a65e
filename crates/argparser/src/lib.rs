//! Declarative command-line argument parsing.
//!
//! Arguments are declared on an [`ArgParser`] (string, integer, or boolean
//! flag) with an optional one-character alias, then the raw token list of a
//! process invocation is fed to [`ArgParser::parse`]. The parser:
//! - resolves `--name`, `--name=value`, `--name value`, `-x`, `-x=value`,
//!   `-xvalue` and clustered flags like `-abc`
//! - routes bare tokens to the single positional argument, if one is declared
//! - accumulates repeated values for multi-value arguments
//! - reports overall success as a single verdict (required arguments present,
//!   multi-value minimum counts met)
//!
//! Values are read back through typed getters or written directly into
//! caller-owned [`Binding`]s.
//!
//! # Example
//!
//! ```
//! use argparser::{ArgParser, binding};
//!
//! let numbers = binding(Vec::<i32>::new());
//!
//! let mut parser = ArgParser::new("calc");
//! parser.add_help('h', "help", "Sum or multiply integers");
//! parser.add_flag_short('s', "sum", "Add the numbers");
//! parser.add_int("N", "Input numbers").multi_value(1).positional().store_values(&numbers);
//!
//! assert!(parser.parse_line("calc -s 1 2 3").unwrap());
//! assert!(parser.get_flag("sum"));
//! assert_eq!(*numbers.borrow(), vec![1, 2, 3]);
//! ```
//!
//! Parser state is never reset implicitly: calling `parse` again on the same
//! parser keeps every argument satisfied by an earlier call. Use
//! [`ArgParser::reset`] to start over.

mod error;
mod help;
mod parser;
mod registry;
mod schema;
mod settings;
mod tokens;

pub use error::{ArgError, Result};
pub use parser::{ArgKey, ArgParser, INT_SENTINEL};
pub use schema::{ArgumentSchema, ParserSchema};
pub use settings::{ArgValue, Binding, DefaultValue, ValueKind, binding};
pub use tokens::split_string;
