//! Serializable view of a parser's declarations.

use serde::{Deserialize, Serialize};

use crate::registry::Registry;
use crate::settings::ValueKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ArgumentSchema {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<char>,
    pub kind: ValueKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub multi_value: bool,
    #[serde(default)]
    pub min_count: usize,
    #[serde(default)]
    pub positional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// The help argument; its description describes the whole program.
    #[serde(default)]
    pub help: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ParserSchema {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<ArgumentSchema>,
}

impl ParserSchema {
    pub fn help_arg(&self) -> Option<&ArgumentSchema> {
        self.args.iter().find(|a| a.help)
    }

    pub fn arg(&self, name: &str) -> Option<&ArgumentSchema> {
        self.args.iter().find(|a| a.name == name)
    }
}

pub(crate) fn build(name: &str, registry: &Registry) -> ParserSchema {
    let args = registry
        .iter()
        .map(|arg| ArgumentSchema {
            name: arg.name().to_string(),
            short: registry.alias_of(arg.name()),
            kind: arg.kind(),
            description: arg.description().to_string(),
            multi_value: arg.is_multi_value(),
            min_count: arg.min_count(),
            positional: arg.is_positional(),
            default_value: arg.default_display(),
            help: registry.is_help(arg.name()),
        })
        .collect();
    ParserSchema {
        name: name.to_string(),
        args,
    }
}

#[cfg(test)]
mod tests {
    use crate::ArgParser;

    #[test]
    fn schema_reflects_declarations() {
        let mut parser = ArgParser::new("tool");
        parser.add_help('h', "help", "A tool");
        parser
            .add_int_short('n', "count", "How many")
            .multi_value(2)
            .default_value(1);
        parser.add_string("path", "").positional();

        let schema = parser.schema();
        assert_eq!(schema.name, "tool");
        assert_eq!(schema.args.len(), 3);
        assert_eq!(schema.help_arg().map(|a| a.name.as_str()), Some("help"));

        let count = schema.arg("count").unwrap();
        assert_eq!(count.short, Some('n'));
        assert!(count.multi_value);
        assert_eq!(count.min_count, 2);
        assert_eq!(count.default_value.as_deref(), Some("1"));
        assert!(schema.arg("path").unwrap().positional);
    }

    #[test]
    fn schema_serializes_kebab_case() {
        let mut parser = ArgParser::new("tool");
        parser.add_string("path", "").multi_value(0);

        let json = serde_json::to_value(parser.schema()).unwrap();
        assert_eq!(json["name"], "tool");
        assert_eq!(json["args"][0]["kind"], "string");
        assert_eq!(json["args"][0]["multi-value"], true);
        assert!(json["args"][0].get("short").is_none());
        assert!(json["args"][0].get("description").is_none());
    }
}
