use crate::schema::{ArgumentSchema, ParserSchema};

fn format_arg_left(arg: &ArgumentSchema) -> String {
    let mut out = match arg.short {
        Some(ch) => format!("-{ch},  --{}", arg.name),
        None => format!("     --{}", arg.name),
    };
    if let Some(placeholder) = arg.kind.placeholder() {
        out.push('=');
        out.push_str(placeholder);
    }
    out
}

fn format_arg_help(arg: &ArgumentSchema) -> String {
    let mut out = arg.description.trim().to_string();
    if arg.multi_value {
        out.push_str(&format!(" [repeated, min args = {}]", arg.min_count));
    }
    if let Some(default_value) = &arg.default_value {
        out.push_str(&format!(" [default = {default_value}]"));
    }
    if arg.positional {
        out.push_str(" [positional]");
    }
    out.trim_start().to_string()
}

/// Render help text: title, program description, one line per argument,
/// then the help argument itself.
pub(crate) fn render(schema: &ParserSchema) -> String {
    let help = schema.help_arg();

    let mut out = String::new();
    out.push_str(&schema.name);
    out.push('\n');
    if let Some(help) = help {
        if !help.description.trim().is_empty() {
            out.push_str(help.description.trim_end());
            out.push('\n');
        }
    }
    out.push('\n');

    for arg in schema.args.iter().filter(|a| !a.help) {
        let left = format_arg_left(arg);
        let text = format_arg_help(arg);
        if text.is_empty() {
            out.push_str(&format!("{left}\n"));
        } else {
            out.push_str(&format!("{left},  {text}\n"));
        }
    }

    if let Some(help) = help {
        out.push('\n');
        match help.short {
            Some(ch) => out.push_str(&format!("-{ch}, --{} Display this help and exit\n", help.name)),
            None => out.push_str(&format!("     --{} Display this help and exit\n", help.name)),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use crate::ArgParser;

    #[test]
    fn help_lists_arguments_then_help_line() {
        let mut parser = ArgParser::new("My Parser");
        parser.add_help('h', "help", "Some Description about program");
        parser
            .add_string_short('i', "input", "File path for input file")
            .multi_value(1);
        parser
            .add_flag_short('s', "flag1", "Use some logic")
            .default_value(true);
        parser.add_flag_short('p', "flag2", "Use some logic");
        parser.add_int("numer", "Some Number");

        let text = parser.help_description();
        assert_eq!(
            text,
            "My Parser\n\
             Some Description about program\n\
             \n\
             -i,  --input=<string>,  File path for input file [repeated, min args = 1]\n\
             -s,  --flag1,  Use some logic [default = true]\n\
             -p,  --flag2,  Use some logic\n     \
             --numer=<int>,  Some Number\n\
             \n\
             -h, --help Display this help and exit\n"
        );
    }

    #[test]
    fn help_without_help_argument() {
        let mut parser = ArgParser::new("bare");
        parser.add_int("n", "").positional();

        let text = parser.help_description();
        assert!(text.starts_with("bare\n\n"));
        assert!(text.contains("     --n=<int>,  [positional]\n"));
        assert!(!text.contains("Display this help"));
    }
}
