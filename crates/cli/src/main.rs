mod report;

use anyhow::{Context, Result, bail};
use argparser::{ArgParser, Binding, binding};
use tracing_subscriber::{EnvFilter, fmt};

use crate::report::{Operation, compute};

fn build_parser(numbers: &Binding<Vec<i32>>) -> ArgParser {
    let mut parser = ArgParser::new("argparser-demo");
    parser.add_help('h', "help", "Sum or multiply a list of integers");
    parser.add_flag_short('s', "sum", "Add the numbers");
    parser.add_flag_short('m', "mult", "Multiply the numbers");
    parser
        .add_string_short('f', "format", "Result format: plain or json")
        .default_value("plain");
    parser
        .add_flag("describe", "Print the declared arguments as JSON and exit")
        .default_value(false);
    parser
        .add_int("N", "Input numbers")
        .multi_value(1)
        .positional()
        .store_values(numbers);
    parser
}

fn main() -> Result<()> {
    init_tracing();

    let numbers = binding(Vec::new());
    let mut parser = build_parser(&numbers);
    let ok = parser
        .parse(std::env::args())
        .context("failed to parse arguments")?;

    if parser.help_requested() {
        print!("{}", parser.help_description());
        return Ok(());
    }
    if parser.get_flag("describe") {
        println!("{}", serde_json::to_string_pretty(&parser.schema())?);
        return Ok(());
    }
    if !ok {
        eprint!("{}", parser.help_description());
        bail!("missing or incomplete arguments");
    }

    let operation = match (parser.get_flag("sum"), parser.get_flag("mult")) {
        (true, false) => Operation::Sum,
        (false, true) => Operation::Product,
        (true, true) => bail!("--sum and --mult cannot be used together"),
        (false, false) => bail!("nothing to do: pass --sum or --mult"),
    };
    tracing::debug!(?operation, count = numbers.borrow().len(), "computing");
    let report = compute(operation, &numbers.borrow())?;

    match parser.get_string("format", 0).as_str() {
        "plain" => println!("{}", report.result),
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        other => bail!("unknown format: {other} (expected plain or json)"),
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
