//! Code to configure and run the parser on expressions given on the command
//! line, read from a file, or generated at random.

use std::fs;

use clap::Parser;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::term_generation::generate_source;
use crate::term_representation::{Expression, Term, Variable};
use crate::transition_execution::{
    ParseError, ParserConfig, TransitionExecutor, DEFAULT_MAX_NESTING_DEPTH,
};

/// Nesting depth of randomly generated expressions.
pub const RANDOM_EXPRESSION_DEPTH: usize = 3;

/// Config for a run. Instantiate via `RunConfig::parse()`.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct RunConfig {
    /// Expression to parse, e.g. `(X1)LY1.(X1)`.
    #[arg(short, long)]
    pub expression: Option<String>,

    /// File to parse. Each non-empty line not starting with `//` is parsed on
    /// its own.
    #[arg(short, long)]
    pub src_filepath: Option<String>,

    /// Print the demonstration terms.
    #[arg(short, long)]
    pub demo: bool,

    /// How many random expressions to generate and parse.
    #[arg(short, long, default_value_t = 0)]
    pub random_count: usize,

    /// Seed for the random expressions.
    #[arg(long)]
    pub seed: Option<u64>,

    /// How deep parenthesized and lambda bodies may nest.
    #[arg(short, long, default_value_t = DEFAULT_MAX_NESTING_DEPTH)]
    pub max_nesting_depth: usize,

    /// Log parser transitions to standard error.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Errors that may be thrown during a run.
#[derive(Debug)]
pub enum RunError {
    ConfigError(String),
    InputFileError(std::io::Error),
    ParseError { input: String, source: ParseError },
}

/// Display trait implementation for RunError.
impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConfigError(config_err_string) => {
                return write!(f, "Configuration error: {}", config_err_string);
            }

            Self::InputFileError(io_err) => {
                return write!(f, "Input file error: {}", io_err);
            }

            Self::ParseError { input, source } => {
                return write!(f, "Unable to parse {:?}. {}", input, source);
            }
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConfigError(_) => return None,
            Self::InputFileError(io_err) => return Some(io_err),
            Self::ParseError { source, .. } => return Some(source),
        }
    }
}

/// Type conversions for errors.
impl From<std::io::Error> for RunError {
    fn from(value: std::io::Error) -> Self {
        return Self::InputFileError(value);
    }
}

/// Formats one input and the printed forms of its top-level terms.
pub fn format_parse_result(input: &str, terms: &[Term]) -> String {
    let prints: Vec<String> = terms.iter().map(|term| term.print()).collect();
    return format!("{} => [{}]", input, prints.join(", "));
}

/// Parses a single input and formats the result.
pub fn parse_input(input: &str, executor: &TransitionExecutor) -> Result<String, RunError> {
    let terms = executor
        .parse(input)
        .map_err(|parse_error| RunError::ParseError {
            input: String::from(input),
            source: parse_error,
        })?;

    return Ok(format_parse_result(input, &terms));
}

/// Builds a handful of terms by hand and describes them, showing abstraction,
/// concatenation, the collapsing of redundant wrappers and one beta step.
pub fn demonstration_lines() -> Vec<String> {
    let mut out = vec![];

    let x = Term::Variable(Variable::new("X1"));
    out.push(format!("variable: {}", x));

    let abstraction = x.abstract_over(&Variable::new("Y1"));
    out.push(format!("abstraction: {}", abstraction));

    let concatenation = Term::Expression(Expression::concatenate(vec![
        abstraction.copy(),
        x.copy(),
    ]));
    out.push(format!("concatenation: {}", concatenation));

    // Each wrapper adds a layer of parentheses to the stored text only.
    let mut wrapped = concatenation.copy();
    for layer in 1..=3 {
        let wrapper = Expression::concatenate(vec![wrapped]);
        out.push(format!(
            "wrapped {} time(s): {} (stored as {})",
            layer,
            wrapper.print(),
            wrapper.canonical_text()
        ));
        wrapped = Term::Expression(wrapper);
    }

    out.push(format!(
        "wrapped equals unwrapped: {}",
        wrapped.equals(&concatenation)
    ));

    if let Term::Expression(identity) = x.abstract_over(&Variable::new("X1")) {
        let argument = Term::Variable(Variable::new("Z1"));
        if let Some(stepped) = identity.beta_step(&argument) {
            out.push(format!(
                "({}) applied to {}: {}",
                identity, argument, stepped
            ));
        }
    }

    return out;
}

// Non-empty, non-comment lines of an input file.
fn source_file_lines(file_contents: &str) -> Vec<&str> {
    return file_contents
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !line.starts_with("//"))
        .collect();
}

/// Run the parser on every input named by the config and return the output
/// text, one line per input.
pub fn run_parser(config: &RunConfig) -> Result<String, RunError> {
    if !config.demo
        && config.expression.is_none()
        && config.src_filepath.is_none()
        && config.random_count == 0
    {
        return Err(RunError::ConfigError(String::from(
            "Nothing to do. Give an expression, a source file, --demo or --random-count.",
        )));
    }

    let executor = TransitionExecutor::new(ParserConfig {
        max_nesting_depth: config.max_nesting_depth,
    });
    debug!("Running with {:?}", executor);

    let mut out = vec![];

    if config.demo {
        out.extend(demonstration_lines());
    }

    if let Some(expression) = &config.expression {
        out.push(parse_input(expression, &executor)?);
    }

    if let Some(src_filepath) = &config.src_filepath {
        // Read the input file into a string.
        let file_contents = fs::read_to_string(src_filepath)?;

        for line in source_file_lines(&file_contents) {
            out.push(parse_input(line, &executor)?);
        }
    }

    if config.random_count > 0 {
        let seed = match config.seed {
            Some(seed) => seed,
            None => rand::random(),
        };
        info!("Generating {} random expressions with seed {}", config.random_count, seed);

        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..config.random_count {
            let source = generate_source(&mut rng, RANDOM_EXPRESSION_DEPTH);
            out.push(parse_input(&source, &executor)?);
        }
    }

    return Ok(out.join("\n"));
}
