mod highlighter;
mod lexer;

use std::io::BufRead;
use std::io::BufReader;
use std::time::Duration;

use clap::Parser as _;
use formulon::{Equation, Expression, Parser, TimeoutManager, render_error};
use miette::{IntoDiagnostic, Result};
use reedline::{DefaultPrompt, DefaultPromptSegment, Reedline, Signal};

/// Formulon - evaluate arithmetic and logic formulas
#[derive(clap::Parser, Debug)]
#[command(name = "formulon")]
#[command(about = "Evaluate formulas", long_about = None)]
struct Args {
    /// Bind a variable: NAME=NUMBER or NAME=FORMULA (repeatable)
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_binding)]
    vars: Vec<(String, String)>,

    /// Deadline for parsing and for evaluating each formula, in milliseconds
    #[arg(long, default_value_t = 5000)]
    timeout_ms: u64,

    /// Do not precompute constant subexpressions
    #[arg(long)]
    no_fold: bool,

    /// Longest allowed summation loop (0 disables the cap)
    #[arg(long, default_value_t = 100_000)]
    max_summation: usize,

    /// How often one variable may be substituted per evaluation (2 to 1000)
    #[arg(long, default_value_t = 1000)]
    max_recursion: usize,

    /// Print the parsed tree (for debugging)
    #[arg(long)]
    debug_parse: bool,

    /// Print the formula with folded constants before its value
    #[arg(long)]
    reduced: bool,

    /// Formula to evaluate (if not provided, reads from stdin)
    expression: Option<String>,
}

fn parse_binding(arg: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{arg}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing variable name in '{arg}'"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

/// Everything needed to evaluate one line of input.
struct Session {
    parser: Parser,
    bindings: Vec<(String, Expression)>,
    timeout: Duration,
    debug_parse: bool,
    reduced: bool,
}

impl Session {
    fn new(args: &Args) -> Result<Self> {
        let timeout = Duration::from_millis(args.timeout_ms);
        let parser = Parser::builder()
            .timeout(timeout)
            .fold_constants(!args.no_fold)
            .max_summation_iterations(args.max_summation)
            .max_recursive_substitutions(args.max_recursion)
            .build()
            .into_diagnostic()?;

        // Plain numbers are formulas too, so every binding goes through the parser.
        let mut bindings = Vec::with_capacity(args.vars.len());
        for (name, value) in &args.vars {
            match parser.parse(value) {
                Ok(expr) => bindings.push((name.clone(), expr)),
                Err(e) => {
                    render_error(&e);
                    miette::bail!("invalid value for variable '{name}'");
                }
            }
        }

        Ok(Self {
            parser,
            bindings,
            timeout,
            debug_parse: args.debug_parse,
            reduced: args.reduced,
        })
    }

    fn interpret_input(&self, input: &str) {
        if input.trim().is_empty() {
            return;
        }

        let expr = match self.parser.parse(input) {
            Ok(expr) => expr,
            Err(e) => {
                render_error(&e);
                return;
            }
        };

        if self.debug_parse {
            println!("=== Parsed tree ===");
            println!("{:#?}", expr.root());
            println!();
        }

        if self.reduced {
            println!("{}", expr.render(true));
        }

        let mut equation = Equation::new(expr);
        for (name, binding) in &self.bindings {
            equation.set_variable(name.as_str(), binding.clone());
        }

        let timeout = TimeoutManager::new(self.timeout);
        match equation.evaluate_with_timeout(&timeout) {
            Ok(value) => println!("{}", value),
            Err(e) => render_error(&e),
        }
    }
}

fn setup_reedline() -> (Reedline, DefaultPrompt) {
    let line_editor = Reedline::create()
        .with_highlighter(Box::new(highlighter::Highlighter))
        .with_validator(Box::new(lexer::Validator));

    let prompt = DefaultPrompt::new(DefaultPromptSegment::Empty, DefaultPromptSegment::Empty);

    (line_editor, prompt)
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging subscriber
    use tracing_subscriber::{EnvFilter, fmt};

    // Use RUST_LOG environment variable to control log level
    // Default to WARN if not set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let session = Session::new(&args)?;

    // Check if we have a direct expression argument
    if let Some(expr) = &args.expression {
        session.interpret_input(expr);
        return Ok(());
    }

    // Otherwise, check if we're in interactive or pipe mode
    let is_interactive = atty::is(atty::Stream::Stdin);

    if is_interactive {
        let (mut line_editor, prompt) = setup_reedline();

        println!("Formulon REPL - Type formulas to evaluate (Ctrl+D or Ctrl+C to exit)");

        loop {
            let sig = match line_editor.read_line(&prompt) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Reedline error: {e}");
                    return Ok(());
                }
            };

            match sig {
                Signal::Success(buffer) => session.interpret_input(&buffer),
                Signal::CtrlD | Signal::CtrlC => {
                    println!("\nGoodbye!");
                    return Ok(());
                }
            }
        }
    } else {
        // Pipe/stdin mode
        let stdin = std::io::stdin();
        let reader = BufReader::new(stdin.lock());

        for line in reader.lines() {
            let line = line.into_diagnostic()?;
            session.interpret_input(&line);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser as _;

    #[test]
    fn test_parse_binding() {
        assert_eq!(
            parse_binding("x=2"),
            Ok(("x".to_string(), "2".to_string()))
        );
        assert_eq!(
            parse_binding(" area = side ^ 2 "),
            Ok(("area".to_string(), "side ^ 2".to_string()))
        );
        assert!(parse_binding("x").is_err());
        assert!(parse_binding("=2").is_err());
    }

    #[test]
    fn test_args_map_onto_parser_options() {
        let args = Args::parse_from([
            "formulon",
            "--var",
            "x=2",
            "--no-fold",
            "--max-summation",
            "0",
            "sum(1, 3, n * x)",
        ]);
        let session = Session::new(&args).unwrap();
        let options = session.parser.options();
        assert!(!options.fold_constants);
        assert_eq!(options.limits.max_summation_iterations, 0);
        assert_eq!(session.bindings.len(), 1);
    }

    #[test]
    fn test_invalid_recursion_limit_is_rejected() {
        let args = Args::parse_from(["formulon", "--max-recursion", "1"]);
        assert!(Session::new(&args).is_err());
    }
}
