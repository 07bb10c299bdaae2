use std::env;

use colored::Colorize;
use polycalc::{
    environment::Environment,
    evaluate::{evaluate, execute, Outcome},
    poly::Polynomial,
    printer::{PolynomialPrinter, PrintOptions},
    table::{Repository, SortedTable, Table, UnsortedTable},
};
use rustyline::{
    error::ReadlineError,
    history::History,
    DefaultEditor,
};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt, EnvFilter};

const HELP: &str = "\
  <expression>       evaluate an expression, e.g. (x+1)^2
  <name> = <expr>    bind the value of an expression to a name
  :save <expr>       save the value of an expression under a new key
  :get <key>         show a saved polynomial
  :del <key>         remove a saved polynomial
  :list              show all saved polynomials
  :vars              show all bound names
  :help              show this message
  q                  quit";

/// The state of an interactive session: the bound names and the saved polynomials.
struct Session<T: Table<usize, Polynomial>> {
    env: Environment,
    repository: Repository<T>,
    opts: PrintOptions,
}

impl<T: Table<usize, Polynomial>> Session<T> {
    fn new(table: T, opts: PrintOptions) -> Session<T> {
        Session {
            env: Environment::new(),
            repository: Repository::new(table),
            opts,
        }
    }

    fn print(&self, p: &Polynomial) -> String {
        PolynomialPrinter::new_with_options(p, self.opts).to_string()
    }

    fn parse_key(arg: &str) -> Result<usize, String> {
        arg.trim()
            .parse()
            .map_err(|_| format!("invalid key '{}': expected a positive integer", arg.trim()))
    }

    /// Run a single line of input and return the text to show.
    fn handle(&mut self, line: &str) -> Result<String, String> {
        let Some(command) = line.strip_prefix(':') else {
            return match execute(line, &mut self.env).map_err(|e| e.to_string())? {
                Outcome::Assigned { name, value } => Ok(format!("{} = {}", name, self.print(&value))),
                Outcome::Value(value) => Ok(self.print(&value)),
            };
        };

        let (command, arg) = command.split_once(' ').unwrap_or((command, ""));
        debug!("command '{}' with argument '{}'", command, arg);

        match command {
            "save" => {
                let p = evaluate(arg, &self.env).map_err(|e| e.to_string())?;
                let key = self.repository.add(p).map_err(|e| e.to_string())?;
                Ok(format!("Key: {}", key))
            }
            "get" => {
                let key = Self::parse_key(arg)?;
                match self.repository.get(key) {
                    Some(p) => Ok(format!("Key: {} = {}", key, self.print(p))),
                    None => Err(format!("no polynomial with key {}", key)),
                }
            }
            "del" => {
                let key = Self::parse_key(arg)?;
                let p = self
                    .repository
                    .remove(key)
                    .map_err(|e| format!("cannot remove key {}: {}", key, e))?;
                Ok(format!("Removed {} = {}", key, self.print(&p)))
            }
            "list" => {
                if self.repository.is_empty() {
                    return Ok("no saved polynomials".to_owned());
                }

                Ok(self
                    .repository
                    .iter()
                    .map(|(k, p)| format!("Key: {} = {}", k, self.print(p)))
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
            "vars" => {
                if self.env.is_empty() {
                    return Ok("no bound names".to_owned());
                }

                Ok(self
                    .env
                    .iter()
                    .map(|(name, p)| format!("{} = {}", name, self.print(p)))
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
            "help" => Ok(HELP.to_owned()),
            _ => Err(format!("unknown command ':{}', type :help for a list", command)),
        }
    }
}

/// Add a line to the editor history, logging a failure.
fn remember<H: History>(history: &mut H, line: &str) {
    match history.add(line) {
        Ok(added) => debug!("history entry '{}' added: {}", line, added),
        Err(e) => debug!("cannot add '{}' to the history: {}", line, e),
    }
}

fn run<T: Table<usize, Polynomial>>(table: T, opts: PrintOptions) -> Result<(), ReadlineError> {
    let mut session = Session::new(table, opts);
    let mut rl = DefaultEditor::new()?;

    loop {
        match rl.readline("> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line == "q" {
                    break;
                }

                remember(rl.history_mut(), line);

                match session.handle(line) {
                    Ok(out) => println!("{}", out),
                    Err(e) => println!("{} {}", "Error:".red().bold(), e),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e),
        }
    }

    Ok(())
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_env("POLYCALC_LOG"))
        .init();

    if env::var("POLYCALC_HIDE_BANNER").is_err() {
        println!(
            "{} {}: enter an expression such as {}, {} for help or {} to quit.",
            "polycalc".bold(),
            env!("CARGO_PKG_VERSION"),
            "(x+1)^2".green(),
            ":help".bold(),
            "q".bold()
        );
    }

    let opts = PrintOptions {
        precision: env::var("POLYCALC_PRECISION")
            .ok()
            .and_then(|p| p.parse().ok()),
    };

    let r = match env::var("POLYCALC_TABLE").as_deref() {
        Ok("sorted") => run(SortedTable::new(), opts),
        _ => run(UnsortedTable::new(), opts),
    };

    if let Err(e) = r {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
