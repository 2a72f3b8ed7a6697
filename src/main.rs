mod driver;
mod repl;

use crate::driver::{Options, Session};
use crate::repl::repl_main;

use atty::Stream;
use clap::Parser;
use env_logger::Env;
use std::{io::Read, process};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, help = "Type check the given declarations")]
    expr: Vec<String>,

    #[arg(short, long, help = "Type check the given file")]
    file: Vec<String>,

    #[arg(short, long, help = "Run in interactive mode")]
    interactive: bool,

    #[arg(short, long, default_value = "main", help = "Name of the module being checked")]
    module: String,

    #[arg(short, long, help = "Trace every unification step")]
    trace: bool,

    #[arg(long, help = "Print the typed tree of each declaration")]
    typed_ast: bool,
}

fn main() {
    let args = Args::parse();

    let filter = if args.trace {
        "warn,snacks_solve=trace"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(filter)).init();

    let mut interactive = args.interactive;
    let mut sources = Vec::new();
    if !args.expr.is_empty() {
        sources.push(("<expr>".to_owned(), args.expr.join("\n")));
    }
    for path in args.file {
        let code = read_from_file(&path);
        sources.push((path, code));
    }
    if atty::is(Stream::Stdin) {
        interactive |= sources.is_empty();
    } else {
        sources.push(("<stdin>".to_owned(), read_from_stdin()));
    }

    let options = Options {
        typed_ast: args.typed_ast,
    };
    let mut session = Session::new(&args.module, args.trace, options);
    for (file, src) in sources.into_iter() {
        let source_id = session.sources.add(file, src);
        if let Err(report) = session.evaluate(source_id) {
            let _ = report.print_stderr(&session.sources);
            process::exit(1);
        }
    }

    if interactive {
        repl_main(&mut session);
    }
}

//

fn read_from_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {path}: {err}");
            process::exit(1);
        }
    }
}

fn read_from_stdin() -> String {
    let mut code = String::new();
    match std::io::stdin().read_to_string(&mut code) {
        Ok(_) => code,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(1);
        }
    }
}
