use crate::driver::Session;

use rustyline::error::ReadlineError;
use rustyline::{Cmd, DefaultEditor, EventHandler, KeyCode, KeyEvent, Modifiers};

const HISTORY: &str = "target/history.txt";

pub fn repl_main(session: &mut Session) {
    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(err) => {
            eprintln!("error: {err}");
            return;
        }
    };
    _ = rl.load_history(HISTORY);
    rl.bind_sequence(
        KeyEvent(KeyCode::Tab, Modifiers::NONE),
        EventHandler::Simple(Cmd::Insert(1, "  ".into())),
    );

    let mut count = 0;
    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                if let Err(report) = session.evaluate_line(&line, format!("<repl {count}>")) {
                    let _ = report.print_stderr(&session.sources);
                }
                _ = rl.add_history_entry(line);
                count += 1;
            }
            Err(ReadlineError::Interrupted) => {
                println!("ctrl-c");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("ctrl-d");
                break;
            }
            Err(err) => {
                eprintln!("error: {:?}", err);
                break;
            }
        }
    }

    _ = rl.save_history(HISTORY);
}
