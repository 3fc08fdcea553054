use std::rc::Rc;

use rustyline::error::ReadlineError;

use slip::{eval_str, Env};

fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // script files run first and share the interactive environment
    let session = Rc::new(Env::nested(
        Vec::new(),
        Vec::new(),
        Some(Rc::new(Env::root())),
    ));
    for path in std::env::args().skip(1) {
        let source = std::fs::read_to_string(&path).map_err(|e| format!("{}: {}", path, e))?;
        if let Err(err) = eval_str(&source, &session) {
            return Err(format!("{}: {}", path, err));
        }
    }

    let mut rl = rustyline::DefaultEditor::new().map_err(|e| e.to_string())?;
    loop {
        match rl.readline("~> ") {
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(()),
            Err(e) => return Err(format!("readline: {:?}", e)),
            Ok(line) if line == "QUIT" => return Ok(()),
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                match eval_str(&line, &session) {
                    Ok(result) => println!("{}", result),
                    Err(err) => println!("error: {}", err),
                }
            }
        }
    }
}
