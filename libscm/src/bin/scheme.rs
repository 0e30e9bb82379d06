use libscm::repl::{run_line, ReplConfig};
use libscm::Interpreter;

// Logging goes to stderr and only when RUST_LOG is set.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn main() -> Result<(), String> {
    init_tracing();
    let config = ReplConfig::from_env();
    let interp = Interpreter::new();

    use rustyline::error::ReadlineError;
    let mut rl = rustyline::DefaultEditor::new().map_err(|e| e.to_string())?;
    loop {
        match rl.readline(&config.prompt) {
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(()),
            Err(e) => return Err(format!("Readline err: {:?}", e)),
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                if let Err(e) = run_line(&interp, &line, |value| println!("{}", value)) {
                    println!("Error: {}", e);
                }
            }
        }
    }
}
