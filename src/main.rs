use std::{env, io};

use equilibre::command::{LOG_LEVEL_VAR, Session, log_level};
use log::debug;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

fn initialize_logging() {
    let level = log_level(env::var(LOG_LEVEL_VAR).ok().as_deref());
    if let Err(err) = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("logging disabled: {err}");
    }
}

fn main() -> io::Result<()> {
    initialize_logging();

    let mut session = Session::new();
    session.run_script(io::stdin().lock(), |result| match result {
        Ok(outcome) => println!("{outcome}"),
        Err(err) => eprintln!("error: {err}"),
    })?;

    debug!(
        "done with {} keys, {} rotations",
        session.tree().len(),
        session.tree().callbacks().rotations()
    );
    Ok(())
}
