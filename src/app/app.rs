use clap::Parser;
use log::info;

use crate::util::log::{init_terminal_logger, level_from_verbosity};

use super::Session;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Log verbosity: 0 = off, 1 = info, 2 = debug, 3 = trace.
    #[arg(short, long, default_value_t = 0)]
    pub log: u8,
}

pub struct App {
    pub args: CliArgs,
}

impl App {
    pub fn new() -> Self {
        let args = CliArgs::parse();
        App { args }
    }

    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.init_logger()?;
        info!("args: {:?}", self.args);

        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        let mut session = Session::new(stdin.lock(), stdout.lock());
        session.run()?;
        Ok(())
    }

    fn init_logger(&self) -> Result<(), log::SetLoggerError> {
        init_terminal_logger(level_from_verbosity(self.args.log))
    }
}
