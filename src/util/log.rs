pub fn init_terminal_logger(l: log::LevelFilter) -> Result<(), log::SetLoggerError> {
    use simplelog::*;

    let mut cb = ConfigBuilder::new();
    cb.set_location_level(LevelFilter::Off);
    cb.set_target_level(LevelFilter::Off);
    cb.set_thread_level(LevelFilter::Off);
    let config = cb.build();

    // logs go to stderr; the session owns stdout
    TermLogger::init(l, config, TerminalMode::Stderr, ColorChoice::Auto)
}

pub fn level_from_verbosity(v: u8) -> log::LevelFilter {
    use log::LevelFilter::*;
    match v {
        0 => Off,
        1 => Info,
        2 => Debug,
        _ => Trace,
    }
}
