use polyc::app::App;

fn main() {
    let app = App::new();

    if let Err(e) = app.run() {
        log::error!("{}", e);
        eprintln!("\x1b[0;31merror\x1b[0m: {e}");
        std::process::exit(1)
    }
}
