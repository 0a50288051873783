fn main() {
    sqlshape_cli::logging::init();
    if let Err(e) = sqlshape_cli::run(std::env::args().collect()) {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}
