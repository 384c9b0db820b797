fn main() {
    if let Err(err) = podcast_import::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
