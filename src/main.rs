fn main() {
    if let Err(error) = yt_scribe::run() {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}
