fn main() {
    if let Err(e) = coinjoin_scanner::cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
