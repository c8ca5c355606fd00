fn main() {
    if let Err(err) = eve_client::cli::main() {
        eprintln!("❌ {err}");
        std::process::exit(1);
    }
}
