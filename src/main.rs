fn main() {
    if let Err(err) = fincsv::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
