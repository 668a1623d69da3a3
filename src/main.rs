fn main() {
    #[cfg(feature = "cli")]
    packdelta::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("packdelta: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
