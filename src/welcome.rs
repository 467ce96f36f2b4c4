use tracing::info;

pub fn welcome(run_mode: &str) {

    let version = env!("CARGO_PKG_VERSION");

    let title = [
        r"  ____            _        _     ",
        r" |  _ \ ___ _ __ | |_ __ _| |___ ",
        r" | |_) / _ \ '_ \| __/ _` | / __|",
        r" |  _ <  __/ | | | || (_| | \__ \",
        r" |_| \_\___|_| |_|\__\__,_|_|___/",
    ];
    for line in title {
        println!("{}", line);
    }
    println!();
    println!("Version: {} | Run-Mode: {}", version, run_mode);
    println!();
    info!("Starting up the rentals realtime service in {run_mode} mode.");
}
