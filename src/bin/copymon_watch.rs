use copymon::tick;
use copymon::watch::parse_cli_watch;
use std::time::Duration;

fn main() {
    let (csvfile, rate_svg, sleep_svg, interval, verbose) = parse_cli_watch();
    println!(
        "watch {} every {} ms, plot to {} and {}",
        csvfile.display(),
        interval,
        rate_svg.display(),
        sleep_svg.display()
    );
    let interval = Duration::from_millis(interval);
    loop {
        // a tick must finish before the next one is scheduled
        let rows = tick(&csvfile, &rate_svg, &sleep_svg).unwrap();
        if verbose {
            println!("plotted {} rows from {}", rows, csvfile.display());
        }
        std::thread::sleep(interval);
    }
}
