use copymon::plot::parse_cli;
use copymon::tick;

fn main() {
    let (csvfile, rate_svg, sleep_svg) = parse_cli();
    println!(
        "read data from {} and plot to {} and {}",
        csvfile.display(),
        rate_svg.display(),
        sleep_svg.display()
    );
    let rows = tick(&csvfile, &rate_svg, &sleep_svg).unwrap();
    println!("plotted {} rows", rows);
}
