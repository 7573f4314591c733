use super::VERSION;
use clap::{App, Arg};
use std::path::{Path, PathBuf};

/// Takes the CLI arguments that control the periodic refresh of the charts.
pub fn parse_cli_watch() -> (PathBuf, PathBuf, PathBuf, u64, bool) {
    let arg_csvin = Arg::with_name("csvfile")
        .help("path of the csv copy log")
        .index(1)
        .required(true);
    let arg_graph_dir = Arg::with_name("graph_dir")
        .help("directory for the data rate svg")
        .index(2)
        .required(true);
    let arg_graph_dir2 = Arg::with_name("graph_dir2")
        .help("directory for the sleep/chunk svg, empty to reuse graph_dir")
        .index(3)
        .required(true);
    let arg_rate_name = Arg::with_name("data_rate_name")
        .help("base name of the data rate svg")
        .index(4)
        .required(true);
    let arg_sleep_name = Arg::with_name("sleep_chunk_name")
        .help("base name of the sleep/chunk svg")
        .index(5)
        .required(true);
    let arg_interval = Arg::with_name("interval")
        .help("refresh period in milliseconds")
        .short("i")
        .long("interval")
        .takes_value(true)
        .default_value("1000");
    let arg_verbose = Arg::with_name("verbose")
        .help("print a line after every refresh")
        .short("v")
        .long("verbose")
        .takes_value(false)
        .required(false);
    let cli_args = App::new("copymon_watch")
        .version(VERSION.unwrap_or("unknown"))
        .about("cli app to redraw the copy log charts on a timer")
        .arg(arg_csvin)
        .arg(arg_graph_dir)
        .arg(arg_graph_dir2)
        .arg(arg_rate_name)
        .arg(arg_sleep_name)
        .arg(arg_interval)
        .arg(arg_verbose)
        .get_matches();
    let csvin = PathBuf::from(cli_args.value_of("csvfile").unwrap_or_default());
    let (dir1, dir2) = resolve_graph_dirs(
        cli_args.value_of("graph_dir").unwrap_or_default(),
        cli_args.value_of("graph_dir2").unwrap_or_default(),
    );
    let rate_svg = svg_path(&dir1, cli_args.value_of("data_rate_name").unwrap_or_default());
    let sleep_svg = svg_path(&dir2, cli_args.value_of("sleep_chunk_name").unwrap_or_default());
    let interval = cli_args
        .value_of("interval")
        .unwrap_or_default()
        .parse::<u64>()
        .unwrap();
    let verbose: bool = cli_args.is_present("verbose");
    return (csvin, rate_svg, sleep_svg, interval, verbose);
}

/// An empty second directory means both charts go to the first one.
pub fn resolve_graph_dirs(graph_dir: &str, graph_dir2: &str) -> (PathBuf, PathBuf) {
    let dir1 = PathBuf::from(graph_dir);
    let dir2 = if graph_dir2.is_empty() {
        dir1.clone()
    } else {
        PathBuf::from(graph_dir2)
    };
    (dir1, dir2)
}

pub fn svg_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.svg", name))
}
