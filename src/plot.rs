use super::watch::{resolve_graph_dirs, svg_path};
use super::VERSION;
use clap::{App, Arg};
use std::path::PathBuf;

/// Takes the CLI arguments that control the one-shot plotting of the copy log.
pub fn parse_cli() -> (PathBuf, PathBuf, PathBuf) {
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
    let cli_args = App::new("copymon_plot")
        .version(VERSION.unwrap_or("unknown"))
        .about("cli app to plot the copy log once")
        .arg(arg_csvin)
        .arg(arg_graph_dir)
        .arg(arg_graph_dir2)
        .arg(arg_rate_name)
        .arg(arg_sleep_name)
        .get_matches();
    let csvin = PathBuf::from(cli_args.value_of("csvfile").unwrap_or_default());
    let (dir1, dir2) = resolve_graph_dirs(
        cli_args.value_of("graph_dir").unwrap_or_default(),
        cli_args.value_of("graph_dir2").unwrap_or_default(),
    );
    let rate_svg = svg_path(&dir1, cli_args.value_of("data_rate_name").unwrap_or_default());
    let sleep_svg = svg_path(&dir2, cli_args.value_of("sleep_chunk_name").unwrap_or_default());
    return (csvin, rate_svg, sleep_svg);
}
