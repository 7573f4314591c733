use plotters::prelude::*;
use std::error::Error;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
pub mod plot;
pub mod watch;

pub const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");

pub const COL_BYTES: &str = "BytesCopied";
pub const COL_RATE: &str = "DataRateKBps";
pub const COL_TARGET_RATE: &str = "TargetDataRateKBps";
pub const COL_SLEEP: &str = "SleepTimeMs";
pub const COL_CHUNK: &str = "ChunkSize";

const CHART_SIZE: (u32, u32) = (1600, 800);

/// The main struct for the copy-progress log,
/// one vector per csv column, in file row order.
#[derive(Debug, Clone)]
pub struct TransferLog {
    pub bytes_copied: Vec<f64>,
    pub data_rate_kbps: Vec<f64>,
    pub target_rate_kbps: Vec<f64>,
    pub sleep_time_ms: Vec<f64>,
    pub chunk_size: Vec<f64>,
}

impl TransferLog {
    pub fn new(capacity: usize) -> TransferLog {
        TransferLog {
            bytes_copied: Vec::with_capacity(capacity),
            data_rate_kbps: Vec::with_capacity(capacity),
            target_rate_kbps: Vec::with_capacity(capacity),
            sleep_time_ms: Vec::with_capacity(capacity),
            chunk_size: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes_copied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes_copied.is_empty()
    }

    /// Init a TransferLog from csv.
    /// The five required columns are located by name in the header row,
    /// their order in the file does not matter.
    /// A missing column or an unparsable field fails the whole read,
    /// partial tables are never returned.
    pub fn from_csv(fin: PathBuf) -> Result<TransferLog, Box<dyn Error>> {
        let file = File::open(&fin)
            .map_err(|e| format!("could not open csvfile {}, {}", fin.display(), e))?;
        let buf = BufReader::new(file);
        let mut lines = buf.lines();
        let header = match lines.next() {
            Some(h) => h?,
            None => return Err(format!("csvfile {} is empty", fin.display()).into()),
        };
        let names: Vec<&str> = header.split(',').map(|n| n.trim()).collect();
        let icol = |name: &str| -> Result<usize, String> {
            names
                .iter()
                .position(|&n| n == name)
                .ok_or_else(|| format!("column {} not found in csv header", name))
        };
        let ibytes = icol(COL_BYTES)?;
        let irate = icol(COL_RATE)?;
        let itarget = icol(COL_TARGET_RATE)?;
        let isleep = icol(COL_SLEEP)?;
        let ichunk = icol(COL_CHUNK)?;
        let mut log = TransferLog::new(10000 as usize);
        for (i, l) in lines.enumerate() {
            let l = l?;
            if l.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = l.split(',').collect();
            let row = i + 2; // 1-based, after the header
            log.bytes_copied
                .push(parse_field(&fields, ibytes, COL_BYTES, row)?);
            log.data_rate_kbps
                .push(parse_field(&fields, irate, COL_RATE, row)?);
            log.target_rate_kbps
                .push(parse_field(&fields, itarget, COL_TARGET_RATE, row)?);
            log.sleep_time_ms
                .push(parse_field(&fields, isleep, COL_SLEEP, row)?);
            log.chunk_size
                .push(parse_field(&fields, ichunk, COL_CHUNK, row)?);
        }
        Ok(log)
    }

    /// plots data rate and target data rate against bytes copied, to svg
    pub fn plot_data_rate(&self, fout: &Path) -> Result<(), Box<dyn Error>> {
        self.plot_pair(
            fout,
            "Data Rate vs Bytes Copied",
            "Data Rate (KBps)",
            (&self.data_rate_kbps, "Data Rate KBps"),
            (&self.target_rate_kbps, "Target Data Rate KBps"),
        )
    }

    /// plots sleep time and chunk size against bytes copied, to svg
    pub fn plot_sleep_chunk(&self, fout: &Path) -> Result<(), Box<dyn Error>> {
        self.plot_pair(
            fout,
            "Sleep Time and Chunk Size vs Bytes Copied",
            "Sleep Time (ms) / Chunk Size (bytes)",
            (&self.sleep_time_ms, "Sleep Time (ms)"),
            (&self.chunk_size, "Chunk Size (bytes)"),
        )
    }

    fn plot_pair(
        &self,
        fout: &Path,
        caption: &str,
        ydesc: &str,
        first: (&[f64], &str),
        second: (&[f64], &str),
    ) -> Result<(), Box<dyn Error>> {
        if self.is_empty() {
            return Err(format!("no data rows to plot for {}", caption).into());
        }
        let (xmin, xmax) = padded_range(&self.bytes_copied);
        let (y1min, y1max) = min_and_max(first.0);
        let (y2min, y2max) = min_and_max(second.0);
        let (ymin, ymax) = pad_span(y1min.min(y2min), y1max.max(y2max));
        let root = SVGBackend::new(fout, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)?;
        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .caption(caption, ("sans-serif", 32))
            .x_label_area_size(60)
            .y_label_area_size(100)
            .build_cartesian_2d(xmin..xmax, ymin..ymax)?;
        chart
            .configure_mesh()
            .light_line_style(&TRANSPARENT)
            .bold_line_style(RGBColor(150, 150, 150).stroke_width(2))
            .set_all_tick_mark_size(2)
            .label_style(("sans-serif", 24))
            .x_desc("Bytes Copied")
            .y_desc(ydesc)
            .x_label_formatter(&|x: &f64| format!("{:.0}", x))
            .y_label_formatter(&|y: &f64| format!("{:.0}", y))
            .draw()?;
        let first_style = RGBColor(200, 30, 30).stroke_width(2);
        let second_style = RGBColor(30, 30, 200).stroke_width(2);
        chart
            .draw_series(LineSeries::new(
                self.bytes_copied
                    .iter()
                    .zip(first.0.iter())
                    .map(|(&x, &y)| (x, y)),
                first_style,
            ))?
            .label(first.1)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 30, y)], first_style));
        chart
            .draw_series(LineSeries::new(
                self.bytes_copied
                    .iter()
                    .zip(second.0.iter())
                    .map(|(&x, &y)| (x, y)),
                second_style,
            ))?
            .label(second.1)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 30, y)], second_style));
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK.mix(0.3))
            .label_font(("sans-serif", 20))
            .position(SeriesLabelPosition::UpperRight)
            .draw()?;
        root.present()?;
        Ok(())
    }
}

impl std::fmt::Display for TransferLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{},{},{},{},{}\n",
            COL_BYTES, COL_RATE, COL_TARGET_RATE, COL_SLEEP, COL_CHUNK
        )?;
        for i in 0..self.len() {
            write!(
                f,
                "{},{},{},{},{}\n",
                self.bytes_copied[i],
                self.data_rate_kbps[i],
                self.target_rate_kbps[i],
                self.sleep_time_ms[i],
                self.chunk_size[i]
            )?
        }
        Ok(())
    }
}

/// One refresh cycle: full re-parse of the csv, then both charts.
/// Returns the number of rows plotted.
/// The previous table is never reused, the csv is read as it currently exists.
pub fn tick(
    csvfile: &Path,
    data_rate_svg: &Path,
    sleep_chunk_svg: &Path,
) -> Result<usize, Box<dyn Error>> {
    let log = TransferLog::from_csv(csvfile.to_path_buf())?;
    log.plot_data_rate(data_rate_svg)?;
    log.plot_sleep_chunk(sleep_chunk_svg)?;
    Ok(log.len())
}

fn parse_field(fields: &[&str], idx: usize, name: &str, row: usize) -> Result<f64, Box<dyn Error>> {
    let raw = fields
        .get(idx)
        .ok_or_else(|| format!("row {}: missing field {}", row, name))?;
    let v = raw
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("row {}: could not parse {} value {:?}, {}", row, name, raw, e))?;
    Ok(v)
}

pub fn min_and_max<T: std::cmp::PartialOrd + Copy>(s: &[T]) -> (T, T) {
    let mut self_iter = s.iter();
    let (mut min, mut max) = match self_iter.next() {
        Some(v) => (*v, *v),
        None => panic!("could not iterate over slice"),
    };
    for es in self_iter {
        if *es > max {
            max = *es
        }
        if *es < min {
            min = *es
        }
    }
    return (min, max);
}

/// min and max of a slice, widened by a tenth of the span on each side;
/// a constant column gets a fixed pad so the axis range stays non-empty
pub fn padded_range(s: &[f64]) -> (f64, f64) {
    let (min, max) = min_and_max(s);
    pad_span(min, max)
}

fn pad_span(min: f64, max: f64) -> (f64, f64) {
    let pad = if max > min { (max - min) / 10. } else { 1.0 };
    (min - pad, max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "BytesCopied,DataRateKBps,TargetDataRateKBps,SleepTimeMs,ChunkSize";

    fn write_csv(path: &Path, header: &str, rows: &[&str]) {
        let mut file = File::create(path).unwrap();
        writeln!(file, "{}", header).unwrap();
        for r in rows {
            writeln!(file, "{}", r).unwrap();
        }
    }

    #[test]
    fn from_csv_reads_all_columns() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("copy.csv");
        write_csv(&csv, HEADER, &["0,10,12,5,1024", "1024,11,12,4,1024"]);
        let log = TransferLog::from_csv(csv).unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log.bytes_copied, vec![0., 1024.]);
        assert_eq!(log.data_rate_kbps, vec![10., 11.]);
        assert_eq!(log.target_rate_kbps, vec![12., 12.]);
        assert_eq!(log.sleep_time_ms, vec![5., 4.]);
        assert_eq!(log.chunk_size, vec![1024., 1024.]);
    }

    #[test]
    fn from_csv_locates_columns_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("copy.csv");
        write_csv(
            &csv,
            "ChunkSize,SleepTimeMs,TargetDataRateKBps,DataRateKBps,BytesCopied",
            &["1024,5,12,10,0"],
        );
        let log = TransferLog::from_csv(csv).unwrap();
        assert_eq!(log.bytes_copied, vec![0.]);
        assert_eq!(log.data_rate_kbps, vec![10.]);
        assert_eq!(log.target_rate_kbps, vec![12.]);
        assert_eq!(log.sleep_time_ms, vec![5.]);
        assert_eq!(log.chunk_size, vec![1024.]);
    }

    #[test]
    fn from_csv_errors_on_missing_column() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("copy.csv");
        write_csv(
            &csv,
            "BytesCopied,DataRateKBps,TargetDataRateKBps,ChunkSize",
            &["0,10,12,1024"],
        );
        let err = TransferLog::from_csv(csv).unwrap_err();
        assert!(err.to_string().contains("SleepTimeMs"));
    }

    #[test]
    fn from_csv_errors_on_bad_value() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("copy.csv");
        write_csv(&csv, HEADER, &["0,10,12,5,1024", "1024,oops,12,4,1024"]);
        let err = TransferLog::from_csv(csv).unwrap_err();
        assert!(err.to_string().contains("DataRateKBps"));
        assert!(err.to_string().contains("row 3"));
    }

    #[test]
    fn from_csv_errors_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("not_there.csv");
        assert!(TransferLog::from_csv(csv).is_err());
    }

    #[test]
    fn tick_writes_both_charts() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("copy.csv");
        write_csv(&csv, HEADER, &["0,10,12,5,1024", "1024,11,12,4,1024"]);
        let rate_svg = dir.path().join("rate.svg");
        let sleep_svg = dir.path().join("sleep.svg");
        let rows = tick(&csv, &rate_svg, &sleep_svg).unwrap();
        assert_eq!(rows, 2);
        let rate = std::fs::read_to_string(&rate_svg).unwrap();
        let sleep = std::fs::read_to_string(&sleep_svg).unwrap();
        assert!(!rate.is_empty());
        assert!(!sleep.is_empty());
        assert!(rate.contains("Data Rate vs Bytes Copied"));
        assert!(sleep.contains("Sleep Time and Chunk Size vs Bytes Copied"));
        assert!(rate.contains("Target Data Rate KBps"));
        assert!(sleep.contains("Chunk Size (bytes)"));
    }

    #[test]
    fn tick_rereads_appended_rows() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("copy.csv");
        write_csv(&csv, HEADER, &["0,10,12,5,1024", "1024,11,12,4,1024"]);
        let rate_svg = dir.path().join("rate.svg");
        let sleep_svg = dir.path().join("sleep.svg");
        assert_eq!(tick(&csv, &rate_svg, &sleep_svg).unwrap(), 2);
        let mut file = std::fs::OpenOptions::new().append(true).open(&csv).unwrap();
        writeln!(file, "2048,12,12,3,1024").unwrap();
        assert_eq!(tick(&csv, &rate_svg, &sleep_svg).unwrap(), 3);
    }

    #[test]
    fn tick_handles_single_row() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("copy.csv");
        write_csv(&csv, HEADER, &["0,10,12,5,1024"]);
        let rate_svg = dir.path().join("rate.svg");
        let sleep_svg = dir.path().join("sleep.svg");
        assert_eq!(tick(&csv, &rate_svg, &sleep_svg).unwrap(), 1);
    }

    #[test]
    fn plot_errors_on_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let log = TransferLog::new(0);
        assert!(log.plot_data_rate(&dir.path().join("rate.svg")).is_err());
    }

    #[test]
    fn padded_range_widens_span() {
        assert_eq!(padded_range(&[0., 100.]), (-10., 110.));
        assert_eq!(padded_range(&[12., 12.]), (11., 13.));
    }

    #[test]
    fn display_roundtrips_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("copy.csv");
        write_csv(&csv, HEADER, &["0,10,12,5,1024"]);
        let log = TransferLog::from_csv(csv).unwrap();
        let text = log.to_string();
        assert!(text.starts_with(HEADER));
        assert!(text.contains("0,10,12,5,1024"));
    }
}
