use std::{
    fs::File,
    io::{self, BufReader},
    path::Path,
    thread,
    time::Duration,
};

use log::{debug, error, warn};
use nmea_sim::{CycleReader, EpochGenerator, ShutdownToken};

use crate::transport::{SourceKind, TransportSink};

/// Body of the writer thread. Owns the sink, the generator or replay cursor,
/// and the RNG for the rest of the run; the controlling thread only touches
/// the shutdown token after spawning this.
///
/// Every failure path requests shutdown so the controlling thread always
/// reaches teardown.
pub fn run(
    mut sink: Box<dyn TransportSink>,
    source: SourceKind,
    interval: Duration,
    shutdown: ShutdownToken,
) {
    if let Err(err) = sink.connect() {
        error!("{err:#}");
        shutdown.request();
        return;
    }
    match source {
        SourceKind::Synthetic => stream_synthetic(sink.as_mut(), interval, &shutdown),
        SourceKind::Replay(path) => stream_replay(sink.as_mut(), &path, interval, &shutdown),
    }
}

fn stream_synthetic(sink: &mut dyn TransportSink, interval: Duration, shutdown: &ShutdownToken) {
    let mut generator = EpochGenerator::new();
    while !shutdown.is_requested() {
        let block = generator.next_epoch();
        debug!("sending epoch:\n{}", block.trim_end());
        if let Err(err) = sink.write_block(&block) {
            error!("error writing to {}: {err}", sink.label());
            shutdown.request();
            return;
        }
        thread::sleep(interval);
    }
}

fn stream_replay(
    sink: &mut dyn TransportSink,
    path: &Path,
    interval: Duration,
    shutdown: &ShutdownToken,
) {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) => {
            error!("failed to open replay log {}: {err}", path.display());
            shutdown.request();
            return;
        },
    };
    let mut reader = CycleReader::new(BufReader::new(file));

    while !shutdown.is_requested() {
        match reader.next_cycle(shutdown) {
            Ok(Some(cycle)) => {
                debug!("sending cycle of {} lines", cycle.len());
                if let Err(err) = write_cycle(sink, &cycle) {
                    error!("error writing to {}: {err}", sink.label());
                    shutdown.request();
                    return;
                }
                thread::sleep(interval);
            },
            Ok(None) => {
                if !shutdown.is_requested() {
                    warn!("replay log {} has no replayable lines", path.display());
                    shutdown.request();
                }
                break;
            },
            Err(err) => {
                error!("error reading replay log {}: {err}", path.display());
                shutdown.request();
                return;
            },
        }
    }

    // Single final flush of the partial cycle a stop request left behind
    if let Some(cycle) = reader.take_pending() {
        debug!("flushing final cycle of {} lines", cycle.len());
        if let Err(err) = write_cycle(sink, &cycle) {
            error!("error writing to {}: {err}", sink.label());
        }
    }
}

fn write_cycle(sink: &mut dyn TransportSink, cycle: &[String]) -> io::Result<()> {
    let mut block = String::new();
    for line in cycle {
        block.push_str(line);
        block.push_str("\r\n");
    }
    sink.write_block(&block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, path::PathBuf};

    /// Records every written block and requests shutdown once a configured
    /// number of writes has happened.
    struct RecordingSink {
        blocks: Vec<String>,
        stop_after: usize,
        shutdown: ShutdownToken,
    }

    impl RecordingSink {
        fn new(stop_after: usize, shutdown: &ShutdownToken) -> Self {
            Self {
                blocks: Vec::new(),
                stop_after,
                shutdown: shutdown.clone(),
            }
        }
    }

    impl TransportSink for RecordingSink {
        fn label(&self) -> String {
            "recording sink".to_string()
        }

        fn write_block(&mut self, block: &str) -> io::Result<()> {
            self.blocks.push(block.to_string());
            if self.blocks.len() >= self.stop_after {
                self.shutdown.request();
            }
            Ok(())
        }
    }

    fn scratch_log(name: &str, contents: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("nmea-sim-writer-{}-{name}", std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_synthetic_writes_at_most_once_after_shutdown() {
        let shutdown = ShutdownToken::new();
        let mut sink = RecordingSink::new(1, &shutdown);
        stream_synthetic(&mut sink, Duration::ZERO, &shutdown);
        assert_eq!(sink.blocks.len(), 1);
        assert!(sink.blocks[0].starts_with("$GPRMC,"));
    }

    #[test]
    fn test_synthetic_writes_nothing_when_already_stopped() {
        let shutdown = ShutdownToken::new();
        shutdown.request();
        let mut sink = RecordingSink::new(usize::MAX, &shutdown);
        stream_synthetic(&mut sink, Duration::ZERO, &shutdown);
        assert!(sink.blocks.is_empty());
    }

    #[test]
    fn test_replay_flushes_the_final_cycle_exactly_once() {
        let path = scratch_log(
            "cycles",
            "$GPGGA,before*00\n$GPRMC,first*00\n$GPGGA,mid*00\n$GPRMC,second*00\n",
        );
        let shutdown = ShutdownToken::new();
        let mut sink = RecordingSink::new(2, &shutdown);
        stream_replay(&mut sink, &path, Duration::ZERO, &shutdown);
        fs::remove_file(&path).unwrap();

        assert_eq!(
            sink.blocks,
            vec![
                "$GPGGA,before*00\r\n".to_string(),
                "$GPRMC,first*00\r\n$GPGGA,mid*00\r\n".to_string(),
                "$GPRMC,second*00\r\n".to_string(),
            ]
        );
    }

    #[test]
    fn test_replay_missing_log_requests_shutdown_without_writing() {
        let shutdown = ShutdownToken::new();
        let mut sink = RecordingSink::new(usize::MAX, &shutdown);
        stream_replay(
            &mut sink,
            Path::new("/nonexistent/capture.log"),
            Duration::ZERO,
            &shutdown,
        );
        assert!(shutdown.is_requested());
        assert!(sink.blocks.is_empty());
    }

    #[test]
    fn test_replay_empty_log_requests_shutdown() {
        let path = scratch_log("empty", "\n\n");
        let shutdown = ShutdownToken::new();
        let mut sink = RecordingSink::new(usize::MAX, &shutdown);
        stream_replay(&mut sink, &path, Duration::ZERO, &shutdown);
        fs::remove_file(&path).unwrap();

        assert!(shutdown.is_requested());
        assert!(sink.blocks.is_empty());
    }
}
