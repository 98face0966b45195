use std::{
    io::{self, BufRead, Seek},
    mem,
};

use crate::{constants::RMC_DELIMITERS, shutdown::ShutdownToken};

/// One replay unit: the raw log lines captured between two RMC-class
/// delimiters, inclusive of the leading delimiter.
pub type ReplayCycle = Vec<String>;

/// Whether a log line opens a new cycle: after leading whitespace it starts
/// with one of the RMC sentence headers, any talker.
pub fn is_cycle_delimiter(line: &str) -> bool {
    let trimmed = line.trim_start();
    RMC_DELIMITERS
        .iter()
        .any(|header| trimmed.starts_with(header))
}

/// Streams RMC-delimited cycles out of a recorded sentence log.
///
/// Reaching end of input rewinds to the start, so a finite log replays until
/// the shutdown token is set. The token is polled before every consumed line;
/// a stop request mid-scan leaves the partial cycle buffered for
/// [`CycleReader::take_pending`].
pub struct CycleReader<R> {
    source: R,
    pending: ReplayCycle,
    lines_since_rewind: usize,
    delimiter_since_rewind: bool,
}

impl<R: BufRead + Seek> CycleReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            pending: Vec::new(),
            lines_since_rewind: 0,
            delimiter_since_rewind: false,
        }
    }

    /// Advance to the next complete cycle.
    ///
    /// `Ok(None)` means no further cycles will come: either the shutdown
    /// token was set, or the source holds no replayable lines at all. A log
    /// without any delimiter still replays, one full pass per cycle.
    pub fn next_cycle(&mut self, shutdown: &ShutdownToken) -> io::Result<Option<ReplayCycle>> {
        let mut line = String::new();
        loop {
            if shutdown.is_requested() {
                return Ok(None);
            }
            line.clear();
            if self.source.read_line(&mut line)? == 0 {
                if shutdown.is_requested() {
                    return Ok(None);
                }
                if self.lines_since_rewind == 0 {
                    // Rewinding an empty source would spin forever
                    return Ok(None);
                }
                let pass_cycle = if self.delimiter_since_rewind {
                    None
                } else {
                    // Delimiter-free log: a full pass becomes one cycle
                    Some(mem::take(&mut self.pending))
                };
                self.source.rewind()?;
                self.lines_since_rewind = 0;
                self.delimiter_since_rewind = false;
                if let Some(cycle) = pass_cycle {
                    return Ok(Some(cycle));
                }
                continue;
            }

            let text = line.trim_end_matches(['\r', '\n']);
            if text.is_empty() {
                continue;
            }
            self.lines_since_rewind += 1;

            if is_cycle_delimiter(text) {
                self.delimiter_since_rewind = true;
                if !self.pending.is_empty() {
                    let cycle = mem::replace(&mut self.pending, vec![text.to_string()]);
                    return Ok(Some(cycle));
                }
            }
            self.pending.push(text.to_string());
        }
    }

    /// Hand over whatever is still buffered. Used for the single final flush
    /// after a stop request.
    pub fn take_pending(&mut self) -> Option<ReplayCycle> {
        if self.pending.is_empty() {
            None
        } else {
            Some(mem::take(&mut self.pending))
        }
    }
}
