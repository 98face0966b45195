use std::{
    fs::{self, File, OpenOptions},
    io::{self, Write},
    os::unix::fs::FileTypeExt,
    path::{Path, PathBuf},
    thread,
    time::Duration,
};

use anyhow::{bail, Context, Result};
use log::{debug, error, info, warn};
use nix::{
    pty::openpty,
    sys::stat::Mode,
    sys::termios::{self, BaudRate, ControlFlags, InputFlags, LocalFlags, OutputFlags, SetArg},
    unistd::{mkfifo, ttyname},
};
use serialport::FlowControl as SerialFlowControl;

const BAUD_RATE: u32 = 9600;
const SYMLINK_RETRIES: u32 = 3;
const SYMLINK_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Where the sentence stream goes. When several are requested on the
/// command line, selection priority is serial, then pipe, then the virtual
/// serial port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportKind {
    Pipe(PathBuf),
    Serial(String),
    Pty { link: PathBuf },
}

/// What produces the sentence stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    Synthetic,
    Replay(PathBuf),
}

impl TransportKind {
    /// Run the sink-specific setup and hand back a ready sink. Nothing is
    /// written yet; a failure here aborts the run before the writer starts.
    pub fn open(&self) -> Result<Box<dyn TransportSink>> {
        match self {
            TransportKind::Serial(port) => Ok(Box::new(SerialSink::open(port)?)),
            TransportKind::Pipe(path) => Ok(Box::new(PipeSink::create(path)?)),
            TransportKind::Pty { link } => Ok(Box::new(PtySink::create(link)?)),
        }
    }
}

/// A configured delivery target for sentence blocks.
///
/// Construction performs the sink-specific setup, [`connect`] runs at the
/// start of the write loop and may block, and dropping the sink closes the
/// write end and removes the filesystem artifacts the setup created.
///
/// [`connect`]: TransportSink::connect
pub trait TransportSink: Send {
    /// Human-readable delivery target for log and console lines.
    fn label(&self) -> String;

    /// Late open at stream start. The default does nothing.
    fn connect(&mut self) -> Result<()> {
        Ok(())
    }

    fn write_block(&mut self, block: &str) -> io::Result<()>;
}

/// Named pipe sink. The FIFO node is created at setup when missing and
/// removed again on drop; the write end opens lazily in [`connect`] because
/// opening a FIFO for writing blocks until a reader attaches.
///
/// [`connect`]: TransportSink::connect
pub struct PipeSink {
    path: PathBuf,
    pipe: Option<File>,
}

impl PipeSink {
    pub fn create(path: &Path) -> Result<Self> {
        match fs::metadata(path) {
            Err(_) => {
                mkfifo(path, Mode::from_bits_truncate(0o666))
                    .with_context(|| format!("failed to create named pipe {}", path.display()))?;
                info!("named pipe created at {}", path.display());
            },
            Ok(metadata) if metadata.file_type().is_fifo() => {
                info!("using existing named pipe {}", path.display());
            },
            Ok(_) => bail!("path exists and is not a FIFO: {}", path.display()),
        }
        Ok(Self {
            path: path.to_path_buf(),
            pipe: None,
        })
    }
}

impl TransportSink for PipeSink {
    fn label(&self) -> String {
        format!("named pipe {}", self.path.display())
    }

    fn connect(&mut self) -> Result<()> {
        info!("waiting for a reader on {}", self.path.display());
        let pipe = OpenOptions::new()
            .write(true)
            .open(&self.path)
            .with_context(|| format!("failed to open named pipe {}", self.path.display()))?;
        self.pipe = Some(pipe);
        Ok(())
    }

    fn write_block(&mut self, block: &str) -> io::Result<()> {
        match &mut self.pipe {
            Some(pipe) => {
                pipe.write_all(block.as_bytes())?;
                pipe.flush()
            },
            None => Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "named pipe is not open for writing",
            )),
        }
    }
}

impl Drop for PipeSink {
    fn drop(&mut self) {
        self.pipe.take();
        match fs::remove_file(&self.path) {
            Ok(()) => info!("named pipe removed: {}", self.path.display()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {},
            Err(err) => error!("error removing named pipe {}: {err}", self.path.display()),
        }
    }
}

/// Serial port sink, opened at setup with the fixed line settings
/// (9600 baud, 8N1, no flow control).
pub struct SerialSink {
    port_name: String,
    port: Box<dyn serialport::SerialPort>,
}

impl SerialSink {
    pub fn open(port_name: &str) -> Result<Self> {
        let builder = serialport::new(port_name, BAUD_RATE)
            .stop_bits(serialport::StopBits::One)
            .data_bits(serialport::DataBits::Eight)
            // Generous write timeout; the line rate caps throughput anyway
            .timeout(Duration::from_secs(30))
            .parity(serialport::Parity::None)
            .flow_control(SerialFlowControl::None);
        debug!("{:?}", &builder);
        let port = builder
            .open()
            .with_context(|| format!("failed to open serial port {port_name}"))?;
        Ok(Self {
            port_name: port_name.to_string(),
            port,
        })
    }
}

impl TransportSink for SerialSink {
    fn label(&self) -> String {
        format!("serial port {}", self.port_name)
    }

    fn write_block(&mut self, block: &str) -> io::Result<()> {
        self.port.write_all(block.as_bytes())
    }
}

/// Virtual serial port sink: a PTY pair whose slave end is configured like
/// a receiver's serial line and published behind a stable symlink. Data is
/// written to the master end.
pub struct PtySink {
    master: File,
    slave_path: PathBuf,
    link: Option<PathBuf>,
}

impl PtySink {
    pub fn create(link: &Path) -> Result<Self> {
        let pty = openpty(None, None).context("failed to create virtual serial port")?;
        let slave_path =
            ttyname(&pty.slave).context("failed to resolve the virtual serial port name")?;
        info!("virtual serial port created at {}", slave_path.display());

        configure_slave(&pty.slave)
            .with_context(|| format!("failed to configure {}", slave_path.display()))?;
        drop(pty.slave);

        let link = match symlink_with_retries(&slave_path, link) {
            Ok(()) => Some(link.to_path_buf()),
            Err(err) => {
                warn!("{err:#}; continuing without symlink");
                None
            },
        };

        Ok(Self {
            master: File::from(pty.master),
            slave_path,
            link,
        })
    }
}

impl TransportSink for PtySink {
    fn label(&self) -> String {
        match &self.link {
            Some(link) => format!("virtual serial port {}", link.display()),
            None => format!("virtual serial port {}", self.slave_path.display()),
        }
    }

    fn write_block(&mut self, block: &str) -> io::Result<()> {
        self.master.write_all(block.as_bytes())
    }
}

impl Drop for PtySink {
    fn drop(&mut self) {
        if let Some(link) = &self.link {
            match fs::remove_file(link) {
                Ok(()) => info!("symbolic link removed: {}", link.display()),
                Err(err) => error!("error removing symbolic link {}: {err}", link.display()),
            }
        }
    }
}

/// Put the slave end into the receiver-like line discipline: 9600 baud,
/// 8 data bits, no parity, one stop bit, no flow control, raw
/// non-canonical input, raw output.
fn configure_slave<Fd: std::os::fd::AsFd>(slave: &Fd) -> Result<()> {
    let mut tty = termios::tcgetattr(slave).context("failed to get terminal attributes")?;

    termios::cfsetispeed(&mut tty, BaudRate::B9600).context("failed to set input speed")?;
    termios::cfsetospeed(&mut tty, BaudRate::B9600).context("failed to set output speed")?;

    tty.control_flags &= !(ControlFlags::PARENB
        | ControlFlags::CSTOPB
        | ControlFlags::CSIZE
        | ControlFlags::CRTSCTS);
    tty.control_flags |= ControlFlags::CS8 | ControlFlags::CREAD | ControlFlags::CLOCAL;
    tty.local_flags &=
        !(LocalFlags::ICANON | LocalFlags::ECHO | LocalFlags::ECHOE | LocalFlags::ISIG);
    tty.input_flags &= !(InputFlags::IXON | InputFlags::IXOFF | InputFlags::IXANY);
    tty.output_flags &= !OutputFlags::OPOST;

    termios::tcsetattr(slave, SetArg::TCSANOW, &tty).context("failed to set terminal attributes")
}

/// A stale link from an earlier run would make `symlink` fail with
/// `EEXIST`, so any existing one is removed first.
fn symlink_with_retries(slave_path: &Path, link: &Path) -> Result<()> {
    if let Err(err) = fs::remove_file(link) {
        if err.kind() != io::ErrorKind::NotFound {
            warn!(
                "failed to remove existing symbolic link {}: {err}",
                link.display()
            );
        }
    }

    let mut attempts = SYMLINK_RETRIES;
    loop {
        match std::os::unix::fs::symlink(slave_path, link) {
            Ok(()) => {
                info!("symbolic link created at {}", link.display());
                return Ok(());
            },
            Err(err) => {
                attempts -= 1;
                if attempts == 0 {
                    return Err(err).with_context(|| {
                        format!(
                            "failed to create symbolic link {} after {SYMLINK_RETRIES} attempts",
                            link.display()
                        )
                    });
                }
                warn!(
                    "failed to create symbolic link {}: {err}; retrying in {}s",
                    link.display(),
                    SYMLINK_RETRY_DELAY.as_secs()
                );
                thread::sleep(SYMLINK_RETRY_DELAY);
            },
        }
    }
}
