//! SubGhzCli - Main entry point
//!
//! On ESP-IDF: UART1 console, one thread per side (RX driver callback
//! context and the console worker). Logs drain to stderr (the IDF console
//! UART) between response chunks.
//!
//! On host: the same console over stdin/stdout, for scripting and manual
//! testing. `\n` from the terminal is sent as CR LF.

use std::fmt;

use subghz_cli::radio::{RadioPhy, TxConfig};
use subghz_cli::{cli_info, CLI_LOG_STREAM};

/// Radio PHY stand-in that records what would go over the air in the log.
struct LoggedPhy {
    clock: fn() -> i64,
}

impl RadioPhy for LoggedPhy {
    fn set_channel(&mut self, hz: u32) {
        cli_info!(CLI_LOG_STREAM, (self.clock)(), "channel {} Hz", hz);
    }

    fn apply_tx_config(&mut self, config: &TxConfig) {
        cli_info!(
            CLI_LOG_STREAM,
            (self.clock)(),
            "tx config: {} dBm {} bps fdev {} crc {} white {} seed {:#06x}",
            config.power,
            config.bitrate,
            config.freq_deviation,
            config.crc,
            config.whitening,
            config.whitening_seed
        );
    }

    fn send(&mut self, payload: &[u8]) {
        cli_info!(CLI_LOG_STREAM, (self.clock)(), "send {} bytes", payload.len());
    }

    fn start_periodic(&mut self, payload: &[u8], period_ms: u32) {
        cli_info!(CLI_LOG_STREAM, (self.clock)(), "periodic {} bytes every {} ms", payload.len(), period_ms);
    }

    fn stop_periodic(&mut self) {
        cli_info!(CLI_LOG_STREAM, (self.clock)(), "periodic stopped");
    }
}

/// `fmt::Write` adapter over a byte sink.
struct TextSink<W>(W);

impl<W: std::io::Write> fmt::Write for TextSink<W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.write_all(s.as_bytes()).map_err(|_| fmt::Error)?;
        self.0.flush().map_err(|_| fmt::Error)
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() -> std::io::Result<()> {
    host::run()
}

#[cfg(target_os = "espidf")]
fn main() -> Result<(), esp_idf_svc::sys::EspError> {
    esp::run()
}

#[cfg(not(target_os = "espidf"))]
mod host {
    use std::io::{self, Read, Write};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::OnceLock;
    use std::thread;
    use std::time::Instant;

    use subghz_cli::cli_error;
    use subghz_cli::console::{Echo, Transmitter};
    use subghz_cli::log_drain::drain_to;
    use subghz_cli::sync::{Notify, StdNotify, StdState};
    use subghz_cli::{CommandQueue, ConsoleConfig, FskRadio, Receiver, Session, Worker, CLI_LOG_STREAM, COMMANDS};

    use super::{LoggedPhy, TextSink};

    fn now_us() -> i64 {
        static START: OnceLock<Instant> = OnceLock::new();
        START.get_or_init(Instant::now).elapsed().as_micros() as i64
    }

    struct StdoutEcho;

    impl Echo for StdoutEcho {
        fn write(&mut self, bytes: &[u8]) {
            let mut stdout = io::stdout().lock();
            let _ = stdout.write_all(bytes);
            let _ = stdout.flush();
        }
    }

    /// Writes synchronously, so completion is signalled right away.
    struct StdoutTransmitter<'a> {
        tx_done: &'a StdNotify,
    }

    impl Transmitter for StdoutTransmitter<'_> {
        fn start(&mut self, bytes: &[u8]) {
            let mut stdout = io::stdout().lock();
            let _ = stdout.write_all(bytes);
            let _ = stdout.flush();
            self.tx_done.notify();
        }
    }

    pub fn run() -> io::Result<()> {
        let config = ConsoleConfig {
            clock: now_us,
            ..ConsoleConfig::default()
        };

        let session = StdState::new(Session::new());
        let mut queue = CommandQueue::new();
        let (producer, consumer) = queue.split();
        let line_ready = StdNotify::new();
        let tx_done = StdNotify::new();
        let eof = AtomicBool::new(false);

        let radio = FskRadio::new(LoggedPhy { clock: now_us });
        let mut worker = Worker::new(
            &session,
            consumer,
            &line_ready,
            &tx_done,
            StdoutTransmitter { tx_done: &tx_done },
            radio,
            COMMANDS,
            config,
        );

        thread::scope(|scope| {
            let rx = scope.spawn(|| -> io::Result<()> {
                let mut receiver = Receiver::new(&session, producer, &line_ready, &config);
                let mut echo = StdoutEcho;
                let mut last = 0u8;
                for byte in io::stdin().lock().bytes() {
                    let byte = match byte {
                        Ok(b) => b,
                        Err(e) => {
                            cli_error!(CLI_LOG_STREAM, now_us(), "stdin read failed: {}", e);
                            eof.store(true, Ordering::Release);
                            line_ready.notify();
                            return Err(e);
                        }
                    };
                    if byte == b'\n' && last != b'\r' {
                        receiver.on_byte(b'\r', &mut echo);
                    }
                    receiver.on_byte(byte, &mut echo);
                    last = byte;
                }
                eof.store(true, Ordering::Release);
                line_ready.notify();
                Ok(())
            });

            let mut logs = TextSink(io::stderr());
            worker.start();
            loop {
                while worker.service() {
                    drain_to(&CLI_LOG_STREAM, &mut logs);
                }
                if eof.load(Ordering::Acquire) {
                    // Lines queued before EOF are still served.
                    while worker.service() {}
                    break;
                }
                line_ready.wait();
            }
            drain_to(&CLI_LOG_STREAM, &mut logs);

            rx.join().unwrap_or_else(|_| Err(io::Error::other("receiver thread panicked")))
        })
    }
}

#[cfg(target_os = "espidf")]
mod esp {
    use std::sync::Mutex;
    use std::thread;

    use esp_idf_svc::hal::delay::BLOCK;
    use esp_idf_svc::hal::gpio::{self, AnyOutputPin, Output, PinDriver};
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::hal::uart::{self, UartDriver, UartTxDriver};
    use esp_idf_svc::hal::units::Hertz;
    use esp_idf_svc::sys::{self, EspError};

    use subghz_cli::cli_error;
    use subghz_cli::console::{ActivityIndicator, Echo, Transmitter};
    use subghz_cli::log_drain::drain_to;
    use subghz_cli::sync::{Notify, StdNotify, StdState};
    use subghz_cli::{CommandQueue, ConsoleConfig, FskRadio, Receiver, Session, Worker, CLI_LOG_STREAM, COMMANDS};

    use super::{LoggedPhy, TextSink};

    const BAUD_RATE: u32 = 115_200;

    fn now_us() -> i64 {
        // SAFETY: esp_timer_get_time is always safe to call
        unsafe { sys::esp_timer_get_time() }
    }

    /// Write all of `bytes`, stopping early on a driver error.
    fn write_all(tx: &mut UartTxDriver<'_>, mut bytes: &[u8]) {
        while !bytes.is_empty() {
            match tx.write(bytes) {
                Ok(n) => bytes = &bytes[n..],
                Err(_) => break,
            }
        }
    }

    /// Shared TX side: echo from the RX thread, responses from the worker.
    struct UartEcho<'a, 'd>(&'a Mutex<UartTxDriver<'d>>);

    impl Echo for UartEcho<'_, '_> {
        fn write(&mut self, bytes: &[u8]) {
            if let Ok(mut tx) = self.0.lock() {
                write_all(&mut tx, bytes);
            }
        }
    }

    struct UartTransmitter<'a, 'd> {
        tx: &'a Mutex<UartTxDriver<'d>>,
        tx_done: &'a StdNotify,
    }

    impl Transmitter for UartTransmitter<'_, '_> {
        fn start(&mut self, bytes: &[u8]) {
            if let Ok(mut tx) = self.tx.lock() {
                write_all(&mut tx, bytes);
                let _ = tx.wait_done(BLOCK);
            }
            // Logs go out between chunks, never inside one.
            drain_to(&CLI_LOG_STREAM, &mut TextSink(std::io::stderr()));
            self.tx_done.notify();
        }
    }

    struct Led<'d>(PinDriver<'d, AnyOutputPin, Output>);

    impl ActivityIndicator for Led<'_> {
        fn toggle(&mut self) {
            let _ = self.0.toggle();
        }
    }

    pub fn run() -> Result<(), EspError> {
        sys::link_patches();

        let peripherals = Peripherals::take()?;
        let uart_config = uart::config::Config::default().baudrate(Hertz(BAUD_RATE));
        let mut uart = UartDriver::new(
            peripherals.uart1,
            peripherals.pins.gpio17,
            peripherals.pins.gpio18,
            Option::<gpio::AnyIOPin>::None, // CTS
            Option::<gpio::AnyIOPin>::None, // RTS
            &uart_config,
        )?;
        let (tx, rx) = uart.split();
        let tx = Mutex::new(tx);
        let led = Led(PinDriver::output(peripherals.pins.gpio2.downgrade_output())?);

        let config = ConsoleConfig {
            clock: now_us,
            ..ConsoleConfig::default()
        };

        let session = StdState::new(Session::new());
        let mut queue = CommandQueue::new();
        let (producer, consumer) = queue.split();
        let line_ready = StdNotify::new();
        let tx_done = StdNotify::new();

        // TODO: bind the SX126x driver behind RadioPhy once the radio board is wired
        let radio = FskRadio::new(LoggedPhy { clock: now_us });

        let (session, line_ready, tx_done, tx) = (&session, &line_ready, &tx_done, &tx);

        thread::scope(|scope| {
            scope.spawn(move || {
                let mut receiver = Receiver::new(session, producer, line_ready, &config).with_indicator(led);
                let mut echo = UartEcho(tx);
                let mut byte = [0u8; 1];
                loop {
                    // Reading re-arms reception for the next byte.
                    match rx.read(&mut byte, BLOCK) {
                        Ok(1) => receiver.on_byte(byte[0], &mut echo),
                        Ok(_) => {}
                        Err(e) => cli_error!(CLI_LOG_STREAM, now_us(), "uart read failed: {}", e),
                    }
                }
            });

            let mut worker = Worker::new(
                session,
                consumer,
                line_ready,
                tx_done,
                UartTransmitter { tx, tx_done },
                radio,
                COMMANDS,
                config,
            );
            worker.run()
        })
    }
}
