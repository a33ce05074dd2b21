//! Command handler tests
//!
//! Lines go through the same [`Dispatcher`] the worker uses, against an
//! [`FskRadio`] over a recording PHY.

use subghz_cli::console::ansi;
use subghz_cli::console::registry::{Dispatcher, Output};
use subghz_cli::console::{command_names, COMMANDS};
use subghz_cli::radio::{FskRadio, Radio, RadioPhy, TxConfig, DEFAULT_WHITENING_SEED};

#[derive(Default)]
struct RecordingPhy {
    channel: u32,
    registered: Option<TxConfig>,
    sent: Vec<Vec<u8>>,
    periodic: Option<(Vec<u8>, u32)>,
}

impl RadioPhy for RecordingPhy {
    fn set_channel(&mut self, hz: u32) {
        self.channel = hz;
    }

    fn apply_tx_config(&mut self, config: &TxConfig) {
        self.registered = Some(config.clone());
    }

    fn send(&mut self, payload: &[u8]) {
        self.sent.push(payload.to_vec());
    }

    fn start_periodic(&mut self, payload: &[u8], period_ms: u32) {
        self.periodic = Some((payload.to_vec(), period_ms));
    }

    fn stop_periodic(&mut self) {
        self.periodic = None;
    }
}

struct Bench {
    dispatcher: Dispatcher,
    radio: FskRadio<RecordingPhy>,
}

impl Bench {
    fn new() -> Self {
        Self {
            dispatcher: Dispatcher::new(COMMANDS),
            radio: FskRadio::new(RecordingPhy::default()),
        }
    }

    /// Every chunk produced for `line`.
    fn chunks(&mut self, line: &str) -> Vec<String> {
        let mut out = Output::new();
        let mut chunks = Vec::new();
        loop {
            let more = self.dispatcher.dispatch(line, &mut self.radio, &mut out);
            if !out.is_empty() {
                chunks.push(out.as_str().to_string());
            }
            if !more {
                return chunks;
            }
        }
    }

    fn run(&mut self, line: &str) -> String {
        self.chunks(line).concat()
    }
}

const UNKNOWN: &str = "Command not recognised. Enter 'help' to view a list of available commands.\r\n";

#[test]
fn test_command_registry_has_all_commands() {
    let expected = [
        "help",
        "clear",
        "freq",
        "freqDeviation",
        "power",
        "datarate",
        "preamble",
        "crc",
        "whitening",
        "syncword",
        "transmit",
        "transmitContinuous",
    ];

    assert_eq!(command_names().collect::<Vec<_>>(), expected);
}

#[test]
fn test_empty_line_produces_nothing() {
    let mut bench = Bench::new();
    assert!(bench.chunks("").is_empty());
    assert!(bench.chunks("   ").is_empty());
}

#[test]
fn test_unknown_command() {
    let mut bench = Bench::new();
    assert_eq!(bench.run("foobar"), UNKNOWN);
    // Case-sensitive
    assert_eq!(bench.run("FREQ"), UNKNOWN);
}

#[test]
fn test_help_streams_one_chunk_per_command() {
    let mut bench = Bench::new();
    let chunks = bench.chunks("help");

    assert_eq!(chunks.len(), COMMANDS.len());
    for (chunk, cmd) in chunks.iter().zip(COMMANDS) {
        assert_eq!(chunk, &format!("{}\r\n", cmd.help));
        assert!(chunk.starts_with(cmd.name));
    }

    // Dispatcher is ready for the next line
    assert_eq!(bench.chunks("help").len(), COMMANDS.len());
}

#[test]
fn test_help_rejects_arguments() {
    let mut bench = Bench::new();
    assert_eq!(bench.run("help me"), "Invalid Arguments\r\n");
}

#[test]
fn test_clear() {
    let mut bench = Bench::new();
    assert_eq!(bench.run("clear"), ansi::CLEAR_SCREEN);
}

#[test]
fn test_freq_get_and_set() {
    let mut bench = Bench::new();

    assert_eq!(bench.run("freq"), "Frequency = 433.000 MHz\r\n");
    assert_eq!(bench.run("freq 2000000"), "Frequency Set Successfully\r\n");
    assert_eq!(bench.run("freq"), "Frequency = 2.000 MHz\r\n");
    assert_eq!(bench.radio.phy().channel, 2_000_000);

    bench.run("freq 868125000");
    assert_eq!(bench.run("freq"), "Frequency = 868.125 MHz\r\n");
}

#[test]
fn test_freq_bounds() {
    let mut bench = Bench::new();

    assert_eq!(bench.run("freq 999999"), "Invalid Frequency\r\n");
    assert_eq!(bench.run("freq 1000000000"), "Invalid Frequency\r\n");
    assert_eq!(bench.run("freq 915MHz"), "Invalid Frequency\r\n");
    assert_eq!(bench.radio.frequency(), 433_000_000);

    assert_eq!(bench.run("freq 1000000"), "Frequency Set Successfully\r\n");
    assert_eq!(bench.run("freq 999999999"), "Frequency Set Successfully\r\n");
}

#[test]
fn test_freq_deviation() {
    let mut bench = Bench::new();

    assert_eq!(bench.run("freqDeviation"), "Frequency Deviation = 5000 Hz\r\n");
    assert_eq!(bench.run("freqDeviation 99"), "Invalid Frequency Deviation\r\n");
    assert_eq!(bench.run("freqDeviation 100001"), "Invalid Frequency Deviation\r\n");
    assert_eq!(bench.run("freqDeviation 100000"), "Frequency Deviation Set Successfully\r\n");
    assert_eq!(bench.radio.phy().registered.as_ref().unwrap().freq_deviation, 100_000);
}

#[test]
fn test_power_out_of_range_leaves_value() {
    let mut bench = Bench::new();

    assert_eq!(bench.run("power 25"), "Invalid Power\r\n");
    assert_eq!(bench.run("power 0"), "Invalid Power\r\n");
    assert_eq!(bench.run("power"), "Power = 15 dBm\r\n");

    assert_eq!(bench.run("power 22"), "Power Set Successfully\r\n");
    assert_eq!(bench.run("power"), "Power = 22 dBm\r\n");
}

#[test]
fn test_datarate_updates_timeout() {
    let mut bench = Bench::new();

    assert_eq!(bench.run("datarate"), "Datarate = 600 bps\r\n");
    assert_eq!(bench.run("datarate 1200"), "Datarate Set Successfully\r\n");
    assert_eq!(bench.radio.config().timeout_ms, 106);
    assert_eq!(bench.run("datarate 500001"), "Invalid Datarate\r\n");
    assert_eq!(bench.radio.datarate(), 1200);
}

#[test]
fn test_preamble() {
    let mut bench = Bench::new();

    assert_eq!(bench.run("preamble"), "Preamble Length = 5 bytes\r\n");
    assert_eq!(bench.run("preamble 31"), "Invalid Preamble Length\r\n");
    assert_eq!(bench.run("preamble 8"), "Preamble Length Set Successfully\r\n");
    assert_eq!(bench.run("preamble"), "Preamble Length = 8 bytes\r\n");
}

#[test]
fn test_crc() {
    let mut bench = Bench::new();

    assert_eq!(bench.run("crc"), "CRC = off\r\n");
    assert_eq!(bench.run("crc on"), "CRC Set Successfully\r\n");
    assert_eq!(bench.run("crc"), "CRC = on\r\n");
    assert_eq!(bench.run("crc yes"), "Invalid CRC\r\n");
    assert!(bench.radio.crc());
}

#[test]
fn test_whitening_with_seed_forces_crc() {
    let mut bench = Bench::new();

    assert_eq!(bench.run("whitening on 1234"), "Whitening Set Successfully\r\n");
    assert!(bench.radio.whitening());
    assert!(bench.radio.crc());
    assert_eq!(bench.radio.config().whitening_seed, 0x04D2);
    assert_eq!(bench.run("whitening"), "Whitening = on\r\n");
}

#[test]
fn test_whitening_default_seed_and_off() {
    let mut bench = Bench::new();

    bench.run("whitening on 1234");
    bench.run("whitening on");
    assert_eq!(bench.radio.config().whitening_seed, DEFAULT_WHITENING_SEED);

    bench.run("whitening off");
    assert!(!bench.radio.whitening());
    // Disabling whitening leaves CRC alone
    assert!(bench.radio.crc());
}

#[test]
fn test_whitening_invalid() {
    let mut bench = Bench::new();

    assert_eq!(bench.run("whitening maybe"), "Invalid Whitening\r\n");
    assert_eq!(bench.run("whitening on 70000"), "Invalid Whitening Seed\r\n");
    assert!(!bench.radio.whitening());
}

#[test]
fn test_syncword_set_and_show() {
    let mut bench = Bench::new();

    assert_eq!(bench.run("syncword"), "Syncword of size 0: \r\n");
    assert_eq!(bench.run("syncword 4 ABCD"), "Syncword Set Successfully\r\n");
    assert_eq!(bench.run("syncword"), "Syncword of size 4: ABCD\r\n");
}

#[test]
fn test_syncword_length_rules() {
    let mut bench = Bench::new();

    assert_eq!(bench.run("syncword 9 ABCDEFGHI"), "Invalid Syncword Length\r\n");
    assert_eq!(bench.run("syncword 3"), "Invalid Arguments\r\n");

    bench.run("syncword 2 ABCD");
    assert_eq!(&bench.radio.syncword()[..], b"AB");

    bench.run("syncword 0");
    assert!(bench.radio.syncword().is_empty());
}

#[test]
fn test_transmit() {
    let mut bench = Bench::new();

    assert_eq!(bench.run("transmit hello world"), "Message Transmitted\r\n");
    assert_eq!(bench.radio.phy().sent, [b"hello world".to_vec()]);
}

#[test]
fn test_transmit_payload_limits() {
    let mut bench = Bench::new();

    assert_eq!(bench.run("transmit"), "Invalid Arguments\r\n");

    let too_long = format!("transmit {}", "a".repeat(64));
    assert_eq!(bench.run(&too_long), "Invalid Message\r\n");

    let longest = format!("transmit {}", "a".repeat(63));
    assert_eq!(bench.run(&longest), "Message Transmitted\r\n");
    assert_eq!(bench.radio.phy().sent.len(), 1);
}

#[test]
fn test_transmit_continuous_start_stop() {
    let mut bench = Bench::new();

    assert_eq!(
        bench.run("transmitContinuous 500 ping"),
        "Continuous Transmission Started\r\n"
    );
    assert!(bench.radio.is_continuous());
    assert_eq!(bench.radio.phy().periodic, Some((b"ping".to_vec(), 500)));

    assert_eq!(bench.run("transmitContinuous 0"), "Continuous Transmission Stopped\r\n");
    assert!(!bench.radio.is_continuous());
    assert_eq!(bench.radio.phy().periodic, None);
}

#[test]
fn test_transmit_continuous_zero_stops_whatever_follows() {
    let mut bench = Bench::new();

    // Nothing running yet
    assert_eq!(
        bench.run("transmitContinuous 0 anything"),
        "Continuous Transmission Stopped\r\n"
    );
    assert_eq!(bench.radio.phy().periodic, None);
    assert!(!bench.radio.is_continuous());

    bench.run("transmitContinuous 250 beacon");
    assert!(bench.radio.is_continuous());

    assert_eq!(
        bench.run("transmitContinuous 0 anything"),
        "Continuous Transmission Stopped\r\n"
    );
    assert_eq!(bench.radio.phy().periodic, None);
    assert!(!bench.radio.is_continuous());
}

#[test]
fn test_transmit_continuous_invalid() {
    let mut bench = Bench::new();

    assert_eq!(bench.run("transmitContinuous"), "Invalid Arguments\r\n");
    assert_eq!(bench.run("transmitContinuous fast ping"), "Invalid Period\r\n");
    assert_eq!(bench.run("transmitContinuous 100"), "Invalid Arguments\r\n");
    assert!(!bench.radio.is_continuous());
}
