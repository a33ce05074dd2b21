//! Radio configuration state.
//!
//! The console only talks to the radio through the [`Radio`] trait. The
//! transceiver driver itself lives outside this crate; [`FskRadio`] is the
//! configuration cache that sits between the two: it keeps the generic FSK
//! TX configuration, re-registers it with the [`RadioPhy`] on every change
//! and recomputes the TX timeout when the datarate moves.

use heapless::Vec;

use crate::config::{MAX_PAYLOAD, SYNCWORD_MAX_LEN};

/// Syncword bytes as stored by the radio.
pub type Syncword = Vec<u8, SYNCWORD_MAX_LEN>;

/// Radio operations used by the console commands.
pub trait Radio {
    fn frequency(&self) -> u32;
    fn set_frequency(&mut self, hz: u32);

    fn power(&self) -> u8;
    fn set_power(&mut self, dbm: u8);

    fn freq_deviation(&self) -> u32;
    fn set_freq_deviation(&mut self, hz: u32);

    fn datarate(&self) -> u32;
    fn set_datarate(&mut self, bps: u32);

    fn preamble_length(&self) -> u16;
    fn set_preamble_length(&mut self, bytes: u16);

    fn crc(&self) -> bool;
    fn set_crc(&mut self, enabled: bool);

    fn whitening(&self) -> bool;
    fn set_whitening(&mut self, enabled: bool, seed: u16);

    fn syncword(&self) -> Syncword;
    /// `word` is at most [`SYNCWORD_MAX_LEN`] bytes.
    fn set_syncword(&mut self, word: &[u8]);

    /// One-shot transmission. `payload` is shorter than [`MAX_PAYLOAD`].
    fn send(&mut self, payload: &[u8]);
    /// Resend `payload` every `period_ms` until stopped.
    fn start_continuous(&mut self, payload: &[u8], period_ms: u32);
    /// Stop periodic transmission. No effect if none is running.
    fn stop_continuous(&mut self);
}

/// CRC polynomial used when CRC is enabled (IBM).
pub const CRC_POLYNOMIAL: u16 = 0x8005;

/// Whitening seed used until one is configured.
pub const DEFAULT_WHITENING_SEED: u16 = 0xFFFF;

/// Generic FSK transmit configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxConfig {
    pub frequency: u32,
    pub power: u8,
    pub bitrate: u32,
    pub freq_deviation: u32,
    /// 2-byte CRC over [`CRC_POLYNOMIAL`] when set.
    pub crc: bool,
    /// x^9 + x^5 + 1 whitening when set.
    pub whitening: bool,
    pub whitening_seed: u16,
    pub preamble_len: u16,
    pub syncword: Syncword,
    /// Fixed-length packets (no header).
    pub fixed_length: bool,
    pub max_payload: u8,
    pub timeout_ms: u32,
}

impl TxConfig {
    /// Time allowed for one packet: twice the airtime of a full payload.
    pub const fn timeout_for(bitrate: u32) -> u32 {
        if bitrate == 0 {
            return u32::MAX;
        }
        2 * MAX_PAYLOAD as u32 * 1000 / bitrate
    }
}

impl Default for TxConfig {
    fn default() -> Self {
        Self {
            frequency: 433_000_000,
            power: 15,
            bitrate: 600,
            freq_deviation: 5_000,
            crc: false,
            whitening: false,
            whitening_seed: DEFAULT_WHITENING_SEED,
            preamble_len: 5,
            syncword: Vec::new(),
            fixed_length: true,
            max_payload: MAX_PAYLOAD as u8,
            timeout_ms: Self::timeout_for(600),
        }
    }
}

/// Transceiver driver operations consumed by [`FskRadio`].
pub trait RadioPhy {
    /// Tune the carrier.
    fn set_channel(&mut self, hz: u32);
    /// Program the complete TX configuration.
    fn apply_tx_config(&mut self, config: &TxConfig);
    /// Send one packet.
    fn send(&mut self, payload: &[u8]);
    /// Send `payload` every `period_ms` from the driver's timer.
    fn start_periodic(&mut self, payload: &[u8], period_ms: u32);
    fn stop_periodic(&mut self);
}

/// Configuration cache in front of a [`RadioPhy`].
#[derive(Debug)]
pub struct FskRadio<P> {
    config: TxConfig,
    phy: P,
    continuous: bool,
}

impl<P: RadioPhy> FskRadio<P> {
    /// Apply the default configuration to `phy`.
    pub fn new(mut phy: P) -> Self {
        let config = TxConfig::default();
        phy.set_channel(config.frequency);
        phy.apply_tx_config(&config);
        Self {
            config,
            phy,
            continuous: false,
        }
    }

    pub fn config(&self) -> &TxConfig {
        &self.config
    }

    /// Periodic transmission running.
    pub fn is_continuous(&self) -> bool {
        self.continuous
    }

    pub fn phy(&self) -> &P {
        &self.phy
    }

    pub fn phy_mut(&mut self) -> &mut P {
        &mut self.phy
    }

    fn register(&mut self) {
        self.phy.apply_tx_config(&self.config);
    }
}

impl<P: RadioPhy> Radio for FskRadio<P> {
    fn frequency(&self) -> u32 {
        self.config.frequency
    }

    fn set_frequency(&mut self, hz: u32) {
        self.config.frequency = hz;
        self.phy.set_channel(hz);
    }

    fn power(&self) -> u8 {
        self.config.power
    }

    fn set_power(&mut self, dbm: u8) {
        self.config.power = dbm;
        self.register();
    }

    fn freq_deviation(&self) -> u32 {
        self.config.freq_deviation
    }

    fn set_freq_deviation(&mut self, hz: u32) {
        self.config.freq_deviation = hz;
        self.register();
    }

    fn datarate(&self) -> u32 {
        self.config.bitrate
    }

    fn set_datarate(&mut self, bps: u32) {
        self.config.bitrate = bps;
        self.config.timeout_ms = TxConfig::timeout_for(bps);
        self.register();
    }

    fn preamble_length(&self) -> u16 {
        self.config.preamble_len
    }

    fn set_preamble_length(&mut self, bytes: u16) {
        self.config.preamble_len = bytes;
        self.register();
    }

    fn crc(&self) -> bool {
        self.config.crc
    }

    fn set_crc(&mut self, enabled: bool) {
        self.config.crc = enabled;
        self.register();
    }

    fn whitening(&self) -> bool {
        self.config.whitening
    }

    fn set_whitening(&mut self, enabled: bool, seed: u16) {
        self.config.whitening = enabled;
        self.config.whitening_seed = seed;
        self.register();
    }

    fn syncword(&self) -> Syncword {
        self.config.syncword.clone()
    }

    fn set_syncword(&mut self, word: &[u8]) {
        let len = word.len().min(SYNCWORD_MAX_LEN);
        self.config.syncword.clear();
        let _ = self.config.syncword.extend_from_slice(&word[..len]);
        self.register();
    }

    fn send(&mut self, payload: &[u8]) {
        self.phy.send(payload);
    }

    fn start_continuous(&mut self, payload: &[u8], period_ms: u32) {
        let len = payload.len().min(MAX_PAYLOAD);
        self.phy.start_periodic(&payload[..len], period_ms);
        self.continuous = true;
    }

    fn stop_continuous(&mut self) {
        self.phy.stop_periodic();
        self.continuous = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingPhy {
        registrations: usize,
        channel: u32,
        periodic: Option<u32>,
    }

    impl RadioPhy for CountingPhy {
        fn set_channel(&mut self, hz: u32) {
            self.channel = hz;
        }
        fn apply_tx_config(&mut self, _config: &TxConfig) {
            self.registrations += 1;
        }
        fn send(&mut self, _payload: &[u8]) {}
        fn start_periodic(&mut self, _payload: &[u8], period_ms: u32) {
            self.periodic = Some(period_ms);
        }
        fn stop_periodic(&mut self) {
            self.periodic = None;
        }
    }

    #[test]
    fn test_defaults_registered_on_new() {
        let radio = FskRadio::new(CountingPhy::default());
        assert_eq!(radio.phy().channel, 433_000_000);
        assert_eq!(radio.phy().registrations, 1);
        assert_eq!(radio.config().timeout_ms, 213);
    }

    #[test]
    fn test_datarate_recomputes_timeout() {
        let mut radio = FskRadio::new(CountingPhy::default());
        radio.set_datarate(128_000);
        assert_eq!(radio.config().timeout_ms, 1);
        assert_eq!(radio.phy().registrations, 2);
    }

    #[test]
    fn test_frequency_retunes_without_reregistering() {
        let mut radio = FskRadio::new(CountingPhy::default());
        radio.set_frequency(868_000_000);
        assert_eq!(radio.phy().channel, 868_000_000);
        assert_eq!(radio.phy().registrations, 1);
    }

    #[test]
    fn test_continuous_start_stop() {
        let mut radio = FskRadio::new(CountingPhy::default());
        radio.start_continuous(b"ping", 500);
        assert!(radio.is_continuous());
        assert_eq!(radio.phy().periodic, Some(500));

        radio.stop_continuous();
        assert!(!radio.is_continuous());
        assert_eq!(radio.phy().periodic, None);
    }

    #[test]
    fn test_syncword_truncated_to_max() {
        let mut radio = FskRadio::new(CountingPhy::default());
        radio.set_syncword(b"0123456789");
        assert_eq!(&radio.syncword()[..], b"01234567");
    }
}
