//! Command handlers

use core::fmt::Write;

use super::ansi;
use super::error::{CommandError, Parameter};
use super::parser::{next_token, parse_switch, parse_u32};
use super::registry::{Command, Context, Output};
use crate::config::{MAX_PAYLOAD, SYNCWORD_MAX_LEN};
use crate::radio::DEFAULT_WHITENING_SEED;

/// All available commands
pub static COMMANDS: &[Command] = &[
    Command {
        name: "help",
        help: "help: Lists all the registered commands",
        handler: cmd_help,
        arity: 0,
    },
    Command {
        name: "clear",
        help: "clear: Clears the screen",
        handler: cmd_clear,
        arity: 0,
    },
    Command {
        name: "freq",
        help: "freq [Hz]: Get or set the carrier frequency",
        handler: cmd_freq,
        arity: -1,
    },
    Command {
        name: "freqDeviation",
        help: "freqDeviation [Hz]: Get or set the FSK frequency deviation",
        handler: cmd_freq_deviation,
        arity: -1,
    },
    Command {
        name: "power",
        help: "power [dBm]: Get or set the transmit power",
        handler: cmd_power,
        arity: -1,
    },
    Command {
        name: "datarate",
        help: "datarate [bps]: Get or set the bitrate",
        handler: cmd_datarate,
        arity: -1,
    },
    Command {
        name: "preamble",
        help: "preamble [bytes]: Get or set the preamble length",
        handler: cmd_preamble,
        arity: -1,
    },
    Command {
        name: "crc",
        help: "crc [on|off]: Get or set packet CRC",
        handler: cmd_crc,
        arity: -1,
    },
    Command {
        name: "whitening",
        help: "whitening [on|off [seed]]: Get or set whitening (enabling forces CRC on)",
        handler: cmd_whitening,
        arity: -1,
    },
    Command {
        name: "syncword",
        help: "syncword [len] [word]: Get or set the syncword (up to 8 bytes)",
        handler: cmd_syncword,
        arity: -1,
    },
    Command {
        name: "transmit",
        help: "transmit <msg>: Send one packet",
        handler: cmd_transmit,
        arity: -1,
    },
    Command {
        name: "transmitContinuous",
        help: "transmitContinuous <ms> [msg]: Resend msg every ms milliseconds, 0 stops",
        handler: cmd_transmit_continuous,
        arity: -1,
    },
];

/// Get all command names
pub fn command_names() -> impl Iterator<Item = &'static str> {
    COMMANDS.iter().map(|c| c.name)
}

// --- Bounds ---

const FREQ_MIN: u32 = 1_000_000;
const FREQ_MAX: u32 = 1_000_000_000; // exclusive
const DEVIATION_MIN: u32 = 100;
const DEVIATION_MAX: u32 = 100_000;
const POWER_MAX: u32 = 22;
const DATARATE_MAX: u32 = 500_000;
const PREAMBLE_MAX: u32 = 30;

// --- Helpers ---

/// Write one line of response text.
fn say(out: &mut Output, args: core::fmt::Arguments<'_>) {
    let _ = out.write_fmt(args);
    let _ = out.write_str("\r\n");
}

fn set_ok(out: &mut Output, param: Parameter) {
    say(out, format_args!("{} Set Successfully", param.name()));
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

/// Parse the optional first argument of a numeric setter.
///
/// `Ok(None)`: no argument, report the current value.
fn setting(args: &str, param: Parameter, valid: impl Fn(u32) -> bool) -> Result<Option<u32>, CommandError> {
    match next_token(args) {
        None => Ok(None),
        Some((token, _)) => parse_u32(token)
            .filter(|v| valid(*v))
            .map(Some)
            .ok_or(CommandError::Invalid(param)),
    }
}

/// Validate a payload argument.
fn payload(msg: &str) -> Result<&[u8], CommandError> {
    let msg = msg.trim_end();
    if msg.is_empty() {
        return Err(CommandError::InvalidArguments);
    }
    if msg.len() >= MAX_PAYLOAD {
        return Err(CommandError::Invalid(Parameter::Message));
    }
    Ok(msg.as_bytes())
}

// --- Command Implementations ---

fn cmd_help(ctx: &mut Context<'_>, _args: &str, out: &mut Output) -> Result<bool, CommandError> {
    match ctx.commands.get(ctx.chunk) {
        Some(c) => {
            say(out, format_args!("{}", c.help));
            Ok(ctx.chunk + 1 < ctx.commands.len())
        }
        None => Ok(false),
    }
}

fn cmd_clear(_ctx: &mut Context<'_>, _args: &str, out: &mut Output) -> Result<bool, CommandError> {
    let _ = out.write_str(ansi::CLEAR_SCREEN);
    Ok(false)
}

fn cmd_freq(ctx: &mut Context<'_>, args: &str, out: &mut Output) -> Result<bool, CommandError> {
    match setting(args, Parameter::Frequency, |hz| (FREQ_MIN..FREQ_MAX).contains(&hz))? {
        None => {
            let hz = ctx.radio.frequency();
            say(out, format_args!("Frequency = {}.{:03} MHz", hz / 1_000_000, (hz % 1_000_000) / 1_000));
        }
        Some(hz) => {
            ctx.radio.set_frequency(hz);
            set_ok(out, Parameter::Frequency);
        }
    }
    Ok(false)
}

fn cmd_freq_deviation(ctx: &mut Context<'_>, args: &str, out: &mut Output) -> Result<bool, CommandError> {
    match setting(args, Parameter::FrequencyDeviation, |hz| {
        (DEVIATION_MIN..=DEVIATION_MAX).contains(&hz)
    })? {
        None => say(out, format_args!("Frequency Deviation = {} Hz", ctx.radio.freq_deviation())),
        Some(hz) => {
            ctx.radio.set_freq_deviation(hz);
            set_ok(out, Parameter::FrequencyDeviation);
        }
    }
    Ok(false)
}

fn cmd_power(ctx: &mut Context<'_>, args: &str, out: &mut Output) -> Result<bool, CommandError> {
    match setting(args, Parameter::Power, |dbm| (1..=POWER_MAX).contains(&dbm))? {
        None => say(out, format_args!("Power = {} dBm", ctx.radio.power())),
        Some(dbm) => {
            // Bounded to 22 above.
            ctx.radio.set_power(dbm as u8);
            set_ok(out, Parameter::Power);
        }
    }
    Ok(false)
}

fn cmd_datarate(ctx: &mut Context<'_>, args: &str, out: &mut Output) -> Result<bool, CommandError> {
    match setting(args, Parameter::Datarate, |bps| (1..=DATARATE_MAX).contains(&bps))? {
        None => say(out, format_args!("Datarate = {} bps", ctx.radio.datarate())),
        Some(bps) => {
            ctx.radio.set_datarate(bps);
            set_ok(out, Parameter::Datarate);
        }
    }
    Ok(false)
}

fn cmd_preamble(ctx: &mut Context<'_>, args: &str, out: &mut Output) -> Result<bool, CommandError> {
    match setting(args, Parameter::PreambleLength, |n| (1..=PREAMBLE_MAX).contains(&n))? {
        None => say(out, format_args!("Preamble Length = {} bytes", ctx.radio.preamble_length())),
        Some(n) => {
            ctx.radio.set_preamble_length(n as u16);
            set_ok(out, Parameter::PreambleLength);
        }
    }
    Ok(false)
}

fn cmd_crc(ctx: &mut Context<'_>, args: &str, out: &mut Output) -> Result<bool, CommandError> {
    match next_token(args) {
        None => say(out, format_args!("CRC = {}", on_off(ctx.radio.crc()))),
        Some((token, _)) => {
            let enabled = parse_switch(token).ok_or(CommandError::Invalid(Parameter::Crc))?;
            ctx.radio.set_crc(enabled);
            set_ok(out, Parameter::Crc);
        }
    }
    Ok(false)
}

fn cmd_whitening(ctx: &mut Context<'_>, args: &str, out: &mut Output) -> Result<bool, CommandError> {
    let Some((token, rest)) = next_token(args) else {
        say(out, format_args!("Whitening = {}", on_off(ctx.radio.whitening())));
        return Ok(false);
    };

    let enabled = parse_switch(token).ok_or(CommandError::Invalid(Parameter::Whitening))?;
    let seed = match next_token(rest) {
        None => DEFAULT_WHITENING_SEED,
        Some((seed, _)) => parse_u32(seed)
            .and_then(|s| u16::try_from(s).ok())
            .ok_or(CommandError::Invalid(Parameter::WhiteningSeed))?,
    };

    ctx.radio.set_whitening(enabled, seed);
    if enabled {
        ctx.radio.set_crc(true);
    }
    set_ok(out, Parameter::Whitening);
    Ok(false)
}

fn cmd_syncword(ctx: &mut Context<'_>, args: &str, out: &mut Output) -> Result<bool, CommandError> {
    let Some((len, rest)) = next_token(args) else {
        let word = ctx.radio.syncword();
        let _ = write!(out, "Syncword of size {}: ", word.len());
        ansi::write_bytes(out, &word);
        let _ = out.write_str("\r\n");
        return Ok(false);
    };

    let len = parse_u32(len)
        .map(|l| l as usize)
        .filter(|l| *l <= SYNCWORD_MAX_LEN)
        .ok_or(CommandError::Invalid(Parameter::SyncwordLength))?;

    let word: &[u8] = match next_token(rest) {
        Some((word, _)) => word.as_bytes(),
        None if len == 0 => &[],
        None => return Err(CommandError::InvalidArguments),
    };

    ctx.radio.set_syncword(&word[..len.min(word.len())]);
    say(out, format_args!("Syncword Set Successfully"));
    Ok(false)
}

fn cmd_transmit(ctx: &mut Context<'_>, args: &str, out: &mut Output) -> Result<bool, CommandError> {
    let msg = payload(args)?;
    ctx.radio.send(msg);
    say(out, format_args!("Message Transmitted"));
    Ok(false)
}

fn cmd_transmit_continuous(ctx: &mut Context<'_>, args: &str, out: &mut Output) -> Result<bool, CommandError> {
    let (period, rest) = next_token(args).ok_or(CommandError::InvalidArguments)?;
    let period_ms = parse_u32(period).ok_or(CommandError::Invalid(Parameter::Period))?;

    if period_ms == 0 {
        ctx.radio.stop_continuous();
        say(out, format_args!("Continuous Transmission Stopped"));
        return Ok(false);
    }

    let msg = payload(rest)?;
    ctx.radio.start_continuous(msg, period_ms);
    say(out, format_args!("Continuous Transmission Started"));
    Ok(false)
}
