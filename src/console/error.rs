//! Console error types

/// Radio parameter named in a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
    Frequency,
    FrequencyDeviation,
    Power,
    Datarate,
    PreambleLength,
    Crc,
    Whitening,
    WhiteningSeed,
    SyncwordLength,
    Message,
    Period,
}

impl Parameter {
    /// Name as shown to the user.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Frequency => "Frequency",
            Self::FrequencyDeviation => "Frequency Deviation",
            Self::Power => "Power",
            Self::Datarate => "Datarate",
            Self::PreambleLength => "Preamble Length",
            Self::Crc => "CRC",
            Self::Whitening => "Whitening",
            Self::WhiteningSeed => "Whitening Seed",
            Self::SyncwordLength => "Syncword Length",
            Self::Message => "Message",
            Self::Period => "Period",
        }
    }
}

/// Command failure. Always recovered: the text goes back to the user and
/// radio state is left as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// Argument present but malformed or out of range
    Invalid(Parameter),
    /// Required argument missing, or wrong argument count
    InvalidArguments,
    /// First token matches no command
    UnknownCommand,
}

impl CommandError {
    /// Fixed part of the message.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Invalid(_) => "Invalid",
            Self::InvalidArguments => "Invalid Arguments",
            Self::UnknownCommand => {
                "Command not recognised. Enter 'help' to view a list of available commands."
            }
        }
    }
}

impl core::fmt::Display for CommandError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Invalid(p) => write!(f, "{} {}", self.message(), p.name()),
            _ => f.write_str(self.message()),
        }
    }
}
