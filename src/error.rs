use std::fmt;

#[derive(Debug)]
pub enum StageError {
    Speech(SpeechError),
    Config(ConfigError),
}

#[derive(Debug)]
pub enum SpeechError {
    NoVoiceAvailable,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidTempo { bpm: f64 },
    EmptyPattern,
    InvalidCounterDuration { ms: f64 },
    InvalidLeadIn { beats: f64 },
    Parse(serde_json::Error),
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageError::Speech(e) => write!(f, "Speech error: {e}"),
            StageError::Config(e) => write!(f, "Config error: {e}"),
        }
    }
}

impl std::error::Error for StageError {}

impl fmt::Display for SpeechError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeechError::NoVoiceAvailable => write!(f, "No speech voice available"),
        }
    }
}

impl std::error::Error for SpeechError {}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTempo { bpm } => write!(f, "Invalid tempo: {bpm} BPM"),
            ConfigError::EmptyPattern => write!(f, "Beat pattern has no steps"),
            ConfigError::InvalidCounterDuration { ms } => {
                write!(f, "Invalid counter duration: {ms} ms")
            }
            ConfigError::InvalidLeadIn { beats } => {
                write!(f, "Invalid lead-in: {beats} beats")
            }
            ConfigError::Parse(e) => write!(f, "Config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<SpeechError> for StageError {
    fn from(e: SpeechError) -> Self {
        StageError::Speech(e)
    }
}

impl From<ConfigError> for StageError {
    fn from(e: ConfigError) -> Self {
        StageError::Config(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}
