use crate::error::BlackjackGameError;
use log::warn;
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

/// Default location of the save file, relative to the working directory.
pub const SAVE_FILE: &str = "bj.txt";

/// The state kept between runs: number of decks, bankroll and current bet, in that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveRecord {
    pub num_decks: usize,
    pub bankroll: u64,
    pub current_bet: u64,
}

impl FromStr for SaveRecord {
    type Err = BlackjackGameError;

    /// Parses `decks|bankroll|bet`. Surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || BlackjackGameError::MalformedSaveRecord(s.trim().to_string());
        let fields: Vec<&str> = s.trim().split('|').map(str::trim).collect();
        if fields.len() != 3 {
            return Err(malformed());
        }

        Ok(SaveRecord {
            num_decks: fields[0].parse().map_err(|_| malformed())?,
            bankroll: fields[1].parse().map_err(|_| malformed())?,
            current_bet: fields[2].parse().map_err(|_| malformed())?,
        })
    }
}

impl Display for SaveRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}|{}|{}", self.num_decks, self.bankroll, self.current_bet)
    }
}

impl SaveRecord {
    /// Reads and parses the record at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<SaveRecord, BlackjackGameError> {
        std::fs::read_to_string(path)?.parse()
    }

    /// Reads the record at `path`, returning `None` when it is missing or unreadable and logging a warning when
    /// it cannot be parsed.
    pub fn load_if_present<P: AsRef<Path>>(path: P) -> Option<SaveRecord> {
        match SaveRecord::load(&path) {
            Ok(record) => Some(record),
            Err(BlackjackGameError::Io(_)) => None,
            Err(e) => {
                warn!("ignoring {}: {e}", path.as_ref().display());
                None
            }
        }
    }

    /// Writes the record to `path`, replacing any previous record. The record is written to a sibling temporary
    /// file first and then renamed over `path`, so an interrupted write never leaves a partial record.
    pub fn store<P: AsRef<Path>>(&self, path: P) -> Result<(), BlackjackGameError> {
        let path = path.as_ref();
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        std::fs::write(&tmp, format!("{self}\n"))?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}
