use crate::card::FaceType;
use crate::error::BlackjackGameError;
use crate::game::player::MAX_PLAYER_HANDS;
use crate::shoe::DeckType;
use serde::Deserialize;
use std::path::Path;

/// Struct for configuring a `Table`. Amounts are in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub num_decks: usize,
    pub min_bet: u64,
    pub max_bet: u64,
    pub max_player_hands: usize,
    pub starting_bankroll: u64,
    pub starting_bet: u64,
    pub penetration_threshold: Option<usize>,
    pub dealer_hits_soft_17: bool,
    pub deck_type: DeckType,
    pub face_type: FaceType,
    pub seed: Option<u64>,
}

impl TableConfig {
    /// Associated method for returning a new `TableConfigBuilder` object. Allows customization of the table,
    /// i.e. the number of decks, the betting limits, the starting bankroll and the house rules.
    pub fn new() -> TableConfigBuilder {
        TableConfigBuilder::default()
    }

    /// Reads a configuration from a JSON file. Missing fields take their default values.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<TableConfig, BlackjackGameError> {
        let contents = std::fs::read_to_string(path)?;
        let config: TableConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration describes a playable table.
    pub fn validate(&self) -> Result<(), BlackjackGameError> {
        if !(1..=8).contains(&self.num_decks) {
            return Err(BlackjackGameError::InvalidConfig(format!(
                "number of decks must be between 1 and 8, got {}",
                self.num_decks
            )));
        }
        if self.min_bet == 0 {
            return Err(BlackjackGameError::InvalidConfig(
                "minimum bet must be positive".to_string(),
            ));
        }
        if self.min_bet > self.max_bet {
            return Err(BlackjackGameError::InvalidConfig(format!(
                "minimum bet {} is greater than maximum bet {}",
                self.min_bet, self.max_bet
            )));
        }
        if self.starting_bankroll < self.min_bet {
            return Err(BlackjackGameError::InvalidConfig(format!(
                "starting bankroll {} does not cover the minimum bet {}",
                self.starting_bankroll, self.min_bet
            )));
        }
        if self.max_player_hands == 0 {
            return Err(BlackjackGameError::InvalidConfig(
                "at least one player hand is required".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for TableConfig {
    /// Returns the standard configuration: a single deck, $5 minimum bet and a $100 bankroll.
    fn default() -> Self {
        TableConfig::new().build()
    }
}

/// Struct to implement builder pattern for `TableConfig`
#[derive(Debug, Clone, Copy, Default)]
pub struct TableConfigBuilder {
    num_decks: Option<usize>,
    min_bet: Option<u64>,
    max_bet: Option<u64>,
    max_player_hands: Option<usize>,
    starting_bankroll: Option<u64>,
    starting_bet: Option<u64>,
    penetration_threshold: Option<usize>,
    dealer_hits_soft_17: Option<bool>,
    deck_type: Option<DeckType>,
    face_type: Option<FaceType>,
    seed: Option<u64>,
}

impl TableConfigBuilder {
    /// Method for choosing the number of decks in the shoe.
    pub fn num_decks(&mut self, decks: usize) -> &mut Self {
        self.num_decks = Some(decks);
        self
    }

    pub fn min_bet(&mut self, bet: u64) -> &mut Self {
        self.min_bet = Some(bet);
        self
    }

    pub fn max_bet(&mut self, bet: u64) -> &mut Self {
        self.max_bet = Some(bet);
        self
    }

    /// Method for capping how many hands splitting may produce.
    pub fn max_player_hands(&mut self, hands: usize) -> &mut Self {
        self.max_player_hands = Some(hands);
        self
    }

    pub fn starting_bankroll(&mut self, bankroll: u64) -> &mut Self {
        self.starting_bankroll = Some(bankroll);
        self
    }

    pub fn starting_bet(&mut self, bet: u64) -> &mut Self {
        self.starting_bet = Some(bet);
        self
    }

    /// Method for setting the number of remaining cards at which the shoe is reshuffled.
    /// Left unset, the threshold follows from the number of decks.
    pub fn penetration_threshold(&mut self, threshold: usize) -> &mut Self {
        self.penetration_threshold = Some(threshold);
        self
    }

    /// Method for setting the flag that determines if the dealer must hit soft seventeens, default is true
    pub fn dealer_hits_soft_17(&mut self, hits: bool) -> &mut Self {
        self.dealer_hits_soft_17 = Some(hits);
        self
    }

    pub fn deck_type(&mut self, deck_type: DeckType) -> &mut Self {
        self.deck_type = Some(deck_type);
        self
    }

    pub fn face_type(&mut self, face_type: FaceType) -> &mut Self {
        self.face_type = Some(face_type);
        self
    }

    /// Method for seeding the shuffles so a game can be replayed.
    pub fn seed(&mut self, seed: u64) -> &mut Self {
        self.seed = Some(seed);
        self
    }

    /// Method for building a `TableConfig` object from the given `TableConfigBuilder` object.
    pub fn build(&mut self) -> TableConfig {
        TableConfig {
            num_decks: self.num_decks.unwrap_or(1),
            min_bet: self.min_bet.unwrap_or(500),
            max_bet: self.max_bet.unwrap_or(10_000_000),
            max_player_hands: self.max_player_hands.unwrap_or(MAX_PLAYER_HANDS),
            starting_bankroll: self.starting_bankroll.unwrap_or(10_000),
            starting_bet: self.starting_bet.unwrap_or(500),
            penetration_threshold: self.penetration_threshold,
            dealer_hits_soft_17: self.dealer_hits_soft_17.unwrap_or(true),
            deck_type: self.deck_type.unwrap_or_default(),
            face_type: self.face_type.unwrap_or_default(),
            seed: self.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = TableConfig::default();
        assert_eq!(config.num_decks, 1);
        assert_eq!(config.min_bet, 500);
        assert_eq!(config.max_bet, 10_000_000);
        assert_eq!(config.max_player_hands, 7);
        assert!(config.dealer_hits_soft_17);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_overrides() {
        let config = TableConfig::new()
            .num_decks(6)
            .min_bet(1000)
            .penetration_threshold(40)
            .deck_type(DeckType::Sevens)
            .build();
        assert_eq!(config.num_decks, 6);
        assert_eq!(config.min_bet, 1000);
        assert_eq!(config.penetration_threshold, Some(40));
        assert_eq!(config.deck_type, DeckType::Sevens);
    }

    #[test]
    fn test_validate_rejects_bad_tables() {
        assert!(TableConfig::new().num_decks(9).build().validate().is_err());
        assert!(TableConfig::new().num_decks(0).build().validate().is_err());
        assert!(TableConfig::new().min_bet(0).build().validate().is_err());
        assert!(TableConfig::new()
            .min_bet(100)
            .max_bet(50)
            .build()
            .validate()
            .is_err());
        assert!(TableConfig::new()
            .starting_bankroll(100)
            .build()
            .validate()
            .is_err());
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"num_decks": 4, "min_bet": 1000, "face_type": "Unicode"}}"#).unwrap();
        let config = TableConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.num_decks, 4);
        assert_eq!(config.min_bet, 1000);
        assert_eq!(config.face_type, FaceType::Unicode);
        assert_eq!(config.max_bet, 10_000_000);
    }

    #[test]
    fn test_from_json_file_rejects_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"num_decks": 12}}"#).unwrap();
        assert!(matches!(
            TableConfig::from_json_file(file.path()),
            Err(BlackjackGameError::InvalidConfig(_))
        ));
    }
}
