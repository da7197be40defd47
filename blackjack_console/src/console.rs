use crate::render::{self, format_money, parse_dollars};
use blackjack_lib::prelude::*;
use log::{debug, info};
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Line based front end for a `Table`. The first non-whitespace character of a line is the key pressed.
pub struct Console<R, W> {
    table: Table,
    input: R,
    output: W,
    save_file: Option<PathBuf>,
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Associated function to create a new `Console`. With `save_file` set, the bankroll, bet and number of
    /// decks are written there after every round and on quitting.
    pub fn new(table: Table, input: R, output: W, save_file: Option<PathBuf>) -> Self {
        Console {
            table,
            input,
            output,
            save_file,
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Runs the game until the player quits or the input ends.
    pub fn run(&mut self) -> Result<(), BlackjackGameError> {
        loop {
            let keep_playing = match self.table.phase() {
                Phase::Betting | Phase::RoundOver => self.betting_menu()?,
                Phase::Insurance => self.insurance_menu()?,
                Phase::PlayerTurn => self.action_menu()?,
            };
            if !keep_playing {
                break;
            }
        }
        self.save()?;
        writeln!(self.output)?;
        self.output.flush()?;
        Ok(())
    }

    fn save(&mut self) -> Result<(), BlackjackGameError> {
        if let Some(path) = &self.save_file {
            let record = self.table.save_record();
            record.store(path)?;
            info!("saved {record} to {}", path.display());
        }
        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<String>, BlackjackGameError> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    /// Returns the next key, skipping blank lines. `None` once the input is exhausted.
    fn read_key(&mut self) -> Result<Option<char>, BlackjackGameError> {
        while let Some(line) = self.read_line()? {
            if let Some(c) = line.trim().chars().next() {
                return Ok(Some(c.to_ascii_lowercase()));
            }
        }
        Ok(None)
    }

    fn draw_table(&mut self) -> Result<(), BlackjackGameError> {
        write!(self.output, "{}", render::draw_hands(&self.table))?;
        Ok(())
    }

    /// Reports a recoverable error to the player and hands back the fatal ones.
    fn report(&mut self, e: BlackjackGameError) -> Result<(), BlackjackGameError> {
        if !e.is_recoverable() {
            return Err(e);
        }
        debug!("{e}");
        writeln!(self.output, " {e}")?;
        Ok(())
    }

    fn betting_menu(&mut self) -> Result<bool, BlackjackGameError> {
        if self.table.phase() == Phase::RoundOver {
            self.save()?;
        }

        loop {
            self.draw_table()?;
            writeln!(
                self.output,
                "\n Bet ${}\n (D) Deal Hand  (B) Change Bet  (O) Options  (Q) Quit",
                format_money(self.table.current_bet())
            )?;
            match self.read_key()? {
                Some('d') => {
                    self.table.deal()?;
                    return Ok(true);
                }
                Some('b') => self.new_bet()?,
                Some('o') => self.options_menu()?,
                Some('q') | None => return Ok(false),
                Some(_) => {}
            }
        }
    }

    fn new_bet(&mut self) -> Result<(), BlackjackGameError> {
        loop {
            write!(
                self.output,
                " Current Bet: ${}\n Enter New Bet: $",
                format_money(self.table.current_bet())
            )?;
            let Some(line) = self.read_line()? else {
                return Ok(());
            };
            match parse_dollars(&line) {
                Some(cents) => {
                    self.table.set_bet(cents)?;
                    return Ok(());
                }
                None => writeln!(self.output, " {} is not a valid bet", line.trim())?,
            }
        }
    }

    fn options_menu(&mut self) -> Result<(), BlackjackGameError> {
        loop {
            writeln!(
                self.output,
                " (N) Number of Decks  (T) Deck Type  (F) Face Type  (B) Back"
            )?;
            match self.read_key()? {
                Some('n') => self.choose_num_decks()?,
                Some('t') => self.choose_deck_type()?,
                Some('f') => self.choose_face_type()?,
                Some('b') | None => return Ok(()),
                Some(_) => {}
            }
        }
    }

    fn choose_num_decks(&mut self) -> Result<(), BlackjackGameError> {
        loop {
            write!(
                self.output,
                " Number Of Decks: {}\n Enter New Number Of Decks (1-8): ",
                self.table.shoe().num_decks()
            )?;
            let Some(line) = self.read_line()? else {
                return Ok(());
            };
            match line.trim().parse::<usize>() {
                Ok(n) if (1..=8).contains(&n) => return self.table.set_num_decks(n),
                _ => writeln!(self.output, " {} is not between 1 and 8", line.trim())?,
            }
        }
    }

    fn choose_deck_type(&mut self) -> Result<(), BlackjackGameError> {
        let menu = DeckType::ALL
            .iter()
            .enumerate()
            .map(|(i, t)| format!("({}) {}", i + 1, t.label()))
            .collect::<Vec<String>>()
            .join("  ");
        loop {
            writeln!(self.output, " {menu}")?;
            let Some(key) = self.read_key()? else {
                return Ok(());
            };
            let choice = key
                .to_digit(10)
                .and_then(|d| (d as usize).checked_sub(1))
                .and_then(|i| DeckType::ALL.get(i));
            if let Some(&deck_type) = choice {
                return self.table.set_deck_type(deck_type);
            }
        }
    }

    fn choose_face_type(&mut self) -> Result<(), BlackjackGameError> {
        let ace = Card::new(0, 0);
        loop {
            writeln!(
                self.output,
                " (1) {}  (2) {}",
                ace.face(FaceType::Ascii),
                ace.face(FaceType::Unicode)
            )?;
            match self.read_key()? {
                Some('1') => self.table.set_face_type(FaceType::Ascii),
                Some('2') => self.table.set_face_type(FaceType::Unicode),
                Some(_) => continue,
                None => {}
            }
            return Ok(());
        }
    }

    fn insurance_menu(&mut self) -> Result<bool, BlackjackGameError> {
        self.draw_table()?;
        loop {
            writeln!(self.output, " Insurance?  (Y) Yes  (N) No")?;
            let result = match self.read_key()? {
                Some('y') => self.table.take_insurance(),
                Some('n') => self.table.decline_insurance(),
                Some(_) => continue,
                None => return Ok(false),
            };
            match result {
                Ok(_) => return Ok(true),
                Err(e) => self.report(e)?,
            }
        }
    }

    fn action_menu(&mut self) -> Result<bool, BlackjackGameError> {
        self.draw_table()?;
        loop {
            let actions = self.table.available_actions();
            writeln!(self.output, " {}", render::action_prompt(&actions))?;
            let Some(key) = self.read_key()? else {
                return Ok(false);
            };
            let Some(action) = Action::from_key(key) else {
                continue;
            };
            match self.table.play(action) {
                Ok(_) => return Ok(true),
                Err(e) => self.report(e)?,
            }
        }
    }
}
