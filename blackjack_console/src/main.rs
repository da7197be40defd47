mod console;
mod render;

use blackjack_lib::prelude::*;
use blackjack_lib::SAVE_FILE;
use clap::Parser;
use console::Console;
use log::{error, info};
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Play blackjack against the dealer in the terminal")]
struct Args {
    /// JSON file with table settings, missing fields take their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where the bankroll, bet and number of decks are kept between runs
    #[arg(long, default_value = SAVE_FILE)]
    save_file: PathBuf,

    /// Number of decks in the shoe (1-8), overrides the config and save files
    #[arg(long)]
    decks: Option<usize>,

    /// Seed for the shuffles, for replaying a game
    #[arg(long)]
    seed: Option<u64>,

    /// Neither read nor write the save file
    #[arg(long)]
    no_save: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    if let Err(e) = run(args) {
        error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn build_table(args: &Args) -> Result<Table, BlackjackGameError> {
    let mut config = match &args.config {
        Some(path) => TableConfig::from_json_file(path)?,
        None => TableConfig::default(),
    };
    if let Some(decks) = args.decks {
        config.num_decks = decks;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }

    let mut table = Table::new(config)?;
    if !args.no_save {
        if let Some(record) = SaveRecord::load_if_present(&args.save_file) {
            info!("restoring {record} from {}", args.save_file.display());
            table.restore(record);
        }
    }
    if let Some(decks) = args.decks {
        table.set_num_decks(decks)?;
    }
    Ok(table)
}

fn run(args: Args) -> Result<(), BlackjackGameError> {
    let table = build_table(&args)?;
    let save_file = if args.no_save {
        None
    } else {
        Some(args.save_file)
    };

    let stdin = io::stdin();
    let mut console = Console::new(table, stdin.lock(), io::stdout().lock(), save_file);
    console.run()?;
    info!("leaving with ${}", render::format_money(console.table().bankroll()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args() {
        Args::command().debug_assert();

        let args = Args::try_parse_from(["blackjack_console"]).unwrap();
        assert_eq!(args.save_file, PathBuf::from(SAVE_FILE));
        assert!(!args.no_save);

        let args =
            Args::try_parse_from(["blackjack_console", "--decks", "6", "--seed", "3", "--no-save"])
                .unwrap();
        assert_eq!(args.decks, Some(6));
        assert_eq!(args.seed, Some(3));
        assert!(args.no_save);
    }

    #[test]
    fn test_save_file_is_restored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SAVE_FILE);
        std::fs::write(&path, "4|25000|1500\n").unwrap();
        let save_file = path.to_str().unwrap();

        let args = Args::try_parse_from(["blackjack_console", "--save-file", save_file]).unwrap();
        let table = build_table(&args).unwrap();
        assert_eq!(table.shoe().num_decks(), 4);
        assert_eq!(table.bankroll(), 25_000);
        assert_eq!(table.current_bet(), 1_500);

        let args =
            Args::try_parse_from(["blackjack_console", "--save-file", save_file, "--decks", "2"])
                .unwrap();
        assert_eq!(build_table(&args).unwrap().shoe().num_decks(), 2);

        let args =
            Args::try_parse_from(["blackjack_console", "--save-file", save_file, "--no-save"])
                .unwrap();
        assert_eq!(build_table(&args).unwrap().bankroll(), 10_000);
    }

    #[test]
    fn test_bad_config_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, br#"{"min_bet": 0}"#).unwrap();
        let config = file.path().to_str().unwrap();
        let args = Args::try_parse_from(["blackjack_console", "--config", config]).unwrap();
        assert!(matches!(
            build_table(&args),
            Err(BlackjackGameError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_out_of_range_decks_are_rejected() {
        let args =
            Args::try_parse_from(["blackjack_console", "--no-save", "--decks", "100000"]).unwrap();
        assert!(matches!(
            build_table(&args),
            Err(BlackjackGameError::InvalidConfig(_))
        ));
    }
}
