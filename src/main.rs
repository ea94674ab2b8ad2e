use log::debug;
use std::env;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

use cocktail_finder::shell::HELP;
use cocktail_finder::{AppConfig, Command, Outcome, Route, Shell};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = AppConfig::load()?;
    debug!("{:#?}", config);

    // Optional starting location, e.g. "/?glass=Mug" or "/cocktail/11007"
    let start = match env::args().nth(1) {
        Some(location) => location.parse::<Route>()?,
        None => Route::root(),
    };

    let mut shell = Shell::from_config(config)?;
    shell.start(start).await;
    println!("{}", shell.render());
    println!("Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        match shell.execute(command).await {
            Ok(Outcome::Quit) => break,
            Ok(Outcome::Help) => println!("{}", HELP),
            Ok(Outcome::Continue) => println!("{}", shell.render()),
            Err(e) => eprintln!("{}", e),
        }
    }

    Ok(())
}
