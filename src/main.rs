use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use skycast_core::Config;
use skycast_ui::{ClickBus, ClickTarget, Controller, ControllerSettings};
use skycast_weather::{CacheStore, LocationSource, WeatherClient, WeatherEndpoints};

const HELP: &str = "\
Commands:
  type <text>     edit the search box (suggestions appear after a pause)
  submit          look up the city in the search box
  select <n>      pick suggestion n
  location        use the configured location
  unit            switch between °C and °F
  theme           switch between light and dark
  click <where>   click on input, list or outside
  help            show this help
  quit            exit";

enum Command {
    Type(String),
    Submit,
    Select(usize),
    Location,
    Unit,
    Theme,
    Click(ClickTarget),
    Help,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let (word, rest) = match line.trim_start().split_once(' ') {
        Some((word, rest)) => (word, rest),
        None => (line.trim(), ""),
    };

    match word {
        "type" => Command::Type(rest.to_string()),
        "submit" => Command::Submit,
        "select" => match rest.trim().parse::<usize>() {
            Ok(n) if n > 0 => Command::Select(n - 1),
            _ => Command::Unknown(line.to_string()),
        },
        "location" => Command::Location,
        "unit" => Command::Unit,
        "theme" => Command::Theme,
        "click" => match rest.trim() {
            "input" => Command::Click(ClickTarget::SearchInput),
            "list" => Command::Click(ClickTarget::SuggestionList),
            _ => Command::Click(ClickTarget::Elsewhere),
        },
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}

fn main() -> Result<()> {
    skycast_core::init()?;

    let (config, _validation) = Config::load_validated()?;
    tracing::info!("Config directory: {}", config.config_dir.display());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("skycast-tokio")
        .build()
        .context("Failed to create tokio runtime")?;

    runtime.block_on(run(config))
}

async fn run(config: Config) -> Result<()> {
    let client = WeatherClient::new(WeatherEndpoints::from_config(&config))?;
    let cache = CacheStore::open(&config.config_dir);
    let location = LocationSource::from_config(&config.location);
    let settings = ControllerSettings::from_config(&config);

    let (mut controller, mut events) =
        Controller::new(client, cache, location, settings, &ClickBus::global());

    println!("Skycast - type `help` for commands");
    print!("{}", controller.view().render(&chrono::Local));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                match parse_command(&line) {
                    Command::Type(text) => controller.on_input(&text),
                    Command::Submit => {
                        controller.submit();
                    }
                    Command::Select(index) => {
                        if !controller.select_suggestion(index) {
                            println!("No suggestion {}", index + 1);
                        }
                    }
                    Command::Location => controller.use_location(),
                    Command::Unit => {
                        controller.toggle_unit();
                    }
                    Command::Theme => {
                        controller.toggle_theme();
                    }
                    Command::Click(target) => {
                        controller.on_click(target);
                    }
                    Command::Help => {
                        println!("{}", HELP);
                        continue;
                    }
                    Command::Quit => break,
                    Command::Unknown(line) => {
                        println!("Unknown command: {}", line.trim());
                        continue;
                    }
                }
            }
            Some(event) = events.recv() => controller.handle_event(event),
        }

        print!("{}", controller.view().render(&chrono::Local));
    }

    tracing::info!("Skycast shutting down");
    Ok(())
}
