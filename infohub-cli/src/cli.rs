use anyhow::Result;
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use inquire::{Select, Text};
use rand::{Rng, thread_rng};

use infohub_core::config::Config;
use infohub_core::convert::{ConversionState, Edit, RateSet, Session};
use infohub_core::model::Quote;

use crate::client::Backend;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "infohub", version, about = "InfoHub terminal client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show current weather for a city.
    Weather {
        /// City name, e.g. "London".
        city: String,
    },

    /// Fetch a random quote.
    Quote,

    /// Convert between INR, USD and EUR interactively.
    Convert,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = Config::load()?;
        let backend = Backend::new(config.backend_url.clone());

        match self.command {
            Command::Weather { city } => show_weather(&backend, &city).await,
            Command::Quote => show_quote(&backend).await,
            Command::Convert => run_converter(&backend).await,
        }
    }
}

async fn show_weather(backend: &Backend, city: &str) -> Result<()> {
    let report = backend.weather(city).await?;

    println!("{}, {}", report.name, report.country);
    println!("  {}, {:.1}°C", report.condition(), report.temperature);
    println!(
        "  wind {:.1} km/h from {:.0}°",
        report.windspeed, report.winddirection
    );
    if let Ok(observed) = NaiveDateTime::parse_from_str(&report.time, "%Y-%m-%dT%H:%M") {
        println!("  observed {}", observed.format("%Y-%m-%d %H:%M"));
    }

    Ok(())
}

/// Shown when the backend quote route is unreachable; a canned quote beats
/// no quote. The converter deliberately has no such fallback: invented rates
/// would show wrong money.
const LOCAL_QUOTES: &[(&str, &str)] = &[
    ("Success is not final, failure is not fatal.", "Winston Churchill"),
    ("Believe you can and you're halfway there.", "Theodore Roosevelt"),
    (
        "Push yourself, because no one else is going to do it for you.",
        "Unknown",
    ),
    ("Great things never come from comfort zones.", "Roy T. Bennett"),
    ("Your limitation—it's only your imagination.", "Unknown"),
];

async fn show_quote(backend: &Backend) -> Result<()> {
    let quote = match backend.quote().await {
        Ok(quote) => quote,
        Err(err) => {
            eprintln!("Backend quote API failed, using fallback: {err}");
            let (content, author) = LOCAL_QUOTES[thread_rng().gen_range(0..LOCAL_QUOTES.len())];
            Quote {
                quote: content.to_owned(),
                author: author.to_owned(),
            }
        }
    };

    println!("\"{}\"", quote.quote);
    println!("    — {}", quote.author);

    Ok(())
}

async fn run_converter(backend: &Backend) -> Result<()> {
    let seed = match backend.currency(1.0).await {
        Ok(quote) => quote,
        Err(err) => {
            eprintln!("Unable to load currency rates.");
            return Err(err);
        }
    };

    let rates = RateSet::new(seed.base_rates.usd, seed.base_rates.eur)?;
    let mut session = Session::start(rates);
    print_state(session.state());

    loop {
        let choice = Select::new(
            "Edit which field?",
            vec!["INR", "USD", "EUR", "quit"],
        )
        .prompt()?;

        if choice == "quit" {
            break;
        }

        let raw = Text::new(&format!("{choice} amount:")).prompt()?;
        let edit = match choice {
            "INR" => Edit::Inr(raw),
            "USD" => Edit::Usd(raw),
            _ => Edit::Eur(raw),
        };

        session.apply(edit)?;
        print_state(session.state());
    }

    Ok(())
}

fn print_state(state: &ConversionState) {
    println!("  INR {}", state.inr);
    println!("  USD {}", state.usd);
    println!("  EUR {}", state.eur);
}
