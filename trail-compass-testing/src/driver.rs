use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::info;
use trail_compass_logic::{
    Fix, PinBook, PinListItem, coordinate_pair, heading_to_gradient_vector, pin_share_text,
    round_heading, to_cardinal,
};
use trail_compass_test_shared::{FileStore, prelude::*};

#[derive(Parser)]
/// Poke at the pin store and compass helpers without a device
struct Cli {
    /// JSON file standing in for on-device storage
    #[arg(long, default_value = "trail-compass-store.json")]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Save a new pin, it'll be listed first
    Drop {
        #[arg(long, allow_hyphen_values = true, value_parser = parse_latitude)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true, value_parser = parse_longitude)]
        lon: f64,
        /// Heading at capture time in degrees, 0 if left out
        #[arg(long, allow_hyphen_values = true)]
        heading: Option<f64>,
    },
    /// List saved pins, newest first
    List {
        /// Print share messages instead of list rows
        #[arg(long)]
        share: bool,
    },
    /// Delete a pin
    Remove {
        /// The pin's id, as shown by `list`
        id: String,
    },
    /// Delete every pin
    Clear,
    /// Show the compass point for a heading
    Cardinal {
        #[arg(allow_hyphen_values = true)]
        heading: f64,
    },
    /// Show the gradient endpoints for a heading
    Gradient {
        #[arg(allow_hyphen_values = true)]
        heading: f64,
    },
}

fn parse_bounded(raw: &str, bound: f64) -> Result<f64, String> {
    let value = raw
        .parse::<f64>()
        .map_err(|why| format!("Not a number: {why}"))?;
    if (-bound..=bound).contains(&value) {
        Ok(value)
    } else {
        Err(format!("Must be between -{bound} and {bound}"))
    }
}

fn parse_latitude(raw: &str) -> Result<f64, String> {
    parse_bounded(raw, 90.0)
}

fn parse_longitude(raw: &str) -> Result<f64, String> {
    parse_bounded(raw, 180.0)
}

async fn open_book(path: PathBuf) -> PinBook<FileStore> {
    info!("Using store at {}", path.display());
    PinBook::open(FileStore::new(path)).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result {
    colog::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Drop { lat, lon, heading } => {
            let book = open_book(cli.store).await;
            let fix = Fix {
                latitude: lat,
                longitude: lon,
            };
            let pin = book.drop_pin(fix, heading).await?;
            println!("{} {}", pin.id, coordinate_pair(pin.lat, pin.lon));
        }
        Commands::List { share } => {
            let pins = open_book(cli.store).await.pins().await;
            if pins.is_empty() {
                println!("No pins yet. Go drop one!");
            }
            for pin in pins.iter() {
                if share {
                    println!("{}", pin_share_text(pin));
                } else {
                    let item = PinListItem::from(pin);
                    println!("{}  {}  {}", item.id, item.title, item.description);
                }
            }
        }
        Commands::Remove { id } => {
            if !open_book(cli.store).await.remove(&id).await? {
                bail!("No pin with id {id}");
            }
            println!("Pin deleted");
        }
        Commands::Clear => {
            open_book(cli.store).await.clear().await?;
            println!("All pins deleted");
        }
        Commands::Cardinal { heading } => {
            println!("{} {}°", to_cardinal(heading), round_heading(heading));
        }
        Commands::Gradient { heading } => {
            let grad = heading_to_gradient_vector(heading);
            println!(
                "start ({:.3}, {:.3}) end ({:.3}, {:.3})",
                grad.start.x, grad.start.y, grad.end.x, grad.end.y
            );
        }
    }

    Ok(())
}
