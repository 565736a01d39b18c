use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use facturador::config::AppConfig;
use facturador::core::{Client, InvoiceManager};
use facturador::logging;
use facturador::render::PdfRenderer;
use facturador::session::{InvoiceSession, ItemRow, SessionError, parse_rows};
use facturador::store::CsvRecordStore;

#[derive(Debug, Parser)]
#[command(name = "facturador", version, about = "Sequential invoicing with a CSV record store")]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create the record store if it does not exist.
    Init,
    /// Print the number the next invoice will receive.
    Next,
    /// Print the total of a set of items without issuing an invoice.
    Total {
        /// Item as DESCRIPTION|QUANTITY|UNIT_PRICE; repeat for more items.
        #[arg(long = "item", value_name = "DESC|QTY|PRICE", value_parser = parse_item_arg, required = true)]
        items: Vec<ItemRow>,
    },
    /// Issue an invoice: validate, store it, and render the PDF.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        identification: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        phone: String,
        /// Item as DESCRIPTION|QUANTITY|UNIT_PRICE; repeat for more items.
        #[arg(long = "item", value_name = "DESC|QTY|PRICE", value_parser = parse_item_arg)]
        items: Vec<ItemRow>,
    },
}

/// Split `DESC|QTY|PRICE`. Missing cells are left blank so that the row
/// goes through the same checks as an incomplete form row.
fn parse_item_arg(s: &str) -> Result<ItemRow, String> {
    let mut cells = s.splitn(3, '|');
    let description = cells.next().unwrap_or_default();
    let quantity = cells.next().unwrap_or_default();
    let unit_price = cells.next().unwrap_or_default();
    Ok(ItemRow::new(description, quantity, unit_price))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_cli_logger(cli.verbose);

    let config = match &cli.config {
        Some(path) => match AppConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::from(1);
            }
        },
        None => AppConfig::default(),
    };
    tracing::debug!(?config, "configuration loaded");

    match run(cli.command, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            if e.is_user_error() {
                ExitCode::from(1)
            } else {
                tracing::error!(error = %e, "command failed");
                ExitCode::from(2)
            }
        }
    }
}

fn run(command: Command, config: AppConfig) -> Result<(), SessionError> {
    let store = CsvRecordStore::from_config(&config.store);
    let manager = InvoiceManager::new(store)?;

    match command {
        Command::Init => {
            println!("record store ready at {}", manager.store().path().display());
        }
        Command::Next => {
            let number = manager.next_number()?;
            println!("{}", config.render.number_format.format(number));
        }
        Command::Total { items } => {
            let total = manager.preview_total(&parse_rows(&items)?)?;
            println!("{total:.2}");
        }
        Command::Create {
            name,
            identification,
            address,
            phone,
            items,
        } => {
            let number_format = config.render.number_format.clone();
            let mut session =
                InvoiceSession::open(manager)?.with_renderer(PdfRenderer::new(config.render));
            let client = Client::new(name, identification, address, phone);
            let submission = session.submit(client, &items)?;

            let invoice = &submission.invoice;
            println!(
                "invoice {} issued, total {:.2}",
                number_format.format(invoice.number()),
                invoice.total()
            );
            if let Some(path) = submission.document {
                println!("{}", path.display());
            }
        }
    }
    Ok(())
}
