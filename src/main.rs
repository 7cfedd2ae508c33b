use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use resellerboard::api::ReturnLine;
use resellerboard::app::{self, AppContext, ReportRequest};
use resellerboard::catalog::{ProductSort, RosterFilter, RosterSort, SortDirection};
use resellerboard::config::{default_config_path, ResolvedConfig};
use resellerboard::models::ResellerDraft;
use resellerboard::period::{parse_day, DateRange, SystemClock};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "resellerboard")]
#[command(about = "Reseller inventory and sales reports")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show current configuration
    Config,
    /// Manage the stored session token
    #[command(subcommand)]
    Session(SessionCommand),
    /// Units you sold this month
    Dashboard,
    /// Your current stock
    Stock,
    /// Register, cancel or restore sales
    #[command(subcommand)]
    Sale(SaleCommand),
    /// Multi-month sales report grouped by reseller
    Report {
        #[command(flatten)]
        range: RangeArgs,
        #[command(flatten)]
        view: ReportViewArgs,
    },
    /// All sales in a date window
    History {
        #[command(flatten)]
        range: RangeArgs,
        /// Zero-based page index
        #[arg(long, default_value_t = 0)]
        page: usize,
        #[arg(long)]
        page_size: Option<usize>,
    },
    /// Product catalog
    #[command(subcommand)]
    Products(ProductCommand),
    /// Reseller accounts and their stock
    #[command(subcommand)]
    Resellers(ResellerCommand),
    /// Seller contracts
    #[command(subcommand)]
    Contracts(ContractCommand),
}

#[derive(Subcommand)]
enum SessionCommand {
    /// Store a session token obtained from the backend
    Set {
        #[arg(long)]
        token: String,
        #[arg(long)]
        fullname: Option<String>,
        #[arg(long)]
        user_id: Option<String>,
    },
    Show,
    Clear,
}

#[derive(Subcommand)]
enum SaleCommand {
    Add {
        #[arg(long)]
        product: String,
        #[arg(long)]
        quantity: i64,
    },
    /// Cancel a sale, then print the refreshed report
    Cancel {
        sale_id: String,
        #[arg(long)]
        reason: Option<String>,
        #[command(flatten)]
        range: RangeArgs,
        #[command(flatten)]
        view: ReportViewArgs,
    },
    /// Reverse a cancellation, then print the refreshed report
    Undo {
        sale_id: String,
        #[command(flatten)]
        range: RangeArgs,
        #[command(flatten)]
        view: ReportViewArgs,
    },
}

#[derive(Subcommand)]
enum ProductCommand {
    List {
        #[arg(long, default_value = "")]
        search: String,
        /// name, stock or price
        #[arg(long, default_value = "name")]
        sort: ProductSort,
        #[arg(long)]
        desc: bool,
    },
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        stock: i64,
        #[arg(long)]
        price: Decimal,
    },
    Update {
        product_id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        stock: i64,
        #[arg(long)]
        price: Decimal,
    },
    Delete {
        product_id: String,
    },
    /// Assign units of a product to a reseller
    Assign {
        #[arg(long)]
        reseller: String,
        #[arg(long)]
        product: String,
        #[arg(long)]
        quantity: i64,
    },
}

#[derive(Subcommand)]
enum ResellerCommand {
    List {
        #[arg(long, default_value = "")]
        search: String,
        /// Show only deleted resellers
        #[arg(long)]
        deleted: bool,
        /// name or sales
        #[arg(long, default_value = "name")]
        sort: RosterSort,
        #[arg(long)]
        desc: bool,
    },
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Update {
        user_id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Leave unset to keep the current password
        #[arg(long, default_value = "")]
        password: String,
    },
    Delete {
        user_id: String,
    },
    Restore {
        user_id: String,
    },
    /// Stock currently held by a reseller
    Stock {
        reseller_id: String,
    },
    /// Return units of one product
    Return {
        reseller_id: String,
        #[arg(long)]
        product: String,
        #[arg(long)]
        quantity: i64,
    },
    /// Return several products at once
    ReturnBatch {
        reseller_id: String,
        /// PRODUCT_ID=QUANTITY, repeatable
        #[arg(long = "line", value_parser = parse_return_line, required = true)]
        lines: Vec<ReturnLine>,
    },
    /// Return everything the reseller holds
    ReturnAll {
        reseller_id: String,
    },
    Details {
        seller_id: String,
    },
    UpdateDetails {
        seller_id: String,
        #[arg(long, default_value = "")]
        contact: String,
        #[arg(long, default_value = "")]
        address: String,
    },
}

#[derive(Subcommand)]
enum ContractCommand {
    List {
        seller_id: String,
    },
    Upload {
        seller_id: String,
        file: PathBuf,
        #[arg(long)]
        title: Option<String>,
    },
    Rename {
        contract_id: String,
        title: String,
    },
    Delete {
        contract_id: String,
    },
}

/// Inclusive date window; defaults to the current month through today.
#[derive(Args)]
struct RangeArgs {
    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    start: Option<String>,
    /// End date (YYYY-MM-DD)
    #[arg(long)]
    end: Option<String>,
}

impl RangeArgs {
    fn resolve(&self, ctx: &AppContext) -> Result<DateRange> {
        let today = ctx.timezone()?.today(&SystemClock);
        let default = DateRange::month_to_date(today);
        let start = match &self.start {
            Some(s) => parse_day("start", s)?,
            None => default.start,
        };
        let end = match &self.end {
            Some(s) => parse_day("end", s)?,
            None => default.end,
        };
        Ok(DateRange::new(start, end))
    }
}

#[derive(Args)]
struct ReportViewArgs {
    /// Reseller name filter (case-insensitive substring)
    #[arg(long, default_value = "")]
    search: String,
    /// Rows per reseller table
    #[arg(long)]
    page_size: Option<usize>,
    /// RESELLER_ID=PAGE, repeatable (use the name for resellers without an id)
    #[arg(long = "page", value_parser = parse_page_arg)]
    pages: Vec<(String, usize)>,
}

impl ReportViewArgs {
    fn request(&self, range: DateRange) -> ReportRequest {
        ReportRequest {
            range,
            search: self.search.clone(),
            page_size: self.page_size,
            pages: self.pages.clone(),
        }
    }
}

fn split_pair(s: &str) -> Result<(String, i64), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=NUMBER, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing id in '{s}'"));
    }
    let value = value
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("invalid number in '{s}': {e}"))?;
    Ok((key.to_string(), value))
}

fn parse_page_arg(s: &str) -> Result<(String, usize), String> {
    let (id, page) = split_pair(s)?;
    let page = usize::try_from(page).map_err(|_| format!("page must not be negative in '{s}'"))?;
    Ok((id, page))
}

fn parse_return_line(s: &str) -> Result<ReturnLine, String> {
    let (product_id, quantity) = split_pair(s)?;
    Ok(ReturnLine {
        product_id,
        quantity,
    })
}

fn direction(desc: bool) -> SortDirection {
    if desc {
        SortDirection::Desc
    } else {
        SortDirection::Asc
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().with_writer(std::io::stderr).json())
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = ResolvedConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config: {}", cli.config.display()))?;
    let ctx = AppContext::new(config);

    match cli.command {
        Command::Config => print_json(&app::config_output(&cli.config, &ctx.config)),
        Command::Session(cmd) => match cmd {
            SessionCommand::Set {
                token,
                fullname,
                user_id,
            } => print_json(&app::set_session(
                &ctx,
                &token,
                fullname.as_deref(),
                user_id.as_deref(),
            )?),
            SessionCommand::Show => print_json(&app::show_session(&ctx)?),
            SessionCommand::Clear => print_json(&app::clear_session(&ctx)?),
        },
        Command::Dashboard => print_json(&app::dashboard(&ctx, &SystemClock).await?),
        Command::Stock => print_json(&app::current_stock(&ctx).await?),
        Command::Sale(cmd) => match cmd {
            SaleCommand::Add { product, quantity } => {
                print_json(&app::register_sale(&ctx, &product, quantity).await?)
            }
            SaleCommand::Cancel {
                sale_id,
                reason,
                range,
                view,
            } => {
                let request = view.request(range.resolve(&ctx)?);
                print_json(&app::cancel_sale(&ctx, &request, &sale_id, reason.as_deref()).await?)
            }
            SaleCommand::Undo {
                sale_id,
                range,
                view,
            } => {
                let request = view.request(range.resolve(&ctx)?);
                print_json(&app::undo_cancel_sale(&ctx, &request, &sale_id).await?)
            }
        },
        Command::Report { range, view } => {
            let request = view.request(range.resolve(&ctx)?);
            print_json(&app::report(&ctx, &request).await?)
        }
        Command::History {
            range,
            page,
            page_size,
        } => {
            let range = range.resolve(&ctx)?;
            print_json(&app::sales_history(&ctx, range, page, page_size).await?)
        }
        Command::Products(cmd) => match cmd {
            ProductCommand::List { search, sort, desc } => {
                print_json(&app::list_products(&ctx, &search, sort, direction(desc)).await?)
            }
            ProductCommand::Add { name, stock, price } => {
                print_json(&app::add_product(&ctx, &name, stock, price).await?)
            }
            ProductCommand::Update {
                product_id,
                name,
                stock,
                price,
            } => print_json(&app::update_product(&ctx, &product_id, &name, stock, price).await?),
            ProductCommand::Delete { product_id } => {
                print_json(&app::delete_product(&ctx, &product_id).await?)
            }
            ProductCommand::Assign {
                reseller,
                product,
                quantity,
            } => print_json(&app::assign_stock(&ctx, &reseller, &product, quantity).await?),
        },
        Command::Resellers(cmd) => match cmd {
            ResellerCommand::List {
                search,
                deleted,
                sort,
                desc,
            } => {
                let filter = RosterFilter {
                    search,
                    only_deleted: deleted,
                    sort,
                    direction: direction(desc),
                };
                print_json(&app::reseller_roster(&ctx, &filter).await?)
            }
            ResellerCommand::Add {
                name,
                email,
                password,
            } => {
                let draft = ResellerDraft {
                    fullname: name,
                    email,
                    password,
                };
                print_json(&app::add_reseller(&ctx, &draft).await?)
            }
            ResellerCommand::Update {
                user_id,
                name,
                email,
                password,
            } => {
                let draft = ResellerDraft {
                    fullname: name,
                    email,
                    password,
                };
                print_json(&app::update_reseller(&ctx, &user_id, &draft).await?)
            }
            ResellerCommand::Delete { user_id } => {
                print_json(&app::delete_reseller(&ctx, &user_id).await?)
            }
            ResellerCommand::Restore { user_id } => {
                print_json(&app::restore_reseller(&ctx, &user_id).await?)
            }
            ResellerCommand::Stock { reseller_id } => {
                print_json(&app::reseller_stock(&ctx, &reseller_id).await?)
            }
            ResellerCommand::Return {
                reseller_id,
                product,
                quantity,
            } => print_json(&app::return_stock(&ctx, &reseller_id, &product, quantity).await?),
            ResellerCommand::ReturnBatch { reseller_id, lines } => {
                print_json(&app::return_stock_batch(&ctx, &reseller_id, &lines).await?)
            }
            ResellerCommand::ReturnAll { reseller_id } => {
                print_json(&app::return_all_stock(&ctx, &reseller_id).await?)
            }
            ResellerCommand::Details { seller_id } => {
                print_json(&app::seller_details(&ctx, &seller_id).await?)
            }
            ResellerCommand::UpdateDetails {
                seller_id,
                contact,
                address,
            } => print_json(
                &app::update_seller_details(&ctx, &seller_id, &contact, &address).await?,
            ),
        },
        Command::Contracts(cmd) => match cmd {
            ContractCommand::List { seller_id } => {
                print_json(&app::list_contracts(&ctx, &seller_id).await?)
            }
            ContractCommand::Upload {
                seller_id,
                file,
                title,
            } => print_json(
                &app::upload_contract(&ctx, &seller_id, title.as_deref(), &file).await?,
            ),
            ContractCommand::Rename { contract_id, title } => {
                print_json(&app::rename_contract(&ctx, &contract_id, &title).await?)
            }
            ContractCommand::Delete { contract_id } => {
                print_json(&app::delete_contract(&ctx, &contract_id).await?)
            }
        },
    }
}
