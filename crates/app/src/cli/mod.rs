use clap::{Parser, Subcommand};
use platter_app::{config::ClientConfig, context::AppContext};

mod browse;
mod cart;
mod checkout;
mod render;

#[derive(Debug, Parser)]
#[command(name = "platter", about = "Order food from the terminal", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) config: ClientConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List open restaurants, best rated first
    Restaurants,

    /// Open a restaurant's menu
    Menu(browse::MenuArgs),

    /// Show coupon offers for the current cart
    Offers(browse::OffersArgs),

    /// Show the cart and its price breakdown
    Cart,

    /// Add a menu item to the cart
    Add(cart::AddArgs),

    /// Remove a line from the cart
    Remove(cart::RemoveArgs),

    /// Change how many of an item are in the cart
    SetQuantity(cart::QuantityArgs),

    /// Apply or remove a coupon code
    Coupon(cart::CouponArgs),

    /// Empty the cart
    Clear,

    /// Sign in and place the order
    Checkout(checkout::CheckoutArgs),

    /// Create an account
    Signup(checkout::SignupArgs),
}

impl Cli {
    /// Read `.env`, then the command line.
    pub(crate) fn load() -> Result<Self, clap::Error> {
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    pub(crate) async fn run(self) -> Result<(), String> {
        let context = AppContext::from_config(&self.config)
            .map_err(|error| format!("failed to start: {error}"))?;

        match self.command {
            Commands::Restaurants => browse::restaurants(&context).await,
            Commands::Menu(args) => browse::menu(&context, args).await,
            Commands::Offers(args) => browse::offers(&context, &args),
            Commands::Cart => cart::show(&context),
            Commands::Add(args) => cart::add(&context, args).await,
            Commands::Remove(args) => cart::remove(&context, &args),
            Commands::SetQuantity(args) => cart::quantity(&context, &args),
            Commands::Coupon(args) => cart::coupon(&context, args),
            Commands::Clear => cart::clear(&context),
            Commands::Checkout(args) => checkout::run(&context, args).await,
            Commands::Signup(args) => checkout::signup(&context, args).await,
        }
    }
}
