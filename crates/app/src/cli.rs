//! Command-line surface of the storefront client.

use clap::{Parser, Subcommand};

/// Headless storefront client for the e-commerce backend.
#[derive(Debug, Parser)]
#[command(name = "storefront", version, about)]
pub struct Cli {
    /// Backend base URL; overrides `STOREFRONT_API_URL`.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Bearer token from a previous login; overrides `STOREFRONT_TOKEN`.
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Numeric user id from a previous login; overrides `STOREFRONT_USER_ID`.
    #[arg(long, global = true)]
    pub user_id: Option<i64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and print the session environment exports.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Use the admin login endpoint.
        #[arg(long)]
        admin: bool,
    },

    /// Register a new customer account.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Browse the product catalog.
    #[command(subcommand)]
    Catalog(CatalogCommand),

    /// Inspect and mutate the shopping cart.
    #[command(subcommand)]
    Cart(CartCommand),

    /// Place and manage orders.
    #[command(subcommand)]
    Order(OrderCommand),

    /// Profile: account details, addresses, payment methods.
    #[command(subcommand)]
    Profile(ProfileCommand),

    /// Admin sales dashboard data.
    #[command(subcommand)]
    Sales(SalesCommand),
}

#[derive(Debug, Subcommand)]
pub enum CatalogCommand {
    /// List all products.
    List,
}

#[derive(Debug, Subcommand)]
pub enum CartCommand {
    /// Show the cart with line totals.
    Show,
    /// Add a product to the cart.
    Add {
        product_id: i64,
        #[arg(default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a cart line.
    Remove { cart_item_id: i64 },
    /// Increase a line's quantity by one.
    Inc { cart_item_id: i64 },
    /// Decrease a line's quantity by one.
    Dec { cart_item_id: i64 },
}

#[derive(Debug, Subcommand)]
pub enum OrderCommand {
    /// Place an order from selected cart lines.
    Place {
        /// Cart item ids to order.
        #[arg(long, value_delimiter = ',', required = true)]
        items: Vec<i64>,
        /// Shipping address id.
        #[arg(long)]
        address: i64,
        /// Pay cash on delivery.
        #[arg(long, conflicts_with_all = ["method", "account"])]
        cod: bool,
        /// Stored payment method kind for paying now, e.g. UPI.
        #[arg(long, requires = "account")]
        method: Option<String>,
        /// Account details for the payment method.
        #[arg(long)]
        account: Option<String>,
    },
    /// List your orders (or every order with --all).
    List {
        #[arg(long)]
        all: bool,
    },
    /// Cancel an order.
    Cancel { order_id: i64 },
    /// Return a delivered order.
    Return { order_id: i64 },
    /// Set an order's status (admin).
    SetStatus { order_id: i64, status: String },
    /// Set an order's payment status (admin).
    SetPayment { order_id: i64, status: String },
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Show the logged-in user's details.
    Show,
    /// List saved shipping addresses.
    Addresses,
    /// Save a new shipping address.
    AddAddress {
        #[arg(long)]
        street: String,
        #[arg(long)]
        city: String,
        #[arg(long)]
        state: String,
        #[arg(long)]
        pincode: String,
    },
    /// List stored payment methods.
    Payments,
    /// Store a new payment method.
    AddPayment {
        /// Method kind, e.g. UPI or CARD.
        #[arg(long)]
        kind: String,
        /// Account handle or masked number.
        #[arg(long)]
        value: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum SalesCommand {
    /// Print the sales overview.
    Overview,
}
