//! Console storefront client entry point.

mod cli;
mod config;

use std::time::Duration;

use analytics::SalesOverview;
use chrono::Utc;
use clap::Parser;
use common::{AddressId, CartItemId, OrderId, OrderStatus, PaymentStatus, ProductId, UserId};
use domain::{
    CartService, CheckoutSelection, OrderBook, PaymentChoice, delivery_countdown,
    displayed_delivery_date, format_delivery_date, place_order,
};
use rest::{
    AuthApi, CartApi, LoginRequest, NewAddress, NewPaymentMethod, PaymentMethod, ProductApi,
    ProfileApi, RegisterRequest, RestClient, SalesApi, SessionContext,
};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use cli::{CartCommand, CatalogCommand, Cli, Command, OrderCommand, ProfileCommand, SalesCommand};
use config::Config;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    if let Some(token) = cli.token {
        config.token = Some(token);
    }
    if let Some(user_id) = cli.user_id {
        config.user_id = Some(user_id);
    }

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let client = RestClient::with_timeout(
        config.api_url.clone(),
        Duration::from_secs(config.timeout_secs),
    )
    .expect("failed to build HTTP client");

    if let Err(message) = run(cli.command, client, &config).await {
        eprintln!("{message}");
        std::process::exit(1);
    }
}

/// Builds the session context from a previous login's token and user id.
fn session(config: &Config) -> Result<SessionContext, String> {
    match (&config.token, config.user_id) {
        (Some(token), Some(user_id)) => Ok(SessionContext::new(UserId::new(user_id), token)),
        _ => Err(
            "Not logged in. Run `storefront login --email ... --password ...` and export the \
             printed variables."
                .to_string(),
        ),
    }
}

fn parse_order_status(input: &str) -> Result<OrderStatus, String> {
    let wanted = input.to_uppercase();
    OrderStatus::ALL
        .into_iter()
        .find(|s| s.as_str() == wanted)
        .ok_or_else(|| format!("Unknown order status {input:?}. One of: PENDING, PROCESSING, SHIPPED, OUT_FOR_DELIVERY, DELIVERED, CANCELLED, RETURNED."))
}

fn parse_payment_status(input: &str) -> Result<PaymentStatus, String> {
    let wanted = input.to_uppercase();
    PaymentStatus::ALL
        .into_iter()
        .find(|s| s.as_str() == wanted)
        .ok_or_else(|| {
            format!(
                "Unknown payment status {input:?}. One of: PENDING, PAID, FAILED, \
                 REFUND_INITIATED, REFUNDED."
            )
        })
}

async fn run(command: Command, client: RestClient, config: &Config) -> Result<(), String> {
    match command {
        Command::Login {
            email,
            password,
            admin,
        } => {
            let request = LoginRequest {
                user_email: email,
                user_password: password,
            };
            let result = if admin {
                client.login_admin(&request).await
            } else {
                client.login_user(&request).await
            };
            let response = result.map_err(|err| err.user_message().to_string())?;

            println!("export STOREFRONT_TOKEN={}", response.user_token);
            println!("export STOREFRONT_USER_ID={}", response.user_id);
            Ok(())
        }

        Command::Register {
            name,
            email,
            password,
        } => {
            client
                .register_user(&RegisterRequest {
                    user_name: name,
                    user_email: email,
                    user_password: password,
                })
                .await
                .map_err(|err| err.user_message().to_string())?;
            println!("Registered. Log in to start shopping.");
            Ok(())
        }

        Command::Catalog(CatalogCommand::List) => {
            let session = session(config)?;
            // Page-view tracking is best-effort; a failure only logs.
            if let Err(err) = client.track_visitor(&session, "catalog").await {
                tracing::debug!(error = %err, "visitor tracking failed");
            }
            let products = client
                .list(&session)
                .await
                .map_err(|err| err.user_message().to_string())?;
            for product in products {
                println!(
                    "#{:<5} {:<30} {:<12} {:>10}  stock {}",
                    product.product_id.get(),
                    product.product_name,
                    product.product_category,
                    product.product_price.to_string(),
                    product.product_quantity,
                );
            }
            Ok(())
        }

        Command::Cart(command) => run_cart(command, client, config).await,
        Command::Order(command) => run_order(command, client, config).await,
        Command::Profile(command) => run_profile(command, client, config).await,

        Command::Sales(SalesCommand::Overview) => {
            let session = session(config)?;
            let overview = SalesOverview::fetch(&client, &session).await;

            println!("Total revenue : {}", overview.total_revenue);
            println!("Total orders  : {}", overview.total_orders);
            println!("Visitors      : {}", overview.total_visitors);
            println!(
                "Shipped {:.1}% | Delivered {:.1}% | Cancelled {:.1}%",
                overview.shipped_percentage(),
                overview.delivered_percentage(),
                overview.cancelled_percentage(),
            );

            match overview.peak_order_day() {
                Some((day, count)) => println!("Peak day      : {day} ({count} orders)"),
                None => println!("Peak day      : N/A"),
            }
            println!(
                "Avg orders/day: {:.2}",
                overview.average_orders_per_day()
            );

            println!("Top products:");
            for (name, units) in overview.sorted_top_products() {
                println!("  {units:>6}  {name}");
            }
            println!("Orders per day:");
            for (day, count) in overview.sorted_orders_per_day() {
                println!("  {day}  {count}");
            }
            Ok(())
        }
    }
}

async fn run_cart(command: CartCommand, client: RestClient, config: &Config) -> Result<(), String> {
    let session = session(config)?;
    let mut cart = CartService::new(client, session);

    // A failed read renders as an empty cart; the error is already logged.
    let _ = cart.load().await;

    match command {
        CartCommand::Show => {}
        CartCommand::Add {
            product_id,
            quantity,
        } => {
            cart.add_line(ProductId::new(product_id), quantity)
                .await
                .map_err(|err| err.user_message())?;
        }
        CartCommand::Remove { cart_item_id } => {
            cart.remove_line(CartItemId::new(cart_item_id))
                .await
                .map_err(|err| err.user_message())?;
        }
        CartCommand::Inc { cart_item_id } => {
            cart.increase_quantity(CartItemId::new(cart_item_id))
                .await
                .map_err(|err| err.user_message())?;
        }
        CartCommand::Dec { cart_item_id } => {
            cart.decrease_quantity(CartItemId::new(cart_item_id))
                .await
                .map_err(|err| err.user_message())?;
        }
    }

    print_cart(&cart);
    Ok(())
}

fn print_cart<C: CartApi>(cart: &CartService<C>) {
    if cart.cart().is_empty() {
        println!("Cart is empty.");
        return;
    }
    for line in cart.cart().lines() {
        println!(
            "#{:<5} {:<30} x{:<3} {:>10}",
            line.cart_item_id.get(),
            line.product.product_name,
            line.quantity,
            line.line_total.to_string(),
        );
    }
    let totals = cart.totals();
    println!(
        "{} items, total {} (+{} shipping)",
        totals.total_item_count, totals.total_price, totals.shipping_cost
    );
}

async fn run_profile(
    command: ProfileCommand,
    client: RestClient,
    config: &Config,
) -> Result<(), String> {
    let session = session(config)?;

    match command {
        ProfileCommand::Show => {
            let profile = client
                .user_details(&session)
                .await
                .map_err(|err| err.user_message().to_string())?;
            println!("#{} {} <{}>", profile.user_id, profile.user_name, profile.user_email);
            Ok(())
        }

        ProfileCommand::Addresses => {
            let addresses = client
                .addresses(&session)
                .await
                .map_err(|err| err.user_message().to_string())?;
            if addresses.is_empty() {
                println!("No saved addresses.");
            }
            for address in addresses {
                println!(
                    "#{:<5} {}, {}, {} {}",
                    address.address_id.get(),
                    address.street,
                    address.city,
                    address.state,
                    address.pincode,
                );
            }
            Ok(())
        }

        ProfileCommand::AddAddress {
            street,
            city,
            state,
            pincode,
        } => {
            client
                .add_address(
                    &session,
                    &NewAddress {
                        user_id: session.user_id(),
                        street,
                        city,
                        state,
                        pincode,
                    },
                )
                .await
                .map_err(|err| err.user_message().to_string())?;
            println!("Address saved.");
            Ok(())
        }

        ProfileCommand::Payments => {
            let methods = client
                .payment_methods(&session)
                .await
                .map_err(|err| err.user_message().to_string())?;
            if methods.is_empty() {
                println!("No stored payment methods.");
            }
            for method in methods {
                println!("{:<8} {}", method.kind, method.value);
            }
            Ok(())
        }

        ProfileCommand::AddPayment { kind, value } => {
            client
                .add_payment_method(&session, &NewPaymentMethod { kind, value })
                .await
                .map_err(|err| err.user_message().to_string())?;
            println!("Payment method saved.");
            Ok(())
        }
    }
}

async fn run_order(
    command: OrderCommand,
    client: RestClient,
    config: &Config,
) -> Result<(), String> {
    let session = session(config)?;

    match command {
        OrderCommand::Place {
            items,
            address,
            cod,
            method,
            account,
        } => {
            let mut cart = CartService::new(client.clone(), session);
            let _ = cart.load().await;

            for cart_item_id in items {
                if !cart.toggle_selection(CartItemId::new(cart_item_id), true) {
                    return Err(format!("Cart item {cart_item_id} is not in the cart."));
                }
            }

            let payment = if cod {
                Some(PaymentChoice::CashOnDelivery)
            } else {
                method.map(|kind| PaymentChoice::PayNow {
                    method: PaymentMethod {
                        kind,
                        value: account.clone().unwrap_or_default(),
                    },
                    account: account.unwrap_or_default(),
                })
            };

            let selection = CheckoutSelection {
                address: Some(AddressId::new(address)),
                payment,
            };

            let receipt = place_order(&mut cart, &client, &selection)
                .await
                .map_err(|err| err.user_message())?;

            for order in &receipt.orders {
                println!(
                    "Order #{} placed: {} ({})",
                    order.order_id,
                    order.product_names(),
                    order.total_amount(),
                );
            }
            println!(
                "Estimated delivery: {}",
                format_delivery_date(receipt.estimated_delivery)
            );
            Ok(())
        }

        OrderCommand::List { all } => {
            let mut book = OrderBook::new(client, session);
            let _ = if all {
                book.load_all().await
            } else {
                book.load_for_user().await
            };

            if book.orders().is_empty() {
                println!("No orders.");
                return Ok(());
            }
            let today = Utc::now().date_naive();
            for order in book.orders() {
                println!(
                    "#{:<5} {}  {:<16} {:<16} {:>10}  {} (due {})",
                    order.order_id.get(),
                    order.order_date.format("%Y-%m-%d"),
                    order.order_status.display_label(),
                    order.payment_status.as_str(),
                    order.total_amount().to_string(),
                    delivery_countdown(order, today),
                    format_delivery_date(displayed_delivery_date(order, today)),
                );
            }
            Ok(())
        }

        OrderCommand::Cancel { order_id } => {
            let mut book = OrderBook::new(client, session);
            let _ = book.load_for_user().await;
            book.cancel(OrderId::new(order_id))
                .await
                .map_err(|err| err.user_message())?;
            println!("Order #{order_id} cancelled.");
            Ok(())
        }

        OrderCommand::Return { order_id } => {
            let mut book = OrderBook::new(client, session);
            let _ = book.load_for_user().await;
            book.return_order(OrderId::new(order_id))
                .await
                .map_err(|err| err.user_message())?;
            println!("Order #{order_id} returned; refund initiated.");
            Ok(())
        }

        OrderCommand::SetStatus { order_id, status } => {
            let status = parse_order_status(&status)?;
            let mut book = OrderBook::new(client, session);
            let _ = book.load_all().await;
            book.update_order_status(OrderId::new(order_id), status)
                .await
                .map_err(|err| err.user_message())?;
            println!("Order #{order_id} is now {status}.");
            Ok(())
        }

        OrderCommand::SetPayment { order_id, status } => {
            let status = parse_payment_status(&status)?;
            let mut book = OrderBook::new(client, session);
            let _ = book.load_all().await;
            book.update_payment_status(OrderId::new(order_id), status)
                .await
                .map_err(|err| err.user_message())?;
            println!("Order #{order_id} payment is now {status}.");
            Ok(())
        }
    }
}
