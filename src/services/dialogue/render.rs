//! Reply builders for each screen of the shopping flow.
//!
//! These are pure functions over catalog snapshots; fetching happens in the
//! state handlers.

use super::event::{BACK_TO_MENU, CHECKOUT, SHOW_CART, Selection};
use crate::config::DialogueConfig;
use crate::models::catalog::{Cart, Customer, Product};
use crate::models::reply::{Reply, ReplyOption};

pub const MENU_PROMPT: &str = "Please choose:";
pub const EMPTY_CART: &str = "Your cart is empty.";
pub const EMAIL_PROMPT: &str = "Please send your email address so we can contact you about the order.";

fn cart_option() -> ReplyOption {
    ReplyOption::new("Cart", SHOW_CART)
}

fn back_to_menu_option(label: &str) -> ReplyOption {
    ReplyOption::new(label, BACK_TO_MENU)
}

/// Product list with one button per product and a cart button.
pub fn menu(products: &[Product]) -> Reply {
    products
        .iter()
        .fold(Reply::text(MENU_PROMPT), |reply, product| {
            reply.with_option(ReplyOption::new(&product.name, &product.id))
        })
        .with_option(cart_option())
}

/// Product detail with the quantity buttons on one row.
pub fn product_detail(product: &Product, image_url: Option<String>, settings: &DialogueConfig) -> Reply {
    let text = format!(
        "{}\n\n{} per {}\n\n{}",
        product.name, product.price, settings.unit_label, product.description
    );

    let quantities = settings
        .quantity_choices
        .iter()
        .map(|&quantity| {
            ReplyOption::new(
                format!("{} {}", quantity, settings.unit_label),
                Selection::quantity_payload(&product.id, quantity),
            )
        })
        .collect();

    let reply = Reply::text(text.trim_end())
        .with_row(quantities)
        .with_option(cart_option())
        .with_option(back_to_menu_option("Back"));

    match image_url {
        Some(url) => reply.with_image(url),
        None => reply,
    }
}

/// Cart lines, the backend total and one remove button per line.
///
/// Checkout is only offered for a non-empty cart.
pub fn cart(cart: &Cart, settings: &DialogueConfig) -> Reply {
    if cart.is_empty() {
        return Reply::text(EMPTY_CART).with_option(back_to_menu_option("Back to menu"));
    }

    let unit = &settings.unit_label;
    let mut text = String::new();
    for line in &cart.lines {
        text.push_str(&line.name);
        text.push('\n');
        if !line.description.is_empty() {
            text.push_str(&line.description);
            text.push('\n');
        }
        text.push_str(&format!(
            "{} per {}\n{} {} in cart for {}\n\n",
            line.unit_price, unit, line.quantity, unit, line.line_price
        ));
    }
    text.push_str(&format!("Total: {}", cart.total));

    cart.lines
        .iter()
        .fold(Reply::text(text), |reply, line| {
            reply.with_option(ReplyOption::new(format!("Remove {}", line.name), &line.id))
        })
        .with_option(back_to_menu_option("Back to menu"))
        .with_option(ReplyOption::new("Checkout", CHECKOUT))
}

pub fn email_prompt() -> Reply {
    Reply::text(EMAIL_PROMPT).with_option(back_to_menu_option("Back to menu"))
}

pub fn customer_created(customer: &Customer) -> Reply {
    Reply::text(format!(
        "Thank you! We will contact you at {} to confirm the order.",
        customer.email
    ))
    .with_option(back_to_menu_option("Back to menu"))
}

/// Acknowledgement shown after a quantity button added a cart line.
pub fn added_notice(quantity: u32, product_name: &str, settings: &DialogueConfig) -> String {
    format!(
        "Added {} {} of {} to your cart.",
        quantity, settings.unit_label, product_name
    )
}

/// Prefixes a reply's text with a notice paragraph.
pub fn with_notice(mut reply: Reply, notice: &str) -> Reply {
    reply.text = format!("{}\n\n{}", notice, reply.text);
    reply
}
