use clap::Args;
use platter::menu::MenuItemId;
use platter_app::{
    catalog::CatalogError, context::AppContext, errors::UserFacing, session::Session,
};

use crate::cli::render;

const NO_RESTAURANT: &str = "Open a restaurant's menu first with `platter menu <id>`.";

#[derive(Debug, Args)]
pub(crate) struct AddArgs {
    /// Menu item id from `platter menu`
    item: MenuItemId,

    /// How many to add, at least one
    #[arg(long, default_value_t = 1u32, value_parser = clap::value_parser!(u32).range(1..))]
    quantity: u32,
}

#[derive(Debug, Args)]
pub(crate) struct RemoveArgs {
    item: MenuItemId,
}

#[derive(Debug, Args)]
pub(crate) struct QuantityArgs {
    item: MenuItemId,

    /// New quantity; 0 removes the line
    quantity: u32,
}

#[derive(Debug, Args)]
pub(crate) struct CouponArgs {
    /// Coupon code, e.g. WELCOME10
    #[arg(required_unless_present = "remove")]
    code: Option<String>,

    /// Remove the applied coupon instead
    #[arg(long, conflicts_with = "code")]
    remove: bool,
}

pub(crate) fn show(context: &AppContext) -> Result<(), String> {
    let session = resume(context)?;

    print_cart(&session);

    Ok(())
}

/// Add an item from the open restaurant's menu.
pub(crate) async fn add(context: &AppContext, args: AddArgs) -> Result<(), String> {
    let session = resume(context)?;
    let restaurant = session.restaurant().ok_or(NO_RESTAURANT)?;

    let item = context
        .catalog
        .list_menu_items(restaurant.id)
        .await
        .map_err(|error| error.user_message())?
        .into_iter()
        .find(|item| item.id == args.item)
        .ok_or_else(|| CatalogError::MenuItemNotFound(args.item).user_message())?;

    let already = session.cart().snapshot().quantity_of(item.id);

    session.cart().add_item(&item);

    if args.quantity > 1 {
        session
            .cart()
            .set_quantity(item.id, already.saturating_add(args.quantity));
    }

    save_and_print(&session)
}

pub(crate) fn remove(context: &AppContext, args: &RemoveArgs) -> Result<(), String> {
    let session = resume(context)?;

    session.cart().remove_item(args.item);

    save_and_print(&session)
}

pub(crate) fn quantity(context: &AppContext, args: &QuantityArgs) -> Result<(), String> {
    let session = resume(context)?;

    session.cart().set_quantity(args.item, args.quantity);

    save_and_print(&session)
}

pub(crate) fn coupon(context: &AppContext, args: CouponArgs) -> Result<(), String> {
    let session = resume(context)?;

    match args.code {
        Some(code) if !args.remove => {
            let coupon = session
                .cart()
                .apply_coupon(&code)
                .map_err(|rejection| rejection.user_message())?;

            println!("Coupon {} applied: {}", coupon.code, coupon.badge());
        }
        _ => session.cart().remove_coupon(),
    }

    save_and_print(&session)
}

pub(crate) fn clear(context: &AppContext) -> Result<(), String> {
    let session = resume(context)?;

    session.cart().clear();

    save_and_print(&session)
}

fn resume(context: &AppContext) -> Result<Session, String> {
    context
        .resume_session()
        .map_err(|error| error.user_message())
}

fn save_and_print(session: &Session) -> Result<(), String> {
    session.save().map_err(|error| error.user_message())?;

    print_cart(session);

    Ok(())
}

fn print_cart(session: &Session) {
    let cart = session.cart().snapshot();

    if cart.is_empty() {
        println!("Your cart is empty.");
        return;
    }

    let restaurant = session.restaurant();

    if let Some(restaurant) = &restaurant {
        println!("Ordering from {}", restaurant.name);
    }

    println!(
        "{}",
        render::cart(&cart, &session.cart().price(restaurant.as_ref()))
    );
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, Parser)]
    struct Add {
        #[command(flatten)]
        args: AddArgs,
    }

    const ITEM: &str = "0192f3a4-5b6c-7d8e-9f00-112233445566";

    #[test]
    fn add_refuses_a_zero_quantity() {
        let parsed = Add::try_parse_from(["add", ITEM, "--quantity", "0"]);

        assert!(parsed.is_err());
    }

    #[test]
    fn add_defaults_to_one_unit() -> TestResult {
        let add = Add::try_parse_from(["add", ITEM])?;

        assert_eq!(add.args.item.to_string(), ITEM);
        assert_eq!(add.args.quantity, 1);

        Ok(())
    }
}
