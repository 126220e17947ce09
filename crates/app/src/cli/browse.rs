use clap::Args;
use platter::menu::{ALL_CATEGORIES, RestaurantId, categories, filter_by_category};
use platter_app::{context::AppContext, errors::UserFacing};
use rust_decimal::Decimal;

use crate::cli::render;

#[derive(Debug, Args)]
pub(crate) struct MenuArgs {
    /// Restaurant id from `platter restaurants`
    restaurant: RestaurantId,

    /// Only show this category
    #[arg(long)]
    category: Option<String>,
}

#[derive(Debug, Args)]
pub(crate) struct OffersArgs {
    /// Price offers against this subtotal instead of the cart's
    #[arg(long)]
    subtotal: Option<Decimal>,
}

pub(crate) async fn restaurants(context: &AppContext) -> Result<(), String> {
    let restaurants = context
        .catalog
        .list_restaurants()
        .await
        .map_err(|error| error.user_message())?;

    if restaurants.is_empty() {
        println!("No restaurants are open right now.");
    } else {
        println!("{}", render::restaurants(&restaurants));
    }

    Ok(())
}

/// Show a menu and make its restaurant the one the cart orders from.
pub(crate) async fn menu(context: &AppContext, args: MenuArgs) -> Result<(), String> {
    let restaurant = context
        .catalog
        .get_restaurant(args.restaurant)
        .await
        .map_err(|error| error.user_message())?;

    let items = context
        .catalog
        .list_menu_items(restaurant.id)
        .await
        .map_err(|error| error.user_message())?;

    let session = context
        .resume_session()
        .map_err(|error| error.user_message())?;

    println!("{}", restaurant.name);

    if let Some(cuisine) = &restaurant.cuisine {
        println!("{cuisine}");
    }

    session.select_restaurant(restaurant);
    session.save().map_err(|error| error.user_message())?;

    let category = args.category.as_deref().unwrap_or(ALL_CATEGORIES);

    println!("{}", categories(&items).join(" | "));
    println!("{}", render::menu(filter_by_category(&items, category)));

    Ok(())
}

pub(crate) fn offers(context: &AppContext, args: &OffersArgs) -> Result<(), String> {
    let subtotal = match args.subtotal {
        Some(subtotal) => subtotal,
        None => context
            .resume_session()
            .map_err(|error| error.user_message())?
            .cart()
            .snapshot()
            .subtotal(),
    };

    println!("{}", render::offers(context.coupons.offers(subtotal)));

    Ok(())
}
