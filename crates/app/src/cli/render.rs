//! Terminal tables

use platter::{
    cart::Cart,
    coupons::{Availability, Offer},
    menu::{MenuItem, Restaurant},
    money::format_amount,
    pricing::{DEFAULT_DELIVERY_FEE, PriceBreakdown},
};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, Theme, object::Columns},
};

pub(crate) fn restaurants(restaurants: &[Restaurant]) -> String {
    let mut builder = Builder::default();

    builder.push_record(["Id", "Restaurant", "Cuisine", "Rating", "Delivery", "Fee"]);

    for restaurant in restaurants {
        builder.push_record([
            restaurant.id.to_string(),
            restaurant.name.clone(),
            restaurant.cuisine.clone().unwrap_or_default(),
            restaurant
                .rating
                .map(|rating| rating.to_string())
                .unwrap_or_default(),
            restaurant.delivery_time.clone().unwrap_or_default(),
            format_amount(restaurant.delivery_fee.unwrap_or(DEFAULT_DELIVERY_FEE)),
        ]);
    }

    finish(builder, Columns::new(3..6))
}

pub(crate) fn menu<'a>(items: impl IntoIterator<Item = &'a MenuItem>) -> String {
    let mut builder = Builder::default();

    builder.push_record(["Id", "Item", "Category", "", "Price"]);

    for item in items {
        builder.push_record([
            item.id.to_string(),
            item.name.clone(),
            item.category.clone().unwrap_or_default(),
            dietary_tags(item),
            format_amount(item.price),
        ]);
    }

    finish(builder, Columns::new(4..5))
}

fn dietary_tags(item: &MenuItem) -> String {
    [
        (item.is_vegetarian, "veg"),
        (item.is_vegan, "vegan"),
        (item.is_spicy, "spicy"),
    ]
    .into_iter()
    .filter_map(|(set, tag)| set.then_some(tag))
    .collect::<Vec<_>>()
    .join(", ")
}

pub(crate) fn cart(cart: &Cart, pricing: &PriceBreakdown) -> String {
    let mut builder = Builder::default();

    builder.push_record(["Id", "Item", "Qty", "Each", "Total"]);

    for line in cart.lines() {
        builder.push_record([
            line.item_id.to_string(),
            line.name.clone(),
            line.quantity.to_string(),
            format_amount(line.unit_price),
            format_amount(line.line_total()),
        ]);
    }

    let mut out = finish(builder, Columns::new(2..5));

    if let Some(coupon) = cart.applied_coupon() {
        out.push_str(&format!("\nCoupon {} ({})", coupon.code, coupon.badge()));
    }

    out.push_str(&format!("\n\n{pricing}"));

    out
}

pub(crate) fn offers<'a>(offers: impl IntoIterator<Item = Offer<'a>>) -> String {
    let mut builder = Builder::default();

    builder.push_record(["Code", "Offer", "Description", "Status"]);

    for offer in offers {
        let status = match offer.availability {
            Availability::Available => "Available".to_string(),
            Availability::Locked { shortfall } => {
                format!("Add {} more to unlock", format_amount(shortfall))
            }
        };

        builder.push_record([
            offer.coupon.code.clone(),
            offer.coupon.badge(),
            offer.coupon.description.clone(),
            status,
        ]);
    }

    finish(builder, Columns::new(1..2))
}

fn finish(builder: Builder, amounts: Columns<std::ops::Range<usize>>) -> String {
    let mut table = builder.build();

    table.with(Theme::from(Style::modern_rounded()));
    table.modify(amounts, Alignment::right());

    table.to_string()
}
