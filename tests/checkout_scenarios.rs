//! End-to-end checkout scenarios against the pure domain core: pricing a cart,
//! validating coupons, walking the checkout state machine and snapshotting an
//! order.

use jiff::{SignedDuration, Timestamp};
use rust_decimal::Decimal;
use testresult::TestResult;
use uuid::Uuid;

use platter::{
    cart::Cart,
    checkout::{
        CheckoutEvent, CheckoutPhase, DeliveryDetails, Field, Order, OrderDraft, OrderId,
        PaymentMethod, transition,
    },
    coupons::{Coupon, CouponCatalog, CouponRejection, DiscountKind},
    menu::{MenuItem, MenuItemId, Restaurant, RestaurantId},
    pricing::PriceBreakdown,
};

fn restaurant(delivery_fee: Option<Decimal>) -> Restaurant {
    Restaurant {
        id: RestaurantId::from_uuid(Uuid::from_u128(0xabc)),
        name: "Casa Verde".to_string(),
        cuisine: Some("Mexican".to_string()),
        rating: Some(Decimal::new(47, 1)),
        delivery_time: Some("20-30 min".to_string()),
        delivery_fee,
        image_url: None,
    }
}

fn dish(seed: u128, name: &str, price: Decimal) -> MenuItem {
    MenuItem {
        id: MenuItemId::from_uuid(Uuid::from_u128(seed)),
        restaurant_id: RestaurantId::from_uuid(Uuid::from_u128(0xabc)),
        name: name.to_string(),
        description: None,
        price,
        category: Some("Mains".to_string()),
        image_url: None,
        is_vegetarian: false,
        is_vegan: false,
        is_spicy: false,
    }
}

fn cart_worth(subtotal: Decimal) -> Cart {
    let mut cart = Cart::new();
    cart.add_item(&dish(1, "Platter", subtotal));
    cart
}

fn delivery() -> DeliveryDetails {
    DeliveryDetails {
        delivery_address: " 12 Harbour Road ".to_string(),
        phone_number: "(555) 123-4567".to_string(),
        payment_method: PaymentMethod::Card,
        special_instructions: String::new(),
    }
}

#[test]
fn forty_dollar_cart_totals_46_19() {
    let cart = cart_worth(Decimal::from(40));

    let pricing = PriceBreakdown::for_cart(&cart, Some(&restaurant(None))).rounded();

    assert_eq!(pricing.subtotal, Decimal::new(4000, 2), "subtotal");
    assert_eq!(pricing.delivery_fee, Decimal::new(299, 2), "default fee");
    assert_eq!(pricing.tax, Decimal::new(320, 2), "8% tax");
    assert_eq!(pricing.discount, Decimal::ZERO, "no coupon");
    assert_eq!(pricing.total, Decimal::new(4619, 2), "total");
}

#[test]
fn welcome_offer_needs_five_more_on_twenty() {
    let catalog = CouponCatalog::builtin();
    let mut cart = cart_worth(Decimal::from(20));

    let rejection = cart.apply_coupon(&catalog, "welcome10").err();

    assert_eq!(
        rejection,
        Some(CouponRejection::BelowMinimum {
            minimum: Decimal::from(25),
            shortfall: Decimal::from(5),
        }),
        "shortfall is reported exactly"
    );
    assert_eq!(cart.applied_coupon(), None, "nothing applied");
}

#[test]
fn welcome_offer_takes_three_off_thirty() -> TestResult {
    let catalog = CouponCatalog::builtin();
    let mut cart = cart_worth(Decimal::from(30));

    cart.apply_coupon(&catalog, "WELCOME10")?;

    let pricing = PriceBreakdown::for_cart(&cart, None).rounded();

    assert_eq!(pricing.discount, Decimal::new(300, 2), "10% of 30");

    Ok(())
}

#[test]
fn fixed_discount_never_exceeds_subtotal() -> TestResult {
    let catalog = CouponCatalog::new([Coupon::new(
        "FIVER",
        "Five off anything",
        DiscountKind::FixedAmount,
        Decimal::from(5),
        Decimal::ZERO,
    )])?;
    let mut cart = cart_worth(Decimal::from(3));

    cart.apply_coupon(&catalog, "FIVER")?;

    let pricing = PriceBreakdown::for_cart(&cart, Some(&restaurant(Some(Decimal::ZERO))));

    assert_eq!(pricing.discount, Decimal::from(3), "capped at the subtotal");
    assert!(pricing.total >= Decimal::ZERO, "total never goes negative");

    Ok(())
}

#[test]
fn free_delivery_waives_the_restaurant_fee() -> TestResult {
    let catalog = CouponCatalog::builtin();
    let mut cart = cart_worth(Decimal::from(20));

    cart.apply_coupon(&catalog, "FREESHIP")?;

    let pricing = PriceBreakdown::for_cart(&cart, Some(&restaurant(Some(Decimal::new(499, 2)))));

    assert_eq!(pricing.discount, Decimal::new(499, 2), "whole fee waived");

    Ok(())
}

#[test]
fn empty_cart_never_reaches_the_form() -> TestResult {
    let next = transition(
        &CheckoutPhase::Browsing,
        CheckoutEvent::Enter {
            cart_is_empty: true,
        },
    )?;

    assert_eq!(next, CheckoutPhase::Browsing, "redirected to browsing");

    Ok(())
}

#[test]
fn failed_submission_returns_to_the_form_with_the_cart_intact() -> TestResult {
    let cart = cart_worth(Decimal::from(18));
    let before = cart.clone();

    let phase = transition(
        &CheckoutPhase::Browsing,
        CheckoutEvent::Enter {
            cart_is_empty: cart.is_empty(),
        },
    )?;
    let phase = transition(&phase, CheckoutEvent::Submit)?;
    let phase = transition(&phase, CheckoutEvent::Accepted)?;

    assert_eq!(phase, CheckoutPhase::Submitting, "waiting on the sink");

    let phase = transition(&phase, CheckoutEvent::Failed("Network error".to_string()))?;

    let form = phase.form();
    assert_eq!(
        form.and_then(|form| form.notice.as_deref()),
        Some("Network error"),
        "banner shows the failure"
    );
    assert_eq!(cart, before, "cart untouched");
    assert_eq!(cart.total_item_count(), 1, "item count untouched");

    Ok(())
}

#[test]
fn second_submit_while_submitting_is_refused() -> TestResult {
    let phase = transition(
        &CheckoutPhase::Browsing,
        CheckoutEvent::Enter {
            cart_is_empty: false,
        },
    )?;
    let phase = transition(&phase, CheckoutEvent::Submit)?;
    let phase = transition(&phase, CheckoutEvent::Accepted)?;

    assert!(
        transition(&phase, CheckoutEvent::Submit).is_err(),
        "only one submission in flight"
    );

    Ok(())
}

#[test]
fn phone_numbers_need_ten_digits() {
    let valid = delivery().validate();

    assert_eq!(
        valid.map(|details| details.phone_number).ok().as_deref(),
        Some("5551234567"),
        "punctuation is stripped"
    );

    let short = DeliveryDetails {
        phone_number: "12345".to_string(),
        ..delivery()
    };

    let errors = short.validate().err().unwrap_or_default();

    assert_eq!(
        errors.get(Field::PhoneNumber),
        Some("Please enter a valid 10-digit phone number"),
        "five digits are rejected"
    );
}

#[test]
fn blank_form_reports_every_field() {
    let errors = DeliveryDetails::default().validate().err().unwrap_or_default();

    assert_eq!(errors.len(), 2, "address and phone both flagged");
    assert!(errors.get(Field::DeliveryAddress).is_some(), "address flagged");
}

#[test]
fn placed_order_is_a_snapshot_of_the_cart() -> TestResult {
    let catalog = CouponCatalog::builtin();
    let restaurant = restaurant(Some(Decimal::new(199, 2)));
    let mut cart = Cart::new();
    cart.add_item(&dish(1, "Burrito", Decimal::new(1150, 2)));
    cart.add_item(&dish(2, "Nachos", Decimal::new(850, 2)));
    cart.apply_coupon(&catalog, "FIRST20")?;

    let placed_at = Timestamp::from_second(1_760_000_000)?;
    let draft = OrderDraft::snapshot(&cart, Some(&restaurant), None, delivery().validate()?);
    let order = Order::place(OrderId::now_v7(), draft, placed_at)?;

    cart.clear();

    assert_eq!(order.lines().len(), 2, "lines captured before the cart cleared");
    assert_eq!(order.coupon_code(), Some("FIRST20"), "coupon captured");
    assert_eq!(order.restaurant_id(), Some(restaurant.id), "restaurant captured");
    assert_eq!(
        order.delivery().delivery_address,
        "12 Harbour Road",
        "address trimmed"
    );
    assert_eq!(
        order.estimated_delivery(),
        placed_at.checked_add(SignedDuration::from_mins(45))?,
        "45 minute estimate"
    );
    assert_eq!(
        order.minutes_until_delivery(placed_at),
        Some(45),
        "countdown starts at 45"
    );

    Ok(())
}
