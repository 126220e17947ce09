use clap::Args;
use jiff::Timestamp;
use platter::{
    checkout::{DeliveryDetails, Order, PaymentMethod},
    money::format_amount,
};
use platter_app::{
    auth::{AuthForm, AuthMode, Credentials, Route, RouteDecision, SessionGate, User},
    checkout::CheckoutEntry,
    context::AppContext,
    errors::UserFacing,
};
use zeroize::Zeroizing;

#[derive(Debug, Args)]
pub(crate) struct LoginArgs {
    #[arg(long, env = "PLATTER_EMAIL")]
    email: Option<String>,

    #[arg(long, env = "PLATTER_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    #[command(flatten)]
    login: LoginArgs,

    /// Where the order goes
    #[arg(long)]
    address: String,

    /// Contact number, 10 digits
    #[arg(long)]
    phone: String,

    /// cash, card, upi or wallet
    #[arg(long, default_value = "cash")]
    payment: PaymentMethod,

    /// Notes for the courier
    #[arg(long)]
    instructions: Option<String>,
}

#[derive(Debug, Args)]
pub(crate) struct SignupArgs {
    #[arg(long)]
    full_name: String,

    #[arg(long, env = "PLATTER_EMAIL")]
    email: String,

    #[arg(long, env = "PLATTER_PASSWORD", hide_env_values = true)]
    password: String,

    /// Repeat the password
    #[arg(long)]
    confirm_password: String,
}

/// Sign in if needed, then submit the cart as an order.
pub(crate) async fn run(context: &AppContext, args: CheckoutArgs) -> Result<(), String> {
    let gate = context.session_gate();
    let user = signed_in_user(&gate, args.login).await?;

    if let RouteDecision::Redirect(Route::Login) = gate.guard(Route::Checkout) {
        return Err("Sign in to place your order (--email and --password).".to_string());
    }

    let session = context
        .resume_session()
        .map_err(|error| error.user_message())?;

    let entry = session
        .enter_checkout()
        .map_err(|error| error.user_message())?;

    if entry == CheckoutEntry::Redirected {
        println!("Your cart is empty.");
        return Ok(());
    }

    let details = DeliveryDetails {
        delivery_address: args.address,
        phone_number: args.phone,
        payment_method: args.payment,
        special_instructions: args.instructions.unwrap_or_default(),
    };

    session
        .place_order(user.as_ref(), &details)
        .await
        .map_err(|error| error.user_message())?;

    let Some(order) = session.checkout().confirmed_order() else {
        return Ok(());
    };

    print_confirmation(&order);

    session
        .checkout()
        .finish()
        .map_err(|error| error.user_message())
}

/// Create an account. The user confirms their e-mail before signing in.
pub(crate) async fn signup(context: &AppContext, args: SignupArgs) -> Result<(), String> {
    let gate = context.session_gate();

    let mut form = AuthForm::new();
    form.toggle_mode();
    form.full_name = args.full_name;
    form.email = args.email;
    form.password = Zeroizing::new(args.password);
    form.confirm_password = Zeroizing::new(args.confirm_password);

    gate.submit(&mut form).await;

    let message = form.message.take().unwrap_or_default();

    match form.mode {
        AuthMode::SignIn => {
            println!("{message}");
            Ok(())
        }
        AuthMode::SignUp => Err(message),
    }
}

async fn signed_in_user(gate: &SessionGate, login: LoginArgs) -> Result<Option<User>, String> {
    if let Some(user) = gate.restore().await {
        return Ok(Some(user));
    }

    let (Some(email), Some(password)) = (login.email, login.password) else {
        return Ok(None);
    };

    let credentials = Credentials::new(email, password);

    let user = gate
        .sign_in(&credentials)
        .await
        .map_err(|error| error.user_message())?;

    println!("Signed in as {}", user.display_name());

    Ok(Some(user))
}

fn print_confirmation(order: &Order) {
    let pricing = order.pricing();

    println!("Order placed!");
    println!("Order #{}", order.id());
    println!("Status: {}", order.status().label());
    println!("Paying {} by {}", format_amount(pricing.total), order.payment_method());

    match order.minutes_until_delivery(Timestamp::now()) {
        Some(minutes) => println!("Arriving in about {minutes} minutes"),
        None => println!("Arriving shortly"),
    }
}
