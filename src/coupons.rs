//! Coupons
//!
//! A fixed catalog of offers and the validator that decides whether a code can
//! be applied to a cart. Pre-selecting a suggested offer goes through the same
//! [`CouponCatalog::validate`] path as a typed code.

use std::{fs, path::Path};

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money::format_amount;

/// How a coupon reduces the price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    /// `value` is a fraction of the subtotal, e.g. `0.10` for 10% off.
    PercentageOfSubtotal,

    /// `value` is an amount off the subtotal, clamped to the subtotal.
    FixedAmount,

    /// The delivery fee is waived; `value` is the fee advertised in the catalog.
    WaiveDeliveryFee,
}

/// A named discount rule with an eligibility threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    /// Code typed by the user; matched case-insensitively.
    pub code: String,

    /// Short description, e.g. "Welcome offer - 10% off"
    pub description: String,

    /// Discount rule
    pub kind: DiscountKind,

    /// Rule parameter, see [`DiscountKind`].
    pub value: Decimal,

    /// Smallest subtotal the coupon may be applied to.
    #[serde(default)]
    pub minimum_order_subtotal: Decimal,
}

impl Coupon {
    /// Create a new coupon.
    pub fn new(
        code: impl Into<String>,
        description: impl Into<String>,
        kind: DiscountKind,
        value: Decimal,
        minimum_order_subtotal: Decimal,
    ) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            kind,
            value,
            minimum_order_subtotal,
        }
    }

    /// The percentage off the subtotal for [`DiscountKind::PercentageOfSubtotal`] coupons.
    pub fn percentage(&self) -> Option<Percentage> {
        match self.kind {
            DiscountKind::PercentageOfSubtotal => Some(Percentage::from(self.value)),
            DiscountKind::FixedAmount | DiscountKind::WaiveDeliveryFee => None,
        }
    }

    /// Amount still needed before `subtotal` qualifies, or `None` when it already does.
    pub fn shortfall(&self, subtotal: Decimal) -> Option<Decimal> {
        (subtotal < self.minimum_order_subtotal).then(|| self.minimum_order_subtotal - subtotal)
    }

    /// Offer badge, e.g. `10% OFF`, `$5.00 OFF` or `FREE DELIVERY`.
    pub fn badge(&self) -> String {
        match self.kind {
            DiscountKind::PercentageOfSubtotal => {
                format!("{}% OFF", (self.value * Decimal::ONE_HUNDRED).normalize())
            }
            DiscountKind::FixedAmount => format!("{} OFF", format_amount(self.value)),
            DiscountKind::WaiveDeliveryFee => "FREE DELIVERY".to_string(),
        }
    }

    fn key(&self) -> String {
        normalize_code(&self.code)
    }
}

/// Why a coupon code could not be applied.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CouponRejection {
    /// Nothing but whitespace was entered.
    #[error("Please enter a coupon code")]
    Blank,

    /// No catalog entry matches the code.
    #[error("Invalid coupon code")]
    NotFound,

    /// The subtotal is below the coupon's minimum order.
    #[error(
        "Minimum order of {} required, add {} more",
        display(.minimum),
        display(.shortfall)
    )]
    BelowMinimum {
        /// Minimum order subtotal of the coupon.
        minimum: Decimal,

        /// Exact amount that must be added to qualify.
        shortfall: Decimal,
    },
}

/// Whether an offer can currently be used.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Availability {
    /// The subtotal meets the minimum order.
    Available,

    /// The subtotal is short by the given amount.
    Locked {
        /// Amount to add before the offer unlocks.
        shortfall: Decimal,
    },
}

/// A catalog coupon together with its availability for a given subtotal.
#[derive(Debug, Clone, Copy)]
pub struct Offer<'a> {
    /// The coupon on offer
    pub coupon: &'a Coupon,

    /// Whether it can be used right now
    pub availability: Availability,
}

impl Offer<'_> {
    /// Whether the offer can be selected.
    pub fn is_available(&self) -> bool {
        matches!(self.availability, Availability::Available)
    }
}

/// Errors loading a coupon catalog.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    /// Two coupons share a code (compared case-insensitively).
    #[error("duplicate coupon code {0}")]
    DuplicateCode(String),

    /// A coupon has a negative value or minimum.
    #[error("coupon {0} has a negative value or minimum order")]
    NegativeAmount(String),

    /// The catalog file could not be read.
    #[error("failed to read coupon catalog")]
    Io(#[from] std::io::Error),

    /// The catalog file is not valid YAML for a catalog.
    #[error("failed to parse coupon catalog")]
    Parse(#[from] serde_norway::Error),
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    coupons: Vec<Coupon>,
}

/// Read-only catalog of coupons, looked up case-insensitively by code.
#[derive(Debug, Clone)]
pub struct CouponCatalog {
    coupons: Vec<Coupon>,
    index: FxHashMap<String, usize>,
}

impl CouponCatalog {
    /// Build a catalog, rejecting duplicate codes.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogLoadError::DuplicateCode`] when two codes collide and
    /// [`CatalogLoadError::NegativeAmount`] when an amount is negative.
    pub fn new(coupons: impl Into<Vec<Coupon>>) -> Result<Self, CatalogLoadError> {
        let coupons = coupons.into();
        let mut index = FxHashMap::default();

        for (position, coupon) in coupons.iter().enumerate() {
            if coupon.value.is_sign_negative() || coupon.minimum_order_subtotal.is_sign_negative()
            {
                return Err(CatalogLoadError::NegativeAmount(coupon.code.clone()));
            }

            if index.insert(coupon.key(), position).is_some() {
                return Err(CatalogLoadError::DuplicateCode(coupon.code.clone()));
            }
        }

        Ok(Self { coupons, index })
    }

    /// The offers shipped with the application.
    pub fn builtin() -> Self {
        let coupons = vec![
            Coupon::new(
                "WELCOME10",
                "Welcome offer - 10% off",
                DiscountKind::PercentageOfSubtotal,
                Decimal::new(10, 2),
                Decimal::from(25),
            ),
            Coupon::new(
                "SAVE5",
                "Flat $5 off",
                DiscountKind::FixedAmount,
                Decimal::from(5),
                Decimal::from(30),
            ),
            Coupon::new(
                "FREESHIP",
                "Free delivery",
                DiscountKind::WaiveDeliveryFee,
                Decimal::new(299, 2),
                Decimal::from(20),
            ),
            Coupon::new(
                "FIRST20",
                "First order - 20% off",
                DiscountKind::PercentageOfSubtotal,
                Decimal::new(20, 2),
                Decimal::from(15),
            ),
        ];

        let index = coupons
            .iter()
            .enumerate()
            .map(|(position, coupon)| (coupon.key(), position))
            .collect();

        Self { coupons, index }
    }

    /// Parse a catalog from YAML with a top-level `coupons` list.
    ///
    /// # Errors
    ///
    /// Returns an error when the YAML is malformed or the coupons are invalid.
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogLoadError> {
        let file: CatalogFile = serde_norway::from_str(yaml)?;

        Self::new(file.coupons)
    }

    /// Load a YAML catalog from disk.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, CatalogLoadError> {
        Self::from_yaml(&fs::read_to_string(path)?)
    }

    /// Look up a coupon by code, ignoring case and surrounding whitespace.
    pub fn get(&self, code: &str) -> Option<&Coupon> {
        self.index
            .get(&normalize_code(code))
            .and_then(|&position| self.coupons.get(position))
    }

    /// Validate `code` against `subtotal`.
    ///
    /// # Errors
    ///
    /// - [`CouponRejection::Blank`]: the code is empty after trimming.
    /// - [`CouponRejection::NotFound`]: no coupon has this code.
    /// - [`CouponRejection::BelowMinimum`]: the subtotal is short of the coupon's
    ///   minimum order; carries the exact shortfall.
    pub fn validate(&self, code: &str, subtotal: Decimal) -> Result<&Coupon, CouponRejection> {
        if code.trim().is_empty() {
            return Err(CouponRejection::Blank);
        }

        let coupon = self.get(code).ok_or(CouponRejection::NotFound)?;

        match coupon.shortfall(subtotal) {
            Some(shortfall) => Err(CouponRejection::BelowMinimum {
                minimum: coupon.minimum_order_subtotal,
                shortfall,
            }),
            None => Ok(coupon),
        }
    }

    /// Every coupon in catalog order with its availability for `subtotal`.
    pub fn offers(&self, subtotal: Decimal) -> impl Iterator<Item = Offer<'_>> {
        self.coupons.iter().map(move |coupon| Offer {
            coupon,
            availability: match coupon.shortfall(subtotal) {
                Some(shortfall) => Availability::Locked { shortfall },
                None => Availability::Available,
            },
        })
    }

    /// Iterate over the coupons.
    pub fn iter(&self) -> impl Iterator<Item = &Coupon> {
        self.coupons.iter()
    }

    /// Number of coupons.
    pub fn len(&self) -> usize {
        self.coupons.len()
    }

    /// Whether the catalog has no coupons.
    pub fn is_empty(&self) -> bool {
        self.coupons.is_empty()
    }
}

impl Default for CouponCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn display(amount: &Decimal) -> String {
    format_amount(*amount)
}

fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}
