#[cfg(debug_assertions)]
pub fn get_backend_url() -> &'static str {
    "http://localhost:3001"  // Development URL when running locally
}

#[cfg(not(debug_assertions))]
pub fn get_backend_url() -> &'static str {
    ""  // Production URL
}

pub const CHECKOUT_URL: &str = "https://buy.stripe.com/bJefZbaPf1IYfeYf8LafS03";
pub const DISCOUNT_CODE: &str = "JOBWIN10";
pub const DISCOUNT_PERCENT: f64 = 10.0;
pub const SCROLL_TRIGGER_PERCENT: f64 = 60.0;

pub const BASE_PRICE: f64 = 79.0;
pub const ORIGINAL_PRICE: f64 = 112.0;
pub const CURRENCY: &str = "RM";
