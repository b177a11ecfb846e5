use crate::config::{DISCOUNT_CODE, DISCOUNT_PERCENT};

pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// What the visitor typed into the pricing card's code field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DiscountState {
    input_code: String,
    applied: bool,
}

impl DiscountState {
    pub fn input_code(&self) -> &str {
        &self.input_code
    }

    pub fn is_applied(&self) -> bool {
        self.applied
    }

    /// Every keystroke re-evaluates the code; erasing it drops the discount.
    pub fn on_input(&mut self, raw: &str) {
        self.input_code = normalize_code(raw);
        self.applied = self.input_code == DISCOUNT_CODE;
    }

    pub fn apply(&mut self) -> bool {
        if normalize_code(&self.input_code) == DISCOUNT_CODE {
            self.applied = true;
        }
        self.applied
    }

    pub fn remove(&mut self) {
        self.input_code.clear();
        self.applied = false;
    }

    pub fn shows_invalid_hint(&self) -> bool {
        !self.input_code.is_empty() && !self.applied
    }

    pub fn can_apply(&self) -> bool {
        !self.input_code.trim().is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriceQuote {
    pub display_price: f64,
    pub savings_percent: i64,
}

pub fn quote(base_price: f64, original_price: f64, applied: bool) -> PriceQuote {
    let display_price = if applied {
        round_cents(base_price * (1.0 - DISCOUNT_PERCENT / 100.0))
    } else {
        base_price
    };
    let savings_percent = if original_price > 0.0 {
        ((original_price - display_price) / original_price * 100.0).round() as i64
    } else {
        0
    };
    PriceQuote {
        display_price,
        savings_percent,
    }
}

pub fn checkout_url(base: &str, applied: bool) -> String {
    if applied {
        format!("{}?promo_code={}", base, urlencoding::encode(DISCOUNT_CODE))
    } else {
        base.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHECKOUT: &str = "https://buy.stripe.com/test_123";

    #[test]
    fn lowercase_code_with_spaces_applies() {
        let mut state = DiscountState::default();
        state.on_input("jobwin10 ");

        assert!(state.is_applied());
        assert_eq!(state.input_code(), "JOBWIN10");
        let quote = quote(79.0, 112.0, state.is_applied());
        assert_eq!(quote.display_price, 71.1);
        assert_eq!(quote.savings_percent, 37);
        assert_eq!(
            checkout_url(CHECKOUT, state.is_applied()),
            "https://buy.stripe.com/test_123?promo_code=JOBWIN10"
        );
    }

    #[test]
    fn wrong_code_keeps_the_price_and_shows_a_hint() {
        let mut state = DiscountState::default();
        state.on_input("WRONG");

        assert!(!state.is_applied());
        assert!(state.shows_invalid_hint());
        assert!(!state.apply());
        let quote = quote(79.0, 112.0, state.is_applied());
        assert_eq!(quote.display_price, 79.0);
        assert_eq!(quote.savings_percent, 29);
        assert_eq!(checkout_url(CHECKOUT, state.is_applied()), CHECKOUT);
    }

    #[test]
    fn clearing_the_input_forgets_the_discount() {
        let mut state = DiscountState::default();
        state.on_input("JOBWIN10");
        assert!(state.is_applied());

        state.on_input("");
        assert!(!state.is_applied());
        assert!(!state.shows_invalid_hint());
        assert_eq!(quote(79.0, 112.0, state.is_applied()).display_price, 79.0);
    }

    #[test]
    fn partial_code_is_not_applied_until_complete() {
        let mut state = DiscountState::default();
        state.on_input("JOBWIN");
        assert!(state.shows_invalid_hint());
        state.on_input("JOBWIN1");
        assert!(!state.is_applied());
        state.on_input("JOBWIN10");
        assert!(state.is_applied());
    }

    #[test]
    fn remove_clears_code_and_discount() {
        let mut state = DiscountState::default();
        state.on_input("jobwin10");
        state.remove();
        assert_eq!(state, DiscountState::default());
        assert!(!state.can_apply());
    }

    #[test]
    fn discounted_price_rounds_to_cents() {
        assert_eq!(quote(19.99, 29.99, true).display_price, 17.99);
        assert_eq!(quote(0.0, 0.0, true).savings_percent, 0);
    }
}
