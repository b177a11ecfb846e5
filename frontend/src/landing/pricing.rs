use log::info;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::config::{self, DISCOUNT_CODE, DISCOUNT_PERCENT};
use crate::landing::countdown::CountdownTimer;
use crate::landing::discount::{checkout_url, quote, DiscountState};

#[derive(Properties, PartialEq)]
pub struct PricingCardProps {
    #[prop_or("Steal The Job".to_string())]
    pub title: String,
    #[prop_or("One-time investment for career success".to_string())]
    pub description: String,
    #[prop_or(config::BASE_PRICE)]
    pub price: f64,
    #[prop_or(config::ORIGINAL_PRICE)]
    pub original_price: f64,
    #[prop_or(config::CURRENCY.to_string())]
    pub currency: String,
    #[prop_or_default]
    pub features: Vec<String>,
    #[prop_or("Get Instant Access".to_string())]
    pub button_text: String,
    #[prop_or(config::CHECKOUT_URL.to_string())]
    pub href: String,
    #[prop_or("🔥 Best Value".to_string())]
    pub badge_text: String,
}

#[function_component(PricingCard)]
pub fn pricing_card(props: &PricingCardProps) -> Html {
    let discount = use_state(DiscountState::default);

    let on_input = {
        let discount = discount.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*discount).clone();
            next.on_input(&input.value());
            discount.set(next);
        })
    };

    let on_apply = {
        let discount = discount.clone();
        Callback::from(move |_: ()| {
            let mut next = (*discount).clone();
            if next.apply() {
                info!("discount_applied code={}", DISCOUNT_CODE);
            }
            discount.set(next);
        })
    };

    let on_keydown = {
        let on_apply = on_apply.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" {
                on_apply.emit(());
            }
        })
    };

    let on_remove = {
        let discount = discount.clone();
        Callback::from(move |_: MouseEvent| {
            let mut next = (*discount).clone();
            next.remove();
            discount.set(next);
        })
    };

    let applied = discount.is_applied();
    let price = quote(props.price, props.original_price, applied);
    let href = checkout_url(&props.href, applied);

    let on_checkout = Callback::from(move |_: MouseEvent| {
        info!("checkout_clicked promo_applied={} price={:.2}", applied, price.display_price);
    });

    html! {
        <div class="pricing-card">
            <div class="pricing-badge">{&props.badge_text}</div>
            <div class="pricing-lifetime">
                <span>{"⭐"}</span>
                <span>{"LIFETIME"}</span>
                <span>{"ACCESS"}</span>
            </div>

            <div class="pricing-title">
                <h2>{&props.title}</h2>
                <p>{&props.description}</p>
            </div>

            <div class="pricing-amounts">
                <span class="pricing-original">{format!("{} {}", props.currency, props.original_price)}</span>
                <span class="pricing-current">{format!("{} {:.2}", props.currency, price.display_price)}</span>
                <span class="pricing-savings">{format!("💸 SAVE {}%", price.savings_percent)}</span>
                if applied {
                    <span class="pricing-applied">{format!("✓ {}% Discount Applied!", DISCOUNT_PERCENT)}</span>
                }
            </div>

            <div class="pricing-discount">
                if !applied {
                    <>
                    <label for="discount-code">{"Have a discount code?"}</label>
                    <div class="pricing-discount-row">
                        <input
                            id="discount-code"
                            type="text"
                            value={discount.input_code().to_string()}
                            oninput={on_input}
                            onkeydown={on_keydown}
                            placeholder={format!("Enter code (e.g., {})", DISCOUNT_CODE)}
                        />
                        <button
                            onclick={on_apply.reform(|_: MouseEvent| ())}
                            disabled={!discount.can_apply()}
                        >
                            {"Apply"}
                        </button>
                    </div>
                    if discount.shows_invalid_hint() {
                        <p class="pricing-discount-error">{"Invalid code. Please try again."}</p>
                    }
                    </>
                } else {
                    <div class="pricing-discount-active">
                        <span>{"✓ Discount code "}<strong>{DISCOUNT_CODE}</strong>{" applied"}</span>
                        <button onclick={on_remove} aria-label="Remove discount">{"✕"}</button>
                    </div>
                }
            </div>

            <div class="pricing-countdown">
                <CountdownTimer />
            </div>

            <ul class="pricing-features">
                { for props.features.iter().map(|feature| html! {
                    <li>
                        <img src="https://img.icons8.com/liquid-glass-color/32/checked.png" alt="checked" loading="lazy" width="32" height="32" />
                        <span>{feature}</span>
                    </li>
                }) }
            </ul>

            <a class="pricing-cta" href={href} target="_blank" rel="noopener noreferrer" onclick={on_checkout}>
                <span>{&props.button_text}</span>
                <span class="pricing-cta-arrow">{"→"}</span>
            </a>
            <p class="pricing-footnote">{"🔒 Secure payment via Stripe • Instant download"}</p>
        </div>
    }
}
