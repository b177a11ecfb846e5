use std::rc::Rc;

use log::info;
use yew::prelude::*;
use yew_hooks::use_title;
use yew_router::prelude::*;

use crate::config::{DISCOUNT_CODE, SCROLL_TRIGGER_PERCENT};
use crate::data::{Testimonial, FEATURES, PAIN_POINTS, TESTIMONIALS};
use crate::landing::countdown::CountdownTimer;
use crate::landing::order_bump_popup::ScrollOrderBumpPopup;
use crate::landing::pricing::PricingCard;
use crate::landing::scroll_trigger::{ScrollTrigger, ScrollWatcher};
use crate::landing::slider::AutoSlider;
use crate::pages::faq::FaqSection;
use crate::runtime::clock::{Clock, LocalClock};
use crate::runtime::scheduler::BrowserScheduler;
use crate::runtime::storage::{browser_store, OrderBumpFlags};
use crate::Route;

/// The A/B copies of the page. Only the copy differs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LandingVariant {
    Original,
    Bold,
}

impl LandingVariant {
    fn headline(&self) -> &'static str {
        match self {
            LandingVariant::Original => "Walk Into Your Next Interview Knowing Exactly What To Say",
            LandingVariant::Bold => "Stop Losing Offers You Were Qualified For",
        }
    }

    fn subheadline(&self) -> &'static str {
        match self {
            LandingVariant::Original => {
                "The Interview Success Blueprint gives you the answers, scripts and review system that turn interviews into offers."
            }
            LandingVariant::Bold => {
                "Scripts, answer banks and a review system built from hundreds of real interviews. One payment, lifetime access."
            }
        }
    }

    fn cta_text(&self) -> &'static str {
        match self {
            LandingVariant::Original => "Get The Blueprint",
            LandingVariant::Bold => "Steal The Job Now",
        }
    }

    fn page_title(&self) -> &'static str {
        match self {
            LandingVariant::Original => "Interview Success Blueprint",
            LandingVariant::Bold => "Interview Success Blueprint | Get The Job",
        }
    }

    fn badge_text(&self) -> &'static str {
        match self {
            LandingVariant::Original => "🔥 Best Value",
            LandingVariant::Bold => "⚡ Limited Price",
        }
    }
}

fn scroll_to(id: &str) {
    if let Some(element) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
    {
        element.scroll_into_view();
    }
}

#[derive(Properties, PartialEq)]
struct TestimonialCardProps {
    testimonial: Testimonial,
}

#[function_component(TestimonialCard)]
fn testimonial_card(props: &TestimonialCardProps) -> Html {
    let t = &props.testimonial;
    html! {
        <div class="testimonial-card">
            <div class="testimonial-result">{"🏆 "}{t.result}</div>
            <div class="testimonial-stars">{"★★★★★"}</div>
            <p class="testimonial-quote">{t.quote}</p>
            <p class="testimonial-name">{t.name}</p>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct MarqueeProps {
    items: Vec<Testimonial>,
    #[prop_or_default]
    reverse: bool,
}

#[function_component(Marquee)]
fn marquee(props: &MarqueeProps) -> Html {
    html! {
        <div class="marquee">
            <div class={classes!("marquee-track", props.reverse.then(|| "reverse"))}>
                { for props.items.iter().chain(props.items.iter()).map(|t| html! {
                    <TestimonialCard testimonial={t.clone()} />
                }) }
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct LandingProps {
    pub variant: LandingVariant,
}

#[function_component(Landing)]
pub fn landing(props: &LandingProps) -> Html {
    let variant = props.variant;
    use_title(variant.page_title().to_string());
    let flags = use_state(|| OrderBumpFlags::new(browser_store()));
    let trigger = {
        let flags = (*flags).clone();
        use_mut_ref(move || ScrollTrigger::new(flags, SCROLL_TRIGGER_PERCENT))
    };
    let popup_open = use_state(|| false);

    {
        let trigger = trigger.clone();
        let popup_open = popup_open.clone();
        use_effect_with_deps(
            move |_| {
                let watcher = ScrollWatcher::attach(
                    Rc::new(BrowserScheduler),
                    Rc::new(move |percent| {
                        if trigger.borrow_mut().observe(percent) {
                            popup_open.set(true);
                        }
                    }),
                );
                move || drop(watcher)
            },
            (),
        );
    }

    let on_close = {
        let trigger = trigger.clone();
        let popup_open = popup_open.clone();
        Callback::from(move |_| {
            trigger.borrow_mut().close(LocalClock.timestamp_millis());
            popup_open.set(false);
        })
    };

    let on_email_submitted = Callback::from(move |_email: String| {
        info!("Order bump email captured on {:?} variant", variant);
    });

    let to_pricing = Callback::from(|_: MouseEvent| scroll_to("pricing"));
    let to_solution = Callback::from(|_: MouseEvent| scroll_to("solution"));

    let features: Vec<String> = FEATURES.iter().map(|f| f.to_string()).collect();
    let (first_row, second_row) = TESTIMONIALS.split_at(TESTIMONIALS.len() / 2);

    html! {
        <div class="landing-page">
            <div class="promo-bar">
                <span>{"🎉 Launch price ends in "}</span>
                <CountdownTimer compact=true />
                <button class="promo-bar-cta" onclick={to_pricing.clone()}>{"Claim Offer"}</button>
            </div>

            <header class="hero">
                <div class="hero-content">
                    <span class="hero-eyebrow">{"Interview Success Blueprint"}</span>
                    <h1>{variant.headline()}</h1>
                    <p class="hero-subtitle">{variant.subheadline()}</p>
                    <div class="hero-cta-group">
                        <button class="hero-cta" onclick={to_pricing}>{variant.cta_text()}</button>
                        <button class="hero-secondary" onclick={to_solution}>{"See What's Inside"}</button>
                    </div>
                </div>
            </header>

            <section id="pain" class="pain-section">
                <h2>{"Sound familiar?"}</h2>
                <AutoSlider items={PAIN_POINTS.to_vec()} />
            </section>

            <section id="solution" class="solution-section">
                <h2>{"Everything you need to turn interviews into offers"}</h2>
                <ul class="solution-list">
                    { for FEATURES.iter().map(|f| html! { <li>{*f}</li> }) }
                </ul>
            </section>

            <section id="testimonials" class="testimonials-section">
                <h2>{"Results from people who used it"}</h2>
                <Marquee items={first_row.to_vec()} />
                <Marquee items={second_row.to_vec()} reverse=true />
            </section>

            <section id="pricing" class="pricing-section">
                <PricingCard
                    features={features}
                    button_text={variant.cta_text().to_string()}
                    badge_text={variant.badge_text().to_string()}
                />
            </section>

            <FaqSection />

            <footer class="landing-footer">
                <Link<Route> to={Route::Home} classes="footer-link">{"Interview Success Blueprint"}</Link<Route>>
            </footer>

            <ScrollOrderBumpPopup
                is_open={*popup_open}
                on_close={on_close}
                on_email_submitted={on_email_submitted}
                discount_code={DISCOUNT_CODE.to_string()}
                flags={(*flags).clone()}
            />
        </div>
    }
}

#[function_component(NotFound)]
pub fn not_found() -> Html {
    html! {
        <div class="not-found">
            <h1>{"Page not found"}</h1>
            <Link<Route> to={Route::Home} classes="forward-link">{"Back to the Blueprint"}</Link<Route>>
        </div>
    }
}
