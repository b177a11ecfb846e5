use std::rc::Rc;

use log::debug;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::landing::email_capture::{deliver, EmailCaptureFlow, HttpDiscountClient, SubmissionStatus};
use crate::runtime::storage::OrderBumpFlags;

fn lock_body_scroll(locked: bool) {
    let body = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.body());
    if let Some(body) = body {
        let value = if locked { "hidden" } else { "unset" };
        let _ = body.style().set_property("overflow", value);
    }
}

#[derive(Properties, PartialEq)]
pub struct ScrollOrderBumpPopupProps {
    pub is_open: bool,
    pub on_close: Callback<()>,
    pub on_email_submitted: Callback<String>,
    pub discount_code: String,
    pub flags: OrderBumpFlags,
}

pub enum PopupMsg {
    SetEmail(String),
    Submit,
    Delivered(Result<(), String>),
    Close,
}

pub struct ScrollOrderBumpPopup {
    flow: EmailCaptureFlow,
    client: Rc<HttpDiscountClient>,
}

impl Component for ScrollOrderBumpPopup {
    type Message = PopupMsg;
    type Properties = ScrollOrderBumpPopupProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        let mut flow = EmailCaptureFlow::new(props.discount_code.clone(), props.flags.clone());
        if props.is_open {
            flow.on_open();
            lock_body_scroll(true);
        }
        Self {
            flow,
            client: Rc::new(HttpDiscountClient::default()),
        }
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        let is_open = ctx.props().is_open;
        if is_open != old_props.is_open {
            if is_open {
                self.flow.on_open();
            }
            lock_body_scroll(is_open);
        }
        true
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            PopupMsg::SetEmail(email) => {
                self.flow.set_email(email);
                true
            }
            PopupMsg::Submit => {
                match self.flow.begin_submit() {
                    Ok(request) => {
                        let client = Rc::clone(&self.client);
                        ctx.link().send_future(async move {
                            PopupMsg::Delivered(deliver(client.as_ref(), &request).await)
                        });
                    }
                    Err(e) => debug!("Discount code not requested: {}", e),
                }
                true
            }
            PopupMsg::Delivered(outcome) => {
                let email = self.flow.email().trim().to_string();
                let was_sending = self.flow.is_sending();
                let _ = self.flow.finish(outcome);
                if was_sending && self.flow.status() == SubmissionStatus::Sent {
                    ctx.props().on_email_submitted.emit(email);
                }
                true
            }
            PopupMsg::Close => {
                ctx.props().on_close.emit(());
                false
            }
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        lock_body_scroll(false);
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        if !ctx.props().is_open {
            return html! {};
        }

        let close = ctx.link().callback(|_: MouseEvent| PopupMsg::Close);
        let keep_open = Callback::from(|e: MouseEvent| e.stop_propagation());

        html! {
            <div class="order-bump-backdrop" onclick={close.clone()}>
                <div class="order-bump-modal" onclick={keep_open}>
                    <button class="order-bump-close" onclick={close.clone()} aria-label="Close popup">{"✕"}</button>
                    if self.flow.status() == SubmissionStatus::Sent {
                        { self.success_view(close) }
                    } else {
                        { self.form_view(ctx) }
                    }
                </div>
            </div>
        }
    }
}

impl ScrollOrderBumpPopup {
    fn success_view(&self, close: Callback<MouseEvent>) -> Html {
        html! {
            <div class="order-bump-success">
                <div class="order-bump-success-icon">{"🛡️"}</div>
                <h3>{"Check Your Email!"}</h3>
                <p>{"We've sent your 10% discount code to your email."}</p>
                <div class="order-bump-code-box">
                    <span class="order-bump-code-label">{"Your Discount Code"}</span>
                    <span class="order-bump-code-active">{"Active"}</span>
                    <code>{self.flow.code()}</code>
                    <p>{"Use this code at checkout to save 10%"}</p>
                </div>
                <button class="order-bump-continue" onclick={close}>{"Continue Shopping"}</button>
            </div>
        }
    }

    fn form_view(&self, ctx: &Context<Self>) -> Html {
        let sending = self.flow.is_sending();
        let on_submit = ctx.link().callback(|e: SubmitEvent| {
            e.prevent_default();
            PopupMsg::Submit
        });
        let on_input = ctx.link().callback(|e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            PopupMsg::SetEmail(input.value())
        });

        html! {
            <div class="order-bump-form">
                <div class="order-bump-header">
                    <span class="order-bump-tag">{"🎁 Special Offer"}</span>
                    <h3>{"Get 10% Off Your Purchase!"}</h3>
                    <p>{"Enter your email to unlock your exclusive discount code. We'll send it instantly!"}</p>
                </div>
                <div class="order-bump-promises">
                    <span>{"No spam, ever"}</span>
                    <span>{"Instant delivery"}</span>
                </div>
                <form onsubmit={on_submit}>
                    <label>{"Your Email Address"}</label>
                    <input
                        type="email"
                        required=true
                        value={self.flow.email().to_string()}
                        oninput={on_input}
                        placeholder="you@example.com"
                        disabled={sending}
                    />
                    if let Some(error) = self.flow.error() {
                        <p class="order-bump-error">{error}</p>
                    }
                    <button type="submit" disabled={sending}>
                        { if sending { "Sending…" } else { "Get My 10% Discount Code" } }
                    </button>
                    <p class="order-bump-consent">{"By submitting, you agree to receive the discount code via email."}</p>
                </form>
            </div>
        }
    }
}
