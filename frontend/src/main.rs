use yew::prelude::*;
use yew_router::prelude::*;
use log::{info, Level};

use crate::runtime::viewport::WindowListener;

mod config;
mod data;
mod runtime {
    pub mod clock;
    pub mod scheduler;
    pub mod storage;
    pub mod viewport;
}
mod landing {
    pub mod countdown;
    pub mod discount;
    pub mod email_capture;
    pub mod order_bump_popup;
    pub mod pricing;
    pub mod scroll_trigger;
    pub mod slider;
}
mod pages {
    pub mod faq;
    pub mod landing;
}

use pages::landing::{Landing, LandingVariant, NotFound};

const NAV_SCROLLED_OFFSET: f64 = 80.0;

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/v2")]
    VariantB,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => {
            info!("Rendering Home page");
            html! { <Landing variant={LandingVariant::Original} /> }
        },
        Route::VariantB => {
            info!("Rendering VariantB page");
            html! { <Landing variant={LandingVariant::Bold} /> }
        },
        Route::NotFound => {
            info!("Rendering NotFound page");
            html! { <NotFound /> }
        },
    }
}

#[function_component(Nav)]
pub fn nav() -> Html {
    let is_scrolled = use_state(|| false);

    {
        let is_scrolled = is_scrolled.clone();
        use_effect_with_deps(move |_| {
            let listener = WindowListener::new("scroll", move || {
                let scroll_y = web_sys::window()
                    .and_then(|w| w.scroll_y().ok())
                    .unwrap_or(0.0);
                is_scrolled.set(scroll_y > NAV_SCROLLED_OFFSET);
            });
            move || drop(listener)
        }, ());
    }

    let to_pricing = Callback::from(|e: MouseEvent| {
        e.prevent_default();
        if let Some(pricing) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("pricing"))
        {
            pricing.scroll_into_view();
        }
    });

    html! {
        <nav class={classes!("top-nav", (*is_scrolled).then(|| "scrolled"))}>
            <div class="nav-content">
                <Link<Route> to={Route::Home} classes="nav-logo">
                    {"Interview Success Blueprint"}
                </Link<Route>>
                <a href="#pricing" class="nav-cta" onclick={to_pricing}>{"Get Access"}</a>
            </div>
        </nav>
    }
}

#[function_component(App)]
pub fn app() -> Html {
    html! {
        <BrowserRouter>
            <Nav />
            <Switch<Route> render={switch} />
        </BrowserRouter>
    }
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(Level::Info).expect("error initializing log");

    info!("Starting application");
    yew::Renderer::<App>::new().render();
}
