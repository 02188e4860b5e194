use yew::prelude::*;
use yew_router::prelude::*;

mod components;
mod pages;

/// Where the auth backend lives when no prop overrides it.
pub const DEFAULT_API_BASE: &str = "http://localhost:8080";

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/callback")]
    Callback,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => html! { <pages::home::Home /> },
        Route::Callback => html! { <pages::callback::CallbackPage /> },
        Route::NotFound => html! { <pages::home::Home /> },
    }
}

#[function_component(App)]
fn app() -> Html {
    html! {
        <BrowserRouter>
            <div class="container">
                <Switch<Route> render={switch} />
            </div>
        </BrowserRouter>
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<App>::new().render();
}
