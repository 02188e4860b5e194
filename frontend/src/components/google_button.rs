use gloo_net::http::Request;
use shared::AuthUrlResponse;
use web_sys::window;
use yew::prelude::*;

use crate::DEFAULT_API_BASE;

#[derive(Properties, PartialEq)]
pub struct GoogleButtonProps {
    /// Base URL of the auth backend.
    #[prop_or(AttrValue::Static(DEFAULT_API_BASE))]
    pub api_base: AttrValue,
}

/// "Sign in with Google" button: asks the backend for an authorization URL
/// and sends the whole page there.
#[function_component(GoogleButton)]
pub fn google_button(props: &GoogleButtonProps) -> Html {
    let signing_in = use_state(|| false);

    let on_click = {
        let signing_in = signing_in.clone();
        let api_base = props.api_base.clone();
        Callback::from(move |_: MouseEvent| {
            let signing_in = signing_in.clone();
            let api_base = api_base.clone();
            signing_in.set(true);
            wasm_bindgen_futures::spawn_local(async move {
                match Request::get(&format!("{api_base}/auth")).send().await {
                    Ok(resp) if resp.ok() => match resp.json::<AuthUrlResponse>().await {
                        Ok(auth) => {
                            // Navigating away unmounts the component.
                            if let Some(w) = window() {
                                let _ = w.location().set_href(&auth.url);
                            }
                        }
                        Err(e) => {
                            log::error!("auth response was not valid JSON: {e}");
                            signing_in.set(false);
                        }
                    },
                    Ok(resp) => {
                        log::error!("auth request failed with status {}", resp.status());
                        signing_in.set(false);
                    }
                    Err(e) => {
                        log::error!("auth request failed: {e}");
                        signing_in.set(false);
                    }
                }
            });
        })
    };

    html! {
        <button class="login-button" onclick={on_click} disabled={*signing_in}>
            { if *signing_in { "Redirecting..." } else { "Sign in with Google" } }
        </button>
    }
}
