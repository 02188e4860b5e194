use gloo_net::http::Request;
use shared::{ApiError, IdTokenClaims};
use web_sys::{window, UrlSearchParams};
use yew::prelude::*;

use crate::DEFAULT_API_BASE;

#[derive(Properties, PartialEq)]
pub struct CallbackPageProps {
    /// Base URL of the auth backend.
    #[prop_or(AttrValue::Static(DEFAULT_API_BASE))]
    pub api_base: AttrValue,
}

/// Landing page for Google's redirect. Sends the authorization code to the
/// backend for verification, then shows the ID token claims or the reason
/// verification failed.
#[function_component(CallbackPage)]
pub fn callback_page(props: &CallbackPageProps) -> Html {
    let claims = use_state(|| None::<IdTokenClaims>);
    let error = use_state(|| None::<String>);

    let search = window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default();

    {
        let claims = claims.clone();
        let error = error.clone();
        let api_base = props.api_base.clone();

        // Keyed on the raw query string: landing here with a new ?code
        // re-runs the verification.
        use_effect_with(search, move |search| {
            // Each run starts from the verifying placeholder, not the
            // previous run's outcome.
            claims.set(None);
            error.set(None);

            let code = UrlSearchParams::new_with_str(search)
                .ok()
                .and_then(|params| params.get("code"));

            match code {
                None => error.set(Some(
                    "Missing \"code\" query parameter. This page only works as a Google redirect target.".to_string(),
                )),
                Some(code) => {
                    wasm_bindgen_futures::spawn_local(async move {
                        match Request::get(&format!("{api_base}/verify/id_token?code={code}"))
                            .send()
                            .await
                        {
                            Ok(resp) if resp.ok() => match resp.json::<IdTokenClaims>().await {
                                Ok(verified) => {
                                    log::info!("verified id token claims: {verified:?}");
                                    claims.set(Some(verified));
                                }
                                Err(e) => {
                                    error.set(Some(format!("Claims response was not valid JSON: {e}")));
                                }
                            },
                            Ok(resp) => {
                                let status = resp.status();
                                let message = match resp.json::<ApiError>().await {
                                    Ok(api) => api.error.message,
                                    Err(_) => format!("Verification failed with status {status}"),
                                };
                                error.set(Some(message));
                            }
                            Err(e) => {
                                error.set(Some(format!("Verification request failed: {e}")));
                            }
                        }
                    });
                }
            }
            || ()
        });
    }

    let body = if let Some(err) = (*error).clone() {
        html! { <p class="error">{ err }</p> }
    } else if let Some(c) = (*claims).clone() {
        html! {
            <>
                <p>{ format!("Signed in as {}", c.email) }</p>
                <ul class="claims-list">
                    <li>{ format!("sub: {}", c.sub) }</li>
                    <li>{ format!("iss: {}", c.iss) }</li>
                    <li>{ format!("aud: {}", c.aud) }</li>
                    <li>{ format!("email_verified: {}", c.email_verified) }</li>
                    <li>{ format!("expires (unix): {}", c.exp) }</li>
                </ul>
            </>
        }
    } else {
        html! { <p>{ "Verifying authorization code..." }</p> }
    };

    html! {
        <div class="login-container">
            <div class="login-card">
                <h1 class="login-title">{ "Signing you in" }</h1>
                { body }
            </div>
        </div>
    }
}
