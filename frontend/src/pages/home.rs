use yew::prelude::*;

use crate::components::google_button::GoogleButton;

#[function_component(Home)]
pub fn home() -> Html {
    html! {
        <div class="login-container">
            <div class="login-card">
                <h1 class="login-title">{ "Google Web Login" }</h1>
                <p class="login-subtitle">{ "OpenID Connect demo" }</p>
                <p>{ "Sign in to continue" }</p>
                <GoogleButton />
            </div>
        </div>
    }
}
