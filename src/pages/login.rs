//! Login page with a sign-in redirect link.

use leptos::prelude::*;

/// Login page — clicking the button navigates to the sign-in endpoint.
#[component]
pub fn LoginPage() -> impl IntoView {
    view! {
        <div class="login-page">
            <h1>"Orchard Market"</h1>
            <p>"Sign in to shop and chat with our support team"</p>
            <a href="/auth/login" class="login-button">
                "Sign in"
            </a>
        </div>
    }
}
