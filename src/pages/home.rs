//! Storefront landing page hosting the support chat widget.

use leptos::prelude::*;

use crate::components::chat_widget::ChatWidget;

/// Landing page — storefront hero plus the floating support chat widget.
/// Catalog, cart, and checkout live behind their own REST-driven pages and
/// are out of scope here.
#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="home-page">
            <header class="home-page__header">
                <span class="home-page__brand">"Orchard Market"</span>
                <nav class="home-page__nav">
                    <a href="/">"Shop"</a>
                    <a href="/baskets">"Fruit baskets"</a>
                    <a href="/news">"News"</a>
                </nav>
            </header>

            <main class="home-page__hero">
                <h1>"Fresh from the orchard"</h1>
                <p>"Seasonal fruit, baskets, and pantry staples from local growers."</p>
            </main>

            <ChatWidget/>
        </div>
    }
}
