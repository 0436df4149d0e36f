//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::net::types::Envelope;
use crate::pages::{home::HomePage, login::LoginPage};
use crate::state::{auth::AuthState, chat::ChatState};

/// Handle for pushing events onto the gateway's outgoing queue.
///
/// Empty until the gateway task is spawned (and always on the server), in
/// which case sends report `false` and are dropped.
#[derive(Clone, Default)]
pub struct GatewaySender {
    #[cfg(feature = "hydrate")]
    tx: Option<futures::channel::mpsc::UnboundedSender<String>>,
}

impl GatewaySender {
    #[cfg(feature = "hydrate")]
    pub fn new(tx: futures::channel::mpsc::UnboundedSender<String>) -> Self {
        Self { tx: Some(tx) }
    }

    /// Send an event to the gateway. Returns `false` when no connection
    /// channel exists.
    pub fn send(&self, event: &Envelope) -> bool {
        #[cfg(feature = "hydrate")]
        {
            match &self.tx {
                Some(tx) => crate::net::gateway::send_event(tx, event),
                None => false,
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = event;
            false
        }
    }
}

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Provides all shared state contexts, spawns the gateway task for the
/// lifetime of the browsing session, and sets up client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let auth = RwSignal::new(AuthState::default());
    let chat = RwSignal::new(ChatState::default());
    let sender = RwSignal::new(GatewaySender::default());

    provide_context(auth);
    provide_context(chat);
    provide_context(sender);

    // One gateway connection for the whole session, panel open or not.
    #[cfg(feature = "hydrate")]
    {
        let tx = crate::net::gateway::spawn_gateway(chat);
        sender.set(GatewaySender::new(tx));

        // Resolve the signed-in customer once at startup.
        leptos::task::spawn_local(async move {
            let user = crate::net::api::fetch_current_user().await;
            auth.update(|a| {
                a.user = user;
                a.loading = false;
            });
        });
    }

    view! {
        <Stylesheet id="leptos" href="/pkg/orchard.css"/>
        <Title text="Orchard Market"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("login") view=LoginPage/>
                <Route path=StaticSegment("") view=HomePage/>
            </Routes>
        </Router>
    }
}
