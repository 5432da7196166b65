use std::cell::RefCell;
use std::rc::Rc;

use log::{LevelFilter, debug, error, info, warn};
use pwa_common::{NotificationPayload, PageMessage, logger};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    Document, Event, HtmlButtonElement, HtmlElement, ServiceWorker, ServiceWorkerRegistration,
    Window,
};

pub mod banner;
pub mod config;
pub mod error;
pub mod install;
pub mod js;
pub mod push;
pub mod registration;
pub mod state;

use banner::{Banner, BannerSpec};
use config::ShellConfig;
use error::ShellError;
use js::window;
use state::ShellState;

/// Everything the page's event handlers share.
pub struct Shell {
    pub(crate) config: ShellConfig,
    pub(crate) document: Document,
    status: Option<HtmlElement>,
    pub(crate) install_button: Option<HtmlButtonElement>,
    /// Holds the stashed `beforeinstallprompt` event.
    pub(crate) state: ShellState<Event>,
}

impl Shell {
    pub(crate) fn set_status(&self, status: &str, message: &str) {
        set_status(&self.document, self.status.as_ref(), status, message);
    }
}

fn set_status(document: &Document, status_text: Option<&HtmlElement>, status: &str, message: &str) {
    if let Some(el) = document.document_element() {
        let _ = el.set_attribute("data-shell-status", status);
    }
    if let Some(status_text) = status_text {
        status_text.set_text_content(Some(message));
    }
}

fn set_connectivity(shell: &Shell, online: bool) {
    if let Some(el) = shell.document.document_element() {
        let _ = el.set_attribute("data-connectivity", if online { "online" } else { "offline" });
    }
    if online {
        shell.set_status("online", "Back online");
    } else {
        shell.set_status("offline", "You are offline; cached pages are still available");
    }
}

fn online() -> bool {
    window().map(|win| win.navigator().on_line()).unwrap_or(true)
}

fn watch_connectivity(shell: &Rc<RefCell<Shell>>, win: &Window) -> Result<(), ShellError> {
    if !win.navigator().on_line() {
        set_connectivity(&shell.borrow(), false);
    }

    for (event_name, online) in [("online", true), ("offline", false)] {
        let shell_cb = Rc::clone(shell);
        let handler = Closure::wrap(Box::new(move |_event: Event| {
            debug!("{event_name}");
            set_connectivity(&shell_cb.borrow(), online);
        }) as Box<dyn FnMut(_)>);
        win.add_event_listener_with_callback(event_name, handler.as_ref().unchecked_ref())
            .map_err(ShellError::from_js_value)?;
        handler.forget();
    }

    Ok(())
}

/// Offers the waiting worker to the user, and mirrors the offer as a system
/// notification when the user already allowed them.
fn announce_update(shell: &Rc<RefCell<Shell>>, registration: &ServiceWorkerRegistration, waiting: ServiceWorker) {
    info!("update ready: {}", waiting.script_url());
    let document = shell.borrow().document.clone();

    let shown = Banner::show(&document, &BannerSpec::UPDATE, move || {
        if let Err(err) = registration::post(&waiting, &PageMessage::SkipWaiting) {
            warn!("activating update: {err}");
        }
    });
    if let Err(err) = shown {
        warn!("update banner: {err}");
    }

    if push::permission().as_deref() != Some(push::GRANTED) {
        return;
    }
    if let Some(active) = registration.active() {
        let message = PageMessage::SendUpdateNotification {
            data: NotificationPayload::update_available(),
        };
        if let Err(err) = registration::post(&active, &message) {
            warn!("update notification: {err}");
        }
    }
}

/// Status attribute and text once registration has settled.
fn registration_status(outcome: Result<(), &ShellError>) -> (&'static str, String) {
    match outcome {
        Ok(()) => ("ready", "Ready to work offline".to_string()),
        Err(ShellError::Disabled) => ("online-only", "Offline support disabled (nosw=1)".to_string()),
        Err(ShellError::Unsupported(_)) => (
            "online-only",
            "Offline support is not available in this browser".to_string(),
        ),
        Err(err) => ("error", format!("Service worker registration failed: {err}")),
    }
}

fn on_registered(shell: &Rc<RefCell<Shell>>, registration: ServiceWorkerRegistration) -> Result<(), ShellError> {
    let interval = shell.borrow().config.update_interval_ms;

    let shell_update = Rc::clone(shell);
    let registration_update = registration.clone();
    registration::watch_updates(&registration, move |waiting| {
        announce_update(&shell_update, &registration_update, waiting);
    })?;
    registration::schedule_update_checks(&registration, interval)?;
    push::offer(shell, registration)?;

    Ok(())
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    logger::init("page", LevelFilter::Info);

    if let Err(err) = start_impl() {
        error!("fatal: {err}");
        if let Some(doc) = web_sys::window().and_then(|win| win.document()) {
            let status_text = doc
                .get_element_by_id("status")
                .and_then(|el| el.dyn_into::<HtmlElement>().ok());
            set_status(&doc, status_text.as_ref(), "error", &format!("fatal: {err}"));
        }
    }
}

fn start_impl() -> Result<(), ShellError> {
    let win = window()?;
    let document = win.document().ok_or(ShellError::Missing("document"))?;

    let status = document
        .get_element_by_id("status")
        .and_then(|el| el.dyn_into::<HtmlElement>().ok());
    let install_button = document
        .get_element_by_id("install-button")
        .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok());

    let shell = Rc::new(RefCell::new(Shell {
        config: ShellConfig::default(),
        document,
        status,
        install_button,
        state: ShellState::new(install::is_standalone(&win)),
    }));

    watch_connectivity(&shell, &win)?;
    install::wire(&shell, &win)?;

    match registration::service_worker_container() {
        Ok(container) => registration::listen_for_reload(&container)?,
        Err(err) => info!("{err}"),
    }

    let shell_sw = Rc::clone(&shell);
    spawn_local(async move {
        let config = shell_sw.borrow().config.clone();
        let outcome = match registration::register(&config).await {
            Ok(registration) => {
                if let Err(err) = on_registered(&shell_sw, registration) {
                    warn!("after registration: {err}");
                }
                Ok(())
            }
            Err(err @ (ShellError::Disabled | ShellError::Unsupported(_))) => {
                info!("service worker skipped: {err}");
                Err(err)
            }
            Err(err) => {
                error!("registering {}: {err}", config.sw_url);
                Err(err)
            }
        };

        let (status, message) = registration_status(outcome.as_ref().map(|_| ()));
        let shell = shell_sw.borrow();
        shell.set_status(status, &message);
        if outcome.is_ok() && !online() {
            set_connectivity(&shell, false);
        }
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_outcome_is_reported() {
        assert_eq!(
            registration_status(Ok(())),
            ("ready", "Ready to work offline".to_string())
        );
        assert_eq!(registration_status(Err(&ShellError::Disabled)).0, "online-only");
        assert_eq!(
            registration_status(Err(&ShellError::Unsupported("service worker"))).0,
            "online-only"
        );

        let (status, message) = registration_status(Err(&ShellError::Js("SecurityError".to_string())));
        assert_eq!(status, "error");
        assert_eq!(message, "Service worker registration failed: SecurityError");
    }
}
