use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, HtmlElement};

use crate::error::ShellError;
use crate::js::window;

/// Text and lifetime of one dismissible banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BannerSpec {
    pub id: &'static str,
    pub message: &'static str,
    pub accept_label: &'static str,
    pub dismiss_label: &'static str,
    pub timeout_ms: i32,
}

impl BannerSpec {
    pub const UPDATE: BannerSpec = BannerSpec {
        id: "update-banner",
        message: "A new version is available.",
        accept_label: "Update now",
        dismiss_label: "Later",
        timeout_ms: 30_000,
    };

    pub const NOTIFICATIONS: BannerSpec = BannerSpec {
        id: "notification-banner",
        message: "Get notified when something new arrives?",
        accept_label: "Enable",
        dismiss_label: "No thanks",
        timeout_ms: 15_000,
    };
}

pub const ACCEPT_CLASS: &str = "pwa-banner__accept";
pub const DISMISS_CLASS: &str = "pwa-banner__dismiss";

/// A banner attached to `<body>`. It removes itself on accept, dismiss or
/// timeout.
pub struct Banner {
    root: HtmlElement,
}

impl Banner {
    /// Renders `spec`, replacing a banner with the same id if one is showing.
    /// `on_accept` runs at most once.
    pub fn show<F>(document: &Document, spec: &BannerSpec, on_accept: F) -> Result<Banner, ShellError>
    where
        F: FnOnce() + 'static,
    {
        if let Some(previous) = document.get_element_by_id(spec.id) {
            previous.remove();
        }

        let body = document.body().ok_or(ShellError::Missing("document body"))?;
        let root = create(document, "div")?.dyn_into::<HtmlElement>().map_err(|_| ShellError::Missing("div"))?;
        root.set_id(spec.id);
        root.set_class_name("pwa-banner");
        root.set_attribute("role", "status").map_err(ShellError::from_js_value)?;

        let message = create(document, "span")?;
        message.set_class_name("pwa-banner__message");
        message.set_text_content(Some(spec.message));

        let accept = create(document, "button")?;
        accept.set_class_name(ACCEPT_CLASS);
        accept.set_text_content(Some(spec.accept_label));

        let dismiss = create(document, "button")?;
        dismiss.set_class_name(DISMISS_CLASS);
        dismiss.set_text_content(Some(spec.dismiss_label));

        for child in [&message, &accept, &dismiss] {
            root.append_child(child).map_err(ShellError::from_js_value)?;
        }

        let on_accept: Rc<RefCell<Option<Box<dyn FnOnce()>>>> =
            Rc::new(RefCell::new(Some(Box::new(on_accept))));
        let root_accept = root.clone();
        let accept_cb = Closure::wrap(Box::new(move |_event: Event| {
            root_accept.remove();
            let callback = on_accept.borrow_mut().take();
            if let Some(callback) = callback {
                callback();
            }
        }) as Box<dyn FnMut(_)>);
        accept
            .add_event_listener_with_callback("click", accept_cb.as_ref().unchecked_ref())
            .map_err(ShellError::from_js_value)?;
        accept_cb.forget();

        let root_dismiss = root.clone();
        let dismiss_cb = Closure::wrap(Box::new(move |_event: Event| {
            root_dismiss.remove();
        }) as Box<dyn FnMut(_)>);
        dismiss
            .add_event_listener_with_callback("click", dismiss_cb.as_ref().unchecked_ref())
            .map_err(ShellError::from_js_value)?;
        dismiss_cb.forget();

        body.append_child(&root).map_err(ShellError::from_js_value)?;

        let root_expire = root.clone();
        let expire = Closure::once_into_js(move || root_expire.remove());
        window()?
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                expire.unchecked_ref(),
                spec.timeout_ms,
            )
            .map_err(ShellError::from_js_value)?;

        Ok(Banner { root })
    }

    pub fn is_open(&self) -> bool {
        self.root.is_connected()
    }

    pub fn element(&self) -> &HtmlElement {
        &self.root
    }

    pub fn close(&self) {
        self.root.remove();
    }
}

fn create(document: &Document, tag: &str) -> Result<Element, ShellError> {
    document.create_element(tag).map_err(ShellError::from_js_value)
}

