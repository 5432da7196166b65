use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Event, HtmlButtonElement, Window};

use crate::Shell;
use crate::error::ShellError;
use crate::js::{await_value, js_function, js_value_to_string, property};

pub fn is_standalone(win: &Window) -> bool {
    win.match_media("(display-mode: standalone)")
        .ok()
        .flatten()
        .map(|query| query.matches())
        .unwrap_or(false)
}

fn set_button_visible(button: Option<&HtmlButtonElement>, visible: bool) {
    let Some(button) = button else {
        return;
    };
    button.set_hidden(!visible);
}

/// Shows the browser's install dialog for a stashed `beforeinstallprompt`
/// event and reports what the user chose.
async fn run_prompt(prompt: Event) -> Result<String, ShellError> {
    let prompt_js: JsValue = prompt.into();
    js_function(&prompt_js, "prompt")?
        .call0(&prompt_js)
        .map_err(ShellError::from_js_value)?;

    let choice = property(&prompt_js, "userChoice").ok_or(ShellError::Missing("userChoice"))?;
    let choice = await_value(choice).await?;
    Ok(property(&choice, "outcome")
        .map(|outcome| js_value_to_string(&outcome))
        .unwrap_or_else(|| "unknown".to_string()))
}

pub fn wire(shell: &Rc<RefCell<Shell>>, win: &Window) -> Result<(), ShellError> {
    let shell_prompt = Rc::clone(shell);
    let on_beforeinstallprompt = Closure::wrap(Box::new(move |event: Event| {
        // Suppress the mini-infobar; the shell offers its own button.
        event.prevent_default();

        let mut shell = shell_prompt.borrow_mut();
        let show = shell.state.defer_prompt(event);
        set_button_visible(shell.install_button.as_ref(), show);
        debug!("install prompt deferred (offered: {show})");
    }) as Box<dyn FnMut(_)>);
    win.add_event_listener_with_callback(
        "beforeinstallprompt",
        on_beforeinstallprompt.as_ref().unchecked_ref(),
    )
    .map_err(ShellError::from_js_value)?;
    on_beforeinstallprompt.forget();

    let shell_installed = Rc::clone(shell);
    let on_appinstalled = Closure::wrap(Box::new(move |_event: Event| {
        let mut shell = shell_installed.borrow_mut();
        shell.state.mark_installed();
        set_button_visible(shell.install_button.as_ref(), false);
        shell.set_status("installed", "App installed");
        info!("app installed");
    }) as Box<dyn FnMut(_)>);
    win.add_event_listener_with_callback("appinstalled", on_appinstalled.as_ref().unchecked_ref())
        .map_err(ShellError::from_js_value)?;
    on_appinstalled.forget();

    let Some(button) = shell.borrow().install_button.clone() else {
        return Ok(());
    };
    set_button_visible(Some(&button), false);

    let shell_click = Rc::clone(shell);
    let on_click = Closure::wrap(Box::new(move |_event: Event| {
        let prompt = {
            let mut shell = shell_click.borrow_mut();
            set_button_visible(shell.install_button.as_ref(), false);
            shell.state.take_prompt()
        };
        let Some(prompt) = prompt else {
            return;
        };

        spawn_local(async move {
            match run_prompt(prompt).await {
                Ok(outcome) => info!("install prompt: {outcome}"),
                Err(err) => warn!("install prompt: {err}"),
            }
        });
    }) as Box<dyn FnMut(_)>);
    button
        .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
        .map_err(ShellError::from_js_value)?;
    on_click.forget();

    Ok(())
}
