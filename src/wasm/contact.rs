//! Contact form wiring
//!
//! Intercepts the form's submit, posts it with `fetch` and keeps the status
//! line under the form in step with [`FormStatus`].

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Element, Event, FormData, HtmlFormElement, Request, RequestInit, Response};

use crate::site::{FormStatus, settle};

/// Id of the contact form
pub const FORM_ID: &str = "contact-form";
/// Id of the status line under the form
pub const STATUS_ID: &str = "form-status";

/// Take over submission of the contact form
///
/// Returns whether a form was found. The form is posted to its own `action`.
#[wasm_bindgen(js_name = mountContact)]
pub fn mount_contact() -> bool {
    mount_contact_inner().is_some()
}

fn mount_contact_inner() -> Option<()> {
    let document = web_sys::window()?.document()?;
    let form = document
        .get_element_by_id(FORM_ID)?
        .dyn_into::<HtmlFormElement>()
        .ok()?;
    let status = document.get_element_by_id(STATUS_ID);

    let handler = {
        let form = form.clone();
        Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            event.prevent_default();
            show(status.as_ref(), &FormStatus::Sending);

            let form = form.clone();
            let status = status.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let outcome = settle_form(&form).await;
                if outcome.is_success() {
                    form.reset();
                }
                show(status.as_ref(), &outcome);
            });
        })
    };

    form.add_event_listener_with_callback("submit", handler.as_ref().unchecked_ref())
        .ok()?;
    handler.forget();
    Some(())
}

fn show(status: Option<&Element>, outcome: &FormStatus) {
    let Some(el) = status else {
        return;
    };
    el.set_text_content(Some(outcome.message()));
    el.set_class_name(&outcome.css_class());
}

async fn settle_form(form: &HtmlFormElement) -> FormStatus {
    match post(form).await {
        Ok((code, body)) => settle(Some((code, &body))),
        Err(err) => {
            web_sys::console::warn_2(&JsValue::from_str("pulsenet: form post failed"), &err);
            settle(None)
        }
    }
}

/// POST the form and return the status and body text
///
/// Only a rejected fetch is an error; an unreadable body reads as empty.
async fn post(form: &HtmlFormElement) -> Result<(u16, String), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

    let body = FormData::new_with_form(form)?;
    let init = RequestInit::new();
    init.set_method("POST");
    init.set_body(&body);
    let request = Request::new_with_str_and_init(&form.action(), &init)?;
    request.headers().set("Accept", "application/json")?;

    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await?
        .dyn_into()?;

    let text = match response.text() {
        Ok(promise) => JsFuture::from(promise)
            .await
            .ok()
            .and_then(|v| v.as_string())
            .unwrap_or_default(),
        Err(_) => String::new(),
    };
    Ok((response.status(), text))
}
