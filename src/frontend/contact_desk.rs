use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use gloo_timers::callback::Timeout;
use js_sys::Reflect;
use serde_json::json;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    window, Clipboard, EventTarget, HtmlButtonElement, HtmlDocument, HtmlElement,
    HtmlFormElement, HtmlInputElement, HtmlTextAreaElement, MouseEvent,
};

use super::dom::{
    add_class, after, body, document, lock_body_scroll, query, remove_class, set_style,
};
use super::emailjs::EmailJsClient;
use super::overlay_view::{MenuHost, Toaster};
use crate::config::EffectsConfig;
use crate::contact::{
    submit_contact, ButtonFace, ContactFields, ContactModal, Resolution, SubmitRejected,
};
use crate::logging::{log_event, LogLevel};
use crate::overlay::{MenuKind, ToastKind};
use crate::quick_actions::{
    email_row_click, is_mobile_device, mailto_link, menu_options, phone_row_click, tel_link,
    webmail_compose_link, whatsapp_link, QuickAction, EMAIL_ROW_TOAST,
};

const MODAL_SELECTOR: &str = "#contactModal";

fn js_error_text(error: &JsValue) -> String {
    error
        .as_string()
        .unwrap_or_else(|| format!("{error:?}"))
}

fn navigate(url: &str) -> Result<(), String> {
    let window = window().ok_or_else(|| "no window".to_string())?;
    window
        .location()
        .set_href(url)
        .map_err(|error| js_error_text(&error))
}

fn open_tab(url: &str) {
    if let Some(window) = window() {
        let _ = window.open_with_url_and_target(url, "_blank");
    }
}

fn is_mobile() -> bool {
    let Some(navigator) = window().map(|w| w.navigator()) else {
        return false;
    };
    let user_agent = navigator.user_agent().unwrap_or_default();
    is_mobile_device(&user_agent, navigator.max_touch_points())
}

async fn write_clipboard(text: &str) -> Result<(), JsValue> {
    let navigator = window().ok_or(JsValue::NULL)?.navigator();
    let clipboard = Reflect::get(&navigator, &JsValue::from_str("clipboard"))?;
    if clipboard.is_undefined() || clipboard.is_null() {
        return Err(JsValue::from_str("clipboard api unavailable"));
    }
    let clipboard: Clipboard = clipboard.unchecked_into();
    JsFuture::from(clipboard.write_text(text)).await?;
    Ok(())
}

fn copy_with_textarea(text: &str) -> Result<(), JsValue> {
    let document = document().ok_or(JsValue::NULL)?;
    let body = body().ok_or(JsValue::NULL)?;
    let textarea = document
        .create_element("textarea")?
        .dyn_into::<HtmlTextAreaElement>()?;
    textarea.set_value(text);
    body.append_child(&textarea)?;
    textarea.select();
    let copied = document.dyn_into::<HtmlDocument>()?.exec_command("copy");
    textarea.remove();
    copied.map(|_| ())
}

fn field_value(form: &HtmlFormElement, selector: &str) -> String {
    let Some(element) = form.query_selector(selector).ok().flatten() else {
        return String::new();
    };
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        return input.value();
    }
    if let Some(textarea) = element.dyn_ref::<HtmlTextAreaElement>() {
        return textarea.value();
    }
    String::new()
}

fn read_fields(form: &HtmlFormElement) -> ContactFields {
    ContactFields {
        name: field_value(form, r#"input[name="name"]"#),
        email: field_value(form, r#"input[name="email"]"#),
        subject: field_value(form, r#"input[name="subject"]"#),
        message: field_value(form, r#"textarea[name="message"]"#),
    }
}

fn apply_face(button: &HtmlButtonElement, face: ButtonFace, idle_label: &str) {
    button.set_inner_html(face.markup().unwrap_or(idle_label));
    button.set_disabled(face.disabled());
}

fn contact_row(icon_class: &str) -> Option<HtmlElement> {
    query(&format!(".contact-item .{icon_class}"))?
        .closest(".contact-item")
        .ok()
        .flatten()?
        .dyn_into::<HtmlElement>()
        .ok()
}

/// The contact modal, its form, and the click-to-contact rows.
pub struct ContactDesk {
    config: Rc<EffectsConfig>,
    modal: Rc<RefCell<ContactModal>>,
    delivery: EmailJsClient,
    toaster: Toaster,
    menus: MenuHost,
    submit_label: RefCell<String>,
    settle_timer: RefCell<Option<Timeout>>,
}

impl ContactDesk {
    pub fn new(config: Rc<EffectsConfig>, toaster: Toaster) -> Rc<Self> {
        Rc::new(Self {
            delivery: EmailJsClient::from_config(&config),
            config,
            modal: Rc::new(RefCell::new(ContactModal::new())),
            toaster,
            menus: MenuHost::default(),
            submit_label: RefCell::new(String::new()),
            settle_timer: RefCell::new(None),
        })
    }

    pub fn open_modal(&self) {
        let Some(element) = query(MODAL_SELECTOR) else {
            return;
        };
        self.modal.borrow_mut().open();
        add_class(&element, "active");
        lock_body_scroll(true);
    }

    pub fn close_modal(&self) {
        let Some(element) = query(MODAL_SELECTOR) else {
            return;
        };
        self.modal.borrow_mut().close();
        remove_class(&element, "active");
        lock_body_scroll(false);
    }

    pub fn install(self: &Rc<Self>) -> Vec<EventListener> {
        let mut listeners = Vec::new();
        listeners.extend(self.install_backdrop());
        listeners.extend(self.install_form());
        listeners.extend(self.install_email_row());
        listeners.extend(self.install_phone_row());
        if let Some(row) = contact_row("fa-linkedin") {
            set_style(&row, "cursor", "pointer");
        }
        listeners
    }

    fn install_backdrop(self: &Rc<Self>) -> Option<EventListener> {
        let backdrop = query(MODAL_SELECTOR)?;
        let desk = Rc::clone(self);
        Some(EventListener::new(&window()?, "click", move |event| {
            let Some(target) = event.target() else {
                return;
            };
            let backdrop_target: &EventTarget = backdrop.as_ref();
            if &target == backdrop_target {
                desk.close_modal();
            }
        }))
    }

    fn install_form(self: &Rc<Self>) -> Option<EventListener> {
        let form = query(".contact-form")?.dyn_into::<HtmlFormElement>().ok()?;
        let button = form
            .query_selector(".submit-btn")
            .ok()
            .flatten()
            .and_then(|element| element.dyn_into::<HtmlButtonElement>().ok());
        if let Some(button) = &button {
            *self.submit_label.borrow_mut() = button.inner_html();
        }

        let desk = Rc::clone(self);
        let target = form.clone();
        Some(EventListener::new_with_options(
            &target,
            "submit",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                event.prevent_default();
                desk.submit(form.clone(), button.clone());
            },
        ))
    }

    fn submit(self: &Rc<Self>, form: HtmlFormElement, button: Option<HtmlButtonElement>) {
        let fields = read_fields(&form);
        let desk = Rc::clone(self);

        spawn_local(async move {
            let pending_button = button.clone();
            let idle_label = desk.submit_label.borrow().clone();
            let outcome = submit_contact(
                &desk.modal,
                &fields,
                &desk.config.contact_email,
                &desk.delivery,
                desk.config.log_level,
                move |face| {
                    if let Some(button) = &pending_button {
                        apply_face(button, face, &idle_label);
                    }
                },
            )
            .await;

            match outcome {
                Ok(resolution) => desk.resolve(resolution, form, button),
                Err(SubmitRejected::Invalid(error)) => {
                    desk.toaster.show(error.toast_message(), ToastKind::Error);
                }
                Err(SubmitRejected::InFlight) => {}
            }
        });
    }

    fn resolve(
        self: &Rc<Self>,
        resolution: Resolution,
        form: HtmlFormElement,
        button: Option<HtmlButtonElement>,
    ) {
        if let Some(button) = &button {
            apply_face(button, resolution.face, &self.submit_label.borrow());
        }
        self.toaster.show(resolution.message, resolution.toast);

        let desk = Rc::clone(self);
        let timer = after(resolution.settle_after, move || {
            let settlement = desk.modal.borrow_mut().settle(resolution.outcome);
            if settlement.close_modal {
                desk.close_modal();
            }
            if settlement.reset_form {
                form.reset();
            }
            if let Some(button) = &button {
                apply_face(button, settlement.face, &desk.submit_label.borrow());
            }
        });
        *self.settle_timer.borrow_mut() = Some(timer);
    }

    fn install_email_row(self: &Rc<Self>) -> Vec<EventListener> {
        let Some(row) = contact_row("fa-envelope") else {
            return Vec::new();
        };
        set_style(&row, "cursor", "pointer");

        let desk = Rc::clone(self);
        let click = EventListener::new(&row, "click", move |_| {
            desk.perform_with_toast(email_row_click(), EMAIL_ROW_TOAST);
        });
        vec![click, self.context_menu(&row, MenuKind::Email)]
    }

    fn install_phone_row(self: &Rc<Self>) -> Vec<EventListener> {
        let Some(row) = contact_row("fa-phone") else {
            return Vec::new();
        };
        set_style(&row, "cursor", "pointer");

        let desk = Rc::clone(self);
        let click = EventListener::new(&row, "click", move |_| {
            desk.perform(phone_row_click(is_mobile()));
        });
        vec![click, self.context_menu(&row, MenuKind::Phone)]
    }

    fn context_menu(self: &Rc<Self>, row: &HtmlElement, kind: MenuKind) -> EventListener {
        let desk = Rc::clone(self);
        EventListener::new_with_options(
            row,
            "contextmenu",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                event.prevent_default();
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let actions = Rc::clone(&desk);
                desk.menus.show(
                    kind,
                    event.client_x(),
                    event.client_y(),
                    menu_options(kind, is_mobile()),
                    move |action| actions.perform(action),
                );
            },
        )
    }

    fn perform(&self, action: QuickAction) {
        self.perform_with_toast(action, action.toast_message());
    }

    fn perform_with_toast(&self, action: QuickAction, message: &'static str) {
        match action {
            QuickAction::OpenMailClient => self.open_mail_client(message),
            QuickAction::OpenWebmail => self.open_webmail(),
            QuickAction::CopyEmail => self.copy(self.config.contact_email.clone(), message),
            QuickAction::Call => match tel_link(&self.config.contact_phone) {
                Ok(link) => {
                    let _ = navigate(link.as_str());
                    self.toaster.show(message, ToastKind::Success);
                }
                Err(error) => self.toaster.show(&error.to_string(), ToastKind::Error),
            },
            QuickAction::CallUnavailable => self.toaster.show(message, ToastKind::Success),
            QuickAction::OpenWhatsApp => match whatsapp_link(&self.config.contact_phone) {
                Ok(link) => {
                    open_tab(link.as_str());
                    self.toaster.show(message, ToastKind::Success);
                }
                Err(error) => self.toaster.show(&error.to_string(), ToastKind::Error),
            },
            QuickAction::CopyPhone => self.copy(self.config.contact_phone.clone(), message),
        }
    }

    fn open_mail_client(&self, message: &'static str) {
        let handoff = mailto_link(&self.config.contact_email)
            .map_err(|error| error.to_string())
            .and_then(|link| navigate(link.as_str()));

        match handoff {
            Ok(()) => self.toaster.show(message, ToastKind::Success),
            Err(reason) => {
                log_event(
                    self.config.log_level,
                    LogLevel::Warn,
                    "mailto_fallback",
                    json!({ "reason": reason }),
                );
                self.open_webmail();
            }
        }
    }

    fn open_webmail(&self) {
        match webmail_compose_link(&self.config.contact_email) {
            Ok(link) => {
                open_tab(link.as_str());
                self.toaster
                    .show(QuickAction::OpenWebmail.toast_message(), ToastKind::Success);
            }
            Err(error) => self.toaster.show(&error.to_string(), ToastKind::Error),
        }
    }

    fn copy(&self, text: String, message: &'static str) {
        let toaster = self.toaster.clone();
        let log_level = self.config.log_level;

        spawn_local(async move {
            if let Err(error) = write_clipboard(&text).await {
                log_event(
                    log_level,
                    LogLevel::Info,
                    "clipboard_fallback",
                    json!({ "reason": js_error_text(&error) }),
                );
                let _ = copy_with_textarea(&text);
            }
            toaster.show(message, ToastKind::Success);
        });
    }
}
