use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::EventListener;
use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlElement;
use yew::html::BaseComponent;
use yew::prelude::*;
use yew::{AppHandle, Renderer};

use super::dom::{after, body, document, set_style};
use crate::overlay::{
    MenuKind, OverlayId, OverlaySlot, ToastKind, MENU_OUTSIDE_CLICK_ARM_DELAY, TOAST_ENTER_DELAY,
    TOAST_EXIT_DURATION,
};
use crate::quick_actions::{MenuOption, QuickAction};

const MENU_ITEM_STYLE: &str = "padding: 12px 16px; cursor: pointer; display: flex; \
    align-items: center; gap: 12px; transition: background-color 0.2s ease; \
    font-size: 14px; color: #333;";

fn toast_css(kind: ToastKind) -> String {
    format!(
        "position: fixed; top: 20px; right: 20px; background: {}; color: white; \
         padding: 12px 20px; border-radius: 8px; box-shadow: 0 4px 12px rgba(0, 0, 0, 0.15); \
         z-index: 10001; display: flex; align-items: center; gap: 8px; \
         font-family: 'Inter', sans-serif; font-size: 14px; transform: translateX(100%); \
         transition: transform 0.3s ease; max-width: 300px;",
        kind.background()
    )
}

fn menu_css(x: i32, y: i32) -> String {
    format!(
        "position: fixed; top: {y}px; left: {x}px; background: white; \
         border: 1px solid #ddd; border-radius: 8px; box-shadow: 0 4px 12px rgba(0, 0, 0, 0.15); \
         z-index: 10002; padding: 8px 0; min-width: 200px; font-family: 'Inter', sans-serif;"
    )
}

#[derive(Properties, PartialEq)]
struct ToastProps {
    kind: ToastKind,
    message: AttrValue,
}

#[function_component(ToastView)]
fn toast_view(props: &ToastProps) -> Html {
    html! {
        <>
            <i class={props.kind.icon()}></i>
            <span>{props.message.clone()}</span>
        </>
    }
}

#[derive(Properties, PartialEq)]
struct MenuItemProps {
    option: MenuOption,
    on_select: Callback<QuickAction>,
}

#[function_component(MenuItemView)]
fn menu_item_view(props: &MenuItemProps) -> Html {
    let hovered = use_state(|| false);

    let onmouseenter = {
        let hovered = hovered.clone();
        Callback::from(move |_: MouseEvent| hovered.set(true))
    };

    let onmouseleave = {
        let hovered = hovered.clone();
        Callback::from(move |_: MouseEvent| hovered.set(false))
    };

    let onclick = {
        let on_select = props.on_select.clone();
        let action = props.option.action;
        Callback::from(move |_: MouseEvent| on_select.emit(action))
    };

    let background = if *hovered { "#f5f5f5" } else { "transparent" };
    let style = format!("{MENU_ITEM_STYLE} background-color: {background};");

    html! {
        <div
            style={style}
            onmouseenter={onmouseenter}
            onmouseleave={onmouseleave}
            onclick={onclick}
        >
            <i class={props.option.icon} style="width: 16px;"></i>
            {" "}
            {props.option.label}
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct MenuProps {
    options: Vec<MenuOption>,
    on_select: Callback<QuickAction>,
}

#[function_component(MenuView)]
fn menu_view(props: &MenuProps) -> Html {
    html! {
        <>
            { for props.options.iter().map(|option| html! {
                <MenuItemView option={*option} on_select={props.on_select.clone()} />
            }) }
        </>
    }
}

/// A host node appended to `<body>` with a Yew app rendered into it. Dropping
/// it cancels its timers and listeners, destroys the app and detaches the host.
struct MountedOverlay<C: BaseComponent> {
    host: HtmlElement,
    app: Option<AppHandle<C>>,
    timers: Vec<Timeout>,
    listeners: Vec<EventListener>,
}

impl<C: BaseComponent> Drop for MountedOverlay<C> {
    fn drop(&mut self) {
        self.timers.clear();
        self.listeners.clear();
        if let Some(app) = self.app.take() {
            app.destroy();
        }
        self.host.remove();
    }
}

type OverlayCell<C> = Rc<RefCell<OverlaySlot<MountedOverlay<C>>>>;

fn dismiss<C: BaseComponent>(slot: &OverlayCell<C>, id: OverlayId) {
    let removed = slot.borrow_mut().unmount(id);
    drop(removed);
}

fn create_host(class_name: &str, css: &str) -> Option<HtmlElement> {
    let host = document()?
        .create_element("div")
        .ok()?
        .dyn_into::<HtmlElement>()
        .ok()?;
    host.set_class_name(class_name);
    host.style().set_css_text(css);
    body()?.append_child(&host).ok()?;
    Some(host)
}

/// Shows at most one toast at a time.
#[derive(Clone, Default)]
pub struct Toaster {
    slot: OverlayCell<ToastView>,
}

impl Toaster {
    pub fn show(&self, message: &str, kind: ToastKind) {
        let displaced = self.slot.borrow_mut().clear();
        drop(displaced);

        let Some(host) = create_host("toast-notification", &toast_css(kind)) else {
            return;
        };
        let props = ToastProps {
            kind,
            message: AttrValue::from(message.to_string()),
        };
        let app = Renderer::<ToastView>::with_root_and_props(host.clone().into(), props).render();
        let id = self.slot.borrow().next_id();

        let enter_host = host.clone();
        let enter = after(TOAST_ENTER_DELAY, move || {
            set_style(&enter_host, "transform", "translateX(0)");
        });

        let slot = Rc::clone(&self.slot);
        let exit_host = host.clone();
        let exit = after(kind.display_duration(), move || {
            set_style(&exit_host, "transform", "translateX(100%)");
            let removal_slot = Rc::clone(&slot);
            let removal = after(TOAST_EXIT_DURATION, move || dismiss(&removal_slot, id));
            if let Some(overlay) = slot.borrow_mut().get_mut(id) {
                overlay.timers.push(removal);
            }
        });

        let (_, displaced) = self.slot.borrow_mut().mount(MountedOverlay {
            host,
            app: Some(app),
            timers: vec![enter, exit],
            listeners: Vec::new(),
        });
        drop(displaced);
    }
}

/// Right-click option menus, one live menu per kind.
#[derive(Clone, Default)]
pub struct MenuHost {
    email: OverlayCell<MenuView>,
    phone: OverlayCell<MenuView>,
}

impl MenuHost {
    fn slot(&self, kind: MenuKind) -> &OverlayCell<MenuView> {
        match kind {
            MenuKind::Email => &self.email,
            MenuKind::Phone => &self.phone,
        }
    }

    /// Opens the `kind` menu at viewport position (`x`, `y`). Choosing an
    /// item hands its action to `on_action` and closes the menu.
    pub fn show<F>(&self, kind: MenuKind, x: i32, y: i32, options: Vec<MenuOption>, on_action: F)
    where
        F: Fn(QuickAction) + 'static,
    {
        let slot = Rc::clone(self.slot(kind));
        let displaced = slot.borrow_mut().clear();
        drop(displaced);

        let Some(host) = create_host(kind.class_name(), &menu_css(x, y)) else {
            return;
        };
        let id = slot.borrow().next_id();

        let select_slot = Rc::clone(&slot);
        let on_select = Callback::from(move |action: QuickAction| {
            on_action(action);
            let select_slot = Rc::clone(&select_slot);
            // The app cannot be torn down from inside its own handler.
            spawn_local(async move { dismiss(&select_slot, id) });
        });
        let props = MenuProps { options, on_select };
        let app = Renderer::<MenuView>::with_root_and_props(host.clone().into(), props).render();

        let arm_slot = Rc::clone(&slot);
        let arm = after(MENU_OUTSIDE_CLICK_ARM_DELAY, move || {
            let Some(document) = document() else {
                return;
            };
            let close_slot = Rc::clone(&arm_slot);
            let listener = EventListener::once(&document, "click", move |_| {
                dismiss(&close_slot, id);
            });
            if let Some(overlay) = arm_slot.borrow_mut().get_mut(id) {
                overlay.listeners.push(listener);
            }
        });

        let (_, displaced) = slot.borrow_mut().mount(MountedOverlay {
            host,
            app: Some(app),
            timers: vec![arm],
            listeners: Vec::new(),
        });
        drop(displaced);
    }
}
