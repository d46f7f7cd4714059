use std::fmt;

use url::Url;
use urlencoding::encode;

use crate::overlay::MenuKind;

pub const EMAIL_ROW_TOAST: &str = "Opening email client...";

const MAIL_SUBJECT: &str = "Hello from Portfolio Website";
const MAIL_BODY: &str =
    "Hi Ankit,\r\n\r\nI visited your portfolio and would like to connect.\r\n\r\nBest regards,";
const WHATSAPP_MESSAGE: &str = "Hello Ankit, I visited your portfolio and would like to connect.";
const MOBILE_USER_AGENT_MARKERS: [&str; 8] = [
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkError {
    kind: &'static str,
    reason: String,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not build {} link: {}", self.kind, self.reason)
    }
}

impl std::error::Error for LinkError {}

fn parse_link(kind: &'static str, raw: String) -> Result<Url, LinkError> {
    Url::parse(&raw).map_err(|error| LinkError {
        kind,
        reason: error.to_string(),
    })
}

pub fn mailto_link(address: &str) -> Result<Url, LinkError> {
    let address = address.trim();
    if address.is_empty() || !address.contains('@') {
        return Err(LinkError {
            kind: "mailto",
            reason: format!("`{address}` is not an email address"),
        });
    }
    parse_link(
        "mailto",
        format!(
            "mailto:{address}?subject={}&body={}",
            encode(MAIL_SUBJECT),
            encode(MAIL_BODY)
        ),
    )
}

pub fn webmail_compose_link(address: &str) -> Result<Url, LinkError> {
    parse_link(
        "webmail",
        format!(
            "https://mail.google.com/mail/?view=cm&fs=1&to={}&su={}&body={}",
            encode(address.trim()),
            encode(MAIL_SUBJECT),
            encode(MAIL_BODY)
        ),
    )
}

/// Digits of `phone` with its leading `+` kept.
fn dial_string(phone: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if phone.trim_start().starts_with('+') {
        format!("+{digits}")
    } else {
        digits
    }
}

pub fn tel_link(phone: &str) -> Result<Url, LinkError> {
    let dial = dial_string(phone);
    if dial.trim_start_matches('+').is_empty() {
        return Err(LinkError {
            kind: "tel",
            reason: format!("`{phone}` has no digits"),
        });
    }
    parse_link("tel", format!("tel:{dial}"))
}

pub fn whatsapp_link(phone: &str) -> Result<Url, LinkError> {
    let digits = dial_string(phone).trim_start_matches('+').to_string();
    parse_link(
        "whatsapp",
        format!("https://wa.me/{digits}?text={}", encode(WHATSAPP_MESSAGE)),
    )
}

pub fn is_mobile_device(user_agent: &str, max_touch_points: i32) -> bool {
    let user_agent = user_agent.to_ascii_lowercase();
    MOBILE_USER_AGENT_MARKERS
        .iter()
        .any(|marker| user_agent.contains(marker))
        || max_touch_points > 1
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuickAction {
    OpenMailClient,
    OpenWebmail,
    CopyEmail,
    Call,
    CallUnavailable,
    OpenWhatsApp,
    CopyPhone,
}

impl QuickAction {
    pub fn toast_message(self) -> &'static str {
        match self {
            Self::OpenMailClient => "Opening default email client...",
            Self::OpenWebmail => "Opening Gmail...",
            Self::CopyEmail => "Email copied to clipboard!",
            Self::Call => "Opening phone dialer...",
            Self::CallUnavailable => "Calling feature available on mobile devices",
            Self::OpenWhatsApp => "Opening WhatsApp...",
            Self::CopyPhone => "Phone number copied to clipboard!",
        }
    }
}

/// What a plain click on a contact row should do.
pub fn email_row_click() -> QuickAction {
    QuickAction::OpenMailClient
}

pub fn phone_row_click(is_mobile: bool) -> QuickAction {
    if is_mobile {
        QuickAction::Call
    } else {
        QuickAction::CopyPhone
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MenuOption {
    pub icon: &'static str,
    pub label: &'static str,
    pub action: QuickAction,
}

pub fn menu_options(kind: MenuKind, is_mobile: bool) -> Vec<MenuOption> {
    match kind {
        MenuKind::Email => vec![
            MenuOption {
                icon: "fas fa-envelope",
                label: "Default Email Client",
                action: QuickAction::OpenMailClient,
            },
            MenuOption {
                icon: "fab fa-google",
                label: "Gmail Web",
                action: QuickAction::OpenWebmail,
            },
            MenuOption {
                icon: "fas fa-copy",
                label: "Copy Email Address",
                action: QuickAction::CopyEmail,
            },
        ],
        MenuKind::Phone => vec![
            MenuOption {
                icon: "fas fa-phone",
                label: if is_mobile { "Call Now" } else { "Call (Mobile Only)" },
                action: if is_mobile {
                    QuickAction::Call
                } else {
                    QuickAction::CallUnavailable
                },
            },
            MenuOption {
                icon: "fab fa-whatsapp",
                label: "WhatsApp",
                action: QuickAction::OpenWhatsApp,
            },
            MenuOption {
                icon: "fas fa-copy",
                label: "Copy Phone Number",
                action: QuickAction::CopyPhone,
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mailto_link_carries_encoded_subject_and_body() {
        let link = mailto_link("bajgainankit@gmail.com").expect("valid address");

        assert_eq!(link.scheme(), "mailto");
        let text = link.as_str();
        assert!(text.starts_with(
            "mailto:bajgainankit@gmail.com?subject=Hello%20from%20Portfolio%20Website"
        ));
        assert!(text.contains("body=Hi%20Ankit%2C%0D%0A%0D%0AI%20visited"));
    }

    #[test]
    fn mailto_link_rejects_non_addresses() {
        let error = mailto_link("  ").expect_err("blank address");
        assert!(error.to_string().starts_with("could not build mailto link"));
        assert!(mailto_link("not-an-address").is_err());
    }

    #[test]
    fn webmail_link_targets_gmail_compose() {
        let link = webmail_compose_link("bajgainankit@gmail.com").expect("valid link");

        assert_eq!(link.host_str(), Some("mail.google.com"));
        let pairs: Vec<(String, String)> = link
            .query_pairs()
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        assert!(pairs.contains(&("to".to_string(), "bajgainankit@gmail.com".to_string())));
        assert!(pairs.contains(&("su".to_string(), MAIL_SUBJECT.to_string())));
    }

    #[test]
    fn phone_links_strip_formatting() {
        assert_eq!(
            tel_link("+977 9862133032").expect("digits").as_str(),
            "tel:+9779862133032"
        );
        assert!(tel_link("call me").is_err());

        let whatsapp = whatsapp_link("+977 9862133032").expect("valid link");
        assert_eq!(whatsapp.path(), "/9779862133032");
        assert!(whatsapp
            .query()
            .is_some_and(|query| query.starts_with("text=Hello%20Ankit")));
    }

    #[test]
    fn mobile_detection_uses_user_agent_or_touch_points() {
        let iphone = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)";
        let desktop = "Mozilla/5.0 (X11; Linux x86_64) Firefox/128.0";

        assert!(is_mobile_device(iphone, 0));
        assert!(is_mobile_device("Opera Mini/8.0", 0));
        assert!(!is_mobile_device(desktop, 0));
        assert!(!is_mobile_device(desktop, 1));
        assert!(is_mobile_device(desktop, 5));
    }

    #[test]
    fn phone_row_click_depends_on_device() {
        assert_eq!(phone_row_click(true), QuickAction::Call);
        assert_eq!(phone_row_click(false), QuickAction::CopyPhone);
        assert_eq!(email_row_click(), QuickAction::OpenMailClient);
    }

    #[test]
    fn phone_menu_labels_call_option_by_device() {
        let desktop = menu_options(MenuKind::Phone, false);
        let mobile = menu_options(MenuKind::Phone, true);

        assert_eq!(desktop[0].label, "Call (Mobile Only)");
        assert_eq!(desktop[0].action, QuickAction::CallUnavailable);
        assert_eq!(mobile[0].label, "Call Now");
        assert_eq!(mobile[0].action, QuickAction::Call);
        assert_eq!(desktop.len(), 3);
    }

    #[test]
    fn email_menu_offers_client_webmail_and_copy() {
        let actions: Vec<QuickAction> = menu_options(MenuKind::Email, false)
            .into_iter()
            .map(|option| option.action)
            .collect();

        assert_eq!(
            actions,
            vec![
                QuickAction::OpenMailClient,
                QuickAction::OpenWebmail,
                QuickAction::CopyEmail
            ]
        );
        assert_eq!(QuickAction::CopyEmail.toast_message(), "Email copied to clipboard!");
    }
}
