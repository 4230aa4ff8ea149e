//! Email bodies. Rendered through maud so user-supplied values are escaped
//! before they reach anyone's inbox.

use maud::{Markup, html};

use super::SITE_NAME;

/// Thank-you note sent to a new subscriber. One substitution: the name.
pub fn subscriber_thank_you(name: &str) -> Markup {
    html! {
        html {
            body {
                p { "Hi " (name) "," }
                p {
                    "Thank you for subscribing to " (SITE_NAME) "! "
                    "New posts will land in your inbox as soon as they're published."
                }
                p { "— the " (SITE_NAME) " team" }
            }
        }
    }
}

/// Alert sent to the site owner when the contact form is submitted.
pub fn contact_alert(name: &str, email: &str, message: &str) -> Markup {
    html! {
        html {
            body {
                p { "You have received a new message from " (name) " (" (email) "):" }
                blockquote { (message) }
            }
        }
    }
}
