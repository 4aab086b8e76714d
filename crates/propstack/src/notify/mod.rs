//! Outbound alerts for the admin desk.
//!
//! Bookings raise an email, enquiries raise an SMS. Delivery is best effort:
//! a failed send is logged and swallowed so a flaky relay never rolls back
//! the record that triggered it.

use std::fmt::Debug;
use std::fmt::Write as _;

use crate::config::ContactConfig;

/// Outbound SMS channel. Production wires a provider client; tests plug in
/// recording fakes.
pub trait SmsSender: Send + Sync + Debug {
    fn send(&self, to: &str, body: &str) -> Result<(), NotifyError>;
}

/// Outbound email channel.
pub trait EmailSender: Send + Sync + Debug {
    fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), NotifyError>;
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum NotifyError {
    #[error("sms delivery failed: {0}")]
    Sms(String),
    #[error("email delivery failed: {0}")]
    Email(String),
}

const BOOKING_SUBJECT: &str = "New Property Booking";

/// Fans booking and enquiry events out to the configured admin contacts.
#[derive(Debug)]
pub struct Notifier {
    contact: ContactConfig,
    sms: Box<dyn SmsSender>,
    email: Box<dyn EmailSender>,
}

impl Notifier {
    pub fn new(
        contact: ContactConfig,
        sms: Box<dyn SmsSender>,
        email: Box<dyn EmailSender>,
    ) -> Self {
        Self {
            contact,
            sms,
            email,
        }
    }

    /// Emails the admin desk about a fresh booking.
    pub fn booking_received(
        &self,
        name: &str,
        mobile: &str,
        property_id: &str,
        message: Option<&str>,
    ) {
        let body = render_booking_email(name, mobile, property_id, message);
        if let Err(err) = self
            .email
            .send(&self.contact.admin_email, BOOKING_SUBJECT, &body)
        {
            tracing::warn!(property = %property_id, error = %err, "failed to email booking alert");
        }
    }

    /// Texts the admin desk about a fresh enquiry.
    pub fn enquiry_received(&self, fullname: &str, mobile: &str, message: &str) {
        let body = format!("New Enquiry from {fullname}. Mobile: {mobile}. Message: {message}");
        if let Err(err) = self.sms.send(&self.contact.admin_mobile, &body) {
            tracing::warn!(error = %err, "failed to send enquiry alert");
        }
    }
}

fn render_booking_email(
    name: &str,
    mobile: &str,
    property_id: &str,
    message: Option<&str>,
) -> String {
    let mut html = String::new();
    writeln!(html, "<h2>{}</h2>", BOOKING_SUBJECT).expect("write heading");
    writeln!(html, "<p>A new booking just arrived. Details below.</p>").expect("write intro");
    html.push_str("<table>\n");
    writeln!(
        html,
        "<tr><td>Name</td><td>{}</td></tr>",
        escape_html(name)
    )
    .expect("write name row");
    writeln!(
        html,
        "<tr><td>Mobile</td><td>{}</td></tr>",
        escape_html(mobile)
    )
    .expect("write mobile row");
    writeln!(
        html,
        "<tr><td>Property</td><td>{}</td></tr>",
        escape_html(property_id)
    )
    .expect("write property row");
    writeln!(
        html,
        "<tr><td>Message</td><td>{}</td></tr>",
        escape_html(message.unwrap_or("N/A"))
    )
    .expect("write message row");
    html.push_str("</table>\n");
    writeln!(
        html,
        "<p>Reach out to the customer to confirm the booking.</p>"
    )
    .expect("write outro");
    html
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
