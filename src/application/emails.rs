//! Email bodies rendered with Askama.

use askama::Template;

use crate::domain::ports::NotifyError;

pub const OTP_SUBJECT: &str = "Your verification code";

/// Renders `templates/otp_email.html`.
#[derive(Template)]
#[template(path = "otp_email.html")]
pub struct OtpEmail<'a> {
    pub email: &'a str,
    pub code: &'a str,
    pub ttl_minutes: i64,
}

impl OtpEmail<'_> {
    pub fn body(&self) -> Result<String, NotifyError> {
        self.render().map_err(|e| NotifyError::Template(e.to_string()))
    }
}
