//! Conversation scripts shared by the integration tests

pub const TRIGGER: &str = "I want to try the Pro plan";
pub const NAME: &str = "Ashish Gupta";
pub const EMAIL: &str = "ashish@example.com";
pub const PLATFORM: &str = "YouTube";

/// The four messages of a complete lead capture
pub fn lead_capture_script() -> Vec<&'static str> {
    vec![TRIGGER, NAME, EMAIL, PLATFORM]
}

pub const REFUND_QUESTION: &str = "what is your refund policy";
pub const GREETING: &str = "hey there";
