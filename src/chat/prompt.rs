//! Fixed texts of the support chat and payload construction.

use super::{ChatMessage, ChatRole};
use crate::llm::WireMessage;

/// First message of every transcript.
pub const WELCOME_MESSAGE: &str =
    "Hi there! How can I help you with selling your software licenses today?";

/// Assistant message appended when a completion fails for any reason.
pub const FALLBACK_MESSAGE: &str = "I'm having trouble connecting to our system right now. \
     Please try again later or contact us at hello@softsell.com for assistance.";

/// Instruction that scopes the model to SoftSell topics.
pub const SYSTEM_PROMPT: &str = "\
You are a helpful assistant for SoftSell, a company that helps businesses sell their unused software licenses.
Only answer questions related to SoftSell's services, software license selling process, and general inquiries about the website.
If asked about topics unrelated to SoftSell or software license selling, politely redirect the conversation back to how you can help with software license selling.
Key information about SoftSell:
- SoftSell helps companies sell unused software licenses securely and easily
- The process involves uploading license information, getting a valuation, and receiving payment
- Payment is processed within 2 business days via bank transfer, PayPal, or crypto
- SoftSell accepts enterprise software licenses, design tools, development environments, CRM solutions, and most major business applications
- All transactions are secure with bank-level encryption
- SoftSell offers 24/7 customer support
";

/// Build the outbound conversation: system instruction, every prior
/// transcript entry, then the new user turn.
#[must_use]
pub fn build_payload(history: &[ChatMessage], user_text: &str) -> Vec<WireMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(WireMessage::system(SYSTEM_PROMPT));
    messages.extend(history.iter().map(|m| match m.role {
        ChatRole::User => WireMessage::user(m.text.clone()),
        ChatRole::Assistant => WireMessage::assistant(m.text.clone()),
    }));
    messages.push(WireMessage::user(user_text));
    messages
}
