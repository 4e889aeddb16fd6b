//! Texts and keyboards shown to users.

use style_worker::GanVariant;
use stylebot_core::{Keyboard, MenuButton};

pub const START: &str = "Hi! I can restyle your photos.\n\
/nst - transfer the style of one photo onto another\n\
/gan - repaint a photo as Cezanne, Monet or Van Gogh\n\
/help - show what I can do";

pub const HELP: &str = "Two modes are available:\n\
/nst - send a style photo first, then the photo to restyle. Takes a few minutes.\n\
/gan - pick a painter with the buttons, then send the photo to restyle.\n\
/cancel - abandon the current request.\n\
Requests are processed one at a time, in the order they arrive.";

pub const NST_PROMPT: &str = "Send me the style photo.";
pub const GAN_PROMPT: &str = "Choose a style:";
pub const AWAITING_CONTENT_NST: &str = "Got the style. Now send the photo you want to restyle.";
pub const AWAITING_CONTENT_GAN: &str = "Good choice. Now send the photo you want to restyle.";
pub const STYLE_ERROR: &str = "That is not a photo. Please send the style photo, or /cancel.";
pub const CONTENT_ERROR: &str = "That is not a photo. Please send the photo to restyle, or /cancel.";
pub const CHOOSE_VARIANT_ERROR: &str = "Please choose a style with the buttons above, or /cancel.";
pub const DOWNLOAD_ERROR: &str = "I could not download that photo. Please send it again.";
pub const QUEUE_UNAVAILABLE: &str =
    "Processing is unavailable right now. Please try again later.";
pub const SESSION_EXPIRED: &str =
    "That took too long and I let go of your style photo. Send /nst to start again.";
pub const CANCELLED: &str = "Cancelled. Send /nst or /gan to start again.";
pub const CONFUSED: &str = "Sorry, I didn't understand that. Pick a command below.";
pub const FINISHED: &str = "Done! Here is your picture.";
pub const FAILED: &str = "Sorry, something went wrong while processing your photo. Please try again.";

/// Acknowledgement after a task is queued; `position` 1 means it starts right away.
pub fn processing(position: usize) -> String {
    if position <= 1 {
        "Processing your photo, this can take a few minutes.".to_string()
    } else {
        format!(
            "Your photo is number {} in the queue. I will send the result when it is ready.",
            position
        )
    }
}

/// Reply keyboard with the main commands.
pub fn commands_keyboard() -> Keyboard {
    Keyboard::Commands(
        ["/nst", "/gan", "/help", "/cancel"]
            .iter()
            .map(|c| c.to_string())
            .collect(),
    )
}

/// Inline menu with one button per GAN style.
pub fn gan_keyboard() -> Keyboard {
    Keyboard::Inline(
        GanVariant::ALL
            .iter()
            .map(|v| MenuButton::new(v.label(), v.callback_data()))
            .collect(),
    )
}
