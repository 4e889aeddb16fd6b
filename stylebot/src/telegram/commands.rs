//! Bot menu commands registered with Telegram at startup.

use teloxide::utils::command::BotCommands;

/// Commands shown in the Telegram client menu. Parsing happens in the handler chain,
/// so this enum only feeds `set_my_commands`.
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "start the bot")]
    Start,
    #[command(description = "what the bot can do")]
    Help,
    #[command(description = "transfer the style of one photo onto another")]
    Nst,
    #[command(description = "repaint a photo as Cezanne, Monet or Van Gogh")]
    Gan,
    #[command(description = "cancel the current request")]
    Cancel,
}
