//! # Handler chain
//!
//! Every update passes through the same ordered handlers: all `before` run in order (any false
//! stops the chain), then `handle` runs until one returns Stop, then all `after` run in reverse.

use std::sync::Arc;

use stylebot_core::{Handler, HandlerResponse, Message, Result};
use tracing::{debug, info, instrument};

#[derive(Clone, Default)]
pub struct HandlerChain {
    handlers: Vec<Arc<dyn Handler>>,
}

impl HandlerChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a handler; earlier handlers see the message first.
    pub fn add_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Runs before → handle until Stop → after (reverse). Returns the response that ended the
    /// handle phase, or Continue when no handler claimed the message.
    #[instrument(skip(self, message), fields(chat_id = message.chat.id, kind = message.kind_name()))]
    pub async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        for h in &self.handlers {
            if !h.before(message).await? {
                info!(
                    handler = std::any::type_name_of_val(h.as_ref()),
                    "before returned false, chain stopped"
                );
                return Ok(HandlerResponse::Stop);
            }
        }

        let mut final_response = HandlerResponse::Continue;
        for h in &self.handlers {
            let name = std::any::type_name_of_val(h.as_ref());
            let response = h.handle(message).await?;
            debug!(handler = %name, response = ?response, "Handler processed");
            if response == HandlerResponse::Stop {
                debug!(handler = %name, "Chain stopped by handler");
                final_response = response;
                break;
            }
        }

        for h in self.handlers.iter().rev() {
            h.after(message, &final_response).await?;
        }

        Ok(final_response)
    }
}
