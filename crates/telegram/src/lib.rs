//! Telegram adapter: the subscribe/unsubscribe command loop and the outbound
//! channel sink used by the fan-out engine.

mod commands;
mod outbound;

pub use {commands::start_polling, outbound::TelegramSink};
