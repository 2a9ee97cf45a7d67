use {
    async_trait::async_trait,
    bytes::Bytes,
    teloxide::{
        ApiError, RequestError,
        payloads::SendPhotoSetters,
        prelude::*,
        types::{ChatId, InputFile},
    },
    tracing::info,
};

use fanpost_delivery::{ChannelSink, SinkError};

/// Posts caption + image to a Telegram chat. The fan-out engine's one
/// concrete channel sink.
pub struct TelegramSink {
    bot: Bot,
}

impl TelegramSink {
    #[must_use]
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ChannelSink for TelegramSink {
    async fn post(&self, channel_id: &str, caption: &str, image: Bytes) -> Result<(), SinkError> {
        // Registry ids are stringified Telegram chat ids; anything else can
        // never resolve to a chat.
        let chat_id = channel_id
            .parse::<i64>()
            .map(ChatId)
            .map_err(|_| SinkError::ChannelNotFound)?;

        let input = InputFile::memory(image).file_name("image.png");
        let mut request = self.bot.send_photo(chat_id, input);
        if !caption.is_empty() {
            request = request.caption(caption);
        }
        request.await.map_err(|e| {
            if is_unreachable_chat(&e) {
                SinkError::ChannelNotFound
            } else {
                SinkError::Send(e.into())
            }
        })?;

        info!(
            channel_id,
            caption_len = caption.len(),
            "telegram photo posted"
        );
        Ok(())
    }
}

/// Errors meaning the bot can no longer reach this chat at all, as opposed
/// to a transient send failure.
fn is_unreachable_chat(error: &RequestError) -> bool {
    matches!(
        error,
        RequestError::Api(ApiError::ChatNotFound | ApiError::BotBlocked | ApiError::BotKicked)
    )
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_not_found_is_unreachable() {
        assert!(is_unreachable_chat(&RequestError::Api(
            ApiError::ChatNotFound
        )));
        assert!(is_unreachable_chat(&RequestError::Api(ApiError::BotBlocked)));
    }

    #[test]
    fn io_errors_are_not_unreachable() {
        let err = RequestError::Io(std::io::Error::other("boom"));
        assert!(!is_unreachable_chat(&err));
    }

    #[tokio::test]
    async fn non_numeric_channel_id_resolves_to_channel_not_found() {
        let sink = TelegramSink::new(Bot::new("000:fake-token"));
        let result = sink
            .post("not-a-chat-id", "caption", Bytes::from_static(b"img"))
            .await;
        assert!(matches!(result, Err(SinkError::ChannelNotFound)));
    }
}
