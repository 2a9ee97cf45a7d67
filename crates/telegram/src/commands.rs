use std::sync::Arc;

use {
    teloxide::{
        prelude::*,
        types::{AllowedUpdate, BotCommand, Chat, UpdateKind},
    },
    tokio_util::sync::CancellationToken,
    tracing::{debug, error, info, warn},
};

use fanpost_registry::{RegistryError, SubscriptionManager};

/// Commands the bot reacts to; everything else is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Subscribe,
    Unsubscribe,
}

/// Start long-polling for subscribe/unsubscribe commands.
///
/// Verifies credentials, then spawns a background task that processes
/// updates until the returned token is cancelled.
pub async fn start_polling(
    bot: Bot,
    manager: Arc<SubscriptionManager>,
) -> anyhow::Result<CancellationToken> {
    let me = bot.get_me().await?;
    // Long polling requires no webhook to be registered.
    bot.delete_webhook().send().await?;

    let commands = vec![
        BotCommand::new("subscribe", "Subscribe this channel to receive posts"),
        BotCommand::new("unsubscribe", "Unsubscribe this channel"),
    ];
    if let Err(e) = bot.set_my_commands(commands).await {
        warn!("failed to register bot commands: {e}");
    }

    info!(username = ?me.username, "telegram bot connected");

    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        let mut offset: i32 = 0;
        loop {
            if cancel_clone.is_cancelled() {
                info!("telegram polling stopped");
                break;
            }

            let result = bot
                .get_updates()
                .offset(offset)
                .timeout(30)
                .allowed_updates(vec![AllowedUpdate::Message])
                .await;

            match result {
                Ok(updates) => {
                    for update in updates {
                        offset = update.id.as_offset();
                        if let UpdateKind::Message(msg) = update.kind {
                            if let Err(e) = handle_message(&bot, msg, &manager).await {
                                error!(error = %e, "error handling telegram message");
                            }
                        }
                    }
                },
                Err(e) => {
                    warn!(error = %e, "telegram polling error, retrying");
                    tokio::time::sleep(std::time::Duration::from_secs(2)).await;
                },
            }
        }
    });

    Ok(cancel)
}

async fn handle_message(
    bot: &Bot,
    msg: Message,
    manager: &Arc<SubscriptionManager>,
) -> anyhow::Result<()> {
    let Some(command) = msg.text().and_then(parse_command) else {
        debug!(chat_id = msg.chat.id.0, "ignoring non-command message");
        return Ok(());
    };

    let channel_id = msg.chat.id.0.to_string();
    let name = chat_label(&msg.chat);

    let reply = match command {
        Command::Subscribe => match manager.subscribe(&channel_id, &name).await {
            Ok(()) => subscribe_reply(&name, true),
            Err(e) => {
                warn!(channel_id, error = %e, "subscription not persisted");
                subscribe_reply(&name, false)
            },
        },
        Command::Unsubscribe => match manager.unsubscribe(&channel_id).await {
            Ok(()) => unsubscribe_reply(&name, true),
            Err(RegistryError::NotSubscribed) => "This channel is not subscribed.".to_string(),
            Err(e) => {
                warn!(channel_id, error = %e, "unsubscription not persisted");
                unsubscribe_reply(&name, false)
            },
        },
    };

    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

/// Parse the leading token of a message as a bot command, tolerating the
/// `/subscribe@botname` form used in group chats.
fn parse_command(text: &str) -> Option<Command> {
    let first = text.trim().split_whitespace().next()?;
    let base = first.split('@').next()?;
    match base {
        "/subscribe" => Some(Command::Subscribe),
        "/unsubscribe" => Some(Command::Unsubscribe),
        _ => None,
    }
}

/// Best-available human label for a chat: group title, else username, else
/// first name, else the bare id.
fn chat_label(chat: &Chat) -> String {
    chat.title()
        .or_else(|| chat.username())
        .or_else(|| chat.first_name())
        .map(str::to_string)
        .unwrap_or_else(|| chat.id.0.to_string())
}

fn subscribe_reply(name: &str, persisted: bool) -> String {
    if persisted {
        format!("Subscribed {name} to receive posts.")
    } else {
        format!(
            "Subscribed {name} to receive posts. \
             Warning: the subscription could not be saved and may not survive a restart."
        )
    }
}

fn unsubscribe_reply(name: &str, persisted: bool) -> String {
    if persisted {
        format!("Unsubscribed {name} from receiving posts.")
    } else {
        format!(
            "Unsubscribed {name} from receiving posts. \
             Warning: the change could not be saved and may not survive a restart."
        )
    }
}
