//! Matrix client wrapper for bot messaging and synchronization.
//!
//! [`MatrixClient`] wraps the SDK client: it logs in (or restores the stored
//! session), forwards incoming text messages and sends command replies.

use std::path::Path;

use anyhow::Result;
use log::{debug, error, info, warn};
use matrix_sdk::{
    Client,
    ruma::events::room::message::{
        AddMentions, ForwardThread, ReplyMetadata, RoomMessageEventContent,
    },
};

use crate::{
    commands::Reply,
    matrix::{
        IncomingMessage, UserCredentials, login::connect, session::SessionStore, sync::MatrixSync,
    },
};

const DISPLAY_NAME: &str = "Ranker";

pub struct MatrixClient {
    matrix_sync: MatrixSync,
    client: Client,
}

impl MatrixClient {
    /// Logs in, or restores the session stored in `data_dir`.
    pub async fn new(credentials: &UserCredentials, data_dir: &Path) -> Result<Self> {
        let store = SessionStore::open(data_dir).await?;
        let client = connect(credentials, &store).await?;

        if let Err(err) = client.account().set_display_name(Some(DISPLAY_NAME)).await {
            warn!("failed to set display name: {:?}", err);
        }

        let matrix_sync = MatrixSync::new(&client, &store);

        Ok(MatrixClient {
            matrix_sync,
            client,
        })
    }

    /// Syncs until the connection is lost for good.
    pub async fn sync<F>(&self, on_message: F)
    where
        F: Fn(IncomingMessage) + Send + Sync + 'static,
    {
        match self.matrix_sync.sync(on_message).await {
            Ok(_) => info!("matrix sync ended successfully"),
            Err(e) => error!("matrix sync ended with error: {:?}", e),
        }
    }

    /// Sends `reply` as an answer to `message`.
    ///
    /// Matrix has no ephemeral messages: ephemeral replies are sent as notices
    /// mentioning the sender, public replies as regular text messages.
    pub async fn send_reply(&self, message: &IncomingMessage, reply: &Reply) {
        let markdown = render_reply(reply);
        debug!("reply to {}: {}", message.event_id, markdown);

        let (content, add_mentions) = if reply.ephemeral {
            (RoomMessageEventContent::notice_markdown(markdown), AddMentions::Yes)
        } else {
            (RoomMessageEventContent::text_markdown(markdown), AddMentions::No)
        };
        let content = content.make_reply_to(
            ReplyMetadata::new(&message.event_id, &message.sender, None),
            ForwardThread::No,
            add_mentions,
        );

        let Some(room) = self.client.get_room(&message.room_id) else {
            error!("room {} is unknown, reply dropped", message.room_id);
            return;
        };

        if let Err(e) = room.send(content).await {
            error!("failed to send reply in {}: {:?}", message.room_id, e);
        }
    }
}

/// Renders a reply as Markdown.
///
/// The title is bold and colored with the `data-mx-color` attribute supported
/// by Matrix clients, the timestamp is appended in small print.
pub fn render_reply(reply: &Reply) -> String {
    let mut markdown = String::new();

    if let Some(title) = &reply.title {
        markdown.push_str(&format!(
            "<font data-mx-color=\"#{:06x}\">**{}**</font>\n\n",
            reply.color, title
        ));
    }

    markdown.push_str(&reply.description);
    markdown.push_str(&format!(
        "\n\n<sub>{}</sub>",
        reply.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    markdown
}
