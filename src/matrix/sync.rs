//! Matrix client synchronization and event handling.
//!
//! [`MatrixSync::sync`]:
//! 1. Catches up with the events received while the bot was offline, joining
//!    pending invites but not answering old commands
//! 2. Registers the handler forwarding new text messages
//! 3. Enters the sync loop, persisting the sync token after each response

use std::sync::Arc;

use anyhow::Result;
use log::{error, info, warn};
use matrix_sdk::{
    Client, LoopCtrl, Room, RoomState,
    config::SyncSettings,
    ruma::{
        RoomId, UserId,
        api::client::filter::FilterDefinition,
        events::room::{
            member::StrippedRoomMemberEvent,
            message::{MessageType, OriginalSyncRoomMessageEvent},
        },
    },
};
use tokio::time::{Duration, sleep};

use crate::matrix::{IncomingMessage, session::SessionStore};

/// Give up joining a room once the retry delay exceeds an hour.
const MAX_JOIN_DELAY_SECS: u64 = 3600;

pub struct MatrixSync {
    client: Client,
    store: SessionStore,
}

impl MatrixSync {
    pub fn new(client: &Client, store: &SessionStore) -> Self {
        MatrixSync {
            client: client.clone(),
            store: store.clone(),
        }
    }

    /// Syncs forever, calling `on_message` for every new text message.
    pub async fn sync<F>(&self, on_message: F) -> Result<()>
    where
        F: Fn(IncomingMessage) + Send + Sync + 'static,
    {
        info!("start syncing");

        self.client.add_event_handler(auto_join_rooms);

        // See <https://spec.matrix.org/v1.6/client-server-api/#lazy-loading-room-members>
        let filter = FilterDefinition::with_lazy_loading();
        let mut sync_settings = SyncSettings::default().filter(filter.into());
        if let Some(sync_token) = self.store.sync_token() {
            sync_settings = sync_settings.token(sync_token);
        }

        // Catch up without the message handler
        let next_batch = loop {
            match self.client.sync_once(sync_settings.clone()).await {
                Ok(response) => break response.next_batch,
                Err(err) => {
                    error!("initial sync failed, retrying: {}", err);
                    sleep(Duration::from_secs(5)).await;
                }
            }
        };
        self.persist_sync_token(&next_batch).await;

        let on_message = Arc::new(on_message);
        self.client.add_event_handler(
            move |event: OriginalSyncRoomMessageEvent, room: Room, client: Client| {
                let on_message = Arc::clone(&on_message);
                async move { on_room_message(event, room, client, &on_message) }
            },
        );

        sync_settings = sync_settings.token(next_batch);
        self.client
            .sync_with_result_callback(sync_settings, |sync_result| async move {
                let response = sync_result?;
                self.persist_sync_token(&response.next_batch).await;
                Ok(LoopCtrl::Continue)
            })
            .await?;

        Ok(())
    }

    async fn persist_sync_token(&self, sync_token: &str) {
        if let Err(err) = self.store.save_sync_token(sync_token).await {
            error!("failed to persist sync token: {:?}", err);
        }
    }
}

async fn auto_join_rooms(room_member: StrippedRoomMemberEvent, client: Client, room: Room) {
    let Some(user_id) = client.user_id() else {
        warn!("could not get user id from client");
        return;
    };

    if room_member.state_key != user_id {
        return;
    }

    tokio::spawn(async move {
        info!("auto joining room {}", room.room_id());
        let mut delay = 2;

        // Synapse may send the invite before the room can be joined
        while let Err(err) = room.join().await {
            error!(
                "failed to join room {} ({err:?}), retrying in {delay}s",
                room.room_id()
            );

            sleep(Duration::from_secs(delay)).await;
            delay *= 2;

            if delay > MAX_JOIN_DELAY_SECS {
                error!("can't join room {} ({err:?})", room.room_id());
                return;
            }
        }
        info!("joined room {}", room.room_id());
    });
}

fn on_room_message<F>(
    event: OriginalSyncRoomMessageEvent,
    room: Room,
    client: Client,
    on_message: &Arc<F>,
) where
    F: Fn(IncomingMessage),
{
    if room.state() != RoomState::Joined {
        return;
    }

    forward_message(event, room.room_id(), client.user_id(), on_message);
}

/// Calls `on_message` for text messages not sent by the bot itself.
fn forward_message<F>(
    event: OriginalSyncRoomMessageEvent,
    room_id: &RoomId,
    own_user_id: Option<&UserId>,
    on_message: &Arc<F>,
) where
    F: Fn(IncomingMessage),
{
    if own_user_id == Some(&*event.sender) {
        return;
    }

    let MessageType::Text(text_content) = event.content.msgtype else {
        return;
    };

    on_message(IncomingMessage {
        body: text_content.body,
        room_id: room_id.to_owned(),
        sender: event.sender,
        event_id: event.event_id,
    });
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use matrix_sdk::ruma::{room_id, user_id};
    use serde_json::json;

    use super::*;

    fn message_event(sender: &str, msgtype: &str, body: &str) -> OriginalSyncRoomMessageEvent {
        serde_json::from_value(json!({
            "type": "m.room.message",
            "event_id": "$event:example.com",
            "sender": sender,
            "origin_server_ts": 1_700_000_000_000u64,
            "content": { "msgtype": msgtype, "body": body },
        }))
        .unwrap()
    }

    /// Handler shared the same way as in [`MatrixSync::sync`], collecting the messages.
    fn collecting_handler() -> (
        Arc<impl Fn(IncomingMessage)>,
        Arc<Mutex<Vec<IncomingMessage>>>,
    ) {
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        let on_message = Arc::new(move |message: IncomingMessage| {
            sink.lock().unwrap().push(message);
        });
        (on_message, received)
    }

    #[test]
    fn test_forward_text_message() {
        let (on_message, received) = collecting_handler();
        let event = message_event("@alice:example.com", "m.text", "!ranker promote bob");

        forward_message(
            event,
            room_id!("!room:example.com"),
            Some(user_id!("@ranker:example.com")),
            &on_message,
        );

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].body, "!ranker promote bob");
        assert_eq!(received[0].room_id, "!room:example.com");
        assert_eq!(received[0].sender, "@alice:example.com");
        assert_eq!(received[0].event_id, "$event:example.com");
    }

    #[test]
    fn test_own_messages_are_not_forwarded() {
        let (on_message, received) = collecting_handler();
        let event = message_event("@ranker:example.com", "m.text", "!ranker help");

        forward_message(
            event,
            room_id!("!room:example.com"),
            Some(user_id!("@ranker:example.com")),
            &on_message,
        );

        assert!(received.lock().unwrap().is_empty());
    }

    #[test]
    fn test_notices_are_not_forwarded() {
        let (on_message, received) = collecting_handler();
        let event = message_event("@alice:example.com", "m.notice", "!ranker help");

        forward_message(event, room_id!("!room:example.com"), None, &on_message);

        assert!(received.lock().unwrap().is_empty());
    }
}
