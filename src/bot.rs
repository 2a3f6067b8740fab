//! Bot module wiring Matrix to the rank-management commands.
//!
//! The [`Bot`] owns the Matrix client and the command [`Dispatcher`]. Every
//! incoming text message is handled in its own task:
//!
//! ```text
//! Matrix Message → parse → dispatch → Reply → Matrix reply
//! ```
//!
//! Messages that are not commands for the bot are dropped without answer.
//! Every command gets exactly one reply.

use std::{path::Path, sync::Arc};

use log::{info, warn};

use crate::{
    commands::{CommandParseError, Dispatcher},
    config::Config,
    matrix::{IncomingMessage, MatrixClient, UserCredentials},
    roblox::{GroupApi, RobloxRequester},
};

/// Matrix bot answering rank-management commands for one Roblox group.
pub struct Bot {
    matrix_client: Arc<MatrixClient>,
    dispatcher: Arc<Dispatcher<RobloxRequester>>,
}

impl Bot {
    /// Connects to Matrix and prepares the dispatcher for the configured group.
    ///
    /// The Roblox account is checked once at startup. A failure there is only
    /// logged, since commands report their own errors.
    pub async fn new(config: Config, data_dir: &Path) -> Result<Self, anyhow::Error> {
        let requester = RobloxRequester::new(
            &config.roblox.users_url,
            &config.roblox.groups_url,
            &config.roblox.cookie,
        );

        match requester.authenticated_user().await {
            Ok(user) => info!(
                "managing group {} as {} ({})",
                config.roblox.group_id, user.name, user.id
            ),
            Err(err) => warn!("could not check the roblox account: {}", err),
        }

        let matrix_client = Arc::new(
            MatrixClient::new(
                &UserCredentials {
                    user_id: config.matrix.user_id,
                    password: config.matrix.password,
                    passphrase: config.matrix.passphrase,
                },
                data_dir,
            )
            .await?,
        );

        let dispatcher = Arc::new(Dispatcher::new(
            &config.bot.prefix,
            requester,
            config.roblox.group_id,
        ));

        Ok(Bot {
            matrix_client,
            dispatcher,
        })
    }

    /// Handles messages until the Matrix sync stops.
    pub async fn start(self) {
        let matrix_client = Arc::clone(&self.matrix_client);
        let dispatcher = Arc::clone(&self.dispatcher);

        let on_message = move |message: IncomingMessage| {
            Self::handle_matrix_message(
                message,
                Arc::clone(&matrix_client),
                Arc::clone(&dispatcher),
            )
        };

        self.matrix_client.sync(on_message).await;
    }

    fn handle_matrix_message(
        message: IncomingMessage,
        matrix_client: Arc<MatrixClient>,
        dispatcher: Arc<Dispatcher<RobloxRequester>>,
    ) {
        tokio::spawn(async move {
            let reply = match dispatcher.parse(&message.body) {
                Ok(command) => {
                    info!("{} sent {:?} in {}", message.sender, command, message.room_id);
                    dispatcher.dispatch(&command).await
                }
                Err(CommandParseError::NotForBot) => return,
                Err(CommandParseError::InvalidCommand(reply)) => reply,
            };

            matrix_client.send_reply(&message, &reply).await;
        });
    }
}
