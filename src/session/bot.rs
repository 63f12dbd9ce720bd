//! Bot game session context
//!
//! One isolated instance per bot game window. Combines the
//! [`InteractiveGameController`] with the [`SessionLifecycleController`]
//! behind a single command/read surface:
//!
//! - Player commands go straight to the controller and are validated there
//! - Lifecycle commands (create, reconnect, forfeit, close) issue async
//!   requests; replies are applied in [`BotSessionContext::update`]
//!
//! # Reply Handling
//!
//! | Reply                        | Effect                                 |
//! |------------------------------|----------------------------------------|
//! | create → record              | load the new game                      |
//! | reconnect → record           | replay stored moves, load on success   |
//! | reconnect → none             | back to idle, or create when mounting  |
//! | forfeit / close → done       | clear the game if it's still the same  |
//! | forfeit / close → not found  | done, if that game is no longer loaded |
//! | any → service error          | action fails, local state untouched    |

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::game::controller::{ClickOutcome, DropOutcome, InteractiveGameController};
use crate::game::error::ValidationError;
use crate::game::resources::HelpTier;
use crate::game::rules::RuleEngine;
use crate::game::types::{PieceKind, Square};
use crate::networking::lifecycle::{
    LifecycleAction, LifecycleReply, LifecycleStatus, SessionLifecycleController,
};
use crate::networking::service::{ServiceError, ServiceResult, SessionConfig, SessionService};

/// Notice shown after a successful reconnect
pub const RECONNECTED_MESSAGE: &str = "Reconnected to your game.";

/// Session context for games against the bot
pub struct BotSessionContext {
    user_id: String,
    service: Arc<dyn SessionService>,
    controller: InteractiveGameController,
    lifecycle: SessionLifecycleController,
    default_config: SessionConfig,
    create_if_missing: bool,
}

impl BotSessionContext {
    pub fn new(
        user_id: impl Into<String>,
        engine: Arc<dyn RuleEngine>,
        service: Arc<dyn SessionService>,
        default_config: SessionConfig,
    ) -> Self {
        let controller = InteractiveGameController::new(engine, Arc::clone(&service));
        Self::with_controller(user_id, service, controller, default_config)
    }

    /// Build around a preconfigured controller (e.g. a deterministic mover)
    pub fn with_controller(
        user_id: impl Into<String>,
        service: Arc<dyn SessionService>,
        mut controller: InteractiveGameController,
        default_config: SessionConfig,
    ) -> Self {
        // no game is loaded yet, so the tier change can't be refused
        let _ = controller.set_tier(default_config.help_tier);
        Self {
            user_id: user_id.into(),
            service,
            controller,
            lifecycle: SessionLifecycleController::new(),
            default_config,
            create_if_missing: false,
        }
    }

    /// Create a new game with the default configuration
    pub fn create(&mut self) {
        self.create_with(self.default_config);
    }

    /// Create a new game with `config`
    pub fn create_with(&mut self, config: SessionConfig) {
        let service = Arc::clone(&self.service);
        let user_id = self.user_id.clone();
        self.lifecycle.issue(LifecycleAction::Create, async move {
            service
                .create_session(&user_id, config)
                .await
                .map(LifecycleReply::Created)
        });
    }

    /// Resume the player's unfinished game, or start a new one if there is none
    pub fn mount(&mut self) {
        if self.reconnect().is_ok() {
            self.create_if_missing = true;
        }
    }

    /// Look for an unfinished game on the backend and resume it
    ///
    /// Refused while a game is in progress.
    pub fn reconnect(&mut self) -> Result<(), ValidationError> {
        if self.controller.is_in_progress() {
            self.controller
                .set_message(ValidationError::GameInProgress.to_string());
            return Err(ValidationError::GameInProgress);
        }
        self.create_if_missing = false;
        let service = Arc::clone(&self.service);
        let user_id = self.user_id.clone();
        self.lifecycle.issue(LifecycleAction::Reconnect, async move {
            service
                .active_session(&user_id)
                .await
                .map(LifecycleReply::Active)
        });
        Ok(())
    }

    /// Concede the current game
    pub fn forfeit(&mut self) -> Result<(), ValidationError> {
        let Some(session_id) = self.controller.session_id() else {
            self.controller
                .set_message(ValidationError::NoActiveSession.to_string());
            return Err(ValidationError::NoActiveSession);
        };
        let service = Arc::clone(&self.service);
        self.lifecycle.issue(LifecycleAction::Forfeit, async move {
            service
                .forfeit(session_id)
                .await
                .map(|()| LifecycleReply::Terminated(session_id))
        });
        Ok(())
    }

    /// Close the current game without a result
    pub fn close(&mut self) -> Result<(), ValidationError> {
        let Some(session_id) = self.controller.session_id() else {
            self.controller
                .set_message(ValidationError::NoActiveSession.to_string());
            return Err(ValidationError::NoActiveSession);
        };
        let service = Arc::clone(&self.service);
        self.lifecycle.issue(LifecycleAction::Close, async move {
            service
                .close(session_id)
                .await
                .map(|()| LifecycleReply::Terminated(session_id))
        });
        Ok(())
    }

    /// Clear the status of `action`
    pub fn dismiss(&mut self, action: LifecycleAction) {
        self.lifecycle.dismiss(action);
    }

    pub fn on_drop(&mut self, from: Square, to: Square) -> Result<DropOutcome, ValidationError> {
        self.controller.on_drop(from, to)
    }

    pub fn on_promotion_select(&mut self, kind: PieceKind) -> Result<DropOutcome, ValidationError> {
        self.controller.on_promotion_select(kind)
    }

    pub fn cancel_promotion(&mut self) {
        self.controller.cancel_promotion();
    }

    pub fn on_square_click(&mut self, square: Square) -> Result<ClickOutcome, ValidationError> {
        self.controller.on_square_click(square)
    }

    pub fn undo_previous_move(&mut self) -> Result<(), ValidationError> {
        self.controller.undo_previous_move()
    }

    pub fn request_hint(&mut self) -> Result<(), ValidationError> {
        self.controller.request_hint()
    }

    /// Change the help tier used for the next game
    ///
    /// Refused while a game is in progress.
    pub fn set_tier(&mut self, tier: HelpTier) -> Result<(), ValidationError> {
        self.controller.set_tier(tier)?;
        self.default_config.help_tier = tier;
        Ok(())
    }

    /// Advance one frame and apply finished lifecycle requests
    pub fn update(&mut self, delta: Duration) -> bool {
        let mut changed = self.controller.update(delta);
        for (action, result) in self.lifecycle.poll() {
            changed |= self.apply_reply(action, result);
        }
        changed
    }

    fn apply_reply(&mut self, action: LifecycleAction, result: ServiceResult<LifecycleReply>) -> bool {
        if action == LifecycleAction::Reconnect {
            let create = std::mem::take(&mut self.create_if_missing);
            if create && matches!(result, Ok(LifecycleReply::Active(None))) {
                info!("[SESSION] No active game to resume, starting a new one");
                self.lifecycle.dismiss(action);
                self.create();
                return false;
            }
        }

        let reply = match result {
            Ok(reply) => reply,
            Err(ServiceError::SessionNotFound(id))
                if matches!(action, LifecycleAction::Forfeit | LifecycleAction::Close)
                    && self.controller.session_id() != Some(id) =>
            {
                debug!("[SESSION] {} of {} found it already gone", action, id);
                LifecycleReply::Terminated(id)
            }
            Err(e) => {
                self.lifecycle.fail(action, e.to_string());
                return false;
            }
        };

        match (action, reply) {
            (LifecycleAction::Create, LifecycleReply::Created(record)) => {
                match self.controller.begin(&record) {
                    Ok(()) => {
                        self.lifecycle.succeed(action, "New game started.");
                        true
                    }
                    Err(e) => {
                        self.lifecycle.fail(action, e.to_string());
                        false
                    }
                }
            }
            (LifecycleAction::Reconnect, LifecycleReply::Active(Some(record))) => {
                match self.controller.begin(&record) {
                    Ok(()) => {
                        self.lifecycle.succeed(action, RECONNECTED_MESSAGE);
                        true
                    }
                    Err(e) => {
                        self.lifecycle.fail(action, e.to_string());
                        false
                    }
                }
            }
            (LifecycleAction::Reconnect, LifecycleReply::Active(None)) => {
                info!("[SESSION] No active game to reconnect to");
                self.lifecycle.dismiss(action);
                false
            }
            (LifecycleAction::Forfeit | LifecycleAction::Close, LifecycleReply::Terminated(id)) => {
                let message = if action == LifecycleAction::Forfeit {
                    "Game forfeited."
                } else {
                    "Game closed."
                };
                if self.controller.session_id() == Some(id) {
                    self.controller.end();
                } else {
                    debug!("[SESSION] {} of {} no longer matches the loaded game", action, id);
                }
                self.lifecycle.succeed(action, message);
                true
            }
            (action, reply) => {
                self.lifecycle
                    .fail(action, format!("Unexpected reply to {}: {:?}", action, reply));
                false
            }
        }
    }

    pub fn controller(&self) -> &InteractiveGameController {
        &self.controller
    }

    pub fn status(&self, action: LifecycleAction) -> &LifecycleStatus {
        self.lifecycle.status(action)
    }

    pub fn is_busy(&self) -> bool {
        self.lifecycle.is_busy()
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn default_config(&self) -> SessionConfig {
        self.default_config
    }

    /// Latest message for the player: lifecycle error first, then game text
    pub fn message(&self) -> Option<&str> {
        LifecycleAction::ALL
            .iter()
            .find_map(|&action| self.lifecycle.status(action).error())
            .or_else(|| self.controller.message())
    }
}
