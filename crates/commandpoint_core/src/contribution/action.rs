//! Invocable actions backed by command contributions.
//!
//! An action activates the owning extension through the `onCommand:<id>`
//! event and then dispatches the command by id. Both steps are awaited in
//! sequence; an activation failure ends the invocation without dispatch.

use crate::contribution::model::Command;
use async_trait::async_trait;
use log::{debug, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Prefix of the activation event fired before a command runs.
pub const ON_COMMAND_ACTIVATION_PREFIX: &str = "onCommand:";

/// Ordering hint placing contributed actions after every peer.
pub const RUN_LAST_ORDER: i32 = i32::MAX;

/// Ensures an activation event has fired and its extensions are ready.
#[async_trait]
pub trait ActivationTrigger: Send + Sync {
    async fn activate(&self, event: &str) -> Result<(), String>;
}

/// Executes a command by id with positional arguments.
#[async_trait]
pub trait CommandDispatcher: Send + Sync {
    async fn execute(&self, command_id: &str, args: Vec<Value>) -> Result<Value, String>;
}

/// Action wrapping one contributed command.
#[derive(Clone)]
pub struct CommandAction {
    command: Arc<Command>,
    activation: Arc<dyn ActivationTrigger>,
    dispatcher: Arc<dyn CommandDispatcher>,
    order: i32,
}

impl CommandAction {
    pub fn new(
        command: Arc<Command>,
        activation: Arc<dyn ActivationTrigger>,
        dispatcher: Arc<dyn CommandDispatcher>,
    ) -> Self {
        Self {
            command,
            activation,
            dispatcher,
            order: RUN_LAST_ORDER,
        }
    }

    pub fn id(&self) -> &str {
        &self.command.command
    }

    pub fn label(&self) -> &str {
        &self.command.title
    }

    pub fn category(&self) -> Option<&str> {
        self.command.category.as_deref()
    }

    pub fn order(&self) -> i32 {
        self.order
    }

    pub fn command(&self) -> &Arc<Command> {
        &self.command
    }

    pub fn activation_event(&self) -> String {
        format!("{ON_COMMAND_ACTIVATION_PREFIX}{}", self.command.command)
    }

    /// Activates the owning extension, then dispatches with `args`.
    ///
    /// # Errors
    /// - [`CommandActionError::Activation`] when activation fails; the
    ///   dispatcher is not called.
    /// - [`CommandActionError::Dispatch`] when the command itself fails.
    pub async fn run(&self, args: Vec<Value>) -> Result<Value, CommandActionError> {
        let event = self.activation_event();
        debug!(
            "event=action_activate module=contribution status=start command={} activation={}",
            self.id(),
            event
        );
        if let Err(message) = self.activation.activate(&event).await {
            warn!(
                "event=action_activate module=contribution status=error command={} activation={}",
                self.id(),
                event
            );
            return Err(CommandActionError::Activation { event, message });
        }

        debug!(
            "event=action_dispatch module=contribution status=start command={} args={}",
            self.id(),
            args.len()
        );
        self.dispatcher
            .execute(self.id(), args)
            .await
            .map_err(|message| {
                warn!(
                    "event=action_dispatch module=contribution status=error command={}",
                    self.id()
                );
                CommandActionError::Dispatch {
                    command: self.id().to_string(),
                    message,
                }
            })
    }
}

impl std::fmt::Debug for CommandAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandAction")
            .field("id", &self.id())
            .field("label", &self.label())
            .field("order", &self.order)
            .finish()
    }
}

/// Sorts peer actions by order, then label.
pub fn sort_actions(actions: &mut [CommandAction]) {
    actions.sort_by(|left, right| {
        left.order()
            .cmp(&right.order())
            .then_with(|| left.label().cmp(right.label()))
    });
}

/// Invocation failure, split by the stage that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandActionError {
    Activation { event: String, message: String },
    Dispatch { command: String, message: String },
}

impl Display for CommandActionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Activation { event, message } => {
                write!(f, "activation `{event}` failed: {message}")
            }
            Self::Dispatch { command, message } => {
                write!(f, "command `{command}` failed: {message}")
            }
        }
    }
}

impl Error for CommandActionError {}

#[cfg(test)]
mod tests {
    use super::{
        sort_actions, ActivationTrigger, CommandAction, CommandActionError, CommandDispatcher,
        RUN_LAST_ORDER,
    };
    use crate::contribution::model::Command;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Journal {
        entries: Mutex<Vec<String>>,
    }

    impl Journal {
        fn push(&self, entry: String) {
            self.entries.lock().expect("journal lock").push(entry);
        }

        fn entries(&self) -> Vec<String> {
            self.entries.lock().expect("journal lock").clone()
        }
    }

    struct RecordingActivation {
        journal: Arc<Journal>,
        fail: bool,
    }

    #[async_trait]
    impl ActivationTrigger for RecordingActivation {
        async fn activate(&self, event: &str) -> Result<(), String> {
            self.journal.push(format!("activate {event}"));
            if self.fail {
                Err("extension host crashed".to_string())
            } else {
                Ok(())
            }
        }
    }

    struct RecordingDispatcher {
        journal: Arc<Journal>,
        result: Result<Value, String>,
    }

    #[async_trait]
    impl CommandDispatcher for RecordingDispatcher {
        async fn execute(&self, command_id: &str, args: Vec<Value>) -> Result<Value, String> {
            self.journal
                .push(format!("execute {command_id} {}", Value::Array(args)));
            self.result.clone()
        }
    }

    fn action(
        id: &str,
        title: &str,
        fail_activation: bool,
        result: Result<Value, String>,
    ) -> (CommandAction, Arc<Journal>) {
        let journal = Arc::new(Journal::default());
        let action = CommandAction::new(
            Arc::new(Command::new(id, title)),
            Arc::new(RecordingActivation {
                journal: Arc::clone(&journal),
                fail: fail_activation,
            }),
            Arc::new(RecordingDispatcher {
                journal: Arc::clone(&journal),
                result,
            }),
        );
        (action, journal)
    }

    #[test]
    fn exposes_command_identity_and_run_last_order() {
        let (action, _) = action("ext.go", "Go", false, Ok(Value::Null));
        assert_eq!(action.id(), "ext.go");
        assert_eq!(action.label(), "Go");
        assert_eq!(action.category(), None);
        assert_eq!(action.order(), RUN_LAST_ORDER);
        assert_eq!(action.activation_event(), "onCommand:ext.go");
    }

    #[tokio::test]
    async fn activates_before_dispatching_with_arguments() {
        let (action, journal) = action("ext.go", "Go", false, Ok(json!("done")));

        let result = action
            .run(vec![json!(1), json!("two")])
            .await
            .expect("invocation should succeed");

        assert_eq!(result, json!("done"));
        assert_eq!(
            journal.entries(),
            vec![
                "activate onCommand:ext.go".to_string(),
                "execute ext.go [1,\"two\"]".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn activation_failure_skips_dispatch() {
        let (action, journal) = action("ext.go", "Go", true, Ok(Value::Null));

        let err = action.run(vec![]).await.expect_err("activation must fail");

        assert_eq!(
            err,
            CommandActionError::Activation {
                event: "onCommand:ext.go".to_string(),
                message: "extension host crashed".to_string(),
            }
        );
        assert_eq!(journal.entries(), vec!["activate onCommand:ext.go".to_string()]);
    }

    #[tokio::test]
    async fn dispatch_failure_is_reported_as_dispatch() {
        let (action, _) = action("ext.go", "Go", false, Err("boom".to_string()));

        let err = action.run(vec![]).await.expect_err("dispatch must fail");

        assert!(matches!(err, CommandActionError::Dispatch { ref command, .. } if command == "ext.go"));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn sort_keeps_contributed_actions_ordered_by_label() {
        let (zeta, _) = action("ext.z", "Zeta", false, Ok(Value::Null));
        let (alpha, _) = action("ext.a", "Alpha", false, Ok(Value::Null));
        let mut actions = vec![zeta, alpha];

        sort_actions(&mut actions);

        let labels: Vec<&str> = actions.iter().map(CommandAction::label).collect();
        assert_eq!(labels, vec!["Alpha", "Zeta"]);
    }
}
