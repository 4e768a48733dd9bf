//! Finite State Machine for a stack deployment

/// Deployment state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployState {
    /// Rendering the stack definition, no session yet
    Rendering,

    /// Logging in
    Authenticating,

    /// Fetching the stack listing
    Listing,

    /// Looking up the target stack by name
    Resolving,

    /// Creating a new stack
    Creating,

    /// Updating the existing stack
    Updating,

    /// Logging out, entered from every state that holds a session
    Deauthenticating,

    /// Deployment succeeded
    Done,

    /// Deployment failed
    Failed,
}

impl DeployState {
    /// Whether a session is open in this state
    pub fn holds_session(&self) -> bool {
        matches!(
            self,
            DeployState::Listing
                | DeployState::Resolving
                | DeployState::Creating
                | DeployState::Updating
                | DeployState::Deauthenticating
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DeployState::Done | DeployState::Failed)
    }
}

/// Deployment event
#[derive(Debug, Clone)]
pub enum DeployEvent {
    /// Definition rendered (or intentionally absent)
    Rendered,

    /// Session obtained
    Authenticated,

    /// Stack listing fetched
    Listed,

    /// A stack with the target name exists
    ExistingStackFound,

    /// No stack with the target name exists
    NoExistingStack,

    /// Create or update call succeeded
    Deployed,

    /// Session released
    Released,

    /// A step failed
    Fail(String),
}

/// Deployment FSM
#[derive(Debug, Clone)]
pub struct DeployFsm {
    state: DeployState,
    error: Option<String>,
}

impl DeployFsm {
    /// Create a new FSM in rendering state
    pub fn new() -> Self {
        Self {
            state: DeployState::Rendering,
            error: None,
        }
    }

    /// Get current state
    pub fn state(&self) -> DeployState {
        self.state
    }

    /// Get error message if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Process an event and transition state
    pub fn process(&mut self, event: DeployEvent) -> Result<(), String> {
        let new_state = match (&self.state, &event) {
            (DeployState::Rendering, DeployEvent::Rendered) => DeployState::Authenticating,
            (DeployState::Authenticating, DeployEvent::Authenticated) => DeployState::Listing,
            (DeployState::Listing, DeployEvent::Listed) => DeployState::Resolving,
            (DeployState::Resolving, DeployEvent::ExistingStackFound) => DeployState::Updating,
            (DeployState::Resolving, DeployEvent::NoExistingStack) => DeployState::Creating,
            (DeployState::Creating | DeployState::Updating, DeployEvent::Deployed) => {
                DeployState::Deauthenticating
            }

            // Failures before login end the deployment, later ones still log out
            (DeployState::Rendering | DeployState::Authenticating, DeployEvent::Fail(err)) => {
                self.error = Some(err.clone());
                DeployState::Failed
            }
            (
                DeployState::Listing
                | DeployState::Resolving
                | DeployState::Creating
                | DeployState::Updating,
                DeployEvent::Fail(err),
            ) => {
                self.error = Some(err.clone());
                DeployState::Deauthenticating
            }

            (DeployState::Deauthenticating, DeployEvent::Released) => match self.error {
                Some(_) => DeployState::Failed,
                None => DeployState::Done,
            },

            // Invalid transitions
            (state, event) => {
                return Err(format!("Invalid transition: {:?} -> {:?}", state, event));
            }
        };

        self.state = new_state;
        Ok(())
    }
}

impl Default for DeployFsm {
    fn default() -> Self {
        Self::new()
    }
}
