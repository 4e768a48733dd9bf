//! Orchestrator unit tests

use std::sync::Mutex;

use async_trait::async_trait;

use portainer_deployer::authn::session::Session;
use portainer_deployer::deploy::definition::TemplateSource;
use portainer_deployer::deploy::fsm::DeployState;
use portainer_deployer::deploy::orchestrator::{DeployAction, DeployOrchestrator};
use portainer_deployer::errors::DeployError;
use portainer_deployer::filesys::file::File;
use portainer_deployer::models::request::{Credentials, DeployRequest, TemplateVariables};
use portainer_deployer::models::stack::{EnvVariable, NewStack, RemoteStack, StackKind, StackUpdate};
use portainer_deployer::portainer::SessionClient;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Authenticate(String),
    Deauthenticate,
    List,
    Create {
        kind: StackKind,
        method: String,
        endpoint_id: u64,
        name: String,
        definition: String,
        swarm_id: Option<String>,
    },
    Update {
        stack_id: u64,
        endpoint_id: u64,
        env: Option<Vec<EnvVariable>>,
        definition: Option<String>,
        prune: bool,
        pull_image: bool,
    },
}

#[derive(Default)]
struct MockClient {
    stacks: Vec<RemoteStack>,
    fail_auth: bool,
    fail_list: bool,
    fail_create: bool,
    fail_update: bool,
    calls: Mutex<Vec<Call>>,
}

impl MockClient {
    fn with_stacks(stacks: Vec<RemoteStack>) -> Self {
        Self {
            stacks,
            ..Default::default()
        }
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    fn deauth_count(&self) -> usize {
        self.count(|c| matches!(c, Call::Deauthenticate))
    }

    fn deploy_count(&self) -> usize {
        self.count(|c| matches!(c, Call::Create { .. } | Call::Update { .. }))
    }
}

#[async_trait]
impl SessionClient for MockClient {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session, DeployError> {
        self.record(Call::Authenticate(credentials.username.clone()));
        if self.fail_auth {
            return Err(DeployError::AuthError("401 Unauthorized: invalid credentials".to_string()));
        }
        Ok(Session::new("jwt-token"))
    }

    async fn deauthenticate(&self, _session: Session) {
        self.record(Call::Deauthenticate);
    }

    async fn list_stacks(&self, _session: &Session) -> Result<Vec<RemoteStack>, DeployError> {
        self.record(Call::List);
        if self.fail_list {
            return Err(DeployError::ApiError("503 Service Unavailable: ".to_string()));
        }
        Ok(self.stacks.clone())
    }

    async fn create_stack(&self, _session: &Session, stack: &NewStack<'_>) -> Result<(), DeployError> {
        self.record(Call::Create {
            kind: stack.kind,
            method: stack.method.to_string(),
            endpoint_id: stack.endpoint_id,
            name: stack.name.to_string(),
            definition: stack.definition.to_string(),
            swarm_id: stack.swarm_id.map(str::to_string),
        });
        if self.fail_create {
            return Err(DeployError::ApiError("409 Conflict: stack exists".to_string()));
        }
        Ok(())
    }

    async fn update_stack(&self, _session: &Session, update: &StackUpdate<'_>) -> Result<(), DeployError> {
        self.record(Call::Update {
            stack_id: update.stack_id,
            endpoint_id: update.endpoint_id,
            env: update.env.map(|env| env.to_vec()),
            definition: update.definition.map(str::to_string),
            prune: update.prune,
            pull_image: update.pull_image,
        });
        if self.fail_update {
            return Err(DeployError::ApiError("500 Internal Server Error: update failed".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug)]
struct InlineTemplate(&'static str);

#[async_trait]
impl TemplateSource for InlineTemplate {
    fn location(&self) -> String {
        "inline".to_string()
    }

    async fn read(&self) -> Result<String, DeployError> {
        Ok(self.0.to_string())
    }
}

fn env(name: &str, value: &str) -> EnvVariable {
    EnvVariable {
        name: name.to_string(),
        value: value.to_string(),
    }
}

fn remote_stack(id: u64, name: &str, endpoint_id: u64, env: Vec<EnvVariable>) -> RemoteStack {
    RemoteStack {
        id,
        name: name.to_string(),
        endpoint_id,
        env: Some(env),
    }
}

fn request(stack_name: &str) -> DeployRequest {
    DeployRequest::new(
        "https://portainer.local",
        Credentials::new("admin", "secret"),
        99,
        stack_name,
    )
}

#[tokio::test]
async fn test_existing_stack_is_updated_with_its_own_identity() {
    let client = MockClient::with_stacks(vec![
        remote_stack(1, "api", 3, vec![]),
        remote_stack(7, "web", 4, vec![env("DB_HOST", "db"), env("MODE", "prod")]),
    ]);
    let orchestrator = DeployOrchestrator::new(client);

    let mut req = request("web");
    req.template_source = Some(Box::new(InlineTemplate("image: app:old\n")));
    req.image = Some("app:new".to_string());

    let outcome = orchestrator.deploy(&req).await.unwrap();

    assert_eq!(outcome.action, DeployAction::Updated);
    assert_eq!(outcome.stack_id, Some(7));
    assert_eq!(
        orchestrator.client().calls(),
        vec![
            Call::Authenticate("admin".to_string()),
            Call::List,
            Call::Update {
                stack_id: 7,
                endpoint_id: 4,
                env: Some(vec![env("DB_HOST", "db"), env("MODE", "prod")]),
                definition: Some("image: app:new\n".to_string()),
                prune: false,
                pull_image: false,
            },
            Call::Deauthenticate,
        ]
    );
    assert_eq!(orchestrator.state().await, DeployState::Done);
}

#[tokio::test]
async fn test_update_without_definition() {
    let client = MockClient::with_stacks(vec![remote_stack(5, "web", 1, vec![])]);
    let orchestrator = DeployOrchestrator::new(client);

    let mut req = request("web");
    req.prune = true;
    req.pull_image = true;

    orchestrator.deploy(&req).await.unwrap();

    let calls = orchestrator.client().calls();
    assert!(calls.contains(&Call::Update {
        stack_id: 5,
        endpoint_id: 1,
        env: Some(vec![]),
        definition: None,
        prune: true,
        pull_image: true,
    }));
    assert_eq!(orchestrator.client().count(|c| matches!(c, Call::Create { .. })), 0);
}

#[tokio::test]
async fn test_update_keeps_missing_env_missing() {
    let mut stack = remote_stack(8, "web", 2, vec![]);
    stack.env = None;
    let orchestrator = DeployOrchestrator::new(MockClient::with_stacks(vec![stack]));

    orchestrator.deploy(&request("web")).await.unwrap();

    let calls = orchestrator.client().calls();
    assert!(calls.contains(&Call::Update {
        stack_id: 8,
        endpoint_id: 2,
        env: None,
        definition: None,
        prune: false,
        pull_image: false,
    }));
}

#[tokio::test]
async fn test_first_stack_with_duplicate_name_is_updated() {
    let client = MockClient::with_stacks(vec![
        remote_stack(11, "web", 1, vec![]),
        remote_stack(12, "web", 2, vec![]),
    ]);
    let orchestrator = DeployOrchestrator::new(client);

    let outcome = orchestrator.deploy(&request("web")).await.unwrap();

    assert_eq!(outcome.stack_id, Some(11));
    assert_eq!(orchestrator.client().deploy_count(), 1);
}

#[tokio::test]
async fn test_missing_definition_for_new_stack() {
    let client = MockClient::with_stacks(vec![remote_stack(1, "api", 1, vec![])]);
    let orchestrator = DeployOrchestrator::new(client);

    let result = orchestrator.deploy(&request("web")).await;

    assert!(matches!(result, Err(DeployError::MissingDefinition(ref name)) if name == "web"));
    assert_eq!(orchestrator.client().deploy_count(), 0);
    assert_eq!(orchestrator.client().deauth_count(), 1);
    assert_eq!(orchestrator.state().await, DeployState::Failed);
}

#[tokio::test]
async fn test_update_failure_still_logs_out_and_keeps_error() {
    let client = MockClient {
        stacks: vec![remote_stack(3, "web", 1, vec![])],
        fail_update: true,
        ..Default::default()
    };
    let orchestrator = DeployOrchestrator::new(client);

    let result = orchestrator.deploy(&request("web")).await;

    match result {
        Err(DeployError::ApiError(message)) => {
            assert_eq!(message, "500 Internal Server Error: update failed")
        }
        other => panic!("expected the update error, got {:?}", other),
    }
    assert_eq!(orchestrator.client().deauth_count(), 1);
    assert_eq!(orchestrator.client().calls().last(), Some(&Call::Deauthenticate));
    assert_eq!(orchestrator.state().await, DeployState::Failed);
    assert!(orchestrator.error().await.unwrap().contains("update failed"));
}

#[tokio::test]
async fn test_create_failure_still_logs_out() {
    let client = MockClient {
        fail_create: true,
        ..Default::default()
    };
    let orchestrator = DeployOrchestrator::new(client);

    let mut req = request("web");
    req.template_source = Some(Box::new(InlineTemplate("services: {}\n")));

    let result = orchestrator.deploy(&req).await;

    assert!(matches!(result, Err(DeployError::ApiError(ref m)) if m.starts_with("409")));
    assert_eq!(orchestrator.client().deauth_count(), 1);
}

#[tokio::test]
async fn test_list_failure_still_logs_out() {
    let client = MockClient {
        fail_list: true,
        ..Default::default()
    };
    let orchestrator = DeployOrchestrator::new(client);

    let result = orchestrator.deploy(&request("web")).await;

    assert!(matches!(result, Err(DeployError::ApiError(_))));
    assert_eq!(orchestrator.client().deploy_count(), 0);
    assert_eq!(orchestrator.client().deauth_count(), 1);
}

#[tokio::test]
async fn test_new_standalone_stack_end_to_end() {
    let client = MockClient::with_stacks(vec![remote_stack(1, "api", 1, vec![])]);
    let orchestrator = DeployOrchestrator::new(client);

    let mut req = request("web");
    req.template_source = Some(Box::new(InlineTemplate("image: app:old\n")));
    req.image = Some("app:new".to_string());

    let outcome = orchestrator.deploy(&req).await.unwrap();

    assert_eq!(outcome.action, DeployAction::Created);
    assert_eq!(outcome.stack_id, None);
    assert_eq!(
        orchestrator.client().calls(),
        vec![
            Call::Authenticate("admin".to_string()),
            Call::List,
            Call::Create {
                kind: StackKind::Standalone,
                method: "string".to_string(),
                endpoint_id: 99,
                name: "web".to_string(),
                definition: "image: app:new\n".to_string(),
                swarm_id: None,
            },
            Call::Deauthenticate,
        ]
    );
}

#[tokio::test]
async fn test_new_swarm_stack_with_template_variables() {
    let orchestrator = DeployOrchestrator::new(MockClient::default());

    let mut vars = TemplateVariables::new();
    vars.insert("replicas".to_string(), "3".to_string());

    let mut req = request("web");
    req.swarm_id = Some("swarm-abc".to_string());
    req.template_source = Some(Box::new(InlineTemplate("replicas: {{replicas}}\n")));
    req.template_variables = Some(vars);

    orchestrator.deploy(&req).await.unwrap();

    let created = orchestrator
        .client()
        .calls()
        .into_iter()
        .find(|c| matches!(c, Call::Create { .. }));
    assert_eq!(
        created,
        Some(Call::Create {
            kind: StackKind::Swarm,
            method: "string".to_string(),
            endpoint_id: 99,
            name: "web".to_string(),
            definition: "replicas: 3\n".to_string(),
            swarm_id: Some("swarm-abc".to_string()),
        })
    );
}

#[tokio::test]
async fn test_auth_failure_makes_no_further_calls() {
    let client = MockClient {
        fail_auth: true,
        ..Default::default()
    };
    let orchestrator = DeployOrchestrator::new(client);

    let result = orchestrator.deploy(&request("web")).await;

    assert!(matches!(result, Err(DeployError::AuthError(_))));
    assert_eq!(orchestrator.client().calls(), vec![Call::Authenticate("admin".to_string())]);
    assert_eq!(orchestrator.state().await, DeployState::Failed);
}

#[tokio::test]
async fn test_unreadable_definition_fails_before_login() {
    let orchestrator = DeployOrchestrator::new(MockClient::default());

    let mut req = request("web");
    req.template_source = Some(Box::new(File::new("/no/such/dir/stack.yml")));

    let result = orchestrator.deploy(&req).await;

    assert!(matches!(result, Err(DeployError::SourceNotFound(_))));
    assert!(orchestrator.client().calls().is_empty());
    assert_eq!(orchestrator.state().await, DeployState::Failed);
}

#[tokio::test]
async fn test_orchestrator_can_run_again() {
    let orchestrator = DeployOrchestrator::new(MockClient::with_stacks(vec![remote_stack(2, "web", 1, vec![])]));

    orchestrator.deploy(&request("api")).await.unwrap_err();
    assert_eq!(orchestrator.state().await, DeployState::Failed);

    orchestrator.deploy(&request("web")).await.unwrap();
    assert_eq!(orchestrator.state().await, DeployState::Done);
    assert!(orchestrator.error().await.is_none());
}
