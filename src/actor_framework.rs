use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument, warn};

// =============================================================================
// 1. THE ABSTRACTION (Entity trait, hooks, actions)
// =============================================================================

/// Failures produced by the actor plumbing itself rather than by an entity.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped the response")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
}

/// Trait that any record must implement to be managed by [`ResourceActor`].
///
/// Each entity brings its own error type; plumbing failures are folded into it
/// through `From<FrameworkError>` so callers only ever match one enum.
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;
    type CreateParams: Send + Sync + Debug;
    type Patch: Send + Sync + Debug;
    type Action: Send + Sync + Debug;
    type ActionResult: Send + Sync + Debug;
    type Error: std::error::Error + Clone + Send + Sync + From<FrameworkError> + 'static;

    fn id(&self) -> &Self::Id;

    /// Construct the full entity from the generated ID and creation params.
    fn from_create_params(id: Self::Id, params: Self::CreateParams) -> Result<Self, Self::Error>;

    fn on_update(&mut self, patch: Self::Patch) -> Result<(), Self::Error>;

    /// Handle a domain-specific action. A rejected action must leave the
    /// entity untouched.
    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, Self::Error>;
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T, E> = oneshot::Sender<Result<T, E>>;

#[derive(Debug)]
pub enum ResourceRequest<T: Entity> {
    Create {
        params: T::CreateParams,
        respond_to: Response<T::Id, T::Error>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>, T::Error>,
    },
    List {
        respond_to: Response<Vec<T>, T::Error>,
    },
    Update {
        id: T::Id,
        patch: T::Patch,
        respond_to: Response<T, T::Error>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult, T::Error>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
}

impl<T: Entity> ResourceActor<T> {
    pub fn new(
        buffer_size: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_id_fn: Box::new(next_id_fn),
        };
        (actor, ResourceClient::new(sender))
    }

    /// Runs until every client has been dropped.
    #[instrument(name = "resource_actor", skip(self), fields(entity = std::any::type_name::<T>()))]
    pub async fn run(mut self) {
        debug!("Resource actor starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    let id = (self.next_id_fn)();
                    let result = T::from_create_params(id, params).map(|item| {
                        let id = item.id().clone();
                        self.store.insert(id.clone(), item);
                        id
                    });
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Get { id, respond_to } => {
                    let _ = respond_to.send(Ok(self.store.get(&id).cloned()));
                }
                ResourceRequest::List { respond_to } => {
                    let _ = respond_to.send(Ok(self.store.values().cloned().collect()));
                }
                ResourceRequest::Update { id, patch, respond_to } => {
                    let result = match self.store.get_mut(&id) {
                        Some(item) => item.on_update(patch).map(|_| item.clone()),
                        None => Err(FrameworkError::NotFound(id.to_string()).into()),
                    };
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Action { id, action, respond_to } => {
                    let result = match self.store.get_mut(&id) {
                        Some(item) => item.handle_action(action),
                        None => {
                            warn!(item_id = %id, "Action on unknown item");
                            Err(FrameworkError::NotFound(id.to_string()).into())
                        }
                    };
                    let _ = respond_to.send(result);
                }
            }
        }
        debug!("Resource actor stopped");
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

// Manual impl: `T` itself need not be `Clone`-bounded through the derive.
impl<T: Entity> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self { sender: self.sender.clone() }
    }
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R, T::Error>) -> ResourceRequest<T>,
    ) -> Result<R, T::Error> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| T::Error::from(FrameworkError::ActorClosed))?;
        response
            .await
            .map_err(|_| T::Error::from(FrameworkError::ActorDropped))?
    }

    pub async fn create(&self, params: T::CreateParams) -> Result<T::Id, T::Error> {
        self.request(|respond_to| ResourceRequest::Create { params, respond_to }).await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, T::Error> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to }).await
    }

    pub async fn list(&self) -> Result<Vec<T>, T::Error> {
        self.request(|respond_to| ResourceRequest::List { respond_to }).await
    }

    pub async fn update(&self, id: T::Id, patch: T::Patch) -> Result<T, T::Error> {
        self.request(|respond_to| ResourceRequest::Update { id, patch, respond_to }).await
    }

    pub async fn perform_action(&self, id: T::Id, action: T::Action) -> Result<T::ActionResult, T::Error> {
        self.request(|respond_to| ResourceRequest::Action { id, action, respond_to }).await
    }
}

// =============================================================================
// 5. TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Debug, PartialEq)]
    struct Jar {
        id: String,
        label: String,
        grams: u32,
    }

    #[derive(Debug, Clone, Error, PartialEq)]
    enum JarError {
        #[error("framework: {0}")]
        Framework(#[from] FrameworkError),
        #[error("jar has only {0}g")]
        TooLittle(u32),
    }

    #[derive(Debug)]
    enum JarAction {
        Scoop(u32),
    }

    impl Entity for Jar {
        type Id = String;
        type CreateParams = (String, u32);
        type Patch = String;
        type Action = JarAction;
        type ActionResult = u32;
        type Error = JarError;

        fn id(&self) -> &String {
            &self.id
        }

        fn from_create_params(id: String, (label, grams): (String, u32)) -> Result<Self, JarError> {
            Ok(Self { id, label, grams })
        }

        fn on_update(&mut self, label: String) -> Result<(), JarError> {
            self.label = label;
            Ok(())
        }

        fn handle_action(&mut self, action: JarAction) -> Result<u32, JarError> {
            match action {
                JarAction::Scoop(grams) if grams > self.grams => Err(JarError::TooLittle(self.grams)),
                JarAction::Scoop(grams) => {
                    self.grams -= grams;
                    Ok(self.grams)
                }
            }
        }
    }

    fn spawn_jar_actor() -> ResourceClient<Jar> {
        let counter = Arc::new(AtomicU64::new(1));
        let next_id = move || format!("jar_{}", counter.fetch_add(1, Ordering::SeqCst));
        let (actor, client) = ResourceActor::new(10, next_id);
        tokio::spawn(actor.run());
        client
    }

    #[tokio::test]
    async fn test_actions_mutate_and_reject_without_side_effects() {
        let client = spawn_jar_actor();
        let id = client.create(("honey".into(), 500)).await.unwrap();
        assert_eq!(id, "jar_1");

        assert_eq!(client.perform_action(id.clone(), JarAction::Scoop(200)).await, Ok(300));
        assert_eq!(
            client.perform_action(id.clone(), JarAction::Scoop(301)).await,
            Err(JarError::TooLittle(300))
        );

        let jar = client.get(id.clone()).await.unwrap().unwrap();
        assert_eq!(jar.grams, 300);
        assert_eq!(jar.id(), &id);
    }

    #[tokio::test]
    async fn test_created_entities_are_stored_under_their_own_id() {
        let client = spawn_jar_actor();
        let honey = client.create(("honey".into(), 500)).await.unwrap();
        let jam = client.create(("jam".into(), 250)).await.unwrap();

        let relabelled = client.update(jam.clone(), "apricot jam".into()).await.unwrap();
        assert_eq!(relabelled.id(), &jam);
        assert_eq!(relabelled.label, "apricot jam");

        let mut ids: Vec<String> = client.list().await.unwrap().into_iter().map(|j| j.id).collect();
        ids.sort();
        assert_eq!(ids, vec![honey, jam]);
    }

    #[tokio::test]
    async fn test_unknown_id_maps_to_not_found() {
        let client = spawn_jar_actor();
        let result = client.perform_action("jar_42".into(), JarAction::Scoop(1)).await;
        assert_eq!(result, Err(JarError::Framework(FrameworkError::NotFound("jar_42".into()))));

        let result = client.update("jar_42".into(), "oats".into()).await;
        assert!(matches!(result, Err(JarError::Framework(FrameworkError::NotFound(_)))));
    }

    #[tokio::test]
    async fn test_closed_actor_reports_communication_error() {
        let (actor, client) = ResourceActor::<Jar>::new(1, || "jar".to_string());
        drop(actor);
        let result = client.list().await;
        assert_eq!(result, Err(JarError::Framework(FrameworkError::ActorClosed)));
    }
}
