//! # Generic Actor Server
//!
//! `ResourceActor` owns the in-memory store for one entity type and processes requests
//! sequentially, so every hook runs with exclusive access to the store.

use crate::framework::client::ResourceClient;
use crate::framework::entity::ActorEntity;
use crate::framework::error::FrameworkError;
use crate::framework::message::ResourceRequest;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that manages a collection of entities.
///
/// This struct is the "server" half of the actor. It owns the state (`store`) and the
/// receiver end of the channel. Each actor processes its own messages one at a time, which
/// is what makes conditional writes (check status, then write) safe without a lock.
///
/// # Usage Pattern
///
/// 1.  **Create**: call `ResourceActor::new()` to get the actor and its client.
/// 2.  **Wire**: pass dependencies into `actor.run(context)`.
/// 3.  **Run**: spawn the run loop on a background task.
///
/// # Operations
///
/// * **Create**: allocates the next `u32` id, builds the entity via
///   `T::from_create_params`, runs `on_create`, then inserts.
/// * **Get**: returns a clone of the entity, or `None`.
/// * **List**: returns clones of every entity whose `matches(query)` is true.
/// * **Update**: runs `on_update` against the stored entity and returns the new state.
/// * **Delete**: runs `on_delete`, then removes the entity.
/// * **Action**: runs `handle_action` against the stored entity.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    next_id: u32,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// `buffer_size` is the capacity of the request channel; callers wait when it is full.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_id: 1,
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    /// Runs the actor's event loop, processing messages until every client is dropped.
    ///
    /// The `context` argument is injected into every entity hook.
    pub async fn run(mut self, context: T::Context) {
        // Just the type name ("Order" rather than "order_tracker::model::order::Order")
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let id = T::Id::from(self.next_id);
                    self.next_id += 1;

                    match T::from_create_params(id.clone(), params, &context) {
                        Ok(mut item) => {
                            if let Err(e) = item.on_create(&context).await {
                                warn!(entity_type, error = %e, "on_create failed");
                                let _ =
                                    respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                                continue;
                            }
                            self.store.insert(id.clone(), item);
                            info!(entity_type, %id, size = self.store.len(), "Created");
                            let _ = respond_to.send(Ok(id));
                        }
                        Err(e) => {
                            warn!(entity_type, error = %e, "Create failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        }
                    }
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    let found = item.is_some();
                    debug!(entity_type, %id, found, "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { query, respond_to } => {
                    let items: Vec<T> = self
                        .store
                        .values()
                        .filter(|item| item.matches(&query))
                        .cloned()
                        .collect();
                    debug!(entity_type, ?query, count = items.len(), "List");
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    if let Some(item) = self.store.get_mut(&id) {
                        if let Err(e) = item.on_update(update, &context).await {
                            warn!(entity_type, %id, error = %e, "Update failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                            continue;
                        }
                        info!(entity_type, %id, "Updated");
                        let _ = respond_to.send(Ok(item.clone()));
                    } else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    }
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    if let Some(item) = self.store.get(&id) {
                        if let Err(e) = item.on_delete(&context).await {
                            warn!(entity_type, %id, error = %e, "on_delete failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                            continue;
                        }
                        self.store.remove(&id);
                        info!(entity_type, %id, size = self.store.len(), "Deleted");
                        let _ = respond_to.send(Ok(()));
                    } else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    }
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    if let Some(item) = self.store.get_mut(&id) {
                        let result = item
                            .handle_action(action, &context)
                            .await
                            .map_err(|e| FrameworkError::EntityError(Box::new(e)));
                        match &result {
                            Ok(_) => info!(entity_type, %id, "Action ok"),
                            Err(e) => warn!(entity_type, %id, error = %e, "Action failed"),
                        }
                        let _ = respond_to.send(result);
                    } else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    }
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Clone, Debug, PartialEq)]
    struct Counter {
        id: u32,
        owner: String,
        hits: u32,
        sealed: bool,
    }

    #[derive(Debug)]
    struct CounterCreate {
        owner: String,
    }

    #[derive(Debug)]
    struct CounterUpdate {
        owner: Option<String>,
    }

    #[derive(Debug)]
    enum CounterAction {
        Hit,
        Seal,
    }

    #[derive(Debug, thiserror::Error, PartialEq)]
    enum CounterError {
        #[error("owner must not be empty")]
        EmptyOwner,
        #[error("counter is sealed")]
        Sealed,
    }

    #[async_trait]
    impl ActorEntity for Counter {
        type Id = u32;
        type Create = CounterCreate;
        type Update = CounterUpdate;
        type Action = CounterAction;
        type ActionResult = u32;
        type Query = String;
        type Context = ();
        type Error = CounterError;

        fn from_create_params(id: u32, params: CounterCreate, _ctx: &()) -> Result<Self, CounterError> {
            if params.owner.is_empty() {
                return Err(CounterError::EmptyOwner);
            }
            Ok(Self {
                id,
                owner: params.owner,
                hits: 0,
                sealed: false,
            })
        }

        fn matches(&self, owner: &String) -> bool {
            &self.owner == owner
        }

        async fn on_update(&mut self, update: CounterUpdate, _ctx: &()) -> Result<(), CounterError> {
            if let Some(owner) = update.owner {
                self.owner = owner;
            }
            Ok(())
        }

        async fn handle_action(&mut self, action: CounterAction, _ctx: &()) -> Result<u32, CounterError> {
            if self.sealed {
                return Err(CounterError::Sealed);
            }
            match action {
                CounterAction::Hit => self.hits += 1,
                CounterAction::Seal => self.sealed = true,
            }
            Ok(self.hits)
        }
    }

    #[tokio::test]
    async fn test_resource_actor_lifecycle() {
        let (actor, client) = ResourceActor::<Counter>::new(10);
        tokio::spawn(actor.run(()));

        let first = client.create(CounterCreate { owner: "alice".into() }).await.unwrap();
        let second = client.create(CounterCreate { owner: "bob".into() }).await.unwrap();
        assert_eq!((first, second), (1, 2));

        assert_eq!(client.perform_action(first, CounterAction::Hit).await.unwrap(), 1);
        assert_eq!(client.perform_action(first, CounterAction::Hit).await.unwrap(), 2);

        let alice = client.list("alice".to_string()).await.unwrap();
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].hits, 2);

        let renamed = client
            .update(second, CounterUpdate { owner: Some("alice".into()) })
            .await
            .unwrap();
        assert_eq!(renamed.owner, "alice");
        assert_eq!(client.list("alice".to_string()).await.unwrap().len(), 2);

        client.delete(first).await.unwrap();
        assert!(client.get(first).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_entity_errors_round_trip_through_the_framework() {
        let (actor, client) = ResourceActor::<Counter>::new(10);
        tokio::spawn(actor.run(()));

        let err = client.create(CounterCreate { owner: String::new() }).await.unwrap_err();
        assert_eq!(err.downcast_entity::<CounterError>().unwrap(), CounterError::EmptyOwner);

        let id = client.create(CounterCreate { owner: "carol".into() }).await.unwrap();
        client.perform_action(id, CounterAction::Seal).await.unwrap();
        let err = client.perform_action(id, CounterAction::Hit).await.unwrap_err();
        assert_eq!(err.downcast_entity::<CounterError>().unwrap(), CounterError::Sealed);

        let missing = client.perform_action(99, CounterAction::Hit).await.unwrap_err();
        assert!(matches!(missing, FrameworkError::NotFound(ref id) if id == "99"));
    }
}
