use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tracing::{debug, info, instrument};

use crate::realtime::{ChangeEvent, ChangeFilter, ChangeKind, ChangeStream, Predicate};

// =============================================================================
// 1. THE ABSTRACTION (Traits with Hooks, Params, and Actions)
// =============================================================================

/// Trait that any table row must implement to be managed by ResourceActor
pub trait Entity: Clone + PartialEq + Send + Sync + 'static {
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;
    type CreateParams: Send + Sync + Debug;
    type Patch: Send + Sync + Debug;
    type Action: Send + Sync + Debug;
    type ActionResult: Send + Sync + Debug;

    /// Table name carried by change events and log fields.
    const TABLE: &'static str;

    /// Get the ID of the row
    fn id(&self) -> &Self::Id;

    /// Construct the full row from the ID and creation params
    fn from_create_params(id: Self::Id, params: Self::CreateParams) -> Result<Self, String>;

    // --- Lifecycle Hooks ---

    fn on_create(&mut self) -> Result<(), String> { Ok(()) }
    fn on_update(&mut self, patch: Self::Patch) -> Result<(), String>;
    fn on_delete(&self) -> Result<(), String> { Ok(()) }

    // --- Action Handler ---

    /// Handle a custom domain-specific action
    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, String>;
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Rejected: {0}")]
    Rejected(String),
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

pub enum ResourceRequest<T: Entity> {
    Create {
        params: T::CreateParams,
        respond_to: Response<T>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    List {
        filter: Option<Predicate<T>>,
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        patch: T::Patch,
        respond_to: Response<T>,
    },
    Upsert {
        id: T::Id,
        params: T::CreateParams,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

/// One table. Rows are kept in insertion order and every successful
/// mutation is published on the table's change stream.
pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    insertion_order: Vec<T::Id>,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
    changes: broadcast::Sender<ChangeEvent<T>>,
}

impl<T: Entity> ResourceActor<T> {
    pub fn new(
        buffer_size: usize,
        change_capacity: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (changes, _) = broadcast::channel(change_capacity.max(1));
        let actor = Self {
            receiver,
            store: HashMap::new(),
            insertion_order: Vec::new(),
            next_id_fn: Box::new(next_id_fn),
            changes: changes.clone(),
        };
        // Clients hold a weak handle so change streams close with the actor.
        let client = ResourceClient::new(sender, changes.downgrade());
        (actor, client)
    }

    /// Serve requests until every client is dropped.
    pub async fn run(self) {
        let (_keep_open, shutdown) = watch::channel(false);
        self.run_until(shutdown).await
    }

    /// Serve requests until every client is dropped or `shutdown` flips to true.
    #[instrument(name = "resource_actor", skip_all, fields(table = T::TABLE))]
    pub async fn run_until(mut self, mut shutdown: watch::Receiver<bool>) {
        info!("Actor starting");

        let stop = async move {
            // A dropped shutdown sender means no signal can ever arrive.
            if shutdown.wait_for(|stop| *stop).await.is_err() {
                std::future::pending::<()>().await;
            }
        };
        tokio::pin!(stop);

        loop {
            tokio::select! {
                _ = &mut stop => {
                    info!("Shutdown signal received");
                    break;
                }
                msg = self.receiver.recv() => match msg {
                    Some(msg) => self.dispatch(msg),
                    None => break,
                },
            }
        }

        info!("Actor stopped");
    }

    fn dispatch(&mut self, msg: ResourceRequest<T>) {
        match msg {
            ResourceRequest::Create { params, respond_to } => {
                let _ = respond_to.send(self.handle_create(params));
            }
            ResourceRequest::Get { id, respond_to } => {
                let _ = respond_to.send(Ok(self.store.get(&id).cloned()));
            }
            ResourceRequest::List { filter, respond_to } => {
                let _ = respond_to.send(Ok(self.handle_list(filter)));
            }
            ResourceRequest::Update { id, patch, respond_to } => {
                let _ = respond_to.send(self.handle_update(id, patch));
            }
            ResourceRequest::Upsert { id, params, respond_to } => {
                let _ = respond_to.send(self.handle_upsert(id, params));
            }
            ResourceRequest::Delete { id, respond_to } => {
                let _ = respond_to.send(self.handle_delete(id));
            }
            ResourceRequest::Action { id, action, respond_to } => {
                let _ = respond_to.send(self.handle_action(id, action));
            }
        }
    }

    fn handle_create(&mut self, params: T::CreateParams) -> Result<T, FrameworkError> {
        let id = (self.next_id_fn)();
        let mut item = T::from_create_params(id.clone(), params).map_err(FrameworkError::Rejected)?;
        item.on_create().map_err(FrameworkError::Rejected)?;

        self.store.insert(id.clone(), item.clone());
        self.insertion_order.push(id.clone());
        debug!(id = %id, "Row inserted");

        self.publish(ChangeKind::Insert, None, Some(item.clone()));
        Ok(item)
    }

    fn handle_list(&self, filter: Option<Predicate<T>>) -> Vec<T> {
        self.insertion_order
            .iter()
            .filter_map(|id| self.store.get(id))
            .filter(|item| filter.as_ref().map_or(true, |keep| keep(*item)))
            .cloned()
            .collect()
    }

    fn handle_update(&mut self, id: T::Id, patch: T::Patch) -> Result<T, FrameworkError> {
        let current = self
            .store
            .get(&id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;

        // Patch a copy so a rejected patch leaves the stored row untouched.
        let mut updated = current.clone();
        updated.on_update(patch).map_err(FrameworkError::Rejected)?;

        let old = self.store.insert(id.clone(), updated.clone());
        debug!(id = %id, "Row updated");

        self.publish(ChangeKind::Update, old, Some(updated.clone()));
        Ok(updated)
    }

    fn handle_upsert(&mut self, id: T::Id, params: T::CreateParams) -> Result<T, FrameworkError> {
        let mut item = T::from_create_params(id.clone(), params).map_err(FrameworkError::Rejected)?;

        match self.store.get(&id).cloned() {
            Some(old) => {
                self.store.insert(id.clone(), item.clone());
                debug!(id = %id, "Row replaced by upsert");
                self.publish(ChangeKind::Update, Some(old), Some(item.clone()));
            }
            None => {
                item.on_create().map_err(FrameworkError::Rejected)?;
                self.store.insert(id.clone(), item.clone());
                self.insertion_order.push(id.clone());
                debug!(id = %id, "Row inserted by upsert");
                self.publish(ChangeKind::Insert, None, Some(item.clone()));
            }
        }

        Ok(item)
    }

    fn handle_delete(&mut self, id: T::Id) -> Result<(), FrameworkError> {
        let item = self
            .store
            .get(&id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        item.on_delete().map_err(FrameworkError::Rejected)?;

        let old = self.store.remove(&id);
        self.insertion_order.retain(|existing| existing != &id);
        debug!(id = %id, "Row deleted");

        self.publish(ChangeKind::Delete, old, None);
        Ok(())
    }

    fn handle_action(&mut self, id: T::Id, action: T::Action) -> Result<T::ActionResult, FrameworkError> {
        let current = self
            .store
            .get(&id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;

        let mut updated = current.clone();
        let result = updated.handle_action(action).map_err(FrameworkError::Rejected)?;
        if updated == *current {
            debug!(id = %id, "Action left row unchanged");
            return Ok(result);
        }

        let old = self.store.insert(id.clone(), updated.clone());
        debug!(id = %id, "Action applied");

        self.publish(ChangeKind::Update, old, Some(updated));
        Ok(result)
    }

    fn publish(&self, kind: ChangeKind, old: Option<T>, new: Option<T>) {
        // No subscribers is not an error.
        let _ = self.changes.send(ChangeEvent::new(T::TABLE, kind, old, new));
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
    changes: broadcast::WeakSender<ChangeEvent<T>>,
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>, changes: broadcast::WeakSender<ChangeEvent<T>>) -> Self {
        Self { sender, changes }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, params: T::CreateParams) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Create { params, respond_to }).await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to }).await
    }

    pub async fn list(&self) -> Result<Vec<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::List { filter: None, respond_to }).await
    }

    /// Rows matching `keep`, in insertion order.
    pub async fn list_where(
        &self,
        keep: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> Result<Vec<T>, FrameworkError> {
        let filter: Predicate<T> = Arc::new(keep);
        self.request(|respond_to| ResourceRequest::List { filter: Some(filter), respond_to }).await
    }

    pub async fn update(&self, id: T::Id, patch: T::Patch) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Update { id, patch, respond_to }).await
    }

    pub async fn upsert(&self, id: T::Id, params: T::CreateParams) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Upsert { id, params, respond_to }).await
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), FrameworkError> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to }).await
    }

    pub async fn perform_action(&self, id: T::Id, action: T::Action) -> Result<T::ActionResult, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Action { id, action, respond_to }).await
    }

    /// Open a change stream on this table. Events published before this call are not replayed.
    ///
    /// Once the actor has stopped the stream is already closed.
    pub fn subscribe(&self, filter: ChangeFilter<T>) -> ChangeStream<T> {
        match self.changes.upgrade() {
            Some(changes) => ChangeStream::new(changes.subscribe(), filter),
            None => ChangeStream::closed(filter),
        }
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    // --- Domain Definition ---

    #[derive(Clone, Debug, PartialEq)]
    struct Dish {
        id: String,
        name: String,
        spicy: bool,
        locked: bool,
    }

    #[derive(Debug)]
    struct DishCreate {
        name: String,
    }

    #[derive(Debug)]
    struct DishPatch {
        name: Option<String>,
    }

    #[derive(Debug)]
    enum DishAction {
        MakeSpicy,
        Lock,
    }

    impl Entity for Dish {
        type Id = String;
        type CreateParams = DishCreate;
        type Patch = DishPatch;
        type Action = DishAction;
        type ActionResult = bool;

        const TABLE: &'static str = "dishes";

        fn id(&self) -> &String { &self.id }

        fn from_create_params(id: String, params: DishCreate) -> Result<Self, String> {
            if params.name.is_empty() {
                return Err("name required".to_string());
            }
            Ok(Self { id, name: params.name, spicy: false, locked: false })
        }

        fn on_update(&mut self, patch: DishPatch) -> Result<(), String> {
            if self.locked {
                return Err("locked".to_string());
            }
            if let Some(name) = patch.name {
                self.name = name;
            }
            Ok(())
        }

        fn on_delete(&self) -> Result<(), String> {
            if self.locked { Err("locked".to_string()) } else { Ok(()) }
        }

        fn handle_action(&mut self, action: DishAction) -> Result<bool, String> {
            match action {
                DishAction::MakeSpicy => {
                    if self.spicy {
                        Ok(false)
                    } else {
                        self.spicy = true;
                        Ok(true)
                    }
                }
                DishAction::Lock => {
                    self.locked = true;
                    Ok(true)
                }
            }
        }
    }

    fn start() -> ResourceClient<Dish> {
        let counter = Arc::new(AtomicU64::new(1));
        let next_id = move || format!("dish_{}", counter.fetch_add(1, Ordering::SeqCst));
        let (actor, client) = ResourceActor::new(10, 16, next_id);
        tokio::spawn(actor.run());
        client
    }

    #[tokio::test]
    async fn test_resource_actor_with_actions() {
        let client = start();

        let dish = client.create(DishCreate { name: "Curry".into() }).await.unwrap();
        assert_eq!(dish.id, "dish_1");

        let changed = client.perform_action(dish.id.clone(), DishAction::MakeSpicy).await.unwrap();
        assert!(changed);

        let stored = client.get(dish.id.clone()).await.unwrap().unwrap();
        assert!(stored.spicy);

        let changed_again = client.perform_action(dish.id.clone(), DishAction::MakeSpicy).await.unwrap();
        assert!(!changed_again);
    }

    #[tokio::test]
    async fn test_rejected_patch_leaves_row_untouched() {
        let client = start();
        let dish = client.create(DishCreate { name: "Soup".into() }).await.unwrap();
        client.perform_action(dish.id.clone(), DishAction::Lock).await.unwrap();

        let result = client.update(dish.id.clone(), DishPatch { name: Some("Stew".into()) }).await;
        assert_eq!(result, Err(FrameworkError::Rejected("locked".to_string())));

        let delete = client.delete(dish.id.clone()).await;
        assert!(matches!(delete, Err(FrameworkError::Rejected(_))));

        let stored = client.get(dish.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Soup");
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order_and_filters() {
        let client = start();
        for name in ["a", "b", "c"] {
            client.create(DishCreate { name: name.into() }).await.unwrap();
        }
        client.delete("dish_2".to_string()).await.unwrap();

        let names: Vec<String> = client.list().await.unwrap().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["a", "c"]);

        let only_c = client.list_where(|d: &Dish| d.name == "c").await.unwrap();
        assert_eq!(only_c.len(), 1);
    }

    #[tokio::test]
    async fn test_upsert_inserts_then_replaces() {
        let client = start();
        let mut stream = client.subscribe(ChangeFilter::all());

        client.upsert("fixed".to_string(), DishCreate { name: "First".into() }).await.unwrap();
        client.upsert("fixed".to_string(), DishCreate { name: "Second".into() }).await.unwrap();

        let inserted = stream.next().await.unwrap();
        assert_eq!(inserted.kind, ChangeKind::Insert);
        let replaced = stream.next().await.unwrap();
        assert_eq!(replaced.kind, ChangeKind::Update);
        assert_eq!(replaced.old.unwrap().name, "First");
        assert_eq!(replaced.new.unwrap().name, "Second");
        assert_eq!(client.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_mutations_are_published() {
        let client = start();
        let mut stream = client.subscribe(ChangeFilter::all());

        let dish = client.create(DishCreate { name: "Rice".into() }).await.unwrap();
        client.perform_action(dish.id.clone(), DishAction::MakeSpicy).await.unwrap();
        client.delete(dish.id.clone()).await.unwrap();

        let kinds = [
            stream.next().await.unwrap().kind,
            stream.next().await.unwrap().kind,
            stream.next().await.unwrap().kind,
        ];
        assert_eq!(kinds, [ChangeKind::Insert, ChangeKind::Update, ChangeKind::Delete]);
    }

    #[tokio::test]
    async fn test_unchanged_action_is_not_published() {
        let client = start();
        let dish = client.create(DishCreate { name: "Tacos".into() }).await.unwrap();
        let mut stream = client.subscribe(ChangeFilter::all());

        assert!(client.perform_action(dish.id.clone(), DishAction::MakeSpicy).await.unwrap());
        assert!(!client.perform_action(dish.id.clone(), DishAction::MakeSpicy).await.unwrap());
        client.delete(dish.id.clone()).await.unwrap();

        // The second MakeSpicy changed nothing, so the delete follows the first update directly.
        assert_eq!(stream.next().await.unwrap().kind, ChangeKind::Update);
        assert_eq!(stream.next().await.unwrap().kind, ChangeKind::Delete);
    }

    #[tokio::test]
    async fn test_streams_close_when_actor_stops() {
        let (actor, client) = ResourceActor::<Dish>::new(4, 4, || "dish".to_string());
        let (stop, stop_rx) = watch::channel(false);
        let handle = tokio::spawn(actor.run_until(stop_rx));

        let mut before = client.subscribe(ChangeFilter::all());
        stop.send(true).unwrap();
        handle.await.unwrap();

        // The client is still alive but no longer keeps the channel open.
        assert!(before.next().await.is_none());
        let mut after = client.subscribe(ChangeFilter::all());
        assert!(after.next().await.is_none());
    }

    #[tokio::test]
    async fn test_missing_row_reports_not_found() {
        let client = start();
        let result = client.perform_action("nope".to_string(), DishAction::MakeSpicy).await;
        assert_eq!(result, Err(FrameworkError::NotFound("nope".to_string())));
    }

    #[tokio::test]
    async fn test_shutdown_signal_stops_actor() {
        let (actor, client) = ResourceActor::<Dish>::new(4, 4, || "dish".to_string());
        let (stop, stop_rx) = watch::channel(false);
        let handle = tokio::spawn(actor.run_until(stop_rx));

        stop.send(true).unwrap();
        handle.await.unwrap();

        let result = client.get("dish".to_string()).await;
        assert_eq!(result, Err(FrameworkError::ActorClosed));
    }
}
