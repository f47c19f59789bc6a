//! Test doubles for table clients.
//!
//! A mock table is an mpsc receiver the test answers by hand plus the
//! broadcast sender behind its change stream. Tests pop requests with the
//! `expect_*` helpers, reply through the responder, and push `ChangeEvent`s
//! straight into the stream to drive surfaces.

use tokio::sync::{broadcast, mpsc, oneshot};

use crate::actor_framework::{Entity, FrameworkError, ResourceClient, ResourceRequest};
use crate::realtime::ChangeEvent;

pub type Responder<R> = oneshot::Sender<Result<R, FrameworkError>>;

/// Client wired to test-owned channels.
///
/// The returned broadcast sender plays the actor's part: the stream stays
/// open while the test holds it and closes when the test drops it.
pub fn create_mock_client<T: Entity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>, broadcast::Sender<ChangeEvent<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    let (changes, _) = broadcast::channel(16);
    (ResourceClient::new(sender, changes.downgrade()), receiver, changes)
}

/// Pop the next request, expecting a Create.
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::CreateParams, Responder<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Pop the next request, expecting a Get.
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Responder<Option<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Answer the next request, expecting a List. The filter is
/// applied to `rows` before answering.
pub async fn answer_list<T: Entity>(receiver: &mut mpsc::Receiver<ResourceRequest<T>>, rows: Vec<T>) -> bool {
    match receiver.recv().await {
        Some(ResourceRequest::List { filter, respond_to }) => {
            let rows = rows
                .into_iter()
                .filter(|row| filter.as_ref().map_or(true, |keep| keep(row)))
                .collect();
            respond_to.send(Ok(rows)).is_ok()
        }
        _ => false,
    }
}

/// Pop the next request, expecting an Action.
pub async fn expect_action<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, Responder<T::ActionResult>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action { id, action, respond_to }) => Some((id, action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DeliveryZone, DeliveryZoneCreate};

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver, _changes) = create_mock_client::<DeliveryZone>(10);

        // Test Create
        let create_task = tokio::spawn(async move {
            let zone = DeliveryZoneCreate {
                name: "Centre".to_string(),
                fee: 2.0,
                estimated_time: "30 min".to_string(),
                active: true,
            };
            client.create(zone).await
        });

        let (payload, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(payload.name, "Centre");
        let zone = DeliveryZone::from_create_params("zone_1".to_string(), payload).unwrap();
        responder.send(Ok(zone.clone())).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result, Ok(zone));
    }

    #[tokio::test]
    async fn test_mock_list_applies_filter() {
        let (client, mut receiver, _changes) = create_mock_client::<DeliveryZone>(10);
        let rows: Vec<DeliveryZone> = ["North", "South"]
            .into_iter()
            .enumerate()
            .map(|(i, name)| {
                let params = DeliveryZoneCreate {
                    name: name.to_string(),
                    fee: 1.0,
                    estimated_time: "20 min".to_string(),
                    active: true,
                };
                DeliveryZone::from_create_params(format!("zone_{}", i + 1), params).unwrap()
            })
            .collect();

        let list_task = tokio::spawn(async move { client.list_where(|zone: &DeliveryZone| zone.name == "South").await });
        assert!(answer_list(&mut receiver, rows).await);

        let listed = list_task.await.unwrap().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, "zone_2");
    }
}
