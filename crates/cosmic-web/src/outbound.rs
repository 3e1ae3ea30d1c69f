//! Collaborator calls routed through the JavaScript host.
//!
//! Rust cannot make the HTTP calls itself, so each service call is parked
//! in an `Outbox`: the request is queued for the host to drain, and a
//! oneshot receiver is handed back to the engine as the call's future.
//! When the host calls back with the answer, the sender fires and the
//! engine picks the completion up on its next frame.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use cosmic_engine::forms::join::{JoinOutcome, JoinRequest, JoinService};
use cosmic_engine::systems::illumination::{AdjustmentRequest, AdjustmentResponse, IlluminationService};
use cosmic_engine::ServiceError;
use futures::channel::oneshot;
use futures::future::{FutureExt, LocalBoxFuture};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A request waiting for the host, as serialized for it.
#[derive(Debug, Clone, Serialize)]
pub struct Outbound<'a, Req> {
    pub id: u32,
    pub payload: &'a Req,
}

type Reply<Resp> = oneshot::Sender<Result<Resp, ServiceError>>;

pub struct Outbox<Req, Resp> {
    next_id: u32,
    queued: Vec<(u32, Req)>,
    waiting: HashMap<u32, Reply<Resp>>,
}

impl<Req: Serialize, Resp: DeserializeOwned> Outbox<Req, Resp> {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            queued: Vec::new(),
            waiting: HashMap::new(),
        }
    }

    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Park a request; the returned future resolves when the host answers.
    pub fn enqueue(&mut self, request: Req) -> LocalBoxFuture<'static, Result<Resp, ServiceError>>
    where
        Resp: 'static,
    {
        self.forget_abandoned();
        let id = self.next_id;
        self.next_id += 1;
        let (tx, rx) = oneshot::channel();
        self.queued.push((id, request));
        self.waiting.insert(id, tx);
        async move { rx.await.unwrap_or_else(|canceled| Err(canceled.into())) }.boxed_local()
    }

    /// Take every queued request as a JSON array of `{ id, payload }`.
    pub fn drain_json(&mut self) -> String {
        self.forget_abandoned();
        let queued = std::mem::take(&mut self.queued);
        let outbound: Vec<Outbound<Req>> = queued
            .iter()
            .map(|(id, payload)| Outbound { id: *id, payload })
            .collect();
        match serde_json::to_string(&outbound) {
            Ok(json) => json,
            Err(err) => {
                log::warn!("outbox: failed to serialize {} requests: {}", queued.len(), err);
                for (id, _) in &queued {
                    self.settle(*id, Err(ServiceError::Malformed(err.to_string())));
                }
                "[]".to_string()
            }
        }
    }

    /// The host answered `id` with a JSON body.
    pub fn resolve_json(&mut self, id: u32, json: &str) {
        let result = serde_json::from_str::<Resp>(json).map_err(|err| ServiceError::Malformed(err.to_string()));
        self.settle(id, result);
    }

    /// The host's call for `id` failed.
    pub fn fail(&mut self, id: u32, message: &str) {
        self.settle(id, Err(ServiceError::Transport(message.to_string())));
    }

    fn settle(&mut self, id: u32, result: Result<Resp, ServiceError>) {
        match self.waiting.remove(&id) {
            // the engine may have stopped listening (timeout, teardown)
            Some(tx) => {
                let _ = tx.send(result);
            }
            None => log::debug!("outbox: no caller waiting on request {}", id),
        }
    }

    /// Drop senders whose future the engine gave up on (timeout, teardown).
    fn forget_abandoned(&mut self) {
        let before = self.waiting.len();
        self.waiting.retain(|_, tx| !tx.is_canceled());
        let dropped = before - self.waiting.len();
        if dropped > 0 {
            log::debug!("outbox: forgot {} abandoned requests", dropped);
        }
    }

    pub fn queued(&self) -> usize {
        self.queued.len()
    }

    pub fn waiting(&self) -> usize {
        self.waiting.len()
    }
}

impl<Req: Serialize, Resp: DeserializeOwned> Default for Outbox<Req, Resp> {
    fn default() -> Self {
        Self::new()
    }
}

pub type AdjustmentOutbox = Rc<RefCell<Outbox<AdjustmentRequest, AdjustmentResponse>>>;
pub type JoinOutbox = Rc<RefCell<Outbox<JoinRequest, JoinOutcome>>>;

/// `IlluminationService` answered by the host.
pub struct HostIllumination(pub AdjustmentOutbox);

impl IlluminationService for HostIllumination {
    fn adjust(&self, request: AdjustmentRequest) -> LocalBoxFuture<'static, Result<AdjustmentResponse, ServiceError>> {
        self.0.borrow_mut().enqueue(request)
    }
}

/// `JoinService` answered by the host.
pub struct HostJoin(pub JoinOutbox);

impl JoinService for HostJoin {
    fn subscribe(&self, request: JoinRequest) -> LocalBoxFuture<'static, Result<JoinOutcome, ServiceError>> {
        self.0.borrow_mut().enqueue(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    fn request() -> AdjustmentRequest {
        AdjustmentRequest {
            text: "About Us".into(),
            planet_distance: 10.0,
            planet_light_intensity: 1.0,
            base_font_size: 24.0,
        }
    }

    #[test]
    fn drain_then_resolve() {
        let outbox = Outbox::<AdjustmentRequest, AdjustmentResponse>::shared();
        let service = HostIllumination(outbox.clone());
        let future = service.adjust(request());

        let json = outbox.borrow_mut().drain_json();
        assert!(json.starts_with(r#"[{"id":1,"payload":{"text":"About Us""#));
        assert_eq!(outbox.borrow().queued(), 0);
        assert_eq!(outbox.borrow().waiting(), 1);

        outbox
            .borrow_mut()
            .resolve_json(1, r##"{"adjustedFontSize": 30, "textColor": "#EEEEFF"}"##);
        let response = block_on(future).unwrap();
        assert_eq!(response.adjusted_font_size, 30.0);
        assert_eq!(response.text_color, "#EEEEFF");
    }

    #[test]
    fn missing_field_is_malformed() {
        let outbox = Outbox::<AdjustmentRequest, AdjustmentResponse>::shared();
        let future = HostIllumination(outbox.clone()).adjust(request());
        outbox.borrow_mut().resolve_json(1, r#"{"adjustedFontSize": 30}"#);
        assert!(matches!(block_on(future), Err(ServiceError::Malformed(_))));
    }

    #[test]
    fn host_failure_is_transport_error() {
        let outbox = Outbox::<JoinRequest, JoinOutcome>::shared();
        let future = HostJoin(outbox.clone()).subscribe(JoinRequest { email: "a@b.com".into() });
        outbox.borrow_mut().fail(1, "network down");
        assert_eq!(block_on(future), Err(ServiceError::Transport("network down".into())));
    }

    #[test]
    fn dropped_outbox_yields_dropped() {
        let outbox = Outbox::<JoinRequest, JoinOutcome>::shared();
        let future = HostJoin(outbox.clone()).subscribe(JoinRequest { email: "a@b.com".into() });
        drop(outbox);
        assert_eq!(block_on(future), Err(ServiceError::Dropped));
    }

    #[test]
    fn abandoned_requests_are_forgotten() {
        let outbox = Outbox::<AdjustmentRequest, AdjustmentResponse>::shared();
        let service = HostIllumination(outbox.clone());
        for _ in 0..100 {
            drop(service.adjust(request()));
        }
        assert_eq!(outbox.borrow_mut().drain_json().matches("\"id\"").count(), 100);
        assert_eq!(outbox.borrow().waiting(), 0);

        let kept = service.adjust(request());
        drop(service.adjust(request()));
        outbox.borrow_mut().drain_json();
        assert_eq!(outbox.borrow().waiting(), 1);

        outbox
            .borrow_mut()
            .resolve_json(101, r##"{"adjustedFontSize": 28, "textColor": "#FFEEDD"}"##);
        assert_eq!(block_on(kept).unwrap().adjusted_font_size, 28.0);
    }

    #[test]
    fn unknown_id_is_ignored() {
        let mut outbox = Outbox::<JoinRequest, JoinOutcome>::new();
        outbox.resolve_json(42, r#"{"message":"hi","error":false}"#);
        assert_eq!(outbox.waiting(), 0);
    }
}
