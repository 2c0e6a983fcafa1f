//! Routing decoded events to handlers and answering them.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use aebridge_core::FourCharCode;
use aebridge_events::{BridgeResult, Completer, Dispatch, DispatchQueue, EventBridge, EventManager};
use futures::FutureExt;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::error::{HandlerError, HandlerResult, HostResult};
use crate::handler::EventHandler;

type Route = (FourCharCode, FourCharCode);

/// Maps `(suite, event)` pairs to handlers.
///
/// Either code may be the `'****'` wildcard. Lookup tries the exact pair,
/// then `(suite, '****')`, then `('****', event)`, then `('****', '****')`.
#[derive(Clone, Default)]
pub struct Router {
    routes: HashMap<Route, Arc<dyn EventHandler>>,
}

impl Router {
    /// An empty router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Route `suite`/`event` to `handler`, replacing any previous handler.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::InvalidCode`](crate::HostError::InvalidCode) if
    /// either string is not a four-char code.
    pub fn on<H: EventHandler>(&mut self, suite: &str, event: &str, handler: H) -> HostResult<&mut Self> {
        Ok(self.route(suite.parse()?, event.parse()?, handler))
    }

    /// [`on`](Self::on) with parsed codes.
    pub fn route<H: EventHandler>(&mut self, suite: FourCharCode, event: FourCharCode, handler: H) -> &mut Self {
        if self.routes.insert((suite, event), Arc::new(handler)).is_some() {
            debug!(%suite, %event, "Replaced route");
        }
        self
    }

    /// Number of routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether there are no routes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Every routed pair, sorted.
    #[must_use]
    pub fn routes(&self) -> BTreeSet<Route> {
        self.routes.keys().copied().collect()
    }

    /// The handler for an event's suite and event id.
    ///
    /// Codes that do not parse match only wildcard routes.
    #[must_use]
    pub fn lookup(&self, suite: &str, event: &str) -> Option<&Arc<dyn EventHandler>> {
        let suite = FourCharCode::parse(suite);
        let event = FourCharCode::parse(event);
        let any = Some(FourCharCode::WILDCARD);

        [(suite, event), (suite, any), (any, event), (any, any)]
            .into_iter()
            .filter_map(|(s, e)| Some((s?, e?)))
            .find_map(|key| self.routes.get(&key))
    }

    /// Register every route with `bridge`.
    ///
    /// Returns how many registrations were new.
    ///
    /// # Errors
    ///
    /// Stops at the first registration the OS rejects.
    pub fn install_all<M: EventManager>(&self, bridge: &EventBridge<M>) -> BridgeResult<usize> {
        let mut added: usize = 0;
        for (suite, event) in self.routes() {
            if bridge.install_handler(suite, event)? {
                added = added.saturating_add(1);
            }
        }
        Ok(added)
    }

    /// Run the matching handler for one dispatch and answer it.
    pub async fn handle(&self, dispatch: Dispatch) {
        let (record, completer) = dispatch.into_parts();
        let suite = record.suite().to_owned();
        let event = record.event().to_owned();

        let result = match self.lookup(&suite, &event) {
            Some(handler) => run_handler(handler.as_ref(), record).await,
            None => Err(HandlerError::NoRoute {
                suite: suite.clone(),
                event: event.clone(),
            }),
        };

        match completer {
            Some(completer) => answer(completer, result),
            None => {
                if let Err(e) = result {
                    warn!(%suite, %event, error = %e, "Handler failed for event without reply");
                }
            },
        }
    }

    /// Drain `queue`, running each event on its own task.
    ///
    /// Returns once the queue is closed and every in-flight handler has
    /// finished.
    pub async fn serve(self, mut queue: DispatchQueue) {
        let router = Arc::new(self);
        let mut tasks = JoinSet::new();
        info!(routes = router.len(), "Serving Apple Events");

        loop {
            tokio::select! {
                next = queue.recv() => {
                    let Some(dispatch) = next else { break };
                    let router = Arc::clone(&router);
                    tasks.spawn(async move { router.handle(dispatch).await });
                },
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    if let Err(e) = joined {
                        error!(error = %e, "Event task failed");
                    }
                },
            }
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "Event task failed");
            }
        }
        info!("Dispatch queue closed, stopped serving");
    }
}

async fn run_handler(
    handler: &dyn EventHandler,
    record: aebridge_core::EventRecord,
) -> HandlerResult<Option<serde_json::Value>> {
    AssertUnwindSafe(handler.handle(record))
        .catch_unwind()
        .await
        .unwrap_or_else(|_| {
            error!("Event handler panicked");
            Err(HandlerError::failed("handler panicked"))
        })
}

fn answer(completer: Completer, result: HandlerResult<Option<serde_json::Value>>) {
    let label = completer.label().to_owned();
    let sent = match result {
        Ok(None) => completer.finish(),
        Ok(Some(value)) => completer.reply(value),
        Err(e) => {
            debug!(event = %label, error = %e, "Handler failed");
            completer.fail(e.to_string())
        },
    };
    if !sent {
        debug!(event = %label, "Handler finished after the event was answered");
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aebridge_core::EventRecord;
    use aebridge_descriptor::MemoryDescriptor;
    use aebridge_events::keywords::{KEY_DIRECT_OBJECT, KEY_ERROR_STRING};
    use aebridge_events::testing::{MockEventManager, MockReply};
    use aebridge_events::{DROPPED_REPLY_MESSAGE, MemoryEvent, OsStatus, ReplyValue, channel};
    use serde_json::json;

    fn code(s: &str) -> FourCharCode {
        FourCharCode::parse(s).unwrap()
    }

    fn named(name: &'static str) -> impl EventHandler {
        move |_record: EventRecord| async move { Ok::<_, HandlerError>(Some(json!(name))) }
    }

    #[test]
    fn test_lookup_order() {
        let mut router = Router::new();
        router.on("core", "getd", named("exact")).unwrap();
        router.on("core", "****", named("suite")).unwrap();
        router.on("****", "getd", named("event")).unwrap();
        router.on("****", "****", named("any")).unwrap();

        assert!(router.lookup("core", "getd").is_some());
        assert_eq!(router.len(), 4);
        assert!(router.lookup("", "").is_some());

        let mut narrow = Router::new();
        narrow.on("core", "getd", named("exact")).unwrap();
        assert!(narrow.lookup("core", "setd").is_none());
        assert!(narrow.lookup("", "getd").is_none());
    }

    #[tokio::test]
    async fn test_lookup_prefers_most_specific() {
        let mut router = Router::new();
        router.on("****", "****", named("any")).unwrap();
        router.on("****", "getd", named("event")).unwrap();
        router.on("core", "****", named("suite")).unwrap();

        let pick = |suite: &str, event: &str| {
            let handler = Arc::clone(router.lookup(suite, event).unwrap());
            async move { handler.handle(EventRecord::new("x", "y")).await.unwrap() }
        };
        assert_eq!(pick("core", "getd").await, Some(json!("suite")));
        assert_eq!(pick("misc", "getd").await, Some(json!("event")));
        assert_eq!(pick("misc", "dosc").await, Some(json!("any")));
    }

    #[test]
    fn test_bad_codes_rejected() {
        let mut router = Router::new();
        assert!(router.on("core", "get", named("x")).is_err());
        assert!(router.is_empty());
    }

    #[test]
    fn test_install_all_counts_new_registrations() {
        let bridge = EventBridge::new(MockEventManager::new());
        bridge.install_handler_str("core", "getd").unwrap();

        let mut router = Router::new();
        router.on("core", "getd", named("a")).unwrap();
        router.on("GURL", "GURL", named("b")).unwrap();

        assert_eq!(router.install_all(&bridge).unwrap(), 1);
        assert!(bridge.is_installed(code("GURL"), code("GURL")));
        assert_eq!(bridge.manager().install_attempts(), 2);
    }

    #[tokio::test]
    async fn test_handler_result_becomes_reply() {
        let mut router = Router::new();
        router
            .on("core", "getd", |record: EventRecord| async move {
                let direct = serde_json::to_value(record.direct_parameter()).unwrap();
                Ok::<_, HandlerError>(Some(json!({ "echo": direct })))
            })
            .unwrap();

        let bridge = EventBridge::new(MockEventManager::new());
        let (dispatcher, mut queue) = channel(4);
        bridge.set_dispatcher(dispatcher);
        let event = MemoryEvent::new(code("core"), code("getd"))
            .with_parameter(KEY_DIRECT_OBJECT, MemoryDescriptor::utf8("hi"));
        bridge.handle_event(&event, Some(MockReply::new()));
        router.handle(queue.try_recv().unwrap()).await;

        let resumes = bridge.manager().resumes();
        assert_eq!(resumes.len(), 1);
        assert_eq!(resumes[0].status, OsStatus::NO_ERR);
        assert_eq!(
            resumes[0].reply.parameter(KEY_DIRECT_OBJECT),
            Some(&ReplyValue::Text(r#"{"echo":"hi"}"#.to_owned()))
        );
    }

    #[tokio::test]
    async fn test_no_result_is_empty_reply() {
        let mut router = Router::new();
        router
            .on("core", "setd", |_record: EventRecord| async move {
                Ok::<_, HandlerError>(None::<serde_json::Value>)
            })
            .unwrap();

        let bridge = EventBridge::new(MockEventManager::new());
        let (dispatcher, mut queue) = channel(4);
        bridge.set_dispatcher(dispatcher);
        bridge.handle_event(
            &MemoryEvent::new(code("core"), code("setd")),
            Some(MockReply::new()),
        );
        router.handle(queue.try_recv().unwrap()).await;

        let resumes = bridge.manager().resumes();
        assert!(resumes[0].reply.is_empty());
        assert_eq!(resumes[0].status, OsStatus::NO_ERR);
    }

    #[tokio::test]
    async fn test_null_result_is_null_reply() {
        let mut router = Router::new();
        router
            .on("core", "getd", |_record: EventRecord| async move {
                Ok::<_, HandlerError>(Some(serde_json::Value::Null))
            })
            .unwrap();

        let bridge = EventBridge::new(MockEventManager::new());
        let (dispatcher, mut queue) = channel(4);
        bridge.set_dispatcher(dispatcher);
        bridge.handle_event(&MemoryEvent::new(code("core"), code("getd")), Some(MockReply::new()));
        router.handle(queue.try_recv().unwrap()).await;

        let resumes = bridge.manager().resumes();
        assert_eq!(resumes[0].status, OsStatus::NO_ERR);
        assert_eq!(resumes[0].reply.parameter(KEY_DIRECT_OBJECT), Some(&ReplyValue::Null));
    }

    #[tokio::test]
    async fn test_handler_error_and_missing_route_fail_the_event() {
        let mut router = Router::new();
        router
            .on("core", "getd", |_record: EventRecord| async move {
                Err::<Option<serde_json::Value>, _>(HandlerError::failed("no such window"))
            })
            .unwrap();

        let bridge = EventBridge::new(MockEventManager::new());
        let (dispatcher, mut queue) = channel(4);
        bridge.set_dispatcher(dispatcher);
        bridge.handle_event(&MemoryEvent::new(code("core"), code("getd")), Some(MockReply::new()));
        bridge.handle_event(&MemoryEvent::new(code("misc"), code("dosc")), Some(MockReply::new()));
        router.handle(queue.try_recv().unwrap()).await;
        router.handle(queue.try_recv().unwrap()).await;

        let resumes = bridge.manager().resumes();
        assert_eq!(resumes.len(), 2);
        assert_eq!(resumes[0].status, OsStatus::EVENT_FAILED);
        assert_eq!(
            resumes[0].reply.parameter(KEY_ERROR_STRING),
            Some(&ReplyValue::Text("no such window".to_owned()))
        );
        assert_eq!(
            resumes[1].reply.parameter(KEY_ERROR_STRING),
            Some(&ReplyValue::Text("no handler for misc/dosc".to_owned()))
        );
    }

    #[tokio::test]
    async fn test_panicking_handler_still_answers() {
        let mut router = Router::new();
        router
            .on("core", "getd", |record: EventRecord| async move {
                assert_ne!(record.event(), "getd", "boom");
                Ok::<_, HandlerError>(None::<serde_json::Value>)
            })
            .unwrap();

        let bridge = EventBridge::new(MockEventManager::new());
        let (dispatcher, mut queue) = channel(4);
        bridge.set_dispatcher(dispatcher);
        bridge.handle_event(&MemoryEvent::new(code("core"), code("getd")), Some(MockReply::new()));
        router.handle(queue.try_recv().unwrap()).await;

        let resumes = bridge.manager().resumes();
        assert_eq!(resumes.len(), 1);
        assert_eq!(
            resumes[0].reply.parameter(KEY_ERROR_STRING),
            Some(&ReplyValue::Text("handler panicked".to_owned()))
        );
        assert_ne!(
            resumes[0].reply.parameter(KEY_ERROR_STRING),
            Some(&ReplyValue::Text(DROPPED_REPLY_MESSAGE.to_owned()))
        );
    }

    #[tokio::test]
    async fn test_serve_drains_until_closed() {
        let mut router = Router::new();
        router.on("****", "****", named("ok")).unwrap();

        let bridge = Arc::new(EventBridge::new(MockEventManager::new()));
        let (dispatcher, queue) = channel(8);
        bridge.set_dispatcher(dispatcher);
        let server = tokio::spawn(router.serve(queue));

        for event in ["getd", "setd", "clos"] {
            bridge.handle_event(&MemoryEvent::new(code("core"), code(event)), Some(MockReply::new()));
        }
        bridge.manager().wait_for_resumes(3).await;

        // Replacing the dispatcher drops the last sender and ends the loop.
        bridge.set_dispatcher(|d: Dispatch| {
            Err::<(), _>(aebridge_events::DispatchRejected::new(
                d,
                aebridge_events::DispatchError::Closed,
            ))
        });
        server.await.unwrap();

        let resumes = bridge.manager().resumes();
        assert_eq!(resumes.len(), 3);
        assert!(resumes.iter().all(|r| r.status == OsStatus::NO_ERR));
    }
}
