//! Vibe check session: asks the proxy to describe the area at the map center

use crate::{
    core::store::MapStore,
    services::vibe::{VibeCheckRequest, VibeCheckResult},
    traits::VibeCheckService,
    MapError,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub const VIBE_CHECK_ERROR: &str = "Failed to get vibe check";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VibeSession {
    pub result: Option<VibeCheckResult>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct VibeCheck {
    store: MapStore,
    service: Arc<dyn VibeCheckService>,
    session: Arc<Mutex<VibeSession>>,
}

impl std::fmt::Debug for VibeCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VibeCheck")
            .field("session", &*self.lock())
            .finish()
    }
}

/// The text shown to the user for a failed check
fn error_message(error: &MapError) -> String {
    match error {
        MapError::Service { message, .. } => message.clone(),
        MapError::Validation { .. } => "Invalid request".to_string(),
        _ => VIBE_CHECK_ERROR.to_string(),
    }
}

impl VibeCheck {
    pub fn new(store: MapStore, service: Arc<dyn VibeCheckService>) -> Self {
        Self {
            store,
            service,
            session: Arc::new(Mutex::new(VibeSession::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VibeSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn session(&self) -> VibeSession {
        self.lock().clone()
    }

    /// Checks the vibe at the current map center, optionally with a question
    pub async fn check(&self, query: Option<&str>) -> Option<VibeCheckResult> {
        {
            let mut session = self.lock();
            session.loading = true;
            session.error = None;
        }

        let request = VibeCheckRequest::at(self.store.center()).with_query(query);
        let outcome = self.service.vibe_check(&request).await;

        let mut session = self.lock();
        session.loading = false;
        match outcome {
            Ok(result) => {
                session.result = Some(result.clone());
                Some(result)
            }
            Err(e) => {
                log::error!("vibe check failed: {}", e);
                session.error = Some(error_message(&e));
                None
            }
        }
    }

    pub fn clear(&self) {
        let mut session = self.lock();
        session.result = None;
        session.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::geo::LngLat,
        services::vibe::{TimeContext, VibeContext},
        Result,
    };
    use async_trait::async_trait;

    struct FakeVibe {
        fail_with: Mutex<Option<MapError>>,
        seen: Mutex<Vec<VibeCheckRequest>>,
    }

    #[async_trait]
    impl VibeCheckService for FakeVibe {
        async fn vibe_check(&self, request: &VibeCheckRequest) -> Result<VibeCheckResult> {
            self.seen.lock().unwrap().push(request.clone());
            if let Some(error) = self.fail_with.lock().unwrap().take() {
                return Err(error);
            }
            Ok(VibeCheckResult {
                response: "Foggy and calm.".into(),
                context: VibeContext {
                    neighborhood: Some("Outer Sunset".into()),
                    city: Some("San Francisco".into()),
                    time_context: TimeContext::Morning,
                },
            })
        }
    }

    fn vibe(fail_with: Option<MapError>) -> (VibeCheck, Arc<FakeVibe>) {
        let store = MapStore::new();
        store.set_center(LngLat::new(-122.495, 37.755));
        let fake = Arc::new(FakeVibe {
            fail_with: Mutex::new(fail_with),
            seen: Mutex::new(Vec::new()),
        });
        (VibeCheck::new(store, fake.clone()), fake)
    }

    #[tokio::test]
    async fn test_check_uses_map_center() {
        let (vibe, fake) = vibe(None);
        let result = vibe.check(Some("good for a walk?")).await.unwrap();
        assert_eq!(result.context.neighborhood.as_deref(), Some("Outer Sunset"));

        let seen = fake.seen.lock().unwrap();
        assert_eq!(seen[0].lat, 37.755);
        assert_eq!(seen[0].lng, -122.495);
        assert_eq!(seen[0].query.as_deref(), Some("good for a walk?"));

        let session = vibe.session();
        assert!(!session.loading);
        assert_eq!(session.result, Some(result));
    }

    #[tokio::test]
    async fn test_service_error_message_is_shown() {
        let (vibe, _) = vibe(Some(MapError::Service {
            status: 500,
            message: "Server misconfigured: missing Anthropic API key".into(),
        }));
        assert!(vibe.check(None).await.is_none());
        assert_eq!(
            vibe.session().error.as_deref(),
            Some("Server misconfigured: missing Anthropic API key")
        );
    }

    #[tokio::test]
    async fn test_other_failure_uses_generic_message() {
        let (vibe, _) = vibe(Some(MapError::ParseError("truncated body".into())));
        vibe.check(None).await;
        assert_eq!(vibe.session().error.as_deref(), Some(VIBE_CHECK_ERROR));

        vibe.clear();
        assert_eq!(vibe.session(), VibeSession::default());
    }
}
