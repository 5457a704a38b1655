use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::FormError;
use crate::gateway::CatalogGateway;
use crate::logic::FormSession;
use crate::model::{generate_session_id, SessionId};

pub type SharedSession<G> = Arc<Mutex<FormSession<G>>>;

/// Shared state behind the router: the catalog gateway and every open form.
///
/// The registry lock only guards the map. Each session has its own async
/// mutex, which handlers hold while they drive the session.
pub struct FormService<G> {
    gateway: Arc<G>,
    sessions: RwLock<HashMap<SessionId, SharedSession<G>>>,
}

impl<G: CatalogGateway + 'static> FormService<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    /// Open a new form. Fails if the category set cannot be loaded.
    pub async fn create_session(&self) -> Result<(SessionId, SharedSession<G>), FormError> {
        let session = FormSession::start(self.gateway.clone()).await?;
        let session_id = generate_session_id();
        let shared = Arc::new(Mutex::new(session));

        self.sessions.write().insert(session_id, shared.clone());
        log::info!("Opened form session {}", session_id);
        Ok((session_id, shared))
    }

    pub fn session(&self, session_id: &SessionId) -> Option<SharedSession<G>> {
        self.sessions.read().get(session_id).cloned()
    }

    pub fn remove_session(&self, session_id: &SessionId) -> bool {
        let removed = self.sessions.write().remove(session_id).is_some();
        if removed {
            log::info!("Closed form session {}", session_id);
        }
        removed
    }

    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }
}
