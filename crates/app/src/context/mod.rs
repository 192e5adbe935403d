//! Application context - dependency injection container

use std::sync::Arc;

use trainhub_common::SecureString;
use trainhub_core::{ConnectivityProbe, FeedbackChannels, SecureStore};
use trainhub_domain::{Config, Result, StorageConfig};
use trainhub_infra::{
    KeyManager, NotificationRepository, RequestOrchestrator, SessionRepository, SharedConnectivity,
    SqlCipherSecureStore, TeamRepository, TransportFactory, WorkoutRepository,
};

/// Type alias for secure store port trait object
type DynSecureStore = dyn SecureStore + 'static;

/// Type alias for connectivity probe trait object
type DynConnectivityProbe = dyn ConnectivityProbe + 'static;

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub store: Arc<DynSecureStore>,

    // Request pipeline
    pub connectivity: Arc<SharedConnectivity>,
    pub feedback: FeedbackChannels,
    pub transports: Arc<TransportFactory>,
    pub api: Arc<RequestOrchestrator>,

    // Repositories
    pub session: Arc<SessionRepository>,
    pub workouts: Arc<WorkoutRepository>,
    pub teams: Arc<TeamRepository>,
    pub notifications: Arc<NotificationRepository>,
}

impl AppContext {
    /// Open the encrypted store named by `config.storage` and wire
    /// everything on top of it.
    ///
    /// The store key comes from `storage.encryption_key` when set, otherwise
    /// from the OS keyring.
    pub async fn new(config: Config) -> Result<Self> {
        let key = resolve_store_key(&config.storage)?;
        let store = SqlCipherSecureStore::open(&config.storage.path, key)?;
        tracing::info!(path = %store.path().display(), "Secure store opened");

        Self::with_store(config, Arc::new(store)).await
    }

    /// Wire the context over an already opened store.
    ///
    /// The transport starts out with whatever token the store holds.
    pub async fn with_store(config: Config, store: Arc<DynSecureStore>) -> Result<Self> {
        if store.is_first_launch().await? {
            tracing::info!("First launch on this device");
            store.mark_launched().await?;
        }

        let token = store.get_token().await?;
        let transports = Arc::new(TransportFactory::new(&config.api, token)?);
        let connectivity = Arc::new(SharedConnectivity::default());
        let feedback = FeedbackChannels::default();

        let probe: Arc<DynConnectivityProbe> = connectivity.clone();
        let api = Arc::new(RequestOrchestrator::new(
            Arc::clone(&transports),
            probe,
            feedback.clone(),
            config.api.max_credential_refreshes,
        ));

        let session = Arc::new(SessionRepository::new(Arc::clone(&api), Arc::clone(&store)));
        let workouts = Arc::new(WorkoutRepository::new(Arc::clone(&api)));
        let teams = Arc::new(TeamRepository::new(Arc::clone(&api)));
        let notifications = Arc::new(NotificationRepository::new(Arc::clone(&api)));

        tracing::debug!(base_url = %transports.base_url(), "Application context ready");

        Ok(Self {
            config,
            store,
            connectivity,
            feedback,
            transports,
            api,
            session,
            workouts,
            teams,
            notifications,
        })
    }
}

fn resolve_store_key(storage: &StorageConfig) -> Result<SecureString> {
    match storage.encryption_key.as_deref().filter(|key| !key.is_empty()) {
        Some(key) => {
            tracing::debug!("Using configured secure store key");
            Ok(SecureString::from(key))
        }
        None => {
            tracing::info!("Fetching secure store key from the OS keyring");
            KeyManager::default().get_or_create_key().map_err(|err| {
                tracing::error!(error = %err, "Failed to retrieve secure store key");
                err
            })
        }
    }
}
