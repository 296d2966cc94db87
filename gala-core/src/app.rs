use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::error::{GalaError, Result};
use crate::storage::{RosterStore, SessionStore, Storage};
use crate::types::{Participant, Role, RosterStats};
use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Application state for one staff device: the logged-in role, the
/// current roster snapshot, the API client and the local cache. All
/// mutation of the authoritative roster goes through the remote
/// service; this struct only orchestrates.
pub struct App {
    config: AppConfig,
    api: ApiClient,
    storage: Arc<Storage>,
    roster: Vec<Participant>,
    current_role: Option<Role>,
    sync_task: Option<JoinHandle<()>>,
}

impl App {
    pub async fn new(config: AppConfig, data_dir: &Path) -> Result<Self> {
        let storage = Arc::new(Storage::new(&data_dir.join("gala.db")).await?);
        let api = ApiClient::new(config.api_base_url.clone());

        Ok(Self {
            config,
            api,
            storage,
            roster: Vec::new(),
            current_role: None,
            sync_task: None,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn roster(&self) -> &[Participant] {
        &self.roster
    }

    pub fn current_role(&self) -> Option<Role> {
        self.current_role
    }

    /// Verify the role password and persist the session.
    pub async fn login(&mut self, role: Role, password: &str) -> Result<()> {
        let expected = match role {
            Role::Hostess => &self.config.auth.hostess_password,
            Role::Admin => &self.config.auth.admin_password,
        };

        if password != expected {
            return Err(GalaError::InvalidPassword {
                role: role.to_string(),
            });
        }

        SessionStore::new(&self.storage).set_role(role).await?;
        self.current_role = Some(role);

        tracing::info!("Logged in as {}", role);
        Ok(())
    }

    pub async fn logout(&mut self) -> Result<()> {
        SessionStore::new(&self.storage).clear_role().await?;
        self.current_role = None;
        self.stop_auto_sync();

        tracing::info!("Logged out");
        Ok(())
    }

    /// Restore a persisted session and the cached roster, if any.
    pub async fn restore_session(&mut self) -> Result<Option<Role>> {
        self.current_role = SessionStore::new(&self.storage).role().await?;
        if self.current_role.is_some() {
            self.roster = RosterStore::new(&self.storage).load_all().await?;
        }
        Ok(self.current_role)
    }

    pub fn require_login(&self) -> Result<Role> {
        self.current_role.ok_or(GalaError::NotLoggedIn)
    }

    pub fn require_admin(&self) -> Result<()> {
        match self.require_login()? {
            Role::Admin => Ok(()),
            Role::Hostess => Err(GalaError::AdminRequired),
        }
    }

    /// Fetch the roster from the remote service and refresh the cache.
    pub async fn sync(&mut self) -> Result<usize> {
        let roster = self.api.get_participants().await?;

        RosterStore::new(&self.storage).replace_all(&roster).await?;
        SessionStore::new(&self.storage)
            .set_last_sync(Utc::now())
            .await?;

        self.roster = roster;
        tracing::info!("Synced {} participants", self.roster.len());
        Ok(self.roster.len())
    }

    pub async fn last_sync(&self) -> Result<Option<DateTime<Utc>>> {
        SessionStore::new(&self.storage).last_sync().await
    }

    /// Load the cached snapshot without touching the network.
    pub async fn load_cached(&mut self) -> Result<usize> {
        self.roster = RosterStore::new(&self.storage).load_all().await?;
        Ok(self.roster.len())
    }

    pub async fn check_in(&mut self, qr_code: &str) -> Result<()> {
        self.require_login()?;
        self.api.check_in(qr_code).await?;
        self.sync().await?;
        Ok(())
    }

    pub async fn record_donation(&mut self, qr_code: &str, amount: f64) -> Result<()> {
        self.require_login()?;
        if !amount.is_finite() || amount <= 0.0 {
            return Err(GalaError::InvalidAmount(amount));
        }
        self.api.add_donation(qr_code, amount).await?;
        self.sync().await?;
        Ok(())
    }

    /// Add a participant to the local snapshot. Registration on the
    /// remote service is a separate step; duplicates are rejected here
    /// so badges stay unique.
    pub async fn add_participant(
        &mut self,
        qr_code: &str,
        name: &str,
        surname: &str,
    ) -> Result<()> {
        self.require_admin()?;

        if self.roster.iter().any(|p| p.qr_code == qr_code) {
            return Err(GalaError::DuplicateParticipant {
                qr_code: qr_code.to_string(),
            });
        }

        self.roster.push(Participant::new(qr_code, name, surname));
        RosterStore::new(&self.storage)
            .replace_all(&self.roster)
            .await?;
        Ok(())
    }

    /// Replace the snapshot from an imported spreadsheet.
    pub async fn replace_roster(&mut self, roster: Vec<Participant>) -> Result<()> {
        self.require_admin()?;
        RosterStore::new(&self.storage).replace_all(&roster).await?;
        self.roster = roster;
        Ok(())
    }

    pub fn search(&self, term: &str) -> Vec<&Participant> {
        let term = term.to_lowercase();
        self.roster
            .iter()
            .filter(|p| {
                p.qr_code.to_lowercase().contains(&term)
                    || p.name.to_lowercase().contains(&term)
                    || p.surname.to_lowercase().contains(&term)
            })
            .collect()
    }

    pub fn stats(&self) -> RosterStats {
        RosterStats::compute(&self.roster, self.config.lottery.minimum_donation)
    }

    /// Refresh the cache in the background every `sync_interval_secs`.
    /// The in-memory snapshot is per-command; the cache is what the
    /// next `load_cached` picks up.
    pub fn start_auto_sync(&mut self) {
        if self.sync_task.is_some() {
            return;
        }

        let api = self.api.clone();
        let storage = Arc::clone(&self.storage);
        let interval = Duration::from_secs(self.config.sync_interval_secs);

        self.sync_task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await; // first tick is immediate
            loop {
                ticker.tick().await;
                match api.get_participants().await {
                    Ok(roster) => {
                        if let Err(e) = RosterStore::new(&storage).replace_all(&roster).await {
                            tracing::warn!("Auto-sync cache write failed: {}", e);
                            continue;
                        }
                        let _ = SessionStore::new(&storage).set_last_sync(Utc::now()).await;
                        tracing::debug!("Auto-synced {} participants", roster.len());
                    }
                    Err(e) => tracing::warn!("Auto-sync failed: {}", e),
                }
            }
        }));
    }

    pub fn stop_auto_sync(&mut self) {
        if let Some(task) = self.sync_task.take() {
            task.abort();
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.stop_auto_sync();
    }
}
