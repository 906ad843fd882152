//! A process-local [`AutoscaleSettingsApi`] with injectable failures.
//!
//! Used for dry runs and by tests that exercise orchestration without a
//! management endpoint. Failures are queued per operation and consumed
//! one per call, in order.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::api::AutoscaleSettingsApi;
use crate::error::{MonitorError, MonitorResult};
use crate::models::{AutoscaleSetting, AutoscaleSettingParams, AutoscaleSettingResource};

pub struct InMemoryAutoscaleSettings {
    subscription: String,
    /// resource group → settings, in insertion order.
    settings: Mutex<BTreeMap<String, Vec<AutoscaleSettingResource>>>,
    list_failures: Mutex<VecDeque<MonitorError>>,
    create_failures: Mutex<VecDeque<MonitorError>>,
    list_calls: AtomicUsize,
    create_calls: AtomicUsize,
}

impl InMemoryAutoscaleSettings {
    pub fn new(subscription: &str) -> Self {
        Self {
            subscription: subscription.to_string(),
            settings: Mutex::new(BTreeMap::new()),
            list_failures: Mutex::new(VecDeque::new()),
            create_failures: Mutex::new(VecDeque::new()),
            list_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
        }
    }

    /// Seed an existing setting.
    pub fn insert(&self, resource_group: &str, resource: AutoscaleSettingResource) {
        let mut settings = self.settings.lock().unwrap_or_else(|e| e.into_inner());
        settings
            .entry(resource_group.to_string())
            .or_default()
            .push(resource);
    }

    /// The next list call fails with `err`.
    pub fn fail_next_list(&self, err: MonitorError) {
        self.list_failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(err);
    }

    /// The next create-or-update call fails with `err`.
    pub fn fail_next_create(&self, err: MonitorError) {
        self.create_failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(err);
    }

    /// Snapshot of the settings in a resource group.
    pub fn settings(&self, resource_group: &str) -> Vec<AutoscaleSettingResource> {
        self.settings
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(resource_group)
            .cloned()
            .unwrap_or_default()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    fn resource_id(&self, resource_group: &str, name: &str) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/microsoft.insights/autoscalesettings/{}",
            self.subscription, resource_group, name
        )
    }
}

#[async_trait]
impl AutoscaleSettingsApi for InMemoryAutoscaleSettings {
    async fn list_by_resource_group(
        &self,
        resource_group: &str,
    ) -> MonitorResult<Vec<AutoscaleSettingResource>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self
            .list_failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
        {
            return Err(err);
        }
        Ok(self.settings(resource_group))
    }

    async fn create_or_update(
        &self,
        resource_group: &str,
        name: &str,
        params: &AutoscaleSettingParams,
    ) -> MonitorResult<AutoscaleSettingResource> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self
            .create_failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
        {
            return Err(err);
        }

        let resource = AutoscaleSettingResource {
            id: self.resource_id(resource_group, name),
            name: name.to_string(),
            resource_type: Some("Microsoft.Insights/autoscaleSettings".to_string()),
            location: params.location.clone(),
            tags: BTreeMap::new(),
            properties: AutoscaleSetting {
                profiles: params.profiles.clone(),
                notifications: Vec::new(),
                enabled: params.enabled,
                name: Some(name.to_string()),
                target_resource_uri: Some(params.target_resource_uri.clone()),
            },
        };

        let mut settings = self.settings.lock().unwrap_or_else(|e| e.into_inner());
        let group = settings.entry(resource_group.to_string()).or_default();
        match group.iter_mut().find(|r| r.name == name) {
            Some(existing) => *existing = resource.clone(),
            None => group.push(resource.clone()),
        }
        Ok(resource)
    }
}
