use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;

use union_portal::extraction::{DocumentExtractor, ExtractedFinancials, ExtractionError};
use union_portal::unions::domain::{DocumentDescriptor, OwnerId, UnionId, UnionRecord};
use union_portal::unions::{EligibilityConfig, RegistryError, UnionRegistry};
use union_portal::auth::{SmsError, SmsSender};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Mutex-guarded registry standing in for the persistent union registry.
#[derive(Default, Clone)]
pub(crate) struct InMemoryUnionRegistry {
    records: Arc<Mutex<HashMap<UnionId, UnionRecord>>>,
}

impl UnionRegistry for InMemoryUnionRegistry {
    fn insert(&self, record: UnionRecord) -> Result<UnionRecord, RegistryError> {
        let mut guard = self.records.lock().expect("registry mutex poisoned");
        if guard.values().any(|existing| existing.code == record.code) {
            return Err(RegistryError::DuplicateCode);
        }
        if guard.values().any(|existing| existing.owner == record.owner) {
            return Err(RegistryError::DuplicateOwner);
        }
        guard.insert(record.id, record.clone());
        Ok(record)
    }

    fn update(&self, record: UnionRecord) -> Result<(), RegistryError> {
        let mut guard = self.records.lock().expect("registry mutex poisoned");
        if !guard.contains_key(&record.id) {
            return Err(RegistryError::NotFound);
        }
        guard.insert(record.id, record);
        Ok(())
    }

    fn fetch(&self, id: UnionId) -> Result<Option<UnionRecord>, RegistryError> {
        let guard = self.records.lock().expect("registry mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn find_by_owner(&self, owner: &OwnerId) -> Result<Option<UnionRecord>, RegistryError> {
        let guard = self.records.lock().expect("registry mutex poisoned");
        Ok(guard
            .values()
            .find(|record| &record.owner == owner)
            .cloned())
    }

    fn list(&self) -> Result<Vec<UnionRecord>, RegistryError> {
        let guard = self.records.lock().expect("registry mutex poisoned");
        let mut records: Vec<UnionRecord> = guard.values().cloned().collect();
        records.sort_by_key(|record| record.id.0);
        Ok(records)
    }
}

/// Development stand-in for the SMS gateway: logs each code and keeps the
/// latest per phone number so the demo can read it back.
#[derive(Default, Clone)]
pub(crate) struct DevSmsSender {
    codes: Arc<Mutex<HashMap<String, String>>>,
}

impl DevSmsSender {
    pub(crate) fn last_code_for(&self, phone_number: &str) -> Option<String> {
        self.codes
            .lock()
            .expect("sender mutex poisoned")
            .get(phone_number)
            .cloned()
    }
}

impl SmsSender for DevSmsSender {
    fn send(&self, phone_number: &str, code: &str) -> Result<(), SmsError> {
        info!(%phone_number, %code, "one-time code issued (dev sender)");
        self.codes
            .lock()
            .expect("sender mutex poisoned")
            .insert(phone_number.to_string(), code.to_string());
        Ok(())
    }
}

/// Stand-in for the workflow-automation extraction webhook. Unconfigured it
/// reports a transport failure, which the portal surfaces as the manual
/// entry fallback.
#[derive(Default, Clone)]
pub(crate) struct StaticDocumentExtractor {
    figures: Option<ExtractedFinancials>,
}

impl StaticDocumentExtractor {
    pub(crate) fn unconfigured() -> Self {
        Self { figures: None }
    }

    pub(crate) fn with_figures(figures: ExtractedFinancials) -> Self {
        Self {
            figures: Some(figures),
        }
    }
}

impl DocumentExtractor for StaticDocumentExtractor {
    fn extract(
        &self,
        _documents: &[DocumentDescriptor],
    ) -> Result<ExtractedFinancials, ExtractionError> {
        match self.figures {
            Some(figures) => Ok(figures),
            None => Err(ExtractionError::Transport(
                "document extraction collaborator is not configured".to_string(),
            )),
        }
    }
}

pub(crate) fn default_eligibility_config() -> EligibilityConfig {
    EligibilityConfig::default()
}
