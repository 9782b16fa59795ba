use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use stockwise_core::TenantId;

/// Tenant-partitioned snapshot storage behind the in-memory catalog.
///
/// Reads never cross a tenant boundary: every call names its tenant.
pub trait TenantStore<K, V>: Send + Sync {
    fn get(&self, tenant_id: TenantId, key: &K) -> Option<V>;
    /// Insert or replace.
    fn upsert(&self, tenant_id: TenantId, key: K, value: V);
    /// Every value for a tenant, in key order.
    fn list(&self, tenant_id: TenantId) -> Vec<V>;
}

/// `RwLock`-guarded partitions, one ordered map per tenant.
///
/// A poisoned lock still serves its data: writers only insert whole entries,
/// so a map is never left half-updated.
#[derive(Debug)]
pub struct InMemoryTenantStore<K, V> {
    partitions: RwLock<BTreeMap<TenantId, BTreeMap<K, V>>>,
}

impl<K, V> InMemoryTenantStore<K, V> {
    pub fn new() -> Self {
        Self {
            partitions: RwLock::new(BTreeMap::new()),
        }
    }
}

impl<K, V> Default for InMemoryTenantStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> TenantStore<K, V> for InMemoryTenantStore<K, V>
where
    K: Ord + Send + Sync,
    V: Clone + Send + Sync,
{
    fn get(&self, tenant_id: TenantId, key: &K) -> Option<V> {
        let partitions = self.partitions.read().unwrap_or_else(PoisonError::into_inner);
        partitions.get(&tenant_id)?.get(key).cloned()
    }

    fn upsert(&self, tenant_id: TenantId, key: K, value: V) {
        let mut partitions = self.partitions.write().unwrap_or_else(PoisonError::into_inner);
        partitions.entry(tenant_id).or_default().insert(key, value);
    }

    fn list(&self, tenant_id: TenantId) -> Vec<V> {
        let partitions = self.partitions.read().unwrap_or_else(PoisonError::into_inner);
        partitions
            .get(&tenant_id)
            .map(|p| p.values().cloned().collect())
            .unwrap_or_default()
    }
}
