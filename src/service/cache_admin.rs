//! Administrative cache operations: introspection, clearing, warm-up and
//! strategy switching. Every public operation requires an admin principal.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{info, warn};

use crate::auth::Principal;
use crate::cache::{CacheBackend, CacheStrategy};
use crate::error::{AppError, CacheError, Result};
use crate::models::{CacheOperationResult, CacheStatsReport, ClearCacheRequest, PageRequest};
use crate::service::TextEntryService;

pub struct CacheAdminService {
    entries: Arc<TextEntryService>,
    store: Arc<dyn CacheBackend>,
}

impl CacheAdminService {
    pub fn new(entries: Arc<TextEntryService>, store: Arc<dyn CacheBackend>) -> Self {
        Self { entries, store }
    }

    // == Stats ==
    pub async fn stats(&self, principal: &Principal) -> Result<CacheStatsReport> {
        principal.ensure_admin()?;

        let cache_names = self.store.list_regions().await?;
        let mut region_sizes = BTreeMap::new();
        for name in &cache_names {
            region_sizes.insert(name.clone(), self.store.region_size(name).await?);
        }

        let active_strategy = self.entries.strategy().current();
        Ok(CacheStatsReport {
            success: true,
            message: format!(
                "{} cache region(s), {} strategy active",
                cache_names.len(),
                active_strategy
            ),
            cache_names,
            region_sizes,
            active_strategy,
            use_auto_cache: active_strategy == CacheStrategy::Auto,
            manual: self
                .entries
                .cache_for(CacheStrategy::Manual)
                .metrics()
                .snapshot(),
            auto: self
                .entries
                .cache_for(CacheStrategy::Auto)
                .metrics()
                .snapshot(),
        })
    }

    // == Clear ==
    /// Clears one named region, or every region when `clear_all` is set,
    /// then optionally warms the cache.
    ///
    /// An unknown region fails with [`AppError::RegionNotFound`]; store
    /// failures surface as [`AppError::Cache`].
    pub async fn clear(
        &self,
        principal: &Principal,
        request: ClearCacheRequest,
    ) -> Result<CacheOperationResult> {
        principal.ensure_admin()?;

        let regions = self.store.list_regions().await?;
        let targets = if request.clear_all {
            regions
        } else {
            let name = request
                .region_name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .ok_or_else(|| {
                    AppError::Validation("region_name is required unless clear_all is set".into())
                })?;
            if !regions.iter().any(|r| r == name) {
                return Err(AppError::RegionNotFound(name.to_string()));
            }
            vec![name.to_string()]
        };

        let mut removed = 0;
        for region in &targets {
            removed += self.store.evict_all(region).await.map_err(|err| match err {
                CacheError::RegionNotFound(name) => AppError::RegionNotFound(name),
                other => AppError::Cache(other),
            })?;
        }
        info!(regions = ?targets, removed, by = %principal.username, "cache cleared");

        let mut result = CacheOperationResult::ok(if request.clear_all {
            format!("Cleared all {} cache region(s)", targets.len())
        } else {
            format!("Cleared cache region '{}'", targets.join(", "))
        });
        result.cleared_regions = targets;

        if request.warm_up {
            result.warmed_up = self.warm_up().await;
            result.message.push_str(if result.warmed_up {
                "; warm-up completed"
            } else {
                "; warm-up failed"
            });
        }
        Ok(result)
    }

    // == Warm Up ==
    /// Pre-populates the most common keys. Best effort: failures are logged
    /// and reported as `false`.
    pub async fn warm_up(&self) -> bool {
        let listed = self.entries.find_all(PageRequest::default()).await;
        let counted = self.entries.count_total().await;
        match (listed, counted) {
            (Ok(page), Ok(total)) => {
                info!(cached = page.content.len(), total, "cache warm-up completed");
                true
            }
            (Err(err), _) | (_, Err(err)) => {
                warn!(error = %err, "cache warm-up failed");
                false
            }
        }
    }

    // == Toggle ==
    /// Switches the read strategy. No region is cleared, so the newly
    /// selected strategy starts cold.
    pub async fn toggle_strategy(
        &self,
        principal: &Principal,
        use_auto: bool,
    ) -> Result<CacheOperationResult> {
        principal.ensure_admin()?;

        let previous = self.entries.strategy().set(use_auto);
        let current = self.entries.strategy().current();
        info!(%previous, %current, by = %principal.username, "cache strategy toggled");

        Ok(if previous == current {
            CacheOperationResult::ok(format!("Cache strategy already {}", current))
        } else {
            CacheOperationResult::ok(format!(
                "Cache strategy switched from {} to {}",
                previous, current
            ))
        })
    }
}
