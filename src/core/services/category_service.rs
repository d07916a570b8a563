use tracing::warn;

use crate::ledger::CategorySet;

use super::{ServiceError, ServiceResult};

pub struct CategoryService;

impl CategoryService {
    /// Registers a category, returning its normalised label.
    pub fn add(categories: &mut CategorySet, label: &str) -> ServiceResult<String> {
        let normalized = CategorySet::normalize(label);
        if normalized.is_empty() {
            warn!("rejected empty category label");
            return Err(ServiceError::EmptyCategory);
        }
        if !categories.insert(normalized.clone()) {
            warn!(category = %normalized, "rejected duplicate category");
            return Err(ServiceError::DuplicateCategory(normalized));
        }
        Ok(normalized)
    }

    pub fn list(categories: &CategorySet) -> Vec<&str> {
        categories.iter().collect()
    }

    /// Normalises `label` and checks that it is registered.
    pub fn require_registered(categories: &CategorySet, label: &str) -> ServiceResult<String> {
        let normalized = CategorySet::normalize(label);
        if normalized.is_empty() {
            return Err(ServiceError::EmptyCategory);
        }
        if !categories.contains(&normalized) {
            return Err(ServiceError::UnknownCategory(normalized));
        }
        Ok(normalized)
    }
}
