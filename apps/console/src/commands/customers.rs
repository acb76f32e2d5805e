//! # Customer Commands

use pincorp_core::search::Page;
use pincorp_core::Customer;
use pincorp_store::Store;
use tracing::debug;

use super::rejected;
use crate::error::ApiError;
use crate::state::ConfigState;

pub fn list_customers(
    store: &Store,
    config: &ConfigState,
    term: &str,
    page: usize,
) -> Result<Page<Customer>, ApiError> {
    debug!(term = %term, page, "list_customers command");
    store
        .customers()
        .page(term, page, config.page_size)
        .map_err(rejected("list_customers"))
}

/// Checkout lookup by name or phone. An empty term finds nobody.
pub fn search_customers(store: &Store, term: &str) -> Result<Vec<Customer>, ApiError> {
    store
        .customers()
        .search(term)
        .map_err(rejected("search_customers"))
}

/// Registers a customer from the checkout panel.
pub fn register_customer(
    store: &Store,
    name: &str,
    phone: &str,
    address: Option<String>,
) -> Result<Customer, ApiError> {
    debug!(name = %name, "register_customer command");
    store
        .customers()
        .register(name, phone, address)
        .map_err(rejected("register_customer"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use pincorp_store::StoreConfig;

    #[test]
    fn test_register_then_search() {
        let store = Store::open(StoreConfig::in_memory()).unwrap();
        register_customer(&store, "Trần Văn An", "0901234567", None).unwrap();

        assert!(search_customers(&store, "").unwrap().is_empty());
        assert_eq!(search_customers(&store, "0901").unwrap().len(), 1);
        assert_eq!(
            list_customers(&store, &ConfigState::default(), "", 1)
                .unwrap()
                .total_items,
            1
        );
    }

    #[test]
    fn test_phone_required() {
        let store = Store::open(StoreConfig::in_memory()).unwrap();
        let err = register_customer(&store, "An", "  ", None).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
