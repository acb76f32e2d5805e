//! # Customer Repository
//!
//! Registered buyers. Walk-in buyers are never stored here; they live only
//! as a name inside the sale.

use pincorp_core::search::{self, Page};
use pincorp_core::validation::validate_customer;
use pincorp_core::Customer;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::store::{new_id, Store};

/// Repository for customers.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    store: Store,
}

impl CustomerRepository {
    pub fn new(store: Store) -> Self {
        CustomerRepository { store }
    }

    /// All customers matching `term` (everyone when empty), newest first.
    pub fn list(&self, term: &str) -> StoreResult<Vec<Customer>> {
        self.store
            .read(|c| search::filter(&c.customers, term).into_iter().cloned().collect())
    }

    pub fn page(&self, term: &str, page: usize, page_size: usize) -> StoreResult<Page<Customer>> {
        Ok(search::paginate(self.list(term)?, page, page_size))
    }

    /// Checkout lookup by name or phone. An empty term finds nobody.
    pub fn search(&self, term: &str) -> StoreResult<Vec<Customer>> {
        self.store.read(|c| {
            search::search_customers(&c.customers, term)
                .into_iter()
                .cloned()
                .collect()
        })
    }

    pub fn get(&self, id: &str) -> StoreResult<Customer> {
        self.store
            .read(|c| c.customers.iter().find(|x| x.id == id).cloned())?
            .ok_or_else(|| StoreError::not_found("Customer", id))
    }

    /// Registers a new customer. Name and phone are required.
    ///
    /// The new customer is listed first.
    pub fn register(
        &self,
        name: &str,
        phone: &str,
        address: Option<String>,
    ) -> StoreResult<Customer> {
        let customer = Customer {
            id: new_id(),
            name: name.trim().to_string(),
            phone: phone.trim().to_string(),
            address: address
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty()),
        };
        validate_customer(&customer)?;

        self.store.transaction(|c| {
            debug!(id = %customer.id, name = %customer.name, "Registering customer");
            c.customers.insert(0, customer.clone());
            Ok(customer)
        })
    }
}
