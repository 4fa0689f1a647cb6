use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use crate::cart::Cart;
use crate::db::{DbPool, OrmConn};

/// Session-scoped carts, keyed by the authenticated session id. Carts are
/// never persisted; losing the process loses pending lines, matching the
/// ephemeral contract of the cart.
pub type CartStore = Arc<Mutex<HashMap<Uuid, Cart>>>;

/// Lock the cart store, recovering the map if a previous holder panicked.
/// Cart mutations are plain inserts and removes, so the data stays usable
/// and one panicked request must not wedge the whole cart API.
pub fn lock_carts(store: &CartStore) -> MutexGuard<'_, HashMap<Uuid, Cart>> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub carts: CartStore,
}

impl AppState {
    pub fn new(pool: DbPool, orm: OrmConn) -> Self {
        Self {
            pool,
            orm,
            carts: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Channel;

    #[test]
    fn cart_store_survives_a_poisoned_lock() {
        let store: CartStore = Arc::new(Mutex::new(HashMap::new()));
        let poisoner = Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let mut carts = poisoner.lock().unwrap();
            carts.insert(Uuid::new_v4(), Cart::new(Channel::Tiktok));
            panic!("holder dies with the guard held");
        })
        .join();

        let carts = lock_carts(&store);
        assert_eq!(carts.len(), 1);
    }
}
