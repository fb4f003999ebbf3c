mod user_tests;

use std::sync::Arc;

use crate::repositories::Repositories;
use crate::store::InMemoryStore;

pub(super) fn repos() -> Repositories {
    Repositories::new(Arc::new(InMemoryStore::with_catalog()))
}
