use std::sync::Arc;

use crate::application::store::PostStore;

#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<PostStore>,
}

impl ApiState {
    pub fn new(store: Arc<PostStore>) -> Self {
        Self { store }
    }
}
