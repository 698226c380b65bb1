use std::collections::HashSet;
use std::sync::Arc;

use crate::config::Config;
use crate::digest::SummaryFormatter;
use crate::docs::RetrievalClient;
use crate::router::QueryRouter;

pub struct AppState {
    pub config: Arc<Config>,
    pub retrieval: Arc<RetrievalClient>,
    pub router: Arc<QueryRouter>,
    pub formatter: Arc<SummaryFormatter>,
    pub admin_ids: HashSet<u64>,
}

impl AppState {
    pub fn is_admin(&self, user_id: u64) -> bool {
        self.admin_ids.contains(&user_id)
    }
}

pub type Context<'a> = poise::Context<'a, AppState, anyhow::Error>;
