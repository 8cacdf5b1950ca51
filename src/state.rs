/*
 * Responsibility
 * - shared context attached to the Router (AppState)
 * - Clone is cheap: the resolver sits behind an Arc
 */
use std::sync::Arc;

use crate::config::AppEnv;
use crate::services::auth::PrincipalResolver;

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<dyn PrincipalResolver>,
    pub app_env: AppEnv,
}

impl AppState {
    pub fn new(resolver: Arc<dyn PrincipalResolver>, app_env: AppEnv) -> Self {
        Self { resolver, app_env }
    }
}
