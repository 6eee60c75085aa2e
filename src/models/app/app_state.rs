use std::sync::Arc;

use crate::models::app::config::AppConfig;
use crate::models::sales::{BracketOption, Dataset};
use crate::services::chart_service::VectorConverter;
use crate::services::dataset_service::bracket_options;

#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub config: AppConfig,
    pub converter: Arc<dyn VectorConverter>,
    // Dropdown options, fixed at startup from the dataset's age range
    pub bracket_options: Vec<BracketOption>,
}

impl AppState {
    pub fn new(dataset: Dataset, config: AppConfig, converter: Arc<dyn VectorConverter>) -> Self {
        let bracket_options = bracket_options(&dataset);
        Self {
            dataset: Arc::new(dataset),
            config,
            converter,
            bracket_options,
        }
    }
}
