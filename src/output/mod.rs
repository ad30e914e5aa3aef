pub mod schema;

pub use schema::{
    builder_config_path, save_builder_config, BuildPlan, BuilderConfigRecord, BUILDER_CONFIG_DIR,
    BUILDER_CONFIG_FILE,
};
