mod load;
mod types;

pub use load::{
    apply_overrides, get_tailbuf_data_dir, load_default, load_from_path, CONFIG_FILE_NAME,
};
pub use types::{AppConfig, LoggingConfig, RingConfig};
