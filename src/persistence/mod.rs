pub mod files;
pub mod parser;
pub mod serializer;
pub mod settings;

pub use files::{
    atomic_write, data_file, ensure_maniana_dir, get_maniana_dir, log_dir, read_file,
    settings_file,
};
pub use parser::{load_model, load_restore_source, parse_document, PersistenceError};
pub use serializer::{save_model, serialize_model, FORMAT_VERSION};
pub use settings::{load_settings, save_settings, Settings};
