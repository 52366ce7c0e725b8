pub mod tab;

pub use tab::{parse_tab_id, Note, Tab, TabGroup};
