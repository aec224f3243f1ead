//! Table definitions.
//!
//! Every statement is `CREATE TABLE IF NOT EXISTS`; existing tables are never
//! altered.

/// Tables guaranteed to exist after initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    /// Boolean toggles stored as 0/1.
    ConfigData,
    /// Downloaded item ids, owned by the service.
    DownloadData,
    /// Account id to name/mark mapping, owned by the service.
    MappingData,
    /// Free-form string options.
    OptionData,
}

impl Table {
    pub const ALL: [Table; 4] = [
        Table::ConfigData,
        Table::DownloadData,
        Table::MappingData,
        Table::OptionData,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Table::ConfigData => "config_data",
            Table::DownloadData => "download_data",
            Table::MappingData => "mapping_data",
            Table::OptionData => "option_data",
        }
    }

    pub(crate) fn ddl(self) -> &'static str {
        match self {
            Table::ConfigData => CONFIG_DATA,
            Table::DownloadData => DOWNLOAD_DATA,
            Table::MappingData => MAPPING_DATA,
            Table::OptionData => OPTION_DATA,
        }
    }
}

const CONFIG_DATA: &str = "
CREATE TABLE IF NOT EXISTS config_data (
    NAME TEXT PRIMARY KEY,
    VALUE INTEGER NOT NULL CHECK(VALUE IN (0, 1))
);
";

const DOWNLOAD_DATA: &str = "
CREATE TABLE IF NOT EXISTS download_data (
    ID TEXT PRIMARY KEY
);
";

const MAPPING_DATA: &str = "
CREATE TABLE IF NOT EXISTS mapping_data (
    ID TEXT PRIMARY KEY,
    NAME TEXT NOT NULL,
    MARK TEXT NOT NULL
);
";

const OPTION_DATA: &str = "
CREATE TABLE IF NOT EXISTS option_data (
    NAME TEXT PRIMARY KEY,
    VALUE TEXT NOT NULL
);
";

pub fn all_schemas() -> impl Iterator<Item = &'static str> {
    Table::ALL.into_iter().map(Table::ddl)
}
