use redb::TableDefinition;

/// Table for storing whole-value blobs.
/// Key: blob name, e.g. "people_data"
/// Value: serialized bytes, written and read as one unit
pub const BLOBS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("blobs");
