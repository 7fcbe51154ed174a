use super::LinkError;
use serde_json::{Map, Value};
use std::io::{Read, Write};

/// One JSON object from a record list; field order is preserved.
pub type Record = Map<String, Value>;

pub fn read_records<R: Read>(reader: R) -> Result<Vec<Record>, LinkError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Writes records as pretty JSON with non-ASCII text left unescaped.
pub fn write_records<W: Write>(mut writer: W, records: &[Record]) -> Result<(), LinkError> {
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Non-empty string value of `field`, if any.
pub(crate) fn text_field<'r>(record: &'r Record, field: &str) -> Option<&'r str> {
    record
        .get(field)
        .and_then(Value::as_str)
        .filter(|value| !value.trim().is_empty())
}
