use serde::{Deserialize, Serialize};
use serde_json::ser::Formatter;
use std::collections::HashMap;
use std::io;

/// A parsed template: string keys mapped to arbitrary YAML values.
pub type TemplateDocument = HashMap<String, serde_yaml::Value>;

/// Payload of every message placed on the fan-out queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FanoutMessage {
    pub worker_ship: String,
    pub template_prefix: String,
}

impl FanoutMessage {
    /// The queue message text. Separators are `": "` and `", "` and non-ASCII
    /// characters are `\uXXXX` escaped, matching what existing consumers read.
    pub fn to_message_body(&self) -> Result<String, serde_json::Error> {
        let mut buf = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
        self.serialize(&mut serializer)?;
        String::from_utf8(buf)
            .map_err(|e| serde_json::Error::io(io::Error::new(io::ErrorKind::InvalidData, e)))
    }
}

struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        for ch in fragment.chars() {
            if ch.is_ascii() {
                writer.write_all(&[ch as u8])?;
            } else {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}

/// One entry of an SQS `SendMessageBatch` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchEntry {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "MessageBody")]
    pub message_body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimedFrequency {
    FiveMinutes,
    FifteenMinutes,
    ThirtyMinutes,
    Hourly,
    SixHourly,
    TwelveHourly,
    Daily,
}

/// Constant input passed by the EventBridge schedule to the Starbase Lambda.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedEvent {
    pub frequency: TimedFrequency,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WorkerShip {
    pub name: String,
    /// Either a single `.yaml` key or a prefix holding many templates.
    pub template_prefix: String,
    pub invocation_queue_url: String,
    #[serde(default)]
    pub frequency: Option<TimedFrequency>,
}
