pub mod notion_sink;

pub use notion_sink::NotionSink;
