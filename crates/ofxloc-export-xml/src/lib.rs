mod sink;
mod writer;

pub use sink::{write_document, FsSink, MemorySink, OutputSink};
pub use writer::{render_document, write_resource_xml};
